//! Screen switching and the event loop
//!
//! Key presses and timers are handled on the loop task. Requests run on
//! spawned tasks and report back over a channel; every task is tied to a
//! cancellation token that is replaced when the session ends.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use std::time::Instant;

use crossterm::event::Event;
use log::debug;
use log::info;
use log::warn;
use roster_grid::Key;
use roster_grid::KeyPress;
use roster_grid::RequestTicket;
use roster_grid::buffer::Buffer;
use roster_grid::paint::Rect;
use roster_grid::terminal::Terminal;
use roster_lib::Response;
use roster_lib::RosterClient;
use roster_lib::api::Listing;
use roster_lib::api::LoginResponse;
use roster_lib::auth::SessionContext;
use roster_lib::auth::TokenStore;
use roster_lib::error::Error as ClientError;
use roster_lib::filter::FilterState;
use roster_lib::model::ColumnDescriptor;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::login::LoginAction;
use crate::login::LoginForm;
use crate::table_page::PageCommand;
use crate::table_page::TablePage;

/// Longest wait for input, so that finished requests show up promptly.
const IDLE_POLL: Duration = Duration::from_millis(100);

const LOGIN_SUCCESS: &str = "로그인 성공! (JWT 저장됨)";
const SESSION_EXPIRED: &str = "세션이 만료되었습니다. 다시 로그인하세요.";

enum Screen {
    Login(LoginForm),
    Table(Box<TablePage>),
}

enum Message {
    LoggedIn(Result<LoginResponse, ClientError>),
    Columns(Result<Vec<ColumnDescriptor>, ClientError>),
    Base(Result<Listing, ClientError>),
    Filtered(RequestTicket, Result<Listing, ClientError>),
}

impl Message {
    fn error(&self) -> Option<&ClientError> {
        match self {
            Message::LoggedIn(_) => None,
            Message::Columns(result) => result.as_ref().err(),
            Message::Base(result) | Message::Filtered(_, result) => result.as_ref().err(),
        }
    }
}

pub struct App {
    config: AppConfig,
    client: RosterClient,
    screen: Screen,
    tx: mpsc::UnboundedSender<Message>,
    rx: mpsc::UnboundedReceiver<Message>,
    tasks: CancellationToken,
    quit: bool,
}

impl App {
    pub fn new(config: AppConfig, store: Arc<dyn TokenStore>) -> Result<Self, AppError> {
        let session = Arc::new(SessionContext::new(store));
        let client = RosterClient::builder()
            .url(config.api_base_url.clone())
            .session(session)
            .timeout(config.timeout)
            .cookie(config.cookie.clone())
            .build()?;
        let (tx, rx) = mpsc::unbounded_channel();
        Ok(Self {
            config,
            client,
            screen: Screen::Login(LoginForm::new()),
            tx,
            rx,
            tasks: CancellationToken::new(),
            quit: false,
        })
    }

    pub async fn run(mut self) -> Result<(), AppError> {
        if self.client.session().restore().await? {
            info!("Resuming stored session");
            self.open_table(None);
        }

        let mut terminal = Terminal::new()?;
        while !self.quit {
            terminal.draw(|buf| self.paint(buf))?;

            let now = Instant::now();
            let timeout = self
                .deadline()
                .map_or(IDLE_POLL, |d| d.saturating_duration_since(now).min(IDLE_POLL));
            let events = tokio::task::block_in_place(|| terminal.poll(timeout))?;
            for event in events {
                if let Event::Key(key) = event
                    && let Some(press) = KeyPress::from_crossterm(&key)
                {
                    self.on_key(press).await;
                }
            }

            while let Ok(message) = self.rx.try_recv() {
                self.on_message(message).await;
            }
            self.tick(Instant::now()).await;
        }

        self.tasks.cancel();
        info!("Exiting");
        Ok(())
    }

    fn deadline(&self) -> Option<Instant> {
        match &self.screen {
            Screen::Table(page) => page.deadline(),
            Screen::Login(_) => None,
        }
    }

    async fn tick(&mut self, now: Instant) {
        let commands = match &mut self.screen {
            Screen::Table(page) => page.tick(now),
            Screen::Login(_) => return,
        };
        self.run_commands(commands).await;
    }

    async fn on_key(&mut self, press: KeyPress) {
        if press.modifiers.ctrl && matches!(press.key, Key::Char('q') | Key::Char('c')) {
            self.quit = true;
            return;
        }

        match &mut self.screen {
            Screen::Login(form) => {
                if let LoginAction::Submit { username, password } = form.handle_key(press) {
                    let client = self.client.clone();
                    self.spawn(async move {
                        Message::LoggedIn(client.login(&username, &password).await)
                    });
                }
            }
            Screen::Table(page) => {
                let commands = page.handle_key(press, Instant::now());
                self.run_commands(commands).await;
            }
        }
    }

    async fn on_message(&mut self, message: Message) {
        if let Some(e) = message.error()
            && e.is_unauthorized()
        {
            warn!("Session rejected: {}", e);
            self.end_session(LoginForm::with_notice(SESSION_EXPIRED));
            return;
        }

        let screen = &mut self.screen;
        let logged_in = match message {
            Message::LoggedIn(Ok(response)) => {
                debug!("login: {}", response.message);
                true
            }
            Message::LoggedIn(Err(e)) => {
                warn!("Login failed: {}", e);
                if let Screen::Login(form) = screen {
                    form.fail(e.user_message());
                }
                false
            }
            Message::Columns(result) => {
                if let Screen::Table(page) = screen {
                    page.on_columns(result);
                }
                false
            }
            Message::Base(result) => {
                if let Screen::Table(page) = screen {
                    page.on_base(result);
                }
                false
            }
            Message::Filtered(ticket, result) => {
                if let Screen::Table(page) = screen {
                    page.on_filtered(ticket, result);
                }
                false
            }
        };
        if logged_in && matches!(self.screen, Screen::Login(_)) {
            self.open_table(Some(LOGIN_SUCCESS));
        }
    }

    fn open_table(&mut self, status: Option<&str>) {
        let today = chrono::Local::now().date_naive();
        let mut page = TablePage::new(self.config.dispatch_mode(), today);
        if let Some(status) = status {
            page = page.with_status(status);
        }
        let commands = page.mount();
        self.screen = Screen::Table(Box::new(page));
        for command in commands {
            self.request(command);
        }
    }

    async fn run_commands(&mut self, commands: Vec<PageCommand>) {
        for command in commands {
            if command == PageCommand::Logout {
                info!("Logging out");
                self.client.logout().await;
                self.end_session(LoginForm::new());
                return;
            }
            self.request(command);
        }
    }

    fn request(&self, command: PageCommand) {
        let client = self.client.clone();
        match command {
            PageCommand::FetchColumns => self.spawn(async move {
                Message::Columns(client.column_info().await.map(|r| r.into_inner()))
            }),
            PageCommand::FetchBase => self.spawn(async move {
                let listing = client.table_data(&FilterState::new()).await;
                Message::Base(listing.map(unwrap_listing))
            }),
            PageCommand::FetchFiltered(ticket) => self.spawn(async move {
                let listing = client.table_data(&ticket.criteria).await;
                Message::Filtered(ticket, listing.map(unwrap_listing))
            }),
            PageCommand::Logout => {}
        }
    }

    /// Cancels outstanding requests and returns to the login screen.
    fn end_session(&mut self, form: LoginForm) {
        self.tasks.cancel();
        self.tasks = CancellationToken::new();
        while self.rx.try_recv().is_ok() {}
        if let Screen::Table(page) = &mut self.screen {
            page.unmount();
        }
        self.screen = Screen::Login(form);
    }

    fn spawn<F>(&self, task: F)
    where
        F: Future<Output = Message> + Send + 'static,
    {
        let tx = self.tx.clone();
        let cancel = self.tasks.child_token();
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {}
                message = task => {
                    let _ = tx.send(message);
                }
            }
        });
    }

    fn paint(&self, buf: &mut Buffer) {
        let area = Rect::new(0, 0, buf.width(), buf.height());
        match &self.screen {
            Screen::Login(form) => form.paint(buf, area),
            Screen::Table(page) => page.paint(buf, area),
        }
    }
}

fn unwrap_listing(response: Response<Listing>) -> Listing {
    debug!("listing: {:?}", response.origin());
    response.into_inner()
}
