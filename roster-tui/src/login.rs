//! Login screen

use roster_grid::CellStyle;
use roster_grid::Key;
use roster_grid::KeyPress;
use roster_grid::buffer::Buffer;
use roster_grid::paint::Rect;
use roster_grid::style::palette;
use roster_grid::text_input::TextInput;

use crate::widgets;

const FORM_WIDTH: u16 = 40;
pub const LOGIN_FAILED: &str = "로그인 실패";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
    Submit,
}

impl LoginField {
    fn next(self) -> Self {
        match self {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Submit,
            LoginField::Submit => LoginField::Username,
        }
    }

    fn prev(self) -> Self {
        match self {
            LoginField::Username => LoginField::Submit,
            LoginField::Password => LoginField::Username,
            LoginField::Submit => LoginField::Password,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginAction {
    None,
    Submit { username: String, password: String },
}

#[derive(Debug, Default)]
pub struct LoginForm {
    username: TextInput,
    password: TextInput,
    field: LoginField,
    loading: bool,
    error: Option<String>,
    /// Shown above the form, e.g. after the session expired.
    notice: Option<String>,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_notice(notice: impl Into<String>) -> Self {
        Self {
            notice: Some(notice.into()),
            ..Self::default()
        }
    }

    pub fn field(&self) -> LoginField {
        self.field
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn handle_key(&mut self, press: KeyPress) -> LoginAction {
        if self.loading {
            return LoginAction::None;
        }
        match press.key {
            Key::Tab | Key::Down => self.field = self.field.next(),
            Key::BackTab | Key::Up => self.field = self.field.prev(),
            Key::Enter => return self.submit(),
            _ => {
                let input = match self.field {
                    LoginField::Username => &mut self.username,
                    LoginField::Password => &mut self.password,
                    LoginField::Submit => return LoginAction::None,
                };
                input.handle_key(press);
            }
        }
        LoginAction::None
    }

    /// Both fields are required; an empty one takes focus instead.
    fn submit(&mut self) -> LoginAction {
        if self.username.is_empty() {
            self.field = LoginField::Username;
            return LoginAction::None;
        }
        if self.password.is_empty() {
            self.field = LoginField::Password;
            return LoginAction::None;
        }
        self.loading = true;
        self.error = None;
        LoginAction::Submit {
            username: self.username.text().to_string(),
            password: self.password.text().to_string(),
        }
    }

    /// Ends a failed attempt, keeping what was typed.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.loading = false;
        let message = message.into();
        self.error = Some(if message.is_empty() {
            LOGIN_FAILED.to_string()
        } else {
            message
        });
    }

    pub fn paint(&self, buf: &mut Buffer, area: Rect) {
        let width = FORM_WIDTH.min(area.width);
        let x = area.x + area.width.saturating_sub(width) / 2;
        let mut y = area.y + area.height.saturating_sub(12) / 2;

        if let Some(notice) = &self.notice {
            widgets::centered(buf, x, y, width, notice, CellStyle::new().fg(palette::WARNING));
        }
        y += 2;
        widgets::centered(buf, x, y, width, "로그인", CellStyle::new().bold());
        y += 2;

        let focus = |field: LoginField| self.field == field && !self.loading;
        let username_cursor = focus(LoginField::Username).then(|| self.username.cursor());
        widgets::input(buf, x, y, width, self.username.text(), "아이디", username_cursor);
        y += 2;

        let masked = "•".repeat(self.password.len());
        let password_cursor = focus(LoginField::Password).then(|| self.password.cursor());
        widgets::input(buf, x, y, width, &masked, "비밀번호", password_cursor);
        y += 2;

        let label = if self.loading { "로그인 중..." } else { "로그인" };
        let bg = if focus(LoginField::Submit) {
            palette::ACCENT
        } else {
            palette::HEADER_BG
        };
        buf.fill(x, y, width, bg);
        widgets::centered(buf, x, y, width, label, CellStyle::new().bg(bg).bold());
        y += 2;

        if let Some(error) = &self.error {
            widgets::centered(buf, x, y, width, error, CellStyle::new().fg(palette::ERROR));
        }

        let help = "Tab 이동 · Enter 로그인 · Ctrl+Q 종료";
        widgets::centered(
            buf,
            area.x,
            area.bottom().saturating_sub(1),
            area.width,
            help,
            CellStyle::new().fg(palette::MUTED),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut LoginForm, text: &str) {
        for c in text.chars() {
            form.handle_key(KeyPress::plain(Key::Char(c)));
        }
    }

    #[test]
    fn test_submit_requires_both_fields() {
        let mut form = LoginForm::new();
        type_into(&mut form, "test");
        assert_eq!(form.handle_key(KeyPress::plain(Key::Enter)), LoginAction::None);
        assert_eq!(form.field(), LoginField::Password);

        type_into(&mut form, "test123");
        assert_eq!(
            form.handle_key(KeyPress::plain(Key::Enter)),
            LoginAction::Submit {
                username: "test".to_string(),
                password: "test123".to_string(),
            }
        );
        assert!(form.is_loading());
        assert_eq!(form.handle_key(KeyPress::plain(Key::Char('x'))), LoginAction::None);
    }

    #[test]
    fn test_failure_shows_message_and_reenables() {
        let mut form = LoginForm::new();
        type_into(&mut form, "test");
        form.handle_key(KeyPress::plain(Key::Tab));
        type_into(&mut form, "wrong");
        form.handle_key(KeyPress::plain(Key::Enter));

        form.fail("Invalid credentials");
        assert!(!form.is_loading());
        assert_eq!(form.error(), Some("Invalid credentials"));

        form.fail("");
        assert_eq!(form.error(), Some(LOGIN_FAILED));
    }

    #[test]
    fn test_password_is_masked() {
        let mut form = LoginForm::new();
        form.handle_key(KeyPress::plain(Key::Tab));
        type_into(&mut form, "secret");
        let mut buf = Buffer::new(60, 20);
        form.paint(&mut buf, Rect::new(0, 0, 60, 20));
        let screen: String = (0..20).map(|y| buf.line(y)).collect();
        assert!(!screen.contains("secret"));
        assert!(screen.contains("••••••"));
    }
}
