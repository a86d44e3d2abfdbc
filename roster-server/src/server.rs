//! Connection loop

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use hyper::Request;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use log::debug;
use log::info;
use log::warn;
use roster_lib::auth::CookieOptions;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::config::ServerConfig;
use crate::error::ServerError;
use crate::jwt::JwtSigner;
use crate::repository::EmployeeRepository;
use crate::routes;
use crate::routes::AppState;
use crate::routes::HttpResponse;
use crate::users::UserDirectory;

/// A bound HTTP/1 server.
pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    /// Binds the configured address. Port `0` picks a free port.
    pub async fn bind(
        config: &ServerConfig,
        repository: Arc<dyn EmployeeRepository>,
    ) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(config.bind)
            .await
            .map_err(|source| ServerError::Bind {
                addr: config.bind,
                source,
            })?;

        let state = AppState {
            repository,
            users: UserDirectory::demo(),
            signer: JwtSigner::new(&config.jwt_secret, config.token_ttl),
            cookie: CookieOptions {
                secure: config.cookie_secure,
                ..CookieOptions::default()
            },
        };

        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until `cancel` fires, then lets open
    /// connections finish their current request.
    pub async fn run(self, cancel: CancellationToken) -> Result<(), ServerError> {
        info!("Listening on http://{}", self.local_addr()?);

        loop {
            let (stream, peer) = tokio::select! {
                _ = cancel.cancelled() => {
                    info!("Shutting down");
                    return Ok(());
                }
                accepted = self.listener.accept() => match accepted {
                    Ok(accepted) => accepted,
                    Err(e) => {
                        warn!("Accept failed: {}", e);
                        continue;
                    }
                },
            };

            let state = self.state.clone();
            let cancel = cancel.clone();
            tokio::spawn(async move {
                let service = service_fn(move |req: Request<Incoming>| {
                    let state = state.clone();
                    async move { Ok::<_, Infallible>(serve(state, req).await) }
                });

                let conn = http1::Builder::new().serve_connection(TokioIo::new(stream), service);
                tokio::pin!(conn);

                tokio::select! {
                    result = conn.as_mut() => {
                        if let Err(e) = result {
                            debug!("Connection from {} ended: {}", peer, e);
                        }
                    }
                    _ = cancel.cancelled() => {
                        conn.as_mut().graceful_shutdown();
                        let _ = conn.await;
                    }
                }
            });
        }
    }

    /// Runs the server on a background task.
    pub fn spawn(self) -> Result<ServerHandle, ServerError> {
        let addr = self.local_addr()?;
        let cancel = CancellationToken::new();
        let task = tokio::spawn(self.run(cancel.clone()));
        Ok(ServerHandle { addr, cancel, task })
    }
}

async fn serve(state: Arc<AppState>, req: Request<Incoming>) -> HttpResponse {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = routes::handle(state, req).await;

    info!(
        "{} {} {} {:?}",
        method,
        path,
        response.status().as_u16(),
        started.elapsed()
    );
    response
}

/// A server running on a background task.
pub struct ServerHandle {
    addr: SocketAddr,
    cancel: CancellationToken,
    task: JoinHandle<Result<(), ServerError>>,
}

impl ServerHandle {
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Stops accepting connections and waits for the loop to exit.
    pub async fn shutdown(self) -> Result<(), ServerError> {
        self.cancel.cancel();
        self.task
            .await
            .map_err(|e| ServerError::Io(std::io::Error::other(e)))?
    }
}
