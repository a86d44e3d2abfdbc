//! Roster HTTP server
//!
//! Serves the login, listing and column metadata endpoints over HTTP/1.

mod config;
mod error;
mod jwt;
mod repository;
mod routes;
mod server;
mod users;

pub use config::ServerConfig;
pub use error::HttpError;
pub use error::ServerError;
pub use error::TokenError;
pub use jwt::Claims;
pub use jwt::JwtSigner;
pub use repository::EmployeeRepository;
pub use repository::InMemoryRepository;
pub use repository::sample_employees;
pub use routes::INVALID_CREDENTIALS;
pub use routes::INVALID_TOKEN;
pub use routes::MISSING_TOKEN;
pub use server::Server;
pub use server::ServerHandle;
pub use users::User;
pub use users::UserDirectory;
