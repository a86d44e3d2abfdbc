//! Error types

mod api;
mod auth;
mod store;

pub use api::*;
pub use auth::*;
pub use store::*;

/// Any error returned by [`RosterClient`](crate::RosterClient).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl Error {
    /// Returns `true` if the session is no longer valid and the user must
    /// sign in again.
    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            Error::Auth(AuthError::Unauthorized { .. } | AuthError::TokenExpired)
        )
    }

    /// Message suitable for showing inline to the user.
    pub fn user_message(&self) -> String {
        match self {
            Error::Api(ApiError::Http { message, .. }) => message.clone(),
            Error::Auth(AuthError::InvalidCredentials { message }) => message.clone(),
            Error::Auth(AuthError::Unauthorized { message }) => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
