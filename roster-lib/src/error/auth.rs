//! Authentication error types

/// Errors that can occur while obtaining or using a session token.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The service rejected the username or password.
    #[error("Invalid credentials: {message}")]
    InvalidCredentials { message: String },

    /// The service rejected the bearer token, or none was attached.
    #[error("Unauthorized: {message}")]
    Unauthorized { message: String },

    /// The stored token is past its expiry.
    #[error("Token expired")]
    TokenExpired,

    /// Network error during authentication.
    #[error("Network error during auth: {0}")]
    Network(#[from] reqwest::Error),

    /// Failed to parse authentication response.
    #[error("Auth response parse error: {0}")]
    Parse(String),
}

impl AuthError {
    pub fn invalid_credentials(message: impl Into<String>) -> Self {
        Self::InvalidCredentials {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }
}
