//! Token store error types

/// Errors raised by a [`TokenStore`](crate::auth::TokenStore).
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Token store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Token store format error: {0}")]
    Format(#[from] serde_json::Error),
}
