//! Request and response failures

use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The server answered with a non-2xx status. `message` is taken from
    /// the JSON error body when there is one.
    #[error("server returned {status}: {message}")]
    Http { status: u16, message: String },

    #[error("could not reach the server: {0}")]
    Network(#[from] reqwest::Error),

    #[error("no response within {0:?}")]
    Timeout(Duration),

    #[error("bad service URL {0}")]
    InvalidUrl(String),

    #[error("unexpected response body: {message}")]
    Parse { message: String, body: Option<String> },
}

impl ApiError {
    pub fn http(status: u16, message: impl Into<String>) -> Self {
        Self::Http {
            status,
            message: message.into(),
        }
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: None,
        }
    }

    /// Parse failure that keeps the offending body for the log.
    pub fn parse_with_body(message: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            body: Some(body.into()),
        }
    }

}
