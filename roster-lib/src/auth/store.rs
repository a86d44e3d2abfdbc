//! Token storage

use std::fmt;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::Duration;
use chrono::Utc;
use tokio::sync::RwLock;

use super::AccessToken;
use crate::error::StoreError;

/// Name of the token cookie.
pub const TOKEN_COOKIE: &str = "access_token";

/// The `SameSite` attribute of a cookie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SameSite {
    #[default]
    Strict,
    Lax,
    None,
}

impl fmt::Display for SameSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SameSite::Strict => "Strict",
            SameSite::Lax => "Lax",
            SameSite::None => "None",
        };
        f.write_str(s)
    }
}

impl FromStr for SameSite {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" => Ok(SameSite::Strict),
            "lax" => Ok(SameSite::Lax),
            "none" => Ok(SameSite::None),
            other => Err(format!("unknown SameSite value: {}", other)),
        }
    }
}

/// Attributes of the token cookie.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CookieOptions {
    pub name: String,
    pub path: String,
    /// Lifetime of a stored token, in days.
    pub expires_days: i64,
    pub secure: bool,
    pub same_site: SameSite,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            name: TOKEN_COOKIE.to_string(),
            path: "/".to_string(),
            expires_days: 7,
            secure: false,
            same_site: SameSite::Strict,
        }
    }
}

impl CookieOptions {
    /// Stamps a freshly issued token with this cookie's expiry.
    pub fn stamp(&self, access_token: impl Into<String>) -> AccessToken {
        AccessToken::with_expiry(access_token, Utc::now() + Duration::days(self.expires_days))
    }

    /// Formats a `Set-Cookie` header value carrying `value`.
    ///
    /// # Example
    ///
    /// ```
    /// use roster_lib::auth::CookieOptions;
    ///
    /// let header = CookieOptions::default().set_cookie("abc", 3600);
    /// assert_eq!(header, "access_token=abc; Max-Age=3600; Path=/; SameSite=Strict");
    /// ```
    pub fn set_cookie(&self, value: &str, max_age_secs: i64) -> String {
        let mut header = format!(
            "{}={}; Max-Age={}; Path={}; SameSite={}",
            self.name, value, max_age_secs, self.path, self.same_site
        );
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }
}

/// Persistent storage for the session token.
///
/// Implementations drop tokens past their `expires_at` on load.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Loads the stored token, if any and still valid.
    async fn load(&self) -> Result<Option<AccessToken>, StoreError>;

    /// Replaces the stored token.
    async fn save(&self, token: &AccessToken) -> Result<(), StoreError>;

    /// Removes the stored token.
    async fn clear(&self) -> Result<(), StoreError>;
}

/// Token store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<AccessToken>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStore for MemoryTokenStore {
    async fn load(&self) -> Result<Option<AccessToken>, StoreError> {
        let mut guard = self.token.write().await;
        if guard.as_ref().is_some_and(AccessToken::is_expired) {
            *guard = None;
        }
        Ok(guard.clone())
    }

    async fn save(&self, token: &AccessToken) -> Result<(), StoreError> {
        *self.token.write().await = Some(token.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        *self.token.write().await = None;
        Ok(())
    }
}
