//! Server configuration

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use simplelog::LevelFilter;

use crate::error::ServerError;

pub const DEFAULT_BIND: &str = "127.0.0.1:3000";
pub const DEFAULT_JWT_SECRET: &str = "supersecret";
pub const DEFAULT_TOKEN_TTL: Duration = Duration::from_secs(3600);

/// Runtime settings of the server.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use roster_server::ServerConfig;
///
/// let config = ServerConfig::default()
///     .with_bind("127.0.0.1:0".parse().unwrap())
///     .with_token_ttl(Duration::from_secs(60));
/// assert_eq!(config.bind.port(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub bind: SocketAddr,
    pub jwt_secret: String,
    pub token_ttl: Duration,
    /// Mark the login cookie `Secure`.
    pub cookie_secure: bool,
    pub log_level: LevelFilter,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            token_ttl: DEFAULT_TOKEN_TTL,
            cookie_secure: false,
            log_level: LevelFilter::Info,
        }
    }
}

impl ServerConfig {
    /// Reads `ROSTER_*` variables, falling back to defaults for unset ones.
    ///
    /// Call `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ServerError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Like [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ServerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(bind) = lookup("ROSTER_BIND") {
            config.bind = bind
                .parse()
                .map_err(|e| ServerError::Config(format!("ROSTER_BIND={}: {}", bind, e)))?;
        }
        if let Some(secret) = lookup("ROSTER_JWT_SECRET") {
            if secret.is_empty() {
                return Err(ServerError::Config("ROSTER_JWT_SECRET is empty".to_string()));
            }
            config.jwt_secret = secret;
        }
        if let Some(ttl) = lookup("ROSTER_TOKEN_TTL_SECS") {
            let secs: u64 = ttl
                .parse()
                .map_err(|e| ServerError::Config(format!("ROSTER_TOKEN_TTL_SECS={}: {}", ttl, e)))?;
            config.token_ttl = Duration::from_secs(secs);
        }
        if let Some(secure) = lookup("ROSTER_COOKIE_SECURE") {
            config.cookie_secure = parse_bool(&secure);
        }
        if let Some(level) = lookup("ROSTER_LOG") {
            config.log_level = level
                .parse()
                .map_err(|_| ServerError::Config(format!("ROSTER_LOG={}", level)))?;
        }

        Ok(config)
    }

    pub fn with_bind(mut self, bind: SocketAddr) -> Self {
        self.bind = bind;
        self
    }

    pub fn with_jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.jwt_secret = secret.into();
        self
    }

    pub fn with_token_ttl(mut self, ttl: Duration) -> Self {
        self.token_ttl = ttl;
        self
    }

    pub fn with_cookie_secure(mut self, secure: bool) -> Self {
        self.cookie_secure = secure;
        self
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = ServerConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.bind.to_string(), DEFAULT_BIND);
        assert_eq!(config.jwt_secret, DEFAULT_JWT_SECRET);
        assert_eq!(config.token_ttl, DEFAULT_TOKEN_TTL);
        assert!(!config.cookie_secure);
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("ROSTER_BIND", "0.0.0.0:8080"),
            ("ROSTER_TOKEN_TTL_SECS", "60"),
            ("ROSTER_COOKIE_SECURE", "true"),
            ("ROSTER_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.token_ttl, Duration::from_secs(60));
        assert!(config.cookie_secure);
        assert_eq!(config.log_level, LevelFilter::Debug);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(ServerConfig::from_lookup(lookup(&[("ROSTER_BIND", "nowhere")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("ROSTER_TOKEN_TTL_SECS", "-1")])).is_err());
        assert!(ServerConfig::from_lookup(lookup(&[("ROSTER_JWT_SECRET", "")])).is_err());
    }
}
