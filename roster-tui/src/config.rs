//! Client configuration

use std::env;
use std::time::Duration;

use roster_grid::DispatchMode;
use roster_lib::auth::CookieOptions;

use crate::error::AppError;

pub const DEFAULT_API_BASE_URL: &str = "http://localhost:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub api_base_url: String,
    pub timeout: Duration,
    pub cookie: CookieOptions,
    /// Start with in-process filtering instead of server filtering.
    pub internal_filter: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            cookie: CookieOptions::default(),
            internal_filter: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup("ROSTER_API_BASE_URL") {
            config.api_base_url = url;
        }
        if let Some(ms) = lookup("ROSTER_API_TIMEOUT_MS") {
            let ms: u64 = ms
                .parse()
                .map_err(|e| AppError::Config(format!("ROSTER_API_TIMEOUT_MS={}: {}", ms, e)))?;
            config.timeout = Duration::from_millis(ms);
        }
        if let Some(days) = lookup("ROSTER_COOKIE_EXPIRES_DAYS") {
            config.cookie.expires_days = days
                .parse()
                .map_err(|e| AppError::Config(format!("ROSTER_COOKIE_EXPIRES_DAYS={}: {}", days, e)))?;
        }
        if let Some(secure) = lookup("ROSTER_COOKIE_SECURE") {
            config.cookie.secure = parse_bool(&secure);
        }
        if let Some(same_site) = lookup("ROSTER_COOKIE_SAME_SITE") {
            config.cookie.same_site = same_site.parse().map_err(AppError::Config)?;
        }
        if let Some(internal) = lookup("ROSTER_INTERNAL_FILTER") {
            config.internal_filter = parse_bool(&internal);
        }

        Ok(config)
    }

    pub fn dispatch_mode(&self) -> DispatchMode {
        if self.internal_filter {
            DispatchMode::Local
        } else {
            DispatchMode::Remote
        }
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

#[cfg(test)]
mod tests {
    use roster_lib::auth::SameSite;

    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert_eq!(config.cookie.expires_days, 7);
        assert_eq!(config.cookie.same_site, SameSite::Strict);
        assert_eq!(config.dispatch_mode(), DispatchMode::Remote);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(|key| match key {
            "ROSTER_COOKIE_EXPIRES_DAYS" => Some("1".to_string()),
            "ROSTER_COOKIE_SAME_SITE" => Some("Lax".to_string()),
            "ROSTER_INTERNAL_FILTER" => Some("true".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.cookie.expires_days, 1);
        assert_eq!(config.cookie.same_site, SameSite::Lax);
        assert_eq!(config.dispatch_mode(), DispatchMode::Local);
    }

    #[test]
    fn test_rejects_bad_same_site() {
        let result = AppConfig::from_lookup(|key| {
            (key == "ROSTER_COOKIE_SAME_SITE").then(|| "sometimes".to_string())
        });
        assert!(matches!(result, Err(AppError::Config(_))));
    }
}
