//! Response cache
//!
//! Listing and column responses are cached as serialized JSON keyed by
//! endpoint and canonical query string. The cache is a collaborator of the
//! client: entries never outlive their TTL, and the client clears the
//! whole cache when the session ends.

mod config;
mod memory;

pub use config::*;
pub use memory::*;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

/// A cached response body with its lifetime.
#[derive(Debug, Clone)]
pub struct CachedValue {
    /// Serialized response (JSON bytes).
    pub data: Vec<u8>,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl CachedValue {
    /// Creates a value cached now that lives for `ttl`.
    pub fn with_ttl(data: Vec<u8>, ttl: std::time::Duration) -> Self {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::from_std(ttl).unwrap_or(chrono::Duration::zero());
        Self {
            data,
            created_at: now,
            expires_at,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }
}

/// Storage for cached responses.
///
/// `get` must never return an expired value.
#[async_trait]
pub trait CacheProvider: Send + Sync {
    async fn get(&self, key: &str) -> Option<CachedValue>;

    async fn set(&self, key: &str, value: CachedValue);

    async fn remove(&self, key: &str);

    async fn clear(&self);

    /// Drops expired entries, returning how many were removed.
    async fn gc(&self) -> usize;
}
