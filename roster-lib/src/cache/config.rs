//! Cache configuration

use std::time::Duration;

/// How long responses stay cached.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use roster_lib::cache::CacheConfig;
///
/// let config = CacheConfig::default().with_query_ttl(Duration::from_secs(30));
/// assert_eq!(config.metadata_ttl, Duration::from_secs(3600));
/// ```
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for column metadata. Default: 1 hour.
    pub metadata_ttl: Duration,
    /// TTL for listing results. Default: 5 minutes.
    pub query_ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            metadata_ttl: Duration::from_secs(3600),
            query_ttl: Duration::from_secs(300),
        }
    }
}

impl CacheConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata_ttl(mut self, ttl: Duration) -> Self {
        self.metadata_ttl = ttl;
        self
    }

    pub fn with_query_ttl(mut self, ttl: Duration) -> Self {
        self.query_ttl = ttl;
        self
    }

    /// Disables caching; every request goes to the service.
    pub fn no_cache() -> Self {
        Self {
            metadata_ttl: Duration::ZERO,
            query_ttl: Duration::ZERO,
        }
    }
}
