//! Client responses tagged with where the data came from

use chrono::DateTime;
use chrono::Utc;

use crate::cache::CachedValue;

/// Data returned by [`RosterClient`](crate::RosterClient) and its origin.
#[derive(Debug, Clone)]
pub struct Response<T> {
    data: T,
    origin: Origin,
}

/// Where a response's data was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Fetched with caching off for this endpoint.
    Uncached,
    /// Fetched and stored until `expires_at`.
    Fetched { expires_at: DateTime<Utc> },
    /// Read from an entry stored at `stored_at`.
    Cached {
        stored_at: DateTime<Utc>,
        expires_at: DateTime<Utc>,
    },
}

impl<T> Response<T> {
    pub fn new(data: T) -> Self {
        Self {
            data,
            origin: Origin::Uncached,
        }
    }

    pub fn cache_miss(data: T, entry: &CachedValue) -> Self {
        Self {
            data,
            origin: Origin::Fetched {
                expires_at: entry.expires_at,
            },
        }
    }

    pub fn cache_hit(data: T, entry: &CachedValue) -> Self {
        Self {
            data,
            origin: Origin::Cached {
                stored_at: entry.created_at,
                expires_at: entry.expires_at,
            },
        }
    }

    pub fn origin(&self) -> Origin {
        self.origin
    }

    pub fn into_inner(self) -> T {
        self.data
    }
}
