//! DashMap-backed cache

use async_trait::async_trait;
use dashmap::DashMap;

use super::CacheProvider;
use super::CachedValue;

/// Process-local response cache.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    store: DashMap<String, CachedValue>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, expired ones included.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl CacheProvider for InMemoryCache {
    async fn get(&self, key: &str) -> Option<CachedValue> {
        let entry = self.store.get(key)?;
        if entry.is_expired() {
            drop(entry);
            self.store.remove(key);
            return None;
        }
        Some(entry.value().clone())
    }

    async fn set(&self, key: &str, value: CachedValue) {
        self.store.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.store.remove(key);
    }

    async fn clear(&self) {
        self.store.clear();
    }

    async fn gc(&self) -> usize {
        let before = self.store.len();
        self.store.retain(|_, value| !value.is_expired());
        before.saturating_sub(self.store.len())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_expired_entries_are_never_returned() {
        let cache = InMemoryCache::new();
        cache
            .set("live", CachedValue::with_ttl(b"a".to_vec(), Duration::from_secs(60)))
            .await;
        cache
            .set("dead", CachedValue::with_ttl(b"b".to_vec(), Duration::ZERO))
            .await;

        assert_eq!(cache.get("live").await.map(|v| v.data), Some(b"a".to_vec()));
        assert!(cache.get("dead").await.is_none());
        assert_eq!(cache.len(), 1);
    }

    #[tokio::test]
    async fn test_gc_and_clear() {
        let cache = InMemoryCache::new();
        cache
            .set("x", CachedValue::with_ttl(Vec::new(), Duration::ZERO))
            .await;
        cache
            .set("y", CachedValue::with_ttl(Vec::new(), Duration::from_secs(60)))
            .await;
        assert_eq!(cache.gc().await, 1);
        cache.clear().await;
        assert!(cache.is_empty());
    }
}
