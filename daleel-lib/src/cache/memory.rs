//! In-memory cache implementation using DashMap

use async_trait::async_trait;
use dashmap::DashMap;

use super::CacheProvider;
use super::CachedValue;

/// An in-memory cache backed by a concurrent hash map.
///
/// The only cache implementation; the platform keeps no local state beyond
/// the in-memory cache and whatever the frontend encodes in its URL.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    store: DashMap<String, CachedValue>,
}

impl InMemoryCache {
    /// Creates a new empty in-memory cache.
    pub fn new() -> Self {
        Self {
            store: DashMap::new(),
        }
    }

    /// Returns the number of entries in the cache (including expired ones).
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns `true` if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }
}

#[async_trait]
impl CacheProvider for InMemoryCache {
    async fn get(&self, key: &str) -> Option<CachedValue> {
        let entry = self.store.get(key)?;
        let value = entry.value();

        if value.is_expired() {
            drop(entry);
            self.store.remove(key);
            None
        } else {
            Some(value.clone())
        }
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
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = InMemoryCache::new();
        let value = CachedValue::with_ttl(b"sections".to_vec(), Duration::from_secs(60));

        cache.set("handbook:sections", value).await;

        let got = cache.get("handbook:sections").await.expect("cached");
        assert_eq!(got.data, b"sections");
    }

    #[tokio::test]
    async fn test_expired_value_is_not_returned() {
        let cache = InMemoryCache::new();
        let value = CachedValue::with_ttl(b"stale".to_vec(), Duration::ZERO);

        cache.set("handbook:sections", value).await;

        assert!(cache.get("handbook:sections").await.is_none());
        // the expired entry is evicted on access
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let cache = InMemoryCache::new();
        let value = CachedValue::with_ttl(b"a".to_vec(), Duration::from_secs(60));
        cache.set("k1", value.clone()).await;
        cache.set("k2", value).await;

        cache.remove("k1").await;
        assert!(cache.get("k1").await.is_none());
        assert!(cache.get("k2").await.is_some());

        cache.clear().await;
        assert!(cache.is_empty());
    }
}
