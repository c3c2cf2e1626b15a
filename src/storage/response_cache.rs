//! Persisted cache for provider responses
//!
//! Entries live in the key-value store under the `cache:` namespace as
//! `{ "data": ..., "timestamp": <epoch millis> }` and are valid for the
//! configured TTL (one hour by default).

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use crate::clock::Clock;
use crate::storage::{read_json, write_json, KvStore, StorageResult};

pub const CACHE_PREFIX: &str = "cache:";

#[derive(Serialize, Deserialize)]
struct Envelope<T> {
    data: T,
    timestamp: i64,
}

pub struct ResponseCache {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
}

impl ResponseCache {
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>, ttl: Duration) -> Self {
        Self {
            store,
            clock,
            ttl_ms: ttl.as_millis() as i64,
        }
    }

    fn namespaced(key: &str) -> String {
        format!("{CACHE_PREFIX}{key}")
    }

    /// Fetch a fresh cached value. Expired, corrupt, or unreadable entries are misses.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let key = Self::namespaced(key);
        let envelope = match read_json::<Envelope<T>>(self.store.as_ref(), &key).await {
            Ok(envelope) => envelope?,
            Err(e) => {
                warn!(key, error = %e, "Response cache read failed");
                return None;
            }
        };

        if self.clock.now_millis() - envelope.timestamp >= self.ttl_ms {
            debug!(key, "Response cache entry expired");
            return None;
        }

        Some(envelope.data)
    }

    pub async fn set<T: Serialize>(&self, key: &str, data: &T) -> StorageResult<()> {
        let envelope = Envelope {
            data,
            timestamp: self.clock.now_millis(),
        };
        write_json(self.store.as_ref(), &Self::namespaced(key), &envelope).await
    }

    /// Remove every cache-namespaced key, returning how many were swept
    pub async fn clear(&self) -> StorageResult<usize> {
        let keys = self.store.list_keys().await?;
        let mut removed = 0;
        for key in keys.iter().filter(|k| k.starts_with(CACHE_PREFIX)) {
            if self.store.remove(key).await? {
                removed += 1;
            }
        }
        debug!(removed, "Swept response cache");
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::storage::MemoryStore;

    const HOUR: Duration = Duration::from_secs(3600);

    fn setup() -> (Arc<MemoryStore>, Arc<ManualClock>, ResponseCache) {
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(1_000_000);
        let cache = ResponseCache::new(store.clone(), clock.clone(), HOUR);
        (store, clock, cache)
    }

    #[tokio::test]
    async fn test_fresh_entry_is_served() {
        let (_store, clock, cache) = setup();
        cache.set("keyword:seo", &vec!["a", "b"]).await.unwrap();

        clock.advance(HOUR.as_millis() as i64 - 1);
        let hit: Option<Vec<String>> = cache.get("keyword:seo").await;
        assert_eq!(hit, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[tokio::test]
    async fn test_entry_expires_at_ttl() {
        let (_store, clock, cache) = setup();
        cache.set("keyword:seo", &1u32).await.unwrap();

        clock.advance(HOUR.as_millis() as i64);
        assert_eq!(cache.get::<u32>("keyword:seo").await, None);
    }

    #[tokio::test]
    async fn test_entry_layout_in_store() {
        let (store, _clock, cache) = setup();
        cache.set("k", &"v").await.unwrap();

        let raw = store.get("cache:k").await.unwrap().unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["data"], "v");
        assert_eq!(value["timestamp"], 1_000_000);
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_removed() {
        let (store, _clock, cache) = setup();
        store.set("cache:broken", "{not json").await.unwrap();

        assert_eq!(cache.get::<u32>("broken").await, None);
        assert_eq!(store.get("cache:broken").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_clear_sweeps_only_cache_namespace() {
        let (store, _clock, cache) = setup();
        cache.set("one", &1u32).await.unwrap();
        cache.set("two", &2u32).await.unwrap();
        store.set("keyword_history", "[]").await.unwrap();

        assert_eq!(cache.clear().await.unwrap(), 2);
        assert_eq!(store.list_keys().await.unwrap(), vec!["keyword_history".to_string()]);
    }
}
