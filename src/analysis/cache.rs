//! In-memory analysis cache
//!
//! Entries are keyed by normalized keyword and stamped with the injected
//! clock; an entry whose age reaches the TTL is a miss and is dropped on
//! read. Moka bounds the entry count and also expires entries on its own
//! timer as a backstop.

use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use crate::clock::Clock;
use crate::models::{normalize_keyword, KeywordAnalysis};

#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// Epoch millis at insertion
    pub timestamp: i64,
    pub data: Arc<KeywordAnalysis>,
}

pub struct AnalysisCache {
    entries: Cache<String, CacheEntry>,
    clock: Arc<dyn Clock>,
    ttl_ms: i64,
}

impl AnalysisCache {
    pub fn new(clock: Arc<dyn Clock>, ttl: Duration, max_entries: u64) -> Self {
        let entries = Cache::builder()
            .max_capacity(max_entries)
            .time_to_live(ttl)
            .build();

        Self {
            entries,
            clock,
            ttl_ms: ttl.as_millis() as i64,
        }
    }

    pub async fn get(&self, keyword: &str) -> Option<KeywordAnalysis> {
        let key = normalize_keyword(keyword);
        let entry = self.entries.get(&key).await?;

        if self.clock.now_millis() - entry.timestamp >= self.ttl_ms {
            debug!(keyword = %key, "Analysis cache entry expired");
            self.entries.invalidate(&key).await;
            return None;
        }

        debug!(keyword = %key, "Analysis cache hit");
        Some(entry.data.as_ref().clone())
    }

    pub async fn put(&self, keyword: &str, analysis: KeywordAnalysis) {
        let entry = CacheEntry {
            timestamp: self.clock.now_millis(),
            data: Arc::new(analysis),
        };
        self.entries.insert(normalize_keyword(keyword), entry).await;
    }

    pub async fn invalidate_all(&self) {
        self.entries.invalidate_all();
        self.entries.run_pending_tasks().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::KeywordGenerator;
    use crate::clock::ManualClock;

    const TTL: Duration = Duration::from_secs(300);

    fn setup() -> (Arc<ManualClock>, AnalysisCache) {
        let clock = ManualClock::new(0);
        let cache = AnalysisCache::new(clock.clone(), TTL, 100);
        (clock, cache)
    }

    #[tokio::test]
    async fn test_hit_uses_normalized_key() {
        let (_clock, cache) = setup();
        let analysis = KeywordGenerator::default().generate("SEO Tools").unwrap();
        cache.put("SEO Tools", analysis.clone()).await;

        assert_eq!(cache.get("  seo tools ").await, Some(analysis));
    }

    #[tokio::test]
    async fn test_expires_exactly_at_ttl() {
        let (clock, cache) = setup();
        let analysis = KeywordGenerator::default().generate("seo").unwrap();
        cache.put("seo", analysis).await;

        clock.advance(TTL.as_millis() as i64 - 1);
        assert!(cache.get("seo").await.is_some());

        clock.advance(1);
        assert!(cache.get("seo").await.is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites_expired_entry() {
        let (clock, cache) = setup();
        let generator = KeywordGenerator::default();
        cache.put("seo", generator.generate("seo").unwrap()).await;

        clock.advance(TTL.as_millis() as i64);
        let fresh = generator.generate("seo").unwrap();
        cache.put("seo", fresh.clone()).await;

        assert_eq!(cache.get("seo").await, Some(fresh));
    }

    #[tokio::test]
    async fn test_invalidate_all() {
        let (_clock, cache) = setup();
        cache
            .put("seo", KeywordGenerator::default().generate("seo").unwrap())
            .await;
        cache.invalidate_all().await;
        assert!(cache.get("seo").await.is_none());
    }
}
