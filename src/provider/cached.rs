use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::KeywordResult;
use crate::models::{normalize_keyword, KeywordAnalysis, TrendPoint};
use crate::provider::{KeywordProvider, ProviderKind};
use crate::storage::ResponseCache;

/// Provider wrapper that serves repeat requests from the persisted response cache
pub struct CachedProvider {
    /// Underlying provider implementation
    inner: Arc<dyn KeywordProvider>,
    cache: Arc<ResponseCache>,
}

impl CachedProvider {
    pub fn new(inner: Arc<dyn KeywordProvider>, cache: Arc<ResponseCache>) -> Self {
        Self { inner, cache }
    }

    fn cache_key(&self, namespace: &str, keyword: &str) -> String {
        format!("{}:{namespace}:{}", self.inner.kind(), normalize_keyword(keyword))
    }

    async fn lookup<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let hit = self.cache.get::<T>(key).await;
        if hit.is_some() {
            debug!(key, "Response cache hit");
        }
        hit
    }

    /// A failed cache write is logged; the fresh value is still returned
    async fn store<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.cache.set(key, value).await {
            warn!(key, error = %e, "Failed to write response cache");
        }
    }
}

#[async_trait]
impl KeywordProvider for CachedProvider {
    fn kind(&self) -> ProviderKind {
        self.inner.kind()
    }

    async fn search_keyword(&self, keyword: &str) -> KeywordResult<KeywordAnalysis> {
        let key = self.cache_key("keyword", keyword);
        if let Some(cached) = self.lookup::<KeywordAnalysis>(&key).await {
            return Ok(cached);
        }

        let analysis = self.inner.search_keyword(keyword).await?;
        self.store(&key, &analysis).await;
        Ok(analysis)
    }

    async fn get_trends(&self, keyword: &str) -> KeywordResult<Vec<TrendPoint>> {
        let key = self.cache_key("trends", keyword);
        if let Some(cached) = self.lookup::<Vec<TrendPoint>>(&key).await {
            return Ok(cached);
        }

        let trend = self.inner.get_trends(keyword).await?;
        self.store(&key, &trend).await;
        Ok(trend)
    }

    async fn get_suggestions(&self, keyword: &str) -> KeywordResult<Vec<String>> {
        let key = self.cache_key("suggestions", keyword);
        if let Some(cached) = self.lookup::<Vec<String>>(&key).await {
            return Ok(cached);
        }

        let ideas = self.inner.get_suggestions(keyword).await?;
        self.store(&key, &ideas).await;
        Ok(ideas)
    }

    async fn generate_ai_keywords(&self, seed: &str, count: usize) -> KeywordResult<Vec<String>> {
        let key = self.cache_key(&format!("ideas-{count}"), seed);
        if let Some(cached) = self.lookup::<Vec<String>>(&key).await {
            return Ok(cached);
        }

        let ideas = self.inner.generate_ai_keywords(seed, count).await?;
        self.store(&key, &ideas).await;
        Ok(ideas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::KeywordGenerator;
    use crate::clock::ManualClock;
    use crate::error::KeywordError;
    use crate::provider::MockProvider;
    use crate::storage::{KvStore, MemoryStore};
    use std::time::Duration;

    const HOUR: Duration = Duration::from_secs(3600);

    fn setup() -> (Arc<MemoryStore>, Arc<ManualClock>, CachedProvider) {
        let store = Arc::new(MemoryStore::new());
        let clock = ManualClock::new(0);
        let cache = Arc::new(ResponseCache::new(store.clone(), clock.clone(), HOUR));
        let inner = Arc::new(MockProvider::new(Arc::new(KeywordGenerator::default())));
        (store, clock, CachedProvider::new(inner, cache))
    }

    #[tokio::test]
    async fn test_repeat_search_served_from_store() {
        let (store, _clock, provider) = setup();

        let first = provider.search_keyword("SEO Tools").await.unwrap();
        let second = provider.search_keyword("seo tools").await.unwrap();
        assert_eq!(first, second);

        let keys = store.list_keys().await.unwrap();
        assert_eq!(keys, vec!["cache:mock:keyword:seo tools".to_string()]);
    }

    #[tokio::test]
    async fn test_expired_response_is_regenerated() {
        let (store, clock, provider) = setup();
        provider.get_trends("seo").await.unwrap();
        let before = store.get("cache:mock:trends:seo").await.unwrap();

        clock.advance(HOUR.as_millis() as i64);
        provider.get_trends("seo").await.unwrap();
        let after = store.get("cache:mock:trends:seo").await.unwrap();

        // The entry was rewritten with a new timestamp
        assert_ne!(before, after);
    }

    #[tokio::test]
    async fn test_keyword_ideas_cached_per_count() {
        let (store, _clock, provider) = setup();
        let three = provider.generate_ai_keywords("Seo", 3).await.unwrap();
        let five = provider.generate_ai_keywords("seo", 5).await.unwrap();
        assert_eq!(three.len(), 3);
        assert_eq!(five.len(), 5);

        let keys = store.list_keys().await.unwrap();
        assert_eq!(
            keys,
            vec![
                "cache:mock:ideas-3:seo".to_string(),
                "cache:mock:ideas-5:seo".to_string()
            ]
        );
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let (store, _clock, provider) = setup();
        let result = provider.get_suggestions("  ").await;
        assert!(matches!(result, Err(KeywordError::Validation(_))));
        assert!(store.list_keys().await.unwrap().is_empty());
    }
}
