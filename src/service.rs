//! Keyword research service
//!
//! Owns every core component for one session and exposes the operations the
//! HTTP API and CLI call. Construct one per process; call [`KeywordService::shutdown`]
//! before exit so queued analysis requests finish.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::analysis::{AnalysisCache, GeneratorConfig, KeywordGenerator};
use crate::clock::Clock;
use crate::config::{CacheConfig, Config, GovernorConfig, ProviderConfig, StoreConfig};
use crate::error::{KeywordError, KeywordResult};
use crate::export::{self, ExportFormat};
use crate::governor::RequestGovernor;
use crate::models::{KeywordAnalysis, SearchHistoryEntry, TrendPoint};
use crate::provider::{build_provider, KeywordProvider, ProviderInfo, ProviderKind};
use crate::storage::{KvStore, ResponseCache};
use crate::stores::{FavoritesStore, HistoryStore, PreferenceStore, QuotaStore};

/// Tunables for a [`KeywordService`]
#[derive(Debug, Clone, Default)]
pub struct ServiceSettings {
    pub governor: GovernorConfig,
    pub cache: CacheConfig,
    pub stores: StoreConfig,
    pub generator: GeneratorConfig,
    pub provider: ProviderConfig,
}

impl From<&Config> for ServiceSettings {
    fn from(config: &Config) -> Self {
        Self {
            governor: config.governor,
            cache: config.cache,
            stores: config.stores,
            generator: config.generator.clone(),
            provider: config.provider.clone(),
        }
    }
}

/// Trim the seed and reject it before any provider or governor work
fn require_keyword(seed: &str) -> KeywordResult<String> {
    let keyword = seed.trim();
    if keyword.is_empty() {
        return Err(KeywordError::empty_keyword());
    }
    Ok(keyword.to_string())
}

async fn cached_or_fetch(
    cache: Arc<AnalysisCache>,
    provider: Arc<dyn KeywordProvider>,
    keyword: String,
) -> KeywordResult<KeywordAnalysis> {
    if let Some(hit) = cache.get(&keyword).await {
        return Ok(hit);
    }

    let fresh = provider.search_keyword(&keyword).await?;
    cache.put(&keyword, fresh.clone()).await;
    Ok(fresh)
}

pub struct KeywordService {
    store: Arc<dyn KvStore>,
    clock: Arc<dyn Clock>,
    governor: RequestGovernor,
    analysis_cache: Arc<AnalysisCache>,
    response_cache: Arc<ResponseCache>,
    response_cache_enabled: bool,
    generator: Arc<KeywordGenerator>,
    provider_config: ProviderConfig,
    history: HistoryStore,
    favorites: FavoritesStore,
    quota: QuotaStore,
    enforce_quota: bool,
    preferences: PreferenceStore,
    current: RwLock<Option<KeywordAnalysis>>,
}

impl KeywordService {
    /// Requires a running tokio runtime (the request governor spawns its worker).
    pub fn new(store: Arc<dyn KvStore>, clock: Arc<dyn Clock>, settings: ServiceSettings) -> Self {
        let ServiceSettings {
            governor,
            cache,
            stores,
            generator,
            provider,
        } = settings;

        Self {
            governor: RequestGovernor::new(governor),
            analysis_cache: Arc::new(AnalysisCache::new(
                Arc::clone(&clock),
                cache.analysis_ttl,
                cache.analysis_max_entries,
            )),
            response_cache: Arc::new(ResponseCache::new(
                Arc::clone(&store),
                Arc::clone(&clock),
                cache.response_ttl,
            )),
            response_cache_enabled: cache.response_cache_enabled,
            generator: Arc::new(KeywordGenerator::new(generator)),
            history: HistoryStore::new(Arc::clone(&store), stores.history_limit),
            favorites: FavoritesStore::new(Arc::clone(&store), stores.favorites_limit),
            quota: QuotaStore::new(Arc::clone(&store), stores.default_quota),
            enforce_quota: stores.enforce_quota,
            preferences: PreferenceStore::new(Arc::clone(&store), provider.default_provider),
            provider_config: provider,
            current: RwLock::new(None),
            store,
            clock,
        }
    }

    async fn active_provider(&self) -> KeywordResult<Arc<dyn KeywordProvider>> {
        let kind = self.preferences.selected_provider().await;
        let response_cache = self
            .response_cache_enabled
            .then(|| Arc::clone(&self.response_cache));
        build_provider(
            kind,
            &self.provider_config.registry,
            Arc::clone(&self.generator),
            response_cache,
        )
    }

    /// Analyze a seed keyword: validate, spend quota, wait for the governor,
    /// then serve from cache or the selected provider. The result is recorded
    /// in history and becomes the current result.
    pub async fn search_keyword(&self, seed: &str) -> KeywordResult<KeywordAnalysis> {
        let keyword = require_keyword(seed)?;
        let provider = self.active_provider().await?;

        if self.enforce_quota {
            let remaining = self.quota.consume().await?;
            debug!(remaining, "Spent one search from quota");
        }

        let analysis = self
            .governor
            .admit(cached_or_fetch(
                Arc::clone(&self.analysis_cache),
                provider,
                keyword,
            ))
            .await??;

        *self.current.write().await = Some(analysis.clone());

        let entry = SearchHistoryEntry::from_analysis(&analysis, self.clock.now_millis());
        self.history.record(entry).await?;

        info!(
            keyword = %analysis.metrics.keyword,
            volume = analysis.metrics.search_volume,
            difficulty = analysis.metrics.difficulty,
            "Keyword analyzed"
        );
        Ok(analysis)
    }

    /// Trend series from the selected provider, paced by the governor
    pub async fn trends(&self, keyword: &str) -> KeywordResult<Vec<TrendPoint>> {
        let keyword = require_keyword(keyword)?;
        let provider = self.active_provider().await?;
        self.governor
            .admit(async move { provider.get_trends(&keyword).await })
            .await?
    }

    /// Keyword ideas from the selected provider, paced by the governor
    pub async fn suggestions(&self, keyword: &str) -> KeywordResult<Vec<String>> {
        let keyword = require_keyword(keyword)?;
        let provider = self.active_provider().await?;
        self.governor
            .admit(async move { provider.get_suggestions(&keyword).await })
            .await?
    }

    /// Generated keyword ideas for a seed, at most `count`, paced by the governor
    pub async fn ai_keywords(&self, seed: &str, count: usize) -> KeywordResult<Vec<String>> {
        let seed = require_keyword(seed)?;
        let provider = self.active_provider().await?;
        self.governor
            .admit(async move { provider.generate_ai_keywords(&seed, count).await })
            .await?
    }

    pub async fn current(&self) -> Option<KeywordAnalysis> {
        self.current.read().await.clone()
    }

    /// Make a stored analysis (e.g. a favorite) the current result
    pub async fn select_result(&self, analysis: KeywordAnalysis) {
        *self.current.write().await = Some(analysis);
    }

    pub async fn export(&self, format: ExportFormat) -> KeywordResult<String> {
        let current = self.current.read().await;
        export::render(current.as_ref(), format)
    }

    pub async fn history(&self) -> Vec<SearchHistoryEntry> {
        self.history.load().await
    }

    /// One CSV row per past search; fails when there is no history
    pub async fn export_history(&self) -> KeywordResult<String> {
        let history = self.history.load().await;
        export::render_history(&history)
    }

    pub async fn clear_history(&self) -> KeywordResult<()> {
        self.history.clear().await?;
        Ok(())
    }

    pub async fn favorites(&self) -> Vec<KeywordAnalysis> {
        self.favorites.load().await
    }

    pub async fn is_favorite(&self, keyword: &str) -> bool {
        self.favorites.contains(keyword).await
    }

    pub async fn toggle_favorite(
        &self,
        analysis: KeywordAnalysis,
    ) -> KeywordResult<Vec<KeywordAnalysis>> {
        Ok(self.favorites.toggle(analysis).await?)
    }

    pub async fn quota(&self) -> u32 {
        self.quota.remaining().await
    }

    /// Rewarded unlock: restore the full search quota
    pub async fn replenish_quota(&self) -> KeywordResult<u32> {
        let remaining = self.quota.replenish().await?;
        info!(remaining, "Search quota replenished");
        Ok(remaining)
    }

    pub fn providers(&self) -> Vec<ProviderInfo> {
        self.provider_config.registry.list().to_vec()
    }

    pub async fn selected_provider(&self) -> ProviderKind {
        self.preferences.selected_provider().await
    }

    pub async fn select_provider(&self, kind: ProviderKind) -> KeywordResult<()> {
        self.preferences
            .select_provider(kind, &self.provider_config.registry)
            .await?;
        info!(provider = %kind, "Provider selected");
        Ok(())
    }

    /// Drop the in-memory analysis cache and sweep the persisted response cache
    pub async fn clear_cache(&self) -> KeywordResult<usize> {
        self.analysis_cache.invalidate_all().await;
        let removed = self.response_cache.clear().await?;
        info!(removed, "Caches cleared");
        Ok(removed)
    }

    /// Forget history, favorites, and the current result; restore the quota
    pub async fn reset_data(&self) -> KeywordResult<()> {
        *self.current.write().await = None;
        self.history.clear().await?;
        self.favorites.clear().await?;
        self.quota.replenish().await?;
        info!("User data reset");
        Ok(())
    }

    /// Wipe every persisted key and the in-memory state
    pub async fn clear_all(&self) -> KeywordResult<()> {
        *self.current.write().await = None;
        self.analysis_cache.invalidate_all().await;
        self.store.clear().await?;
        info!("All stored data cleared");
        Ok(())
    }

    pub async fn shutdown(&self) {
        self.governor.shutdown().await;
    }
}
