//! Keyword data providers
//!
//! Every data source answers the same capability trait. Only the mock
//! generator is implemented; the real SEO APIs are listed in the registry
//! and fail fast with [`KeywordError::NotImplemented`] when built.

pub mod cached;
pub mod mock;
pub mod registry;

pub use cached::CachedProvider;
pub use mock::MockProvider;
pub use registry::{ProviderInfo, ProviderRegistry};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::analysis::KeywordGenerator;
use crate::error::{KeywordError, KeywordResult};
use crate::models::{KeywordAnalysis, TrendPoint};
use crate::storage::ResponseCache;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ProviderKind {
    Mock,
    GoogleTrends,
    KeywordPlanner,
    Semrush,
    Ahrefs,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 5] = [
        ProviderKind::Mock,
        ProviderKind::GoogleTrends,
        ProviderKind::KeywordPlanner,
        ProviderKind::Semrush,
        ProviderKind::Ahrefs,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Mock => "mock",
            ProviderKind::GoogleTrends => "google-trends",
            ProviderKind::KeywordPlanner => "keyword-planner",
            ProviderKind::Semrush => "semrush",
            ProviderKind::Ahrefs => "ahrefs",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "mock" => Ok(ProviderKind::Mock),
            "google-trends" | "googletrends" => Ok(ProviderKind::GoogleTrends),
            "keyword-planner" | "keywordplanner" => Ok(ProviderKind::KeywordPlanner),
            "semrush" => Ok(ProviderKind::Semrush),
            "ahrefs" => Ok(ProviderKind::Ahrefs),
            other => Err(format!(
                "unknown provider '{other}'. Supported values: mock, google-trends, keyword-planner, semrush, ahrefs"
            )),
        }
    }
}

/// Capability interface shared by every keyword data source
#[async_trait]
pub trait KeywordProvider: Send + Sync {
    fn kind(&self) -> ProviderKind;

    /// Full analysis for a seed keyword
    async fn search_keyword(&self, keyword: &str) -> KeywordResult<KeywordAnalysis>;

    /// Interest-over-time series for a keyword
    async fn get_trends(&self, keyword: &str) -> KeywordResult<Vec<TrendPoint>>;

    /// Related keyword ideas
    async fn get_suggestions(&self, keyword: &str) -> KeywordResult<Vec<String>>;

    /// Generated keyword ideas for a seed, at most `count`
    async fn generate_ai_keywords(&self, seed: &str, count: usize) -> KeywordResult<Vec<String>>;
}

/// Build the provider for `kind`, wrapped in the persisted response cache when given.
pub fn build_provider(
    kind: ProviderKind,
    registry: &ProviderRegistry,
    generator: Arc<KeywordGenerator>,
    response_cache: Option<Arc<ResponseCache>>,
) -> KeywordResult<Arc<dyn KeywordProvider>> {
    if !registry.is_enabled(kind) {
        return Err(KeywordError::ProviderUnavailable(kind));
    }

    let provider: Arc<dyn KeywordProvider> = match kind {
        ProviderKind::Mock => Arc::new(MockProvider::new(generator)),
        ProviderKind::GoogleTrends
        | ProviderKind::KeywordPlanner
        | ProviderKind::Semrush
        | ProviderKind::Ahrefs => return Err(KeywordError::NotImplemented(kind)),
    };

    Ok(match response_cache {
        Some(cache) => Arc::new(CachedProvider::new(provider, cache)),
        None => provider,
    })
}
