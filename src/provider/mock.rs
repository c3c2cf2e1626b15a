use async_trait::async_trait;
use std::sync::Arc;

use crate::analysis::KeywordGenerator;
use crate::error::KeywordResult;
use crate::models::{KeywordAnalysis, TrendPoint};
use crate::provider::{KeywordProvider, ProviderKind};

/// Provider backed by the local synthetic generator
pub struct MockProvider {
    generator: Arc<KeywordGenerator>,
}

impl MockProvider {
    pub fn new(generator: Arc<KeywordGenerator>) -> Self {
        Self { generator }
    }
}

#[async_trait]
impl KeywordProvider for MockProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Mock
    }

    async fn search_keyword(&self, keyword: &str) -> KeywordResult<KeywordAnalysis> {
        self.generator.generate(keyword)
    }

    async fn get_trends(&self, keyword: &str) -> KeywordResult<Vec<TrendPoint>> {
        self.generator.trend(keyword)
    }

    async fn get_suggestions(&self, keyword: &str) -> KeywordResult<Vec<String>> {
        let set = self.generator.suggestions(keyword)?;
        let mut ideas = set.suggestions;
        for item in set.long_tail {
            if !ideas.contains(&item) {
                ideas.push(item);
            }
        }
        Ok(ideas)
    }

    async fn generate_ai_keywords(&self, seed: &str, count: usize) -> KeywordResult<Vec<String>> {
        self.generator.keyword_ideas(seed, count)
    }
}
