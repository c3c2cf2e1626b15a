pub mod cache;
pub mod generator;

pub use cache::{AnalysisCache, CacheEntry};
pub use generator::{
    GeneratorConfig, KeywordGenerator, SuggestionSet, MAX_KEYWORD_IDEAS, SERP_SIZE, TREND_PERIODS,
};
