pub mod keyword;

pub use keyword::{
    normalize_keyword, Competition, KeywordAnalysis, KeywordMetrics, SearchHistoryEntry,
    SerpResult, TrendPoint,
};
