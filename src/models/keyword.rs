//! Keyword analysis records
//!
//! Field order mirrors the exported JSON layout, so reordering fields here
//! changes the export format.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Normalize a keyword into its identity key (trimmed, lower-cased)
pub fn normalize_keyword(keyword: &str) -> String {
    keyword.trim().to_lowercase()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Competition {
    Low,
    Medium,
    High,
}

impl Competition {
    /// Derive the competition bucket from a difficulty score
    pub fn from_difficulty(difficulty: u8) -> Self {
        if difficulty > 65 {
            Competition::High
        } else if difficulty > 40 {
            Competition::Medium
        } else {
            Competition::Low
        }
    }
}

impl fmt::Display for Competition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Competition::Low => "Low",
            Competition::Medium => "Medium",
            Competition::High => "High",
        };
        f.pad(label)
    }
}

/// One period of the interest-over-time series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMetrics {
    pub keyword: String,
    pub search_volume: u32,
    pub competition: Competition,
    pub difficulty: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpc: Option<f64>,
    pub region: String,
    pub trend: Vec<TrendPoint>,
}

/// A single search-engine result snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerpResult {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// 1-based position on the results page
    pub rank: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeywordAnalysis {
    pub seed_keyword: String,
    pub provider: String,
    pub metrics: KeywordMetrics,
    pub suggestions: Vec<String>,
    pub long_tail: Vec<String>,
    pub questions: Vec<String>,
    pub related_searches: Vec<String>,
    pub serp: Vec<SerpResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl KeywordAnalysis {
    /// Identity key used for cache lookups and store de-duplication
    pub fn key(&self) -> String {
        normalize_keyword(&self.metrics.keyword)
    }
}

/// Lightweight projection of an analysis kept in search history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHistoryEntry {
    pub keyword: String,
    /// Epoch milliseconds
    pub timestamp: i64,
    pub volume: u32,
    pub difficulty: u8,
}

impl SearchHistoryEntry {
    pub fn from_analysis(analysis: &KeywordAnalysis, timestamp: i64) -> Self {
        Self {
            keyword: analysis.metrics.keyword.clone(),
            timestamp,
            volume: analysis.metrics.search_volume,
            difficulty: analysis.metrics.difficulty,
        }
    }

    pub fn key(&self) -> String {
        normalize_keyword(&self.keyword)
    }
}
