//! JSON and CSV renderings of a keyword analysis

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{KeywordError, KeywordResult};
use crate::models::{Competition, KeywordAnalysis, SearchHistoryEntry};

pub const CSV_HEADER: &str = "keyword,searchVolume,competition,difficulty,cpc,suggestions";
pub const HISTORY_CSV_HEADER: &str = "keyword,searchVolume,competition,difficulty,date";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Json,
    Csv,
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportFormat::Json => f.write_str("json"),
            ExportFormat::Csv => f.write_str("csv"),
        }
    }
}

impl FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "json" => Ok(ExportFormat::Json),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(format!("unknown export format '{other}'. Supported values: json, csv")),
        }
    }
}

/// Render the analysis, failing with a state error when there is nothing to export
pub fn render(analysis: Option<&KeywordAnalysis>, format: ExportFormat) -> KeywordResult<String> {
    let analysis = analysis
        .ok_or_else(|| KeywordError::State("Run a keyword analysis first.".to_string()))?;

    match format {
        ExportFormat::Json => serde_json::to_string_pretty(analysis)
            .map_err(|e| KeywordError::State(format!("failed to serialize analysis: {e}"))),
        ExportFormat::Csv => Ok(to_csv(analysis)),
    }
}

/// Render the search history as CSV, one row per entry in stored order
pub fn render_history(entries: &[SearchHistoryEntry]) -> KeywordResult<String> {
    if entries.is_empty() {
        return Err(KeywordError::State("No data to export".to_string()));
    }

    let mut lines = Vec::with_capacity(entries.len() + 1);
    lines.push(HISTORY_CSV_HEADER.to_string());
    for entry in entries {
        let date = chrono::DateTime::from_timestamp_millis(entry.timestamp)
            .map(|t| t.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        lines.push(
            [
                csv_field(&entry.keyword),
                entry.volume.to_string(),
                Competition::from_difficulty(entry.difficulty).to_string(),
                entry.difficulty.to_string(),
                date,
            ]
            .join(","),
        );
    }

    Ok(lines.join("\n"))
}

/// Control characters become spaces so a record always stays on one line
fn single_line(value: &str) -> String {
    value
        .chars()
        .map(|c| if c.is_control() { ' ' } else { c })
        .collect()
}

fn csv_field(value: &str) -> String {
    let value = single_line(value);
    if value.contains([',', '"']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value
    }
}

fn to_csv(analysis: &KeywordAnalysis) -> String {
    let metrics = &analysis.metrics;
    let suggestions = single_line(&analysis.suggestions.join("; ")).replace('"', "\"\"");

    let row = [
        csv_field(&metrics.keyword),
        metrics.search_volume.to_string(),
        metrics.competition.to_string(),
        metrics.difficulty.to_string(),
        metrics.cpc.unwrap_or(0.0).to_string(),
        format!("\"{suggestions}\""),
    ]
    .join(",");

    format!("{CSV_HEADER}\n{row}")
}
