// Language statistics models

use serde::{Deserialize, Serialize};

/// Per-language aggregate
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LanguageEntry {
    pub language: String,
    pub files: u64,
    pub lines: u64,
    /// Share of `total_lines`, 0..=100
    pub percentage: f64,
}

/// Snapshot of a project's source composition
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LanguageStats {
    pub total_lines: u64,
    /// Sorted by lines descending, then language name
    pub languages: Vec<LanguageEntry>,
    pub scanned_at: String,
}

impl LanguageStats {
    pub fn empty() -> Self {
        Self {
            total_lines: 0,
            languages: Vec::new(),
            scanned_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
