use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// Dashboard configuration
// ---------------------------------------------------------------------------

pub const DEFAULT_COUNTRIES: [&str; 4] = ["Germany", "Austria", "Belgium", "Switzerland"];
pub const DEFAULT_TOPICS: [&str; 6] = [
    "smart #1", "smart #2", "smart #3", "smart #4", "smart #5", "smart #6",
];
pub const DEFAULT_ALL_LABEL: &str = "All";

/// Allow-sets applied at load time and the label meaning "every country".
///
/// Read from a JSON file such as:
///
/// ```json
/// { "countries": ["Germany", "Austria"], "topics": ["smart #1"] }
/// ```
///
/// Any field left out keeps its default.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub countries: Vec<String>,
    pub topics: Vec<String>,
    pub all_label: String,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            countries: DEFAULT_COUNTRIES.iter().map(|s| s.to_string()).collect(),
            topics: DEFAULT_TOPICS.iter().map(|s| s.to_string()).collect(),
            all_label: DEFAULT_ALL_LABEL.to_string(),
        }
    }
}

impl DashboardConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    /// Whether a row with this country and topic belongs in the dataset.
    pub fn allows(&self, country: &str, topic: &str) -> bool {
        self.countries.iter().any(|c| c == country) && self.topics.iter().any(|t| t == topic)
    }
}
