use serde::{Deserialize, Serialize};

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// `Description: ...` / `Size: ...` lines
    #[default]
    Simple,
    /// A single JSON report object
    Json,
}

/// What the catalog says about an update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateDetails {
    /// Title of the first search result
    pub title: String,
    /// Description from the detail window, trimmed
    pub description: String,
    /// Download size label such as "24 MB", trimmed
    pub size: String,
}

impl UpdateDetails {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        size: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into().trim().to_string(),
            description: description.into().trim().to_string(),
            size: size.into().trim().to_string(),
        }
    }

    /// Both the description and the size were found
    pub fn is_complete(&self) -> bool {
        !self.description.is_empty() && !self.size.is_empty()
    }
}

/// Readiness of the search results page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResultsState {
    /// Neither the table nor the "no results" text is there yet
    Loading,
    /// The catalog says nothing matched
    NoResults,
    /// The results table is present with this many data rows
    Table { rows: usize },
}

#[cfg(test)]
#[path = "types_test.rs"]
mod types_test;
