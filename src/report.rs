use serde::{Deserialize, Serialize};

use crate::errors::LookupError;
use crate::types::{OutputFormat, UpdateDetails};

/// Line printed when the lookup produced nothing usable
pub const FALLBACK_MESSAGE: &str = "No description or size found or failed to retrieve data.";

/// Outcome of one lookup, as printed by the CLI
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupReport {
    pub kb_number: String,
    pub search_url: String,
    /// found, incomplete, not_found, timeout, scrape_error or session_error
    pub status: String,
    pub title: String,
    pub description: String,
    pub size: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl LookupReport {
    pub fn new(
        kb_number: &str,
        search_url: &url::Url,
        outcome: &Result<UpdateDetails, LookupError>,
    ) -> Self {
        let (status, details, message) = match outcome {
            Ok(details) if details.is_complete() => ("found", details.clone(), None),
            Ok(details) => ("incomplete", details.clone(), None),
            Err(e) => (e.status(), UpdateDetails::default(), Some(e.to_string())),
        };

        Self {
            kb_number: kb_number.to_string(),
            search_url: search_url.to_string(),
            status: status.to_string(),
            title: details.title,
            description: details.description,
            size: details.size,
            message,
        }
    }

    pub fn is_found(&self) -> bool {
        self.status == "found"
    }

    /// Text written to stdout for this report
    pub fn render(&self, format: OutputFormat) -> String {
        match format {
            OutputFormat::Simple => {
                if self.is_found() {
                    format!("Description: {}\nSize: {}", self.description, self.size)
                } else {
                    FALLBACK_MESSAGE.to_string()
                }
            }
            OutputFormat::Json => serde_json::to_string_pretty(self)
                .unwrap_or_else(|_| "{}".to_string()),
        }
    }
}

#[cfg(test)]
#[path = "report_test.rs"]
mod report_test;
