use std::time::Duration;

use url::Url;

use crate::webdriver::BrowserType;

/// Default catalog the search runs against
pub const DEFAULT_CATALOG_URL: &str = "https://www.catalog.update.microsoft.com/";

/// Everything a lookup needs to know besides the KB number
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// Catalog root; `Search.aspx` is resolved against its path
    pub base_url: Url,
    /// Element ids and column positions on the catalog pages
    pub selectors: CatalogSelectors,
    /// How long and how often to poll for page readiness
    pub wait: WaitPolicy,
    /// Which browser to drive and how
    pub browser: BrowserConfig,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            base_url: default_catalog_url(),
            selectors: CatalogSelectors::default(),
            wait: WaitPolicy::default(),
            browser: BrowserConfig::default(),
        }
    }
}

fn default_catalog_url() -> Url {
    match Url::parse(DEFAULT_CATALOG_URL) {
        Ok(url) => url,
        Err(e) => unreachable!("default catalog URL is valid: {e}"),
    }
}

/// Element ids and table layout of the catalog pages
#[derive(Debug, Clone)]
pub struct CatalogSelectors {
    /// Id of the search results table
    pub results_table: String,
    /// Id of the "no results" text shown instead of the table
    pub no_results: String,
    /// Id of the description block in the detail window
    pub description: String,
    /// Zero-based column holding the title link
    pub title_column: usize,
    /// Zero-based column holding the download size
    pub size_column: usize,
}

impl Default for CatalogSelectors {
    fn default() -> Self {
        Self {
            results_table: "ctl00_catalogBody_updateMatches".to_string(),
            no_results: "ctl00_catalogBody_noResultText".to_string(),
            description: "ScopedViewHandler_desc".to_string(),
            title_column: 1,
            size_column: 6,
        }
    }
}

impl CatalogSelectors {
    /// Minimum number of cells a result row needs
    pub fn required_columns(&self) -> usize {
        self.title_column.max(self.size_column) + 1
    }
}

/// Bounded readiness polling
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WaitPolicy {
    /// Maximum wait for each readiness condition
    pub timeout: Duration,
    /// Pause between two probes
    pub poll_interval: Duration,
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(15),
            poll_interval: Duration::from_millis(250),
        }
    }
}

/// Browser selection and WebDriver endpoint
#[derive(Debug, Clone)]
pub struct BrowserConfig {
    pub browser_type: BrowserType,
    pub headless: bool,
    /// Connect here instead of starting a managed driver
    pub webdriver_url: Option<String>,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            browser_type: BrowserType::Chrome,
            headless: true,
            webdriver_url: None,
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;
