use thiserror::Error;

/// Everything that can go wrong while looking up an update
#[derive(Debug, Error)]
pub enum LookupError {
    /// The search returned no results table, or an empty one
    #[error("No results found for the given KB number")]
    NotFound,
    /// A readiness poll ran past its maximum wait
    #[error("Timed out waiting for {0}")]
    Timeout(String),
    /// Any other failure while reading results or the detail pane
    #[error("Error processing rows: {0}")]
    Scrape(String),
    /// The browser or WebDriver could not be started or connected
    #[error("WebDriver session failed: {0}")]
    Session(String),
}

impl LookupError {
    /// Wrap a driver-level failure raised while scraping
    pub fn scrape(err: anyhow::Error) -> Self {
        LookupError::Scrape(format!("{:#}", err))
    }

    /// Wrap a failure raised while acquiring the browser session
    pub fn session(err: anyhow::Error) -> Self {
        LookupError::Session(format!("{:#}", err))
    }

    /// Whether the CLI reports this as "no data" rather than a hard failure
    pub fn is_soft(&self) -> bool {
        !matches!(self, LookupError::Session(_))
    }

    /// Exit code the CLI uses for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LookupError::NotFound | LookupError::Timeout(_) | LookupError::Scrape(_) => 0,
            LookupError::Session(_) => 4,
        }
    }

    /// Short machine-readable status used in JSON reports
    pub fn status(&self) -> &'static str {
        match self {
            LookupError::NotFound => "not_found",
            LookupError::Timeout(_) => "timeout",
            LookupError::Scrape(_) => "scrape_error",
            LookupError::Session(_) => "session_error",
        }
    }
}

#[cfg(test)]
#[path = "errors_test.rs"]
mod errors_test;
