//! The catalog lookup procedure.
//!
//! A lookup searches the catalog for one KB number, reads the first result
//! row, opens its detail window and reads the description. Every wait is a
//! bounded poll on a readiness condition, and the browser session is quit
//! exactly once whichever way the lookup ends.

use std::time::Duration;

use anyhow::Result;
use tokio::time::{Instant, sleep};
use tracing::{debug, info, warn};
use url::Url;

use crate::config::{CatalogConfig, WaitPolicy};
use crate::errors::LookupError;
use crate::session::CatalogSession;
use crate::types::{ResultsState, UpdateDetails};

/// Browser operations the lookup procedure needs
///
/// Implemented over WebDriver by [`CatalogSession`]. Failures are reported as
/// `anyhow` errors and classified by the procedure.
#[allow(async_fn_in_trait)]
pub trait CatalogPage: Sized {
    /// Handle identifying a browser window
    type Window: Clone + PartialEq;

    async fn navigate(&mut self, url: &Url) -> Result<()>;

    /// Length of the current page source
    async fn source_len(&mut self) -> Result<usize>;

    async fn results_state(&mut self) -> Result<ResultsState>;

    /// Visible text of each cell in the first data row
    async fn first_row_cells(&mut self) -> Result<Vec<String>>;

    /// Click the title link of the first data row
    async fn activate_title(&mut self) -> Result<()>;

    async fn current_window(&mut self) -> Result<Self::Window>;

    /// All open windows, in no particular order
    async fn windows(&mut self) -> Result<Vec<Self::Window>>;

    async fn focus_window(&mut self, window: Self::Window) -> Result<()>;

    /// Description text in the focused window, `None` until it is rendered
    async fn description_text(&mut self) -> Result<Option<String>>;

    /// Close the focused window
    async fn close_window(&mut self) -> Result<()>;

    /// End the browser session
    async fn quit(self) -> Result<()>;
}

/// Build the search address for a KB number, percent-encoding it
pub fn search_url(base: &Url, kb_number: &str) -> Url {
    let mut url = base.clone();
    let path = format!("{}/Search.aspx", base.path().trim_end_matches('/'));
    url.set_path(&path);
    url.set_fragment(None);
    url.query_pairs_mut().clear().append_pair("q", kb_number);
    url
}

const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Bounded poll over one readiness condition
struct Deadline {
    what: &'static str,
    until: Instant,
    interval: Duration,
}

impl Deadline {
    fn start(what: &'static str, policy: &WaitPolicy) -> Self {
        let now = Instant::now();
        // Timeouts past what the clock can represent mean "wait indefinitely"
        let until = now
            .checked_add(policy.timeout)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        Self {
            what,
            until,
            interval: policy.poll_interval,
        }
    }

    /// Sleep until the next check, or fail once the wait is used up
    async fn tick(&self) -> Result<(), LookupError> {
        let now = Instant::now();
        if now >= self.until {
            return Err(LookupError::Timeout(self.what.to_string()));
        }
        sleep(self.interval.min(self.until - now)).await;
        Ok(())
    }
}

/// Looks up KB numbers in the update catalog
pub struct CatalogLookup {
    config: CatalogConfig,
}

impl CatalogLookup {
    pub fn new(config: CatalogConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// Search address for `kb_number` in the configured catalog
    pub fn search_url(&self, kb_number: &str) -> Url {
        search_url(&self.config.base_url, kb_number)
    }

    /// Look up `kb_number` in a fresh browser session
    pub async fn lookup(&self, kb_number: &str) -> Result<UpdateDetails, LookupError> {
        let session = CatalogSession::open(&self.config)
            .await
            .map_err(LookupError::session)?;
        self.lookup_with(session, kb_number).await
    }

    /// Look up `kb_number` using an already opened page
    ///
    /// The page is consumed and quit before returning, on every path.
    pub async fn lookup_with<P: CatalogPage>(
        &self,
        mut page: P,
        kb_number: &str,
    ) -> Result<UpdateDetails, LookupError> {
        let outcome = self.scrape(&mut page, kb_number).await;

        match &outcome {
            Err(LookupError::NotFound) => info!("No results found for the given KB number."),
            Err(e) => warn!("{}", e),
            Ok(_) => {}
        }

        if let Err(e) = page.quit().await {
            warn!("Failed to quit browser session: {:#}", e);
        }

        outcome
    }

    async fn scrape<P: CatalogPage>(
        &self,
        page: &mut P,
        kb_number: &str,
    ) -> Result<UpdateDetails, LookupError> {
        let selectors = &self.config.selectors;
        let wait = &self.config.wait;

        let url = self.search_url(kb_number);
        page.navigate(&url).await.map_err(LookupError::scrape)?;

        let deadline = Deadline::start("search results", wait);
        let rows = loop {
            match page.results_state().await.map_err(LookupError::scrape)? {
                ResultsState::Loading => deadline.tick().await?,
                ResultsState::NoResults => return Err(LookupError::NotFound),
                ResultsState::Table { rows } => break rows,
            }
        };

        match page.source_len().await {
            Ok(len) => info!("Page source loaded. Length: {} characters", len),
            Err(e) => debug!("Could not read page source: {:#}", e),
        }

        info!("Found {} rows in the results table", rows);
        if rows == 0 {
            return Err(LookupError::NotFound);
        }

        let cells = page.first_row_cells().await.map_err(LookupError::scrape)?;
        if cells.len() < selectors.required_columns() {
            return Err(LookupError::Scrape(format!(
                "expected at least {} columns in the first row, found {}",
                selectors.required_columns(),
                cells.len()
            )));
        }
        let title = cells[selectors.title_column].trim().to_string();
        let size = cells[selectors.size_column].trim().to_string();

        let main_window = page.current_window().await.map_err(LookupError::scrape)?;
        let windows_before = page.windows().await.map_err(LookupError::scrape)?;

        info!("Clicking on title: {}", title);
        page.activate_title().await.map_err(LookupError::scrape)?;

        let deadline = Deadline::start("detail window", wait);
        let detail_window = loop {
            let windows = page.windows().await.map_err(LookupError::scrape)?;
            // Handle order is unspecified, so the new window is the one not seen before
            if let Some(opened) = windows.into_iter().find(|w| !windows_before.contains(w)) {
                break opened;
            }
            deadline.tick().await?;
        };

        page.focus_window(detail_window)
            .await
            .map_err(LookupError::scrape)?;

        let deadline = Deadline::start("update description", wait);
        let description = loop {
            match page.description_text().await.map_err(LookupError::scrape)? {
                Some(text) => break text.trim().to_string(),
                None => deadline.tick().await?,
            }
        };
        info!("Scraped description: {}", description);

        // The result is already collected, so failing to tidy up only gets logged
        if let Err(e) = page.close_window().await {
            warn!("Failed to close detail window: {:#}", e);
        }
        if let Err(e) = page.focus_window(main_window).await {
            warn!("Failed to focus main window: {:#}", e);
        }

        Ok(UpdateDetails::new(title, description, size))
    }
}

#[cfg(test)]
#[path = "catalog_test.rs"]
mod catalog_test;
