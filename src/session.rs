use anyhow::{Context, Result};
use fantoccini::Locator;
use fantoccini::elements::Element;
use fantoccini::wd::WindowHandle;
use tracing::debug;
use url::Url;

use crate::catalog::CatalogPage;
use crate::config::{CatalogConfig, CatalogSelectors};
use crate::types::ResultsState;
use crate::webdriver::Browser;

/// A browser session pointed at the update catalog
pub struct CatalogSession {
    browser: Browser,
    selectors: CatalogSelectors,
}

impl CatalogSession {
    /// Start a browser as described by `config.browser`
    pub async fn open(config: &CatalogConfig) -> Result<Self> {
        let browser = Browser::new(&config.browser).await?;
        debug!("Opened {:?} session for the catalog", browser.browser_type());
        Ok(Self::new(browser, config.selectors.clone()))
    }

    pub fn new(browser: Browser, selectors: CatalogSelectors) -> Self {
        Self { browser, selectors }
    }

    /// Data rows of the results table, header excluded
    async fn data_rows(&self) -> Result<Vec<Element>> {
        let table = self
            .browser
            .client
            .find(Locator::Id(&self.selectors.results_table))
            .await
            .context("Results table not found")?;

        let rows = table.find_all(Locator::Css("tr")).await?;
        Ok(rows.into_iter().skip(1).collect())
    }

    async fn first_row(&self) -> Result<Element> {
        self.data_rows()
            .await?
            .into_iter()
            .next()
            .context("Results table has no data rows")
    }
}

impl CatalogPage for CatalogSession {
    type Window = WindowHandle;

    async fn navigate(&mut self, url: &Url) -> Result<()> {
        self.browser.goto(url.as_str()).await
    }

    async fn source_len(&mut self) -> Result<usize> {
        self.browser.page_source_len().await
    }

    async fn results_state(&mut self) -> Result<ResultsState> {
        let client = &self.browser.client;

        let tables = client
            .find_all(Locator::Id(&self.selectors.results_table))
            .await?;
        if !tables.is_empty() {
            let rows = self.data_rows().await?.len();
            return Ok(ResultsState::Table { rows });
        }

        let markers = client
            .find_all(Locator::Id(&self.selectors.no_results))
            .await?;
        if !markers.is_empty() {
            return Ok(ResultsState::NoResults);
        }

        Ok(ResultsState::Loading)
    }

    async fn first_row_cells(&mut self) -> Result<Vec<String>> {
        let row = self.first_row().await?;
        let mut texts = Vec::new();
        for cell in row.find_all(Locator::Css("td")).await? {
            texts.push(cell.text().await?);
        }
        Ok(texts)
    }

    async fn activate_title(&mut self) -> Result<()> {
        let row = self.first_row().await?;
        let cells = row.find_all(Locator::Css("td")).await?;
        let cell = cells
            .get(self.selectors.title_column)
            .context("Title column missing in first row")?;
        let link = cell
            .find(Locator::Css("a"))
            .await
            .context("Title link missing in first row")?;
        link.click().await.context("Failed to click title link")?;
        Ok(())
    }

    async fn current_window(&mut self) -> Result<WindowHandle> {
        Ok(self.browser.client.window().await?)
    }

    async fn windows(&mut self) -> Result<Vec<WindowHandle>> {
        Ok(self.browser.client.windows().await?)
    }

    async fn focus_window(&mut self, window: WindowHandle) -> Result<()> {
        self.browser
            .client
            .switch_to_window(window)
            .await
            .context("Failed to switch window")?;
        Ok(())
    }

    async fn description_text(&mut self) -> Result<Option<String>> {
        let found = self
            .browser
            .client
            .find_all(Locator::Id(&self.selectors.description))
            .await?;
        match found.first() {
            Some(element) => Ok(Some(element.text().await?)),
            None => Ok(None),
        }
    }

    async fn close_window(&mut self) -> Result<()> {
        self.browser.client.close_window().await?;
        Ok(())
    }

    async fn quit(self) -> Result<()> {
        self.browser.close().await
    }
}
