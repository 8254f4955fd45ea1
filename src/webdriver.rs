use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use serde_json::json;
use tempfile::TempDir;
use tracing::{debug, info};

use crate::config::BrowserConfig;
use crate::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;

/// Browser instance for WebDriver automation
pub struct Browser {
    pub(crate) client: Client,
    browser_type: BrowserType,
    // Removed when the browser goes away; Chrome refuses to share one
    _user_data_dir: Option<TempDir>,
}

/// Supported browser types
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum BrowserType {
    /// Mozilla Firefox
    Firefox,
    /// Google Chrome/Chromium
    Chrome,
}

impl std::str::FromStr for BrowserType {
    type Err = anyhow::Error;

    /// Parse browser type from string (case-insensitive)
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "firefox" => Ok(BrowserType::Firefox),
            "chrome" | "chromium" => Ok(BrowserType::Chrome),
            _ => anyhow::bail!("Unsupported browser: {}", s),
        }
    }
}

impl BrowserType {
    /// Name of the WebDriver binary for this browser
    pub fn driver_name(&self) -> &'static str {
        match self {
            BrowserType::Firefox => "geckodriver",
            BrowserType::Chrome => "chromedriver",
        }
    }

    /// Port the driver listens on when started by hand
    pub fn standard_port(&self) -> u16 {
        match self {
            BrowserType::Firefox => 4444,
            BrowserType::Chrome => 9515,
        }
    }

    /// Arguments that make the driver listen on `port`
    pub fn driver_args(&self, port: u16) -> Vec<String> {
        match self {
            BrowserType::Firefox => vec!["--port".to_string(), port.to_string()],
            BrowserType::Chrome => vec![format!("--port={}", port)],
        }
    }
}

/// Build the W3C capabilities for a new session
///
/// Headless sessions also run without GPU acceleration.
pub fn build_capabilities(
    browser_type: BrowserType,
    headless: bool,
    user_data_dir: Option<&std::path::Path>,
) -> serde_json::Map<String, serde_json::Value> {
    let mut caps = serde_json::Map::new();

    match browser_type {
        BrowserType::Firefox => {
            let mut args = Vec::new();
            if headless {
                args.push("--headless".to_string());
            }
            caps.insert(
                "moz:firefoxOptions".to_string(),
                json!({ "args": args }),
            );
        }
        BrowserType::Chrome => {
            let mut args = vec!["--no-sandbox".to_string()];
            if headless {
                args.push("--headless=new".to_string());
                args.push("--disable-gpu".to_string());
                // Prevent shared memory issues in containers
                args.push("--disable-dev-shm-usage".to_string());
            }
            if let Some(dir) = user_data_dir {
                args.push(format!("--user-data-dir={}", dir.display()));
            }
            caps.insert(
                "goog:chromeOptions".to_string(),
                json!({ "args": args }),
            );
        }
    }

    caps
}

impl Browser {
    /// Start a browser session
    ///
    /// Connects to `config.webdriver_url` when given, otherwise to a driver
    /// started (or found) by the global WebDriver manager.
    pub async fn new(config: &BrowserConfig) -> Result<Self> {
        let browser_type = config.browser_type;
        info!("Connecting to {:?} WebDriver", browser_type);

        let managed = config.webdriver_url.is_none();
        let webdriver_url = match &config.webdriver_url {
            Some(url) => url.clone(),
            None => GLOBAL_WEBDRIVER_MANAGER.ensure_driver(browser_type).await?,
        };

        let user_data_dir = match browser_type {
            BrowserType::Chrome => Some(
                tempfile::Builder::new()
                    .prefix("kbprobe-chrome-")
                    .tempdir()
                    .context("Failed to create Chrome user data directory")?,
            ),
            BrowserType::Firefox => None,
        };

        let caps = build_capabilities(
            browser_type,
            config.headless,
            user_data_dir.as_ref().map(|d| d.path()),
        );

        debug!("Connecting to WebDriver at {}", webdriver_url);

        let client = match ClientBuilder::rustls()
            .capabilities(caps.clone())
            .connect(&webdriver_url)
            .await
        {
            Ok(client) => client,
            Err(e) => {
                let error_str = e.to_string();
                let bad_state = error_str.contains("Session is already started")
                    || error_str.contains("session not created");

                if !(managed && bad_state) {
                    return Err(e).context(format!(
                        "Failed to connect to {} at {}",
                        browser_type.driver_name(),
                        webdriver_url
                    ));
                }

                info!("WebDriver appears to be in a bad state, restarting it");
                GLOBAL_WEBDRIVER_MANAGER.kill_driver(browser_type);
                tokio::time::sleep(std::time::Duration::from_millis(500)).await;

                let new_url = GLOBAL_WEBDRIVER_MANAGER
                    .ensure_driver(browser_type)
                    .await
                    .context("Failed to restart WebDriver after recovery")?;

                ClientBuilder::rustls()
                    .capabilities(caps)
                    .connect(&new_url)
                    .await
                    .context("Failed to connect to WebDriver after restart")?
            }
        };

        Ok(Browser {
            client,
            browser_type,
            _user_data_dir: user_data_dir,
        })
    }

    pub fn browser_type(&self) -> BrowserType {
        self.browser_type
    }

    pub async fn goto(&self, url: &str) -> Result<()> {
        info!("Navigating to URL: {}", url);
        self.client
            .goto(url)
            .await
            .with_context(|| format!("Failed to navigate to {}", url))?;
        Ok(())
    }

    /// Length of the current page source, for diagnostics
    pub async fn page_source_len(&self) -> Result<usize> {
        Ok(self.client.source().await?.len())
    }

    /// End the WebDriver session, which also quits the browser
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        Ok(())
    }
}

#[cfg(test)]
#[path = "webdriver_test.rs"]
mod webdriver_test;
