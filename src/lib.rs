//! # kbprobe
#![allow(clippy::uninlined_format_args)]
//!
//! Look up a knowledge-base (KB) update in the Microsoft Update Catalog.
//!
//! kbprobe searches the catalog for a KB number in a headless browser driven
//! over WebDriver, reads the first result's title and download size, opens
//! its detail window and reads the description.
//!
//! ## CLI Usage
//!
//! ```bash
//! # Look up an update (Chrome, headless)
//! kbprobe 5001716
//! # Description: Install this update to resolve issues in Windows...
//! # Size: 24 MB
//!
//! # Use Firefox through an already running geckodriver
//! kbprobe KB5001716 --browser firefox --webdriver-url http://localhost:4444
//!
//! # Machine-readable output
//! kbprobe 5001716 --format json | jq -r '.size'
//!
//! # Watch the browser and allow a slow catalog more time
//! kbprobe 5001716 --no-headless --timeout 30
//! ```
//!
//! When nothing is found, or the catalog pages do not look as expected,
//! kbprobe prints `No description or size found or failed to retrieve data.`
//! and exits with status 0. Only a browser that cannot be started is an error
//! (exit status 4).
//!
//! Diagnostics go to stderr; set `RUST_LOG=kbprobe=debug` for more.
//!
//! ## Library Usage
//!
//! ```no_run
//! use kbprobe::{CatalogConfig, CatalogLookup, LookupError};
//!
//! # async fn example() -> anyhow::Result<()> {
//! let lookup = CatalogLookup::new(CatalogConfig::default());
//!
//! match lookup.lookup("5001716").await {
//!     Ok(details) => println!("{} ({})", details.description, details.size),
//!     Err(LookupError::NotFound) => println!("no such update"),
//!     Err(e) => return Err(e.into()),
//! }
//! # Ok(())
//! # }
//! ```

/// The lookup procedure and the page operations it drives
pub mod catalog;

/// Catalog, browser and polling settings
pub mod config;

/// Lookup error kinds
pub mod errors;

/// Rendering lookup outcomes for the CLI
pub mod report;

/// WebDriver-backed catalog pages
pub mod session;

/// Type definitions for lookup results
pub mod types;

/// WebDriver browser control
pub mod webdriver;

/// Automatic WebDriver process management
pub mod webdriver_manager;

pub use catalog::{CatalogLookup, CatalogPage, search_url};
pub use config::{BrowserConfig, CatalogConfig, CatalogSelectors, WaitPolicy};
pub use errors::LookupError;
pub use report::{FALLBACK_MESSAGE, LookupReport};
pub use session::CatalogSession;
pub use types::{OutputFormat, ResultsState, UpdateDetails};
pub use webdriver::{Browser, BrowserType};
