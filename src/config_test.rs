// Unit tests for configuration defaults

use super::*;
use pretty_assertions::assert_eq;

#[test]
fn test_default_catalog() {
    let config = CatalogConfig::default();
    assert_eq!(config.base_url.as_str(), DEFAULT_CATALOG_URL);
    assert_eq!(config.browser.browser_type, BrowserType::Chrome);
    assert!(config.browser.headless);
    assert!(config.browser.webdriver_url.is_none());
}

#[test]
fn test_default_selectors() {
    let selectors = CatalogSelectors::default();
    assert_eq!(selectors.results_table, "ctl00_catalogBody_updateMatches");
    assert_eq!(selectors.description, "ScopedViewHandler_desc");
    assert_eq!(selectors.title_column, 1);
    assert_eq!(selectors.size_column, 6);
    // Size sits in the 7th column
    assert_eq!(selectors.required_columns(), 7);
}

#[test]
fn test_required_columns_follows_layout() {
    let selectors = CatalogSelectors {
        title_column: 4,
        size_column: 2,
        ..CatalogSelectors::default()
    };
    assert_eq!(selectors.required_columns(), 5);
}

#[test]
fn test_default_wait_policy() {
    let wait = WaitPolicy::default();
    assert_eq!(wait.timeout, Duration::from_secs(15));
    assert_eq!(wait.poll_interval, Duration::from_millis(250));
}
