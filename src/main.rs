#![allow(clippy::uninlined_format_args)]

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use url::Url;

use kbprobe::config::DEFAULT_CATALOG_URL;
use kbprobe::webdriver_manager::GLOBAL_WEBDRIVER_MANAGER;
use kbprobe::{
    BrowserConfig, BrowserType, CatalogConfig, CatalogLookup, CatalogSelectors, LookupReport,
    OutputFormat, WaitPolicy,
};

// Exit codes
const EXIT_SUCCESS: i32 = 0;
const EXIT_COMMAND_ERROR: i32 = 1;

const USAGE: &str = "Usage: kbprobe <KB_NUMBER>";

#[derive(Parser)]
#[command(name = "kbprobe", version)]
#[command(about = "Look up a KB update in the Microsoft Update Catalog", long_about = None)]
struct Cli {
    /// KB number to search for, e.g. 5001716
    kb_number: String,

    /// Browser to use (chrome or firefox)
    #[arg(short, long, default_value = "chrome")]
    browser: String,

    /// Run browser in visible mode (disables headless)
    #[arg(long = "no-headless")]
    no_headless: bool,

    /// Connect to this WebDriver instead of starting one
    #[arg(long, env = "KBPROBE_WEBDRIVER_URL")]
    webdriver_url: Option<String>,

    /// Catalog root the search runs against
    #[arg(long, env = "KBPROBE_CATALOG_URL", default_value = DEFAULT_CATALOG_URL)]
    catalog_url: Url,

    /// Maximum seconds to wait for each page to become ready
    #[arg(long, default_value = "15")]
    timeout: u64,

    /// Milliseconds between readiness checks
    #[arg(long, default_value = "250")]
    poll_interval: u64,

    /// Output format
    #[arg(short, long, default_value = "simple")]
    format: OutputFormat,
}

impl Cli {
    fn catalog_config(&self) -> Result<CatalogConfig> {
        Ok(CatalogConfig {
            base_url: self.catalog_url.clone(),
            selectors: CatalogSelectors::default(),
            wait: WaitPolicy {
                timeout: Duration::from_secs(self.timeout),
                poll_interval: Duration::from_millis(self.poll_interval),
            },
            browser: BrowserConfig {
                browser_type: self.browser.parse::<BrowserType>()?,
                headless: !self.no_headless,
                webdriver_url: self.webdriver_url.clone(),
            },
        })
    }
}

#[tokio::main]
async fn main() {
    // Initialize tracing to stderr so stdout only carries the result
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "kbprobe=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) if matches!(err.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            err.exit()
        }
        Err(err) => {
            println!("{}", USAGE);
            eprintln!("{}", err);
            std::process::exit(EXIT_COMMAND_ERROR);
        }
    };

    let code = match run(cli).await {
        Ok(code) => code,
        Err(err) => {
            eprintln!("Error: {:#}", err);
            EXIT_COMMAND_ERROR
        }
    };

    // Always clean up WebDriver processes before exiting
    GLOBAL_WEBDRIVER_MANAGER.stop_all();

    std::process::exit(code);
}

async fn run(cli: Cli) -> Result<i32> {
    let lookup = CatalogLookup::new(cli.catalog_config()?);
    let search_url = lookup.search_url(&cli.kb_number);

    let outcome = lookup.lookup(&cli.kb_number).await;

    if let Err(err) = &outcome
        && !err.is_soft()
    {
        if matches!(cli.format, OutputFormat::Json) {
            let error_json = json!({
                "error": true,
                "kb_number": &cli.kb_number,
                "status": err.status(),
                "message": err.to_string(),
                "exit_code": err.exit_code()
            });
            println!(
                "{}",
                serde_json::to_string(&error_json).unwrap_or_else(|_| "{}".to_string())
            );
        }
        eprintln!("Error: {}", err);
        return Ok(err.exit_code());
    }

    let report = LookupReport::new(&cli.kb_number, &search_url, &outcome);
    println!("{}", report.render(cli.format));

    Ok(EXIT_SUCCESS)
}
