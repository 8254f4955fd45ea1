// Common test utilities: the fake catalog server and browser selection

#![allow(dead_code)]

use std::net::SocketAddr;
use std::process::{Command, Output};
use std::time::Duration;
use tokio::sync::OnceCell;

include!("catalog_app.rs");

static CATALOG_SERVER: OnceCell<CatalogServerHandle> = OnceCell::const_new();

pub struct CatalogServerHandle {
    pub addr: SocketAddr,
    pub base_url: String,
}

/// Start the fake catalog once for all tests in this binary
pub async fn ensure_catalog_server() -> &'static CatalogServerHandle {
    CATALOG_SERVER
        .get_or_init(|| async {
            let std_listener =
                std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind catalog server");
            let addr = std_listener.local_addr().unwrap();
            let base_url = format!("http://{}/", addr);
            std_listener
                .set_nonblocking(true)
                .expect("Failed to make listener non-blocking");

            // Each #[tokio::test] has its own runtime, so the server gets a thread of its own
            std::thread::spawn(move || {
                let runtime = tokio::runtime::Runtime::new().expect("Failed to create runtime");
                runtime.block_on(async {
                    let listener = tokio::net::TcpListener::from_std(std_listener)
                        .expect("Failed to adopt listener");
                    axum::serve(listener, create_app().await)
                        .await
                        .expect("Catalog server failed");
                });
            });

            let client = reqwest::Client::new();
            for attempt in 1..=30 {
                let probe = client
                    .get(format!("{}Search.aspx?q=5001716", base_url))
                    .timeout(Duration::from_secs(1))
                    .send()
                    .await;
                if matches!(probe, Ok(ref r) if r.status().is_success()) {
                    eprintln!("Catalog server ready at {} after {} attempts", base_url, attempt);
                    return CatalogServerHandle { addr, base_url };
                }
                tokio::time::sleep(Duration::from_millis(100)).await;
            }

            panic!("Catalog server failed to start");
        })
        .await
}

/// Get the browser to use for testing from TEST_BROWSER env var
/// Defaults to "chrome" if not set
pub fn get_test_browser() -> &'static str {
    match std::env::var("TEST_BROWSER") {
        Ok(browser) if browser == "firefox" => "firefox",
        _ => "chrome",
    }
}

/// Run the kbprobe binary with the given arguments
pub fn run_kbprobe(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_kbprobe"))
        .args(args)
        .env("RUST_LOG", "kbprobe=debug")
        .env_remove("KBPROBE_CATALOG_URL")
        .env_remove("KBPROBE_WEBDRIVER_URL")
        .output()
        .expect("Failed to execute kbprobe")
}
