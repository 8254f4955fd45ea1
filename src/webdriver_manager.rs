use anyhow::{Context, Result};
use std::process::{Child, Command, Stdio};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::webdriver::BrowserType;

/// Starts and tracks WebDriver processes (chromedriver, geckodriver)
pub struct WebDriverManager {
    processes: Mutex<Vec<WebDriverProcess>>,
}

struct WebDriverProcess {
    browser_type: BrowserType,
    child: Child,
    port: u16,
    url: String,
}

impl WebDriverProcess {
    fn terminate(&mut self) {
        debug!(
            "Stopping {} on port {}",
            self.browser_type.driver_name(),
            self.port
        );

        // The driver leads its own process group, so this reaches the browser too
        #[cfg(unix)]
        WebDriverManager::kill_process_group(self.child.id() as i32);

        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

impl Default for WebDriverManager {
    fn default() -> Self {
        Self {
            processes: Mutex::new(Vec::new()),
        }
    }
}

impl WebDriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<WebDriverProcess>> {
        // A panic while holding the lock leaves the list itself intact
        self.processes
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Ensure a WebDriver is reachable for the given browser type
    /// Returns the URL to connect to
    pub async fn ensure_driver(&self, browser_type: BrowserType) -> Result<String> {
        let managed_urls: Vec<String> = self
            .lock()
            .iter()
            .filter(|p| p.browser_type == browser_type)
            .map(|p| p.url.clone())
            .collect();

        for url in managed_urls {
            if Self::verify_driver_working(&url).await {
                debug!("Using managed WebDriver at {}", url);
                return Ok(url);
            }
        }

        let standard_url = format!("http://localhost:{}", browser_type.standard_port());
        if Self::verify_driver_working(&standard_url).await {
            debug!("Found external WebDriver at {}", standard_url);
            return Ok(standard_url);
        }

        info!("WebDriver not detected, attempting to start it");
        self.start_driver(browser_type).await
    }

    /// Spawn a driver process and wait until it answers `/status`
    async fn start_driver(&self, browser_type: BrowserType) -> Result<String> {
        let command = browser_type.driver_name();
        if !Self::command_exists(command) {
            anyhow::bail!(
                "{} not found in PATH. Please install it:\n\
                  macOS: brew install {}\n\
                  Linux: Download from official releases\n\
                  Or see: https://www.selenium.dev/documentation/webdriver/getting_started/install_drivers/",
                command,
                command
            );
        }

        let port = Self::find_free_port_for_browser(browser_type)?;
        info!("Starting {} on port {}", command, port);

        let mut cmd = Command::new(command);
        cmd.args(browser_type.driver_args(port))
            .stdout(Stdio::null())
            .stderr(Stdio::null());

        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            cmd.process_group(0);
        }

        let child = cmd
            .spawn()
            .with_context(|| format!("Failed to start {}", command))?;

        let url = format!("http://localhost:{}", port);
        self.lock().push(WebDriverProcess {
            browser_type,
            child,
            port,
            url: url.clone(),
        });

        // 3 seconds in total
        for _ in 0..30 {
            if Self::is_driver_running(&url).await {
                info!("WebDriver started successfully on port {}", port);
                return Ok(url);
            }
            sleep(Duration::from_millis(100)).await;
        }

        self.stop_port(port);
        anyhow::bail!("{} failed to start within timeout", command)
    }

    /// Check if a command exists in PATH
    pub fn command_exists(command: &str) -> bool {
        let Some(path) = std::env::var_os("PATH") else {
            return false;
        };

        std::env::split_paths(&path).any(|dir| {
            let candidate = dir.join(command);
            candidate.is_file() || (cfg!(windows) && candidate.with_extension("exe").is_file())
        })
    }

    /// Find a free port, preferring the ones the driver normally uses
    pub fn find_free_port_for_browser(browser_type: BrowserType) -> Result<u16> {
        let first = browser_type.standard_port();
        for port in first..first + 3 {
            if !Self::is_port_in_use(port) {
                debug!("Found free port {} for {:?}", port, browser_type);
                return Ok(port);
            }
            debug!("Port {} is in use", port);
        }

        // Let the OS assign one
        let listener = std::net::TcpListener::bind("127.0.0.1:0")?;
        Ok(listener.local_addr()?.port())
    }

    /// Check if a port is in use
    pub fn is_port_in_use(port: u16) -> bool {
        std::net::TcpListener::bind(("127.0.0.1", port)).is_err()
    }

    /// Check if WebDriver answers at the given URL
    pub async fn is_driver_running(url: &str) -> bool {
        Self::status(url).await.is_some()
    }

    /// Check that WebDriver answers and reports itself ready
    async fn verify_driver_working(url: &str) -> bool {
        Self::status(url)
            .await
            .and_then(|body| body.pointer("/value/ready").and_then(|r| r.as_bool()))
            .unwrap_or(false)
    }

    async fn status(url: &str) -> Option<serde_json::Value> {
        let response = reqwest::Client::new()
            .get(format!("{}/status", url))
            .timeout(Duration::from_secs(1))
            .send()
            .await
            .ok()?;

        if !response.status().is_success() {
            return None;
        }
        response.json::<serde_json::Value>().await.ok()
    }

    /// Kill the managed drivers for a browser type
    pub fn kill_driver(&self, browser_type: BrowserType) {
        let mut processes = self.lock();
        processes.retain_mut(|p| {
            if p.browser_type == browser_type {
                p.terminate();
                false
            } else {
                true
            }
        });
    }

    fn stop_port(&self, port: u16) {
        let mut processes = self.lock();
        if let Some(index) = processes.iter().position(|p| p.port == port) {
            warn!("Cleaning up WebDriver that failed on port {}", port);
            processes.remove(index).terminate();
        }
    }

    /// Kill a process group on Unix systems
    #[cfg(unix)]
    fn kill_process_group(pgid: i32) {
        if let Err(e) = Command::new("kill")
            .args(["-TERM", &format!("-{}", pgid)])
            .output()
        {
            debug!("Failed to send SIGTERM to process group {}: {}", pgid, e);
        }

        std::thread::sleep(Duration::from_millis(100));

        if let Err(e) = Command::new("kill")
            .args(["-KILL", &format!("-{}", pgid)])
            .output()
        {
            debug!("Failed to send SIGKILL to process group {}: {}", pgid, e);
        }
    }

    /// Number of drivers this manager started and still tracks
    pub fn managed_count(&self) -> usize {
        self.lock().len()
    }

    /// Stop all managed WebDriver processes
    pub fn stop_all(&self) {
        let mut processes = self.lock();
        for process in processes.iter_mut() {
            process.terminate();
        }
        processes.clear();
    }
}

impl Drop for WebDriverManager {
    fn drop(&mut self) {
        self.stop_all();
    }
}

// Global WebDriver manager instance
lazy_static::lazy_static! {
    pub static ref GLOBAL_WEBDRIVER_MANAGER: WebDriverManager = WebDriverManager::new();
}

#[cfg(test)]
#[path = "webdriver_manager_test.rs"]
mod webdriver_manager_test;
