//! Chromium-backed implementation of [`BrowserSession`].
//!
//! Launches a stealth-configured Chrome/Chromium over CDP. Executable
//! discovery prefers an explicit `CHROMIUM_PATH`, then well-known install
//! locations, then `which`, and finally falls back to downloading a
//! managed build.

use std::path::PathBuf;
use std::process::Command;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use chromiumoxide::page::Page;
use futures::StreamExt;
use tokio::task::{self, JoinHandle};
use tracing::{debug, info, trace, warn};

use super::BrowserSession;
use crate::config::HarvestConfig;
use crate::error::{HarvestError, HarvestResult};
use crate::utils::constants::{CHROME_USER_AGENT, WAIT_POLL_INTERVAL};

/// Selector for the challenge checkbox some interstitials render. Clicking
/// it is best-effort; solving challenges is out of scope.
const CHALLENGE_CHECKBOX_SELECTOR: &str = "input[type='checkbox'].challenge-checkbox";

/// A single automated Chrome instance holding one page.
pub struct ChromiumSession {
    browser: Browser,
    page: Page,
    handler_task: JoinHandle<()>,
    user_data_dir: PathBuf,
}

/// Find a Chrome/Chromium executable on the system.
async fn find_browser_executable() -> Result<PathBuf> {
    // Environment variable overrides all other methods
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!("Using browser from CHROMIUM_PATH: {}", path.display());
            return Ok(path);
        }
        warn!(
            "CHROMIUM_PATH points to non-existent file: {}",
            path.display()
        );
    }

    let paths = if cfg!(target_os = "macos") {
        vec![
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        vec![
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/opt/google/chrome/chrome",
        ]
    };

    for path_str in paths {
        let path = PathBuf::from(path_str);
        if path.exists() {
            info!("Found browser at: {}", path.display());
            return Ok(path);
        }
    }

    for cmd in &["chromium", "chromium-browser", "google-chrome", "chrome"] {
        let output = Command::new("which").arg(cmd).output();
        if let Ok(output) = output
            && output.status.success()
        {
            let path_str = String::from_utf8_lossy(&output.stdout).trim().to_string();
            if !path_str.is_empty() {
                info!("Found browser via 'which': {path_str}");
                return Ok(PathBuf::from(path_str));
            }
        }
    }

    Err(anyhow::anyhow!("Chrome/Chromium executable not found"))
}

/// Download a managed Chromium build into a cache directory.
async fn download_managed_browser() -> Result<PathBuf> {
    info!("No local browser found, downloading managed Chromium...");

    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("dirharvest")
        .join("chromium");
    std::fs::create_dir_all(&cache_dir).context("Failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );

    let revision_info = fetcher.fetch().await.context("Failed to fetch browser")?;
    info!(
        "Downloaded Chromium to: {}",
        revision_info.folder_path.display()
    );

    Ok(revision_info.executable_path)
}

async fn launch_browser(headless: bool) -> Result<(Browser, JoinHandle<()>, PathBuf)> {
    let chrome_path = match find_browser_executable().await {
        Ok(path) => path,
        Err(_) => download_managed_browser().await?,
    };

    let user_data_dir =
        std::env::temp_dir().join(format!("dirharvest_chrome_{}", std::process::id()));
    std::fs::create_dir_all(&user_data_dir).context("Failed to create user data directory")?;

    let mut config_builder = BrowserConfigBuilder::default()
        .request_timeout(Duration::from_secs(30))
        .window_size(1920, 1080)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(chrome_path);

    if headless {
        config_builder = config_builder.headless_mode(HeadlessMode::default());
    } else {
        config_builder = config_builder.with_head();
    }

    config_builder = config_builder
        .arg(format!("--user-agent={CHROME_USER_AGENT}"))
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-infobars")
        .arg("--disable-notifications")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--no-sandbox")
        .arg("--ignore-certificate-errors")
        .arg("--disable-extensions")
        .arg("--disable-popup-blocking")
        .arg("--disable-background-networking")
        .arg("--disable-hang-monitor")
        .arg("--metrics-recording-only")
        .arg("--password-store=basic")
        .arg("--hide-scrollbars")
        .arg("--mute-audio");

    let browser_config = config_builder
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    let (browser, mut handler) = Browser::launch(browser_config)
        .await
        .context("Failed to launch browser")?;

    let handler_task = task::spawn(async move {
        while let Some(h) = handler.next().await {
            if let Err(e) = h {
                let error_msg = e.to_string();

                // Chrome sends CDP events chromiumoxide doesn't recognize;
                // those deserialization failures are not actionable.
                // https://github.com/mattsse/chromiumoxide/issues/167
                let is_benign = error_msg
                    .contains("data did not match any variant of untagged enum Message")
                    || error_msg.contains("Failed to deserialize WS response");

                if is_benign {
                    trace!("Suppressed benign CDP serialization error: {error_msg}");
                } else {
                    warn!("Browser handler error: {e:?}");
                }
            }
        }
        debug!("Browser handler task completed");
    });

    Ok((browser, handler_task, user_data_dir))
}

impl ChromiumSession {
    /// Launch a browser and open a blank page for navigation.
    ///
    /// # Errors
    /// Returns [`HarvestError::Session`] if the browser cannot be found,
    /// launched, or given a page. Fatal to the run.
    pub async fn launch(config: &HarvestConfig) -> HarvestResult<Self> {
        let (browser, handler_task, user_data_dir) = launch_browser(config.headless)
            .await
            .map_err(|e| HarvestError::Session(format!("{e:#}")))?;

        let page = match browser.new_page("about:blank").await {
            Ok(page) => page,
            Err(e) => {
                handler_task.abort();
                return Err(HarvestError::Session(format!(
                    "Failed to create page: {e}"
                )));
            }
        };

        Ok(Self {
            browser,
            page,
            handler_task,
            user_data_dir,
        })
    }
}

impl BrowserSession for ChromiumSession {
    async fn open(&mut self, url: &str) -> HarvestResult<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| HarvestError::Session(format!("Failed to navigate to {url}: {e}")))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| HarvestError::Session(format!("Navigation to {url} did not settle: {e}")))?;
        Ok(())
    }

    async fn wait_for_any(&mut self, selectors: &[&str], timeout: Duration) -> bool {
        let start = Instant::now();

        // Results render client-side after navigation settles, so poll for
        // presence instead of trusting the load event.
        loop {
            for selector in selectors {
                if self.page.find_element(*selector).await.is_ok() {
                    debug!(
                        "Selector '{}' appeared after {:.2}s",
                        selector,
                        start.elapsed().as_secs_f64()
                    );
                    return true;
                }
            }

            if start.elapsed() >= timeout {
                return false;
            }

            tokio::time::sleep(WAIT_POLL_INTERVAL).await;
        }
    }

    async fn collect_hrefs(&mut self, selector: &str) -> Vec<String> {
        let elements = match self.page.find_elements(selector).await {
            Ok(elements) => elements,
            Err(e) => {
                debug!("No elements for '{selector}': {e}");
                return Vec::new();
            }
        };

        let mut hrefs = Vec::new();
        for element in elements {
            match element.attribute("href").await {
                Ok(Some(href)) => hrefs.push(href),
                Ok(None) => {}
                Err(e) => debug!("Failed to read href: {e}"),
            }
        }
        hrefs
    }

    async fn page_source(&mut self) -> HarvestResult<String> {
        self.page
            .content()
            .await
            .map_err(|e| HarvestError::Session(format!("Failed to read page source: {e}")))
    }

    async fn dismiss_challenge(&mut self) {
        if let Ok(element) = self.page.find_element(CHALLENGE_CHECKBOX_SELECTOR).await {
            debug!("Challenge interstitial detected, attempting click-through");
            if let Err(e) = element.click().await {
                debug!("Challenge click-through failed: {e}");
            }
            tokio::time::sleep(Duration::from_secs(2)).await;
        }
    }

    async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("Failed to close browser: {e}");
        }
        // Wait for the process to fully exit before removing its profile
        if let Err(e) = self.browser.wait().await {
            warn!("Failed to wait for browser exit: {e}");
        }
        self.handler_task.abort();

        if let Err(e) = std::fs::remove_dir_all(&self.user_data_dir) {
            debug!("Failed to clean up browser profile directory: {e}");
        }
    }
}
