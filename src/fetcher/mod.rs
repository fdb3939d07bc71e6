//! Plain HTTP page fetching.
//!
//! Profile pages don't need the automated browser: once discovery has their
//! URLs they are static enough to pull with a spoofed-identity GET, which
//! keeps the browser session free to stay strictly sequential.

use anyhow::{Context, Result};
use futures::future::join_all;
use tracing::{debug, warn};

use crate::config::HarvestConfig;
use crate::utils::constants::CHROME_USER_AGENT;

/// Fetches pages over plain HTTP with a browser-like client identity.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: reqwest::Client,
}

impl PageFetcher {
    /// Build a fetcher from the run configuration.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &HarvestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .timeout(config.fetch_timeout)
            .build()
            .context("Failed to build fetch client")?;

        Ok(Self { client })
    }

    /// Fetch one page's markup.
    ///
    /// # Errors
    /// Returns an error on network failure, timeout, or a non-success
    /// status.
    pub async fn fetch_page(&self, url: &str) -> Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch {url}"))?
            .error_for_status()
            .with_context(|| format!("Non-success status fetching {url}"))?;

        response
            .text()
            .await
            .with_context(|| format!("Failed to read body of {url}"))
    }

    /// Fetch a batch of pages concurrently.
    ///
    /// The output is index-aligned with the input: slot `i` holds page `i`'s
    /// markup, or `None` if that fetch failed. One dead URL never affects
    /// its siblings.
    pub async fn fetch_pages(&self, urls: &[String]) -> Vec<Option<String>> {
        let futures = urls.iter().map(|url| async move {
            match self.fetch_page(url).await {
                Ok(body) => {
                    debug!("Fetched {} ({} bytes)", url, body.len());
                    Some(body)
                }
                Err(e) => {
                    warn!("Skipping {url}: {e:#}");
                    None
                }
            }
        });

        join_all(futures).await
    }
}
