//! Redirect resolution.
//!
//! "Visit website" anchors on the directory pass through a tracking
//! redirect before reaching the company's real site. Resolution follows
//! each chain with a single GET and keeps only the final `scheme://host`
//! origin. Destination sites are small businesses with frequently broken
//! TLS, so certificate verification is deliberately disabled: the content
//! is never trusted, only the landing origin is recorded.

use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::config::HarvestConfig;
use crate::error::HarvestError;
use crate::utils::constants::CHROME_USER_AGENT;
use crate::utils::url_utils::host_origin;

/// Resolves batches of redirect URLs to canonical site origins.
#[derive(Debug, Clone)]
pub struct RedirectResolver {
    client: reqwest::Client,
    concurrency: usize,
}

impl RedirectResolver {
    /// Build a resolver from the run configuration.
    ///
    /// # Errors
    /// Returns an error if the underlying HTTP client cannot be
    /// constructed.
    pub fn new(config: &HarvestConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(CHROME_USER_AGENT)
            .timeout(config.resolve_timeout)
            .danger_accept_invalid_certs(true)
            .build()
            .context("Failed to build resolver client")?;

        Ok(Self {
            client,
            concurrency: config.resolver_concurrency.max(1),
        })
    }

    /// Resolve a batch of optional redirect URLs.
    ///
    /// The output has the same length and order as the input: slot `i` is
    /// the canonical `scheme://host` origin redirect `i` landed on, `None`
    /// for absent inputs (no network call made) and for entries whose GET
    /// failed or timed out. Workers are capped by the configured
    /// concurrency; completion order never reorders the output.
    pub async fn resolve_redirects(&self, urls: Vec<Option<String>>) -> Vec<Option<String>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));

        let futures = urls.into_iter().map(|maybe_url| {
            let semaphore = Arc::clone(&semaphore);
            async move {
                let url = maybe_url?;
                // Acquire only fails if the semaphore is closed, which
                // never happens here.
                let _permit = semaphore.acquire().await.ok()?;
                match self.resolve_one(&url).await {
                    Ok(origin) => Some(origin),
                    Err(e) => {
                        warn!("{e}");
                        None
                    }
                }
            }
        });

        join_all(futures).await
    }

    /// Follow one redirect chain and return the final origin.
    async fn resolve_one(&self, url: &str) -> Result<String, HarvestError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| HarvestError::Resolution {
                url: url.to_string(),
                reason: e.to_string(),
            })?;

        let origin = host_origin(response.url()).ok_or_else(|| HarvestError::Resolution {
            url: url.to_string(),
            reason: "final URL has no host".to_string(),
        })?;

        debug!("{url} resolved to {origin}");
        Ok(origin)
    }
}
