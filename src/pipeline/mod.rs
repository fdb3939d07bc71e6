//! Pipeline coordination.
//!
//! Sequences discovery, extraction, redirect resolution, merging and
//! deduplication. Every stage boundary fails soft: an empty intermediate
//! result flows through as an empty outcome with its counts, and only a
//! browser session that cannot be established aborts a run.

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::HarvestConfig;
use crate::discovery;
use crate::dedupe::dedupe_records;
use crate::error::HarvestResult;
use crate::extract::extract_records;
use crate::fetcher::PageFetcher;
use crate::records::{CompanyRecord, PendingRecord};
use crate::resolver::RedirectResolver;
use crate::session::{BrowserSession, ChromiumSession};

/// Final result of a harvest run.
#[derive(Debug, Clone, serde::Serialize)]
pub struct HarvestOutcome {
    /// Unique records, in first-seen order. Immutable from here on.
    pub records: Vec<CompanyRecord>,
    /// How many records extraction produced before deduplication.
    pub extracted: usize,
    /// How many survived deduplication (equals `records.len()`).
    pub unique: usize,
}

impl HarvestOutcome {
    fn empty() -> Self {
        Self {
            records: Vec::new(),
            extracted: 0,
            unique: 0,
        }
    }
}

/// Coordinates one discovery-and-extraction run.
pub struct HarvestPipeline {
    config: HarvestConfig,
    fetcher: PageFetcher,
    resolver: RedirectResolver,
}

impl HarvestPipeline {
    /// Build a pipeline and its HTTP clients from the run configuration.
    ///
    /// # Errors
    /// Returns an error if either HTTP client cannot be constructed.
    pub fn new(config: HarvestConfig) -> Result<Self> {
        let fetcher = PageFetcher::new(&config).context("Failed to build page fetcher")?;
        let resolver = RedirectResolver::new(&config).context("Failed to build resolver")?;
        Ok(Self {
            config,
            fetcher,
            resolver,
        })
    }

    /// Run a query end to end with a freshly launched browser.
    ///
    /// # Errors
    /// `HarvestError::Session` if the browser cannot be started, the only
    /// unrecoverable failure.
    pub async fn run_query(&self, query: &str) -> HarvestResult<HarvestOutcome> {
        let session = ChromiumSession::launch(&self.config).await?;
        self.run_with_session(session, query).await
    }

    /// Run a query against a caller-supplied browser session.
    ///
    /// The session is consumed and closed by discovery regardless of how
    /// the run ends.
    pub async fn run_with_session<S: BrowserSession>(
        &self,
        session: S,
        query: &str,
    ) -> HarvestResult<HarvestOutcome> {
        let pages = match discovery::discover(session, query, &self.config, &self.fetcher).await {
            Ok(pages) => pages,
            Err(e) if e.is_recoverable() => {
                warn!("Discovery found no pages: {e}");
                return Ok(HarvestOutcome::empty());
            }
            Err(e) => return Err(e),
        };

        if pages.is_empty() {
            info!("No pages retrieved, nothing to extract");
            return Ok(HarvestOutcome::empty());
        }

        let mut pending: Vec<PendingRecord> = Vec::new();
        for page in &pages {
            pending.extend(extract_records(page));
        }

        if pending.is_empty() {
            info!("Extraction produced no records from {} pages", pages.len());
            return Ok(HarvestOutcome::empty());
        }

        // Resolve the redirects as one index-aligned batch, then merge each
        // origin back into the record it was extracted with.
        let redirects: Vec<Option<String>> =
            pending.iter().map(|entry| entry.redirect.clone()).collect();
        let resolved = self.resolver.resolve_redirects(redirects).await;

        for (entry, origin) in pending.iter_mut().zip(resolved) {
            entry.record.website_url = origin;
        }

        let records: Vec<CompanyRecord> = pending.into_iter().map(|entry| entry.record).collect();
        let extracted = records.len();

        let unique_records = dedupe_records(records);
        info!(
            "Extracted {extracted} companies, {} unique",
            unique_records.len()
        );

        Ok(HarvestOutcome {
            extracted,
            unique: unique_records.len(),
            records: unique_records,
        })
    }
}
