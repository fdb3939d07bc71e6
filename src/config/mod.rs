//! Harvest run configuration.
//!
//! All policy values default from the named constants in
//! [`crate::utils::constants`]; tests override them per-run through the
//! `with_*` setters instead of patching constants.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::utils::constants::{
    DEFAULT_BASE_URL, DEFAULT_MAX_LISTS, FETCH_TIMEOUT, LISTING_WAIT, RESOLVE_TIMEOUT,
    RESOLVER_CONCURRENCY, SEARCH_RESULTS_WAIT,
};

/// What the discoverer hands to extraction for each listing page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FetchMode {
    /// Follow each provider's profile link and fetch the full profile page
    /// over plain HTTP. Slower, but profile pages carry the detail section
    /// and services legend the listing rows lack.
    ProfilePages,
    /// Hand over the listing page markup as-is and extract from the
    /// provider rows directly.
    ListingHtml,
}

/// Configuration for one harvest run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarvestConfig {
    /// Directory site origin the search template and relative links resolve
    /// against.
    pub base_url: String,
    /// Listing pages to follow from the search results.
    pub max_lists: usize,
    /// Listing-markup vs profile-page extraction (see [`FetchMode`]).
    pub fetch_mode: FetchMode,
    /// Run the automated browser headless.
    pub headless: bool,
    /// Wait bound for the search results container.
    pub search_results_wait: Duration,
    /// Wait bound for a listing page's provider container.
    pub listing_wait: Duration,
    /// Per-request timeout for profile-page fetches.
    pub fetch_timeout: Duration,
    /// Per-request timeout for redirect resolution.
    pub resolve_timeout: Duration,
    /// Worker cap for concurrent redirect resolution.
    pub resolver_concurrency: usize,
}

impl Default for HarvestConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            max_lists: DEFAULT_MAX_LISTS,
            fetch_mode: FetchMode::ProfilePages,
            headless: true,
            search_results_wait: SEARCH_RESULTS_WAIT,
            listing_wait: LISTING_WAIT,
            fetch_timeout: FETCH_TIMEOUT,
            resolve_timeout: RESOLVE_TIMEOUT,
            resolver_concurrency: RESOLVER_CONCURRENCY,
        }
    }
}

impl HarvestConfig {
    /// Override the directory site origin (used by tests to point the
    /// pipeline at a local server).
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    #[must_use]
    pub fn with_max_lists(mut self, max_lists: usize) -> Self {
        self.max_lists = max_lists;
        self
    }

    #[must_use]
    pub fn with_fetch_mode(mut self, fetch_mode: FetchMode) -> Self {
        self.fetch_mode = fetch_mode;
        self
    }

    #[must_use]
    pub fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    #[must_use]
    pub fn with_resolver_concurrency(mut self, workers: usize) -> Self {
        self.resolver_concurrency = workers.max(1);
        self
    }

    #[must_use]
    pub fn with_resolve_timeout(mut self, timeout: Duration) -> Self {
        self.resolve_timeout = timeout;
        self
    }

    #[must_use]
    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }

    /// The percent-encoded search URL for a query.
    #[must_use]
    pub fn search_url(&self, query: &str) -> String {
        format!("{}/search?q={}", self.base_url, urlencoding::encode(query))
    }
}
