//! Shared configuration constants for dirharvest
//!
//! Default values and policy constants used throughout the codebase to
//! ensure consistency and avoid magic numbers. Tests override these through
//! `HarvestConfig` rather than editing them in place.

use std::time::Duration;

/// Base URL of the business directory being harvested.
pub const DEFAULT_BASE_URL: &str = "https://clutch.co";

/// Number of listing pages to follow from the search results.
///
/// The first couple of listing pages carry the most relevant providers for
/// a query; deeper pages are mostly broader-category repeats.
pub const DEFAULT_MAX_LISTS: usize = 2;

/// How long to wait for the search results container to appear.
///
/// The search page renders its result list client-side, so the container
/// shows up shortly after navigation or not at all (empty query, challenge
/// interstitial).
pub const SEARCH_RESULTS_WAIT: Duration = Duration::from_secs(5);

/// How long to wait for a listing page's provider container.
///
/// Listing pages are heavier than the search page and intermittently slow
/// behind the site's CDN, so this bound is looser than
/// `SEARCH_RESULTS_WAIT`.
pub const LISTING_WAIT: Duration = Duration::from_secs(20);

/// Interval between element-presence polls while waiting on a selector.
pub const WAIT_POLL_INTERVAL: Duration = Duration::from_millis(200);

/// Per-request timeout for plain profile-page fetches.
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Per-request timeout for redirect resolution.
///
/// Redirect hops terminate at the company's own site, which we only need a
/// final URL from. Shorter than `FETCH_TIMEOUT` so one dead destination
/// doesn't dominate the batch.
pub const RESOLVE_TIMEOUT: Duration = Duration::from_secs(5);

/// Worker cap for concurrent redirect resolution.
pub const RESOLVER_CONCURRENCY: usize = 5;

/// Inclusive range of plausible founding years.
///
/// A 4-digit number inside this range found in a "Founded" detail value is
/// taken as the founding year; values without one are kept verbatim.
pub const FOUNDED_YEAR_MIN: u32 = 1900;
pub const FOUNDED_YEAR_MAX: u32 = 2099;

/// Chrome user agent string presented by both the browser session and the
/// plain HTTP fetchers, so profile fetches and redirect resolution blend in
/// with the automated browser's own traffic.
///
/// Updated: 2025-01-29 to Chrome 132 (current stable)
///
/// Reference: https://chromiumdash.appspot.com/schedule
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/132.0.6834.160 Safari/537.36";
