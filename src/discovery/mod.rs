//! Listing discovery
//!
//! Drives the browser session through the directory's search flow (search
//! page, listing pages, profile links) and yields raw page markup for
//! extraction. The session is the only stateful resource here and is
//! released exactly once on every exit path.

use tracing::{info, warn};

use crate::config::{FetchMode, HarvestConfig};
use crate::error::{HarvestError, HarvestResult};
use crate::fetcher::PageFetcher;
use crate::records::PageSource;
use crate::session::BrowserSession;
use crate::utils::url_utils::resolve_href;

// =============================================================================
// Selectors
// =============================================================================

/// Container holding the search result list.
pub const SEARCH_RESULTS_SELECTOR: &str = "#companies-results";

/// Links from the search results to company listing pages.
pub const LISTING_LINK_SELECTOR: &str = "#companies-results a.companies_item";

/// Provider containers a listing page may use. Markup varies across page
/// variants, so every alternate is tried before giving up on a page.
pub const PROVIDER_CONTAINER_SELECTORS: &[&str] =
    &["section#providers__section", "ul#providers__list"];

/// Links from a listing row to the company's profile page.
pub const PROFILE_LINK_SELECTOR: &str = "a.provider__title-link";

// =============================================================================
// Discovery
// =============================================================================

/// Run the search flow for `query` and return the harvested page sources.
///
/// Takes ownership of the session and closes it on every exit path:
/// normal return, discovery timeout, or session failure.
///
/// # Errors
/// [`HarvestError::DiscoveryTimeout`] if the search results container never
/// appears (the caller treats this as "no pages found"), or
/// [`HarvestError::Session`] if the browser cannot be driven at all.
pub async fn discover<S: BrowserSession>(
    mut session: S,
    query: &str,
    config: &HarvestConfig,
    fetcher: &PageFetcher,
) -> HarvestResult<Vec<PageSource>> {
    let outcome = drive(&mut session, query, config, fetcher).await;
    session.close().await;
    outcome
}

async fn drive<S: BrowserSession>(
    session: &mut S,
    query: &str,
    config: &HarvestConfig,
    fetcher: &PageFetcher,
) -> HarvestResult<Vec<PageSource>> {
    let search_url = config.search_url(query);
    info!("Searching for '{query}' at {search_url}");

    session.open(&search_url).await?;

    if !session
        .wait_for_any(&[SEARCH_RESULTS_SELECTOR], config.search_results_wait)
        .await
    {
        return Err(HarvestError::DiscoveryTimeout {
            selector: SEARCH_RESULTS_SELECTOR.to_string(),
            waited_secs: config.search_results_wait.as_secs(),
        });
    }

    let listing_urls: Vec<String> = session
        .collect_hrefs(LISTING_LINK_SELECTOR)
        .await
        .iter()
        .take(config.max_lists)
        .filter_map(|href| resolve_href(&config.base_url, href))
        .collect();

    if listing_urls.is_empty() {
        info!("Search returned no listing pages for '{query}'");
        return Ok(Vec::new());
    }

    let mut pages = Vec::new();

    for (i, listing_url) in listing_urls.iter().enumerate() {
        info!(
            "Navigating to listing page {}/{}: {listing_url}",
            i + 1,
            listing_urls.len()
        );

        // One dead listing page must not abort the others.
        if let Err(e) = session.open(listing_url).await {
            warn!("Failed to open listing page {listing_url}: {e}");
            continue;
        }

        session.dismiss_challenge().await;

        if !session
            .wait_for_any(PROVIDER_CONTAINER_SELECTORS, config.listing_wait)
            .await
        {
            warn!("No provider container found on {listing_url}, skipping");
            continue;
        }

        match config.fetch_mode {
            FetchMode::ListingHtml => match session.page_source().await {
                Ok(markup) => pages.push(markup),
                Err(e) => warn!("Failed to read listing markup from {listing_url}: {e}"),
            },
            FetchMode::ProfilePages => {
                let profile_urls: Vec<String> = session
                    .collect_hrefs(PROFILE_LINK_SELECTOR)
                    .await
                    .iter()
                    .filter_map(|href| resolve_href(&config.base_url, href))
                    .collect();

                if profile_urls.is_empty() {
                    warn!("No profile links found on {listing_url}");
                    continue;
                }

                info!("Fetching {} profile pages", profile_urls.len());
                pages.extend(fetcher.fetch_pages(&profile_urls).await.into_iter().flatten());
            }
        }
    }

    info!("Discovery harvested {} pages", pages.len());
    Ok(pages)
}
