//! Discoverer behavior against a scripted browser session.

mod common;

use common::{ScriptedSession, SessionProbe};
use dirharvest::discovery::discover;
use dirharvest::error::HarvestError;
use dirharvest::fetcher::PageFetcher;
use dirharvest::{FetchMode, HarvestConfig};

fn listing_config() -> HarvestConfig {
    HarvestConfig::default().with_fetch_mode(FetchMode::ListingHtml)
}

fn fetcher(config: &HarvestConfig) -> PageFetcher {
    PageFetcher::new(config).unwrap()
}

#[tokio::test]
async fn happy_path_collects_all_listing_pages() {
    let probe = SessionProbe::default();
    let mut session = ScriptedSession::new(probe.clone());
    session.listing_hrefs = vec!["/agencies/web".to_string(), "/agencies/seo".to_string()];
    session.listing_pages = vec![
        Some("<html>first</html>".to_string()),
        Some("<html>second</html>".to_string()),
    ];

    let config = listing_config();
    let pages = discover(session, "web design", &config, &fetcher(&config))
        .await
        .unwrap();

    assert_eq!(pages, vec!["<html>first</html>", "<html>second</html>"]);
    assert_eq!(probe.closes(), 1);

    // Search page first, then each listing page, resolved absolute
    let opened = probe.opened_urls();
    assert_eq!(opened.len(), 3);
    assert_eq!(opened[0], "https://clutch.co/search?q=web%20design");
    assert_eq!(opened[1], "https://clutch.co/agencies/web");
}

#[tokio::test]
async fn missing_results_container_times_out_and_still_closes() {
    let probe = SessionProbe::default();
    let mut session = ScriptedSession::new(probe.clone());
    session.search_results_present = false;

    let config = listing_config();
    let result = discover(session, "nothing", &config, &fetcher(&config)).await;

    assert!(matches!(
        result,
        Err(HarvestError::DiscoveryTimeout { .. })
    ));
    assert_eq!(probe.closes(), 1);
}

#[tokio::test]
async fn dead_listing_page_does_not_abort_the_others() {
    let probe = SessionProbe::default();
    let mut session = ScriptedSession::new(probe.clone());
    session.listing_hrefs = vec!["/agencies/a".to_string(), "/agencies/b".to_string()];
    // First listing page's container never appears
    session.listing_pages = vec![None, Some("<html>survivor</html>".to_string())];

    let config = listing_config();
    let pages = discover(session, "q", &config, &fetcher(&config))
        .await
        .unwrap();

    assert_eq!(pages, vec!["<html>survivor</html>"]);
    assert_eq!(probe.closes(), 1);
}

#[tokio::test]
async fn listing_links_are_capped_at_max_lists() {
    let probe = SessionProbe::default();
    let mut session = ScriptedSession::new(probe.clone());
    session.listing_hrefs = vec![
        "/agencies/a".to_string(),
        "/agencies/b".to_string(),
        "/agencies/c".to_string(),
    ];
    session.listing_pages = vec![
        Some("<html>a</html>".to_string()),
        Some("<html>b</html>".to_string()),
        Some("<html>c</html>".to_string()),
    ];

    let config = listing_config().with_max_lists(2);
    let pages = discover(session, "q", &config, &fetcher(&config))
        .await
        .unwrap();

    assert_eq!(pages.len(), 2);
    // Search page plus exactly two listing navigations
    assert_eq!(probe.opened_urls().len(), 3);
}

#[tokio::test]
async fn no_listing_links_yields_empty_without_error() {
    let probe = SessionProbe::default();
    let session = ScriptedSession::new(probe.clone());

    let config = listing_config();
    let pages = discover(session, "q", &config, &fetcher(&config))
        .await
        .unwrap();

    assert!(pages.is_empty());
    assert_eq!(probe.closes(), 1);
}

#[tokio::test]
async fn profile_mode_fetches_each_profile_page() {
    let mut server = mockito::Server::new_async().await;
    let first = server
        .mock("GET", "/profile/acme")
        .with_status(200)
        .with_body("<html>acme profile</html>")
        .create_async()
        .await;
    let second = server
        .mock("GET", "/profile/beta")
        .with_status(200)
        .with_body("<html>beta profile</html>")
        .create_async()
        .await;

    let probe = SessionProbe::default();
    let mut session = ScriptedSession::new(probe.clone());
    session.listing_hrefs = vec!["/agencies/web".to_string()];
    session.listing_pages = vec![Some(String::new())];
    session.profile_hrefs = vec!["/profile/acme".to_string(), "/profile/beta".to_string()];

    let config = HarvestConfig::default()
        .with_base_url(server.url())
        .with_fetch_mode(FetchMode::ProfilePages);
    let pages = discover(session, "q", &config, &fetcher(&config))
        .await
        .unwrap();

    assert_eq!(
        pages,
        vec!["<html>acme profile</html>", "<html>beta profile</html>"]
    );
    assert_eq!(probe.closes(), 1);
    first.assert_async().await;
    second.assert_async().await;
}
