//! Redirect resolver alignment and failure isolation.

use std::time::Duration;

use dirharvest::resolver::RedirectResolver;
use dirharvest::HarvestConfig;

fn resolver(config: &HarvestConfig) -> RedirectResolver {
    RedirectResolver::new(config).unwrap()
}

#[tokio::test]
async fn follows_redirect_chain_to_origin() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/r/acme")
        .with_status(302)
        .with_header("location", "/landed/path?x=1")
        .create_async()
        .await;
    server
        .mock("GET", "/landed/path?x=1")
        .with_status(200)
        .with_body("landed")
        .create_async()
        .await;

    let config = HarvestConfig::default();
    let resolved = resolver(&config)
        .resolve_redirects(vec![Some(format!("{}/r/acme", server.url()))])
        .await;

    // Path and query are discarded; only the origin survives
    assert_eq!(resolved, vec![Some(server.url())]);
}

#[tokio::test]
async fn output_stays_aligned_with_interleaved_absences_and_failures() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/r/good")
        .with_status(302)
        .with_header("location", "/home")
        .create_async()
        .await;
    server
        .mock("GET", "/home")
        .with_status(200)
        .create_async()
        .await;

    let config = HarvestConfig::default().with_resolve_timeout(Duration::from_secs(2));

    // Slot 0 resolves, slot 1 was never extracted, slot 2 points at a
    // closed port and fails
    let input = vec![
        Some(format!("{}/r/good", server.url())),
        None,
        Some("http://127.0.0.1:1/r/dead".to_string()),
    ];
    let resolved = resolver(&config).resolve_redirects(input).await;

    assert_eq!(resolved.len(), 3);
    assert_eq!(resolved[0], Some(server.url()));
    assert_eq!(resolved[1], None);
    assert_eq!(resolved[2], None);
}

#[tokio::test]
async fn empty_batch_resolves_to_empty() {
    let config = HarvestConfig::default();
    let resolved = resolver(&config).resolve_redirects(Vec::new()).await;
    assert!(resolved.is_empty());
}

#[tokio::test]
async fn batch_larger_than_worker_cap_preserves_order() {
    let mut server = mockito::Server::new_async().await;
    for i in 0..12 {
        server
            .mock("GET", format!("/r/{i}").as_str())
            .with_status(302)
            .with_header("location", format!("/site/{i}").as_str())
            .create_async()
            .await;
        server
            .mock("GET", format!("/site/{i}").as_str())
            .with_status(200)
            .create_async()
            .await;
    }

    let config = HarvestConfig::default().with_resolver_concurrency(3);
    let input: Vec<_> = (0..12)
        .map(|i| Some(format!("{}/r/{i}", server.url())))
        .collect();
    let resolved = resolver(&config).resolve_redirects(input).await;

    assert_eq!(resolved.len(), 12);
    for slot in resolved {
        assert_eq!(slot, Some(server.url()));
    }
}
