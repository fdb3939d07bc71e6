//! Shared test fixtures: a scripted browser session that drives the
//! discoverer with canned hrefs and markup, no real browser involved.

// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use dirharvest::error::HarvestResult;
use dirharvest::session::BrowserSession;

/// Probes for asserting on a consumed session after discovery returns.
#[derive(Clone, Default)]
pub struct SessionProbe {
    pub opened: Arc<Mutex<Vec<String>>>,
    pub close_count: Arc<AtomicUsize>,
}

impl SessionProbe {
    pub fn opened_urls(&self) -> Vec<String> {
        self.opened.lock().unwrap().clone()
    }

    pub fn closes(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }
}

/// A scripted [`BrowserSession`].
///
/// The first `open` is the search page; each later `open` advances to the
/// next listing page. `listing_pages[i]` is that page's markup, or `None`
/// to simulate its provider container never appearing.
pub struct ScriptedSession {
    pub search_results_present: bool,
    pub listing_hrefs: Vec<String>,
    pub listing_pages: Vec<Option<String>>,
    pub profile_hrefs: Vec<String>,
    probe: SessionProbe,
}

impl ScriptedSession {
    pub fn new(probe: SessionProbe) -> Self {
        Self {
            search_results_present: true,
            listing_hrefs: Vec::new(),
            listing_pages: Vec::new(),
            profile_hrefs: Vec::new(),
            probe,
        }
    }

    /// Index of the listing page the session is currently on, if any.
    fn listing_index(&self) -> Option<usize> {
        self.probe.opened.lock().unwrap().len().checked_sub(2)
    }
}

impl BrowserSession for ScriptedSession {
    async fn open(&mut self, url: &str) -> HarvestResult<()> {
        self.probe.opened.lock().unwrap().push(url.to_string());
        Ok(())
    }

    async fn wait_for_any(&mut self, selectors: &[&str], _timeout: Duration) -> bool {
        if selectors.contains(&"#companies-results") {
            return self.search_results_present;
        }
        self.listing_index()
            .and_then(|i| self.listing_pages.get(i))
            .is_some_and(Option::is_some)
    }

    async fn collect_hrefs(&mut self, selector: &str) -> Vec<String> {
        if selector.contains("companies_item") {
            self.listing_hrefs.clone()
        } else {
            self.profile_hrefs.clone()
        }
    }

    async fn page_source(&mut self) -> HarvestResult<String> {
        Ok(self
            .listing_index()
            .and_then(|i| self.listing_pages.get(i))
            .and_then(Clone::clone)
            .unwrap_or_default())
    }

    async fn close(self) {
        self.probe.close_count.fetch_add(1, Ordering::SeqCst);
    }
}
