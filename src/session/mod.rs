//! The automated-browser capability consumed by listing discovery.
//!
//! The directory's search flow only works through a real browser, but the
//! pipeline needs nothing from it beyond the five operations below. Keeping
//! the contract this narrow lets tests drive the discoverer with canned
//! markup and no browser at all.

mod chromium;

pub use chromium::ChromiumSession;

use std::time::Duration;

use crate::error::HarvestResult;

/// A stateful automated-browser session.
///
/// Implementations hold exactly one page and drive exactly one navigation
/// at a time; the discoverer never touches a session from two tasks.
#[allow(async_fn_in_trait)]
pub trait BrowserSession {
    /// Navigate the session's page to `url`.
    async fn open(&mut self, url: &str) -> HarvestResult<()>;

    /// Wait until any of `selectors` matches an element on the current
    /// page, up to `timeout`. Returns whether a match appeared.
    async fn wait_for_any(&mut self, selectors: &[&str], timeout: Duration) -> bool;

    /// Collect the `href` attributes of all elements matching `selector`
    /// on the current page, in document order.
    async fn collect_hrefs(&mut self, selector: &str) -> Vec<String>;

    /// The current page's markup.
    async fn page_source(&mut self) -> HarvestResult<String>;

    /// Pass-through hook for anti-bot interstitials: give the page a
    /// chance to clear a challenge before discovery reads it. The default
    /// does nothing.
    async fn dismiss_challenge(&mut self) {}

    /// Tear the session down. Called exactly once, on every exit path out
    /// of discovery.
    async fn close(self);
}
