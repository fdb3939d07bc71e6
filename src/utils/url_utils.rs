//! URL validation and manipulation helpers.

use url::Url;

/// Check if a URL is a well-formed http(s) URL with a host.
#[must_use]
pub fn is_valid_url(url: &str) -> bool {
    if url.is_empty() {
        return false;
    }

    // Skip data URLs, javascript URLs, and other non-http schemes
    if url.starts_with("data:") || url.starts_with("javascript:") || url.starts_with("mailto:") {
        return false;
    }

    match Url::parse(url) {
        Ok(parsed) => {
            matches!(parsed.scheme(), "http" | "https") && parsed.host_str().is_some()
        }
        Err(_) => false,
    }
}

/// Resolve a possibly-relative href against a base URL.
///
/// Listing and profile links on the directory come back as a mix of
/// absolute URLs and site-relative paths; both forms resolve here.
#[must_use]
pub fn resolve_href(base: &str, href: &str) -> Option<String> {
    let base = Url::parse(base).ok()?;
    base.join(href).ok().map(String::from)
}

/// Reduce a URL to its `scheme://host` origin, discarding path, query and
/// fragment. A non-default port is part of the host. The canonical-website
/// contract only cares about the site origin a redirect chain lands on.
#[must_use]
pub fn host_origin(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    match url.port() {
        Some(port) => Some(format!("{}://{host}:{port}", url.scheme())),
        None => Some(format!("{}://{host}", url.scheme())),
    }
}
