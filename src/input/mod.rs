//! Seed URL ingestion.
//!
//! Reads newline-delimited candidate URLs from a file and keeps the ones
//! that are well-formed and currently reachable.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::utils::constants::FETCH_TIMEOUT;
use crate::utils::url_utils::is_valid_url;

/// Read non-empty trimmed lines from a seed file.
///
/// # Errors
/// Returns an error if the file cannot be read.
pub fn read_urls_from_file(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read seed file {}", path.display()))?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Whether a URL answers with HTTP 200 within the fetch timeout.
pub async fn is_reachable(client: &reqwest::Client, url: &str) -> bool {
    match client.get(url).timeout(FETCH_TIMEOUT).send().await {
        Ok(response) => response.status().is_success(),
        Err(_) => false,
    }
}

/// Read a seed file and keep only the valid, live URLs.
///
/// # Errors
/// Returns an error if the file cannot be read; individual bad URLs are
/// skipped with a warning, not fatal.
pub async fn load_seed_urls(client: &reqwest::Client, path: &Path) -> Result<Vec<String>> {
    let candidates = read_urls_from_file(path)?;
    info!("Read {} candidate URLs from {}", candidates.len(), path.display());

    let mut valid = Vec::new();
    for url in candidates {
        if is_valid_url(&url) && is_reachable(client, &url).await {
            valid.push(url);
        } else {
            warn!("Invalid or unreachable URL skipped: {url}");
        }
    }

    Ok(valid)
}
