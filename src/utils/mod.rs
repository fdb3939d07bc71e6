//! Shared constants and small helpers used across the pipeline.

pub mod constants;
pub mod url_utils;

pub use constants::*;
pub use url_utils::{host_origin, is_valid_url, resolve_href};
