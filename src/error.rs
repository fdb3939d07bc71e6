//! Error types for harvest operations
//!
//! Container- and page-level failures are recoverable and handled where
//! they occur; only session establishment failure aborts a run.

/// Error type for the discovery-and-extraction pipeline.
#[derive(Debug, thiserror::Error)]
pub enum HarvestError {
    /// The browser session could not be started or driven. Fatal to the run.
    #[error("Browser session error: {0}")]
    Session(String),

    /// An expected element never appeared within its wait bound.
    /// Recoverable: the affected page or list is skipped.
    #[error("Timed out after {waited_secs}s waiting for '{selector}'")]
    DiscoveryTimeout { selector: String, waited_secs: u64 },

    /// A company container could not be parsed. Recoverable: only that
    /// container is skipped.
    #[error("Extraction error: {0}")]
    Extraction(String),

    /// A redirect GET failed or timed out. Recoverable: that record keeps
    /// an absent website.
    #[error("Failed to resolve redirect {url}: {reason}")]
    Resolution { url: String, reason: String },
}

impl HarvestError {
    /// Whether the pipeline can continue past this error with partial
    /// results.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        !matches!(self, Self::Session(_))
    }
}

/// Convenience alias for Result with `HarvestError`
pub type HarvestResult<T> = Result<T, HarvestError>;
