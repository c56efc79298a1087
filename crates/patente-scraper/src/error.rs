//! Error types for the scraping pipeline.

use patente_browser::BrowserError;
use thiserror::Error;

/// Result alias for scraping operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors raised by the scraping pipeline
#[derive(Debug, Error)]
pub enum ScrapeError {
    /// The anti-bot detector tripped; retryable later, no automatic
    /// retry at this layer
    #[error("access blocked by anti-bot protection at {stage}")]
    Blocked {
        /// Which page the block was detected on
        stage: &'static str,
    },

    /// The results page loaded but could not be read
    #[error("extraction failed: {reason}")]
    Extraction {
        /// What went wrong while reading the page
        reason: String,
    },

    /// An automation step failed (navigation, element wait, timeout)
    #[error(transparent)]
    Browser(#[from] BrowserError),
}

impl ScrapeError {
    /// Whether a later retry could plausibly succeed.
    ///
    /// All scrape failures are transient site or network conditions; none
    /// indicate bad caller input.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        true
    }
}
