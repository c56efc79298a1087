//! Error types for browser session operations.

use std::time::Duration;
use thiserror::Error;

/// Result alias for browser session operations
pub type Result<T> = std::result::Result<T, BrowserError>;

/// Errors raised while driving a browser session
#[derive(Debug, Error)]
pub enum BrowserError {
    /// Protocol or process-level failure from the underlying browser
    #[error("chromium error: {0}")]
    Chromium(String),

    /// A navigation or form submission did not complete
    #[error("navigation failed: {0}")]
    Navigation(String),

    /// No element matched the selector within the element timeout
    #[error("element not found: {selector}")]
    ElementNotFound {
        /// CSS selector that failed to match
        selector: String,
    },

    /// An operation exceeded its configured deadline
    #[error("{operation} timed out after {timeout:?}")]
    Timeout {
        /// Human-readable name of the operation
        operation: String,
        /// Deadline that was exceeded
        timeout: Duration,
    },

    /// The session was already closed when the operation was attempted
    #[error("session already closed")]
    Closed,
}
