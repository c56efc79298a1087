//! Patente Browser - Headless browser automation for lookup sites.
//!
//! Wraps a Chromium process behind [`BrowserSession`]: one process, one
//! page, human-paced input, and request filtering that drops heavyweight
//! resources. Sessions are single-use by default and must be closed on
//! every exit path.
//!
//! # Modules
//!
//! - [`error`] - Session errors using thiserror
//! - [`fingerprint`] - Randomized user-agent and viewport profiles
//! - [`session`] - The [`BrowserSession`] lifecycle and page operations

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod error;
pub mod fingerprint;
pub mod session;

pub use error::{BrowserError, Result};
pub use fingerprint::Fingerprint;
pub use session::{BrowserSession, SessionConfig};
