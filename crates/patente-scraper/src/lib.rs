//! Patente Scraper - Scraping pipeline for the plate lookup site.
//!
//! Drives patentechile.com through a browser session: block detection,
//! human-paced form submission, and best-effort field extraction. One
//! [`PlateScraper::search_by_plate`] call is one deterministic attempt;
//! retry and caching policy live in the lookup crate above this one.
//!
//! # Modules
//!
//! - [`error`] - The scrape error taxonomy using thiserror
//! - [`block`] - Heuristic anti-bot block classifier
//! - [`extractor`] - Named per-field extractors over the results page
//! - [`diagnostics`] - Optional screenshot/page-dump sink
//! - [`orchestrator`] - The [`PlateScraper`] state machine

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod block;
pub mod diagnostics;
pub mod error;
pub mod extractor;
pub mod orchestrator;

pub use block::is_blocked;
pub use diagnostics::{Checkpoint, DiagnosticsSink, FileSink};
pub use error::{Result, ScrapeError};
pub use extractor::{extract, SCRAPE_CONFIDENCE, SOURCE};
pub use orchestrator::PlateScraper;
