//! Patente Lookup - Provider chain and caching for plate verification.
//!
//! The [`LookupService`] coordinates the whole pipeline: it normalizes
//! input, answers from a TTL-bounded cache when it can, and otherwise
//! walks an ordered chain of providers until one succeeds. Individual
//! provider failures are logged and swallowed here, and only here; if
//! the whole chain fails the caller gets a single aggregate error.
//!
//! # Modules
//!
//! - [`error`] - Provider and lookup error taxonomy using thiserror
//! - [`provider`] - The [`VehicleProvider`] trait every source implements
//! - [`remote`] - Remote structured-data API providers
//! - [`scraping`] - The scraping pipeline as a chain provider
//! - [`simulated`] - Deterministic synthetic provider
//! - [`cache`] - TTL-bounded result cache with an injected clock
//! - [`service`] - The [`LookupService`] coordinator
//!
//! # Example
//!
//! ```rust
//! use patente_lookup::LookupService;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let service = LookupService::simulated();
//! let report = service.lookup("JVJV-20").await?;
//! assert!(report.record.is_reported);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod cache;
pub mod error;
pub mod provider;
pub mod remote;
pub mod scraping;
pub mod service;
pub mod simulated;

pub use cache::{Clock, ResultCache, SystemClock};
pub use error::{LookupError, ProviderError, ProviderFailure, Result};
pub use provider::VehicleProvider;
pub use remote::{AutofactProvider, PatenteClProvider, RegistroCivilProvider};
pub use scraping::ScraperProvider;
pub use service::LookupService;
pub use simulated::{simulate, SimulatedProvider, SIMULATION_SOURCE};
