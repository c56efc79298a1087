//! Patente Core - Foundation crate for the vehicle plate lookup pipeline.
//!
//! This crate provides the shared record types, plate normalization, error
//! types, and configuration management that the browser, scraper, and
//! lookup crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Normalization and configuration errors using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`plate`] - The canonical [`PlateNumber`] key and its normalization cascade
//! - [`types`] - Record types forming the external lookup contract
//!
//! # Example
//!
//! ```rust
//! use patente_core::PlateNumber;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let plate = PlateNumber::normalize("ab-1234")?;
//! assert_eq!(plate.as_str(), "AB1234");
//! assert_eq!(plate.display(), "AB-1234");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod error;
pub mod plate;
pub mod types;

// Re-export commonly used types
pub use config::{AppConfig, BrowserConfig, LookupConfig, ProvidersConfig, ScraperConfig};
pub use error::{ConfigError, ConfigResult, PlateError};
pub use plate::PlateNumber;
pub use types::{
    OcrReading, ReportInfo, Timestamp, VehicleInfo, VehicleRecord, VehicleReport, UNAVAILABLE,
    UNKNOWN_DATE, UNKNOWN_LOCATION,
};
