//! The provider abstraction over every record source.

use crate::error::ProviderError;
use async_trait::async_trait;
use patente_core::{PlateNumber, VehicleRecord};

/// A source capable of producing a vehicle record for a plate.
///
/// Implementations cover remote structured APIs, the scraping pipeline,
/// and the deterministic synthetic generator. Providers must be
/// thread-safe; the lookup service holds them behind `Arc` and may serve
/// concurrent lookups.
#[async_trait]
pub trait VehicleProvider: Send + Sync {
    /// Short identifier used in configuration and logs.
    fn name(&self) -> &str;

    /// Verification method label carried into the response:
    /// "api", "scraper" or "simulation".
    fn verification_method(&self) -> &str;

    /// Attempt one lookup for the plate.
    ///
    /// Must never fabricate data on failure: a provider either returns a
    /// genuine record (including a definitive "no results" record) or an
    /// error for the chain to log and move past.
    async fn check(&self, plate: &PlateNumber) -> Result<VehicleRecord, ProviderError>;
}
