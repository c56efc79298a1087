//! The scraping pipeline exposed as a chain provider.

use crate::error::ProviderError;
use crate::provider::VehicleProvider;
use async_trait::async_trait;
use patente_core::config::{BrowserConfig, ScraperConfig};
use patente_core::{PlateNumber, VehicleRecord};
use patente_scraper::PlateScraper;

/// Provider that drives the target site through a browser session.
///
/// A fresh scraper (and therefore a fresh browser process) is created per
/// check, so concurrent lookups never share a session.
pub struct ScraperProvider {
    browser: BrowserConfig,
    scraper: ScraperConfig,
}

impl ScraperProvider {
    /// Provider with default browser and flow settings.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(BrowserConfig::default(), ScraperConfig::default())
    }

    /// Provider configured from the application config sections.
    #[must_use]
    pub fn from_config(browser: BrowserConfig, scraper: ScraperConfig) -> Self {
        Self { browser, scraper }
    }

    /// The scraper for one check. The keep-warm flag is forced off: the
    /// scraper is dropped right after the call, and a warm session would
    /// leak its browser process.
    fn per_call_scraper(&self) -> PlateScraper {
        let scraper = ScraperConfig {
            keep_session_alive: false,
            ..self.scraper.clone()
        };
        PlateScraper::from_config(&self.browser, &scraper)
    }
}

impl Default for ScraperProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VehicleProvider for ScraperProvider {
    fn name(&self) -> &str {
        "scraper"
    }

    fn verification_method(&self) -> &str {
        "scraper"
    }

    async fn check(&self, plate: &PlateNumber) -> Result<VehicleRecord, ProviderError> {
        let mut scraper = self.per_call_scraper();
        let record = scraper.search_by_plate(plate).await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_labels() {
        let provider = ScraperProvider::new();
        assert_eq!(provider.name(), "scraper");
        assert_eq!(provider.verification_method(), "scraper");
    }

    #[test]
    fn test_per_call_scraper_never_keeps_session_warm() {
        let scraper_cfg = ScraperConfig {
            keep_session_alive: true,
            ..ScraperConfig::default()
        };
        let provider = ScraperProvider::from_config(BrowserConfig::default(), scraper_cfg);

        // Each check owns one full session lifecycle regardless of the
        // debug keep-warm flag
        assert!(!provider.per_call_scraper().keeps_session_alive());
    }
}
