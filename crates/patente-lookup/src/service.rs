//! The lookup service: normalization, cache, and the provider chain.

use crate::cache::ResultCache;
use crate::error::{LookupError, ProviderFailure, Result};
use crate::provider::VehicleProvider;
use crate::remote::{AutofactProvider, PatenteClProvider, RegistroCivilProvider};
use crate::scraping::ScraperProvider;
use crate::simulated::SimulatedProvider;
use patente_core::{AppConfig, OcrReading, PlateNumber, Timestamp, VehicleRecord, VehicleReport};
use std::sync::Arc;
use std::time::Duration;

/// Coordinates plate lookups across an ordered provider chain with a
/// TTL-bounded result cache in front.
///
/// Each lookup is a single sequential pipeline: normalize, cache check,
/// then providers strictly in order; they are never raced. A cache hit
/// guarantees no provider is invoked. Concurrent lookups for different
/// plates run fully in parallel; the cache is the only shared state.
pub struct LookupService {
    providers: Vec<Arc<dyn VehicleProvider>>,
    cache: ResultCache,
    disclaimer: Option<String>,
}

impl LookupService {
    /// Service over an explicit provider chain and cache.
    #[must_use]
    pub fn new(providers: Vec<Arc<dyn VehicleProvider>>, cache: ResultCache) -> Self {
        Self {
            providers,
            cache,
            disclaimer: None,
        }
    }

    /// Attach an informational disclaimer carried on every response.
    #[must_use]
    pub fn with_disclaimer(mut self, disclaimer: impl Into<String>) -> Self {
        self.disclaimer = Some(disclaimer.into());
        self
    }

    /// Build the chain described by the application configuration.
    ///
    /// In simulation mode the synthetic provider is used exclusively.
    /// Unknown provider names are logged and skipped.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let cache = ResultCache::new(Duration::from_secs(config.lookup.cache_ttl_secs));

        let providers: Vec<Arc<dyn VehicleProvider>> = if config.lookup.simulation {
            tracing::info!("simulation mode: using the synthetic provider exclusively");
            vec![Arc::new(SimulatedProvider::new())]
        } else {
            let mut chain: Vec<Arc<dyn VehicleProvider>> = Vec::new();
            for name in &config.lookup.providers {
                let provider: Arc<dyn VehicleProvider> = match name.as_str() {
                    "registro-civil" => Arc::new(
                        RegistroCivilProvider::new(&config.providers.registro_civil_url)
                            .map_err(|error| LookupError::ProviderInit {
                                name: name.clone(),
                                error,
                            })?,
                    ),
                    "autofact" => Arc::new(
                        AutofactProvider::new(&config.providers.autofact_url).map_err(
                            |error| LookupError::ProviderInit {
                                name: name.clone(),
                                error,
                            },
                        )?,
                    ),
                    "patente-cl" => Arc::new(
                        PatenteClProvider::new(&config.providers.patente_cl_url).map_err(
                            |error| LookupError::ProviderInit {
                                name: name.clone(),
                                error,
                            },
                        )?,
                    ),
                    "scraper" => Arc::new(ScraperProvider::from_config(
                        config.browser.clone(),
                        config.scraper.clone(),
                    )),
                    "simulation" => Arc::new(SimulatedProvider::new()),
                    other => {
                        tracing::warn!(provider = other, "unknown provider name, skipping");
                        continue;
                    }
                };
                chain.push(provider);
            }
            chain
        };

        let mut service = Self::new(providers, cache);
        service.disclaimer = config.lookup.disclaimer.clone();
        Ok(service)
    }

    /// Service using only the synthetic provider, for demos and tests.
    #[must_use]
    pub fn simulated() -> Self {
        Self::new(
            vec![Arc::new(SimulatedProvider::new())],
            ResultCache::new(Duration::from_secs(3600)),
        )
    }

    /// Look up a raw free-text identifier.
    ///
    /// Normalization failure surfaces immediately as
    /// [`LookupError::InvalidPlate`] without touching the cache or chain.
    pub async fn lookup(&self, raw: &str) -> Result<VehicleReport> {
        let plate = PlateNumber::normalize(raw)?;
        self.lookup_inner(&plate, None).await
    }

    /// Look up an already-canonical plate.
    pub async fn lookup_plate(&self, plate: &PlateNumber) -> Result<VehicleReport> {
        self.lookup_inner(plate, None).await
    }

    /// Look up text recognized from a captured image.
    ///
    /// The OCR confidence is carried through to the response untouched;
    /// it is never folded into the record's own confidence.
    pub async fn lookup_reading(&self, reading: &OcrReading) -> Result<VehicleReport> {
        let plate = PlateNumber::normalize(&reading.text)?;
        self.lookup_inner(&plate, Some(reading.confidence)).await
    }

    /// Drop expired cache entries in bulk, returning how many were removed.
    pub async fn purge_expired(&self) -> usize {
        self.cache.purge_expired().await
    }

    async fn lookup_inner(
        &self,
        plate: &PlateNumber,
        ocr_confidence: Option<f32>,
    ) -> Result<VehicleReport> {
        if let Some(record) = self.cache.get(plate).await {
            tracing::debug!(plate = %plate, "cache hit");
            return Ok(self.report(record, "cache", ocr_confidence));
        }

        let mut attempts = Vec::new();
        for provider in &self.providers {
            tracing::debug!(provider = provider.name(), plate = %plate, "attempting provider");
            match provider.check(plate).await {
                Ok(record) => {
                    self.cache.insert(record.clone()).await;
                    tracing::info!(
                        provider = provider.name(),
                        plate = %plate,
                        reported = record.is_reported,
                        "lookup succeeded"
                    );
                    return Ok(self.report(
                        record,
                        provider.verification_method(),
                        ocr_confidence,
                    ));
                }
                Err(error) => {
                    tracing::warn!(
                        provider = provider.name(),
                        plate = %plate,
                        error = %error,
                        "provider failed, continuing down the chain"
                    );
                    attempts.push(ProviderFailure {
                        provider: provider.name().to_string(),
                        error,
                    });
                }
            }
        }

        Err(LookupError::AllProvidersFailed {
            plate: plate.clone(),
            attempts,
        })
    }

    fn report(
        &self,
        record: VehicleRecord,
        method: &str,
        ocr_confidence: Option<f32>,
    ) -> VehicleReport {
        VehicleReport {
            record,
            verification_method: method.to_string(),
            verification_time: Timestamp::now(),
            disclaimer: self.disclaimer.clone(),
            ocr_confidence,
        }
    }
}
