//! Provider and lookup error taxonomy.

use patente_core::{PlateError, PlateNumber};
use patente_scraper::ScrapeError;
use thiserror::Error;

/// Result alias for lookup operations
pub type Result<T> = std::result::Result<T, LookupError>;

/// Errors from a single provider attempt.
///
/// These never reach callers directly: the lookup service records them
/// per attempt and only surfaces the aggregate when every provider in the
/// chain has failed.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider requires an API key that is not set in the environment
    #[error("{provider} API key not configured (set {env_var})")]
    MissingApiKey {
        /// Provider display name
        provider: &'static str,
        /// Environment variable holding the key
        env_var: &'static str,
    },

    /// The upstream API answered with a non-success status
    #[error("upstream returned status {status}")]
    UpstreamStatus {
        /// HTTP status code
        status: u16,
    },

    /// Transport-level failure reaching the upstream API
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The upstream answered but the body did not match the expected shape
    #[error("malformed response: {reason}")]
    MalformedResponse {
        /// What failed to parse
        reason: String,
    },

    /// The scraping pipeline failed
    #[error(transparent)]
    Scrape(#[from] ScrapeError),
}

/// One failed attempt in the provider chain, kept for observability.
#[derive(Debug)]
pub struct ProviderFailure {
    /// Name of the provider that failed
    pub provider: String,
    /// Why it failed
    pub error: ProviderError,
}

/// Errors surfaced to lookup callers.
#[derive(Debug, Error)]
pub enum LookupError {
    /// Input normalization failed; the caller must correct the input
    #[error(transparent)]
    InvalidPlate(#[from] PlateError),

    /// A provider could not be constructed from configuration
    #[error("failed to initialize provider {name}: {error}")]
    ProviderInit {
        /// Configured provider name
        name: String,
        /// Underlying construction failure
        error: ProviderError,
    },

    /// Every provider in the chain failed; verification is unavailable
    #[error("all {} providers failed for plate {plate}", .attempts.len())]
    AllProvidersFailed {
        /// The plate that was looked up
        plate: PlateNumber,
        /// Every attempt, in chain order
        attempts: Vec<ProviderFailure>,
    },
}

impl LookupError {
    /// Whether the failure is a caller input error rather than an
    /// upstream availability problem.
    #[must_use]
    pub fn is_caller_error(&self) -> bool {
        matches!(self, Self::InvalidPlate(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_aggregate_counts_attempts() {
        let plate = PlateNumber::new("AB1234").expect("valid plate");
        let err = LookupError::AllProvidersFailed {
            plate,
            attempts: vec![
                ProviderFailure {
                    provider: "registro-civil".to_string(),
                    error: ProviderError::MissingApiKey {
                        provider: "Registro Civil",
                        env_var: "REGISTRO_CIVIL_API_KEY",
                    },
                },
                ProviderFailure {
                    provider: "autofact".to_string(),
                    error: ProviderError::UpstreamStatus { status: 503 },
                },
            ],
        };

        assert_eq!(
            err.to_string(),
            "all 2 providers failed for plate AB1234"
        );
        assert!(!err.is_caller_error());
    }

    #[test]
    fn test_invalid_plate_is_caller_error() {
        let err = LookupError::InvalidPlate(PlateError::Unrecognized {
            input: "   ".to_string(),
        });
        assert!(err.is_caller_error());
    }

    #[test]
    fn test_missing_api_key_names_env_var() {
        let err = ProviderError::MissingApiKey {
            provider: "Autofact",
            env_var: "AUTOFACT_API_KEY",
        };
        assert!(err.to_string().contains("AUTOFACT_API_KEY"));
    }
}
