//! Core error types shared across the lookup pipeline.
//!
//! Normalization and configuration errors live here; the browser, scraper,
//! and lookup crates define their own error enums and convert at the crate
//! boundary.

use thiserror::Error;

/// Errors produced while turning raw text into a canonical plate number.
#[derive(Debug, Error)]
pub enum PlateError {
    /// No known plate format could be found anywhere in the input.
    #[error("no recognizable plate in input: {input:?}")]
    Unrecognized {
        /// The raw text that was rejected (trimmed for display).
        input: String,
    },

    /// The input was offered as an already-canonical plate but is not one.
    #[error("invalid canonical plate {input:?}: {reason}")]
    InvalidFormat {
        /// The rejected value.
        input: String,
        /// Why it was rejected.
        reason: String,
    },
}

/// Configuration-specific errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to determine config directory path
    #[error("could not determine config directory (XDG base directories not available)")]
    NoConfigDir,

    /// Failed to parse TOML
    #[error("failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config
    #[error("failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// I/O error reading/writing config
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid configuration value
    #[error("invalid config value for {field}: {reason}")]
    InvalidValue {
        /// Field name
        field: String,
        /// Reason for invalidity
        reason: String,
    },
}

/// Result type alias for configuration operations.
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plate_error_display() {
        let err = PlateError::Unrecognized {
            input: "???".to_string(),
        };
        assert!(err.to_string().contains("no recognizable plate"));

        let err = PlateError::InvalidFormat {
            input: "ab".to_string(),
            reason: "too short".to_string(),
        };
        assert!(err.to_string().contains("too short"));
    }

    #[test]
    fn test_config_error_display() {
        let err = ConfigError::NoConfigDir;
        assert_eq!(
            err.to_string(),
            "could not determine config directory (XDG base directories not available)"
        );
    }
}
