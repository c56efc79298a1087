//! Configuration management for the lookup pipeline.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Main application configuration.
///
/// Loaded from `~/.config/patente-check/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Browser automation settings
    pub browser: BrowserConfig,
    /// Scraping flow settings
    pub scraper: ScraperConfig,
    /// Provider chain and caching settings
    pub lookup: LookupConfig,
    /// Remote structured-data provider endpoints
    pub providers: ProvidersConfig,
}

impl AppConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `PATENTE_SIMULATION`: Override simulation mode (true/false)
    /// - `PATENTE_HEADLESS`: Override browser headless mode (true/false)
    /// - `PATENTE_CACHE_TTL_SECS`: Override result cache TTL
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;

        if let Ok(val) = std::env::var("PATENTE_SIMULATION") {
            if let Ok(simulation) = val.parse() {
                config.lookup.simulation = simulation;
                tracing::debug!("Override lookup.simulation from env: {}", simulation);
            }
        }

        if let Ok(val) = std::env::var("PATENTE_HEADLESS") {
            if let Ok(headless) = val.parse() {
                config.browser.headless = headless;
                tracing::debug!("Override browser.headless from env: {}", headless);
            }
        }

        if let Ok(val) = std::env::var("PATENTE_CACHE_TTL_SECS") {
            if let Ok(ttl) = val.parse() {
                config.lookup.cache_ttl_secs = ttl;
                tracing::debug!("Override lookup.cache_ttl_secs from env: {}", ttl);
            }
        }

        Ok(config)
    }

    /// Save configuration to disk.
    ///
    /// Creates the config directory if it doesn't exist.
    pub fn save(&self) -> ConfigResult<()> {
        let config_path = Self::config_path()?;
        let config_dir = config_path
            .parent()
            .ok_or_else(|| ConfigError::InvalidValue {
                field: "config_path".to_string(),
                reason: "no parent directory".to_string(),
            })?;

        fs::create_dir_all(config_dir)?;
        tracing::debug!("Saving config to {}", config_path.display());

        let contents = toml::to_string_pretty(self)?;
        fs::write(config_path, contents)?;
        Ok(())
    }

    /// Get the path to the configuration file.
    ///
    /// Uses XDG base directories: `~/.config/patente-check/config.toml`
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("cl", "patente-check", "patente-check").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }
}

/// Browser automation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// Run browser in headless mode
    pub headless: bool,
    /// Per-navigation timeout in seconds
    pub navigation_timeout_secs: u64,
    /// Wait-for-element timeout in seconds
    pub element_timeout_secs: u64,
    /// Abort requests for non-essential resource types (images,
    /// stylesheets, fonts, media)
    pub filter_resources: bool,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            headless: true,
            navigation_timeout_secs: 30,
            element_timeout_secs: 30,
            filter_resources: true,
        }
    }
}

/// Scraping flow settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    /// Target site to drive
    pub base_url: String,
    /// Lower bound of the randomized human wait, in milliseconds
    pub wait_min_ms: u64,
    /// Upper bound of the randomized human wait, in milliseconds
    pub wait_max_ms: u64,
    /// Delay between typed characters, in milliseconds
    pub typing_delay_ms: u64,
    /// Keep the browser session warm between calls (debug/test only)
    pub keep_session_alive: bool,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: "https://www.patentechile.com".to_string(),
            wait_min_ms: 300,
            wait_max_ms: 2000,
            typing_delay_ms: 100,
            keep_session_alive: false,
        }
    }
}

/// Provider chain and caching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LookupConfig {
    /// Result cache TTL in seconds
    pub cache_ttl_secs: u64,
    /// Provider chain, walked in order on cache miss
    pub providers: Vec<String>,
    /// Use the deterministic synthetic provider exclusively
    pub simulation: bool,
    /// Informational disclaimer attached to every response
    pub disclaimer: Option<String>,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            cache_ttl_secs: 3600,
            providers: vec![
                "registro-civil".to_string(),
                "autofact".to_string(),
                "patente-cl".to_string(),
                "scraper".to_string(),
            ],
            simulation: false,
            disclaimer: Some("Esta información es solo para fines informativos.".to_string()),
        }
    }
}

/// Remote structured-data provider endpoints.
///
/// API keys are never stored here; they come from the `AUTOFACT_API_KEY`,
/// `PATENTE_CL_API_KEY` and `REGISTRO_CIVIL_API_KEY` environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Registro Civil vehicle registry API
    pub registro_civil_url: String,
    /// Autofact commercial API
    pub autofact_url: String,
    /// Patente.cl API
    pub patente_cl_url: String,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            registro_civil_url: "https://api.registrocivil.cl/vehiculos/v1".to_string(),
            autofact_url: "https://api.autofact.cl/v1".to_string(),
            patente_cl_url: "https://api.patente.cl/v1".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert!(config.browser.headless);
        assert_eq!(config.browser.navigation_timeout_secs, 30);
        assert_eq!(config.scraper.base_url, "https://www.patentechile.com");
        assert_eq!(config.lookup.cache_ttl_secs, 3600);
        assert_eq!(config.lookup.providers.len(), 4);
        assert!(!config.lookup.simulation);
    }

    #[test]
    fn test_config_serialization() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).expect("serialize default config");
        assert!(toml_str.contains("[browser]"));
        assert!(toml_str.contains("[scraper]"));
        assert!(toml_str.contains("[lookup]"));
        assert!(toml_str.contains("[providers]"));

        let parsed: AppConfig = toml::from_str(&toml_str).expect("parse serialized config");
        assert_eq!(parsed.scraper.base_url, config.scraper.base_url);
    }

    #[test]
    fn test_config_save_load_roundtrip() {
        let tmp = tempfile::TempDir::new().expect("create temp dir");
        let config_path = tmp.path().join("config.toml");

        let mut config = AppConfig::default();
        config.lookup.simulation = true;
        config.scraper.wait_max_ms = 900;

        let contents = toml::to_string_pretty(&config).expect("serialize config");
        fs::write(&config_path, contents).expect("write config file");

        let loaded_contents = fs::read_to_string(&config_path).expect("read config file");
        let loaded: AppConfig = toml::from_str(&loaded_contents).expect("parse loaded config");

        assert!(loaded.lookup.simulation);
        assert_eq!(loaded.scraper.wait_max_ms, 900);
    }

    #[test]
    fn test_partial_config() {
        let toml_str = r#"
[lookup]
cache_ttl_secs = 60
providers = ["scraper"]

[browser]
headless = false
"#;

        let config: AppConfig = toml::from_str(toml_str).expect("parse partial config");
        assert_eq!(config.lookup.cache_ttl_secs, 60);
        assert_eq!(config.lookup.providers, vec!["scraper".to_string()]);
        assert!(!config.browser.headless);
        // These should be defaults
        assert_eq!(config.scraper.wait_min_ms, 300);
        assert!(config.browser.filter_resources);
    }

    #[test]
    fn test_env_override_logic() {
        std::env::set_var("PATENTE_CACHE_TTL_SECS", "120");

        let mut config = AppConfig::default();
        if let Ok(val) = std::env::var("PATENTE_CACHE_TTL_SECS") {
            if let Ok(ttl) = val.parse() {
                config.lookup.cache_ttl_secs = ttl;
            }
        }
        assert_eq!(config.lookup.cache_ttl_secs, 120);

        std::env::remove_var("PATENTE_CACHE_TTL_SECS");
    }
}
