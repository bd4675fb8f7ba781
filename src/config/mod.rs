//! Configuration loading from config.toml
//!
//! The file has three optional sections: `[defaults]` (calculation defaults),
//! `[quality]` (data-quality label bands) and `[prn]` (PRN targets). Missing
//! sections fall back to the built-in values, so an empty file is valid.

/// Versioned calculation defaults
pub mod defaults;

/// PRN targets per obligation year
pub mod prn;

/// Data-quality label bands
pub mod quality;

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

pub use defaults::EngineDefaults;
pub use prn::PrnTargetsConfig;
pub use quality::{QualityBand, QualityBands};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Calculation defaults
    #[serde(default)]
    pub defaults: EngineDefaults,
    /// Data-quality label bands
    #[serde(default)]
    pub quality: QualityBands,
    /// PRN targets
    #[serde(default)]
    pub prn: PrnTargetsConfig,
}

impl AppConfig {
    /// Validates every section.
    ///
    /// # Errors
    /// Returns the first [`Error::Config`] found.
    pub fn validate(&self) -> Result<()> {
        self.defaults.validate()?;
        self.quality.validate()?;
        self.prn.validate()
    }
}

/// Parses and validates configuration from a TOML string.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a value is out of range.
pub fn parse_config(contents: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    config.validate()?;
    Ok(config)
}

/// Loads configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Returns
/// * `Ok(AppConfig)` - Successfully parsed and validated configuration
/// * `Err(Error)` - Failed to read, parse or validate the configuration file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A value is out of range
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path_ref = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path_ref);
    let contents = std::fs::read_to_string(path_ref).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path_ref.display()),
    })?;
    let config = parse_config(&contents)?;
    tracing::info!(
        defaults_version = %config.defaults.version,
        prn_targets = config.prn.targets.len(),
        "Loaded configuration"
    );
    Ok(config)
}

/// Loads configuration from the default location (./config.toml)
///
/// # Returns
/// * `Ok(AppConfig)` - Successfully parsed configuration
/// * `Err(Error)` - Failed to read or parse the configuration file
pub fn load_default_config() -> Result<AppConfig> {
    load_config("config.toml")
}
