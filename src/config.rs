//! Configuration for geohash decoration and sorting.
//!
//! Serializable with Serde so it can be loaded from JSON, or TOML with the
//! `toml` feature, and validated on load.

use crate::collection::DEFAULT_ATTRIBUTE_NAME;
use crate::compute::geohash::{DEFAULT_PRECISION, GeoHashCalculator};
use crate::compute::validation::validate_precision;
use crate::crs::Crs;
use crate::error::{GeoSortError, Result};
use crate::sort::SortOptions;
use serde::de::Error;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Geohash configuration
///
/// # Example
///
/// ```rust
/// use geosort::Config;
///
/// let config = Config::default();
/// assert_eq!(config.precision, 12);
///
/// let json = r#"{
///     "precision": 8,
///     "attribute_name": "gh",
///     "source_crs": "EPSG:3857"
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.precision, 8);
/// assert!(config.keep_key);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Geohash precision (1-12, default: 12)
    #[serde(default = "Config::default_precision")]
    pub precision: usize,

    /// Name of the appended geohash column
    #[serde(default = "Config::default_attribute_name")]
    pub attribute_name: String,

    /// Reference system assumed for sources that carry none
    #[serde(default = "Config::default_source_crs")]
    pub source_crs: String,

    /// Keep the geohash column in sorted output
    #[serde(default = "Config::default_keep_key")]
    pub keep_key: bool,
}

impl Config {
    const fn default_precision() -> usize {
        DEFAULT_PRECISION
    }

    fn default_attribute_name() -> String {
        DEFAULT_ATTRIBUTE_NAME.to_string()
    }

    fn default_source_crs() -> String {
        "EPSG:4326".to_string()
    }

    const fn default_keep_key() -> bool {
        true
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_attribute_name(mut self, name: impl Into<String>) -> Self {
        self.attribute_name = name.into();
        self
    }

    pub fn with_source_crs(mut self, code: impl Into<String>) -> Self {
        self.source_crs = code.into();
        self
    }

    pub fn with_keep_key(mut self, keep: bool) -> Self {
        self.keep_key = keep;
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> std::result::Result<(), String> {
        validate_precision(self.precision).map_err(|e| e.to_string())?;

        if self.attribute_name.trim().is_empty() {
            return Err("Attribute name cannot be empty".to_string());
        }

        Crs::from_code(&self.source_crs).map_err(|e| e.to_string())?;

        Ok(())
    }

    /// Resolve the configured source reference system.
    pub fn crs(&self) -> Result<Crs> {
        Crs::from_code(&self.source_crs)
    }

    /// Build a calculator from this configuration.
    pub fn calculator(&self) -> Result<GeoHashCalculator> {
        Ok(GeoHashCalculator::new(self.precision)?.with_crs(self.crs()?))
    }

    /// Build sort options from this configuration.
    pub fn sort_options(&self) -> Result<SortOptions> {
        validate_precision(self.precision)?;
        Ok(SortOptions::default()
            .with_precision(self.precision)
            .with_attribute_name(self.attribute_name.clone())
            .with_keep_key(self.keep_key)
            .with_crs(self.crs()?))
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> std::result::Result<Self, serde_json::Error> {
        let config: Config = serde_json::from_str(json)?;
        if let Err(e) = config.validate() {
            return Err(serde_json::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> std::result::Result<Self, toml::de::Error> {
        let config: Config = toml::from_str(toml_str)?;
        if let Err(e) = config.validate() {
            return Err(toml::de::Error::custom(e));
        }
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Load configuration from a file, by extension (`.json`, or `.toml`
    /// with the toml feature).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)?;
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("json") => {
                Self::from_json(&contents).map_err(|e| GeoSortError::Config(e.to_string()))
            }
            #[cfg(feature = "toml")]
            Some("toml") => {
                Self::from_toml(&contents).map_err(|e| GeoSortError::Config(e.to_string()))
            }
            _ => Err(GeoSortError::Config(format!(
                "Unsupported configuration file: {}",
                path.display()
            ))),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            precision: Self::default_precision(),
            attribute_name: Self::default_attribute_name(),
            source_crs: Self::default_source_crs(),
            keep_key: Self::default_keep_key(),
        }
    }
}
