//! Configuration system for SpatialOpt.
//!
//! Describe which covering model to build, and how, in a TOML or YAML file
//! instead of code.
//!
//! # Examples
//!
//! Load configuration from a TOML string:
//!
//! ```
//! use spatialopt_config::{ModelConfig, ModelKindConfig};
//! use spatialopt_models::ModelFamily;
//!
//! let config = ModelConfig::from_toml_str(r#"
//!     delineator = "$"
//!     use_serviceable_demand = true
//!
//!     [model]
//!     type = "mclp"
//!
//!     [model.caps]
//!     total = 5
//!     fire_stations = 2
//! "#).unwrap();
//!
//! assert_eq!(config.model.family(), ModelFamily::Mclp);
//! let ModelKindConfig::Mclp(params) = &config.model else { unreachable!() };
//! assert_eq!(params.caps.for_type("fire_stations"), Some(2));
//! ```
//!
//! Threshold models take a coverage percentage:
//!
//! ```
//! use spatialopt_config::ModelConfig;
//!
//! let config = ModelConfig::from_yaml_str("
//!     model:
//!       type: threshold
//!       psi: 80
//! ").unwrap();
//!
//! assert_eq!(config.delineator, "$");
//! assert_eq!(config.threshold, 1.0);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use spatialopt_core::FacilityCaps;
use spatialopt_models::{BuildOptions, ModelFamily, TraumahCounts, DEFAULT_DELINEATOR};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

fn default_delineator() -> String {
    DEFAULT_DELINEATOR.to_string()
}

fn default_threshold() -> f64 {
    1.0
}

/// Model configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ModelConfig {
    /// Separator composing variable names.
    #[serde(default = "default_delineator")]
    pub delineator: String,

    /// Weight demand units by serviceable demand instead of demand.
    #[serde(default)]
    pub use_serviceable_demand: bool,

    /// Write the built model to this LP file.
    #[serde(default)]
    pub export_path: Option<PathBuf>,

    /// Minimum solved value for a facility to count as chosen, applied by
    /// `spatialopt::selected_facilities`.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Model family and its parameters.
    pub model: ModelKindConfig,
}

impl ModelConfig {
    /// Creates a configuration for `model` with default options.
    pub fn new(model: ModelKindConfig) -> Self {
        Self {
            delineator: default_delineator(),
            use_serviceable_demand: false,
            export_path: None,
            threshold: default_threshold(),
            model,
        }
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file doesn't exist, contains invalid TOML, or
    /// fails [`ModelConfig::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Self::from_toml_file(path)
    }

    /// Loads configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a YAML file.
    pub fn from_yaml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    /// Parses configuration from a YAML string.
    pub fn from_yaml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Sets the variable name separator.
    pub fn with_delineator(mut self, delineator: impl Into<String>) -> Self {
        self.delineator = delineator.into();
        self
    }

    /// Sets whether serviceable demand weights the model.
    pub fn with_serviceable_demand(mut self, enabled: bool) -> Self {
        self.use_serviceable_demand = enabled;
        self
    }

    /// Sets the LP export target.
    pub fn with_export_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.export_path = Some(path.into());
        self
    }

    /// Sets the extraction threshold.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    /// Checks values serde cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.delineator.is_empty() {
            return Err(ConfigError::Invalid(
                "delineator must not be empty".to_string(),
            ));
        }
        if !self.threshold.is_finite() {
            return Err(ConfigError::Invalid(format!(
                "threshold must be a finite number, got {}",
                self.threshold
            )));
        }
        if let ModelKindConfig::Threshold(params) | ModelKindConfig::CcThreshold(params) =
            &self.model
        {
            if !params.psi.is_finite() || !(0.0..=100.0).contains(&params.psi) {
                return Err(ConfigError::Invalid(format!(
                    "psi must be between 0 and 100, got {}",
                    params.psi
                )));
            }
        }
        Ok(())
    }

    /// Options for the model builders.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            delineator: self.delineator.clone(),
            use_serviceable_demand: self.use_serviceable_demand,
            export_path: self.export_path.clone(),
        }
    }
}

/// Model family configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ModelKindConfig {
    /// Maximal covering over binary coverage.
    Mclp(CapsConfig),

    /// Maximal covering over partial coverage.
    MclpCc(CapsConfig),

    /// Coverage threshold over binary coverage.
    Threshold(ThresholdConfig),

    /// Complementary coverage threshold over partial coverage.
    CcThreshold(ThresholdConfig),

    /// Backup covering.
    Backup(CapsConfig),

    /// Location set covering.
    Lscp,

    /// Trauma center and air depot siting.
    Traumah(TraumahConfig),
}

impl ModelKindConfig {
    pub fn family(&self) -> ModelFamily {
        match self {
            ModelKindConfig::Mclp(_) => ModelFamily::Mclp,
            ModelKindConfig::MclpCc(_) => ModelFamily::MclpCc,
            ModelKindConfig::Threshold(_) => ModelFamily::Threshold,
            ModelKindConfig::CcThreshold(_) => ModelFamily::CcThreshold,
            ModelKindConfig::Backup(_) => ModelFamily::Backup,
            ModelKindConfig::Lscp => ModelFamily::Lscp,
            ModelKindConfig::Traumah(_) => ModelFamily::Traumah,
        }
    }
}

/// Facility-count limits.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CapsConfig {
    pub caps: FacilityCaps,
}

/// Coverage percentage required by threshold models.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ThresholdConfig {
    pub psi: f64,
}

/// Facility counts of a TRAUMAH model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TraumahConfig {
    pub air_depots: u64,
    pub trauma_centers: u64,
}

impl From<TraumahConfig> for TraumahCounts {
    fn from(config: TraumahConfig) -> Self {
        TraumahCounts::new(config.air_depots, config.trauma_centers)
    }
}

#[cfg(test)]
mod tests;
