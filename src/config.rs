//! Model configuration management via TOML files.
//!
//! This module provides configuration parsing from TOML format with sensible defaults.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Configuration for a regularized Gaussian discriminant model.
///
/// # Examples
///
/// ```
/// use gaussian_discriminant::ModelConfig;
///
/// let config = ModelConfig::load_from_file("config/model.toml")
///     .unwrap_or_else(|_| ModelConfig::default());
///
/// println!("Eigenvalue floor: {}", config.tau);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct ModelConfig {
    /// Eigenvalue floor applied during spectral regularization
    pub tau: f64,
    /// Run per-class training passes on the rayon thread pool
    pub parallel: bool,
}

impl ModelConfig {
    /// Load model configuration from a TOML file.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(&path)?;
        Self::from_str(&contents)
    }

    /// Parse model configuration from a TOML string.
    pub fn from_str(toml_str: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig =
            toml::from_str(toml_str).map_err(|err| ConfigError::Parse(err.to_string()))?;
        Self::try_from(&raw.model)
    }

    fn try_from(raw: &RawModel) -> Result<Self, ConfigError> {
        if !raw.tau.is_finite() || raw.tau < 0.0 {
            return Err(ConfigError::Parse(
                "model.tau must be finite and ≥ 0".into(),
            ));
        }

        Ok(Self {
            tau: raw.tau,
            parallel: raw.parallel,
        })
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            tau: default_tau(),
            parallel: default_parallel(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default)]
    model: RawModel,
}

#[derive(Debug, Deserialize)]
struct RawModel {
    #[serde(default = "default_tau")]
    tau: f64,
    #[serde(default = "default_parallel")]
    parallel: bool,
}

impl Default for RawModel {
    fn default() -> Self {
        Self {
            tau: default_tau(),
            parallel: default_parallel(),
        }
    }
}

fn default_tau() -> f64 {
    1.0e-6
}

fn default_parallel() -> bool {
    true
}

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(err) => write!(f, "IO error: {}", err),
            ConfigError::Parse(err) => write!(f, "Parse error: {}", err),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(value: std::io::Error) -> Self {
        ConfigError::Io(value)
    }
}
