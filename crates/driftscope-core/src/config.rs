//! Layered configuration.
//!
//! Values come from three layers, later layers winning:
//! 1. Built-in defaults
//! 2. A YAML file (`config/driftscope.yaml` by default)
//! 3. Environment variables (`DRIFTSCOPE_*`)

use crate::{
    types::{BinningMethod, DriftType},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use std::{env, path::Path};
use tracing::{debug, info, warn};

/// Default configuration file location
pub const DEFAULT_CONFIG_PATH: &str = "config/driftscope.yaml";

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub psi: PsiConfig,
    pub dataset: DatasetConfig,
    pub simulation: SimulationDefaults,
    pub experiments: ExperimentsConfig,
}

/// PSI computation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PsiConfig {
    /// Number of bins derived from the reference sample
    pub bin_count: usize,
    pub method: BinningMethod,
}

impl Default for PsiConfig {
    fn default() -> Self {
        Self {
            bin_count: 10,
            method: BinningMethod::Quantile,
        }
    }
}

/// Dataset location and partitioning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    /// Path to the JSON record file
    pub path: String,
    /// Year key of the reference partition
    pub reference_year: u8,
    /// Year key of the current partition
    pub current_year: u8,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            path: "data/bike-sharing.json".to_string(),
            reference_year: 0,
            current_year: 1,
        }
    }
}

/// Defaults for interactive drift simulation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationDefaults {
    pub feature: String,
    pub drift_type: DriftType,
    pub intensity: f64,
    pub seed: Option<u64>,
}

impl Default for SimulationDefaults {
    fn default() -> Self {
        Self {
            feature: "hum".to_string(),
            drift_type: DriftType::None,
            intensity: 0.15,
            seed: None,
        }
    }
}

/// Experiment runner settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExperimentsConfig {
    pub output_dir: String,
    /// Seed for the noise experiments
    pub seed: u64,
}

impl Default for ExperimentsConfig {
    fn default() -> Self {
        Self {
            output_dir: "experiments/output".to_string(),
            seed: 42,
        }
    }
}

impl Config {
    /// Load configuration from a YAML file, then apply environment overrides.
    ///
    /// A missing file is not an error: defaults are used instead.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut config = if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config = Self::from_yaml(&content)?;
            info!(path = %path.display(), "Configuration loaded");
            config
        } else {
            warn!(path = %path.display(), "Configuration file not found, using defaults");
            Self::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    /// Apply `DRIFTSCOPE_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(value) = env::var("DRIFTSCOPE_BIN_COUNT") {
            self.psi.bin_count = value.parse().map_err(|_| {
                Error::config(format!("Invalid value for DRIFTSCOPE_BIN_COUNT: {}", value))
            })?;
            debug!(bin_count = self.psi.bin_count, "Override from environment");
        }

        if let Ok(value) = env::var("DRIFTSCOPE_DATASET_PATH") {
            debug!(path = %value, "Override from environment");
            self.dataset.path = value;
        }

        if let Ok(value) = env::var("DRIFTSCOPE_SEED") {
            let seed = value.parse().map_err(|_| {
                Error::config(format!("Invalid value for DRIFTSCOPE_SEED: {}", value))
            })?;
            self.simulation.seed = Some(seed);
            self.experiments.seed = seed;
            debug!(seed, "Override from environment");
        }

        Ok(())
    }

    /// Check cross-field constraints
    pub fn validate(&self) -> Result<()> {
        if self.psi.bin_count == 0 {
            return Err(Error::config("psi.bin_count must be at least 1"));
        }

        self.simulation
            .drift_type
            .check_intensity(self.simulation.intensity)
            .map_err(|e| Error::config(format!("simulation.intensity: {}", e)))?;

        if self.dataset.reference_year == self.dataset.current_year {
            return Err(Error::config(
                "dataset.reference_year and dataset.current_year must differ",
            ));
        }

        Ok(())
    }
}
