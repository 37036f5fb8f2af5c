//! Drift simulation driver.
//!
//! Takes an externally owned [`SimulationConfig`] (feature, drift type,
//! intensity, seed), perturbs the current sample accordingly and scores it
//! against the reference. Nothing is retained between calls.

use crate::{
    binning::DEFAULT_BIN_COUNT,
    detectors::psi::compute_feature_psi,
    injection::{inject_gradual_drift, inject_noise_with, inject_sudden_shift},
    stats::FeatureStats,
};
use driftscope_core::{
    config::SimulationDefaults,
    types::{DriftType, PsiResult},
    Error, Result,
};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Caller-owned simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// Feature identifier attached to the result
    pub feature: String,
    pub drift_type: DriftType,
    /// Bias for gradual/sudden drift, standard deviation for noise
    pub intensity: f64,
    pub bin_count: usize,
    /// Seed for noise; `None` draws from the thread RNG
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self::from_defaults(&SimulationDefaults::default(), DEFAULT_BIN_COUNT)
    }
}

impl SimulationConfig {
    /// Build from the `simulation` section of the configuration file
    pub fn from_defaults(defaults: &SimulationDefaults, bin_count: usize) -> Self {
        Self {
            feature: defaults.feature.clone(),
            drift_type: defaults.drift_type,
            intensity: defaults.intensity,
            bin_count,
            seed: defaults.seed,
        }
    }

    pub fn with_drift(mut self, drift_type: DriftType, intensity: f64) -> Self {
        self.drift_type = drift_type;
        self.intensity = intensity;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Whether applying this config changes the data at all
    pub fn injects_drift(&self) -> bool {
        self.drift_type != DriftType::None && self.intensity != 0.0
    }

    /// Check the settings before any data is touched.
    ///
    /// Gradual and sudden drift accept a negative bias; noise needs a
    /// non-negative standard deviation.
    ///
    /// # Errors
    /// `InvalidInput` on an empty feature, zero bins, a non-finite intensity
    /// or a negative noise intensity.
    pub fn validate(&self) -> Result<()> {
        if self.feature.is_empty() {
            return Err(Error::invalid_input("simulation feature must not be empty"));
        }
        if self.bin_count == 0 {
            return Err(Error::invalid_input("bin count must be at least 1"));
        }
        self.drift_type.check_intensity(self.intensity)
    }
}

/// Result of one simulation step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationOutcome {
    /// Current sample after drift injection
    pub drifted: Vec<f64>,
    pub result: PsiResult,
    pub reference_stats: FeatureStats,
    pub current_stats: FeatureStats,
}

/// Apply the configured drift to `data`.
///
/// Gradual drift ramps from the first element; sudden drift starts at the
/// midpoint (`len / 2`); noise uses `intensity` as its standard deviation.
pub fn apply_drift(data: &[f64], config: &SimulationConfig) -> Result<Vec<f64>> {
    match config.seed {
        Some(seed) => apply_drift_with(data, config, &mut StdRng::seed_from_u64(seed)),
        None => apply_drift_with(data, config, &mut rand::rng()),
    }
}

/// Apply the configured drift, drawing noise from `rng`
pub fn apply_drift_with<R: Rng>(
    data: &[f64],
    config: &SimulationConfig,
    rng: &mut R,
) -> Result<Vec<f64>> {
    match config.drift_type {
        DriftType::None => Ok(data.to_vec()),
        DriftType::Gradual => inject_gradual_drift(data, config.intensity, 0),
        DriftType::Sudden => inject_sudden_shift(data, config.intensity, data.len() / 2),
        DriftType::Noise => inject_noise_with(data, config.intensity, rng),
    }
}

/// Perturb `current` per `config` and score it against `reference`.
pub fn simulate(
    reference: &[f64],
    current: &[f64],
    config: &SimulationConfig,
) -> Result<SimulationOutcome> {
    config.validate()?;

    let drifted = apply_drift(current, config)?;
    let result = compute_feature_psi(reference, &drifted, &config.feature, config.bin_count)?;
    let reference_stats = FeatureStats::from_sample(reference)?;
    let current_stats = FeatureStats::from_sample(&drifted)?;

    info!(
        feature = %config.feature,
        drift_type = %config.drift_type,
        intensity = config.intensity,
        psi = result.psi_value,
        status = %result.status,
        "Simulation complete"
    );

    Ok(SimulationOutcome {
        drifted,
        result,
        reference_stats,
        current_stats,
    })
}
