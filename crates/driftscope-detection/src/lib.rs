//! # Driftscope Detection
//!
//! Statistical drift detection between a reference and a current sample of a
//! single numeric feature.
//!
//! This crate provides:
//! - Quantile binning with an equal-width fallback (`binning`)
//! - Population Stability Index computation and status tiers (`detectors`)
//! - Synthetic drift injection: gradual, sudden, noise, masking (`injection`)
//! - Summary statistics (`stats`)
//! - A stateless simulation driver (`simulator`)
//!
//! Every operation is a pure function over in-memory slices. The only source
//! of non-determinism is the RNG used for noise injection, which callers may
//! supply themselves.

#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

pub mod binning;
pub mod detectors;
pub mod injection;
pub mod simulator;
pub mod stats;

/// Re-export commonly used items
pub mod prelude {
    pub use crate::binning::{
        assign_to_histogram, clean_sample, derive_boundaries, derive_quantile_boundaries,
        DEFAULT_BIN_COUNT,
    };
    pub use crate::detectors::{
        classify_status,
        matrix::DetectionOutcome,
        psi::{
            compute_feature_psi, compute_feature_psi_with, compute_psi, compute_psi_with,
            PsiComputation,
        },
        PSI_MODERATE_THRESHOLD, PSI_STABLE_THRESHOLD,
    };
    pub use crate::injection::{
        inject_gradual_drift, inject_noise, inject_noise_with, inject_sudden_shift, mask_feature,
    };
    pub use crate::simulator::{simulate, SimulationConfig, SimulationOutcome};
    pub use crate::stats::FeatureStats;
}
