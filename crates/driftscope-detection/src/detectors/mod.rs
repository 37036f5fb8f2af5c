//! Drift detectors and score classification.

pub mod matrix;
pub mod psi;

use driftscope_core::types::StatusTier;

/// PSI below this value is stable
pub const PSI_STABLE_THRESHOLD: f64 = 0.1;

/// PSI below this value (and at least [`PSI_STABLE_THRESHOLD`]) is moderate;
/// anything at or above it is significant
pub const PSI_MODERATE_THRESHOLD: f64 = 0.2;

/// Classify a PSI score into a status tier.
///
/// - stable: `psi < 0.1`
/// - moderate: `0.1 <= psi < 0.2`
/// - significant: `psi >= 0.2`
pub fn classify_status(psi: f64) -> StatusTier {
    if psi < PSI_STABLE_THRESHOLD {
        StatusTier::Stable
    } else if psi < PSI_MODERATE_THRESHOLD {
        StatusTier::Moderate
    } else {
        StatusTier::Significant
    }
}
