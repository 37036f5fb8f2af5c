//! Population Stability Index (PSI) engine.
//!
//! Compares a current sample against a reference sample over a shared set of
//! quantile bins derived from the reference:
//!
//! ```text
//! PSI = Σ (cur_i - ref_i) * ln(cur_i / ref_i)
//! ```
//!
//! # Interpretation
//! - PSI < 0.1: No significant shift (stable)
//! - PSI 0.1-0.2: Moderate shift, investigation recommended
//! - PSI >= 0.2: Significant shift, action required

use super::classify_status;
use crate::binning::{assign_to_histogram, clean_sample, derive_boundaries};
use driftscope_core::{
    types::{BinningMethod, HistogramBin, PsiResult},
    Error, Result,
};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Outward offset applied to the first and last boundary
pub const BOUNDARY_EPSILON: f64 = 1e-10;

/// Floor applied to every bin proportion before taking the log ratio
pub const PROPORTION_FLOOR: f64 = 1e-10;

/// Full output of a PSI computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PsiComputation {
    /// PSI score. Near-zero-or-positive; floating-point error may leave
    /// identical distributions marginally below zero.
    pub psi: f64,
    /// Histogram of the cleaned reference sample
    pub reference_histogram: Vec<HistogramBin>,
    /// Histogram of the cleaned current sample
    pub current_histogram: Vec<HistogramBin>,
    /// Widened boundaries shared by both histograms
    pub boundaries: Vec<f64>,
}

impl PsiComputation {
    pub fn reference_proportions(&self) -> Vec<f64> {
        self.reference_histogram.iter().map(|b| b.proportion).collect()
    }

    pub fn current_proportions(&self) -> Vec<f64> {
        self.current_histogram.iter().map(|b| b.proportion).collect()
    }

    pub fn reference_samples(&self) -> usize {
        self.reference_histogram.iter().map(|b| b.count).sum()
    }

    pub fn current_samples(&self) -> usize {
        self.current_histogram.iter().map(|b| b.count).sum()
    }
}

/// Compute the PSI between a reference and a current sample.
///
/// Both samples are cleaned of NaN/infinite entries first. Boundaries come
/// from the reference quantiles, then the outer edges are pushed out to the
/// global minimum and maximum of both samples (minus/plus
/// [`BOUNDARY_EPSILON`]) so every value lands in exactly one bin. A current
/// sample far outside the reference range piles into the outer bins and
/// inflates the score; that is expected.
///
/// # Errors
/// `InvalidInput` if either sample is empty after cleaning or `bin_count` is 0.
pub fn compute_psi(reference: &[f64], current: &[f64], bin_count: usize) -> Result<PsiComputation> {
    compute_psi_with(reference, current, bin_count, BinningMethod::Quantile)
}

/// [`compute_psi`] with an explicit binning method
pub fn compute_psi_with(
    reference: &[f64],
    current: &[f64],
    bin_count: usize,
    method: BinningMethod,
) -> Result<PsiComputation> {
    let reference = clean_sample(reference);
    let current = clean_sample(current);

    if reference.is_empty() {
        metrics::counter!("driftscope_psi_invalid_input_total", "reason" => "empty_reference")
            .increment(1);
        return Err(Error::invalid_input(
            "reference sample is empty after removing missing values",
        ));
    }
    if current.is_empty() {
        metrics::counter!("driftscope_psi_invalid_input_total", "reason" => "empty_current")
            .increment(1);
        return Err(Error::invalid_input(
            "current sample is empty after removing missing values",
        ));
    }

    let mut boundaries = derive_boundaries(&reference, bin_count, method)?;

    let (global_min, global_max) = reference
        .iter()
        .chain(current.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
            (lo.min(v), hi.max(v))
        });

    let last = boundaries.len() - 1;
    boundaries[0] = global_min - BOUNDARY_EPSILON;
    boundaries[last] = global_max + BOUNDARY_EPSILON;

    let reference_histogram = assign_to_histogram(&reference, &boundaries)?;
    let current_histogram = assign_to_histogram(&current, &boundaries)?;

    let psi: f64 = reference_histogram
        .iter()
        .zip(current_histogram.iter())
        .map(|(r, c)| {
            let ref_pct = r.proportion.max(PROPORTION_FLOOR);
            let cur_pct = c.proportion.max(PROPORTION_FLOOR);
            (cur_pct - ref_pct) * (cur_pct / ref_pct).ln()
        })
        .sum();

    debug!(
        psi,
        method = %method,
        bins = reference_histogram.len(),
        reference_samples = reference.len(),
        current_samples = current.len(),
        "Computed PSI"
    );
    metrics::histogram!("driftscope_psi_value").record(psi);

    Ok(PsiComputation {
        psi,
        reference_histogram,
        current_histogram,
        boundaries,
    })
}

/// Compute the PSI for one feature and classify it.
pub fn compute_feature_psi(
    reference: &[f64],
    current: &[f64],
    feature_id: &str,
    bin_count: usize,
) -> Result<PsiResult> {
    compute_feature_psi_with(reference, current, feature_id, bin_count, BinningMethod::Quantile)
}

/// [`compute_feature_psi`] with an explicit binning method
pub fn compute_feature_psi_with(
    reference: &[f64],
    current: &[f64],
    feature_id: &str,
    bin_count: usize,
    method: BinningMethod,
) -> Result<PsiResult> {
    let computation = compute_psi_with(reference, current, bin_count, method)?;
    let status = classify_status(computation.psi);

    metrics::counter!(
        "driftscope_psi_computations_total",
        "status" => status.as_str()
    )
    .increment(1);

    Ok(PsiResult {
        feature_id: feature_id.to_string(),
        psi_value: computation.psi,
        status,
        reference_proportions: computation.reference_proportions(),
        current_proportions: computation.current_proportions(),
        reference_samples: computation.reference_samples(),
        current_samples: computation.current_samples(),
        bin_boundaries: computation.boundaries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::binning::DEFAULT_BIN_COUNT;
    use crate::injection::inject_sudden_shift;
    use approx::assert_abs_diff_eq;
    use driftscope_core::types::StatusTier;
    use proptest::prelude::*;

    fn ramp(n: usize, offset: f64, step: f64) -> Vec<f64> {
        (0..n).map(|i| offset + i as f64 * step).collect()
    }

    #[test]
    fn test_psi_identical_samples() {
        let reference = ramp(200, 0.0, 0.005);
        let result = compute_psi(&reference, &reference, DEFAULT_BIN_COUNT).unwrap();

        assert_abs_diff_eq!(result.psi, 0.0, epsilon = 1e-12);
        assert_eq!(result.reference_proportions(), result.current_proportions());
    }

    #[test]
    fn test_psi_no_drift() {
        let reference = ramp(100, 100.0, 0.1);
        let current = ramp(50, 100.0, 0.2);

        let result = compute_psi(&reference, &current, DEFAULT_BIN_COUNT).unwrap();
        assert!(result.psi < 0.1, "PSI should be low for similar distributions");
    }

    #[test]
    fn test_psi_with_drift() {
        let reference = ramp(100, 100.0, 0.1);
        let current = ramp(50, 200.0, 0.1);

        let result = compute_psi(&reference, &current, DEFAULT_BIN_COUNT).unwrap();
        assert!(result.psi > 0.2, "PSI should be high for disjoint distributions");
        assert_eq!(classify_status(result.psi), StatusTier::Significant);
    }

    #[test]
    fn test_boundaries_widened_to_both_samples() {
        let reference = ramp(20, 0.4, 0.01);
        let current = vec![0.0, 0.5, 1.0];

        let result = compute_psi(&reference, &current, 4).unwrap();
        let last = result.boundaries.len() - 1;

        assert_abs_diff_eq!(result.boundaries[0], -BOUNDARY_EPSILON);
        assert_abs_diff_eq!(result.boundaries[last], 1.0 + BOUNDARY_EPSILON);
        assert_eq!(result.current_samples(), 3);
        assert_eq!(result.reference_samples(), 20);
    }

    #[test]
    fn test_psi_cleans_missing_values() {
        let reference = vec![0.1, 0.2, f64::NAN, 0.3, 0.4, 0.5];
        let current = vec![0.1, 0.2, 0.3, f64::NAN, 0.4, 0.5];

        let result = compute_psi(&reference, &current, 5).unwrap();
        assert_eq!(result.reference_samples(), 5);
        assert_abs_diff_eq!(result.psi, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_psi_empty_after_cleaning_is_invalid() {
        let err = compute_psi(&[f64::NAN], &[0.5], 10).unwrap_err();
        assert!(err.is_invalid_input());

        let err = compute_psi(&[0.5, 0.6], &[], 10).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn test_psi_zero_bins_is_invalid() {
        assert!(compute_psi(&[0.1, 0.2], &[0.1], 0).unwrap_err().is_invalid_input());
    }

    #[test]
    fn test_psi_constant_reference() {
        let reference = vec![5.0; 4];
        let result = compute_psi(&reference, &reference, 10).unwrap();

        assert_abs_diff_eq!(result.psi, 0.0, epsilon = 1e-12);
        let total: f64 = result.reference_proportions().iter().sum();
        assert_abs_diff_eq!(total, 1.0);
    }

    #[test]
    fn test_zero_bias_shift_matches_identity() {
        let reference: Vec<f64> = (0..100).map(|i| (i as f64 * 0.37) % 1.0).collect();
        let shifted = inject_sudden_shift(&reference, 0.0, 40).unwrap();

        let identity = compute_psi(&reference, &reference, 10).unwrap();
        let round_trip = compute_psi(&reference, &shifted, 10).unwrap();

        assert_eq!(identity, round_trip);
        assert_abs_diff_eq!(round_trip.psi, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_feature_psi_tags_result() {
        let reference = ramp(100, 0.0, 0.01);
        let current = ramp(100, 0.5, 0.005);

        let result = compute_feature_psi(&reference, &current, "hum", 10).unwrap();

        assert_eq!(result.feature_id, "hum");
        assert_eq!(result.status, classify_status(result.psi_value));
        assert_eq!(result.bin_count(), result.bin_boundaries.len() - 1);
        assert_eq!(result.reference_samples, 100);
        assert_eq!(result.current_samples, 100);
    }

    #[test]
    fn test_equal_width_psi_uses_reference_range() {
        let reference = vec![0.0, 0.1, 0.1, 0.1, 0.2, 1.0];
        let current = vec![0.6, 0.7, 0.8];

        let result = compute_psi_with(&reference, &current, 4, BinningMethod::EqualWidth).unwrap();

        assert_eq!(result.boundaries.len(), 5);
        assert_abs_diff_eq!(result.boundaries[2], 0.5);
        assert_eq!(result.reference_samples(), 6);
        assert_eq!(result.current_samples(), 3);
        // Current sits in the two upper bins, the reference mostly in the first
        let current_props = result.current_proportions();
        assert_abs_diff_eq!(current_props[0] + current_props[1], 0.0);
        assert!(result.psi > 0.2);
    }

    #[test]
    fn test_quantile_is_default_method() {
        let reference = ramp(50, 0.0, 0.02);
        let current = ramp(50, 0.1, 0.015);

        let default = compute_psi(&reference, &current, 10).unwrap();
        let explicit = compute_psi_with(&reference, &current, 10, BinningMethod::Quantile).unwrap();
        assert_eq!(default, explicit);

        let feature = compute_feature_psi_with(
            &reference,
            &current,
            "temp",
            10,
            BinningMethod::EqualWidth,
        )
        .unwrap();
        assert_eq!(feature.bin_count(), 10);
    }

    proptest! {
        #[test]
        fn prop_psi_non_negative(
            reference in prop::collection::vec(0.0f64..1.0, 1..200),
            current in prop::collection::vec(0.0f64..1.0, 1..200),
            bin_count in 1usize..20,
        ) {
            let result = compute_psi(&reference, &current, bin_count).unwrap();
            prop_assert!(result.psi >= -1e-12);
        }

        #[test]
        fn prop_psi_identical_is_zero(
            sample in prop::collection::vec(-50.0f64..50.0, 1..200),
        ) {
            let result = compute_psi(&sample, &sample, 10).unwrap();
            prop_assert!(result.psi.abs() < 1e-12);
        }
    }
}
