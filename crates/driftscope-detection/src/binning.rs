//! Quantile binning and histogram construction.
//!
//! Boundaries are derived from the reference sample only. Every histogram
//! interval is half-open `[lo, hi)` except the last, which is closed `[lo, hi]`
//! so the maximum value is always counted.

use driftscope_core::{
    types::{BinningMethod, HistogramBin},
    Error, Result,
};
use tracing::{debug, warn};

/// Default number of bins
pub const DEFAULT_BIN_COUNT: usize = 10;

/// Minimum number of distinct quantile boundaries before falling back to
/// equal-width bins. Kept at 3 for compatibility; the value is a heuristic.
pub const MIN_DISTINCT_BOUNDARIES: usize = 3;

/// Drop NaN and infinite entries.
///
/// Missing values are carried as NaN by the loaders, so this also removes them.
pub fn clean_sample(sample: &[f64]) -> Vec<f64> {
    sample.iter().copied().filter(|v| v.is_finite()).collect()
}

/// Derive bin boundaries from the quantiles of a reference sample.
///
/// Picks the value at sorted index `floor(i / bin_count * (n - 1))` for
/// `i in 0..=bin_count`, then drops duplicate boundaries. When fewer than
/// [`MIN_DISTINCT_BOUNDARIES`] remain, the quantiles are discarded and
/// `bin_count` equal-width bins spanning `[min, max]` are returned instead.
///
/// For a constant sample the fallback spans `[v, v]` and yields `bin_count + 1`
/// copies of `v`; callers widening the outer edges (as `compute_psi` does)
/// still get a usable partition.
///
/// # Errors
/// `InvalidInput` if the sample is empty, contains a non-finite value, or
/// `bin_count` is zero.
pub fn derive_quantile_boundaries(reference: &[f64], bin_count: usize) -> Result<Vec<f64>> {
    let sorted = sorted_reference(reference, bin_count)?;

    let last = (sorted.len() - 1) as f64;
    let mut boundaries: Vec<f64> = (0..=bin_count)
        .map(|i| {
            let idx = ((i as f64 / bin_count as f64) * last).floor() as usize;
            sorted[idx]
        })
        .collect();

    // Candidates come from a sorted sample, so duplicates are adjacent
    boundaries.dedup();

    if boundaries.len() < MIN_DISTINCT_BOUNDARIES {
        let min = sorted[0];
        let max = sorted[sorted.len() - 1];
        warn!(
            distinct = boundaries.len(),
            bin_count, min, max, "Degenerate quantile boundaries, falling back to equal-width bins"
        );
        return Ok(equal_width_boundaries(min, max, bin_count));
    }

    debug!(
        samples = sorted.len(),
        bin_count,
        boundaries = boundaries.len(),
        "Derived quantile boundaries"
    );

    Ok(boundaries)
}

/// Derive boundaries with the chosen method.
///
/// `EqualWidth` spans `[min, max]` of the reference sample. Both methods share
/// the input checks of [`derive_quantile_boundaries`].
pub fn derive_boundaries(
    reference: &[f64],
    bin_count: usize,
    method: BinningMethod,
) -> Result<Vec<f64>> {
    match method {
        BinningMethod::Quantile => derive_quantile_boundaries(reference, bin_count),
        BinningMethod::EqualWidth => {
            let sorted = sorted_reference(reference, bin_count)?;
            Ok(equal_width_boundaries(
                sorted[0],
                sorted[sorted.len() - 1],
                bin_count,
            ))
        }
    }
}

fn sorted_reference(reference: &[f64], bin_count: usize) -> Result<Vec<f64>> {
    if reference.is_empty() {
        return Err(Error::invalid_input("reference sample is empty"));
    }
    if bin_count == 0 {
        return Err(Error::invalid_input("bin count must be at least 1"));
    }
    if reference.iter().any(|v| !v.is_finite()) {
        return Err(Error::invalid_input(
            "reference sample contains non-finite values; clean it first",
        ));
    }

    let mut sorted = reference.to_vec();
    sorted.sort_by(f64::total_cmp);
    Ok(sorted)
}

/// `bin_count + 1` evenly spaced boundaries from `min` to `max`
pub fn equal_width_boundaries(min: f64, max: f64, bin_count: usize) -> Vec<f64> {
    let step = (max - min) / bin_count as f64;
    (0..=bin_count).map(|i| min + i as f64 * step).collect()
}

/// Count a sample into the intervals defined by `boundaries`.
///
/// # Errors
/// `InvalidInput` if the sample is empty or fewer than two boundaries are given.
pub fn assign_to_histogram(sample: &[f64], boundaries: &[f64]) -> Result<Vec<HistogramBin>> {
    if sample.is_empty() {
        return Err(Error::invalid_input("cannot build a histogram of an empty sample"));
    }
    if boundaries.len() < 2 {
        return Err(Error::invalid_input(format!(
            "at least 2 boundaries are required, got {}",
            boundaries.len()
        )));
    }

    let total = sample.len() as f64;
    let last_pair = boundaries.len() - 2;

    let bins = boundaries
        .windows(2)
        .enumerate()
        .map(|(i, edges)| {
            let (lo, hi) = (edges[0], edges[1]);
            let count = sample
                .iter()
                .filter(|&&v| v >= lo && if i == last_pair { v <= hi } else { v < hi })
                .count();

            HistogramBin {
                lower_edge: lo,
                upper_edge: hi,
                count,
                proportion: count as f64 / total,
            }
        })
        .collect();

    Ok(bins)
}
