//! Summary statistics for feature samples.

use crate::binning::clean_sample;
use driftscope_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// Arithmetic mean; 0.0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation; 0.0 for an empty slice
pub fn std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|v| (v - m).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Descriptive statistics of one cleaned sample
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStats {
    pub count: usize,
    pub mean: f64,
    /// Population standard deviation
    pub std: f64,
    pub min: f64,
    pub max: f64,
    /// Upper median: `sorted[n / 2]`
    pub median: f64,
}

impl FeatureStats {
    /// Summarize a sample after dropping missing values.
    ///
    /// # Errors
    /// `InvalidInput` if nothing remains after cleaning.
    pub fn from_sample(sample: &[f64]) -> Result<Self> {
        let mut sorted = clean_sample(sample);
        if sorted.is_empty() {
            return Err(Error::invalid_input("cannot summarize an empty sample"));
        }
        sorted.sort_by(f64::total_cmp);

        Ok(Self {
            count: sorted.len(),
            mean: mean(&sorted),
            std: std_dev(&sorted),
            min: sorted[0],
            max: sorted[sorted.len() - 1],
            median: sorted[sorted.len() / 2],
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_mean_and_std() {
        let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
        assert_abs_diff_eq!(mean(&values), 5.0);
        assert_abs_diff_eq!(std_dev(&values), 2.0);
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(std_dev(&[]), 0.0);
    }

    #[test]
    fn test_feature_stats() {
        let stats = FeatureStats::from_sample(&[0.4, 0.1, f64::NAN, 0.3, 0.2]).unwrap();

        assert_eq!(stats.count, 4);
        assert_abs_diff_eq!(stats.mean, 0.25);
        assert_eq!(stats.min, 0.1);
        assert_eq!(stats.max, 0.4);
        assert_eq!(stats.median, 0.3);
    }

    #[test]
    fn test_feature_stats_empty() {
        assert!(FeatureStats::from_sample(&[f64::NAN]).unwrap_err().is_invalid_input());
    }
}
