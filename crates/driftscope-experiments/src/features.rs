//! PSI across several features of a year split.

use driftscope_core::{
    types::{BinningMethod, PsiResult},
    Result,
};
use driftscope_detection::detectors::psi::compute_feature_psi_with;
use driftscope_ingestion::{Feature, YearSplit};
use std::collections::BTreeMap;
use tracing::debug;

/// Score each feature of `split`, reference partition against current.
///
/// Duplicate features are scored once. The first failing feature aborts the
/// whole computation.
pub fn compute_features_psi(
    split: &YearSplit<'_>,
    features: &[Feature],
    bin_count: usize,
    method: BinningMethod,
) -> Result<BTreeMap<Feature, PsiResult>> {
    let mut results = BTreeMap::new();

    for &feature in features {
        if results.contains_key(&feature) {
            continue;
        }
        let (reference, current) = split.feature_samples(feature);
        let result =
            compute_feature_psi_with(&reference, &current, feature.as_str(), bin_count, method)?;
        debug!(feature = %feature, psi = result.psi_value, "Scored feature");
        results.insert(feature, result);
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::synthetic_dataset;
    use driftscope_core::types::StatusTier;

    #[test]
    fn test_numeric_features_are_stable() {
        let dataset = synthetic_dataset();
        let split = dataset.split_by_year(0, 1).unwrap();

        let results =
            compute_features_psi(&split, &Feature::numeric(), 10, BinningMethod::Quantile).unwrap();

        let keys: Vec<Feature> = results.keys().copied().collect();
        assert_eq!(
            keys,
            vec![Feature::Temp, Feature::Atemp, Feature::Hum, Feature::Windspeed]
        );
        for result in results.values() {
            assert_eq!(result.status, StatusTier::Stable);
            assert_eq!(result.reference_samples, 480);
        }
    }

    #[test]
    fn test_duplicates_scored_once() {
        let dataset = synthetic_dataset();
        let split = dataset.split_by_year(0, 1).unwrap();

        let results = compute_features_psi(
            &split,
            &[Feature::Cnt, Feature::Hum, Feature::Cnt],
            5,
            BinningMethod::EqualWidth,
        )
        .unwrap();

        assert_eq!(results.len(), 2);
        assert_eq!(results[&Feature::Cnt].feature_id, "cnt");
        assert_eq!(results[&Feature::Cnt].bin_count(), 5);
    }

    #[test]
    fn test_zero_bins_fails() {
        let dataset = synthetic_dataset();
        let split = dataset.split_by_year(0, 1).unwrap();

        let err = compute_features_psi(&split, &[Feature::Temp], 0, BinningMethod::Quantile)
            .unwrap_err();
        assert!(err.is_invalid_input());
    }
}
