//! Experiment trait and the registry of canned experiments.
//!
//! Each experiment perturbs the current-year partition of one feature and
//! records how the PSI moves relative to the unperturbed baseline.

use crate::result::ExperimentResult;
use anyhow::Context;
use chrono::NaiveDate;
use driftscope_core::types::{DriftType, PsiResult};
use driftscope_detection::{
    binning::DEFAULT_BIN_COUNT,
    detectors::psi::compute_feature_psi,
    injection::mask_feature,
    simulator::{apply_drift, SimulationConfig},
};
use driftscope_ingestion::{
    dataset::{extract_feature, YearSplit},
    BikeRecord, Dataset, Feature,
};
use serde_json::json;
use std::ops::RangeInclusive;

/// Shared inputs for every experiment
#[derive(Debug, Clone)]
pub struct ExperimentContext {
    pub dataset: Dataset,
    pub reference_year: u8,
    pub current_year: u8,
    pub bin_count: usize,
    /// Seed for noise injection
    pub seed: u64,
}

impl ExperimentContext {
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset,
            reference_year: 0,
            current_year: 1,
            bin_count: DEFAULT_BIN_COUNT,
            seed: 42,
        }
    }

    pub fn with_years(mut self, reference_year: u8, current_year: u8) -> Self {
        self.reference_year = reference_year;
        self.current_year = current_year;
        self
    }

    pub fn with_bin_count(mut self, bin_count: usize) -> Self {
        self.bin_count = bin_count;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn split(&self) -> anyhow::Result<YearSplit<'_>> {
        self.dataset
            .split_by_year(self.reference_year, self.current_year)
            .context("Failed to split dataset by year")
    }
}

/// A drift experiment.
///
/// - `id()`: unique identifier
/// - `run()`: executes against a context and returns its metrics
pub trait Experiment: Send + Sync {
    fn id(&self) -> &str;

    fn run(&self, ctx: &ExperimentContext) -> anyhow::Result<ExperimentResult>;

    fn description(&self) -> &str {
        "No description available"
    }
}

/// Registry of all canned experiments
pub fn all_experiments() -> Vec<Box<dyn Experiment>> {
    vec![
        Box::new(DriftInjectionExperiment::new(Feature::Hum, DriftType::None, 0.0)),
        Box::new(DriftInjectionExperiment::new(Feature::Temp, DriftType::Gradual, 0.15)),
        Box::new(DriftInjectionExperiment::new(Feature::Hum, DriftType::Sudden, 0.15)),
        Box::new(DriftInjectionExperiment::new(Feature::Windspeed, DriftType::Noise, 0.1)),
        Box::new(MaskedHoursExperiment::morning_rush()),
    ]
}

fn metrics(
    feature: Feature,
    drift: &str,
    intensity: f64,
    baseline: &PsiResult,
    drifted: &PsiResult,
) -> serde_json::Value {
    json!({
        "feature": feature.as_str(),
        "drift_type": drift,
        "intensity": intensity,
        "baseline_psi": baseline.psi_value,
        "baseline_status": baseline.status.as_str(),
        "psi": drifted.psi_value,
        "status": drifted.status.as_str(),
        "delta_psi": drifted.psi_value - baseline.psi_value,
        "detected": drifted.status.is_drifted() && !baseline.status.is_drifted(),
        "bins": drifted.bin_count(),
        "reference_samples": drifted.reference_samples,
        "current_samples": drifted.current_samples,
    })
}

// ============================================================================
// Experiment Implementations
// ============================================================================

/// Injects one drift type into one feature
#[derive(Debug, Clone)]
pub struct DriftInjectionExperiment {
    id: String,
    description: String,
    feature: Feature,
    drift_type: DriftType,
    intensity: f64,
}

impl DriftInjectionExperiment {
    pub fn new(feature: Feature, drift_type: DriftType, intensity: f64) -> Self {
        let id = match drift_type {
            DriftType::None => format!("baseline_{}", feature),
            other => format!("{}_{}", other, feature),
        };
        let description = match drift_type {
            DriftType::None => format!("{} with no injected drift", feature.label()),
            other => format!("{} drift of {} on {}", other, intensity, feature.label()),
        };

        Self {
            id,
            description,
            feature,
            drift_type,
            intensity,
        }
    }
}

impl Experiment for DriftInjectionExperiment {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        &self.description
    }

    fn run(&self, ctx: &ExperimentContext) -> anyhow::Result<ExperimentResult> {
        self.feature.ensure_driftable(self.drift_type)?;

        let split = ctx.split()?;
        let (reference, current) = split.feature_samples(self.feature);
        let feature_id = self.feature.as_str();

        let baseline = compute_feature_psi(&reference, &current, feature_id, ctx.bin_count)
            .with_context(|| format!("Baseline PSI failed for {}", feature_id))?;

        let config = SimulationConfig {
            feature: feature_id.to_string(),
            drift_type: self.drift_type,
            intensity: self.intensity,
            bin_count: ctx.bin_count,
            seed: Some(ctx.seed),
        };
        let drifted = apply_drift(&current, &config)
            .with_context(|| format!("Drift injection failed for {}", self.id))?;
        let result = compute_feature_psi(&reference, &drifted, feature_id, ctx.bin_count)
            .with_context(|| format!("PSI failed for {}", self.id))?;

        Ok(ExperimentResult::new(
            self.id(),
            metrics(
                self.feature,
                self.drift_type.as_str(),
                self.intensity,
                &baseline,
                &result,
            ),
        ))
    }
}

/// Zeroes a feature for records whose hour falls in a range, optionally only
/// between two dates (both inclusive)
#[derive(Debug, Clone)]
pub struct MaskedHoursExperiment {
    id: String,
    feature: Feature,
    hours: RangeInclusive<u8>,
    dates: Option<RangeInclusive<NaiveDate>>,
}

impl MaskedHoursExperiment {
    pub fn new(feature: Feature, hours: RangeInclusive<u8>) -> Self {
        let id = format!("masked_{}_{}_{}", hours.start(), hours.end(), feature);
        Self {
            id,
            feature,
            hours,
            dates: None,
        }
    }

    /// Rentals zeroed during the 07:00-09:00 commute
    pub fn morning_rush() -> Self {
        Self {
            id: "masked_morning_cnt".to_string(),
            ..Self::new(Feature::Cnt, 7..=9)
        }
    }

    /// Restrict the mask to records dated within `dates`
    pub fn with_dates(mut self, dates: RangeInclusive<NaiveDate>) -> Self {
        self.id = format!(
            "{}_{}_{}",
            self.id,
            dates.start().format("%Y%m%d"),
            dates.end().format("%Y%m%d")
        );
        self.dates = Some(dates);
        self
    }

    fn mask(&self, records: &[&BikeRecord]) -> anyhow::Result<Vec<bool>> {
        records
            .iter()
            .map(|r| {
                if !self.hours.contains(&r.hr) {
                    return Ok(false);
                }
                match &self.dates {
                    Some(dates) => Ok(dates.contains(&r.date()?)),
                    None => Ok(true),
                }
            })
            .collect()
    }
}

impl Experiment for MaskedHoursExperiment {
    fn id(&self) -> &str {
        &self.id
    }

    fn description(&self) -> &str {
        "Feature zeroed for a range of hours in the current year"
    }

    fn run(&self, ctx: &ExperimentContext) -> anyhow::Result<ExperimentResult> {
        let split = ctx.split()?;
        let reference = extract_feature(&split.reference, self.feature);
        let current = extract_feature(&split.current, self.feature);
        let feature_id = self.feature.as_str();

        let baseline = compute_feature_psi(&reference, &current, feature_id, ctx.bin_count)
            .with_context(|| format!("Baseline PSI failed for {}", feature_id))?;

        let mask = self.mask(&split.current)?;
        let masked_records = mask.iter().filter(|&&m| m).count();
        let masked = mask_feature(&current, &mask)?;
        let result = compute_feature_psi(&reference, &masked, feature_id, ctx.bin_count)
            .with_context(|| format!("PSI failed for {}", self.id()))?;

        let mut values = metrics(self.feature, "mask", 0.0, &baseline, &result);
        values["masked_hours"] = json!([self.hours.start(), self.hours.end()]);
        values["masked_records"] = json!(masked_records);
        if let Some(dates) = &self.dates {
            values["masked_dates"] = json!([
                dates.start().to_string(),
                dates.end().to_string()
            ]);
        }

        Ok(ExperimentResult::new(self.id(), values))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::synthetic_dataset;

    #[test]
    fn test_registry_ids_unique() {
        let experiments = all_experiments();
        let mut ids: Vec<&str> = experiments.iter().map(|e| e.id()).collect();
        ids.sort_unstable();
        ids.dedup();

        assert_eq!(ids.len(), experiments.len());
        assert!(ids.contains(&"baseline_hum"));
        assert!(ids.contains(&"gradual_temp"));
        assert!(ids.contains(&"sudden_hum"));
        assert!(ids.contains(&"noise_windspeed"));
    }

    #[test]
    fn test_baseline_matches_drifted() {
        let ctx = ExperimentContext::new(synthetic_dataset());
        let experiment = DriftInjectionExperiment::new(Feature::Hum, DriftType::None, 0.0);

        let result = experiment.run(&ctx).unwrap();
        assert_eq!(result.metrics["psi"], result.metrics["baseline_psi"]);
        assert_eq!(result.metrics["detected"], false);
    }

    #[test]
    fn test_sudden_shift_raises_psi() {
        let ctx = ExperimentContext::new(synthetic_dataset());
        let experiment = DriftInjectionExperiment::new(Feature::Hum, DriftType::Sudden, 0.3);

        let result = experiment.run(&ctx).unwrap();
        let delta = result.metrics["delta_psi"].as_f64().unwrap();
        assert!(delta > 0.0);
        assert_eq!(result.status(), Some("significant"));
    }

    #[test]
    fn test_noise_experiment_is_seeded() {
        let ctx = ExperimentContext::new(synthetic_dataset()).with_seed(7);
        let experiment = DriftInjectionExperiment::new(Feature::Windspeed, DriftType::Noise, 0.1);

        let first = experiment.run(&ctx).unwrap();
        let second = experiment.run(&ctx).unwrap();
        assert_eq!(first.metrics, second.metrics);
    }

    #[test]
    fn test_masked_hours() {
        let ctx = ExperimentContext::new(synthetic_dataset());
        let result = MaskedHoursExperiment::morning_rush().run(&ctx).unwrap();

        assert_eq!(result.experiment_id(), "masked_morning_cnt");
        assert_eq!(result.metrics["masked_hours"], json!([7, 9]));
        assert!(result.psi().unwrap() > result.metrics["baseline_psi"].as_f64().unwrap());
    }

    #[test]
    fn test_masked_hours_date_window() {
        let ctx = ExperimentContext::new(synthetic_dataset());
        // Current-year fixture spans 2012-01-01..=2012-01-20, 24 records a day
        let start = NaiveDate::from_ymd_opt(2012, 1, 5).unwrap();
        let end = NaiveDate::from_ymd_opt(2012, 1, 6).unwrap();

        let whole_year = MaskedHoursExperiment::morning_rush().run(&ctx).unwrap();
        let experiment = MaskedHoursExperiment::morning_rush().with_dates(start..=end);
        let windowed = experiment.run(&ctx).unwrap();

        assert_eq!(experiment.id(), "masked_morning_cnt_20120105_20120106");
        assert_eq!(windowed.metrics["masked_records"], json!(6));
        assert_eq!(whole_year.metrics["masked_records"], json!(60));
        assert_eq!(windowed.metrics["masked_dates"], json!(["2012-01-05", "2012-01-06"]));
        assert!(windowed.psi().unwrap() < whole_year.psi().unwrap());
    }

    #[test]
    fn test_raw_feature_drift_rejected() {
        let ctx = ExperimentContext::new(synthetic_dataset());
        let experiment = DriftInjectionExperiment::new(Feature::Cnt, DriftType::Sudden, 0.0);
        assert!(experiment.run(&ctx).is_err());
    }

    #[test]
    fn test_missing_year_fails() {
        let ctx = ExperimentContext::new(synthetic_dataset()).with_years(0, 5);
        let experiment = DriftInjectionExperiment::new(Feature::Temp, DriftType::Gradual, 0.1);
        assert!(experiment.run(&ctx).is_err());
    }
}
