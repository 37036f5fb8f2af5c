//! Partitioning and feature extraction over a record collection.

use crate::records::{BikeRecord, Feature};
use driftscope_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

/// An in-memory record collection
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<BikeRecord>,
}

/// Reference and current partitions of a dataset
#[derive(Debug, Clone)]
pub struct YearSplit<'a> {
    pub reference: Vec<&'a BikeRecord>,
    pub current: Vec<&'a BikeRecord>,
}

impl YearSplit<'_> {
    /// Extract one feature from both partitions
    pub fn feature_samples(&self, feature: Feature) -> (Vec<f64>, Vec<f64>) {
        (
            extract_feature(&self.reference, feature),
            extract_feature(&self.current, feature),
        )
    }
}

impl Dataset {
    pub fn new(records: Vec<BikeRecord>) -> Self {
        Self { records }
    }

    pub fn records(&self) -> &[BikeRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Group records by an arbitrary key, preserving record order within groups
    pub fn partition_by<K, F>(&self, key: F) -> BTreeMap<K, Vec<&BikeRecord>>
    where
        K: Ord,
        F: Fn(&BikeRecord) -> K,
    {
        let mut groups: BTreeMap<K, Vec<&BikeRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(key(record)).or_default().push(record);
        }
        groups
    }

    /// Split into reference and current partitions by year key.
    ///
    /// # Errors
    /// `Dataset` if either partition is empty.
    pub fn split_by_year(&self, reference_year: u8, current_year: u8) -> Result<YearSplit<'_>> {
        let mut groups = self.partition_by(|r| r.yr);
        let reference = groups.remove(&reference_year).unwrap_or_default();
        let current = groups.remove(&current_year).unwrap_or_default();

        if reference.is_empty() {
            return Err(Error::dataset(format!(
                "no records for reference year {}",
                reference_year
            )));
        }
        if current.is_empty() {
            return Err(Error::dataset(format!("no records for current year {}", current_year)));
        }

        debug!(
            reference_year,
            current_year,
            reference_records = reference.len(),
            current_records = current.len(),
            "Split dataset by year"
        );

        Ok(YearSplit { reference, current })
    }
}

/// Extract a feature as a numeric sample; missing values become NaN
pub fn extract_feature(records: &[&BikeRecord], feature: Feature) -> Vec<f64> {
    records
        .iter()
        .map(|r| feature.value(r).unwrap_or(f64::NAN))
        .collect()
}

/// Keep every `ceil(n / max_samples)`-th record when there are more than
/// `max_samples`
pub fn sample_records<'a>(records: &[&'a BikeRecord], max_samples: usize) -> Vec<&'a BikeRecord> {
    if max_samples == 0 || records.len() <= max_samples {
        return records.to_vec();
    }
    let step = records.len().div_ceil(max_samples);
    records.iter().step_by(step).copied().collect()
}

/// Group records into 7-day buckets; week 1 starts at the first record's date
pub fn group_by_week<'a>(records: &[&'a BikeRecord]) -> Result<BTreeMap<i64, Vec<&'a BikeRecord>>> {
    let mut weeks: BTreeMap<i64, Vec<&BikeRecord>> = BTreeMap::new();
    let Some(first) = records.first() else {
        return Ok(weeks);
    };
    let start = first.date()?;

    for record in records {
        let days = (record.date()? - start).num_days();
        weeks.entry(days.div_euclid(7) + 1).or_default().push(record);
    }

    Ok(weeks)
}

/// Average of one feature for a single week
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyAverage {
    pub week: i64,
    pub value: f64,
}

/// Per-week mean of a feature, sorted by week. Missing values are skipped;
/// a week with no values at all is omitted.
pub fn weekly_averages(records: &[&BikeRecord], feature: Feature) -> Result<Vec<WeeklyAverage>> {
    let averages = group_by_week(records)?
        .into_iter()
        .filter_map(|(week, group)| {
            let values: Vec<f64> = group.iter().filter_map(|r| feature.value(r)).collect();
            if values.is_empty() {
                return None;
            }
            let value = values.iter().sum::<f64>() / values.len() as f64;
            Some(WeeklyAverage { week, value })
        })
        .collect();

    Ok(averages)
}
