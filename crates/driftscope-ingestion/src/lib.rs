//! # Driftscope Ingestion
//!
//! Data access for the drift engine. Loads the hourly bike-sharing record
//! collection, partitions it by year, and extracts plain numeric feature
//! samples for the detection crate.
//!
//! Missing feature values are surfaced as NaN so the PSI engine's cleaning
//! step removes them.

#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

pub mod adapters;
pub mod dataset;
pub mod records;

pub use adapters::{DatasetSource, InMemorySource, JsonFileSource};
pub use dataset::{Dataset, YearSplit};
pub use records::{BikeRecord, Feature};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::adapters::{DatasetSource, InMemorySource, JsonFileSource};
    pub use crate::dataset::{
        extract_feature, group_by_week, sample_records, weekly_averages, Dataset, WeeklyAverage,
        YearSplit,
    };
    pub use crate::records::{BikeRecord, Feature};
}
