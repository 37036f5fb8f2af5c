//! Dataset source backed by records already in memory.

use super::DatasetSource;
use crate::{dataset::Dataset, records::BikeRecord};
use driftscope_core::Result;

/// Serves a fixed set of records
#[derive(Debug, Clone, Default)]
pub struct InMemorySource {
    records: Vec<BikeRecord>,
}

impl InMemorySource {
    pub fn new(records: Vec<BikeRecord>) -> Self {
        Self { records }
    }
}

impl DatasetSource for InMemorySource {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load(&self) -> Result<Dataset> {
        Ok(Dataset::new(self.records.clone()))
    }
}
