//! Dataset source reading a JSON array of records.

use super::DatasetSource;
use crate::{dataset::Dataset, records::BikeRecord};
use driftscope_core::{Error, Result};
use std::path::{Path, PathBuf};
use tracing::info;

/// Loads records from a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse records from a JSON string
    pub fn parse(content: &str) -> Result<Dataset> {
        let records: Vec<BikeRecord> = serde_json::from_str(content)?;
        Ok(Dataset::new(records))
    }
}

impl DatasetSource for JsonFileSource {
    fn name(&self) -> &'static str {
        "json"
    }

    fn load(&self) -> Result<Dataset> {
        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            Error::dataset(format!("failed to read {}: {}", self.path.display(), e))
        })?;

        let dataset = Self::parse(&content)?;
        if dataset.is_empty() {
            return Err(Error::dataset(format!(
                "{} contains no records",
                self.path.display()
            )));
        }

        info!(
            source = self.name(),
            path = %self.path.display(),
            records = dataset.len(),
            "Dataset loaded"
        );
        Ok(dataset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const RECORDS: &str = r#"[
        {"instant": 1, "dteday": "2011-01-01", "yr": 0, "hum": 0.81, "temp": 0.24, "cnt": 16},
        {"instant": 2, "dteday": "2012-01-01", "yr": 1, "hum": null, "temp": 0.22, "cnt": 40}
    ]"#;

    #[test]
    fn test_load_json_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(RECORDS.as_bytes()).unwrap();

        let source = JsonFileSource::new(file.path());
        let dataset = source.load().unwrap();

        assert_eq!(dataset.len(), 2);
        assert_eq!(dataset.records()[1].hum, None);
    }

    #[test]
    fn test_load_missing_file() {
        let source = JsonFileSource::new("/nonexistent/records.json");
        assert!(matches!(source.load(), Err(Error::Dataset(_))));
    }

    #[test]
    fn test_load_empty_array() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[]").unwrap();
        assert!(matches!(
            JsonFileSource::new(file.path()).load(),
            Err(Error::Dataset(_))
        ));
    }

    #[test]
    fn test_parse_malformed() {
        assert!(matches!(
            JsonFileSource::parse("{not json"),
            Err(Error::Serialization(_))
        ));
    }
}
