//! Filesystem persistence for experiment results.
//!
//! Layout under the output directory:
//! - `raw/` holds one JSON file per result
//! - `combined_<timestamp>.json` holds a whole run
//! - `summary.md` holds the markdown table

use crate::result::ExperimentResult;
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default output directory for experiment results
pub const DEFAULT_OUTPUT_DIR: &str = "experiments/output";

/// Subdirectory for per-experiment JSON files
pub const RAW_SUBDIR: &str = "raw";

/// Summary markdown file name
pub const SUMMARY_FILE: &str = "summary.md";

/// Reads and writes experiment results under one output directory
#[derive(Debug, Clone)]
pub struct ExperimentIO {
    output_dir: PathBuf,
    raw_dir: PathBuf,
}

impl Default for ExperimentIO {
    fn default() -> Self {
        Self::new(DEFAULT_OUTPUT_DIR)
    }
}

impl ExperimentIO {
    /// Create a handler rooted at `output_dir`; nothing is created on disk yet
    pub fn new(output_dir: impl AsRef<Path>) -> Self {
        let output_dir = output_dir.as_ref().to_path_buf();
        let raw_dir = output_dir.join(RAW_SUBDIR);

        Self { output_dir, raw_dir }
    }

    /// Base output directory
    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory holding per-experiment JSON files
    pub fn raw_dir(&self) -> &Path {
        &self.raw_dir
    }

    /// Location of `summary.md`
    pub fn summary_path(&self) -> PathBuf {
        self.output_dir.join(SUMMARY_FILE)
    }

    /// Create the output and raw directories if missing
    pub fn ensure_directories(&self) -> Result<()> {
        fs::create_dir_all(&self.raw_dir)
            .with_context(|| format!("Failed to create output directory: {:?}", self.raw_dir))?;

        debug!(output_dir = ?self.output_dir, "Ensured experiment output directories exist");
        Ok(())
    }

    /// Write one result to `raw/<id>_<timestamp>.json`
    pub fn write_result(&self, result: &ExperimentResult) -> Result<PathBuf> {
        self.ensure_directories()?;

        let filename = format!(
            "{}_{}.json",
            result.experiment_id,
            result.timestamp.format("%Y%m%d_%H%M%S")
        );
        let path = self.raw_dir.join(filename);

        fs::write(&path, result.to_json()?)
            .with_context(|| format!("Failed to write result to {:?}", path))?;

        info!(path = ?path, "Wrote experiment result");
        Ok(path)
    }

    /// Write each result to its own file under `raw/`
    pub fn write_results(&self, results: &[ExperimentResult]) -> Result<Vec<PathBuf>> {
        results.iter().map(|r| self.write_result(r)).collect()
    }

    /// Write a whole run to a single JSON array
    pub fn write_combined_results(&self, results: &[ExperimentResult]) -> Result<PathBuf> {
        self.ensure_directories()?;

        let filename = format!("combined_{}.json", chrono::Utc::now().format("%Y%m%d_%H%M%S"));
        let path = self.output_dir.join(filename);

        let json = serde_json::to_string_pretty(results)?;
        fs::write(&path, json)
            .with_context(|| format!("Failed to write combined results to {:?}", path))?;

        info!(path = ?path, count = results.len(), "Wrote combined experiment results");
        Ok(path)
    }

    /// Read one result from a JSON file
    pub fn read_result(&self, path: impl AsRef<Path>) -> Result<ExperimentResult> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read result from {:?}", path))?;

        ExperimentResult::from_json(&content)
            .with_context(|| format!("Failed to parse result from {:?}", path))
    }

    /// Every parseable result in `raw/`, newest first
    pub fn read_all_results(&self) -> Result<Vec<ExperimentResult>> {
        let mut results = Vec::new();

        for path in self.raw_files()? {
            match self.read_result(&path) {
                Ok(result) => results.push(result),
                Err(e) => debug!(path = ?path, error = %e, "Skipping invalid result file"),
            }
        }

        results.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(results)
    }

    /// Write (or overwrite) `summary.md`
    pub fn write_summary(&self, content: &str) -> Result<PathBuf> {
        self.ensure_directories()?;

        let path = self.summary_path();
        fs::write(&path, content)
            .with_context(|| format!("Failed to write summary to {:?}", path))?;

        info!(path = ?path, "Wrote experiment summary");
        Ok(path)
    }

    /// Summary contents, or `None` if it has not been written
    pub fn read_summary(&self) -> Result<Option<String>> {
        let path = self.summary_path();
        if !path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read summary from {:?}", path))?;
        Ok(Some(content))
    }

    /// Delete every JSON file in `raw/`; returns the number removed
    pub fn clean_results(&self) -> Result<usize> {
        let files = self.raw_files()?;
        for path in &files {
            fs::remove_file(path).with_context(|| format!("Failed to remove {:?}", path))?;
        }

        info!(count = files.len(), "Cleaned experiment result files");
        Ok(files.len())
    }

    fn raw_files(&self) -> Result<Vec<PathBuf>> {
        if !self.raw_dir.exists() {
            return Ok(Vec::new());
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&self.raw_dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                files.push(path);
            }
        }
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::tempdir;

    #[test]
    fn test_directories_created() {
        let temp = tempdir().unwrap();
        let io = ExperimentIO::new(temp.path().join("experiments/output"));

        io.ensure_directories().unwrap();

        assert!(io.output_dir().exists());
        assert!(io.raw_dir().exists());
    }

    #[test]
    fn test_write_read_result() {
        let temp = tempdir().unwrap();
        let io = ExperimentIO::new(temp.path());

        let result = ExperimentResult::new("sudden_hum", json!({"psi": 0.27}));
        let path = io.write_result(&result).unwrap();
        assert!(path.starts_with(io.raw_dir()));

        let read = io.read_result(&path).unwrap();
        assert_eq!(read.experiment_id(), "sudden_hum");
        assert_eq!(read.psi(), Some(0.27));
    }

    #[test]
    fn test_read_all_skips_invalid_files() {
        let temp = tempdir().unwrap();
        let io = ExperimentIO::new(temp.path());

        io.write_result(&ExperimentResult::new("a", json!({}))).unwrap();
        fs::write(io.raw_dir().join("broken.json"), "not json").unwrap();
        fs::write(io.raw_dir().join("notes.txt"), "ignored").unwrap();

        let results = io.read_all_results().unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].experiment_id(), "a");
    }

    #[test]
    fn test_summary_round_trip() {
        let temp = tempdir().unwrap();
        let io = ExperimentIO::new(temp.path());

        assert!(io.read_summary().unwrap().is_none());

        let content = "# Drift Experiments\n";
        io.write_summary(content).unwrap();
        assert_eq!(io.read_summary().unwrap().as_deref(), Some(content));
    }

    #[test]
    fn test_combined_and_clean() {
        let temp = tempdir().unwrap();
        let io = ExperimentIO::new(temp.path());
        let results = vec![
            ExperimentResult::new("first", json!({"psi": 0.01})),
            ExperimentResult::new("second", json!({"psi": 0.02})),
        ];

        let combined = io.write_combined_results(&results).unwrap();
        let parsed: Vec<ExperimentResult> =
            serde_json::from_str(&fs::read_to_string(combined).unwrap()).unwrap();
        assert_eq!(parsed.len(), 2);

        io.write_results(&results).unwrap();
        assert_eq!(io.clean_results().unwrap(), 2);
        assert!(io.read_all_results().unwrap().is_empty());
    }

    #[test]
    fn test_clean_missing_directory() {
        let temp = tempdir().unwrap();
        let io = ExperimentIO::new(temp.path().join("absent"));
        assert_eq!(io.clean_results().unwrap(), 0);
    }
}
