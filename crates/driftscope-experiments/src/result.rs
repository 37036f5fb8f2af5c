//! Canonical result record for a drift experiment.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Outcome of one experiment run.
///
/// - `experiment_id`: identifier of the experiment that produced it
/// - `metrics`: JSON object with PSI scores, tiers and sample sizes
/// - `timestamp`: UTC time the experiment ran
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExperimentResult {
    pub experiment_id: String,
    pub metrics: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl ExperimentResult {
    /// Create a result stamped with the current UTC time
    pub fn new(experiment_id: impl Into<String>, metrics: serde_json::Value) -> Self {
        Self {
            experiment_id: experiment_id.into(),
            metrics,
            timestamp: Utc::now(),
        }
    }

    /// Identifier of the experiment that produced this result
    pub fn experiment_id(&self) -> &str {
        &self.experiment_id
    }

    /// Raw metrics object
    pub fn metrics(&self) -> &serde_json::Value {
        &self.metrics
    }

    /// PSI after drift injection, if recorded
    pub fn psi(&self) -> Option<f64> {
        self.metrics.get("psi").and_then(|v| v.as_f64())
    }

    /// Status tier after drift injection, if recorded
    pub fn status(&self) -> Option<&str> {
        self.metrics.get("status").and_then(|v| v.as_str())
    }

    /// Serialize to pretty-printed JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl std::fmt::Display for ExperimentResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "ExperimentResult {{ experiment_id: {}, timestamp: {}, metrics: {} }}",
            self.experiment_id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            self.metrics
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_result_accessors() {
        let result = ExperimentResult::new("sudden_hum", json!({"psi": 0.31, "status": "significant"}));

        assert_eq!(result.experiment_id(), "sudden_hum");
        assert_eq!(result.psi(), Some(0.31));
        assert_eq!(result.status(), Some("significant"));
        assert!(result.timestamp <= Utc::now());
    }

    #[test]
    fn test_result_json_round_trip() {
        let result = ExperimentResult::new("baseline_hum", json!({"psi": 0.01}));
        let parsed = ExperimentResult::from_json(&result.to_json().unwrap()).unwrap();

        assert_eq!(parsed.experiment_id(), "baseline_hum");
        assert_eq!(parsed.metrics(), result.metrics());
    }

    #[test]
    fn test_result_display() {
        let result = ExperimentResult::new("noise_windspeed", json!({"psi": 0.05}));
        let display = result.to_string();
        assert!(display.contains("noise_windspeed"));
        assert!(display.contains("0.05"));
    }
}
