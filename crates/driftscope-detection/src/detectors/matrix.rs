//! Detection matrix relating PSI alarms to model performance.
//!
//! ```text
//!                   performance ok     performance degraded
//! PSI stable        AllGood            SilentFailure
//! PSI drifted       FalseAlarm         TruePositive
//! ```

use driftscope_core::types::{PsiResult, StatusTier};
use serde::{Deserialize, Serialize};

/// One cell of the detection matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetectionOutcome {
    AllGood,
    SilentFailure,
    FalseAlarm,
    TruePositive,
}

impl DetectionOutcome {
    /// Place a (PSI alarm, performance degradation) pair in the matrix
    pub fn classify(psi_drifted: bool, performance_degraded: bool) -> Self {
        match (psi_drifted, performance_degraded) {
            (false, false) => DetectionOutcome::AllGood,
            (false, true) => DetectionOutcome::SilentFailure,
            (true, false) => DetectionOutcome::FalseAlarm,
            (true, true) => DetectionOutcome::TruePositive,
        }
    }

    /// Place a status tier in the matrix; any non-stable tier counts as an alarm
    pub fn from_status(status: StatusTier, performance_degraded: bool) -> Self {
        Self::classify(status.is_drifted(), performance_degraded)
    }

    pub fn from_result(result: &PsiResult, performance_degraded: bool) -> Self {
        Self::from_status(result.status, performance_degraded)
    }

    pub fn label(&self) -> &'static str {
        match self {
            DetectionOutcome::AllGood => "All good",
            DetectionOutcome::SilentFailure => "Silent failure",
            DetectionOutcome::FalseAlarm => "False alarm",
            DetectionOutcome::TruePositive => "True positive",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            DetectionOutcome::AllGood => "No feature drift, model performs well.",
            DetectionOutcome::SilentFailure => {
                "Model degraded but PSI missed it. Concept drift."
            }
            DetectionOutcome::FalseAlarm => "PSI flagged drift but model still works.",
            DetectionOutcome::TruePositive => "PSI correctly caught drift that matters.",
        }
    }

    /// Whether the PSI signal agreed with the performance signal
    pub fn is_correct(&self) -> bool {
        matches!(
            self,
            DetectionOutcome::AllGood | DetectionOutcome::TruePositive
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_quadrants() {
        assert_eq!(DetectionOutcome::classify(false, false), DetectionOutcome::AllGood);
        assert_eq!(DetectionOutcome::classify(false, true), DetectionOutcome::SilentFailure);
        assert_eq!(DetectionOutcome::classify(true, false), DetectionOutcome::FalseAlarm);
        assert_eq!(DetectionOutcome::classify(true, true), DetectionOutcome::TruePositive);
    }

    #[test]
    fn test_moderate_counts_as_alarm() {
        let outcome = DetectionOutcome::from_status(StatusTier::Moderate, false);
        assert_eq!(outcome, DetectionOutcome::FalseAlarm);
        assert!(!outcome.is_correct());
        assert_eq!(outcome.label(), "False alarm");
    }
}
