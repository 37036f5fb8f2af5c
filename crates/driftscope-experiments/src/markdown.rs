//! Markdown summary of an experiment run.

use crate::result::ExperimentResult;
use std::fmt::Write;

fn text<'a>(result: &'a ExperimentResult, key: &str) -> &'a str {
    result.metrics.get(key).and_then(|v| v.as_str()).unwrap_or("-")
}

fn number(result: &ExperimentResult, key: &str) -> String {
    result
        .metrics
        .get(key)
        .and_then(|v| v.as_f64())
        .map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}

/// Render a results table, one row per experiment
pub fn generate_summary(results: &[ExperimentResult]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "# Drift Experiment Summary");
    let _ = writeln!(out);
    let _ = writeln!(
        out,
        "Generated: {}",
        chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC")
    );
    let _ = writeln!(out);

    if results.is_empty() {
        let _ = writeln!(out, "No experiment results.");
        return out;
    }

    let detected = results
        .iter()
        .filter(|r| r.metrics.get("detected").and_then(|v| v.as_bool()) == Some(true))
        .count();
    let _ = writeln!(
        out,
        "{} experiments, {} with newly detected drift.",
        results.len(),
        detected
    );
    let _ = writeln!(out);

    let _ = writeln!(
        out,
        "| Experiment | Feature | Drift | Intensity | Baseline PSI | PSI | Status |"
    );
    let _ = writeln!(out, "|---|---|---|---|---|---|---|");

    for result in results {
        let _ = writeln!(
            out,
            "| {} | {} | {} | {} | {} | {} | {} |",
            result.experiment_id,
            text(result, "feature"),
            text(result, "drift_type"),
            number(result, "intensity"),
            number(result, "baseline_psi"),
            number(result, "psi"),
            text(result, "status"),
        );
    }

    out
}
