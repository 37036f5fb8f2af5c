//! # Driftscope Experiments
//!
//! Canned drift experiments over the bike-sharing dataset.
//!
//! - `ExperimentResult`: `experiment_id`, JSON `metrics` and a UTC `timestamp`
//! - `Experiment`: trait with `id()` and `run()`
//! - `all_experiments()`: the registry
//! - `run_all_experiments()`: runs the registry against one context
//! - `compute_features_psi()`: PSI of several features of a year split
//!
//! ## Output
//!
//! - `<output>/raw/` holds individual JSON results
//! - `<output>/summary.md` holds the generated table
//!
//! ```rust,ignore
//! use driftscope_experiments::{run_and_save_experiments, ExperimentContext};
//!
//! let ctx = ExperimentContext::new(dataset).with_seed(42);
//! let (results, summary) = run_and_save_experiments(&ctx, "experiments/output")?;
//! ```

#![warn(missing_debug_implementations, rust_2018_idioms, unreachable_pub)]

mod adapters;
mod features;
mod io;
mod markdown;
mod result;
#[cfg(test)]
mod test_support;

pub use adapters::{
    all_experiments, DriftInjectionExperiment, Experiment, ExperimentContext,
    MaskedHoursExperiment,
};
pub use features::compute_features_psi;
pub use io::{ExperimentIO, DEFAULT_OUTPUT_DIR, RAW_SUBDIR, SUMMARY_FILE};
pub use markdown::generate_summary;
pub use result::ExperimentResult;

use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Run every registered experiment against `ctx`.
///
/// Failed experiments are logged and skipped.
pub fn run_all_experiments(ctx: &ExperimentContext) -> Vec<ExperimentResult> {
    let experiments = all_experiments();
    info!(count = experiments.len(), "Starting experiment run");

    let mut results = Vec::with_capacity(experiments.len());

    for experiment in &experiments {
        debug!(experiment = experiment.id(), "Running experiment");

        match experiment.run(ctx) {
            Ok(result) => {
                info!(
                    experiment = %result.experiment_id,
                    psi = result.psi(),
                    status = result.status(),
                    "Experiment completed"
                );
                results.push(result);
            }
            Err(e) => {
                error!(experiment = experiment.id(), error = %e, "Experiment failed");
            }
        }
    }

    info!(
        succeeded = results.len(),
        total = experiments.len(),
        "Experiment run complete"
    );

    results
}

/// Run all experiments, write each result under `output_dir/raw` and write
/// the markdown summary. Returns the results and the summary path.
pub fn run_and_save_experiments(
    ctx: &ExperimentContext,
    output_dir: impl AsRef<Path>,
) -> anyhow::Result<(Vec<ExperimentResult>, PathBuf)> {
    let results = run_all_experiments(ctx);

    let io = ExperimentIO::new(output_dir);
    io.write_results(&results)?;

    let summary_path = io.write_summary(&generate_summary(&results))?;

    Ok((results, summary_path))
}

pub mod prelude {
    pub use super::adapters::{all_experiments, Experiment, ExperimentContext};
    pub use super::features::compute_features_psi;
    pub use super::io::ExperimentIO;
    pub use super::markdown::generate_summary;
    pub use super::result::ExperimentResult;
    pub use super::{run_all_experiments, run_and_save_experiments};
}
