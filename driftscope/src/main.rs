//! Driftscope CLI
//!
//! - `psi`: score every numeric feature, reference year vs current year
//! - `simulate`: inject drift into one feature and score it
//! - `stats`: summary statistics for one feature
//! - `run`: canned experiments with results written to disk

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use driftscope_core::{
    config::{Config, DEFAULT_CONFIG_PATH},
    types::{BinningMethod, DriftType},
};
use driftscope_detection::prelude::*;
use driftscope_experiments::{
    compute_features_psi, generate_summary, run_all_experiments, ExperimentContext,
    ExperimentIO,
};
use driftscope_ingestion::prelude::*;
use std::path::{Path, PathBuf};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Driftscope CLI arguments
#[derive(Debug, Parser)]
#[clap(name = "driftscope", version, about = "PSI drift detection and drift simulation")]
struct Cli {
    /// Configuration file path
    #[clap(short, long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    config: PathBuf,

    /// Log level (trace, debug, info, warn, error)
    #[clap(long, env = "DRIFTSCOPE_LOG_LEVEL", default_value = "info", global = true)]
    log_level: String,

    /// Enable JSON logging
    #[clap(long, env = "DRIFTSCOPE_LOG_JSON", global = true)]
    log_json: bool,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// PSI of every numeric feature between the two years
    Psi {
        /// Dataset file (JSON); defaults to `dataset.path` from the config
        #[clap(long)]
        data: Option<PathBuf>,

        /// Number of bins
        #[clap(long)]
        bins: Option<usize>,

        /// Binning method (quantile, equal_width)
        #[clap(long)]
        method: Option<String>,

        /// Output results as JSON to stdout
        #[clap(long)]
        json: bool,
    },
    /// Inject drift into one feature of the current year and score it
    Simulate {
        #[clap(long)]
        data: Option<PathBuf>,

        /// Feature to perturb (temp, atemp, hum, windspeed)
        #[clap(long)]
        feature: Option<String>,

        /// Drift type (none, gradual, sudden, noise)
        #[clap(long)]
        drift: Option<String>,

        /// Bias for gradual/sudden, standard deviation for noise
        #[clap(long)]
        intensity: Option<f64>,

        /// Seed for noise injection
        #[clap(long)]
        seed: Option<u64>,

        #[clap(long)]
        json: bool,
    },
    /// Summary statistics of one feature for both years
    Stats {
        #[clap(long)]
        data: Option<PathBuf>,

        #[clap(long, default_value = "hum")]
        feature: String,
    },
    /// Run the canned experiments and write results
    Run {
        #[clap(long)]
        data: Option<PathBuf>,

        /// Output directory; defaults to `experiments.output_dir`
        #[clap(long)]
        output: Option<PathBuf>,

        /// Only print results, don't write to files
        #[clap(long)]
        dry_run: bool,

        #[clap(long)]
        json: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(&cli)?;

    info!("Starting driftscope v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::load(&cli.config).context("Failed to load configuration")?;

    match cli.command {
        Commands::Psi {
            data,
            bins,
            method,
            json,
        } => run_psi_command(&config, data, bins, method, json),
        Commands::Simulate {
            data,
            feature,
            drift,
            intensity,
            seed,
            json,
        } => {
            let overrides = SimulateArgs {
                feature,
                drift,
                intensity,
                seed,
            };
            run_simulate_command(&config, data, overrides, json)
        }
        Commands::Stats { data, feature } => run_stats_command(&config, data, &feature),
        Commands::Run {
            data,
            output,
            dry_run,
            json,
        } => run_experiments_command(&config, data, output, dry_run, json),
    }
}

fn load_dataset(config: &Config, data: Option<PathBuf>) -> Result<Dataset> {
    let path = data.unwrap_or_else(|| PathBuf::from(&config.dataset.path));
    JsonFileSource::new(&path)
        .load()
        .with_context(|| format!("Failed to load dataset from {}", path.display()))
}

fn split<'a>(config: &Config, dataset: &'a Dataset) -> Result<YearSplit<'a>> {
    dataset
        .split_by_year(config.dataset.reference_year, config.dataset.current_year)
        .context("Failed to split dataset by year")
}

fn run_psi_command(
    config: &Config,
    data: Option<PathBuf>,
    bins: Option<usize>,
    method: Option<String>,
    json_output: bool,
) -> Result<()> {
    let dataset = load_dataset(config, data)?;
    let split = split(config, &dataset)?;
    let bin_count = bins.unwrap_or(config.psi.bin_count);
    let method = match method {
        Some(method) => method.parse::<BinningMethod>()?,
        None => config.psi.method,
    };

    let results: Vec<_> = compute_features_psi(&split, &Feature::numeric(), bin_count, method)
        .context("PSI computation failed")?
        .into_values()
        .collect();

    if json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(60));
    println!(
        "PSI: year {} vs year {} ({} {} bins)",
        config.dataset.reference_year, config.dataset.current_year, bin_count, method
    );
    println!("{}", "=".repeat(60));
    println!("{:<15} {:>10} {:<14} {:>8} {:>8}", "Feature", "PSI", "Status", "Ref", "Cur");
    println!("{}", "-".repeat(60));
    for result in &results {
        println!(
            "{:<15} {:>10.4} {:<14} {:>8} {:>8}",
            result.feature_id,
            result.psi_value,
            result.status,
            result.reference_samples,
            result.current_samples
        );
    }
    println!("{}", "=".repeat(60));

    Ok(())
}

#[derive(Debug)]
struct SimulateArgs {
    feature: Option<String>,
    drift: Option<String>,
    intensity: Option<f64>,
    seed: Option<u64>,
}

/// Layer CLI overrides over the configured simulation defaults and check the
/// result before any data is loaded
fn simulation_config(config: &Config, args: SimulateArgs) -> Result<(SimulationConfig, Feature)> {
    let mut sim = SimulationConfig::from_defaults(&config.simulation, config.psi.bin_count);
    if let Some(feature) = args.feature {
        sim.feature = feature;
    }
    if let Some(drift) = args.drift {
        sim.drift_type = drift.parse::<DriftType>()?;
    }
    if let Some(intensity) = args.intensity {
        sim.intensity = intensity;
    }
    if let Some(seed) = args.seed {
        sim.seed = Some(seed);
    }

    let feature: Feature = sim.feature.parse()?;
    feature.ensure_driftable(sim.drift_type)?;
    sim.validate()?;

    Ok((sim, feature))
}

fn run_simulate_command(
    config: &Config,
    data: Option<PathBuf>,
    args: SimulateArgs,
    json_output: bool,
) -> Result<()> {
    let (sim, feature) = simulation_config(config, args)?;
    let dataset = load_dataset(config, data)?;
    let (reference, current) = split(config, &dataset)?.feature_samples(feature);

    let outcome = simulate(&reference, &current, &sim)?;
    let verdict = DetectionOutcome::from_result(&outcome.result, sim.injects_drift());

    if json_output {
        let output = serde_json::json!({
            "config": sim,
            "result": outcome.result,
            "reference_stats": outcome.reference_stats,
            "current_stats": outcome.current_stats,
            "outcome": verdict.label(),
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    println!("\n{}", "=".repeat(60));
    println!(
        "Simulation: {} drift of {} on {}",
        sim.drift_type,
        sim.intensity,
        feature.label()
    );
    println!("{}", "=".repeat(60));
    println!("PSI:      {:.4}", outcome.result.psi_value);
    println!("Status:   {}", outcome.result.status);
    println!(
        "Mean:     {:.4} -> {:.4}",
        outcome.reference_stats.mean, outcome.current_stats.mean
    );
    println!(
        "Std:      {:.4} -> {:.4}",
        outcome.reference_stats.std, outcome.current_stats.std
    );
    println!("Outcome:  {} ({})", verdict.label(), verdict.description());
    println!("{}", "=".repeat(60));

    Ok(())
}

fn run_stats_command(config: &Config, data: Option<PathBuf>, feature: &str) -> Result<()> {
    let feature: Feature = feature.parse()?;
    let dataset = load_dataset(config, data)?;
    let (reference, current) = split(config, &dataset)?.feature_samples(feature);

    let reference = FeatureStats::from_sample(&reference)?;
    let current = FeatureStats::from_sample(&current)?;

    println!("\n{}", feature.label());
    println!("{}", "-".repeat(48));
    println!("{:<10} {:>18} {:>18}", "", "Reference", "Current");
    for (name, r, c) in [
        ("count", reference.count as f64, current.count as f64),
        ("mean", reference.mean, current.mean),
        ("std", reference.std, current.std),
        ("min", reference.min, current.min),
        ("median", reference.median, current.median),
        ("max", reference.max, current.max),
    ] {
        println!("{:<10} {:>18.4} {:>18.4}", name, r, c);
    }

    Ok(())
}

fn run_experiments_command(
    config: &Config,
    data: Option<PathBuf>,
    output: Option<PathBuf>,
    dry_run: bool,
    json_output: bool,
) -> Result<()> {
    let dataset = load_dataset(config, data)?;
    let ctx = ExperimentContext::new(dataset)
        .with_years(config.dataset.reference_year, config.dataset.current_year)
        .with_bin_count(config.psi.bin_count)
        .with_seed(config.experiments.seed);

    let results = run_all_experiments(&ctx);
    info!("Completed {} experiments", results.len());

    if json_output {
        println!("{}", serde_json::to_string_pretty(&results)?);
    } else {
        print!("{}", generate_summary(&results));
    }

    if !dry_run {
        let output = output.unwrap_or_else(|| PathBuf::from(&config.experiments.output_dir));
        write_experiment_output(&output, &results)?;

        if !json_output {
            println!("\nResults written to: {}", output.display());
        }
    }

    Ok(())
}

fn write_experiment_output(
    output: &Path,
    results: &[driftscope_experiments::ExperimentResult],
) -> Result<()> {
    let io = ExperimentIO::new(output);
    io.write_results(results)?;
    io.write_combined_results(results)?;
    let summary_path = io.write_summary(&generate_summary(results))?;

    info!(output = %output.display(), summary = %summary_path.display(), "Results written");
    Ok(())
}

fn init_logging(cli: &Cli) -> Result<()> {
    let log_level = cli
        .log_level
        .parse::<tracing::Level>()
        .context("Invalid log level")?;

    let filter = tracing_subscriber::EnvFilter::from_default_env().add_directive(log_level.into());

    if cli.log_json {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_line_number(true)
                    .with_writer(std::io::stderr),
            )
            .with(filter)
            .init();
    }

    info!("Logging initialized at level: {}", log_level);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(feature: &str, drift: &str, intensity: f64) -> SimulateArgs {
        SimulateArgs {
            feature: Some(feature.to_string()),
            drift: Some(drift.to_string()),
            intensity: Some(intensity),
            seed: None,
        }
    }

    #[test]
    fn test_simulation_rejects_raw_scale_feature() {
        let config = Config::default();

        let err = simulation_config(&config, args("cnt", "sudden", 0.0)).unwrap_err();
        assert!(err.to_string().contains("normalized feature"));
        assert!(simulation_config(&config, args("hr", "gradual", 0.1)).is_err());

        let (sim, feature) = simulation_config(&config, args("cnt", "none", 0.0)).unwrap();
        assert_eq!(feature, Feature::Cnt);
        assert!(!sim.injects_drift());
    }

    #[test]
    fn test_simulation_intensity_rules_match_config() {
        let config = Config::default();

        let (sim, _) = simulation_config(&config, args("hum", "sudden", -0.2)).unwrap();
        assert_eq!(sim.intensity, -0.2);
        assert!(sim.injects_drift());

        assert!(simulation_config(&config, args("hum", "noise", -0.2)).is_err());
        assert!(simulation_config(&config, args("hum", "gradual", f64::NAN)).is_err());
    }

    #[test]
    fn test_simulation_defaults_from_config() {
        let mut config = Config::default();
        config.simulation.seed = Some(9);
        let empty = SimulateArgs {
            feature: None,
            drift: None,
            intensity: None,
            seed: None,
        };

        let (sim, feature) = simulation_config(&config, empty).unwrap();
        assert_eq!(feature, Feature::Hum);
        assert_eq!(sim.seed, Some(9));
        assert_eq!(sim.bin_count, config.psi.bin_count);
    }

    #[test]
    fn test_cli_parses_psi_method() {
        let cli = Cli::try_parse_from(["driftscope", "psi", "--method", "equal_width", "--json"])
            .unwrap();
        match cli.command {
            Commands::Psi { method, json, .. } => {
                assert_eq!(method.as_deref(), Some("equal_width"));
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
