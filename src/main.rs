use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;

use qoe_check::{run_all_validations, ValidationConfig};
use qoe_io::{WindowCatalog, DEFAULT_DATA_DIR};
use qoe_label::LatencyThresholds;
use qoe_models::ModelKind;
use qoe_pipeline::{LabelSource, PipelineConfig};

#[derive(Parser)]
#[command(name = "qoe-repro")]
#[command(about = "Validate and smoke-test QoE classification from traffic-flow statistics")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// RNG seed for reproducibility
    #[arg(long, default_value_t = 42, global = true)]
    seed: u64,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,

    /// Number of threads for parallel computation (defaults to all cores)
    #[arg(long, global = true)]
    threads: Option<usize>,
}

/// Latency band boundaries for ping-based labels.
#[derive(Args, Debug, Clone)]
struct ThresholdArgs {
    /// Latency (ms) below which a row is labeled good
    #[arg(long, default_value_t = 50.0)]
    good_below: f64,

    /// Latency (ms) below which a row is labeled fair
    #[arg(long, default_value_t = 100.0)]
    fair_below: f64,
}

#[derive(Subcommand)]
enum Command {
    /// Check runtime components, dataset files, column layout and model creation
    Validate {
        /// Directory holding the window_*.csv exports
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// File inspected by the data structure check (defaults to the 10 s window)
        #[arg(long)]
        structure_file: Option<PathBuf>,

        /// Print the report as JSON instead of text
        #[arg(long, default_value_t = false)]
        json: bool,
    },

    /// Run the minimal train/evaluate pipeline on one window dataset
    Run {
        /// Directory holding the window_*.csv exports
        #[arg(long, default_value = DEFAULT_DATA_DIR)]
        data_dir: PathBuf,

        /// Window size in seconds: 3, 5, 10 or 15
        #[arg(long, default_value_t = 10, conflicts_with = "data")]
        window: u32,

        /// Explicit dataset path (overrides --data-dir and --window)
        #[arg(long)]
        data: Option<PathBuf>,

        /// Maximum number of complete rows to sample
        #[arg(long, default_value_t = 1000)]
        sample_size: usize,

        /// Fraction of sampled rows held out for testing
        #[arg(long, default_value_t = 0.2)]
        test_fraction: f64,

        /// Label source: "ping" or "survey"
        #[arg(long, default_value = "ping")]
        label_source: String,

        /// Model to train: DT, RF, ET, GB or KNN
        #[arg(long, default_value = "RF")]
        model: String,

        /// Output directory for figures and tables
        #[arg(long, default_value = "artifacts")]
        artifacts: PathBuf,

        #[command(flatten)]
        thresholds: ThresholdArgs,
    },
}

fn parse_label_source(s: &str) -> Result<LabelSource> {
    match s {
        "ping" | "latency" => Ok(LabelSource::Latency),
        "survey" => Ok(LabelSource::Survey),
        other => anyhow::bail!("unknown label source: {other} (expected ping or survey)"),
    }
}

fn resolve_dataset(data_dir: PathBuf, window: u32, data: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = data {
        return Ok(path);
    }
    let catalog = WindowCatalog::rooted_at(&data_dir);
    catalog
        .path_for(window)
        .map(PathBuf::from)
        .with_context(|| format!("no dataset file known for a {window}s window (expected 3, 5, 10 or 15)"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("failed to configure thread pool")?;
        info!(threads, "thread pool configured");
    }

    match cli.command {
        Command::Validate {
            data_dir,
            structure_file,
            json,
        } => {
            let mut config = ValidationConfig::new()
                .with_data_dir(data_dir)
                .with_seed(cli.seed);
            if let Some(path) = structure_file {
                config = config.with_structure_file(path);
            }

            let report = run_all_validations(&config);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{report}");
            }
        }

        Command::Run {
            data_dir,
            window,
            data,
            sample_size,
            test_fraction,
            label_source,
            model,
            artifacts,
            thresholds,
        } => {
            let dataset = resolve_dataset(data_dir, window, data)?;
            let label_source = parse_label_source(&label_source)?;
            let model: ModelKind = model.parse().context("invalid --model")?;
            let thresholds = LatencyThresholds::new(thresholds.good_below, thresholds.fair_below)
                .context("invalid latency thresholds")?;

            let config = PipelineConfig::new()
                .with_data(&dataset)
                .with_seed(cli.seed)
                .with_sample_size(sample_size)
                .with_test_fraction(test_fraction)
                .with_label_source(label_source)
                .with_latency_thresholds(thresholds)
                .with_model(model)
                .with_artifacts(artifacts);

            let summary = qoe_pipeline::run(&config)
                .with_context(|| format!("pipeline failed on {}", dataset.display()))?;
            info!(
                accuracy = summary.accuracy,
                macro_f1 = summary.macro_f1,
                "pipeline completed"
            );
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
    }

    Ok(())
}
