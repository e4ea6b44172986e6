//! TBRS* simulator CLI.
//!
//! Runs a batch of complex-span trials and prints the mean proportion correct
//! and per-position accuracy, or sweeps list lengths to estimate span.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tbrs::representation::embeddings::EmbeddingTable;
use tbrs::simulation::{run_batch, run_span, ExperimentConfig};

/// TBRS* working-memory simulator.
#[derive(Parser, Debug)]
#[command(name = "tbrs", about = "TBRS* working-memory simulator", version)]
struct Cli {
    /// TOML file with experiment settings; flags override it.
    #[arg(long)]
    params: Option<PathBuf>,

    /// Comma-separated table of memorandum vectors.
    #[arg(long)]
    embeddings: Option<PathBuf>,

    /// Number of simulated trials.
    #[arg(short = 'n', long)]
    trials: Option<usize>,

    /// Memoranda per list.
    #[arg(short = 'm', long)]
    memoranda: Option<usize>,

    /// Operations after each memorandum.
    #[arg(short = 'o', long)]
    operations: Option<usize>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Run every list length from 1 up to `memoranda` and report the span.
    #[arg(long, default_value_t = false)]
    span: bool,

    /// Run trials in parallel.
    #[arg(long, default_value_t = false)]
    parallel: bool,

    /// Print the report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,

    /// Persistence of position blocks (P).
    #[arg(long)]
    persistence: Option<f64>,

    /// Mean processing rate (R).
    #[arg(long)]
    rate: Option<f64>,

    /// Standard deviation of processing rates (s).
    #[arg(long)]
    rate_std: Option<f64>,

    /// Encoding criterion (tauE).
    #[arg(long)]
    tau_encoding: Option<f64>,

    /// Asymptotic association strength (L).
    #[arg(long)]
    asymptote: Option<f64>,

    /// Retrieval threshold.
    #[arg(long)]
    theta: Option<f64>,

    /// Retrieval noise.
    #[arg(long)]
    sigma: Option<f64>,

    /// Decay rate (D).
    #[arg(long)]
    decay: Option<f64>,

    /// Mean refresh time (Tr).
    #[arg(long)]
    refresh_time: Option<f64>,

    /// Processing criterion (tauOp).
    #[arg(long)]
    tau_operation: Option<f64>,

    /// Mean attentional capture per operation (Ta).
    #[arg(long)]
    capture_time: Option<f64>,

    /// Free time after each operation.
    #[arg(long)]
    free_time: Option<f64>,

    /// Free time does not include the operation duration.
    #[arg(long, default_value_t = false)]
    free_time_excludes_operation: bool,

    /// Resume refreshing where the previous refresh stopped.
    #[arg(long, default_value_t = false)]
    refresh_last_stopped: bool,

    /// Positions refreshed together.
    #[arg(long)]
    focus: Option<usize>,

    /// Presentation time of a memorandum.
    #[arg(long)]
    presentation_time: Option<f64>,

    /// Proportion of a distractor's span shared with the interfered item.
    #[arg(long)]
    overlap: Option<f64>,

    /// Noise of distractor features copied from the item.
    #[arg(long)]
    distractor_noise: Option<f64>,

    /// Every operation uses the same distractor.
    #[arg(long, default_value_t = false)]
    same_distractors: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print the final report.
    #[arg(short, long, default_value_t = false)]
    quiet: bool,
}

impl Cli {
    fn experiment(&self) -> Result<ExperimentConfig> {
        let mut config = match &self.params {
            Some(path) => ExperimentConfig::from_toml_file(path)
                .with_context(|| format!("failed to load settings from '{}'", path.display()))?,
            None => ExperimentConfig::default(),
        };

        let p = &mut config.params;
        macro_rules! set {
            ($field:expr, $value:expr) => {
                if let Some(v) = $value {
                    $field = v;
                }
            };
        }
        set!(p.persistence, self.persistence);
        set!(p.rate_mean, self.rate);
        set!(p.rate_std, self.rate_std);
        set!(p.tau_encoding, self.tau_encoding);
        set!(p.asymptote, self.asymptote);
        set!(p.theta, self.theta);
        set!(p.sigma, self.sigma);
        set!(p.decay_rate, self.decay);
        set!(p.refresh_time, self.refresh_time);
        set!(p.tau_operation, self.tau_operation);
        set!(p.capture_time, self.capture_time);
        set!(p.free_time, self.free_time);
        set!(p.attentional_focus_size, self.focus);
        set!(p.presentation_time, self.presentation_time);
        set!(p.item_distractor_overlap, self.overlap);
        set!(p.item_distractor_noise, self.distractor_noise);
        if self.free_time_excludes_operation {
            p.free_time_includes_operation = false;
        }
        if self.refresh_last_stopped {
            p.refresh_last_stopped = true;
        }
        if self.same_distractors {
            p.same_distractors = true;
        }

        set!(config.trials, self.trials);
        set!(config.memoranda, self.memoranda);
        set!(config.operations, self.operations);
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.parallel {
            config.parallel = true;
        }

        config.validate().context("invalid experiment settings")?;
        Ok(config)
    }
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = match (quiet, verbose) {
        (true, _) => "warn",
        (false, 0) => "info",
        (false, 1) => "debug",
        (false, _) => "trace",
    };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| level.into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    tracing::info!("tbrs v{}", env!("CARGO_PKG_VERSION"));
    let config = cli.experiment()?;

    let embeddings = match &cli.embeddings {
        Some(path) => {
            let table = EmbeddingTable::from_path(path)
                .with_context(|| format!("failed to load embeddings from '{}'", path.display()))?;
            tracing::info!("Loaded {} memorandum vectors from {}", table.len(), path.display());
            Some(table)
        }
        None => None,
    };

    if cli.span {
        let report = run_span(&config, embeddings.as_ref())?;
        for list in &report.lists {
            for (n, recalled) in list.recalled.iter().enumerate() {
                tracing::info!("#{:4}: Recalled = {}", n + 1, recalled);
            }
        }
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report);
        }
    } else {
        let report = run_batch(&config, embeddings.as_ref())?;
        for (n, recalled) in report.recalled.iter().enumerate() {
            tracing::info!("#{:4}: Recalled = {}", n + 1, recalled);
        }
        if cli.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else {
            println!("{}", report);
        }
    }

    Ok(())
}
