use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod config;
mod guided;
mod plotting;
mod workflow;

/// Deterministic value stream maps and lean metrics.
#[derive(Parser, Debug)]
#[command(name = "valuestream", version, about, long_about = None)]
struct Cli {
    /// Log filter used when RUST_LOG is not set (e.g. "info", "valuestream_core=debug")
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute metrics, lay out the map and write every artifact to a run directory
    Render {
        /// Dataset file (.json, .yaml or .yml)
        #[arg(short, long)]
        dataset: PathBuf,
        /// YAML run configuration
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Output directory; defaults to a timestamped directory under `output_root`
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Print the metrics summary only
    Metrics {
        #[arg(short, long)]
        dataset: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Convert a CSV process table into a dataset file
    Import {
        #[arg(long)]
        csv: PathBuf,
        /// Customer demand per day, overriding any demand column
        #[arg(long)]
        demand: Option<f64>,
        #[arg(short, long)]
        out: PathBuf,
    },
    /// Build a dataset by answering questions on stdin
    Guided {
        #[arg(short, long)]
        out: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&cli.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match cli.command {
        Command::Render {
            dataset,
            config: config_path,
            out,
        } => {
            let config = config::AppConfig::load(config_path.as_deref())?;
            workflow::run_render(&dataset, &config, out)?;
        }
        Command::Metrics {
            dataset,
            config: config_path,
        } => {
            let config = config::AppConfig::load(config_path.as_deref())?;
            workflow::run_metrics(&dataset, &config)?;
        }
        Command::Import { csv, demand, out } => workflow::run_import(&csv, demand, &out)?,
        Command::Guided { out } => guided::run_guided(&out)?,
    }

    Ok(())
}
