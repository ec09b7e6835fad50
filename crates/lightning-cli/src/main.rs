//! `lightning` - command-line front end for the Lightning distance engine.

mod commands;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use lightning_core::{DistanceMetric, Engine, EngineConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Lightning - SIMD vector distance engine
#[derive(Parser, Debug)]
#[command(name = "lightning")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// TOML configuration file (LIGHTNING_* variables still override it)
    #[arg(short, long, global = true, env = "LIGHTNING_CONFIG")]
    config: Option<PathBuf>,

    /// Force the scalar kernels regardless of detected hardware
    #[arg(long, global = true)]
    scalar: bool,

    /// Log at debug level (overrides logging.level)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the SIMD capability report
    Caps {
        /// Emit JSON instead of the one-line summary
        #[arg(long)]
        json: bool,
    },

    /// Distance between two vectors
    Distance {
        /// Metric: euclidean (l2) or cosine
        #[arg(short, long, default_value = "euclidean")]
        metric: DistanceMetric,

        /// First vector, comma separated
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        a: Vec<f32>,

        /// Second vector, comma separated
        #[arg(long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        b: Vec<f32>,
    },

    /// Distances from one query to every candidate in a JSON file
    Batch {
        /// Metric: euclidean (l2) or cosine
        #[arg(short, long, default_value = "euclidean")]
        metric: DistanceMetric,

        /// Query vector, comma separated
        #[arg(short, long, required = true, value_delimiter = ',', allow_hyphen_values = true)]
        query: Vec<f32>,

        /// JSON file holding an array of candidate vectors
        #[arg(long)]
        candidates: PathBuf,

        /// Emit a JSON array instead of one line per candidate
        #[arg(long)]
        json: bool,
    },
}

fn load_config(cli: &Cli) -> Result<EngineConfig> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::load_from(path)
            .with_context(|| format!("Failed to load config from {}", path.display()))?,
        None => EngineConfig::load().context("Failed to load config from environment")?,
    };
    if cli.scalar {
        config.kernel.force_scalar = true;
    }
    if cli.verbose {
        config.logging.level = "debug".to_string();
    }
    Ok(config)
}

fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    init_tracing(&config.logging.level);

    let engine = Engine::from_config(&config).context("Invalid engine configuration")?;
    tracing::debug!(level = %engine.level(), "Engine ready");

    match cli.command {
        Command::Caps { json } => commands::caps(json),
        Command::Distance { metric, a, b } => commands::distance(&engine, metric, &a, &b),
        Command::Batch {
            metric,
            query,
            candidates,
            json,
        } => commands::batch(&engine, metric, &query, &candidates, json),
    }
}
