use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use af_data::SampleLoader;
use af_optimizer::{compute_weights, optimize, ObjectiveDirection, SearchConfig, TwoCompartmentDecay};
use af_types::{config_error, coordinates, validation_error, AfResult, Bounds};

/// Adaptive local search fitting with density-weighted samples
#[derive(Debug, Parser)]
#[command(name = "adaptfit", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the density weights of a sample file as JSON
    Weights {
        /// CSV file with coordinate and observation columns
        #[arg(long)]
        data: PathBuf,
        /// Kernel bandwidth (defaults to 2 * range / n)
        #[arg(long)]
        bandwidth: Option<f64>,
        /// The CSV file has no header row
        #[arg(long)]
        no_headers: bool,
    },
    /// Fit the two-compartment decay model and print the result as JSON
    Fit {
        #[arg(long)]
        data: PathBuf,
        /// Start point: rl,id,rd,scale,baseline
        #[arg(long, value_delimiter = ',', allow_hyphen_values = true, required = true)]
        x0: Vec<f64>,
        /// Per-parameter bounds as lo:hi pairs separated by commas
        #[arg(long, allow_hyphen_values = true)]
        bounds: Option<String>,
        /// JSON search configuration; flags below override its fields
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        iterations: Option<usize>,
        /// Treat higher scores as better; the decay residual is minimized otherwise
        #[arg(long)]
        maximize: bool,
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        bandwidth: Option<f64>,
        #[arg(long)]
        no_headers: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("ADAPTFIT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}

/// Load a JSON search configuration. A file without a `direction` key gets
/// `default_direction` instead of the library default.
fn load_config(path: &Path, default_direction: ObjectiveDirection) -> AfResult<SearchConfig> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| config_error!("cannot read {}: {}", path.display(), e))?;
    let mut value: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| config_error!("invalid config {}: {}", path.display(), e))?;
    if let Some(fields) = value.as_object_mut() {
        if !fields.contains_key("direction") {
            fields.insert("direction".to_string(), serde_json::to_value(default_direction)?);
        }
    }
    serde_json::from_value(value).map_err(|e| config_error!("invalid config {}: {}", path.display(), e))
}

/// Search configuration for `fit`: the config file (if any), then flag overrides.
/// The decay objective is a residual, so minimization is the default.
fn fit_config(
    config: Option<&Path>,
    iterations: Option<usize>,
    maximize: bool,
    seed: Option<u64>,
    bandwidth: Option<f64>,
) -> AfResult<SearchConfig> {
    let mut search_config = match config {
        Some(path) => load_config(path, ObjectiveDirection::Minimize)?,
        None => SearchConfig::default().minimize(),
    };
    if let Some(n) = iterations {
        search_config.iterations = n;
    }
    if maximize {
        search_config.direction = ObjectiveDirection::Maximize;
    }
    if seed.is_some() {
        search_config.seed = seed;
    }
    if bandwidth.is_some() {
        search_config.bandwidth = bandwidth;
    }
    Ok(search_config)
}

/// Parse `lo:hi,lo:hi,...` into validated bounds.
fn parse_bounds(text: &str) -> AfResult<Bounds> {
    let mut ranges = Vec::new();
    for (i, pair) in text.split(',').enumerate() {
        let (lo, hi) = pair
            .split_once(':')
            .ok_or_else(|| validation_error!("bound {} ('{}') is not lo:hi", i, pair))?;
        let lo: f64 = lo
            .trim()
            .parse()
            .map_err(|_| validation_error!("bound {} has invalid lower limit '{}'", i, lo))?;
        let hi: f64 = hi
            .trim()
            .parse()
            .map_err(|_| validation_error!("bound {} has invalid upper limit '{}'", i, hi))?;
        ranges.push((lo, hi));
    }
    Bounds::new(ranges)
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Command::Weights {
            data,
            bandwidth,
            no_headers,
        } => {
            let samples = SampleLoader::with_headers(!no_headers).load_csv_file(&data)?;
            let weights = compute_weights(&coordinates(&samples), bandwidth)?;
            println!("{}", serde_json::to_string_pretty(&weights)?);
        }
        Command::Fit {
            data,
            x0,
            bounds,
            config,
            iterations,
            maximize,
            seed,
            bandwidth,
            no_headers,
        } => {
            let search_config = fit_config(config.as_deref(), iterations, maximize, seed, bandwidth)?;

            let bounds = bounds.as_deref().map(parse_bounds).transpose()?;
            let samples = SampleLoader::with_headers(!no_headers)
                .load_csv_file(&data)
                .with_context(|| format!("loading samples from {}", data.display()))?;

            info!("Fitting decay model to {} samples", samples.len());
            let result = optimize(&x0, bounds.as_ref(), &samples, search_config, &TwoCompartmentDecay)?;
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
    }

    Ok(())
}
