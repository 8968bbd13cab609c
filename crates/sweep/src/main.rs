//! Committed-minority sweep driver
//!
//! Run with: cargo run -p sweep -- <population size> <number of simulations> <file number> <output path>
//!
//! Examples:
//!   cargo run -p sweep -- 1000 10 1 output/
//!   cargo run -p sweep -- 200 5 2 output/ --seed 42 --format jsonl

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use sweep::{OutputFormat, Sweep, SweepConfig, SweepError, SweepParams};
use tracing_subscriber::EnvFilter;

/// Committed-minority naming game sweep
#[derive(Parser, Debug)]
#[command(name = "naming_sweep")]
#[command(about = "Run naming game simulations across a grid of committed fractions")]
struct Args {
    /// Number of agents in each population
    population_size: usize,

    /// Number of simulations per committed fraction
    num_sims: u64,

    /// Number appended to the output file name
    file_num: u32,

    /// Directory to write results into
    output_dir: PathBuf,

    /// TOML file with grid, run, and output settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Master seed for a reproducible sweep
    #[arg(long)]
    seed: Option<u64>,

    /// Interaction cap, in rounds of POPULATION_SIZE interactions
    #[arg(long)]
    max_rounds: Option<u64>,

    /// Result file format
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    /// Log progress every this many simulations
    #[arg(long)]
    progress_every: Option<u64>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<(), SweepError> {
    let mut config = match &args.config {
        Some(path) => SweepConfig::from_file(path)?,
        None => SweepConfig::default(),
    };

    // Command line overrides the config file
    if let Some(seed) = args.seed {
        config.run.seed = Some(seed);
    }
    if let Some(max_rounds) = args.max_rounds {
        config.run.max_rounds = max_rounds;
    }
    if let Some(format) = args.format {
        config.output.format = format;
    }
    if let Some(progress_every) = args.progress_every {
        config.output.progress_every = progress_every;
    }

    let params = SweepParams {
        population_size: args.population_size,
        num_sims: args.num_sims,
        file_num: args.file_num,
        output_dir: args.output_dir,
    };

    let sweep = Sweep::new(params, config)?;
    tracing::info!(
        population_size = args.population_size,
        num_sims = args.num_sims,
        fractions = sweep.fractions().len(),
        "starting sweep"
    );

    let summary = sweep.run()?;
    tracing::info!(
        runs = summary.runs,
        consensus_runs = summary.consensus_runs,
        path = %summary.output_path.display(),
        "sweep complete"
    );
    Ok(())
}
