//! Snakebox CLI
//!
//! Thin front end over the core engine: fresh searches and priming runs.

use clap::{Args, Parser, Subcommand};
use log::{error, info};
use snakebox_core::cube::format_hex_transitions;
use snakebox_core::{
    load_config, load_seed, BeamConfig, BeamSearchEngine, PrimingConfig, PrimingSeeder,
    SearchError, SearchResult, SeedFile,
};
use std::path::PathBuf;
use std::process::ExitCode;

const BYTES_PER_MB: u64 = 1024 * 1024;

#[derive(Parser)]
#[command(name = "snakebox")]
#[command(about = "Search for long snakes in the n-dimensional hypercube")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search from the empty snake
    Search {
        /// Hypercube dimension
        #[arg(long, short)]
        dimension: usize,

        #[command(flatten)]
        engine: EngineArgs,
    },

    /// Extend a known snake into higher dimensions
    Prime {
        /// Seed file (JSON with `dimension` and `transitions`)
        #[arg(long, conflicts_with = "hex", required_unless_present = "hex")]
        seed: Option<PathBuf>,

        /// Seed as hex digits, one per transition, or comma-separated hex values
        #[arg(long)]
        hex: Option<String>,

        /// Dimension of the seed (defaults to the seed file's, or the smallest that fits)
        #[arg(long)]
        source_dim: Option<usize>,

        /// Dimension to reach
        #[arg(long)]
        target_dim: usize,

        /// Cap on engine runs across all dimensions
        #[arg(long)]
        max_iterations: Option<usize>,

        #[command(flatten)]
        engine: EngineArgs,
    },
}

#[derive(Args)]
struct EngineArgs {
    /// Memory budget in MiB
    #[arg(long)]
    budget_mb: Option<u64>,

    /// Number of worker threads
    #[arg(long, short)]
    workers: Option<usize>,

    /// Maximum levels per engine run
    #[arg(long)]
    max_levels: Option<usize>,

    /// JSON config file; flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the result as JSON
    #[arg(long, short)]
    output: Option<PathBuf>,
}

impl EngineArgs {
    fn apply(&self, config: &mut BeamConfig) {
        if let Some(mb) = self.budget_mb {
            config.memory_budget_bytes = mb.saturating_mul(BYTES_PER_MB);
        }
        if let Some(workers) = self.workers {
            config.workers = workers;
        }
        if self.max_levels.is_some() {
            config.max_levels = self.max_levels;
        }
    }
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Command) -> Result<(), SearchError> {
    match command {
        Command::Search { dimension, engine } => {
            let mut config: BeamConfig = match &engine.config {
                Some(path) => load_config(path)?,
                None => BeamConfig::default(),
            };
            engine.apply(&mut config);

            let result = BeamSearchEngine::new(config).search(dimension)?;
            report(&result, engine.output.as_ref())
        }
        Command::Prime {
            seed,
            hex,
            source_dim,
            target_dim,
            max_iterations,
            engine,
        } => {
            let seed = match (seed, hex) {
                (Some(path), _) => load_seed(path)?,
                (None, Some(text)) => SeedFile::from_hex(&text, source_dim)?,
                (None, None) => {
                    return Err(SearchError::InvalidSeed("no seed given".to_string()));
                }
            };
            let source_dim = source_dim.unwrap_or(seed.dimension);

            let mut config: PrimingConfig = match &engine.config {
                Some(path) => load_config(path)?,
                None => PrimingConfig::default(),
            };
            engine.apply(&mut config.beam);
            if max_iterations.is_some() {
                config.max_iterations = max_iterations;
            }

            let outcome = PrimingSeeder::new(config).extend(&seed.transitions, source_dim, target_dim)?;
            for step in &outcome.steps {
                info!(
                    "Q{} -> Q{}: {} -> {}{}",
                    step.from_dimension,
                    step.to_dimension,
                    step.seed_length,
                    step.result_length,
                    step.fallback_ratio
                        .map(|r| format!(" (from {:.0}% prefix)", r * 100.0))
                        .unwrap_or_default()
                );
            }
            report(&outcome.result, engine.output.as_ref())
        }
    }
}

fn report(result: &SearchResult, output: Option<&PathBuf>) -> Result<(), SearchError> {
    let hex = format_hex_transitions(&result.transitions);
    println!(
        "dimension={} length={} fitness={} levels={} elapsed_ms={} transitions={}",
        result.dimension,
        result.length,
        result.final_fitness,
        result.stats.levels,
        result.stats.elapsed_ms,
        hex
    );

    if let Some(path) = output {
        result.to_json_file(path)?;
        info!("Wrote result to {}", path.display());
    }
    Ok(())
}
