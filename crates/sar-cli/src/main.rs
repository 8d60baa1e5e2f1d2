use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sar_cli::batch::{BatchOptions, BatchRunner};
use sar_cli::config::ScenarioConfig;
use sar_cli::logging::init_logging;
use sar_cli::menu;

/// Bayesian search-and-rescue simulator.
#[derive(Debug, Parser)]
#[command(
    name = "sarsim",
    author,
    version,
    about = "Bayesian search-and-rescue simulator"
)]
struct Cli {
    /// Path to a YAML scenario file (defaults to the built-in cape scenario).
    #[arg(short, long, value_name = "FILE")]
    scenario: Option<PathBuf>,

    /// Override the session RNG seed.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Enable debug-level logging.
    #[arg(long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Play the interactive menu game (the default).
    Play,
    /// Run many seeded sessions under a greedy policy and report statistics.
    Batch {
        /// Number of sessions to play.
        #[arg(long, default_value_t = 100)]
        sessions: u32,

        /// Round cap per session.
        #[arg(long, default_value_t = 100)]
        max_rounds: u32,

        /// Write one JSON row per session to this file.
        #[arg(long, value_name = "FILE")]
        jsonl: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let scenario = match &cli.scenario {
        Some(path) => ScenarioConfig::from_path(path)?,
        None => ScenarioConfig::reference(),
    };

    match cli.command.unwrap_or(Command::Play) {
        Command::Play => menu::run(&scenario, cli.seed)?,
        Command::Batch {
            sessions,
            max_rounds,
            jsonl,
        } => {
            let options = BatchOptions {
                sessions,
                max_rounds,
                seed: cli.seed.unwrap_or(0),
            };
            let runner = BatchRunner::new(scenario, options);
            let summary = runner.run(jsonl.as_deref())?;

            println!(
                "Batch complete for '{}': {} sessions, {} found within {} rounds",
                summary.scenario, summary.sessions, summary.found, summary.max_rounds
            );
            if let Some(mean) = summary.mean_rounds_to_find {
                println!("Mean rounds to find: {mean:.2}");
            }
            if let Some(path) = summary.jsonl_path.as_ref() {
                println!("Session rows: {}", path.display());
            }
        }
    }

    Ok(())
}
