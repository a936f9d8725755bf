//! Operational tools for the creature behavior engine.
//!
//! Run with: `bestiary <command>`. Definition sources and the engine
//! configuration come from flags or from `BESTIARY_SOURCES` / `BESTIARY_CONFIG`
//! (a `.env` file is honored).

mod commands;
mod context;

use anyhow::Result;
use clap::Parser;
use commands::{List, Reload, Simulate, Spawn};

#[derive(Parser)]
#[command(name = "bestiary")]
#[command(about = "Inspect and exercise creature definitions", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List registered definition ids
    List(List),

    /// Spawn one creature next to the player and report it
    Spawn(Spawn),

    /// Reload every source and print the report
    Reload(Reload),

    /// Enter a tiered area, populate it, and run the simulation
    Simulate(Simulate),
}

fn main() -> Result<()> {
    // Load .env file if it exists (for BESTIARY_SOURCES and RUST_LOG)
    let _ = dotenvy::dotenv();
    setup_logging();

    let cli = Cli::parse();

    match cli.command {
        Command::List(cmd) => cmd.execute(),
        Command::Spawn(cmd) => cmd.execute(),
        Command::Reload(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute(),
    }
}

fn setup_logging() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}
