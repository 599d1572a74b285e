//! Waypoint — recorded run and player reference CLI.
//!
//! # Usage
//!
//! ```text
//! waypoint runs list [--dir <path>]
//! waypoint runs reload [--dir <path>]
//! waypoint runs show <run-id> [--dir <path>]
//! waypoint runs suggest [<partial>] [--dir <path>]
//! waypoint player encode [--uuid <id>] [--name <name>]
//! waypoint player decode <json>
//! ```

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{player::PlayerCommand, runs::RunsCommand};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "waypoint",
    version,
    about = "Inspect recorded runs and player references",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load and inspect recorded run timelines.
    Runs {
        #[command(subcommand)]
        command: RunsCommand,
    },

    /// Encode and decode player reference records.
    Player {
        #[command(subcommand)]
        command: PlayerCommand,
    },
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    match cli.command {
        Commands::Runs { command } => commands::runs::run(command),
        Commands::Player { command } => commands::player::run(command),
    }
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
