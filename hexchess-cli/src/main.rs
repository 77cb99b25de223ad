//! HEXCHESS CLI - Command-line interface
//!
//! Commands:
//! - replay: Replay a notation history and report the resulting position
//! - moves: List the legal moves after a history
//! - setup: Write or validate a starting-position file
//! - serve: Start the game server

mod replay_cmd;
mod server;
mod setup_cmd;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hexchess")]
#[command(about = "Glinski hexagonal chess rules engine")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a move history and show the final state
    Replay(replay_cmd::ReplayArgs),
    /// List legal moves for the side to move after a history
    Moves(replay_cmd::MovesArgs),
    /// Write or validate a setup file
    Setup(setup_cmd::SetupArgs),
    /// Start the game server
    Serve(server::ServerArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => replay_cmd::run_replay(args),
        Commands::Moves(args) => replay_cmd::run_moves(args),
        Commands::Setup(args) => setup_cmd::run(args),
        Commands::Serve(args) => server::run(args),
    }
}
