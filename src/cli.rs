//! Command-line interface for tictactoe_ai.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tictactoe_ai::Backend;

/// Tic-tac-toe against a move predictor that learns from every game played
#[derive(Parser, Debug)]
#[command(name = "tictactoe_ai")]
#[command(about = "Play tic-tac-toe against a learned AI", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML configuration file (defaults are used if it is missing)
    #[arg(short, long, default_value = "tictactoe_ai.toml")]
    pub config: PathBuf,

    /// Override the storage backend from the configuration
    #[arg(short, long)]
    pub backend: Option<Backend>,

    /// Log to stderr instead of the log file
    #[arg(short, long)]
    pub verbose: bool,

    /// Subcommand to run (defaults to `play`)
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Play an interactive session
    Play,

    /// Print the ranked leaderboard and exit
    Leaderboard,

    /// Train a predictor from the stored history and persist it
    Train,
}
