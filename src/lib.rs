//! tictactoe_ai - tic-tac-toe against a move predictor that learns from play
//!
//! A human plays `X` against an AI playing `O`. The AI scores the empty
//! squares with a small feed-forward network trained on every recorded move.
//!
//! # Architecture
//!
//! - **Games**: board, positions and outcome rules for tic-tac-toe
//! - **AI**: the predictor network and the move policy built on it
//! - **Ports**: storage traits for history, leaderboard and predictor
//! - **Adapters**: Google Sheets/Drive, SQLite, in-memory
//! - **Session**: the interactive turn loop with replay and shutdown
//!
//! # Example
//!
//! ```no_run
//! use tictactoe_ai::{ScriptedConsole, Session, TrainingConfig, memory_backends};
//!
//! # async fn example() -> Result<(), tictactoe_ai::SessionError> {
//! let console = ScriptedConsole::new(["ann", "n"]);
//! let mut session = Session::new(console, memory_backends(), TrainingConfig::default());
//! let report = session.run().await?;
//! assert_eq!(report.rounds(), 0);
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod ai;
mod config;
mod console;
mod db;
mod error;
mod games;
mod google;
mod leaderboard;
mod memory;
mod ports;
mod provider;
mod records;
mod session;
mod ui;

// Crate-level exports - Game types (tic-tac-toe)
pub use games::tictactoe::{Board, Cell, Mark, Outcome, Position, evaluate};
pub use games::tictactoe::rules::{LINES, check_winner, has_line, is_draw, is_full};

// Crate-level exports - Predictor and move policy
pub use ai::{MoveNetwork, Predictor, TrainingConfig, choose_move};

// Crate-level exports - Records and leaderboard
pub use leaderboard::{GameResult, Leaderboard, LeaderboardEntry};
pub use records::{TrainingRecord, decode_state, encode_state, parse_history};

// Crate-level exports - Storage ports and adapters
pub use db::{FsModelStore, GameRepository, sqlite_backends};
pub use google::{
    Credentials, DriveClient, GoogleContext, LeaderboardColumns, SCOPES, SheetUpdate,
    SheetsClient, TOKEN_ENV, column_letter, google_backends,
};
pub use memory::{MemoryHistory, MemoryLeaderboard, MemoryPredictorStore, memory_backends};
pub use ports::{Backends, HistorySink, LeaderboardStore, PredictorHandle, PredictorStore};
pub use provider::PredictorProvider;

// Crate-level exports - Session and terminal
pub use console::{Console, ScriptedConsole, StdConsole};
pub use session::{Phase, Session, SessionReport, Termination};
pub use ui::{render_board, render_leaderboard, start_screen};

// Crate-level exports - Configuration and errors
pub use config::{AppConfig, Backend, GoogleConfig, SqliteConfig};
pub use error::{
    BoundaryError, BoundaryErrorKind, ConfigError, CredentialError, GameError, MoveRejection,
    SessionError,
};
