//! Trait boundaries between the game session and its storage collaborators.
//!
//! The session only talks to these traits. Google Sheets/Drive, SQLite and
//! in-memory adapters implement them; which one is used is decided once at
//! startup from the configuration.

use crate::ai::MoveNetwork;
use crate::error::BoundaryError;
use crate::leaderboard::{GameResult, Leaderboard};
use crate::records::TrainingRecord;
use async_trait::async_trait;
use derive_more::Display;

/// Append-only log of every move played.
#[async_trait]
pub trait HistorySink: Send + Sync {
    /// Reads every stored record, skipping malformed rows.
    async fn read_history(&self) -> Result<Vec<TrainingRecord>, BoundaryError>;

    /// Appends one record.
    async fn append_record(&self, record: &TrainingRecord) -> Result<(), BoundaryError>;
}

/// Per-nickname win/loss/draw counters.
#[async_trait]
pub trait LeaderboardStore: Send + Sync {
    /// Reads all entries in stored order.
    async fn read_leaderboard(&self) -> Result<Leaderboard, BoundaryError>;

    /// Adds one finished round for `nickname`, creating the entry if needed.
    async fn update_leaderboard(
        &self,
        nickname: &str,
        result: GameResult,
    ) -> Result<(), BoundaryError>;
}

/// Where a stored predictor lives (a Drive file id, a path, a map key).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
pub struct PredictorHandle(pub String);

/// Remote or local storage for the trained predictor.
#[async_trait]
pub trait PredictorStore: Send + Sync {
    /// Looks the predictor up by its configured name. `Ok(None)` when absent.
    async fn find_predictor(&self) -> Result<Option<PredictorHandle>, BoundaryError>;

    /// Fetches and decodes the predictor behind `handle`.
    async fn download_predictor(
        &self,
        handle: &PredictorHandle,
    ) -> Result<MoveNetwork, BoundaryError>;

    /// Stores `predictor` under the configured name.
    async fn persist_predictor(&self, predictor: &MoveNetwork) -> Result<(), BoundaryError>;
}

/// The three collaborators a session needs, chosen at startup.
pub struct Backends {
    /// Move history.
    pub history: Box<dyn HistorySink>,
    /// Leaderboard.
    pub leaderboard: Box<dyn LeaderboardStore>,
    /// Predictor storage.
    pub predictors: Box<dyn PredictorStore>,
}

impl std::fmt::Debug for Backends {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Backends").finish_non_exhaustive()
    }
}
