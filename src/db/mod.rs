//! SQLite persistence for offline play: history, leaderboard and a model file.

mod model_file;
mod models;
mod repository;
mod schema; // Diesel generated schema - internal use only

pub use model_file::FsModelStore;
pub use models::{HistoryRow, LeaderboardRow, NewHistoryRow, NewLeaderboardRow};
pub use repository::GameRepository;

use crate::config::SqliteConfig;
use crate::error::BoundaryError;
use crate::leaderboard::{GameResult, Leaderboard};
use crate::ports::{Backends, HistorySink, LeaderboardStore};
use crate::records::TrainingRecord;
use async_trait::async_trait;

#[async_trait]
impl HistorySink for GameRepository {
    async fn read_history(&self) -> Result<Vec<TrainingRecord>, BoundaryError> {
        self.load_history()
    }

    async fn append_record(&self, record: &TrainingRecord) -> Result<(), BoundaryError> {
        GameRepository::append_record(self, record)
    }
}

#[async_trait]
impl LeaderboardStore for GameRepository {
    async fn read_leaderboard(&self) -> Result<Leaderboard, BoundaryError> {
        self.load_leaderboard()
    }

    async fn update_leaderboard(
        &self,
        nickname: &str,
        result: GameResult,
    ) -> Result<(), BoundaryError> {
        self.record_result(nickname, result)
    }
}

/// Opens the database and the model file named in `config`.
///
/// # Errors
///
/// Returns [`BoundaryError`] if the database cannot be opened or migrated.
pub fn sqlite_backends(config: &SqliteConfig) -> Result<Backends, BoundaryError> {
    let repo = GameRepository::open(config.database_path().clone())?;
    Ok(Backends {
        history: Box::new(repo.clone()),
        leaderboard: Box::new(repo),
        predictors: Box::new(FsModelStore::new(config.model_path().clone())),
    })
}
