//! SQLite repository for the move history and the leaderboard.

use diesel::prelude::*;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::{debug, info, instrument};

use crate::db::{HistoryRow, LeaderboardRow, NewHistoryRow, NewLeaderboardRow, schema};
use crate::error::{BoundaryError, BoundaryErrorKind};
use crate::leaderboard::{GameResult, Leaderboard, LeaderboardEntry};
use crate::records::TrainingRecord;

const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Database repository for history and leaderboard operations.
#[derive(Debug, Clone)]
pub struct GameRepository {
    db_path: String,
}

impl GameRepository {
    /// Opens the database at `db_path`, creating it and applying pending migrations.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if the database cannot be opened or migrated.
    #[instrument(skip(db_path), fields(db_path = %db_path))]
    pub fn open(db_path: String) -> Result<Self, BoundaryError> {
        info!(path = %db_path, "Opening GameRepository");
        let repo = Self { db_path };
        let mut conn = repo.connection()?;
        let applied = conn.run_pending_migrations(MIGRATIONS).map_err(|e| {
            BoundaryError::new(BoundaryErrorKind::Storage, format!("Migrations failed: {}", e))
        })?;
        debug!(applied = applied.len(), "Migrations applied");
        Ok(repo)
    }

    /// Establishes a database connection.
    #[instrument(skip(self))]
    fn connection(&self) -> Result<SqliteConnection, BoundaryError> {
        debug!(path = %self.db_path, "Establishing connection");
        SqliteConnection::establish(&self.db_path).map_err(|e| {
            BoundaryError::new(
                BoundaryErrorKind::Storage,
                format!("Failed to connect to '{}': {}", self.db_path, e),
            )
        })
    }

    /// Appends one move to the history.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if a database error occurs.
    #[instrument(skip(self, record), fields(position = record.position()))]
    pub fn append_record(&self, record: &TrainingRecord) -> Result<(), BoundaryError> {
        let mut conn = self.connection()?;
        diesel::insert_into(schema::history::table)
            .values(NewHistoryRow::from(record))
            .execute(&mut conn)?;
        debug!("History row inserted");
        Ok(())
    }

    /// Loads every usable history row in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn load_history(&self) -> Result<Vec<TrainingRecord>, BoundaryError> {
        let mut conn = self.connection()?;
        let rows = schema::history::table
            .order(schema::history::id.asc())
            .select(HistoryRow::as_select())
            .load(&mut conn)?;
        let records: Vec<TrainingRecord> = rows.iter().filter_map(HistoryRow::to_record).collect();
        info!(rows = rows.len(), usable = records.len(), "History loaded");
        Ok(records)
    }

    /// Loads the leaderboard in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn load_leaderboard(&self) -> Result<Leaderboard, BoundaryError> {
        let mut conn = self.connection()?;
        let rows = schema::leaderboard::table
            .order(schema::leaderboard::id.asc())
            .select(LeaderboardRow::as_select())
            .load(&mut conn)?;
        info!(count = rows.len(), "Leaderboard loaded");
        Ok(Leaderboard::new(rows.into_iter().map(Into::into).collect()))
    }

    /// Counts one finished round for `nickname`, inserting the row on first appearance.
    ///
    /// # Errors
    ///
    /// Returns [`BoundaryError`] if a database error occurs.
    #[instrument(skip(self))]
    pub fn record_result(&self, nickname: &str, result: GameResult) -> Result<(), BoundaryError> {
        use schema::leaderboard::dsl;

        let mut conn = self.connection()?;
        conn.transaction::<_, diesel::result::Error, _>(|conn| {
            let target = dsl::leaderboard.filter(dsl::nickname.eq(nickname));
            let total = dsl::total_games.eq(dsl::total_games + 1);
            let stamp = dsl::updated_at.eq(diesel::dsl::now);
            let updated = match result {
                GameResult::Win => diesel::update(target)
                    .set((total, dsl::wins_human.eq(dsl::wins_human + 1), stamp))
                    .execute(conn)?,
                GameResult::Lose => diesel::update(target)
                    .set((total, dsl::wins_ai.eq(dsl::wins_ai + 1), stamp))
                    .execute(conn)?,
                GameResult::Draw => diesel::update(target)
                    .set((total, dsl::draws.eq(dsl::draws + 1), stamp))
                    .execute(conn)?,
            };
            if updated == 0 {
                let entry = LeaderboardEntry::first(nickname.to_string(), result);
                diesel::insert_into(dsl::leaderboard)
                    .values(NewLeaderboardRow::from(&entry))
                    .execute(conn)?;
                info!(nickname, "Leaderboard row created");
            }
            Ok(())
        })?;
        debug!(%result, "Leaderboard updated");
        Ok(())
    }
}
