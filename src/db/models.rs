//! Database models and their conversions to game types.

use chrono::NaiveDateTime;
use derive_getters::Getters;
use derive_new::new;
use diesel::prelude::*;
use tracing::{debug, instrument};

use crate::db::schema;
use crate::leaderboard::LeaderboardEntry;
use crate::records::{TrainingRecord, decode_state};

/// Leaderboard row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::leaderboard)]
pub struct LeaderboardRow {
    id: i32,
    nickname: String,
    total_games: i32,
    wins_human: i32,
    wins_ai: i32,
    draws: i32,
    created_at: NaiveDateTime,
    updated_at: NaiveDateTime,
}

fn counter(value: i32) -> u32 {
    u32::try_from(value).unwrap_or(0)
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        LeaderboardEntry::new(
            row.nickname,
            counter(row.total_games),
            counter(row.wins_human),
            counter(row.wins_ai),
            counter(row.draws),
        )
    }
}

/// Insertable leaderboard row for a nickname's first round.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::leaderboard)]
pub struct NewLeaderboardRow {
    nickname: String,
    total_games: i32,
    wins_human: i32,
    wins_ai: i32,
    draws: i32,
}

impl From<&LeaderboardEntry> for NewLeaderboardRow {
    fn from(entry: &LeaderboardEntry) -> Self {
        let clamp = |v: u32| i32::try_from(v).unwrap_or(i32::MAX);
        Self::new(
            entry.nickname().clone(),
            clamp(entry.total_games()),
            clamp(entry.wins_human()),
            clamp(entry.wins_ai()),
            clamp(entry.draws()),
        )
    }
}

/// Stored history row.
#[derive(Debug, Clone, Queryable, Identifiable, Selectable, Getters)]
#[diesel(table_name = schema::history)]
pub struct HistoryRow {
    id: i32,
    state: String,
    position: i32,
    recorded_at: NaiveDateTime,
}

impl HistoryRow {
    /// Converts to a record, `None` when the stored state or move is unusable.
    #[instrument(skip(self), fields(id = self.id))]
    pub fn to_record(&self) -> Option<TrainingRecord> {
        let state = decode_state(&self.state)?;
        match usize::try_from(self.position) {
            Ok(p) if p < 9 => Some(TrainingRecord::new(state, p)),
            _ => {
                debug!(position = self.position, "Skipping history row");
                None
            }
        }
    }
}

/// Insertable history row.
#[derive(Debug, Clone, Insertable, new)]
#[diesel(table_name = schema::history)]
pub struct NewHistoryRow {
    state: String,
    position: i32,
}

impl From<&TrainingRecord> for NewHistoryRow {
    fn from(record: &TrainingRecord) -> Self {
        // Positions are always 0-8.
        Self::new(record.state_string(), record.position() as i32)
    }
}
