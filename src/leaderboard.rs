//! Per-player results and the leaderboard ranking.

use crate::games::tictactoe::{Mark, Outcome};
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Round result from the human's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameResult {
    /// The human completed a line.
    Win,
    /// The AI completed a line.
    Lose,
    /// Full board, no line.
    Draw,
}

impl GameResult {
    /// Classifies a terminal outcome. `Ongoing` has no result.
    pub fn from_outcome(outcome: Outcome) -> Option<Self> {
        match outcome {
            Outcome::Win(Mark::Human) => Some(Self::Win),
            Outcome::Win(Mark::Ai) => Some(Self::Lose),
            Outcome::Draw => Some(Self::Draw),
            Outcome::Ongoing => None,
        }
    }

    /// The label stored by the backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Win => "Win",
            Self::Lose => "Lose",
            Self::Draw => "Draw",
        }
    }

    /// Parses a stored label.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Win" => Some(Self::Win),
            "Lose" => Some(Self::Lose),
            "Draw" => Some(Self::Draw),
            _ => None,
        }
    }
}

impl std::fmt::Display for GameResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregated results for one nickname.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters)]
pub struct LeaderboardEntry {
    nickname: String,
    #[getter(copy)]
    total_games: u32,
    #[getter(copy)]
    wins_human: u32,
    #[getter(copy)]
    wins_ai: u32,
    #[getter(copy)]
    draws: u32,
}

impl LeaderboardEntry {
    /// Creates an entry with explicit counters, as read from a backend.
    pub fn new(
        nickname: String,
        total_games: u32,
        wins_human: u32,
        wins_ai: u32,
        draws: u32,
    ) -> Self {
        Self {
            nickname,
            total_games,
            wins_human,
            wins_ai,
            draws,
        }
    }

    /// A player seen for the first time, with this single result.
    pub fn first(nickname: String, result: GameResult) -> Self {
        let mut entry = Self::new(nickname, 0, 0, 0, 0);
        entry.record(result);
        entry
    }

    /// Counts one more finished round.
    pub fn record(&mut self, result: GameResult) {
        self.total_games += 1;
        match result {
            GameResult::Win => self.wins_human += 1,
            GameResult::Lose => self.wins_ai += 1,
            GameResult::Draw => self.draws += 1,
        }
    }

    /// Human win rate as a percentage (0.0–100.0).
    pub fn win_rate(&self) -> f64 {
        if self.total_games == 0 {
            0.0
        } else {
            (self.wins_human as f64 / self.total_games as f64) * 100.0
        }
    }
}

/// All entries, kept in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leaderboard {
    entries: Vec<LeaderboardEntry>,
}

impl Leaderboard {
    /// Creates a leaderboard from entries in their stored order.
    pub fn new(entries: Vec<LeaderboardEntry>) -> Self {
        Self { entries }
    }

    /// Entries in insertion order.
    pub fn entries(&self) -> &[LeaderboardEntry] {
        &self.entries
    }

    /// Looks up a nickname (exact, case-sensitive).
    pub fn get(&self, nickname: &str) -> Option<&LeaderboardEntry> {
        self.entries.iter().find(|e| e.nickname == nickname)
    }

    /// Applies a round result, appending a new entry on first appearance.
    #[instrument(skip(self))]
    pub fn apply(&mut self, nickname: &str, result: GameResult) {
        match self.entries.iter_mut().find(|e| e.nickname == nickname) {
            Some(entry) => {
                entry.record(result);
                debug!(total = entry.total_games, "Existing entry updated");
            }
            None => {
                self.entries.push(LeaderboardEntry::first(nickname.to_string(), result));
                debug!("New entry appended");
            }
        }
    }

    /// Entries ranked by human wins, highest first. Equal wins keep insertion order.
    pub fn ranked(&self) -> Vec<&LeaderboardEntry> {
        let mut ranked: Vec<&LeaderboardEntry> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.wins_human.cmp(&a.wins_human));
        ranked
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when nobody has played yet.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_outcome() {
        assert_eq!(GameResult::from_outcome(Outcome::Win(Mark::Human)), Some(GameResult::Win));
        assert_eq!(GameResult::from_outcome(Outcome::Win(Mark::Ai)), Some(GameResult::Lose));
        assert_eq!(GameResult::from_outcome(Outcome::Draw), Some(GameResult::Draw));
        assert_eq!(GameResult::from_outcome(Outcome::Ongoing), None);
    }

    #[test]
    fn test_labels_round_trip() {
        for result in [GameResult::Win, GameResult::Lose, GameResult::Draw] {
            assert_eq!(GameResult::parse(result.as_str()), Some(result));
        }
        assert_eq!(GameResult::parse("win"), None);
    }

    #[test]
    fn test_win_rate() {
        let entry = LeaderboardEntry::new("ann".into(), 4, 1, 2, 1);
        assert!((entry.win_rate() - 25.0).abs() < f64::EPSILON);
        assert_eq!(LeaderboardEntry::new("bo".into(), 0, 0, 0, 0).win_rate(), 0.0);
    }
}
