//! Training records: a board state paired with the move taken from it.

use crate::games::tictactoe::{Board, Cell};
use derive_getters::Getters;
use derive_new::new;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// One observed move: the flattened board *before* the move and the index played.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Getters, new)]
pub struct TrainingRecord {
    state: [i8; 9],
    #[getter(copy)]
    position: usize,
}

impl TrainingRecord {
    /// Captures `board` as it stands, paired with the move about to be played.
    pub fn from_board(board: &Board, position: usize) -> Self {
        Self::new(board.flatten(), position)
    }

    /// The state as the 9-character history string over `X`, `O` and space.
    pub fn state_string(&self) -> String {
        encode_state(&self.state)
    }

    /// Parses a stored history row `[state_string, move]`.
    ///
    /// Rows with fewer than two columns, an empty or malformed state, or a
    /// move outside 0-8 are skipped and yield `None`.
    #[instrument]
    pub fn from_row(row: &[String]) -> Option<Self> {
        let [state, position, ..] = row else {
            debug!("History row has fewer than two columns");
            return None;
        };
        if state.is_empty() {
            return None;
        }
        let state = decode_state(state)?;
        let position = match position.trim().parse::<usize>() {
            Ok(p) if p < 9 => p,
            _ => {
                debug!(position = %position, "History row has an unusable move");
                return None;
            }
        };
        Some(Self::new(state, position))
    }
}

/// Encodes a flattened board as `X`/`O`/space characters.
pub fn encode_state(state: &[i8; 9]) -> String {
    state.iter().map(|&v| Cell::from_value(v).symbol()).collect()
}

/// Decodes a 9-character state string. Unknown characters count as empty.
#[instrument]
pub fn decode_state(s: &str) -> Option<[i8; 9]> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() != 9 {
        debug!(len = chars.len(), "State string has the wrong length");
        return None;
    }
    let mut state = [0i8; 9];
    for (slot, c) in state.iter_mut().zip(chars) {
        *slot = match c {
            'X' => 1,
            'O' => -1,
            _ => 0,
        };
    }
    Some(state)
}

/// Parses every usable row of a history sheet, skipping the rest.
#[instrument(skip(rows), fields(rows = rows.len()))]
pub fn parse_history(rows: &[Vec<String>]) -> Vec<TrainingRecord> {
    let records: Vec<TrainingRecord> = rows
        .iter()
        .filter_map(|row| TrainingRecord::from_row(row))
        .collect();
    debug!(parsed = records.len(), "History parsed");
    records
}
