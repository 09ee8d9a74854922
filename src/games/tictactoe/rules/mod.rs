//! Game rules for tic-tac-toe.
//!
//! Pure functions over a [`Board`]; nothing here mutates state, so the
//! outcome can be recomputed after every move.

pub mod draw;
pub mod win;

pub use draw::{is_draw, is_full};
pub use win::{LINES, check_winner, has_line};

use super::{Board, Mark};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Classification of a board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// Moves remain and nobody has a line.
    Ongoing,
    /// The mark owns a full line.
    Win(Mark),
    /// Every square is filled and nobody has a line.
    Draw,
}

impl Outcome {
    /// True for `Win` and `Draw`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Evaluates the board: a line wins, a full board without one is a draw.
#[instrument(skip(board))]
pub fn evaluate(board: &Board) -> Outcome {
    let outcome = if let Some(winner) = check_winner(board) {
        Outcome::Win(winner)
    } else if is_full(board) {
        Outcome::Draw
    } else {
        Outcome::Ongoing
    };
    debug!(?outcome, "Board evaluated");
    outcome
}
