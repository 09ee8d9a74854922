//! Core domain types for tic-tac-toe.

use super::position::Position;
use crate::error::{GameError, MoveRejection};
use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Side in the game. The human always opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// The human player, shown as `X`.
    Human,
    /// The predictor-driven opponent, shown as `O`.
    Ai,
}

impl Mark {
    /// Returns the opponent.
    pub fn opponent(self) -> Self {
        match self {
            Mark::Human => Mark::Ai,
            Mark::Ai => Mark::Human,
        }
    }

    /// Numeric encoding used by [`Board::flatten`].
    pub fn value(self) -> i8 {
        match self {
            Mark::Human => 1,
            Mark::Ai => -1,
        }
    }

    /// Display symbol.
    pub fn symbol(self) -> char {
        match self {
            Mark::Human => 'X',
            Mark::Ai => 'O',
        }
    }
}

/// A square on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    /// Empty square.
    Empty,
    /// Square occupied by a mark.
    Occupied(Mark),
}

impl Cell {
    /// Numeric encoding: Human = 1, AI = -1, Empty = 0.
    pub fn value(self) -> i8 {
        match self {
            Cell::Empty => 0,
            Cell::Occupied(mark) => mark.value(),
        }
    }

    /// Decodes the numeric encoding. Any value other than 1 and -1 is empty.
    pub fn from_value(value: i8) -> Self {
        match value {
            1 => Cell::Occupied(Mark::Human),
            -1 => Cell::Occupied(Mark::Ai),
            _ => Cell::Empty,
        }
    }

    /// Display symbol (`X`, `O` or a space).
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => ' ',
            Cell::Occupied(mark) => mark.symbol(),
        }
    }
}

/// 3x3 tic-tac-toe board.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    /// Squares in row-major order (0-8).
    squares: [Cell; 9],
}

impl Board {
    /// Creates a new empty board.
    pub fn new() -> Self {
        Self {
            squares: [Cell::Empty; 9],
        }
    }

    /// Builds a board from its flattened encoding.
    pub fn from_flat(values: [i8; 9]) -> Self {
        Self {
            squares: values.map(Cell::from_value),
        }
    }

    /// Gets the square at the given position.
    pub fn get(&self, pos: Position) -> Cell {
        self.squares[pos.to_index()]
    }

    /// Checks if a square is empty.
    pub fn is_empty(&self, pos: Position) -> bool {
        self.get(pos) == Cell::Empty
    }

    /// Returns all squares in row-major order.
    pub fn squares(&self) -> &[Cell; 9] {
        &self.squares
    }

    /// Places `mark` at board index `index`.
    ///
    /// # Errors
    ///
    /// Returns [`GameError::InvalidMove`] if the index is outside 0-8 or the
    /// square is taken. The board is left untouched in both cases.
    #[instrument(skip(self))]
    pub fn place(&mut self, index: usize, mark: Mark) -> Result<Position, GameError> {
        let pos = Position::from_index(index).ok_or(GameError::InvalidMove {
            index,
            reason: MoveRejection::OutOfRange,
        })?;

        if !self.is_empty(pos) {
            return Err(GameError::InvalidMove {
                index,
                reason: MoveRejection::Occupied,
            });
        }

        self.squares[index] = Cell::Occupied(mark);
        Ok(pos)
    }

    /// Row-major encoding: Human = 1, AI = -1, Empty = 0.
    pub fn flatten(&self) -> [i8; 9] {
        self.squares.map(Cell::value)
    }

    /// Number of squares holding `mark`.
    pub fn count(&self, mark: Mark) -> usize {
        self.squares
            .iter()
            .filter(|&&c| c == Cell::Occupied(mark))
            .count()
    }

    /// Clears every square.
    pub fn reset(&mut self) {
        self.squares = [Cell::Empty; 9];
    }

    /// Returns the rows of the board, top to bottom.
    pub fn rows(&self) -> [[Cell; 3]; 3] {
        let s = &self.squares;
        [[s[0], s[1], s[2]], [s[3], s[4], s[5]], [s[6], s[7], s[8]]]
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_place_rejects_occupied_without_mutation() {
        let mut board = Board::new();
        board.place(4, Mark::Human).unwrap();
        let before = board.clone();

        let err = board.place(4, Mark::Ai).unwrap_err();
        assert_eq!(
            err,
            GameError::InvalidMove {
                index: 4,
                reason: MoveRejection::Occupied
            }
        );
        assert_eq!(board, before);
    }

    #[test]
    fn test_flatten_encoding() {
        let mut board = Board::new();
        board.place(0, Mark::Human).unwrap();
        board.place(8, Mark::Ai).unwrap();
        assert_eq!(board.flatten(), [1, 0, 0, 0, 0, 0, 0, 0, -1]);
        assert_eq!(Board::from_flat(board.flatten()), board);
    }

    #[test]
    fn test_reset_clears_board() {
        let mut board = Board::new();
        board.place(3, Mark::Human).unwrap();
        board.reset();
        assert_eq!(board, Board::new());
    }
}
