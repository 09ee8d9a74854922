//! Win detection logic for tic-tac-toe.

use super::super::{Board, Cell, Mark, Position};
use tracing::instrument;

/// The eight lines that win the game.
pub const LINES: [[Position; 3]; 8] = [
    // Rows
    [Position::TopLeft, Position::TopCenter, Position::TopRight],
    [
        Position::MiddleLeft,
        Position::Center,
        Position::MiddleRight,
    ],
    [
        Position::BottomLeft,
        Position::BottomCenter,
        Position::BottomRight,
    ],
    // Columns
    [
        Position::TopLeft,
        Position::MiddleLeft,
        Position::BottomLeft,
    ],
    [
        Position::TopCenter,
        Position::Center,
        Position::BottomCenter,
    ],
    [
        Position::TopRight,
        Position::MiddleRight,
        Position::BottomRight,
    ],
    // Diagonals
    [Position::TopLeft, Position::Center, Position::BottomRight],
    [Position::TopRight, Position::Center, Position::BottomLeft],
];

/// Returns true if `mark` fills some row, column or diagonal.
#[instrument(skip(board))]
pub fn has_line(board: &Board, mark: Mark) -> bool {
    let target = Cell::Occupied(mark);
    LINES
        .iter()
        .any(|line| line.iter().all(|&pos| board.get(pos) == target))
}

/// Checks if there is a winner on the board.
///
/// Both marks are checked; the human is checked first. Under alternating
/// play at most one of them can own a line.
#[instrument(skip(board))]
pub fn check_winner(board: &Board) -> Option<Mark> {
    [Mark::Human, Mark::Ai]
        .into_iter()
        .find(|&mark| has_line(board, mark))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_winner_empty_board() {
        let board = Board::new();
        assert_eq!(check_winner(&board), None);
    }

    #[test]
    fn test_winner_top_row() {
        let board = Board::from_flat([1, 1, 1, 0, -1, 0, 0, 0, -1]);
        assert_eq!(check_winner(&board), Some(Mark::Human));
    }

    #[test]
    fn test_winner_anti_diagonal() {
        let board = Board::from_flat([1, 1, -1, 0, -1, 1, -1, 0, 0]);
        assert_eq!(check_winner(&board), Some(Mark::Ai));
    }

    #[test]
    fn test_no_winner_incomplete() {
        let board = Board::from_flat([1, 1, 0, 0, -1, 0, 0, 0, 0]);
        assert_eq!(check_winner(&board), None);
    }
}
