//! Move selection for the AI side.

use super::predictor::Predictor;
use crate::error::GameError;
use crate::games::tictactoe::{Board, Position};
use tracing::{debug, instrument};

/// Picks the empty square the predictor scores highest.
///
/// Ties go to the lowest index. Occupied squares are never considered,
/// whatever their score.
///
/// # Errors
///
/// [`GameError::NoPredictorAvailable`] when `predictor` is `None`.
/// [`GameError::NoEmptySquare`] when the board is already full.
#[instrument(skip(board, predictor))]
pub fn choose_move<P>(board: &Board, predictor: Option<&P>) -> Result<Position, GameError>
where
    P: Predictor + ?Sized,
{
    let predictor = predictor.ok_or(GameError::NoPredictorAvailable)?;
    let scores = predictor.score(&board.flatten());

    let mut best: Option<(Position, f32)> = None;
    for pos in Position::valid_moves(board) {
        let score = scores[pos.to_index()];
        let score = if score.is_nan() { f32::NEG_INFINITY } else { score };
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((pos, score)),
        }
    }

    let (pos, score) = best.ok_or(GameError::NoEmptySquare)?;
    debug!(position = pos.to_index(), score, "AI chose position");
    Ok(pos)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::Mark;

    struct Fixed([f32; 9]);

    impl Predictor for Fixed {
        fn score(&self, _state: &[i8; 9]) -> [f32; 9] {
            self.0
        }
    }

    #[test]
    fn test_skips_occupied_best_score() {
        let mut board = Board::new();
        board.place(2, Mark::Human).unwrap();
        let p = Fixed([0.1, 0.2, 0.9, 0.3, 0.0, 0.0, 0.0, 0.0, 0.0]);
        assert_eq!(choose_move(&board, Some(&p)), Ok(Position::MiddleLeft));
    }

    #[test]
    fn test_tie_goes_to_lowest_index() {
        let board = Board::new();
        let p = Fixed([0.0, 0.5, 0.0, 0.0, 0.0, 0.5, 0.0, 0.0, 0.5]);
        assert_eq!(choose_move(&board, Some(&p)), Ok(Position::TopCenter));
    }

    #[test]
    fn test_full_board() {
        let board = Board::from_flat([1, -1, 1, -1, 1, 1, -1, 1, -1]);
        let p = Fixed([0.0; 9]);
        assert_eq!(choose_move(&board, Some(&p)), Err(GameError::NoEmptySquare));
    }

    #[test]
    fn test_missing_predictor() {
        let board = Board::new();
        assert_eq!(
            choose_move::<Fixed>(&board, None),
            Err(GameError::NoPredictorAvailable)
        );
    }
}
