//! Tests for AI move selection.

use tictactoe_ai::{
    Board, GameError, Mark, MoveNetwork, Position, Predictor, TrainingConfig, TrainingRecord,
    choose_move,
};

/// Lookup table predictor: the same scores for every state.
struct Table([f32; 9]);

impl Predictor for Table {
    fn score(&self, _state: &[i8; 9]) -> [f32; 9] {
        self.0
    }
}

#[test]
fn test_no_predictor_is_reported() {
    let mut board = Board::new();
    board.place(4, Mark::Human).unwrap();
    let result = choose_move::<Table>(&board, None);
    assert_eq!(result, Err(GameError::NoPredictorAvailable));
}

#[test]
fn test_highest_scoring_empty_square_wins() {
    let table = Table([0.1, 0.2, 0.9, 0.0, 0.95, 0.0, 0.3, 0.0, 0.0]);
    let mut board = Board::new();
    board.place(4, Mark::Human).unwrap();
    assert_eq!(choose_move(&board, Some(&table)), Ok(Position::TopRight));
}

#[test]
fn test_ties_go_to_lowest_index() {
    let table = Table([0.0, 0.5, 0.0, 0.5, 0.0, 0.5, 0.0, 0.0, 0.0]);
    let board = Board::new();
    assert_eq!(choose_move(&board, Some(&table)), Ok(Position::TopCenter));
}

#[test]
fn test_occupied_squares_never_chosen() {
    let table = Table([9.0, 8.0, 7.0, 6.0, 5.0, 4.0, 3.0, 2.0, 1.0]);
    let board = Board::from_flat([1, -1, 1, -1, 1, 0, 0, 0, 0]);
    let pos = choose_move(&board, Some(&table)).unwrap();
    assert_eq!(pos, Position::MiddleRight);
    assert!(board.is_empty(pos));
}

#[test]
fn test_full_board_has_no_move() {
    let table = Table([1.0; 9]);
    let board = Board::from_flat([1, -1, 1, 1, -1, -1, -1, 1, 1]);
    assert_eq!(choose_move(&board, Some(&table)), Err(GameError::NoEmptySquare));
}

#[test]
fn test_trained_network_always_picks_empty_and_is_reproducible() {
    let history = vec![
        TrainingRecord::new([0; 9], 4),
        TrainingRecord::new([0, 0, 0, 0, 1, 0, 0, 0, 0], 0),
        TrainingRecord::new([-1, 0, 0, 0, 1, 0, 0, 0, 0], 8),
    ];
    let config = TrainingConfig::default().with_hidden_units(16).with_epochs(20);
    let network = MoveNetwork::train(&history, &config).expect("Non-empty history");

    let boards = [
        Board::new(),
        Board::from_flat([0, 0, 0, 0, 1, 0, 0, 0, 0]),
        Board::from_flat([1, -1, 1, 0, 1, -1, 0, 0, 0]),
        Board::from_flat([1, -1, 1, -1, 1, -1, 0, 0, 0]),
    ];
    for board in &boards {
        let first = choose_move(board, Some(&network)).unwrap();
        assert!(board.is_empty(first));
        assert_eq!(choose_move(board, Some(&network)).unwrap(), first);
    }
}

#[test]
fn test_works_through_trait_object() {
    let table: Box<dyn Predictor> = Box::new(Table([0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 1.0]));
    let pos = choose_move(&Board::new(), Some(table.as_ref())).unwrap();
    assert_eq!(pos, Position::BottomRight);
}
