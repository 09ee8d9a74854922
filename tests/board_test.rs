//! Tests for the board, positions and placement rules.

use tictactoe_ai::{Board, Cell, GameError, Mark, MoveRejection, Position};

#[test]
fn test_position_to_index() {
    assert_eq!(Position::TopLeft.to_index(), 0);
    assert_eq!(Position::Center.to_index(), 4);
    assert_eq!(Position::BottomRight.to_index(), 8);
}

#[test]
fn test_position_from_index() {
    assert_eq!(Position::from_index(0), Some(Position::TopLeft));
    assert_eq!(Position::from_index(4), Some(Position::Center));
    assert_eq!(Position::from_index(8), Some(Position::BottomRight));
    assert_eq!(Position::from_index(9), None);
}

#[test]
fn test_row_and_column_from_index() {
    for index in 0..9 {
        let pos = Position::from_index(index).unwrap();
        assert_eq!(pos.row(), index / 3);
        assert_eq!(pos.col(), index % 3);
    }
}

#[test]
fn test_parse_index_trims_and_rejects_text() {
    assert_eq!(Position::parse_index(" 7\n"), Some(7));
    assert_eq!(Position::parse_index("seven"), None);
    assert_eq!(Position::parse_index("-1"), None);
}

#[test]
fn test_empty_board_flattens_to_zeros() {
    assert_eq!(Board::new().flatten(), [0; 9]);
}

#[test]
fn test_valid_moves_empty_board() {
    let board = Board::new();
    let valid = Position::valid_moves(&board);
    assert_eq!(valid.len(), 9); // All positions valid on empty board
}

#[test]
fn test_valid_moves_filters_occupied() {
    let mut board = Board::new();
    board.place(0, Mark::Human).unwrap();
    board.place(4, Mark::Ai).unwrap();

    let valid = Position::valid_moves(&board);
    assert_eq!(valid.len(), 7); // 2 occupied, 7 free
    assert!(!valid.contains(&Position::TopLeft));
    assert!(!valid.contains(&Position::Center));
    assert!(valid.contains(&Position::BottomRight));
}

#[test]
fn test_place_sets_single_cell() {
    let mut board = Board::new();
    let pos = board.place(5, Mark::Ai).unwrap();
    assert_eq!(pos, Position::MiddleRight);
    assert_eq!(board.get(pos), Cell::Occupied(Mark::Ai));
    assert_eq!(board.flatten(), [0, 0, 0, 0, 0, -1, 0, 0, 0]);
}

#[test]
fn test_flatten_is_row_major() {
    let mut board = Board::new();
    board.place(0, Mark::Human).unwrap();
    board.place(2, Mark::Ai).unwrap();
    board.place(6, Mark::Human).unwrap();
    assert_eq!(board.flatten(), [1, 0, -1, 0, 0, 0, 1, 0, 0]);
}

#[test]
fn test_rejected_placement_leaves_board_unchanged() {
    let mut board = Board::new();
    board.place(3, Mark::Human).unwrap();
    let before = board.clone();

    let occupied = board.place(3, Mark::Ai);
    assert_eq!(
        occupied,
        Err(GameError::InvalidMove {
            index: 3,
            reason: MoveRejection::Occupied
        })
    );
    assert_eq!(board, before);

    let out_of_range = board.place(9, Mark::Ai);
    assert_eq!(
        out_of_range,
        Err(GameError::InvalidMove {
            index: 9,
            reason: MoveRejection::OutOfRange
        })
    );
    assert_eq!(board, before);
}

#[test]
fn test_alternating_placements_keep_count_difference() {
    let mut board = Board::new();
    let mut mark = Mark::Human;
    for index in [4, 0, 8, 2, 6, 7, 1, 3, 5] {
        board.place(index, mark).unwrap();
        let diff = board.count(Mark::Human) as i32 - board.count(Mark::Ai) as i32;
        assert!(diff == 0 || diff == 1, "difference {} after {}", diff, index);
        mark = mark.opponent();
    }
}

#[test]
fn test_from_flat_round_trips_values() {
    let values = [1, -1, 0, 0, 1, 0, -1, 0, 0];
    assert_eq!(Board::from_flat(values).flatten(), values);
}

#[test]
fn test_reset_empties_board() {
    let mut board = Board::new();
    board.place(1, Mark::Human).unwrap();
    board.reset();
    assert_eq!(board, Board::new());
}
