//! Text rendering for the terminal: rules, board, leaderboard.

use crate::games::tictactoe::{Board, Cell, Position};
use crate::leaderboard::Leaderboard;
use crossterm::style::Stylize;

/// Rules and the numbered grid shown before the first round.
pub fn start_screen() -> String {
    let mut out = String::from("Game rules:\n");
    out.push_str("Your turn will have symbol 'X', the AI turn - symbol 'O'.\n");
    out.push_str(
        "The winner must have three of their symbols in a line, \
         vertically, horizontally or diagonally.\n",
    );
    out.push_str("\nGameplay field:\n\n");
    for row in 0..3 {
        let cells: Vec<String> = (0..3).map(|col| (row * 3 + col).to_string()).collect();
        out.push_str(&format!(" {} \n", cells.join(" | ")));
        if row < 2 {
            out.push_str(" --------- \n");
        }
    }
    out
}

/// Current board next to a position guide; used squares show `*` in the guide.
pub fn render_board(board: &Board) -> String {
    let mut out = String::from("Current board:       Positions:\n");
    for (row, cells) in board.rows().iter().enumerate() {
        let marks: Vec<String> = cells.iter().map(|c| c.symbol().to_string()).collect();
        let guide: Vec<String> = (0..3)
            .map(|col| {
                let index = row * 3 + col;
                match Position::from_index(index).map(|pos| board.get(pos)) {
                    Some(Cell::Empty) => index.to_string(),
                    _ => "*".to_string(),
                }
            })
            .collect();
        out.push_str(&format!(
            "  {}           {}\n",
            marks.join(" | "),
            guide.join(" | ")
        ));
        if row < 2 {
            out.push_str(" ---+---+---         ---+---+---\n");
        }
    }
    out
}

const HEADERS: [&str; 6] = [
    "PP",
    "Human Nickname",
    "Total Games",
    "Win Human",
    "Win AI",
    "Draw",
];

/// Ranked leaderboard table. The row of `current` (if any) is highlighted.
pub fn render_leaderboard(board: &Leaderboard, current: Option<&str>) -> String {
    let mut out = String::from("\nLeadersboard\n");
    if board.is_empty() {
        out.push_str(&HEADERS.join(" | "));
        return out;
    }

    let rows: Vec<[String; 6]> = board
        .ranked()
        .iter()
        .enumerate()
        .map(|(i, e)| {
            [
                (i + 1).to_string(),
                e.nickname().clone(),
                e.total_games().to_string(),
                e.wins_human().to_string(),
                e.wins_ai().to_string(),
                e.draws().to_string(),
            ]
        })
        .collect();

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .zip(widths)
            .map(|(c, w)| format!("{:<w$}", c, w = w))
            .collect::<Vec<_>>()
            .join(" | ")
    };

    let header: Vec<String> = HEADERS.iter().map(|h| h.to_string()).collect();
    out.push_str(&format_row(&header));
    out.push('\n');
    out.push_str(&"-".repeat(widths.iter().sum::<usize>() + 3 * (HEADERS.len() - 1)));

    for row in &rows {
        let line = format_row(row);
        out.push('\n');
        if current == Some(row[1].as_str()) {
            out.push_str(&line.yellow().to_string());
        } else {
            out.push_str(&line);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::games::tictactoe::Mark;
    use crate::leaderboard::LeaderboardEntry;

    #[test]
    fn test_start_screen_lists_every_index() {
        let screen = start_screen();
        assert!(screen.contains(" 0 | 1 | 2 "));
        assert!(screen.contains(" 6 | 7 | 8 "));
    }

    #[test]
    fn test_board_guide_hides_used_squares() {
        let mut board = Board::new();
        board.place(0, Mark::Human).unwrap();
        board.place(4, Mark::Ai).unwrap();
        let text = render_board(&board);
        assert!(text.contains("  X |   |             * | 1 | 2"));
        assert!(text.contains("    | O |             3 | * | 5"));
    }

    #[test]
    fn test_empty_leaderboard_prints_headers_only() {
        let text = render_leaderboard(&Leaderboard::default(), None);
        assert!(text.ends_with("PP | Human Nickname | Total Games | Win Human | Win AI | Draw"));
    }

    #[test]
    fn test_leaderboard_rows_are_ranked() {
        let board = Leaderboard::new(vec![
            LeaderboardEntry::new("low".into(), 3, 0, 3, 0),
            LeaderboardEntry::new("high".into(), 3, 2, 1, 0),
        ]);
        let text = render_leaderboard(&board, None);
        let high = text.find("high").unwrap();
        let low = text.find("low").unwrap();
        assert!(high < low);
        assert!(text.contains("1  | high"));
    }
}
