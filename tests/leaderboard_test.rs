//! Tests for leaderboard aggregation, ranking and rendering.

use tictactoe_ai::{
    GameResult, Leaderboard, LeaderboardColumns, LeaderboardEntry, Mark, Outcome,
    render_leaderboard,
};

fn entry(name: &str, wins: u32) -> LeaderboardEntry {
    LeaderboardEntry::new(name.to_string(), wins + 1, wins, 1, 0)
}

#[test]
fn test_result_from_outcome() {
    assert_eq!(GameResult::from_outcome(Outcome::Win(Mark::Human)), Some(GameResult::Win));
    assert_eq!(GameResult::from_outcome(Outcome::Win(Mark::Ai)), Some(GameResult::Lose));
    assert_eq!(GameResult::from_outcome(Outcome::Draw), Some(GameResult::Draw));
    assert_eq!(GameResult::from_outcome(Outcome::Ongoing), None);
}

#[test]
fn test_result_labels_parse_back() {
    for result in [GameResult::Win, GameResult::Lose, GameResult::Draw] {
        assert_eq!(GameResult::parse(result.as_str()), Some(result));
    }
    assert_eq!(GameResult::parse("win"), None);
}

#[test]
fn test_apply_creates_then_updates() {
    let mut board = Leaderboard::default();
    board.apply("ann", GameResult::Draw);
    board.apply("ann", GameResult::Win);
    board.apply("bo", GameResult::Lose);

    let ann = board.get("ann").unwrap();
    assert_eq!(
        (ann.total_games(), ann.wins_human(), ann.wins_ai(), ann.draws()),
        (2, 1, 0, 1)
    );
    assert_eq!(board.len(), 2);
}

#[test]
fn test_nicknames_are_case_sensitive() {
    let mut board = Leaderboard::default();
    board.apply("Ann", GameResult::Win);
    board.apply("ann", GameResult::Win);
    assert_eq!(board.len(), 2);
    assert!(board.get("ANN").is_none());
}

#[test]
fn test_ranking_is_stable_for_equal_wins() {
    let board = Leaderboard::new(vec![
        entry("first", 1),
        entry("top", 5),
        entry("second", 1),
        entry("third", 1),
        entry("none", 0),
    ]);
    let names: Vec<&str> = board.ranked().iter().map(|e| e.nickname().as_str()).collect();
    assert_eq!(names, vec!["top", "first", "second", "third", "none"]);
    // Ranking does not reorder the stored entries.
    assert_eq!(board.entries()[0].nickname(), "first");
}

#[test]
fn test_win_rate() {
    assert_eq!(LeaderboardEntry::new("a".into(), 4, 1, 3, 0).win_rate(), 25.0);
    assert_eq!(LeaderboardEntry::new("b".into(), 0, 0, 0, 0).win_rate(), 0.0);
}

#[test]
fn test_render_highlights_current_player() {
    let board = Leaderboard::new(vec![entry("ann", 2), entry("bo", 1)]);
    let plain = render_leaderboard(&board, None);
    let highlighted = render_leaderboard(&board, Some("bo"));
    assert!(plain.starts_with("\nLeadersboard\n"));
    assert!(plain.contains("PP | Human Nickname | Total Games | Win Human | Win AI | Draw"));
    assert!(highlighted.contains("bo"));
}

#[test]
fn test_sheet_rows_parse_into_leaderboard() {
    let rows: Vec<Vec<String>> = [
        vec!["human_nickname", "total_games", "win_human", "win_ai", "draws"],
        vec!["ann", "5", "2", "2", "1"],
        vec!["bo", "x", "", "1"],
    ]
    .iter()
    .map(|r| r.iter().map(|c| c.to_string()).collect())
    .collect();

    let board = LeaderboardColumns::parse(&rows).unwrap();
    assert_eq!(board.get("ann").map(|e| e.total_games()), Some(5));
    let bo = board.get("bo").unwrap();
    assert_eq!((bo.total_games(), bo.wins_ai(), bo.draws()), (0, 1, 0));
}

#[test]
fn test_empty_sheet_is_empty_leaderboard() {
    assert!(LeaderboardColumns::parse(&[]).unwrap().is_empty());
}
