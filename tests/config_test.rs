//! Tests for configuration loading.

use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;
use tictactoe_ai::{AppConfig, Backend};

#[test]
fn test_defaults() {
    let config = AppConfig::default();
    assert_eq!(*config.backend(), Backend::Google);
    assert_eq!(config.google().spreadsheet_name(), "tic_tac_toe");
    assert_eq!(config.google().leaderboard_sheet(), "leadersboard");
    assert_eq!(config.google().history_sheet(), "tic_tac_toe_data_sheet");
    assert_eq!(config.google().credentials_file(), &PathBuf::from("creds.json"));
    assert_eq!(*config.training().hidden_units(), 128);
    assert_eq!(*config.training().epochs(), 50);
    assert!(!*config.retrain_on_exit());
}

#[test]
fn test_partial_toml_keeps_other_defaults() {
    let config = AppConfig::from_toml(
        r#"
backend = "sqlite"
retrain_on_exit = true

[sqlite]
database_path = "games.db"

[training]
epochs = 10
"#,
    )
    .expect("Parse failed");

    assert_eq!(*config.backend(), Backend::Sqlite);
    assert!(*config.retrain_on_exit());
    assert_eq!(config.sqlite().database_path(), "games.db");
    assert_eq!(config.sqlite().model_path(), &PathBuf::from("tic_tac_toe_model.bin"));
    assert_eq!(*config.training().epochs(), 10);
    assert_eq!(*config.training().hidden_units(), 128);
}

#[test]
fn test_google_section() {
    let config = AppConfig::from_toml(
        r#"
[google]
spreadsheet_id = "abc123"
share_with = "owner@example.com"
timeout_secs = 5
"#,
    )
    .expect("Parse failed");

    assert_eq!(config.google().spreadsheet_id().as_deref(), Some("abc123"));
    assert_eq!(config.google().share_with().as_deref(), Some("owner@example.com"));
    assert_eq!(*config.google().timeout_secs(), 5);
    assert!(config.google().model_folder_id().is_none());
}

#[test]
fn test_unknown_backend_rejected() {
    assert!(AppConfig::from_toml("backend = \"cloud\"").is_err());
}

#[test]
fn test_zero_epochs_rejected() {
    let err = AppConfig::from_toml("[training]\nepochs = 0").unwrap_err();
    assert!(err.message.contains("epochs"));
}

#[test]
fn test_non_positive_learning_rate_rejected() {
    assert!(AppConfig::from_toml("[training]\nlearning_rate = 0.0").is_err());
}

#[test]
fn test_from_file() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "backend = \"memory\"").unwrap();
    let config = AppConfig::from_file(file.path()).expect("Load failed");
    assert_eq!(*config.backend(), Backend::Memory);
}

#[test]
fn test_missing_file_uses_defaults() {
    let config = AppConfig::load_or_default("/nonexistent/tictactoe_ai.toml").expect("Defaults");
    assert_eq!(config, AppConfig::default());
}

#[test]
fn test_backend_parses_from_cli_text() {
    assert_eq!("sqlite".parse::<Backend>().unwrap(), Backend::Sqlite);
    assert_eq!(Backend::Memory.to_string(), "memory");
}

#[test]
fn test_builder_overrides() {
    let config = AppConfig::default().with_backend(Backend::Memory);
    assert_eq!(*config.backend(), Backend::Memory);
}
