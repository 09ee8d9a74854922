//! Application configuration loaded from TOML.

use crate::ai::TrainingConfig;
use crate::error::ConfigError;
use derive_getters::Getters;
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// Which family of collaborators stores history, leaderboard and predictor.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Backend {
    /// Google Sheets for history and leaderboard, Google Drive for the predictor.
    Google,
    /// Local SQLite database plus a model file on disk.
    Sqlite,
    /// Process memory only.
    Memory,
}

/// Google Sheets / Drive settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct GoogleConfig {
    /// Service-account key file (or a JSON file with an `access_token`).
    credentials_file: PathBuf,
    /// Spreadsheet looked up by name when no id is given.
    spreadsheet_name: String,
    /// Spreadsheet id; skips the lookup by name.
    #[setters(strip_option)]
    spreadsheet_id: Option<String>,
    /// Worksheet holding the leaderboard.
    leaderboard_sheet: String,
    /// Worksheet holding the move history.
    history_sheet: String,
    /// Drive file name of the stored predictor.
    model_name: String,
    /// Drive folder new model files are created in.
    #[setters(strip_option)]
    model_folder_id: Option<String>,
    /// E-mail address granted writer access to a newly created model file.
    #[setters(strip_option)]
    share_with: Option<String>,
    /// Per-request timeout.
    timeout_secs: u64,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            credentials_file: PathBuf::from("creds.json"),
            spreadsheet_name: "tic_tac_toe".to_string(),
            spreadsheet_id: None,
            leaderboard_sheet: "leadersboard".to_string(),
            history_sheet: "tic_tac_toe_data_sheet".to_string(),
            model_name: "tic_tac_toe_model.bin".to_string(),
            model_folder_id: None,
            share_with: None,
            timeout_secs: 30,
        }
    }
}

/// Local SQLite backend settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Getters, Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct SqliteConfig {
    /// Database file, created on first use.
    database_path: String,
    /// File the predictor is written to.
    model_path: PathBuf,
}

impl Default for SqliteConfig {
    fn default() -> Self {
        Self {
            database_path: "tictactoe_ai.db".to_string(),
            model_path: PathBuf::from("tic_tac_toe_model.bin"),
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Getters, Setters)]
#[serde(default)]
#[setters(prefix = "with_")]
pub struct AppConfig {
    /// Storage backend.
    backend: Backend,
    /// Google settings, used by [`Backend::Google`].
    google: GoogleConfig,
    /// SQLite settings, used by [`Backend::Sqlite`].
    sqlite: SqliteConfig,
    /// Predictor training hyperparameters.
    training: TrainingConfig,
    /// Retrain on all known records before the final persist.
    retrain_on_exit: bool,
    /// Log file for tracing output.
    log_file: PathBuf,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            backend: Backend::Google,
            google: GoogleConfig::default(),
            sqlite: SqliteConfig::default(),
            training: TrainingConfig::default(),
            retrain_on_exit: false,
            log_file: PathBuf::from("tictactoe_ai.log"),
        }
    }
}

impl AppConfig {
    /// Parses and validates a TOML document.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(backend = %config.backend, "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise falls back to defaults.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        if path.as_ref().exists() {
            Self::from_file(path)
        } else {
            info!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Rejects settings that would make training meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let t = &self.training;
        if *t.hidden_units() == 0 {
            return Err(ConfigError::new("training.hidden_units must be > 0"));
        }
        if *t.epochs() == 0 {
            return Err(ConfigError::new("training.epochs must be > 0"));
        }
        if *t.batch_size() == 0 {
            return Err(ConfigError::new("training.batch_size must be > 0"));
        }
        if !(*t.learning_rate() > 0.0) {
            return Err(ConfigError::new("training.learning_rate must be > 0"));
        }
        if self.google.timeout_secs == 0 {
            return Err(ConfigError::new("google.timeout_secs must be > 0"));
        }
        Ok(())
    }
}
