//! Error types for the game engine and its collaborators.

use derive_more::{Display, Error};
use tracing::instrument;

/// Why a placement was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum MoveRejection {
    /// Index outside 0-8.
    #[display("position must be between 0 and 8")]
    OutOfRange,
    /// The square already holds a mark.
    #[display("square is already occupied")]
    Occupied,
}

/// Errors raised by the game engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Display, Error)]
pub enum GameError {
    /// A move that cannot be applied to the current board.
    #[display("Invalid move {index}: {reason}")]
    InvalidMove {
        /// Requested board index.
        index: usize,
        /// Reason for refusing it.
        reason: MoveRejection,
    },

    /// The AI was asked to move but no predictor could be loaded or trained.
    #[display("No predictor available: the AI cannot make a move")]
    NoPredictorAvailable,

    /// A move was requested on a full board.
    #[display("No empty square left")]
    NoEmptySquare,
}

/// Category of a failure at an external boundary (spreadsheet, drive, database).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum BoundaryErrorKind {
    /// The requested artifact does not exist.
    #[display("not found")]
    NotFound,
    /// HTTP transport or status failure.
    #[display("http")]
    Http,
    /// Payload could not be decoded.
    #[display("decode")]
    Decode,
    /// Local database failure.
    #[display("storage")]
    Storage,
    /// Filesystem failure.
    #[display("io")]
    Io,
}

/// Failure talking to an external collaborator, with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Boundary error ({}): {} at {}:{}", kind, message, file, line)]
pub struct BoundaryError {
    /// Failure category.
    pub kind: BoundaryErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl BoundaryError {
    /// Creates a new boundary error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: BoundaryErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a [`BoundaryErrorKind::NotFound`] error.
    #[track_caller]
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(BoundaryErrorKind::NotFound, message)
    }

    /// Returns true when the artifact simply does not exist.
    pub fn is_not_found(&self) -> bool {
        self.kind == BoundaryErrorKind::NotFound
    }
}

impl From<reqwest::Error> for BoundaryError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::new(BoundaryErrorKind::Decode, format!("Response decode error: {}", err))
        } else {
            Self::new(BoundaryErrorKind::Http, format!("HTTP error: {}", err))
        }
    }
}

impl From<serde_json::Error> for BoundaryError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::new(BoundaryErrorKind::Decode, format!("JSON error: {}", err))
    }
}

impl From<diesel::result::Error> for BoundaryError {
    #[track_caller]
    fn from(err: diesel::result::Error) -> Self {
        Self::new(BoundaryErrorKind::Storage, format!("Diesel error: {}", err))
    }
}

impl From<diesel::ConnectionError> for BoundaryError {
    #[track_caller]
    fn from(err: diesel::ConnectionError) -> Self {
        Self::new(BoundaryErrorKind::Storage, format!("Connection error: {}", err))
    }
}

impl From<std::io::Error> for BoundaryError {
    #[track_caller]
    fn from(err: std::io::Error) -> Self {
        Self::new(BoundaryErrorKind::Io, format!("I/O error: {}", err))
    }
}

/// Credentials could not be loaded. Fatal at startup.
#[derive(Debug, Clone, Display, Error)]
#[display("Credential error: {} at {}:{}", message, file, line)]
pub struct CredentialError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl CredentialError {
    /// Creates a new credential error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }
}

/// Errors that stop a session before or outside of gameplay.
#[derive(Debug, Display, Error, derive_more::From)]
pub enum SessionError {
    /// Credentials missing or unreadable.
    #[display("{}", _0)]
    Credential(CredentialError),

    /// A backend required to start (e.g. the spreadsheet) could not be opened.
    #[display("Startup failed: {}", _0)]
    Startup(BoundaryError),

    /// Reading from or writing to the terminal failed.
    #[display("Console error: {}", _0)]
    Console(std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_move_display() {
        let err = GameError::InvalidMove {
            index: 9,
            reason: MoveRejection::OutOfRange,
        };
        assert_eq!(
            err.to_string(),
            "Invalid move 9: position must be between 0 and 8"
        );
    }

    #[test]
    fn test_boundary_error_tracks_location() {
        let err = BoundaryError::not_found("model missing");
        assert!(err.is_not_found());
        assert!(err.file.ends_with("error.rs"));
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_io_error_maps_to_io_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: BoundaryError = io.into();
        assert_eq!(err.kind, BoundaryErrorKind::Io);
    }
}
