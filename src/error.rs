//! Error types for FitLog.
//!
//! Provides structured error handling with:
//! - Machine-readable error codes (`ErrorCode`)
//! - Category-based exit codes (2=db, 3=not_found, 4=validation, etc.)
//! - Context-aware recovery hints
//! - Structured JSON output for piped / non-TTY consumers
//!
//! Schema problems found at startup are not errors: they are collected in
//! [`crate::storage::SchemaReport`] and logged, and only surface later as
//! [`Error::Database`] when a query touches the missing structure.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for FitLog operations.
pub type Result<T> = std::result::Result<T, Error>;

// ── Error Code ────────────────────────────────────────────────

/// Machine-readable error codes grouped by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Database (exit 2)
    DatabaseError,

    // Not Found (exit 3)
    StoreNotFound,
    BackupNotFound,
    RecordNotFound,

    // Validation (exit 4)
    InvalidArgument,

    // Backup transfer (exit 6)
    TransportError,
    ReplaceError,

    // Config (exit 7)
    ConfigError,

    // I/O (exit 8)
    IoError,
    JsonError,

    // Internal (exit 1)
    InternalError,
}

impl ErrorCode {
    /// Machine-readable SCREAMING_SNAKE code string.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        match self {
            Self::DatabaseError => "DATABASE_ERROR",
            Self::StoreNotFound => "STORE_NOT_FOUND",
            Self::BackupNotFound => "BACKUP_NOT_FOUND",
            Self::RecordNotFound => "RECORD_NOT_FOUND",
            Self::InvalidArgument => "INVALID_ARGUMENT",
            Self::TransportError => "TRANSPORT_ERROR",
            Self::ReplaceError => "REPLACE_ERROR",
            Self::ConfigError => "CONFIG_ERROR",
            Self::IoError => "IO_ERROR",
            Self::JsonError => "JSON_ERROR",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    /// Category-based exit code (1-8).
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::InternalError => 1,
            Self::DatabaseError => 2,
            Self::StoreNotFound | Self::BackupNotFound | Self::RecordNotFound => 3,
            Self::InvalidArgument => 4,
            Self::TransportError | Self::ReplaceError => 6,
            Self::ConfigError => 7,
            Self::IoError | Self::JsonError => 8,
        }
    }
}

// ── Error Enum ────────────────────────────────────────────────

/// Errors that can occur in FitLog operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Export was asked for but the live store file does not exist.
    #[error("Store file not found at {path}")]
    StoreNotFound { path: PathBuf },

    /// Import source could not be reached.
    #[error("Backup file not found: {path}")]
    BackupNotFound { path: PathBuf },

    #[error("{entity} not found: {id}")]
    RecordNotFound { entity: &'static str, id: i64 },

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failure reported by a backup transport, passed through verbatim.
    #[error("Transport error: {0}")]
    Transport(String),

    /// The replace step of a restore failed; the store may be absent.
    #[error("Failed to replace store at {path}: {source}")]
    Replace {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl Error {
    /// Map this error to its structured `ErrorCode`.
    #[must_use]
    pub const fn error_code(&self) -> ErrorCode {
        match self {
            Self::StoreNotFound { .. } => ErrorCode::StoreNotFound,
            Self::BackupNotFound { .. } => ErrorCode::BackupNotFound,
            Self::RecordNotFound { .. } => ErrorCode::RecordNotFound,
            Self::Database(_) => ErrorCode::DatabaseError,
            Self::Transport(_) => ErrorCode::TransportError,
            Self::Replace { .. } => ErrorCode::ReplaceError,
            Self::Io(_) => ErrorCode::IoError,
            Self::Json(_) => ErrorCode::JsonError,
            Self::InvalidArgument(_) => ErrorCode::InvalidArgument,
            Self::Config(_) => ErrorCode::ConfigError,
            Self::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Category-based exit code, delegating to the `ErrorCode`.
    #[must_use]
    pub const fn exit_code(&self) -> u8 {
        self.error_code().exit_code()
    }

    /// Context-aware recovery hint.
    ///
    /// Returns `None` if no actionable suggestion exists.
    #[must_use]
    pub fn hint(&self) -> Option<String> {
        match self {
            Self::StoreNotFound { path } => Some(format!(
                "No store at {}. Run `fitlog init` to create it, or pass --db.",
                path.display()
            )),

            Self::BackupNotFound { .. } => Some(
                "Check the backup path. Use `fitlog backup list` to see cloud backups."
                    .to_string(),
            ),

            Self::RecordNotFound { entity, .. } => Some(format!(
                "No {entity} with that id. List records to find a valid id."
            )),

            Self::Replace { .. } => Some(
                "The store may be missing. Reopening the app recreates an empty store; \
                 retry the restore from the same backup file."
                    .to_string(),
            ),

            Self::Config(msg) if msg.contains("token") => Some(
                "Set FITLOG_DRIVE_TOKEN or pass --token with a valid Drive access token"
                    .to_string(),
            ),

            Self::Database(_)
            | Self::Transport(_)
            | Self::Io(_)
            | Self::Json(_)
            | Self::InvalidArgument(_)
            | Self::Config(_)
            | Self::Other(_) => None,
        }
    }

    /// Structured JSON representation for machine consumption.
    #[must_use]
    pub fn to_structured_json(&self) -> serde_json::Value {
        let code = self.error_code();
        let mut obj = serde_json::json!({
            "error": {
                "code": code.as_str(),
                "message": self.to_string(),
                "exit_code": code.exit_code(),
            }
        });

        if let Some(hint) = self.hint() {
            obj["error"]["hint"] = serde_json::Value::String(hint);
        }

        obj
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes_by_category() {
        let err = Error::StoreNotFound {
            path: PathBuf::from("/tmp/missing.db"),
        };
        assert_eq!(err.exit_code(), 3);
        assert_eq!(Error::Transport("upload rejected".into()).exit_code(), 6);
        assert_eq!(Error::InvalidArgument("limit".into()).exit_code(), 4);
    }

    #[test]
    fn test_structured_json_includes_hint() {
        let err = Error::StoreNotFound {
            path: PathBuf::from("/tmp/missing.db"),
        };
        let json = err.to_structured_json();
        assert_eq!(json["error"]["code"], "STORE_NOT_FOUND");
        assert!(json["error"]["hint"].as_str().unwrap().contains("fitlog init"));
    }

    #[test]
    fn test_transport_message_is_verbatim() {
        let err = Error::Transport("Insufficient Permission".into());
        assert_eq!(err.to_string(), "Transport error: Insufficient Permission");
        assert!(err.hint().is_none());
    }
}
