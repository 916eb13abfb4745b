//! Error types shared across PoseFix crates.

use std::path::PathBuf;

/// Top-level error type for PoseFix operations.
///
/// Every variant leaves the coordinate store untouched: operations validate
/// before they write, and a failed write never replaces the previous file.
#[derive(Debug, thiserror::Error)]
pub enum PosefixError {
    /// A required scorer, individual, bodypart, or column is absent.
    #[error("Missing data: {message}")]
    MissingData { message: String },

    /// A frame, range, or individual selection falls outside the table.
    #[error("Invalid range: {message}")]
    InvalidRange { message: String },

    /// Stored or user-supplied content could not be interpreted.
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Result type alias using PosefixError.
pub type PosefixResult<T> = Result<T, PosefixError>;

impl PosefixError {
    pub fn missing_data(msg: impl Into<String>) -> Self {
        Self::MissingData {
            message: msg.into(),
        }
    }

    pub fn invalid_range(msg: impl Into<String>) -> Self {
        Self::InvalidRange {
            message: msg.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap an I/O failure, mapping `NotFound` to [`PosefixError::FileNotFound`].
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path }
        } else {
            Self::Io { path, source }
        }
    }

    /// Whether this error was caused by the table's shape rather than by I/O.
    pub fn is_data_error(&self) -> bool {
        matches!(
            self,
            Self::MissingData { .. } | Self::InvalidRange { .. } | Self::MalformedInput { .. }
        )
    }
}
