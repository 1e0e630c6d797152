//! # Persistence Errors

use crate::logging::{codes, Code};
use std::path::PathBuf;

/// Errors raised while writing or reading reports
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    /// Report or report directory could not be written
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report could not be read
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Report is not valid JSON for `ScanResult`
    #[error("Invalid report {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Report directory path exists but is not a directory
    #[error("Not a directory: {path}")]
    NotADirectory { path: PathBuf },

    /// Directory traversal failed
    #[error("Failed to list reports: {0}")]
    Walk(#[from] walkdir::Error),
}

impl PersistError {
    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Read {
            path: path.into(),
            source,
        }
    }

    /// Check if the caller can retry or fix the input
    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.code().as_str())
    }

    /// Logging code matching this error
    pub fn code(&self) -> Code {
        match self {
            PersistError::Write { .. } => codes::persist::REPORT_WRITE_FAILED,
            PersistError::Read { .. } => codes::persist::REPORT_READ_FAILED,
            PersistError::Json { .. } => codes::persist::REPORT_READ_FAILED,
            PersistError::NotADirectory { .. } => codes::persist::REPORT_DIR_INVALID,
            PersistError::Walk(_) => codes::persist::REPORT_READ_FAILED,
        }
    }
}
