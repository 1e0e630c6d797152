//! # Settings Errors

use crate::logging::{codes, Code};
use std::path::PathBuf;

/// Errors raised while loading or validating scan settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// Settings file could not be read
    #[error("Failed to read settings file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Settings file is not valid TOML for `ScanSettings`
    #[error("Failed to parse settings: {0}")]
    Parse(#[from] toml::de::Error),

    /// A required field is empty
    #[error("Missing required setting: {field}")]
    MissingField { field: &'static str },
}

impl SettingsError {
    /// Check if the caller can fix this by editing input
    pub fn is_recoverable(&self) -> bool {
        codes::is_recoverable(self.code().as_str())
    }

    /// Logging code matching this error
    pub fn code(&self) -> Code {
        match self {
            SettingsError::Io { .. } => codes::config::SETTINGS_NOT_FOUND,
            SettingsError::Parse(_) => codes::config::SETTINGS_PARSE_FAILED,
            SettingsError::MissingField { .. } => codes::config::SETTINGS_INVALID,
        }
    }
}
