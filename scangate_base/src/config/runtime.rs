// RUNTIME PREFERENCES (User Experience)

use crate::logging::LogLevel;
use serde::{Deserialize, Serialize};
use std::env;

/// Where log events are written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogBackend {
    /// Human-readable lines on stderr
    Console,
    /// JSON lines on stderr
    Structured,
    /// The `log` facade; the binary installs the sink
    Facade,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingPreferences {
    /// Most verbose level that is emitted
    pub min_log_level: LogLevel,

    /// Whether console output is emitted as JSON
    pub use_structured_logging: bool,

    /// Selected backend
    pub backend: LogBackend,
}

impl LoggingPreferences {
    /// Build preferences from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            min_log_level: lookup(env_vars::LOGGING_MIN_LEVEL)
                .and_then(|v| parse_log_level(&v))
                .unwrap_or(LogLevel::Info),
            use_structured_logging: lookup(env_vars::LOGGING_USE_STRUCTURED)
                .and_then(|v| v.parse().ok())
                .unwrap_or(false),
            backend: lookup(env_vars::LOGGING_BACKEND)
                .and_then(|v| parse_log_backend(&v))
                .unwrap_or(LogBackend::Console),
        }
    }

    /// Backend after folding in the structured flag
    pub fn effective_backend(&self) -> LogBackend {
        match self.backend {
            LogBackend::Console if self.use_structured_logging => LogBackend::Structured,
            backend => backend,
        }
    }
}

impl Default for LoggingPreferences {
    fn default() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }
}

/// Parse log level from string (used for environment variables)
pub fn parse_log_level(level: &str) -> Option<LogLevel> {
    match level.trim().to_lowercase().as_str() {
        "error" | "0" => Some(LogLevel::Error),
        "warning" | "warn" | "1" => Some(LogLevel::Warning),
        "info" | "2" => Some(LogLevel::Info),
        "debug" | "3" => Some(LogLevel::Debug),
        _ => None,
    }
}

/// Parse backend name from string
pub fn parse_log_backend(backend: &str) -> Option<LogBackend> {
    match backend.trim().to_lowercase().as_str() {
        "console" => Some(LogBackend::Console),
        "structured" | "json" => Some(LogBackend::Structured),
        "facade" | "log" => Some(LogBackend::Facade),
        _ => None,
    }
}

/// Environment variable names for configuration
pub mod env_vars {
    // Logging
    pub const LOGGING_MIN_LEVEL: &str = "SCANGATE_LOGGING_MIN_LEVEL";
    pub const LOGGING_USE_STRUCTURED: &str = "SCANGATE_LOGGING_USE_STRUCTURED";
    pub const LOGGING_BACKEND: &str = "SCANGATE_LOGGING_BACKEND";

    // Scan settings overrides
    pub const SCAN_TOOL: &str = "SCANGATE_TOOL";
    pub const SCAN_TYPE: &str = "SCANGATE_TYPE";
    pub const SCAN_TARGET: &str = "SCANGATE_TARGET";
    pub const SCAN_SEVERITY: &str = "SCANGATE_SEVERITY";
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_log_level_parsing() {
        assert_eq!(parse_log_level("error"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("ERROR"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("0"), Some(LogLevel::Error));
        assert_eq!(parse_log_level("warn"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("warning"), Some(LogLevel::Warning));
        assert_eq!(parse_log_level("info"), Some(LogLevel::Info));
        assert_eq!(parse_log_level(" debug "), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("3"), Some(LogLevel::Debug));
        assert_eq!(parse_log_level("invalid"), None);
    }

    #[test]
    fn test_preferences_from_lookup() {
        let vars: HashMap<&str, &str> = [
            (env_vars::LOGGING_MIN_LEVEL, "debug"),
            (env_vars::LOGGING_BACKEND, "facade"),
        ]
        .into_iter()
        .collect();

        let preferences = LoggingPreferences::from_lookup(|name| vars.get(name).map(|v| v.to_string()));

        assert_eq!(preferences.min_log_level, LogLevel::Debug);
        assert_eq!(preferences.backend, LogBackend::Facade);
        assert!(!preferences.use_structured_logging);
    }

    #[test]
    fn test_preferences_defaults_on_empty_lookup() {
        let preferences = LoggingPreferences::from_lookup(|_| None);
        assert_eq!(preferences.min_log_level, LogLevel::Info);
        assert_eq!(preferences.effective_backend(), LogBackend::Console);
    }

    #[test]
    fn test_structured_flag_upgrades_console() {
        let preferences = LoggingPreferences::from_lookup(|name| {
            (name == env_vars::LOGGING_USE_STRUCTURED).then(|| "true".to_string())
        });
        assert_eq!(preferences.effective_backend(), LogBackend::Structured);
    }
}
