//! Configuration module for scangate
//!
//! Compile-time constants, env-driven runtime preferences, and the scan
//! settings loaded from TOML.

pub mod constants;
pub mod error;
pub mod runtime;
pub mod settings;

pub use error::SettingsError;
pub use runtime::{LogBackend, LoggingPreferences};
pub use settings::ScanSettings;
