//! # Scangate - Scanner Result Gating
//!
//! Tallies findings from an external vulnerability scanner into severity
//! tiers and decides whether a scan, or a set of scans, violates a
//! severity threshold.

#[macro_use]
pub mod logging;
pub mod config;
pub mod persist;
pub mod results;

// Convenience re-exports
pub use config::{ScanSettings, SettingsError};
pub use persist::{load_reports, read_report, write_report, PersistError};
pub use results::{ScanResult, ScanResultSet, Severity};

pub mod prelude {
    pub use crate::config::{LoggingPreferences, ScanSettings, SettingsError};
    pub use crate::persist::{load_reports, read_report, write_report, PersistError};
    pub use crate::results::{ScanResult, ScanResultSet, Severity};
}
