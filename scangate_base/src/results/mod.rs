//! # Scan Results Module
//!
//! Types for tallying scanner findings by severity and gating on a threshold.
//!
//! ## Core Types
//! - [`Severity`] - The six ordered severity tiers
//! - [`ScanResult`] - Result of one scan invocation
//! - [`ScanResultSet`] - Ordered collection of results, gated as a whole
//!
//! ## Usage
//! ```rust
//! use scangate_base::config::ScanSettings;
//! use scangate_base::results::ScanResult;
//!
//! let mut result = ScanResult::new(ScanSettings::new("grype", "image", "alpine:3.19"));
//! result.score("CRITICAL");
//! result.score("low");
//! result.score("bogus");
//!
//! assert_eq!(result.total_count(), 3);
//! assert!(result.failed("high"));
//! assert_eq!(result.file_name(), "grype-image-alpine_3.19.json");
//! ```

pub mod set;
pub mod severity;
pub mod types;

// Re-export all public types for convenient access
pub use set::ScanResultSet;
pub use severity::Severity;
pub use types::ScanResult;
