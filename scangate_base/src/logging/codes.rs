//! Event codes and their classification metadata
//!
//! Single source of truth for every code the logging service emits.

use std::collections::HashMap;
use std::sync::OnceLock;

// ============================================================================
// CODE WRAPPER TYPE
// ============================================================================

/// Universal code wrapper for error, warning and success codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Code(&'static str);

impl Code {
    pub const fn new(code: &'static str) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Metadata attached to a code
#[derive(Debug, Clone)]
pub struct CodeMetadata {
    pub code: &'static str,
    pub category: &'static str,
    pub recoverable: bool,
    pub description: &'static str,
}

impl CodeMetadata {
    pub const fn new(
        code: &'static str,
        category: &'static str,
        recoverable: bool,
        description: &'static str,
    ) -> Self {
        Self {
            code,
            category,
            recoverable,
            description,
        }
    }
}

// ============================================================================
// CODE CONSTANTS
// ============================================================================

/// System error codes
pub mod system {
    use super::Code;

    pub const INTERNAL_ERROR: Code = Code::new("ERR001");
    pub const INITIALIZATION_FAILURE: Code = Code::new("ERR002");
}

/// Settings loading codes
pub mod config {
    use super::Code;

    pub const SETTINGS_NOT_FOUND: Code = Code::new("E010");
    pub const SETTINGS_PARSE_FAILED: Code = Code::new("E011");
    pub const SETTINGS_INVALID: Code = Code::new("E012");
    pub const ENV_OVERRIDE_APPLIED: Code = Code::new("W013");
}

/// Scan result codes
pub mod results {
    use super::Code;

    pub const SCORE_AFTER_FINALIZE: Code = Code::new("W020");
    pub const THRESHOLD_VIOLATED: Code = Code::new("E021");
    pub const UNRECOGNIZED_SEVERITY: Code = Code::new("D022");
}

/// Report persistence codes
pub mod persist {
    use super::Code;

    pub const REPORT_WRITE_FAILED: Code = Code::new("E030");
    pub const REPORT_READ_FAILED: Code = Code::new("E031");
    pub const REPORT_DIR_INVALID: Code = Code::new("E032");
}

/// Success codes
pub mod success {
    use super::Code;

    pub const SYSTEM_INITIALIZATION_COMPLETED: Code = Code::new("I001");
    pub const SETTINGS_LOADED: Code = Code::new("I010");
    pub const SCAN_FINALIZED: Code = Code::new("I020");
    pub const THRESHOLD_PASSED: Code = Code::new("I021");
    pub const REPORT_WRITTEN: Code = Code::new("I030");
    pub const REPORTS_LOADED: Code = Code::new("I031");
}

// ============================================================================
// METADATA REGISTRY
// ============================================================================

const REGISTRY: &[CodeMetadata] = &[
    CodeMetadata::new("ERR001", "System", false, "Internal error"),
    CodeMetadata::new("ERR002", "System", false, "Logging initialization failed"),
    CodeMetadata::new("E010", "Config", true, "Settings file not found"),
    CodeMetadata::new("E011", "Config", true, "Settings file could not be parsed"),
    CodeMetadata::new("E012", "Config", true, "Settings are missing a required field"),
    CodeMetadata::new("W013", "Config", true, "Setting overridden from environment"),
    CodeMetadata::new("W020", "Results", true, "Finding scored after the result was finalized"),
    CodeMetadata::new("E021", "Results", true, "Scan exceeded its severity threshold"),
    CodeMetadata::new("D022", "Results", true, "Severity label not recognized, counted as unknown"),
    CodeMetadata::new("E030", "Persist", true, "Report could not be written"),
    CodeMetadata::new("E031", "Persist", true, "Report could not be read"),
    CodeMetadata::new("E032", "Persist", true, "Report path is not a directory"),
    CodeMetadata::new("I001", "System", true, "Logging system initialized"),
    CodeMetadata::new("I010", "Config", true, "Settings loaded"),
    CodeMetadata::new("I020", "Results", true, "Scan result finalized"),
    CodeMetadata::new("I021", "Results", true, "Scan within its severity threshold"),
    CodeMetadata::new("I030", "Persist", true, "Report written"),
    CodeMetadata::new("I031", "Persist", true, "Reports loaded"),
];

fn get_registry() -> &'static HashMap<&'static str, &'static CodeMetadata> {
    static CODE_REGISTRY: OnceLock<HashMap<&'static str, &'static CodeMetadata>> = OnceLock::new();
    CODE_REGISTRY.get_or_init(|| REGISTRY.iter().map(|meta| (meta.code, meta)).collect())
}

// ============================================================================
// CLASSIFICATION FUNCTIONS
// ============================================================================

/// Get metadata for a specific code
pub fn get_metadata(code: &str) -> Option<&'static CodeMetadata> {
    get_registry().get(code).copied()
}

/// Check if the condition behind a code is recoverable
pub fn is_recoverable(code: &str) -> bool {
    get_metadata(code)
        .map(|metadata| metadata.recoverable)
        .unwrap_or(true)
}

/// Get human-readable description for a code
pub fn get_description(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.description)
        .unwrap_or("Unknown code")
}

/// Get category for a code
pub fn get_category(code: &str) -> &'static str {
    get_metadata(code)
        .map(|metadata| metadata.category)
        .unwrap_or("Unknown")
}
