/// Threshold applied when settings do not name one
pub const DEFAULT_SEVERITY_THRESHOLD: &str = "medium";

/// Scan type whose reports are keyed by target as well as tool and type
pub const IMAGE_SCAN_TYPE: &str = "image";

/// Extension of persisted reports
pub const REPORT_EXTENSION: &str = "json";

/// Replacement for characters that are not allowed in report file names
pub const FILE_NAME_REPLACEMENT: char = '_';
