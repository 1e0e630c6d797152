//! # Scan Result Types
//!
//! The record of one scanner invocation and its findings tallied by severity.
//! Serialized with camelCase field names so persisted reports stay readable
//! by other tooling.

use super::severity::Severity;
use crate::config::constants::{FILE_NAME_REPLACEMENT, REPORT_EXTENSION};
use crate::config::ScanSettings;
use crate::logging::codes;
use crate::{log_debug, log_error, log_success, log_warning};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Complete result of one scan invocation
///
/// Created empty when the scan starts, scored once per finding while the
/// scanner output is parsed, then finalized. Counters only ever grow, and a
/// finalized result no longer changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    /// Tool, scan type, target and threshold this scan ran with
    pub scan_settings: ScanSettings,

    /// Target identifier as scanned
    pub scan_target: String,

    /// Command line used to invoke the scanner
    pub command_line: String,

    /// Wall-clock duration of the scan in seconds
    pub duration_secs: f64,

    /// Free-form error text; empty when the scan ran cleanly
    pub error: String,

    /// Scanner exit code
    pub exit_code: i32,

    /// Whether the scan itself ran without error
    pub ok: bool,

    num_critical: u32,
    num_high: u32,
    num_medium: u32,
    num_low: u32,
    num_negligible: u32,
    num_unknown: u32,
    num_ignored: u32,

    /// Upload location, filled in by the uploader
    #[serde(rename = "s3URL", default)]
    pub s3_url: String,

    /// When the scan started
    pub started_at: DateTime<Utc>,

    #[serde(skip, default = "finalized_on_load")]
    finalized: bool,
}

/// Persisted reports are complete records
fn finalized_on_load() -> bool {
    true
}

impl ScanResult {
    /// Create an empty result at scan start
    pub fn new(settings: ScanSettings) -> Self {
        Self {
            scan_target: settings.target.clone(),
            scan_settings: settings,
            command_line: String::new(),
            duration_secs: 0.0,
            error: String::new(),
            exit_code: 0,
            ok: false,
            num_critical: 0,
            num_high: 0,
            num_medium: 0,
            num_low: 0,
            num_negligible: 0,
            num_unknown: 0,
            num_ignored: 0,
            s3_url: String::new(),
            started_at: Utc::now(),
            finalized: false,
        }
    }

    /// Record the command line used to invoke the scanner
    pub fn with_command_line(mut self, command_line: impl Into<String>) -> Self {
        self.command_line = command_line.into();
        self
    }

    /// Record a measured duration; `finalize` keeps it instead of the elapsed time
    pub fn with_duration_secs(mut self, duration_secs: f64) -> Self {
        self.duration_secs = duration_secs;
        self
    }

    /// Record where the report was uploaded. Allowed after finalization; the
    /// tallies are unaffected.
    pub fn set_s3_url(&mut self, url: impl Into<String>) {
        self.s3_url = url.into();
    }

    /// Count one finding under the tier named by `severity`
    ///
    /// Matching is case-insensitive and unrecognized text is counted as
    /// `Unknown`. Returns the tier that was counted. Once the result is
    /// finalized nothing is counted.
    pub fn score(&mut self, severity: &str) -> Severity {
        let tier = Severity::from_label(severity);

        if self.finalized {
            log_warning!(code = codes::results::SCORE_AFTER_FINALIZE, "Finding scored after finalization",
                "file" => self.file_name(),
                "severity" => severity
            );
            return tier;
        }

        if !Severity::is_known_label(severity) {
            log_debug!(code = codes::results::UNRECOGNIZED_SEVERITY, "Unrecognized severity counted as unknown",
                "label" => severity
            );
        }

        let counter = self.counter_mut(tier);
        *counter = counter.saturating_add(1);
        tier
    }

    /// Count one finding excluded by the ignore list
    pub fn record_ignored(&mut self) {
        if self.finalized {
            log_warning!(code = codes::results::SCORE_AFTER_FINALIZE, "Ignored finding recorded after finalization",
                "file" => self.file_name()
            );
            return;
        }
        self.num_ignored = self.num_ignored.saturating_add(1);
    }

    fn counter_mut(&mut self, tier: Severity) -> &mut u32 {
        match tier {
            Severity::Critical => &mut self.num_critical,
            Severity::High => &mut self.num_high,
            Severity::Medium => &mut self.num_medium,
            Severity::Low => &mut self.num_low,
            Severity::Negligible => &mut self.num_negligible,
            Severity::Unknown => &mut self.num_unknown,
        }
    }

    /// Findings counted under one tier
    pub fn count(&self, tier: Severity) -> u32 {
        match tier {
            Severity::Critical => self.num_critical,
            Severity::High => self.num_high,
            Severity::Medium => self.num_medium,
            Severity::Low => self.num_low,
            Severity::Negligible => self.num_negligible,
            Severity::Unknown => self.num_unknown,
        }
    }

    pub fn ignored_count(&self) -> u32 {
        self.num_ignored
    }

    /// Findings at `tier` or any tier above it
    ///
    /// Summed in `u64` so saturated counters cannot wrap.
    pub fn count_at_or_above(&self, tier: Severity) -> u64 {
        Severity::ALL
            .iter()
            .filter(|candidate| **candidate >= tier)
            .map(|candidate| u64::from(self.count(*candidate)))
            .sum()
    }

    /// Sum of all six tier counters; ignored findings are not included
    pub fn total_count(&self) -> u64 {
        self.count_at_or_above(Severity::Unknown)
    }

    /// Whether any finding sits at or above `threshold`
    ///
    /// Only `critical`, `high`, `medium` and `low` can fail a scan; any other
    /// threshold text never does.
    pub fn failed(&self, threshold: &str) -> bool {
        self.failed_at(Severity::from_label(threshold))
    }

    /// Tier form of [`ScanResult::failed`]
    pub fn failed_at(&self, threshold: Severity) -> bool {
        threshold.can_fail() && self.count_at_or_above(threshold) > 0
    }

    /// Evaluate against the threshold carried in the scan settings
    pub fn failed_configured(&self) -> bool {
        self.failed_at(self.scan_settings.threshold())
    }

    /// Deterministic report file name
    ///
    /// `<tool>-<type>.json`, with `-<target>` appended for image scans.
    /// Each component is lowercased and anything outside `[a-z0-9._-]`
    /// becomes `_`.
    pub fn file_name(&self) -> String {
        let settings = &self.scan_settings;
        let mut parts = vec![
            sanitize_component(&settings.tool),
            sanitize_component(&settings.scan_type),
        ];

        if settings.is_image_scan() && !self.scan_target.trim().is_empty() {
            parts.push(sanitize_component(&self.scan_target));
        }

        format!("{}.{}", parts.join("-"), REPORT_EXTENSION)
    }

    /// Record exit status and freeze the result
    ///
    /// The duration is taken from `started_at` unless one was already
    /// recorded. Finalizing twice has no effect.
    pub fn finalize(&mut self, exit_code: i32, error: Option<String>) {
        if self.finalized {
            return;
        }

        self.exit_code = exit_code;
        self.error = error.unwrap_or_default();
        if self.duration_secs <= 0.0 {
            let elapsed_ms = (Utc::now() - self.started_at).num_milliseconds().max(0);
            self.duration_secs = elapsed_ms as f64 / 1000.0;
        }
        self.ok = self.error.is_empty();
        self.finalized = true;

        log_success!(codes::success::SCAN_FINALIZED, "Scan result finalized",
            "file" => self.file_name(),
            "total" => self.total_count(),
            "exit_code" => self.exit_code,
            "ok" => self.ok
        );

        let threshold = self.scan_settings.threshold();
        if self.failed_at(threshold) {
            log_error!(codes::results::THRESHOLD_VIOLATED, "Scan exceeded its severity threshold",
                "file" => self.file_name(),
                "threshold" => threshold,
                "at_or_above" => self.count_at_or_above(threshold)
            );
        } else {
            log_success!(codes::success::THRESHOLD_PASSED, "Scan within its severity threshold",
                "file" => self.file_name(),
                "threshold" => threshold
            );
        }
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    /// One-line human-readable summary
    pub fn summary(&self) -> String {
        let tallies: Vec<String> = Severity::ALL
            .iter()
            .map(|tier| format!("{}={}", tier, self.count(*tier)))
            .collect();

        let verdict = if self.failed_configured() {
            "FAILED"
        } else {
            "PASSED"
        };

        format!(
            "{} {} {}: {} findings ({} ignored={}) threshold={} {}",
            self.scan_settings.tool,
            self.scan_settings.scan_type,
            self.scan_target,
            self.total_count(),
            tallies.join(" "),
            self.num_ignored,
            self.scan_settings.severity,
            verdict
        )
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Serialize to compact JSON string
    pub fn to_json_compact(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Parse from JSON string; the parsed result is final
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

fn sanitize_component(value: &str) -> String {
    value
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                FILE_NAME_REPLACEMENT
            }
        })
        .collect()
}
