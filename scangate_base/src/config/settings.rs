//! # Scan Settings
//!
//! What was scanned, with which tool, and the severity threshold the scan is
//! gated on. Loaded from TOML, then optionally overridden from the environment.

use super::constants::{DEFAULT_SEVERITY_THRESHOLD, IMAGE_SCAN_TYPE};
use super::error::SettingsError;
use super::runtime::env_vars;
use crate::logging::codes;
use crate::results::Severity;
use crate::{log_success, log_warning};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Settings for one scan invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanSettings {
    /// Scanner name, e.g. `grype` or `trivy`
    pub tool: String,

    /// Scan category, e.g. `image`, `fs`, `sbom`
    #[serde(rename = "type")]
    pub scan_type: String,

    /// Image reference, path, or other target identifier
    #[serde(default)]
    pub target: String,

    /// Minimum severity that fails the scan
    #[serde(default = "default_severity")]
    pub severity: String,

    /// Finding identifiers the output parser skips
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub ignore: Vec<String>,
}

fn default_severity() -> String {
    DEFAULT_SEVERITY_THRESHOLD.to_string()
}

impl ScanSettings {
    /// Create settings with the default threshold
    pub fn new(
        tool: impl Into<String>,
        scan_type: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            tool: tool.into(),
            scan_type: scan_type.into(),
            target: target.into(),
            severity: default_severity(),
            ignore: Vec::new(),
        }
    }

    /// Set the severity threshold
    pub fn with_severity(mut self, severity: impl Into<String>) -> Self {
        self.severity = severity.into();
        self
    }

    /// Set the ignore list
    pub fn with_ignore<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore = ids.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_image_scan(&self) -> bool {
        self.scan_type.trim().eq_ignore_ascii_case(IMAGE_SCAN_TYPE)
    }

    /// Threshold tier; unrecognized text maps to `Unknown`, which never fails
    pub fn threshold(&self) -> Severity {
        Severity::from_label(&self.severity)
    }

    pub fn is_ignored(&self, finding_id: &str) -> bool {
        self.ignore.iter().any(|id| id == finding_id)
    }

    /// Ensure tool and scan type are present
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.tool.trim().is_empty() {
            return Err(SettingsError::MissingField { field: "tool" });
        }
        if self.scan_type.trim().is_empty() {
            return Err(SettingsError::MissingField { field: "type" });
        }
        Ok(())
    }

    /// Parse and validate settings from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self, SettingsError> {
        let settings: ScanSettings = toml::from_str(content)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a TOML file and apply environment overrides
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        Self::load_with_lookup(path, |name| std::env::var(name).ok())
    }

    /// Load settings from a TOML file, taking overrides from `lookup`
    pub fn load_with_lookup<F>(path: impl AsRef<Path>, lookup: F) -> Result<Self, SettingsError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let mut settings: ScanSettings = toml::from_str(&content)?;
        settings.apply_env_overrides(lookup);
        settings.validate()?;

        log_success!(codes::success::SETTINGS_LOADED, "Scan settings loaded",
            "path" => path.display(),
            "tool" => &settings.tool,
            "type" => &settings.scan_type,
            "severity" => &settings.severity
        );

        Ok(settings)
    }

    /// Override fields from `SCANGATE_*` variables; returns the number applied
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> usize
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut applied = 0;
        let fields: [(&str, &mut String); 4] = [
            (env_vars::SCAN_TOOL, &mut self.tool),
            (env_vars::SCAN_TYPE, &mut self.scan_type),
            (env_vars::SCAN_TARGET, &mut self.target),
            (env_vars::SCAN_SEVERITY, &mut self.severity),
        ];

        for (name, field) in fields {
            if let Some(value) = lookup(name).filter(|v| !v.trim().is_empty()) {
                log_warning!(code = codes::config::ENV_OVERRIDE_APPLIED, "Setting overridden from environment",
                    "variable" => name,
                    "value" => &value
                );
                *field = value;
                applied += 1;
            }
        }

        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn test_from_toml_defaults() {
        let settings = ScanSettings::from_toml_str(
            r#"
            tool = "grype"
            type = "image"
            target = "alpine:3.19"
            "#,
        )
        .unwrap();

        assert_eq!(settings.severity, "medium");
        assert_eq!(settings.threshold(), Severity::Medium);
        assert!(settings.is_image_scan());
        assert!(settings.ignore.is_empty());
    }

    #[test]
    fn test_from_toml_full() {
        let settings = ScanSettings::from_toml_str(
            r#"
            tool = "trivy"
            type = "fs"
            target = "/src"
            severity = "HIGH"
            ignore = ["CVE-2023-0001", "GHSA-xxxx"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.threshold(), Severity::High);
        assert!(!settings.is_image_scan());
        assert!(settings.is_ignored("CVE-2023-0001"));
        assert!(!settings.is_ignored("CVE-2023-9999"));
    }

    #[test]
    fn test_missing_tool_rejected() {
        let result = ScanSettings::from_toml_str("tool = \"\"\ntype = \"fs\"\n");
        assert_matches!(result, Err(SettingsError::MissingField { field: "tool" }));
    }

    #[test]
    fn test_invalid_toml_rejected() {
        let err = ScanSettings::from_toml_str("tool = ").unwrap_err();
        assert_matches!(err, SettingsError::Parse(_));
        assert!(err.is_recoverable());
    }

    #[test]
    fn test_load_missing_file() {
        let result = ScanSettings::load("/nonexistent/scangate.toml");
        assert_matches!(result, Err(SettingsError::Io { .. }));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tool = \"grype\"\ntype = \"sbom\"\nseverity = \"low\"").unwrap();

        let settings = ScanSettings::load_with_lookup(file.path(), |_| None).unwrap();
        assert_eq!(settings.tool, "grype");
        assert_eq!(settings.scan_type, "sbom");
        assert_eq!(settings.threshold(), Severity::Low);
    }

    #[test]
    fn test_load_applies_lookup_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tool = \"grype\"\ntype = \"sbom\"").unwrap();

        let settings = ScanSettings::load_with_lookup(file.path(), |name| {
            (name == env_vars::SCAN_TOOL).then(|| "trivy".to_string())
        })
        .unwrap();
        assert_eq!(settings.tool, "trivy");
        assert_eq!(settings.scan_type, "sbom");
    }

    #[test]
    fn test_load_rejects_empty_tool() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "tool = \"\"\ntype = \"fs\"").unwrap();

        let result = ScanSettings::load_with_lookup(file.path(), |_| None);
        assert_matches!(result, Err(SettingsError::MissingField { field: "tool" }));
    }

    #[test]
    fn test_env_overrides() {
        let mut settings = ScanSettings::new("grype", "image", "alpine");
        let applied = settings.apply_env_overrides(|name| match name {
            env_vars::SCAN_SEVERITY => Some("critical".to_string()),
            env_vars::SCAN_TARGET => Some("   ".to_string()),
            _ => None,
        });

        assert_eq!(applied, 1);
        assert_eq!(settings.threshold(), Severity::Critical);
        assert_eq!(settings.target, "alpine");
    }

    #[test]
    fn test_unrecognized_threshold_is_unknown() {
        let settings = ScanSettings::new("grype", "fs", ".").with_severity("severe");
        assert_eq!(settings.threshold(), Severity::Unknown);
    }
}
