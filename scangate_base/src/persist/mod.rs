//! # Report Persistence
//!
//! Writes finalized scan results as pretty JSON under the name returned by
//! [`ScanResult::file_name`], and loads a directory of them back into a
//! [`ScanResultSet`].

pub mod error;

pub use error::PersistError;

use crate::config::constants::REPORT_EXTENSION;
use crate::logging::codes;
use crate::results::{ScanResult, ScanResultSet};
use crate::{log_error, log_success};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use walkdir::WalkDir;

/// Write `result` to `dir/<file_name>`, replacing any previous report
pub fn write_report(dir: impl AsRef<Path>, result: &ScanResult) -> Result<PathBuf, PersistError> {
    let dir = dir.as_ref();
    if dir.exists() && !dir.is_dir() {
        return Err(PersistError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }
    fs::create_dir_all(dir).map_err(|e| PersistError::write(dir, e))?;

    let path = dir.join(result.file_name());
    let json = result.to_json().map_err(|source| PersistError::Json {
        path: path.clone(),
        source,
    })?;

    if let Err(e) = atomic_write(&path, json.as_bytes()) {
        log_error!(codes::persist::REPORT_WRITE_FAILED, "Failed to write report",
            "path" => path.display(),
            "error" => &e
        );
        return Err(PersistError::write(&path, e));
    }

    log_success!(codes::success::REPORT_WRITTEN, "Report written",
        "path" => path.display(),
        "total" => result.total_count()
    );

    Ok(path)
}

/// Read one report
pub fn read_report(path: impl AsRef<Path>) -> Result<ScanResult, PersistError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| PersistError::read(path, e))?;

    ScanResult::from_json(&content).map_err(|source| PersistError::Json {
        path: path.to_path_buf(),
        source,
    })
}

/// Load every report directly under `dir`, ordered by file name
pub fn load_reports(dir: impl AsRef<Path>) -> Result<ScanResultSet, PersistError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(PersistError::NotADirectory {
            path: dir.to_path_buf(),
        });
    }

    let mut paths = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
        let entry = entry?;
        if entry.file_type().is_file() && is_report_file(entry.path()) {
            paths.push(entry.into_path());
        }
    }
    paths.sort();

    let mut set = ScanResultSet::new();
    for path in &paths {
        match read_report(path) {
            Ok(result) => set.push(result),
            Err(e) => {
                log_error!(e.code(), "Failed to read report",
                    "path" => path.display(),
                    "error" => &e
                );
                return Err(e);
            }
        }
    }

    log_success!(codes::success::REPORTS_LOADED, "Reports loaded",
        "dir" => dir.display(),
        "count" => set.len()
    );

    Ok(set)
}

fn is_report_file(path: &Path) -> bool {
    let hidden = path
        .file_name()
        .and_then(|name| name.to_str())
        .map_or(true, |name| name.starts_with('.'));

    !hidden
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(REPORT_EXTENSION))
}

/// Write to a sibling temp file, then rename over the target
fn atomic_write(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let tmp_path = tmp_path_for(path);
    let result = (|| -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&tmp_path)?;
        file.write_all(bytes)?;
        file.sync_all()?;

        #[cfg(not(unix))]
        if path.exists() {
            fs::remove_file(path)?;
        }
        fs::rename(&tmp_path, path)
    })();

    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or(0);
    let file_name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("report");

    path.with_file_name(format!(
        ".{}.tmp.{}.{}",
        file_name,
        std::process::id(),
        nanos
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScanSettings;
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    fn finalized(tool: &str, scan_type: &str, target: &str, severities: &[&str]) -> ScanResult {
        let mut result = ScanResult::new(ScanSettings::new(tool, scan_type, target))
            .with_command_line(format!("{} {}", tool, target))
            .with_duration_secs(1.5);
        for severity in severities {
            result.score(severity);
        }
        result.finalize(0, None);
        result
    }

    #[test]
    fn test_write_then_read_report() {
        let dir = TempDir::new().unwrap();
        let result = finalized("grype", "image", "alpine:3.19", &["high", "low"]);

        let path = write_report(dir.path(), &result).unwrap();
        assert_eq!(path, dir.path().join("grype-image-alpine_3.19.json"));

        let loaded = read_report(&path).unwrap();
        assert_eq!(loaded, result);
        assert!(loaded.is_finalized());
    }

    #[test]
    fn test_write_overwrites_same_key() {
        let dir = TempDir::new().unwrap();
        write_report(dir.path(), &finalized("trivy", "fs", "/a", &["low"])).unwrap();
        write_report(dir.path(), &finalized("trivy", "fs", "/b", &["critical"])).unwrap();

        let set = load_reports(dir.path()).unwrap();
        assert_eq!(set.len(), 1);
        assert!(set.any_failed("critical"));
    }

    #[test]
    fn test_write_creates_directory() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("reports").join("nightly");
        let path = write_report(&nested, &finalized("grype", "sbom", "", &[])).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_write_into_file_path_rejected() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("occupied");
        fs::write(&file, "x").unwrap();

        let result = write_report(&file, &finalized("grype", "fs", ".", &[]));
        assert_matches!(result, Err(PersistError::NotADirectory { .. }));
    }

    #[test]
    fn test_load_reports_sorted_and_filtered() {
        let dir = TempDir::new().unwrap();
        write_report(dir.path(), &finalized("trivy", "fs", ".", &["medium"])).unwrap();
        write_report(dir.path(), &finalized("grype", "image", "nginx", &["negligible"])).unwrap();
        fs::write(dir.path().join("notes.txt"), "not a report").unwrap();
        fs::write(dir.path().join(".hidden.json"), "{").unwrap();
        fs::create_dir(dir.path().join("nested.json")).unwrap();

        let set = load_reports(dir.path()).unwrap();
        let tools: Vec<&str> = set.iter().map(|r| r.scan_settings.tool.as_str()).collect();
        assert_eq!(tools, vec!["grype", "trivy"]);
        assert!(set.any_failed("medium"));
        assert!(!set.any_failed("high"));
    }

    #[test]
    fn test_load_reports_invalid_json() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("broken.json"), "{\"tool\":").unwrap();

        let err = load_reports(dir.path()).unwrap_err();
        assert_matches!(err, PersistError::Json { .. });
        assert_eq!(err.code(), codes::persist::REPORT_READ_FAILED);
    }

    #[test]
    fn test_read_missing_report_is_read_failure() {
        let dir = TempDir::new().unwrap();
        let err = read_report(dir.path().join("absent.json")).unwrap_err();

        assert_matches!(err, PersistError::Read { .. });
        assert_eq!(err.code(), codes::persist::REPORT_READ_FAILED);
    }

    #[test]
    fn test_write_failure_is_write_failure() {
        let dir = TempDir::new().unwrap();
        let result = finalized("grype", "fs", ".", &[]);
        fs::create_dir(dir.path().join(result.file_name())).unwrap();

        let err = write_report(dir.path(), &result).unwrap_err();
        assert_matches!(err, PersistError::Write { .. });
        assert_eq!(err.code(), codes::persist::REPORT_WRITE_FAILED);
    }

    #[test]
    fn test_load_reports_missing_dir() {
        let dir = TempDir::new().unwrap();
        let result = load_reports(dir.path().join("absent"));
        assert_matches!(result, Err(PersistError::NotADirectory { .. }));
    }

    #[test]
    fn test_load_empty_dir() {
        let dir = TempDir::new().unwrap();
        let set = load_reports(dir.path()).unwrap();
        assert!(set.is_empty());
        assert!(!set.any_failed("low"));
    }
}
