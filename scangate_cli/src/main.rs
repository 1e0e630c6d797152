//! # Scangate CLI
//!

mod cli;

use clap::Parser;
use cli::{CheckArgs, Cli, Commands, ScoreArgs};
use scangate_base::config::{LogBackend, LoggingPreferences};
use scangate_base::logging::{self, codes};
use scangate_base::prelude::*;
use scangate_base::{log_error, log_info};
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::process::ExitCode;

fn main() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging()?;
    log_info!("Scangate starting", "version" => env!("CARGO_PKG_VERSION"));

    let failed = match cli.command {
        Commands::Score(args) => run_score(args)?,
        Commands::Check(args) => run_check(args)?,
    };

    Ok(if failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let preferences = LoggingPreferences::default();

    if preferences.effective_backend() == LogBackend::Facade {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
            .try_init()?;
        log::debug!("env_logger installed for the facade backend");
    }

    logging::init_global_logging(&preferences).map_err(|e| {
        logging::safe_log_error(codes::system::INITIALIZATION_FAILURE, &e);
        e
    })?;
    Ok(())
}

fn resolve_settings(args: &ScoreArgs) -> Result<ScanSettings, SettingsError> {
    let mut settings = match &args.settings {
        Some(path) => ScanSettings::load(path)?,
        None => ScanSettings::new(
            args.tool.clone().unwrap_or_default(),
            args.scan_type.clone().unwrap_or_default(),
            args.target.clone().unwrap_or_default(),
        ),
    };

    if let Some(tool) = &args.tool {
        settings.tool = tool.clone();
    }
    if let Some(scan_type) = &args.scan_type {
        settings.scan_type = scan_type.clone();
    }
    if let Some(target) = &args.target {
        settings.target = target.clone();
    }
    if let Some(severity) = &args.severity {
        settings.severity = severity.clone();
    }

    settings.validate()?;
    Ok(settings)
}

fn open_input(input: Option<&Path>) -> std::io::Result<Box<dyn BufRead>> {
    match input {
        Some(path) if path != Path::new("-") => {
            Ok(Box::new(BufReader::new(std::fs::File::open(path)?)))
        }
        _ => Ok(Box::new(BufReader::new(std::io::stdin()))),
    }
}

/// Score one findings line: `<severity>` or `<finding-id> <severity>`
fn score_line(result: &mut ScanResult, settings: &ScanSettings, line: &str) {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return;
    }

    let mut fields = line.split_whitespace();
    let (id, severity) = match (fields.next(), fields.next()) {
        (Some(id), Some(severity)) => (Some(id), severity),
        (Some(severity), None) => (None, severity),
        _ => return,
    };

    match id {
        Some(id) if settings.is_ignored(id) => result.record_ignored(),
        _ => {
            result.score(severity);
        }
    }
}

fn run_score(args: ScoreArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let settings = resolve_settings(&args).map_err(|e| {
        log_error!(e.code(), "Invalid scan settings", "error" => &e);
        e
    })?;

    let mut result = ScanResult::new(settings.clone());
    if let Some(command_line) = &args.command_line {
        result = result.with_command_line(command_line.clone());
    }
    if let Some(duration) = args.duration {
        result = result.with_duration_secs(duration);
    }

    let reader = open_input(args.input.as_deref())?;
    for line in reader.lines() {
        score_line(&mut result, &settings, &line?);
    }

    result.finalize(args.exit_code, args.error.clone());
    println!("{}", result.summary());

    if let Some(out) = &args.out {
        let path = write_report(out, &result)?;
        println!("Report: {}", path.display());
    }

    Ok(result.failed_configured())
}

fn run_check(args: CheckArgs) -> Result<bool, Box<dyn std::error::Error>> {
    let set = load_reports(&args.dir)?;

    for result in &set {
        println!("{}", result.summary());
    }

    let failed = match &args.severity {
        Some(threshold) => set.any_failed(threshold),
        None => set.any_failed_configured(),
    };

    if failed {
        log_error!(codes::results::THRESHOLD_VIOLATED, "One or more scans exceeded the threshold",
            "reports" => set.len(),
            "dir" => args.dir.display()
        );
    }
    println!(
        "{} reports, {} findings: {}",
        set.len(),
        set.total_count(),
        if failed { "FAILED" } else { "PASSED" }
    );

    Ok(failed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> ScanSettings {
        ScanSettings::new("grype", "image", "alpine").with_ignore(["CVE-2024-0001"])
    }

    #[test]
    fn test_score_line_forms() {
        let settings = settings();
        let mut result = ScanResult::new(settings.clone());

        score_line(&mut result, &settings, "High");
        score_line(&mut result, &settings, "CVE-2024-9999 critical");
        score_line(&mut result, &settings, "CVE-2024-0001 critical");
        score_line(&mut result, &settings, "   ");
        score_line(&mut result, &settings, "# comment");
        score_line(&mut result, &settings, "GHSA-1 whatever");

        assert_eq!(result.count(Severity::High), 1);
        assert_eq!(result.count(Severity::Critical), 1);
        assert_eq!(result.count(Severity::Unknown), 1);
        assert_eq!(result.ignored_count(), 1);
        assert_eq!(result.total_count(), 3);
    }

    #[test]
    fn test_resolve_settings_from_flags() {
        let args = Cli::parse_from([
            "scangate", "score", "--tool", "trivy", "--type", "fs", "--severity", "high",
        ]);
        let Commands::Score(args) = args.command else {
            panic!("expected score command");
        };

        let settings = resolve_settings(&args).unwrap();
        assert_eq!(settings.tool, "trivy");
        assert_eq!(settings.threshold(), Severity::High);
    }

    #[test]
    fn test_resolve_settings_requires_tool() {
        let args = Cli::parse_from(["scangate", "score", "--type", "fs"]);
        let Commands::Score(args) = args.command else {
            panic!("expected score command");
        };

        assert!(matches!(
            resolve_settings(&args),
            Err(SettingsError::MissingField { field: "tool" })
        ));
    }

    #[test]
    fn test_negative_exit_code_accepted() {
        let args = Cli::parse_from(["scangate", "score", "--tool", "t", "--type", "fs", "--exit-code", "-1"]);
        let Commands::Score(args) = args.command else {
            panic!("expected score command");
        };
        assert_eq!(args.exit_code, -1);
    }
}
