use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "scangate", version, about = "Gate CI on vulnerability scanner findings")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Tally scanner findings into a report and gate on its threshold
    Score(ScoreArgs),

    /// Gate on every report in a directory
    Check(CheckArgs),
}

#[derive(Args, Debug)]
pub struct ScoreArgs {
    /// Scan settings file (TOML)
    #[arg(long, short = 's')]
    pub settings: Option<PathBuf>,

    /// Scanner name; overrides the settings file
    #[arg(long)]
    pub tool: Option<String>,

    /// Scan type, e.g. image or fs; overrides the settings file
    #[arg(long = "type")]
    pub scan_type: Option<String>,

    /// Scan target; overrides the settings file
    #[arg(long)]
    pub target: Option<String>,

    /// Severity threshold; overrides the settings file
    #[arg(long)]
    pub severity: Option<String>,

    /// Findings file, one `<severity>` or `<id> <severity>` per line; `-` or absent reads stdin
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,

    /// Directory to write the report into
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,

    /// Exit code the scanner returned
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    pub exit_code: i32,

    /// Error text the scanner produced
    #[arg(long)]
    pub error: Option<String>,

    /// Command line used to run the scanner
    #[arg(long)]
    pub command_line: Option<String>,

    /// Measured scan duration in seconds
    #[arg(long)]
    pub duration: Option<f64>,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Directory containing reports
    pub dir: PathBuf,

    /// Threshold applied to every report instead of each report's own
    #[arg(long)]
    pub severity: Option<String>,
}
