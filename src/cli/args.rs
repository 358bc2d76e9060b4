//! Command-line argument definitions for the NIBRS flat-file tool
//!
//! This module defines the CLI interface using the clap derive API.

use crate::app::models::SegmentLevel;
use crate::constants::MAX_PARALLEL_WORKERS;
use crate::{Error, Result};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the NIBRS flat-file tool
///
/// Reads FBI NIBRS fixed-width flat files, groups their segments into
/// incident reports, and reports every structural error found.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "nibrs-flatfile",
    version,
    about = "Check NIBRS fixed-width flat files and group their segments into incident reports",
    long_about = "Reads FBI NIBRS flat-file submissions, decodes every segment against its \
                  fixed-width layout, groups segments into Group A incidents, zero reports and \
                  Group B arrest reports, and lists the structural errors found along the way."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Build every report in the given files and summarise the errors
    Check(CheckArgs),
    /// Print the segment layout table
    Layout(LayoutArgs),
}

/// Arguments for the check command
#[derive(Debug, Clone, Parser)]
pub struct CheckArgs {
    /// Flat files, or directories to search for them
    #[arg(value_name = "PATH", required = true, num_args = 1..)]
    pub paths: Vec<PathBuf>,

    /// File name pattern used when a directory is given
    ///
    /// Overrides the configured pattern (default `*.txt`).
    #[arg(
        short = 'p',
        long = "pattern",
        value_name = "GLOB",
        help = "File name pattern used when searching directories"
    )]
    pub pattern: Option<String>,

    /// Output format for the summary
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for results"
    )]
    pub output_format: OutputFormat,

    /// List every structural error, not only the counts
    #[arg(long = "list-errors", help = "List every structural error found")]
    pub list_errors: bool,

    /// Exit with status 1 when any structural error was found
    #[arg(
        long = "fail-on-errors",
        help = "Exit with a failure status when structural errors are found"
    )]
    pub fail_on_errors: bool,

    /// Treat the first blank line as the end of each file
    #[arg(
        long = "stop-at-blank-line",
        help = "Stop reading a file at its first blank line"
    )]
    pub stop_at_blank_line: bool,

    /// Skip state-specific segment levels instead of reporting them
    #[arg(
        long = "state-specific",
        help = "Skip state-specific segments (levels 8 and 9)"
    )]
    pub state_specific_segments: bool,

    /// Number of files built concurrently
    #[arg(
        short = 'j',
        long = "workers",
        value_name = "COUNT",
        help = "Number of files processed concurrently"
    )]
    pub workers: Option<usize>,

    /// Path to configuration file
    ///
    /// TOML configuration file. If not specified, looks for
    /// ~/.config/nibrs-flatfile/config.toml
    #[arg(
        short = 'c',
        long = "config",
        value_name = "FILE",
        help = "Path to configuration file (TOML format)"
    )]
    pub config_file: Option<PathBuf>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Suppress output (quiet mode)
    #[arg(
        short = 'q',
        long = "quiet",
        help = "Suppress output except errors",
        conflicts_with = "verbose"
    )]
    pub quiet: bool,
}

/// Arguments for the layout command
#[derive(Debug, Clone, Parser)]
pub struct LayoutArgs {
    /// Segment level to print, by code (`1`) or name (`administrative`)
    ///
    /// If not specified, prints every level.
    #[arg(value_name = "LEVEL")]
    pub level: Option<LevelArg>,

    /// Output format for the layout table
    #[arg(
        long = "format",
        value_enum,
        default_value = "human",
        help = "Output format for the layout table"
    )]
    pub output_format: OutputFormat,
}

/// Output format options for machine-readable results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
    /// CSV format for data analysis
    Csv,
}

/// Segment level given on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelArg(pub SegmentLevel);

impl FromStr for LevelArg {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        let mut chars = wanted.chars();
        if let (Some(code), None) = (chars.next(), chars.next()) {
            if let Some(level) = SegmentLevel::from_code(code) {
                return Ok(LevelArg(level));
            }
        }

        let normalized = wanted.to_ascii_lowercase().replace(['-', '_'], " ");
        SegmentLevel::ALL
            .into_iter()
            .find(|level| level.name().to_ascii_lowercase() == normalized)
            .map(LevelArg)
            .ok_or_else(|| {
                Error::configuration(format!(
                    "Unknown segment level '{}'. Use a code 0-7 or a name such as 'offense'",
                    s
                ))
            })
    }
}

impl CheckArgs {
    /// Validate the check command arguments for consistency
    pub fn validate(&self) -> Result<()> {
        for path in &self.paths {
            if !path.exists() {
                return Err(Error::file_not_found(path.display().to_string()));
            }
        }

        if let Some(workers) = self.workers {
            if workers == 0 {
                return Err(Error::configuration(
                    "Number of workers must be greater than 0",
                ));
            }
            if workers > MAX_PARALLEL_WORKERS {
                return Err(Error::configuration(format!(
                    "Number of workers cannot exceed {}",
                    MAX_PARALLEL_WORKERS
                )));
            }
        }

        if let Some(config_file) = &self.config_file {
            if !config_file.exists() {
                return Err(Error::configuration(format!(
                    "Config file does not exist: {}",
                    config_file.display()
                )));
            }
        }

        Ok(())
    }

    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }

    /// Check if we should show progress bars
    pub fn show_progress(&self) -> bool {
        !self.quiet && self.output_format == OutputFormat::Human
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn check_args(paths: Vec<PathBuf>) -> CheckArgs {
        CheckArgs {
            paths,
            pattern: None,
            output_format: OutputFormat::Human,
            list_errors: false,
            fail_on_errors: false,
            stop_at_blank_line: false,
            state_specific_segments: false,
            workers: None,
            config_file: None,
            verbose: 0,
            quiet: false,
        }
    }

    #[test]
    fn test_level_arg_parsing() {
        assert_eq!(
            LevelArg::from_str("1").unwrap(),
            LevelArg(SegmentLevel::Administrative)
        );
        assert_eq!(
            LevelArg::from_str("offense").unwrap(),
            LevelArg(SegmentLevel::Offense)
        );
        assert_eq!(
            LevelArg::from_str("group-b-arrest").unwrap(),
            LevelArg(SegmentLevel::GroupBArrest)
        );
        assert_eq!(
            LevelArg::from_str("Zero_Report").unwrap(),
            LevelArg(SegmentLevel::ZeroReport)
        );

        assert!(LevelArg::from_str("8").is_err());
        assert!(LevelArg::from_str("vehicle").is_err());
        assert!(LevelArg::from_str("").is_err());
    }

    #[test]
    fn test_check_args_validation() {
        let temp_dir = TempDir::new().unwrap();
        let args = check_args(vec![temp_dir.path().to_path_buf()]);
        assert!(args.validate().is_ok());

        let mut invalid_args = args.clone();
        invalid_args.workers = Some(0);
        assert!(invalid_args.validate().is_err());

        invalid_args.workers = Some(MAX_PARALLEL_WORKERS + 1);
        assert!(invalid_args.validate().is_err());

        let mut invalid_args = args.clone();
        invalid_args.paths = vec![PathBuf::from("/nonexistent/nibrs.txt")];
        assert!(matches!(
            invalid_args.validate(),
            Err(Error::FileNotFound { .. })
        ));

        let mut invalid_args = args;
        invalid_args.config_file = Some(temp_dir.path().join("missing.toml"));
        assert!(invalid_args.validate().is_err());
    }

    #[test]
    fn test_log_level_from_flags() {
        let mut args = check_args(vec![]);
        assert_eq!(args.get_log_level(), "warn");

        args.verbose = 1;
        assert_eq!(args.get_log_level(), "info");
        args.verbose = 2;
        assert_eq!(args.get_log_level(), "debug");
        args.verbose = 5;
        assert_eq!(args.get_log_level(), "trace");

        args.quiet = true;
        assert_eq!(args.get_log_level(), "error");
        assert!(!args.show_progress());
    }

    #[test]
    fn test_cli_parsing() {
        let args = Args::try_parse_from([
            "nibrs-flatfile",
            "check",
            "a.txt",
            "b.txt",
            "--format",
            "json",
            "-j",
            "2",
            "--list-errors",
        ])
        .unwrap();

        match args.command {
            Some(Commands::Check(check)) => {
                assert_eq!(check.paths.len(), 2);
                assert_eq!(check.output_format, OutputFormat::Json);
                assert_eq!(check.workers, Some(2));
                assert!(check.list_errors);
                assert!(!check.show_progress());
            }
            other => panic!("unexpected command: {:?}", other),
        }

        let args = Args::try_parse_from(["nibrs-flatfile", "layout", "victim"]).unwrap();
        match args.command {
            Some(Commands::Layout(layout)) => {
                assert_eq!(layout.level, Some(LevelArg(SegmentLevel::Victim)));
            }
            other => panic!("unexpected command: {:?}", other),
        }

        assert!(Args::try_parse_from(["nibrs-flatfile", "check"]).is_err());
        assert!(Args::try_parse_from(["nibrs-flatfile", "check", "a.txt", "-v", "-q"]).is_err());
    }
}
