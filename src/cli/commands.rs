//! Command implementations for the NIBRS flat-file CLI
//!
//! This module contains the command execution logic, parallel file checking,
//! progress reporting, and the human, JSON and CSV report renderers.

use crate::app::models::{NibrsError, SegmentLevel};
use crate::app::services::flatfile_parser::{
    BuildStats, IncidentBuilder, LoggingListener, SegmentSpec,
};
use crate::cli::args::{Args, CheckArgs, Commands, LayoutArgs, OutputFormat};
use crate::cli::input::discover_flat_files;
use crate::config::{Config, FlatfileConfig};
use crate::{Error, Result};
use colored::*;
use futures::{StreamExt, stream};
use indicatif::{HumanDuration, ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// =============================================================================
// Summary Types
// =============================================================================

/// Result of checking one file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    pub path: PathBuf,
    pub stats: BuildStats,
    pub errors: Vec<NibrsError>,
}

/// Result of a whole check run
#[derive(Debug, Clone, Default)]
pub struct CheckSummary {
    /// Per-file outcomes, sorted by path
    pub files: Vec<FileOutcome>,
    /// Counters summed over every file
    pub totals: BuildStats,
    pub processing_time: Duration,
    /// Whether structural errors should fail the run
    pub fail_on_errors: bool,
}

impl CheckSummary {
    pub fn files_checked(&self) -> usize {
        self.files.len()
    }

    pub fn files_with_errors(&self) -> usize {
        self.files.iter().filter(|file| !file.stats.is_clean()).count()
    }

    /// True when the run should end with a failure status
    pub fn should_fail(&self) -> bool {
        self.fail_on_errors && !self.totals.is_clean()
    }
}

// =============================================================================
// Command Dispatch
// =============================================================================

/// Main command runner
pub async fn run(args: Args, cancellation_token: CancellationToken) -> Result<CheckSummary> {
    match args.command {
        Some(Commands::Check(check_args)) => run_check(check_args, cancellation_token).await,
        Some(Commands::Layout(layout_args)) => {
            run_layout(&layout_args)?;
            Ok(CheckSummary::default())
        }
        None => Err(Error::configuration("No command given")),
    }
}

async fn run_check(args: CheckArgs, cancellation_token: CancellationToken) -> Result<CheckSummary> {
    args.validate()?;
    let config = load_configuration(&args)?;
    setup_logging(&config.logging.level, args.quiet)?;

    let files = discover_flat_files(&args.paths, &config.processing.file_pattern)
        .map_err(|e| Error::configuration(format!("{:#}", e)))?;
    if files.is_empty() {
        warn!(
            "No files matching '{}' found",
            config.processing.file_pattern
        );
    }

    let summary = check_files(files, &config, cancellation_token, args.show_progress()).await?;
    generate_final_report(&args, &summary)?;

    Ok(summary)
}

fn run_layout(args: &LayoutArgs) -> Result<()> {
    let levels = match args.level {
        Some(level) => vec![level.0],
        None => SegmentLevel::ALL.to_vec(),
    };

    match args.output_format {
        OutputFormat::Human => print_human_layout(&levels),
        OutputFormat::Json => println!("{}", render_json_layout(&levels)?),
        OutputFormat::Csv => print!("{}", render_csv_layout(&levels)?),
    }
    Ok(())
}

// =============================================================================
// Logging and Configuration
// =============================================================================

/// Set up structured logging on stderr
pub fn setup_logging(log_level: &str, quiet: bool) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("nibrs_flatfile={}", log_level)));

    if quiet {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Load configuration using layered approach (defaults -> file -> args)
pub fn load_configuration(args: &CheckArgs) -> Result<Config> {
    let default_config_path = if args.config_file.is_none() {
        Config::default_config_path().ok()
    } else {
        None
    };

    let config_file = match &args.config_file {
        Some(path) => Some(path.as_path()),
        None => default_config_path
            .as_deref()
            .filter(|path| path.exists()),
    };

    let mut config = Config::load_layered(config_file)?;
    apply_cli_overrides(&mut config, args);
    config.validate()?;

    Ok(config)
}

/// Apply CLI argument overrides to configuration
pub fn apply_cli_overrides(config: &mut Config, args: &CheckArgs) {
    if let Some(pattern) = &args.pattern {
        config.processing.file_pattern = pattern.clone();
    }
    if let Some(workers) = args.workers {
        config.processing.workers = workers;
    }
    if args.fail_on_errors {
        config.processing.fail_on_errors = true;
    }

    if args.stop_at_blank_line {
        config.builder.stop_at_blank_line = true;
    }
    if args.state_specific_segments {
        config.builder.state_specific_segments = true;
    }

    if args.quiet || args.verbose > 0 {
        config.logging.level = args.get_log_level().to_string();
    }
}

// =============================================================================
// Parallel Checking
// =============================================================================

/// Build every file with bounded concurrency.
///
/// Each file runs on its own blocking task with its own builder. Outcomes
/// are sorted by path so reports do not depend on completion order.
pub async fn check_files(
    files: Vec<PathBuf>,
    config: &Config,
    cancellation_token: CancellationToken,
    show_progress: bool,
) -> Result<CheckSummary> {
    let start_time = Instant::now();
    let workers = config.processing.workers.max(1);
    info!(
        "Checking {} files with {} workers",
        files.len(),
        workers
    );

    let progress_bar = (show_progress && !files.is_empty())
        .then(|| create_progress_bar(files.len() as u64, "Checking flat files..."));

    let builder_config = Arc::new(config.builder.clone());
    let mut builds = stream::iter(files)
        .map(|path| {
            let builder_config = Arc::clone(&builder_config);
            let token = cancellation_token.clone();
            async move {
                let name = path.display().to_string();
                tokio::task::spawn_blocking(move || check_file(path, &builder_config, token))
                    .await
                    .unwrap_or_else(|join_error| {
                        let message = format!("Build of {} failed: {}", name, join_error);
                        Err(Error::task_failed(message))
                    })
            }
        })
        .buffer_unordered(workers);

    let mut outcomes = Vec::new();
    while let Some(result) = builds.next().await {
        let outcome = result?;
        if let Some(pb) = &progress_bar {
            pb.inc(1);
            pb.set_message(display_name(&outcome.path));
        }
        outcomes.push(outcome);
    }

    if let Some(pb) = &progress_bar {
        pb.finish_with_message(format!("Checked {} files", outcomes.len()));
    }

    outcomes.sort_by(|a, b| a.path.cmp(&b.path));
    let mut totals = BuildStats::new();
    for outcome in &outcomes {
        totals.merge(&outcome.stats);
    }

    let processing_time = start_time.elapsed();
    info!(
        "Checked {} files in {:.2}s: {} reports, {} structural errors",
        outcomes.len(),
        processing_time.as_secs_f64(),
        totals.total_reports(),
        totals.structural_errors
    );

    Ok(CheckSummary {
        files: outcomes,
        totals,
        processing_time,
        fail_on_errors: config.processing.fail_on_errors,
    })
}

/// Build one file on the current thread
pub fn check_file(
    path: PathBuf,
    config: &FlatfileConfig,
    cancellation_token: CancellationToken,
) -> Result<FileOutcome> {
    let mut logger = LoggingListener::new();
    let result = {
        let mut builder = IncidentBuilder::with_config(config.clone())
            .with_cancellation_token(cancellation_token);
        builder.add_incident_listener(&mut logger);
        builder.build_file(&path)?
    };
    logger.log_summary();

    Ok(FileOutcome {
        path,
        stats: result.stats,
        errors: result.errors,
    })
}

/// Create a progress bar with the standard style
pub fn create_progress_bar(total: u64, message: &str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb.set_message(message.to_string());
    pb
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// =============================================================================
// Check Reports
// =============================================================================

fn generate_final_report(args: &CheckArgs, summary: &CheckSummary) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => print_human_report(summary, args.list_errors),
        OutputFormat::Json => println!("{}", render_json_report(summary, args.list_errors)?),
        OutputFormat::Csv => print!("{}", render_csv_report(summary, args.list_errors)?),
    }
    Ok(())
}

fn print_human_report(summary: &CheckSummary, list_errors: bool) {
    let totals = &summary.totals;

    println!("\n{}", "Flat-File Check Summary".bright_green().bold());
    for file in &summary.files {
        let status = if file.stats.is_clean() {
            "ok".bright_green().bold()
        } else {
            "errors".bright_red().bold()
        };
        println!(
            "  {:>6} {} ({} reports, {} errors)",
            status,
            file.path.display(),
            file.stats.total_reports(),
            file.stats.structural_errors
        );
        if list_errors {
            for error in &file.errors {
                println!("         {}", error.to_string().yellow());
            }
        }
    }

    println!();
    println!(
        "  {} {}",
        "Files checked:".bright_cyan(),
        summary.files_checked().to_string().bright_white()
    );
    println!(
        "  {} {}",
        "Lines read:".bright_cyan(),
        totals.lines_read.to_string().bright_white()
    );
    println!(
        "  {} {} incidents, {} zero reports, {} Group B arrests",
        "Reports:".bright_cyan(),
        totals.incidents.to_string().bright_white().bold(),
        totals.zero_reports.to_string().bright_white(),
        totals.group_b_reports.to_string().bright_white()
    );
    println!(
        "  {} {:.1}%",
        "Clean reports:".bright_cyan(),
        totals.clean_rate()
    );
    if totals.orphan_segments > 0 {
        println!(
            "  {} {}",
            "Orphan segments:".bright_yellow(),
            totals.orphan_segments.to_string().bright_yellow()
        );
    }
    if totals.structural_errors > 0 {
        println!(
            "  {} {} in {} files",
            "Structural errors:".bright_red(),
            totals.structural_errors.to_string().bright_red().bold(),
            summary.files_with_errors()
        );
    }
    println!(
        "  {} {}",
        "Time elapsed:".bright_cyan(),
        HumanDuration(summary.processing_time)
    );
    println!();
}

/// Render the check summary as pretty JSON
pub fn render_json_report(summary: &CheckSummary, list_errors: bool) -> Result<String> {
    let files: Vec<_> = summary
        .files
        .iter()
        .map(|file| {
            let mut entry = serde_json::json!({
                "path": file.path.display().to_string(),
                "stats": file.stats,
            });
            if list_errors {
                entry["errors"] = serde_json::json!(file.errors);
            }
            entry
        })
        .collect();

    let report = serde_json::json!({
        "files_checked": summary.files_checked(),
        "files_with_errors": summary.files_with_errors(),
        "processing_time_seconds": summary.processing_time.as_secs_f64(),
        "totals": summary.totals,
        "files": files,
    });

    serde_json::to_string_pretty(&report)
        .map_err(|e| Error::serialization("Failed to render JSON report", e))
}

/// One row of the `--list-errors` CSV report
#[derive(Serialize)]
struct ErrorRow<'a> {
    file: String,
    line_number: usize,
    rule_number: u16,
    segment_type: char,
    context: usize,
    value: String,
    report_identifier: Option<&'a str>,
    data_element: Option<&'a str>,
}

/// One row of the per-file CSV report
#[derive(Serialize)]
struct FileRow {
    file: String,
    lines_read: usize,
    incidents: usize,
    zero_reports: usize,
    group_b_reports: usize,
    tainted_reports: usize,
    orphan_segments: usize,
    structural_errors: usize,
}

/// Render per-file counters, or every error when `list_errors` is set
pub fn render_csv_report(summary: &CheckSummary, list_errors: bool) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for file in &summary.files {
        let path = file.path.display().to_string();
        if list_errors {
            for error in &file.errors {
                writer
                    .serialize(ErrorRow {
                        file: path.clone(),
                        line_number: error.line_number,
                        rule_number: error.rule_number,
                        segment_type: error.segment_type,
                        context: error.context,
                        value: error.value.to_string(),
                        report_identifier: error.report_identifier.as_deref(),
                        data_element: error.data_element.as_deref(),
                    })
                    .map_err(|e| Error::csv("Failed to write error row", e))?;
            }
        } else {
            let stats = &file.stats;
            writer
                .serialize(FileRow {
                    file: path,
                    lines_read: stats.lines_read,
                    incidents: stats.incidents,
                    zero_reports: stats.zero_reports,
                    group_b_reports: stats.group_b_reports,
                    tainted_reports: stats.tainted_reports,
                    orphan_segments: stats.orphan_segments,
                    structural_errors: stats.structural_errors,
                })
                .map_err(|e| Error::csv("Failed to write file row", e))?;
        }
    }

    finish_csv(writer)
}

/// Flush a CSV writer and return what it wrote
fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer
        .into_inner()
        .map_err(|e| Error::io("Failed to flush CSV output", e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

// =============================================================================
// Layout Reports
// =============================================================================

fn print_human_layout(levels: &[SegmentLevel]) {
    for level in levels {
        let spec = SegmentSpec::for_level(*level);
        println!(
            "\n{} lengths {:?}, length rule {:03}",
            level.to_string().bright_green().bold(),
            spec.accepted_lengths,
            spec.length_rule
        );
        println!(
            "  {:<46} {:>5} {:>5} {:>6} {:>6} {:<10} {:>5} {:>4}",
            "field".bright_cyan(),
            "pos",
            "width",
            "occurs",
            "stride",
            "kind",
            "rule",
            "DE"
        );
        for field in spec.fields {
            println!(
                "  {:<46} {:>5} {:>5} {:>6} {:>6} {:<10} {:>5} {:>4}",
                field.name,
                field.position,
                field.width,
                field.occurs,
                field.stride,
                field.kind.name(),
                field
                    .rule
                    .map(|rule| format!("{:03}", rule))
                    .unwrap_or_default(),
                field.data_element.unwrap_or("")
            );
        }
    }
    println!();
}

/// Render the layout table for the given levels as pretty JSON
pub fn render_json_layout(levels: &[SegmentLevel]) -> Result<String> {
    let specs: Vec<_> = levels
        .iter()
        .map(|level| {
            let spec = SegmentSpec::for_level(*level);
            let fields: Vec<_> = spec
                .fields
                .iter()
                .map(|field| {
                    serde_json::json!({
                        "name": field.name,
                        "position": field.position,
                        "width": field.width,
                        "kind": field.kind.name(),
                        "occurs": field.occurs,
                        "stride": field.stride,
                        "rule": field.rule,
                        "companion_rule": field.companion_rule,
                        "data_element": field.data_element,
                    })
                })
                .collect();
            serde_json::json!({
                "level": level.code().to_string(),
                "name": level.name(),
                "accepted_lengths": spec.accepted_lengths,
                "length_rule": spec.length_rule,
                "fields": fields,
            })
        })
        .collect();

    serde_json::to_string_pretty(&specs)
        .map_err(|e| Error::serialization("Failed to render layout", e))
}

/// One row of the CSV layout table
#[derive(Serialize)]
struct LayoutRow {
    level: char,
    field: &'static str,
    position: usize,
    width: usize,
    kind: &'static str,
    occurs: usize,
    stride: usize,
    rule: Option<u16>,
    companion_rule: Option<u16>,
    data_element: Option<&'static str>,
}

/// Render the layout table for the given levels as CSV
pub fn render_csv_layout(levels: &[SegmentLevel]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for level in levels {
        for field in SegmentSpec::for_level(*level).fields {
            writer
                .serialize(LayoutRow {
                    level: level.code(),
                    field: field.name,
                    position: field.position,
                    width: field.width,
                    kind: field.kind.name(),
                    occurs: field.occurs,
                    stride: field.stride,
                    rule: field.rule,
                    companion_rule: field.companion_rule,
                    data_element: field.data_element,
                })
                .map_err(|e| Error::csv("Failed to write layout row", e))?;
        }
    }
    finish_csv(writer)
}
