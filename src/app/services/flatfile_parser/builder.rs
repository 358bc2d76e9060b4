//! Flat-file build orchestration
//!
//! This module provides [`IncidentBuilder`], which reads a NIBRS flat file line
//! by line, decodes each line, feeds the assembler, and dispatches every
//! finalized report to the registered listeners.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use super::assembler::{FinishedReport, IncidentAssembler};
use super::listener::{ListenerRegistry, ReportListener};
use super::segment_decoder::{DecodedLine, SegmentDecoder};
use super::stats::{BuildResult, BuildStats};
use crate::app::models::NibrsError;
use crate::config::FlatfileConfig;
use crate::{Error, Result};

/// Builds reports from NIBRS flat files
///
/// Every call to [`IncidentBuilder::build`] starts from a fresh assembler, so
/// one builder can process any number of inputs in turn. Listeners are
/// borrowed for the builder's lifetime and called in registration order.
#[derive(Debug, Default)]
pub struct IncidentBuilder<'l> {
    config: FlatfileConfig,
    decoder: SegmentDecoder,
    listeners: ListenerRegistry<'l>,
    cancellation_token: Option<CancellationToken>,
}

impl<'l> IncidentBuilder<'l> {
    /// Create a builder with default options
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder with the given options
    pub fn with_config(config: FlatfileConfig) -> Self {
        let decoder =
            SegmentDecoder::new().with_state_specific_segments(config.state_specific_segments);
        Self {
            config,
            decoder,
            ..Self::default()
        }
    }

    /// Stop the build at the next line once the token is cancelled
    pub fn with_cancellation_token(mut self, token: CancellationToken) -> Self {
        self.cancellation_token = Some(token);
        self
    }

    pub fn add_incident_listener(&mut self, listener: &'l mut dyn ReportListener) {
        self.listeners.add(listener);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn config(&self) -> &FlatfileConfig {
        &self.config
    }

    /// Build every report in `reader` and return the structural errors found
    pub fn build_incidents(&mut self, reader: impl BufRead) -> Result<Vec<NibrsError>> {
        self.build(reader, None).map(|result| result.errors)
    }

    /// Build every report in a file
    pub fn build_file(&mut self, path: &Path) -> Result<BuildResult> {
        if !path.exists() {
            return Err(Error::file_not_found(path.display().to_string()));
        }
        let file = File::open(path)
            .map_err(|e| Error::io(format!("Failed to open {}", path.display()), e))?;

        let source_name = path.display().to_string();
        self.build(BufReader::new(file), Some(&source_name))
    }

    /// Build every report in `reader`, returning errors and statistics.
    ///
    /// `source_name` is recorded on each report for provenance. Data defects
    /// never fail the build; only a read failure or cancellation does.
    pub fn build(
        &mut self,
        mut reader: impl BufRead,
        source_name: Option<&str>,
    ) -> Result<BuildResult> {
        let source = source_name.unwrap_or("<input>");
        info!("Building incidents from {}", source);

        let mut assembler = IncidentAssembler::new(source_name.map(str::to_string));
        let mut stats = BuildStats::new();
        let mut buffer = Vec::new();
        let mut line_number = 0;

        loop {
            if self.is_cancelled() {
                warn!("Build of {} cancelled after line {}", source, line_number);
                return Err(Error::processing_interrupted(format!(
                    "Build of {} cancelled after line {}",
                    source, line_number
                )));
            }

            buffer.clear();
            let bytes_read = reader.read_until(b'\n', &mut buffer).map_err(|e| {
                Error::io(
                    format!("Failed to read line {} of {}", line_number + 1, source),
                    e,
                )
            })?;
            if bytes_read == 0 {
                break;
            }

            line_number += 1;
            stats.lines_read += 1;

            let text = String::from_utf8_lossy(&buffer);
            let line = strip_terminator(&text);

            if line.trim().is_empty() {
                if self.config.stop_at_blank_line {
                    debug!("Blank line {} ends the input", line_number);
                    break;
                }
                stats.blank_lines_skipped += 1;
                continue;
            }

            let decoded = self.decoder.decode_line(line, line_number);
            stats.record_line(&decoded);
            self.log_line_errors(&decoded);

            if let Some(finished) = assembler.accept(decoded) {
                self.dispatch(&finished, &mut stats);
            }
        }

        if let Some(finished) = assembler.finish() {
            self.dispatch(&finished, &mut stats);
        }

        stats.orphan_segments = assembler.orphan_segments();
        let errors = assembler.into_errors();
        stats.structural_errors = errors.len();

        info!(
            "Built {} reports from {} lines of {} ({} structural errors)",
            stats.total_reports(),
            stats.lines_read,
            source,
            stats.structural_errors
        );

        Ok(BuildResult { errors, stats })
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation_token
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }

    fn dispatch(&mut self, finished: &FinishedReport, stats: &mut BuildStats) {
        stats.record_report(finished);
        self.listeners.dispatch(finished);
    }

    fn log_line_errors(&self, line: &DecodedLine) {
        for error in &line.errors {
            if self.config.log_each_error {
                warn!("{}", error);
            } else {
                debug!("{}", error);
            }
        }
    }
}

/// Remove one trailing `\n` or `\r\n`
fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}
