//! Build statistics and result structures
//!
//! This module provides the per-build counters and the result returned by
//! [`super::IncidentBuilder::build`].

use super::assembler::FinishedReport;
use super::segment_decoder::DecodedLine;
use crate::app::models::{NibrsError, Report};
use serde::{Deserialize, Serialize};

/// Build result with the collected errors and statistics
#[derive(Debug, Clone)]
pub struct BuildResult {
    /// Every structural error in detection order
    pub errors: Vec<NibrsError>,

    /// Counters for the build
    pub stats: BuildStats,
}

/// Counters for one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildStats {
    /// Lines read from the input, blank lines included
    pub lines_read: usize,

    /// Blank lines skipped
    pub blank_lines_skipped: usize,

    /// Lines that decoded into a typed segment
    pub segments_decoded: usize,

    /// Lines whose level could not be recognised
    pub unclassified_lines: usize,

    /// State-specific lines skipped on request
    pub state_specific_skipped: usize,

    /// Group A incidents dispatched
    pub incidents: usize,

    /// Zero reports dispatched
    pub zero_reports: usize,

    /// Group B arrest reports dispatched
    pub group_b_reports: usize,

    /// Dispatched reports flagged with upstream errors
    pub tainted_reports: usize,

    /// Child segments dropped for lack of a matching incident
    pub orphan_segments: usize,

    /// Structural errors collected
    pub structural_errors: usize,
}

impl BuildStats {
    /// Create new empty statistics
    pub fn new() -> Self {
        Self {
            lines_read: 0,
            blank_lines_skipped: 0,
            segments_decoded: 0,
            unclassified_lines: 0,
            state_specific_skipped: 0,
            incidents: 0,
            zero_reports: 0,
            group_b_reports: 0,
            tainted_reports: 0,
            orphan_segments: 0,
            structural_errors: 0,
        }
    }

    pub fn total_reports(&self) -> usize {
        self.incidents + self.zero_reports + self.group_b_reports
    }

    /// Percentage of dispatched reports without upstream errors
    pub fn clean_rate(&self) -> f64 {
        let total = self.total_reports();
        if total == 0 {
            0.0
        } else {
            ((total - self.tainted_reports) as f64 / total as f64) * 100.0
        }
    }

    /// True when the build found no structural errors at all
    pub fn is_clean(&self) -> bool {
        self.structural_errors == 0
    }

    pub(crate) fn record_line(&mut self, line: &DecodedLine) {
        if line.segment.is_some() {
            self.segments_decoded += 1;
        } else if line.state_specific {
            self.state_specific_skipped += 1;
        } else {
            self.unclassified_lines += 1;
        }
    }

    pub(crate) fn record_report(&mut self, finished: &FinishedReport) {
        match finished.report {
            Report::GroupAIncident(_) => self.incidents += 1,
            Report::Zero(_) => self.zero_reports += 1,
            Report::GroupBArrest(_) => self.group_b_reports += 1,
        }
        if finished.report.has_upstream_errors() {
            self.tainted_reports += 1;
        }
    }

    /// Add another build's counters to these
    pub fn merge(&mut self, other: &BuildStats) {
        self.lines_read += other.lines_read;
        self.blank_lines_skipped += other.blank_lines_skipped;
        self.segments_decoded += other.segments_decoded;
        self.unclassified_lines += other.unclassified_lines;
        self.state_specific_skipped += other.state_specific_skipped;
        self.incidents += other.incidents;
        self.zero_reports += other.zero_reports;
        self.group_b_reports += other.group_b_reports;
        self.tainted_reports += other.tainted_reports;
        self.orphan_segments += other.orphan_segments;
        self.structural_errors += other.structural_errors;
    }
}

impl Default for BuildStats {
    fn default() -> Self {
        Self::new()
    }
}
