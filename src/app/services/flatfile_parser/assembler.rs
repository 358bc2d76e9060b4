//! Incident assembly state machine
//!
//! Groups consecutive decoded lines into reports. Administrative, zero-report
//! and Group B lines open a new report (finalizing any open one); child
//! lines attach to the open Group A incident. The assembler owns the error
//! collector for the build and attributes each line's errors to the report
//! the line belongs to.

use super::segment_decoder::DecodedLine;
use crate::app::models::{
    ErrorCollector, NibrsError, Report, ReportSource, Segment, SegmentHeader,
};
use crate::constants::rules;
use tracing::{debug, warn};

/// A finalized report with the errors attributed to it
#[derive(Debug, Clone, PartialEq)]
pub struct FinishedReport {
    pub report: Report,
    pub errors: Vec<NibrsError>,
}

#[derive(Debug)]
struct OpenReport {
    report: Report,
    errors: Vec<NibrsError>,
}

#[derive(Debug, Default)]
enum AssemblerState {
    #[default]
    Idle,
    Open(OpenReport),
}

/// Per-build assembly state
#[derive(Debug, Default)]
pub struct IncidentAssembler {
    state: AssemblerState,
    collector: ErrorCollector,
    source_name: Option<String>,
    orphan_segments: usize,
}

impl IncidentAssembler {
    pub fn new(source_name: Option<String>) -> Self {
        Self {
            source_name,
            ..Self::default()
        }
    }

    /// Feed one decoded line.
    ///
    /// Returns the report that this line finalized, if it opened a new one
    /// while another was open.
    pub fn accept(&mut self, line: DecodedLine) -> Option<FinishedReport> {
        let DecodedLine {
            line_number,
            segment_type,
            header,
            has_identity,
            segment,
            errors,
            state_specific,
            ..
        } = line;

        let Some(segment) = segment else {
            if state_specific {
                warn!(
                    "Skipping state-specific segment '{}' at line {}",
                    segment_type, line_number
                );
            }
            self.record_unattached_line(errors);
            return None;
        };

        let report_source = ReportSource {
            source_name: self.source_name.clone(),
            line_number,
        };

        match Report::open(segment, report_source) {
            Ok(report) => {
                let finished = self.finish();
                debug!(
                    "Opened {} report {} at line {}",
                    report.kind(),
                    report.identifier().unwrap_or("<none>"),
                    line_number
                );
                let mut open = OpenReport {
                    report,
                    errors: Vec::new(),
                };
                attribute(&mut self.collector, &mut open, errors);
                self.state = AssemblerState::Open(open);
                finished
            }
            Err(child) => {
                self.accept_child(child, &header, has_identity, errors, line_number);
                None
            }
        }
    }

    /// Finalize the open report, if any, and return to idle
    pub fn finish(&mut self) -> Option<FinishedReport> {
        match std::mem::take(&mut self.state) {
            AssemblerState::Open(open) => Some(FinishedReport {
                report: open.report,
                errors: open.errors,
            }),
            AssemblerState::Idle => None,
        }
    }

    /// The report currently being assembled
    pub fn current_report(&self) -> Option<&Report> {
        match &self.state {
            AssemblerState::Open(open) => Some(&open.report),
            AssemblerState::Idle => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, AssemblerState::Idle)
    }

    /// Every error collected so far, in detection order
    pub fn errors(&self) -> &[NibrsError] {
        self.collector.errors()
    }

    /// Child segments dropped because no matching incident was open
    pub fn orphan_segments(&self) -> usize {
        self.orphan_segments
    }

    pub fn into_errors(self) -> Vec<NibrsError> {
        self.collector.into_errors()
    }

    fn accept_child(
        &mut self,
        child: Segment,
        header: &SegmentHeader,
        has_identity: bool,
        errors: Vec<NibrsError>,
        line_number: usize,
    ) {
        let level = child.level();

        let AssemblerState::Open(open) = &mut self.state else {
            self.reject_child(child, errors, rules::MISSING_ADMINISTRATIVE_SEGMENT, line_number);
            return;
        };
        let Report::GroupAIncident(incident) = &mut open.report else {
            self.reject_child(child, errors, rules::MISSING_ADMINISTRATIVE_SEGMENT, line_number);
            return;
        };

        let same_incident = incident.incident_number() == header.incident_number.as_deref()
            && incident.ori() == header.ori.as_deref();
        if has_identity && !same_incident {
            self.reject_child(child, errors, rules::SEGMENTS_OUT_OF_ORDER, line_number);
            return;
        }

        if let Err(segment) = incident.push_child(child) {
            // Report-opening segments never reach this point
            debug!(
                "Dropping {} segment at line {}",
                segment.level().name(),
                line_number
            );
            return;
        }
        debug!("Attached {} segment at line {}", level.name(), line_number);
        attribute(&mut self.collector, open, errors);
    }

    /// Drop a child that has no matching incident, recording its own errors
    /// and the assembly error
    fn reject_child(
        &mut self,
        child: Segment,
        errors: Vec<NibrsError>,
        rule: u16,
        line_number: usize,
    ) {
        let level = child.level();
        let identifier = child.header().incident_number.clone();
        warn!(
            "Dropping {} segment at line {} (rule {:03}, incident {})",
            level.name(),
            line_number,
            rule,
            identifier.as_deref().unwrap_or("<none>")
        );

        self.orphan_segments += 1;
        self.collector.extend(errors);
        self.collector.push(
            NibrsError::new(
                rule,
                level.code(),
                usize::from(level.position()),
                level.code(),
                line_number,
            )
            .with_report_identifier(identifier.as_deref()),
        );
    }

    /// Errors from a line that produced no segment taint the open report
    fn record_unattached_line(&mut self, errors: Vec<NibrsError>) {
        match &mut self.state {
            AssemblerState::Open(open) => attribute(&mut self.collector, open, errors),
            AssemblerState::Idle => self.collector.extend(errors),
        }
    }
}

/// Record a line's errors against the open report and the build
fn attribute(collector: &mut ErrorCollector, open: &mut OpenReport, errors: Vec<NibrsError>) {
    if errors.is_empty() {
        return;
    }
    open.report.mark_upstream_errors();
    open.errors.extend(errors.iter().cloned());
    collector.extend(errors);
}
