//! Report listeners and dispatch
//!
//! Listeners are registered on an [`super::IncidentBuilder`] and are called
//! once per finalized report, in registration order. Each call receives the
//! report and the structural errors attributed to it.

use super::assembler::FinishedReport;
use crate::app::models::{
    GroupAIncidentReport, GroupBArrestReport, NibrsError, Report, ZeroReport,
};
use tracing::{debug, info};

/// Observer of finalized reports. Every method defaults to doing nothing.
pub trait ReportListener {
    fn on_incident(&mut self, _incident: &GroupAIncidentReport, _errors: &[NibrsError]) {}

    fn on_zero_report(&mut self, _report: &ZeroReport, _errors: &[NibrsError]) {}

    fn on_group_b_arrest_report(&mut self, _report: &GroupBArrestReport, _errors: &[NibrsError]) {
    }
}

/// Ordered, append-only set of listeners
#[derive(Default)]
pub struct ListenerRegistry<'l> {
    listeners: Vec<&'l mut dyn ReportListener>,
}

impl<'l> ListenerRegistry<'l> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, listener: &'l mut dyn ReportListener) {
        self.listeners.push(listener);
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver a finished report to every listener
    pub fn dispatch(&mut self, finished: &FinishedReport) {
        let errors = finished.errors.as_slice();
        for listener in self.listeners.iter_mut() {
            match &finished.report {
                Report::GroupAIncident(incident) => listener.on_incident(incident, errors),
                Report::Zero(report) => listener.on_zero_report(report, errors),
                Report::GroupBArrest(report) => listener.on_group_b_arrest_report(report, errors),
            }
        }
    }
}

impl std::fmt::Debug for ListenerRegistry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// Built-in Listeners
// =============================================================================

/// Keeps every report it receives, with its errors
#[derive(Debug, Clone, Default)]
pub struct ReportCollector {
    pub reports: Vec<FinishedReport>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.reports.len()
    }

    pub fn is_empty(&self) -> bool {
        self.reports.is_empty()
    }

    pub fn incidents(&self) -> impl Iterator<Item = &GroupAIncidentReport> {
        self.reports
            .iter()
            .filter_map(|finished| finished.report.as_group_a())
    }

    pub fn zero_reports(&self) -> impl Iterator<Item = &ZeroReport> {
        self.reports.iter().filter_map(|finished| match &finished.report {
            Report::Zero(report) => Some(report),
            _ => None,
        })
    }

    pub fn group_b_reports(&self) -> impl Iterator<Item = &GroupBArrestReport> {
        self.reports.iter().filter_map(|finished| match &finished.report {
            Report::GroupBArrest(report) => Some(report),
            _ => None,
        })
    }

    fn keep(&mut self, report: Report, errors: &[NibrsError]) {
        self.reports.push(FinishedReport {
            report,
            errors: errors.to_vec(),
        });
    }
}

impl ReportListener for ReportCollector {
    fn on_incident(&mut self, incident: &GroupAIncidentReport, errors: &[NibrsError]) {
        self.keep(Report::GroupAIncident(incident.clone()), errors);
    }

    fn on_zero_report(&mut self, report: &ZeroReport, errors: &[NibrsError]) {
        self.keep(Report::Zero(report.clone()), errors);
    }

    fn on_group_b_arrest_report(&mut self, report: &GroupBArrestReport, errors: &[NibrsError]) {
        self.keep(Report::GroupBArrest(report.clone()), errors);
    }
}

/// Logs one event per report and keeps running counts
#[derive(Debug, Clone, Default)]
pub struct LoggingListener {
    pub incidents: usize,
    pub zero_reports: usize,
    pub group_b_reports: usize,
    pub errors: usize,
}

impl LoggingListener {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_reports(&self) -> usize {
        self.incidents + self.zero_reports + self.group_b_reports
    }

    /// Log the running totals at info level
    pub fn log_summary(&self) {
        info!(
            "Received {} incidents, {} zero reports, {} Group B arrests with {} errors",
            self.incidents, self.zero_reports, self.group_b_reports, self.errors
        );
    }
}

impl ReportListener for LoggingListener {
    fn on_incident(&mut self, incident: &GroupAIncidentReport, errors: &[NibrsError]) {
        self.incidents += 1;
        self.errors += errors.len();
        debug!(
            "Incident {} ({} child segments, {} errors)",
            incident.incident_number().unwrap_or("<none>"),
            incident.child_segment_count(),
            errors.len()
        );
    }

    fn on_zero_report(&mut self, report: &ZeroReport, errors: &[NibrsError]) {
        self.zero_reports += 1;
        self.errors += errors.len();
        debug!(
            "Zero report for {} ({} errors)",
            report.ori().unwrap_or("<none>"),
            errors.len()
        );
    }

    fn on_group_b_arrest_report(&mut self, report: &GroupBArrestReport, errors: &[NibrsError]) {
        self.group_b_reports += 1;
        self.errors += errors.len();
        debug!(
            "Group B arrest {} ({} errors)",
            report.transaction_number().unwrap_or("<none>"),
            errors.len()
        );
    }
}
