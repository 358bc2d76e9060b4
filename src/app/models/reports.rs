//! Assembled reports
//!
//! A report is opened by an administrative, zero-report or Group B arrest
//! line. Group A incidents then collect the child segments that follow
//! their administrative segment.

use super::segments::{
    AdministrativeSegment, ArresteeSegment, GroupBArrestSegment, OffenderSegment,
    OffenseSegment, PropertySegment, Segment, VictimSegment, ZeroReportSegment,
};
use crate::constants::lengths;
use serde::{Deserialize, Serialize};

/// Where a report came from
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSource {
    /// Name of the input (usually a file path)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_name: Option<String>,

    /// Line number of the report-opening segment
    pub line_number: usize,
}

// =============================================================================
// Group A Incident
// =============================================================================

/// An administrative segment with its ordered child segments
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAIncidentReport {
    pub administrative: AdministrativeSegment,
    pub offenses: Vec<OffenseSegment>,
    pub properties: Vec<PropertySegment>,
    pub victims: Vec<VictimSegment>,
    pub offenders: Vec<OffenderSegment>,
    pub arrestees: Vec<ArresteeSegment>,
    has_upstream_errors: bool,
    pub report_source: ReportSource,
}

impl GroupAIncidentReport {
    pub fn new(administrative: AdministrativeSegment, report_source: ReportSource) -> Self {
        Self {
            administrative,
            offenses: Vec::new(),
            properties: Vec::new(),
            victims: Vec::new(),
            offenders: Vec::new(),
            arrestees: Vec::new(),
            has_upstream_errors: false,
            report_source,
        }
    }

    /// Append a child segment to the matching sequence.
    ///
    /// Segments that cannot belong to an incident are handed back.
    pub fn push_child(&mut self, segment: Segment) -> Result<(), Segment> {
        match segment {
            Segment::Offense(offense) => self.offenses.push(offense),
            Segment::Property(property) => self.properties.push(property),
            Segment::Victim(victim) => self.victims.push(victim),
            Segment::Offender(offender) => self.offenders.push(offender),
            Segment::Arrestee(arrestee) => self.arrestees.push(arrestee),
            other => return Err(other),
        }
        Ok(())
    }

    pub fn incident_number(&self) -> Option<&str> {
        self.administrative.header.incident_number.as_deref()
    }

    pub fn ori(&self) -> Option<&str> {
        self.administrative.header.ori.as_deref()
    }

    pub fn has_upstream_errors(&self) -> bool {
        self.has_upstream_errors
    }

    /// Number of child segments across all sequences
    pub fn child_segment_count(&self) -> usize {
        self.offenses.len()
            + self.properties.len()
            + self.victims.len()
            + self.offenders.len()
            + self.arrestees.len()
    }

    /// True when the administrative segment used a cargo theft layout
    pub fn includes_cargo_theft(&self) -> bool {
        let length = self.administrative.source.observed_length;
        lengths::ADMINISTRATIVE_WITH_CARGO_THEFT.contains(&length)
    }

    /// True when any victim used the LEOKA layout
    pub fn includes_leoka(&self) -> bool {
        self.victims
            .iter()
            .any(|victim| victim.source.observed_length == lengths::VICTIM_WITH_LEOKA)
    }
}

// =============================================================================
// Zero Report and Group B Arrest Report
// =============================================================================

/// A report stating the agency had no incidents for a month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroReport {
    pub segment: ZeroReportSegment,
    has_upstream_errors: bool,
    pub report_source: ReportSource,
}

impl ZeroReport {
    pub fn new(segment: ZeroReportSegment, report_source: ReportSource) -> Self {
        Self {
            segment,
            has_upstream_errors: false,
            report_source,
        }
    }

    pub fn ori(&self) -> Option<&str> {
        self.segment.header.ori.as_deref()
    }

    pub fn incident_number(&self) -> Option<&str> {
        self.segment.header.incident_number.as_deref()
    }

    pub fn has_upstream_errors(&self) -> bool {
        self.has_upstream_errors
    }
}

/// A single Group B arrest
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBArrestReport {
    pub segment: GroupBArrestSegment,
    has_upstream_errors: bool,
    pub report_source: ReportSource,
}

impl GroupBArrestReport {
    pub fn new(segment: GroupBArrestSegment, report_source: ReportSource) -> Self {
        Self {
            segment,
            has_upstream_errors: false,
            report_source,
        }
    }

    pub fn arrestee(&self) -> &ArresteeSegment {
        &self.segment.arrestee
    }

    pub fn ori(&self) -> Option<&str> {
        self.segment.arrestee.header.ori.as_deref()
    }

    pub fn transaction_number(&self) -> Option<&str> {
        self.segment.arrestee.header.incident_number.as_deref()
    }

    pub fn has_upstream_errors(&self) -> bool {
        self.has_upstream_errors
    }
}

// =============================================================================
// Report
// =============================================================================

/// Any finished or in-progress report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "report", rename_all = "snake_case")]
pub enum Report {
    GroupAIncident(GroupAIncidentReport),
    Zero(ZeroReport),
    GroupBArrest(GroupBArrestReport),
}

impl Report {
    /// Open a report from a report-opening segment.
    ///
    /// Child segments are handed back unchanged.
    pub fn open(segment: Segment, report_source: ReportSource) -> Result<Self, Segment> {
        match segment {
            Segment::Administrative(admin) => Ok(Self::GroupAIncident(
                GroupAIncidentReport::new(admin, report_source),
            )),
            Segment::ZeroReport(zero) => Ok(Self::Zero(ZeroReport::new(zero, report_source))),
            Segment::GroupBArrest(arrest) => Ok(Self::GroupBArrest(GroupBArrestReport::new(
                arrest,
                report_source,
            ))),
            other => Err(other),
        }
    }

    /// Incident number, or arrest transaction number for Group B
    pub fn identifier(&self) -> Option<&str> {
        match self {
            Self::GroupAIncident(report) => report.incident_number(),
            Self::Zero(report) => report.incident_number(),
            Self::GroupBArrest(report) => report.transaction_number(),
        }
    }

    pub fn ori(&self) -> Option<&str> {
        match self {
            Self::GroupAIncident(report) => report.ori(),
            Self::Zero(report) => report.ori(),
            Self::GroupBArrest(report) => report.ori(),
        }
    }

    pub fn has_upstream_errors(&self) -> bool {
        match self {
            Self::GroupAIncident(report) => report.has_upstream_errors,
            Self::Zero(report) => report.has_upstream_errors,
            Self::GroupBArrest(report) => report.has_upstream_errors,
        }
    }

    /// Flag the report as carrying structural errors. There is no way to
    /// clear the flag.
    pub fn mark_upstream_errors(&mut self) {
        match self {
            Self::GroupAIncident(report) => report.has_upstream_errors = true,
            Self::Zero(report) => report.has_upstream_errors = true,
            Self::GroupBArrest(report) => report.has_upstream_errors = true,
        }
    }

    pub fn report_source(&self) -> &ReportSource {
        match self {
            Self::GroupAIncident(report) => &report.report_source,
            Self::Zero(report) => &report.report_source,
            Self::GroupBArrest(report) => &report.report_source,
        }
    }

    pub fn as_group_a(&self) -> Option<&GroupAIncidentReport> {
        match self {
            Self::GroupAIncident(report) => Some(report),
            _ => None,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::GroupAIncident(_) => "group_a_incident",
            Self::Zero(_) => "zero_report",
            Self::GroupBArrest(_) => "group_b_arrest",
        }
    }
}
