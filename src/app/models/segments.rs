//! Typed segment records
//!
//! One struct per segment kind. Every segment keeps the identity fields from
//! the common line header and a [`SegmentSource`] pointing back at the raw
//! line it was decoded from.

use super::age::NibrsAge;
use super::{ParsedValue, SegmentLevel};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// =============================================================================
// Shared Pieces
// =============================================================================

/// Back-reference to the raw line a segment was decoded from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentSource {
    /// 1-based line number within the source
    pub line_number: usize,

    /// Observed length (line terminator excluded)
    pub observed_length: usize,

    /// Declared length from positions 1-4, when numeric
    #[serde(skip_serializing_if = "Option::is_none")]
    pub declared_length: Option<usize>,

    /// The raw line without its terminator
    #[serde(skip)]
    pub raw: String,
}

/// Identity fields common to every segment line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SegmentHeader {
    pub action_type: Option<char>,
    pub ori: Option<String>,
    /// Incident number, or arrest transaction number on Group B lines
    pub incident_number: Option<String>,
}

/// Month/year of submission and city indicator, carried by report-opening
/// segments
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionInfo {
    pub month_of_submission: ParsedValue<i32>,
    pub year_of_submission: ParsedValue<i32>,
    pub city_indicator: Option<String>,
}

/// Weapon or force code paired with its automatic-weapon indicator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponForce {
    pub code: String,
    pub automatic_indicator: Option<String>,
}

// =============================================================================
// Report-Opening Segments
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdministrativeSegment {
    pub source: SegmentSource,
    pub header: SegmentHeader,
    pub submission: SubmissionInfo,
    pub incident_date: ParsedValue<NaiveDate>,
    pub report_date_indicator: Option<String>,
    pub incident_hour: ParsedValue<i32>,
    pub exceptional_clearance_code: Option<String>,
    pub exceptional_clearance_date: ParsedValue<NaiveDate>,
    pub cargo_theft_indicator: Option<String>,
    pub federal_judicial_district_code: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZeroReportSegment {
    pub source: SegmentSource,
    pub header: SegmentHeader,
    pub submission: SubmissionInfo,
    pub zero_report_month: ParsedValue<i32>,
    pub zero_report_year: ParsedValue<i32>,
}

/// A Group B arrest line: submission info plus the arrestee it reports
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupBArrestSegment {
    pub submission: SubmissionInfo,
    pub arrestee: ArresteeSegment,
    pub federal_judicial_district_code: Option<String>,
}

// =============================================================================
// Group A Child Segments
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffenseSegment {
    pub source: SegmentSource,
    pub header: SegmentHeader,
    pub ucr_offense_code: Option<String>,
    pub offense_attempted_completed: Option<String>,
    pub offenders_suspected_of_using: Vec<String>,
    pub location_type: Option<String>,
    pub number_of_premises_entered: ParsedValue<i32>,
    pub method_of_entry: Option<String>,
    pub type_of_criminal_activity: Vec<String>,
    pub type_of_weapon_force_involved: Vec<WeaponForce>,
    pub bias_motivation: Vec<String>,
}

/// One property description slot with its value and recovery date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyItem {
    pub description: Option<String>,
    pub value: ParsedValue<u32>,
    pub date_recovered: ParsedValue<NaiveDate>,
}

/// One suspected drug slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrugItem {
    pub drug_type: Option<String>,
    pub estimated_quantity: ParsedValue<f64>,
    pub measurement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertySegment {
    pub source: SegmentSource,
    pub header: SegmentHeader,
    pub type_of_property_loss: Option<String>,
    pub items: Vec<PropertyItem>,
    pub number_of_stolen_motor_vehicles: ParsedValue<i32>,
    pub number_of_recovered_motor_vehicles: ParsedValue<i32>,
    pub drugs: Vec<DrugItem>,
}

/// Victim-to-offender relationship slot
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffenderRelation {
    pub offender_number: ParsedValue<i32>,
    pub relationship: Option<String>,
}

/// Law enforcement officer killed or assaulted details (141-byte victim
/// layout only)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeokaDetails {
    pub type_of_officer_activity_circumstance: Option<String>,
    pub officer_assignment_type: Option<String>,
    pub officer_other_jurisdiction_ori: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VictimSegment {
    pub source: SegmentSource,
    pub header: SegmentHeader,
    pub victim_sequence_number: ParsedValue<i32>,
    pub ucr_offense_code_connections: Vec<String>,
    pub type_of_victim: Option<String>,
    pub age: ParsedValue<NibrsAge>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub resident_status: Option<String>,
    pub aggravated_assault_homicide_circumstances: Vec<String>,
    pub additional_justifiable_homicide_circumstances: Option<String>,
    pub type_of_injury: Vec<String>,
    pub offender_relations: Vec<OffenderRelation>,
    pub leoka: Option<LeokaDetails>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffenderSegment {
    pub source: SegmentSource,
    pub header: SegmentHeader,
    pub offender_sequence_number: ParsedValue<i32>,
    pub age: ParsedValue<NibrsAge>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
}

/// Arrestee details, shared by Group A arrestee lines and Group B arrest lines
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArresteeSegment {
    pub source: SegmentSource,
    pub header: SegmentHeader,
    pub arrestee_sequence_number: ParsedValue<i32>,
    pub arrest_transaction_number: Option<String>,
    pub arrest_date: ParsedValue<NaiveDate>,
    pub type_of_arrest: Option<String>,
    /// Group A only
    pub multiple_arrestee_segments_indicator: Option<String>,
    pub ucr_arrest_offense_code: Option<String>,
    pub armed_with: Vec<WeaponForce>,
    pub age: ParsedValue<NibrsAge>,
    pub sex: Option<String>,
    pub race: Option<String>,
    pub ethnicity: Option<String>,
    pub resident_status: Option<String>,
    pub disposition_of_arrestee_under_18: Option<String>,
}

// =============================================================================
// Decoded Segment
// =============================================================================

/// Any decoded segment line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segment", rename_all = "snake_case")]
pub enum Segment {
    ZeroReport(ZeroReportSegment),
    Administrative(AdministrativeSegment),
    Offense(OffenseSegment),
    Property(PropertySegment),
    Victim(VictimSegment),
    Offender(OffenderSegment),
    Arrestee(ArresteeSegment),
    GroupBArrest(GroupBArrestSegment),
}

impl Segment {
    pub fn level(&self) -> SegmentLevel {
        match self {
            Self::ZeroReport(_) => SegmentLevel::ZeroReport,
            Self::Administrative(_) => SegmentLevel::Administrative,
            Self::Offense(_) => SegmentLevel::Offense,
            Self::Property(_) => SegmentLevel::Property,
            Self::Victim(_) => SegmentLevel::Victim,
            Self::Offender(_) => SegmentLevel::Offender,
            Self::Arrestee(_) => SegmentLevel::Arrestee,
            Self::GroupBArrest(_) => SegmentLevel::GroupBArrest,
        }
    }

    pub fn source(&self) -> &SegmentSource {
        match self {
            Self::ZeroReport(s) => &s.source,
            Self::Administrative(s) => &s.source,
            Self::Offense(s) => &s.source,
            Self::Property(s) => &s.source,
            Self::Victim(s) => &s.source,
            Self::Offender(s) => &s.source,
            Self::Arrestee(s) => &s.source,
            Self::GroupBArrest(s) => &s.arrestee.source,
        }
    }

    pub fn header(&self) -> &SegmentHeader {
        match self {
            Self::ZeroReport(s) => &s.header,
            Self::Administrative(s) => &s.header,
            Self::Offense(s) => &s.header,
            Self::Property(s) => &s.header,
            Self::Victim(s) => &s.header,
            Self::Offender(s) => &s.header,
            Self::Arrestee(s) => &s.header,
            Self::GroupBArrest(s) => &s.arrestee.header,
        }
    }

    pub fn opens_report(&self) -> bool {
        self.level().opens_report()
    }
}
