//! Data models for NIBRS flat-file processing
//!
//! This module contains the segment level codes, the tri-state parsed value
//! used for every typed field, and re-exports the segment, report, age and
//! structural-error types defined in the submodules.

use crate::constants::levels;
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod age;
pub mod nibrs_error;
pub mod reports;
pub mod segments;

pub use age::{AgeDefect, NeonateCode, NibrsAge};
pub use nibrs_error::{ErrorCollector, ErrorValue, NibrsError};
pub use reports::{GroupAIncidentReport, GroupBArrestReport, Report, ReportSource, ZeroReport};
pub use segments::{
    AdministrativeSegment, ArresteeSegment, DrugItem, GroupBArrestSegment, LeokaDetails,
    OffenderRelation, OffenderSegment, OffenseSegment, PropertyItem, PropertySegment, Segment,
    SegmentHeader, SegmentSource, SubmissionInfo, VictimSegment, WeaponForce, ZeroReportSegment,
};

// =============================================================================
// Parsed Value
// =============================================================================

/// Outcome of decoding one typed field
///
/// A blank slot is `Missing`, which is never an error at this level. A slot
/// that holds text of the wrong shape is `Invalid` and keeps the raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", content = "value", rename_all = "snake_case")]
pub enum ParsedValue<T> {
    Missing,
    Invalid(String),
    Valid(T),
}

impl<T> Default for ParsedValue<T> {
    fn default() -> Self {
        Self::Missing
    }
}

impl<T> ParsedValue<T> {
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::Missing)
    }

    pub fn is_invalid(&self) -> bool {
        matches!(self, Self::Invalid(_))
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    /// The decoded value, if any
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Valid(value) => Some(value),
            _ => None,
        }
    }

    pub fn into_value(self) -> Option<T> {
        match self {
            Self::Valid(value) => Some(value),
            _ => None,
        }
    }

    /// Raw text of an invalid slot
    pub fn invalid_raw(&self) -> Option<&str> {
        match self {
            Self::Invalid(raw) => Some(raw),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ParsedValue<U> {
        match self {
            Self::Missing => ParsedValue::Missing,
            Self::Invalid(raw) => ParsedValue::Invalid(raw),
            Self::Valid(value) => ParsedValue::Valid(f(value)),
        }
    }
}

impl<T: Copy> ParsedValue<T> {
    pub fn copied(&self) -> Option<T> {
        self.value().copied()
    }
}

// =============================================================================
// Segment Level
// =============================================================================

/// The record kind of one flat-file line, from the character at position 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SegmentLevel {
    ZeroReport,
    Administrative,
    Offense,
    Property,
    Victim,
    Offender,
    Arrestee,
    GroupBArrest,
}

impl SegmentLevel {
    pub const ALL: [SegmentLevel; 8] = [
        Self::ZeroReport,
        Self::Administrative,
        Self::Offense,
        Self::Property,
        Self::Victim,
        Self::Offender,
        Self::Arrestee,
        Self::GroupBArrest,
    ];

    pub fn from_code(code: char) -> Option<Self> {
        match code {
            levels::ZERO_REPORT => Some(Self::ZeroReport),
            levels::ADMINISTRATIVE => Some(Self::Administrative),
            levels::OFFENSE => Some(Self::Offense),
            levels::PROPERTY => Some(Self::Property),
            levels::VICTIM => Some(Self::Victim),
            levels::OFFENDER => Some(Self::Offender),
            levels::ARRESTEE => Some(Self::Arrestee),
            levels::GROUP_B_ARREST => Some(Self::GroupBArrest),
            _ => None,
        }
    }

    pub fn code(self) -> char {
        match self {
            Self::ZeroReport => levels::ZERO_REPORT,
            Self::Administrative => levels::ADMINISTRATIVE,
            Self::Offense => levels::OFFENSE,
            Self::Property => levels::PROPERTY,
            Self::Victim => levels::VICTIM,
            Self::Offender => levels::OFFENDER,
            Self::Arrestee => levels::ARRESTEE,
            Self::GroupBArrest => levels::GROUP_B_ARREST,
        }
    }

    /// Structural position used as the context of length and assembly
    /// errors (0 for zero reports, 1 for administrative, ... 7 for Group B)
    pub fn position(self) -> u8 {
        match self {
            Self::ZeroReport => 0,
            Self::Administrative => 1,
            Self::Offense => 2,
            Self::Property => 3,
            Self::Victim => 4,
            Self::Offender => 5,
            Self::Arrestee => 6,
            Self::GroupBArrest => 7,
        }
    }

    /// Administrative, zero-report and Group B lines each start a new report
    pub fn opens_report(self) -> bool {
        matches!(
            self,
            Self::ZeroReport | Self::Administrative | Self::GroupBArrest
        )
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::ZeroReport => "Zero Report",
            Self::Administrative => "Administrative",
            Self::Offense => "Offense",
            Self::Property => "Property",
            Self::Victim => "Victim",
            Self::Offender => "Offender",
            Self::Arrestee => "Arrestee",
            Self::GroupBArrest => "Group B Arrest",
        }
    }
}

impl fmt::Display for SegmentLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod parsed_value_tests {
        use super::*;

        #[test]
        fn test_default_is_missing() {
            let value: ParsedValue<i32> = ParsedValue::default();
            assert!(value.is_missing());
            assert_eq!(value.value(), None);
        }

        #[test]
        fn test_invalid_keeps_raw_text() {
            let value: ParsedValue<i32> = ParsedValue::Invalid("AB".to_string());
            assert!(value.is_invalid());
            assert_eq!(value.invalid_raw(), Some("AB"));
            assert_eq!(value.into_value(), None);
        }

        #[test]
        fn test_map_preserves_state() {
            assert_eq!(ParsedValue::Valid(2).map(|v| v * 10), ParsedValue::Valid(20));
            assert_eq!(
                ParsedValue::<i32>::Invalid("x".into()).map(|v| v * 10),
                ParsedValue::Invalid("x".into())
            );
            assert_eq!(
                ParsedValue::<i32>::Missing.map(|v| v * 10),
                ParsedValue::Missing
            );
        }
    }

    mod segment_level_tests {
        use super::*;

        #[test]
        fn test_codes_round_trip() {
            for level in SegmentLevel::ALL {
                assert_eq!(SegmentLevel::from_code(level.code()), Some(level));
            }
        }

        #[test]
        fn test_unknown_codes() {
            assert_eq!(SegmentLevel::from_code('8'), None);
            assert_eq!(SegmentLevel::from_code('9'), None);
            assert_eq!(SegmentLevel::from_code('A'), None);
            assert_eq!(SegmentLevel::from_code(' '), None);
        }

        #[test]
        fn test_position_matches_digit() {
            for level in SegmentLevel::ALL {
                assert_eq!(level.code().to_digit(10), Some(u32::from(level.position())));
            }
        }

        #[test]
        fn test_report_opening_levels() {
            let openers: Vec<_> = SegmentLevel::ALL
                .into_iter()
                .filter(|level| level.opens_report())
                .collect();
            assert_eq!(
                openers,
                vec![
                    SegmentLevel::ZeroReport,
                    SegmentLevel::Administrative,
                    SegmentLevel::GroupBArrest
                ]
            );
        }
    }

    mod age_tests {
        use super::*;

        #[test]
        fn test_blank_age_is_missing() {
            assert_eq!(NibrsAge::from_raw("    ", false), Ok(None));
        }

        #[test]
        fn test_exact_and_unknown() {
            assert_eq!(NibrsAge::from_raw("24  ", false), Ok(Some(NibrsAge::Exact(24))));
            assert_eq!(NibrsAge::from_raw("00  ", false), Ok(Some(NibrsAge::Unknown)));
            assert!(NibrsAge::Unknown.is_unknown());
            assert_eq!(NibrsAge::Unknown.average(), None);
        }

        #[test]
        fn test_range() {
            let age = NibrsAge::from_raw("2530", false).unwrap().unwrap();
            assert!(age.is_range());
            assert_eq!(age.min(), Some(25));
            assert_eq!(age.max(), Some(30));
            assert_eq!(age.average(), Some(27.5));
            assert_eq!(age.to_string(), "2530");
        }

        #[test]
        fn test_neonate_codes_only_for_victims() {
            assert_eq!(
                NibrsAge::from_raw("NB  ", true),
                Ok(Some(NibrsAge::Neonate(NeonateCode::Newborn)))
            );
            assert_eq!(NibrsAge::from_raw("NB  ", false), Err(AgeDefect::NonNumeric));
        }

        #[test]
        fn test_defects() {
            assert_eq!(NibrsAge::from_raw("AB  ", false), Err(AgeDefect::NonNumeric));
            assert_eq!(NibrsAge::from_raw("5   ", false), Err(AgeDefect::NonNumeric));
            assert_eq!(NibrsAge::from_raw("253 ", false), Err(AgeDefect::InvalidRange));
            assert_eq!(NibrsAge::from_raw("XX30", false), Err(AgeDefect::NonNumeric));
            assert_eq!(NibrsAge::from_raw("25XX", false), Err(AgeDefect::InvalidRange));
        }
    }

    mod nibrs_error_tests {
        use super::*;

        #[test]
        fn test_accessors_and_display() {
            let error = NibrsError::new(178, '1', 1, 86usize, 3)
                .with_report_identifier(Some("02-000895"))
                .with_data_element(None);

            assert_eq!(error.rule_number(), 178);
            assert_eq!(error.segment_type(), '1');
            assert_eq!(error.context(), 1);
            assert_eq!(error.value(), &ErrorValue::Length(86));
            assert_eq!(
                error.to_string(),
                "line 3: rule 178 in segment '1' at 1 (value '86') [02-000895]"
            );
        }

        #[test]
        fn test_collector_preserves_order() {
            let mut collector = ErrorCollector::new();
            assert!(collector.is_empty());

            collector.push(NibrsError::new(51, '8', 5, '8', 1));
            collector.extend([
                NibrsError::new(101, '1', 7, "AB", 2),
                NibrsError::new(101, '1', 9, "CDEF", 2),
            ]);

            let rules: Vec<u16> = collector.errors().iter().map(|e| e.rule_number).collect();
            assert_eq!(rules, vec![51, 101, 101]);
            assert_eq!(collector.len(), 3);
            assert_eq!(collector.into_errors().len(), 3);
        }

        #[test]
        fn test_error_serializes_to_json() {
            let error = NibrsError::new(51, '8', 5, '8', 5);
            let json = serde_json::to_value(&error).unwrap();
            assert_eq!(json["rule_number"], 51);
            assert_eq!(json["value"]["kind"], "char");
            assert!(json.get("report_identifier").is_none());
        }
    }
}
