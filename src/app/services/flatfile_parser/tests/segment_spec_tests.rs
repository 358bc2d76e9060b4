//! Tests for the segment layout table

use super::super::segment_spec::{FieldKind, SegmentSpec};
use crate::app::models::SegmentLevel;
use crate::constants::rules;

#[test]
fn test_specs_are_indexed_by_level_position() {
    assert_eq!(SegmentSpec::all().len(), 8);
    for level in SegmentLevel::ALL {
        assert_eq!(SegmentSpec::for_level(level).level, level);
    }
}

#[test]
fn test_accepted_lengths() {
    let admin = SegmentSpec::for_level(SegmentLevel::Administrative);
    assert!(admin.accepts_length(87));
    assert!(admin.accepts_length(88));
    assert!(admin.accepts_length(91));
    assert!(!admin.accepts_length(80));
    assert_eq!(admin.max_length(), 91);

    let victim = SegmentSpec::for_level(SegmentLevel::Victim);
    assert!(victim.accepts_length(129));
    assert!(victim.accepts_length(141));
    assert!(!victim.accepts_length(140));

    assert_eq!(SegmentSpec::for_level(SegmentLevel::ZeroReport).max_length(), 43);
    assert_eq!(SegmentSpec::for_level(SegmentLevel::Property).max_length(), 307);
    assert_eq!(SegmentSpec::for_level(SegmentLevel::GroupBArrest).max_length(), 69);
}

#[test]
fn test_length_rules() {
    let expected = [
        (SegmentLevel::ZeroReport, rules::ZERO_REPORT_DATA),
        (SegmentLevel::Administrative, 178),
        (SegmentLevel::Offense, 284),
        (SegmentLevel::Property, 301),
        (SegmentLevel::Victim, 484),
        (SegmentLevel::Offender, 584),
        (SegmentLevel::Arrestee, 601),
        (SegmentLevel::GroupBArrest, 701),
    ];
    for (level, rule) in expected {
        assert_eq!(SegmentSpec::for_level(level).length_rule, rule, "{}", level);
    }
}

#[test]
fn test_fields_fit_within_longest_layout() {
    for spec in SegmentSpec::all() {
        for field in spec.fields {
            assert!(
                field.end() <= spec.max_length(),
                "{} field '{}' ends at {} beyond {}",
                spec.level,
                field.name,
                field.end(),
                spec.max_length()
            );
            assert!(field.occurs >= 1);
        }
    }
}

#[test]
fn test_repeated_field_positions() {
    let property = SegmentSpec::for_level(SegmentLevel::Property);
    let values = property.field("value_of_property").unwrap();

    let positions: Vec<usize> = values.occurrence_positions().collect();
    assert_eq!(positions.len(), 10);
    assert_eq!(positions[0], 41);
    assert_eq!(positions[1], 60);
    assert_eq!(values.end(), 41 + 9 * 19 + 8);
    assert_eq!(values.data_element, Some("16"));
}

#[test]
fn test_age_fields() {
    let victim_age = SegmentSpec::for_level(SegmentLevel::Victim)
        .field("age")
        .unwrap();
    assert_eq!(victim_age.position, 72);
    assert_eq!(
        victim_age.kind,
        FieldKind::Age {
            allow_neonate: true
        }
    );

    let offender_age = SegmentSpec::for_level(SegmentLevel::Offender)
        .field("age")
        .unwrap();
    assert_eq!(
        offender_age.kind,
        FieldKind::Age {
            allow_neonate: false
        }
    );
    assert_eq!(offender_age.rule, Some(rules::OFFENDER_INVALID_AGE));
}

#[test]
fn test_age_range_rules() {
    assert_eq!(SegmentSpec::for_level(SegmentLevel::Victim).age_range_rule(), 409);
    assert_eq!(SegmentSpec::for_level(SegmentLevel::Offender).age_range_rule(), 509);
    assert_eq!(SegmentSpec::for_level(SegmentLevel::Arrestee).age_range_rule(), 609);
    assert_eq!(SegmentSpec::for_level(SegmentLevel::GroupBArrest).age_range_rule(), 709);
}

#[test]
fn test_text_fields_have_no_rule() {
    let admin = SegmentSpec::for_level(SegmentLevel::Administrative);
    let clearance = admin.field("exceptional_clearance_code").unwrap();
    assert_eq!(clearance.kind, FieldKind::Text);
    assert_eq!(clearance.rule, None);
    assert_eq!(clearance.companion_rule, None);
    assert_eq!(clearance.kind.name(), "text");

    assert!(admin.field("no_such_field").is_none());
}

#[test]
fn test_incident_hour_reports_two_rules() {
    let admin = SegmentSpec::for_level(SegmentLevel::Administrative);
    let hour = admin.field("incident_hour").unwrap();
    assert_eq!(hour.kind, FieldKind::Hour);
    assert_eq!(hour.rule, Some(rules::ADMINISTRATIVE_INVALID_HOUR));
    assert_eq!(hour.companion_rule, Some(rules::ADMINISTRATIVE_INVALID_VALUE));

    let with_companion = SegmentSpec::all()
        .iter()
        .flat_map(|spec| spec.fields)
        .filter(|field| field.companion_rule.is_some())
        .count();
    assert_eq!(with_companion, 1);
}
