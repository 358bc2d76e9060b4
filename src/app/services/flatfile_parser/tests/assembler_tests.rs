//! Tests for grouping decoded lines into reports

use super::*;
use crate::app::models::{ErrorValue, Report};
use crate::app::services::flatfile_parser::{FinishedReport, IncidentAssembler, SegmentDecoder};

/// Feed lines to a fresh assembler, returning it and every report finalized
/// along the way (the open report is left open)
fn assemble(lines: &[String]) -> (IncidentAssembler, Vec<FinishedReport>) {
    let decoder = SegmentDecoder::new();
    let mut assembler = IncidentAssembler::new(Some("fixture".to_string()));
    let mut finished = Vec::new();

    for (index, line) in lines.iter().enumerate() {
        if let Some(report) = assembler.accept(decoder.decode_line(line, index + 1)) {
            finished.push(report);
        }
    }
    (assembler, finished)
}

#[test]
fn test_children_attach_to_open_incident() {
    let (mut assembler, finished) = assemble(&valid_incident_lines());
    assert!(finished.is_empty());
    assert!(!assembler.is_idle());

    let report = assembler.finish().unwrap();
    assert!(assembler.is_idle());
    assert!(report.errors.is_empty());

    let incident = report.report.as_group_a().unwrap();
    assert_eq!(incident.incident_number(), Some(INCIDENT_NUMBER));
    assert_eq!(incident.offenses.len(), 1);
    assert_eq!(incident.properties.len(), 1);
    assert_eq!(incident.victims.len(), 1);
    assert_eq!(incident.offenders.len(), 1);
    assert_eq!(incident.arrestees.len(), 1);
    assert_eq!(incident.child_segment_count(), 5);
    assert!(!incident.has_upstream_errors());
}

#[test]
fn test_new_header_finalizes_previous_report() {
    let second = "02-000896";
    let lines = vec![
        administrative_line(),
        offense_line(),
        with_incident_number(&administrative_line(), second),
        with_incident_number(&offense_line(), second),
        with_incident_number(&victim_line(), second),
    ];

    let (mut assembler, finished) = assemble(&lines);
    assert_eq!(finished.len(), 1);
    assert_eq!(finished[0].report.identifier(), Some(INCIDENT_NUMBER));
    assert_eq!(finished[0].report.as_group_a().unwrap().offenses.len(), 1);

    let last = assembler.finish().unwrap();
    let incident = last.report.as_group_a().unwrap();
    assert_eq!(incident.incident_number(), Some(second));
    assert_eq!(incident.child_segment_count(), 2);
    assert_eq!(incident.report_source.line_number, 3);
    assert_eq!(incident.report_source.source_name.as_deref(), Some("fixture"));

    assert!(assembler.errors().is_empty());
}

#[test]
fn test_zero_and_group_b_reports_stand_alone() {
    let lines = vec![zero_report_line(), group_b_line(), administrative_line()];

    let (mut assembler, finished) = assemble(&lines);
    assert_eq!(finished.len(), 2);
    assert!(matches!(finished[0].report, Report::Zero(_)));
    assert!(matches!(finished[1].report, Report::GroupBArrest(_)));
    assert_eq!(finished[1].report.identifier(), Some("02-000900"));

    let last = assembler.finish().unwrap();
    assert_eq!(last.report.kind(), "group_a_incident");
}

#[test]
fn test_child_without_incident_is_dropped() {
    let (assembler, finished) = assemble(&[offense_line()]);

    assert!(finished.is_empty());
    assert!(assembler.is_idle());
    assert_eq!(assembler.orphan_segments(), 1);

    let errors = assembler.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule_number, 55);
    assert_eq!(errors[0].segment_type, '2');
    assert_eq!(errors[0].context, 2);
    assert_eq!(errors[0].value, ErrorValue::Char('2'));
    assert_eq!(errors[0].report_identifier.as_deref(), Some(INCIDENT_NUMBER));
}

#[test]
fn test_child_after_zero_report_is_dropped() {
    let (mut assembler, _) = assemble(&[zero_report_line(), victim_line()]);

    assert_eq!(assembler.orphan_segments(), 1);
    assert_eq!(assembler.errors()[0].rule_number, 55);
    assert_eq!(assembler.errors()[0].context, 4);

    // The zero report itself is untouched
    let zero = assembler.finish().unwrap();
    assert!(zero.errors.is_empty());
    assert!(!zero.report.has_upstream_errors());
}

#[test]
fn test_child_for_another_incident_is_dropped() {
    let lines = vec![
        administrative_line(),
        with_incident_number(&offender_line(), "02-000999"),
    ];
    let (mut assembler, _) = assemble(&lines);

    let errors = assembler.errors().to_vec();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].rule_number, 50);
    assert_eq!(errors[0].segment_type, '5');
    assert_eq!(errors[0].context, 5);
    assert_eq!(errors[0].line_number, 2);
    assert_eq!(errors[0].report_identifier.as_deref(), Some("02-000999"));
    assert_eq!(assembler.orphan_segments(), 1);

    let open = assembler.finish().unwrap();
    let incident = open.report.as_group_a().unwrap();
    assert_eq!(incident.child_segment_count(), 0);
    assert!(!incident.has_upstream_errors());
}

#[test]
fn test_child_for_another_agency_is_dropped() {
    let line = overlay(&offense_line(), 17, "TN0070000");
    let (assembler, _) = assemble(&[administrative_line(), line]);

    assert_eq!(assembler.errors()[0].rule_number, 50);
}

#[test]
fn test_line_errors_taint_the_open_report() {
    let lines = vec![
        administrative_line(),
        overlay(&victim_line(), 72, "25XX"),
        offender_line(),
    ];
    let (mut assembler, _) = assemble(&lines);

    assert!(assembler.current_report().unwrap().has_upstream_errors());

    let report = assembler.finish().unwrap();
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].rule_number, 409);
    assert_eq!(report.report.as_group_a().unwrap().victims.len(), 1);
    assert_eq!(report.report.as_group_a().unwrap().offenders.len(), 1);
}

#[test]
fn test_unclassified_line_taints_open_report() {
    let lines = vec![administrative_line(), "0087".to_string()];
    let (mut assembler, _) = assemble(&lines);

    assert_eq!(assembler.errors().len(), 1);
    let report = assembler.finish().unwrap();
    assert!(report.report.has_upstream_errors());
    assert_eq!(report.errors[0].rule_number, 51);
}

#[test]
fn test_unclassified_line_while_idle_is_recorded() {
    let (assembler, finished) = assemble(&[overlay(&offense_line(), 5, "8")]);

    assert!(finished.is_empty());
    assert!(assembler.is_idle());
    assert_eq!(assembler.orphan_segments(), 0);
    assert_eq!(assembler.errors()[0].rule_number, 51);
}

#[test]
fn test_short_child_line_attaches_without_identity() {
    let lines = vec![
        administrative_line(),
        "00712I022003    TN0060000".to_string(),
    ];
    let (mut assembler, _) = assemble(&lines);

    let report = assembler.finish().unwrap();
    let incident = report.report.as_group_a().unwrap();
    assert_eq!(incident.offenses.len(), 1);
    assert!(incident.has_upstream_errors());
    assert_eq!(report.errors.len(), 1);
    assert_eq!(report.errors[0].rule_number, 284);
}

#[test]
fn test_report_header_errors_stay_with_new_report() {
    let lines = vec![
        administrative_line(),
        with_incident_number(&overlay(&administrative_line(), 47, "1X"), "02-000896"),
    ];
    let (mut assembler, finished) = assemble(&lines);

    assert_eq!(finished.len(), 1);
    assert!(finished[0].errors.is_empty());

    let second = assembler.finish().unwrap();
    let rules: Vec<u16> = second.errors.iter().map(|e| e.rule_number).collect();
    assert_eq!(rules, vec![152, 104]);
}

#[test]
fn test_finish_when_idle() {
    let mut assembler = IncidentAssembler::new(None);
    assert!(assembler.finish().is_none());
    assert!(assembler.current_report().is_none());
    assert!(assembler.into_errors().is_empty());
}
