//! Tests for report listeners and dispatch order

use super::*;
use crate::app::models::{GroupAIncidentReport, NibrsError, ZeroReport};
use crate::app::services::flatfile_parser::{
    FinishedReport, IncidentAssembler, ListenerRegistry, LoggingListener, ReportListener,
    SegmentDecoder,
};
use std::cell::RefCell;

/// Records the order in which listeners were called
struct OrderRecorder<'a> {
    name: &'static str,
    calls: &'a RefCell<Vec<String>>,
}

impl ReportListener for OrderRecorder<'_> {
    fn on_incident(&mut self, incident: &GroupAIncidentReport, _errors: &[NibrsError]) {
        self.calls.borrow_mut().push(format!(
            "{}:{}",
            self.name,
            incident.incident_number().unwrap_or("")
        ));
    }

    fn on_zero_report(&mut self, _report: &ZeroReport, _errors: &[NibrsError]) {
        self.calls.borrow_mut().push(format!("{}:zero", self.name));
    }
}

/// Listener relying entirely on the default no-op methods
struct Silent;

impl ReportListener for Silent {}

fn finished_incident() -> FinishedReport {
    let decoder = SegmentDecoder::new();
    let mut assembler = IncidentAssembler::new(None);
    assembler.accept(decoder.decode_line(&administrative_line(), 1));
    assembler.accept(decoder.decode_line(&offense_line(), 2));
    assembler.finish().unwrap()
}

#[test]
fn test_registry_dispatches_in_registration_order() {
    let calls = RefCell::new(Vec::new());
    let mut first = OrderRecorder {
        name: "first",
        calls: &calls,
    };
    let mut second = OrderRecorder {
        name: "second",
        calls: &calls,
    };

    let mut registry = ListenerRegistry::new();
    assert!(registry.is_empty());
    registry.add(&mut first);
    registry.add(&mut second);
    assert_eq!(registry.len(), 2);

    registry.dispatch(&finished_incident());
    drop(registry);

    assert_eq!(
        calls.into_inner(),
        vec!["first:02-000895".to_string(), "second:02-000895".to_string()]
    );
}

#[test]
fn test_builder_delivers_each_report_kind() {
    let calls = RefCell::new(Vec::new());
    let mut recorder = OrderRecorder {
        name: "r",
        calls: &calls,
    };
    let mut silent = Silent;

    let input = join_lines(&[zero_report_line(), administrative_line(), group_b_line()]);
    {
        let mut builder = IncidentBuilder::new();
        builder.add_incident_listener(&mut recorder);
        builder.add_incident_listener(&mut silent);
        builder
            .build(std::io::Cursor::new(input.as_bytes()), None)
            .unwrap();
    }

    // Group B reports go to the default no-op method
    assert_eq!(
        calls.into_inner(),
        vec!["r:zero".to_string(), "r:02-000895".to_string()]
    );
}

#[test]
fn test_report_collector_keeps_errors() {
    let input = join_lines(&[
        administrative_line(),
        overlay(&victim_line(), 72, "25XX"),
        zero_report_line(),
    ]);
    let (_, collector) = build_collect(&input);

    assert_eq!(collector.len(), 2);
    assert_eq!(collector.incidents().count(), 1);
    assert_eq!(collector.zero_reports().count(), 1);
    assert_eq!(collector.group_b_reports().count(), 0);
    assert_eq!(collector.reports[0].errors[0].rule_number, 409);
    assert!(collector.reports[1].errors.is_empty());
}

#[test]
fn test_logging_listener_counts() {
    let mut logger = LoggingListener::new();
    let finished = finished_incident();
    let incident = finished.report.as_group_a().unwrap();
    let error = NibrsError::new(409, '4', 72, "25XX", 3);

    logger.on_incident(incident, &[error.clone(), error]);
    logger.on_incident(incident, &[]);

    assert_eq!(logger.incidents, 2);
    assert_eq!(logger.errors, 2);
    assert_eq!(logger.total_reports(), 2);
    logger.log_summary();
}
