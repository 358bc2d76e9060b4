//! Test fixtures and helpers for flat-file parser testing
//!
//! Fixture lines are built from a short prefix padded with spaces to the
//! segment's length, so every line below has exactly the length its name
//! says. `overlay` replaces characters at a 1-based position to derive
//! malformed variants.

use std::io::{Cursor, Write};
use tempfile::NamedTempFile;

use super::{BuildResult, IncidentBuilder, ReportCollector};
use crate::config::FlatfileConfig;

// Test modules
mod assembler_tests;
mod field_extractor_tests;
mod listener_tests;
mod segment_spec_tests;

pub const INCIDENT_NUMBER: &str = "02-000895";
pub const ORI: &str = "TN0060000";

/// Pad `prefix` with spaces to `length` characters
pub fn segment(prefix: &str, length: usize) -> String {
    format!("{:<width$}", prefix, width = length)
}

/// Replace the characters starting at a 1-based position
pub fn overlay(line: &str, position: usize, text: &str) -> String {
    let start = position - 1;
    let end = start + text.len();
    format!("{}{}{}", &line[..start], text, &line[end..])
}

pub fn administrative_line() -> String {
    segment("00871I022003    TN006000002-000895   20020102 10N", 87)
}

pub fn administrative_line_with_cargo_theft() -> String {
    segment("00881I022003    TN006000002-000895   20020102 10N", 87) + "N"
}

pub fn offense_line() -> String {
    segment(
        "00712I022003    TN006000002-000895   220CN  20  N            88",
        71,
    )
}

pub fn property_line() -> String {
    segment("03073I022003    TN006000002-000895   713000000020", 307)
}

pub fn victim_line() -> String {
    segment(
        "01414I022003    TN006000002-000895   001220                           I46  FWNR",
        141,
    )
}

pub fn offender_line() -> String {
    segment("00465I022003    TN006000002-000895   0124  MW", 46)
}

pub fn arrestee_line() -> String {
    segment(
        "01106I022003    TN006000002-000895   0102-000895   20021230TM22001    24  MWNR",
        110,
    )
}

pub fn zero_report_line() -> String {
    segment("00430I022003    TN0060000000000000000012003", 43)
}

pub fn group_b_line() -> String {
    segment(
        "00667I022003    TN006000002-000900   0120021230T90C01    25  MWNR",
        66,
    )
}

/// Child line re-keyed to another incident number
pub fn with_incident_number(line: &str, incident_number: &str) -> String {
    overlay(line, 26, &format!("{:<12}", incident_number))
}

/// A complete, valid incident: administrative through arrestee
pub fn valid_incident_lines() -> Vec<String> {
    vec![
        administrative_line(),
        offense_line(),
        property_line(),
        victim_line(),
        offender_line(),
        arrestee_line(),
    ]
}

pub fn join_lines(lines: &[String]) -> String {
    let mut input = lines.join("\n");
    input.push('\n');
    input
}

/// Build `input` with a collecting listener
pub fn build_collect(input: &str) -> (BuildResult, ReportCollector) {
    build_collect_with(input, FlatfileConfig::default())
}

pub fn build_collect_with(input: &str, config: FlatfileConfig) -> (BuildResult, ReportCollector) {
    let mut collector = ReportCollector::new();
    let result = {
        let mut builder = IncidentBuilder::with_config(config);
        builder.add_incident_listener(&mut collector);
        builder
            .build(Cursor::new(input.as_bytes()), Some("fixture"))
            .unwrap()
    };
    (result, collector)
}

/// Write `content` to a temporary flat file
pub fn create_temp_flat_file(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}
