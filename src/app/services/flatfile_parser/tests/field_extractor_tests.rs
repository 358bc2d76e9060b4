//! Tests for positional slicing and typed field parsing

use super::super::field_extractor::*;
use crate::app::models::{AgeDefect, NeonateCode, NibrsAge, ParsedValue};
use chrono::NaiveDate;

#[test]
fn test_positions_are_one_based_and_inclusive() {
    let extractor = FieldExtractor::new("00871I022003");

    assert_eq!(extractor.len(), 12);
    assert_eq!(extractor.char_at(1), Some('0'));
    assert_eq!(extractor.char_at(5), Some('1'));
    assert_eq!(extractor.char_at(0), None);
    assert_eq!(extractor.char_at(13), None);

    assert_eq!(extractor.slice(1, 4), Some("0087"));
    assert_eq!(extractor.slice(7, 2), Some("02"));
    assert!(extractor.covers(9, 4));
    assert!(!extractor.covers(10, 4));
}

#[test]
fn test_slices_past_the_end() {
    let extractor = FieldExtractor::new("ABCDEF");

    // Truncated at the end of the line
    assert_eq!(extractor.slice(5, 4), Some("EF"));
    // Start beyond the line is absent
    assert_eq!(extractor.slice(7, 1), None);
    assert_eq!(extractor.text(7, 1), None);
}

#[test]
fn test_text_trims_and_treats_blank_as_absent() {
    let extractor = FieldExtractor::new("  AB    ");
    assert_eq!(extractor.text(1, 4), Some("AB"));
    assert_eq!(extractor.text(5, 4), None);
}

#[test]
fn test_non_ascii_lines_slice_by_character() {
    let extractor = FieldExtractor::new("ab\u{e9}cd");
    assert_eq!(extractor.len(), 5);
    assert_eq!(extractor.char_at(3), Some('\u{e9}'));
    assert_eq!(extractor.slice(3, 2), Some("\u{e9}c"));
    assert_eq!(extractor.slice(4, 5), Some("cd"));
}

#[test]
fn test_parse_integer() {
    assert_eq!(parse_integer("02"), ParsedValue::Valid(2));
    assert_eq!(parse_integer(" 7 "), ParsedValue::Valid(7));
    assert_eq!(parse_integer("    "), ParsedValue::Missing);
    assert_eq!(parse_integer("AB"), ParsedValue::Invalid("AB".to_string()));
    assert_eq!(parse_integer("1 2"), ParsedValue::Invalid("1 2".to_string()));
}

#[test]
fn test_parse_hour() {
    assert_eq!(parse_hour("10"), ParsedValue::Valid(10));
    assert_eq!(parse_hour("00"), ParsedValue::Valid(0));
    assert_eq!(parse_hour("  "), ParsedValue::Missing);
    assert_eq!(parse_hour("1 "), ParsedValue::Invalid("1".to_string()));
    assert_eq!(parse_hour("1X"), ParsedValue::Invalid("1X".to_string()));
}

#[test]
fn test_parse_amount() {
    assert_eq!(parse_amount("000000020"), ParsedValue::Valid(20));
    assert_eq!(parse_amount("       15"), ParsedValue::Valid(15));
    assert_eq!(parse_amount("         "), ParsedValue::Missing);
    // Invalid values are reported padded to the full width
    assert_eq!(
        parse_amount("12X      "),
        ParsedValue::Invalid("      12X".to_string())
    );
}

#[test]
fn test_parse_date() {
    assert_eq!(
        parse_date("20020102"),
        ParsedValue::Valid(NaiveDate::from_ymd_opt(2002, 1, 2).unwrap())
    );
    assert_eq!(parse_date("        "), ParsedValue::Missing);
    assert_eq!(
        parse_date("20021332"),
        ParsedValue::Invalid("20021332".to_string())
    );
    assert_eq!(parse_date("2002010"), ParsedValue::Invalid("2002010".to_string()));
    assert_eq!(
        parse_date("2002O102"),
        ParsedValue::Invalid("2002O102".to_string())
    );
}

#[test]
fn test_parse_quantity() {
    assert_eq!(parse_quantity("000000001500"), ParsedValue::Valid(1.5));
    assert_eq!(parse_quantity("       12   "), ParsedValue::Valid(12.0));
    assert_eq!(parse_quantity("         250"), ParsedValue::Valid(0.25));
    assert_eq!(parse_quantity("            "), ParsedValue::Missing);
    assert!(parse_quantity("0000000X1500").is_invalid());
}

#[test]
fn test_parse_code() {
    assert_eq!(parse_code("13"), ParsedValue::Valid("13".to_string()));
    assert_eq!(parse_code("  "), ParsedValue::Missing);
    assert_eq!(parse_code("1-"), ParsedValue::Invalid("1-".to_string()));
}

#[test]
fn test_parse_age_forms() {
    assert_eq!(parse_age("46  ", true), (ParsedValue::Valid(NibrsAge::Exact(46)), None));
    assert_eq!(parse_age("00  ", false), (ParsedValue::Valid(NibrsAge::Unknown), None));
    assert_eq!(
        parse_age("2530", false),
        (ParsedValue::Valid(NibrsAge::Range { min: 25, max: 30 }), None)
    );
    assert_eq!(parse_age("    ", false), (ParsedValue::Missing, None));
}

#[test]
fn test_parse_age_neonate_only_where_allowed() {
    assert_eq!(
        parse_age("NB  ", true),
        (
            ParsedValue::Valid(NibrsAge::Neonate(NeonateCode::Newborn)),
            None
        )
    );
    assert_eq!(
        parse_age("NB  ", false),
        (
            ParsedValue::Invalid("NB".to_string()),
            Some(AgeDefect::NonNumeric)
        )
    );
}

#[test]
fn test_parse_age_defects() {
    assert_eq!(
        parse_age("AB  ", false),
        (
            ParsedValue::Invalid("AB".to_string()),
            Some(AgeDefect::NonNumeric)
        )
    );
    assert_eq!(
        parse_age("25XX", false),
        (
            ParsedValue::Invalid("25XX".to_string()),
            Some(AgeDefect::InvalidRange)
        )
    );
    assert_eq!(
        parse_age("253 ", false),
        (
            ParsedValue::Invalid("253".to_string()),
            Some(AgeDefect::InvalidRange)
        )
    );
}
