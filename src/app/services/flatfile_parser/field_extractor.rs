//! Fixed-width field extraction and parsing
//!
//! Positions are 1-based, as in the NIBRS flat-file layout. Slicing never
//! panics: ranges past the end of the line are truncated or absent, and
//! non-ASCII lines are sliced on character boundaries.
//!
//! The parse functions never fail. A blank slot yields
//! [`ParsedValue::Missing`] and a malformed slot yields
//! [`ParsedValue::Invalid`] holding the text that is reported as the error
//! value.

use crate::app::models::{AgeDefect, NibrsAge, ParsedValue};
use crate::constants::{
    DRUG_QUANTITY_FRACTION_WIDTH, DRUG_QUANTITY_WHOLE_WIDTH, PROPERTY_VALUE_PATTERN,
    PROPERTY_VALUE_WIDTH,
};
use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

static PROPERTY_VALUE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(PROPERTY_VALUE_PATTERN).expect("valid regex"));

/// Read-only view over one flat-file line
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor<'a> {
    line: &'a str,
    length: usize,
    ascii: bool,
}

impl<'a> FieldExtractor<'a> {
    /// Wrap a line that has already had its terminator removed
    pub fn new(line: &'a str) -> Self {
        let ascii = line.is_ascii();
        let length = if ascii {
            line.len()
        } else {
            line.chars().count()
        };
        Self {
            line,
            length,
            ascii,
        }
    }

    /// Observed length in characters
    pub fn len(&self) -> usize {
        self.length
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn line(&self) -> &'a str {
        self.line
    }

    /// Character at a 1-based position
    pub fn char_at(&self, position: usize) -> Option<char> {
        if position == 0 || position > self.length {
            return None;
        }
        if self.ascii {
            self.line.as_bytes().get(position - 1).map(|b| char::from(*b))
        } else {
            self.line.chars().nth(position - 1)
        }
    }

    /// True when `position..position+width` lies entirely within the line
    pub fn covers(&self, position: usize, width: usize) -> bool {
        position > 0 && position + width - 1 <= self.length
    }

    /// Raw slice starting at a 1-based position.
    ///
    /// Returns `None` when the start lies beyond the line; a range that runs
    /// past the end is truncated.
    pub fn slice(&self, position: usize, width: usize) -> Option<&'a str> {
        if position == 0 || position > self.length || width == 0 {
            return None;
        }
        let start = position - 1;
        let end = (start + width).min(self.length);

        if self.ascii {
            return self.line.get(start..end);
        }

        let byte_start = self.byte_offset(start)?;
        let byte_end = self.byte_offset(end)?;
        self.line.get(byte_start..byte_end)
    }

    /// Trimmed slice, or `None` when the slot is blank or absent
    pub fn text(&self, position: usize, width: usize) -> Option<&'a str> {
        self.slice(position, width)
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    fn byte_offset(&self, char_index: usize) -> Option<usize> {
        if char_index == self.length {
            return Some(self.line.len());
        }
        self.line.char_indices().nth(char_index).map(|(i, _)| i)
    }
}

// =============================================================================
// Field Parsers
// =============================================================================

fn trimmed(raw: &str) -> Option<&str> {
    let text = raw.trim();
    (!text.is_empty()).then_some(text)
}

fn all_digits(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit())
}

/// Parse a whole number
pub fn parse_integer(raw: &str) -> ParsedValue<i32> {
    match trimmed(raw) {
        None => ParsedValue::Missing,
        Some(text) => match text.parse::<i32>() {
            Ok(value) => ParsedValue::Valid(value),
            Err(_) => ParsedValue::Invalid(text.to_string()),
        },
    }
}

/// Parse an incident hour: exactly two characters once trimmed
pub fn parse_hour(raw: &str) -> ParsedValue<i32> {
    match trimmed(raw) {
        None => ParsedValue::Missing,
        Some(text) if text.len() == 2 && all_digits(text) => match text.parse::<i32>() {
            Ok(hour) => ParsedValue::Valid(hour),
            Err(_) => ParsedValue::Invalid(text.to_string()),
        },
        Some(text) => ParsedValue::Invalid(text.to_string()),
    }
}

/// Parse a property value of one to nine digits.
///
/// An invalid value is reported left-padded to nine characters.
pub fn parse_amount(raw: &str) -> ParsedValue<u32> {
    match trimmed(raw) {
        None => ParsedValue::Missing,
        Some(text) if PROPERTY_VALUE_RE.is_match(text) => match text.parse::<u32>() {
            Ok(value) => ParsedValue::Valid(value),
            Err(_) => ParsedValue::Invalid(pad_amount(text)),
        },
        Some(text) => ParsedValue::Invalid(pad_amount(text)),
    }
}

fn pad_amount(text: &str) -> String {
    format!("{:>width$}", text, width = PROPERTY_VALUE_WIDTH)
}

/// Parse a `YYYYMMDD` date
pub fn parse_date(raw: &str) -> ParsedValue<NaiveDate> {
    let Some(text) = trimmed(raw) else {
        return ParsedValue::Missing;
    };
    if text.len() != 8 || !all_digits(text) {
        return ParsedValue::Invalid(text.to_string());
    }

    let year = text[..4].parse::<i32>();
    let month = text[4..6].parse::<u32>();
    let day = text[6..].parse::<u32>();

    match (year, month, day) {
        (Ok(year), Ok(month), Ok(day)) => match NaiveDate::from_ymd_opt(year, month, day) {
            Some(date) => ParsedValue::Valid(date),
            None => ParsedValue::Invalid(text.to_string()),
        },
        _ => ParsedValue::Invalid(text.to_string()),
    }
}

/// Parse an estimated drug quantity: nine whole digits followed by three
/// digits of thousandths. Either part may be blank, but not both.
pub fn parse_quantity(raw: &str) -> ParsedValue<f64> {
    let split = raw
        .char_indices()
        .nth(DRUG_QUANTITY_WHOLE_WIDTH)
        .map(|(i, _)| i)
        .unwrap_or(raw.len());
    let whole = raw[..split].trim();
    let fraction = raw[split..].trim();

    if whole.is_empty() && fraction.is_empty() {
        return ParsedValue::Missing;
    }

    let whole_ok = whole.is_empty() || all_digits(whole);
    let fraction_ok = fraction.is_empty()
        || (all_digits(fraction) && fraction.len() <= DRUG_QUANTITY_FRACTION_WIDTH);
    if !whole_ok || !fraction_ok {
        return ParsedValue::Invalid(format!("{}{}", whole, fraction));
    }

    let whole = if whole.is_empty() { "0" } else { whole };
    let fraction = if fraction.is_empty() { "000" } else { fraction };
    match format!("{}.{}", whole, fraction).parse::<f64>() {
        Ok(quantity) => ParsedValue::Valid(quantity),
        Err(_) => ParsedValue::Invalid(format!("{}{}", whole, fraction)),
    }
}

/// Parse one sub-code of a code list: ASCII alphanumeric once trimmed
pub fn parse_code(raw: &str) -> ParsedValue<String> {
    match trimmed(raw) {
        None => ParsedValue::Missing,
        Some(text) if text.chars().all(|c| c.is_ascii_alphanumeric()) => {
            ParsedValue::Valid(text.to_string())
        }
        Some(text) => ParsedValue::Invalid(text.to_string()),
    }
}

/// Parse an age slot, returning the defect kind alongside an invalid value
pub fn parse_age(raw: &str, allow_neonate: bool) -> (ParsedValue<NibrsAge>, Option<AgeDefect>) {
    match NibrsAge::from_raw(raw, allow_neonate) {
        Ok(None) => (ParsedValue::Missing, None),
        Ok(Some(age)) => (ParsedValue::Valid(age), None),
        Err(defect) => (ParsedValue::Invalid(raw.trim().to_string()), Some(defect)),
    }
}
