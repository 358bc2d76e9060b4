//! Structural defects found while decoding a flat file
//!
//! These are data, not failures: a [`NibrsError`] records one violated rule
//! and the build keeps going. Fatal problems use [`crate::Error`] instead.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The offending value attached to a structural error
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ErrorValue {
    /// A single offending character, e.g. an unknown segment level
    Char(char),
    /// Raw text sliced from the line
    Text(String),
    /// The observed length of a line whose length is not accepted
    Length(usize),
}

impl fmt::Display for ErrorValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c),
            Self::Text(text) => write!(f, "{}", text),
            Self::Length(length) => write!(f, "{}", length),
        }
    }
}

impl From<char> for ErrorValue {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for ErrorValue {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for ErrorValue {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<usize> for ErrorValue {
    fn from(length: usize) -> Self {
        Self::Length(length)
    }
}

/// A single violated structural rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NibrsError {
    /// Identifier of the violated rule (e.g. 51, 178, 402)
    pub rule_number: u16,

    /// Segment type code of the offending line
    pub segment_type: char,

    /// Where the violation sits: a byte position for field and
    /// classification errors, the segment's structural position for length
    /// and assembly errors
    pub context: usize,

    /// The offending value
    pub value: ErrorValue,

    /// 1-based line number within the source
    pub line_number: usize,

    /// Incident number (or arrest transaction number) of the offending line
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_identifier: Option<String>,

    /// NIBRS data element the rule applies to, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_element: Option<String>,
}

impl NibrsError {
    pub fn new(
        rule_number: u16,
        segment_type: char,
        context: usize,
        value: impl Into<ErrorValue>,
        line_number: usize,
    ) -> Self {
        Self {
            rule_number,
            segment_type,
            context,
            value: value.into(),
            line_number,
            report_identifier: None,
            data_element: None,
        }
    }

    pub fn with_report_identifier(mut self, identifier: Option<&str>) -> Self {
        self.report_identifier = identifier.map(str::to_string);
        self
    }

    pub fn with_data_element(mut self, data_element: Option<&str>) -> Self {
        self.data_element = data_element.map(str::to_string);
        self
    }

    pub fn rule_number(&self) -> u16 {
        self.rule_number
    }

    pub fn segment_type(&self) -> char {
        self.segment_type
    }

    pub fn context(&self) -> usize {
        self.context
    }

    pub fn value(&self) -> &ErrorValue {
        &self.value
    }
}

impl fmt::Display for NibrsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "line {}: rule {:03} in segment '{}' at {} (value '{}')",
            self.line_number, self.rule_number, self.segment_type, self.context, self.value
        )?;
        if let Some(identifier) = &self.report_identifier {
            write!(f, " [{}]", identifier)?;
        }
        if let Some(data_element) = &self.data_element {
            write!(f, " [DE {}]", data_element)?;
        }
        Ok(())
    }
}

/// Append-only, ordered list of every structural error found in one build
#[derive(Debug, Clone, Default)]
pub struct ErrorCollector {
    errors: Vec<NibrsError>,
}

impl ErrorCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, error: NibrsError) {
        self.errors.push(error);
    }

    pub fn extend(&mut self, errors: impl IntoIterator<Item = NibrsError>) {
        self.errors.extend(errors);
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &[NibrsError] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<NibrsError> {
        self.errors
    }
}
