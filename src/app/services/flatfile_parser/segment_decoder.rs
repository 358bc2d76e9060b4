//! Segment line decoding
//!
//! Turns one raw line into a [`DecodedLine`]: classification by the level
//! character, a length check against the segment layout, a walk over the
//! layout's field descriptors, and construction of the typed segment.
//!
//! Fields are decoded independently. A malformed field is reported and left
//! as [`ParsedValue::Invalid`] without suppressing any other field on the
//! line; only a length error stops field decoding.

use super::field_extractor::{
    FieldExtractor, parse_age, parse_amount, parse_code, parse_date, parse_hour, parse_integer,
    parse_quantity,
};
use super::segment_builders::build_segment;
use super::segment_spec::{FieldDescriptor, FieldKind, SegmentSpec};
use crate::app::models::{
    AgeDefect, NibrsAge, NibrsError, ParsedValue, Segment, SegmentHeader, SegmentLevel,
    SegmentSource,
};
use crate::constants::{
    ACTION_TYPE_POSITION, DECLARED_LENGTH_POSITION, DECLARED_LENGTH_WIDTH, IDENTITY_MIN_LENGTH,
    INCIDENT_NUMBER_POSITION, INCIDENT_NUMBER_WIDTH, ORI_POSITION, ORI_WIDTH,
    SEGMENT_LEVEL_POSITION, levels, rules,
};
use chrono::NaiveDate;

/// Segment type reported for lines too short to carry a level character
pub const UNCLASSIFIED_SEGMENT_TYPE: char = ' ';

// =============================================================================
// Decoded Fields
// =============================================================================

/// Value of one field occurrence
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(Option<String>),
    Integer(ParsedValue<i32>),
    Amount(ParsedValue<u32>),
    Date(ParsedValue<NaiveDate>),
    Age(ParsedValue<NibrsAge>),
    Quantity(ParsedValue<f64>),
    /// Trimmed code text, kept whether or not it validated
    Code(Option<String>),
}

/// Field values of one line, keyed by descriptor name.
///
/// Occurrences that lie beyond the line are absent; accessors treat them as
/// missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DecodedFields {
    values: Vec<(&'static str, Vec<FieldValue>)>,
}

impl DecodedFields {
    fn push(&mut self, name: &'static str, occurrences: Vec<FieldValue>) {
        self.values.push((name, occurrences));
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn occurrences(&self, name: &str) -> &[FieldValue] {
        self.values
            .iter()
            .find(|(field, _)| *field == name)
            .map(|(_, values)| values.as_slice())
            .unwrap_or(&[])
    }

    /// True when at least one occurrence of the field lay within the line
    pub fn is_present(&self, name: &str) -> bool {
        !self.occurrences(name).is_empty()
    }

    pub fn text(&self, name: &str) -> Option<String> {
        match self.occurrences(name).first() {
            Some(FieldValue::Text(text)) | Some(FieldValue::Code(text)) => text.clone(),
            _ => None,
        }
    }

    /// Every occurrence of a code list, in slot order
    pub fn codes(&self, name: &str) -> Vec<Option<String>> {
        self.occurrences(name)
            .iter()
            .map(|value| match value {
                FieldValue::Code(code) | FieldValue::Text(code) => code.clone(),
                _ => None,
            })
            .collect()
    }

    /// Non-blank codes of a code list, in slot order
    pub fn present_codes(&self, name: &str) -> Vec<String> {
        self.codes(name).into_iter().flatten().collect()
    }

    pub fn integer(&self, name: &str) -> ParsedValue<i32> {
        self.integers(name).into_iter().next().unwrap_or_default()
    }

    pub fn integers(&self, name: &str) -> Vec<ParsedValue<i32>> {
        self.occurrences(name)
            .iter()
            .map(|value| match value {
                FieldValue::Integer(parsed) => parsed.clone(),
                _ => ParsedValue::Missing,
            })
            .collect()
    }

    pub fn amounts(&self, name: &str) -> Vec<ParsedValue<u32>> {
        self.occurrences(name)
            .iter()
            .map(|value| match value {
                FieldValue::Amount(parsed) => parsed.clone(),
                _ => ParsedValue::Missing,
            })
            .collect()
    }

    pub fn date(&self, name: &str) -> ParsedValue<NaiveDate> {
        self.dates(name).into_iter().next().unwrap_or_default()
    }

    pub fn dates(&self, name: &str) -> Vec<ParsedValue<NaiveDate>> {
        self.occurrences(name)
            .iter()
            .map(|value| match value {
                FieldValue::Date(parsed) => parsed.clone(),
                _ => ParsedValue::Missing,
            })
            .collect()
    }

    pub fn quantities(&self, name: &str) -> Vec<ParsedValue<f64>> {
        self.occurrences(name)
            .iter()
            .map(|value| match value {
                FieldValue::Quantity(parsed) => parsed.clone(),
                _ => ParsedValue::Missing,
            })
            .collect()
    }

    pub fn age(&self, name: &str) -> ParsedValue<NibrsAge> {
        match self.occurrences(name).first() {
            Some(FieldValue::Age(parsed)) => parsed.clone(),
            _ => ParsedValue::Missing,
        }
    }
}

// =============================================================================
// Decoded Line
// =============================================================================

/// Everything the assembler needs to know about one line
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedLine {
    pub line_number: usize,

    /// Character at the level position, or a blank for very short lines
    pub segment_type: char,

    /// Recognised level; `None` for unclassifiable and state-specific lines
    pub level: Option<SegmentLevel>,

    /// Identity fields read from the common header
    pub header: SegmentHeader,

    /// True when the line is long enough to carry a full incident identity
    pub has_identity: bool,

    /// The typed segment, present whenever the level was recognised
    pub segment: Option<Segment>,

    /// Structural errors found on this line, in detection order
    pub errors: Vec<NibrsError>,

    /// State-specific line skipped on request
    pub state_specific: bool,
}

impl DecodedLine {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn incident_number(&self) -> Option<&str> {
        self.header.incident_number.as_deref()
    }
}

// =============================================================================
// Length Validator
// =============================================================================

/// Checks a line's observed length against its segment layout
pub struct LengthValidator;

impl LengthValidator {
    /// Returns the length error for a line, if any.
    ///
    /// The error's context is the structural position of the level and its
    /// value is the observed length.
    pub fn validate(
        spec: &SegmentSpec,
        observed_length: usize,
        line_number: usize,
    ) -> Option<NibrsError> {
        if spec.accepts_length(observed_length) {
            return None;
        }
        Some(NibrsError::new(
            spec.length_rule,
            spec.level.code(),
            usize::from(spec.level.position()),
            observed_length,
            line_number,
        ))
    }
}

// =============================================================================
// Segment Decoder
// =============================================================================

/// Stateless line decoder
#[derive(Debug, Clone, Default)]
pub struct SegmentDecoder {
    state_specific_segments: bool,
}

impl SegmentDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recognise levels `8` and `9` and skip them instead of reporting them
    pub fn with_state_specific_segments(mut self, enabled: bool) -> Self {
        self.state_specific_segments = enabled;
        self
    }

    /// Decode one line. `line` must not include its terminator.
    pub fn decode_line(&self, line: &str, line_number: usize) -> DecodedLine {
        let extractor = FieldExtractor::new(line);
        let header = read_header(&extractor);
        let has_identity = extractor.len() >= IDENTITY_MIN_LENGTH;
        let identifier = header.incident_number.clone();

        let Some(code) = extractor.char_at(SEGMENT_LEVEL_POSITION) else {
            let error = NibrsError::new(
                rules::INVALID_SEGMENT_LEVEL,
                UNCLASSIFIED_SEGMENT_TYPE,
                SEGMENT_LEVEL_POSITION,
                line.trim(),
                line_number,
            );
            return DecodedLine {
                line_number,
                segment_type: UNCLASSIFIED_SEGMENT_TYPE,
                level: None,
                header,
                has_identity,
                segment: None,
                errors: vec![error],
                state_specific: false,
            };
        };

        let Some(level) = SegmentLevel::from_code(code) else {
            let state_specific =
                self.state_specific_segments && levels::STATE_SPECIFIC.contains(&code);
            let errors = if state_specific {
                Vec::new()
            } else {
                vec![
                    NibrsError::new(
                        rules::INVALID_SEGMENT_LEVEL,
                        code,
                        SEGMENT_LEVEL_POSITION,
                        code,
                        line_number,
                    )
                    .with_report_identifier(identifier.as_deref()),
                ]
            };
            return DecodedLine {
                line_number,
                segment_type: code,
                level: None,
                header,
                has_identity,
                segment: None,
                errors,
                state_specific,
            };
        };

        let spec = SegmentSpec::for_level(level);
        let mut errors = Vec::new();

        let fields = match LengthValidator::validate(spec, extractor.len(), line_number) {
            Some(error) => {
                errors.push(error.with_report_identifier(identifier.as_deref()));
                DecodedFields::default()
            }
            None => decode_fields(
                spec,
                &extractor,
                line_number,
                identifier.as_deref(),
                &mut errors,
            ),
        };

        let source = SegmentSource {
            line_number,
            observed_length: extractor.len(),
            declared_length: extractor
                .text(DECLARED_LENGTH_POSITION, DECLARED_LENGTH_WIDTH)
                .and_then(|text| text.parse().ok()),
            raw: line.to_string(),
        };
        let segment = build_segment(level, header.clone(), source, &fields);

        DecodedLine {
            line_number,
            segment_type: code,
            level: Some(level),
            header,
            has_identity,
            segment: Some(segment),
            errors,
            state_specific: false,
        }
    }
}

fn read_header(extractor: &FieldExtractor<'_>) -> SegmentHeader {
    SegmentHeader {
        action_type: extractor
            .char_at(ACTION_TYPE_POSITION)
            .filter(|c| !c.is_whitespace()),
        ori: extractor.text(ORI_POSITION, ORI_WIDTH).map(str::to_string),
        incident_number: extractor
            .text(INCIDENT_NUMBER_POSITION, INCIDENT_NUMBER_WIDTH)
            .map(str::to_string),
    }
}

/// Walk every descriptor of a length-validated line
fn decode_fields(
    spec: &SegmentSpec,
    extractor: &FieldExtractor<'_>,
    line_number: usize,
    identifier: Option<&str>,
    errors: &mut Vec<NibrsError>,
) -> DecodedFields {
    let mut fields = DecodedFields::default();

    for descriptor in spec.fields {
        let mut occurrences = Vec::with_capacity(descriptor.occurs);

        for position in descriptor.occurrence_positions() {
            let Some(raw) = extractor.slice(position, descriptor.width) else {
                break;
            };
            let (value, rule) = decode_occurrence(spec, descriptor, raw);

            if let (Some(rule), Some(invalid)) = (rule, invalid_text(&value)) {
                // The companion only follows the descriptor's own rule
                let companion = descriptor
                    .companion_rule
                    .filter(|_| descriptor.rule == Some(rule));
                for rule in std::iter::once(rule).chain(companion) {
                    let error = NibrsError::new(
                        rule,
                        spec.level.code(),
                        position,
                        invalid.clone(),
                        line_number,
                    );
                    errors.push(
                        error
                            .with_report_identifier(identifier)
                            .with_data_element(descriptor.data_element),
                    );
                }
            }
            occurrences.push(value);
        }

        fields.push(descriptor.name, occurrences);
    }

    fields
}

/// Parse one occurrence, returning the rule to report if it is malformed
fn decode_occurrence(
    spec: &SegmentSpec,
    descriptor: &FieldDescriptor,
    raw: &str,
) -> (FieldValue, Option<u16>) {
    let rule = descriptor.rule;
    match descriptor.kind {
        FieldKind::Text => {
            let text = raw.trim();
            (FieldValue::Text((!text.is_empty()).then(|| text.to_string())), None)
        }
        FieldKind::Integer => (FieldValue::Integer(parse_integer(raw)), rule),
        FieldKind::Hour => (FieldValue::Integer(parse_hour(raw)), rule),
        FieldKind::Amount => (FieldValue::Amount(parse_amount(raw)), rule),
        FieldKind::Date => (FieldValue::Date(parse_date(raw)), rule),
        FieldKind::Quantity => (FieldValue::Quantity(parse_quantity(raw)), rule),
        FieldKind::CodeList => match parse_code(raw) {
            ParsedValue::Missing => (FieldValue::Code(None), None),
            ParsedValue::Valid(code) => (FieldValue::Code(Some(code)), None),
            ParsedValue::Invalid(code) => (FieldValue::Code(Some(code)), rule),
        },
        FieldKind::Age { allow_neonate } => {
            let (age, defect) = parse_age(raw, allow_neonate);
            let rule = match defect {
                Some(AgeDefect::InvalidRange) => Some(spec.age_range_rule()),
                Some(AgeDefect::NonNumeric) | None => rule,
            };
            (FieldValue::Age(age), rule)
        }
    }
}

/// Text to report for a malformed occurrence
fn invalid_text(value: &FieldValue) -> Option<String> {
    match value {
        FieldValue::Integer(parsed) => parsed.invalid_raw().map(str::to_string),
        FieldValue::Amount(parsed) => parsed.invalid_raw().map(str::to_string),
        FieldValue::Date(parsed) => parsed.invalid_raw().map(str::to_string),
        FieldValue::Quantity(parsed) => parsed.invalid_raw().map(str::to_string),
        FieldValue::Age(parsed) => parsed.invalid_raw().map(str::to_string),
        FieldValue::Code(code) => code.clone(),
        FieldValue::Text(_) => None,
    }
}
