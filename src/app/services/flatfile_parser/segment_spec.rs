//! Segment layout table
//!
//! One [`SegmentSpec`] per segment level lists the accepted line lengths, the
//! rule reported when the length is wrong, and the ordered field descriptors
//! that the decoder walks. The table is static data and can be inspected on
//! its own (the CLI `layout` command prints it).

use crate::app::models::SegmentLevel;
use crate::constants::{lengths, rules};
use FieldKind::{Age, Amount, CodeList, Date, Hour, Integer, Quantity};

// =============================================================================
// Field Descriptors
// =============================================================================

/// How a field slot is parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, trimmed; never an error
    Text,
    /// Whole number
    Integer,
    /// Two-character hour
    Hour,
    /// Property value of one to nine digits
    Amount,
    /// `YYYYMMDD` date
    Date,
    /// Four-character age; neonate codes only where allowed
    Age { allow_neonate: bool },
    /// Nine whole digits followed by three digits of thousandths
    Quantity,
    /// Individually validated code
    CodeList,
}

impl FieldKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Text => "text",
            Self::Integer => "integer",
            Self::Hour => "hour",
            Self::Amount => "amount",
            Self::Date => "date",
            Self::Age { .. } => "age",
            Self::Quantity => "quantity",
            Self::CodeList => "code-list",
        }
    }
}

/// Location and parse rule of one field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: &'static str,
    /// 1-based start of the first occurrence
    pub position: usize,
    pub width: usize,
    pub kind: FieldKind,
    /// Number of occurrences
    pub occurs: usize,
    /// Distance between the starts of consecutive occurrences
    pub stride: usize,
    /// Rule reported when an occurrence is malformed
    pub rule: Option<u16>,
    /// Second rule reported right after `rule`
    pub companion_rule: Option<u16>,
    pub data_element: Option<&'static str>,
}

impl FieldDescriptor {
    const fn new(name: &'static str, position: usize, width: usize, kind: FieldKind) -> Self {
        Self {
            name,
            position,
            width,
            kind,
            occurs: 1,
            stride: width,
            rule: None,
            companion_rule: None,
            data_element: None,
        }
    }

    pub const fn text(name: &'static str, position: usize, width: usize) -> Self {
        Self::new(name, position, width, FieldKind::Text)
    }

    pub const fn typed(
        name: &'static str,
        position: usize,
        width: usize,
        kind: FieldKind,
        rule: u16,
    ) -> Self {
        Self {
            rule: Some(rule),
            ..Self::new(name, position, width, kind)
        }
    }

    pub const fn repeated(self, occurs: usize, stride: usize) -> Self {
        Self {
            occurs,
            stride,
            ..self
        }
    }

    pub const fn with_companion_rule(self, rule: u16) -> Self {
        Self {
            companion_rule: Some(rule),
            ..self
        }
    }

    pub const fn element(self, data_element: &'static str) -> Self {
        Self {
            data_element: Some(data_element),
            ..self
        }
    }

    /// 1-based start position of each occurrence
    pub fn occurrence_positions(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.occurs).map(move |i| self.position + i * self.stride)
    }

    /// Last position covered by the final occurrence
    pub fn end(&self) -> usize {
        self.position + (self.occurs - 1) * self.stride + self.width - 1
    }
}

// =============================================================================
// Segment Specs
// =============================================================================

/// Layout of one segment level
#[derive(Debug, Clone, Copy)]
pub struct SegmentSpec {
    pub level: SegmentLevel,
    pub accepted_lengths: &'static [usize],
    pub length_rule: u16,
    pub fields: &'static [FieldDescriptor],
}

impl SegmentSpec {
    /// Spec for a level
    pub fn for_level(level: SegmentLevel) -> &'static SegmentSpec {
        &SEGMENT_SPECS[usize::from(level.position())]
    }

    pub fn all() -> &'static [SegmentSpec] {
        &SEGMENT_SPECS
    }

    pub fn accepts_length(&self, length: usize) -> bool {
        self.accepted_lengths.contains(&length)
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields.iter().find(|field| field.name == name)
    }

    /// Longest accepted length
    pub fn max_length(&self) -> usize {
        self.accepted_lengths.iter().copied().max().unwrap_or(0)
    }

    /// Rule reported for an out-of-range age upper bound
    pub fn age_range_rule(&self) -> u16 {
        rules::age_range_rule(self.level.position())
    }
}

static ZERO_REPORT_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::typed("month_of_submission", 7, 2, Integer, rules::ZERO_REPORT_DATA),
    FieldDescriptor::typed("year_of_submission", 9, 4, Integer, rules::ZERO_REPORT_DATA),
    FieldDescriptor::text("city_indicator", 13, 4),
    FieldDescriptor::typed("zero_report_month", 38, 2, Integer, rules::ZERO_REPORT_DATA),
    FieldDescriptor::typed("zero_report_year", 40, 4, Integer, rules::ZERO_REPORT_DATA),
];

static ADMINISTRATIVE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::typed(
        "month_of_submission",
        7,
        2,
        Integer,
        rules::ADMINISTRATIVE_INVALID_DATA,
    ),
    FieldDescriptor::typed("year_of_submission", 9, 4, Integer, rules::ADMINISTRATIVE_INVALID_DATA),
    FieldDescriptor::text("city_indicator", 13, 4),
    FieldDescriptor::typed("incident_date", 38, 8, Date, rules::ADMINISTRATIVE_INVALID_DATE)
        .element("3"),
    FieldDescriptor::text("report_date_indicator", 46, 1),
    FieldDescriptor::typed("incident_hour", 47, 2, Hour, rules::ADMINISTRATIVE_INVALID_HOUR)
        .with_companion_rule(rules::ADMINISTRATIVE_INVALID_VALUE)
        .element("3"),
    FieldDescriptor::text("exceptional_clearance_code", 49, 1),
    FieldDescriptor::typed(
        "exceptional_clearance_date",
        50,
        8,
        Date,
        rules::ADMINISTRATIVE_INVALID_DATE,
    )
    .element("5"),
    FieldDescriptor::text("cargo_theft_indicator", 88, 1),
    FieldDescriptor::text("federal_judicial_district_code", 89, 3),
];

static OFFENSE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("ucr_offense_code", 38, 3),
    FieldDescriptor::text("offense_attempted_completed", 41, 1),
    FieldDescriptor::typed(
        "offenders_suspected_of_using",
        42,
        1,
        CodeList,
        rules::OFFENSE_INVALID_DATA,
    )
    .repeated(3, 1),
    FieldDescriptor::text("location_type", 45, 2),
    FieldDescriptor::typed(
        "number_of_premises_entered",
        47,
        2,
        Integer,
        rules::OFFENSE_INVALID_DATA,
    )
    .element("10"),
    FieldDescriptor::text("method_of_entry", 49, 1),
    FieldDescriptor::typed(
        "type_of_criminal_activity",
        50,
        1,
        CodeList,
        rules::OFFENSE_INVALID_DATA,
    )
    .repeated(3, 1),
    FieldDescriptor::typed(
        "type_of_weapon_force_involved",
        53,
        2,
        CodeList,
        rules::OFFENSE_INVALID_DATA,
    )
    .repeated(3, 3),
    FieldDescriptor::typed(
        "automatic_weapon_indicator",
        55,
        1,
        CodeList,
        rules::OFFENSE_INVALID_DATA,
    )
    .repeated(3, 3),
    FieldDescriptor::typed("bias_motivation", 62, 2, CodeList, rules::OFFENSE_INVALID_DATA)
        .repeated(5, 2),
];

static PROPERTY_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::text("type_of_property_loss", 38, 1),
    FieldDescriptor::typed("property_description", 39, 2, CodeList, rules::PROPERTY_INVALID_CODE)
        .repeated(10, 19),
    FieldDescriptor::typed("value_of_property", 41, 9, Amount, rules::PROPERTY_INVALID_NUMBER)
        .repeated(10, 19)
        .element("16"),
    FieldDescriptor::typed("date_recovered", 50, 8, Date, rules::PROPERTY_INVALID_DATE)
        .repeated(10, 19)
        .element("17"),
    FieldDescriptor::typed(
        "number_of_stolen_motor_vehicles",
        229,
        2,
        Integer,
        rules::PROPERTY_INVALID_NUMBER,
    )
    .element("18"),
    FieldDescriptor::typed(
        "number_of_recovered_motor_vehicles",
        231,
        2,
        Integer,
        rules::PROPERTY_INVALID_NUMBER,
    )
    .element("19"),
    FieldDescriptor::typed("suspected_drug_type", 233, 1, CodeList, rules::PROPERTY_INVALID_CODE)
        .repeated(3, 15),
    FieldDescriptor::typed(
        "estimated_drug_quantity",
        234,
        12,
        Quantity,
        rules::PROPERTY_INVALID_NUMBER,
    )
    .repeated(3, 15)
    .element("21"),
    FieldDescriptor::typed("type_drug_measurement", 246, 2, CodeList, rules::PROPERTY_INVALID_CODE)
        .repeated(3, 15),
];

static VICTIM_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::typed("victim_sequence_number", 38, 3, Integer, rules::VICTIM_INVALID_NUMBER)
        .element("23"),
    FieldDescriptor::typed(
        "ucr_offense_code_connection",
        41,
        3,
        CodeList,
        rules::VICTIM_INVALID_DATA,
    )
    .repeated(10, 3),
    FieldDescriptor::text("type_of_victim", 71, 1),
    FieldDescriptor::typed(
        "age",
        72,
        4,
        Age {
            allow_neonate: true,
        },
        rules::VICTIM_INVALID_DATA,
    )
    .element("26"),
    FieldDescriptor::text("sex", 76, 1),
    FieldDescriptor::text("race", 77, 1),
    FieldDescriptor::text("ethnicity", 78, 1),
    FieldDescriptor::text("resident_status", 79, 1),
    FieldDescriptor::typed(
        "aggravated_assault_homicide_circumstances",
        80,
        2,
        CodeList,
        rules::VICTIM_INVALID_DATA,
    )
    .repeated(2, 2),
    FieldDescriptor::text("additional_justifiable_homicide_circumstances", 84, 1),
    FieldDescriptor::typed("type_of_injury", 85, 1, CodeList, rules::VICTIM_INVALID_DATA)
        .repeated(5, 1),
    FieldDescriptor::typed("offender_number_related", 90, 2, Integer, rules::VICTIM_INVALID_NUMBER)
        .repeated(10, 4)
        .element("34"),
    FieldDescriptor::typed(
        "victim_offender_relationship",
        92,
        2,
        CodeList,
        rules::VICTIM_INVALID_DATA,
    )
    .repeated(10, 4),
    FieldDescriptor::text("type_of_officer_activity_circumstance", 130, 2),
    FieldDescriptor::text("officer_assignment_type", 132, 1),
    FieldDescriptor::text("officer_other_jurisdiction_ori", 133, 9),
];

static OFFENDER_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::typed(
        "offender_sequence_number",
        38,
        2,
        Integer,
        rules::OFFENDER_INVALID_NUMBER,
    )
    .element("36"),
    FieldDescriptor::typed(
        "age",
        40,
        4,
        Age {
            allow_neonate: false,
        },
        rules::OFFENDER_INVALID_AGE,
    )
    .element("37"),
    FieldDescriptor::text("sex", 44, 1),
    FieldDescriptor::text("race", 45, 1),
    FieldDescriptor::text("ethnicity", 46, 1),
];

static ARRESTEE_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::typed(
        "arrestee_sequence_number",
        38,
        2,
        Integer,
        rules::ARRESTEE_INVALID_NUMBER,
    )
    .element("40"),
    FieldDescriptor::text("arrest_transaction_number", 40, 12),
    FieldDescriptor::typed("arrest_date", 52, 8, Date, rules::ARRESTEE_INVALID_DATE).element("42"),
    FieldDescriptor::text("type_of_arrest", 60, 1),
    FieldDescriptor::text("multiple_arrestee_segments_indicator", 61, 1),
    FieldDescriptor::text("ucr_arrest_offense_code", 62, 3),
    FieldDescriptor::typed("arrestee_armed_with", 65, 2, CodeList, rules::ARRESTEE_INVALID_DATA)
        .repeated(2, 3),
    FieldDescriptor::typed(
        "automatic_weapon_indicator",
        67,
        1,
        CodeList,
        rules::ARRESTEE_INVALID_DATA,
    )
    .repeated(2, 3),
    FieldDescriptor::typed(
        "age",
        71,
        4,
        Age {
            allow_neonate: false,
        },
        rules::ARRESTEE_INVALID_AGE,
    )
    .element("47"),
    FieldDescriptor::text("sex", 75, 1),
    FieldDescriptor::text("race", 76, 1),
    FieldDescriptor::text("ethnicity", 77, 1),
    FieldDescriptor::text("resident_status", 78, 1),
    FieldDescriptor::text("disposition_of_arrestee_under_18", 79, 1),
];

static GROUP_B_ARREST_FIELDS: &[FieldDescriptor] = &[
    FieldDescriptor::typed("month_of_submission", 7, 2, Integer, rules::GROUP_B_INVALID_NUMBER),
    FieldDescriptor::typed("year_of_submission", 9, 4, Integer, rules::GROUP_B_INVALID_NUMBER),
    FieldDescriptor::text("city_indicator", 13, 4),
    FieldDescriptor::text("arrest_transaction_number", 26, 12),
    FieldDescriptor::typed(
        "arrestee_sequence_number",
        38,
        2,
        Integer,
        rules::GROUP_B_INVALID_NUMBER,
    )
    .element("40"),
    FieldDescriptor::typed("arrest_date", 40, 8, Date, rules::GROUP_B_INVALID_DATE).element("42"),
    FieldDescriptor::text("type_of_arrest", 48, 1),
    FieldDescriptor::text("ucr_arrest_offense_code", 49, 3),
    FieldDescriptor::typed("arrestee_armed_with", 52, 2, CodeList, rules::GROUP_B_INVALID_DATA)
        .repeated(2, 3),
    FieldDescriptor::typed(
        "automatic_weapon_indicator",
        54,
        1,
        CodeList,
        rules::GROUP_B_INVALID_DATA,
    )
    .repeated(2, 3),
    FieldDescriptor::typed(
        "age",
        58,
        4,
        Age {
            allow_neonate: false,
        },
        rules::GROUP_B_INVALID_AGE,
    )
    .element("47"),
    FieldDescriptor::text("sex", 62, 1),
    FieldDescriptor::text("race", 63, 1),
    FieldDescriptor::text("ethnicity", 64, 1),
    FieldDescriptor::text("resident_status", 65, 1),
    FieldDescriptor::text("disposition_of_arrestee_under_18", 66, 1),
    FieldDescriptor::text("federal_judicial_district_code", 67, 3),
];

/// Layouts indexed by [`SegmentLevel::position`]
pub static SEGMENT_SPECS: [SegmentSpec; 8] = [
    SegmentSpec {
        level: SegmentLevel::ZeroReport,
        accepted_lengths: lengths::ZERO_REPORT,
        length_rule: rules::ZERO_REPORT_DATA,
        fields: ZERO_REPORT_FIELDS,
    },
    SegmentSpec {
        level: SegmentLevel::Administrative,
        accepted_lengths: lengths::ADMINISTRATIVE,
        length_rule: rules::ADMINISTRATIVE_LENGTH,
        fields: ADMINISTRATIVE_FIELDS,
    },
    SegmentSpec {
        level: SegmentLevel::Offense,
        accepted_lengths: lengths::OFFENSE,
        length_rule: rules::OFFENSE_LENGTH,
        fields: OFFENSE_FIELDS,
    },
    SegmentSpec {
        level: SegmentLevel::Property,
        accepted_lengths: lengths::PROPERTY,
        length_rule: rules::PROPERTY_LENGTH,
        fields: PROPERTY_FIELDS,
    },
    SegmentSpec {
        level: SegmentLevel::Victim,
        accepted_lengths: lengths::VICTIM,
        length_rule: rules::VICTIM_LENGTH,
        fields: VICTIM_FIELDS,
    },
    SegmentSpec {
        level: SegmentLevel::Offender,
        accepted_lengths: lengths::OFFENDER,
        length_rule: rules::OFFENDER_LENGTH,
        fields: OFFENDER_FIELDS,
    },
    SegmentSpec {
        level: SegmentLevel::Arrestee,
        accepted_lengths: lengths::ARRESTEE,
        length_rule: rules::ARRESTEE_LENGTH,
        fields: ARRESTEE_FIELDS,
    },
    SegmentSpec {
        level: SegmentLevel::GroupBArrest,
        accepted_lengths: lengths::GROUP_B_ARREST,
        length_rule: rules::GROUP_B_LENGTH,
        fields: GROUP_B_ARREST_FIELDS,
    },
];
