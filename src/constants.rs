//! Application constants for the NIBRS flat-file builder
//!
//! This module contains the fixed positions of the common segment header,
//! segment level codes and lengths, structural rule numbers, and the default
//! values used by the configuration layer and CLI.

// =============================================================================
// Common Segment Header Layout (1-based positions)
// =============================================================================

/// Declared segment length occupies positions 1-4
pub const DECLARED_LENGTH_POSITION: usize = 1;
pub const DECLARED_LENGTH_WIDTH: usize = 4;

/// Segment level (type code) is the single character at position 5
pub const SEGMENT_LEVEL_POSITION: usize = 5;

/// Segment action type at position 6
pub const ACTION_TYPE_POSITION: usize = 6;

/// ORI occupies positions 17-25
pub const ORI_POSITION: usize = 17;
pub const ORI_WIDTH: usize = 9;

/// Incident number (or arrest transaction number for Group B) occupies 26-37
pub const INCIDENT_NUMBER_POSITION: usize = 26;
pub const INCIDENT_NUMBER_WIDTH: usize = 12;

/// Minimum line length that carries a complete incident identity
pub const IDENTITY_MIN_LENGTH: usize = INCIDENT_NUMBER_POSITION + INCIDENT_NUMBER_WIDTH - 1;

// =============================================================================
// Segment Level Codes
// =============================================================================

pub mod levels {
    pub const ZERO_REPORT: char = '0';
    pub const ADMINISTRATIVE: char = '1';
    pub const OFFENSE: char = '2';
    pub const PROPERTY: char = '3';
    pub const VICTIM: char = '4';
    pub const OFFENDER: char = '5';
    pub const ARRESTEE: char = '6';
    pub const GROUP_B_ARREST: char = '7';

    /// State-specific segment levels, skipped when enabled in configuration
    pub const STATE_SPECIFIC: &[char] = &['8', '9'];
}

// =============================================================================
// Accepted Segment Lengths
// =============================================================================

pub mod lengths {
    pub const ZERO_REPORT: &[usize] = &[43];
    pub const ADMINISTRATIVE: &[usize] = &[87, 88, 91];
    pub const OFFENSE: &[usize] = &[63, 71];
    pub const PROPERTY: &[usize] = &[307];
    pub const VICTIM: &[usize] = &[129, 141];
    pub const OFFENDER: &[usize] = &[45, 46];
    pub const ARRESTEE: &[usize] = &[110];
    pub const GROUP_B_ARREST: &[usize] = &[66, 69];

    /// Administrative layouts that carry the cargo theft indicator
    pub const ADMINISTRATIVE_WITH_CARGO_THEFT: &[usize] = &[88, 91];

    /// Victim layout that carries the LEOKA fields
    pub const VICTIM_WITH_LEOKA: usize = 141;
}

// =============================================================================
// Structural Rule Numbers
// =============================================================================

/// Rule numbers reported for structural defects.
///
/// Length rules are per segment kind; field-format rules are attached to the
/// individual field descriptors in the segment layout table.
pub mod rules {
    pub const ZERO_REPORT_DATA: u16 = 1;
    pub const SEGMENTS_OUT_OF_ORDER: u16 = 50;
    pub const INVALID_SEGMENT_LEVEL: u16 = 51;
    pub const MISSING_ADMINISTRATIVE_SEGMENT: u16 = 55;

    pub const ADMINISTRATIVE_INVALID_DATA: u16 = 101;
    pub const ADMINISTRATIVE_INVALID_VALUE: u16 = 104;
    pub const ADMINISTRATIVE_INVALID_DATE: u16 = 105;
    pub const ADMINISTRATIVE_INVALID_HOUR: u16 = 152;
    pub const ADMINISTRATIVE_LENGTH: u16 = 178;

    pub const OFFENSE_INVALID_DATA: u16 = 204;
    pub const OFFENSE_LENGTH: u16 = 284;

    pub const PROPERTY_LENGTH: u16 = 301;
    pub const PROPERTY_INVALID_NUMBER: u16 = 302;
    pub const PROPERTY_INVALID_CODE: u16 = 304;
    pub const PROPERTY_INVALID_DATE: u16 = 305;

    pub const VICTIM_INVALID_NUMBER: u16 = 402;
    pub const VICTIM_INVALID_DATA: u16 = 404;
    pub const VICTIM_LENGTH: u16 = 484;

    pub const OFFENDER_INVALID_NUMBER: u16 = 501;
    pub const OFFENDER_INVALID_AGE: u16 = 556;
    pub const OFFENDER_LENGTH: u16 = 584;

    pub const ARRESTEE_LENGTH: u16 = 601;
    pub const ARRESTEE_INVALID_NUMBER: u16 = 601;
    pub const ARRESTEE_INVALID_DATA: u16 = 604;
    pub const ARRESTEE_INVALID_DATE: u16 = 605;
    pub const ARRESTEE_INVALID_AGE: u16 = 664;

    pub const GROUP_B_LENGTH: u16 = 701;
    pub const GROUP_B_INVALID_NUMBER: u16 = 701;
    pub const GROUP_B_INVALID_DATA: u16 = 704;
    pub const GROUP_B_INVALID_DATE: u16 = 705;
    pub const GROUP_B_INVALID_AGE: u16 = 757;

    /// Age range errors use `<level>09` (409, 509, 609, 709)
    pub const fn age_range_rule(level_position: u8) -> u16 {
        level_position as u16 * 100 + 9
    }
}

// =============================================================================
// Field Parsing
// =============================================================================

/// Width that invalid property values are left-padded to when reported
pub const PROPERTY_VALUE_WIDTH: usize = 9;

/// Pattern a property value must match
pub const PROPERTY_VALUE_PATTERN: &str = r"^\d{1,9}$";

/// Whole and fractional widths of an estimated drug quantity
pub const DRUG_QUANTITY_WHOLE_WIDTH: usize = 9;
pub const DRUG_QUANTITY_FRACTION_WIDTH: usize = 3;

/// Age codes that only a victim may carry (neonate, newborn, baby)
pub const NEONATE_AGE_CODES: &[&str] = &["NN", "NB", "BB"];

/// Age code meaning "unknown"
pub const UNKNOWN_AGE_CODE: &str = "00";

// =============================================================================
// Processing Defaults
// =============================================================================

/// Default number of files built concurrently by the CLI
pub const DEFAULT_PARALLEL_WORKERS: usize = 8;

/// Upper bound on the worker count accepted from configuration
pub const MAX_PARALLEL_WORKERS: usize = 100;

/// Default pattern used when a directory is given as input
pub const DEFAULT_FILE_PATTERN: &str = "*.txt";

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "warn";

/// Valid log level names accepted by configuration
pub const LOG_LEVELS: &[&str] = &["error", "warn", "info", "debug", "trace"];

/// Configuration directory and file name under the platform config dir
pub const CONFIG_DIR_NAME: &str = "nibrs-flatfile";
pub const CONFIG_FILE_NAME: &str = "config.toml";
