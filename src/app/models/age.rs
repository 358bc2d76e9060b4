//! NIBRS age values
//!
//! Ages occupy a four-character slot and can hold an exact age, an age range
//! (`MMNN`), the unknown marker `00`, or one of the neonate codes that only a
//! victim may carry.

use crate::constants::{NEONATE_AGE_CODES, UNKNOWN_AGE_CODE};
use serde::{Deserialize, Serialize};

/// Neonate age codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NeonateCode {
    /// `NN` - under 24 hours
    Neonate,
    /// `NB` - 1 to 6 days
    Newborn,
    /// `BB` - 7 to 364 days
    Baby,
}

impl NeonateCode {
    fn from_code(code: &str) -> Option<Self> {
        match code {
            "NN" => Some(Self::Neonate),
            "NB" => Some(Self::Newborn),
            "BB" => Some(Self::Baby),
            _ => None,
        }
    }

    /// The two-character flat-file code
    pub fn code(self) -> &'static str {
        match self {
            Self::Neonate => "NN",
            Self::Newborn => "NB",
            Self::Baby => "BB",
        }
    }
}

/// Decoded age of a victim, offender or arrestee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NibrsAge {
    Exact(u8),
    Range { min: u8, max: u8 },
    Unknown,
    Neonate(NeonateCode),
}

/// Why an age slot could not be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AgeDefect {
    /// Not an age at all (letters, a single character, or a neonate code
    /// where one is not allowed)
    NonNumeric,
    /// A range whose upper bound is malformed, or a three-character value
    InvalidRange,
}

impl NibrsAge {
    /// Decode an age slot.
    ///
    /// Returns `Ok(None)` for a blank slot. `allow_neonate` is true only for
    /// victim segments.
    pub fn from_raw(raw: &str, allow_neonate: bool) -> Result<Option<Self>, AgeDefect> {
        let trimmed = raw.trim();

        match trimmed.len() {
            0 => Ok(None),
            2 => {
                if NEONATE_AGE_CODES.contains(&trimmed) {
                    return match NeonateCode::from_code(trimmed) {
                        Some(code) if allow_neonate => Ok(Some(Self::Neonate(code))),
                        _ => Err(AgeDefect::NonNumeric),
                    };
                }
                if trimmed == UNKNOWN_AGE_CODE {
                    return Ok(Some(Self::Unknown));
                }
                parse_age_digits(trimmed)
                    .map(|age| Some(Self::Exact(age)))
                    .ok_or(AgeDefect::NonNumeric)
            }
            3 => Err(AgeDefect::InvalidRange),
            4 => {
                let min = trimmed
                    .get(..2)
                    .and_then(parse_age_digits)
                    .ok_or(AgeDefect::NonNumeric)?;
                let max = trimmed
                    .get(2..)
                    .and_then(parse_age_digits)
                    .ok_or(AgeDefect::InvalidRange)?;
                Ok(Some(Self::Range { min, max }))
            }
            _ => Err(AgeDefect::NonNumeric),
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }

    pub fn is_range(&self) -> bool {
        matches!(self, Self::Range { .. })
    }

    pub fn is_neonate(&self) -> bool {
        matches!(self, Self::Neonate(_))
    }

    /// Lower bound in years; neonate codes count as zero
    pub fn min(&self) -> Option<u8> {
        match self {
            Self::Exact(age) => Some(*age),
            Self::Range { min, .. } => Some(*min),
            Self::Neonate(_) => Some(0),
            Self::Unknown => None,
        }
    }

    /// Upper bound in years; neonate codes count as zero
    pub fn max(&self) -> Option<u8> {
        match self {
            Self::Exact(age) => Some(*age),
            Self::Range { max, .. } => Some(*max),
            Self::Neonate(_) => Some(0),
            Self::Unknown => None,
        }
    }

    /// Midpoint of the age bounds
    pub fn average(&self) -> Option<f64> {
        match (self.min(), self.max()) {
            (Some(min), Some(max)) => Some((f64::from(min) + f64::from(max)) / 2.0),
            _ => None,
        }
    }
}

impl std::fmt::Display for NibrsAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exact(age) => write!(f, "{:02}", age),
            Self::Range { min, max } => write!(f, "{:02}{:02}", min, max),
            Self::Unknown => write!(f, "{}", UNKNOWN_AGE_CODE),
            Self::Neonate(code) => write!(f, "{}", code.code()),
        }
    }
}

fn parse_age_digits(digits: &str) -> Option<u8> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
