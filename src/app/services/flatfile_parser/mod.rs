//! NIBRS fixed-width flat-file parser
//!
//! This module turns a NIBRS flat file into Group A incident, zero and Group B
//! arrest reports. Each line is one segment; consecutive segments that share
//! an incident identity are grouped into one report and delivered to
//! listeners as soon as the report is complete.
//!
//! ## Architecture
//!
//! - [`segment_spec`] - Per-level field layouts and accepted lengths
//! - [`field_extractor`] - Position-based slicing and typed field parsing
//! - [`segment_decoder`] - Line classification, length check and field walk
//! - [`segment_builders`] - Typed segment construction from decoded fields
//! - [`assembler`] - The grouping state machine and error attribution
//! - [`listener`] - Report listener trait, registry and built-in listeners
//! - [`builder`] - The entry point that drives a whole input
//! - [`stats`] - Build statistics and result structures
//!
//! ## Usage
//!
//! ```rust
//! use nibrs_flatfile::app::services::flatfile_parser::{IncidentBuilder, ReportCollector};
//!
//! # fn example() -> nibrs_flatfile::Result<()> {
//! let mut collector = ReportCollector::new();
//! let mut builder = IncidentBuilder::new();
//! builder.add_incident_listener(&mut collector);
//!
//! let errors = builder.build_incidents(std::io::Cursor::new(""))?;
//! assert!(errors.is_empty());
//! drop(builder);
//! assert!(collector.is_empty());
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod builder;
pub mod field_extractor;
pub mod listener;
pub mod segment_builders;
pub mod segment_decoder;
pub mod segment_spec;
pub mod stats;

#[cfg(test)]
pub mod tests;

// Re-export main types for easy access
pub use assembler::{FinishedReport, IncidentAssembler};
pub use builder::IncidentBuilder;
pub use listener::{ListenerRegistry, LoggingListener, ReportCollector, ReportListener};
pub use segment_decoder::{DecodedLine, LengthValidator, SegmentDecoder};
pub use segment_spec::{FieldDescriptor, FieldKind, SegmentSpec};
pub use stats::{BuildResult, BuildStats};
