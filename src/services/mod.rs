//! Rule evaluation services built on top of the algorithmic kernel.
//!
//! # Components
//!
//! - [`policy`]: sharing-policy normalization and resolution
//! - [`validation`]: the batch schedule validator
//! - [`validation_report`]: finding and report types returned to callers

pub mod policy;
pub mod validation;
pub mod validation_report;

pub use policy::{PolicyTable, RawResourcePolicy, ResourceSharingPolicy, SharingType};
pub use validation::{build_bunk_division_index, validate_schedule};
pub use validation_report::{
    FindingCategory, Severity, TimeRange, ValidationFinding, ValidationReport,
};
