//! Campboard Rust core - schedule conflict and capacity validation for day camps.
//!
//! The scheduling board itself (drag-and-drop editing, rosters, persistence,
//! access control) lives in the surrounding product. This crate is the batch
//! rule-evaluator it calls once per "check schedule" action: given one day's
//! fully populated board, it reports sharing violations, capacity overages,
//! same-day repetitions, and coverage gaps as two ordered lists of findings.

pub mod algorithms;
pub mod core;
pub mod io;
pub mod services;

pub use services::validation::validate_schedule;
pub use services::validation_report::{Severity, ValidationFinding, ValidationReport};
