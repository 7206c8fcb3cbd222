//! Validation findings and the aggregated report.
//!
//! A finding carries its structured subject (bunks, divisions, resource,
//! time window) alongside the human-readable message, so the board UI can
//! group and render findings without parsing free text and tests can assert
//! on fields instead of strings.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::core::domain::format_minute;

/// Whether a finding blocks the schedule or just flags quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Error => "error",
            Severity::Warning => "warning",
        }
    }
}

/// Display-grouping tag for findings. Presentation only; the category never
/// affects which findings are produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FindingCategory {
    CrossDivision,
    Capacity,
    Repetition,
    MissingActivity,
    EmptySlot,
    UnassignedBunk,
}

impl FindingCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FindingCategory::CrossDivision => "cross_division",
            FindingCategory::Capacity => "capacity",
            FindingCategory::Repetition => "repetition",
            FindingCategory::MissingActivity => "missing_activity",
            FindingCategory::EmptySlot => "empty_slot",
            FindingCategory::UnassignedBunk => "unassigned_bunk",
        }
    }
}

/// A wall-clock window attached to a finding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeRange {
    pub start_minute: u16,
    pub end_minute: u16,
}

impl TimeRange {
    pub fn new(start_minute: u16, end_minute: u16) -> Self {
        Self {
            start_minute,
            end_minute,
        }
    }

    pub fn label(&self) -> String {
        format!(
            "{}-{}",
            format_minute(self.start_minute),
            format_minute(self.end_minute)
        )
    }
}

/// A single validation finding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationFinding {
    pub severity: Severity,
    pub category: FindingCategory,
    pub message: String,
    pub bunks: Vec<String>,
    pub divisions: Vec<String>,
    pub resource: Option<String>,
    pub time_range: Option<TimeRange>,
    pub slot_index: Option<usize>,
}

impl ValidationFinding {
    /// Create an error finding.
    pub fn error(
        category: FindingCategory,
        message: String,
        bunks: Vec<String>,
        divisions: Vec<String>,
        resource: Option<String>,
        time_range: Option<TimeRange>,
        slot_index: Option<usize>,
    ) -> Self {
        Self {
            severity: Severity::Error,
            category,
            message,
            bunks,
            divisions,
            resource,
            time_range,
            slot_index,
        }
    }

    /// Create a warning finding.
    pub fn warning(
        category: FindingCategory,
        message: String,
        bunks: Vec<String>,
        divisions: Vec<String>,
        resource: Option<String>,
        time_range: Option<TimeRange>,
        slot_index: Option<usize>,
    ) -> Self {
        Self {
            severity: Severity::Warning,
            category,
            message,
            bunks,
            divisions,
            resource,
            time_range,
            slot_index,
        }
    }
}

/// The two ordered finding lists produced by one validation pass.
///
/// Order is the order in which checks ran (conflicts, then repetitions, then
/// coverage), preserved so repeated passes over the same snapshot render
/// identically.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    pub errors: Vec<ValidationFinding>,
    pub warnings: Vec<ValidationFinding>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes a finding to the matching list by severity.
    pub fn push(&mut self, finding: ValidationFinding) {
        match finding.severity {
            Severity::Error => self.errors.push(finding),
            Severity::Warning => self.warnings.push(finding),
        }
    }

    pub fn extend(&mut self, findings: impl IntoIterator<Item = ValidationFinding>) {
        for finding in findings {
            self.push(finding);
        }
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    pub fn warning_count(&self) -> usize {
        self.warnings.len()
    }

    /// `true` when the pass produced no findings at all.
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }

    /// Finding counts per category tag, for display grouping.
    pub fn category_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for finding in self.errors.iter().chain(self.warnings.iter()) {
            *counts.entry(finding.category.as_str()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_error() -> ValidationFinding {
        ValidationFinding::error(
            FindingCategory::Capacity,
            "Field 1 is over capacity".to_string(),
            vec!["A".to_string(), "B".to_string()],
            vec!["5th Grade".to_string()],
            Some("Field 1".to_string()),
            Some(TimeRange::new(660, 690)),
            None,
        )
    }

    #[test]
    fn push_routes_by_severity() {
        let mut report = ValidationReport::new();
        report.push(sample_error());
        report.push(ValidationFinding::warning(
            FindingCategory::EmptySlot,
            "empty".to_string(),
            vec![],
            vec!["5th Grade".to_string()],
            None,
            None,
            Some(2),
        ));

        assert_eq!(report.error_count(), 1);
        assert_eq!(report.warning_count(), 1);
        assert!(!report.is_clean());
    }

    #[test]
    fn category_counts_span_both_lists() {
        let mut report = ValidationReport::new();
        report.push(sample_error());
        report.push(sample_error());
        report.push(ValidationFinding::warning(
            FindingCategory::EmptySlot,
            "empty".to_string(),
            vec![],
            vec![],
            None,
            None,
            None,
        ));

        let counts = report.category_counts();
        assert_eq!(counts.get("capacity"), Some(&2));
        assert_eq!(counts.get("empty_slot"), Some(&1));
        assert_eq!(counts.get("repetition"), None);
    }

    #[test]
    fn time_range_labels_are_wall_clock() {
        assert_eq!(TimeRange::new(600, 645).label(), "10:00-10:45");
    }

    #[test]
    fn findings_serialize_with_structured_subject() {
        let json = serde_json::to_value(sample_error()).unwrap();
        assert_eq!(json["severity"], "error");
        assert_eq!(json["category"], "capacity");
        assert_eq!(json["bunks"][1], "B");
        assert_eq!(json["timeRange"]["startMinute"], 660);
    }
}
