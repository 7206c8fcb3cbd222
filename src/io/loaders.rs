//! Loaders for persisted board documents.
//!
//! The surrounding product stores one day's board (divisions, slot grid, and
//! per-bunk assignments) as a single JSON document, and resource policies as
//! a separate name-keyed document. These loaders turn both into the typed
//! inputs the validator consumes. Parse failures carry the offending field
//! path so a malformed stored board is diagnosable from the error alone.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::core::domain::{Division, Schedule, TimeGrid};
use crate::io::config::ValidationConfig;
use crate::services::policy::{PolicyTable, RawResourcePolicy};
use crate::services::validation::validate_schedule;
use crate::services::validation_report::ValidationReport;

/// One day's board as persisted: roster, per-division slot grid, and
/// per-bunk assignments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSnapshot {
    pub divisions: Vec<Division>,
    pub time_grid: TimeGrid,
    pub schedule: Schedule,
}

impl BoardSnapshot {
    /// Runs one validation pass over this snapshot.
    pub fn validate(&self, policies: &PolicyTable, config: &ValidationConfig) -> ValidationReport {
        validate_schedule(
            &self.schedule,
            &self.divisions,
            &self.time_grid,
            policies,
            config,
        )
    }
}

/// Unified interface for loading board snapshots.
pub struct SnapshotLoader;

impl SnapshotLoader {
    /// Load a board snapshot from a JSON string.
    pub fn load_from_json_str(json_str: &str) -> Result<BoardSnapshot> {
        let mut de = serde_json::Deserializer::from_str(json_str);
        serde_path_to_error::deserialize(&mut de).context("Failed to parse board snapshot JSON")
    }

    /// Load a board snapshot from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<BoardSnapshot> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read board snapshot {}", path.display()))?;
        Self::load_from_json_str(&contents)
    }
}

/// Unified interface for loading resource policy tables.
pub struct PolicyLoader;

impl PolicyLoader {
    /// Load a policy table from a JSON object keyed by resource name.
    ///
    /// Accepts every legacy record shape; normalization happens later, at
    /// resolution time.
    pub fn load_from_json_str(json_str: &str) -> Result<PolicyTable> {
        let mut de = serde_json::Deserializer::from_str(json_str);
        let raw: BTreeMap<String, RawResourcePolicy> =
            serde_path_to_error::deserialize(&mut de)
                .context("Failed to parse resource policy JSON")?;
        Ok(raw.into_iter().collect())
    }

    /// Load a policy table from a JSON file.
    pub fn load_from_file(path: &Path) -> Result<PolicyTable> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read policy file {}", path.display()))?;
        Self::load_from_json_str(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::policy::SharingType;
    use std::io::Write;

    const BOARD_JSON: &str = r#"{
        "divisions": [
            {"name": "5th Grade", "bunks": ["A", "B"]}
        ],
        "timeGrid": {
            "5th Grade": [
                {"index": 0, "startMinute": 540, "endMinute": 570},
                {"index": 1, "startMinute": 570, "endMinute": 600}
            ]
        },
        "schedule": {
            "A": [
                {"resourceName": "Field 1", "activityName": "Soccer"},
                null
            ],
            "B": [
                null,
                {"resourceName": "Gym", "activityName": "Basketball", "isContinuation": false}
            ]
        }
    }"#;

    #[test]
    fn loads_board_snapshot_from_json() {
        let snapshot = SnapshotLoader::load_from_json_str(BOARD_JSON).unwrap();

        assert_eq!(snapshot.divisions.len(), 1);
        assert_eq!(snapshot.divisions[0].bunks, vec!["A", "B"]);
        assert_eq!(
            snapshot.time_grid.slot("5th Grade", 1).unwrap().end_minute,
            600
        );
        let a_slots = snapshot.schedule.slots_for("A").unwrap();
        assert_eq!(a_slots[0].as_ref().unwrap().resource_name, "Field 1");
        assert!(a_slots[1].is_none());
    }

    #[test]
    fn snapshot_validates_end_to_end() {
        let snapshot = SnapshotLoader::load_from_json_str(BOARD_JSON).unwrap();
        let report = snapshot.validate(&PolicyTable::new(), &ValidationConfig::default());

        // No overlapping usages, but both bunks miss lunch.
        assert!(report.errors.is_empty());
        assert!(report
            .warnings
            .iter()
            .any(|w| w.message.contains("no lunch")));
    }

    #[test]
    fn snapshot_parse_errors_name_the_field() {
        let err = SnapshotLoader::load_from_json_str(
            r#"{"divisions": [{"name": "5th Grade", "bunks": "A"}], "timeGrid": {}, "schedule": {}}"#,
        )
        .unwrap_err();
        assert!(format!("{:#}", err).contains("bunks"));
    }

    #[test]
    fn loads_policy_table_with_mixed_legacy_shapes() {
        let table = PolicyLoader::load_from_json_str(
            r#"{
                "Gym": {"sharable": true},
                "Field 1": {"sharableWith": {"type": "all", "capacity": 4}},
                "Court": {"capacity": "2"}
            }"#,
        )
        .unwrap();

        assert_eq!(table.resolve("gym").sharing_type, SharingType::SameDivision);
        assert_eq!(table.resolve("FIELD 1").max_capacity, 4);
        assert_eq!(table.resolve("Court").max_capacity, 2);
    }

    #[test]
    fn loads_snapshot_from_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(BOARD_JSON.as_bytes()).unwrap();

        let snapshot = SnapshotLoader::load_from_file(file.path()).unwrap();
        assert!(snapshot.schedule.has_bunk("B"));
    }

    #[test]
    fn missing_file_reports_the_path() {
        let err = PolicyLoader::load_from_file(Path::new("/nonexistent/policies.json"))
            .unwrap_err();
        assert!(format!("{:#}", err).contains("policies.json"));
    }
}
