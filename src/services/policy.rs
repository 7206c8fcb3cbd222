//! Resource sharing policies and their resolution.
//!
//! Policies arrive from storage in several legacy shapes that all mean the
//! same thing: a boolean `sharable` flag, a nested `sharableWith` config, and
//! a flat `capacity` field that may hold a number or a string. This module
//! normalizes every shape into a single [`ResourceSharingPolicy`] record at
//! the resolver boundary so the evaluator never sees the ambiguity.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::lookup::NameTable;

/// Sentinel capacity for resources sharable by everyone with no stated limit.
pub const UNLIMITED_CAPACITY: u32 = 999;

/// How a resource may be shared across concurrent usages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SharingType {
    /// One occupant at a time, no exceptions.
    NotSharable,
    /// Multiple bunks allowed, but only from one division.
    SameDivision,
    /// Only the listed divisions may occupy the resource.
    Custom,
    /// Any division, subject only to capacity.
    All,
}

impl SharingType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SharingType::NotSharable => "not_sharable",
            SharingType::SameDivision => "same_division",
            SharingType::Custom => "custom",
            SharingType::All => "all",
        }
    }

    /// Capacity implied by the type when no explicit value is stored.
    pub fn default_capacity(&self) -> u32 {
        match self {
            SharingType::NotSharable => 1,
            SharingType::SameDivision => 2,
            SharingType::Custom => 1,
            SharingType::All => UNLIMITED_CAPACITY,
        }
    }
}

/// Error for unrecognized sharing-type strings in stored policies.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown sharing type '{0}'")]
pub struct UnknownSharingType(pub String);

impl FromStr for SharingType {
    type Err = UnknownSharingType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "not_sharable" | "notsharable" => Ok(SharingType::NotSharable),
            "same_division" | "samedivision" => Ok(SharingType::SameDivision),
            "custom" => Ok(SharingType::Custom),
            "all" => Ok(SharingType::All),
            other => Err(UnknownSharingType(other.to_string())),
        }
    }
}

/// A fully normalized sharing policy for one resource.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceSharingPolicy {
    pub sharing_type: SharingType,
    pub max_capacity: u32,
    /// Division names allowed on the resource; used only for `Custom`.
    pub allowed_divisions: Vec<String>,
}

impl ResourceSharingPolicy {
    pub fn new(sharing_type: SharingType, max_capacity: u32) -> Self {
        Self {
            sharing_type,
            max_capacity,
            allowed_divisions: Vec::new(),
        }
    }

    /// `true` when capacity never constrains the resource.
    pub fn is_unlimited(&self) -> bool {
        self.max_capacity >= UNLIMITED_CAPACITY
    }
}

impl Default for ResourceSharingPolicy {
    /// The defensive default for resources with no stored policy.
    fn default() -> Self {
        Self::new(SharingType::NotSharable, 1)
    }
}

/// Nested sharing configuration as stored by the board UI.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawSharingConfig {
    #[serde(rename = "type")]
    pub sharing_type: Option<String>,
    /// May be a number or a numeric string in old boards.
    pub capacity: Option<serde_json::Value>,
    #[serde(default)]
    pub divisions: Vec<String>,
}

/// Raw, loosely-shaped policy record as persisted by the scheduling UI.
///
/// Older boards store only the boolean `sharable` flag and sometimes a flat
/// `capacity`; newer ones store the nested `sharableWith` config. All three
/// may coexist on one record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawResourcePolicy {
    pub sharable: Option<bool>,
    #[serde(rename = "sharableWith")]
    pub sharable_with: Option<RawSharingConfig>,
    pub capacity: Option<serde_json::Value>,
}

/// Extracts a positive capacity from a stored JSON value, tolerating numeric
/// strings. Returns `None` for anything else.
fn capacity_from_value(value: &serde_json::Value) -> Option<u32> {
    let n = match value {
        serde_json::Value::Number(n) => n.as_f64(),
        serde_json::Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    if n.is_finite() && n >= 1.0 {
        Some(n as u32)
    } else {
        None
    }
}

/// Normalizes one raw policy record into a [`ResourceSharingPolicy`].
///
/// Precedence: the nested `sharableWith` config determines the sharing type;
/// absent that, `sharable: true` maps to `SameDivision` with capacity 2 and
/// anything else to `NotSharable`. Capacity comes from the nested config if
/// stated, else the flat `capacity` field, else the type default; a malformed
/// value falls back to the type default.
pub fn normalize_policy(resource: &str, raw: &RawResourcePolicy) -> ResourceSharingPolicy {
    let mut allowed_divisions = Vec::new();
    let mut nested_capacity = None;

    let sharing_type = match &raw.sharable_with {
        Some(config) => {
            nested_capacity = config.capacity.as_ref();
            allowed_divisions = config.divisions.clone();
            match config.sharing_type.as_deref().map(SharingType::from_str) {
                Some(Ok(t)) => t,
                Some(Err(e)) => {
                    log::warn!("resource '{}': {}; treating as not sharable", resource, e);
                    SharingType::NotSharable
                }
                None => legacy_sharing_type(raw),
            }
        }
        None => legacy_sharing_type(raw),
    };

    // TODO: a flat capacity overrides the type default even for NotSharable,
    // which lets a "not sharable" room quietly hold more than one bunk.
    // Existing boards depend on this precedence; confirm before tightening.
    let explicit = nested_capacity.or(raw.capacity.as_ref());
    let max_capacity = match explicit {
        Some(value) => capacity_from_value(value).unwrap_or_else(|| {
            log::warn!(
                "resource '{}': malformed capacity {:?}; using {} default of {}",
                resource,
                value,
                sharing_type.as_str(),
                sharing_type.default_capacity()
            );
            sharing_type.default_capacity()
        }),
        None => sharing_type.default_capacity(),
    };

    ResourceSharingPolicy {
        sharing_type,
        max_capacity,
        allowed_divisions,
    }
}

fn legacy_sharing_type(raw: &RawResourcePolicy) -> SharingType {
    if raw.sharable == Some(true) {
        SharingType::SameDivision
    } else {
        SharingType::NotSharable
    }
}

/// Case-insensitive table of stored policies, resolved on demand.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PolicyTable {
    raw: NameTable<RawResourcePolicy>,
}

impl PolicyTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, resource: &str, policy: RawResourcePolicy) {
        self.raw.insert(resource, policy);
    }

    /// Resolves the sharing policy for a resource name.
    ///
    /// Matching is case-insensitive and whitespace-trimmed. A resource with
    /// no stored policy gets the defensive default: not sharable, capacity 1.
    pub fn resolve(&self, resource: &str) -> ResourceSharingPolicy {
        match self.raw.get(resource) {
            Some(raw) => normalize_policy(resource, raw),
            None => ResourceSharingPolicy::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.raw.len()
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }
}

impl FromIterator<(String, RawResourcePolicy)> for PolicyTable {
    fn from_iter<T: IntoIterator<Item = (String, RawResourcePolicy)>>(iter: T) -> Self {
        let mut table = PolicyTable::new();
        for (name, policy) in iter {
            table.insert(&name, policy);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_json(json: &str) -> RawResourcePolicy {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn missing_policy_defaults_to_not_sharable() {
        let table = PolicyTable::new();
        let policy = table.resolve("Field 9");
        assert_eq!(policy.sharing_type, SharingType::NotSharable);
        assert_eq!(policy.max_capacity, 1);
    }

    #[test]
    fn legacy_sharable_flag_maps_to_same_division_capacity_two() {
        let policy = normalize_policy("Gym", &raw_json(r#"{"sharable": true}"#));
        assert_eq!(policy.sharing_type, SharingType::SameDivision);
        assert_eq!(policy.max_capacity, 2);

        let policy = normalize_policy("Gym", &raw_json(r#"{"sharable": false}"#));
        assert_eq!(policy.sharing_type, SharingType::NotSharable);
        assert_eq!(policy.max_capacity, 1);
    }

    #[test]
    fn nested_config_wins_over_legacy_flag() {
        let raw = raw_json(
            r#"{"sharable": true,
                "sharableWith": {"type": "custom", "capacity": 3,
                                 "divisions": ["5th Grade", "6th Grade"]}}"#,
        );
        let policy = normalize_policy("Pavilion", &raw);
        assert_eq!(policy.sharing_type, SharingType::Custom);
        assert_eq!(policy.max_capacity, 3);
        assert_eq!(policy.allowed_divisions, vec!["5th Grade", "6th Grade"]);
    }

    #[test]
    fn nested_capacity_takes_precedence_over_flat() {
        let raw = raw_json(
            r#"{"capacity": 8, "sharableWith": {"type": "all", "capacity": 4}}"#,
        );
        assert_eq!(normalize_policy("Pool", &raw).max_capacity, 4);
    }

    #[test]
    fn flat_capacity_overrides_not_sharable_default() {
        // Legacy precedence: flat capacity applies even without any sharing
        // config, so this "not sharable" court accepts two occupants.
        let policy = normalize_policy("Court", &raw_json(r#"{"capacity": 2}"#));
        assert_eq!(policy.sharing_type, SharingType::NotSharable);
        assert_eq!(policy.max_capacity, 2);
    }

    #[test]
    fn numeric_string_capacities_are_honored() {
        let raw = raw_json(r#"{"sharableWith": {"type": "all", "capacity": "6"}}"#);
        assert_eq!(normalize_policy("Lake", &raw).max_capacity, 6);
    }

    #[test]
    fn malformed_capacity_falls_back_to_type_default() {
        let raw = raw_json(r#"{"sharableWith": {"type": "same_division", "capacity": "lots"}}"#);
        assert_eq!(normalize_policy("Gym", &raw).max_capacity, 2);

        let raw = raw_json(r#"{"sharableWith": {"type": "all", "capacity": 0}}"#);
        let policy = normalize_policy("Lake", &raw);
        assert_eq!(policy.max_capacity, UNLIMITED_CAPACITY);
        assert!(policy.is_unlimited());
    }

    #[test]
    fn unknown_sharing_type_is_treated_as_not_sharable() {
        let raw = raw_json(r#"{"sharableWith": {"type": "everyone"}}"#);
        let policy = normalize_policy("Stage", &raw);
        assert_eq!(policy.sharing_type, SharingType::NotSharable);
        assert_eq!(policy.max_capacity, 1);
    }

    #[test]
    fn resolution_is_case_insensitive() {
        let mut table = PolicyTable::new();
        table.insert("Field 1", raw_json(r#"{"sharable": true}"#));

        assert_eq!(
            table.resolve(" field 1 ").sharing_type,
            SharingType::SameDivision
        );
        assert_eq!(
            table.resolve("FIELD 1").sharing_type,
            SharingType::SameDivision
        );
    }

    #[test]
    fn sharing_type_parses_stored_spellings() {
        assert_eq!(
            " Same_Division ".parse::<SharingType>().unwrap(),
            SharingType::SameDivision
        );
        assert_eq!(
            "notSharable".parse::<SharingType>().unwrap(),
            SharingType::NotSharable
        );
        assert!("open".parse::<SharingType>().is_err());
    }
}
