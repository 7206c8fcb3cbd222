//! Case-normalizing name lookup shared by every component.
//!
//! Resource and activity names on a camp board are typed by humans and come
//! back from storage with inconsistent casing and stray whitespace
//! ("Field 1", "field 1 ", "FIELD 1"). All string matching in the validator
//! goes through [`NameKey`] so the normalization lives in exactly one place.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A trimmed, lowercased lookup key for a human-entered name.
///
/// # Examples
///
/// ```
/// use campboard_rust::core::lookup::NameKey;
///
/// assert_eq!(NameKey::new("  Field 1 "), NameKey::new("FIELD 1"));
/// assert_eq!(NameKey::new("Gym").as_str(), "gym");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NameKey(String);

impl NameKey {
    pub fn new(raw: &str) -> Self {
        Self(raw.trim().to_lowercase())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for NameKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for NameKey {
    fn from(raw: &str) -> Self {
        NameKey::new(raw)
    }
}

/// A map keyed by normalized names, with deterministic iteration order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NameTable<V> {
    entries: BTreeMap<NameKey, V>,
}

impl<V> Default for NameTable<V> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<V> NameTable<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts under the normalized form of `name`, replacing any entry that
    /// differed only in case or whitespace.
    pub fn insert(&mut self, name: &str, value: V) -> Option<V> {
        self.entries.insert(NameKey::new(name), value)
    }

    pub fn get(&self, name: &str) -> Option<&V> {
        self.entries.get(&NameKey::new(name))
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut V> {
        self.entries.get_mut(&NameKey::new(name))
    }

    pub fn entry_or_default(&mut self, name: &str) -> &mut V
    where
        V: Default,
    {
        self.entries.entry(NameKey::new(name)).or_default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&NameKey::new(name))
    }

    pub fn iter(&self) -> btree_map::Iter<'_, NameKey, V> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<V> FromIterator<(String, V)> for NameTable<V> {
    fn from_iter<T: IntoIterator<Item = (String, V)>>(iter: T) -> Self {
        let mut table = NameTable::new();
        for (name, value) in iter {
            table.insert(&name, value);
        }
        table
    }
}

/// A small normalized set of names, for ignore-lists.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NameSet {
    keys: std::collections::BTreeSet<NameKey>,
}

impl NameSet {
    pub fn from_names<S: AsRef<str>>(names: &[S]) -> Self {
        Self {
            keys: names.iter().map(|n| NameKey::new(n.as_ref())).collect(),
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.keys.contains(&NameKey::new(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_normalize_case_and_whitespace() {
        let mut table = NameTable::new();
        table.insert("  Basketball Court ", 1);

        assert!(table.contains("basketball court"));
        assert!(table.contains("BASKETBALL COURT"));
        assert_eq!(table.get(" Basketball Court"), Some(&1));
        assert!(!table.contains("basketball"));
    }

    #[test]
    fn later_insert_wins_for_case_variants() {
        let mut table = NameTable::new();
        table.insert("Gym", 1);
        table.insert("GYM ", 2);

        assert_eq!(table.len(), 1);
        assert_eq!(table.get("gym"), Some(&2));
    }

    #[test]
    fn name_set_matches_case_insensitively() {
        let ignored = NameSet::from_names(&["Free", "LUNCH"]);
        assert!(ignored.contains("free"));
        assert!(ignored.contains(" lunch "));
        assert!(!ignored.contains("swim"));
    }
}
