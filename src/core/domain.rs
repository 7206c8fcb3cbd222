//! Domain models for one day of a camp scheduling board.
//!
//! This module provides the data structures the validator reads: the slot
//! grid, the division roster, and per-bunk schedule entries. Everything here
//! is a read-only snapshot produced by the (external) scheduling UI; the
//! validator never mutates it.

use std::collections::BTreeMap;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Identifier of an atomic schedulable group of campers.
pub type BunkId = String;

/// Name of a division (a named collection of bunks sharing operating hours).
pub type DivisionName = String;

/// Name of a physical or activity resource (field, room, court).
pub type ResourceName = String;

/// Formats minutes-since-midnight as a wall-clock label.
///
/// # Examples
///
/// ```
/// use campboard_rust::core::domain::format_minute;
///
/// assert_eq!(format_minute(660), "11:00");
/// assert_eq!(format_minute(95), "01:35");
/// ```
pub fn format_minute(minute: u16) -> String {
    let minute = u32::from(minute) % 1440;
    match NaiveTime::from_hms_opt(minute / 60, minute % 60, 0) {
        Some(t) => t.format("%H:%M").to_string(),
        None => format!("{:02}:{:02}", minute / 60, minute % 60),
    }
}

/// One window in the day's slot grid.
///
/// Slot indices are shared across divisions, but two divisions may map the
/// same index to different wall-clock windows (offset operating hours), so
/// all conflict math uses the minute bounds, never the index.
///
/// # Examples
///
/// ```
/// use campboard_rust::core::domain::TimeSlot;
///
/// let slot = TimeSlot::new(3, 660, 690);
/// assert_eq!(slot.duration_minutes(), 30);
/// assert_eq!(slot.time_label(), "11:00-11:30");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeSlot {
    pub index: usize,
    pub start_minute: u16,
    pub end_minute: u16,
}

impl TimeSlot {
    pub fn new(index: usize, start_minute: u16, end_minute: u16) -> Self {
        Self {
            index,
            start_minute,
            end_minute,
        }
    }

    /// Duration of the slot in minutes.
    pub fn duration_minutes(&self) -> u16 {
        self.end_minute.saturating_sub(self.start_minute)
    }

    /// Wall-clock label for the slot window, e.g. `"11:00-11:30"`.
    pub fn time_label(&self) -> String {
        format!(
            "{}-{}",
            format_minute(self.start_minute),
            format_minute(self.end_minute)
        )
    }
}

/// Per-division slot grids for one day.
///
/// Each division carries its own ordered slot sequence; a division only uses
/// the contiguous sub-range of the day matching its operating hours.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TimeGrid {
    slots: BTreeMap<DivisionName, Vec<TimeSlot>>,
}

impl TimeGrid {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_division(&mut self, division: impl Into<DivisionName>, slots: Vec<TimeSlot>) {
        self.slots.insert(division.into(), slots);
    }

    /// The ordered slot sequence for a division, if one is configured.
    pub fn slots_for(&self, division: &str) -> Option<&[TimeSlot]> {
        self.slots.get(division).map(Vec::as_slice)
    }

    /// A single slot for a division by index.
    pub fn slot(&self, division: &str, index: usize) -> Option<&TimeSlot> {
        self.slots.get(division).and_then(|slots| slots.get(index))
    }
}

/// A named group of bunks sharing operating hours.
///
/// The roster order is meaningful: findings are reported in roster order so a
/// repeated validation pass over the same snapshot yields identical output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Division {
    pub name: DivisionName,
    pub bunks: Vec<BunkId>,
}

impl Division {
    pub fn new(name: impl Into<DivisionName>, bunks: Vec<BunkId>) -> Self {
        Self {
            name: name.into(),
            bunks,
        }
    }
}

/// An assignment at one time slot for one bunk.
///
/// `resource_name` is the physical location; `activity_name` is the logical
/// activity and may differ (e.g. "Soccer" on "Field 2"). The three flags mark
/// entries with special semantics that standard conflict analysis excludes:
/// league fixtures bring their own multi-team sharing rules, transitions are
/// buffer/regroup filler, and continuations are later fragments of a
/// multi-slot block that must not be double-counted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScheduleEntry {
    pub resource_name: ResourceName,
    pub activity_name: String,
    pub is_league_match: bool,
    pub is_transition: bool,
    pub is_continuation: bool,
}

impl ScheduleEntry {
    pub fn new(resource_name: impl Into<ResourceName>, activity_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            activity_name: activity_name.into(),
            ..Self::default()
        }
    }

    /// `true` when the entry carries no content at all.
    ///
    /// League fixtures count as content even when both labels are blank;
    /// the fixture itself is recorded elsewhere on the board.
    pub fn is_blank(&self) -> bool {
        self.resource_name.trim().is_empty()
            && self.activity_name.trim().is_empty()
            && !self.is_league_match
    }

    /// The display label: the activity when present, otherwise the resource.
    pub fn label(&self) -> &str {
        let activity = self.activity_name.trim();
        if activity.is_empty() {
            self.resource_name.trim()
        } else {
            activity
        }
    }

    /// `true` when the entry participates in conflict and repetition
    /// analysis: a non-blank, first-fragment entry that is neither a league
    /// fixture nor a transition buffer.
    pub fn counts_for_analysis(&self) -> bool {
        !self.is_blank() && !self.is_continuation && !self.is_league_match && !self.is_transition
    }
}

/// One day's schedule: bunk id to ordered slot assignments.
///
/// A bunk is either absent (no schedule data at all) or maps to a slot
/// sequence matching its division's grid; `None` marks an unfilled slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Schedule {
    bunks: BTreeMap<BunkId, Vec<Option<ScheduleEntry>>>,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_bunk(&mut self, bunk: impl Into<BunkId>, slots: Vec<Option<ScheduleEntry>>) {
        self.bunks.insert(bunk.into(), slots);
    }

    /// `true` when the bunk has any schedule data (even an all-empty row).
    pub fn has_bunk(&self, bunk: &str) -> bool {
        self.bunks.contains_key(bunk)
    }

    /// The bunk's slot assignments, or `None` when it has no schedule data.
    pub fn slots_for(&self, bunk: &str) -> Option<&[Option<ScheduleEntry>]> {
        self.bunks.get(bunk).map(Vec::as_slice)
    }

    pub fn is_empty(&self) -> bool {
        self.bunks.is_empty()
    }

    /// All bunk rows, in bunk-id order.
    pub fn iter(&self) -> impl Iterator<Item = (&BunkId, &[Option<ScheduleEntry>])> {
        self.bunks.iter().map(|(bunk, slots)| (bunk, slots.as_slice()))
    }
}
