//! Resource usage collection.
//!
//! Scans every bunk's day and records, per resource, who occupies it and
//! during which wall-clock window. The collector is where entries with
//! special semantics drop out of conflict analysis: league fixtures,
//! transition buffers, continuation fragments of multi-slot blocks, and
//! anything on the configured ignore-list.

use serde::{Deserialize, Serialize};

use crate::core::domain::{BunkId, Division, DivisionName, ResourceName, Schedule, TimeGrid};
use crate::core::lookup::NameTable;
use crate::io::config::ValidationConfig;

/// One bunk's occupancy of one resource during one wall-clock window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub bunk: BunkId,
    pub division: DivisionName,
    pub resource: ResourceName,
    pub start_minute: u16,
    pub end_minute: u16,
    pub activity: String,
}

impl ResourceUsage {
    /// Half-open interval overlap: windows that merely touch do not overlap.
    pub fn overlaps(&self, other: &ResourceUsage) -> bool {
        self.start_minute < other.end_minute && other.start_minute < self.end_minute
    }
}

/// Collects per-resource usage lists from the day's schedule.
///
/// Iterates divisions in roster order and bunks in division order, so the
/// resulting lists (and every finding derived from them) are stable across
/// repeated passes over the same snapshot. Slot windows come from the
/// division's own grid row, because the same slot index can denote different
/// wall-clock times across divisions with offset hours.
///
/// Skipped without failing the pass: bunks with no schedule data, slots with
/// no grid bounds, and entries that are blank, continuation fragments, league
/// fixtures, transitions, on an ignored resource, or missing a resource name.
pub fn collect_resource_usages(
    schedule: &Schedule,
    divisions: &[Division],
    grid: &TimeGrid,
    config: &ValidationConfig,
) -> NameTable<Vec<ResourceUsage>> {
    let ignored = config.ignored_resource_set();
    let mut by_resource: NameTable<Vec<ResourceUsage>> = NameTable::new();

    for division in divisions {
        let Some(grid_slots) = grid.slots_for(&division.name) else {
            log::warn!(
                "division '{}' has no slot grid; skipping its usages",
                division.name
            );
            continue;
        };

        for bunk in &division.bunks {
            let Some(slots) = schedule.slots_for(bunk) else {
                continue;
            };

            for (index, entry) in slots.iter().enumerate() {
                let Some(entry) = entry else { continue };
                if !entry.counts_for_analysis() {
                    continue;
                }

                let resource = entry.resource_name.trim();
                if resource.is_empty() || ignored.contains(resource) {
                    continue;
                }

                let Some(slot) = grid_slots.get(index) else {
                    log::warn!(
                        "bunk '{}' has an entry at slot {} outside '{}' hours; skipping",
                        bunk,
                        index,
                        division.name
                    );
                    continue;
                };

                by_resource.entry_or_default(resource).push(ResourceUsage {
                    bunk: bunk.clone(),
                    division: division.name.clone(),
                    resource: resource.to_string(),
                    start_minute: slot.start_minute,
                    end_minute: slot.end_minute,
                    activity: entry.label().to_string(),
                });
            }
        }
    }

    by_resource
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::domain::{ScheduleEntry, TimeSlot};

    fn half_hour_grid(division: &str, start: u16, count: usize) -> (String, Vec<TimeSlot>) {
        let slots = (0..count)
            .map(|i| TimeSlot::new(i, start + 30 * i as u16, start + 30 * (i + 1) as u16))
            .collect();
        (division.to_string(), slots)
    }

    fn fixture() -> (Vec<Division>, TimeGrid) {
        let divisions = vec![
            Division::new("Juniors", vec!["J1".to_string(), "J2".to_string()]),
            Division::new("Seniors", vec!["S1".to_string()]),
        ];
        let mut grid = TimeGrid::new();
        let (name, slots) = half_hour_grid("Juniors", 540, 4);
        grid.insert_division(name, slots);
        let (name, slots) = half_hour_grid("Seniors", 600, 4);
        grid.insert_division(name, slots);
        (divisions, grid)
    }

    #[test]
    fn collects_wall_clock_windows_per_division() {
        let (divisions, grid) = fixture();
        let mut schedule = Schedule::new();
        schedule.insert_bunk(
            "J1",
            vec![Some(ScheduleEntry::new("Field 1", "Soccer")), None, None, None],
        );
        schedule.insert_bunk(
            "S1",
            vec![Some(ScheduleEntry::new("field 1", "Flag Football")), None, None, None],
        );

        let usages =
            collect_resource_usages(&schedule, &divisions, &grid, &ValidationConfig::default());

        let field = usages.get("Field 1").unwrap();
        assert_eq!(field.len(), 2);
        // Same slot index, offset operating hours.
        assert_eq!(field[0].start_minute, 540);
        assert_eq!(field[1].start_minute, 600);
        assert_eq!(field[0].division, "Juniors");
        assert_eq!(field[1].division, "Seniors");
    }

    #[test]
    fn special_entries_are_excluded() {
        let (divisions, grid) = fixture();
        let mut league = ScheduleEntry::new("Court", "League Game");
        league.is_league_match = true;
        let mut transition = ScheduleEntry::new("Court", "Regroup");
        transition.is_transition = true;
        let mut continuation = ScheduleEntry::new("Court", "Tournament");
        continuation.is_continuation = true;

        let mut schedule = Schedule::new();
        schedule.insert_bunk(
            "J1",
            vec![
                Some(league),
                Some(transition),
                Some(continuation),
                Some(ScheduleEntry::new("Court", "Basketball")),
            ],
        );

        let usages =
            collect_resource_usages(&schedule, &divisions, &grid, &ValidationConfig::default());

        let court = usages.get("Court").unwrap();
        assert_eq!(court.len(), 1);
        assert_eq!(court[0].activity, "Basketball");
        assert_eq!(court[0].start_minute, 630);
    }

    #[test]
    fn ignored_resources_and_unrostered_bunks_are_skipped() {
        let (divisions, grid) = fixture();
        let mut schedule = Schedule::new();
        schedule.insert_bunk(
            "J1",
            vec![Some(ScheduleEntry::new("Lunch", "Lunch")), None, None, None],
        );
        // Present in the schedule but in no division roster.
        schedule.insert_bunk(
            "Ghost",
            vec![Some(ScheduleEntry::new("Field 1", "Soccer")), None, None, None],
        );

        let usages =
            collect_resource_usages(&schedule, &divisions, &grid, &ValidationConfig::default());
        assert!(usages.is_empty());
    }

    #[test]
    fn entries_past_the_grid_are_skipped() {
        let divisions = vec![Division::new("Juniors", vec!["J1".to_string()])];
        let mut grid = TimeGrid::new();
        grid.insert_division("Juniors", vec![TimeSlot::new(0, 540, 570)]);

        let mut schedule = Schedule::new();
        schedule.insert_bunk(
            "J1",
            vec![
                Some(ScheduleEntry::new("Field 1", "Soccer")),
                Some(ScheduleEntry::new("Field 2", "Kickball")),
            ],
        );

        let usages =
            collect_resource_usages(&schedule, &divisions, &grid, &ValidationConfig::default());
        assert!(usages.get("Field 1").is_some());
        assert!(usages.get("Field 2").is_none());
    }

    #[test]
    fn overlap_is_half_open() {
        let mk = |start, end| ResourceUsage {
            bunk: "A".to_string(),
            division: "D".to_string(),
            resource: "R".to_string(),
            start_minute: start,
            end_minute: end,
            activity: String::new(),
        };
        assert!(mk(600, 630).overlaps(&mk(615, 645)));
        assert!(!mk(600, 630).overlaps(&mk(630, 660)));
    }
}
