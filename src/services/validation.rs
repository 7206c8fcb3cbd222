//! Batch validation of one day's schedule.
//!
//! This module implements the rule evaluator the board UI runs on every
//! "check schedule" action. Checks run in a fixed order:
//! 1. Sharing conflicts: cross-division legality and capacity, per overlap
//!    group on each resource
//! 2. Same-day repetitions: repeated activities (error) and repeated
//!    resource visits (warning) per bunk
//! 3. Coverage: missing required activities, division-wide empty slots, and
//!    bunks with no or all-empty schedule data
//!
//! The validator is a pure function over its snapshot: it performs no I/O,
//! mutates nothing, and never fails. Malformed input (bunks in no division,
//! entries past the grid, resources without policies) is skipped with a
//! defensive default so the pass always produces a report.

use std::collections::BTreeMap;

use crate::algorithms::overlap::group_overlapping;
use crate::algorithms::usage::{collect_resource_usages, ResourceUsage};
use crate::core::domain::{BunkId, Division, DivisionName, Schedule, TimeGrid};
use crate::core::lookup::{NameSet, NameTable};
use crate::io::config::ValidationConfig;
use crate::services::policy::{PolicyTable, ResourceSharingPolicy, SharingType};
use crate::services::validation_report::{
    FindingCategory, TimeRange, ValidationFinding, ValidationReport,
};

/// Reverse lookup from bunk id to owning division name.
///
/// Bunks listed in no division are simply absent from the map; their entries
/// are unattributable and downstream checks skip them rather than fail the
/// pass. If a bunk is listed twice the first listing wins.
pub fn build_bunk_division_index(divisions: &[Division]) -> BTreeMap<BunkId, DivisionName> {
    let mut index = BTreeMap::new();
    for division in divisions {
        for bunk in &division.bunks {
            index
                .entry(bunk.clone())
                .or_insert_with(|| division.name.clone());
        }
    }
    index
}

/// Validates one day's schedule against sharing rules, capacity limits,
/// repetition rules, and coverage expectations.
///
/// Returns the full report; never panics or errors on malformed input.
pub fn validate_schedule(
    schedule: &Schedule,
    divisions: &[Division],
    grid: &TimeGrid,
    policies: &PolicyTable,
    config: &ValidationConfig,
) -> ValidationReport {
    let mut report = ValidationReport::new();
    let division_index = build_bunk_division_index(divisions);

    // === Sharing conflicts ===
    let usages = collect_resource_usages(schedule, divisions, grid, config);
    report.extend(check_sharing_conflicts(&usages, policies));

    // === Same-day repetitions ===
    report.extend(check_same_day_repetitions(
        schedule,
        grid,
        &division_index,
        config,
    ));

    // === Coverage ===
    report.extend(check_missing_required_activities(
        schedule, divisions, config,
    ));
    report.extend(check_empty_division_slots(schedule, divisions, grid));
    report.extend(check_unassigned_bunks(schedule, divisions));

    report
}

// ==================== Sharing conflicts ====================

/// Applies each resource's sharing policy to its overlap groups.
fn check_sharing_conflicts(
    usages_by_resource: &NameTable<Vec<ResourceUsage>>,
    policies: &PolicyTable,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    for (_, usages) in usages_by_resource.iter() {
        for group in group_overlapping(usages) {
            // Singleton groups carry no contention.
            if group.len() < 2 {
                continue;
            }
            let members: Vec<&ResourceUsage> = group.iter().map(|&i| &usages[i]).collect();
            let resource = members[0].resource.clone();
            let policy = policies.resolve(&resource);
            findings.extend(evaluate_overlap_group(&resource, &members, &policy));
        }
    }

    findings
}

/// Judges one overlap group in two stages: cross-division legality first,
/// then per-division capacity.
///
/// Cross-division illegality is the stronger violation and is reported on
/// its own; capacity is only evaluated among usages that are otherwise
/// legally co-located, so one group never produces both a cross-division
/// error and a diluted capacity count for the same bunks.
fn evaluate_overlap_group(
    resource: &str,
    members: &[&ResourceUsage],
    policy: &ResourceSharingPolicy,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();
    let divisions = distinct_divisions(members);
    let window = group_window(members);
    let bunks = member_bunks(members);

    // Stage 1: cross-division legality.
    if divisions.len() > 1 {
        match policy.sharing_type {
            SharingType::NotSharable => {
                findings.push(ValidationFinding::error(
                    FindingCategory::CrossDivision,
                    format!(
                        "{} is not sharable, but {} from {} are scheduled there together ({})",
                        resource,
                        bunks.join(", "),
                        divisions.join(", "),
                        window.label()
                    ),
                    bunks,
                    divisions,
                    Some(resource.to_string()),
                    Some(window),
                    None,
                ));
                return findings;
            }
            SharingType::SameDivision => {
                findings.push(ValidationFinding::error(
                    FindingCategory::CrossDivision,
                    format!(
                        "{} can only be shared within one division, but {} span {} ({})",
                        resource,
                        bunks.join(", "),
                        divisions.join(", "),
                        window.label()
                    ),
                    bunks,
                    divisions,
                    Some(resource.to_string()),
                    Some(window),
                    None,
                ));
                return findings;
            }
            SharingType::Custom => {
                let allowed = NameSet::from_names(&policy.allowed_divisions);
                let disallowed: Vec<String> = divisions
                    .iter()
                    .filter(|d| !allowed.contains(d))
                    .cloned()
                    .collect();
                if !disallowed.is_empty() {
                    let allowed_label = if policy.allowed_divisions.is_empty() {
                        "none".to_string()
                    } else {
                        policy.allowed_divisions.join(", ")
                    };
                    findings.push(ValidationFinding::error(
                        FindingCategory::CrossDivision,
                        format!(
                            "{} is not open to {} (allowed: {}) ({})",
                            resource,
                            disallowed.join(", "),
                            allowed_label,
                            window.label()
                        ),
                        bunks,
                        disallowed,
                        Some(resource.to_string()),
                        Some(window),
                        None,
                    ));
                    return findings;
                }
            }
            SharingType::All => {
                if !policy.is_unlimited() && members.len() as u32 > policy.max_capacity {
                    findings.push(ValidationFinding::error(
                        FindingCategory::Capacity,
                        format!(
                            "{} is over capacity: {} bunks at once, limit {} ({})",
                            resource,
                            members.len(),
                            policy.max_capacity,
                            window.label()
                        ),
                        bunks,
                        divisions,
                        Some(resource.to_string()),
                        Some(window),
                        None,
                    ));
                    return findings;
                }
            }
        }
    }

    // Stage 2: per-division capacity among legally co-located usages.
    for division in &divisions {
        let subset: Vec<&&ResourceUsage> =
            members.iter().filter(|u| u.division == *division).collect();
        if subset.len() as u32 > policy.max_capacity {
            let subset_members: Vec<&ResourceUsage> = subset.iter().map(|u| **u).collect();
            let subset_window = group_window(&subset_members);
            let subset_bunks = member_bunks(&subset_members);
            findings.push(ValidationFinding::error(
                FindingCategory::Capacity,
                format!(
                    "{} is over capacity for {}: {} scheduled at once ({}), limit {} ({})",
                    resource,
                    division,
                    subset_members.len(),
                    subset_bunks.join(", "),
                    policy.max_capacity,
                    subset_window.label()
                ),
                subset_bunks,
                vec![division.clone()],
                Some(resource.to_string()),
                Some(subset_window),
                None,
            ));
        }
    }

    findings
}

/// Division names in the group, ordered by first appearance.
fn distinct_divisions(members: &[&ResourceUsage]) -> Vec<String> {
    let mut divisions: Vec<String> = Vec::new();
    for usage in members {
        if !divisions.contains(&usage.division) {
            divisions.push(usage.division.clone());
        }
    }
    divisions
}

/// Bunk ids in the group, in group order.
fn member_bunks(members: &[&ResourceUsage]) -> Vec<String> {
    members.iter().map(|u| u.bunk.clone()).collect()
}

/// Min-start/max-end window spanned by the group.
fn group_window(members: &[&ResourceUsage]) -> TimeRange {
    let start = members.iter().map(|u| u.start_minute).min().unwrap_or(0);
    let end = members.iter().map(|u| u.end_minute).max().unwrap_or(0);
    TimeRange::new(start, end)
}

// ==================== Same-day repetitions ====================

/// Per bunk: repeated activities are errors, repeated resource visits are
/// warnings. A bunk can legitimately return to the same field for a different
/// activity, which is why resource reuse is only flagged, not blocked.
fn check_same_day_repetitions(
    schedule: &Schedule,
    grid: &TimeGrid,
    division_index: &BTreeMap<BunkId, DivisionName>,
    config: &ValidationConfig,
) -> Vec<ValidationFinding> {
    let ignored_activities = config.ignored_activity_set();
    let ignored_resources = config.ignored_resource_set();
    let mut findings = Vec::new();

    for (bunk, slots) in schedule.iter() {
        // Unattributable rows cannot resolve slot times; skip them.
        let Some(division) = division_index.get(bunk) else {
            log::debug!("bunk '{}' is in no division; skipping repetitions", bunk);
            continue;
        };

        // Display label and occurrence times, keyed by normalized name.
        let mut activities: NameTable<(String, Vec<String>)> = NameTable::new();
        let mut resources: NameTable<(String, Vec<String>)> = NameTable::new();

        for (index, entry) in slots.iter().enumerate() {
            let Some(entry) = entry else { continue };
            if !entry.counts_for_analysis() {
                continue;
            }
            let time_label = grid
                .slot(division, index)
                .map(|slot| slot.time_label())
                .unwrap_or_else(|| format!("slot {}", index));

            let activity = entry.label();
            if !activity.is_empty() && !ignored_activities.contains(activity) {
                let slot_times = activities.entry_or_default(activity);
                if slot_times.0.is_empty() {
                    slot_times.0 = activity.to_string();
                }
                slot_times.1.push(time_label.clone());
            }

            let resource = entry.resource_name.trim();
            if !resource.is_empty() && !ignored_resources.contains(resource) {
                let slot_times = resources.entry_or_default(resource);
                if slot_times.0.is_empty() {
                    slot_times.0 = resource.to_string();
                }
                slot_times.1.push(time_label);
            }
        }

        for (_, (label, times)) in activities.iter() {
            if times.len() > 1 {
                findings.push(ValidationFinding::error(
                    FindingCategory::Repetition,
                    format!(
                        "{} has {} scheduled {} times ({})",
                        bunk,
                        label,
                        times.len(),
                        times.join(", ")
                    ),
                    vec![bunk.clone()],
                    vec![division.clone()],
                    None,
                    None,
                    None,
                ));
            }
        }

        for (_, (label, times)) in resources.iter() {
            if times.len() > 1 {
                findings.push(ValidationFinding::warning(
                    FindingCategory::Repetition,
                    format!(
                        "{} returns to {} {} times ({})",
                        bunk,
                        label,
                        times.len(),
                        times.join(", ")
                    ),
                    vec![bunk.clone()],
                    vec![division.clone()],
                    Some(label.clone()),
                    None,
                    None,
                ));
            }
        }
    }

    findings
}

// ==================== Coverage ====================

/// Every bunk with any scheduled content must have each required keyword
/// somewhere in its day (case-insensitive substring over activity and
/// resource labels). Bunks with zero entries are excluded here; the
/// unassigned-bunk check already covers them.
fn check_missing_required_activities(
    schedule: &Schedule,
    divisions: &[Division],
    config: &ValidationConfig,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    for division in divisions {
        for bunk in &division.bunks {
            let Some(slots) = schedule.slots_for(bunk) else {
                continue;
            };
            let entries: Vec<_> = slots
                .iter()
                .flatten()
                .filter(|entry| !entry.is_blank())
                .collect();
            if entries.is_empty() {
                continue;
            }

            for required in &config.required_activities {
                let needle = required.trim().to_lowercase();
                if needle.is_empty() {
                    continue;
                }
                let covered = entries.iter().any(|entry| {
                    entry.activity_name.to_lowercase().contains(&needle)
                        || entry.resource_name.to_lowercase().contains(&needle)
                });
                if !covered {
                    findings.push(ValidationFinding::warning(
                        FindingCategory::MissingActivity,
                        format!("{} has no {} scheduled", bunk, required.trim()),
                        vec![bunk.clone()],
                        vec![division.name.clone()],
                        None,
                        None,
                        None,
                    ));
                }
            }
        }
    }

    findings
}

/// Flags slots where every bunk in a division is simultaneously unfilled.
fn check_empty_division_slots(
    schedule: &Schedule,
    divisions: &[Division],
    grid: &TimeGrid,
) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    for division in divisions {
        if division.bunks.is_empty() {
            continue;
        }
        let Some(slots) = grid.slots_for(&division.name) else {
            continue;
        };

        for slot in slots {
            let all_unfilled = division.bunks.iter().all(|bunk| {
                match schedule.slots_for(bunk).and_then(|s| s.get(slot.index)) {
                    Some(Some(entry)) => entry.is_blank(),
                    _ => true,
                }
            });
            if all_unfilled {
                findings.push(ValidationFinding::warning(
                    FindingCategory::EmptySlot,
                    format!(
                        "{}: no bunk has anything scheduled at {} (slot {})",
                        division.name,
                        slot.time_label(),
                        slot.index
                    ),
                    Vec::new(),
                    vec![division.name.clone()],
                    None,
                    Some(TimeRange::new(slot.start_minute, slot.end_minute)),
                    Some(slot.index),
                ));
            }
        }
    }

    findings
}

/// Flags bunks with no schedule data at all, and bunks whose every slot is
/// empty with no league fixture anywhere in the day.
fn check_unassigned_bunks(schedule: &Schedule, divisions: &[Division]) -> Vec<ValidationFinding> {
    let mut findings = Vec::new();

    for division in divisions {
        for bunk in &division.bunks {
            match schedule.slots_for(bunk) {
                None => {
                    findings.push(ValidationFinding::warning(
                        FindingCategory::UnassignedBunk,
                        format!("{} ({}) has no schedule data", bunk, division.name),
                        vec![bunk.clone()],
                        vec![division.name.clone()],
                        None,
                        None,
                        None,
                    ));
                }
                Some(slots) => {
                    let has_league = slots
                        .iter()
                        .flatten()
                        .any(|entry| entry.is_league_match);
                    let all_blank = slots
                        .iter()
                        .all(|entry| entry.as_ref().map_or(true, |e| e.is_blank()));
                    if all_blank && !has_league {
                        findings.push(ValidationFinding::warning(
                            FindingCategory::UnassignedBunk,
                            format!("{} ({}) has an empty schedule", bunk, division.name),
                            vec![bunk.clone()],
                            vec![division.name.clone()],
                            None,
                            None,
                            None,
                        ));
                    }
                }
            }
        }
    }

    findings
}
