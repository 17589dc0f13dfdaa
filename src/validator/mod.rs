mod hard_constraints;
mod soft_constraints;

pub use hard_constraints::*;
pub use soft_constraints::*;

use crate::catalogue::CatalogueSnapshot;
use crate::types::{PlacedSlot, TimeGrid};
use std::collections::HashSet;

/// Result of validating a generated timetable against its catalogue
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub is_valid: bool,
    pub hard_violations: Vec<Violation>,
    /// Total lecturer-preference penalty; equals the solver objective
    /// for a timetable this generator produced
    pub preference_penalty: u32,
    pub statistics: TimetableStatistics,
}

/// A constraint violation
#[derive(Debug, Clone)]
pub struct Violation {
    pub constraint: String,
    pub message: String,
    pub severity: Severity,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

/// Summary figures for a slot set
#[derive(Debug, Clone)]
pub struct TimetableStatistics {
    pub total_slots: usize,
    pub courses_scheduled: usize,
    pub lecturers_used: usize,
    pub rooms_used: usize,
}

/// Validate a slot set against every invariant the generator promises:
/// no resource double-booking, slots inside the teaching window, hour
/// totals matching course requirements, room compatibility and
/// assignment membership.
pub fn validate_slots(
    slots: &[PlacedSlot],
    catalogue: &CatalogueSnapshot,
    grid: &TimeGrid,
) -> ValidationReport {
    let mut hard_violations = Vec::new();

    hard_violations.extend(check_room_conflicts(slots));
    hard_violations.extend(check_lecturer_conflicts(slots));
    hard_violations.extend(check_group_conflicts(slots));
    hard_violations.extend(check_time_window(slots, grid));
    hard_violations.extend(check_room_compatibility(slots, catalogue));
    hard_violations.extend(check_assignment_membership(slots, catalogue));
    hard_violations.extend(check_hour_totals(slots, catalogue));

    let preference_penalty = preference_penalty(slots, catalogue, grid);
    let statistics = calculate_statistics(slots);

    ValidationReport {
        is_valid: hard_violations.iter().all(|v| v.severity != Severity::Error),
        hard_violations,
        preference_penalty,
        statistics,
    }
}

fn calculate_statistics(slots: &[PlacedSlot]) -> TimetableStatistics {
    let courses: HashSet<_> = slots.iter().map(|s| s.course_id).collect();
    let lecturers: HashSet<_> = slots.iter().map(|s| s.lecturer_id).collect();
    let rooms: HashSet<_> = slots.iter().map(|s| s.room_id).collect();

    TimetableStatistics {
        total_slots: slots.len(),
        courses_scheduled: courses.len(),
        lecturers_used: lecturers.len(),
        rooms_used: rooms.len(),
    }
}
