use crate::catalogue::CatalogueSnapshot;
use crate::scheduler::compatible_rooms;
use crate::types::{day_name, CourseId, GroupId, PlacedSlot, SessionType, TimeGrid};
use crate::validator::{Severity, Violation};
use chrono::NaiveTime;
use std::collections::{BTreeMap, HashSet};

/// Check for room double-booking
pub fn check_room_conflicts(slots: &[PlacedSlot]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut occupied: HashSet<(u32, u8, NaiveTime)> = HashSet::new();

    for slot in slots {
        if !occupied.insert((slot.room_id.0, slot.day_of_week, slot.start_time)) {
            violations.push(Violation {
                constraint: "NoRoomConflict".to_string(),
                message: format!(
                    "Room '{}' double-booked on {} at {}",
                    slot.room_id,
                    day_name(slot.day_of_week),
                    slot.start_time
                ),
                severity: Severity::Error,
            });
        }
    }

    violations
}

/// Check for lecturer double-booking
pub fn check_lecturer_conflicts(slots: &[PlacedSlot]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut occupied: HashSet<(u32, u8, NaiveTime)> = HashSet::new();

    for slot in slots {
        if !occupied.insert((slot.lecturer_id.0, slot.day_of_week, slot.start_time)) {
            violations.push(Violation {
                constraint: "NoLecturerConflict".to_string(),
                message: format!(
                    "Lecturer '{}' double-booked on {} at {}",
                    slot.lecturer_id,
                    day_name(slot.day_of_week),
                    slot.start_time
                ),
                severity: Severity::Error,
            });
        }
    }

    violations
}

/// Check for student-group double-booking
pub fn check_group_conflicts(slots: &[PlacedSlot]) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut occupied: HashSet<(u32, u8, NaiveTime)> = HashSet::new();

    for slot in slots {
        if !occupied.insert((slot.group_id.0, slot.day_of_week, slot.start_time)) {
            violations.push(Violation {
                constraint: "NoGroupConflict".to_string(),
                message: format!(
                    "Group '{}' double-booked on {} at {}",
                    slot.group_id,
                    day_name(slot.day_of_week),
                    slot.start_time
                ),
                severity: Severity::Error,
            });
        }
    }

    violations
}

/// Every slot must be a one-hour record inside the teaching window
pub fn check_time_window(slots: &[PlacedSlot], grid: &TimeGrid) -> Vec<Violation> {
    let mut violations = Vec::new();

    for slot in slots {
        match grid.time_to_idx(slot.start_time) {
            Some(idx) if slot.end_time == grid.slot_end(idx) => {}
            _ => {
                violations.push(Violation {
                    constraint: "TimeWindow".to_string(),
                    message: format!(
                        "Slot for course '{}' at {}-{} is not a one-hour record inside the grid",
                        slot.course_id, slot.start_time, slot.end_time
                    ),
                    severity: Severity::Error,
                });
            }
        }
    }

    violations
}

/// Every slot's room must be admissible for its course and session type
pub fn check_room_compatibility(
    slots: &[PlacedSlot],
    catalogue: &CatalogueSnapshot,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for slot in slots {
        let Some(course) = catalogue.course(slot.course_id) else {
            violations.push(Violation {
                constraint: "RoomCompatibility".to_string(),
                message: format!("Slot references unknown course '{}'", slot.course_id),
                severity: Severity::Error,
            });
            continue;
        };

        let admissible = compatible_rooms(course, slot.session_type, catalogue.rooms());
        if !admissible.iter().any(|r| r.id == slot.room_id) {
            violations.push(Violation {
                constraint: "RoomCompatibility".to_string(),
                message: format!(
                    "Room '{}' is not compatible with course '{}' ({} session)",
                    slot.room_id, course.code, slot.session_type
                ),
                severity: Severity::Error,
            });
        }
    }

    violations
}

/// Every slot's lecturer and group must be assigned to its course
pub fn check_assignment_membership(
    slots: &[PlacedSlot],
    catalogue: &CatalogueSnapshot,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    for slot in slots {
        if !catalogue
            .lecturers_for_course(slot.course_id)
            .contains(&slot.lecturer_id)
        {
            violations.push(Violation {
                constraint: "AssignmentMembership".to_string(),
                message: format!(
                    "Lecturer '{}' is not assigned to course '{}'",
                    slot.lecturer_id, slot.course_id
                ),
                severity: Severity::Error,
            });
        }
        if !catalogue
            .groups_for_course(slot.course_id)
            .contains(&slot.group_id)
        {
            violations.push(Violation {
                constraint: "AssignmentMembership".to_string(),
                message: format!(
                    "Group '{}' is not assigned to course '{}'",
                    slot.group_id, slot.course_id
                ),
                severity: Severity::Error,
            });
        }
    }

    violations
}

/// For every (course, group) pair with any slots, scheduled hours must
/// equal the course's requirements, per session type and in total
pub fn check_hour_totals(slots: &[PlacedSlot], catalogue: &CatalogueSnapshot) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut scheduled: BTreeMap<(CourseId, GroupId), BTreeMap<SessionType, u8>> = BTreeMap::new();
    for slot in slots {
        *scheduled
            .entry((slot.course_id, slot.group_id))
            .or_default()
            .entry(slot.session_type)
            .or_insert(0) += 1;
    }

    for ((course_id, group_id), per_type) in &scheduled {
        let Some(course) = catalogue.course(*course_id) else {
            continue; // reported by check_room_compatibility
        };

        for session_type in [
            SessionType::Lecture,
            SessionType::Tutorial,
            SessionType::Practical,
        ] {
            let actual = per_type.get(&session_type).copied().unwrap_or(0);
            let required = course.hours_for(session_type);
            if actual != required {
                violations.push(Violation {
                    constraint: "HourTotals".to_string(),
                    message: format!(
                        "Course '{}' group '{}': {} {} hours scheduled, {} required",
                        course.code, group_id, actual, session_type, required
                    ),
                    severity: Severity::Error,
                });
            }
        }
    }

    violations
}
