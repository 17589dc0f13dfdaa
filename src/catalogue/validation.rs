use super::CatalogueSnapshot;
use crate::error::{GeneratorError, Result};
use crate::types::{CourseId, DepartmentId, GroupId, LecturerId, RoomId, DAYS_PER_WEEK};
use std::collections::HashSet;

/// Validation result with collected errors and warnings
#[derive(Debug, Default)]
pub struct ValidationResult {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, msg: impl Into<String>) {
        self.errors.push(msg.into());
    }

    pub fn add_warning(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }
}

/// Validate referential integrity of a catalogue snapshot.
///
/// Errors abort generation before any model is built; warnings describe
/// data the generator will silently skip (e.g. courses without lecturers)
/// so operators see the drop before a long solve.
pub fn validate_catalogue(catalogue: &CatalogueSnapshot) -> Result<ValidationResult> {
    let mut result = ValidationResult::default();

    let course_ids: HashSet<CourseId> = catalogue.courses().iter().map(|c| c.id).collect();
    let lecturer_ids: HashSet<LecturerId> = catalogue.lecturers().iter().map(|l| l.id).collect();
    let group_ids: HashSet<GroupId> = catalogue.groups().iter().map(|g| g.id).collect();
    let department_ids: HashSet<DepartmentId> =
        catalogue.departments().iter().map(|d| d.id).collect();

    check_duplicate_ids(catalogue, &mut result);

    // Assignment references
    for assignment in catalogue.lecturer_assignments() {
        if !course_ids.contains(&assignment.course_id) {
            result.add_error(format!(
                "Lecturer assignment references unknown course '{}'",
                assignment.course_id
            ));
        }
        if !lecturer_ids.contains(&assignment.lecturer_id) {
            result.add_error(format!(
                "Lecturer assignment references unknown lecturer '{}'",
                assignment.lecturer_id
            ));
        }
    }
    for assignment in catalogue.group_assignments() {
        if !course_ids.contains(&assignment.course_id) {
            result.add_error(format!(
                "Group assignment references unknown course '{}'",
                assignment.course_id
            ));
        }
        if !group_ids.contains(&assignment.group_id) {
            result.add_error(format!(
                "Group assignment references unknown group '{}'",
                assignment.group_id
            ));
        }
    }

    // Unavailability references and window sanity
    for window in catalogue.unavailability() {
        if !lecturer_ids.contains(&window.lecturer_id) {
            result.add_error(format!(
                "Unavailability window references unknown lecturer '{}'",
                window.lecturer_id
            ));
        }
        if window.day_of_week >= DAYS_PER_WEEK {
            result.add_error(format!(
                "Unavailability window for lecturer '{}' has invalid day {}",
                window.lecturer_id, window.day_of_week
            ));
        }
        if window.start_time >= window.end_time {
            result.add_error(format!(
                "Unavailability window for lecturer '{}' is empty ({} >= {})",
                window.lecturer_id, window.start_time, window.end_time
            ));
        }
    }

    // Department references (only when a department list was provided)
    if !department_ids.is_empty() {
        for course in catalogue.courses() {
            if !department_ids.contains(&course.department_id) {
                result.add_warning(format!(
                    "Course '{}' references unknown department '{}'",
                    course.code, course.department_id
                ));
            }
        }
    }

    // Courses the model builder will drop
    for course in catalogue.courses() {
        if course.total_hours() == 0 {
            continue;
        }
        if catalogue.lecturers_for_course(course.id).is_empty() {
            result.add_warning(format!(
                "Course '{}' has required hours but no lecturer assignment; it will not be scheduled",
                course.code
            ));
        }
        if catalogue.groups_for_course(course.id).is_empty() {
            result.add_warning(format!(
                "Course '{}' has required hours but no group assignment; it will not be scheduled",
                course.code
            ));
        }
        if !(2..=5).contains(&course.level) {
            result.add_warning(format!(
                "Course '{}' has unusual academic level: {}",
                course.code, course.level
            ));
        }
    }

    // Group size vs room capacity (informational; capacity is not a hard
    // constraint in the solver)
    let max_room_capacity = catalogue.rooms().iter().map(|r| r.capacity).max().unwrap_or(0);
    for group in catalogue.groups() {
        if group.size > max_room_capacity {
            result.add_warning(format!(
                "Group '{}' size ({}) exceeds largest room capacity ({})",
                group.name, group.size, max_room_capacity
            ));
        }
    }

    if !result.is_valid() {
        return Err(GeneratorError::CatalogueInconsistent(format!(
            "{} errors:\n{}",
            result.errors.len(),
            result.errors.join("\n")
        ))
        .into());
    }

    Ok(result)
}

fn check_duplicate_ids(catalogue: &CatalogueSnapshot, result: &mut ValidationResult) {
    let mut seen_courses: HashSet<CourseId> = HashSet::new();
    for course in catalogue.courses() {
        if !seen_courses.insert(course.id) {
            result.add_error(format!("Duplicate course ID: '{}'", course.id));
        }
    }

    let mut seen_lecturers: HashSet<LecturerId> = HashSet::new();
    for lecturer in catalogue.lecturers() {
        if !seen_lecturers.insert(lecturer.id) {
            result.add_error(format!("Duplicate lecturer ID: '{}'", lecturer.id));
        }
    }

    let mut seen_rooms: HashSet<RoomId> = HashSet::new();
    for room in catalogue.rooms() {
        if !seen_rooms.insert(room.id) {
            result.add_error(format!("Duplicate room ID: '{}'", room.id));
        }
    }

    let mut seen_groups: HashSet<GroupId> = HashSet::new();
    for group in catalogue.groups() {
        if !seen_groups.insert(group.id) {
            result.add_error(format!("Duplicate group ID: '{}'", group.id));
        }
    }
}
