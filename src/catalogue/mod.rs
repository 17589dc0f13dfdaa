mod json;
mod validation;

pub use json::*;
pub use validation::*;

use crate::types::{
    Course, CourseId, Department, GroupAssignment, GroupId, Lecturer, LecturerAssignment,
    LecturerId, Room, RoomId, StudentGroup, UnavailabilityWindow,
};
use itertools::Itertools;
use std::collections::BTreeMap;

/// Raw catalogue contents as loaded from storage, before indexing
#[derive(Debug, Default)]
pub struct CatalogueData {
    pub departments: Vec<Department>,
    pub courses: Vec<Course>,
    pub lecturers: Vec<Lecturer>,
    pub rooms: Vec<Room>,
    pub groups: Vec<StudentGroup>,
    pub lecturer_assignments: Vec<LecturerAssignment>,
    pub group_assignments: Vec<GroupAssignment>,
    pub unavailability: Vec<UnavailabilityWindow>,
}

/// Immutable, indexed read model of the catalogue.
///
/// Acquired once per generation run; all accessors return id-sorted data so
/// that repeated runs over the same catalogue see identical orderings.
#[derive(Debug)]
pub struct CatalogueSnapshot {
    departments: Vec<Department>,
    courses: Vec<Course>,
    lecturers: Vec<Lecturer>,
    rooms: Vec<Room>,
    groups: Vec<StudentGroup>,
    lecturer_assignments: Vec<LecturerAssignment>,
    group_assignments: Vec<GroupAssignment>,
    unavailability: Vec<UnavailabilityWindow>,

    lecturers_by_course: BTreeMap<CourseId, Vec<LecturerId>>,
    groups_by_course: BTreeMap<CourseId, Vec<GroupId>>,
    unavailability_by_lecturer: BTreeMap<LecturerId, Vec<UnavailabilityWindow>>,
}

impl CatalogueSnapshot {
    pub fn from_data(mut data: CatalogueData) -> Self {
        data.departments.sort_by_key(|d| d.id);
        data.courses.sort_by_key(|c| c.id);
        data.lecturers.sort_by_key(|l| l.id);
        data.rooms.sort_by_key(|r| r.id);
        data.groups.sort_by_key(|g| g.id);
        data.lecturer_assignments
            .sort_by_key(|a| (a.course_id, a.lecturer_id));
        data.group_assignments
            .sort_by_key(|a| (a.course_id, a.group_id));
        data.unavailability
            .sort_by_key(|u| (u.lecturer_id, u.day_of_week, u.start_time));

        let lecturers_by_course: BTreeMap<CourseId, Vec<LecturerId>> = data
            .lecturer_assignments
            .iter()
            .map(|a| (a.course_id, a.lecturer_id))
            .into_group_map()
            .into_iter()
            .map(|(course, mut ids)| {
                ids.sort();
                ids.dedup();
                (course, ids)
            })
            .collect();

        let groups_by_course: BTreeMap<CourseId, Vec<GroupId>> = data
            .group_assignments
            .iter()
            .map(|a| (a.course_id, a.group_id))
            .into_group_map()
            .into_iter()
            .map(|(course, mut ids)| {
                ids.sort();
                ids.dedup();
                (course, ids)
            })
            .collect();

        let unavailability_by_lecturer: BTreeMap<LecturerId, Vec<UnavailabilityWindow>> = data
            .unavailability
            .iter()
            .cloned()
            .map(|w| (w.lecturer_id, w))
            .into_group_map()
            .into_iter()
            .collect();

        Self {
            departments: data.departments,
            courses: data.courses,
            lecturers: data.lecturers,
            rooms: data.rooms,
            groups: data.groups,
            lecturer_assignments: data.lecturer_assignments,
            group_assignments: data.group_assignments,
            unavailability: data.unavailability,
            lecturers_by_course,
            groups_by_course,
            unavailability_by_lecturer,
        }
    }

    pub fn departments(&self) -> &[Department] {
        &self.departments
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn lecturers(&self) -> &[Lecturer] {
        &self.lecturers
    }

    pub fn rooms(&self) -> &[Room] {
        &self.rooms
    }

    pub fn groups(&self) -> &[StudentGroup] {
        &self.groups
    }

    pub fn lecturer_assignments(&self) -> &[LecturerAssignment] {
        &self.lecturer_assignments
    }

    pub fn group_assignments(&self) -> &[GroupAssignment] {
        &self.group_assignments
    }

    pub fn unavailability(&self) -> &[UnavailabilityWindow] {
        &self.unavailability
    }

    pub fn course(&self, id: CourseId) -> Option<&Course> {
        self.courses.iter().find(|c| c.id == id)
    }

    pub fn lecturer(&self, id: LecturerId) -> Option<&Lecturer> {
        self.lecturers.iter().find(|l| l.id == id)
    }

    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.iter().find(|r| r.id == id)
    }

    pub fn group(&self, id: GroupId) -> Option<&StudentGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    /// Courses taught at an academic level, sorted by id
    pub fn courses_at_level(&self, level: u8) -> Vec<&Course> {
        self.courses.iter().filter(|c| c.level == level).collect()
    }

    /// Student groups at an academic level, sorted by id
    pub fn groups_at_level(&self, level: u8) -> Vec<&StudentGroup> {
        self.groups.iter().filter(|g| g.level == level).collect()
    }

    /// Lecturers assigned to a course, sorted by id
    pub fn lecturers_for_course(&self, course_id: CourseId) -> &[LecturerId] {
        self.lecturers_by_course
            .get(&course_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Groups assigned to a course, sorted by id
    pub fn groups_for_course(&self, course_id: CourseId) -> &[GroupId] {
        self.groups_by_course
            .get(&course_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Weekly unavailability windows for a lecturer
    pub fn unavailability_for(&self, lecturer_id: LecturerId) -> &[UnavailabilityWindow] {
        self.unavailability_by_lecturer
            .get(&lecturer_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DepartmentId, SessionConfig};

    fn course(id: u32, level: u8) -> Course {
        Course {
            id: CourseId(id),
            code: format!("C{id}"),
            name: format!("Course {id}"),
            department_id: DepartmentId(1),
            level,
            credits: 3,
            lecture_hours: 2,
            tutorial_hours: 0,
            practical_hours: 0,
            preferred_room_type: Default::default(),
            course_type: Default::default(),
            session_config: SessionConfig::default(),
            group_division_type: Default::default(),
        }
    }

    #[test]
    fn test_accessors_are_id_sorted() {
        let snapshot = CatalogueSnapshot::from_data(CatalogueData {
            courses: vec![course(3, 2), course(1, 2), course(2, 3)],
            lecturer_assignments: vec![
                LecturerAssignment {
                    lecturer_id: LecturerId(9),
                    course_id: CourseId(1),
                    session_type: None,
                    room_preference: None,
                    group_division_required: false,
                    expertise_level: "primary".into(),
                },
                LecturerAssignment {
                    lecturer_id: LecturerId(4),
                    course_id: CourseId(1),
                    session_type: None,
                    room_preference: None,
                    group_division_required: false,
                    expertise_level: "primary".into(),
                },
            ],
            ..Default::default()
        });

        let level2: Vec<u32> = snapshot.courses_at_level(2).iter().map(|c| c.id.0).collect();
        assert_eq!(level2, vec![1, 3]);

        assert_eq!(
            snapshot.lecturers_for_course(CourseId(1)),
            &[LecturerId(4), LecturerId(9)]
        );
        assert!(snapshot.lecturers_for_course(CourseId(99)).is_empty());
    }
}
