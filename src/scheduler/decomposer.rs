use crate::types::{Course, CourseId, SessionBlock, SessionType};

/// Maximum tutorial block length in hours
const TUTORIAL_BLOCK_CAP: u8 = 2;
/// Maximum practical (lab) block length in hours
const PRACTICAL_BLOCK_CAP: u8 = 3;

/// Break a course into its ordered atomic session blocks.
///
/// Lecture hours are chunked greedily into blocks of
/// `requires_consecutive` hours; tutorials cap at 2 hours and practicals
/// at 3. Identical inputs always produce identical block lists.
pub fn decompose_course(course: &Course) -> Vec<SessionBlock> {
    let lecture_cap = course.session_config.requires_consecutive.max(1);

    let mut blocks = Vec::new();
    chunk_hours(
        course.id,
        course.lecture_hours,
        lecture_cap,
        SessionType::Lecture,
        &mut blocks,
    );
    chunk_hours(
        course.id,
        course.tutorial_hours,
        TUTORIAL_BLOCK_CAP,
        SessionType::Tutorial,
        &mut blocks,
    );
    chunk_hours(
        course.id,
        course.practical_hours,
        PRACTICAL_BLOCK_CAP,
        SessionType::Practical,
        &mut blocks,
    );
    blocks
}

fn chunk_hours(
    course_id: CourseId,
    mut remaining: u8,
    cap: u8,
    session_type: SessionType,
    out: &mut Vec<SessionBlock>,
) {
    while remaining > 0 {
        let duration = cap.min(remaining);
        out.push(SessionBlock {
            course_id,
            ordinal: out.len(),
            session_type,
            duration,
        });
        remaining -= duration;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DepartmentId, SessionConfig};

    fn course_with_hours(lecture: u8, tutorial: u8, practical: u8, consecutive: u8) -> Course {
        Course {
            id: CourseId(1),
            code: "AEN301".into(),
            name: "Structural Analysis".into(),
            department_id: DepartmentId(1),
            level: 3,
            credits: 3,
            lecture_hours: lecture,
            tutorial_hours: tutorial,
            practical_hours: practical,
            preferred_room_type: Default::default(),
            course_type: Default::default(),
            session_config: SessionConfig {
                requires_consecutive: consecutive,
            },
            group_division_type: Default::default(),
        }
    }

    #[test]
    fn test_greedy_lecture_chunking() {
        // 5 lecture hours in blocks of 2 -> [2, 2, 1]
        let blocks = decompose_course(&course_with_hours(5, 0, 0, 2));
        let durations: Vec<u8> = blocks.iter().map(|b| b.duration).collect();
        assert_eq!(durations, vec![2, 2, 1]);
        assert!(blocks.iter().all(|b| b.session_type == SessionType::Lecture));
        assert_eq!(blocks.iter().map(|b| b.duration).sum::<u8>(), 5);
    }

    #[test]
    fn test_tutorials_cap_at_two_and_practicals_at_three() {
        let blocks = decompose_course(&course_with_hours(0, 3, 7, 1));
        let tutorials: Vec<u8> = blocks
            .iter()
            .filter(|b| b.session_type == SessionType::Tutorial)
            .map(|b| b.duration)
            .collect();
        let practicals: Vec<u8> = blocks
            .iter()
            .filter(|b| b.session_type == SessionType::Practical)
            .map(|b| b.duration)
            .collect();
        assert_eq!(tutorials, vec![2, 1]);
        assert_eq!(practicals, vec![3, 3, 1]);
    }

    #[test]
    fn test_ordinals_follow_emission_order() {
        let blocks = decompose_course(&course_with_hours(4, 2, 3, 2));
        let ordinals: Vec<usize> = blocks.iter().map(|b| b.ordinal).collect();
        assert_eq!(ordinals, (0..blocks.len()).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_hours_produce_no_blocks() {
        assert!(decompose_course(&course_with_hours(0, 0, 0, 2)).is_empty());
    }

    #[test]
    fn test_zero_consecutive_treated_as_one_hour_blocks() {
        let blocks = decompose_course(&course_with_hours(3, 0, 0, 0));
        assert_eq!(blocks.len(), 3);
        assert!(blocks.iter().all(|b| b.duration == 1));
    }

    #[test]
    fn test_decomposition_is_deterministic() {
        let course = course_with_hours(5, 3, 6, 2);
        assert_eq!(decompose_course(&course), decompose_course(&course));
    }
}
