use super::{compatible_rooms, decompose_course};
use crate::catalogue::CatalogueSnapshot;
use crate::error::GeneratorError;
use crate::types::{
    CourseId, GroupId, LecturerId, PlacedSlot, RoomId, SessionBlock, TeachingPreferences,
    TimeGrid, DAYS_PER_WEEK,
};
use itertools::iproduct;
use log::{info, warn};
use std::collections::{HashMap, HashSet};

/// Key identifying one session block of one course for one group
pub type SessionKey = (CourseId, GroupId, usize);

/// One admissible placement of a session block: a boolean decision
/// variable in the level model.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub course_id: CourseId,
    pub group_id: GroupId,
    pub session: SessionBlock,
    /// Day of week (0-4)
    pub day: u8,
    /// Starting slot index
    pub start: u8,
    pub room_id: RoomId,
    pub lecturer_id: LecturerId,
    /// Soft-constraint weight this placement contributes if selected
    pub penalty: u32,
}

impl Candidate {
    pub fn session_key(&self) -> SessionKey {
        (self.course_id, self.group_id, self.session.ordinal)
    }

    /// Slot indices this placement covers
    pub fn covered_hours(&self) -> std::ops::Range<u8> {
        self.start..self.start + self.session.duration
    }
}

/// The boolean model for one academic level, pruned by construction:
/// every candidate already satisfies room compatibility, fit-in-day,
/// lecturer availability and frozen-slot exclusion.
#[derive(Debug)]
pub struct LevelModel {
    pub level: u8,
    pub candidates: Vec<Candidate>,
    /// Distinct session keys; each must be placed exactly once
    pub session_keys: Vec<SessionKey>,
    /// Session keys left with no admissible placement; any entry makes
    /// the level infeasible without running the solver
    pub unplaceable: Vec<SessionKey>,
}

/// Occupied cells from earlier-solved levels, indexed per resource.
/// Candidates touching an occupied cell for the same room, lecturer or
/// group are excluded from the model.
#[derive(Debug, Default)]
pub struct FrozenIndex {
    rooms: HashSet<(u8, u8, RoomId)>,
    lecturers: HashSet<(u8, u8, LecturerId)>,
    groups: HashSet<(u8, u8, GroupId)>,
}

impl FrozenIndex {
    pub fn from_slots(slots: &[PlacedSlot], grid: &TimeGrid) -> Self {
        let mut index = Self::default();
        for slot in slots {
            if let Some(hour) = grid.time_to_idx(slot.start_time) {
                index.rooms.insert((slot.day_of_week, hour, slot.room_id));
                index
                    .lecturers
                    .insert((slot.day_of_week, hour, slot.lecturer_id));
                index.groups.insert((slot.day_of_week, hour, slot.group_id));
            }
        }
        index
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty() && self.lecturers.is_empty() && self.groups.is_empty()
    }

    fn blocks_room(&self, day: u8, start: u8, duration: u8, room: RoomId) -> bool {
        (start..start + duration).any(|h| self.rooms.contains(&(day, h, room)))
    }

    fn blocks_lecturer(&self, day: u8, start: u8, duration: u8, lecturer: LecturerId) -> bool {
        (start..start + duration).any(|h| self.lecturers.contains(&(day, h, lecturer)))
    }

    fn blocks_group(&self, day: u8, start: u8, duration: u8, group: GroupId) -> bool {
        (start..start + duration).any(|h| self.groups.contains(&(day, h, group)))
    }
}

/// Soft-constraint weight of placing a block at `start` with `duration`
/// for a lecturer with the given preferences
pub fn placement_penalty(
    preferences: &TeachingPreferences,
    start: u8,
    duration: u8,
    grid: &TimeGrid,
) -> u32 {
    let mut penalty = 0;
    if preferences.avoid_early_morning && start == 0 {
        penalty += 1;
    }
    if preferences.avoid_late_afternoon && start + duration > grid.late_afternoon_threshold() {
        penalty += 1;
    }
    penalty
}

/// Build the boolean model for one academic level.
///
/// Courses lacking a lecturer or group assignment are skipped with a
/// warning. An empty compatible-room set fails the level outright.
pub fn build_level_model(
    catalogue: &CatalogueSnapshot,
    level: u8,
    grid: &TimeGrid,
    frozen: &FrozenIndex,
) -> Result<LevelModel, GeneratorError> {
    let courses = catalogue.courses_at_level(level);
    let rooms = catalogue.rooms();

    // Weekly hours each lecturer cannot teach, as (day, slot) cells
    let mut lecturer_blocked: HashMap<LecturerId, HashSet<(u8, u8)>> = HashMap::new();
    for course in &courses {
        for &lecturer_id in catalogue.lecturers_for_course(course.id) {
            lecturer_blocked.entry(lecturer_id).or_insert_with(|| {
                catalogue
                    .unavailability_for(lecturer_id)
                    .iter()
                    .flat_map(|w| {
                        grid.window_indices(w.start_time, w.end_time)
                            .into_iter()
                            .map(move |h| (w.day_of_week, h))
                    })
                    .collect()
            });
        }
    }

    let mut candidates: Vec<Candidate> = Vec::new();
    let mut session_keys: Vec<SessionKey> = Vec::new();
    let mut unplaceable: Vec<SessionKey> = Vec::new();
    let mut theoretical_max: usize = 0;

    for course in &courses {
        let lecturer_ids = catalogue.lecturers_for_course(course.id);
        let group_ids = catalogue.groups_for_course(course.id);

        if course.total_hours() == 0 {
            continue;
        }
        if lecturer_ids.is_empty() {
            warn!(
                "Course '{}' has no lecturer assignment; dropping it from level {}",
                course.code, level
            );
            continue;
        }
        if group_ids.is_empty() {
            warn!(
                "Course '{}' has no group assignment; dropping it from level {}",
                course.code, level
            );
            continue;
        }

        let sessions = decompose_course(course);

        for session in &sessions {
            let admissible_rooms = compatible_rooms(course, session.session_type, rooms);
            if admissible_rooms.is_empty() {
                return Err(GeneratorError::NoCompatibleRoom {
                    course: course.code.clone(),
                    session_type: session.session_type,
                });
            }

            for &group_id in group_ids {
                let key = (course.id, group_id, session.ordinal);
                session_keys.push(key);
                let emitted_before = candidates.len();

                theoretical_max += DAYS_PER_WEEK as usize
                    * grid.slots_per_day as usize
                    * admissible_rooms.len()
                    * lecturer_ids.len();

                for (day, start) in iproduct!(0..DAYS_PER_WEEK, 0..grid.slots_per_day) {
                    if !grid.fits(start, session.duration) {
                        continue;
                    }
                    if frozen.blocks_group(day, start, session.duration, group_id) {
                        continue;
                    }

                    for room in &admissible_rooms {
                        if frozen.blocks_room(day, start, session.duration, room.id) {
                            continue;
                        }

                        for &lecturer_id in lecturer_ids {
                            if frozen.blocks_lecturer(day, start, session.duration, lecturer_id) {
                                continue;
                            }
                            let blocked = &lecturer_blocked[&lecturer_id];
                            if (start..start + session.duration)
                                .any(|h| blocked.contains(&(day, h)))
                            {
                                continue;
                            }

                            let penalty = catalogue
                                .lecturer(lecturer_id)
                                .map(|l| {
                                    placement_penalty(
                                        &l.preferences,
                                        start,
                                        session.duration,
                                        grid,
                                    )
                                })
                                .unwrap_or(0);

                            candidates.push(Candidate {
                                course_id: course.id,
                                group_id,
                                session: *session,
                                day,
                                start,
                                room_id: room.id,
                                lecturer_id,
                                penalty,
                            });
                        }
                    }
                }

                if candidates.len() == emitted_before {
                    warn!(
                        "No admissible placement for course '{}' session {} (group {})",
                        course.code, session.ordinal, group_id
                    );
                    unplaceable.push(key);
                }
            }
        }
    }

    info!(
        "Level {}: {} candidate variables for {} session blocks (theoretical maximum {})",
        level,
        candidates.len(),
        session_keys.len(),
        theoretical_max
    );

    Ok(LevelModel {
        level,
        candidates,
        session_keys,
        unplaceable,
    })
}
