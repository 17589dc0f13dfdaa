use super::{CourseId, GroupId, LecturerId, RoomId, SessionType, TimeGrid, TimetableId};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// One persisted hour of teaching.
///
/// Multi-hour session blocks are stored expanded: a block of duration `d`
/// becomes `d` adjacent records sharing everything but `start_time` /
/// `end_time`. Consumers needing blocks re-aggregate with
/// [`reassemble_blocks`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlacedSlot {
    pub course_id: CourseId,
    pub lecturer_id: LecturerId,
    pub room_id: RoomId,
    pub group_id: GroupId,
    /// Day of week (0-4 for Mon-Fri)
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub session_type: SessionType,
}

/// The tuple under which expanded hour records of one block agree
pub type SlotIdentity = (CourseId, GroupId, LecturerId, RoomId, u8, SessionType);

impl PlacedSlot {
    pub fn identity(&self) -> SlotIdentity {
        (
            self.course_id,
            self.group_id,
            self.lecturer_id,
            self.room_id,
            self.day_of_week,
            self.session_type,
        )
    }
}

/// A contiguous session block reconstructed from expanded hour records
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlotBlock {
    pub course_id: CourseId,
    pub lecturer_id: LecturerId,
    pub room_id: RoomId,
    pub group_id: GroupId,
    pub day_of_week: u8,
    pub start_idx: u8,
    pub duration: u8,
    pub session_type: SessionType,
}

/// Re-group expanded hour records into contiguous blocks by identity tuple.
/// Hours that fall outside the grid are skipped.
pub fn reassemble_blocks(slots: &[PlacedSlot], grid: &TimeGrid) -> Vec<SlotBlock> {
    let mut hours: Vec<(SlotIdentity, u8)> = slots
        .iter()
        .filter_map(|s| grid.time_to_idx(s.start_time).map(|idx| (s.identity(), idx)))
        .collect();
    hours.sort();
    hours.dedup();

    let mut blocks: Vec<SlotBlock> = Vec::new();
    for (identity, idx) in hours {
        let (course_id, group_id, lecturer_id, room_id, day_of_week, session_type) = identity;

        // Extend the previous block when this hour continues it
        if let Some(last) = blocks.last_mut() {
            let same_identity = last.course_id == course_id
                && last.group_id == group_id
                && last.lecturer_id == lecturer_id
                && last.room_id == room_id
                && last.day_of_week == day_of_week
                && last.session_type == session_type;
            if same_identity && last.start_idx + last.duration == idx {
                last.duration += 1;
                continue;
            }
        }

        blocks.push(SlotBlock {
            course_id,
            lecturer_id,
            room_id,
            group_id,
            day_of_week,
            start_idx: idx,
            duration: 1,
            session_type,
        });
    }
    blocks
}

/// First or second half of the academic year
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AcademicHalf {
    #[default]
    FirstHalf,
    SecondHalf,
}

/// Metadata stamped onto a timetable by a successful generation run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationMetadata {
    pub generated: bool,
    pub levels_processed: Vec<u8>,
    pub generated_at: String,
    pub generator_version: String,
}

/// A named weekly timetable for one semester
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Timetable {
    pub id: TimetableId,
    pub name: String,
    pub semester: String,
    pub year: u16,
    #[serde(default)]
    pub academic_half: AcademicHalf,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub generation_metadata: Option<GenerationMetadata>,
}
