use super::RoomId;
use serde::{Deserialize, Serialize};

/// Fine-grained room classification from the facilities inventory
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoomCategory {
    LectureHallLarge,
    LectureHallMedium,
    LectureHallSmall,
    DrawingRoom,
    ComputerLab,
    MechanicalLab,
    ElectricalLab,
    SurveyingRoom,
    SeminarRoom,
    ConferenceRoom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomPriority {
    #[default]
    Standard,
    High,
}

/// A physical teaching room.
///
/// `room_type` is the legacy free-form string the compatibility filter
/// matches against; `room_category` is the typed classification newer
/// catalogues carry alongside it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Room {
    pub id: RoomId,
    pub name: String,
    pub building: String,
    pub capacity: u32,
    pub room_type: String,
    #[serde(default)]
    pub room_category: Option<RoomCategory>,
    /// Department the room is earmarked for; not enforced by the solver
    #[serde(default)]
    pub department_affinity: Option<String>,
    #[serde(default)]
    pub equipment: Vec<String>,
    #[serde(default)]
    pub availability: Option<String>,
    #[serde(default)]
    pub priority: RoomPriority,
}
