use super::{CourseId, DepartmentId, SessionType};
use serde::{Deserialize, Deserializer, Serialize};

/// Room kind a course prefers for its sessions.
///
/// Matching against the legacy free-form `Room::room_type` string is by
/// case-insensitive substring on the kind's canonical token(s).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum RoomKind {
    LectureHall,
    DrawingRoom,
    SeminarRoom,
    Lab,
    SurveyingRoom,
    #[default]
    Any,
}

impl RoomKind {
    /// Strict compatibility check against a legacy room-type string
    pub fn matches(&self, room_type: &str) -> bool {
        let ty = room_type.to_lowercase();
        match self {
            RoomKind::LectureHall => ty.contains("lecture") || ty.contains("class"),
            RoomKind::Lab => ty.contains("lab"),
            RoomKind::DrawingRoom => ty.contains("drawing"),
            RoomKind::SurveyingRoom => ty.contains("surveying"),
            RoomKind::SeminarRoom => ty.contains("seminar"),
            RoomKind::Any => true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CourseType {
    #[default]
    DepartmentSpecific,
    General,
    MultiDepartment,
}

/// How a course's enrolled groups are divided for teaching.
/// Declared for catalogue round-tripping; the solver schedules whole groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupDivisionType {
    #[default]
    FullGroup,
    LabGroups,
    DrawingGroups,
    TutorialGroups,
}

/// Typed session configuration.
///
/// `requires_consecutive` is the lecture block length in hours. Legacy
/// catalogues store a boolean; `true` coerces to 2 and `false` to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SessionConfig {
    #[serde(
        default = "default_requires_consecutive",
        deserialize_with = "de_requires_consecutive"
    )]
    pub requires_consecutive: u8,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            requires_consecutive: 1,
        }
    }
}

fn default_requires_consecutive() -> u8 {
    1
}

fn de_requires_consecutive<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Flag(bool),
        Hours(u8),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Flag(true) => 2,
        Raw::Flag(false) => 1,
        Raw::Hours(h) => h,
    })
}

// Legacy catalogues store an explicit null for "no configuration"
fn de_session_config<'de, D>(deserializer: D) -> Result<SessionConfig, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<SessionConfig>::deserialize(deserializer)?.unwrap_or_default())
}

/// A course offering with its weekly hour requirements
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub code: String,
    pub name: String,
    pub department_id: DepartmentId,
    /// Academic level (year of study), 2-5
    pub level: u8,
    #[serde(default)]
    pub credits: u8,
    pub lecture_hours: u8,
    #[serde(default)]
    pub tutorial_hours: u8,
    #[serde(default)]
    pub practical_hours: u8,
    #[serde(default)]
    pub preferred_room_type: RoomKind,
    #[serde(default)]
    pub course_type: CourseType,
    #[serde(
        default,
        alias = "session_configuration",
        deserialize_with = "de_session_config"
    )]
    pub session_config: SessionConfig,
    #[serde(default)]
    pub group_division_type: GroupDivisionType,
}

impl Course {
    /// Total weekly teaching hours across all session types
    pub fn total_hours(&self) -> u8 {
        self.lecture_hours + self.tutorial_hours + self.practical_hours
    }

    /// Required weekly hours for one session type
    pub fn hours_for(&self, session_type: SessionType) -> u8 {
        match session_type {
            SessionType::Lecture => self.lecture_hours,
            SessionType::Tutorial => self.tutorial_hours,
            SessionType::Practical => self.practical_hours,
        }
    }
}
