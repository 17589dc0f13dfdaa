use super::{CourseId, DepartmentId, LecturerId, RoomKind, SessionType};
use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

/// Teaching-time preferences, weighted as soft terms in the objective
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TeachingPreferences {
    /// Penalise sessions starting in the first slot of the day
    #[serde(default)]
    pub avoid_early_morning: bool,
    /// Penalise sessions touching 17:00 or later
    #[serde(default)]
    pub avoid_late_afternoon: bool,
    /// Preferred weekday indices (0-4); declared, not yet weighted
    #[serde(default)]
    pub preferred_days: Vec<u8>,
}

/// A lecturer with department affiliation and scheduling preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lecturer {
    pub id: LecturerId,
    pub staff_number: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    pub department_id: DepartmentId,
    #[serde(default = "default_max_hours_per_week")]
    pub max_hours_per_week: u8,
    #[serde(default, alias = "teaching_preferences")]
    pub preferences: TeachingPreferences,
}

fn default_max_hours_per_week() -> u8 {
    20
}

/// A recurring weekly window during which a lecturer cannot teach
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnavailabilityWindow {
    pub lecturer_id: LecturerId,
    /// Day of week (0-4 for Mon-Fri)
    pub day_of_week: u8,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// Assignment of a lecturer to teach a course
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LecturerAssignment {
    pub lecturer_id: LecturerId,
    pub course_id: CourseId,
    /// Restrict the assignment to one session type; `None` covers all
    #[serde(default)]
    pub session_type: Option<SessionType>,
    #[serde(default)]
    pub room_preference: Option<RoomKind>,
    #[serde(default)]
    pub group_division_required: bool,
    #[serde(default = "default_expertise_level")]
    pub expertise_level: String,
}

fn default_expertise_level() -> String {
    "primary".to_string()
}
