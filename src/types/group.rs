use super::{CourseId, DepartmentId, GroupId};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GroupType {
    General,
    #[default]
    Department,
    LabGroup,
    DrawingGroup,
    TutorialGroup,
}

/// A cohort of students taught together
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentGroup {
    pub id: GroupId,
    pub name: String,
    /// Academic level (year of study), 2-5
    pub level: u8,
    pub department_id: DepartmentId,
    pub size: u32,
    #[serde(default)]
    pub group_type: GroupType,
    #[serde(default, alias = "parent_group_id")]
    pub parent_group: Option<GroupId>,
    #[serde(default)]
    pub display_code: Option<String>,
}

/// Assignment of a student group to a course
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupAssignment {
    pub group_id: GroupId,
    pub course_id: CourseId,
}
