use super::CourseId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of teaching session a course requires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionType {
    Lecture,
    Tutorial,
    Practical,
}

impl SessionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionType::Lecture => "lecture",
            SessionType::Tutorial => "tutorial",
            SessionType::Practical => "practical",
        }
    }
}

impl fmt::Display for SessionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An atomic teaching block emitted by the session decomposer.
/// Transient: lives for the duration of one level solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionBlock {
    pub course_id: CourseId,
    /// Position in the course's decomposition order
    pub ordinal: usize,
    pub session_type: SessionType,
    /// Block length in one-hour slots
    pub duration: u8,
}
