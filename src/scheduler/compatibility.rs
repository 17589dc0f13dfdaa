use crate::types::{Course, Room, RoomKind, SessionType};

/// Rooms admissible for one session of a course.
///
/// A concrete `preferred_room_type` matches strictly by the kind's
/// canonical token against the room's legacy type string. `Any` admits
/// every room but orders type-appropriate rooms first (lecture halls for
/// lectures, labs for practicals) so ties break towards them.
///
/// An empty result means the course cannot be scheduled; callers surface
/// that as a `NoCompatibleRoom` error.
pub fn compatible_rooms<'a>(
    course: &Course,
    session_type: SessionType,
    rooms: &'a [Room],
) -> Vec<&'a Room> {
    match course.preferred_room_type {
        RoomKind::Any => {
            let preferred_token = match session_type {
                SessionType::Lecture => Some("lecture"),
                SessionType::Practical => Some("lab"),
                SessionType::Tutorial => None,
            };

            let mut compatible: Vec<&Room> = rooms.iter().collect();
            if let Some(token) = preferred_token {
                compatible.sort_by_key(|r| !r.room_type.to_lowercase().contains(token));
            }
            compatible
        }
        kind => rooms.iter().filter(|r| kind.matches(&r.room_type)).collect(),
    }
}
