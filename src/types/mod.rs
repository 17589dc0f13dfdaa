mod course;
mod department;
mod grid;
mod group;
mod lecturer;
mod room;
mod session;
mod slot;

pub use course::*;
pub use department::*;
pub use grid::*;
pub use group::*;
pub use lecturer::*;
pub use room::*;
pub use session::*;
pub use slot::*;

use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
        )]
        pub struct $name(pub u32);

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

id_newtype!(
    /// Newtype for department identifiers
    DepartmentId
);
id_newtype!(
    /// Newtype for course identifiers
    CourseId
);
id_newtype!(
    /// Newtype for lecturer identifiers
    LecturerId
);
id_newtype!(
    /// Newtype for room identifiers
    RoomId
);
id_newtype!(
    /// Newtype for student-group identifiers
    GroupId
);
id_newtype!(
    /// Newtype for timetable identifiers
    TimetableId
);
