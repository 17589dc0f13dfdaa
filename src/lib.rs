//! Uni Timetabler - Constraint-based university timetable generator
//!
//! This library produces weekly timetables for an engineering school by
//! solving a boolean ILP per academic level.
//!
//! # Algorithm Overview
//!
//! Generation runs level by level in the fixed order 5 -> 4 -> 3 -> 2:
//! 1. **Decomposition**: Split each course into atomic session blocks
//!    (lecture / tutorial / practical) from its configured hours
//! 2. **Model Building**: Emit a boolean variable per admissible
//!    `(course, group, session, day, start, room, lecturer)` placement
//! 3. **Solving**: Minimise lecturer-preference penalties under session
//!    uniqueness and room/lecturer/group exclusion, within a time budget
//! 4. **Freezing**: Expand solved blocks into one-hour slots that become
//!    obstacles for every later level
//! 5. **Materialisation**: Commit all slots for the timetable atomically
//!
//! # Example
//!
//! ```no_run
//! use uni_timetabler::catalogue::load_catalogue_from_dir;
//! use uni_timetabler::progress::NullSink;
//! use uni_timetabler::scheduler::{GeneratorConfig, Orchestrator, RunRegistry};
//! use uni_timetabler::store::MemoryStore;
//! use uni_timetabler::types::{Timetable, TimetableId};
//! use std::path::Path;
//!
//! let catalogue = load_catalogue_from_dir(Path::new("./data/demo")).unwrap();
//! let config = GeneratorConfig::default();
//! let store = MemoryStore::new();
//! let registry = RunRegistry::new();
//! let mut timetable = Timetable {
//!     id: TimetableId(1),
//!     name: "Fall 2026".into(),
//!     semester: "Fall".into(),
//!     year: 2026,
//!     academic_half: Default::default(),
//!     is_active: false,
//!     generation_metadata: None,
//! };
//!
//! let outcome = Orchestrator::new(&catalogue, &config, &NullSink)
//!     .run(&mut timetable, &store, &registry)
//!     .unwrap();
//! println!("Placed {} hour slots", outcome.slots.len());
//! ```

pub mod catalogue;
pub mod error;
pub mod progress;
pub mod scheduler;
pub mod store;
pub mod types;
pub mod validator;

pub use error::{GeneratorError, Result};
