use crate::types::{SessionType, TimetableId};
use thiserror::Error;

/// Domain-specific errors for the timetable generator
#[derive(Error, Debug)]
pub enum GeneratorError {
    // Input/Parse errors
    #[error("Failed to read file '{path}': {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse JSON in '{file}': {message}")]
    JsonParse { file: String, message: String },

    // Catalogue errors
    #[error("Catalogue is inconsistent: {0}")]
    CatalogueInconsistent(String),

    #[error("Invalid generator config: {0}")]
    InvalidConfig(String),

    #[error("No compatible room for course '{course}' ({session_type} session)")]
    NoCompatibleRoom {
        course: String,
        session_type: SessionType,
    },

    // Solver errors
    #[error("ILP solver failed: {0}")]
    SolverFailed(String),

    #[error("No feasible timetable for level {level}")]
    LevelInfeasible { level: u8 },

    #[error("Solver budget of {seconds}s exhausted on level {level} without a solution")]
    LevelTimeout { level: u8, seconds: u64 },

    // Run lifecycle errors
    #[error("Failed to persist timetable {timetable}: {message}")]
    Persistence {
        timetable: TimetableId,
        message: String,
    },

    #[error("Generation already in progress for timetable {0}")]
    GenerationInProgress(TimetableId),

    #[error("Generation cancelled")]
    Cancelled,
}

/// Use anyhow::Result at application boundaries
pub type Result<T> = anyhow::Result<T>;
