//! Live workout sessions: set logging, undo and completion.

pub mod engine;
pub mod muscle_map;
pub mod session;
pub mod types;

pub use engine::{UndoResult, WorkoutSessionEngine};
pub use muscle_map::muscle_groups_for;
pub use types::{
    ExerciseRecord, LoggedSet, SessionMetadata, SessionStatus, SetInput, StartValidation,
    WorkoutSession, WorkoutStats,
};
