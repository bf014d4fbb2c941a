//! Planner notifications.

use uuid::Uuid;

use crate::phase::WeekTransition;
use crate::state::TrainingPhase;
use crate::workouts::LoggedSet;

/// Planner operations that report failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    StartWorkout,
    LogSet,
    UndoLastSet,
    FinishWorkout,
    UpdateVolume,
    UpdateLandmarks,
    WeeklyProgression,
    PhaseChange,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Operation::StartWorkout => write!(f, "start workout"),
            Operation::LogSet => write!(f, "log set"),
            Operation::UndoLastSet => write!(f, "undo last set"),
            Operation::FinishWorkout => write!(f, "finish workout"),
            Operation::UpdateVolume => write!(f, "update volume"),
            Operation::UpdateLandmarks => write!(f, "update landmarks"),
            Operation::WeeklyProgression => write!(f, "weekly progression"),
            Operation::PhaseChange => write!(f, "phase change"),
        }
    }
}

/// Events emitted by the planner.
#[derive(Debug, Clone, PartialEq)]
pub enum PlannerEvent {
    /// A new session became active
    WorkoutStarted { session_id: Uuid },
    /// A set was appended to the active session
    SetLogged { set: LoggedSet, total_sets: u32 },
    /// The most recent set was removed
    SetUndone { set: LoggedSet, total_sets: u32 },
    /// The active session was completed and archived
    WorkoutFinished {
        session_id: Uuid,
        total_sets: u32,
        total_volume: f64,
    },
    /// A week of feedback was applied to the weekly sets
    VolumeProgressed { mrv_hits: u32, deload_triggered: bool },
    /// A week boundary was crossed
    WeekAdvanced(WeekTransition),
    /// The training phase changed
    PhaseChanged { phase: TrainingPhase },
    /// An operation was rejected; state is unchanged
    OperationFailed { operation: Operation, message: String },
    /// The snapshot could not be written
    PersistenceFailed { message: String },
}
