//! Powerhouse - Strength Training Periodization Engine
//!
//! Tracks per-muscle volume landmarks (MV/MEV/MAV/MRV), assesses fatigue,
//! drives the accumulation/deload/resensitization phase cycle and records
//! live workout sessions with set logging and undo. All state lives in one
//! `TrainingState` aggregate that can be snapshotted to JSON.

pub mod error;
pub mod events;
pub mod fatigue;
pub mod phase;
pub mod planner;
pub mod state;
pub mod storage;
pub mod volume;
pub mod workouts;

// Re-export commonly used types
pub use error::{PlannerError, PlannerResult};
pub use events::PlannerEvent;
pub use phase::controller::PhaseController;
pub use planner::{Planner, SharedPlanner};
pub use state::{TrainingPhase, TrainingState};
pub use storage::config::AppConfig;
pub use volume::{MuscleLandmarks, VolumeLandmarkStore, VolumeStatus};
pub use workouts::engine::WorkoutSessionEngine;
