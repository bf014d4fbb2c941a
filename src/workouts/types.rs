//! Workout session types.
//!
//! A `WorkoutSession` owns its exercises, each exercise owns its sets, and
//! the per-exercise and per-session totals are only ever written by the
//! session itself (see `session.rs`). Fields are private so callers can read
//! totals but never desynchronize them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::PlannerError;

/// Lifecycle of a workout session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    /// Accepting sets
    Active,
    /// Finished and archived
    Completed,
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One performed set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoggedSet {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub exercise: String,
    pub weight: f64,
    pub reps: u32,
    /// Reps in reserve, 0 to 10
    pub rir: Option<f64>,
    pub notes: String,
    /// 1-based position within the exercise
    pub set_number: u32,
    /// Session-wide insertion order, used to break timestamp ties
    pub sequence: u64,
}

impl LoggedSet {
    /// Weight times reps.
    pub fn volume(&self) -> f64 {
        self.weight * f64::from(self.reps)
    }
}

/// An exercise within a session and its sets in insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseRecord {
    pub(crate) name: String,
    pub(crate) sets: Vec<LoggedSet>,
    pub(crate) total_sets: u32,
    pub(crate) total_volume: f64,
    pub(crate) muscle_groups: Vec<String>,
}

impl ExerciseRecord {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn sets(&self) -> &[LoggedSet] {
        &self.sets
    }

    pub fn total_sets(&self) -> u32 {
        self.total_sets
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    pub fn muscle_groups(&self) -> &[String] {
        &self.muscle_groups
    }
}

/// Where the session sits in the training plan when it was started.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub week: u32,
    pub mesocycle: u32,
    pub program_version: String,
}

/// A live or completed workout.
///
/// Deserializing rebuilds the totals, set numbers and insertion counter from
/// the stored sets, so a restored session keeps the same invariants as one
/// built through `log_set`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "StoredSession")]
pub struct WorkoutSession {
    pub(crate) id: Uuid,
    pub(crate) start_time: DateTime<Utc>,
    pub(crate) end_time: Option<DateTime<Utc>>,
    pub(crate) status: SessionStatus,
    pub(crate) exercises: Vec<ExerciseRecord>,
    pub(crate) total_sets: u32,
    pub(crate) total_volume: f64,
    pub(crate) muscle_groups: Vec<String>,
    pub(crate) notes: String,
    pub(crate) metadata: SessionMetadata,
    #[serde(skip_serializing)]
    pub(crate) next_sequence: u64,
}

/// Serialized form of a session. Derived totals are ignored on load.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredSession {
    id: Uuid,
    start_time: DateTime<Utc>,
    #[serde(default)]
    end_time: Option<DateTime<Utc>>,
    status: SessionStatus,
    #[serde(default)]
    exercises: Vec<ExerciseRecord>,
    #[serde(default)]
    notes: String,
    metadata: SessionMetadata,
}

impl TryFrom<StoredSession> for WorkoutSession {
    type Error = PlannerError;

    fn try_from(stored: StoredSession) -> Result<Self, Self::Error> {
        if let Some(empty) = stored.exercises.iter().find(|e| e.sets.is_empty()) {
            return Err(PlannerError::EmptySession(format!(
                "Exercise {} has no sets",
                empty.name
            )));
        }

        let mut session = Self {
            id: stored.id,
            start_time: stored.start_time,
            end_time: stored.end_time,
            status: stored.status,
            exercises: stored.exercises,
            total_sets: 0,
            total_volume: 0.0,
            muscle_groups: Vec::new(),
            notes: stored.notes,
            metadata: stored.metadata,
            next_sequence: 0,
        };
        session.rebuild();
        Ok(session)
    }
}

impl WorkoutSession {
    /// Create an active, empty session.
    pub fn new(start_time: DateTime<Utc>, metadata: SessionMetadata) -> Self {
        Self {
            id: Uuid::new_v4(),
            start_time,
            end_time: None,
            status: SessionStatus::Active,
            exercises: Vec::new(),
            total_sets: 0,
            total_volume: 0.0,
            muscle_groups: Vec::new(),
            notes: String::new(),
            metadata,
            next_sequence: 0,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn start_time(&self) -> DateTime<Utc> {
        self.start_time
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.end_time
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn exercises(&self) -> &[ExerciseRecord] {
        &self.exercises
    }

    /// Look up an exercise by exact name.
    pub fn exercise(&self, name: &str) -> Option<&ExerciseRecord> {
        self.exercises.iter().find(|e| e.name == name)
    }

    pub fn total_sets(&self) -> u32 {
        self.total_sets
    }

    pub fn total_volume(&self) -> f64 {
        self.total_volume
    }

    /// Deduplicated union of the exercises' muscle groups.
    pub fn muscle_groups(&self) -> &[String] {
        &self.muscle_groups
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn metadata(&self) -> &SessionMetadata {
        &self.metadata
    }
}

/// Caller-supplied data for a new set. Validated before anything is written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInput {
    pub exercise: String,
    pub weight: f64,
    pub reps: i64,
    #[serde(default)]
    pub rir: Option<f64>,
    #[serde(default)]
    pub notes: String,
}

impl SetInput {
    pub fn new(exercise: impl Into<String>, weight: f64, reps: i64) -> Self {
        Self {
            exercise: exercise.into(),
            weight,
            reps,
            rir: None,
            notes: String::new(),
        }
    }

    pub fn with_rir(mut self, rir: f64) -> Self {
        self.rir = Some(rir);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }
}

/// Result of a pre-start check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartValidation {
    pub is_valid: bool,
    pub reason: String,
}

/// Summary figures for a session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutStats {
    /// Whole minutes since the session started
    pub duration: i64,
    pub sets_completed: u32,
    pub total_volume: f64,
    /// Mean RIR over sets that recorded one, to one decimal
    #[serde(rename = "averageRIR")]
    pub average_rir: f64,
    pub muscles_worked: Vec<String>,
}
