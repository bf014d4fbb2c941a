//! Workout session engine.
//!
//! Drives the single live session held by a `TrainingState`:
//! - start (at most one active session at a time)
//! - log and undo sets
//! - finish, which archives the session into history

use chrono::{DateTime, Utc};

use crate::error::PlannerError;
use crate::state::TrainingState;
use crate::workouts::types::{
    LoggedSet, SessionMetadata, SetInput, StartValidation, WorkoutSession, WorkoutStats,
};

/// Outcome of an undo: the session after removal plus the removed set.
#[derive(Debug)]
pub struct UndoResult<'s> {
    pub session: &'s WorkoutSession,
    pub removed_set: LoggedSet,
}

/// Workout session engine bound to a training state.
///
/// Every operation validates first and mutates second, so an error leaves
/// `current_workout` exactly as it was.
pub struct WorkoutSessionEngine<'a> {
    state: &'a mut TrainingState,
}

impl<'a> WorkoutSessionEngine<'a> {
    pub fn new(state: &'a mut TrainingState) -> Self {
        Self { state }
    }

    /// Check whether a new session may be started.
    pub fn validate_start(&self) -> StartValidation {
        match self.start_precondition() {
            Ok(()) => StartValidation {
                is_valid: true,
                reason: "Ready to start workout".to_string(),
            },
            Err(reason) => StartValidation {
                is_valid: false,
                reason,
            },
        }
    }

    fn start_precondition(&self) -> Result<(), String> {
        if self
            .state
            .current_workout
            .as_ref()
            .is_some_and(WorkoutSession::is_active)
        {
            return Err(
                "Another workout session is already active. Please end the current session first."
                    .to_string(),
            );
        }
        if !self.state.volume.is_configured() {
            return Err(
                "Volume landmarks not configured. Please complete Phase 1 setup first.".to_string(),
            );
        }
        Ok(())
    }

    /// Start a session now.
    pub fn start(&mut self) -> Result<&WorkoutSession, PlannerError> {
        self.start_at(Utc::now())
    }

    /// Start a session at a given time.
    pub fn start_at(&mut self, now: DateTime<Utc>) -> Result<&WorkoutSession, PlannerError> {
        if self
            .state
            .current_workout
            .as_ref()
            .is_some_and(WorkoutSession::is_active)
        {
            return Err(PlannerError::InvalidState(
                "Another workout session is already active".to_string(),
            ));
        }
        if !self.state.volume.is_configured() {
            return Err(PlannerError::Configuration(
                "Volume landmarks not configured".to_string(),
            ));
        }

        let metadata = SessionMetadata {
            week: self.state.week_no,
            mesocycle: self.state.block_no,
            program_version: self.state.program_version.clone(),
        };
        let session = WorkoutSession::new(now, metadata);

        tracing::info!(session_id = %session.id(), week = self.state.week_no, "Workout started");
        Ok(&*self.state.current_workout.insert(session))
    }

    /// Log a set against the active session now.
    pub fn log_set(&mut self, input: &SetInput) -> Result<LoggedSet, PlannerError> {
        self.log_set_at(input, Utc::now())
    }

    /// Log a set against the active session with an explicit timestamp.
    pub fn log_set_at(
        &mut self,
        input: &SetInput,
        at: DateTime<Utc>,
    ) -> Result<LoggedSet, PlannerError> {
        let session = self.state.current_workout.as_mut().ok_or_else(|| {
            PlannerError::InvalidState("No active workout session provided".to_string())
        })?;
        session.log_set(input, at)
    }

    /// Remove the most recent set from the active session.
    pub fn undo_last_set(&mut self) -> Result<UndoResult<'_>, PlannerError> {
        let session = self.state.current_workout.as_mut().ok_or_else(|| {
            PlannerError::InvalidState("No workout session provided".to_string())
        })?;
        let removed_set = session.undo_last_set()?;

        Ok(UndoResult {
            session,
            removed_set,
        })
    }

    /// Finish the active session now.
    pub fn finish(&mut self) -> Result<WorkoutSession, PlannerError> {
        self.finish_at(Utc::now())
    }

    /// Complete the active session, archive it, and clear the slot.
    pub fn finish_at(&mut self, now: DateTime<Utc>) -> Result<WorkoutSession, PlannerError> {
        let session = self
            .state
            .current_workout
            .as_mut()
            .ok_or(PlannerError::NoActiveSession)?;
        session.complete(now)?;

        let finished = self
            .state
            .current_workout
            .take()
            .ok_or(PlannerError::NoActiveSession)?;
        self.state.workout_history.push(finished.clone());

        tracing::info!(
            session_id = %finished.id(),
            total_sets = finished.total_sets(),
            total_volume = finished.total_volume(),
            "Workout finished"
        );
        Ok(finished)
    }

    /// Stats for the active session, or zeroed stats when there is none.
    pub fn stats(&self, now: DateTime<Utc>) -> WorkoutStats {
        self.state
            .current_workout
            .as_ref()
            .map(|s| s.stats(now))
            .unwrap_or_default()
    }
}
