//! Session mutations: log, undo, complete.
//!
//! After every mutation the following hold:
//! - each exercise's totals match its own sets,
//! - session totals are the sum over exercises,
//! - session muscle groups are the deduplicated union over exercises,
//! - set numbers within an exercise run 1..=n,
//! - no exercise is left without sets.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::error::PlannerError;
use crate::workouts::muscle_map::muscle_groups_for;
use crate::workouts::types::{
    ExerciseRecord, LoggedSet, SessionStatus, SetInput, WorkoutSession, WorkoutStats,
};

/// Highest accepted RIR.
pub const MAX_RIR: f64 = 10.0;

/// A valid set ready to be appended.
struct ValidSet {
    exercise: String,
    weight: f64,
    reps: u32,
    rir: Option<f64>,
    notes: String,
}

fn validate(input: &SetInput) -> Result<ValidSet, PlannerError> {
    let exercise = input.exercise.trim();
    if exercise.is_empty() {
        return Err(PlannerError::Validation("Exercise name is required".to_string()));
    }

    if !input.weight.is_finite() || input.weight < 0.0 {
        return Err(PlannerError::Validation("Valid weight is required".to_string()));
    }

    let reps = u32::try_from(input.reps)
        .map_err(|_| PlannerError::Validation("Valid reps count is required".to_string()))?;

    if let Some(rir) = input.rir {
        if !rir.is_finite() || !(0.0..=MAX_RIR).contains(&rir) {
            return Err(PlannerError::Validation(
                "RIR must be between 0 and 10".to_string(),
            ));
        }
    }

    Ok(ValidSet {
        exercise: exercise.to_string(),
        weight: input.weight,
        reps,
        rir: input.rir,
        notes: input.notes.clone(),
    })
}

impl WorkoutSession {
    /// Append a set, creating the exercise on first use.
    ///
    /// The input is fully validated before the session is touched.
    pub fn log_set(
        &mut self,
        input: &SetInput,
        at: DateTime<Utc>,
    ) -> Result<LoggedSet, PlannerError> {
        if self.status != SessionStatus::Active {
            return Err(PlannerError::InvalidState(
                "Cannot log set - workout session is not active".to_string(),
            ));
        }
        let valid = validate(input)?;

        let index = match self.exercises.iter().position(|e| e.name == valid.exercise) {
            Some(i) => i,
            None => {
                self.exercises.push(ExerciseRecord {
                    muscle_groups: muscle_groups_for(&valid.exercise),
                    name: valid.exercise.clone(),
                    sets: Vec::new(),
                    total_sets: 0,
                    total_volume: 0.0,
                });
                self.exercises.len() - 1
            }
        };

        let sequence = self.next_sequence;
        self.next_sequence += 1;

        let exercise = &mut self.exercises[index];
        let set = LoggedSet {
            id: Uuid::new_v4(),
            timestamp: at,
            exercise: valid.exercise,
            weight: valid.weight,
            reps: valid.reps,
            rir: valid.rir,
            notes: valid.notes,
            set_number: exercise.sets.len() as u32 + 1,
            sequence,
        };
        exercise.sets.push(set.clone());
        exercise.recompute();
        self.recompute();

        tracing::debug!(
            exercise = %set.exercise,
            set_number = set.set_number,
            total_sets = self.total_sets,
            "Set logged"
        );
        Ok(set)
    }

    /// Remove the most recent set and return it.
    ///
    /// "Most recent" is the greatest `(timestamp, sequence)`, so among sets
    /// sharing a timestamp the one inserted last is removed.
    pub fn undo_last_set(&mut self) -> Result<LoggedSet, PlannerError> {
        if self.status != SessionStatus::Active {
            return Err(PlannerError::InvalidState(
                "Cannot undo set - workout session is not active".to_string(),
            ));
        }
        if self.exercises.is_empty() {
            return Err(PlannerError::EmptySession(
                "No exercises found in current session".to_string(),
            ));
        }

        let (exercise_idx, set_idx) = self
            .exercises
            .iter()
            .enumerate()
            .flat_map(|(ei, e)| e.sets.iter().enumerate().map(move |(si, s)| (ei, si, s)))
            .max_by_key(|(_, _, s)| (s.timestamp, s.sequence))
            .map(|(ei, si, _)| (ei, si))
            .ok_or_else(|| PlannerError::EmptySession("No sets found to undo".to_string()))?;

        let exercise = &mut self.exercises[exercise_idx];
        let removed = exercise.sets.remove(set_idx);
        for (i, set) in exercise.sets.iter_mut().enumerate() {
            set.set_number = i as u32 + 1;
        }
        exercise.recompute();

        if exercise.sets.is_empty() {
            self.exercises.remove(exercise_idx);
        }
        self.recompute();

        tracing::debug!(
            exercise = %removed.exercise,
            set_number = removed.set_number,
            total_sets = self.total_sets,
            "Set undone"
        );
        Ok(removed)
    }

    /// Mark the session completed. There is no way back to active.
    pub fn complete(&mut self, at: DateTime<Utc>) -> Result<(), PlannerError> {
        if self.status != SessionStatus::Active {
            return Err(PlannerError::InvalidState(
                "Workout session is not active".to_string(),
            ));
        }
        self.status = SessionStatus::Completed;
        self.end_time = Some(at);
        Ok(())
    }

    /// Summary figures as of `now` (or the end time once completed).
    pub fn stats(&self, now: DateTime<Utc>) -> WorkoutStats {
        let until = self.end_time.unwrap_or(now);
        let duration = (until - self.start_time).num_minutes().max(0);

        let rirs: Vec<f64> = self
            .exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .filter_map(|s| s.rir)
            .collect();
        let average_rir = if rirs.is_empty() {
            0.0
        } else {
            let mean = rirs.iter().sum::<f64>() / rirs.len() as f64;
            (mean * 10.0).round() / 10.0
        };

        WorkoutStats {
            duration,
            sets_completed: self.total_sets,
            total_volume: self.total_volume,
            average_rir,
            muscles_worked: self.muscle_groups.clone(),
        }
    }

    /// Restore derived fields after loading: set numbers, totals and the
    /// next insertion sequence.
    pub(crate) fn rebuild(&mut self) {
        for exercise in &mut self.exercises {
            for (i, set) in exercise.sets.iter_mut().enumerate() {
                set.set_number = i as u32 + 1;
            }
            exercise.recompute();
        }
        self.next_sequence = self
            .exercises
            .iter()
            .flat_map(|e| e.sets.iter())
            .map(|s| s.sequence + 1)
            .max()
            .unwrap_or(0);
        self.recompute();
    }

    fn recompute(&mut self) {
        self.total_sets = self.exercises.iter().map(|e| e.total_sets).sum();
        self.total_volume = self.exercises.iter().map(|e| e.total_volume).sum();

        let mut groups: Vec<String> = Vec::new();
        for group in self.exercises.iter().flat_map(|e| e.muscle_groups.iter()) {
            if !groups.contains(group) {
                groups.push(group.clone());
            }
        }
        self.muscle_groups = groups;
    }
}

impl ExerciseRecord {
    fn recompute(&mut self) {
        self.total_sets = self.sets.len() as u32;
        self.total_volume = self.sets.iter().map(LoggedSet::volume).sum();
    }
}
