//! Planner service.
//!
//! `Planner` owns the one `TrainingState` of a process and is the surface
//! that UIs and the CLI call. After every successful mutation it saves a
//! snapshot (when a store is attached) and announces the outcome on an
//! optional event channel. Failures are returned to the caller and also
//! announced, and never leave a partially mutated state behind.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Utc};
use crossbeam::channel::{Receiver, Sender};

use crate::error::PlannerError;
use crate::events::{Operation, PlannerEvent};
use crate::fatigue::{
    self, FatigueAccumulation, FatigueAssessment, FatigueFeedback, FrequencyAnalysis,
    FrequencyConstraints, FrequencyRecommendation, OverreachingMetrics, OverreachingRisk,
    RecoveryOptions, RecoveryPlan, WeeklyFatigueData,
};
use crate::phase::{
    self, DeloadAnalysis, DeloadStatus, DeloadStrategy, DeloadTrigger, WeekTransition,
};
use crate::state::{StateSummary, TrainingState};
use crate::storage::config::AppConfig;
use crate::storage::snapshot::{restore_state, JsonFileStore, StateStore};
use crate::volume::{
    self, score_stimulus, LandmarkUpdate, MuscleLandmarks, SessionFeedback, SetIncrement,
    StimulusFeedback, StimulusScore, VolumeAnalysis, VolumeProgression, VolumeStatus,
    VolumeValidation, WeeklyMuscleFeedback, WeeklyProgression,
};
use crate::workouts::{LoggedSet, SetInput, StartValidation, WorkoutSession, WorkoutStats};

/// Planner shared between threads. All mutations go through the one lock.
pub type SharedPlanner = Arc<Mutex<Planner>>;

/// Result of undoing a set.
#[derive(Debug, Clone, PartialEq)]
pub struct UndoOutcome {
    pub session: WorkoutSession,
    pub removed_set: LoggedSet,
}

/// Owns the training state and persists it after each change.
pub struct Planner {
    state: TrainingState,
    store: Option<Box<dyn StateStore>>,
    event_tx: Option<Sender<PlannerEvent>>,
    save_after_mutation: bool,
}

impl Planner {
    /// Planner over an existing state with no persistence.
    pub fn new(state: TrainingState) -> Self {
        Self {
            state,
            store: None,
            event_tx: None,
            save_after_mutation: false,
        }
    }

    /// Planner restored from `store` (falling back to `base`) that saves back into it.
    pub fn with_store(store: Box<dyn StateStore>, base: TrainingState) -> Self {
        let state = restore_state(store.as_ref(), base);
        Self {
            state,
            store: Some(store),
            event_tx: None,
            save_after_mutation: true,
        }
    }

    /// Planner configured from application settings, backed by the JSON snapshot file.
    pub fn open(config: &AppConfig) -> Result<Self, PlannerError> {
        let base = TrainingState::from_settings(&config.planner)?;
        let store = JsonFileStore::new(config.state_path());
        let mut planner = Self::with_store(Box::new(store), base);
        planner.save_after_mutation = config.persistence.save_after_mutation;
        Ok(planner)
    }

    /// Wrap in a lock for sharing.
    pub fn shared(self) -> SharedPlanner {
        Arc::new(Mutex::new(self))
    }

    /// Get an event receiver. Replaces any previous receiver.
    pub fn event_receiver(&mut self) -> Receiver<PlannerEvent> {
        let (tx, rx) = crossbeam::channel::unbounded();
        self.event_tx = Some(tx);
        rx
    }

    /// Read-only view of the state.
    pub fn state(&self) -> &TrainingState {
        &self.state
    }

    /// Give up the planner and keep the state.
    pub fn into_state(self) -> TrainingState {
        self.state
    }

    fn send_event(&self, event: PlannerEvent) {
        if let Some(tx) = &self.event_tx {
            let _ = tx.send(event);
        }
    }

    /// Write a snapshot. Save failures are logged and announced but do not
    /// fail the operation that triggered them.
    fn persist(&self) {
        if !self.save_after_mutation {
            return;
        }
        let Some(store) = &self.store else {
            return;
        };

        if let Err(e) = store.save(&self.state.to_snapshot()) {
            tracing::error!(error = %e, "Failed to save training state");
            self.send_event(PlannerEvent::PersistenceFailed {
                message: e.to_string(),
            });
        }
    }

    /// Force a save regardless of `save_after_mutation`.
    pub fn save(&self) -> Result<(), crate::storage::StorageError> {
        match &self.store {
            Some(store) => store.save(&self.state.to_snapshot()),
            None => Ok(()),
        }
    }

    fn report<T>(&self, operation: Operation, result: Result<T, PlannerError>) -> Result<T, PlannerError> {
        if let Err(e) = &result {
            tracing::warn!(%operation, error = %e, "Operation failed");
            self.send_event(PlannerEvent::OperationFailed {
                operation,
                message: e.to_string(),
            });
        }
        result
    }

    fn phase_changed(&self) {
        self.persist();
        self.send_event(PlannerEvent::PhaseChanged {
            phase: self.state.phase(),
        });
    }

    // Workout sessions

    pub fn validate_workout_start(&mut self) -> StartValidation {
        self.state.workout_engine().validate_start()
    }

    pub fn current_workout(&self) -> Option<&WorkoutSession> {
        self.state.current_workout()
    }

    pub fn start_workout(&mut self) -> Result<WorkoutSession, PlannerError> {
        self.start_workout_at(Utc::now())
    }

    pub fn start_workout_at(&mut self, now: DateTime<Utc>) -> Result<WorkoutSession, PlannerError> {
        let result = self.state.workout_engine().start_at(now).cloned();
        let session = self.report(Operation::StartWorkout, result)?;

        self.persist();
        self.send_event(PlannerEvent::WorkoutStarted {
            session_id: session.id(),
        });
        Ok(session)
    }

    pub fn log_set(&mut self, input: &SetInput) -> Result<LoggedSet, PlannerError> {
        self.log_set_at(input, Utc::now())
    }

    pub fn log_set_at(&mut self, input: &SetInput, at: DateTime<Utc>) -> Result<LoggedSet, PlannerError> {
        let result = self.state.workout_engine().log_set_at(input, at);
        let set = self.report(Operation::LogSet, result)?;

        let total_sets = self.state.current_workout().map_or(0, WorkoutSession::total_sets);
        self.persist();
        self.send_event(PlannerEvent::SetLogged {
            set: set.clone(),
            total_sets,
        });
        Ok(set)
    }

    pub fn undo_last_set(&mut self) -> Result<UndoOutcome, PlannerError> {
        let result = self
            .state
            .workout_engine()
            .undo_last_set()
            .map(|undo| UndoOutcome {
                session: undo.session.clone(),
                removed_set: undo.removed_set,
            });
        let outcome = self.report(Operation::UndoLastSet, result)?;

        self.persist();
        self.send_event(PlannerEvent::SetUndone {
            set: outcome.removed_set.clone(),
            total_sets: outcome.session.total_sets(),
        });
        Ok(outcome)
    }

    pub fn finish_workout(&mut self) -> Result<WorkoutSession, PlannerError> {
        self.finish_workout_at(Utc::now())
    }

    pub fn finish_workout_at(&mut self, now: DateTime<Utc>) -> Result<WorkoutSession, PlannerError> {
        let result = self.state.workout_engine().finish_at(now);
        let session = self.report(Operation::FinishWorkout, result)?;

        self.persist();
        self.send_event(PlannerEvent::WorkoutFinished {
            session_id: session.id(),
            total_sets: session.total_sets(),
            total_volume: session.total_volume(),
        });
        Ok(session)
    }

    pub fn workout_stats(&mut self, now: DateTime<Utc>) -> WorkoutStats {
        self.state.workout_engine().stats(now)
    }

    // Volume

    pub fn volume_status(&self, muscle: &str, sets: Option<u32>) -> Result<VolumeStatus, PlannerError> {
        self.state.volume_status(muscle, sets)
    }

    pub fn update_weekly_sets(&mut self, muscle: &str, sets: i64) -> Result<u32, PlannerError> {
        let result = self.state.volume.update_weekly_sets(muscle, sets);
        let sets = self.report(Operation::UpdateVolume, result)?;
        self.persist();
        Ok(sets)
    }

    pub fn add_sets(&mut self, muscle: &str, delta: i64) -> Result<u32, PlannerError> {
        let result = self.state.volume.add_sets(muscle, delta);
        let sets = self.report(Operation::UpdateVolume, result)?;
        self.persist();
        Ok(sets)
    }

    pub fn update_volume_landmarks(
        &mut self,
        muscle: &str,
        update: &LandmarkUpdate,
    ) -> Result<MuscleLandmarks, PlannerError> {
        let result = self.state.volume.update_landmarks(muscle, update);
        let landmarks = self.report(Operation::UpdateLandmarks, result)?;
        self.persist();
        Ok(landmarks)
    }

    /// Score a session's stimulus and suggest next session's set change.
    pub fn score_stimulus(&self, feedback: StimulusFeedback) -> StimulusScore {
        score_stimulus(feedback)
    }

    pub fn analyze_volume_status(&self, muscle: &str, sets: Option<u32>) -> Result<VolumeAnalysis, PlannerError> {
        volume::analyze_volume_status(&self.state.volume, muscle, sets)
    }

    pub fn validate_volume_input(&self, muscle: &str, proposed_sets: i64) -> Result<VolumeValidation, PlannerError> {
        volume::validate_volume_input(&self.state.volume, muscle, proposed_sets)
    }

    pub fn auto_set_increment(
        &self,
        muscle: &str,
        feedback: &WeeklyMuscleFeedback,
    ) -> Result<SetIncrement, PlannerError> {
        volume::auto_set_increment(&self.state.volume, muscle, feedback)
    }

    /// Next session's sets for a muscle from its last session's feedback.
    pub fn get_volume_progression(
        &self,
        muscle: &str,
        feedback: &SessionFeedback,
    ) -> Result<VolumeProgression, PlannerError> {
        volume::get_volume_progression(&self.state, muscle, feedback)
    }

    /// Apply a week of per-muscle feedback. May start a deload.
    pub fn process_weekly_volume_progression(
        &mut self,
        feedback: &BTreeMap<String, WeeklyMuscleFeedback>,
    ) -> Result<WeeklyProgression, PlannerError> {
        let before = self.state.phase();
        let result = volume::process_weekly_volume_progression(&mut self.state, feedback);
        let progression = self.report(Operation::WeeklyProgression, result)?;

        self.persist();
        self.send_event(PlannerEvent::VolumeProgressed {
            mrv_hits: progression.mrv_hits,
            deload_triggered: progression.deload_triggered,
        });
        if self.state.phase() != before {
            self.send_event(PlannerEvent::PhaseChanged {
                phase: self.state.phase(),
            });
        }
        Ok(progression)
    }

    pub fn set_baseline_strength(&mut self, muscle: &str, load: f64) -> Result<(), PlannerError> {
        let result = self.state.set_baseline_strength(muscle, load);
        self.report(Operation::UpdateVolume, result)?;
        self.persist();
        Ok(())
    }

    /// Reset every muscle's current week to MEV.
    pub fn reset_week(&mut self) {
        self.state.volume.reset_week();
        self.persist();
    }

    // Phases

    pub fn should_deload(&self) -> bool {
        self.state.should_deload()
    }

    pub fn deload_triggers(&self) -> Vec<DeloadTrigger> {
        self.state.deload_triggers()
    }

    pub fn should_resensitize(&self) -> bool {
        self.state.should_resensitize()
    }

    pub fn target_rir(&self) -> f64 {
        self.state.target_rir()
    }

    pub fn summary(&self) -> StateSummary {
        self.state.summary()
    }

    pub fn start_deload(&mut self) {
        self.state.phase_controller().start_deload();
        self.phase_changed();
    }

    pub fn start_resensitization(&mut self) {
        self.state.phase_controller().start_resensitization();
        self.phase_changed();
    }

    pub fn end_resensitization(&mut self) -> Result<(), PlannerError> {
        let result = self.state.phase_controller().end_resensitization();
        self.report(Operation::PhaseChange, result)?;
        self.phase_changed();
        Ok(())
    }

    pub fn calculate_deload_strategy(&self) -> DeloadStrategy {
        phase::calculate_deload_strategy(&self.state)
    }

    pub fn execute_deload(&mut self, strategy: &DeloadStrategy) {
        self.state.phase_controller().execute_deload(strategy);
        self.phase_changed();
    }

    pub fn exit_deload(&mut self) -> Result<(), PlannerError> {
        let result = self.state.phase_controller().exit_deload();
        self.report(Operation::PhaseChange, result)?;
        self.phase_changed();
        Ok(())
    }

    pub fn deload_status(&self) -> DeloadStatus {
        phase::deload_status(&self.state)
    }

    pub fn analyze_deload_need(&self) -> DeloadAnalysis {
        phase::analyze_deload_need(&self.state)
    }

    pub fn next_week(&mut self) -> WeekTransition {
        let before = self.state.phase();
        let transition = self.state.phase_controller().next_week();

        self.persist();
        self.send_event(PlannerEvent::WeekAdvanced(transition.clone()));
        if self.state.phase() != before {
            self.send_event(PlannerEvent::PhaseChanged {
                phase: self.state.phase(),
            });
        }
        transition
    }

    pub fn hit_mrv(&mut self, muscle: &str) -> Result<u32, PlannerError> {
        let result = self.state.phase_controller().hit_mrv(muscle);
        let needing = self.report(Operation::UpdateVolume, result)?;
        self.persist();
        Ok(needing)
    }

    pub fn record_recovery_session(&mut self) -> u32 {
        let count = self.state.phase_controller().record_recovery_session();
        self.persist();
        count
    }

    pub fn set_mesocycle_length(&mut self, weeks: u32) -> Result<(), PlannerError> {
        let result = self.state.phase_controller().set_mesocycle_length(weeks);
        self.report(Operation::PhaseChange, result)?;
        self.persist();
        Ok(())
    }

    // Fatigue

    pub fn assess_fatigue(&self, muscle: &str, feedback: &FatigueFeedback) -> FatigueAssessment {
        fatigue::assess_fatigue(&self.state, muscle, feedback)
    }

    pub fn is_high_fatigue(&self, muscle: &str, feedback: &FatigueFeedback) -> bool {
        fatigue::is_high_fatigue(&self.state, muscle, feedback)
    }

    pub fn calculate_optimal_frequency(
        &self,
        muscle: &str,
        constraints: &FrequencyConstraints,
    ) -> Result<FrequencyRecommendation, PlannerError> {
        fatigue::calculate_optimal_frequency(&self.state, muscle, constraints)
    }

    pub fn analyze_frequency(
        &self,
        soreness_recovery_days: f64,
        session_gap: f64,
        muscle: Option<&str>,
    ) -> Result<FrequencyAnalysis, PlannerError> {
        fatigue::analyze_frequency(&self.state, soreness_recovery_days, session_gap, muscle)
    }

    pub fn generate_recovery_session(
        &self,
        muscle: &str,
        options: &RecoveryOptions,
    ) -> Result<RecoveryPlan, PlannerError> {
        fatigue::generate_recovery_session(&self.state, muscle, options)
    }

    pub fn assess_fatigue_accumulation(&self, data: &WeeklyFatigueData) -> FatigueAccumulation {
        fatigue::assess_fatigue_accumulation(data)
    }

    /// Overreaching risk, taking the MRV streak from the state unless supplied.
    pub fn assess_overreaching_risk(&self, metrics: &OverreachingMetrics) -> OverreachingRisk {
        let metrics = OverreachingMetrics {
            consecutive_mrv_weeks: metrics
                .consecutive_mrv_weeks
                .or(Some(self.state.consecutive_mrv_weeks)),
            ..metrics.clone()
        };
        fatigue::assess_overreaching_risk(&metrics)
    }
}

impl Default for Planner {
    fn default() -> Self {
        Self::new(TrainingState::new())
    }
}
