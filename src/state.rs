//! Training state aggregate.
//!
//! `TrainingState` owns the landmark store, periodization counters, the
//! current phase and the active workout. There is no process-wide instance:
//! whoever owns the value (normally a [`crate::Planner`]) is the only writer,
//! and components borrow it mutably for the duration of one operation.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::phase::controller::{deload_triggers, target_rir, DeloadTrigger, PhaseController};
use crate::phase::deload::DeloadKind;
use crate::storage::config::PlannerSettings;
use crate::volume::{VolumeLandmarkStore, VolumeStatus};
use crate::workouts::engine::WorkoutSessionEngine;
use crate::workouts::types::WorkoutSession;

/// Fraction of baseline below which a load counts as a strength drop.
const STRENGTH_DROP_RATIO: f64 = 0.97;

/// Periodization phase. Deload and resensitization are mutually exclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingPhase {
    /// Normal progressive training
    #[default]
    Accumulation,
    /// Temporary volume and load reduction
    Deload,
    /// Extended maintenance at MV
    Resensitization,
}

impl std::fmt::Display for TrainingPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingPhase::Accumulation => write!(f, "accumulation"),
            TrainingPhase::Deload => write!(f, "deload"),
            TrainingPhase::Resensitization => write!(f, "resensitization"),
        }
    }
}

/// Read-only overview of where the trainee is in the block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateSummary {
    pub week: u32,
    pub meso_len: u32,
    pub block: u32,
    #[serde(rename = "targetRIR")]
    pub target_rir: f64,
    pub deload_recommended: bool,
    pub resensitization_recommended: bool,
    pub current_phase: TrainingPhase,
    pub load_reduction: f64,
}

/// Aggregate root for the planner.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingState {
    /// Landmarks and weekly set counts
    pub volume: VolumeLandmarkStore,
    /// Reference load per muscle for strength-drop checks
    pub baseline_strength: BTreeMap<String, f64>,
    /// 1-based week within the mesocycle
    pub week_no: u32,
    /// 1-based block (mesocycle) counter
    pub block_no: u32,
    pub consecutive_mrv_weeks: u32,
    pub total_muscles_needing_recovery: u32,
    pub recovery_sessions_this_week: u32,
    pub program_version: String,
    /// Resensitize every N blocks (0 disables)
    pub resensitize_interval: u32,
    pub(crate) meso_len: u32,
    pub(crate) phase: TrainingPhase,
    pub(crate) deload_kind: Option<DeloadKind>,
    pub(crate) deload_weeks_remaining: u32,
    pub(crate) load_reduction: f64,
    pub(crate) current_workout: Option<WorkoutSession>,
    pub(crate) workout_history: Vec<WorkoutSession>,
}

impl TrainingState {
    /// Fresh state with default landmarks and settings.
    pub fn new() -> Self {
        Self::build(&PlannerSettings::default())
    }

    /// Fresh state using configured settings.
    pub fn from_settings(settings: &PlannerSettings) -> Result<Self, PlannerError> {
        settings.validate()?;
        Ok(Self::build(settings))
    }

    fn build(settings: &PlannerSettings) -> Self {
        let volume = VolumeLandmarkStore::with_defaults();
        let baseline_strength = volume
            .muscles()
            .map(|m| (m.to_string(), settings.default_baseline_load))
            .collect();

        Self {
            volume,
            baseline_strength,
            week_no: 1,
            block_no: 1,
            consecutive_mrv_weeks: 0,
            total_muscles_needing_recovery: 0,
            recovery_sessions_this_week: 0,
            program_version: settings.program_version.clone(),
            resensitize_interval: settings.resensitize_every_blocks,
            meso_len: settings.meso_len.max(1),
            phase: TrainingPhase::Accumulation,
            deload_kind: None,
            deload_weeks_remaining: 0,
            load_reduction: 1.0,
            current_workout: None,
            workout_history: Vec::new(),
        }
    }

    pub fn meso_len(&self) -> u32 {
        self.meso_len
    }

    pub fn phase(&self) -> TrainingPhase {
        self.phase
    }

    pub fn is_deload_phase(&self) -> bool {
        self.phase == TrainingPhase::Deload
    }

    pub fn is_resensitization_phase(&self) -> bool {
        self.phase == TrainingPhase::Resensitization
    }

    /// Multiplier applied to working loads (1.0 outside a deload).
    pub fn load_reduction(&self) -> f64 {
        self.load_reduction
    }

    /// Strategy of the running deload, if it was started from one.
    pub fn deload_kind(&self) -> Option<DeloadKind> {
        self.deload_kind
    }

    /// The active session, if any.
    pub fn current_workout(&self) -> Option<&WorkoutSession> {
        self.current_workout.as_ref()
    }

    /// Completed sessions, oldest first.
    pub fn workout_history(&self) -> &[WorkoutSession] {
        &self.workout_history
    }

    /// Record a muscle's reference load.
    pub fn set_baseline_strength(&mut self, muscle: &str, load: f64) -> Result<(), PlannerError> {
        if !load.is_finite() || load <= 0.0 {
            return Err(PlannerError::Validation(
                "Baseline strength must be a positive number".to_string(),
            ));
        }
        self.baseline_strength.insert(muscle.to_string(), load);
        Ok(())
    }

    /// Whether `last_load` sits more than 3% under the muscle's baseline.
    ///
    /// False when either the baseline or the load is missing.
    pub fn rep_strength_drop(&self, muscle: &str, last_load: Option<f64>) -> bool {
        match (self.baseline_strength.get(muscle), last_load) {
            (Some(baseline), Some(load)) => load < baseline * STRENGTH_DROP_RATIO,
            _ => false,
        }
    }

    pub fn volume_status(&self, muscle: &str, sets: Option<u32>) -> Result<VolumeStatus, PlannerError> {
        self.volume.volume_status(muscle, sets)
    }

    /// Prescribed RIR for the current week.
    pub fn target_rir(&self) -> f64 {
        target_rir(self.week_no, self.meso_len)
    }

    /// Conditions currently calling for a deload.
    pub fn deload_triggers(&self) -> Vec<DeloadTrigger> {
        deload_triggers(self)
    }

    pub fn should_deload(&self) -> bool {
        !self.deload_triggers().is_empty()
    }

    /// Whether the current block is due for a resensitization phase.
    pub fn should_resensitize(&self) -> bool {
        self.resensitize_interval > 0 && self.block_no % self.resensitize_interval == 0
    }

    pub fn summary(&self) -> StateSummary {
        StateSummary {
            week: self.week_no,
            meso_len: self.meso_len,
            block: self.block_no,
            target_rir: self.target_rir(),
            deload_recommended: self.should_deload(),
            resensitization_recommended: self.should_resensitize(),
            current_phase: self.phase,
            load_reduction: self.load_reduction,
        }
    }

    /// Borrow the phase controller for one operation.
    pub fn phase_controller(&mut self) -> PhaseController<'_> {
        PhaseController::new(self)
    }

    /// Borrow the workout session engine for one operation.
    pub fn workout_engine(&mut self) -> WorkoutSessionEngine<'_> {
        WorkoutSessionEngine::new(self)
    }
}

impl Default for TrainingState {
    fn default() -> Self {
        Self::new()
    }
}
