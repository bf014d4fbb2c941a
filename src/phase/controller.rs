//! Phase controller: deload and resensitization decisions plus week boundaries.

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::phase::deload::{calculate_deload_strategy, DeloadKind, DeloadStrategy};
use crate::state::{TrainingPhase, TrainingState};
use crate::volume::{MuscleLandmarks, MAJOR_MUSCLES};

/// Target RIR in week one of a mesocycle.
const START_RIR: f64 = 3.0;
/// Target RIR in the final week of a mesocycle.
const END_RIR: f64 = 0.5;
/// Fraction of MEV prescribed by a basic deload.
const BASIC_DELOAD_VOLUME: f64 = 0.5;
/// Load multiplier for a basic deload.
const BASIC_DELOAD_LOAD: f64 = 0.5;
/// Consecutive weeks at MRV that force a deload.
const MRV_WEEKS_BEFORE_DELOAD: u32 = 2;

/// A condition that calls for a deload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "trigger", rename_all = "snake_case")]
pub enum DeloadTrigger {
    /// Some muscle has been at MRV for this many weeks running
    ConsecutiveMrvWeeks { weeks: u32 },
    /// At least half of the muscles need recovery
    MostMusclesNeedRecovery { needing: u32, threshold: u32 },
    /// A major muscle is at MRV while recovery is already lagging
    MajorMuscleAtMrv { muscle: String },
    /// The last week of the mesocycle has been reached
    MesocycleComplete { week: u32, meso_len: u32 },
}

impl std::fmt::Display for DeloadTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeloadTrigger::ConsecutiveMrvWeeks { weeks } => {
                write!(f, "{} consecutive weeks at MRV", weeks)
            }
            DeloadTrigger::MostMusclesNeedRecovery { needing, threshold } => {
                write!(f, "{} muscles need recovery (threshold {})", needing, threshold)
            }
            DeloadTrigger::MajorMuscleAtMrv { muscle } => {
                write!(f, "{} at MRV with recovery pending", muscle)
            }
            DeloadTrigger::MesocycleComplete { week, meso_len } => {
                write!(f, "week {} of {} reached", week, meso_len)
            }
        }
    }
}

/// Outcome of a week boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeekTransition {
    pub previous_week: u32,
    pub week_no: u32,
    pub block_no: u32,
    pub mesocycle_completed: bool,
    pub deload_ended: bool,
    #[serde(rename = "consecutiveMRVWeeks")]
    pub consecutive_mrv_weeks: u32,
}

/// Target RIR for a week: linear from 3.0 in week one down to 0.5 in the last week.
pub fn target_rir(week_no: u32, meso_len: u32) -> f64 {
    if meso_len <= 1 {
        return START_RIR;
    }
    let step = (START_RIR - END_RIR) / f64::from(meso_len - 1);
    let rir = START_RIR - step * f64::from(week_no.saturating_sub(1));
    rir.clamp(END_RIR, START_RIR)
}

/// Every deload condition that currently holds.
pub fn deload_triggers(state: &TrainingState) -> Vec<DeloadTrigger> {
    let mut triggers = Vec::new();

    if state.consecutive_mrv_weeks >= MRV_WEEKS_BEFORE_DELOAD {
        triggers.push(DeloadTrigger::ConsecutiveMrvWeeks {
            weeks: state.consecutive_mrv_weeks,
        });
    }

    let total = state.volume.muscle_count() as u32;
    let threshold = total.div_ceil(2);
    if total > 0 && state.total_muscles_needing_recovery >= threshold {
        triggers.push(DeloadTrigger::MostMusclesNeedRecovery {
            needing: state.total_muscles_needing_recovery,
            threshold,
        });
    }

    if state.total_muscles_needing_recovery > 0 {
        if let Some(muscle) = MAJOR_MUSCLES
            .iter()
            .find(|m| state.volume.is_at_mrv(m))
        {
            triggers.push(DeloadTrigger::MajorMuscleAtMrv {
                muscle: muscle.to_string(),
            });
        }
    }

    if state.week_no >= state.meso_len {
        triggers.push(DeloadTrigger::MesocycleComplete {
            week: state.week_no,
            meso_len: state.meso_len,
        });
    }

    triggers
}

/// Mutates phase, counters and bulk set targets of a borrowed state.
pub struct PhaseController<'a> {
    state: &'a mut TrainingState,
}

impl<'a> PhaseController<'a> {
    pub fn new(state: &'a mut TrainingState) -> Self {
        Self { state }
    }

    pub fn should_deload(&self) -> bool {
        self.state.should_deload()
    }

    pub fn deload_triggers(&self) -> Vec<DeloadTrigger> {
        self.state.deload_triggers()
    }

    pub fn should_resensitize(&self) -> bool {
        self.state.should_resensitize()
    }

    pub fn calculate_deload_strategy(&self) -> DeloadStrategy {
        calculate_deload_strategy(self.state)
    }

    /// Basic one-week deload: half of MEV, half of working loads.
    pub fn start_deload(&mut self) {
        self.state
            .volume
            .set_all(|lm| lm.deload_sets(BASIC_DELOAD_VOLUME));
        self.enter_deload(None, BASIC_DELOAD_LOAD, 1);
        tracing::info!("Deload started");
    }

    /// Apply a calculated deload strategy. Every muscle keeps at least one set.
    pub fn execute_deload(&mut self, strategy: &DeloadStrategy) {
        let reduction = strategy.volume_reduction;
        self.state
            .volume
            .set_all(|lm| lm.deload_sets(reduction).max(1));
        self.enter_deload(
            Some(strategy.kind),
            strategy.load_reduction,
            strategy.duration_weeks.max(1),
        );
        self.state.total_muscles_needing_recovery = 0;
        self.state.consecutive_mrv_weeks = 0;

        tracing::info!(
            kind = %strategy.kind,
            volume_pct = (reduction * 100.0).round(),
            load_pct = (strategy.load_reduction * 100.0).round(),
            "Executing deload"
        );
    }

    fn enter_deload(&mut self, kind: Option<DeloadKind>, load: f64, weeks: u32) {
        if self.state.phase == TrainingPhase::Resensitization {
            tracing::debug!("Deload replaces resensitization phase");
        }
        self.state.phase = TrainingPhase::Deload;
        self.state.deload_kind = kind;
        self.state.deload_weeks_remaining = weeks;
        self.state.load_reduction = load;
    }

    /// Leave a deload and start a fresh mesocycle at MEV.
    pub fn exit_deload(&mut self) -> Result<(), PlannerError> {
        if !self.state.is_deload_phase() {
            return Err(PlannerError::InvalidState(
                "Not in a deload phase".to_string(),
            ));
        }

        self.clear_deload();
        self.state.volume.reset_week();
        self.state.week_no = 1;

        tracing::info!("Exiting deload phase, starting fresh mesocycle");
        Ok(())
    }

    fn clear_deload(&mut self) {
        self.state.phase = TrainingPhase::Accumulation;
        self.state.deload_kind = None;
        self.state.deload_weeks_remaining = 0;
        self.state.load_reduction = 1.0;
    }

    /// Drop every muscle to MV for a maintenance phase.
    pub fn start_resensitization(&mut self) {
        if self.state.is_deload_phase() {
            tracing::debug!("Resensitization replaces deload phase");
        }
        self.state.volume.set_all(MuscleLandmarks::mv);
        self.state.phase = TrainingPhase::Resensitization;
        self.state.deload_kind = None;
        self.state.deload_weeks_remaining = 0;
        self.state.load_reduction = 1.0;

        tracing::info!("Resensitization phase started");
    }

    /// Return to accumulation at MEV.
    pub fn end_resensitization(&mut self) -> Result<(), PlannerError> {
        if !self.state.is_resensitization_phase() {
            return Err(PlannerError::InvalidState(
                "Not in a resensitization phase".to_string(),
            ));
        }

        self.state.phase = TrainingPhase::Accumulation;
        self.state.volume.reset_week();
        tracing::info!("Resensitization phase ended");
        Ok(())
    }

    /// Close the current week.
    ///
    /// The MRV streak is judged on the week being closed. A running deload
    /// counts down and ends when its weeks are used up. Passing the last week
    /// of the mesocycle starts the next block.
    pub fn next_week(&mut self) -> WeekTransition {
        let state = &mut *self.state;
        let previous_week = state.week_no;

        state.volume.snapshot_week();

        if state.volume.muscles_at_mrv().is_empty() {
            state.consecutive_mrv_weeks = 0;
        } else {
            state.consecutive_mrv_weeks += 1;
        }

        state.week_no += 1;

        let mut deload_ended = false;
        if state.phase == TrainingPhase::Deload {
            state.deload_weeks_remaining = state.deload_weeks_remaining.saturating_sub(1);
            if state.deload_weeks_remaining == 0 {
                deload_ended = true;
            }
        }
        if deload_ended {
            self.clear_deload();
        }

        let state = &mut *self.state;
        let mesocycle_completed = state.week_no > state.meso_len;
        if mesocycle_completed {
            state.week_no = 1;
            state.block_no += 1;
            state.consecutive_mrv_weeks = 0;
        }

        state.recovery_sessions_this_week = 0;
        state.total_muscles_needing_recovery = 0;

        tracing::info!(
            week = state.week_no,
            block = state.block_no,
            consecutive_mrv_weeks = state.consecutive_mrv_weeks,
            "Advanced to next week"
        );

        WeekTransition {
            previous_week,
            week_no: state.week_no,
            block_no: state.block_no,
            mesocycle_completed,
            deload_ended,
            consecutive_mrv_weeks: state.consecutive_mrv_weeks,
        }
    }

    /// Flag a muscle as needing recovery. Returns the updated count.
    pub fn hit_mrv(&mut self, muscle: &str) -> Result<u32, PlannerError> {
        self.state.volume.require_landmarks(muscle)?;

        self.state.total_muscles_needing_recovery += 1;
        if self.state.volume.is_at_mrv(muscle) {
            self.state.consecutive_mrv_weeks += 1;
        }

        tracing::debug!(
            muscle,
            needing_recovery = self.state.total_muscles_needing_recovery,
            "Muscle hit MRV"
        );
        Ok(self.state.total_muscles_needing_recovery)
    }

    /// Count a recovery session for this week.
    pub fn record_recovery_session(&mut self) -> u32 {
        self.state.recovery_sessions_this_week += 1;
        self.state.recovery_sessions_this_week
    }

    /// Change the mesocycle length. Must be at least one week.
    pub fn set_mesocycle_length(&mut self, weeks: u32) -> Result<(), PlannerError> {
        if weeks == 0 {
            return Err(PlannerError::Validation(
                "Mesocycle length must be at least 1 week".to_string(),
            ));
        }
        self.state.meso_len = weeks;
        Ok(())
    }
}
