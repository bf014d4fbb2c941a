//! Weekly volume progression.
//!
//! Turns stimulus scores, fatigue checks and the volume landmarks into set
//! changes for the coming week. The weekly pass also does the MRV
//! bookkeeping that feeds the deload triggers, and starts a deload when one
//! is due.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::fatigue::{is_high_fatigue, FatigueFeedback, Urgency};
use crate::state::TrainingState;
use crate::volume::landmarks::{MuscleLandmarks, VolumeStatus};
use crate::volume::stimulus::{score_stimulus, StimulusFeedback};
use crate::volume::store::{clamp_sets, VolumeLandmarkStore};

/// Sets under MRV that still count as close to it.
const NEAR_MRV_MARGIN: u32 = 4;
/// Highest stimulus score that counts as low.
const LOW_STIMULUS: u8 = 3;
/// Proposed weekly sets may exceed MRV by this factor and still be accepted.
const MRV_TOLERANCE: f64 = 1.2;
/// Sets added below MV whatever the fatigue.
const UNDER_MINIMUM_BUMP: i64 = 2;

/// One muscle's feedback for the week.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WeeklyMuscleFeedback {
    /// Missing ratings score as zero stimulus
    pub stimulus: Option<StimulusFeedback>,
    pub fatigue: FatigueFeedback,
    /// The muscle felt recovered before its next session
    pub recovered: bool,
    /// This week's session was already a recovery session
    pub recovery_session: bool,
}

/// Set change picked for a muscle by the weekly pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetIncrement {
    pub add: bool,
    pub delta: u32,
    pub reason: String,
}

impl SetIncrement {
    fn hold(reason: &str) -> Self {
        Self {
            add: false,
            delta: 0,
            reason: reason.to_string(),
        }
    }

    fn add(delta: u32, reason: &str) -> Self {
        Self {
            add: true,
            delta,
            reason: reason.to_string(),
        }
    }
}

/// Decide whether a muscle gets more sets next week.
///
/// Nothing is added at or above MEV, at MRV, or after a recovery session.
/// Below MEV a low stimulus adds one set (recovery is required in the
/// maintenance band), and two sets when the muscle is also near MRV.
pub fn auto_set_increment(
    store: &VolumeLandmarkStore,
    muscle: &str,
    feedback: &WeeklyMuscleFeedback,
) -> Result<SetIncrement, PlannerError> {
    let landmarks = store.require_landmarks(muscle)?;
    let sets = store.weekly_sets(muscle);
    let status = landmarks.status_for(sets);
    let near_mrv = sets >= landmarks.mrv().saturating_sub(NEAR_MRV_MARGIN);
    let low_stimulus =
        score_stimulus(feedback.stimulus.unwrap_or_default()).score <= LOW_STIMULUS;

    if landmarks.is_at_mrv(sets) || feedback.recovery_session || status >= VolumeStatus::Optimal {
        return Ok(SetIncrement::hold("At volume ceiling or recovery"));
    }

    if low_stimulus && near_mrv && feedback.recovered {
        return Ok(SetIncrement::add(
            2,
            "Low stimulus near MRV - aggressive progression",
        ));
    }

    let increment = match status {
        VolumeStatus::UnderMinimum if low_stimulus => {
            SetIncrement::add(1, "Low volume, low stimulus")
        }
        VolumeStatus::Maintenance if low_stimulus && feedback.recovered => {
            SetIncrement::add(1, "Suboptimal volume, low stimulus, good recovery")
        }
        _ => SetIncrement::hold("No progression criteria met"),
    };
    Ok(increment)
}

/// Kind of adjustment in the set progression table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProgressionAction {
    AddSets,
    Maintain,
    /// Replace the next session with a recovery session
    Recovery,
}

/// One cell of the set progression table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SetProgression {
    pub advice: &'static str,
    pub action: ProgressionAction,
    /// Sets to add next session. Zero for recovery cells, whose size comes
    /// from the muscle's recovery volume instead.
    pub set_change: i32,
}

const fn cell(action: ProgressionAction, set_change: i32, advice: &'static str) -> SetProgression {
    SetProgression {
        advice,
        action,
        set_change,
    }
}

const HOLD: SetProgression = cell(ProgressionAction::Maintain, 0, "Hold sets at current level");
const RECOVER: SetProgression = cell(ProgressionAction::Recovery, 0, "Do recovery session");

/// Rows are soreness 0-3 (none to high), columns performance 0-3
/// (worse, same, better, much better).
const PROGRESSION_TABLE: [[SetProgression; 4]; 4] = [
    [
        cell(ProgressionAction::AddSets, 1, "Add 1 set next session"),
        cell(ProgressionAction::AddSets, 2, "Add 2 sets next session"),
        cell(ProgressionAction::AddSets, 2, "Add 2-3 sets next session"),
        cell(ProgressionAction::AddSets, 3, "Add 2-3 sets next session"),
    ],
    [
        HOLD,
        cell(ProgressionAction::AddSets, 1, "Add 1 set next session"),
        cell(ProgressionAction::AddSets, 2, "Add 2 sets next session"),
        cell(ProgressionAction::AddSets, 2, "Add 2-3 sets next session"),
    ],
    [
        RECOVER,
        HOLD,
        HOLD,
        cell(ProgressionAction::AddSets, 1, "Add 1 set next session"),
    ],
    [RECOVER, RECOVER, RECOVER, HOLD],
];

/// Look up the set change for a soreness and performance rating. Both are clamped to 0-3.
pub fn set_progression(soreness: u8, performance: u8) -> SetProgression {
    PROGRESSION_TABLE[usize::from(soreness.min(3))][usize::from(performance.min(3))]
}

/// A muscle's weekly sets read against its landmarks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeAnalysis {
    pub muscle: String,
    pub current_sets: u32,
    pub landmarks: MuscleLandmarks,
    pub status: VolumeStatus,
    /// Sets as a share of MRV, rounded
    pub percentage: u32,
    pub recommendation: String,
    pub urgency: Urgency,
}

/// Classify `sets` (or the muscle's weekly sets) and explain the band.
pub fn analyze_volume_status(
    store: &VolumeLandmarkStore,
    muscle: &str,
    sets: Option<u32>,
) -> Result<VolumeAnalysis, PlannerError> {
    let landmarks = *store.require_landmarks(muscle)?;
    let sets = sets.unwrap_or_else(|| store.weekly_sets(muscle));
    let status = landmarks.status_for(sets);

    let percentage = if landmarks.mrv() == 0 {
        100
    } else {
        (f64::from(sets) / f64::from(landmarks.mrv()) * 100.0).round() as u32
    };

    let (recommendation, urgency) = match status {
        VolumeStatus::UnderMinimum => (
            format!("Below MV ({}). Increase volume significantly.", landmarks.mv()),
            Urgency::High,
        ),
        VolumeStatus::Maintenance => (
            format!(
                "In maintenance zone ({}-{}). Consider increasing for growth.",
                landmarks.mv(),
                landmarks.mev()
            ),
            Urgency::Low,
        ),
        VolumeStatus::Optimal => (
            format!(
                "In optimal zone ({}-{}). Continue progressive overload.",
                landmarks.mev(),
                landmarks.mav()
            ),
            Urgency::Normal,
        ),
        VolumeStatus::High => (
            format!(
                "High volume zone ({}-{}). Monitor recovery closely.",
                landmarks.mav(),
                landmarks.mrv()
            ),
            Urgency::Medium,
        ),
        VolumeStatus::Maximum => (
            format!("At/above MRV ({}). Deload recommended.", landmarks.mrv()),
            Urgency::High,
        ),
    };

    Ok(VolumeAnalysis {
        muscle: muscle.to_string(),
        current_sets: sets,
        landmarks,
        status,
        percentage,
        recommendation,
        urgency,
    })
}

/// Verdict on a proposed weekly set count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeValidation {
    pub is_valid: bool,
    pub warning: Option<String>,
    pub proposed_sets: i64,
    pub landmarks: MuscleLandmarks,
}

/// Check a proposed weekly set count. Up to 20% over MRV is still accepted, with a warning.
pub fn validate_volume_input(
    store: &VolumeLandmarkStore,
    muscle: &str,
    proposed_sets: i64,
) -> Result<VolumeValidation, PlannerError> {
    let landmarks = *store.require_landmarks(muscle)?;
    let is_valid =
        proposed_sets >= 0 && proposed_sets as f64 <= f64::from(landmarks.mrv()) * MRV_TOLERANCE;

    let warning = if proposed_sets < 0 {
        Some("Sets cannot be negative".to_string())
    } else if proposed_sets > i64::from(landmarks.mrv()) {
        Some(format!("Above MRV ({}). Consider deload.", landmarks.mrv()))
    } else if proposed_sets < i64::from(landmarks.mv()) {
        Some(format!(
            "Below MV ({}). May not be sufficient for adaptation.",
            landmarks.mv()
        ))
    } else {
        None
    };

    Ok(VolumeValidation {
        is_valid,
        warning,
        proposed_sets,
        landmarks,
    })
}

/// Feedback from the last session of a muscle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SessionFeedback {
    pub stimulus: StimulusFeedback,
    /// 0 none to 3 high
    pub soreness: u8,
    /// 0 worse, 1 same, 2 better, 3 much better than last session
    pub performance: u8,
    pub has_illness: bool,
}

/// Set recommendation for a muscle's next session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VolumeProgression {
    pub muscle: String,
    pub current_sets: u32,
    pub projected_sets: u32,
    pub set_change: i64,
    pub advice: String,
    /// Absent when volume is already at or above MEV
    pub stimulus_score: Option<u8>,
    pub volume_status: VolumeStatus,
    #[serde(rename = "targetRIR")]
    pub target_rir: f64,
    pub deload_recommended: bool,
}

/// Recommend next session's sets for a muscle.
///
/// At or above MEV the sets are held. Below it the progression table
/// decides, except that volume under MV always gains two sets and a
/// recovery cell resets to the muscle's recovery volume.
pub fn get_volume_progression(
    state: &TrainingState,
    muscle: &str,
    feedback: &SessionFeedback,
) -> Result<VolumeProgression, PlannerError> {
    let analysis = analyze_volume_status(&state.volume, muscle, None)?;
    let current = analysis.current_sets;

    let mut progression = VolumeProgression {
        muscle: muscle.to_string(),
        current_sets: current,
        projected_sets: current,
        set_change: 0,
        advice: "Maintain current sets next session - volume already optimal".to_string(),
        stimulus_score: None,
        volume_status: analysis.status,
        target_rir: state.target_rir(),
        deload_recommended: state.should_deload(),
    };
    if analysis.status >= VolumeStatus::Optimal {
        return Ok(progression);
    }

    let stimulus = score_stimulus(feedback.stimulus);
    let step = set_progression(feedback.soreness, feedback.performance);
    let mut set_change = i64::from(step.set_change);
    let mut advice = step.advice.to_string();

    if analysis.status == VolumeStatus::UnderMinimum && set_change <= 0 {
        set_change = UNDER_MINIMUM_BUMP;
        advice = "Below minimum volume. Add sets regardless of fatigue.".to_string();
    }

    if step.action == ProgressionAction::Recovery {
        let recovery = analysis.landmarks.recovery_volume(feedback.has_illness);
        set_change = i64::from(recovery) - i64::from(current);
        advice = format!(
            "Recovery session: {} sets ({})",
            recovery,
            if feedback.has_illness {
                "illness adjustment"
            } else {
                "standard recovery"
            }
        );
    }

    progression.projected_sets = clamp_sets(i64::from(current) + set_change);
    progression.set_change = set_change;
    progression.advice = advice;
    progression.stimulus_score = Some(stimulus.score);
    Ok(progression)
}

/// What the weekly pass did to one muscle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleProgression {
    pub previous_sets: u32,
    pub current_sets: u32,
    pub increment: u32,
    pub reason: String,
    pub status: VolumeStatus,
    pub stimulus_score: Option<u8>,
    pub high_fatigue: bool,
}

/// Outcome of a weekly progression pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyProgression {
    pub muscles: BTreeMap<String, MuscleProgression>,
    pub deload_triggered: bool,
    pub mrv_hits: u32,
    pub recommendation: String,
}

/// Apply a week of feedback to the state.
///
/// For each muscle: high fatigue counts as an MRV hit and forces a recovery
/// session, the auto increment is applied, and ending the week at MRV counts
/// as another hit. A deload is started afterwards when one is due and none
/// is running. Every muscle is checked before anything changes.
pub fn process_weekly_volume_progression(
    state: &mut TrainingState,
    feedback: &BTreeMap<String, WeeklyMuscleFeedback>,
) -> Result<WeeklyProgression, PlannerError> {
    for muscle in feedback.keys() {
        state.volume.require_landmarks(muscle)?;
    }

    let mut muscles = BTreeMap::new();
    let mut mrv_hits = 0;

    for (muscle, muscle_feedback) in feedback {
        let mut muscle_feedback = *muscle_feedback;

        let high_fatigue = is_high_fatigue(state, muscle, &muscle_feedback.fatigue);
        if high_fatigue {
            state.phase_controller().hit_mrv(muscle)?;
            mrv_hits += 1;
            muscle_feedback.recovery_session = true;
            tracing::debug!(muscle = %muscle, "High fatigue counted as MRV hit");
        }

        let increment = auto_set_increment(&state.volume, muscle, &muscle_feedback)?;
        if increment.add {
            state.volume.add_sets(muscle, i64::from(increment.delta))?;
            tracing::debug!(
                muscle = %muscle,
                delta = increment.delta,
                reason = %increment.reason,
                "Sets added"
            );
        }

        if state.volume.is_at_mrv(muscle) {
            state.phase_controller().hit_mrv(muscle)?;
            mrv_hits += 1;
        }

        let landmarks = *state.volume.require_landmarks(muscle)?;
        let current_sets = state.volume.weekly_sets(muscle);
        muscles.insert(
            muscle.clone(),
            MuscleProgression {
                previous_sets: state
                    .volume
                    .last_week_sets(muscle)
                    .unwrap_or(landmarks.mev()),
                current_sets,
                increment: increment.delta,
                reason: increment.reason,
                status: landmarks.status_for(current_sets),
                stimulus_score: muscle_feedback.stimulus.map(|s| score_stimulus(s).score),
                high_fatigue,
            },
        );
    }

    let deload_triggered = !state.is_deload_phase() && state.should_deload();
    if deload_triggered {
        state.phase_controller().start_deload();
    }

    tracing::info!(
        muscles = muscles.len(),
        mrv_hits,
        deload_triggered,
        "Weekly volume progression processed"
    );

    Ok(WeeklyProgression {
        muscles,
        deload_triggered,
        mrv_hits,
        recommendation: if deload_triggered {
            "Deload phase initiated".to_string()
        } else {
            "Continue progression".to_string()
        },
    })
}
