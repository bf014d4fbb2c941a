//! Stateless fatigue and frequency functions.
//!
//! Functions that need landmarks, weekly sets or baselines borrow a
//! `TrainingState`; none of them mutate it.

use crate::error::PlannerError;
use crate::fatigue::types::{
    FatigueAssessment, FatigueFeedback, FrequencyAction, FrequencyAlternatives, FrequencyAnalysis,
    FrequencyConstraints, FrequencyRecommendation, RecoveryOptions, RecoveryPlan, RecoveryType,
    Urgency,
};
use crate::state::TrainingState;
use crate::volume::VolumeStatus;

/// Penalty added to fatigue when performance dropped.
const PERF_DROP_PENALTY: u32 = 2;
/// Minimum sessions per week used for the conservative alternative.
const MIN_FREQUENCY: u32 = 2;

/// Score fatigue against stimulus for one muscle.
///
/// A session is high fatigue when the stimulus-to-fatigue ratio is at most
/// 1, or when the last load fell under the muscle's baseline. Either signal
/// alone is enough.
pub fn assess_fatigue(
    state: &TrainingState,
    muscle: &str,
    feedback: &FatigueFeedback,
) -> FatigueAssessment {
    let perf_penalty = if feedback.perf_change < 0 {
        PERF_DROP_PENALTY
    } else {
        0
    };
    let fatigue = u32::from(feedback.soreness) + u32::from(feedback.joint_ache) + perf_penalty;
    let stimulus = u32::from(feedback.pump) + u32::from(feedback.disruption);
    let sfr = f64::from(stimulus) / f64::from(fatigue.max(1));
    let strength_drop = state.rep_strength_drop(muscle, feedback.last_load);

    FatigueAssessment {
        fatigue,
        stimulus,
        sfr,
        strength_drop,
        high_fatigue: sfr <= 1.0 || strength_drop,
    }
}

/// Whether the feedback signals high fatigue for the muscle.
pub fn is_high_fatigue(state: &TrainingState, muscle: &str, feedback: &FatigueFeedback) -> bool {
    assess_fatigue(state, muscle, feedback).high_fatigue
}

/// Sessions per week for a muscle given its weekly volume and constraints.
pub fn calculate_optimal_frequency(
    state: &TrainingState,
    muscle: &str,
    constraints: &FrequencyConstraints,
) -> Result<FrequencyRecommendation, PlannerError> {
    let landmarks = state.volume.require_landmarks(muscle)?;
    if constraints.available_days == 0 {
        return Err(PlannerError::Validation(
            "Available days must be at least 1".to_string(),
        ));
    }

    let volume = constraints
        .current_volume
        .unwrap_or_else(|| state.volume.weekly_sets(muscle));
    let (age_min, age_max) = constraints.training_age.frequency_range();

    // Fewer, larger sessions at low volume; more, smaller ones near MRV
    let volume_frequency = if volume >= landmarks.mav() {
        volume.div_ceil(6).min(4)
    } else if volume >= landmarks.mev() {
        volume.div_ceil(8).min(3)
    } else {
        volume.div_ceil(10).max(2)
    };

    let adjusted =
        (f64::from(volume_frequency) * constraints.recovery_capacity.multiplier()).round() as u32;
    let recommended = age_max
        .min(adjusted)
        .min(constraints.available_days)
        .max(age_min);
    let sets_per_session = volume.div_ceil(recommended);

    Ok(FrequencyRecommendation {
        muscle: muscle.to_string(),
        recommended_frequency: recommended,
        sets_per_session,
        total_volume: volume,
        reasoning: vec![
            format!("{} weekly sets", volume),
            format!("{} recovery capacity", constraints.recovery_capacity),
            format!("{} training age", constraints.training_age),
            format!("{} available days", constraints.available_days),
        ],
        alternatives: FrequencyAlternatives {
            conservative: recommended.saturating_sub(1).max(MIN_FREQUENCY),
            aggressive: (recommended + 1).min(constraints.available_days).max(recommended),
        },
    })
}

/// Compare soreness recovery with the gap between sessions.
///
/// With a muscle given, an increase is held back at MRV and a decrease below
/// MV turns into a recovery recommendation.
pub fn analyze_frequency(
    state: &TrainingState,
    soreness_recovery_days: f64,
    session_gap: f64,
    muscle: Option<&str>,
) -> Result<FrequencyAnalysis, PlannerError> {
    let status = muscle
        .map(|m| state.volume_status(m, None))
        .transpose()?;

    let recovery = if soreness_recovery_days.is_finite() {
        soreness_recovery_days.max(0.0)
    } else {
        0.0
    };
    let gap = if session_gap.is_finite() {
        session_gap.max(1.0)
    } else {
        1.0
    };
    let ratio = recovery / gap;

    let (mut recommendation, mut action, mut adjustment, urgency) = if ratio < 0.7 {
        (
            "You heal early → Add one session per week",
            FrequencyAction::IncreaseFrequency,
            1,
            Urgency::Medium,
        )
    } else if ratio > 1.3 {
        (
            "Recovery lags → Insert an extra rest day",
            FrequencyAction::DecreaseFrequency,
            -1,
            Urgency::High,
        )
    } else {
        (
            "Frequency is optimal",
            FrequencyAction::Maintain,
            0,
            Urgency::Normal,
        )
    };

    match (status, action) {
        (Some(VolumeStatus::Maximum), FrequencyAction::IncreaseFrequency) => {
            recommendation = "At MRV - maintain frequency despite early recovery";
            action = FrequencyAction::Maintain;
            adjustment = 0;
        }
        (Some(VolumeStatus::UnderMinimum), FrequencyAction::DecreaseFrequency) => {
            recommendation = "Below MV - consider recovery methods instead of reducing frequency";
            action = FrequencyAction::ImproveRecovery;
            adjustment = 0;
        }
        _ => {}
    }

    Ok(FrequencyAnalysis {
        soreness_recovery_days: recovery,
        session_gap: gap,
        recovery_ratio: (ratio * 100.0).round() / 100.0,
        recommendation: recommendation.to_string(),
        action,
        frequency_adjustment: adjustment,
        urgency,
        muscle: muscle.map(str::to_string),
    })
}

/// Plan a lighter session for a muscle that needs recovery.
pub fn generate_recovery_session(
    state: &TrainingState,
    muscle: &str,
    options: &RecoveryOptions,
) -> Result<RecoveryPlan, PlannerError> {
    let landmarks = state.volume.require_landmarks(muscle)?;
    let base = landmarks.recovery_volume(options.has_illness);

    let mut plan = RecoveryPlan {
        muscle: muscle.to_string(),
        recovery_type: options.recovery_type,
        sets: base,
        intensity: "60-70% of normal".to_string(),
        rir_target: "3-4 RIR".to_string(),
        duration: "1 session".to_string(),
        notes: Vec::new(),
    };

    if options.soreness_level >= 3 {
        plan.sets = scale(base, 0.7);
        plan.intensity = "50-60% of normal".to_string();
        plan.rir_target = "4-5 RIR".to_string();
        plan.notes.push("High soreness - very light session".to_string());
    }

    if options.has_illness {
        plan.sets = scale(plan.sets, 0.8);
        plan.intensity = "40-50% of normal".to_string();
        plan.notes.push("Illness present - prioritize rest".to_string());
    }

    if options.last_session_rir <= 0.5 {
        plan.sets = scale(plan.sets, 0.8);
        plan.notes.push("Last session was very intense".to_string());
    }

    if options.recovery_type == RecoveryType::Deload {
        plan.sets = landmarks.deload_sets(0.5);
        plan.intensity = "40-50% of normal".to_string();
        plan.duration = "3-7 days".to_string();
        plan.notes.push("Full deload protocol".to_string());
    }

    Ok(plan)
}

fn scale(sets: u32, factor: f64) -> u32 {
    (f64::from(sets) * factor).round() as u32
}
