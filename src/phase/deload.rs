//! Adaptive deload strategy.
//!
//! The depth of a deload follows two readings of the current week:
//! overall fatigue (how close each muscle sits to MRV, plus penalties for
//! consecutive MRV weeks and muscles needing recovery) and volume pressure
//! (share of muscles within two sets of MRV).

use serde::{Deserialize, Serialize};

use crate::phase::controller::DeloadTrigger;
use crate::state::TrainingState;
use crate::volume::VolumeLandmarkStore;

/// Blocks after which a deep deload lasts two weeks.
const LONG_DEEP_DELOAD_AFTER_BLOCKS: u32 = 20;

/// Deload depth.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeloadKind {
    Light,
    Standard,
    Deep,
}

impl std::fmt::Display for DeloadKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeloadKind::Light => write!(f, "light"),
            DeloadKind::Standard => write!(f, "standard"),
            DeloadKind::Deep => write!(f, "deep"),
        }
    }
}

/// Volume and load prescription for a deload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeloadStrategy {
    pub kind: DeloadKind,
    /// Fraction of MEV to prescribe
    pub volume_reduction: f64,
    /// Fraction of working loads
    pub load_reduction: f64,
    pub duration_weeks: u32,
    /// 0.0 to 1.0
    pub fatigue_level: f64,
    /// 0.0 to 1.0
    pub volume_pressure: f64,
    pub recommendation: String,
}

/// Where the trainee stands with respect to deloading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum DeloadStatus {
    Active {
        kind: Option<DeloadKind>,
        load_reduction: f64,
        weeks_remaining: u32,
    },
    Recommended {
        strategy: DeloadStrategy,
        triggers: Vec<DeloadTrigger>,
    },
    NotNeeded,
}

impl DeloadStatus {
    /// One-line description for display.
    pub fn message(&self) -> String {
        match self {
            DeloadStatus::Active {
                kind,
                load_reduction,
                ..
            } => {
                let label = kind.map(|k| k.to_string()).unwrap_or_else(|| "basic".to_string());
                format!(
                    "{} deload in progress ({}% load)",
                    label,
                    (load_reduction * 100.0).round()
                )
            }
            DeloadStatus::Recommended { .. } => {
                "Deload recommended - high fatigue or volume accumulation detected".to_string()
            }
            DeloadStatus::NotNeeded => "Normal training progression".to_string(),
        }
    }
}

/// Pick a deload depth from the state's current week.
pub fn calculate_deload_strategy(state: &TrainingState) -> DeloadStrategy {
    let fatigue_level = overall_fatigue(state);
    let volume_pressure = volume_pressure(&state.volume);

    let (kind, volume_reduction, load_reduction) =
        if fatigue_level >= 0.7 || volume_pressure >= 0.8 {
            (DeloadKind::Deep, 0.4, 0.6)
        } else if fatigue_level >= 0.5 || volume_pressure >= 0.6 {
            (DeloadKind::Standard, 0.5, 0.7)
        } else {
            (DeloadKind::Light, 0.7, 0.8)
        };

    let duration_weeks =
        if kind == DeloadKind::Deep && state.block_no > LONG_DEEP_DELOAD_AFTER_BLOCKS {
            2
        } else {
            1
        };

    DeloadStrategy {
        kind,
        volume_reduction,
        load_reduction,
        duration_weeks,
        fatigue_level,
        volume_pressure,
        recommendation: recommendation(kind, fatigue_level, volume_pressure),
    }
}

/// Overall fatigue in `[0, 1]`.
pub fn overall_fatigue(state: &TrainingState) -> f64 {
    let store = &state.volume;
    let total = store.muscle_count();
    if total == 0 {
        return 0.0;
    }

    let proximity: f64 = store
        .all_landmarks()
        .iter()
        .map(|(muscle, lm)| {
            let span = f64::from(lm.mrv()) - f64::from(lm.mev());
            if span <= 0.0 {
                // MEV == MRV: anything at MEV is already at the ceiling
                return if store.weekly_sets(muscle) >= lm.mrv() { 1.0 } else { 0.0 };
            }
            let ratio = (f64::from(store.weekly_sets(muscle)) - f64::from(lm.mev())) / span;
            ratio.clamp(0.0, 1.0)
        })
        .sum();

    let mrv_penalty = (f64::from(state.consecutive_mrv_weeks) * 0.2).min(0.4);
    let recovery_penalty = f64::from(state.total_muscles_needing_recovery) / total as f64 * 0.3;

    (proximity / total as f64 + mrv_penalty + recovery_penalty).min(1.0)
}

/// Share of muscles at or within two sets of MRV.
pub fn volume_pressure(store: &VolumeLandmarkStore) -> f64 {
    let total = store.muscle_count();
    if total == 0 {
        return 0.0;
    }

    let near_mrv = store
        .all_landmarks()
        .iter()
        .filter(|(muscle, lm)| store.weekly_sets(muscle) >= lm.mrv().saturating_sub(2))
        .count();

    near_mrv as f64 / total as f64
}

/// Per-condition breakdown of whether a deload is due.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeloadAnalysis {
    pub should_deload: bool,
    pub reasons: Vec<String>,
    /// Muscles at or above MRV
    pub mrv_breaches: Vec<String>,
    #[serde(rename = "consecutiveMRVWeeks")]
    pub consecutive_mrv_weeks: u32,
    pub current_week: u32,
    pub meso_length: u32,
    pub muscles_needing_recovery: u32,
}

/// Explain the deload decision in readable reasons.
///
/// A third of the muscles (rounded up) at MRV is listed as a reason even
/// though on its own it does not trigger a deload.
pub fn analyze_deload_need(state: &TrainingState) -> DeloadAnalysis {
    let total = state.volume.muscle_count();
    let mrv_breaches: Vec<String> = state
        .volume
        .muscles_at_mrv()
        .into_iter()
        .map(str::to_string)
        .collect();

    let mut reasons = Vec::new();
    if state.consecutive_mrv_weeks >= 2 {
        reasons.push("Two consecutive weeks at MRV".to_string());
    }
    if total > 0 && state.total_muscles_needing_recovery as usize >= total.div_ceil(2) {
        reasons.push("Most muscles need recovery sessions".to_string());
    }
    if state.week_no >= state.meso_len {
        reasons.push("End of mesocycle reached".to_string());
    }
    if total > 0 && mrv_breaches.len() >= total.div_ceil(3) {
        reasons.push(format!("{} muscle groups at/above MRV", mrv_breaches.len()));
    }

    DeloadAnalysis {
        should_deload: state.should_deload(),
        reasons,
        mrv_breaches,
        consecutive_mrv_weeks: state.consecutive_mrv_weeks,
        current_week: state.week_no,
        meso_length: state.meso_len,
        muscles_needing_recovery: state.total_muscles_needing_recovery,
    }
}

/// Deload status for display.
pub fn deload_status(state: &TrainingState) -> DeloadStatus {
    if state.is_deload_phase() {
        return DeloadStatus::Active {
            kind: state.deload_kind(),
            load_reduction: state.load_reduction(),
            weeks_remaining: state.deload_weeks_remaining,
        };
    }

    let triggers = state.deload_triggers();
    if triggers.is_empty() {
        DeloadStatus::NotNeeded
    } else {
        DeloadStatus::Recommended {
            strategy: calculate_deload_strategy(state),
            triggers,
        }
    }
}

fn recommendation(kind: DeloadKind, fatigue: f64, pressure: f64) -> String {
    let fatigue_pct = (fatigue * 100.0).round();
    let pressure_pct = (pressure * 100.0).round();

    match kind {
        DeloadKind::Deep => format!(
            "Deep deload recommended due to high fatigue ({}%) and volume pressure ({}%). Focus on recovery and technique work.",
            fatigue_pct, pressure_pct
        ),
        DeloadKind::Standard => format!(
            "Standard deload recommended with moderate fatigue ({}%) and volume pressure ({}%). Maintain movement patterns with reduced intensity.",
            fatigue_pct, pressure_pct
        ),
        DeloadKind::Light => format!(
            "Light deload recommended with manageable fatigue ({}%) and volume pressure ({}%). Brief recovery before resuming progression.",
            fatigue_pct, pressure_pct
        ),
    }
}
