//! Fatigue feedback, constraint and result records.

use serde::{Deserialize, Serialize};

/// Post-session feedback for one muscle.
///
/// Ratings are small integers (0-3 in the usual questionnaire). `perf_change`
/// is negative when performance dropped since the last session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FatigueFeedback {
    pub soreness: u8,
    pub joint_ache: u8,
    pub perf_change: i8,
    pub pump: u8,
    pub disruption: u8,
    /// Load used last session, compared against the muscle's baseline
    pub last_load: Option<f64>,
}

/// Breakdown behind a high-fatigue verdict.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FatigueAssessment {
    pub fatigue: u32,
    pub stimulus: u32,
    /// Stimulus-to-fatigue ratio
    pub sfr: f64,
    pub strength_drop: bool,
    pub high_fatigue: bool,
}

/// Training experience.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingAge {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
}

impl TrainingAge {
    /// Sessions per week considered sensible for this experience level.
    pub fn frequency_range(self) -> (u32, u32) {
        match self {
            TrainingAge::Beginner => (2, 3),
            TrainingAge::Intermediate => (2, 4),
            TrainingAge::Advanced => (3, 5),
        }
    }
}

impl std::fmt::Display for TrainingAge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrainingAge::Beginner => write!(f, "beginner"),
            TrainingAge::Intermediate => write!(f, "intermediate"),
            TrainingAge::Advanced => write!(f, "advanced"),
        }
    }
}

impl std::str::FromStr for TrainingAge {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(TrainingAge::Beginner),
            "intermediate" => Ok(TrainingAge::Intermediate),
            "advanced" => Ok(TrainingAge::Advanced),
            other => Err(format!("unknown training age: {}", other)),
        }
    }
}

/// How quickly the trainee recovers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryCapacity {
    Low,
    #[default]
    Normal,
    High,
}

impl RecoveryCapacity {
    pub fn multiplier(self) -> f64 {
        match self {
            RecoveryCapacity::Low => 0.8,
            RecoveryCapacity::Normal => 1.0,
            RecoveryCapacity::High => 1.2,
        }
    }
}

impl std::fmt::Display for RecoveryCapacity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoveryCapacity::Low => write!(f, "low"),
            RecoveryCapacity::Normal => write!(f, "normal"),
            RecoveryCapacity::High => write!(f, "high"),
        }
    }
}

impl std::str::FromStr for RecoveryCapacity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "low" => Ok(RecoveryCapacity::Low),
            "normal" => Ok(RecoveryCapacity::Normal),
            "high" => Ok(RecoveryCapacity::High),
            other => Err(format!("unknown recovery capacity: {}", other)),
        }
    }
}

/// Scheduling constraints for a frequency recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FrequencyConstraints {
    pub available_days: u32,
    /// Weekly sets to plan for; the muscle's current week when unset
    pub current_volume: Option<u32>,
    pub recovery_capacity: RecoveryCapacity,
    pub training_age: TrainingAge,
}

impl Default for FrequencyConstraints {
    fn default() -> Self {
        Self {
            available_days: 6,
            current_volume: None,
            recovery_capacity: RecoveryCapacity::Normal,
            training_age: TrainingAge::Intermediate,
        }
    }
}

/// One step either side of the recommended frequency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrequencyAlternatives {
    pub conservative: u32,
    pub aggressive: u32,
}

/// Sessions per week for one muscle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyRecommendation {
    pub muscle: String,
    pub recommended_frequency: u32,
    pub sets_per_session: u32,
    pub total_volume: u32,
    pub reasoning: Vec<String>,
    pub alternatives: FrequencyAlternatives,
}

/// Frequency change suggested by recovery timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FrequencyAction {
    IncreaseFrequency,
    DecreaseFrequency,
    Maintain,
    ImproveRecovery,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Urgency {
    Low,
    Normal,
    Medium,
    High,
}

/// Recovery time compared with the gap between sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyAnalysis {
    pub soreness_recovery_days: f64,
    pub session_gap: f64,
    /// Rounded to two decimals
    pub recovery_ratio: f64,
    pub recommendation: String,
    pub action: FrequencyAction,
    pub frequency_adjustment: i32,
    pub urgency: Urgency,
    pub muscle: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryType {
    #[default]
    Volume,
    Deload,
}

/// Inputs for planning a recovery session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RecoveryOptions {
    pub has_illness: bool,
    pub soreness_level: u8,
    #[serde(rename = "lastSessionRIR")]
    pub last_session_rir: f64,
    pub recovery_type: RecoveryType,
}

impl Default for RecoveryOptions {
    fn default() -> Self {
        Self {
            has_illness: false,
            soreness_level: 2,
            last_session_rir: 0.0,
            recovery_type: RecoveryType::Volume,
        }
    }
}

/// A lighter session for a muscle that needs recovery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecoveryPlan {
    pub muscle: String,
    pub recovery_type: RecoveryType,
    pub sets: u32,
    pub intensity: String,
    #[serde(rename = "rirTarget")]
    pub rir_target: String,
    pub duration: String,
    pub notes: Vec<String>,
}
