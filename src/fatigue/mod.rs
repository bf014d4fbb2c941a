//! Fatigue assessment, frequency recommendations and recovery planning.

pub mod assessor;
pub mod scoring;
pub mod types;

pub use assessor::{
    analyze_frequency, assess_fatigue, calculate_optimal_frequency, generate_recovery_session,
    is_high_fatigue,
};
pub use scoring::{
    assess_fatigue_accumulation, assess_overreaching_risk, DeloadUrgency, FatigueAccumulation,
    FatigueBreakdown, FatigueLevel, OverreachingMetrics, OverreachingRisk, RiskLevel,
    WeeklyFatigueData,
};
pub use types::{
    FatigueAssessment, FatigueFeedback, FrequencyAction, FrequencyAlternatives, FrequencyAnalysis,
    FrequencyConstraints, FrequencyRecommendation, RecoveryCapacity, RecoveryOptions, RecoveryPlan,
    RecoveryType, TrainingAge, Urgency,
};
