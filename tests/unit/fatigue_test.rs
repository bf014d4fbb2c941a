//! Unit tests for fatigue assessment, frequency and recovery planning.

use powerhouse::fatigue::{
    analyze_frequency, assess_fatigue_accumulation, assess_overreaching_risk,
    calculate_optimal_frequency, generate_recovery_session, is_high_fatigue, FatigueFeedback,
    FatigueLevel, FrequencyAction, FrequencyConstraints, OverreachingMetrics, RecoveryOptions,
    RecoveryType, RiskLevel, Urgency, WeeklyFatigueData,
};
use powerhouse::{PlannerError, TrainingState};

#[test]
fn test_frequency_for_moderate_chest_volume() {
    let mut state = TrainingState::new();
    state.volume.update_weekly_sets("Chest", 12).unwrap();

    let constraints = FrequencyConstraints {
        available_days: 5,
        ..Default::default()
    };
    let rec = calculate_optimal_frequency(&state, "Chest", &constraints).unwrap();

    assert_eq!(rec.recommended_frequency, 2);
    assert_eq!(rec.sets_per_session, 6);
    assert_eq!(rec.total_volume, 12);
}

#[test]
fn test_frequency_respects_available_days() {
    let state = TrainingState::new();
    let constraints = FrequencyConstraints {
        available_days: 1,
        current_volume: Some(20),
        ..Default::default()
    };

    // Training-age minimum wins over a single available day
    let rec = calculate_optimal_frequency(&state, "Back", &constraints).unwrap();
    assert_eq!(rec.recommended_frequency, 2);
    assert_eq!(rec.sets_per_session, 10);
}

#[test]
fn test_frequency_errors() {
    let state = TrainingState::new();

    let no_days = FrequencyConstraints {
        available_days: 0,
        ..Default::default()
    };
    assert!(matches!(
        calculate_optimal_frequency(&state, "Chest", &no_days),
        Err(PlannerError::Validation(_))
    ));
    assert!(matches!(
        calculate_optimal_frequency(&state, "Wings", &FrequencyConstraints::default()),
        Err(PlannerError::Configuration(_))
    ));
}

#[test]
fn test_low_sfr_is_high_fatigue() {
    let state = TrainingState::new();
    let feedback = FatigueFeedback {
        soreness: 2,
        joint_ache: 2,
        perf_change: 0,
        pump: 1,
        disruption: 0,
        last_load: None,
    };

    assert!(is_high_fatigue(&state, "Chest", &feedback));
    let assessment = powerhouse::fatigue::assess_fatigue(&state, "Chest", &feedback);
    assert_eq!(assessment.fatigue, 4);
    assert_eq!(assessment.stimulus, 1);
    assert_eq!(assessment.sfr, 0.25);
    assert!(!assessment.strength_drop);
}

#[test]
fn test_good_session_is_not_high_fatigue() {
    let state = TrainingState::new();
    let feedback = FatigueFeedback {
        soreness: 1,
        pump: 2,
        disruption: 2,
        last_load: Some(100.0),
        ..Default::default()
    };
    assert!(!is_high_fatigue(&state, "Chest", &feedback));
}

#[test]
fn test_strength_drop_uses_baseline() {
    let mut state = TrainingState::new();
    state.set_baseline_strength("Chest", 200.0).unwrap();

    assert!(!state.rep_strength_drop("Chest", Some(195.0)));
    assert!(state.rep_strength_drop("Chest", Some(193.0)));
    assert!(!state.rep_strength_drop("Chest", None));
    assert!(state.set_baseline_strength("Chest", -5.0).is_err());
}

#[test]
fn test_analyze_frequency_directions() {
    let state = TrainingState::new();

    let early = analyze_frequency(&state, 1.0, 3.0, None).unwrap();
    assert_eq!(early.action, FrequencyAction::IncreaseFrequency);
    assert_eq!(early.frequency_adjustment, 1);
    assert_eq!(early.recovery_ratio, 0.33);

    let late = analyze_frequency(&state, 5.0, 2.0, None).unwrap();
    assert_eq!(late.action, FrequencyAction::DecreaseFrequency);
    assert_eq!(late.urgency, Urgency::High);

    let fine = analyze_frequency(&state, 2.0, 2.0, None).unwrap();
    assert_eq!(fine.action, FrequencyAction::Maintain);
    assert_eq!(fine.frequency_adjustment, 0);
}

#[test]
fn test_analyze_frequency_volume_overrides() {
    let mut state = TrainingState::new();

    state.volume.update_weekly_sets("Chest", 22).unwrap();
    let at_mrv = analyze_frequency(&state, 1.0, 3.0, Some("Chest")).unwrap();
    assert_eq!(at_mrv.action, FrequencyAction::Maintain);
    assert_eq!(at_mrv.recommendation, "At MRV - maintain frequency despite early recovery");

    state.volume.update_weekly_sets("Chest", 2).unwrap();
    let below_mv = analyze_frequency(&state, 5.0, 2.0, Some("Chest")).unwrap();
    assert_eq!(below_mv.action, FrequencyAction::ImproveRecovery);
    assert_eq!(below_mv.frequency_adjustment, 0);

    assert!(analyze_frequency(&state, 1.0, 1.0, Some("Wings")).is_err());
}

#[test]
fn test_recovery_session_sizes() {
    let state = TrainingState::new();

    // Chest: round((6 + 22) / 2) - 1 = 13
    let easy = RecoveryOptions {
        soreness_level: 1,
        last_session_rir: 2.0,
        ..Default::default()
    };
    let plan = generate_recovery_session(&state, "Chest", &easy).unwrap();
    assert_eq!(plan.sets, 13);
    assert_eq!(plan.rir_target, "3-4 RIR");
    assert!(plan.notes.is_empty());

    let hard_last_session = generate_recovery_session(&state, "Chest", &RecoveryOptions::default()).unwrap();
    assert_eq!(hard_last_session.sets, 10);

    let sick_and_sore = RecoveryOptions {
        has_illness: true,
        soreness_level: 3,
        last_session_rir: 2.0,
        ..Default::default()
    };
    let plan = generate_recovery_session(&state, "Chest", &sick_and_sore).unwrap();
    assert_eq!(plan.sets, 6);
    assert_eq!(plan.intensity, "40-50% of normal");
    assert_eq!(plan.notes.len(), 2);

    let deload = RecoveryOptions {
        recovery_type: RecoveryType::Deload,
        ..Default::default()
    };
    let plan = generate_recovery_session(&state, "Chest", &deload).unwrap();
    assert_eq!(plan.sets, 3);
    assert_eq!(plan.duration, "3-7 days");
}

#[test]
fn test_weekly_fatigue_levels() {
    let moderate = assess_fatigue_accumulation(&WeeklyFatigueData::default());
    assert_eq!(moderate.fatigue_score, 26);
    assert_eq!(moderate.fatigue_level, FatigueLevel::Moderate);

    let rested = assess_fatigue_accumulation(&WeeklyFatigueData {
        average_soreness: 0.0,
        sleep_quality: 10.0,
        stress_level: 1.0,
        ..Default::default()
    });
    assert_eq!(rested.fatigue_level, FatigueLevel::Low);

    let wrecked = assess_fatigue_accumulation(&WeeklyFatigueData {
        average_soreness: 3.0,
        sleep_quality: 2.0,
        stress_level: 9.0,
        muscles_needing_recovery: 12,
        consecutive_mrv_weeks: 3,
        performance_decline: true,
    });
    assert_eq!(wrecked.fatigue_level, FatigueLevel::Excessive);
    assert!(wrecked.fatigue_score <= 100);
}

#[test]
fn test_overreaching_risk() {
    let metrics = OverreachingMetrics {
        weekly_performance_trend: vec![100.0, 98.0, 95.0],
        weekly_fatigue_trend: vec![70.0, 65.0],
        motivation_level: 2,
        consecutive_mrv_weeks: Some(2),
        ..Default::default()
    };

    let risk = assess_overreaching_risk(&metrics);
    assert_eq!(risk.risk_score, 70);
    assert_eq!(risk.risk_level, RiskLevel::High);
    assert!(risk.requires_immediate_action);
    assert_eq!(risk.risk_factors.len(), 4);

    let calm = assess_overreaching_risk(&OverreachingMetrics::default());
    assert_eq!(calm.risk_level, RiskLevel::Low);
    assert!(!calm.requires_immediate_action);
}
