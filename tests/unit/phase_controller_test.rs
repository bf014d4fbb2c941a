//! Unit tests for the phase controller: deload triggers, phase changes and week boundaries.

use powerhouse::error::PlannerError;
use powerhouse::phase::{target_rir, DeloadKind, DeloadStatus, DeloadTrigger};
use powerhouse::{MuscleLandmarks, TrainingPhase, TrainingState};

#[test]
fn test_consecutive_mrv_weeks_alone_trigger_deload() {
    let mut state = TrainingState::new();
    assert!(!state.should_deload());

    state.consecutive_mrv_weeks = 1;
    assert!(!state.should_deload());

    state.consecutive_mrv_weeks = 2;
    assert!(state.should_deload());
    assert_eq!(
        state.deload_triggers(),
        vec![DeloadTrigger::ConsecutiveMrvWeeks { weeks: 2 }]
    );
}

#[test]
fn test_recovery_count_triggers_at_half_of_muscles() {
    let mut state = TrainingState::new();

    // 13 default muscles, so 7 is the threshold
    state.total_muscles_needing_recovery = 6;
    assert!(!state.should_deload());
    state.total_muscles_needing_recovery = 7;
    assert!(state.should_deload());
}

#[test]
fn test_major_muscle_at_mrv_needs_recovery_flag() {
    let mut state = TrainingState::new();
    state.volume.update_weekly_sets("Quads", 20).unwrap();
    assert!(!state.should_deload());

    state.phase_controller().hit_mrv("Quads").unwrap();
    assert!(state
        .deload_triggers()
        .contains(&DeloadTrigger::MajorMuscleAtMrv { muscle: "Quads".to_string() }));
}

#[test]
fn test_final_week_triggers_deload() {
    let mut state = TrainingState::new();
    state.week_no = 4;
    assert!(state.should_deload());
    assert!((state.target_rir() - 0.5).abs() < 1e-9);
}

#[test]
fn test_target_rir_progression() {
    assert_eq!(target_rir(1, 4), 3.0);
    assert!((target_rir(2, 4) - 2.1667).abs() < 1e-3);
    assert!((target_rir(3, 4) - 1.3333).abs() < 1e-3);
    assert!((target_rir(4, 4) - 0.5).abs() < 1e-9);
    assert_eq!(target_rir(9, 4), 0.5);
    assert_eq!(target_rir(1, 1), 3.0);
}

#[test]
fn test_basic_deload_and_exit() {
    let mut state = TrainingState::new();
    state.week_no = 3;

    state.phase_controller().start_deload();
    assert_eq!(state.phase(), TrainingPhase::Deload);
    assert_eq!(state.load_reduction(), 0.5);
    // Chest MEV 6 at half volume
    assert_eq!(state.volume.weekly_sets("Chest"), 3);
    assert!(matches!(
        state.summary().current_phase,
        TrainingPhase::Deload
    ));

    state.phase_controller().exit_deload().unwrap();
    assert_eq!(state.phase(), TrainingPhase::Accumulation);
    assert_eq!(state.week_no, 1);
    assert_eq!(state.load_reduction(), 1.0);
    assert_eq!(state.volume.weekly_sets("Chest"), 6);
}

#[test]
fn test_exit_requires_matching_phase() {
    let mut state = TrainingState::new();

    assert!(matches!(
        state.phase_controller().exit_deload(),
        Err(PlannerError::InvalidState(_))
    ));
    assert!(matches!(
        state.phase_controller().end_resensitization(),
        Err(PlannerError::InvalidState(_))
    ));
}

#[test]
fn test_phases_are_mutually_exclusive() {
    let mut state = TrainingState::new();

    state.phase_controller().start_deload();
    state.phase_controller().start_resensitization();
    assert!(state.is_resensitization_phase());
    assert!(!state.is_deload_phase());
    assert_eq!(state.load_reduction(), 1.0);
    assert_eq!(state.volume.weekly_sets("Back"), 6);

    state.phase_controller().start_deload();
    assert!(state.is_deload_phase());
    assert!(!state.is_resensitization_phase());
}

#[test]
fn test_resensitization_round_trip() {
    let mut state = TrainingState::new();

    state.phase_controller().start_resensitization();
    assert_eq!(state.volume.weekly_sets("Chest"), 4);

    state.phase_controller().end_resensitization().unwrap();
    assert_eq!(state.phase(), TrainingPhase::Accumulation);
    assert_eq!(state.volume.weekly_sets("Chest"), 6);
}

#[test]
fn test_execute_strategy_keeps_one_set() {
    let mut state = TrainingState::new();
    state.total_muscles_needing_recovery = 3;
    state.consecutive_mrv_weeks = 1;

    let strategy = state.phase_controller().calculate_deload_strategy();
    assert_eq!(strategy.kind, DeloadKind::Light);
    state.phase_controller().execute_deload(&strategy);

    assert_eq!(state.deload_kind(), Some(DeloadKind::Light));
    assert_eq!(state.load_reduction(), 0.8);
    assert_eq!(state.total_muscles_needing_recovery, 0);
    assert_eq!(state.consecutive_mrv_weeks, 0);
    for muscle in ["Glutes", "Neck"] {
        // MEV 2 at 70% rounds to 1
        assert_eq!(state.volume.weekly_sets(muscle), 1);
    }
    assert!(matches!(
        powerhouse::phase::deload_status(&state),
        DeloadStatus::Active { weeks_remaining: 1, .. }
    ));
}

#[test]
fn test_next_week_tracks_mrv_streak() {
    let mut state = TrainingState::new();
    state.volume.update_weekly_sets("Chest", 22).unwrap();

    let first = state.phase_controller().next_week();
    assert_eq!(first.previous_week, 1);
    assert_eq!(first.week_no, 2);
    assert_eq!(first.consecutive_mrv_weeks, 1);
    assert_eq!(state.volume.last_week_sets("Chest"), Some(22));

    state.phase_controller().next_week();
    assert_eq!(state.consecutive_mrv_weeks, 2);
    assert!(state.should_deload());

    state.volume.update_weekly_sets("Chest", 10).unwrap();
    state.phase_controller().next_week();
    assert_eq!(state.consecutive_mrv_weeks, 0);
}

#[test]
fn test_next_week_rolls_mesocycle() {
    let mut state = TrainingState::new();
    state.recovery_sessions_this_week = 2;
    state.total_muscles_needing_recovery = 4;

    for _ in 0..3 {
        state.phase_controller().next_week();
    }
    assert_eq!(state.week_no, 4);
    assert_eq!(state.recovery_sessions_this_week, 0);
    assert_eq!(state.total_muscles_needing_recovery, 0);

    let transition = state.phase_controller().next_week();
    assert!(transition.mesocycle_completed);
    assert_eq!(transition.week_no, 1);
    assert_eq!(transition.block_no, 2);
}

#[test]
fn test_deload_counts_down_with_weeks() {
    let mut state = TrainingState::new();
    state.volume.set_all(MuscleLandmarks::mrv);
    state.block_no = 25;

    let strategy = state.phase_controller().calculate_deload_strategy();
    assert_eq!(strategy.kind, DeloadKind::Deep);
    assert_eq!(strategy.duration_weeks, 2);
    state.phase_controller().execute_deload(&strategy);

    let first = state.phase_controller().next_week();
    assert!(!first.deload_ended);
    assert!(state.is_deload_phase());

    let second = state.phase_controller().next_week();
    assert!(second.deload_ended);
    assert_eq!(state.phase(), TrainingPhase::Accumulation);
    assert_eq!(state.load_reduction(), 1.0);
}

#[test]
fn test_hit_mrv_counts() {
    let mut state = TrainingState::new();

    assert_eq!(state.phase_controller().hit_mrv("Chest").unwrap(), 1);
    assert_eq!(state.consecutive_mrv_weeks, 0);

    state.volume.update_weekly_sets("Back", 25).unwrap();
    assert_eq!(state.phase_controller().hit_mrv("Back").unwrap(), 2);
    assert_eq!(state.consecutive_mrv_weeks, 1);

    assert!(state.phase_controller().hit_mrv("Wings").is_err());
    assert_eq!(state.total_muscles_needing_recovery, 2);
}

#[test]
fn test_resensitize_every_fourth_block() {
    let mut state = TrainingState::new();
    assert!(!state.should_resensitize());
    state.block_no = 4;
    assert!(state.should_resensitize());

    state.resensitize_interval = 0;
    assert!(!state.should_resensitize());
}

#[test]
fn test_mesocycle_length_validation() {
    let mut state = TrainingState::new();

    assert!(state.phase_controller().set_mesocycle_length(0).is_err());
    assert_eq!(state.meso_len(), 4);

    state.phase_controller().set_mesocycle_length(6).unwrap();
    assert_eq!(state.meso_len(), 6);
    assert!((state.target_rir() - 3.0).abs() < f64::EPSILON);
}
