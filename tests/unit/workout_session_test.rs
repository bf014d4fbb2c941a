//! Unit tests for live workout sessions: logging, undo and completion.

use chrono::{DateTime, TimeZone, Utc};

use powerhouse::error::PlannerError;
use powerhouse::workouts::{SessionMetadata, SessionStatus, SetInput, WorkoutSession};
use powerhouse::TrainingState;

fn at(hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, hour, minute, 0).unwrap()
}

/// Bench Press x2 then Squat x1, Squat logged last.
fn state_with_push_and_legs() -> TrainingState {
    let mut state = TrainingState::new();
    let mut engine = state.workout_engine();
    engine.start_at(at(10, 0)).unwrap();
    engine
        .log_set_at(&SetInput::new("Bench Press", 135.0, 10).with_rir(2.0), at(10, 5))
        .unwrap();
    engine
        .log_set_at(&SetInput::new("Bench Press", 140.0, 8).with_rir(1.0), at(10, 8))
        .unwrap();
    engine
        .log_set_at(&SetInput::new("Squat", 185.0, 8).with_rir(3.0), at(10, 15))
        .unwrap();
    state
}

#[test]
fn test_log_set_builds_exercises() {
    let state = state_with_push_and_legs();
    let session = state.current_workout().unwrap();

    assert_eq!(session.total_sets(), 3);
    assert_eq!(session.total_volume(), 3950.0);
    assert_eq!(session.exercises().len(), 2);
    assert_eq!(session.muscle_groups(), ["chest", "triceps", "quadriceps", "glutes"]);

    let bench = session.exercise("Bench Press").unwrap();
    assert_eq!(bench.total_sets(), 2);
    assert_eq!(bench.total_volume(), 2470.0);
    let numbers: Vec<u32> = bench.sets().iter().map(|s| s.set_number).collect();
    assert_eq!(numbers, vec![1, 2]);
}

#[test]
fn test_undo_removes_latest_set_and_empty_exercise() {
    let mut state = state_with_push_and_legs();

    let mut engine = state.workout_engine();
    let undo = engine.undo_last_set().unwrap();

    assert_eq!(undo.removed_set.exercise, "Squat");
    assert_eq!(undo.removed_set.weight, 185.0);
    assert_eq!(undo.session.total_sets(), 2);
    assert_eq!(undo.session.total_volume(), 2470.0);
    assert!(undo.session.exercise("Squat").is_none());
    assert_eq!(undo.session.muscle_groups(), ["chest", "triceps"]);
}

#[test]
fn test_invalid_weight_leaves_session_untouched() {
    let mut state = state_with_push_and_legs();
    let before = state.current_workout().cloned();

    let err = state
        .workout_engine()
        .log_set_at(&SetInput::new("Bench Press", -1.0, 8), at(10, 20))
        .unwrap_err();

    assert_eq!(err, PlannerError::Validation("Valid weight is required".to_string()));
    assert_eq!(state.current_workout().cloned(), before);
}

#[test]
fn test_input_validation_messages() {
    let mut state = TrainingState::new();
    let mut engine = state.workout_engine();
    engine.start_at(at(9, 0)).unwrap();

    let cases = [
        (SetInput::new("   ", 100.0, 5), "Exercise name is required"),
        (SetInput::new("Squat", f64::NAN, 5), "Valid weight is required"),
        (SetInput::new("Squat", 100.0, -3), "Valid reps count is required"),
        (SetInput::new("Squat", 100.0, 5).with_rir(11.0), "RIR must be between 0 and 10"),
        (SetInput::new("Squat", 100.0, 5).with_rir(-0.5), "RIR must be between 0 and 10"),
    ];

    for (input, message) in cases {
        let err = engine.log_set_at(&input, at(9, 1)).unwrap_err();
        assert_eq!(err, PlannerError::Validation(message.to_string()));
    }

    assert_eq!(state.current_workout().unwrap().total_sets(), 0);
}

#[test]
fn test_bodyweight_and_zero_reps_are_accepted() {
    let mut state = TrainingState::new();
    let mut engine = state.workout_engine();
    engine.start_at(at(9, 0)).unwrap();

    let set = engine
        .log_set_at(&SetInput::new("Pull-up", 0.0, 0), at(9, 2))
        .unwrap();
    assert_eq!(set.volume(), 0.0);
    assert_eq!(set.set_number, 1);
}

#[test]
fn test_undo_tie_break_removes_last_inserted() {
    let mut state = TrainingState::new();
    let mut engine = state.workout_engine();
    engine.start_at(at(9, 0)).unwrap();
    engine
        .log_set_at(&SetInput::new("Bench Press", 100.0, 5), at(9, 10))
        .unwrap();
    engine
        .log_set_at(&SetInput::new("Squat", 150.0, 5), at(9, 10))
        .unwrap();

    let undo = engine.undo_last_set().unwrap();
    assert_eq!(undo.removed_set.exercise, "Squat");
    assert_eq!(undo.session.exercises().len(), 1);
}

#[test]
fn test_undo_renumbers_remaining_sets() {
    let mut state = TrainingState::new();
    let mut engine = state.workout_engine();
    engine.start_at(at(9, 0)).unwrap();
    // Clock went backwards between the two sets
    engine
        .log_set_at(&SetInput::new("Deadlift", 180.0, 5), at(9, 20))
        .unwrap();
    engine
        .log_set_at(&SetInput::new("Deadlift", 190.0, 3), at(9, 10))
        .unwrap();

    let undo = engine.undo_last_set().unwrap();
    assert_eq!(undo.removed_set.weight, 180.0);

    let deadlift = undo.session.exercise("Deadlift").unwrap();
    assert_eq!(deadlift.sets().len(), 1);
    assert_eq!(deadlift.sets()[0].set_number, 1);
    assert_eq!(deadlift.sets()[0].weight, 190.0);
}

#[test]
fn test_undo_errors() {
    let mut state = TrainingState::new();

    let err = state.workout_engine().undo_last_set().unwrap_err();
    assert_eq!(err.kind(), "invalid_state");

    state.workout_engine().start_at(at(9, 0)).unwrap();
    let err = state.workout_engine().undo_last_set().unwrap_err();
    assert_eq!(
        err,
        PlannerError::EmptySession("No exercises found in current session".to_string())
    );
}

#[test]
fn test_finish_archives_session() {
    let mut state = state_with_push_and_legs();

    let finished = state.workout_engine().finish_at(at(11, 0)).unwrap();
    assert_eq!(finished.status(), SessionStatus::Completed);
    assert_eq!(finished.end_time(), Some(at(11, 0)));
    assert!(state.current_workout().is_none());
    assert_eq!(state.workout_history().len(), 1);
    assert_eq!(state.workout_history()[0].total_sets(), 3);

    let err = state.workout_engine().finish_at(at(11, 5)).unwrap_err();
    assert_eq!(err, PlannerError::NoActiveSession);
}

#[test]
fn test_completed_session_rejects_mutation() {
    let metadata = SessionMetadata {
        week: 1,
        mesocycle: 1,
        program_version: "1.0".to_string(),
    };
    let mut session = WorkoutSession::new(at(8, 0), metadata);
    session.complete(at(9, 0)).unwrap();

    assert!(matches!(
        session.log_set(&SetInput::new("Squat", 100.0, 5), at(9, 5)),
        Err(PlannerError::InvalidState(_))
    ));
    assert!(matches!(session.undo_last_set(), Err(PlannerError::InvalidState(_))));
    assert!(matches!(session.complete(at(9, 10)), Err(PlannerError::InvalidState(_))));
}

#[test]
fn test_stats() {
    let mut state = state_with_push_and_legs();

    let stats = state.workout_engine().stats(at(10, 30));
    assert_eq!(stats.duration, 30);
    assert_eq!(stats.sets_completed, 3);
    assert_eq!(stats.total_volume, 3950.0);
    assert_eq!(stats.average_rir, 2.0);
    assert_eq!(stats.muscles_worked.len(), 4);
}

#[test]
fn test_session_metadata_follows_state() {
    let mut state = TrainingState::new();
    state.week_no = 3;
    state.block_no = 2;

    let session = state.workout_engine().start_at(at(7, 0)).unwrap().clone();
    assert_eq!(session.metadata().week, 3);
    assert_eq!(session.metadata().mesocycle, 2);
    assert_eq!(session.metadata().program_version, "1.0");
}
