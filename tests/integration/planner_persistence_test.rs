//! Integration tests for planner persistence and notifications.

use powerhouse::events::{Operation, PlannerEvent};
use powerhouse::storage::{JsonFileStore, MemoryStore, StateStore};
use powerhouse::volume::LandmarkUpdate;
use powerhouse::workouts::SetInput;
use powerhouse::{AppConfig, Planner, TrainingPhase, TrainingState};

fn config_in(dir: &std::path::Path) -> AppConfig {
    AppConfig {
        data_dir: dir.to_path_buf(),
        ..Default::default()
    }
}

#[test]
fn test_state_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    {
        let mut planner = Planner::open(&config).unwrap();
        planner.update_weekly_sets("Chest", 14).unwrap();
        planner.set_baseline_strength("Chest", 120.0).unwrap();
        planner
            .update_volume_landmarks(
                "Chest",
                &LandmarkUpdate {
                    mrv: Some(24),
                    ..Default::default()
                },
            )
            .unwrap();
        planner.next_week();
        planner.start_resensitization();
    }

    assert!(config.state_path().exists());

    let planner = Planner::open(&config).unwrap();
    let state = planner.state();
    assert_eq!(state.week_no, 2);
    assert_eq!(state.phase(), TrainingPhase::Resensitization);
    assert_eq!(state.volume.last_week_sets("Chest"), Some(14));
    assert_eq!(state.volume.weekly_sets("Chest"), 4);
    assert_eq!(state.volume.landmarks("Chest").unwrap().mrv(), 24);
    assert_eq!(state.baseline_strength.get("Chest"), Some(&120.0));
}

#[test]
fn test_deload_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());

    {
        let mut planner = Planner::open(&config).unwrap();
        let strategy = planner.calculate_deload_strategy();
        planner.execute_deload(&strategy);
    }

    let mut planner = Planner::open(&config).unwrap();
    assert!(planner.state().is_deload_phase());
    assert_eq!(planner.state().load_reduction(), 0.8);

    planner.exit_deload().unwrap();
    let planner = Planner::open(&config).unwrap();
    assert_eq!(planner.state().phase(), TrainingPhase::Accumulation);
    assert_eq!(planner.state().load_reduction(), 1.0);
}

#[test]
fn test_malformed_file_falls_back_to_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_in(dir.path());
    std::fs::write(config.state_path(), "{ not json").unwrap();

    let mut planner = Planner::open(&config).unwrap();
    assert_eq!(planner.state(), &TrainingState::new());

    // The unreadable file is kept aside and survives the next save
    planner.add_sets("Chest", 1).unwrap();
    let corrupt = JsonFileStore::new(config.state_path()).corrupt_path();
    assert!(corrupt.ends_with("training-state.json.corrupt"));
    assert_eq!(std::fs::read_to_string(&corrupt).unwrap(), "{ not json");
    assert!(config.state_path().exists());
}

#[test]
fn test_partial_snapshot_is_merged() {
    let store = MemoryStore::with_raw(
        r#"{"weekNo": 3, "currentWeekSets": {"Chest": 18}, "consecutiveMRVWeeks": 1}"#,
    );
    let planner = Planner::with_store(Box::new(store), TrainingState::new());

    let state = planner.state();
    assert_eq!(state.week_no, 3);
    assert_eq!(state.block_no, 1);
    assert_eq!(state.consecutive_mrv_weeks, 1);
    assert_eq!(state.volume.weekly_sets("Chest"), 18);
    assert_eq!(state.volume.weekly_sets("Back"), 10);
    assert_eq!(state.volume.muscle_count(), 13);
}

#[test]
fn test_conflicting_phase_flags_resolve_to_deload() {
    let store = MemoryStore::with_raw(
        r#"{"deloadPhase": true, "resensitizationPhase": true, "loadReduction": 0.5}"#,
    );
    let planner = Planner::with_store(Box::new(store), TrainingState::new());

    assert!(planner.state().is_deload_phase());
    assert!(!planner.state().is_resensitization_phase());
    assert_eq!(planner.state().load_reduction(), 0.5);
}

#[test]
fn test_snapshot_file_uses_camel_case_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("state.json");
    let mut planner = Planner::with_store(Box::new(JsonFileStore::new(&path)), TrainingState::new());
    planner.add_sets("Back", 2).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(json["weekNo"], 1);
    assert_eq!(json["currentWeekSets"]["Back"], 12);
    assert_eq!(json["volumeLandmarks"]["Back"]["MRV"], 25);
    assert_eq!(json["weeklyVolume"]["Back"]["current"], 12);
    assert_eq!(json["consecutiveMRVWeeks"], 0);

    let loaded = JsonFileStore::new(&path).load().unwrap().unwrap();
    assert_eq!(loaded.current_week_sets.unwrap().get("Back"), Some(&12));
}

#[test]
fn test_landmarks_snapshot_drops_orphan_sets() {
    let store = MemoryStore::with_raw(
        r#"{"volumeLandmarks": {"Chest": {"MV": 4, "MEV": 6, "MAV": 16, "MRV": 22}},
            "currentWeekSets": {"Chest": 9, "Back": 14},
            "lastWeekSets": {"Back": 12}}"#,
    );
    let planner = Planner::with_store(Box::new(store), TrainingState::new());

    let volume = &planner.state().volume;
    assert_eq!(volume.muscle_count(), 1);
    assert_eq!(volume.current_sets("Chest"), Some(9));
    assert!(volume.current_sets("Back").is_none());
    assert!(volume.last_week_sets("Back").is_none());

    let snapshot = planner.state().to_snapshot();
    assert!(!snapshot.current_week_sets.unwrap().contains_key("Back"));
}

#[test]
fn test_save_can_be_disabled() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.persistence.save_after_mutation = false;

    let mut planner = Planner::open(&config).unwrap();
    planner.start_deload();
    assert!(!config.state_path().exists());

    planner.save().unwrap();
    assert!(config.state_path().exists());
}

#[test]
fn test_event_stream_for_a_week() {
    let mut planner = Planner::default();
    let events = planner.event_receiver();

    planner.start_workout().unwrap();
    planner.log_set(&SetInput::new("Squat", 140.0, 6)).unwrap();
    assert!(planner.log_set(&SetInput::new("", 140.0, 6)).is_err());
    planner.finish_workout().unwrap();
    planner.start_deload();
    planner.next_week();

    let received: Vec<PlannerEvent> = events.try_iter().collect();
    assert!(matches!(received[0], PlannerEvent::WorkoutStarted { .. }));
    assert!(matches!(received[1], PlannerEvent::SetLogged { total_sets: 1, .. }));
    assert!(matches!(
        received[2],
        PlannerEvent::OperationFailed {
            operation: Operation::LogSet,
            ..
        }
    ));
    assert!(matches!(
        received[3],
        PlannerEvent::WorkoutFinished { total_sets: 1, .. }
    ));
    assert_eq!(
        received[4],
        PlannerEvent::PhaseChanged {
            phase: TrainingPhase::Deload
        }
    );
    assert!(matches!(received[5], PlannerEvent::WeekAdvanced(ref t) if t.deload_ended));
    assert_eq!(
        received[6],
        PlannerEvent::PhaseChanged {
            phase: TrainingPhase::Accumulation
        }
    );
    assert_eq!(received.len(), 7);
}

#[test]
fn test_shared_planner_across_threads() {
    let shared = Planner::default().shared();

    let handles: Vec<_> = ["Chest", "Back", "Quads", "Shoulders"]
        .into_iter()
        .map(|muscle| {
            let planner = std::sync::Arc::clone(&shared);
            std::thread::spawn(move || {
                let mut planner = planner.lock().unwrap();
                planner.add_sets(muscle, 1).unwrap()
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let planner = shared.lock().unwrap();
    assert_eq!(planner.state().volume.weekly_sets("Chest"), 7);
    assert_eq!(planner.state().volume.weekly_sets("Back"), 11);
}
