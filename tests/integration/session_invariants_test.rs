//! Property tests: session totals stay consistent under any mix of logs and undos.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;

use powerhouse::workouts::{SessionMetadata, SetInput, WorkoutSession};

const EXERCISES: [&str; 4] = ["Bench Press", "Squat", "Barbell Row", "Lateral Raise"];

#[derive(Debug, Clone)]
enum Op {
    Log {
        exercise: usize,
        weight: f64,
        reps: i64,
        minute: i64,
    },
    Undo,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        3 => (0..EXERCISES.len(), -20.0..200.0f64, -2..15i64, 0..90i64).prop_map(
            |(exercise, weight, reps, minute)| Op::Log {
                exercise,
                weight,
                reps,
                minute,
            }
        ),
        1 => Just(Op::Undo),
    ]
}

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
}

fn new_session() -> WorkoutSession {
    WorkoutSession::new(
        start(),
        SessionMetadata {
            week: 1,
            mesocycle: 1,
            program_version: "1.0".to_string(),
        },
    )
}

fn assert_consistent(session: &WorkoutSession) {
    let mut total_sets = 0;
    let mut total_volume = 0.0;
    let mut groups: Vec<String> = Vec::new();

    for exercise in session.exercises() {
        assert!(!exercise.sets().is_empty(), "{} has no sets", exercise.name());
        assert_eq!(exercise.total_sets() as usize, exercise.sets().len());

        let volume: f64 = exercise.sets().iter().map(|s| s.weight * f64::from(s.reps)).sum();
        assert!((exercise.total_volume() - volume).abs() < 1e-6);

        for (i, set) in exercise.sets().iter().enumerate() {
            assert_eq!(set.set_number as usize, i + 1);
            assert_eq!(set.exercise, exercise.name());
        }

        total_sets += exercise.total_sets();
        total_volume += exercise.total_volume();
        for group in exercise.muscle_groups() {
            if !groups.contains(group) {
                groups.push(group.clone());
            }
        }
    }

    assert_eq!(session.total_sets(), total_sets);
    assert!((session.total_volume() - total_volume).abs() < 1e-6);
    assert_eq!(session.muscle_groups(), groups.as_slice());
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, .. ProptestConfig::default() })]

    #[test]
    fn session_totals_stay_consistent(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let mut session = new_session();
        let mut expected_sets: u32 = 0;

        for op in ops {
            let before = session.clone();
            match op {
                Op::Log { exercise, weight, reps, minute } => {
                    let input = SetInput::new(EXERCISES[exercise], weight, reps);
                    let at = start() + Duration::minutes(minute);
                    match session.log_set(&input, at) {
                        Ok(_) => expected_sets += 1,
                        Err(_) => {
                            prop_assert!(weight < 0.0 || reps < 0);
                            prop_assert_eq!(&session, &before);
                        }
                    }
                }
                Op::Undo => match session.undo_last_set() {
                    Ok(removed) => {
                        expected_sets -= 1;
                        let latest = before
                            .exercises()
                            .iter()
                            .flat_map(|e| e.sets().iter())
                            .map(|s| s.timestamp)
                            .max();
                        prop_assert_eq!(Some(removed.timestamp), latest);
                    }
                    Err(_) => {
                        prop_assert_eq!(expected_sets, 0);
                        prop_assert_eq!(&session, &before);
                    }
                },
            }

            prop_assert_eq!(session.total_sets(), expected_sets);
            assert_consistent(&session);
        }
    }

    #[test]
    fn undo_everything_empties_session(count in 1usize..20) {
        let mut session = new_session();
        for i in 0..count {
            let input = SetInput::new(EXERCISES[i % EXERCISES.len()], 50.0, 10);
            session.log_set(&input, start() + Duration::minutes(i as i64)).unwrap();
        }

        for remaining in (0..count).rev() {
            session.undo_last_set().unwrap();
            prop_assert_eq!(session.total_sets() as usize, remaining);
        }

        prop_assert!(session.exercises().is_empty());
        prop_assert!(session.muscle_groups().is_empty());
        prop_assert_eq!(session.total_volume(), 0.0);
    }
}
