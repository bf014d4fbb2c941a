//! Exercise name to muscle group lookup.

/// Substring patterns checked in order; the first match wins.
const MUSCLE_MAP: &[(&str, &[&str])] = &[
    ("bench press", &["chest", "triceps"]),
    ("incline bench", &["chest", "triceps"]),
    ("dumbbell press", &["chest", "triceps"]),
    ("chest fly", &["chest"]),
    ("dips", &["chest", "triceps"]),
    ("deadlift", &["back", "glutes", "hamstrings"]),
    ("pull-up", &["back", "biceps"]),
    ("pulldown", &["back", "biceps"]),
    ("row", &["back", "biceps"]),
    ("barbell row", &["back", "biceps"]),
    ("squat", &["quadriceps", "glutes"]),
    ("leg press", &["quadriceps", "glutes"]),
    ("leg curl", &["hamstrings"]),
    ("leg extension", &["quadriceps"]),
    ("calf raise", &["calves"]),
    ("shoulder press", &["shoulders", "triceps"]),
    ("lateral raise", &["shoulders"]),
    ("rear delt fly", &["shoulders"]),
    ("bicep curl", &["biceps"]),
    ("tricep extension", &["triceps"]),
    ("hammer curl", &["biceps"]),
];

/// Muscle groups trained by an exercise, matched case-insensitively.
///
/// Falls back to keyword heuristics and finally to `["other"]`.
pub fn muscle_groups_for(exercise: &str) -> Vec<String> {
    let name = exercise.to_lowercase();

    let groups: &[&str] = MUSCLE_MAP
        .iter()
        .find(|(pattern, _)| name.contains(pattern))
        .map(|(_, muscles)| *muscles)
        .unwrap_or_else(|| fallback(&name));

    groups.iter().map(|m| m.to_string()).collect()
}

fn fallback(name: &str) -> &'static [&'static str] {
    if name.contains("press") || name.contains("bench") {
        &["chest", "triceps"]
    } else if name.contains("pull") || name.contains("row") {
        &["back", "biceps"]
    } else if name.contains("squat") || name.contains("leg") {
        &["legs"]
    } else if name.contains("curl") {
        &["biceps"]
    } else {
        &["other"]
    }
}
