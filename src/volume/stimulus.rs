//! Stimulus scoring from post-session feedback.

use serde::{Deserialize, Serialize};

/// Mind-muscle connection, pump and disruption ratings (each 0-3).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusFeedback {
    pub mmc: u8,
    pub pump: u8,
    pub disruption: u8,
}

/// What to do with next session's sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetAction {
    AddSets,
    Maintain,
    ReduceSets,
}

/// Scored stimulus with a set adjustment for next session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StimulusScore {
    /// Sum of the three ratings, 0-9
    pub score: u8,
    pub action: SetAction,
    pub set_change: i32,
    pub advice: String,
}

const MAX_RATING: u8 = 3;

/// Score a session's stimulus. Ratings above 3 are clamped.
pub fn score_stimulus(feedback: StimulusFeedback) -> StimulusScore {
    let score = feedback.mmc.min(MAX_RATING)
        + feedback.pump.min(MAX_RATING)
        + feedback.disruption.min(MAX_RATING);

    let (action, set_change, advice) = match score {
        0..=3 => (
            SetAction::AddSets,
            2,
            format!("Stimulus too low ({}/9) → Add 2 sets next session", score),
        ),
        4..=6 => (
            SetAction::Maintain,
            0,
            format!("Stimulus adequate ({}/9) → Keep sets the same", score),
        ),
        _ => (
            SetAction::ReduceSets,
            -1,
            format!("Stimulus excessive ({}/9) → Remove 1-2 sets next session", score),
        ),
    };

    StimulusScore {
        score,
        action,
        set_change,
        advice,
    }
}
