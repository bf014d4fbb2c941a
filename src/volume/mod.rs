//! Volume landmarks, weekly set tracking, stimulus scoring and weekly progression.

pub mod landmarks;
pub mod progression;
pub mod stimulus;
pub mod store;

pub use landmarks::{default_landmarks, LandmarkUpdate, MuscleLandmarks, VolumeStatus, MAJOR_MUSCLES};
pub use progression::{
    analyze_volume_status, auto_set_increment, get_volume_progression,
    process_weekly_volume_progression, set_progression, validate_volume_input,
    MuscleProgression, ProgressionAction, SessionFeedback, SetIncrement, SetProgression,
    VolumeAnalysis, VolumeProgression, VolumeValidation, WeeklyMuscleFeedback, WeeklyProgression,
};
pub use stimulus::{score_stimulus, SetAction, StimulusFeedback, StimulusScore};
pub use store::{VolumeLandmarkStore, WeeklyVolume};
