//! Periodization phases: deload triggers, deload strategy, resensitization.

pub mod controller;
pub mod deload;

pub use controller::{deload_triggers, target_rir, DeloadTrigger, PhaseController, WeekTransition};
pub use deload::{
    analyze_deload_need, calculate_deload_strategy, deload_status, overall_fatigue,
    volume_pressure, DeloadAnalysis, DeloadKind, DeloadStatus, DeloadStrategy,
};
