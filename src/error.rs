//! Error taxonomy shared by the planner core.
//!
//! Every core operation validates its inputs completely before touching
//! state, so any of these errors leaves the `TrainingState` exactly as it
//! was before the call.

use thiserror::Error;

/// Errors returned by planner operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlannerError {
    /// Malformed caller input (missing exercise name, negative load, RIR out of range)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation attempted against a session or phase in the wrong state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// Structural precondition unmet (nothing to act on)
    #[error("Empty session: {0}")]
    EmptySession(String),

    /// Missing or inconsistent volume landmark configuration
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation requires an active workout session and none exists
    #[error("No active workout session")]
    NoActiveSession,
}

impl PlannerError {
    /// Short machine-friendly name of the error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            PlannerError::Validation(_) => "validation",
            PlannerError::InvalidState(_) => "invalid_state",
            PlannerError::EmptySession(_) => "empty_session",
            PlannerError::Configuration(_) => "configuration",
            PlannerError::NoActiveSession => "no_active_session",
        }
    }

    pub(crate) fn missing_landmarks(muscle: &str) -> Self {
        PlannerError::Configuration(format!("Missing volume landmarks for muscle: {}", muscle))
    }
}

/// Convenience alias for planner results.
pub type PlannerResult<T> = Result<T, PlannerError>;
