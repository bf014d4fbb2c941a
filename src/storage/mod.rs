//! Storage module for configuration and state snapshots.

pub mod config;
pub mod snapshot;

pub use config::{AppConfig, ConfigError, PersistenceSettings, PlannerSettings};
pub use snapshot::{restore_state, JsonFileStore, MemoryStore, StateSnapshot, StateStore, StorageError};
