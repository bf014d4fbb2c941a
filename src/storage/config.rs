//! Application configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::PlannerError;

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application version
    pub version: String,
    /// Data directory path
    #[serde(skip)]
    pub data_dir: PathBuf,
    /// Periodization settings
    #[serde(default)]
    pub planner: PlannerSettings,
    /// Snapshot persistence settings
    #[serde(default)]
    pub persistence: PersistenceSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: env!("CARGO_PKG_VERSION").to_string(),
            data_dir: PathBuf::new(),
            planner: PlannerSettings::default(),
            persistence: PersistenceSettings::default(),
        }
    }
}

impl AppConfig {
    /// Full path of the training state snapshot.
    pub fn state_path(&self) -> PathBuf {
        self.data_dir.join(&self.persistence.state_file)
    }
}

/// Periodization settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    /// Weeks per mesocycle
    pub meso_len: u32,
    /// Stamped into each session's metadata
    pub program_version: String,
    /// Initial baseline load per muscle (kg)
    pub default_baseline_load: f64,
    /// Resensitize every N blocks (0 disables)
    pub resensitize_every_blocks: u32,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            meso_len: 4,
            program_version: "1.0".to_string(),
            default_baseline_load: 100.0,
            resensitize_every_blocks: 4,
        }
    }
}

impl PlannerSettings {
    pub fn validate(&self) -> Result<(), PlannerError> {
        if self.meso_len == 0 {
            return Err(PlannerError::Configuration(
                "Mesocycle length must be at least 1 week".to_string(),
            ));
        }
        if !self.default_baseline_load.is_finite() || self.default_baseline_load <= 0.0 {
            return Err(PlannerError::Configuration(
                "Default baseline load must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Snapshot persistence settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// Snapshot file name inside the data directory
    pub state_file: String,
    /// Write a snapshot after every mutating call
    pub save_after_mutation: bool,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            state_file: "training-state.json".to_string(),
            save_after_mutation: true,
        }
    }
}

/// Get the application data directory.
pub fn get_data_dir() -> PathBuf {
    directories::ProjectDirs::from("com", "powerhouse", "Powerhouse")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

/// Get the configuration file path.
pub fn get_config_path() -> PathBuf {
    get_data_dir().join("config.toml")
}

/// Load application configuration from the default location.
pub fn load_config() -> Result<AppConfig, ConfigError> {
    let mut config = load_config_from(&get_config_path())?;
    config.data_dir = get_data_dir();
    Ok(config)
}

/// Load configuration from an explicit path. A missing file yields defaults.
///
/// `data_dir` is set to the file's parent directory.
pub fn load_config_from(path: &Path) -> Result<AppConfig, ConfigError> {
    let data_dir = path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("."));

    if !path.exists() {
        return Ok(AppConfig {
            data_dir,
            ..Default::default()
        });
    }

    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

    let mut config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    config
        .planner
        .validate()
        .map_err(|e| ConfigError::Invalid(e.to_string()))?;

    config.data_dir = data_dir;

    Ok(config)
}

/// Save application configuration to the default location.
pub fn save_config(config: &AppConfig) -> Result<(), ConfigError> {
    save_config_to(config, &get_config_path())
}

/// Save application configuration to an explicit path.
pub fn save_config_to(config: &AppConfig, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ConfigError::IoError(e.to_string()))?;
    }

    let content = toml::to_string_pretty(config).map_err(|e| ConfigError::SerializeError(e.to_string()))?;

    std::fs::write(path, content).map_err(|e| ConfigError::IoError(e.to_string()))?;

    Ok(())
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
