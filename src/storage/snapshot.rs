//! JSON snapshot of the training state and the stores that hold it.
//!
//! Every key is optional when loading: a snapshot is shallow-merged onto a
//! default state, so older or partial files still restore what they carry.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::phase::DeloadKind;
use crate::state::{TrainingPhase, TrainingState};
use crate::volume::{MuscleLandmarks, WeeklyVolume};

/// Persisted shape of a `TrainingState`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StateSnapshot {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume_landmarks: Option<BTreeMap<String, MuscleLandmarks>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub week_no: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meso_len: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_no: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deload_phase: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resensitization_phase: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub load_reduction: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_week_sets: Option<BTreeMap<String, u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_week_sets: Option<BTreeMap<String, u32>>,
    /// Derived view, written for readers and ignored on load
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weekly_volume: Option<BTreeMap<String, WeeklyVolume>>,
    #[serde(rename = "consecutiveMRVWeeks", skip_serializing_if = "Option::is_none")]
    pub consecutive_mrv_weeks: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recovery_sessions_this_week: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_muscles_needing_recovery: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub baseline_strength: Option<BTreeMap<String, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deload_type: Option<DeloadKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deload_weeks_remaining: Option<u32>,
}

impl StateSnapshot {
    /// Capture the persistent parts of a state.
    pub fn capture(state: &TrainingState) -> Self {
        Self {
            volume_landmarks: Some(state.volume.all_landmarks().clone()),
            week_no: Some(state.week_no),
            meso_len: Some(state.meso_len),
            block_no: Some(state.block_no),
            deload_phase: Some(state.is_deload_phase()),
            resensitization_phase: Some(state.is_resensitization_phase()),
            load_reduction: Some(state.load_reduction),
            current_week_sets: Some(state.volume.current_week().clone()),
            last_week_sets: Some(state.volume.last_week().clone()),
            weekly_volume: Some(state.volume.weekly_volume()),
            consecutive_mrv_weeks: Some(state.consecutive_mrv_weeks),
            recovery_sessions_this_week: Some(state.recovery_sessions_this_week),
            total_muscles_needing_recovery: Some(state.total_muscles_needing_recovery),
            baseline_strength: Some(state.baseline_strength.clone()),
            deload_type: state.deload_kind,
            deload_weeks_remaining: Some(state.deload_weeks_remaining),
        }
    }

    /// Shallow-merge this snapshot onto `state`.
    pub fn apply_to(self, state: &mut TrainingState) {
        state
            .volume
            .merge(self.volume_landmarks, self.current_week_sets, self.last_week_sets);

        if let Some(meso_len) = self.meso_len {
            if meso_len == 0 {
                tracing::warn!("Ignoring mesocycle length of 0 in snapshot");
            } else {
                state.meso_len = meso_len;
            }
        }
        if let Some(week_no) = self.week_no {
            state.week_no = week_no.max(1);
        }
        if let Some(block_no) = self.block_no {
            state.block_no = block_no.max(1);
        }
        if let Some(n) = self.consecutive_mrv_weeks {
            state.consecutive_mrv_weeks = n;
        }
        if let Some(n) = self.recovery_sessions_this_week {
            state.recovery_sessions_this_week = n;
        }
        if let Some(n) = self.total_muscles_needing_recovery {
            state.total_muscles_needing_recovery = n;
        }
        if let Some(baselines) = self.baseline_strength {
            state
                .baseline_strength
                .extend(baselines.into_iter().filter(|(_, v)| v.is_finite() && *v > 0.0));
        }

        let deload = self.deload_phase.unwrap_or(state.is_deload_phase());
        let resensitization = self
            .resensitization_phase
            .unwrap_or(state.is_resensitization_phase());
        state.phase = match (deload, resensitization) {
            (true, true) => {
                tracing::warn!("Snapshot has both deload and resensitization set; resuming deload");
                TrainingPhase::Deload
            }
            (true, false) => TrainingPhase::Deload,
            (false, true) => TrainingPhase::Resensitization,
            (false, false) => TrainingPhase::Accumulation,
        };

        if state.phase == TrainingPhase::Deload {
            state.deload_kind = self.deload_type.or(state.deload_kind);
            state.deload_weeks_remaining = self
                .deload_weeks_remaining
                .unwrap_or(state.deload_weeks_remaining)
                .max(1);
            state.load_reduction = match self.load_reduction {
                Some(r) if r.is_finite() && r > 0.0 && r <= 1.0 => r,
                Some(r) => {
                    tracing::warn!(load_reduction = r, "Ignoring out-of-range load reduction");
                    state.load_reduction
                }
                None => state.load_reduction,
            };
        } else {
            state.deload_kind = None;
            state.deload_weeks_remaining = 0;
            state.load_reduction = 1.0;
        }
    }
}

impl TrainingState {
    pub fn to_snapshot(&self) -> StateSnapshot {
        StateSnapshot::capture(self)
    }

    pub fn apply_snapshot(&mut self, snapshot: StateSnapshot) {
        snapshot.apply_to(self);
    }
}

/// Storage errors.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Serialize error: {0}")]
    Serialize(String),
}

/// Where snapshots are kept.
pub trait StateStore: Send {
    /// Read the stored snapshot. `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<StateSnapshot>, StorageError>;

    fn save(&self, snapshot: &StateSnapshot) -> Result<(), StorageError>;

    /// Move stored content that failed to parse out of the way so the next
    /// save does not overwrite it.
    fn set_aside(&self) -> Result<(), StorageError> {
        Ok(())
    }
}

/// Pretty-printed JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Where an unparseable snapshot is moved to.
    pub fn corrupt_path(&self) -> PathBuf {
        let mut name = self.path.clone().into_os_string();
        name.push(".corrupt");
        PathBuf::from(name)
    }
}

impl StateStore for JsonFileStore {
    fn load(&self) -> Result<Option<StateSnapshot>, StorageError> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content =
            std::fs::read_to_string(&self.path).map_err(|e| StorageError::Io(e.to_string()))?;
        let snapshot =
            serde_json::from_str(&content).map_err(|e| StorageError::Parse(e.to_string()))?;
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| StorageError::Io(e.to_string()))?;
        }

        let content = serde_json::to_string_pretty(snapshot)
            .map_err(|e| StorageError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, content).map_err(|e| StorageError::Io(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), "Training state saved");
        Ok(())
    }

    fn set_aside(&self) -> Result<(), StorageError> {
        let target = self.corrupt_path();
        std::fs::rename(&self.path, &target).map_err(|e| StorageError::Io(e.to_string()))?;
        tracing::warn!(path = %target.display(), "Unreadable training state moved aside");
        Ok(())
    }
}

/// In-process store holding the serialized JSON text.
#[derive(Debug, Default)]
pub struct MemoryStore {
    slot: Mutex<Option<String>>,
    discarded: Mutex<Option<String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store with raw text, which need not be valid JSON.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
            discarded: Mutex::new(None),
        }
    }

    /// The stored text, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Text that was set aside after failing to parse.
    pub fn discarded(&self) -> Option<String> {
        self.discarded.lock().ok().and_then(|slot| slot.clone())
    }
}

impl StateStore for MemoryStore {
    fn load(&self) -> Result<Option<StateSnapshot>, StorageError> {
        let slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;

        match slot.as_deref() {
            Some(raw) => serde_json::from_str(raw)
                .map(Some)
                .map_err(|e| StorageError::Parse(e.to_string())),
            None => Ok(None),
        }
    }

    fn save(&self, snapshot: &StateSnapshot) -> Result<(), StorageError> {
        let raw =
            serde_json::to_string(snapshot).map_err(|e| StorageError::Serialize(e.to_string()))?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        *slot = Some(raw);
        Ok(())
    }

    fn set_aside(&self) -> Result<(), StorageError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        let mut discarded = self
            .discarded
            .lock()
            .map_err(|e| StorageError::Io(e.to_string()))?;
        *discarded = slot.take();
        Ok(())
    }
}

/// Restore a state from `store` on top of `base`.
///
/// Missing, unreadable or malformed snapshots leave `base` untouched and log a
/// warning. Malformed content is set aside first so later saves keep it.
pub fn restore_state(store: &dyn StateStore, mut base: TrainingState) -> TrainingState {
    match store.load() {
        Ok(Some(snapshot)) => {
            snapshot.apply_to(&mut base);
            tracing::info!(week = base.week_no, block = base.block_no, "Training state restored");
        }
        Ok(None) => {
            tracing::debug!("No saved training state, starting fresh");
        }
        Err(e) => {
            tracing::warn!(error = %e, "Could not restore training state, using defaults");
            if matches!(e, StorageError::Parse(_)) {
                if let Err(e) = store.set_aside() {
                    tracing::error!(error = %e, "Failed to move unreadable training state aside");
                }
            }
        }
    }
    base
}
