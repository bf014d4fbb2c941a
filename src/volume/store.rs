//! Per-muscle landmark store with current and previous week set counts.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;
use crate::volume::landmarks::{default_landmarks, LandmarkUpdate, MuscleLandmarks, VolumeStatus};

/// Holds landmarks plus the current and previous week's prescribed sets.
///
/// Set counts are unsigned and every mutation clamps at zero, so a negative
/// weekly count cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VolumeLandmarkStore {
    landmarks: BTreeMap<String, MuscleLandmarks>,
    current_week_sets: BTreeMap<String, u32>,
    last_week_sets: BTreeMap<String, u32>,
}

/// Current weekly sets next to the muscle's landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyVolume {
    pub current: u32,
    #[serde(rename = "MV")]
    pub mv: u32,
    #[serde(rename = "MEV")]
    pub mev: u32,
    #[serde(rename = "MAV")]
    pub mav: u32,
    #[serde(rename = "MRV")]
    pub mrv: u32,
}

impl VolumeLandmarkStore {
    /// Create a store where both weeks start at each muscle's MEV.
    pub fn new(landmarks: BTreeMap<String, MuscleLandmarks>) -> Self {
        let at_mev: BTreeMap<String, u32> = landmarks
            .iter()
            .map(|(muscle, lm)| (muscle.clone(), lm.mev()))
            .collect();

        Self {
            landmarks,
            current_week_sets: at_mev.clone(),
            last_week_sets: at_mev,
        }
    }

    /// Store seeded with the default landmark table.
    pub fn with_defaults() -> Self {
        Self::new(default_landmarks())
    }

    /// Store with no muscles configured.
    pub fn empty() -> Self {
        Self::new(BTreeMap::new())
    }

    /// Landmarks for a muscle, if configured.
    pub fn landmarks(&self, muscle: &str) -> Option<&MuscleLandmarks> {
        self.landmarks.get(muscle)
    }

    /// Landmarks for a muscle or a configuration error naming it.
    pub fn require_landmarks(&self, muscle: &str) -> Result<&MuscleLandmarks, PlannerError> {
        self.landmarks
            .get(muscle)
            .ok_or_else(|| PlannerError::missing_landmarks(muscle))
    }

    /// All configured landmarks keyed by muscle.
    pub fn all_landmarks(&self) -> &BTreeMap<String, MuscleLandmarks> {
        &self.landmarks
    }

    /// Configured muscle names in sorted order.
    pub fn muscles(&self) -> impl Iterator<Item = &str> {
        self.landmarks.keys().map(String::as_str)
    }

    pub fn muscle_count(&self) -> usize {
        self.landmarks.len()
    }

    /// Whether at least one muscle has landmarks.
    pub fn is_configured(&self) -> bool {
        !self.landmarks.is_empty()
    }

    /// Raw current-week entry for a muscle.
    pub fn current_sets(&self, muscle: &str) -> Option<u32> {
        self.current_week_sets.get(muscle).copied()
    }

    /// Current-week sets, falling back to MEV (or zero for unknown muscles).
    pub fn weekly_sets(&self, muscle: &str) -> u32 {
        self.current_sets(muscle)
            .or_else(|| self.landmarks(muscle).map(MuscleLandmarks::mev))
            .unwrap_or(0)
    }

    pub fn last_week_sets(&self, muscle: &str) -> Option<u32> {
        self.last_week_sets.get(muscle).copied()
    }

    pub fn current_week(&self) -> &BTreeMap<String, u32> {
        &self.current_week_sets
    }

    pub fn last_week(&self) -> &BTreeMap<String, u32> {
        &self.last_week_sets
    }

    /// Classify `sets` (or the muscle's weekly sets when `None`) into a volume band.
    pub fn volume_status(
        &self,
        muscle: &str,
        sets: Option<u32>,
    ) -> Result<VolumeStatus, PlannerError> {
        let landmarks = self.require_landmarks(muscle)?;
        let sets = sets.unwrap_or_else(|| self.weekly_sets(muscle));
        Ok(landmarks.status_for(sets))
    }

    /// Set the current-week count for a muscle, clamped at zero.
    pub fn update_weekly_sets(&mut self, muscle: &str, sets: i64) -> Result<u32, PlannerError> {
        self.require_landmarks(muscle)?;
        let clamped = clamp_sets(sets);
        self.current_week_sets.insert(muscle.to_string(), clamped);
        tracing::debug!(muscle, sets = clamped, "Weekly sets updated");
        Ok(clamped)
    }

    /// Adjust the current-week count by `delta`, clamped at zero.
    pub fn add_sets(&mut self, muscle: &str, delta: i64) -> Result<u32, PlannerError> {
        self.require_landmarks(muscle)?;
        let next = i64::from(self.weekly_sets(muscle)) + delta;
        self.update_weekly_sets(muscle, next)
    }

    /// Insert or replace a muscle's landmarks. New muscles start at MEV.
    pub fn set_landmarks(&mut self, muscle: &str, landmarks: MuscleLandmarks) {
        self.landmarks.insert(muscle.to_string(), landmarks);
        self.current_week_sets
            .entry(muscle.to_string())
            .or_insert(landmarks.mev());
        self.last_week_sets
            .entry(muscle.to_string())
            .or_insert(landmarks.mev());
    }

    /// Merge a partial update into a muscle's landmarks.
    ///
    /// An unknown muscle is only accepted when all four values are supplied.
    pub fn update_landmarks(
        &mut self,
        muscle: &str,
        update: &LandmarkUpdate,
    ) -> Result<MuscleLandmarks, PlannerError> {
        let merged = match self.landmarks.get(muscle) {
            Some(existing) => existing.merged(update)?,
            None => match (update.mv, update.mev, update.mav, update.mrv) {
                (Some(mv), Some(mev), Some(mav), Some(mrv)) => {
                    MuscleLandmarks::new(mv, mev, mav, mrv)?
                }
                _ => return Err(PlannerError::missing_landmarks(muscle)),
            },
        };

        self.set_landmarks(muscle, merged);
        tracing::debug!(muscle, "Volume landmarks updated");
        Ok(merged)
    }

    /// Reset every muscle's current week to MEV.
    pub fn reset_week(&mut self) {
        self.set_all(MuscleLandmarks::mev);
    }

    /// Reset one muscle's current week to its MEV.
    pub fn initialize_at_mev(&mut self, muscle: &str) -> Result<u32, PlannerError> {
        let mev = self.require_landmarks(muscle)?.mev();
        self.current_week_sets.insert(muscle.to_string(), mev);
        Ok(mev)
    }

    /// Copy the current week into the previous week.
    pub fn snapshot_week(&mut self) {
        self.last_week_sets = self.current_week_sets.clone();
    }

    /// Bulk-assign every muscle's current week from its landmarks.
    pub fn set_all<F>(&mut self, sets_for: F)
    where
        F: Fn(&MuscleLandmarks) -> u32,
    {
        for (muscle, lm) in &self.landmarks {
            self.current_week_sets.insert(muscle.clone(), sets_for(lm));
        }
    }

    /// Whether the muscle's weekly sets are at or above MRV.
    pub fn is_at_mrv(&self, muscle: &str) -> bool {
        self.landmarks(muscle)
            .map(|lm| lm.is_at_mrv(self.weekly_sets(muscle)))
            .unwrap_or(false)
    }

    /// Muscles currently at or above MRV.
    pub fn muscles_at_mrv(&self) -> Vec<&str> {
        self.muscles().filter(|m| self.is_at_mrv(m)).collect()
    }

    /// Whether at least half of the muscles (rounded up) are at or above MRV.
    pub fn most_muscles_at_mrv(&self) -> bool {
        let total = self.muscle_count();
        total > 0 && self.muscles_at_mrv().len() >= total.div_ceil(2)
    }

    /// Current sets plus landmarks per muscle.
    pub fn weekly_volume(&self) -> BTreeMap<String, WeeklyVolume> {
        self.landmarks
            .iter()
            .map(|(muscle, lm)| {
                (
                    muscle.clone(),
                    WeeklyVolume {
                        current: self.weekly_sets(muscle),
                        mv: lm.mv(),
                        mev: lm.mev(),
                        mav: lm.mav(),
                        mrv: lm.mrv(),
                    },
                )
            })
            .collect()
    }

    /// Shallow-merge persisted maps onto this store. Muscles left without a
    /// weekly entry are filled in at MEV, and weekly entries for muscles
    /// without landmarks are dropped.
    pub(crate) fn merge(
        &mut self,
        landmarks: Option<BTreeMap<String, MuscleLandmarks>>,
        current_week_sets: Option<BTreeMap<String, u32>>,
        last_week_sets: Option<BTreeMap<String, u32>>,
    ) {
        if let Some(landmarks) = landmarks {
            self.landmarks = landmarks;
        }
        if let Some(current) = current_week_sets {
            self.current_week_sets = current;
        }
        if let Some(last) = last_week_sets {
            self.last_week_sets = last;
        }

        let landmarks = &self.landmarks;
        self.current_week_sets.retain(|muscle, _| landmarks.contains_key(muscle));
        self.last_week_sets.retain(|muscle, _| landmarks.contains_key(muscle));

        for (muscle, lm) in &self.landmarks {
            self.current_week_sets
                .entry(muscle.clone())
                .or_insert(lm.mev());
            self.last_week_sets.entry(muscle.clone()).or_insert(lm.mev());
        }
    }
}

impl Default for VolumeLandmarkStore {
    fn default() -> Self {
        Self::with_defaults()
    }
}

pub(crate) fn clamp_sets(sets: i64) -> u32 {
    sets.clamp(0, i64::from(u32::MAX)) as u32
}
