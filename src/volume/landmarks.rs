//! Volume landmarks and classification bands.
//!
//! Each muscle group carries four ascending weekly-set thresholds:
//! - MV: maintenance volume
//! - MEV: minimum effective volume
//! - MAV: maximum adaptive volume
//! - MRV: maximum recoverable volume

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PlannerError;

/// Muscles whose MRV breach counts as a deload signal when recovery is lagging.
pub const MAJOR_MUSCLES: [&str; 4] = ["Chest", "Back", "Quads", "Shoulders"];

/// Weekly-set landmarks for one muscle group.
///
/// Construction, update and deserialization all enforce `MV <= MEV <= MAV <= MRV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawLandmarks")]
pub struct MuscleLandmarks {
    #[serde(rename = "MV")]
    mv: u32,
    #[serde(rename = "MEV")]
    mev: u32,
    #[serde(rename = "MAV")]
    mav: u32,
    #[serde(rename = "MRV")]
    mrv: u32,
}

#[derive(Deserialize)]
struct RawLandmarks {
    #[serde(rename = "MV")]
    mv: u32,
    #[serde(rename = "MEV")]
    mev: u32,
    #[serde(rename = "MAV")]
    mav: u32,
    #[serde(rename = "MRV")]
    mrv: u32,
}

impl TryFrom<RawLandmarks> for MuscleLandmarks {
    type Error = PlannerError;

    fn try_from(raw: RawLandmarks) -> Result<Self, Self::Error> {
        MuscleLandmarks::new(raw.mv, raw.mev, raw.mav, raw.mrv)
    }
}

impl MuscleLandmarks {
    /// Create validated landmarks.
    pub fn new(mv: u32, mev: u32, mav: u32, mrv: u32) -> Result<Self, PlannerError> {
        if !(mv <= mev && mev <= mav && mav <= mrv) {
            return Err(PlannerError::Configuration(format!(
                "Landmarks must satisfy MV <= MEV <= MAV <= MRV (got {}/{}/{}/{})",
                mv, mev, mav, mrv
            )));
        }
        Ok(Self { mv, mev, mav, mrv })
    }

    /// Maintenance volume.
    pub fn mv(&self) -> u32 {
        self.mv
    }

    /// Minimum effective volume.
    pub fn mev(&self) -> u32 {
        self.mev
    }

    /// Maximum adaptive volume.
    pub fn mav(&self) -> u32 {
        self.mav
    }

    /// Maximum recoverable volume.
    pub fn mrv(&self) -> u32 {
        self.mrv
    }

    /// Classify a weekly set count. A count equal to a landmark falls into the higher band.
    pub fn status_for(&self, sets: u32) -> VolumeStatus {
        if sets < self.mv {
            VolumeStatus::UnderMinimum
        } else if sets < self.mev {
            VolumeStatus::Maintenance
        } else if sets < self.mav {
            VolumeStatus::Optimal
        } else if sets < self.mrv {
            VolumeStatus::High
        } else {
            VolumeStatus::Maximum
        }
    }

    /// Whether a set count is at or above MRV.
    pub fn is_at_mrv(&self, sets: u32) -> bool {
        sets >= self.mrv
    }

    /// Sets for a single recovery session: midpoint of MEV..MRV minus a small
    /// adjustment, never below half of MEV.
    pub fn recovery_volume(&self, has_illness: bool) -> u32 {
        let midpoint = ((f64::from(self.mev) + f64::from(self.mrv)) / 2.0).round() as u32;
        let adjustment = if has_illness { 2 } else { 1 };
        let floor = (self.mev as f64 * 0.5).ceil() as u32;
        midpoint.saturating_sub(adjustment).max(floor)
    }

    /// Sets prescribed during a deload at the given fraction of MEV.
    pub fn deload_sets(&self, fraction: f64) -> u32 {
        (self.mev as f64 * fraction).round() as u32
    }

    /// Apply a partial update and re-validate the result.
    pub fn merged(&self, update: &LandmarkUpdate) -> Result<Self, PlannerError> {
        Self::new(
            update.mv.unwrap_or(self.mv),
            update.mev.unwrap_or(self.mev),
            update.mav.unwrap_or(self.mav),
            update.mrv.unwrap_or(self.mrv),
        )
    }
}

/// Partial landmark update. Unset fields keep their current value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandmarkUpdate {
    #[serde(rename = "MV", default)]
    pub mv: Option<u32>,
    #[serde(rename = "MEV", default)]
    pub mev: Option<u32>,
    #[serde(rename = "MAV", default)]
    pub mav: Option<u32>,
    #[serde(rename = "MRV", default)]
    pub mrv: Option<u32>,
}

/// Ordered volume bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum VolumeStatus {
    /// Below MV
    UnderMinimum,
    /// MV up to MEV
    Maintenance,
    /// MEV up to MAV
    Optimal,
    /// MAV up to MRV
    High,
    /// At or above MRV
    Maximum,
}

impl std::fmt::Display for VolumeStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VolumeStatus::UnderMinimum => write!(f, "under-minimum"),
            VolumeStatus::Maintenance => write!(f, "maintenance"),
            VolumeStatus::Optimal => write!(f, "optimal"),
            VolumeStatus::High => write!(f, "high"),
            VolumeStatus::Maximum => write!(f, "maximum"),
        }
    }
}

/// Default landmarks from the RP literature.
pub fn default_landmarks() -> BTreeMap<String, MuscleLandmarks> {
    const DEFAULTS: [(&str, [u32; 4]); 13] = [
        ("Chest", [4, 6, 16, 22]),
        ("Back", [6, 10, 20, 25]),
        ("Quads", [6, 10, 16, 20]),
        ("Glutes", [0, 2, 12, 25]),
        ("Hamstrings", [4, 6, 16, 20]),
        ("Shoulders", [4, 8, 16, 20]),
        ("Biceps", [4, 6, 14, 20]),
        ("Triceps", [4, 6, 14, 18]),
        ("Calves", [6, 8, 16, 22]),
        ("Abs", [0, 6, 16, 25]),
        ("Forearms", [2, 4, 10, 16]),
        ("Neck", [0, 2, 8, 12]),
        ("Traps", [2, 4, 12, 16]),
    ];

    DEFAULTS
        .iter()
        .map(|(muscle, [mv, mev, mav, mrv])| {
            (
                muscle.to_string(),
                MuscleLandmarks {
                    mv: *mv,
                    mev: *mev,
                    mav: *mav,
                    mrv: *mrv,
                },
            )
        })
        .collect()
}
