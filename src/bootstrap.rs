//! Saved fleet state for resuming a simulation mid-run.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::fleet::{FleetParams, FleetState, ScheduleGrid};
use crate::sim::LiftTruckFleet;
use crate::sim::clock::SlotTime;

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error("failed to access bootstrap file: {0}")]
    Io(#[from] io::Error),

    #[error("invalid bootstrap data: {0}")]
    Json(#[from] serde_json::Error),
}

/// The battery pools plus the shift declarations in effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BootstrapState {
    pub state: FleetState,
    pub shift_data: Vec<String>,
    /// Next hour to simulate. `None` if the fleet never stepped.
    #[serde(default)]
    pub resume_at: Option<SlotTime>,
}

impl BootstrapState {
    pub fn to_json(&self) -> Result<String, BootstrapError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(s: &str) -> Result<Self, BootstrapError> {
        Ok(serde_json::from_str(s)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), BootstrapError> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self, BootstrapError> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    /// Rebuilds a fleet from the saved schedule and battery state.
    ///
    /// With a resume slot the pools come back exactly as saved, batteries
    /// still in the trucks of the shift that was running. Without one the
    /// fleet starts fresh and pools any in-truck energy.
    pub fn restore(&self, name: impl Into<String>, params: FleetParams, seed: u64) -> LiftTruckFleet {
        let grid = ScheduleGrid::configure(&self.shift_data);
        let fleet = LiftTruckFleet::new(name, params, grid, self.state, seed);
        match self.resume_at {
            Some(slot) => fleet.resume(self.state, slot),
            None => fleet,
        }
    }
}
