//! Core simulation types: run configuration and per-step records.

use std::fmt;

use super::clock::SlotTime;
use crate::fleet::grid::HOURS_PER_DAY;
use crate::tariff::RateStructure;

/// Centralized simulation configuration.
///
/// # Examples
///
/// ```
/// use lift_truck_sim::sim::clock::SlotTime;
/// use lift_truck_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(7, 42, SlotTime::new(2, 0));
/// assert_eq!(cfg.total_steps(), 168);
/// ```
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Number of days to simulate.
    pub days: usize,
    /// Master random seed for reproducibility.
    pub seed: u64,
    /// Hour of the week the run starts at.
    pub start: SlotTime,
}

impl SimConfig {
    /// Creates a new simulation configuration.
    ///
    /// # Panics
    ///
    /// Panics if `days` is zero.
    pub fn new(days: usize, seed: u64, start: SlotTime) -> Self {
        assert!(days > 0, "days must be > 0");
        Self { days, seed, start }
    }

    /// Total number of hourly steps across all days.
    pub fn total_steps(&self) -> usize {
        self.days * HOURS_PER_DAY
    }
}

/// Complete record of one simulated hour.
#[derive(Debug, Clone)]
pub struct StepResult {
    /// Step index.
    pub step: usize,
    /// Hour of the week.
    pub slot: SlotTime,
    /// Trucks working this hour.
    pub trucks: u32,
    /// Whether batteries were swapped at the start of this hour.
    pub shift_changed: bool,
    /// Energy used by the trucks (kWh).
    pub usage_kwh: f32,
    /// Energy the trucks had to take from the charging pool (kWh, >= 0).
    pub borrowed_kwh: f32,
    /// Battery capacity in trucks after this step (kWh).
    pub capacity_in_use: f32,
    /// Energy in truck batteries after this step (kWh).
    pub energy_in_use: f32,
    /// Energy in batteries off the trucks after this step (kWh).
    pub energy_charging: f32,
    /// Energy put into the batteries (kWh).
    pub stored_kwh: f32,
    /// Energy drawn from the grid, before charging losses (kWh).
    pub drawn_kwh: f32,
    /// Price for energy this hour ($/kWh).
    pub price: f32,
    /// `drawn_kwh * price` ($).
    pub cost: f32,
    /// Rate structure of the tariff that picked the charging policy.
    pub rate_structure: RateStructure,
}

impl fmt::Display for StepResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "t={:>3} ({}) {} trucks={:>2} | used={:>6.2} kWh  borrowed={:>5.2} | \
             in trucks={:>6.1}/{:>6.1}  charging={:>7.1} | stored={:>5.2}  drawn={:>5.2} kWh \
             @ {:.3} [{}]",
            self.step,
            self.slot,
            if self.shift_changed { "*" } else { " " },
            self.trucks,
            self.usage_kwh,
            self.borrowed_kwh,
            self.energy_in_use,
            self.capacity_in_use,
            self.energy_charging,
            self.stored_kwh,
            self.drawn_kwh,
            self.price,
            self.rate_structure,
        )
    }
}
