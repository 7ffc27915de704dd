//! Shared fleet parameters and sampling helpers.

use rand::{Rng, rngs::StdRng};
use serde::{Deserialize, Serialize};

/// Physical and planning parameters of one lift-truck fleet.
///
/// Battery and charger counts may be raised at initialization when the
/// schedule needs more than configured.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetParams {
    /// Mean energy drawn by one working truck per hour (kWh).
    pub truck_kw: f32,
    /// Standard deviation of hourly fleet usage (kWh).
    pub truck_std: f32,
    /// Capacity of one battery pack (kWh).
    pub battery_capacity: f32,
    /// Total number of battery packs.
    pub n_batteries: u32,
    /// Number of battery chargers.
    pub n_chargers: u32,
    /// Maximum charge rate of one charger (kW).
    pub max_charge_kw: f32,
    /// Ratio of stored battery energy to energy drawn from the grid (0..1).
    pub charge_efficiency: f32,
    /// Hours scanned past the current shift when projecting energy needs.
    pub planning_horizon: u32,
}

impl Default for FleetParams {
    fn default() -> Self {
        Self {
            truck_kw: 4.0,
            truck_std: 0.8,
            battery_capacity: 50.0,
            n_batteries: 15,
            n_chargers: 8,
            max_charge_kw: 6.0,
            charge_efficiency: 0.9,
            planning_horizon: 60,
        }
    }
}

impl FleetParams {
    /// Nameplate capacity of all battery packs together (kWh).
    pub fn total_capacity(&self) -> f32 {
        self.n_batteries as f32 * self.battery_capacity
    }

    /// Energy all chargers can store in one hour (kWh).
    pub fn charger_capacity(&self) -> f32 {
        self.n_chargers as f32 * self.max_charge_kw
    }

    /// Chargers that can run while `trucks` batteries are out in trucks.
    pub fn effective_chargers(&self, trucks: u32) -> u32 {
        self.n_chargers.min(self.n_batteries.saturating_sub(trucks))
    }
}

/// Utility function to generate Gaussian noise using Box-Muller transform.
///
/// # Arguments
///
/// * `rng` - Random number generator
/// * `std_dev` - Standard deviation of the noise
///
/// # Returns
///
/// Random value from a Gaussian distribution with mean 0 and specified standard deviation
pub fn gaussian_noise(rng: &mut StdRng, std_dev: f32) -> f32 {
    if std_dev <= 0.0 {
        return 0.0;
    }

    let u1: f32 = rng.random::<f32>().clamp(1e-6, 1.0);
    let u2: f32 = rng.random::<f32>();
    let z0 = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f32::consts::PI * u2).cos();
    z0 * std_dev
}
