use rand::{SeedableRng, rngs::StdRng};

use super::types::gaussian_noise;

/// Stochastic energy usage of the working trucks.
///
/// Each hour the fleet draws `truck_kw` per working truck plus Gaussian noise
/// with standard deviation `truck_std`, clamped at zero. Idle hours draw
/// nothing.
#[derive(Debug, Clone)]
pub struct TruckUsage {
    /// Mean hourly energy per working truck (kWh).
    pub truck_kw: f32,
    /// Standard deviation of the fleet's hourly usage (kWh).
    pub truck_std: f32,
    rng: StdRng,
}

impl TruckUsage {
    /// Creates a usage sampler with its own seeded random stream.
    pub fn new(truck_kw: f32, truck_std: f32, seed: u64) -> Self {
        Self {
            truck_kw,
            truck_std,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Samples one hour of usage (kWh) for `trucks` working trucks.
    pub fn sample(&mut self, trucks: u32) -> f32 {
        if trucks == 0 {
            return 0.0;
        }
        let expected = self.truck_kw * trucks as f32;
        (gaussian_noise(&mut self.rng, self.truck_std) + expected).max(0.0)
    }
}
