use serde::{Deserialize, Serialize};

/// Pooled battery state of the fleet.
///
/// Batteries are not tracked individually. The fleet only knows how much
/// nameplate capacity is out in trucks, how much energy those batteries hold,
/// and how much energy sits in every other battery (charging or waiting).
///
/// `energy_in_use` may dip below zero and `energy_charging` may go negative
/// when trucks use more than is available; such a debt is kept rather than
/// hidden so it shows up in the results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FleetState {
    /// Nameplate capacity of batteries currently in trucks (kWh).
    pub capacity_in_use: f32,
    /// Energy left in the batteries currently in trucks (kWh).
    pub energy_in_use: f32,
    /// Energy held by all batteries not in trucks (kWh).
    pub energy_charging: f32,
}

impl FleetState {
    /// All batteries on the chargers, holding `soc` of `total_capacity`.
    pub fn charged(total_capacity: f32, soc: f32) -> Self {
        Self {
            capacity_in_use: 0.0,
            energy_in_use: 0.0,
            energy_charging: total_capacity * soc,
        }
    }

    /// Energy stored across every battery (kWh).
    pub fn total_energy(&self) -> f32 {
        self.energy_in_use + self.energy_charging
    }

    /// Pulls every battery out of the trucks.
    pub fn normalize(&mut self) {
        self.energy_charging += self.energy_in_use;
        self.capacity_in_use = 0.0;
        self.energy_in_use = 0.0;
    }

    /// Swaps batteries at a shift boundary.
    ///
    /// All batteries come out of the trucks; if a shift starts (`trucks` is
    /// `Some`), the strongest ones go back in, up to one pack per truck.
    /// Total energy is unchanged.
    pub fn change_shift(&mut self, trucks: Option<u32>, battery_capacity: f32) {
        let total = self.total_energy();
        self.normalize();

        if let Some(trucks) = trucks {
            self.capacity_in_use = trucks as f32 * battery_capacity;
            self.energy_in_use = self.capacity_in_use.min(total);
            self.energy_charging = total - self.energy_in_use;
        }
    }

    /// Takes `usage` kWh out of the in-truck batteries.
    ///
    /// Whatever the trucks cannot cover is borrowed from the charging pool.
    /// Returns the borrowed amount (zero when the trucks had enough).
    pub fn discharge(&mut self, usage: f32) -> f32 {
        let deficit = usage - self.energy_in_use;
        let borrowed = if deficit > 0.0 {
            self.energy_in_use += deficit;
            self.energy_charging -= deficit;
            deficit
        } else {
            0.0
        };
        self.energy_in_use -= usage;
        borrowed
    }

    /// Energy the batteries off the trucks could still take (kWh, >= 0).
    pub fn charging_room(&self, total_capacity: f32) -> f32 {
        (total_capacity - self.capacity_in_use - self.energy_charging).max(0.0)
    }

    /// Adds charged energy to the pool.
    pub fn store(&mut self, kwh: f32) {
        self.energy_charging += kwh;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(capacity_in_use: f32, energy_in_use: f32, energy_charging: f32) -> FleetState {
        FleetState {
            capacity_in_use,
            energy_in_use,
            energy_charging,
        }
    }

    #[test]
    fn shift_change_conserves_energy() {
        let mut s = state(400.0, 120.0, 300.0);
        let before = s.total_energy();
        s.change_shift(Some(6), 50.0);
        assert_eq!(s.total_energy(), before);
        assert_eq!(s.capacity_in_use, 300.0);
        assert_eq!(s.energy_in_use, 300.0);
        assert_eq!(s.energy_charging, 120.0);
    }

    #[test]
    fn shift_change_with_little_energy_puts_all_in_trucks() {
        let mut s = state(0.0, 0.0, 80.0);
        s.change_shift(Some(3), 50.0);
        assert_eq!(s.energy_in_use, 80.0);
        assert_eq!(s.energy_charging, 0.0);
    }

    #[test]
    fn going_idle_returns_all_batteries() {
        let mut s = state(150.0, 40.0, 500.0);
        s.change_shift(None, 50.0);
        assert_eq!(s, state(0.0, 0.0, 540.0));
    }

    #[test]
    fn discharge_borrows_from_charging_pool() {
        let mut s = state(150.0, 5.0, 100.0);
        let borrowed = s.discharge(8.0);
        assert_eq!(borrowed, 3.0);
        assert_eq!(s.energy_in_use, 0.0);
        assert_eq!(s.energy_charging, 97.0);
    }

    #[test]
    fn discharge_without_deficit() {
        let mut s = state(150.0, 50.0, 100.0);
        assert_eq!(s.discharge(8.0), 0.0);
        assert_eq!(s.energy_in_use, 42.0);
        assert_eq!(s.energy_charging, 100.0);
    }

    #[test]
    fn deep_deficit_leaves_negative_pool() {
        let mut s = state(150.0, 2.0, 1.0);
        s.discharge(10.0);
        assert_eq!(s.energy_charging, -7.0);
        assert_eq!(s.total_energy(), -7.0);
    }

    #[test]
    fn charging_room_is_clamped() {
        assert_eq!(state(100.0, 90.0, 600.0).charging_room(750.0), 50.0);
        assert_eq!(state(400.0, 90.0, 600.0).charging_room(750.0), 0.0);
    }

    #[test]
    fn charged_state() {
        let s = FleetState::charged(750.0, 0.5);
        assert_eq!(s, state(0.0, 0.0, 375.0));
    }
}
