//! Shared test fixtures for integration tests.
#![allow(dead_code)]

use lift_truck_sim::fleet::{FleetParams, FleetState, ScheduleGrid};
use lift_truck_sim::sim::LiftTruckFleet;
use lift_truck_sim::sim::clock::{Clock, SlotTime};
use lift_truck_sim::sim::types::StepResult;
use lift_truck_sim::tariff::Tariff;

/// Default fleet parameters (4 kW trucks, 15 x 50 kWh batteries, 8 x 6 kW chargers).
pub fn default_params() -> FleetParams {
    FleetParams::default()
}

/// All batteries on the chargers at 70% charge.
pub fn default_state() -> FleetState {
    FleetState::charged(default_params().total_capacity(), 0.7)
}

/// Default fleet on the default weekly schedule.
pub fn default_fleet(seed: u64) -> LiftTruckFleet {
    LiftTruckFleet::new(
        "test",
        default_params(),
        ScheduleGrid::default_schedule(),
        default_state(),
        seed,
    )
}

/// Steps `fleet` for `days` days starting at `start`.
pub fn run_days(
    fleet: &mut LiftTruckFleet,
    start: SlotTime,
    days: usize,
    tariff: &dyn Tariff,
) -> Vec<StepResult> {
    let mut clock = Clock::new(start, days * 24);
    fleet.run(&mut clock, tariff)
}

/// Builds a grid from a whitespace-separated declaration string.
pub fn grid(shifts: &str) -> ScheduleGrid {
    let tokens: Vec<&str> = shifts.split_whitespace().collect();
    ScheduleGrid::configure(&tokens)
}
