//! Battery and charger sizing checks run once against the weekly schedule.

use tracing::{error, warn};

use super::grid::{HOURS_PER_DAY, ScheduleGrid, WEEK_HOURS};
use super::shift::ShiftId;

/// Checks that configured battery and charger counts can support a schedule.
///
/// Shortfalls are not fatal: the validator reports them and returns the
/// raised count for the caller to adopt.
#[derive(Debug, Clone, Copy)]
pub struct CapacityValidator<'a> {
    grid: &'a ScheduleGrid,
    truck_kw: f32,
}

impl<'a> CapacityValidator<'a> {
    /// Creates a validator for `grid` with trucks drawing `truck_kw` each.
    pub fn new(grid: &'a ScheduleGrid, truck_kw: f32) -> Self {
        Self { grid, truck_kw }
    }

    /// Smallest battery count the schedule can run on.
    ///
    /// Scans the week for consecutive pairs of distinct shifts. Each pair
    /// needs one pack per truck in both shifts, and enough packs to hold the
    /// energy of both shifts without recharging.
    pub fn min_batteries(&self, battery_capacity: f32) -> u32 {
        let mut min: u64 = 0;
        let mut newer: Option<ShiftId> = None;

        for index in 0..WEEK_HOURS {
            let Some(id) = self.grid.shift_id_at(index) else {
                continue;
            };
            if newer == Some(id) {
                continue;
            }
            if let Some(prev) = newer.replace(id) {
                let s1 = self.grid.shift(prev);
                let s2 = self.grid.shift(id);
                let energy_kwh = (s1.truck_hours() + s2.truck_hours()) as f32 * self.truck_kw;
                let by_energy = (energy_kwh / battery_capacity).ceil() as u64;
                let by_trucks = u64::from(s1.trucks()) + u64::from(s2.trucks());
                min = min.max(by_trucks).max(by_energy);
            }
        }
        u32::try_from(min).unwrap_or(u32::MAX)
    }

    /// Returns `n_batteries`, raised to [`min_batteries`](Self::min_batteries)
    /// if it falls short.
    pub fn validate_batteries(&self, battery_capacity: f32, n_batteries: u32) -> u32 {
        let required = self.min_batteries(battery_capacity);
        if required > n_batteries {
            error!("not enough batteries ({n_batteries}) for the shift schedule, need {required}");
            warn!("adding {} batteries", required - n_batteries);
            return required;
        }
        n_batteries
    }

    /// Largest truck energy demand in any 24-hour window (kWh).
    ///
    /// Windows start at each of the first `WEEK_HOURS - 24` slots and do not
    /// wrap; the weekly schedule repeats, so the tail windows are covered by
    /// their counterparts at the start of the week.
    pub fn max_daily_energy(&self) -> f32 {
        let hourly: Vec<u64> = (0..WEEK_HOURS)
            .map(|i| u64::from(self.grid.trucks_at(i)))
            .collect();

        let mut window: u64 = hourly[..HOURS_PER_DAY].iter().sum();
        let mut max = window;
        for start in 1..WEEK_HOURS - HOURS_PER_DAY {
            window = window - hourly[start - 1] + hourly[start + HOURS_PER_DAY - 1];
            max = max.max(window);
        }
        max as f32 * self.truck_kw
    }

    /// Returns `n_chargers`, raised until a day of charging covers the
    /// busiest day of truck use.
    pub fn validate_chargers(&self, n_chargers: u32, max_charge_kw: f32) -> u32 {
        let needed = self.max_daily_energy();
        let daily_per_charger = max_charge_kw * HOURS_PER_DAY as f32;
        let supply = n_chargers as f32 * daily_per_charger;

        if needed > supply {
            let add = ((needed - supply) / daily_per_charger).ceil() as u32;
            error!(
                "insufficient charging capacity: have {supply:.1} kWh/day, need {needed:.1} kWh/day"
            );
            warn!("adding {add} chargers");
            return n_chargers.saturating_add(add);
        }
        n_chargers
    }
}
