//! Forward projection of the energy the fleet must have charged at each
//! upcoming shift boundary.
//!
//! The schedule ahead is cut into segments that each end where the shift
//! changes. Walking those segments backwards gives, for every segment, the
//! energy the next shift will need and how much charging headroom is left once
//! every later segment's needs are met.

use super::grid::{ScheduleGrid, WEEK_HOURS, next_index, previous_index};
use super::shift::ShiftId;
use super::types::FleetParams;

/// One segment of an energy plan.
#[derive(Debug, Clone, PartialEq)]
pub struct ShiftEnergy {
    /// Slot where the segment ends and the next shift (or idle period) begins.
    pub end_index: usize,
    /// Hours left in the segment.
    pub duration: u32,
    /// Energy the shift starting at `end_index` will use (kWh).
    pub energy_needed: f32,
    /// Energy that must be stored by the end of the segment: the next shift's
    /// needs plus any shortage later segments cannot charge themselves (kWh).
    pub required: f32,
    /// Charging headroom beyond what is required (kWh). On the first segment
    /// this also accounts for the energy already in the charging pool, and can
    /// be negative when the plan cannot be met.
    pub max_surplus: f32,
}

impl ShiftEnergy {
    /// One hour of the segment has passed.
    pub fn tick(&mut self) {
        self.duration = self.duration.saturating_sub(1);
    }
}

/// Inputs of the backward pass for one segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentLoad {
    /// Slot where the segment ends.
    pub end_index: usize,
    /// Length of the segment in hours.
    pub duration: u32,
    /// Trucks working during the segment (their batteries cannot charge).
    pub trucks_during: u32,
    /// Energy the following shift needs (kWh).
    pub needed: f32,
}

/// Computes future energy needs from the weekly schedule.
#[derive(Debug, Clone, Copy)]
pub struct EnergyNeedsProjector<'a> {
    grid: &'a ScheduleGrid,
    params: &'a FleetParams,
}

impl<'a> EnergyNeedsProjector<'a> {
    pub fn new(grid: &'a ScheduleGrid, params: &'a FleetParams) -> Self {
        Self { grid, params }
    }

    /// Cuts the schedule ahead of `start_index` into `(end_index, duration)`
    /// segments.
    ///
    /// The first segment runs from `start_index` (inclusive) to the end of the
    /// current shift or idle period. The following `horizon` hours are then
    /// scanned and a segment is closed at every change; a run still open when
    /// the horizon ends has no boundary and is left out.
    pub fn segments(&self, start_index: usize, horizon: u32) -> Vec<(usize, u32)> {
        let mut index = start_index % WEEK_HOURS;
        let current = self.grid.shift_id_at(index);
        let mut duration = 1;
        loop {
            index = next_index(index);
            if self.grid.shift_id_at(index) != current || duration as usize >= WEEK_HOURS {
                break;
            }
            duration += 1;
        }

        let mut segments = vec![(index, duration)];
        let mut running = self.grid.shift_id_at(index);
        let mut duration = 0;
        for _ in 0..horizon {
            duration += 1;
            index = next_index(index);
            let here = self.grid.shift_id_at(index);
            if here != running {
                segments.push((index, duration));
                running = here;
                duration = 0;
            }
        }
        segments
    }

    /// Describes each segment by the trucks working in it and the energy the
    /// shift after it needs.
    pub fn loads(&self, segments: &[(usize, u32)]) -> Vec<SegmentLoad> {
        segments
            .iter()
            .map(|&(end_index, duration)| SegmentLoad {
                end_index,
                duration,
                trucks_during: self.grid.trucks_at(previous_index(end_index)),
                needed: self
                    .grid
                    .shift_at(end_index)
                    .map_or(0.0, |s| s.truck_hours() as f32 * self.params.truck_kw),
            })
            .collect()
    }

    /// Projects energy needs over `horizon` hours past the current shift,
    /// anchored to the energy already in the charging pool.
    pub fn project(&self, start_index: usize, horizon: u32, energy_charging: f32) -> Vec<ShiftEnergy> {
        let loads = self.loads(&self.segments(start_index, horizon));
        propagate_needs(&loads, self.params, energy_charging)
    }

    /// The shift that begins where a plan segment ends.
    pub fn next_shift(&self, segment: &ShiftEnergy) -> Option<ShiftId> {
        self.grid.shift_id_at(segment.end_index)
    }
}

/// Backward pass over segment loads.
///
/// Each segment can charge `max_charge_kw * duration * chargers`, where the
/// usable chargers are capped by the batteries not out in trucks. Whatever a
/// segment cannot cover is carried back as a shortage to the one before it.
/// Finally the first segment is credited with `energy_charging`.
pub fn propagate_needs(
    loads: &[SegmentLoad],
    params: &FleetParams,
    energy_charging: f32,
) -> Vec<ShiftEnergy> {
    let mut plan = Vec::with_capacity(loads.len());
    let mut shortage = 0.0_f32;

    for load in loads.iter().rev() {
        let chargers = params.effective_chargers(load.trucks_during);
        let available = params.max_charge_kw * load.duration as f32 * chargers as f32;
        let balance = available - load.needed - shortage;

        plan.push(ShiftEnergy {
            end_index: load.end_index,
            duration: load.duration,
            energy_needed: load.needed,
            required: load.needed + shortage,
            max_surplus: balance.max(0.0),
        });
        shortage = (-balance).max(0.0);
    }
    plan.reverse();

    if let Some(first) = plan.first_mut() {
        if first.max_surplus > 0.0 {
            first.max_surplus += energy_charging;
        } else if shortage > 0.0 {
            first.max_surplus = energy_charging - shortage;
        }
    }
    plan
}

/// The last computed plan plus the key that decides whether it still holds.
///
/// A plan stays valid while the shift its first segment leads into has not
/// started yet and calls arrive for consecutive slots; each such call ticks
/// the first segment. Anything else triggers a fresh projection.
#[derive(Debug, Clone, Default)]
pub struct PlanCache {
    plan: Vec<ShiftEnergy>,
    next_shift: Option<ShiftId>,
    last_index: Option<usize>,
}

impl PlanCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the plan for slot `index`, recomputing it when stale.
    pub fn ensure(
        &mut self,
        projector: &EnergyNeedsProjector<'_>,
        index: usize,
        current: Option<ShiftId>,
        energy_charging: f32,
    ) -> &[ShiftEnergy] {
        let index = index % WEEK_HOURS;
        let consecutive = self.last_index.is_some_and(|last| next_index(last) == index);

        if consecutive && !self.plan.is_empty() && self.next_shift != current {
            if let Some(first) = self.plan.first_mut() {
                first.tick();
            }
        } else {
            self.plan = projector.project(index, projector.params.planning_horizon, energy_charging);
            self.next_shift = self.plan.first().and_then(|s| projector.next_shift(s));
        }
        self.last_index = Some(index);
        &self.plan
    }

    /// The cached plan, empty before the first call to [`ensure`](Self::ensure).
    pub fn plan(&self) -> &[ShiftEnergy] {
        &self.plan
    }

    /// Drops the cached plan.
    pub fn invalidate(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fleet::grid::slot_index;

    fn load(duration: u32, needed: f32) -> SegmentLoad {
        SegmentLoad {
            end_index: 0,
            duration,
            trucks_during: 0,
            needed,
        }
    }

    fn tokens(s: &str) -> Vec<&str> {
        s.split_whitespace().collect()
    }

    #[test]
    fn two_segments_with_surplus() {
        // 8h before a 3-truck shift (96 kWh), then 16h before a 6-truck one (192 kWh)
        let params = FleetParams::default();
        let plan = propagate_needs(&[load(8, 96.0), load(16, 192.0)], &params, 100.0);

        assert_eq!(plan.len(), 2);
        // 6 kW * 16 h * 8 chargers = 768 available, 192 needed
        assert_eq!(plan[1].energy_needed, 192.0);
        assert_eq!(plan[1].required, 192.0);
        assert_eq!(plan[1].max_surplus, 576.0);
        // 6 kW * 8 h * 8 chargers = 384 available, 96 needed, plus 100 on hand
        assert_eq!(plan[0].energy_needed, 96.0);
        assert_eq!(plan[0].required, 96.0);
        assert_eq!(plan[0].max_surplus, 388.0);
    }

    #[test]
    fn two_segments_with_shortage() {
        let params = FleetParams {
            n_chargers: 1,
            ..FleetParams::default()
        };
        let plan = propagate_needs(&[load(8, 96.0), load(16, 192.0)], &params, 100.0);

        // 96 available vs 192 needed: 96 short, carried back
        assert_eq!(plan[1].max_surplus, 0.0);
        assert_eq!(plan[1].required, 192.0);
        // 48 available vs 96 + 96: 144 short, charged against the 100 on hand
        assert_eq!(plan[0].required, 192.0);
        assert_eq!(plan[0].max_surplus, 100.0 - 144.0);
    }

    #[test]
    fn working_trucks_take_batteries_off_chargers() {
        let params = FleetParams {
            n_batteries: 10,
            ..FleetParams::default()
        };
        let during_shift = SegmentLoad {
            trucks_during: 6,
            ..load(8, 0.0)
        };
        let plan = propagate_needs(&[during_shift], &params, 0.0);
        // only 4 batteries free: 6 kW * 8 h * 4
        assert_eq!(plan[0].max_surplus, 192.0);
    }

    #[test]
    fn exact_balance_leaves_no_surplus_or_shortage() {
        let params = FleetParams {
            n_chargers: 2,
            ..FleetParams::default()
        };
        let plan = propagate_needs(&[load(16, 192.0)], &params, 50.0);
        assert_eq!(plan[0].max_surplus, 0.0);
    }

    #[test]
    fn segments_follow_the_default_week() {
        let grid = ScheduleGrid::default_schedule();
        let params = FleetParams::default();
        let projector = EnergyNeedsProjector::new(&grid, &params);

        let segments = projector.segments(slot_index(2, 8), 60);
        assert_eq!(
            segments,
            vec![(40, 8), (48, 8), (56, 8), (64, 8), (72, 8), (80, 8), (88, 8), (96, 8)]
        );

        // starting mid-shift shortens the first segment only
        let segments = projector.segments(slot_index(2, 13), 8);
        assert_eq!(segments, vec![(40, 3), (48, 8)]);
    }

    #[test]
    fn projection_over_default_week() {
        let grid = ScheduleGrid::default_schedule();
        let params = FleetParams::default();
        let projector = EnergyNeedsProjector::new(&grid, &params);

        let plan = projector.project(slot_index(2, 8), 60, 200.0);
        assert_eq!(plan.len(), 8);
        // during the 8-truck shift only 7 chargers have batteries: 336 - 192
        assert_eq!(plan[0].energy_needed, 192.0);
        assert_eq!(plan[0].max_surplus, 144.0 + 200.0);
        // during the 6-truck shift all 8 chargers work: 384 - 96
        assert_eq!(plan[1].energy_needed, 96.0);
        assert_eq!(plan[1].max_surplus, 288.0);
        // during the 3-truck shift: 384 - 256
        assert_eq!(plan[2].energy_needed, 256.0);
        assert_eq!(plan[2].max_surplus, 128.0);
    }

    #[test]
    fn projection_across_weekend_wraps() {
        let grid = ScheduleGrid::default_schedule();
        let params = FleetParams::default();
        let projector = EnergyNeedsProjector::new(&grid, &params);

        let plan = projector.project(slot_index(5, 16), 60, 0.0);
        let ends: Vec<(usize, u32)> = plan.iter().map(|s| (s.end_index, s.duration)).collect();
        assert_eq!(ends, vec![(120, 8), (0, 48), (8, 8)]);
        // going idle needs nothing
        assert_eq!(plan[0].energy_needed, 0.0);
        assert_eq!(plan[0].max_surplus, 384.0);
        assert_eq!(plan[1].max_surplus, 2304.0 - 96.0);
        assert_eq!(plan[2].max_surplus, 384.0 - 256.0);
    }

    #[test]
    fn uniform_week_yields_single_full_segment() {
        let (grid, _) = ScheduleGrid::from_tokens(&tokens("block 1 2 3 4 5 6 7 shift 0 24 2"));
        let params = FleetParams::default();
        let projector = EnergyNeedsProjector::new(&grid, &params);
        assert_eq!(projector.segments(10, 60), vec![(10, WEEK_HOURS as u32)]);
    }

    #[test]
    fn cache_ticks_until_the_boundary_is_crossed() {
        let grid = ScheduleGrid::default_schedule();
        let params = FleetParams::default();
        let projector = EnergyNeedsProjector::new(&grid, &params);
        let mut cache = PlanCache::new();

        let start = slot_index(2, 8);
        let current = grid.shift_id_at(start);
        let first = cache.ensure(&projector, start, current, 0.0)[0].clone();
        assert_eq!(first.duration, 8);

        for hour in 1..8 {
            let plan = cache.ensure(&projector, start + hour, current, 0.0);
            assert_eq!(plan[0].end_index, 40);
            assert_eq!(plan[0].duration, 8 - hour as u32);
        }

        // the next shift has started: recompute
        let plan = cache.ensure(&projector, 40, grid.shift_id_at(40), 0.0);
        assert_eq!(plan[0].end_index, 48);
        assert_eq!(plan[0].duration, 8);
    }

    #[test]
    fn cache_recomputes_after_a_gap() {
        let grid = ScheduleGrid::default_schedule();
        let params = FleetParams::default();
        let projector = EnergyNeedsProjector::new(&grid, &params);
        let mut cache = PlanCache::new();

        let start = slot_index(2, 8);
        let current = grid.shift_id_at(start);
        cache.ensure(&projector, start, current, 0.0);
        let plan = cache.ensure(&projector, start + 3, current, 0.0);
        assert_eq!(plan[0].duration, 5);

        cache.invalidate();
        assert!(cache.plan().is_empty());
    }
}
