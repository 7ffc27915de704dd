//! Integration tests for energy-needs projection over whole weeks.

mod common;

use lift_truck_sim::fleet::grid::{WEEK_HOURS, next_index, previous_index};
use lift_truck_sim::fleet::{EnergyNeedsProjector, PlanCache, ScheduleGrid};

fn schedules() -> Vec<ScheduleGrid> {
    vec![
        ScheduleGrid::default_schedule(),
        common::grid("block 1 7 shift 6 10 2 block 3 shift 20 8 5"),
        common::grid("block 2 3 4 5 6 shift 6 12 10 shift 18 12 4"),
    ]
}

#[test]
fn segments_end_exactly_at_schedule_changes() {
    let params = common::default_params();
    for grid in schedules() {
        let projector = EnergyNeedsProjector::new(&grid, &params);
        for start in 0..WEEK_HOURS {
            let segments = projector.segments(start, params.planning_horizon);
            assert!(!segments.is_empty());

            for &(end, duration) in &segments {
                assert!(duration > 0);
                assert_ne!(
                    grid.shift_id_at(end),
                    grid.shift_id_at(previous_index(end)),
                    "segment ending at {end} (start {start}) is not at a change"
                );
            }

            // the first segment covers the rest of the current run
            let (first_end, first_len) = segments[0];
            assert_eq!((start + first_len as usize) % WEEK_HOURS, first_end);

            // later segments fit inside the horizon
            let scanned: u32 = segments[1..].iter().map(|&(_, d)| d).sum();
            assert!(scanned <= params.planning_horizon);
        }
    }
}

#[test]
fn projected_needs_match_the_next_shift() {
    let params = common::default_params();
    for grid in schedules() {
        let projector = EnergyNeedsProjector::new(&grid, &params);
        for start in 0..WEEK_HOURS {
            for segment in projector.project(start, params.planning_horizon, 100.0) {
                let expected = grid
                    .shift_at(segment.end_index)
                    .map_or(0.0, |s| s.truck_hours() as f32 * params.truck_kw);
                assert_eq!(segment.energy_needed, expected);
                assert!(segment.required >= segment.energy_needed);
            }
        }
    }
}

#[test]
fn cached_plan_tracks_fresh_projection() {
    let params = common::default_params();
    for grid in schedules() {
        let projector = EnergyNeedsProjector::new(&grid, &params);
        let mut cache = PlanCache::new();
        let mut index = 0;
        for _ in 0..(2 * WEEK_HOURS) {
            let current = grid.shift_id_at(index);
            let cached = cache.ensure(&projector, index, current, 200.0).first().cloned();
            let fresh = projector
                .project(index, params.planning_horizon, 200.0)
                .first()
                .cloned();
            assert_eq!(
                cached.as_ref().map(|s| (s.end_index, s.duration)),
                fresh.as_ref().map(|s| (s.end_index, s.duration)),
                "slot {index}"
            );
            index = next_index(index);
        }
    }
}

#[test]
fn plan_covers_a_full_day_of_back_to_back_shifts() {
    let params = common::default_params();
    let grid = ScheduleGrid::default_schedule();
    let projector = EnergyNeedsProjector::new(&grid, &params);
    // Tuesday 00:00, start of the night shift
    let plan = projector.project(48, 24, 0.0);
    let needs: Vec<f32> = plan.iter().map(|s| s.energy_needed).collect();
    assert_eq!(needs, vec![256.0, 192.0, 96.0, 256.0]);
}
