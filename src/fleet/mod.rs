/// Weekly schedule grid and circular slot indexing.
pub mod grid;
pub mod projection;
/// Shift declarations and schedule configuration errors.
pub mod shift;
pub mod sizing;
pub mod state;
pub mod types;
pub mod usage;

pub use grid::ScheduleGrid;
pub use projection::{EnergyNeedsProjector, PlanCache, ShiftEnergy};
pub use shift::{ScheduleError, Shift, ShiftId};
pub use sizing::CapacityValidator;
pub use state::FleetState;
pub use types::FleetParams;
pub use usage::TruckUsage;
