/// Simulation clock and hour-of-week slot times.
pub mod clock;
pub mod kpi;
/// Charging policies selected by tariff rate structure.
pub mod policy;
pub mod stepper;
pub mod types;

pub use stepper::{LiftTruckFleet, StepContext};
