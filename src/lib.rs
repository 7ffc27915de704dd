//! Battery and charging simulation for a fleet of electric lift trucks
//! working a weekly shift schedule.

/// Saved state for resuming a run.
pub mod bootstrap;
pub mod config;
/// Shift schedule, sizing checks, energy projection and battery pools.
pub mod fleet;
pub mod io;
/// Fleet stepper, clock, charging policies and KPIs.
pub mod sim;
pub mod tariff;
