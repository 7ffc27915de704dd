//! Post-hoc KPI computation from simulation results.

use std::fmt;

use super::types::StepResult;

/// Aggregate key performance indicators derived from a complete simulation run.
///
/// Computed post-hoc from `Vec<StepResult>` to ensure consistency between
/// step data and reported metrics.
#[derive(Debug, Clone, Default)]
pub struct KpiReport {
    /// Total energy used by the trucks (kWh).
    pub total_usage_kwh: f32,
    /// Total energy put into batteries (kWh).
    pub total_stored_kwh: f32,
    /// Total energy drawn from the grid (kWh).
    pub total_drawn_kwh: f32,
    /// Total charging cost ($).
    pub total_cost: f32,
    /// Largest single-hour grid draw (kWh).
    pub peak_draw_kwh: f32,
    /// Hours in which trucks had to borrow from the charging pool.
    pub shortfall_steps: usize,
    /// Total energy borrowed from the charging pool (kWh).
    pub total_borrowed_kwh: f32,
    /// Lowest energy seen in the charging pool (kWh, negative means debt).
    pub min_energy_charging: f32,
    /// Number of battery swaps at shift boundaries.
    pub shift_changes: usize,
}

impl KpiReport {
    /// Computes all KPIs from the complete step record vector.
    pub fn from_results(results: &[StepResult]) -> Self {
        if results.is_empty() {
            return Self::default();
        }

        let mut report = Self {
            min_energy_charging: f32::INFINITY,
            ..Self::default()
        };

        for r in results {
            report.total_usage_kwh += r.usage_kwh;
            report.total_stored_kwh += r.stored_kwh;
            report.total_drawn_kwh += r.drawn_kwh;
            report.total_cost += r.cost;
            report.peak_draw_kwh = report.peak_draw_kwh.max(r.drawn_kwh);
            report.min_energy_charging = report.min_energy_charging.min(r.energy_charging);

            if r.borrowed_kwh > 0.0 {
                report.shortfall_steps += 1;
                report.total_borrowed_kwh += r.borrowed_kwh;
            }
            if r.shift_changed {
                report.shift_changes += 1;
            }
        }
        report
    }

    /// Ratio of stored to drawn energy over the run (0 when nothing was drawn).
    pub fn effective_efficiency(&self) -> f32 {
        if self.total_drawn_kwh > 0.0 {
            self.total_stored_kwh / self.total_drawn_kwh
        } else {
            0.0
        }
    }
}

impl fmt::Display for KpiReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- KPI Report ---")?;
        writeln!(f, "Truck usage:           {:.2} kWh", self.total_usage_kwh)?;
        writeln!(
            f,
            "Grid draw:             {:.2} kWh ({:.2} stored, {:.1}% efficient)",
            self.total_drawn_kwh,
            self.total_stored_kwh,
            self.effective_efficiency() * 100.0
        )?;
        writeln!(f, "Peak hourly draw:      {:.2} kWh", self.peak_draw_kwh)?;
        writeln!(f, "Charging cost:         ${:.2}", self.total_cost)?;
        writeln!(f, "Shift changes:         {}", self.shift_changes)?;
        writeln!(
            f,
            "Shortfalls:            {} ({:.2} kWh borrowed)",
            self.shortfall_steps, self.total_borrowed_kwh
        )?;
        write!(f, "Lowest charging pool:  {:.2} kWh", self.min_energy_charging)
    }
}
