//! CSV export for simulation step results.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::sim::types::StepResult;

/// Column header for CSV telemetry export.
const HEADER: &str = "step,day_of_week,hour,trucks,shift_changed,usage_kwh,borrowed_kwh,\
                       capacity_in_use_kwh,energy_in_use_kwh,energy_charging_kwh,\
                       stored_kwh,drawn_kwh,price,cost,rate_structure";

/// Exports simulation results to a CSV file at the given path.
///
/// Writes a header row followed by one data row per step. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_csv(results: &[StepResult], path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(results, buf)
}

/// Writes simulation results as CSV to any writer.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_csv(results: &[StepResult], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);

    wtr.write_record(HEADER.split(',').map(str::trim))?;

    for r in results {
        wtr.write_record(&[
            r.step.to_string(),
            r.slot.day_of_week.to_string(),
            r.slot.hour.to_string(),
            r.trucks.to_string(),
            r.shift_changed.to_string(),
            format!("{:.4}", r.usage_kwh),
            format!("{:.4}", r.borrowed_kwh),
            format!("{:.4}", r.capacity_in_use),
            format!("{:.4}", r.energy_in_use),
            format!("{:.4}", r.energy_charging),
            format!("{:.4}", r.stored_kwh),
            format!("{:.4}", r.drawn_kwh),
            format!("{:.4}", r.price),
            format!("{:.4}", r.cost),
            r.rate_structure.to_string(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}
