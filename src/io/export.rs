//! CSV export for projected bill trajectories.

use std::fs::File;
use std::io::{self, Write};
use std::path::Path;

use crate::error::ProjectionError;
use crate::model::trajectory::TrajectorySet;
use crate::model::types::Scenario;

/// Column header: calendar year then one monthly bill column per scenario.
const HEADER: &str = "year,baseline,unoptimized,flexible,dispatchable";

/// Exports a trajectory set to a CSV file at the given path.
///
/// Writes a header row followed by one row per projected year. Produces
/// deterministic output for identical inputs.
///
/// # Errors
///
/// Returns a `ProjectionError` if the trajectories differ in length or if
/// file creation or writing fails.
pub fn export_csv(trajectories: &TrajectorySet, path: &Path) -> Result<(), ProjectionError> {
    let file = File::create(path)?;
    let buf = io::BufWriter::new(file);
    write_csv(trajectories, buf)
}

/// Writes a trajectory set as CSV to any writer.
///
/// Bills are written in dollars with two decimals.
///
/// # Errors
///
/// Returns a `ProjectionError` if the trajectories differ in length or
/// writing fails.
pub fn write_csv(trajectories: &TrajectorySet, writer: impl Write) -> Result<(), ProjectionError> {
    let expected = trajectories.baseline.len();
    for t in trajectories.iter() {
        if t.len() != expected {
            return Err(ProjectionError::LengthMismatch {
                scenario: t.scenario,
                expected,
                actual: t.len(),
            });
        }
    }

    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(HEADER.split(','))?;

    for (i, point) in trajectories.baseline.points.iter().enumerate() {
        let mut row = vec![point.year.to_string()];
        row.extend(
            Scenario::ALL
                .iter()
                .map(|&s| format!("{:.2}", trajectories.get(s).points[i].monthly_bill)),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    Ok(())
}
