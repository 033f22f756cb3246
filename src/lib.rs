//! Residential bill impact projections for large data-center loads.

pub mod config;
pub mod error;
/// Peak-day and load-duration headroom views.
pub mod headroom;
/// Trajectory export.
pub mod io;
/// Allocation, revenue, net impact, trajectory, and summary models.
pub mod model;
pub mod presets;
