//! Error types for configuration, projection, and export.

use thiserror::Error;

use crate::model::types::Scenario;

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"utility.system_peak_mw"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    pub(crate) fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while summarizing or exporting projections.
#[derive(Debug, Error)]
pub enum ProjectionError {
    /// A trajectory has no points.
    #[error("trajectory for scenario `{0}` is empty")]
    EmptyTrajectory(Scenario),

    /// Trajectories in a set cover different horizons.
    #[error("trajectory for scenario `{scenario}` has {actual} points, expected {expected}")]
    LengthMismatch {
        scenario: Scenario,
        expected: usize,
        actual: usize,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
