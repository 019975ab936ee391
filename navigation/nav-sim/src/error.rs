//! Error types for nav-sim.

use plan_types::PlanningError;
use sensor_scan::SensorError;
use thiserror::Error;

/// Errors that stop a navigation run.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum NavError {
    /// Scenario file could not be read or is invalid.
    #[error("configuration error: {0}")]
    Config(String),

    /// Scenario file is not valid TOML.
    #[error("failed to parse scenario: {0}")]
    Toml(#[from] toml::de::Error),

    /// The planner failed with a non-recoverable error.
    #[error(transparent)]
    Planning(#[from] PlanningError),

    /// The sensor failed.
    #[error(transparent)]
    Sensor(#[from] SensorError),

    /// Writing a frame failed.
    #[error("presentation error: {0}")]
    Io(#[from] std::io::Error),
}

impl NavError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config(reason.into())
    }
}

/// Result type for navigation runs.
pub type Result<T> = std::result::Result<T, NavError>;

#[cfg(test)]
mod tests {
    use super::*;
    use grid_spatial::CellCoord;

    #[test]
    fn error_wraps_planning() {
        let err: NavError = PlanningError::out_of_bounds(CellCoord::new(1, 2)).into();
        assert!(err.to_string().contains("(1, 2)"));
    }

    #[test]
    fn error_config() {
        let err = NavError::config("width must be positive");
        assert!(err.to_string().starts_with("configuration error"));
    }
}
