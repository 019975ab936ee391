//! Error types for sensor-scan crate.

use grid_spatial::{CellCoord, SpatialError};
use thiserror::Error;

/// Errors that can occur while building worlds or scanning them.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum SensorError {
    /// A position lies outside the world.
    #[error("position {coord} is outside the world")]
    OutOfBounds {
        /// The offending position.
        coord: CellCoord,
    },

    /// The view range cannot see any cell besides the agent's own.
    #[error("invalid view range {range}: must be at least 1")]
    InvalidViewRange {
        /// The rejected range.
        range: u32,
    },

    /// The sensed map and the world have different extents.
    #[error("sensed map is {found_width}x{found_height} but the world is {width}x{height}")]
    DimensionMismatch {
        /// World width.
        width: usize,
        /// World height.
        height: usize,
        /// Sensed map width.
        found_width: usize,
        /// Sensed map height.
        found_height: usize,
    },

    /// Obstacle density outside `[0, 1]`.
    #[error("invalid obstacle density {0}: must be within [0, 1]")]
    InvalidDensity(f64),

    /// Any other grid error.
    #[error(transparent)]
    Spatial(SpatialError),
}

impl SensorError {
    /// Creates an out-of-bounds error.
    #[must_use]
    pub const fn out_of_bounds(coord: CellCoord) -> Self {
        Self::OutOfBounds { coord }
    }

    /// Creates an invalid view range error.
    #[must_use]
    pub const fn invalid_view_range(range: u32) -> Self {
        Self::InvalidViewRange { range }
    }

    /// Returns `true` if the error concerns a position off the world.
    #[must_use]
    pub const fn is_out_of_bounds(&self) -> bool {
        matches!(self, Self::OutOfBounds { .. })
    }
}

impl From<SpatialError> for SensorError {
    fn from(error: SpatialError) -> Self {
        match error {
            SpatialError::OutOfBounds { coord } => Self::OutOfBounds { coord },
            other => Self::Spatial(other),
        }
    }
}

/// Result type for sensor operations.
pub type Result<T> = std::result::Result<T, SensorError>;
