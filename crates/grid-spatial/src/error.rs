//! Error types for grid operations.

use crate::CellCoord;

/// Errors that can occur during grid operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum SpatialError {
    /// A coordinate lies outside the grid extents.
    #[error("coordinate {coord} is out of bounds")]
    OutOfBounds {
        /// The coordinate that was out of bounds.
        coord: CellCoord,
    },

    /// The grid dimensions are invalid.
    #[error("invalid grid dimensions: {width}x{height}")]
    InvalidDimensions {
        /// Width dimension.
        width: usize,
        /// Height dimension.
        height: usize,
    },

    /// A row layout contained a character that is not a known cell marker.
    #[error("invalid cell marker {ch:?} at row {row}, column {column}")]
    InvalidCell {
        /// The offending character.
        ch: char,
        /// Row index of the character.
        row: usize,
        /// Column index of the character.
        column: usize,
    },
}

impl SpatialError {
    /// Creates an out-of-bounds error for a coordinate.
    #[must_use]
    pub const fn out_of_bounds(coord: CellCoord) -> Self {
        Self::OutOfBounds { coord }
    }
}
