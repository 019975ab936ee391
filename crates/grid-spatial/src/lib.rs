//! 2D grid spatial types for replanning.
//!
//! This crate provides the Layer 0 spatial vocabulary shared by the planner,
//! the sensor and the navigation loop:
//!
//! - [`CellCoord`] - Integer cell coordinates
//! - [`GridBounds`] - Inclusive rectangular windows in cell space
//! - [`OccupancyGrid`] - Dense free/obstacle grid with bounds-checked queries
//! - [`Connectivity`] - 4- or 8-neighborhoods with a fixed successor order
//!
//! # Coordinate System
//!
//! `x` grows east (columns) and `y` grows south (rows). The grid is anchored
//! at `(0, 0)`; coordinates are signed so neighbor offsets can be computed
//! at the border and then rejected by bounds checks.
//!
//! # Successor Order
//!
//! [`OccupancyGrid::successors`] returns neighbors in the order N, E, S, W,
//! followed by NE, SE, SW, NW for 8-connectivity. Planners break ties
//! between equally good neighbors by taking the first one, so this order is
//! what makes extracted paths reproducible.
//!
//! # Example
//!
//! ```
//! use grid_spatial::{CellCoord, Connectivity, Occupancy, OccupancyGrid};
//!
//! let mut grid = OccupancyGrid::new(5, 5);
//! grid.set(CellCoord::new(2, 2), Occupancy::Obstacle).unwrap();
//!
//! assert!(!grid.is_unoccupied(CellCoord::new(2, 2)).unwrap());
//! assert_eq!(grid.obstacle_count(), 1);
//!
//! let free_neighbors = grid
//!     .successors(CellCoord::new(2, 1), Connectivity::Eight, true)
//!     .unwrap();
//! assert_eq!(free_neighbors.len(), 7);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod cell;
mod connectivity;
mod error;
mod grid;

pub use cell::CellCoord;
pub use connectivity::Connectivity;
pub use error::SpatialError;
pub use grid::{GridBounds, GridBoundsIter, Occupancy, OccupancyGrid};

#[cfg(all(test, feature = "serde"))]
#[allow(clippy::unwrap_used)]
mod serde_tests {
    use super::*;

    #[test]
    fn grid_serde_round_trip() {
        let grid = OccupancyGrid::from_rows(&[".#", ".."]).unwrap();
        let json = serde_json::to_string(&grid).unwrap();
        let back: OccupancyGrid = serde_json::from_str(&json).unwrap();
        assert_eq!(grid, back);
    }
}
