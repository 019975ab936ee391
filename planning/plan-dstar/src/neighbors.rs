//! Successor and edge-cost model for grid planning.
//!
//! # Example
//!
//! ```
//! use grid_spatial::{CellCoord, Connectivity, OccupancyGrid};
//! use plan_dstar::neighbors::EdgeModel;
//! use plan_types::DistanceMetric;
//!
//! let grid = OccupancyGrid::from_rows(&["...", ".#.", "..."]).unwrap();
//! let model = EdgeModel::new(Connectivity::Eight, DistanceMetric::Euclidean);
//!
//! // Every in-bounds neighbor is a successor, blocked or not
//! let succ = model.neighbors(&grid, CellCoord::new(0, 0)).unwrap();
//! assert_eq!(succ.len(), 3);
//!
//! // The blocked one is priced at infinity
//! assert!(model.cost(&grid, CellCoord::new(0, 0), CellCoord::new(1, 1)).is_infinite());
//! ```

use grid_spatial::{CellCoord, Connectivity, OccupancyGrid, SpatialError};
use plan_types::{DistanceMetric, PlannerConfig};

use crate::heuristics::{compute_distance, edge_cost};

/// Connectivity plus metric: everything needed to enumerate and price moves.
///
/// Blocked cells stay in the successor set and are priced at `+∞`, so value
/// propagation and path extraction never need a separate obstacle filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EdgeModel {
    connectivity: Connectivity,
    metric: DistanceMetric,
}

impl EdgeModel {
    /// Creates an edge model.
    #[must_use]
    pub const fn new(connectivity: Connectivity, metric: DistanceMetric) -> Self {
        Self {
            connectivity,
            metric,
        }
    }

    /// Creates the edge model described by a planner configuration.
    #[must_use]
    pub const fn from_config(config: &PlannerConfig) -> Self {
        Self::new(config.connectivity(), config.metric())
    }

    /// Returns the connectivity.
    #[must_use]
    pub const fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Returns the metric.
    #[must_use]
    pub const fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Returns all in-bounds neighbors of `cell` in successor order.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::OutOfBounds`] if `cell` is outside `grid`.
    pub fn neighbors(
        &self,
        grid: &OccupancyGrid,
        cell: CellCoord,
    ) -> Result<Vec<CellCoord>, SpatialError> {
        grid.successors(cell, self.connectivity, false)
    }

    /// Returns the free neighbors of `cell` with their move costs.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::OutOfBounds`] if `cell` is outside `grid`.
    pub fn free_successors(
        &self,
        grid: &OccupancyGrid,
        cell: CellCoord,
    ) -> Result<Vec<(CellCoord, f64)>, SpatialError> {
        Ok(grid
            .successors(cell, self.connectivity, true)?
            .into_iter()
            .map(|n| (n, compute_distance(cell, n, self.metric)))
            .collect())
    }

    /// Returns the cost of moving from `u` to `v` on `grid`.
    ///
    /// `+∞` if either cell is blocked or outside the grid.
    #[must_use]
    pub fn cost(&self, grid: &OccupancyGrid, u: CellCoord, v: CellCoord) -> f64 {
        edge_cost(grid, u, v, self.metric)
    }

    /// Returns the heuristic distance between two cells.
    #[must_use]
    pub fn heuristic(&self, from: CellCoord, to: CellCoord) -> f64 {
        compute_distance(from, to, self.metric)
    }

    /// Returns `true` if a single move connects `u` and `v`.
    #[must_use]
    pub fn has_edge(&self, u: CellCoord, v: CellCoord) -> bool {
        self.connectivity.are_adjacent(u, v)
    }
}

/// Computes free successors with integer costs for the `pathfinding` crate.
///
/// Costs are scaled by 1000 and rounded, matching how `pathfinding`'s
/// search functions expect `Ord` costs. Useful as an independent oracle or
/// a from-scratch baseline.
///
/// # Example
///
/// ```
/// use grid_spatial::{CellCoord, Connectivity, OccupancyGrid};
/// use plan_dstar::neighbors::successors_for_grid;
/// use plan_types::DistanceMetric;
///
/// let grid = OccupancyGrid::new(3, 3);
/// let succ = successors_for_grid(
///     CellCoord::new(1, 1),
///     &grid,
///     Connectivity::Eight,
///     DistanceMetric::Euclidean,
/// );
///
/// assert_eq!(succ.len(), 8);
/// assert_eq!(succ[0].1, 1000);
/// assert_eq!(succ[4].1, 1414);
/// ```
#[must_use]
pub fn successors_for_grid(
    cell: CellCoord,
    grid: &OccupancyGrid,
    connectivity: Connectivity,
    metric: DistanceMetric,
) -> Vec<(CellCoord, u64)> {
    if !matches!(grid.is_unoccupied(cell), Ok(true)) {
        return Vec::new();
    }

    EdgeModel::new(connectivity, metric)
        .free_successors(grid, cell)
        .unwrap_or_default()
        .into_iter()
        .map(|(n, cost)| {
            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            let scaled_cost = (cost * 1000.0).round() as u64;
            (n, scaled_cost)
        })
        .collect()
}
