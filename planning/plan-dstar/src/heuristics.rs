//! Distance functions for edge costs and heuristics.
//!
//! The planner prices a move between two adjacent free cells at the metric
//! distance between them and uses the same metric as its heuristic. This
//! keeps the heuristic consistent for every [`DistanceMetric`].
//!
//! # Example
//!
//! ```
//! use grid_spatial::CellCoord;
//! use plan_dstar::heuristics::compute_distance;
//! use plan_types::DistanceMetric;
//!
//! let from = CellCoord::new(0, 0);
//! let to = CellCoord::new(3, 4);
//!
//! let manhattan = compute_distance(from, to, DistanceMetric::Manhattan);
//! assert!((manhattan - 7.0).abs() < 1e-10);  // 3 + 4
//!
//! let euclidean = compute_distance(from, to, DistanceMetric::Euclidean);
//! assert!((euclidean - 5.0).abs() < 1e-10);  // sqrt(9 + 16)
//! ```

use grid_spatial::{CellCoord, OccupancyGrid};
use plan_types::DistanceMetric;

/// Computes the distance between two cells under `metric`.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
/// use plan_dstar::heuristics::compute_distance;
/// use plan_types::DistanceMetric;
///
/// let a = CellCoord::new(0, 0);
/// let b = CellCoord::new(1, 1);
/// assert!((compute_distance(a, b, DistanceMetric::Chebyshev) - 1.0).abs() < 1e-10);
/// assert!((compute_distance(a, b, DistanceMetric::Octile) - 2f64.sqrt()).abs() < 1e-10);
/// ```
#[must_use]
pub fn compute_distance(from: CellCoord, to: CellCoord, metric: DistanceMetric) -> f64 {
    match metric {
        DistanceMetric::Euclidean => euclidean_distance(from, to),
        DistanceMetric::Manhattan => manhattan_distance(from, to),
        DistanceMetric::Octile => octile_distance(from, to),
        DistanceMetric::Chebyshev => chebyshev_distance(from, to),
    }
}

/// Manhattan distance (L1 norm): `|dx| + |dy|`.
#[must_use]
pub fn manhattan_distance(from: CellCoord, to: CellCoord) -> f64 {
    f64::from(from.manhattan_distance(to))
}

/// Chebyshev distance (L-infinity norm): `max(|dx|, |dy|)`.
#[must_use]
pub fn chebyshev_distance(from: CellCoord, to: CellCoord) -> f64 {
    f64::from(from.chebyshev_distance(to))
}

/// Euclidean distance (L2 norm): `sqrt(dx² + dy²)`.
#[must_use]
pub fn euclidean_distance(from: CellCoord, to: CellCoord) -> f64 {
    let dx = f64::from(from.x.abs_diff(to.x));
    let dy = f64::from(from.y.abs_diff(to.y));
    dx.hypot(dy)
}

/// Octile distance: `max + (√2 - 1) * min`.
///
/// The length of the shortest 8-connected route on an empty grid.
#[must_use]
pub fn octile_distance(from: CellCoord, to: CellCoord) -> f64 {
    let dx = f64::from(from.x.abs_diff(to.x));
    let dy = f64::from(from.y.abs_diff(to.y));
    let (min, max) = if dx < dy { (dx, dy) } else { (dy, dx) };
    (std::f64::consts::SQRT_2 - 1.0).mul_add(min, max)
}

/// Computes the cost of moving between adjacent cells `u` and `v` on `grid`.
///
/// Returns `+∞` if either endpoint is an obstacle or lies outside the grid,
/// otherwise the metric distance between them. Adjacency is not checked.
///
/// # Example
///
/// ```
/// use grid_spatial::{CellCoord, OccupancyGrid};
/// use plan_dstar::heuristics::edge_cost;
/// use plan_types::DistanceMetric;
///
/// let grid = OccupancyGrid::from_rows(&["..", ".#"]).unwrap();
/// let metric = DistanceMetric::Euclidean;
///
/// assert!((edge_cost(&grid, CellCoord::new(0, 0), CellCoord::new(1, 0), metric) - 1.0).abs() < 1e-10);
/// assert!(edge_cost(&grid, CellCoord::new(0, 0), CellCoord::new(1, 1), metric).is_infinite());
/// ```
#[must_use]
pub fn edge_cost(grid: &OccupancyGrid, u: CellCoord, v: CellCoord, metric: DistanceMetric) -> f64 {
    match (grid.is_unoccupied(u), grid.is_unoccupied(v)) {
        (Ok(true), Ok(true)) => compute_distance(u, v, metric),
        _ => f64::INFINITY,
    }
}

/// Sums the metric length of consecutive moves along `cells`.
///
/// Obstacles are not consulted; use this for the geometric length of a
/// path that was already travelled.
#[must_use]
pub fn path_length(cells: &[CellCoord], metric: DistanceMetric) -> f64 {
    cells
        .windows(2)
        .map(|pair| compute_distance(pair[0], pair[1], metric))
        .sum()
}

/// Returns `true` if two costs are equal, treating `+∞` as equal to itself.
///
/// Finite costs produced by different summation orders may differ in the
/// last bits, so they are compared with a small absolute tolerance.
#[must_use]
pub fn costs_match(a: f64, b: f64) -> bool {
    if a.is_infinite() || b.is_infinite() {
        a.is_infinite() && b.is_infinite() && a.signum() == b.signum()
    } else {
        (a - b).abs() <= 1e-9
    }
}
