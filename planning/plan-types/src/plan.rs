//! Replanning results.
//!
//! A [`Plan`] is what a planner hands back on every tick: the extracted
//! path, snapshots of both value tables for diagnostics and rendering, and
//! [`PlanStats`] about the work done.

use std::time::Duration;

use grid_spatial::CellCoord;

use crate::path::CellPath;
use crate::priority::Priority;
use crate::table::ValueTable;

/// One expansion recorded by a planner: the popped vertex and its key.
///
/// Planners keep these in pop order for rendering the explored region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Visit {
    /// The popped vertex.
    pub cell: CellCoord,
    /// The key it was popped with.
    pub key: Priority,
}

impl Visit {
    /// Creates a visit record.
    #[must_use]
    pub const fn new(cell: CellCoord, key: Priority) -> Self {
        Self { cell, key }
    }
}

/// Statistics about one replanning call.
///
/// # Example
///
/// ```
/// use plan_types::PlanStats;
/// use std::time::Duration;
///
/// let stats = PlanStats::new()
///     .with_expansions(120)
///     .with_absorbed_edges(6)
///     .with_elapsed(Duration::from_micros(800));
///
/// assert_eq!(stats.expansions(), 120);
/// assert_eq!(stats.absorbed_edges(), 6);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlanStats {
    /// Vertices popped from the open set.
    expansions: usize,
    /// Open-set size when the search stopped.
    open_set_size: usize,
    /// Changed edges absorbed before the search.
    absorbed_edges: usize,
    /// Key re-basing accumulator after the call.
    k_m: f64,
    /// Wall-clock time of the call.
    elapsed: Duration,
}

impl PlanStats {
    /// Creates empty statistics.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            expansions: 0,
            open_set_size: 0,
            absorbed_edges: 0,
            k_m: 0.0,
            elapsed: Duration::ZERO,
        }
    }

    /// Sets the number of expansions.
    #[must_use]
    pub const fn with_expansions(mut self, count: usize) -> Self {
        self.expansions = count;
        self
    }

    /// Sets the open-set size at completion.
    #[must_use]
    pub const fn with_open_set_size(mut self, size: usize) -> Self {
        self.open_set_size = size;
        self
    }

    /// Sets the number of absorbed edges.
    #[must_use]
    pub const fn with_absorbed_edges(mut self, count: usize) -> Self {
        self.absorbed_edges = count;
        self
    }

    /// Sets the key re-basing accumulator.
    #[must_use]
    pub const fn with_k_m(mut self, k_m: f64) -> Self {
        self.k_m = k_m;
        self
    }

    /// Sets the elapsed time.
    #[must_use]
    pub const fn with_elapsed(mut self, elapsed: Duration) -> Self {
        self.elapsed = elapsed;
        self
    }

    /// Returns the number of expansions.
    #[must_use]
    pub const fn expansions(&self) -> usize {
        self.expansions
    }

    /// Returns the open-set size at completion.
    #[must_use]
    pub const fn open_set_size(&self) -> usize {
        self.open_set_size
    }

    /// Returns the number of absorbed edges.
    #[must_use]
    pub const fn absorbed_edges(&self) -> usize {
        self.absorbed_edges
    }

    /// Returns the key re-basing accumulator.
    #[must_use]
    pub const fn k_m(&self) -> f64 {
        self.k_m
    }

    /// Returns the elapsed time.
    #[must_use]
    pub const fn elapsed(&self) -> Duration {
        self.elapsed
    }
}

/// The result of a successful replan.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Plan {
    path: CellPath,
    g: ValueTable,
    rhs: ValueTable,
    stats: PlanStats,
}

impl Plan {
    /// Creates a plan from a path, table snapshots and statistics.
    #[must_use]
    pub const fn new(path: CellPath, g: ValueTable, rhs: ValueTable, stats: PlanStats) -> Self {
        Self { path, g, rhs, stats }
    }

    /// Returns the extracted path.
    #[must_use]
    pub const fn path(&self) -> &CellPath {
        &self.path
    }

    /// Returns the `g` table snapshot.
    #[must_use]
    pub const fn g(&self) -> &ValueTable {
        &self.g
    }

    /// Returns the `rhs` table snapshot.
    #[must_use]
    pub const fn rhs(&self) -> &ValueTable {
        &self.rhs
    }

    /// Returns the statistics of the call.
    #[must_use]
    pub const fn stats(&self) -> &PlanStats {
        &self.stats
    }

    /// Consumes the plan and returns the path.
    #[must_use]
    pub fn into_path(self) -> CellPath {
        self.path
    }
}
