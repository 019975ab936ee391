//! Rescan records passed from a sensor to a planner.
//!
//! A [`Rescan`] is the only channel through which map changes reach a
//! planner. It lists every edge whose traversal cost changed since the
//! previous scan, each with the cost the planner saw before the change, and
//! a [`LocalPatch`] holding the sensed occupancy of the scanned window.

use grid_spatial::{CellCoord, GridBounds, Occupancy, OccupancyGrid, SpatialError};

/// An edge whose traversal cost changed.
///
/// The edge is undirected; planners apply the change in both directions.
/// `old_cost` is the cost before the change and may be `+∞`.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChangedEdge {
    /// One endpoint.
    pub from: CellCoord,
    /// The other endpoint.
    pub to: CellCoord,
    /// Cost of the edge before the change.
    pub old_cost: f64,
}

impl ChangedEdge {
    /// Creates a changed edge record.
    #[must_use]
    pub const fn new(from: CellCoord, to: CellCoord, old_cost: f64) -> Self {
        Self { from, to, old_cost }
    }

    /// Returns the endpoints with the smaller coordinate first.
    ///
    /// Two records describe the same undirected edge iff their keys match.
    #[must_use]
    pub fn key(&self) -> (CellCoord, CellCoord) {
        if self.from <= self.to {
            (self.from, self.to)
        } else {
            (self.to, self.from)
        }
    }
}

/// Sensed occupancy of a rectangular window of the grid.
///
/// # Example
///
/// ```
/// use grid_spatial::{CellCoord, Occupancy, OccupancyGrid};
/// use plan_types::LocalPatch;
///
/// let grid = OccupancyGrid::from_rows(&["..#", "...", "..."]).unwrap();
/// let patch = LocalPatch::capture(&grid, CellCoord::new(0, 0), 2).unwrap();
///
/// assert_eq!(patch.len(), 9);
/// assert_eq!(patch.get(CellCoord::new(2, 0)), Some(Occupancy::Obstacle));
/// assert_eq!(patch.obstacle_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LocalPatch {
    /// Window covered by the patch; `None` for an empty patch.
    bounds: Option<GridBounds>,
    /// Row-major occupancy of the window.
    cells: Vec<Occupancy>,
}

impl LocalPatch {
    /// Creates an empty patch.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            bounds: None,
            cells: Vec::new(),
        }
    }

    /// Copies the square window of half-width `radius` around `center` out of
    /// `grid`, clipped to the grid.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::OutOfBounds`] if `center` is outside `grid`.
    pub fn capture(
        grid: &OccupancyGrid,
        center: CellCoord,
        radius: u32,
    ) -> Result<Self, SpatialError> {
        if !grid.contains(center) {
            return Err(SpatialError::out_of_bounds(center));
        }
        let window = GridBounds::around(center, radius)
            .intersection(&grid.bounds())
            .unwrap_or(GridBounds::from_point(center));
        let cells = window
            .iter()
            .map(|cell| grid.get(cell).unwrap_or_default())
            .collect();
        Ok(Self {
            bounds: Some(window),
            cells,
        })
    }

    /// Returns the window covered by the patch.
    #[must_use]
    pub const fn bounds(&self) -> Option<GridBounds> {
        self.bounds
    }

    /// Returns the number of cells in the patch.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the patch covers no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the sensed occupancy of `cell`, or `None` outside the window.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Occupancy> {
        let bounds = self.bounds?;
        if !bounds.contains(cell) {
            return None;
        }
        let (width, _) = bounds.size();
        let dx = usize::try_from(cell.x.abs_diff(bounds.min.x)).ok()?;
        let dy = usize::try_from(cell.y.abs_diff(bounds.min.y)).ok()?;
        let width = usize::try_from(width).ok()?;
        self.cells.get(dy * width + dx).copied()
    }

    /// Returns the number of obstacle cells in the patch.
    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_obstacle()).count()
    }

    /// Returns an iterator over `(cell, occupancy)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, Occupancy)> + '_ {
        self.bounds
            .into_iter()
            .flat_map(|bounds| bounds.iter())
            .zip(self.cells.iter().copied())
    }

    /// Writes the patch into `grid` and returns how many cells changed.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::OutOfBounds`] if the window does not fit in
    /// `grid`. Nothing is written in that case.
    pub fn apply_to(&self, grid: &mut OccupancyGrid) -> Result<usize, SpatialError> {
        if let Some(bounds) = self.bounds {
            for corner in [bounds.min, bounds.max] {
                if !grid.contains(corner) {
                    return Err(SpatialError::out_of_bounds(corner));
                }
            }
        }

        let mut changed = 0;
        for (cell, state) in self.iter() {
            if grid.set(cell, state)? != state {
                changed += 1;
            }
        }
        Ok(changed)
    }
}

/// The result of one sensor scan.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
/// use plan_types::{ChangedEdge, LocalPatch, Rescan};
///
/// let quiet = Rescan::empty(CellCoord::new(1, 1));
/// assert!(quiet.is_empty());
///
/// let rescan = Rescan::new(
///     CellCoord::new(1, 1),
///     vec![ChangedEdge::new(CellCoord::new(1, 1), CellCoord::new(2, 1), 1.0)],
///     LocalPatch::empty(),
/// );
/// assert_eq!(rescan.changed_edges().len(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rescan {
    /// Agent position the scan was taken from.
    position: CellCoord,
    /// Edges whose cost changed.
    changed_edges: Vec<ChangedEdge>,
    /// Sensed occupancy of the scan window.
    local_map: LocalPatch,
}

impl Rescan {
    /// Creates a rescan record.
    #[must_use]
    pub const fn new(
        position: CellCoord,
        changed_edges: Vec<ChangedEdge>,
        local_map: LocalPatch,
    ) -> Self {
        Self {
            position,
            changed_edges,
            local_map,
        }
    }

    /// Creates a rescan that reports no changes.
    #[must_use]
    pub const fn empty(position: CellCoord) -> Self {
        Self::new(position, Vec::new(), LocalPatch::empty())
    }

    /// Returns the position the scan was taken from.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Returns the changed edges.
    #[must_use]
    pub fn changed_edges(&self) -> &[ChangedEdge] {
        &self.changed_edges
    }

    /// Returns the sensed local occupancy.
    #[must_use]
    pub const fn local_map(&self) -> &LocalPatch {
        &self.local_map
    }

    /// Returns `true` if no edge changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed_edges.is_empty()
    }

    /// Consumes the rescan and returns its parts.
    #[must_use]
    pub fn into_parts(self) -> (CellCoord, Vec<ChangedEdge>, LocalPatch) {
        (self.position, self.changed_edges, self.local_map)
    }
}
