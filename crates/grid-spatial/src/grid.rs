//! Occupancy grid data structure.

use std::fmt;

use crate::cell::CellCoord;
use crate::connectivity::Connectivity;
use crate::error::SpatialError;

/// Axis-aligned bounds in cell space.
///
/// Both corners are inclusive.
///
/// # Example
///
/// ```
/// use grid_spatial::{CellCoord, GridBounds};
///
/// let bounds = GridBounds::new(CellCoord::new(0, 0), CellCoord::new(9, 4));
/// assert!(bounds.contains(CellCoord::new(9, 4)));
/// assert!(!bounds.contains(CellCoord::new(10, 4)));
/// assert_eq!(bounds.size(), (10, 5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GridBounds {
    /// Minimum corner (inclusive).
    pub min: CellCoord,
    /// Maximum corner (inclusive).
    pub max: CellCoord,
}

impl GridBounds {
    /// Creates new bounds from two corners, ordering them so `min ≤ max` on each axis.
    #[must_use]
    pub fn new(a: CellCoord, b: CellCoord) -> Self {
        Self {
            min: CellCoord::new(a.x.min(b.x), a.y.min(b.y)),
            max: CellCoord::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Creates bounds containing a single cell.
    #[must_use]
    pub const fn from_point(cell: CellCoord) -> Self {
        Self {
            min: cell,
            max: cell,
        }
    }

    /// Creates the square window of half-width `radius` centered on `center`.
    ///
    /// The window is not clipped; intersect it with a grid's bounds to keep
    /// only real cells.
    ///
    /// # Example
    ///
    /// ```
    /// use grid_spatial::{CellCoord, GridBounds};
    ///
    /// let window = GridBounds::around(CellCoord::new(0, 0), 2);
    /// assert_eq!(window.min, CellCoord::new(-2, -2));
    /// assert_eq!(window.size(), (5, 5));
    /// ```
    #[must_use]
    pub const fn around(center: CellCoord, radius: u32) -> Self {
        let r = if radius > i32::MAX as u32 {
            i32::MAX
        } else {
            radius as i32
        };
        Self {
            min: CellCoord::new(center.x.saturating_sub(r), center.y.saturating_sub(r)),
            max: CellCoord::new(center.x.saturating_add(r), center.y.saturating_add(r)),
        }
    }

    /// Returns the size of the bounds as `(width, height)`.
    #[must_use]
    pub const fn size(&self) -> (u32, u32) {
        (
            self.max.x.abs_diff(self.min.x).saturating_add(1),
            self.max.y.abs_diff(self.min.y).saturating_add(1),
        )
    }

    /// Returns the number of cells covered.
    #[must_use]
    pub fn area(&self) -> u64 {
        let (w, h) = self.size();
        u64::from(w).saturating_mul(u64::from(h))
    }

    /// Checks if the bounds contain a cell.
    #[must_use]
    pub const fn contains(&self, cell: CellCoord) -> bool {
        cell.x >= self.min.x && cell.x <= self.max.x && cell.y >= self.min.y && cell.y <= self.max.y
    }

    /// Returns the intersection of two bounds, or `None` if they don't overlap.
    ///
    /// # Example
    ///
    /// ```
    /// use grid_spatial::{CellCoord, GridBounds};
    ///
    /// let grid = GridBounds::new(CellCoord::new(0, 0), CellCoord::new(9, 9));
    /// let window = GridBounds::around(CellCoord::new(0, 8), 2);
    /// let clipped = grid.intersection(&window).unwrap();
    /// assert_eq!(clipped.min, CellCoord::new(0, 6));
    /// assert_eq!(clipped.max, CellCoord::new(2, 9));
    /// ```
    #[must_use]
    pub fn intersection(&self, other: &Self) -> Option<Self> {
        let min = CellCoord::new(self.min.x.max(other.min.x), self.min.y.max(other.min.y));
        let max = CellCoord::new(self.max.x.min(other.max.x), self.max.y.min(other.max.y));

        if min.x <= max.x && min.y <= max.y {
            Some(Self { min, max })
        } else {
            None
        }
    }

    /// Returns an iterator over all cells in row-major order (x varies fastest).
    #[must_use]
    pub const fn iter(&self) -> GridBoundsIter {
        GridBoundsIter {
            bounds: *self,
            current: Some(self.min),
        }
    }
}

impl IntoIterator for GridBounds {
    type Item = CellCoord;
    type IntoIter = GridBoundsIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for &GridBounds {
    type Item = CellCoord;
    type IntoIter = GridBoundsIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over all cells in a [`GridBounds`].
#[derive(Debug, Clone)]
pub struct GridBoundsIter {
    bounds: GridBounds,
    current: Option<CellCoord>,
}

impl Iterator for GridBoundsIter {
    type Item = CellCoord;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;

        let mut next = current;
        if next.x < self.bounds.max.x {
            next.x += 1;
        } else if next.y < self.bounds.max.y {
            next.x = self.bounds.min.x;
            next.y += 1;
        } else {
            self.current = None;
            return Some(current);
        }
        self.current = Some(next);

        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.current.map_or(0, |current| {
            let width = u64::from(self.bounds.max.x.abs_diff(self.bounds.min.x)) + 1;
            let rest_of_row = u64::from(self.bounds.max.x.abs_diff(current.x)) + 1;
            let rows_below = u64::from(self.bounds.max.y.abs_diff(current.y));
            rest_of_row.saturating_add(rows_below.saturating_mul(width))
        });

        let remaining = usize::try_from(remaining).unwrap_or(usize::MAX);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for GridBoundsIter {}

/// Occupancy state of a single cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Occupancy {
    /// Traversable cell.
    #[default]
    Free,
    /// Blocked cell.
    Obstacle,
}

impl Occupancy {
    /// Returns `true` for [`Occupancy::Obstacle`].
    #[must_use]
    pub const fn is_obstacle(self) -> bool {
        matches!(self, Self::Obstacle)
    }

    /// Returns the character used for this state in row layouts.
    #[must_use]
    pub const fn marker(self) -> char {
        match self {
            Self::Free => '.',
            Self::Obstacle => '#',
        }
    }
}

/// A dense 2D occupancy grid anchored at `(0, 0)`.
///
/// Cells are stored row-major. Every query that takes a coordinate checks it
/// against the grid extents and fails with [`SpatialError::OutOfBounds`]
/// rather than treating outside cells as free or blocked.
///
/// # Example
///
/// ```
/// use grid_spatial::{CellCoord, Connectivity, Occupancy, OccupancyGrid};
///
/// let mut grid = OccupancyGrid::new(3, 3);
/// grid.set(CellCoord::new(1, 0), Occupancy::Obstacle).unwrap();
///
/// let succ = grid
///     .successors(CellCoord::new(1, 1), Connectivity::Four, true)
///     .unwrap();
/// // North is blocked, so E, S, W remain in that order.
/// assert_eq!(
///     succ,
///     vec![CellCoord::new(2, 1), CellCoord::new(1, 2), CellCoord::new(0, 1)]
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OccupancyGrid {
    width: usize,
    height: usize,
    cells: Vec<Occupancy>,
}

impl OccupancyGrid {
    /// Creates a grid of free cells.
    ///
    /// Zero extents are raised to one; use [`OccupancyGrid::try_new`] to
    /// reject them instead.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.clamp(1, i32::MAX as usize);
        let height = height.clamp(1, i32::MAX as usize);
        Self {
            width,
            height,
            cells: vec![Occupancy::Free; width.saturating_mul(height)],
        }
    }

    /// Creates a grid of free cells, rejecting degenerate extents.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidDimensions`] if either extent is zero
    /// or does not fit an `i32` coordinate.
    pub fn try_new(width: usize, height: usize) -> Result<Self, SpatialError> {
        let too_large = i32::try_from(width).is_err() || i32::try_from(height).is_err();
        if width == 0 || height == 0 || too_large {
            return Err(SpatialError::InvalidDimensions { width, height });
        }
        Ok(Self::new(width, height))
    }

    /// Builds a grid from text rows, `#` for obstacles and `.` for free cells.
    ///
    /// Row `i` becomes `y = i`; all rows must have the same length.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::InvalidDimensions`] for empty or ragged input
    /// and [`SpatialError::InvalidCell`] for unknown characters.
    ///
    /// # Example
    ///
    /// ```
    /// use grid_spatial::{CellCoord, OccupancyGrid};
    ///
    /// let grid = OccupancyGrid::from_rows(&[
    ///     "..#",
    ///     "...",
    /// ]).unwrap();
    /// assert_eq!(grid.width(), 3);
    /// assert_eq!(grid.height(), 2);
    /// assert!(!grid.is_unoccupied(CellCoord::new(2, 0)).unwrap());
    /// ```
    pub fn from_rows(rows: &[&str]) -> Result<Self, SpatialError> {
        let height = rows.len();
        let width = rows.first().map_or(0, |r| r.chars().count());
        let mut grid = Self::try_new(width, height)?;

        for (row, line) in rows.iter().enumerate() {
            if line.chars().count() != width {
                return Err(SpatialError::InvalidDimensions {
                    width: line.chars().count(),
                    height,
                });
            }
            for (column, ch) in line.chars().enumerate() {
                let state = match ch {
                    '.' => Occupancy::Free,
                    '#' => Occupancy::Obstacle,
                    _ => return Err(SpatialError::InvalidCell { ch, row, column }),
                };
                grid.cells[row * width + column] = state;
            }
        }

        Ok(grid)
    }

    /// Returns the number of columns.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the total number of cells.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always `false`: a grid has at least one cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the bounds `(0, 0)..=(width-1, height-1)`.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
    pub const fn bounds(&self) -> GridBounds {
        // Extents are capped at i32::MAX on construction.
        GridBounds {
            min: CellCoord::origin(),
            max: CellCoord::new(self.width as i32 - 1, self.height as i32 - 1),
        }
    }

    /// Returns `true` if the cell lies inside the grid.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.index(cell).is_some()
    }

    /// Returns the row-major index of a cell, or `None` if outside the grid.
    #[must_use]
    pub fn index(&self, cell: CellCoord) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Returns the occupancy of a cell, or `None` if outside the grid.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<Occupancy> {
        self.index(cell).map(|i| self.cells[i])
    }

    /// Sets the occupancy of a cell and returns the previous state.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::OutOfBounds`] if the cell is outside the grid.
    pub fn set(&mut self, cell: CellCoord, state: Occupancy) -> Result<Occupancy, SpatialError> {
        let i = self.checked_index(cell)?;
        Ok(std::mem::replace(&mut self.cells[i], state))
    }

    /// Returns `true` if the cell is free.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::OutOfBounds`] if the cell is outside the grid.
    pub fn is_unoccupied(&self, cell: CellCoord) -> Result<bool, SpatialError> {
        let i = self.checked_index(cell)?;
        Ok(!self.cells[i].is_obstacle())
    }

    /// Returns the number of obstacle cells.
    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.cells.iter().filter(|c| c.is_obstacle()).count()
    }

    /// Iterates over every cell with its state, row-major.
    pub fn cells(&self) -> impl Iterator<Item = (CellCoord, Occupancy)> + '_ {
        self.bounds().iter().zip(self.cells.iter().copied())
    }

    /// Iterates over obstacle cells, row-major.
    pub fn obstacles(&self) -> impl Iterator<Item = CellCoord> + '_ {
        self.cells()
            .filter_map(|(cell, state)| state.is_obstacle().then_some(cell))
    }

    /// Returns the in-bounds neighbors of `cell` in [`Connectivity::steps`] order.
    ///
    /// With `avoid_obstacles` set, obstacle cells are left out. Without it,
    /// every in-bounds neighbor is returned regardless of state; planners
    /// that price blocked cells at infinity rely on this.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::OutOfBounds`] if `cell` is outside the grid.
    pub fn successors(
        &self,
        cell: CellCoord,
        connectivity: Connectivity,
        avoid_obstacles: bool,
    ) -> Result<Vec<CellCoord>, SpatialError> {
        self.checked_index(cell)?;

        Ok(connectivity
            .steps()
            .iter()
            .filter_map(|&(dx, dy)| cell.offset(dx, dy))
            .filter(|&n| match self.get(n) {
                Some(state) => !(avoid_obstacles && state.is_obstacle()),
                None => false,
            })
            .collect())
    }

    fn checked_index(&self, cell: CellCoord) -> Result<usize, SpatialError> {
        self.index(cell)
            .ok_or(SpatialError::OutOfBounds { coord: cell })
    }
}

impl fmt::Display for OccupancyGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width) {
            let line: String = row.iter().map(|c| c.marker()).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
