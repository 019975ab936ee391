//! Discrete cell paths.

use grid_spatial::{CellCoord, Connectivity};

/// An ordered sequence of cells from the agent's position to the goal.
///
/// A path is recomputed on every replan and carries the total edge cost the
/// planner assigned to it under its sensed map.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
/// use plan_types::CellPath;
///
/// let path = CellPath::new(
///     vec![CellCoord::new(0, 0), CellCoord::new(1, 0), CellCoord::new(2, 0)],
///     2.0,
/// );
///
/// assert_eq!(path.len(), 3);
/// assert_eq!(path.step_count(), 2);
/// assert_eq!(path.first(), Some(CellCoord::new(0, 0)));
/// assert_eq!(path.last(), Some(CellCoord::new(2, 0)));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellPath {
    /// Cells in travel order.
    cells: Vec<CellCoord>,
    /// Sum of edge costs along the path.
    cost: f64,
}

impl CellPath {
    /// Creates a path from cells in travel order and its total cost.
    #[must_use]
    pub const fn new(cells: Vec<CellCoord>, cost: f64) -> Self {
        Self { cells, cost }
    }

    /// Creates the one-cell path of an agent already at its goal.
    #[must_use]
    pub fn single(cell: CellCoord) -> Self {
        Self::new(vec![cell], 0.0)
    }

    /// Returns the cells in travel order.
    #[must_use]
    pub fn cells(&self) -> &[CellCoord] {
        &self.cells
    }

    /// Returns the number of cells, including both endpoints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns `true` if the path has no cells.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the number of moves along the path.
    #[must_use]
    pub fn step_count(&self) -> usize {
        self.cells.len().saturating_sub(1)
    }

    /// Returns the total edge cost of the path.
    #[must_use]
    pub const fn cost(&self) -> f64 {
        self.cost
    }

    /// Returns the first cell (the agent's position).
    #[must_use]
    pub fn first(&self) -> Option<CellCoord> {
        self.cells.first().copied()
    }

    /// Returns the last cell (the goal).
    #[must_use]
    pub fn last(&self) -> Option<CellCoord> {
        self.cells.last().copied()
    }

    /// Returns the cell after the first, i.e. the agent's next move.
    #[must_use]
    pub fn next_step(&self) -> Option<CellCoord> {
        self.cells.get(1).copied()
    }

    /// Returns `true` if the path visits `cell`.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.cells.contains(&cell)
    }

    /// Returns `true` if every consecutive pair is a single move under
    /// `connectivity`.
    ///
    /// # Example
    ///
    /// ```
    /// use grid_spatial::{CellCoord, Connectivity};
    /// use plan_types::CellPath;
    ///
    /// let diagonal = CellPath::new(vec![CellCoord::new(0, 0), CellCoord::new(1, 1)], 1.4);
    /// assert!(diagonal.is_contiguous(Connectivity::Eight));
    /// assert!(!diagonal.is_contiguous(Connectivity::Four));
    /// ```
    #[must_use]
    pub fn is_contiguous(&self, connectivity: Connectivity) -> bool {
        self.cells
            .windows(2)
            .all(|pair| connectivity.are_adjacent(pair[0], pair[1]))
    }

    /// Returns an iterator over the cells.
    pub fn iter(&self) -> std::slice::Iter<'_, CellCoord> {
        self.cells.iter()
    }

    /// Consumes the path and returns its cells.
    #[must_use]
    pub fn into_cells(self) -> Vec<CellCoord> {
        self.cells
    }
}

impl<'a> IntoIterator for &'a CellPath {
    type Item = &'a CellCoord;
    type IntoIter = std::slice::Iter<'a, CellCoord>;

    fn into_iter(self) -> Self::IntoIter {
        self.cells.iter()
    }
}
