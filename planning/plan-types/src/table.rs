//! Dense per-cell value tables and vertex consistency.

use grid_spatial::{CellCoord, GridBounds, SpatialError};

/// Consistency state of a vertex, comparing its `g` and `rhs` values.
///
/// # Example
///
/// ```
/// use plan_types::Consistency;
///
/// assert_eq!(Consistency::classify(3.0, 3.0), Consistency::Consistent);
/// assert_eq!(Consistency::classify(f64::INFINITY, 2.0), Consistency::Overconsistent);
/// assert_eq!(Consistency::classify(1.0, f64::INFINITY), Consistency::Underconsistent);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Consistency {
    /// `g == rhs`.
    Consistent,
    /// `g > rhs`: a shorter route was found and has not been propagated.
    Overconsistent,
    /// `g < rhs`: the recorded route got more expensive.
    Underconsistent,
}

impl Consistency {
    /// Classifies a vertex from its `g` and `rhs` values.
    ///
    /// Two infinite values are consistent.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn classify(g: f64, rhs: f64) -> Self {
        if g == rhs {
            Self::Consistent
        } else if g > rhs {
            Self::Overconsistent
        } else {
            Self::Underconsistent
        }
    }

    /// Returns `true` for [`Consistency::Consistent`].
    #[must_use]
    pub const fn is_consistent(self) -> bool {
        matches!(self, Self::Consistent)
    }
}

/// A dense table of `f64` values, one per grid cell, defaulting to `+∞`.
///
/// Planners keep two of these (`g` and `rhs`). Reads outside the table
/// return `+∞`, which is the value of every vertex the planner has not
/// reached, so callers can query neighbors of border cells without bounds
/// checks.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
/// use plan_types::ValueTable;
///
/// let mut table = ValueTable::new(3, 3);
/// assert!(table.value(CellCoord::new(1, 1)).is_infinite());
///
/// table.set(CellCoord::new(1, 1), 2.5).unwrap();
/// assert_eq!(table.value(CellCoord::new(1, 1)), 2.5);
/// assert!(table.value(CellCoord::new(-1, 0)).is_infinite());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ValueTable {
    width: usize,
    height: usize,
    values: Vec<f64>,
}

impl ValueTable {
    /// Creates a `width × height` table filled with `+∞`.
    ///
    /// Extents are clamped to at least one cell.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        let width = width.max(1);
        let height = height.max(1);
        Self {
            width,
            height,
            values: vec![f64::INFINITY; width * height],
        }
    }

    /// Returns the table width.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the table height.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns the bounds of the table in cell space.
    #[must_use]
    pub fn bounds(&self) -> GridBounds {
        GridBounds::new(
            CellCoord::origin(),
            CellCoord::new(
                i32::try_from(self.width).unwrap_or(i32::MAX) - 1,
                i32::try_from(self.height).unwrap_or(i32::MAX) - 1,
            ),
        )
    }

    fn index(&self, cell: CellCoord) -> Option<usize> {
        let x = usize::try_from(cell.x).ok()?;
        let y = usize::try_from(cell.y).ok()?;
        (x < self.width && y < self.height).then(|| y * self.width + x)
    }

    /// Returns the value at `cell`, or `None` outside the table.
    #[must_use]
    pub fn get(&self, cell: CellCoord) -> Option<f64> {
        self.index(cell).map(|i| self.values[i])
    }

    /// Returns the value at `cell`, or `+∞` outside the table.
    #[must_use]
    pub fn value(&self, cell: CellCoord) -> f64 {
        self.get(cell).unwrap_or(f64::INFINITY)
    }

    /// Sets the value at `cell` and returns the previous value.
    ///
    /// # Errors
    ///
    /// Returns [`SpatialError::OutOfBounds`] if `cell` is outside the table.
    pub fn set(&mut self, cell: CellCoord, value: f64) -> Result<f64, SpatialError> {
        let index = self
            .index(cell)
            .ok_or(SpatialError::out_of_bounds(cell))?;
        Ok(std::mem::replace(&mut self.values[index], value))
    }

    /// Resets every entry to `+∞`.
    pub fn reset(&mut self) {
        self.values.fill(f64::INFINITY);
    }

    /// Returns the number of finite entries.
    #[must_use]
    pub fn finite_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_finite()).count()
    }

    /// Returns the largest finite entry, if any.
    #[must_use]
    pub fn max_finite(&self) -> Option<f64> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .max_by(f64::total_cmp)
    }

    /// Returns the raw values in row-major order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Returns an iterator over `(cell, value)` pairs in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (CellCoord, f64)> + '_ {
        self.bounds().iter().zip(self.values.iter().copied())
    }
}
