//! Cell coordinate types.

use std::fmt;

/// A discrete 2D coordinate identifying one grid cell.
///
/// Uses `i32` coordinates so that neighbor offsets can step outside the grid
/// without wrapping; bounds are checked by [`crate::OccupancyGrid`].
///
/// Coordinates are totally ordered by `x`, then `y`, which gives ordered
/// containers a deterministic tie-break between cells.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
///
/// let cell = CellCoord::new(3, 4);
/// assert_eq!(cell.x, 3);
/// assert_eq!(cell.y, 4);
/// assert!(CellCoord::new(0, 9) < CellCoord::new(1, 0));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellCoord {
    /// Column (grows east).
    pub x: i32,
    /// Row (grows south).
    pub y: i32,
}

impl CellCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Creates a coordinate at the origin (0, 0).
    #[must_use]
    pub const fn origin() -> Self {
        Self::new(0, 0)
    }

    /// Returns the coordinate as a tuple.
    #[must_use]
    pub const fn as_tuple(self) -> (i32, i32) {
        (self.x, self.y)
    }

    /// Returns the coordinate shifted by `(dx, dy)`, or `None` on overflow.
    ///
    /// # Example
    ///
    /// ```
    /// use grid_spatial::CellCoord;
    ///
    /// let cell = CellCoord::new(2, 2);
    /// assert_eq!(cell.offset(1, -1), Some(CellCoord::new(3, 1)));
    /// assert_eq!(CellCoord::new(i32::MAX, 0).offset(1, 0), None);
    /// ```
    #[must_use]
    pub const fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        match (self.x.checked_add(dx), self.y.checked_add(dy)) {
            (Some(x), Some(y)) => Some(Self::new(x, y)),
            _ => None,
        }
    }

    /// Computes the Manhattan distance to another coordinate.
    ///
    /// # Example
    ///
    /// ```
    /// use grid_spatial::CellCoord;
    ///
    /// let a = CellCoord::new(0, 0);
    /// let b = CellCoord::new(3, -4);
    /// assert_eq!(a.manhattan_distance(b), 7);
    /// ```
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> u32 {
        self.x
            .abs_diff(other.x)
            .saturating_add(self.y.abs_diff(other.y))
    }

    /// Computes the Chebyshev distance (number of king moves) to another coordinate.
    ///
    /// # Example
    ///
    /// ```
    /// use grid_spatial::CellCoord;
    ///
    /// let a = CellCoord::new(0, 0);
    /// let b = CellCoord::new(3, -4);
    /// assert_eq!(a.chebyshev_distance(b), 4);
    /// ```
    #[must_use]
    pub fn chebyshev_distance(self, other: Self) -> u32 {
        self.x.abs_diff(other.x).max(self.y.abs_diff(other.y))
    }

    /// Returns `true` if `other` is one of the eight cells touching this one.
    ///
    /// A cell is not adjacent to itself.
    #[must_use]
    pub fn is_touching(self, other: Self) -> bool {
        self.chebyshev_distance(other) == 1
    }
}

impl fmt::Display for CellCoord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl From<(i32, i32)> for CellCoord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl From<CellCoord> for (i32, i32) {
    fn from(cell: CellCoord) -> Self {
        cell.as_tuple()
    }
}

impl std::ops::Sub for CellCoord {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x.wrapping_sub(other.x), self.y.wrapping_sub(other.y))
    }
}
