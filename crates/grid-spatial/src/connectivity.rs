//! Neighborhood definitions for grid movement.

use crate::CellCoord;

/// Axis-aligned steps in successor order: N, E, S, W.
///
/// North is `y - 1` because rows grow southward.
const AXIS_STEPS: [(i32, i32); 4] = [(0, -1), (1, 0), (0, 1), (-1, 0)];

/// Axis steps followed by diagonal steps: NE, SE, SW, NW.
const ALL_STEPS: [(i32, i32); 8] = [
    (0, -1),
    (1, 0),
    (0, 1),
    (-1, 0),
    (1, -1),
    (1, 1),
    (-1, 1),
    (-1, -1),
];

/// Movement connectivity between grid cells.
///
/// The order of [`Connectivity::steps`] is part of the contract: successor
/// lists follow it, and planners break ties between equal-cost neighbors by
/// taking the first one. The order is N, E, S, W, then NE, SE, SW, NW.
///
/// # Example
///
/// ```
/// use grid_spatial::Connectivity;
///
/// assert_eq!(Connectivity::Four.steps().len(), 4);
/// assert_eq!(Connectivity::Eight.steps()[4], (1, -1)); // NE
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Connectivity {
    /// Von Neumann neighborhood: N, E, S, W.
    Four,
    /// Moore neighborhood: the four axis neighbors plus the four diagonals.
    #[default]
    Eight,
}

impl Connectivity {
    /// Returns the `(dx, dy)` steps of this neighborhood in successor order.
    #[must_use]
    pub const fn steps(self) -> &'static [(i32, i32)] {
        match self {
            Self::Four => &AXIS_STEPS,
            Self::Eight => &ALL_STEPS,
        }
    }

    /// Returns the number of neighbors of an interior cell.
    #[must_use]
    pub const fn neighbor_count(self) -> usize {
        self.steps().len()
    }

    /// Returns `true` if a single move connects `a` and `b`.
    ///
    /// # Example
    ///
    /// ```
    /// use grid_spatial::{CellCoord, Connectivity};
    ///
    /// let a = CellCoord::new(0, 0);
    /// let diagonal = CellCoord::new(1, 1);
    /// assert!(!Connectivity::Four.are_adjacent(a, diagonal));
    /// assert!(Connectivity::Eight.are_adjacent(a, diagonal));
    /// ```
    #[must_use]
    pub fn are_adjacent(self, a: CellCoord, b: CellCoord) -> bool {
        match self {
            Self::Four => a.manhattan_distance(b) == 1,
            Self::Eight => a.is_touching(b),
        }
    }
}
