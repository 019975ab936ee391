//! Error types for planning operations.
//!
//! This module defines the [`PlanningError`] enum which represents all
//! failures of an incremental planner: integration defects (out-of-bounds
//! vertices, malformed rescans, bad configuration) and steady-state
//! conditions the caller is expected to handle (no path yet, cutoff reached,
//! cancellation).

use std::time::Duration;

use grid_spatial::{CellCoord, SpatialError};

/// Errors that can occur during planning.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
/// use plan_types::PlanningError;
///
/// let error = PlanningError::NoPath {
///     start: CellCoord::new(0, 0),
///     goal: CellCoord::new(4, 4),
/// };
///
/// assert!(error.to_string().contains("no path"));
/// assert!(error.is_recoverable());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum PlanningError {
    /// A vertex lies outside the grid.
    ///
    /// Indicates an integration defect in the caller.
    #[error("vertex {coord} is outside the grid")]
    OutOfBounds {
        /// The offending vertex.
        coord: CellCoord,
    },

    /// The goal is unreachable from the start under the current sensed map.
    ///
    /// This is expected while the goal is fenced off by obstacles; the caller
    /// may keep sensing and retry on a later tick.
    #[error("no path from {start} to {goal}")]
    NoPath {
        /// Current start vertex.
        start: CellCoord,
        /// Goal vertex.
        goal: CellCoord,
    },

    /// A rescan reported an edge the planner cannot accept.
    ///
    /// Either an endpoint is outside the grid, the endpoints are not
    /// neighbors, or the reported old cost disagrees with the planner's map.
    #[error("malformed rescan: {0}")]
    MalformedRescan(String),

    /// The iteration or wall-clock limit was reached before convergence.
    ///
    /// Planner state is left intact and the next call resumes the search.
    #[error("planning stopped after {iterations} expansions ({elapsed:?})")]
    Timeout {
        /// Expansions performed in the interrupted call.
        iterations: usize,
        /// Time spent in the interrupted call.
        elapsed: Duration,
    },

    /// Planning was cancelled through a cancel token.
    #[error("planning cancelled")]
    Cancelled,

    /// An invalid configuration parameter was provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlanningError {
    /// Creates an out-of-bounds error for a vertex.
    #[must_use]
    pub const fn out_of_bounds(coord: CellCoord) -> Self {
        Self::OutOfBounds { coord }
    }

    /// Creates a malformed rescan error with the given message.
    ///
    /// # Example
    ///
    /// ```
    /// use plan_types::PlanningError;
    ///
    /// let error = PlanningError::malformed_rescan("edge endpoints are not adjacent");
    /// assert!(error.to_string().contains("adjacent"));
    /// ```
    #[must_use]
    pub fn malformed_rescan(message: impl Into<String>) -> Self {
        Self::MalformedRescan(message.into())
    }

    /// Creates an invalid configuration error with the given message.
    #[must_use]
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }

    /// Returns `true` if this is a "no path" error.
    #[must_use]
    pub const fn is_no_path(&self) -> bool {
        matches!(self, Self::NoPath { .. })
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }

    /// Returns `true` if the caller can retry on a later tick.
    ///
    /// `NoPath`, `Timeout` and `Cancelled` are recoverable; the remaining
    /// variants indicate a defect in how the planner is driven.
    ///
    /// # Example
    ///
    /// ```
    /// use plan_types::PlanningError;
    ///
    /// assert!(PlanningError::Cancelled.is_recoverable());
    /// assert!(!PlanningError::malformed_rescan("bad edge").is_recoverable());
    /// ```
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NoPath { .. } | Self::Timeout { .. } | Self::Cancelled
        )
    }
}

impl From<SpatialError> for PlanningError {
    fn from(error: SpatialError) -> Self {
        match error {
            SpatialError::OutOfBounds { coord } => Self::OutOfBounds { coord },
            other => Self::InvalidConfig(other.to_string()),
        }
    }
}
