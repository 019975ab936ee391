//! Configuration types for incremental planners.
//!
//! # Example
//!
//! ```
//! use grid_spatial::Connectivity;
//! use plan_types::{DistanceMetric, PlannerConfig};
//! use std::time::Duration;
//!
//! let config = PlannerConfig::default()
//!     .with_metric(DistanceMetric::Octile)
//!     .with_connectivity(Connectivity::Eight)
//!     .with_timeout(Duration::from_millis(50));
//!
//! assert!(config.validate().is_empty());
//! ```

use std::time::Duration;

use grid_spatial::Connectivity;

/// Default cap on open-set expansions per `compute_shortest_path` call.
pub const DEFAULT_MAX_ITERATIONS: usize = 1_000_000;

/// Distance metric used both for edge costs and for the heuristic.
///
/// Because the edge cost between two adjacent free cells is the metric
/// distance between them, the heuristic `h(a, b) = metric(a, b)` obeys the
/// triangle inequality for every variant and is therefore consistent.
///
/// # Example
///
/// ```
/// use plan_types::DistanceMetric;
///
/// assert_eq!(DistanceMetric::default(), DistanceMetric::Euclidean);
/// assert_eq!(DistanceMetric::Manhattan.name(), "manhattan");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum DistanceMetric {
    /// Straight-line distance: `sqrt(dx² + dy²)`.
    ///
    /// A diagonal step costs `√2`.
    #[default]
    Euclidean,

    /// Sum of absolute differences: `|dx| + |dy|`.
    ///
    /// A diagonal step costs `2`, so 8-connected planning degenerates to
    /// 4-connected costs.
    Manhattan,

    /// Octile distance: `max + (√2 - 1) * min`.
    ///
    /// Identical to Euclidean on single steps, tighter than Euclidean as a
    /// heuristic over long 8-connected distances.
    Octile,

    /// Maximum of absolute differences: `max(|dx|, |dy|)`.
    ///
    /// A diagonal step costs `1`.
    Chebyshev,
}

impl DistanceMetric {
    /// Returns the lowercase name of the metric.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Euclidean => "euclidean",
            Self::Manhattan => "manhattan",
            Self::Octile => "octile",
            Self::Chebyshev => "chebyshev",
        }
    }
}

/// Configuration for incremental replanning.
///
/// Controls the distance metric, connectivity and resource limits of a
/// single `compute_shortest_path` call. When either limit is reached the
/// planner stops with a timeout error and can be resumed on a later call.
///
/// Defaults:
/// - Metric: Euclidean
/// - Connectivity: 8
/// - Max iterations: [`DEFAULT_MAX_ITERATIONS`]
/// - No timeout
///
/// # Example
///
/// ```
/// use plan_types::PlannerConfig;
///
/// let unbounded = PlannerConfig::default().without_max_iterations();
/// assert!(unbounded.max_iterations().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannerConfig {
    /// Metric used for edge costs and the heuristic.
    metric: DistanceMetric,
    /// Neighborhood used for successors.
    connectivity: Connectivity,
    /// Maximum number of expansions per call.
    max_iterations: Option<usize>,
    /// Maximum wall-clock time per call.
    timeout: Option<Duration>,
}

impl PlannerConfig {
    /// Creates a configuration with default settings.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            metric: DistanceMetric::Euclidean,
            connectivity: Connectivity::Eight,
            max_iterations: Some(DEFAULT_MAX_ITERATIONS),
            timeout: None,
        }
    }

    /// Sets the distance metric.
    #[must_use]
    pub const fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Sets the successor connectivity.
    #[must_use]
    pub const fn with_connectivity(mut self, connectivity: Connectivity) -> Self {
        self.connectivity = connectivity;
        self
    }

    /// Sets the maximum number of expansions per call.
    #[must_use]
    pub const fn with_max_iterations(mut self, max: usize) -> Self {
        self.max_iterations = Some(max);
        self
    }

    /// Removes the expansion limit.
    #[must_use]
    pub const fn without_max_iterations(mut self) -> Self {
        self.max_iterations = None;
        self
    }

    /// Sets the wall-clock limit per call.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Removes the wall-clock limit.
    #[must_use]
    pub const fn without_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Returns the distance metric.
    #[must_use]
    pub const fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Returns the successor connectivity.
    #[must_use]
    pub const fn connectivity(&self) -> Connectivity {
        self.connectivity
    }

    /// Returns the expansion limit, if set.
    #[must_use]
    pub const fn max_iterations(&self) -> Option<usize> {
        self.max_iterations
    }

    /// Returns the wall-clock limit, if set.
    #[must_use]
    pub const fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Validates the configuration and returns any issues.
    ///
    /// A zero expansion limit or a zero timeout would make every call fail
    /// before doing any work.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.max_iterations == Some(0) {
            issues.push("max_iterations must be greater than zero".to_string());
        }

        if self.timeout.is_some_and(|t| t.is_zero()) {
            issues.push("timeout must be greater than zero".to_string());
        }

        issues
    }
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self::new()
    }
}
