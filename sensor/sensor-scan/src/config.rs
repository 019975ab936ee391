//! Scanner configuration.

use plan_types::DistanceMetric;

/// Default Chebyshev radius of the scan window.
pub const DEFAULT_VIEW_RANGE: u32 = 5;

/// Configuration for [`LocalScanner`](crate::LocalScanner).
///
/// The metric prices the old cost of each reported edge and must match the
/// planner's metric, otherwise the planner rejects the rescan.
///
/// # Example
///
/// ```
/// use plan_types::DistanceMetric;
/// use sensor_scan::SensorConfig;
///
/// let config = SensorConfig::new()
///     .with_view_range(3)
///     .with_metric(DistanceMetric::Octile);
/// assert!(config.validate().is_empty());
/// assert_eq!(config.view_range(), 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SensorConfig {
    view_range: u32,
    metric: DistanceMetric,
}

impl SensorConfig {
    /// Creates a configuration with a view range of
    /// [`DEFAULT_VIEW_RANGE`] and the Euclidean metric.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            view_range: DEFAULT_VIEW_RANGE,
            metric: DistanceMetric::Euclidean,
        }
    }

    /// Sets the scan radius.
    #[must_use]
    pub const fn with_view_range(mut self, range: u32) -> Self {
        self.view_range = range;
        self
    }

    /// Sets the metric used for old edge costs.
    #[must_use]
    pub const fn with_metric(mut self, metric: DistanceMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Returns the scan radius.
    #[must_use]
    pub const fn view_range(&self) -> u32 {
        self.view_range
    }

    /// Returns the metric.
    #[must_use]
    pub const fn metric(&self) -> DistanceMetric {
        self.metric
    }

    /// Validates the configuration and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.view_range == 0 {
            issues.push("view_range must be at least 1".to_string());
        }
        issues
    }
}

impl Default for SensorConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SensorConfig::default();
        assert_eq!(config.view_range(), DEFAULT_VIEW_RANGE);
        assert_eq!(config.metric(), DistanceMetric::Euclidean);
        assert!(config.validate().is_empty());
    }

    #[test]
    fn test_zero_view_range_rejected() {
        let issues = SensorConfig::new().with_view_range(0).validate();
        assert_eq!(issues.len(), 1);
        assert!(issues[0].contains("view_range"));
    }
}
