//! Scenario configuration.

use std::path::Path;
use std::time::Duration;

use grid_spatial::{CellCoord, Connectivity};
use plan_types::{DistanceMetric, PlannerConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use sensor_scan::{SensorConfig, World};
use serde::{Deserialize, Serialize};

use crate::error::{NavError, Result};

/// One navigation run: the world, the agent's endpoints, its sensor and its
/// planner settings.
///
/// Every field has a default, so a TOML file only needs the values it
/// changes:
///
/// ```
/// use nav_sim::ScenarioConfig;
///
/// let config = ScenarioConfig::from_toml_str(
///     r#"
///     width = 30
///     height = 20
///     goal = { x = 29, y = 19 }
///     metric = "octile"
///     "#,
/// )
/// .unwrap();
/// assert_eq!(config.width, 30);
/// assert_eq!(config.view_range, 5);
/// assert!(config.validate().is_empty());
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Grid width in cells (default: 100)
    #[serde(default = "default_width")]
    pub width: usize,

    /// Grid height in cells (default: 80)
    #[serde(default = "default_height")]
    pub height: usize,

    /// Agent start cell (default: (10, 10))
    #[serde(default = "default_start")]
    pub start: CellCoord,

    /// Goal cell (default: (40, 70))
    #[serde(default = "default_goal")]
    pub goal: CellCoord,

    /// Sensor radius in cells (default: 5)
    #[serde(default = "default_view_range")]
    pub view_range: u32,

    /// Probability that a cell is an obstacle (default: 0.2)
    #[serde(default = "default_obstacle_density")]
    pub obstacle_density: f64,

    /// Seed for world generation (default: 0)
    #[serde(default)]
    pub seed: u64,

    /// Edge cost and heuristic metric (default: euclidean)
    #[serde(default)]
    pub metric: DistanceMetric,

    /// Neighborhood (default: eight)
    #[serde(default)]
    pub connectivity: Connectivity,

    /// Expansion limit per replan, `None` for unlimited (default: unlimited)
    #[serde(default)]
    pub max_iterations: Option<usize>,

    /// Wall-clock limit per replan in milliseconds (default: none)
    #[serde(default)]
    pub timeout_ms: Option<u64>,

    /// Ticks before the run is abandoned, `None` for `4 × cells` (default: none)
    #[serde(default)]
    pub max_ticks: Option<usize>,

    /// Consecutive failed replans before the run is abandoned (default: 3)
    #[serde(default = "default_max_stalled_ticks")]
    pub max_stalled_ticks: usize,
}

fn default_width() -> usize {
    100
}

fn default_height() -> usize {
    80
}

fn default_start() -> CellCoord {
    CellCoord::new(10, 10)
}

fn default_goal() -> CellCoord {
    CellCoord::new(40, 70)
}

fn default_view_range() -> u32 {
    sensor_scan::DEFAULT_VIEW_RANGE
}

fn default_obstacle_density() -> f64 {
    0.2
}

fn default_max_stalled_ticks() -> usize {
    3
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
            start: default_start(),
            goal: default_goal(),
            view_range: default_view_range(),
            obstacle_density: default_obstacle_density(),
            seed: 0,
            metric: DistanceMetric::default(),
            connectivity: Connectivity::default(),
            max_iterations: None,
            timeout_ms: None,
            max_ticks: None,
            max_stalled_ticks: default_max_stalled_ticks(),
        }
    }
}

impl ScenarioConfig {
    /// Loads a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Config`] if the file cannot be read and
    /// [`NavError::Toml`] if it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            NavError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Toml`] if the text does not parse.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Validates the scenario and returns any issues.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if self.width == 0 || self.height == 0 {
            issues.push(format!(
                "grid must be at least 1x1, got {}x{}",
                self.width, self.height
            ));
        }
        for (name, cell) in [("start", self.start), ("goal", self.goal)] {
            if !self.contains(cell) {
                issues.push(format!(
                    "{name} {cell} is outside the {}x{} grid",
                    self.width, self.height
                ));
            }
        }
        if !(0.0..=1.0).contains(&self.obstacle_density) {
            issues.push(format!(
                "obstacle_density must be within [0, 1], got {}",
                self.obstacle_density
            ));
        }
        if self.max_stalled_ticks == 0 {
            issues.push("max_stalled_ticks must be at least 1".to_string());
        }
        if self.max_ticks == Some(0) {
            issues.push("max_ticks must be at least 1".to_string());
        }

        issues.extend(self.planner_config().validate());
        issues.extend(self.sensor_config().validate());
        issues
    }

    fn contains(&self, cell: CellCoord) -> bool {
        usize::try_from(cell.x).is_ok_and(|x| x < self.width)
            && usize::try_from(cell.y).is_ok_and(|y| y < self.height)
    }

    /// Returns the planner settings.
    #[must_use]
    pub fn planner_config(&self) -> PlannerConfig {
        let mut config = PlannerConfig::new()
            .with_metric(self.metric)
            .with_connectivity(self.connectivity)
            .without_max_iterations();
        if let Some(max) = self.max_iterations {
            config = config.with_max_iterations(max);
        }
        if let Some(ms) = self.timeout_ms {
            config = config.with_timeout(Duration::from_millis(ms));
        }
        config
    }

    /// Returns the sensor settings. The sensor prices edges with the
    /// planner's metric.
    #[must_use]
    pub const fn sensor_config(&self) -> SensorConfig {
        SensorConfig::new()
            .with_view_range(self.view_range)
            .with_metric(self.metric)
    }

    /// Returns the tick limit.
    #[must_use]
    pub fn tick_limit(&self) -> usize {
        self.max_ticks
            .unwrap_or_else(|| self.width.saturating_mul(self.height).saturating_mul(4))
    }

    /// Generates the ground-truth world from the seed. Start and goal are
    /// always free.
    ///
    /// # Errors
    ///
    /// Returns an error if the extents or the density are invalid.
    pub fn build_world(&self) -> Result<World> {
        let mut rng = StdRng::seed_from_u64(self.seed);
        Ok(World::random(
            self.width,
            self.height,
            self.obstacle_density,
            &mut rng,
            &[self.start, self.goal],
        )?)
    }
}
