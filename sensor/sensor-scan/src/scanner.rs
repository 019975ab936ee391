//! Local range scanning.
//!
//! A [`LocalScanner`] keeps its own sensed estimate of the world. Each scan
//! compares the cells inside the view window against the world, adopts the
//! true state of every cell that differs, and reports the edges touching
//! those cells together with what they cost before the scan. Feeding that
//! record to a planner whose sensed map started out identical keeps both
//! estimates in lockstep.

use grid_spatial::{CellCoord, Connectivity, GridBounds, OccupancyGrid};
use hashbrown::HashSet;
use plan_dstar::heuristics::edge_cost;
use plan_types::{ChangedEdge, LocalPatch, Rescan};
use tracing::{debug, trace};

use crate::config::SensorConfig;
use crate::error::{Result, SensorError};
use crate::world::World;

/// A source of rescans for a moving agent.
pub trait RescanSource {
    /// Scans around `position` and reports what changed since the last scan.
    ///
    /// # Errors
    ///
    /// Implementations fail with [`SensorError::OutOfBounds`] if `position`
    /// is outside the scanned area.
    fn rescan(&mut self, position: CellCoord) -> Result<Rescan>;
}

/// Square-window scanner attached to a ground-truth [`World`].
///
/// The sensed map starts all free, matching a freshly created planner.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
/// use sensor_scan::{LocalScanner, RescanSource, SensorConfig, World};
///
/// let mut world = World::new(10, 10).unwrap();
/// world.place_obstacle(CellCoord::new(2, 1)).unwrap();
/// world.place_obstacle(CellCoord::new(8, 8)).unwrap();
///
/// let mut scanner = LocalScanner::new(world, SensorConfig::new().with_view_range(2)).unwrap();
/// let rescan = scanner.rescan(CellCoord::new(0, 0)).unwrap();
///
/// // Only the nearby obstacle is seen; it touches 8 edges.
/// assert_eq!(rescan.changed_edges().len(), 8);
/// assert_eq!(scanner.sensed_map().obstacle_count(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct LocalScanner {
    world: World,
    sensed: OccupancyGrid,
    config: SensorConfig,
}

impl LocalScanner {
    /// Creates a scanner over `world` with an all-free sensed map.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::InvalidViewRange`] if the view range is zero.
    pub fn new(world: World, config: SensorConfig) -> Result<Self> {
        let sensed = OccupancyGrid::new(world.width(), world.height());
        Self::with_sensed_map(world, sensed, config)
    }

    /// Creates a scanner that starts from a prior estimate of the world.
    ///
    /// # Errors
    ///
    /// - [`SensorError::InvalidViewRange`] if the view range is zero.
    /// - [`SensorError::DimensionMismatch`] if `sensed` and `world` differ
    ///   in size.
    pub fn with_sensed_map(world: World, sensed: OccupancyGrid, config: SensorConfig) -> Result<Self> {
        if !config.validate().is_empty() {
            return Err(SensorError::invalid_view_range(config.view_range()));
        }
        if sensed.width() != world.width() || sensed.height() != world.height() {
            return Err(SensorError::DimensionMismatch {
                width: world.width(),
                height: world.height(),
                found_width: sensed.width(),
                found_height: sensed.height(),
            });
        }
        Ok(Self {
            world,
            sensed,
            config,
        })
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &SensorConfig {
        &self.config
    }

    /// Returns the ground truth.
    #[must_use]
    pub const fn world(&self) -> &World {
        &self.world
    }

    /// Returns the ground truth for editing. Edits become visible on the
    /// next scan that covers them.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// Returns the scanner's sensed estimate.
    #[must_use]
    pub const fn sensed_map(&self) -> &OccupancyGrid {
        &self.sensed
    }

    /// Returns the cells a scan from `position` covers.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::OutOfBounds`] if `position` is outside the world.
    pub fn scan_window(&self, position: CellCoord) -> Result<GridBounds> {
        if !self.world.contains(position) {
            return Err(SensorError::out_of_bounds(position));
        }
        Ok(GridBounds::around(position, self.config.view_range())
            .intersection(&self.world.grid().bounds())
            .unwrap_or(GridBounds::from_point(position)))
    }

    fn changed_cells(&self, window: GridBounds) -> Vec<CellCoord> {
        window
            .iter()
            .filter(|&cell| self.sensed.get(cell) != self.world.grid().get(cell))
            .collect()
    }

    fn changed_edges(&self, cells: &[CellCoord]) -> Result<Vec<ChangedEdge>> {
        let metric = self.config.metric();
        let mut seen = HashSet::new();
        let mut edges = Vec::new();

        for &cell in cells {
            for n in self.sensed.successors(cell, Connectivity::Eight, false)? {
                let edge = ChangedEdge::new(cell, n, edge_cost(&self.sensed, cell, n, metric));
                if seen.insert(edge.key()) {
                    edges.push(edge);
                }
            }
        }
        Ok(edges)
    }
}

impl RescanSource for LocalScanner {
    fn rescan(&mut self, position: CellCoord) -> Result<Rescan> {
        let window = self.scan_window(position)?;
        let cells = self.changed_cells(window);

        // Old costs come from the estimate before any cell is updated
        let edges = self.changed_edges(&cells)?;

        for &cell in &cells {
            let state = self.world.occupancy(cell)?;
            self.sensed.set(cell, state)?;
            trace!(%cell, ?state, "Sensed change");
        }

        let patch = LocalPatch::capture(&self.sensed, position, self.config.view_range())?;
        debug!(
            %position,
            changed_cells = cells.len(),
            changed_edges = edges.len(),
            "Rescanned"
        );
        Ok(Rescan::new(position, edges, patch))
    }
}
