//! Ground-truth occupancy.

use grid_spatial::{CellCoord, Occupancy, OccupancyGrid};
use rand::Rng;
use tracing::debug;

use crate::error::{Result, SensorError};

/// The true state of the environment.
///
/// Only the world's own writer methods change it. Planners never see it
/// directly; they learn about it through a scanner.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
/// use sensor_scan::World;
///
/// let mut world = World::new(8, 6).unwrap();
/// assert!(world.place_obstacle(CellCoord::new(3, 2)).unwrap());
/// assert!(!world.place_obstacle(CellCoord::new(3, 2)).unwrap());
/// assert_eq!(world.obstacle_count(), 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct World {
    grid: OccupancyGrid,
}

impl World {
    /// Creates an obstacle-free world.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::Spatial`] if an extent is zero.
    pub fn new(width: usize, height: usize) -> Result<Self> {
        Ok(Self {
            grid: OccupancyGrid::try_new(width, height)?,
        })
    }

    /// Wraps an existing grid.
    #[must_use]
    pub const fn from_grid(grid: OccupancyGrid) -> Self {
        Self { grid }
    }

    /// Creates a world where each cell is an obstacle with probability
    /// `density`, except the cells in `keep_free`.
    ///
    /// # Errors
    ///
    /// - [`SensorError::InvalidDensity`] if `density` is not within `[0, 1]`.
    /// - [`SensorError::Spatial`] if an extent is zero.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        density: f64,
        rng: &mut R,
        keep_free: &[CellCoord],
    ) -> Result<Self> {
        if !(0.0..=1.0).contains(&density) {
            return Err(SensorError::InvalidDensity(density));
        }

        let mut grid = OccupancyGrid::try_new(width, height)?;
        for cell in grid.bounds().iter() {
            if !keep_free.contains(&cell) && rng.gen_bool(density) {
                grid.set(cell, Occupancy::Obstacle)?;
            }
        }

        debug!(
            width,
            height,
            density,
            obstacles = grid.obstacle_count(),
            "Generated random world"
        );
        Ok(Self { grid })
    }

    /// Returns the ground-truth grid.
    #[must_use]
    pub const fn grid(&self) -> &OccupancyGrid {
        &self.grid
    }

    /// Returns the width in cells.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.grid.width()
    }

    /// Returns the height in cells.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.grid.height()
    }

    /// Returns `true` if `cell` is inside the world.
    #[must_use]
    pub fn contains(&self, cell: CellCoord) -> bool {
        self.grid.contains(cell)
    }

    /// Returns the true occupancy of `cell`.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::OutOfBounds`] if `cell` is outside the world.
    pub fn occupancy(&self, cell: CellCoord) -> Result<Occupancy> {
        self.grid
            .get(cell)
            .ok_or(SensorError::out_of_bounds(cell))
    }

    /// Returns `true` if `cell` is free.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::OutOfBounds`] if `cell` is outside the world.
    pub fn is_unoccupied(&self, cell: CellCoord) -> Result<bool> {
        Ok(self.grid.is_unoccupied(cell)?)
    }

    /// Marks `cell` as an obstacle. Returns `true` if it was free.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::OutOfBounds`] if `cell` is outside the world.
    pub fn place_obstacle(&mut self, cell: CellCoord) -> Result<bool> {
        let previous = self.grid.set(cell, Occupancy::Obstacle)?;
        Ok(previous == Occupancy::Free)
    }

    /// Marks `cell` as free. Returns `true` if it was an obstacle.
    ///
    /// # Errors
    ///
    /// Returns [`SensorError::OutOfBounds`] if `cell` is outside the world.
    pub fn clear_obstacle(&mut self, cell: CellCoord) -> Result<bool> {
        let previous = self.grid.set(cell, Occupancy::Free)?;
        Ok(previous == Occupancy::Obstacle)
    }

    /// Returns the number of obstacle cells.
    #[must_use]
    pub fn obstacle_count(&self) -> usize {
        self.grid.obstacle_count()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_writer_round_trip() {
        let mut world = World::new(4, 4).unwrap();
        let cell = CellCoord::new(1, 2);
        assert!(world.place_obstacle(cell).unwrap());
        assert_eq!(world.occupancy(cell).unwrap(), Occupancy::Obstacle);
        assert!(world.clear_obstacle(cell).unwrap());
        assert!(!world.clear_obstacle(cell).unwrap());
        assert!(world.is_unoccupied(cell).unwrap());
    }

    #[test]
    fn test_writer_out_of_bounds() {
        let mut world = World::new(4, 4).unwrap();
        let err = world.place_obstacle(CellCoord::new(4, 0)).unwrap_err();
        assert!(err.is_out_of_bounds());
        assert!(world.occupancy(CellCoord::new(-1, 0)).is_err());
    }

    #[test]
    fn test_random_is_seeded_and_keeps_cells_free() {
        let keep = [CellCoord::new(0, 0), CellCoord::new(19, 19)];
        let a = World::random(20, 20, 0.4, &mut StdRng::seed_from_u64(11), &keep).unwrap();
        let b = World::random(20, 20, 0.4, &mut StdRng::seed_from_u64(11), &keep).unwrap();
        assert_eq!(a, b);
        assert!(a.obstacle_count() > 0);
        for cell in keep {
            assert!(a.is_unoccupied(cell).unwrap());
        }
    }

    #[test]
    fn test_random_density_extremes() {
        let mut rng = StdRng::seed_from_u64(3);
        let full = World::random(5, 5, 1.0, &mut rng, &[CellCoord::new(2, 2)]).unwrap();
        assert_eq!(full.obstacle_count(), 24);

        let empty = World::random(5, 5, 0.0, &mut rng, &[]).unwrap();
        assert_eq!(empty.obstacle_count(), 0);

        assert_eq!(
            World::random(5, 5, 1.5, &mut rng, &[]).unwrap_err(),
            SensorError::InvalidDensity(1.5)
        );
        assert!(World::random(5, 5, f64::NAN, &mut rng, &[]).is_err());
    }

    #[test]
    fn test_zero_extent_rejected() {
        assert!(matches!(World::new(0, 3), Err(SensorError::Spatial(_))));
    }
}
