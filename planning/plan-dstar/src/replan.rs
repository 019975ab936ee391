//! Rescan absorption, start moves and path extraction.

use std::time::Instant;

use grid_spatial::CellCoord;
use hashbrown::HashSet;
use plan_types::{CellPath, ChangedEdge, Plan, PlanStats, PlanningError, Rescan};
use tracing::{debug, warn};

use crate::engine::DStarLite;
use crate::heuristics::costs_match;

impl DStarLite {
    /// Queues a rescan to be absorbed by the next [`DStarLite::move_and_replan`].
    ///
    /// Queued rescans are absorbed in the order they were queued.
    pub fn queue_rescan(&mut self, rescan: Rescan) {
        self.pending.push_back(rescan);
    }

    /// Returns the number of queued, not yet absorbed rescans.
    #[must_use]
    pub fn pending_rescans(&self) -> usize {
        self.pending.len()
    }

    fn validate_rescan(&self, rescan: &Rescan) -> Result<(), PlanningError> {
        let map = &self.sensed_map;

        if let Some(bounds) = rescan.local_map().bounds() {
            if !map.contains(bounds.min) || !map.contains(bounds.max) {
                return Err(PlanningError::malformed_rescan(format!(
                    "local map window {}..={} exceeds the grid",
                    bounds.min, bounds.max
                )));
            }
        }

        for edge in rescan.changed_edges() {
            for endpoint in [edge.from, edge.to] {
                if !map.contains(endpoint) {
                    return Err(PlanningError::malformed_rescan(format!(
                        "edge {}-{} has endpoint {endpoint} outside the grid",
                        edge.from, edge.to
                    )));
                }
            }
            if !edge.from.is_touching(edge.to) {
                return Err(PlanningError::malformed_rescan(format!(
                    "edge {}-{} does not join neighboring cells",
                    edge.from, edge.to
                )));
            }
            let current = self.cost(edge.from, edge.to);
            if !costs_match(current, edge.old_cost) {
                return Err(PlanningError::malformed_rescan(format!(
                    "edge {}-{} reports old cost {} but the sensed map gives {current}",
                    edge.from, edge.to, edge.old_cost
                )));
            }
        }

        // A cell the patch flips must report every edge touching it
        let reported: HashSet<_> = rescan.changed_edges().iter().map(ChangedEdge::key).collect();
        for (cell, state) in rescan.local_map().iter() {
            if map.get(cell) == Some(state) {
                continue;
            }
            for n in self.model.neighbors(map, cell)? {
                let key = if cell <= n { (cell, n) } else { (n, cell) };
                if !reported.contains(&key) {
                    return Err(PlanningError::malformed_rescan(format!(
                        "cell {cell} changes to {state:?} but edge {cell}-{n} is not reported"
                    )));
                }
            }
        }
        Ok(())
    }

    /// Applies a rescan to the sensed map and repairs the affected `rhs`
    /// values.
    ///
    /// Every changed edge is applied in both directions. Edges that are not
    /// moves under the configured connectivity (diagonals on a 4-connected
    /// planner) are skipped. Returns the number of edges applied.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::MalformedRescan`] if an edge leaves the grid,
    /// joins non-neighboring cells, or reports an old cost different from the
    /// current sensed cost, or if the local map does not fit the grid.
    /// Nothing is modified in that case.
    pub fn absorb_rescan(&mut self, rescan: &Rescan) -> Result<usize, PlanningError> {
        self.validate_rescan(rescan)?;

        let changed_cells = rescan
            .local_map()
            .apply_to(&mut self.sensed_map)
            .map_err(|e| PlanningError::malformed_rescan(e.to_string()))?;

        let mut applied = 0;
        for edge in rescan.changed_edges() {
            if !self.model.has_edge(edge.from, edge.to) {
                continue;
            }
            applied += 1;

            for (u, v) in [(edge.from, edge.to), (edge.to, edge.from)] {
                let c_old = edge.old_cost;
                let c_new = self.cost(u, v);
                if u != self.goal {
                    if c_old > c_new {
                        let candidate = c_new + self.g(v);
                        if candidate < self.rhs(u) {
                            self.set_rhs(u, candidate)?;
                        }
                    } else if costs_match(self.rhs(u), c_old + self.g(v)) {
                        let value = self.lookahead(u)?;
                        self.set_rhs(u, value)?;
                    }
                }
                self.update_vertex(u);
            }
        }

        debug!(
            reported = rescan.changed_edges().len(),
            applied,
            changed_cells,
            open = self.open.len(),
            "Absorbed rescan"
        );
        Ok(applied)
    }

    /// Moves the start to `position`, adding the heuristic distance moved
    /// to `k_m`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::OutOfBounds`] if `position` is off the grid.
    pub fn move_to(&mut self, position: CellCoord) -> Result<(), PlanningError> {
        if !self.sensed_map.contains(position) {
            return Err(PlanningError::out_of_bounds(position));
        }
        if position != self.start {
            self.k_m += self.model.heuristic(self.start, position);
            self.start = position;
        }
        Ok(())
    }

    /// Moves the start, absorbs queued rescans, repairs the solution and
    /// extracts a path to the goal.
    ///
    /// # Errors
    ///
    /// - [`PlanningError::OutOfBounds`] if `position` is off the grid.
    /// - [`PlanningError::MalformedRescan`] if a queued rescan is rejected.
    ///   Rescans queued after it are dropped.
    /// - [`PlanningError::Timeout`] / [`PlanningError::Cancelled`] from the
    ///   search.
    /// - [`PlanningError::NoPath`] if the goal is unreachable under the
    ///   sensed map.
    pub fn move_and_replan(&mut self, position: CellCoord) -> Result<Plan, PlanningError> {
        let started = Instant::now();
        self.move_to(position)?;

        let mut absorbed = 0;
        while let Some(rescan) = self.pending.pop_front() {
            match self.absorb_rescan(&rescan) {
                Ok(applied) => absorbed += applied,
                Err(e) => {
                    self.pending.clear();
                    return Err(e);
                }
            }
        }

        let expansions = self.compute_shortest_path()?;
        let path = self.extract_path()?;

        let stats = PlanStats::new()
            .with_expansions(expansions)
            .with_open_set_size(self.open.len())
            .with_absorbed_edges(absorbed)
            .with_k_m(self.k_m)
            .with_elapsed(started.elapsed());

        debug!(
            start = %self.start,
            steps = path.step_count(),
            cost = path.cost(),
            expansions,
            absorbed,
            "Replanned"
        );

        Ok(Plan::new(path, self.g.clone(), self.rhs.clone(), stats))
    }

    /// Extracts a path from the start by greedy descent on `cost + g`.
    ///
    /// Among the successors of the current cell, the one minimizing
    /// `cost(current, n) + g(n)` is taken; ties go to the first in successor
    /// order. Blocked cells lose because their cost is `+∞`.
    ///
    /// # Errors
    ///
    /// Returns [`PlanningError::NoPath`] if `rhs(start)` is `+∞`, if every
    /// candidate at some step is infinite, or if the walk exceeds the number
    /// of grid cells.
    pub fn extract_path(&self) -> Result<CellPath, PlanningError> {
        let no_path = PlanningError::NoPath {
            start: self.start,
            goal: self.goal,
        };

        if self.start == self.goal {
            return Ok(CellPath::single(self.goal));
        }
        if self.rhs(self.start).is_infinite() {
            return Err(no_path);
        }

        let limit = self.sensed_map.len();
        let mut cells = vec![self.start];
        let mut total = 0.0;
        let mut current = self.start;

        while current != self.goal {
            if cells.len() > limit {
                warn!(start = %self.start, steps = cells.len(), "Path extraction did not reach the goal");
                return Err(no_path);
            }

            let mut best: Option<(CellCoord, f64, f64)> = None;
            for n in self.model.neighbors(&self.sensed_map, current)? {
                let step = self.cost(current, n);
                let value = step + self.g(n);
                if value.is_finite() && best.is_none_or(|(_, b, _)| value < b) {
                    best = Some((n, value, step));
                }
            }

            let Some((next, _, step)) = best else {
                return Err(no_path);
            };
            total += step;
            cells.push(next);
            current = next;
        }

        Ok(CellPath::new(cells, total))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use grid_spatial::{Connectivity, Occupancy, OccupancyGrid};
    use plan_types::{ChangedEdge, DistanceMetric, LocalPatch, PlannerConfig};

    fn c(x: i32, y: i32) -> CellCoord {
        CellCoord::new(x, y)
    }

    /// Builds the rescan a sensor would report after `cell` turned into an
    /// obstacle, given the planner's current map.
    fn obstacle_rescan(planner: &DStarLite, cell: CellCoord) -> Rescan {
        let mut after = planner.sensed_map().clone();
        after.set(cell, Occupancy::Obstacle).unwrap();

        let edges = after
            .successors(cell, Connectivity::Eight, false)
            .unwrap()
            .into_iter()
            .map(|n| ChangedEdge::new(cell, n, planner.cost(cell, n)))
            .collect();
        let patch = LocalPatch::capture(&after, cell, 1).unwrap();
        Rescan::new(planner.start(), edges, patch)
    }

    fn four_connected() -> PlannerConfig {
        PlannerConfig::new()
            .with_connectivity(Connectivity::Four)
            .with_metric(DistanceMetric::Manhattan)
    }

    #[test]
    fn test_end_to_end_three_by_three() {
        let mut planner = DStarLite::new(3, 3, c(0, 0), c(2, 2), four_connected()).unwrap();
        let plan = planner.move_and_replan(c(0, 0)).unwrap();

        assert_eq!(plan.path().len(), 5);
        assert_eq!(plan.path().first(), Some(c(0, 0)));
        assert_eq!(plan.path().last(), Some(c(2, 2)));
        assert!(plan.path().is_contiguous(Connectivity::Four));
        assert_eq!(plan.g().value(c(2, 2)), 0.0);
        assert_eq!(plan.g().value(c(0, 0)), 4.0);
        assert_relative_eq!(plan.path().cost(), 4.0);
        // E before S in successor order
        assert_eq!(plan.path().next_step(), Some(c(1, 0)));
    }

    #[test]
    fn test_move_to_goal_returns_single_cell() {
        let mut planner = DStarLite::new(4, 4, c(0, 0), c(3, 3), PlannerConfig::default()).unwrap();
        let plan = planner.move_and_replan(c(3, 3)).unwrap();
        assert_eq!(plan.path().cells(), &[c(3, 3)]);
    }

    #[test]
    fn test_move_accumulates_k_m() {
        let mut planner = DStarLite::new(5, 5, c(0, 0), c(4, 4), PlannerConfig::default()).unwrap();
        planner.move_and_replan(c(0, 0)).unwrap();
        assert_eq!(planner.k_m(), 0.0);

        planner.move_and_replan(c(1, 1)).unwrap();
        assert_relative_eq!(planner.k_m(), std::f64::consts::SQRT_2, epsilon = 1e-12);

        planner.move_and_replan(c(1, 2)).unwrap();
        assert_relative_eq!(planner.k_m(), std::f64::consts::SQRT_2 + 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_move_out_of_bounds() {
        let mut planner = DStarLite::new(3, 3, c(0, 0), c(2, 2), PlannerConfig::default()).unwrap();
        assert_eq!(
            planner.move_and_replan(c(-1, 0)).unwrap_err(),
            PlanningError::out_of_bounds(c(-1, 0))
        );
        assert_eq!(planner.start(), c(0, 0));
    }

    #[test]
    fn test_obstacle_on_path_is_avoided() {
        let mut planner = DStarLite::new(5, 5, c(0, 0), c(4, 4), PlannerConfig::default()).unwrap();
        let before = planner.move_and_replan(c(0, 0)).unwrap();
        assert!(before.path().contains(c(2, 2)));

        let rescan = obstacle_rescan(&planner, c(2, 2));
        let applied = planner.absorb_rescan(&rescan).unwrap();
        assert_eq!(applied, 8);
        assert!(planner.open_len() > 0);

        let after = planner.move_and_replan(c(0, 0)).unwrap();
        assert!(!after.path().contains(c(2, 2)));
        assert!(after.path().cost() >= before.path().cost() - 1e-9);
        assert_relative_eq!(
            after.path().cost(),
            planner.g(c(0, 0)),
            epsilon = 1e-9
        );
    }

    #[test]
    fn test_tied_keys_expand_underconsistent_goal_neighbor() {
        let config = PlannerConfig::new().with_metric(DistanceMetric::Octile);
        let mut map = OccupancyGrid::new(5, 5);
        map.set(c(3, 3), Occupancy::Obstacle).unwrap();
        let mut planner = DStarLite::with_map(map, c(0, 0), c(4, 4), config).unwrap();
        planner.move_and_replan(c(0, 0)).unwrap();

        // (3, 4) becomes underconsistent with a k1 equal to the start's
        planner.queue_rescan(obstacle_rescan(&planner, c(3, 4)));
        let plan = planner.move_and_replan(c(0, 0)).unwrap();

        assert_eq!(plan.path().cells()[plan.path().len() - 2], c(4, 3));
        assert_relative_eq!(plan.path().cost(), 2.0 + 3.0 * std::f64::consts::SQRT_2, epsilon = 1e-9);
        assert!(planner.g(c(3, 4)).is_infinite());
        assert!(!planner.open().contains(c(3, 4)));
    }

    #[test]
    fn test_queued_rescan_absorbed_on_replan() {
        let mut planner = DStarLite::new(5, 5, c(0, 0), c(4, 4), PlannerConfig::default()).unwrap();
        planner.move_and_replan(c(0, 0)).unwrap();

        let rescan = obstacle_rescan(&planner, c(2, 2));
        planner.queue_rescan(rescan);
        assert_eq!(planner.pending_rescans(), 1);

        let plan = planner.move_and_replan(c(1, 1)).unwrap();
        assert_eq!(planner.pending_rescans(), 0);
        assert_eq!(plan.stats().absorbed_edges(), 8);
        assert!(!plan.path().contains(c(2, 2)));
        assert_eq!(planner.sensed_map().obstacle_count(), 1);
    }

    #[test]
    fn test_diagonal_edges_skipped_when_four_connected() {
        let mut planner = DStarLite::new(5, 5, c(0, 0), c(4, 4), four_connected()).unwrap();
        planner.move_and_replan(c(0, 0)).unwrap();

        let rescan = obstacle_rescan(&planner, c(2, 2));
        assert_eq!(rescan.changed_edges().len(), 8);
        assert_eq!(planner.absorb_rescan(&rescan).unwrap(), 4);

        let plan = planner.move_and_replan(c(0, 0)).unwrap();
        assert!(!plan.path().contains(c(2, 2)));
        assert_relative_eq!(plan.path().cost(), 8.0);
    }

    #[test]
    fn test_malformed_rescan_leaves_state_untouched() {
        let mut planner = DStarLite::new(4, 4, c(0, 0), c(3, 3), PlannerConfig::default()).unwrap();
        planner.move_and_replan(c(0, 0)).unwrap();
        let g_before = planner.g_table().clone();
        let open_before = planner.open_len();

        // Wrong old cost
        let wrong_cost = Rescan::new(
            c(0, 0),
            vec![ChangedEdge::new(c(1, 1), c(2, 1), 7.0)],
            LocalPatch::empty(),
        );
        assert!(matches!(
            planner.absorb_rescan(&wrong_cost),
            Err(PlanningError::MalformedRescan(_))
        ));

        // Not neighbors
        let far = Rescan::new(
            c(0, 0),
            vec![ChangedEdge::new(c(0, 0), c(2, 0), 2.0)],
            LocalPatch::empty(),
        );
        assert!(planner.absorb_rescan(&far).is_err());

        // Outside the grid
        let outside = Rescan::new(
            c(0, 0),
            vec![ChangedEdge::new(c(3, 3), c(4, 3), 1.0)],
            LocalPatch::empty(),
        );
        let error = planner.absorb_rescan(&outside).unwrap_err();
        assert!(!error.is_recoverable());

        // Patch from a larger grid
        let big = OccupancyGrid::new(10, 10);
        let oversized = Rescan::new(c(0, 0), Vec::new(), LocalPatch::capture(&big, c(8, 8), 1).unwrap());
        assert!(planner.absorb_rescan(&oversized).is_err());

        assert_eq!(planner.g_table(), &g_before);
        assert_eq!(planner.open_len(), open_before);
        assert_eq!(planner.sensed_map().obstacle_count(), 0);
    }

    #[test]
    fn test_patch_flip_without_edges_is_rejected() {
        let mut planner = DStarLite::new(5, 5, c(0, 0), c(4, 4), PlannerConfig::default()).unwrap();
        planner.move_and_replan(c(0, 0)).unwrap();
        let g_before = planner.g_table().clone();
        let rhs_before = planner.rhs_table().clone();
        let open_before = planner.open_len();

        let mut after = planner.sensed_map().clone();
        after.set(c(2, 2), Occupancy::Obstacle).unwrap();
        let patch = LocalPatch::capture(&after, c(2, 2), 1).unwrap();

        // Occupancy alone
        let silent = Rescan::new(c(0, 0), Vec::new(), patch.clone());
        let error = planner.absorb_rescan(&silent).unwrap_err();
        assert!(matches!(error, PlanningError::MalformedRescan(_)));
        assert!(!error.is_recoverable());

        // Seven of the eight edges around (2,2)
        let partial: Vec<ChangedEdge> = after
            .successors(c(2, 2), Connectivity::Eight, false)
            .unwrap()
            .into_iter()
            .filter(|&n| n != c(3, 3))
            .map(|n| ChangedEdge::new(n, c(2, 2), planner.cost(n, c(2, 2))))
            .collect();
        assert_eq!(partial.len(), 7);
        let incomplete = Rescan::new(c(0, 0), partial, patch.clone());
        assert!(matches!(
            planner.absorb_rescan(&incomplete),
            Err(PlanningError::MalformedRescan(_))
        ));

        assert_eq!(planner.sensed_map().obstacle_count(), 0);
        assert_eq!(planner.g_table(), &g_before);
        assert_eq!(planner.rhs_table(), &rhs_before);
        assert_eq!(planner.open_len(), open_before);

        // Edges reported in either direction complete the rescan
        let complete = obstacle_rescan(&planner, c(2, 2));
        assert_eq!(planner.absorb_rescan(&complete).unwrap(), 8);
        assert_eq!(planner.sensed_map().get(c(2, 2)), Some(Occupancy::Obstacle));

        // A patch that repeats the sensed map needs no edges
        let unchanged = LocalPatch::capture(planner.sensed_map(), c(2, 2), 1).unwrap();
        assert_eq!(planner.absorb_rescan(&Rescan::new(c(0, 0), Vec::new(), unchanged)).unwrap(), 0);
    }

    #[test]
    fn test_malformed_queued_rescan_drops_rest() {
        let mut planner = DStarLite::new(4, 4, c(0, 0), c(3, 3), PlannerConfig::default()).unwrap();
        planner.queue_rescan(Rescan::new(
            c(0, 0),
            vec![ChangedEdge::new(c(0, 0), c(3, 3), 1.0)],
            LocalPatch::empty(),
        ));
        planner.queue_rescan(Rescan::empty(c(0, 0)));

        let error = planner.move_and_replan(c(0, 0)).unwrap_err();
        assert!(matches!(error, PlanningError::MalformedRescan(_)));
        assert_eq!(planner.pending_rescans(), 0);
    }

    #[test]
    fn test_enclosed_goal_has_no_path() {
        let map = OccupancyGrid::from_rows(&[
            ".......",
            "..###..",
            "..#.#..",
            "..###..",
            ".......",
        ])
        .unwrap();
        let mut planner =
            DStarLite::with_map(map, c(0, 0), c(3, 2), PlannerConfig::default()).unwrap();

        let error = planner.move_and_replan(c(0, 0)).unwrap_err();
        assert_eq!(
            error,
            PlanningError::NoPath {
                start: c(0, 0),
                goal: c(3, 2),
            }
        );
        assert!(error.is_no_path());
        assert!(planner.rhs(c(0, 0)).is_infinite());
    }

    #[test]
    fn test_obstacle_removal_shortens_path() {
        let map = OccupancyGrid::from_rows(&[".....", ".###.", ".###.", "....."]).unwrap();
        let mut planner = DStarLite::with_map(map, c(0, 1), c(4, 1), four_connected()).unwrap();
        let before = planner.move_and_replan(c(0, 1)).unwrap();
        assert_relative_eq!(before.path().cost(), 6.0);

        // Sensor reveals (1,1)..(3,1) are actually free
        let mut after = planner.sensed_map().clone();
        let opened = [c(1, 1), c(2, 1), c(3, 1)];
        for &cell in &opened {
            after.set(cell, Occupancy::Free).unwrap();
        }
        let mut edges: Vec<ChangedEdge> = Vec::new();
        for &cell in &opened {
            for n in after.successors(cell, Connectivity::Eight, false).unwrap() {
                let edge = ChangedEdge::new(cell, n, planner.cost(cell, n));
                if !edges.iter().any(|e| e.key() == edge.key()) {
                    edges.push(edge);
                }
            }
        }
        let rescan = Rescan::new(c(0, 1), edges, LocalPatch::capture(&after, c(2, 1), 2).unwrap());
        planner.queue_rescan(rescan);

        let plan = planner.move_and_replan(c(0, 1)).unwrap();
        assert_relative_eq!(plan.path().cost(), 4.0);
        assert_eq!(plan.path().cells().len(), 5);
    }

    #[test]
    fn test_replan_is_idempotent() {
        let mut planner = DStarLite::new(6, 6, c(0, 0), c(5, 3), PlannerConfig::default()).unwrap();
        let first = planner.move_and_replan(c(1, 0)).unwrap();
        let second = planner.move_and_replan(c(1, 0)).unwrap();
        assert_eq!(first.path(), second.path());
        assert_eq!(second.stats().expansions(), 0);
    }
}
