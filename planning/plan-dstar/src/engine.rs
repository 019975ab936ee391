//! D* Lite search engine.
//!
//! [`DStarLite`] searches backwards from the goal, so the values it keeps
//! (`g`, the settled cost-to-goal, and `rhs`, the one-step lookahead) stay
//! valid when the agent moves. When the sensed map changes, only vertices
//! whose lookahead is affected become inconsistent and are re-expanded.
//!
//! Keys are `(min(g, rhs) + h(start, v) + k_m, min(g, rhs))`. Instead of
//! re-keying the whole open set when the start moves, the heuristic drift is
//! accumulated in `k_m`; stale keys are then lower bounds and are corrected
//! lazily when they reach the top of the queue.
//!
//! # Example
//!
//! ```
//! use grid_spatial::{CellCoord, Connectivity};
//! use plan_dstar::DStarLite;
//! use plan_types::{DistanceMetric, PlannerConfig};
//!
//! let config = PlannerConfig::default()
//!     .with_connectivity(Connectivity::Four)
//!     .with_metric(DistanceMetric::Manhattan);
//! let mut planner = DStarLite::new(3, 3, CellCoord::new(0, 0), CellCoord::new(2, 2), config).unwrap();
//!
//! planner.compute_shortest_path().unwrap();
//! assert_eq!(planner.g(CellCoord::new(0, 0)), 4.0);
//! assert_eq!(planner.g(CellCoord::new(2, 2)), 0.0);
//! ```

use std::collections::VecDeque;
use std::time::Instant;

use grid_spatial::{CellCoord, OccupancyGrid};
use plan_types::{
    Consistency, PlannerConfig, PlanningError, Priority, Rescan, ValueTable, Visit,
};
use tracing::{debug, trace};

use crate::cancel::CancelToken;
use crate::heuristics::costs_match;
use crate::neighbors::EdgeModel;
use crate::queue::PriorityQueue;

/// Incremental planner for one agent on one grid.
///
/// The engine owns its value tables, open set and sensed map exclusively.
/// Map changes reach it only through rescans (see
/// [`DStarLite::queue_rescan`] and [`DStarLite::absorb_rescan`]).
#[derive(Debug, Clone)]
pub struct DStarLite {
    pub(crate) config: PlannerConfig,
    pub(crate) model: EdgeModel,
    pub(crate) sensed_map: OccupancyGrid,
    pub(crate) start: CellCoord,
    pub(crate) goal: CellCoord,
    pub(crate) g: ValueTable,
    pub(crate) rhs: ValueTable,
    pub(crate) open: PriorityQueue,
    pub(crate) k_m: f64,
    pub(crate) visited: Vec<Visit>,
    pub(crate) pending: VecDeque<Rescan>,
    pub(crate) cancel: Option<CancelToken>,
}

impl DStarLite {
    /// Creates a planner on a `width × height` grid believed to be empty.
    ///
    /// # Errors
    ///
    /// - [`PlanningError::InvalidConfig`] if `config` does not validate or an
    ///   extent is zero.
    /// - [`PlanningError::OutOfBounds`] if `start` or `goal` is off the grid.
    pub fn new(
        width: usize,
        height: usize,
        start: CellCoord,
        goal: CellCoord,
        config: PlannerConfig,
    ) -> Result<Self, PlanningError> {
        let map = OccupancyGrid::try_new(width, height)?;
        Self::with_map(map, start, goal, config)
    }

    /// Creates a planner that starts from a known sensed map.
    ///
    /// # Errors
    ///
    /// Same as [`DStarLite::new`].
    pub fn with_map(
        sensed_map: OccupancyGrid,
        start: CellCoord,
        goal: CellCoord,
        config: PlannerConfig,
    ) -> Result<Self, PlanningError> {
        let issues = config.validate();
        if !issues.is_empty() {
            return Err(PlanningError::invalid_config(issues.join("; ")));
        }
        for cell in [start, goal] {
            if !sensed_map.contains(cell) {
                return Err(PlanningError::out_of_bounds(cell));
            }
        }

        let g = ValueTable::new(sensed_map.width(), sensed_map.height());
        let mut rhs = g.clone();
        rhs.set(goal, 0.0)?;

        let mut planner = Self {
            model: EdgeModel::from_config(&config),
            config,
            sensed_map,
            start,
            goal,
            g,
            rhs,
            open: PriorityQueue::new(),
            k_m: 0.0,
            visited: Vec::new(),
            pending: VecDeque::new(),
            cancel: None,
        };
        let key = planner.calculate_key(goal);
        planner.open.insert_or_replace(goal, key);

        debug!(
            width = planner.sensed_map.width(),
            height = planner.sensed_map.height(),
            %start,
            %goal,
            "Created D* Lite planner"
        );
        Ok(planner)
    }

    /// Attaches a cancel token checked once per expansion.
    #[must_use]
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Attaches or detaches a cancel token.
    pub fn set_cancel_token(&mut self, token: Option<CancelToken>) {
        self.cancel = token;
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Returns the current start vertex.
    #[must_use]
    pub const fn start(&self) -> CellCoord {
        self.start
    }

    /// Returns the goal vertex.
    #[must_use]
    pub const fn goal(&self) -> CellCoord {
        self.goal
    }

    /// Returns the key re-basing accumulator.
    #[must_use]
    pub const fn k_m(&self) -> f64 {
        self.k_m
    }

    /// Returns the planner's sensed map.
    #[must_use]
    pub const fn sensed_map(&self) -> &OccupancyGrid {
        &self.sensed_map
    }

    /// Returns `g(v)`, `+∞` outside the grid.
    #[must_use]
    pub fn g(&self, v: CellCoord) -> f64 {
        self.g.value(v)
    }

    /// Returns `rhs(v)`, `+∞` outside the grid.
    #[must_use]
    pub fn rhs(&self, v: CellCoord) -> f64 {
        self.rhs.value(v)
    }

    /// Returns the consistency state of `v`.
    #[must_use]
    pub fn consistency(&self, v: CellCoord) -> Consistency {
        Consistency::classify(self.g(v), self.rhs(v))
    }

    /// Returns the `g` table.
    #[must_use]
    pub const fn g_table(&self) -> &ValueTable {
        &self.g
    }

    /// Returns the `rhs` table.
    #[must_use]
    pub const fn rhs_table(&self) -> &ValueTable {
        &self.rhs
    }

    /// Returns the open set.
    #[must_use]
    pub const fn open(&self) -> &PriorityQueue {
        &self.open
    }

    /// Returns the number of queued (inconsistent) vertices.
    #[must_use]
    pub fn open_len(&self) -> usize {
        self.open.len()
    }

    /// Returns the vertices popped by the last `compute_shortest_path` call,
    /// in pop order.
    #[must_use]
    pub fn visited(&self) -> &[Visit] {
        &self.visited
    }

    /// Computes the key of `v` from its current values.
    #[must_use]
    pub fn calculate_key(&self, v: CellCoord) -> Priority {
        let best = self.g(v).min(self.rhs(v));
        Priority::new(best + self.model.heuristic(self.start, v) + self.k_m, best)
    }

    /// Returns the cost of moving from `u` to `v` under the sensed map.
    #[must_use]
    pub fn cost(&self, u: CellCoord, v: CellCoord) -> f64 {
        self.model.cost(&self.sensed_map, u, v)
    }

    /// Brings `u`'s queue membership in line with its consistency.
    ///
    /// Inconsistent vertices are (re-)queued with a fresh key, consistent
    /// ones are removed.
    pub fn update_vertex(&mut self, u: CellCoord) {
        if self.consistency(u).is_consistent() {
            self.open.remove(u);
        } else {
            let key = self.calculate_key(u);
            self.open.insert_or_replace(u, key);
        }
    }

    /// Returns `min over successors s' of cost(s, s') + g(s')`.
    pub(crate) fn lookahead(&self, s: CellCoord) -> Result<f64, PlanningError> {
        Ok(self
            .model
            .neighbors(&self.sensed_map, s)?
            .into_iter()
            .map(|n| self.cost(s, n) + self.g(n))
            .fold(f64::INFINITY, f64::min))
    }

    fn set_g(&mut self, v: CellCoord, value: f64) -> Result<(), PlanningError> {
        self.g.set(v, value)?;
        Ok(())
    }

    pub(crate) fn set_rhs(&mut self, v: CellCoord, value: f64) -> Result<(), PlanningError> {
        self.rhs.set(v, value)?;
        Ok(())
    }

    fn should_continue(&self) -> bool {
        self.open.top_key() < self.calculate_key(self.start)
            || !self.consistency(self.start).is_consistent()
    }

    fn check_limits(&self, iterations: usize, started: Instant) -> Result<(), PlanningError> {
        if self.cancel.as_ref().is_some_and(CancelToken::is_cancelled) {
            debug!(iterations, "Search cancelled");
            return Err(PlanningError::Cancelled);
        }

        let over_budget = self.config.max_iterations().is_some_and(|max| iterations >= max)
            || self
                .config
                .timeout()
                .is_some_and(|limit| started.elapsed() >= limit);

        if over_budget {
            debug!(iterations, open = self.open.len(), "Search cutoff reached");
            return Err(PlanningError::Timeout {
                iterations,
                elapsed: started.elapsed(),
            });
        }
        Ok(())
    }

    /// Expands inconsistent vertices until the start is consistent and no
    /// queued key is smaller than the start's key.
    ///
    /// Returns the number of expansions. The visited log is reset at the
    /// start of every call.
    ///
    /// # Errors
    ///
    /// - [`PlanningError::Timeout`] when the iteration or wall-clock limit is
    ///   reached. The search resumes where it stopped on the next call.
    /// - [`PlanningError::Cancelled`] when the cancel token is set.
    pub fn compute_shortest_path(&mut self) -> Result<usize, PlanningError> {
        let started = Instant::now();
        self.visited.clear();
        let mut iterations = 0;

        while self.should_continue() {
            let Some(u) = self.open.top() else {
                break;
            };
            self.check_limits(iterations, started)?;
            iterations += 1;

            let k_old = self.open.top_key();
            let k_new = self.calculate_key(u);
            self.visited.push(Visit::new(u, k_old));
            trace!(%u, key = %k_old, "Expanding vertex");

            if k_old < k_new {
                self.open.insert_or_replace(u, k_new);
            } else if self.g(u) > self.rhs(u) {
                let g_u = self.rhs(u);
                self.set_g(u, g_u)?;
                self.open.remove(u);
                for s in self.model.neighbors(&self.sensed_map, u)? {
                    if s != self.goal {
                        let candidate = self.cost(s, u) + g_u;
                        if candidate < self.rhs(s) {
                            self.set_rhs(s, candidate)?;
                        }
                    }
                    self.update_vertex(s);
                }
            } else {
                let g_old = self.g(u);
                self.set_g(u, f64::INFINITY)?;
                for s in self.model.neighbors(&self.sensed_map, u)? {
                    if s != self.goal && costs_match(self.rhs(s), self.cost(s, u) + g_old) {
                        let value = self.lookahead(s)?;
                        self.set_rhs(s, value)?;
                    }
                    self.update_vertex(s);
                }
                // rhs(u) > g_old for an underconsistent u, so only its key changes.
                self.update_vertex(u);
            }
        }

        debug!(
            expansions = iterations,
            open = self.open.len(),
            g_start = self.g(self.start),
            elapsed_us = u64::try_from(started.elapsed().as_micros()).unwrap_or(u64::MAX),
            "Shortest path computed"
        );
        Ok(iterations)
    }
}
