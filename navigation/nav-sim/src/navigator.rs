//! The sense, replan, present, move loop.

use std::time::Instant;

use grid_spatial::CellCoord;
use plan_dstar::DStarLite;
use plan_dstar::heuristics::path_length;
use plan_types::PlanningError;
use sensor_scan::{LocalScanner, RescanSource};
use tracing::{debug, info, warn};

use crate::error::{NavError, Result};
use crate::presentation::{Frame, Presentation};
use crate::scenario::ScenarioConfig;
use crate::summary::{RunOutcome, RunSummary};

/// Default number of ticks before a run is abandoned.
pub const DEFAULT_TICK_LIMIT: usize = 10_000;

/// Default number of consecutive failed replans before a run is abandoned.
pub const DEFAULT_MAX_STALLED_TICKS: usize = 3;

/// What happened during one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickResult {
    /// The agent took one step along the new path.
    Moved(CellCoord),
    /// The agent already stands on the goal.
    Arrived,
    /// Replanning failed with a recoverable error; the agent stayed put.
    Failed(PlanningError),
}

/// Drives one agent from its start to the goal.
///
/// Each tick scans around the agent, hands the rescan to the planner,
/// replans from the current position, presents the result and steps to the
/// next cell of the path. Recoverable planning failures keep the agent in
/// place; the run is abandoned after too many of them in a row.
///
/// # Example
///
/// ```
/// use grid_spatial::CellCoord;
/// use nav_sim::{Navigator, NullPresentation, RunOutcome};
/// use plan_dstar::DStarLite;
/// use plan_types::PlannerConfig;
/// use sensor_scan::{LocalScanner, SensorConfig, World};
///
/// let mut world = World::new(12, 8).unwrap();
/// for y in 0..6 {
///     world.place_obstacle(CellCoord::new(6, y)).unwrap();
/// }
///
/// let planner = DStarLite::new(12, 8, CellCoord::new(0, 0), CellCoord::new(11, 0), PlannerConfig::default()).unwrap();
/// let scanner = LocalScanner::new(world, SensorConfig::new().with_view_range(2)).unwrap();
///
/// let mut navigator = Navigator::new(planner, scanner, NullPresentation);
/// let summary = navigator.run().unwrap();
/// assert_eq!(summary.outcome, RunOutcome::Reached);
/// assert_eq!(navigator.position(), CellCoord::new(11, 0));
/// ```
#[derive(Debug)]
pub struct Navigator<S, P> {
    planner: DStarLite,
    sensor: S,
    presentation: P,
    position: CellCoord,
    trajectory: Vec<CellCoord>,
    tick_limit: usize,
    max_stalled_ticks: usize,
    totals: RunSummary,
}

impl<S: RescanSource, P: Presentation> Navigator<S, P> {
    /// Creates a navigator with the agent at the planner's start.
    pub fn new(planner: DStarLite, sensor: S, presentation: P) -> Self {
        let position = planner.start();
        Self {
            planner,
            sensor,
            presentation,
            position,
            trajectory: vec![position],
            tick_limit: DEFAULT_TICK_LIMIT,
            max_stalled_ticks: DEFAULT_MAX_STALLED_TICKS,
            totals: RunSummary::default(),
        }
    }

    /// Sets the tick limit.
    #[must_use]
    pub const fn with_tick_limit(mut self, ticks: usize) -> Self {
        self.tick_limit = ticks;
        self
    }

    /// Sets how many consecutive failed replans end the run.
    #[must_use]
    pub const fn with_max_stalled_ticks(mut self, ticks: usize) -> Self {
        self.max_stalled_ticks = ticks;
        self
    }

    /// Returns the agent's position.
    #[must_use]
    pub const fn position(&self) -> CellCoord {
        self.position
    }

    /// Returns every cell the agent has occupied, in order.
    #[must_use]
    pub fn trajectory(&self) -> &[CellCoord] {
        &self.trajectory
    }

    /// Returns the planner.
    #[must_use]
    pub const fn planner(&self) -> &DStarLite {
        &self.planner
    }

    /// Returns the sensor.
    #[must_use]
    pub const fn sensor(&self) -> &S {
        &self.sensor
    }

    /// Returns the sensor for editing, e.g. to change its world between
    /// ticks.
    pub fn sensor_mut(&mut self) -> &mut S {
        &mut self.sensor
    }

    /// Returns the presentation.
    #[must_use]
    pub const fn presentation(&self) -> &P {
        &self.presentation
    }

    /// Returns the presentation for editing.
    pub fn presentation_mut(&mut self) -> &mut P {
        &mut self.presentation
    }

    /// Runs a single tick.
    ///
    /// # Errors
    ///
    /// Returns an error if the sensor fails, the planner fails with a
    /// non-recoverable error, or the presentation cannot write.
    pub fn step(&mut self, tick: usize) -> Result<TickResult> {
        let rescan = self.sensor.rescan(self.position)?;
        self.planner.queue_rescan(rescan);

        match self.planner.move_and_replan(self.position) {
            Ok(plan) => {
                self.totals.replans += 1;
                self.totals.expansions += plan.stats().expansions();
                self.totals.absorbed_edges += plan.stats().absorbed_edges();

                self.presentation.render(&Frame {
                    tick,
                    position: self.position,
                    goal: self.planner.goal(),
                    sensed_map: self.planner.sensed_map(),
                    path: Some(plan.path()),
                    visited: self.planner.visited(),
                    stats: Some(plan.stats()),
                })?;

                match plan.path().next_step() {
                    Some(next) => {
                        debug!(tick, from = %self.position, to = %next, "Stepping");
                        self.position = next;
                        self.trajectory.push(next);
                        Ok(TickResult::Moved(next))
                    }
                    None => Ok(TickResult::Arrived),
                }
            }
            Err(error) if error.is_recoverable() => {
                self.totals.failed_replans += 1;
                warn!(tick, position = %self.position, %error, "Replan failed");

                self.presentation.render(&Frame {
                    tick,
                    position: self.position,
                    goal: self.planner.goal(),
                    sensed_map: self.planner.sensed_map(),
                    path: None,
                    visited: self.planner.visited(),
                    stats: None,
                })?;
                Ok(TickResult::Failed(error))
            }
            Err(error) => Err(NavError::Planning(error)),
        }
    }

    /// Runs ticks until the goal is reached, the run stalls, or the tick
    /// limit runs out.
    ///
    /// # Errors
    ///
    /// See [`Navigator::step`].
    pub fn run(&mut self) -> Result<RunSummary> {
        let started = Instant::now();
        let goal = self.planner.goal();
        info!(start = %self.position, %goal, "Navigation started");

        let mut tick = 0;
        let mut stalled = 0;
        let outcome = loop {
            if self.position == goal {
                break RunOutcome::Reached;
            }
            if tick >= self.tick_limit {
                break RunOutcome::TickLimit;
            }

            let result = self.step(tick)?;
            tick += 1;
            match result {
                TickResult::Moved(_) | TickResult::Arrived => stalled = 0,
                TickResult::Failed(_) => {
                    stalled += 1;
                    if stalled >= self.max_stalled_ticks {
                        break RunOutcome::Stalled;
                    }
                }
            }
        };

        let map = self.planner.sensed_map();
        let summary = RunSummary {
            outcome,
            width: map.width(),
            height: map.height(),
            node_count: map.len(),
            sensed_obstacles: map.obstacle_count(),
            path_length: self.trajectory.len(),
            path_cost: path_length(&self.trajectory, self.planner.config().metric()),
            ticks: tick,
            elapsed_secs: started.elapsed().as_secs_f64(),
            ..self.totals.clone()
        };

        info!(
            outcome = ?summary.outcome,
            ticks = summary.ticks,
            replans = summary.replans,
            path_length = summary.path_length,
            "Navigation finished"
        );
        Ok(summary)
    }
}

/// Builds the world, sensor, planner and navigator described by `config`,
/// runs it, and hands the summary to the presentation.
///
/// # Errors
///
/// Returns [`NavError::Config`] if the scenario does not validate, and any
/// error [`Navigator::run`] returns.
pub fn run_scenario<P: Presentation>(config: &ScenarioConfig, presentation: P) -> Result<RunSummary> {
    let issues = config.validate();
    if !issues.is_empty() {
        return Err(NavError::config(issues.join("; ")));
    }

    let world = config.build_world()?;
    let world_obstacles = world.obstacle_count();
    let scanner = LocalScanner::new(world, config.sensor_config())?;
    let planner = DStarLite::new(
        config.width,
        config.height,
        config.start,
        config.goal,
        config.planner_config(),
    )?;

    let mut navigator = Navigator::new(planner, scanner, presentation)
        .with_tick_limit(config.tick_limit())
        .with_max_stalled_ticks(config.max_stalled_ticks);

    let summary = RunSummary {
        world_obstacles,
        ..navigator.run()?
    };
    navigator.presentation_mut().finish(&summary)?;
    Ok(summary)
}
