//! Headless navigation through a partially observed grid world.
//!
//! This crate ties the pieces together: a ground-truth [`sensor_scan::World`]
//! scanned by a [`sensor_scan::LocalScanner`], a [`plan_dstar::DStarLite`]
//! planner repairing its solution as obstacles appear, and a
//! [`Presentation`] that shows each tick.
//!
//! - [`Navigator`] - The per-tick sense, replan, present, move loop
//! - [`ScenarioConfig`] - A run described in TOML, with seeded world generation
//! - [`RunSummary`] - End-of-run counters, serializable to JSON
//! - [`TerminalPresentation`] / [`NullPresentation`] - Output surfaces
//!
//! # Example
//!
//! ```
//! use grid_spatial::CellCoord;
//! use nav_sim::{NullPresentation, RunOutcome, ScenarioConfig, run_scenario};
//!
//! let config = ScenarioConfig {
//!     width: 24,
//!     height: 16,
//!     start: CellCoord::new(0, 0),
//!     goal: CellCoord::new(23, 15),
//!     obstacle_density: 0.0,
//!     ..ScenarioConfig::default()
//! };
//!
//! let summary = run_scenario(&config, NullPresentation).unwrap();
//! assert_eq!(summary.outcome, RunOutcome::Reached);
//! assert_eq!(summary.world_obstacles, 0);
//! ```

#![doc(html_root_url = "https://docs.rs/nav-sim/0.3.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod navigator;
mod presentation;
mod scenario;
mod summary;

pub use error::{NavError, Result};
pub use navigator::{
    DEFAULT_MAX_STALLED_TICKS, DEFAULT_TICK_LIMIT, Navigator, TickResult, run_scenario,
};
pub use presentation::{Frame, NullPresentation, Presentation, TerminalPresentation};
pub use scenario::ScenarioConfig;
pub use summary::{RunOutcome, RunSummary};
