//! Ground truth and local scanning for grid replanning.
//!
//! This crate stands between the environment and the planner:
//!
//! - [`World`] - The true occupancy and its writer API
//! - [`LocalScanner`] - A square-window range sensor with its own sensed map
//! - [`RescanSource`] - The trait planners' callers drive once per tick
//! - [`SensorConfig`] - View range and edge-cost metric
//!
//! Scans produce [`plan_types::Rescan`] records: the edges whose cost changed
//! (with their cost before the scan) and the sensed state of the window.
//!
//! # Example
//!
//! ```
//! use grid_spatial::CellCoord;
//! use plan_dstar::DStarLite;
//! use plan_types::PlannerConfig;
//! use sensor_scan::{LocalScanner, RescanSource, SensorConfig, World};
//!
//! let mut world = World::new(6, 6).unwrap();
//! world.place_obstacle(CellCoord::new(1, 1)).unwrap();
//!
//! let start = CellCoord::new(0, 0);
//! let goal = CellCoord::new(5, 5);
//! let mut scanner = LocalScanner::new(world, SensorConfig::new().with_view_range(2)).unwrap();
//! let mut planner = DStarLite::new(6, 6, start, goal, PlannerConfig::default()).unwrap();
//!
//! planner.queue_rescan(scanner.rescan(start).unwrap());
//! let plan = planner.move_and_replan(start).unwrap();
//! assert!(!plan.path().contains(CellCoord::new(1, 1)));
//! assert_eq!(planner.sensed_map(), scanner.sensed_map());
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization for [`World`] and [`SensorConfig`]

#![doc(html_root_url = "https://docs.rs/sensor-scan/0.3.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod config;
mod error;
mod scanner;
mod world;

pub use config::{DEFAULT_VIEW_RANGE, SensorConfig};
pub use error::{Result, SensorError};
pub use scanner::{LocalScanner, RescanSource};
pub use world::World;
