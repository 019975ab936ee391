//! D* Lite incremental replanning on 2D occupancy grids.
//!
//! This crate provides the planning engine used by the navigation loop:
//!
//! - [`DStarLite`] - Backward incremental search with key re-basing
//! - [`PriorityQueue`] - Re-keyable open set
//! - [`EdgeModel`] - Successor enumeration and edge pricing
//! - [`CancelToken`] - Cooperative cancellation of long searches
//!
//! # How Replanning Works
//!
//! The planner searches from the goal towards the agent. Every vertex keeps
//! a settled cost-to-goal `g` and a lookahead `rhs`; vertices where the two
//! disagree are queued. When the agent moves, only the key offset `k_m`
//! changes. When a sensor reports changed edges, the affected lookaheads are
//! repaired locally and only the vertices that actually change are
//! re-expanded.
//!
//! # Example
//!
//! ```
//! use grid_spatial::{CellCoord, Connectivity, Occupancy};
//! use plan_dstar::DStarLite;
//! use plan_types::{ChangedEdge, LocalPatch, PlannerConfig, Rescan};
//!
//! let start = CellCoord::new(0, 0);
//! let goal = CellCoord::new(4, 4);
//! let mut planner = DStarLite::new(5, 5, start, goal, PlannerConfig::default()).unwrap();
//!
//! let plan = planner.move_and_replan(start).unwrap();
//! assert!(plan.path().contains(CellCoord::new(2, 2)));
//!
//! // A sensor discovers an obstacle on the diagonal
//! let blocked = CellCoord::new(2, 2);
//! let mut seen = planner.sensed_map().clone();
//! seen.set(blocked, Occupancy::Obstacle).unwrap();
//! let edges = seen
//!     .successors(blocked, Connectivity::Eight, false)
//!     .unwrap()
//!     .into_iter()
//!     .map(|n| ChangedEdge::new(blocked, n, planner.cost(blocked, n)))
//!     .collect();
//! let patch = LocalPatch::capture(&seen, blocked, 1).unwrap();
//! planner.queue_rescan(Rescan::new(start, edges, patch));
//!
//! let plan = planner.move_and_replan(CellCoord::new(1, 1)).unwrap();
//! assert!(!plan.path().contains(blocked));
//! assert_eq!(plan.path().last(), Some(goal));
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization of the shared types in `plan-types`

#![doc(html_root_url = "https://docs.rs/plan-dstar/0.3.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod cancel;
pub mod engine;
pub mod heuristics;
pub mod neighbors;
pub mod queue;
mod replan;

pub use cancel::CancelToken;
pub use engine::DStarLite;
pub use neighbors::EdgeModel;
pub use queue::PriorityQueue;
