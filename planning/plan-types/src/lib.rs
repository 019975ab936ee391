//! Core types for incremental grid replanning.
//!
//! This crate provides the vocabulary shared by planners, sensors and the
//! navigation loop:
//!
//! - **Keys**: lexicographic open-set priorities ([`Priority`])
//! - **Configuration**: metric, connectivity and cutoffs ([`PlannerConfig`], [`DistanceMetric`])
//! - **Value tables**: dense `g`/`rhs` storage ([`ValueTable`], [`Consistency`])
//! - **Rescans**: changed edges plus the sensed local map ([`Rescan`], [`ChangedEdge`], [`LocalPatch`])
//! - **Results**: extracted paths with diagnostics ([`CellPath`], [`Plan`], [`PlanStats`], [`Visit`])
//! - **Errors**: [`PlanningError`]
//!
//! # Example
//!
//! ```
//! use grid_spatial::{CellCoord, Connectivity};
//! use plan_types::{DistanceMetric, PlannerConfig, Priority, ValueTable};
//!
//! let config = PlannerConfig::default()
//!     .with_metric(DistanceMetric::Manhattan)
//!     .with_connectivity(Connectivity::Four);
//! assert!(config.validate().is_empty());
//!
//! let mut g = ValueTable::new(3, 3);
//! g.set(CellCoord::new(2, 2), 0.0).unwrap();
//! let key = Priority::new(g.value(CellCoord::new(2, 2)) + 4.0, 0.0);
//! assert!(key < Priority::INFINITE);
//! ```
//!
//! # Feature Flags
//!
//! - `serde`: Enables serialization/deserialization for all types

#![doc(html_root_url = "https://docs.rs/plan-types/0.3.0")]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod error;
pub mod path;
pub mod plan;
pub mod priority;
pub mod rescan;
pub mod table;

pub use config::{DEFAULT_MAX_ITERATIONS, DistanceMetric, PlannerConfig};
pub use error::PlanningError;
pub use path::CellPath;
pub use plan::{Plan, PlanStats, Visit};
pub use priority::{KEY_TOLERANCE, Priority};
pub use rescan::{ChangedEdge, LocalPatch, Rescan};
pub use table::{Consistency, ValueTable};
