//! # u-schoolbus
//!
//! School bus network optimization in two tiers: place pick-up stops within
//! walking distance of students, then build capacity-feasible bus routes
//! through those stops.
//!
//! ## Modules
//!
//! - [`models`] — Domain model types (Student, PlacedStop, Route, VirtualNode, outcomes)
//! - [`distance`] — Haversine distance, bearing, and distance matrix
//! - [`config`] — Placement and routing parameters with validation
//! - [`error`] — Fatal and collaborator error types
//! - [`deadline`] — Caller-supplied time budget
//! - [`collaborator`] — Geocoding and road-snapping interfaces with geometric fallback
//! - [`placement`] — Tier 1 greedy maximum-coverage stop placement
//! - [`routing`] — Tier 2 capacitated routing with virtual-node splitting
//! - [`evaluation`] — Route materialization and capacity checking
//! - [`constructive`] — Nearest-neighbor route construction
//! - [`local_search`] — Local search operators (2-opt, Or-opt)
//! - [`pipeline`] — Full Tier 1 + Tier 2 run with summary
//!
//! ## Quick start
//!
//! ```
//! use u_schoolbus::config::{PlacementParams, RoutingParams};
//! use u_schoolbus::models::{Coordinate, Depot, Student};
//! use u_schoolbus::pipeline::run_full_pipeline;
//!
//! let students = vec![
//!     Student::new(1, 37.5100, 127.0000),
//!     Student::new(2, 37.5101, 127.0002),
//!     Student::without_location(3),
//! ];
//! let school = Depot::new(0, Coordinate::new(37.50, 127.00));
//!
//! let run = run_full_pipeline(
//!     &students,
//!     &PlacementParams::default(),
//!     &RoutingParams::new(school),
//! )
//! .unwrap();
//!
//! assert_eq!(run.summary.total_stops, 1);
//! assert_eq!(run.tier1.unassigned[0].reason.code(), "NO_COORDINATES");
//! assert_eq!(run.summary.total_routes, 1);
//! ```
//!
//! The library logs through [`tracing`] and never installs a subscriber.

pub mod collaborator;
pub mod config;
pub mod constructive;
pub mod deadline;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod pipeline;
pub mod placement;
pub mod routing;
