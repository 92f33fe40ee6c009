//! Tier 1: stop placement.
//!
//! Turns students into a small set of pick-up stops such that every covered
//! student walks at most `R_walk` to exactly one stop and no stop serves
//! more than `S_max` students.
//!
//! - [`place_stops`] — greedy maximum coverage with pure geometry
//! - [`place_stops_with`] — same, snapping stops through a [`RoadSnapper`](crate::collaborator::RoadSnapper)

mod candidate;
mod greedy;
mod result;

pub use greedy::{place_stops, place_stops_with};
pub use result::{PlacementResult, PlacementStats};
