//! Tier 2: capacitated vehicle routing with virtual-node splitting.
//!
//! [`route_stops`] turns placed stops into depot-anchored routes whose
//! demand never exceeds vehicle capacity. Stops too large for one vehicle
//! are split into [`VirtualNode`](crate::models::VirtualNode) slices.
//! [`route_demands`] does the same from bare per-stop demand.

mod engine;
mod result;
mod split;

pub use engine::{route_demands, route_stops};
pub use result::{RoutingResult, RoutingStats};
pub use split::{demand_slices, split_stops, SplitNodes};
