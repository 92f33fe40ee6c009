//! Virtual-node splitting.
//!
//! A stop whose demand exceeds vehicle capacity cannot be served by one
//! vehicle. With splitting enabled it becomes `ceil(demand / capacity)`
//! virtual nodes at the stop's location: every slice carries `capacity`
//! students except the last, which takes the remainder. A full slice fills
//! a vehicle on its own, so the parent spans the fewest routes possible.

use tracing::{debug, warn};

use crate::models::{RouteStop, StopDemand, UnroutedReason, UnroutedStop, VirtualNode};

/// Routing nodes derived from a set of placed stops.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SplitNodes {
    /// Nodes to route, in stop id order, slices in slice order.
    pub nodes: Vec<RouteStop>,
    /// Stops excluded because they exceed capacity and splitting is off.
    pub unroutable: Vec<UnroutedStop>,
    /// Virtual nodes created.
    pub virtual_nodes_created: usize,
    /// Stops skipped because nobody is assigned to them.
    pub empty_stops_skipped: usize,
}

/// Splits `demand` into slices of at most `capacity`, largest first.
///
/// # Examples
///
/// ```
/// use u_schoolbus::routing::demand_slices;
///
/// assert_eq!(demand_slices(90, 40), vec![40, 40, 10]);
/// assert_eq!(demand_slices(80, 40), vec![40, 40]);
/// assert_eq!(demand_slices(12, 40), vec![12]);
/// ```
pub fn demand_slices(demand: i32, capacity: i32) -> Vec<i32> {
    if demand <= 0 || capacity <= 0 {
        return Vec::new();
    }
    let full = demand / capacity;
    let rest = demand % capacity;
    let mut slices = vec![capacity; full as usize];
    if rest > 0 {
        slices.push(rest);
    }
    slices
}

/// Turns stop demand into routing nodes.
///
/// Stops are taken in the given order. Stops with no positive demand are
/// skipped.
/// A stop over `capacity` is split into virtual nodes when `split` is set,
/// otherwise it is reported with [`UnroutedReason::UnroutableStop`].
pub fn split_stops(stops: &[StopDemand], capacity: i32, split: bool) -> SplitNodes {
    let mut out = SplitNodes::default();

    for stop in stops {
        let demand = stop.demand;
        if demand <= 0 {
            out.empty_stops_skipped += 1;
            continue;
        }
        if demand <= capacity {
            out.nodes.push(RouteStop::Placed {
                stop_id: stop.stop_id,
                location: stop.location,
                demand,
            });
            continue;
        }
        if !split {
            warn!(stop_id = stop.stop_id, demand, capacity, "stop exceeds vehicle capacity");
            out.unroutable.push(UnroutedStop {
                stop_id: stop.stop_id,
                slice_index: None,
                demand,
                reason: UnroutedReason::UnroutableStop,
            });
            continue;
        }

        let slices = demand_slices(demand, capacity);
        debug!(stop_id = stop.stop_id, demand, slices = slices.len(), "stop split");
        out.virtual_nodes_created += slices.len();
        out.nodes
            .extend(slices.into_iter().enumerate().map(|(slice_index, d)| {
                RouteStop::Virtual(VirtualNode {
                    parent_stop_id: stop.stop_id,
                    slice_index,
                    location: stop.location,
                    demand: d,
                })
            }));
    }

    out
}
