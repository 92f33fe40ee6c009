//! Routing output.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::models::{Route, RouteStop, RunStatus, UnroutedReason, UnroutedStop};

/// Summary statistics of a routing run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoutingStats {
    /// Routes built.
    pub total_routes: usize,
    /// Students picked up across all routes.
    pub total_students_routed: i32,
    /// Mean nodes per route (0 when no routes).
    pub average_stops_per_route: f64,
    /// Sum of route lengths.
    pub total_distance_meters: f64,
    /// Virtual nodes created by splitting.
    pub virtual_nodes_created: usize,
    /// Students on no route.
    pub unrouted_students: i32,
    /// Input stops with no students.
    pub empty_stops_skipped: usize,
}

impl RoutingStats {
    pub(crate) fn compute(routes: &[Route], unrouted: &[UnroutedStop]) -> Self {
        let nodes: usize = routes.iter().map(Route::len).sum();
        Self {
            total_routes: routes.len(),
            total_students_routed: routes.iter().map(Route::total_demand).sum(),
            average_stops_per_route: if routes.is_empty() {
                0.0
            } else {
                nodes as f64 / routes.len() as f64
            },
            total_distance_meters: routes.iter().map(Route::total_distance_meters).sum(),
            unrouted_students: unrouted.iter().map(|u| u.demand).sum(),
            ..Self::default()
        }
    }
}

/// Result of [`route_stops`](super::route_stops).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingResult {
    /// Routes, ids `1..=n`.
    pub routes: Vec<Route>,
    /// Demand left off every route.
    pub unrouted_demand: Vec<UnroutedStop>,
    /// Summary statistics.
    pub stats: RoutingStats,
    /// `PartialResult` when the time limit cut the run short.
    pub status: RunStatus,
}

impl RoutingResult {
    /// Students carried per placed stop, summed over all routes.
    pub fn routed_demand_by_stop(&self) -> BTreeMap<usize, i32> {
        let mut by_stop = BTreeMap::new();
        for stop in self.routes.iter().flat_map(|r| r.stops()) {
            *by_stop.entry(stop.stop_id()).or_insert(0) += stop.demand();
        }
        by_stop
    }

    /// Stop ids reported for `reason`.
    pub fn unrouted_with(&self, reason: UnroutedReason) -> Vec<usize> {
        self.unrouted_demand
            .iter()
            .filter(|u| u.reason == reason)
            .map(|u| u.stop_id)
            .collect()
    }

    /// Checks the routing invariants: every route is non-empty, within
    /// `capacity`, and reports its true demand; no node is served twice; no
    /// stop is both served whole and reported unrouted whole.
    pub fn is_consistent(&self, capacity: i32) -> bool {
        let mut seen = HashSet::new();
        for route in &self.routes {
            let demand: i32 = route.stops().iter().map(RouteStop::demand).sum();
            if route.is_empty() || demand != route.total_demand() || demand > capacity {
                return false;
            }
            for stop in route.stops() {
                let key = match stop {
                    RouteStop::Placed { stop_id, .. } => (*stop_id, None),
                    RouteStop::Virtual(v) => (v.parent_stop_id, Some(v.slice_index)),
                };
                if !seen.insert(key) {
                    return false;
                }
            }
        }
        self.unrouted_demand
            .iter()
            .all(|u| seen.insert((u.stop_id, u.slice_index)))
    }
}
