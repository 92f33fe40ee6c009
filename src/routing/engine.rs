//! Capacitated vehicle routing over placed stops.
//!
//! # Algorithm
//!
//! 1. Order stops by id and split any stop above vehicle capacity into
//!    virtual nodes.
//! 2. Build a haversine distance matrix over `[depot, nodes...]`.
//! 3. Construct routes with capacity-bounded nearest neighbor.
//! 4. Optionally shorten each route with 2-opt then Or-opt under a pass
//!    budget. Neither operator moves nodes between routes.

use tracing::{error, info, instrument, warn};

use crate::config::RoutingParams;
use crate::constructive::nearest_neighbor;
use crate::deadline::Deadline;
use crate::distance::DistanceMatrix;
use crate::error::OptimizeError;
use crate::evaluation::RouteEvaluator;
use crate::local_search::{or_opt_improve, two_opt_improve};
use crate::models::{
    Coordinate, PlacedStop, RouteStop, RunStatus, StopDemand, UnroutedReason, UnroutedStop,
};

use super::result::{RoutingResult, RoutingStats};
use super::split::split_stops;

/// Builds capacity-feasible routes that pick up every placed stop.
///
/// Only each stop's id, location and assignment count matter; see
/// [`route_demands`].
///
/// # Errors
///
/// [`OptimizeError::ParameterOutOfRange`] if `params` fail validation; no
/// work is done in that case.
///
/// # Examples
///
/// ```
/// use u_schoolbus::config::RoutingParams;
/// use u_schoolbus::models::{Coordinate, Depot, PlacedStop};
/// use u_schoolbus::routing::route_stops;
///
/// let depot = Depot::new(0, Coordinate::new(37.50, 127.00));
/// let mut stop = PlacedStop::new(1, Coordinate::new(37.51, 127.00));
/// for student_id in 1..=50 {
///     stop.assign(student_id, 0.0);
/// }
///
/// let result = route_stops(&[stop], &RoutingParams::new(depot)).unwrap();
/// assert_eq!(result.routes.len(), 2);
/// assert_eq!(result.stats.total_students_routed, 50);
/// ```
pub fn route_stops(
    stops: &[PlacedStop],
    params: &RoutingParams,
) -> Result<RoutingResult, OptimizeError> {
    let demands: Vec<StopDemand> = stops.iter().map(StopDemand::from).collect();
    route_demands(&demands, params)
}

/// Builds capacity-feasible routes from per-stop demand alone.
///
/// Stops are processed in `stop_id` order whatever the input order. A
/// stop with zero or negative demand is skipped and counted in
/// `empty_stops_skipped`.
///
/// # Errors
///
/// [`OptimizeError::ParameterOutOfRange`] if `params` fail validation.
///
/// # Examples
///
/// ```
/// use u_schoolbus::config::RoutingParams;
/// use u_schoolbus::models::{Coordinate, Depot, StopDemand};
/// use u_schoolbus::routing::route_demands;
///
/// let depot = Depot::new(0, Coordinate::new(37.50, 127.00));
/// let stops = [StopDemand::new(1, Coordinate::new(37.51, 127.00), 90)];
///
/// let result = route_demands(&stops, &RoutingParams::new(depot)).unwrap();
/// assert_eq!(result.routes.len(), 3);
/// assert_eq!(result.stats.virtual_nodes_created, 3);
/// assert_eq!(result.stats.total_students_routed, 90);
/// ```
#[instrument(
    skip_all,
    fields(
        stops = stops.len(),
        capacity = params.vehicle_capacity,
        split = params.split_virtual_nodes,
    )
)]
pub fn route_demands(
    stops: &[StopDemand],
    params: &RoutingParams,
) -> Result<RoutingResult, OptimizeError> {
    params.validate()?;
    let deadline = Deadline::from_millis(params.time_limit_ms);
    let capacity = params.vehicle_capacity;

    let mut ordered = stops.to_vec();
    ordered.sort_by_key(|s| s.stop_id);
    let split = split_stops(&ordered, capacity, params.split_virtual_nodes);
    let nodes = &split.nodes;

    let points: Vec<Coordinate> = std::iter::once(params.depot.location)
        .chain(nodes.iter().map(RouteStop::location))
        .collect();
    let distances = DistanceMatrix::from_coordinates(&points);
    let demands: Vec<i32> = std::iter::once(0)
        .chain(nodes.iter().map(RouteStop::demand))
        .collect();

    let built = nearest_neighbor(&demands, &distances, capacity, &deadline);
    let mut status = if built.expired {
        RunStatus::PartialResult
    } else {
        RunStatus::Complete
    };

    let evaluator = RouteEvaluator::new(nodes, &distances, &params.depot, capacity);
    let mut routes = Vec::with_capacity(built.routes.len());
    for (k, sequence) in built.routes.into_iter().enumerate() {
        let sequence = if !params.improve {
            sequence
        } else if deadline.is_expired() {
            if status == RunStatus::Complete {
                warn!(route = k + 1, "time limit reached, skipping route improvement");
            }
            status = RunStatus::PartialResult;
            sequence
        } else {
            improve(&sequence, &distances, params.max_improvement_passes)
        };

        let (route, violation) = evaluator.build_route(k + 1, &sequence);
        if let Some(v) = violation {
            error!(
                route_id = v.route_id,
                load = v.load,
                capacity = v.capacity,
                "route exceeds vehicle capacity"
            );
        }
        routes.push(route);
    }

    let mut unrouted = split.unroutable;
    unrouted.extend(built.unrouted.iter().map(|&idx| {
        let node = &nodes[idx - 1];
        UnroutedStop {
            stop_id: node.stop_id(),
            slice_index: match node {
                RouteStop::Virtual(v) => Some(v.slice_index),
                RouteStop::Placed { .. } => None,
            },
            demand: node.demand(),
            reason: UnroutedReason::DeadlineExceeded,
        }
    }));

    let stats = RoutingStats {
        virtual_nodes_created: split.virtual_nodes_created,
        empty_stops_skipped: split.empty_stops_skipped,
        ..RoutingStats::compute(&routes, &unrouted)
    };
    info!(
        routes = stats.total_routes,
        routed = stats.total_students_routed,
        unrouted = stats.unrouted_students,
        distance_m = stats.total_distance_meters,
        status = status.code(),
        "routing finished"
    );

    Ok(RoutingResult {
        routes,
        unrouted_demand: unrouted,
        stats,
        status,
    })
}

/// 2-opt then Or-opt on one route; index 0 is the depot.
fn improve(sequence: &[usize], distances: &DistanceMatrix, max_passes: usize) -> Vec<usize> {
    let (sequence, _) = two_opt_improve(sequence, 0, distances, max_passes);
    let (sequence, _) = or_opt_improve(&sequence, 0, distances, max_passes);
    sequence
}
