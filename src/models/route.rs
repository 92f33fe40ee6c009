//! Depot, routing nodes, and route types.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// The fixed start and end of every route, typically the school.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    /// Depot identifier.
    pub id: usize,
    /// Depot location.
    pub location: Coordinate,
}

impl Depot {
    /// Creates a depot.
    pub fn new(id: usize, location: Coordinate) -> Self {
        Self { id, location }
    }
}

/// A demand slice of a stop whose demand exceeds vehicle capacity.
///
/// Shares the parent's location. Slices of one parent sum to its demand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VirtualNode {
    /// The stop this slice was split from.
    pub parent_stop_id: usize,
    /// Zero-based position of this slice among its siblings.
    pub slice_index: usize,
    /// Parent stop location.
    pub location: Coordinate,
    /// Students carried by this slice.
    pub demand: i32,
}

/// A node visited by a route: a whole placed stop or a virtual slice of one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RouteStop {
    /// An entire placed stop.
    Placed {
        /// Stop identifier.
        stop_id: usize,
        /// Stop location.
        location: Coordinate,
        /// Students picked up.
        demand: i32,
    },
    /// A slice of a split stop.
    Virtual(VirtualNode),
}

impl RouteStop {
    /// Id of the underlying placed stop.
    pub fn stop_id(&self) -> usize {
        match self {
            RouteStop::Placed { stop_id, .. } => *stop_id,
            RouteStop::Virtual(v) => v.parent_stop_id,
        }
    }

    /// Node location.
    pub fn location(&self) -> Coordinate {
        match self {
            RouteStop::Placed { location, .. } => *location,
            RouteStop::Virtual(v) => v.location,
        }
    }

    /// Students picked up at this node.
    pub fn demand(&self) -> i32 {
        match self {
            RouteStop::Placed { demand, .. } => *demand,
            RouteStop::Virtual(v) => v.demand,
        }
    }

    /// Returns `true` for a virtual slice.
    pub fn is_virtual(&self) -> bool {
        matches!(self, RouteStop::Virtual(_))
    }
}

/// An ordered sequence of pick-ups served by one vehicle.
///
/// A route starts and ends at its depot (not stored in `stops`).
///
/// # Examples
///
/// ```
/// use u_schoolbus::models::{Coordinate, Route, RouteStop};
///
/// let mut route = Route::new(1, 0);
/// route.push_stop(RouteStop::Placed {
///     stop_id: 4,
///     location: Coordinate::new(37.5, 127.0),
///     demand: 12,
/// });
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.total_demand(), 12);
/// assert_eq!(route.stop_ids(), vec![4]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    id: usize,
    depot_id: usize,
    stops: Vec<RouteStop>,
    total_demand: i32,
    total_distance_meters: f64,
}

impl Route {
    /// Creates an empty route.
    pub fn new(id: usize, depot_id: usize) -> Self {
        Self {
            id,
            depot_id,
            stops: Vec::new(),
            total_demand: 0,
            total_distance_meters: 0.0,
        }
    }

    /// Appends a node to the end of this route.
    pub fn push_stop(&mut self, stop: RouteStop) {
        self.total_demand += stop.demand();
        self.stops.push(stop);
    }

    /// Route identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Depot this route starts and ends at.
    pub fn depot_id(&self) -> usize {
        self.depot_id
    }

    /// Nodes in visiting order.
    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    /// Number of nodes (excluding depot).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if this route visits no node.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Placed stop ids in visiting order; split stops may repeat.
    pub fn stop_ids(&self) -> Vec<usize> {
        self.stops.iter().map(RouteStop::stop_id).collect()
    }

    /// Sum of node demands.
    pub fn total_demand(&self) -> i32 {
        self.total_demand
    }

    /// Depot → stops → depot distance.
    pub fn total_distance_meters(&self) -> f64 {
        self.total_distance_meters
    }

    pub(crate) fn set_total_distance_meters(&mut self, d: f64) {
        self.total_distance_meters = d;
    }
}
