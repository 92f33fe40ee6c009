//! Route evaluator that materializes node sequences into routes.

use crate::distance::DistanceMatrix;
use crate::models::{Depot, Route, RouteStop};

/// A route whose demand exceeds vehicle capacity.
#[derive(Debug, Clone, PartialEq)]
pub struct CapacityViolation {
    /// Offending route.
    pub route_id: usize,
    /// Students on the route.
    pub load: i32,
    /// Vehicle capacity.
    pub capacity: i32,
}

/// Turns node index sequences into [`Route`]s, computing demand and
/// depot-to-depot distance, and checking capacity.
///
/// Matrix index 0 is the depot; index `i > 0` is `nodes[i - 1]`.
///
/// # Examples
///
/// ```
/// use u_schoolbus::distance::DistanceMatrix;
/// use u_schoolbus::evaluation::RouteEvaluator;
/// use u_schoolbus::models::{Coordinate, Depot, RouteStop};
///
/// let depot = Depot::new(0, Coordinate::new(37.50, 127.0));
/// let nodes = vec![
///     RouteStop::Placed { stop_id: 1, location: Coordinate::new(37.51, 127.0), demand: 10 },
///     RouteStop::Placed { stop_id: 2, location: Coordinate::new(37.52, 127.0), demand: 20 },
/// ];
/// let points: Vec<_> = std::iter::once(depot.location)
///     .chain(nodes.iter().map(|n| n.location()))
///     .collect();
/// let dm = DistanceMatrix::from_coordinates(&points);
///
/// let evaluator = RouteEvaluator::new(&nodes, &dm, &depot, 40);
/// let (route, violation) = evaluator.build_route(1, &[1, 2]);
/// assert_eq!(route.total_demand(), 30);
/// assert!(violation.is_none());
/// assert!((route.total_distance_meters() - 2.0 * dm.get(0, 2)).abs() < 1e-6);
/// ```
pub struct RouteEvaluator<'a> {
    nodes: &'a [RouteStop],
    distances: &'a DistanceMatrix,
    depot: &'a Depot,
    capacity: i32,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given problem data.
    pub fn new(
        nodes: &'a [RouteStop],
        distances: &'a DistanceMatrix,
        depot: &'a Depot,
        capacity: i32,
    ) -> Self {
        Self {
            nodes,
            distances,
            depot,
            capacity,
        }
    }

    /// Builds a route from a sequence of matrix indices.
    ///
    /// Returns the route and a violation if its demand exceeds capacity.
    pub fn build_route(
        &self,
        route_id: usize,
        sequence: &[usize],
    ) -> (Route, Option<CapacityViolation>) {
        let mut route = Route::new(route_id, self.depot.id);
        let mut total_distance = 0.0;
        let mut prev = 0;

        for &idx in sequence {
            total_distance += self.distances.get(prev, idx);
            route.push_stop(self.nodes[idx - 1].clone());
            prev = idx;
        }
        if !sequence.is_empty() {
            total_distance += self.distances.get(prev, 0);
        }
        route.set_total_distance_meters(total_distance);

        let violation = (route.total_demand() > self.capacity).then(|| CapacityViolation {
            route_id,
            load: route.total_demand(),
            capacity: self.capacity,
        });
        (route, violation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::offset_meters;
    use crate::models::{Coordinate, VirtualNode};

    fn setup() -> (Depot, Vec<RouteStop>, DistanceMatrix) {
        let depot = Depot::new(7, Coordinate::new(37.5, 127.0));
        let a = offset_meters(&depot.location, 1_000.0, 0.0);
        let nodes = vec![
            RouteStop::Placed {
                stop_id: 1,
                location: a,
                demand: 15,
            },
            RouteStop::Virtual(VirtualNode {
                parent_stop_id: 2,
                slice_index: 0,
                location: offset_meters(&depot.location, 2_000.0, 0.0),
                demand: 40,
            }),
        ];
        let points: Vec<Coordinate> = std::iter::once(depot.location)
            .chain(nodes.iter().map(RouteStop::location))
            .collect();
        let dm = DistanceMatrix::from_coordinates(&points);
        (depot, nodes, dm)
    }

    #[test]
    fn test_build_route_empty() {
        let (depot, nodes, dm) = setup();
        let eval = RouteEvaluator::new(&nodes, &dm, &depot, 40);
        let (route, violation) = eval.build_route(1, &[]);
        assert!(route.is_empty());
        assert!(violation.is_none());
        assert_eq!(route.total_distance_meters(), 0.0);
    }

    #[test]
    fn test_build_route_single() {
        let (depot, nodes, dm) = setup();
        let eval = RouteEvaluator::new(&nodes, &dm, &depot, 40);
        let (route, violation) = eval.build_route(3, &[1]);
        assert_eq!(route.id(), 3);
        assert_eq!(route.depot_id(), 7);
        assert_eq!(route.total_demand(), 15);
        assert!(violation.is_none());
        assert!((route.total_distance_meters() - 2_000.0).abs() < 1.0);
    }

    #[test]
    fn test_build_route_capacity_violated() {
        let (depot, nodes, dm) = setup();
        let eval = RouteEvaluator::new(&nodes, &dm, &depot, 40);
        let (_, violation) = eval.build_route(1, &[1, 2]);
        assert_eq!(
            violation,
            Some(CapacityViolation {
                route_id: 1,
                load: 55,
                capacity: 40,
            })
        );
    }
}
