//! Nearest-neighbor constructive heuristic.
//!
//! Builds routes greedily: starting from the depot, always visit the nearest
//! unrouted node whose demand still fits. When nothing fits, close the route
//! and open a new one at the depot.
//!
//! # Complexity
//!
//! O(n²) where n = number of nodes.
//!
//! # Reference
//!
//! This is the simplest constructive heuristic for VRP. While solution
//! quality is typically 15-25% above optimal, it provides a fast baseline.

use tracing::warn;

use crate::deadline::Deadline;
use crate::distance::DistanceMatrix;

/// Output of [`nearest_neighbor`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Construction {
    /// Routes as node sequences (matrix indices, depot excluded).
    pub routes: Vec<Vec<usize>>,
    /// Nodes left off every route.
    pub unrouted: Vec<usize>,
    /// `true` if the deadline stopped construction early.
    pub expired: bool,
}

/// Constructs capacity-feasible routes with the nearest-neighbor heuristic.
///
/// # Arguments
///
/// * `demands` — Demand per matrix index; index 0 is the depot and is ignored
/// * `distances` — Distance matrix over the same indices
/// * `capacity` — Vehicle capacity (homogeneous fleet, unlimited vehicles)
/// * `deadline` — Checked before each route is opened
///
/// Distance ties go to the lower index. Nodes whose demand exceeds
/// `capacity` can never be placed and are returned as unrouted.
///
/// # Examples
///
/// ```
/// use u_schoolbus::constructive::nearest_neighbor;
/// use u_schoolbus::deadline::Deadline;
/// use u_schoolbus::distance::DistanceMatrix;
///
/// // depot, then three nodes on a line 1, 2 and 3 units away
/// let mut dm = DistanceMatrix::new(4);
/// for i in 0..4 {
///     for j in 0..4 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
/// let demands = [0, 15, 15, 15];
///
/// let built = nearest_neighbor(&demands, &dm, 40, &Deadline::unbounded());
/// assert_eq!(built.routes, vec![vec![1, 2], vec![3]]);
/// assert!(built.unrouted.is_empty());
/// ```
pub fn nearest_neighbor(
    demands: &[i32],
    distances: &DistanceMatrix,
    capacity: i32,
    deadline: &Deadline,
) -> Construction {
    let n = demands.len();
    let mut built = Construction::default();
    if n <= 1 {
        return built;
    }

    let mut visited = vec![false; n];
    visited[0] = true; // depot
    for (i, &d) in demands.iter().enumerate().skip(1) {
        if d > capacity {
            visited[i] = true;
            built.unrouted.push(i);
        }
    }

    while visited.iter().any(|&v| !v) {
        if deadline.is_expired() {
            warn!(routes = built.routes.len(), "time limit reached during route construction");
            built.expired = true;
            built
                .unrouted
                .extend((1..n).filter(|&i| !visited[i]));
            break;
        }

        let mut current = 0;
        let mut current_load: i32 = 0;
        let mut route = Vec::new();

        loop {
            // Nearest unvisited node that fits capacity
            let fitting: Vec<usize> = (1..n)
                .filter(|&i| !visited[i] && current_load + demands[i] <= capacity)
                .collect();

            match distances.nearest_neighbor(current, &fitting) {
                Some(next) => {
                    visited[next] = true;
                    route.push(next);
                    current_load += demands[next];
                    current = next;
                }
                None => break,
            }
        }

        if route.is_empty() {
            // Every remaining node was rejected up front; nothing can be placed.
            break;
        }
        built.routes.push(route);
    }

    built.unrouted.sort_unstable();
    built
}
