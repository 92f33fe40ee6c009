//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! For each pair of positions (i, j) in a route, compute the change in
//! distance from reversing the segment between them:
//!
//! ```text
//! delta = d(prev_i, r[j]) + d(r[i], next_j) - d(prev_i, r[i]) - d(r[j], next_j)
//! ```
//!
//! If delta < 0, reverse the segment [i..=j] and accept the improvement.
//! Repeat until no further improvement is found or the pass budget is spent
//! (first-improvement strategy).
//!
//! Only the visiting order changes, so route demand is untouched.
//!
//! # Complexity
//!
//! O(n²) per pass, at most `max_passes` passes.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use crate::distance::DistanceMatrix;

use super::route_distance;

/// Applies 2-opt improvement to a single route (given as matrix indices).
///
/// The route is assumed to start and end at `depot`. Returns the improved
/// sequence and the total route distance.
///
/// # Examples
///
/// ```
/// use u_schoolbus::distance::DistanceMatrix;
/// use u_schoolbus::local_search::two_opt_improve;
///
/// // depot 0 and nodes 1..=3 on a line
/// let mut dm = DistanceMatrix::new(4);
/// for i in 0..4 {
///     for j in 0..4 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
///
/// let (_, dist) = two_opt_improve(&[1, 3, 2], 0, &dm, 10);
/// assert!(dist <= 6.0 + 1e-10); // optimal: 0→1→2→3→0 = 6
/// ```
pub fn two_opt_improve(
    route: &[usize],
    depot: usize,
    distances: &DistanceMatrix,
    max_passes: usize,
) -> (Vec<usize>, f64) {
    let mut current = route.to_vec();

    if current.len() >= 2 {
        let n = current.len();
        for _ in 0..max_passes {
            let mut improved = false;
            for i in 0..n - 1 {
                for j in i + 1..n {
                    if two_opt_delta(&current, depot, distances, i, j) < -1e-10 {
                        current[i..=j].reverse();
                        improved = true;
                    }
                }
            }
            if !improved {
                break;
            }
        }
    }

    let dist = route_distance(&current, depot, distances);
    (current, dist)
}

/// Distance change from reversing `route[i..=j]`.
fn two_opt_delta(
    route: &[usize],
    depot: usize,
    distances: &DistanceMatrix,
    i: usize,
    j: usize,
) -> f64 {
    let n = route.len();
    let prev_i = if i == 0 { depot } else { route[i - 1] };
    let next_j = if j == n - 1 { depot } else { route[j + 1] };

    let old_cost = distances.get(prev_i, route[i]) + distances.get(route[j], next_j);
    let new_cost = distances.get(prev_i, route[j]) + distances.get(route[i], next_j);

    new_cost - old_cost
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Depot 0 plus nodes at planar points; Euclidean distances.
    fn planar(points: &[(f64, f64)]) -> DistanceMatrix {
        let mut dm = DistanceMatrix::new(points.len());
        for (i, a) in points.iter().enumerate() {
            for (j, b) in points.iter().enumerate() {
                dm.set(i, j, ((a.0 - b.0).powi(2) + (a.1 - b.1).powi(2)).sqrt());
            }
        }
        dm
    }

    fn line() -> DistanceMatrix {
        planar(&[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (3.0, 0.0)])
    }

    #[test]
    fn test_2opt_already_optimal() {
        let (improved, dist) = two_opt_improve(&[1, 2, 3], 0, &line(), 10);
        assert_eq!(improved, vec![1, 2, 3]);
        assert!((dist - 6.0).abs() < 1e-10);
    }

    #[test]
    fn test_2opt_reverses_crossing() {
        let dm = planar(&[(0.0, 0.0), (1.0, 1.0), (2.0, 0.0), (1.0, -1.0)]);
        let before = route_distance(&[1, 3, 2], 0, &dm);
        let (_, after) = two_opt_improve(&[1, 3, 2], 0, &dm, 10);
        assert!(after < before - 1e-6);
    }

    #[test]
    fn test_2opt_empty_route() {
        let (improved, dist) = two_opt_improve(&[], 0, &line(), 10);
        assert!(improved.is_empty());
        assert_eq!(dist, 0.0);
    }

    #[test]
    fn test_2opt_single_node() {
        let (improved, dist) = two_opt_improve(&[2], 0, &line(), 10);
        assert_eq!(improved, vec![2]);
        assert!((dist - 4.0).abs() < 1e-10);
    }

    #[test]
    fn test_2opt_zero_budget_keeps_order() {
        let (improved, _) = two_opt_improve(&[3, 1, 2], 0, &line(), 0);
        assert_eq!(improved, vec![3, 1, 2]);
    }

    #[test]
    fn test_2opt_does_not_worsen() {
        let dm = planar(&[
            (5.0, 5.0),
            (0.0, 0.0),
            (10.0, 0.0),
            (0.0, 10.0),
            (10.0, 10.0),
        ]);
        let initial = vec![1, 4, 2, 3];
        let initial_dist = route_distance(&initial, 0, &dm);
        let (mut improved, improved_dist) = two_opt_improve(&initial, 0, &dm, 50);
        assert!(improved_dist <= initial_dist + 1e-10);
        improved.sort_unstable();
        assert_eq!(improved, vec![1, 2, 3, 4]);
    }
}
