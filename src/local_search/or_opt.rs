//! Intra-route Or-opt improvement.
//!
//! # Algorithm
//!
//! Tries moving segments of 1, 2, or 3 consecutive nodes to a different
//! position within the same route. Accepts the best move of each pass if it
//! reduces total distance.
//!
//! Virtual slices of one stop share a location, so they form zero-length
//! segments that Or-opt keeps together.
//!
//! # Complexity
//!
//! O(n²) per pass, at most `max_passes` passes.
//!
//! # Reference
//!
//! Or, I. (1976). "Traveling Salesman-Type Combinatorial Problems and Their
//! Relation to the Logistics of Blood Banking". PhD thesis.

use crate::distance::DistanceMatrix;

/// Applies Or-opt improvement to a single route.
///
/// Tries relocating segments of 1, 2, and 3 nodes to better positions.
/// Returns the improved sequence and total distance.
///
/// # Examples
///
/// ```
/// use u_schoolbus::distance::DistanceMatrix;
/// use u_schoolbus::local_search::{or_opt_improve, route_distance};
///
/// let mut dm = DistanceMatrix::new(4);
/// for i in 0..4 {
///     for j in 0..4 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
///
/// let (improved, dist) = or_opt_improve(&[2, 1, 3], 0, &dm, 10);
/// assert!(dist <= route_distance(&[2, 1, 3], 0, &dm) + 1e-10);
/// assert_eq!(improved.len(), 3);
/// ```
pub fn or_opt_improve(
    route: &[usize],
    depot: usize,
    distances: &DistanceMatrix,
    max_passes: usize,
) -> (Vec<usize>, f64) {
    let mut current = route.to_vec();

    if current.len() >= 2 {
        for _ in 0..max_passes {
            let mut improved = false;
            for seg_len in 1..=3.min(current.len() - 1) {
                if try_or_opt_pass(&mut current, depot, distances, seg_len) {
                    improved = true;
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

/// Computes the total distance: depot → route[0] → ... → route[n-1] → depot.
pub fn route_distance(route: &[usize], depot: usize, distances: &DistanceMatrix) -> f64 {
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0.0;
    };
    let mut dist = distances.get(depot, first);
    for w in route.windows(2) {
        dist += distances.get(w[0], w[1]);
    }
    dist + distances.get(last, depot)
}

/// One pass of Or-opt for a given segment length. Returns true if improved.
fn try_or_opt_pass(
    route: &mut Vec<usize>,
    depot: usize,
    distances: &DistanceMatrix,
    seg_len: usize,
) -> bool {
    let n = route.len();
    if n < seg_len + 1 {
        return false;
    }

    let mut best_delta = -1e-10;
    let mut best_move: Option<(usize, usize)> = None;

    for from in 0..=(n - seg_len) {
        let prev = if from == 0 { depot } else { route[from - 1] };
        let after = if from + seg_len >= n {
            depot
        } else {
            route[from + seg_len]
        };
        let seg_first = route[from];
        let seg_last = route[from + seg_len - 1];

        let removal_gain = distances.get(prev, seg_first) + distances.get(seg_last, after)
            - distances.get(prev, after);

        // `to` is an insertion point in the original route: the segment goes
        // between route[to - 1] and route[to].
        for to in 0..=n {
            if to >= from && to <= from + seg_len {
                continue;
            }

            let ins_prev = if to == 0 { depot } else { route[to - 1] };
            let ins_next = if to >= n { depot } else { route[to] };

            let insertion_cost = distances.get(ins_prev, seg_first)
                + distances.get(seg_last, ins_next)
                - distances.get(ins_prev, ins_next);

            let delta = insertion_cost - removal_gain;
            if delta < best_delta {
                best_delta = delta;
                best_move = Some((from, to));
            }
        }
    }

    let Some((from, to)) = best_move else {
        return false;
    };
    let segment: Vec<usize> = route.drain(from..from + seg_len).collect();
    let insert_pos = if to > from { to - seg_len } else { to };
    for (i, &node) in segment.iter().enumerate() {
        route.insert(insert_pos + i, node);
    }
    true
}
