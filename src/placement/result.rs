//! Stop placement output.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::config::PlacementParams;
use crate::models::{PlacedStop, RunStatus, StudentAssignment, UnassignedReason, UnassignedStudent};

/// Summary statistics of a placement run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlacementStats {
    /// Stops created.
    pub total_stops: usize,
    /// Students with a stop.
    pub assigned_students: usize,
    /// Students without a stop, any reason.
    pub unassigned_students: usize,
    /// Inactive students ignored.
    pub inactive_skipped: usize,
    /// Records dropped because their id was already seen.
    pub duplicates_skipped: usize,
    /// Mean walk over assigned students (0 when none).
    pub average_walk_meters: f64,
    /// Shortest walk (0 when none).
    pub min_walk_meters: f64,
    /// Longest walk (0 when none).
    pub max_walk_meters: f64,
    /// Stops with no students; zero by construction.
    pub empty_stops: usize,
    /// Mean students per stop (0 when no stops).
    pub average_students_per_stop: f64,
    /// Stops moved by the road snapper.
    pub snapped_stops: usize,
}

impl PlacementStats {
    pub(crate) fn compute(
        stops: &[PlacedStop],
        assignments: &[StudentAssignment],
        unassigned: &[UnassignedStudent],
    ) -> Self {
        let walks = assignments.iter().map(|a| a.walk_distance_meters);
        let (min_walk, max_walk, sum_walk) = walks.fold(
            (f64::INFINITY, 0.0_f64, 0.0),
            |(lo, hi, sum), w| (lo.min(w), hi.max(w), sum + w),
        );
        let assigned = assignments.len();
        Self {
            total_stops: stops.len(),
            assigned_students: assigned,
            unassigned_students: unassigned.len(),
            average_walk_meters: if assigned == 0 {
                0.0
            } else {
                sum_walk / assigned as f64
            },
            min_walk_meters: if assigned == 0 { 0.0 } else { min_walk },
            max_walk_meters: max_walk,
            empty_stops: stops.iter().filter(|s| s.demand() == 0).count(),
            average_students_per_stop: if stops.is_empty() {
                0.0
            } else {
                assigned as f64 / stops.len() as f64
            },
            ..Self::default()
        }
    }
}

/// Result of [`place_stops`](super::place_stops).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementResult {
    /// Stops in creation order, ids `1..=n`.
    pub placed_stops: Vec<PlacedStop>,
    /// Every assignment, grouped by stop, nearest student first.
    pub assignments: Vec<StudentAssignment>,
    /// Students without a stop, ascending id.
    pub unassigned: Vec<UnassignedStudent>,
    /// Summary statistics.
    pub stats: PlacementStats,
    /// `PartialResult` when the time limit cut the run short.
    pub status: RunStatus,
}

impl PlacementResult {
    /// Students left unassigned for `reason`.
    pub fn unassigned_with(&self, reason: UnassignedReason) -> Vec<usize> {
        self.unassigned
            .iter()
            .filter(|u| u.reason == reason)
            .map(|u| u.student_id)
            .collect()
    }

    /// Checks the placement invariants: one assignment per student, every
    /// walk within radius, every stop within capacity and non-empty, and no
    /// student both assigned and unassigned.
    pub fn is_consistent(&self, params: &PlacementParams) -> bool {
        let mut seen = HashSet::new();
        for stop in &self.placed_stops {
            let demand = stop.assignments().len();
            if demand == 0 || demand > params.stop_capacity {
                return false;
            }
            for a in stop.assignments() {
                if a.stop_id != stop.id()
                    || a.walk_distance_meters > params.walk_radius_meters
                    || !seen.insert(a.student_id)
                {
                    return false;
                }
            }
        }
        if self.assignments.len() != seen.len()
            || !self.assignments.iter().all(|a| seen.contains(&a.student_id))
        {
            return false;
        }
        if let Some(max) = params.max_stops {
            if self.placed_stops.len() > max {
                return false;
            }
        }
        self.unassigned
            .iter()
            .all(|u| !seen.contains(&u.student_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Coordinate;

    fn stop(id: usize, walks: &[(usize, f64)]) -> PlacedStop {
        let mut s = PlacedStop::new(id, Coordinate::new(37.5, 127.0));
        for &(student, w) in walks {
            s.assign(student, w);
        }
        s
    }

    #[test]
    fn test_stats_compute() {
        let stops = vec![stop(1, &[(1, 0.0), (2, 100.0)]), stop(2, &[(3, 50.0)])];
        let assignments: Vec<_> = stops
            .iter()
            .flat_map(|s| s.assignments().to_vec())
            .collect();
        let unassigned = vec![UnassignedStudent {
            student_id: 9,
            reason: UnassignedReason::NoCoordinates,
        }];
        let stats = PlacementStats::compute(&stops, &assignments, &unassigned);
        assert_eq!(stats.total_stops, 2);
        assert_eq!(stats.assigned_students, 3);
        assert_eq!(stats.unassigned_students, 1);
        assert!((stats.average_walk_meters - 50.0).abs() < 1e-10);
        assert_eq!(stats.min_walk_meters, 0.0);
        assert_eq!(stats.max_walk_meters, 100.0);
        assert!((stats.average_students_per_stop - 1.5).abs() < 1e-10);
        assert_eq!(stats.empty_stops, 0);
    }

    #[test]
    fn test_stats_empty() {
        let stats = PlacementStats::compute(&[], &[], &[]);
        assert_eq!(stats.min_walk_meters, 0.0);
        assert_eq!(stats.average_walk_meters, 0.0);
        assert_eq!(stats.average_students_per_stop, 0.0);
    }

    #[test]
    fn test_consistency_detects_double_assignment() {
        let stops = vec![stop(1, &[(1, 0.0)]), stop(2, &[(1, 10.0)])];
        let assignments: Vec<_> = stops
            .iter()
            .flat_map(|s| s.assignments().to_vec())
            .collect();
        let result = PlacementResult {
            stats: PlacementStats::compute(&stops, &assignments, &[]),
            placed_stops: stops,
            assignments,
            unassigned: vec![],
            status: RunStatus::Complete,
        };
        assert!(!result.is_consistent(&PlacementParams::default()));
    }

    #[test]
    fn test_consistency_detects_long_walk() {
        let stops = vec![stop(1, &[(1, 600.0)])];
        let assignments = stops[0].assignments().to_vec();
        let result = PlacementResult {
            stats: PlacementStats::compute(&stops, &assignments, &[]),
            placed_stops: stops,
            assignments,
            unassigned: vec![],
            status: RunStatus::Complete,
        };
        assert!(!result.is_consistent(&PlacementParams::default()));
    }
}
