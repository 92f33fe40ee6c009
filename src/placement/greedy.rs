//! Greedy maximum-coverage stop placement.
//!
//! # Algorithm
//!
//! 1. Every uncovered student's home is a candidate site; identical
//!    coordinates collapse into one site.
//! 2. Each site covers the uncovered students within the walking radius,
//!    nearest first, capped at the stop capacity.
//! 3. The site with the largest capped coverage wins; ties go to the shorter
//!    average walk, then the lexicographically lowest `(lat, lng)`.
//! 4. A stop is placed there and its students leave the pool.
//! 5. Repeat until the pool is empty, the stop limit is hit, or the time
//!    limit expires.
//!
//! A site always covers its own residents, so every round places a stop and
//! an isolated student gets a singleton stop at home.
//!
//! # Complexity
//!
//! O(n·k) to build neighbor lists (k = students per walking radius), then
//! O(s·n·k) over s rounds.
//!
//! # Reference
//!
//! Chvátal, V. (1979). "A Greedy Heuristic for the Set-Covering Problem",
//! *Mathematics of Operations Research* 4(3), 233-235.

use std::collections::HashSet;

use tracing::{debug, info, instrument, warn};

use crate::collaborator::{CircuitBreaker, GeometricFallback, RetryPolicy, RoadSnapper};
use crate::config::PlacementParams;
use crate::deadline::Deadline;
use crate::distance::haversine_meters;
use crate::error::{CollaboratorError, OptimizeError};
use crate::models::{
    Coordinate, PlacedStop, RunStatus, Student, UnassignedReason, UnassignedStudent,
};

use super::candidate::{build_sites, EligibleStudent, Score};
use super::result::{PlacementResult, PlacementStats};

/// Places stops for `students` using pure great-circle geometry.
///
/// # Errors
///
/// [`OptimizeError::ParameterOutOfRange`] if `params` fail validation; no
/// work is done in that case.
///
/// # Examples
///
/// ```
/// use u_schoolbus::config::PlacementParams;
/// use u_schoolbus::models::Student;
/// use u_schoolbus::placement::place_stops;
///
/// let students = vec![
///     Student::new(1, 37.5000, 127.0000),
///     Student::new(2, 37.5005, 127.0000),
///     Student::new(3, 37.5000, 127.0006),
///     Student::without_location(4),
/// ];
/// let result = place_stops(&students, &PlacementParams::default()).unwrap();
/// assert_eq!(result.placed_stops.len(), 1);
/// assert_eq!(result.assignments.len(), 3);
/// assert_eq!(result.unassigned[0].reason.code(), "NO_COORDINATES");
/// ```
pub fn place_stops(
    students: &[Student],
    params: &PlacementParams,
) -> Result<PlacementResult, OptimizeError> {
    place_stops_with(students, params, &GeometricFallback, &RetryPolicy::none())
}

/// Places stops, snapping each chosen location through `snapper`.
///
/// A snapped location is kept only if every student of the stop stays
/// within the walking radius; otherwise, and whenever the snapper fails
/// after `retry` is exhausted, the raw candidate location is used.
///
/// After `retry.failure_threshold` failed stops in a row the snapper is
/// not called again for the rest of the run, and retry backoff never
/// sleeps past the time limit.
#[instrument(
    skip_all,
    fields(
        students = students.len(),
        walk_radius = params.walk_radius_meters,
        stop_capacity = params.stop_capacity,
        snapper = snapper.name(),
    )
)]
pub fn place_stops_with(
    students: &[Student],
    params: &PlacementParams,
    snapper: &dyn RoadSnapper,
    retry: &RetryPolicy,
) -> Result<PlacementResult, OptimizeError> {
    params.validate()?;
    let deadline = Deadline::from_millis(params.time_limit_ms);
    let mut breaker = CircuitBreaker::new(retry.failure_threshold);

    let intake = Intake::from_students(students);
    let eligible = &intake.eligible;
    let mut unassigned = intake.unassigned;

    let radius = params.walk_radius_meters;
    let capacity = params.stop_capacity;
    let (sites, site_of) = build_sites(eligible, radius);
    debug!(
        eligible = eligible.len(),
        sites = sites.len(),
        "candidate sites built"
    );

    let mut covered = vec![false; eligible.len()];
    let mut uncovered_residents: Vec<usize> = sites.iter().map(|s| s.residents.len()).collect();
    let mut remaining = eligible.len();
    let mut stops: Vec<PlacedStop> = Vec::new();
    let mut snapped_stops = 0;
    let mut status = RunStatus::Complete;
    let mut leftover_reason = None;

    while remaining > 0 {
        if params.max_stops.is_some_and(|max| stops.len() >= max) {
            warn!(remaining, stops = stops.len(), "stop limit reached");
            leftover_reason = Some(UnassignedReason::StopLimitReached);
            break;
        }
        if deadline.is_expired() {
            warn!(remaining, elapsed = ?deadline.elapsed(), "time limit reached during placement");
            leftover_reason = Some(UnassignedReason::DeadlineExceeded);
            status = RunStatus::PartialResult;
            break;
        }

        let mut best: Option<Score> = None;
        for (idx, site) in sites.iter().enumerate() {
            if uncovered_residents[idx] == 0 {
                continue;
            }
            let score = site.score(idx, &covered, capacity);
            if best.as_ref().is_none_or(|b| score.beats(b)) {
                best = Some(score);
            }
        }
        let Some(best) = best else {
            // Unreachable while `remaining > 0`: an uncovered student keeps its site live.
            break;
        };

        let site = &sites[best.site];
        let members = site.coverage(&covered, capacity);
        for &(idx, _) in &members {
            covered[idx] = true;
            uncovered_residents[site_of[idx]] -= 1;
        }
        remaining -= members.len();

        let snapped = snap_location(
            site.location,
            &members,
            eligible,
            radius,
            Snapping {
                snapper,
                retry,
                breaker: &mut breaker,
                deadline: &deadline,
            },
        );
        let (location, mut walks) = match snapped {
            Some(snapped) => {
                snapped_stops += 1;
                snapped
            }
            None => (site.location, members),
        };
        walks.sort_by(|a, b| {
            a.1.total_cmp(&b.1)
                .then(eligible[a.0].id.cmp(&eligible[b.0].id))
        });

        let mut stop = PlacedStop::new(stops.len() + 1, location);
        for (idx, walk) in walks {
            stop.assign(eligible[idx].id, walk);
        }
        debug!(
            stop_id = stop.id(),
            demand = stop.demand(),
            average_walk = best.total_walk / best.count as f64,
            remaining,
            "stop placed"
        );
        stops.push(stop);
    }

    if let Some(reason) = leftover_reason {
        unassigned.extend(
            (0..eligible.len())
                .filter(|&idx| !covered[idx])
                .map(|idx| UnassignedStudent {
                    student_id: eligible[idx].id,
                    reason,
                }),
        );
    }
    unassigned.sort_by_key(|u| u.student_id);

    let assignments: Vec<_> = stops
        .iter()
        .flat_map(|s| s.assignments().iter().cloned())
        .collect();
    let stats = PlacementStats {
        inactive_skipped: intake.inactive_skipped,
        duplicates_skipped: intake.duplicates_skipped,
        snapped_stops,
        ..PlacementStats::compute(&stops, &assignments, &unassigned)
    };
    info!(
        stops = stats.total_stops,
        assigned = stats.assigned_students,
        unassigned = stats.unassigned_students,
        average_walk = stats.average_walk_meters,
        status = status.code(),
        "stop placement finished"
    );

    Ok(PlacementResult {
        placed_stops: stops,
        assignments,
        unassigned,
        stats,
        status,
    })
}

/// Eligibility screening: drops inactive students and repeated ids, and
/// reports students without usable coordinates.
struct Intake {
    eligible: Vec<EligibleStudent>,
    unassigned: Vec<UnassignedStudent>,
    inactive_skipped: usize,
    duplicates_skipped: usize,
}

impl Intake {
    fn from_students(students: &[Student]) -> Self {
        let mut ordered: Vec<&Student> = students.iter().collect();
        // Stable: among repeated ids the first input record wins.
        ordered.sort_by_key(|s| s.id);

        let mut seen = HashSet::new();
        let mut intake = Intake {
            eligible: Vec::new(),
            unassigned: Vec::new(),
            inactive_skipped: 0,
            duplicates_skipped: 0,
        };
        for student in ordered {
            if !seen.insert(student.id) {
                warn!(student_id = student.id, "duplicate student id ignored");
                intake.duplicates_skipped += 1;
                continue;
            }
            if !student.active {
                intake.inactive_skipped += 1;
                continue;
            }
            match student.usable_location() {
                Some(location) => intake.eligible.push(EligibleStudent {
                    id: student.id,
                    location,
                }),
                None => intake.unassigned.push(UnassignedStudent {
                    student_id: student.id,
                    reason: UnassignedReason::NoCoordinates,
                }),
            }
        }
        intake
    }
}

/// Returns the snapped location with recomputed walks, or `None` to keep
/// the candidate location.
/// Snapper state threaded through a placement run.
struct Snapping<'a> {
    snapper: &'a dyn RoadSnapper,
    retry: &'a RetryPolicy,
    breaker: &'a mut CircuitBreaker,
    deadline: &'a Deadline,
}

fn snap_location(
    candidate: Coordinate,
    members: &[(usize, f64)],
    eligible: &[EligibleStudent],
    radius: f64,
    snapping: Snapping<'_>,
) -> Option<(Coordinate, Vec<(usize, f64)>)> {
    let Snapping {
        snapper,
        retry,
        breaker,
        deadline,
    } = snapping;
    let snapped = match breaker.call(retry, deadline, "snap_to_road", || {
        snapper.snap_to_road(candidate)
    }) {
        Ok(snapped) => snapped,
        Err(CollaboratorError::CircuitOpen) => return None,
        Err(err) => {
            warn!(%err, snapper = snapper.name(), "road snapping failed, keeping candidate location");
            return None;
        }
    };
    if !snapped.is_valid() || snapped.same_point(&candidate) {
        return None;
    }

    let walks: Vec<(usize, f64)> = members
        .iter()
        .map(|&(idx, _)| (idx, haversine_meters(&snapped, &eligible[idx].location)))
        .collect();
    if walks.iter().any(|&(_, w)| w > radius) {
        debug!(?candidate, ?snapped, "snapped location exceeds walking radius, keeping candidate");
        return None;
    }
    Some((snapped, walks))
}
