//! Coordinate enrichment for students with missing locations.

use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use super::{CircuitBreaker, CoordinateResolver, RetryPolicy};
use crate::deadline::Deadline;
use crate::error::CollaboratorError;
use crate::models::Student;

/// Outcome of [`enrich_students`].
#[derive(Debug, Clone, Serialize)]
pub struct EnrichmentResult {
    /// Copy of the input with resolved coordinates filled in.
    pub students: Vec<Student>,
    /// Students that received a coordinate.
    pub resolved: usize,
    /// Students the resolver could not locate.
    pub not_found: usize,
    /// Students whose lookup failed after all retries.
    pub failed: usize,
    /// Students not looked up because the resolver kept failing.
    pub skipped: usize,
}

/// Resolves coordinates for active students that lack a usable location but
/// carry an address.
///
/// The input is never modified. Lookups that fail or return an invalid
/// coordinate leave the student without a location, so stop placement later
/// reports it as `NO_COORDINATES`. After `policy.failure_threshold`
/// failed lookups in a row the resolver is not called again.
///
/// # Examples
///
/// ```
/// use u_schoolbus::collaborator::{enrich_students, GeometricFallback, RetryPolicy};
/// use u_schoolbus::models::Student;
///
/// let students = vec![
///     Student::new(1, 37.5, 127.0),
///     Student::without_location(2).with_address("12 Elm St"),
/// ];
/// let result = enrich_students(&students, &GeometricFallback, &RetryPolicy::none());
/// assert_eq!(result.resolved, 0);
/// assert_eq!(result.not_found, 1);
/// assert_eq!(result.students, students);
/// ```
#[instrument(skip_all, fields(resolver = resolver.name(), students = students.len()))]
pub fn enrich_students(
    students: &[Student],
    resolver: &dyn CoordinateResolver,
    policy: &RetryPolicy,
) -> EnrichmentResult {
    let mut out = students.to_vec();
    let mut resolved = 0;
    let mut not_found = 0;
    let mut failed = 0;
    let mut skipped = 0;
    let mut breaker = CircuitBreaker::new(policy.failure_threshold);
    let deadline = Deadline::unbounded();

    for student in out.iter_mut() {
        if !student.active || student.usable_location().is_some() {
            continue;
        }
        let Some(address) = student.address.as_deref().filter(|a| !a.trim().is_empty()) else {
            continue;
        };

        match breaker.call(policy, &deadline, "resolve_coordinates", || {
            resolver.resolve_coordinates(address)
        }) {
            Ok(Some(location)) if location.is_valid() => {
                student.location = Some(location);
                resolved += 1;
            }
            Ok(Some(location)) => {
                debug!(student_id = student.id, ?location, "resolver returned an invalid coordinate");
                not_found += 1;
            }
            Ok(None) => not_found += 1,
            Err(CollaboratorError::CircuitOpen) => skipped += 1,
            Err(err) => {
                warn!(student_id = student.id, %err, "coordinate lookup failed, leaving student unlocated");
                failed += 1;
            }
        }
    }

    info!(resolved, not_found, failed, skipped, "coordinate enrichment finished");

    EnrichmentResult {
        students: out,
        resolved,
        not_found,
        failed,
        skipped,
    }
}
