//! External collaborator boundary.
//!
//! Geocoding and road snapping live outside the core. The optimizer sees
//! them only through the traits below and never lets their failure abort a
//! run: calls are retried with bounded backoff, then the core falls back to
//! plain great-circle geometry.
//!
//! - [`CoordinateResolver`] — address → coordinate
//! - [`RoadSnapper`] — stop coordinate → nearest curbside coordinate
//! - [`GeometricFallback`] — no-op implementation of both
//! - [`CircuitBreaker`] — abandons a collaborator after repeated failures
//! - [`enrich_students`] — fills in missing student coordinates

mod breaker;
mod enrich;
mod retry;

pub use breaker::CircuitBreaker;
pub use enrich::{enrich_students, EnrichmentResult};
pub use retry::{with_retry, RetryPolicy, DEFAULT_FAILURE_THRESHOLD};

use crate::error::CollaboratorError;
use crate::models::Coordinate;

/// Resolves free-text addresses to coordinates.
pub trait CoordinateResolver: Send + Sync {
    /// Returns `Ok(None)` when the address cannot be located.
    fn resolve_coordinates(&self, address: &str) -> Result<Option<Coordinate>, CollaboratorError>;

    /// Implementation name, for logs.
    fn name(&self) -> &'static str;
}

/// Moves a candidate stop onto the road network.
pub trait RoadSnapper: Send + Sync {
    /// Returns the snapped coordinate for `location`.
    fn snap_to_road(&self, location: Coordinate) -> Result<Coordinate, CollaboratorError>;

    /// Implementation name, for logs.
    fn name(&self) -> &'static str;
}

/// Pure-geometry stand-in: resolves nothing, snaps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct GeometricFallback;

impl CoordinateResolver for GeometricFallback {
    fn resolve_coordinates(&self, _address: &str) -> Result<Option<Coordinate>, CollaboratorError> {
        Ok(None)
    }

    fn name(&self) -> &'static str {
        "geometric"
    }
}

impl RoadSnapper for GeometricFallback {
    fn snap_to_road(&self, location: Coordinate) -> Result<Coordinate, CollaboratorError> {
        Ok(location)
    }

    fn name(&self) -> &'static str {
        "geometric"
    }
}

/// The collaborators a pipeline run talks to.
#[derive(Clone)]
pub struct Collaborators<'a> {
    /// Fills in missing student coordinates.
    pub resolver: &'a dyn CoordinateResolver,
    /// Moves placed stops onto the road network.
    pub snapper: &'a dyn RoadSnapper,
    /// Retry and failure-threshold settings for both.
    pub retry: RetryPolicy,
}

impl Collaborators<'static> {
    /// Pure geometry: no lookups, no snapping, no retries.
    pub fn geometric() -> Self {
        Self {
            resolver: &GeometricFallback,
            snapper: &GeometricFallback,
            retry: RetryPolicy::none(),
        }
    }
}

impl Default for Collaborators<'static> {
    fn default() -> Self {
        Self::geometric()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_snap_is_identity() {
        let c = Coordinate::new(37.5, 127.0);
        assert_eq!(GeometricFallback.snap_to_road(c), Ok(c));
    }

    #[test]
    fn test_fallback_resolves_nothing() {
        assert_eq!(GeometricFallback.resolve_coordinates("1 Main St"), Ok(None));
    }
}
