//! Full optimization run: stop placement followed by routing.

use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::collaborator::{enrich_students, Collaborators};
use crate::config::{OptimizerConfig, PlacementParams, RoutingParams};
use crate::error::OptimizeError;
use crate::models::{RunStatus, Student};
use crate::placement::{place_stops_with, PlacementResult};
use crate::routing::{route_stops, RoutingResult};

/// Combined figures of a pipeline run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PipelineSummary {
    /// Stops placed by Tier 1.
    pub total_stops: usize,
    /// Students assigned to a stop.
    pub total_students: usize,
    /// Routes built by Tier 2.
    pub total_routes: usize,
    /// Mean students per stop (0 when no stops).
    pub average_students_per_stop: f64,
    /// Mean nodes per route (0 when no routes).
    pub average_stops_per_route: f64,
    /// Students without a stop.
    pub unassigned_students: usize,
    /// Assigned students on no route.
    pub unrouted_students: i32,
    /// Sum of route lengths.
    pub total_distance_meters: f64,
    /// Students whose coordinates came from the resolver.
    #[serde(default)]
    pub resolved_students: usize,
}

impl PipelineSummary {
    fn from_tiers(tier1: &PlacementResult, tier2: &RoutingResult, resolved: usize) -> Self {
        Self {
            total_stops: tier1.stats.total_stops,
            total_students: tier1.stats.assigned_students,
            total_routes: tier2.stats.total_routes,
            average_students_per_stop: tier1.stats.average_students_per_stop,
            average_stops_per_route: tier2.stats.average_stops_per_route,
            unassigned_students: tier1.stats.unassigned_students,
            unrouted_students: tier2.stats.unrouted_students,
            total_distance_meters: tier2.stats.total_distance_meters,
            resolved_students: resolved,
        }
    }
}

/// Output of [`run_full_pipeline`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    /// Stop placement output.
    pub tier1: PlacementResult,
    /// Routing output over the placed stops.
    pub tier2: RoutingResult,
    /// Combined figures.
    pub summary: PipelineSummary,
    /// `PartialResult` if either tier ran out of time.
    pub status: RunStatus,
}

/// Places stops for `students`, then routes them.
///
/// Both parameter sets are validated before any work starts, so a bad
/// routing configuration never costs a placement run. Tier 2 only ever
/// sees the stops of a successful Tier 1.
///
/// # Errors
///
/// [`OptimizeError::ParameterOutOfRange`] from either parameter set.
///
/// # Examples
///
/// ```
/// use u_schoolbus::config::{PlacementParams, RoutingParams};
/// use u_schoolbus::models::{Coordinate, Depot, Student};
/// use u_schoolbus::pipeline::run_full_pipeline;
///
/// let students = vec![
///     Student::new(1, 37.5100, 127.0000),
///     Student::new(2, 37.5102, 127.0001),
///     Student::new(3, 37.5300, 127.0000),
/// ];
/// let depot = Depot::new(0, Coordinate::new(37.50, 127.00));
///
/// let run = run_full_pipeline(&students, &PlacementParams::default(), &RoutingParams::new(depot))
///     .unwrap();
/// assert_eq!(run.summary.total_stops, 2);
/// assert_eq!(run.summary.total_students, 3);
/// assert_eq!(run.summary.total_routes, 1);
/// ```
pub fn run_full_pipeline(
    students: &[Student],
    placement: &PlacementParams,
    routing: &RoutingParams,
) -> Result<PipelineResult, OptimizeError> {
    run_full_pipeline_with(students, placement, routing, &Collaborators::geometric())
}

/// Like [`run_full_pipeline`], but talks to external collaborators.
///
/// Students missing a usable location are first looked up through
/// `collaborators.resolver`; placed stops are then snapped through
/// `collaborators.snapper`. Collaborator failures never fail the run.
///
/// # Errors
///
/// Same as [`run_full_pipeline`]. Parameters are validated before the
/// resolver is called.
///
/// # Examples
///
/// ```
/// use u_schoolbus::collaborator::{
///     Collaborators, CoordinateResolver, GeometricFallback, RetryPolicy,
/// };
/// use u_schoolbus::config::{PlacementParams, RoutingParams};
/// use u_schoolbus::error::CollaboratorError;
/// use u_schoolbus::models::{Coordinate, Depot, Student};
/// use u_schoolbus::pipeline::run_full_pipeline_with;
///
/// struct TownHall;
///
/// impl CoordinateResolver for TownHall {
///     fn resolve_coordinates(&self, _: &str) -> Result<Option<Coordinate>, CollaboratorError> {
///         Ok(Some(Coordinate::new(37.5100, 127.0000)))
///     }
///
///     fn name(&self) -> &'static str {
///         "town-hall"
///     }
/// }
///
/// let students = vec![
///     Student::new(1, 37.5100, 127.0000),
///     Student::without_location(2).with_address("1 Main St"),
/// ];
/// let collaborators = Collaborators {
///     resolver: &TownHall,
///     snapper: &GeometricFallback,
///     retry: RetryPolicy::none(),
/// };
/// let depot = Depot::new(0, Coordinate::new(37.50, 127.00));
///
/// let run = run_full_pipeline_with(
///     &students,
///     &PlacementParams::default(),
///     &RoutingParams::new(depot),
///     &collaborators,
/// )
/// .unwrap();
/// assert_eq!(run.summary.resolved_students, 1);
/// assert_eq!(run.summary.total_students, 2);
/// ```
#[instrument(
    skip_all,
    fields(
        students = students.len(),
        resolver = collaborators.resolver.name(),
        snapper = collaborators.snapper.name(),
    )
)]
pub fn run_full_pipeline_with(
    students: &[Student],
    placement: &PlacementParams,
    routing: &RoutingParams,
    collaborators: &Collaborators<'_>,
) -> Result<PipelineResult, OptimizeError> {
    placement.validate()?;
    routing.validate()?;

    let enriched = enrich_students(students, collaborators.resolver, &collaborators.retry);
    let tier1 = place_stops_with(
        &enriched.students,
        placement,
        collaborators.snapper,
        &collaborators.retry,
    )?;
    let tier2 = route_stops(&tier1.placed_stops, routing)?;

    let summary = PipelineSummary::from_tiers(&tier1, &tier2, enriched.resolved);
    let status = tier1.status.merge(tier2.status);
    info!(
        stops = summary.total_stops,
        students = summary.total_students,
        routes = summary.total_routes,
        resolved = summary.resolved_students,
        status = status.code(),
        "pipeline finished"
    );

    Ok(PipelineResult {
        tier1,
        tier2,
        summary,
        status,
    })
}

/// Runs the pipeline with both parameter sets taken from `config`.
///
/// # Errors
///
/// Same as [`run_full_pipeline`].
pub fn run_with_config(
    students: &[Student],
    config: &OptimizerConfig,
) -> Result<PipelineResult, OptimizeError> {
    run_full_pipeline(students, &config.placement, &config.routing)
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::collaborator::{CoordinateResolver, RetryPolicy, RoadSnapper};
    use crate::distance::{haversine_meters, offset_meters};
    use crate::error::CollaboratorError;
    use crate::models::{Coordinate, Depot};

    fn depot() -> Depot {
        Depot::new(0, Coordinate::new(37.5, 127.0))
    }

    fn cluster(first_id: usize, count: usize, north: f64) -> Vec<Student> {
        let center = offset_meters(&depot().location, north, 0.0);
        (0..count)
            .map(|k| {
                let loc = offset_meters(&center, (k % 5) as f64 * 20.0, (k / 5) as f64 * 20.0);
                Student::at(first_id + k, loc)
            })
            .collect()
    }

    #[test]
    fn test_pipeline_summary() {
        let mut students = cluster(1, 30, 1_000.0);
        students.extend(cluster(100, 10, -3_000.0));
        students.push(Student::without_location(500));

        let routing = RoutingParams::new(depot());
        let run = run_full_pipeline(&students, &PlacementParams::default(), &routing).unwrap();

        assert_eq!(run.summary.total_students, 40);
        assert_eq!(run.summary.unassigned_students, 1);
        assert_eq!(run.summary.total_stops, run.tier1.placed_stops.len());
        assert_eq!(run.tier2.stats.total_students_routed, 40);
        assert_eq!(run.summary.unrouted_students, 0);
        assert_eq!(run.status, RunStatus::Complete);
        assert!(run.tier1.is_consistent(&PlacementParams::default()));
        assert!(run.tier2.is_consistent(routing.vehicle_capacity));
    }

    #[test]
    fn test_pipeline_every_stop_routed() {
        let students = cluster(1, 30, 800.0);
        let run = run_full_pipeline(
            &students,
            &PlacementParams::default(),
            &RoutingParams::new(depot()).with_vehicle_capacity(10),
        )
        .unwrap();

        let routed = run.tier2.routed_demand_by_stop();
        for stop in &run.tier1.placed_stops {
            assert_eq!(routed.get(&stop.id()), Some(&stop.demand()));
        }
    }

    #[test]
    fn test_pipeline_rejects_placement_params() {
        let err = run_full_pipeline(
            &cluster(1, 3, 0.0),
            &PlacementParams::default().with_walk_radius(-1.0),
            &RoutingParams::new(depot()),
        )
        .unwrap_err();
        assert_eq!(err.code(), "PARAMETER_OUT_OF_RANGE");
    }

    #[test]
    fn test_pipeline_rejects_routing_params() {
        let err = run_full_pipeline(
            &cluster(1, 3, 0.0),
            &PlacementParams::default(),
            &RoutingParams::new(depot()).with_vehicle_capacity(0),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            OptimizeError::ParameterOutOfRange {
                name: "vehicle_capacity",
                ..
            }
        ));
    }

    #[test]
    fn test_pipeline_partial_when_placement_expires() {
        let run = run_full_pipeline(
            &cluster(1, 5, 500.0),
            &PlacementParams::default().with_time_limit_ms(0),
            &RoutingParams::new(depot()),
        )
        .unwrap();
        assert_eq!(run.status, RunStatus::PartialResult);
        assert_eq!(run.summary.total_stops, 0);
        assert_eq!(run.summary.total_routes, 0);
    }

    #[test]
    fn test_run_with_config() {
        let config = OptimizerConfig::from_json(
            r#"{
                "placement": { "walk_radius_meters": 300.0, "stop_capacity": 10 },
                "routing": {
                    "depot": { "id": 9, "location": { "lat": 37.5, "lng": 127.0 } },
                    "vehicle_capacity": 20
                }
            }"#,
        )
        .unwrap();
        let run = run_with_config(&cluster(1, 25, 600.0), &config).unwrap();

        assert!(run.tier1.placed_stops.iter().all(|s| s.demand() <= 10));
        assert!(run.tier2.routes.iter().all(|r| r.total_demand() <= 20));
        assert!(run.tier2.routes.iter().all(|r| r.depot_id() == 9));
        assert_eq!(run.summary.total_students, 25);
    }

    /// Places every address at the same point.
    struct OneAddress(Coordinate);

    impl CoordinateResolver for OneAddress {
        fn resolve_coordinates(
            &self,
            _address: &str,
        ) -> Result<Option<Coordinate>, CollaboratorError> {
            Ok(Some(self.0))
        }

        fn name(&self) -> &'static str {
            "one-address"
        }
    }

    /// Moves every stop 10 m north and counts calls.
    struct NorthSnapper(AtomicUsize);

    impl RoadSnapper for NorthSnapper {
        fn snap_to_road(&self, location: Coordinate) -> Result<Coordinate, CollaboratorError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(offset_meters(&location, 10.0, 0.0))
        }

        fn name(&self) -> &'static str {
            "north"
        }
    }

    #[test]
    fn test_pipeline_uses_collaborators() {
        let home = offset_meters(&depot().location, 900.0, 0.0);
        let students = vec![
            Student::at(1, home),
            Student::without_location(2).with_address("next door"),
            Student::without_location(3),
        ];
        let snapper = NorthSnapper(AtomicUsize::new(0));
        let collaborators = Collaborators {
            resolver: &OneAddress(home),
            snapper: &snapper,
            retry: RetryPolicy::none(),
        };

        let run = run_full_pipeline_with(
            &students,
            &PlacementParams::default(),
            &RoutingParams::new(depot()),
            &collaborators,
        )
        .unwrap();

        assert_eq!(run.summary.resolved_students, 1);
        assert_eq!(run.summary.total_students, 2);
        assert_eq!(run.summary.unassigned_students, 1);
        assert_eq!(run.tier1.stats.snapped_stops, 1);
        assert_eq!(snapper.0.load(Ordering::SeqCst), 1);

        let stop = &run.tier1.placed_stops[0];
        assert_eq!(stop.student_ids(), vec![1, 2]);
        assert!((haversine_meters(&home, &stop.location()) - 10.0).abs() < 0.1);
        assert_eq!(run.tier2.stats.total_students_routed, 2);
    }

    #[test]
    fn test_pipeline_with_rejects_params_before_lookup() {
        let resolver = OneAddress(depot().location);
        let snapper = NorthSnapper(AtomicUsize::new(0));
        let collaborators = Collaborators {
            resolver: &resolver,
            snapper: &snapper,
            retry: RetryPolicy::none(),
        };
        let err = run_full_pipeline_with(
            &[Student::without_location(1).with_address("anywhere")],
            &PlacementParams::default(),
            &RoutingParams::new(depot()).with_vehicle_capacity(0),
            &collaborators,
        )
        .unwrap_err();
        assert_eq!(err.code(), "PARAMETER_OUT_OF_RANGE");
        assert_eq!(snapper.0.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_geometric_pipeline_matches_plain() {
        let students = cluster(1, 12, 700.0);
        let placement = PlacementParams::default();
        let routing = RoutingParams::new(depot());
        let plain = run_full_pipeline(&students, &placement, &routing).unwrap();
        let geometric = Collaborators::default();
        let with = run_full_pipeline_with(&students, &placement, &routing, &geometric).unwrap();
        assert_eq!(plain, with);
        assert_eq!(plain.summary.resolved_students, 0);
    }
}
