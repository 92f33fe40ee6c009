//! Optimizer parameters, defaults, and validation.
//!
//! Defaults mirror production values: 500 m walking radius, 25 students per
//! stop, 40 seats per bus, no stop limit, virtual-node splitting enabled.

use serde::{Deserialize, Serialize};

use crate::error::OptimizeError;
use crate::models::Depot;

/// Default maximum walking distance in meters.
pub const DEFAULT_WALK_RADIUS_METERS: f64 = 500.0;
/// Default maximum students per stop.
pub const DEFAULT_STOP_CAPACITY: usize = 25;
/// Default seats per vehicle.
pub const DEFAULT_VEHICLE_CAPACITY: i32 = 40;
/// Default improvement pass budget per route.
pub const DEFAULT_MAX_IMPROVEMENT_PASSES: usize = 50;

/// Upper bound accepted for the walking radius.
pub const MAX_WALK_RADIUS_METERS: f64 = 10_000.0;
/// Upper bound accepted for stop capacity.
pub const MAX_STOP_CAPACITY: usize = 1_000;
/// Upper bound accepted for vehicle capacity.
pub const MAX_VEHICLE_CAPACITY: i32 = 1_000;

/// Stop placement parameters.
///
/// # Examples
///
/// ```
/// use u_schoolbus::config::PlacementParams;
///
/// let params = PlacementParams::default()
///     .with_walk_radius(400.0)
///     .with_max_stops(10);
/// assert_eq!(params.stop_capacity, 25);
/// assert!(params.validate().is_ok());
/// assert!(PlacementParams::default().with_walk_radius(0.0).validate().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementParams {
    /// Maximum walk from home to stop (`R_walk`).
    pub walk_radius_meters: f64,
    /// Maximum students one stop may serve (`S_max`).
    pub stop_capacity: usize,
    /// Hard cap on stops created.
    pub max_stops: Option<usize>,
    /// Time budget; exceeded runs return a partial result.
    pub time_limit_ms: Option<u64>,
}

impl Default for PlacementParams {
    fn default() -> Self {
        Self {
            walk_radius_meters: DEFAULT_WALK_RADIUS_METERS,
            stop_capacity: DEFAULT_STOP_CAPACITY,
            max_stops: None,
            time_limit_ms: None,
        }
    }
}

impl PlacementParams {
    /// Sets the walking radius.
    pub fn with_walk_radius(mut self, meters: f64) -> Self {
        self.walk_radius_meters = meters;
        self
    }

    /// Sets the stop capacity.
    pub fn with_stop_capacity(mut self, capacity: usize) -> Self {
        self.stop_capacity = capacity;
        self
    }

    /// Caps the number of stops.
    pub fn with_max_stops(mut self, max: usize) -> Self {
        self.max_stops = Some(max);
        self
    }

    /// Sets the time budget.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Checks every parameter against its accepted range.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        let r = self.walk_radius_meters;
        if !r.is_finite() || r <= 0.0 || r > MAX_WALK_RADIUS_METERS {
            return Err(OptimizeError::out_of_range(
                "walk_radius_meters",
                r,
                "0 < walk_radius_meters <= 10000",
            ));
        }
        if self.stop_capacity == 0 || self.stop_capacity > MAX_STOP_CAPACITY {
            return Err(OptimizeError::out_of_range(
                "stop_capacity",
                self.stop_capacity,
                "1 <= stop_capacity <= 1000",
            ));
        }
        if self.max_stops == Some(0) {
            return Err(OptimizeError::out_of_range(
                "max_stops",
                0,
                "max_stops >= 1 when set",
            ));
        }
        Ok(())
    }
}

/// Route construction parameters.
///
/// # Examples
///
/// ```
/// use u_schoolbus::config::RoutingParams;
/// use u_schoolbus::models::{Coordinate, Depot};
///
/// let depot = Depot::new(0, Coordinate::new(37.5, 127.0));
/// let params = RoutingParams::new(depot).with_vehicle_capacity(45);
/// assert!(params.split_virtual_nodes);
/// assert!(params.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingParams {
    /// Start and end of every route.
    pub depot: Depot,
    /// Seats per vehicle.
    #[serde(default = "default_vehicle_capacity")]
    pub vehicle_capacity: i32,
    /// Split over-capacity stops into virtual nodes instead of rejecting them.
    #[serde(default = "default_true")]
    pub split_virtual_nodes: bool,
    /// Run the intra-route improvement pass.
    #[serde(default = "default_true")]
    pub improve: bool,
    /// Improvement pass budget per route.
    #[serde(default = "default_max_improvement_passes")]
    pub max_improvement_passes: usize,
    /// Time budget; exceeded runs return a partial result.
    #[serde(default)]
    pub time_limit_ms: Option<u64>,
}

fn default_vehicle_capacity() -> i32 {
    DEFAULT_VEHICLE_CAPACITY
}

fn default_true() -> bool {
    true
}

fn default_max_improvement_passes() -> usize {
    DEFAULT_MAX_IMPROVEMENT_PASSES
}

impl RoutingParams {
    /// Creates routing parameters with production defaults.
    pub fn new(depot: Depot) -> Self {
        Self {
            depot,
            vehicle_capacity: DEFAULT_VEHICLE_CAPACITY,
            split_virtual_nodes: true,
            improve: true,
            max_improvement_passes: DEFAULT_MAX_IMPROVEMENT_PASSES,
            time_limit_ms: None,
        }
    }

    /// Sets vehicle capacity.
    pub fn with_vehicle_capacity(mut self, capacity: i32) -> Self {
        self.vehicle_capacity = capacity;
        self
    }

    /// Enables or disables virtual-node splitting.
    pub fn with_split_virtual_nodes(mut self, split: bool) -> Self {
        self.split_virtual_nodes = split;
        self
    }

    /// Enables or disables the improvement pass.
    pub fn with_improvement(mut self, improve: bool) -> Self {
        self.improve = improve;
        self
    }

    /// Sets the improvement pass budget.
    pub fn with_max_improvement_passes(mut self, passes: usize) -> Self {
        self.max_improvement_passes = passes;
        self
    }

    /// Sets the time budget.
    pub fn with_time_limit_ms(mut self, ms: u64) -> Self {
        self.time_limit_ms = Some(ms);
        self
    }

    /// Checks every parameter against its accepted range.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        if self.vehicle_capacity < 1 || self.vehicle_capacity > MAX_VEHICLE_CAPACITY {
            return Err(OptimizeError::out_of_range(
                "vehicle_capacity",
                self.vehicle_capacity,
                "1 <= vehicle_capacity <= 1000",
            ));
        }
        let loc = self.depot.location;
        if !loc.is_valid() {
            return Err(OptimizeError::out_of_range(
                "depot",
                format!("({}, {})", loc.lat, loc.lng),
                "a finite coordinate within ±90/±180",
            ));
        }
        Ok(())
    }
}

/// Parameters for a full pipeline run, loadable from JSON.
///
/// # Examples
///
/// ```
/// use u_schoolbus::config::OptimizerConfig;
///
/// let config = OptimizerConfig::from_json(r#"{
///     "placement": { "walk_radius_meters": 400.0 },
///     "routing": { "depot": { "id": 1, "location": { "lat": 37.5, "lng": 127.0 } } }
/// }"#).unwrap();
/// assert_eq!(config.placement.walk_radius_meters, 400.0);
/// assert_eq!(config.placement.stop_capacity, 25);
/// assert_eq!(config.routing.vehicle_capacity, 40);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizerConfig {
    /// Tier 1 parameters.
    #[serde(default)]
    pub placement: PlacementParams,
    /// Tier 2 parameters.
    pub routing: RoutingParams,
}

impl OptimizerConfig {
    /// Parses and validates a JSON configuration document.
    pub fn from_json(json: &str) -> Result<Self, OptimizeError> {
        let config: OptimizerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates both parameter sets.
    pub fn validate(&self) -> Result<(), OptimizeError> {
        self.placement.validate()?;
        self.routing.validate()
    }
}
