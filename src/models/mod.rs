//! Domain model types for stop placement and bus routing.
//!
//! Students and the depot are read-only inputs. Placed stops, assignments,
//! virtual nodes, and routes are created fresh by every run.

mod coordinate;
mod outcome;
mod route;
mod stop;
mod student;

pub use coordinate::Coordinate;
pub use outcome::{
    RunStatus, UnassignedReason, UnassignedStudent, UnroutedReason, UnroutedStop,
};
pub use route::{Depot, Route, RouteStop, VirtualNode};
pub use stop::{PlacedStop, StopDemand, StudentAssignment};
pub use student::Student;
