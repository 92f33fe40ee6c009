//! Route materialization and capacity checking.

mod evaluator;

pub use evaluator::{CapacityViolation, RouteEvaluator};
