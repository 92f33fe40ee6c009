//! Great-circle geometry and distance matrices.
//!
//! Every distance in this crate is a haversine distance in meters.

mod haversine;
mod matrix;

pub use haversine::{
    haversine_meters, initial_bearing, offset_meters, EARTH_RADIUS_METERS, METERS_PER_DEGREE_LAT,
};
pub use matrix::DistanceMatrix;
