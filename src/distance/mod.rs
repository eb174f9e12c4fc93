//! Distances between geographic coordinates.
//!
//! Haversine great-circle distance (the default), an equirectangular
//! approximation, and a dense matrix over the depot and customers.

mod geo;
mod matrix;

pub use geo::{
    equirectangular_distance, haversine_distance, DistanceMetric, EARTH_RADIUS_KM,
    INVALID_DISTANCE,
};
pub use matrix::DistanceMatrix;
