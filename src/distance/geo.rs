//! Great-circle and flat-earth distances between coordinates.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::models::Coordinate;

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Distance returned when either endpoint is invalid.
///
/// Larger than any real route distance, so minimizing callers avoid it
/// without special-casing.
pub const INVALID_DISTANCE: f64 = f64::INFINITY;

const KM_PER_DEGREE_LAT: f64 = 111.132;
const KM_PER_DEGREE_LON_AT_EQUATOR: f64 = 111.320;

/// Haversine great-circle distance in kilometers.
///
/// Returns [`INVALID_DISTANCE`] if either coordinate is out of range.
///
/// # Examples
///
/// ```
/// use savings_routing::distance::haversine_distance;
/// use savings_routing::models::Coordinate;
///
/// let a = Coordinate::new(0.0, 0.0);
/// let b = Coordinate::new(0.0, 1.0);
/// assert!((haversine_distance(a, b) - 111.195).abs() < 0.01);
/// assert_eq!(haversine_distance(a, a), 0.0);
/// ```
pub fn haversine_distance(from: Coordinate, to: Coordinate) -> f64 {
    if !from.is_valid() || !to.is_valid() {
        warn!(%from, %to, "invalid coordinates for distance calculation");
        return INVALID_DISTANCE;
    }

    let lat1 = from.latitude().to_radians();
    let lat2 = to.latitude().to_radians();
    let d_lat = lat2 - lat1;
    let d_lon = (to.longitude() - from.longitude()).to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Equirectangular approximation in kilometers.
///
/// Cheaper than Haversine and accurate enough inside a city, but the error
/// grows with distance and latitude spread. Returns [`INVALID_DISTANCE`] if
/// either coordinate is out of range.
pub fn equirectangular_distance(from: Coordinate, to: Coordinate) -> f64 {
    if !from.is_valid() || !to.is_valid() {
        warn!(%from, %to, "invalid coordinates for distance calculation");
        return INVALID_DISTANCE;
    }

    let mean_lat = ((from.latitude() + to.latitude()) / 2.0).to_radians();
    let dx = (from.longitude() - to.longitude()) * KM_PER_DEGREE_LON_AT_EQUATOR * mean_lat.cos();
    let dy = (from.latitude() - to.latitude()) * KM_PER_DEGREE_LAT;

    (dx * dx + dy * dy).sqrt()
}

/// Which distance formula the solver uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DistanceMetric {
    #[default]
    Haversine,
    Equirectangular,
}

impl DistanceMetric {
    /// Distance in kilometers between two coordinates under this metric.
    pub fn distance(self, from: Coordinate, to: Coordinate) -> f64 {
        match self {
            Self::Haversine => haversine_distance(from, to),
            Self::Equirectangular => equirectangular_distance(from, to),
        }
    }
}
