//! Geographic coordinate type.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// Construction never fails: a coordinate read from storage may be out of
/// range, and the routing core decides what to do with it. Use
/// [`Coordinate::checked`] when the caller wants rejection up front.
///
/// # Examples
///
/// ```
/// use savings_routing::models::Coordinate;
///
/// let jakarta = Coordinate::new(-6.2088, 106.8456);
/// assert!(jakarta.is_valid());
///
/// assert!(Coordinate::checked(91.0, 0.0).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Creates a coordinate without range checking.
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Creates a coordinate, returning `None` if it is out of range or not finite.
    pub fn checked(latitude: f64, longitude: f64) -> Option<Self> {
        let c = Self::new(latitude, longitude);
        c.is_valid().then_some(c)
    }

    /// Latitude in degrees.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Returns `true` if latitude ∈ [-90, 90] and longitude ∈ [-180, 180].
    ///
    /// NaN fails both range comparisons and is therefore invalid.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.latitude, self.longitude)
    }
}
