//! Dense distance matrix over the depot and its customers.

use super::DistanceMetric;
use crate::models::{Coordinate, Customer};

/// A dense n×n distance matrix stored in row-major order.
///
/// Index 0 is the depot; index `k + 1` is the `k`-th customer of the slice
/// the matrix was built from.
///
/// # Examples
///
/// ```
/// use savings_routing::distance::{DistanceMatrix, DistanceMetric};
/// use savings_routing::models::{Coordinate, Customer};
///
/// let customers = vec![
///     Customer::new(1, "A", Coordinate::new(0.0, 1.0), 5.0),
///     Customer::new(2, "B", Coordinate::new(0.0, 2.0), 5.0),
/// ];
/// let dm = DistanceMatrix::from_locations(
///     Coordinate::new(0.0, 0.0),
///     &customers,
///     DistanceMetric::Haversine,
/// );
/// assert_eq!(dm.size(), 3);
/// assert!(dm.get(0, 2) > dm.get(0, 1));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Matrix index of the depot.
    pub const DEPOT: usize = 0;

    /// An all-zero matrix over `size` locations, to be filled with [`set`](Self::set).
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes all pairwise distances between the depot and the customers.
    ///
    /// Each pair is measured once and mirrored, so the result is symmetric.
    /// A customer with invalid coordinates gets [`INVALID_DISTANCE`] to
    /// every other location.
    ///
    /// [`INVALID_DISTANCE`]: super::INVALID_DISTANCE
    pub fn from_locations(
        depot: Coordinate,
        customers: &[Customer],
        metric: DistanceMetric,
    ) -> Self {
        let points: Vec<Coordinate> = std::iter::once(depot)
            .chain(customers.iter().map(Customer::location))
            .collect();
        let mut dm = Self::new(points.len());
        for (i, &from) in points.iter().enumerate() {
            for (j, &to) in points.iter().enumerate().skip(i + 1) {
                let d = metric.distance(from, to);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Distance in km from stop `from` to stop `to`.
    ///
    /// # Panics
    ///
    /// Panics if either stop is not below [`size`](Self::size).
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Overwrites the one-way distance from `from` to `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of stops, depot included.
    pub fn size(&self) -> usize {
        self.size
    }
}
