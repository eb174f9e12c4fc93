//! Assigned route type.

use serde::{Deserialize, Serialize};

use super::{Coordinate, Customer, Depot, Vehicle};

/// An ordered sequence of customer stops served by one vehicle.
///
/// The depot is implicit at both ends and not stored in `stops`.
/// `total_distance` includes the depot legs.
///
/// # Examples
///
/// ```
/// use savings_routing::models::{Coordinate, Customer, Depot, RouteDetail, Vehicle};
///
/// let depot = Depot::new("HQ", Coordinate::new(0.0, 0.0));
/// let route = RouteDetail::new(
///     Vehicle::new(0, "Van", 20.0, "kg"),
///     vec![Customer::new(1, "A", Coordinate::new(0.0, 1.0), 5.0)],
///     222.4,
/// );
/// assert_eq!(route.len(), 1);
/// assert_eq!(route.total_demand(), 5.0);
/// assert_eq!(route.path(&depot).len(), 3);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteDetail {
    vehicle: Vehicle,
    stops: Vec<Customer>,
    total_distance: f64,
    total_demand: f64,
}

impl RouteDetail {
    /// Creates a route; total demand is summed from the stops.
    pub fn new(vehicle: Vehicle, stops: Vec<Customer>, total_distance: f64) -> Self {
        let total_demand = stops.iter().map(Customer::demand).sum();
        Self {
            vehicle,
            stops,
            total_distance,
            total_demand,
        }
    }

    /// Returns the vehicle assigned to this route.
    pub fn vehicle(&self) -> &Vehicle {
        &self.vehicle
    }

    /// Returns the stops in visit order.
    pub fn stops(&self) -> &[Customer] {
        &self.stops
    }

    /// Returns the number of customer stops (excluding depot).
    pub fn len(&self) -> usize {
        self.stops.len()
    }

    /// Returns `true` if this route has no stops.
    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    /// Returns the customer IDs in visit order.
    pub fn customer_ids(&self) -> Vec<usize> {
        self.stops.iter().map(Customer::id).collect()
    }

    /// Total distance including the legs from and back to the depot.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Total demand served by this route.
    pub fn total_demand(&self) -> f64 {
        self.total_demand
    }

    /// Polyline for map overlays: depot, every stop, depot.
    pub fn path(&self, depot: &Depot) -> Vec<Coordinate> {
        let mut path = Vec::with_capacity(self.stops.len() + 2);
        path.push(depot.location());
        path.extend(self.stops.iter().map(Customer::location));
        path.push(depot.location());
        path
    }
}
