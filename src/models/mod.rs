//! Domain model types for the capacitated routing problem.
//!
//! Provides the inputs (a depot, customers with demands, a fleet of
//! capacity-limited vehicles) and the outputs (vehicle-assigned routes
//! collected into a solution).

mod coordinate;
mod customer;
mod route;
mod solution;
mod vehicle;

pub use coordinate::Coordinate;
pub use customer::{Customer, Depot};
pub use route::RouteDetail;
pub use solution::{SolveOutcome, VrpSolution};
pub use vehicle::Vehicle;

pub(crate) use vehicle::max_capacity;

/// Demand and capacity below zero or not finite count as zero.
pub(crate) fn clamp_quantity(value: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        0.0
    }
}

fn deserialize_quantity<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    f64::deserialize(deserializer).map(clamp_quantity)
}
