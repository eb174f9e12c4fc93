//! Plan validation before solving.

use crate::error::PlanError;
use crate::models::{max_capacity, Customer, Vehicle};

/// Rejects plans that cannot be fully served.
///
/// Checks, in order: the fleet is not empty, there are customers, the total
/// demand fits the total fleet capacity, and no single customer outgrows the
/// largest vehicle. Passing does not guarantee every customer gets routed,
/// since segments are packed one per vehicle.
///
/// # Examples
///
/// ```
/// use savings_routing::error::PlanError;
/// use savings_routing::models::{Coordinate, Customer, Vehicle};
/// use savings_routing::solver::check_plan;
///
/// let customers = vec![Customer::new(1, "A", Coordinate::new(0.0, 1.0), 30.0)];
/// let vehicles = vec![Vehicle::new(1, "Van", 20.0, "kg")];
/// assert!(matches!(
///     check_plan(&customers, &vehicles),
///     Err(PlanError::DemandExceedsFleet { .. })
/// ));
/// ```
pub fn check_plan(customers: &[Customer], vehicles: &[Vehicle]) -> Result<(), PlanError> {
    if vehicles.is_empty() {
        return Err(PlanError::NoVehicles);
    }
    if customers.is_empty() {
        return Err(PlanError::NoCustomers);
    }

    let total_demand: f64 = customers.iter().map(Customer::demand).sum();
    let total_capacity: f64 = vehicles.iter().map(Vehicle::capacity).sum();
    if total_demand > total_capacity {
        return Err(PlanError::DemandExceedsFleet {
            total_demand,
            total_capacity,
        });
    }

    let ceiling = max_capacity(vehicles);
    if let Some(c) = customers.iter().find(|c| c.demand() > ceiling) {
        return Err(PlanError::CustomerTooLarge {
            customer_id: c.id(),
            name: c.name().to_string(),
            demand: c.demand(),
            max_capacity: ceiling,
        });
    }

    Ok(())
}
