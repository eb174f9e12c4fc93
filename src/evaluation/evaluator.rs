//! Route evaluator that computes load and distance and checks feasibility.

use std::collections::HashMap;

use crate::distance::DistanceMatrix;
use crate::local_search::route_distance;
use crate::models::{Customer, RouteDetail, Vehicle, VrpSolution};

/// Relative slack for load checks; summing demands in a different stop
/// order can drift by a few ulps.
const CAPACITY_TOLERANCE: f64 = 1e-9;

fn over_capacity(load: f64, capacity: f64) -> bool {
    load > capacity + CAPACITY_TOLERANCE * capacity.abs().max(1.0)
}

/// A type of constraint violation in a route or solution.
#[derive(Debug, Clone, PartialEq)]
pub enum ViolationType {
    /// Vehicle capacity exceeded.
    CapacityExceeded {
        /// Vehicle serving the route.
        vehicle_id: usize,
        /// Load that exceeded capacity.
        load: f64,
        /// Vehicle capacity.
        capacity: f64,
    },
    /// A stop index with no customer behind it.
    UnknownStop {
        stop: usize,
    },
    /// The same vehicle drives more than one route.
    VehicleReused {
        vehicle_id: usize,
    },
    /// A customer appears in no route and is not reported unassigned.
    CustomerMissing {
        customer_id: usize,
    },
    /// A customer appears more than once across routes and unassigned.
    CustomerDuplicated {
        customer_id: usize,
    },
}

/// A constraint violation in a solution.
#[derive(Debug, Clone, PartialEq)]
pub struct Violation {
    /// The type of violation.
    pub kind: ViolationType,
}

impl Violation {
    /// Creates a new violation.
    pub fn new(kind: ViolationType) -> Self {
        Self { kind }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ViolationType::CapacityExceeded {
                vehicle_id,
                load,
                capacity,
            } => write!(f, "vehicle {vehicle_id} loaded {load} over capacity {capacity}"),
            ViolationType::UnknownStop { stop } => write!(f, "unknown stop index {stop}"),
            ViolationType::VehicleReused { vehicle_id } => {
                write!(f, "vehicle {vehicle_id} used by more than one route")
            }
            ViolationType::CustomerMissing { customer_id } => {
                write!(f, "customer {customer_id} neither routed nor unassigned")
            }
            ViolationType::CustomerDuplicated { customer_id } => {
                write!(f, "customer {customer_id} placed more than once")
            }
        }
    }
}

/// Turns stop sequences into [`RouteDetail`]s and checks them.
///
/// Stops are matrix indices: index `k + 1` is `customers[k]`, index 0 the
/// depot.
///
/// # Examples
///
/// ```
/// use savings_routing::distance::{DistanceMatrix, DistanceMetric};
/// use savings_routing::evaluation::RouteEvaluator;
/// use savings_routing::models::{Coordinate, Customer, Vehicle};
///
/// let customers = vec![
///     Customer::new(1, "A", Coordinate::new(0.0, 1.0), 10.0),
///     Customer::new(2, "B", Coordinate::new(0.0, 2.0), 20.0),
/// ];
/// let dm = DistanceMatrix::from_locations(
///     Coordinate::new(0.0, 0.0),
///     &customers,
///     DistanceMetric::Haversine,
/// );
/// let vehicle = Vehicle::new(0, "Van", 100.0, "kg");
///
/// let evaluator = RouteEvaluator::new(&customers, &dm);
/// let (route, violations) = evaluator.build_route(&[1, 2], &vehicle);
/// assert_eq!(route.len(), 2);
/// assert_eq!(route.total_demand(), 30.0);
/// assert!(violations.is_empty());
/// ```
pub struct RouteEvaluator<'a> {
    customers: &'a [Customer],
    distances: &'a DistanceMatrix,
}

impl<'a> RouteEvaluator<'a> {
    /// Creates a new evaluator for the given problem data.
    pub fn new(customers: &'a [Customer], distances: &'a DistanceMatrix) -> Self {
        Self {
            customers,
            distances,
        }
    }

    /// Builds a route for `vehicle` from a stop sequence.
    ///
    /// Distance includes both depot legs. Returns the route and any
    /// violations found; unknown stops are left out of the route.
    pub fn build_route(&self, stops: &[usize], vehicle: &Vehicle) -> (RouteDetail, Vec<Violation>) {
        let mut violations = Vec::new();
        let mut known = Vec::with_capacity(stops.len());
        let mut customers = Vec::with_capacity(stops.len());

        for &stop in stops {
            match stop.checked_sub(1).and_then(|k| self.customers.get(k)) {
                Some(customer) => {
                    known.push(stop);
                    customers.push(customer.clone());
                }
                None => violations.push(Violation::new(ViolationType::UnknownStop { stop })),
            }
        }

        let total_distance = route_distance(&known, DistanceMatrix::DEPOT, self.distances);
        let route = RouteDetail::new(vehicle.clone(), customers, total_distance);

        if over_capacity(route.total_demand(), vehicle.capacity()) {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                vehicle_id: vehicle.id(),
                load: route.total_demand(),
                capacity: vehicle.capacity(),
            }));
        }

        (route, violations)
    }
}

/// Checks a finished solution against the customers it was built from.
///
/// Every customer must be routed or unassigned exactly once, no route may
/// exceed its vehicle's capacity, and no vehicle may be used twice.
pub fn check_solution(solution: &VrpSolution, customers: &[Customer]) -> Vec<Violation> {
    let mut violations = Vec::new();

    let mut vehicles_seen: HashMap<usize, usize> = HashMap::new();
    for route in solution.routes() {
        let vehicle = route.vehicle();
        *vehicles_seen.entry(vehicle.id()).or_default() += 1;
        if over_capacity(route.total_demand(), vehicle.capacity()) {
            violations.push(Violation::new(ViolationType::CapacityExceeded {
                vehicle_id: vehicle.id(),
                load: route.total_demand(),
                capacity: vehicle.capacity(),
            }));
        }
    }
    let mut reused: Vec<usize> = vehicles_seen
        .into_iter()
        .filter(|&(_, count)| count > 1)
        .map(|(id, _)| id)
        .collect();
    reused.sort_unstable();
    violations.extend(
        reused
            .into_iter()
            .map(|vehicle_id| Violation::new(ViolationType::VehicleReused { vehicle_id })),
    );

    let mut placed: HashMap<usize, usize> = HashMap::new();
    let routed = solution.routes().iter().flat_map(|r| r.stops());
    for customer in routed.chain(solution.unassigned()) {
        *placed.entry(customer.id()).or_default() += 1;
    }
    for customer in customers {
        match placed.get(&customer.id()).copied().unwrap_or(0) {
            0 => violations.push(Violation::new(ViolationType::CustomerMissing {
                customer_id: customer.id(),
            })),
            1 => {}
            _ => violations.push(Violation::new(ViolationType::CustomerDuplicated {
                customer_id: customer.id(),
            })),
        }
    }

    violations
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMetric;
    use crate::models::Coordinate;

    fn setup() -> (Vec<Customer>, DistanceMatrix, Vehicle) {
        let customers = vec![
            Customer::new(1, "A", Coordinate::new(0.0, 1.0), 10.0),
            Customer::new(2, "B", Coordinate::new(0.0, 2.0), 20.0),
            Customer::new(3, "C", Coordinate::new(1.0, 2.0), 15.0),
        ];
        let dm = DistanceMatrix::from_locations(
            Coordinate::new(0.0, 0.0),
            &customers,
            DistanceMetric::Haversine,
        );
        let vehicle = Vehicle::new(0, "Van", 50.0, "kg");
        (customers, dm, vehicle)
    }

    #[test]
    fn test_build_route_empty() {
        let (customers, dm, vehicle) = setup();
        let eval = RouteEvaluator::new(&customers, &dm);
        let (route, violations) = eval.build_route(&[], &vehicle);
        assert!(route.is_empty());
        assert!(violations.is_empty());
        assert_eq!(route.total_distance(), 0.0);
    }

    #[test]
    fn test_build_route_single() {
        let (customers, dm, vehicle) = setup();
        let eval = RouteEvaluator::new(&customers, &dm);
        let (route, violations) = eval.build_route(&[1], &vehicle);
        assert_eq!(route.len(), 1);
        assert!(violations.is_empty());
        assert!((route.total_distance() - 2.0 * dm.get(0, 1)).abs() < 1e-10);
        assert_eq!(route.total_demand(), 10.0);
        assert_eq!(route.customer_ids(), vec![1]);
    }

    #[test]
    fn test_build_route_capacity_violated() {
        let (customers, dm, _) = setup();
        let small = Vehicle::new(9, "Bike", 25.0, "kg");
        let eval = RouteEvaluator::new(&customers, &dm);
        // 10 + 20 + 15 = 45 > 25
        let (route, violations) = eval.build_route(&[1, 2, 3], &small);
        assert_eq!(route.len(), 3);
        assert_eq!(violations.len(), 1);
        assert!(matches!(
            violations[0].kind,
            ViolationType::CapacityExceeded { vehicle_id: 9, .. }
        ));
    }

    #[test]
    fn test_build_route_unknown_stop() {
        let (customers, dm, vehicle) = setup();
        let eval = RouteEvaluator::new(&customers, &dm);
        let (route, violations) = eval.build_route(&[1, 0, 8], &vehicle);
        assert_eq!(route.customer_ids(), vec![1]);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].kind, ViolationType::UnknownStop { stop: 0 });
    }

    #[test]
    fn test_check_solution_clean() {
        let (customers, dm, vehicle) = setup();
        let eval = RouteEvaluator::new(&customers, &dm);
        let (route, _) = eval.build_route(&[1, 2], &vehicle);
        let sol = VrpSolution::new(vec![route], vec![customers[2].clone()], 0);
        assert!(check_solution(&sol, &customers).is_empty());
    }

    #[test]
    fn test_check_solution_partition_errors() {
        let (customers, dm, vehicle) = setup();
        let eval = RouteEvaluator::new(&customers, &dm);
        let (route, _) = eval.build_route(&[1, 2], &vehicle);
        // customer 2 routed and unassigned, customer 3 nowhere
        let sol = VrpSolution::new(vec![route], vec![customers[1].clone()], 0);
        let kinds: Vec<ViolationType> = check_solution(&sol, &customers)
            .into_iter()
            .map(|v| v.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                ViolationType::CustomerDuplicated { customer_id: 2 },
                ViolationType::CustomerMissing { customer_id: 3 },
            ]
        );
    }

    #[test]
    fn test_check_solution_vehicle_reused() {
        let (customers, dm, vehicle) = setup();
        let eval = RouteEvaluator::new(&customers, &dm);
        let (r1, _) = eval.build_route(&[1], &vehicle);
        let (r2, _) = eval.build_route(&[2, 3], &vehicle);
        let sol = VrpSolution::new(vec![r1, r2], Vec::new(), 0);
        let violations = check_solution(&sol, &customers);
        assert_eq!(
            violations,
            vec![Violation::new(ViolationType::VehicleReused { vehicle_id: 0 })]
        );
    }

    #[test]
    fn test_capacity_rounding_tolerated() {
        assert!(!over_capacity(0.1 + 0.2, 0.3));
        assert!(over_capacity(0.31, 0.3));
    }

    #[test]
    fn test_violation_display() {
        let v = Violation::new(ViolationType::CustomerMissing { customer_id: 4 });
        assert_eq!(v.to_string(), "customer 4 neither routed nor unassigned");
    }
}
