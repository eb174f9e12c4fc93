//! Route planning pipeline.
//!
//! Runs the stages in order: serviceability filter, savings, segment merge,
//! vehicle assignment, 2-opt per route. Always yields a [`VrpSolution`];
//! internal failures are logged and degrade to "everything unassigned".

mod config;
mod preflight;
mod supervisor;

pub use config::SolverConfig;
pub use preflight::check_plan;
pub use supervisor::SolveSupervisor;

use std::any::Any;
use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};
use std::time::Instant;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::assignment::assign_vehicles;
use crate::constructive::{compute_savings, merge_routes, split_serviceable};
use crate::distance::DistanceMatrix;
use crate::error::SolveError;
use crate::evaluation::{check_solution, RouteEvaluator};
use crate::local_search::two_opt_improve;
use crate::models::{max_capacity, Customer, Depot, RouteDetail, Vehicle, VrpSolution};

/// Capacitated route solver: Clarke-Wright savings, First-Fit-Decreasing
/// vehicle assignment, then 2-opt on each route.
///
/// Holds no state between calls; one solver can serve concurrent solves.
///
/// # Examples
///
/// ```
/// use savings_routing::models::{Coordinate, Customer, Depot, Vehicle};
/// use savings_routing::solver::VrpSolver;
///
/// let depot = Depot::new("HQ", Coordinate::new(0.0, 0.0));
/// let customers = vec![
///     Customer::new(1, "A", Coordinate::new(0.0, 1.0), 5.0),
///     Customer::new(2, "B", Coordinate::new(0.0, 2.0), 5.0),
///     Customer::new(3, "C", Coordinate::new(5.0, 5.0), 5.0),
/// ];
/// let vehicles = vec![Vehicle::new(1, "Van", 20.0, "kg")];
///
/// let solution = VrpSolver::default().solve(&depot, &customers, &vehicles);
/// assert_eq!(solution.num_routes(), 1);
/// assert_eq!(solution.num_served(), 3);
/// assert_eq!(solution.num_unassigned(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VrpSolver {
    config: SolverConfig,
}

impl VrpSolver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Plans routes for `customers` out of `depot` with `vehicles`.
    ///
    /// Never fails: if route construction breaks, the failure is logged and
    /// the result has no routes and every customer unassigned.
    pub fn solve(
        &self,
        depot: &Depot,
        customers: &[Customer],
        vehicles: &[Vehicle],
    ) -> VrpSolution {
        let started_at = Instant::now();
        self.run_guarded(depot, customers, vehicles, None, started_at)
            .unwrap_or_else(|err| degraded(customers, started_at, &err))
    }

    /// Like [`solve`](Self::solve), but gives up with
    /// [`SolveError::Cancelled`] once `token` is cancelled.
    ///
    /// The token is checked between stages and between routes. Cancellation
    /// is the only error returned; every other failure degrades as in
    /// [`solve`](Self::solve).
    pub fn solve_cancellable(
        &self,
        depot: &Depot,
        customers: &[Customer],
        vehicles: &[Vehicle],
        token: &CancellationToken,
    ) -> Result<VrpSolution, SolveError> {
        let started_at = Instant::now();
        match self.run_guarded(depot, customers, vehicles, Some(token), started_at) {
            Ok(solution) => Ok(solution),
            Err(SolveError::Cancelled) => {
                info!("solve cancelled after {} ms", elapsed_ms(started_at));
                Err(SolveError::Cancelled)
            }
            Err(err) => Ok(degraded(customers, started_at, &err)),
        }
    }

    fn run_guarded(
        &self,
        depot: &Depot,
        customers: &[Customer],
        vehicles: &[Vehicle],
        token: Option<&CancellationToken>,
        started_at: Instant,
    ) -> Result<VrpSolution, SolveError> {
        contain_panic(|| self.run(depot, customers, vehicles, token, started_at))
    }

    fn run(
        &self,
        depot: &Depot,
        customers: &[Customer],
        vehicles: &[Vehicle],
        token: Option<&CancellationToken>,
        started_at: Instant,
    ) -> Result<VrpSolution, SolveError> {
        debug!(
            customers = customers.len(),
            vehicles = vehicles.len(),
            "starting savings solve"
        );

        if customers.is_empty() {
            debug!("no customers to route, returning empty solution");
            return Ok(VrpSolution::empty(elapsed_ms(started_at)));
        }
        let fleet = usable_fleet(vehicles);
        if fleet.is_empty() {
            warn!("no usable vehicles provided, all customers will be unassigned");
            return Ok(VrpSolution::all_unassigned(customers, elapsed_ms(started_at)));
        }
        let vehicles = fleet.as_slice();

        let depot_location = depot.location();
        if !depot_location.is_valid() {
            return Err(SolveError::InvalidDepot {
                latitude: depot_location.latitude(),
                longitude: depot_location.longitude(),
            });
        }

        let (located, mislocated): (Vec<Customer>, Vec<Customer>) = customers
            .iter()
            .cloned()
            .partition(|c| c.location().is_valid());
        for c in &mislocated {
            warn!(
                customer_id = c.id(),
                location = %c.location(),
                "customer has invalid coordinates, leaving unassigned"
            );
        }

        let (serviceable, _) = split_serviceable(&located, vehicles);
        if serviceable.is_empty() {
            warn!("no serviceable customers after capacity check");
            return Ok(self.assemble(customers, Vec::new(), started_at));
        }
        checkpoint(token)?;

        let distances =
            DistanceMatrix::from_locations(depot_location, &serviceable, self.config.metric);
        let savings = compute_savings(&distances);
        debug!(
            savings = savings.len(),
            serviceable = serviceable.len(),
            "computed positive savings"
        );
        checkpoint(token)?;

        let segments = merge_routes(&savings, &serviceable, &distances, max_capacity(vehicles));
        checkpoint(token)?;

        let assignment = assign_vehicles(segments, vehicles);

        let evaluator = RouteEvaluator::new(&serviceable, &distances);
        let limits = self.config.two_opt_limits();
        let mut routes = Vec::with_capacity(assignment.assigned.len());
        for pair in assignment.assigned {
            checkpoint(token)?;
            let vehicle = vehicles.get(pair.vehicle).ok_or_else(|| {
                SolveError::InvariantViolation {
                    message: format!("assigned vehicle index {} out of range", pair.vehicle),
                }
            })?;
            let stops = if self.config.optimize_routes {
                two_opt_improve(pair.segment.stops(), DistanceMatrix::DEPOT, &distances, &limits).0
            } else {
                pair.segment.into_stops()
            };
            let (route, violations) = evaluator.build_route(&stops, vehicle);
            if let Some(v) = violations.first() {
                return Err(SolveError::InvariantViolation {
                    message: v.to_string(),
                });
            }
            routes.push(route);
        }

        let solution = self.assemble(customers, routes, started_at);
        verify(solution, customers)
    }

    /// Builds the solution; every input customer not on a route is unassigned.
    fn assemble(
        &self,
        customers: &[Customer],
        routes: Vec<RouteDetail>,
        started_at: Instant,
    ) -> VrpSolution {
        let routed: HashSet<usize> = routes
            .iter()
            .flat_map(|r| r.stops().iter().map(Customer::id))
            .collect();
        let unassigned: Vec<Customer> = customers
            .iter()
            .filter(|c| !routed.contains(&c.id()))
            .cloned()
            .collect();

        let solution = VrpSolution::new(routes, unassigned, elapsed_ms(started_at));
        info!(
            routes = solution.num_routes(),
            unassigned = solution.num_unassigned(),
            total_distance_km = solution.total_distance(),
            time_ms = solution.calculation_time_ms(),
            "savings solve finished"
        );
        solution
    }
}

/// Runs `stage`, turning a panic into an invariant violation.
fn contain_panic<F>(stage: F) -> Result<VrpSolution, SolveError>
where
    F: FnOnce() -> Result<VrpSolution, SolveError>,
{
    panic::catch_unwind(AssertUnwindSafe(stage)).unwrap_or_else(|payload| {
        Err(SolveError::InvariantViolation {
            message: panic_message(payload.as_ref()),
        })
    })
}

/// Drops vehicles that cannot carry anything and repeated vehicle ids,
/// keeping the first vehicle listed under each id.
fn usable_fleet(vehicles: &[Vehicle]) -> Vec<Vehicle> {
    let mut seen = HashSet::new();
    vehicles
        .iter()
        .filter(|v| {
            if !v.is_usable() {
                warn!(
                    vehicle_id = v.id(),
                    capacity = v.capacity(),
                    "vehicle has no capacity, skipping"
                );
                return false;
            }
            if !seen.insert(v.id()) {
                warn!(vehicle_id = v.id(), "duplicate vehicle id, skipping");
                return false;
            }
            true
        })
        .cloned()
        .collect()
}

/// Rejects a solution that breaks capacity, fleet or partition rules.
fn verify(solution: VrpSolution, customers: &[Customer]) -> Result<VrpSolution, SolveError> {
    let violations = check_solution(&solution, customers);
    if violations.is_empty() {
        return Ok(solution);
    }
    let message = violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ");
    Err(SolveError::InvariantViolation { message })
}

fn checkpoint(token: Option<&CancellationToken>) -> Result<(), SolveError> {
    match token {
        Some(t) if t.is_cancelled() => Err(SolveError::Cancelled),
        _ => Ok(()),
    }
}

fn degraded(customers: &[Customer], started_at: Instant, err: &SolveError) -> VrpSolution {
    error!(error = %err, "route construction failed, returning all customers unassigned");
    VrpSolution::all_unassigned(customers, elapsed_ms(started_at))
}

fn elapsed_ms(started_at: Instant) -> u64 {
    started_at.elapsed().as_millis() as u64
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "panic during route construction".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::{haversine_distance, DistanceMetric};
    use crate::models::{Coordinate, SolveOutcome};
    use proptest::prelude::*;

    fn depot() -> Depot {
        Depot::new("HQ", Coordinate::new(0.0, 0.0))
    }

    fn customer(id: usize, lat: f64, lon: f64, demand: f64) -> Customer {
        Customer::new(id, format!("C{id}"), Coordinate::new(lat, lon), demand)
    }

    fn vehicle(id: usize, capacity: f64) -> Vehicle {
        Vehicle::new(id, format!("V{id}"), capacity, "kg")
    }

    fn path_length(route: &RouteDetail, depot: &Depot) -> f64 {
        route
            .path(depot)
            .windows(2)
            .map(|w| haversine_distance(w[0], w[1]))
            .sum()
    }

    #[test]
    fn test_three_customers_one_route() {
        let depot = depot();
        let customers = vec![
            customer(1, 0.0, 1.0, 5.0),
            customer(2, 0.0, 2.0, 5.0),
            customer(3, 5.0, 5.0, 5.0),
        ];
        let sol = VrpSolver::default().solve(&depot, &customers, &[vehicle(1, 20.0)]);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.num_served(), 3);
        assert_eq!(sol.num_unassigned(), 0);
        let route = &sol.routes()[0];
        assert_eq!(route.total_demand(), 15.0);
        assert!((route.total_distance() - path_length(route, &depot)).abs() < 1e-6);
        assert!((sol.total_distance() - route.total_distance()).abs() < 1e-9);
        assert_eq!(sol.outcome(), SolveOutcome::Complete);
    }

    #[test]
    fn test_customer_larger_than_fleet() {
        let customers = vec![customer(1, 0.0, 1.0, 100.0)];
        let sol = VrpSolver::default().solve(&depot(), &customers, &[vehicle(1, 50.0)]);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_unassigned(), 1);
        assert_eq!(sol.unassigned()[0].id(), 1);
        assert_eq!(sol.outcome(), SolveOutcome::NoRoutes);
    }

    #[test]
    fn test_two_customers_two_vehicles() {
        let customers = vec![customer(1, 0.0, 1.0, 10.0), customer(2, 1.0, 0.0, 10.0)];
        let vehicles = vec![vehicle(1, 10.0), vehicle(2, 10.0)];
        let sol = VrpSolver::default().solve(&depot(), &customers, &vehicles);
        assert_eq!(sol.num_routes(), 2);
        assert!(sol.routes().iter().all(|r| r.len() == 1));
        assert_eq!(sol.num_unassigned(), 0);
    }

    #[test]
    fn test_two_customers_one_vehicle() {
        let customers = vec![customer(1, 0.0, 1.0, 10.0), customer(2, 1.0, 0.0, 10.0)];
        let sol = VrpSolver::default().solve(&depot(), &customers, &[vehicle(1, 10.0)]);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.num_served(), 1);
        assert_eq!(sol.num_unassigned(), 1);
        assert_eq!(sol.outcome(), SolveOutcome::Partial);
    }

    #[test]
    fn test_no_customers() {
        let sol = VrpSolver::default().solve(&depot(), &[], &[vehicle(1, 10.0)]);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_unassigned(), 0);
        assert_eq!(sol.total_distance(), 0.0);
        assert_eq!(sol.outcome(), SolveOutcome::Empty);
    }

    #[test]
    fn test_no_vehicles() {
        let customers = vec![customer(1, 0.0, 1.0, 1.0), customer(2, 0.0, 2.0, 1.0)];
        let sol = VrpSolver::default().solve(&depot(), &customers, &[]);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_unassigned(), 2);
    }

    #[test]
    fn test_invalid_customer_unassigned() {
        let customers = vec![customer(1, 0.0, 1.0, 1.0), customer(2, 95.0, 2.0, 1.0)];
        let sol = VrpSolver::default().solve(&depot(), &customers, &[vehicle(1, 10.0)]);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.routes()[0].customer_ids(), vec![1]);
        assert_eq!(sol.unassigned().iter().map(Customer::id).collect::<Vec<_>>(), vec![2]);
        assert!(sol.total_distance().is_finite());
    }

    #[test]
    fn test_invalid_depot_degrades() {
        let depot = Depot::new("Nowhere", Coordinate::new(0.0, 500.0));
        let customers = vec![customer(1, 0.0, 1.0, 1.0), customer(2, 0.0, 2.0, 1.0)];
        let sol = VrpSolver::default().solve(&depot, &customers, &[vehicle(1, 10.0)]);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_unassigned(), 2);
    }

    #[test]
    fn test_merged_segment_too_big_for_any_free_vehicle() {
        // the merge ceiling is the largest vehicle, so 1+2 merge into one
        // segment of 20, taking the only large vehicle; 3 then needs 15
        // but only the 5 is left
        let customers = vec![
            customer(1, 0.0, 1.0, 10.0),
            customer(2, 0.0, 1.1, 10.0),
            customer(3, 1.0, 0.0, 15.0),
        ];
        let vehicles = vec![vehicle(1, 20.0), vehicle(2, 5.0)];
        let sol = VrpSolver::default().solve(&depot(), &customers, &vehicles);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.num_served() + sol.num_unassigned(), 3);
        for route in sol.routes() {
            assert!(route.total_demand() <= route.vehicle().capacity());
        }
    }

    #[test]
    fn test_optimization_toggle_never_worse() {
        let customers: Vec<Customer> = (0..12)
            .map(|k| {
                let a = k as f64 * 0.7;
                customer(k + 1, a.sin() * 0.5, a.cos() * 0.5, 1.0)
            })
            .collect();
        let vehicles = vec![vehicle(1, 100.0)];
        let plain = VrpSolver::new(SolverConfig::default().with_route_optimization(false))
            .solve(&depot(), &customers, &vehicles);
        let tuned = VrpSolver::default().solve(&depot(), &customers, &vehicles);
        assert_eq!(plain.num_served(), 12);
        assert_eq!(tuned.num_served(), 12);
        assert!(tuned.total_distance() <= plain.total_distance() + 1e-9);
    }

    #[test]
    fn test_equirectangular_metric() {
        let customers = vec![customer(1, 0.0, 0.1, 1.0), customer(2, 0.1, 0.1, 1.0)];
        let config = SolverConfig::default().with_metric(DistanceMetric::Equirectangular);
        let sol = VrpSolver::new(config).solve(&depot(), &customers, &[vehicle(1, 10.0)]);
        assert_eq!(sol.num_routes(), 1);
        assert!(sol.total_distance() > 0.0);
    }

    #[test]
    fn test_cancelled_token() {
        let token = CancellationToken::new();
        token.cancel();
        let customers = vec![customer(1, 0.0, 1.0, 1.0), customer(2, 0.0, 2.0, 1.0)];
        let vehicles = vec![vehicle(1, 10.0)];
        let result =
            VrpSolver::default().solve_cancellable(&depot(), &customers, &vehicles, &token);
        assert_eq!(result.err(), Some(SolveError::Cancelled));
    }

    #[test]
    fn test_superseded_solve_cancelled() {
        let supervisor = SolveSupervisor::new();
        let stale = supervisor.begin();
        let fresh = supervisor.begin();
        let customers = vec![customer(1, 0.0, 1.0, 1.0), customer(2, 0.0, 2.0, 1.0)];
        let vehicles = vec![vehicle(1, 10.0)];
        let solver = VrpSolver::default();
        assert!(solver.solve_cancellable(&depot(), &customers, &vehicles, &stale).is_err());
        let sol = solver
            .solve_cancellable(&depot(), &customers, &vehicles, &fresh)
            .expect("live token");
        assert_eq!(sol.num_served(), 2);
    }

    #[test]
    fn test_verify_rejects_broken_partition() {
        let customers = vec![customer(1, 0.0, 1.0, 1.0)];
        let broken = VrpSolution::new(Vec::new(), Vec::new(), 0);
        assert!(matches!(
            verify(broken, &customers),
            Err(SolveError::InvariantViolation { .. })
        ));
    }

    #[test]
    fn test_panicking_stage_degrades() {
        let customers = vec![customer(1, 0.0, 1.0, 1.0), customer(2, 0.0, 2.0, 1.0)];
        let result = contain_panic(|| panic!("stop index 9 out of range"));
        let err = result.as_ref().err().cloned();
        assert_eq!(
            err,
            Some(SolveError::InvariantViolation {
                message: "stop index 9 out of range".into(),
            })
        );
        let sol = result.unwrap_or_else(|e| degraded(&customers, Instant::now(), &e));
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_unassigned(), 2);
    }

    #[test]
    fn test_contain_panic_passes_results_through() {
        let ok = contain_panic(|| Ok(VrpSolution::empty(0)));
        assert!(ok.is_ok());
        let cancelled = contain_panic(|| Err(SolveError::Cancelled));
        assert_eq!(cancelled.err(), Some(SolveError::Cancelled));
    }

    #[test]
    fn test_duplicate_vehicle_ids_keep_first() {
        let customers = vec![customer(1, 0.0, 1.0, 10.0), customer(2, 1.0, 0.0, 10.0)];
        let vehicles = vec![vehicle(1, 10.0), vehicle(1, 10.0)];
        let sol = VrpSolver::default().solve(&depot(), &customers, &vehicles);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.num_served(), 1);
        assert_eq!(sol.num_unassigned(), 1);
        assert!(check_solution(&sol, &customers).is_empty());
    }

    #[test]
    fn test_unusable_vehicles_ignored() {
        let customers = vec![customer(1, 0.0, 1.0, 0.0), customer(2, 0.0, 2.0, 3.0)];
        let sol = VrpSolver::default().solve(&depot(), &customers, &[vehicle(1, -5.0)]);
        assert_eq!(sol.num_routes(), 0);
        assert_eq!(sol.num_unassigned(), 2);

        let vehicles = vec![vehicle(1, 0.0), vehicle(2, 10.0)];
        let sol = VrpSolver::default().solve(&depot(), &customers, &vehicles);
        assert_eq!(sol.num_routes(), 1);
        assert_eq!(sol.routes()[0].vehicle().id(), 2);
    }

    #[test]
    fn test_usable_fleet() {
        let fleet = usable_fleet(&[
            vehicle(1, 5.0),
            vehicle(2, 0.0),
            vehicle(1, 9.0),
            vehicle(3, 2.0),
        ]);
        let kept: Vec<(usize, f64)> = fleet.iter().map(|v| (v.id(), v.capacity())).collect();
        assert_eq!(kept, vec![(1, 5.0), (3, 2.0)]);
    }

    #[test]
    fn test_panic_message() {
        let payload: Box<dyn Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "boom");
        let payload: Box<dyn Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "bang");
    }

    fn instance() -> impl Strategy<Value = (Vec<Customer>, Vec<Vehicle>)> {
        let customers = prop::collection::vec((-1.0..1.0f64, -1.0..1.0f64, 0.0..30.0f64), 0..25)
            .prop_map(|raw| {
                raw.into_iter()
                    .enumerate()
                    .map(|(k, (lat, lon, d))| customer(k + 1, lat, lon, d))
                    .collect::<Vec<_>>()
            });
        let vehicles = prop::collection::vec(1.0..60.0f64, 0..5).prop_map(|caps| {
            caps.into_iter()
                .enumerate()
                .map(|(k, c)| vehicle(k + 1, c))
                .collect::<Vec<_>>()
        });
        (customers, vehicles)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_every_customer_placed_once((customers, vehicles) in instance()) {
            let sol = VrpSolver::default().solve(&depot(), &customers, &vehicles);
            prop_assert!(check_solution(&sol, &customers).is_empty());
            prop_assert_eq!(sol.num_served() + sol.num_unassigned(), customers.len());
        }

        #[test]
        fn prop_routes_respect_capacity((customers, vehicles) in instance()) {
            let sol = VrpSolver::default().solve(&depot(), &customers, &vehicles);
            prop_assert!(sol.num_routes() <= vehicles.len());
            for route in sol.routes() {
                let load: f64 = route.stops().iter().map(Customer::demand).sum();
                prop_assert!(load <= route.vehicle().capacity() + 1e-9);
            }
        }
    }
}
