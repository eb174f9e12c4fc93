//! Solution type and outcome classification.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Customer, RouteDetail};

/// Coarse classification of a solution, for choosing what to show the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolveOutcome {
    /// No customers were supplied.
    Empty,
    /// Customers were supplied but none could be routed.
    NoRoutes,
    /// Some customers were routed, some are unassigned.
    Partial,
    /// Every customer was routed.
    Complete,
}

/// The result of one solve call.
///
/// Built once and never mutated: routes, deduplicated unassigned customers,
/// total distance, wall-clock time and a fresh plan id.
///
/// # Examples
///
/// ```
/// use savings_routing::models::{SolveOutcome, VrpSolution};
///
/// let sol = VrpSolution::empty(0);
/// assert_eq!(sol.num_routes(), 0);
/// assert_eq!(sol.outcome(), SolveOutcome::Empty);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VrpSolution {
    routes: Vec<RouteDetail>,
    unassigned: Vec<Customer>,
    total_distance: f64,
    calculation_time_ms: u64,
    plan_id: Uuid,
}

impl VrpSolution {
    /// Assembles a solution. Unassigned customers are deduplicated by id,
    /// keeping the first occurrence.
    pub fn new(
        routes: Vec<RouteDetail>,
        unassigned: Vec<Customer>,
        calculation_time_ms: u64,
    ) -> Self {
        let total_distance = routes.iter().map(RouteDetail::total_distance).sum();
        let mut seen = HashSet::with_capacity(unassigned.len());
        let unassigned = unassigned
            .into_iter()
            .filter(|c| seen.insert(c.id()))
            .collect();
        Self {
            routes,
            unassigned,
            total_distance,
            calculation_time_ms,
            plan_id: Uuid::new_v4(),
        }
    }

    /// A solution with no routes and nothing unassigned.
    pub fn empty(calculation_time_ms: u64) -> Self {
        Self::new(Vec::new(), Vec::new(), calculation_time_ms)
    }

    /// A solution with no routes where every given customer is unassigned.
    pub fn all_unassigned(customers: &[Customer], calculation_time_ms: u64) -> Self {
        Self::new(Vec::new(), customers.to_vec(), calculation_time_ms)
    }

    /// Returns the routes in this solution.
    pub fn routes(&self) -> &[RouteDetail] {
        &self.routes
    }

    /// Returns the number of routes (vehicles used).
    pub fn num_routes(&self) -> usize {
        self.routes.len()
    }

    /// Returns the customers that could not be placed on any route.
    pub fn unassigned(&self) -> &[Customer] {
        &self.unassigned
    }

    /// Returns the number of unassigned customers.
    pub fn num_unassigned(&self) -> usize {
        self.unassigned.len()
    }

    /// Total distance across all routes.
    pub fn total_distance(&self) -> f64 {
        self.total_distance
    }

    /// Total number of customers served (across all routes).
    pub fn num_served(&self) -> usize {
        self.routes.iter().map(RouteDetail::len).sum()
    }

    /// Wall-clock time spent computing this solution.
    pub fn calculation_time_ms(&self) -> u64 {
        self.calculation_time_ms
    }

    /// Unique identifier of this plan.
    pub fn plan_id(&self) -> Uuid {
        self.plan_id
    }

    pub fn outcome(&self) -> SolveOutcome {
        match (self.routes.is_empty(), self.unassigned.is_empty()) {
            (true, true) => SolveOutcome::Empty,
            (true, false) => SolveOutcome::NoRoutes,
            (false, false) => SolveOutcome::Partial,
            (false, true) => SolveOutcome::Complete,
        }
    }
}
