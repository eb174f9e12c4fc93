//! Error types.

use thiserror::Error;

/// Failures inside a solve.
///
/// [`VrpSolver::solve`](crate::solver::VrpSolver::solve) never surfaces
/// these; they are logged and turned into a degraded solution. Only
/// [`SolveError::Cancelled`] reaches callers of
/// [`VrpSolver::solve_cancellable`](crate::solver::VrpSolver::solve_cancellable).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SolveError {
    #[error("solve was cancelled")]
    Cancelled,

    #[error("depot has invalid coordinates ({latitude}, {longitude})")]
    InvalidDepot { latitude: f64, longitude: f64 },

    #[error("internal invariant violated: {message}")]
    InvariantViolation { message: String },
}

/// Reasons a plan is rejected by [`check_plan`](crate::solver::check_plan)
/// before solving.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("no vehicles available for planning")]
    NoVehicles,

    #[error("no customers selected for planning")]
    NoCustomers,

    #[error("total demand {total_demand:.2} exceeds total fleet capacity {total_capacity:.2}")]
    DemandExceedsFleet {
        total_demand: f64,
        total_capacity: f64,
    },

    #[error(
        "demand of customer \"{name}\" ({demand:.2}) exceeds the largest vehicle capacity ({max_capacity:.2})"
    )]
    CustomerTooLarge {
        customer_id: usize,
        name: String,
        demand: f64,
        max_capacity: f64,
    },
}
