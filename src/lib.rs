//! # savings-routing
//!
//! Capacitated vehicle route planning from a single depot. Customers are
//! grouped into routes with the Clarke-Wright savings heuristic, each route
//! is given at most one vehicle by First-Fit-Decreasing, and stop order is
//! refined with 2-opt.
//!
//! ## Modules
//!
//! - [`models`]: Depot, customers, vehicles, routes and the solution
//! - [`distance`]: Great-circle distances and the depot-first distance matrix
//! - [`constructive`]: Savings list and Clarke-Wright segment merging
//! - [`assignment`]: First-Fit-Decreasing vehicle assignment
//! - [`local_search`]: 2-opt route improvement
//! - [`evaluation`]: Route building and solution feasibility checks
//! - [`solver`]: End-to-end solve, configuration, plan checks and cancellation
//! - [`error`]: Error types

pub mod assignment;
pub mod constructive;
pub mod distance;
pub mod error;
pub mod evaluation;
pub mod local_search;
pub mod models;
pub mod solver;
