//! Route construction from stop sequences and solution feasibility checks.

mod evaluator;

pub use evaluator::{check_solution, RouteEvaluator, Violation, ViolationType};
