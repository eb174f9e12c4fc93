//! Savings-based route construction.
//!
//! - [`compute_savings`]: pairwise Clarke-Wright savings, O(n² log n)
//! - [`merge_routes`]: greedy segment merging along the savings list

mod clarke_wright;
mod savings;

pub use clarke_wright::{merge_routes, RouteSegment};
pub use savings::{compute_savings, split_serviceable, Saving};
