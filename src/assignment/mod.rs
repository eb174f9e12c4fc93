//! Matching route segments to vehicles.
//!
//! - [`assign_vehicles`]: First-Fit-Decreasing, one segment per vehicle

mod first_fit;

pub use first_fit::{assign_vehicles, AssignedSegment, Assignment};
