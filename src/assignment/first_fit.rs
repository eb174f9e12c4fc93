//! First-Fit-Decreasing vehicle assignment.
//!
//! # Algorithm
//!
//! Segments are the items and vehicles the bins, each bin holding one item:
//!
//! 1. Sort segments by decreasing demand (hardest to place first).
//! 2. Sort vehicles by increasing capacity.
//! 3. Give each segment the first unused vehicle whose capacity covers it.
//!
//! Taking the smallest vehicle that fits keeps the large ones free for the
//! large segments still to come. Segments no free vehicle can carry are
//! returned unassigned. Both sorts are stable, so ties keep input order.
//!
//! # Complexity
//!
//! O(s·v) for s segments and v vehicles, plus the sorts.

use tracing::{debug, warn};

use crate::constructive::RouteSegment;
use crate::models::Vehicle;

/// A segment paired with the vehicle that will drive it.
#[derive(Debug, Clone, PartialEq)]
pub struct AssignedSegment {
    pub segment: RouteSegment,
    /// Index into the vehicle slice passed to [`assign_vehicles`].
    pub vehicle: usize,
}

/// Result of matching segments to the fleet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Assignment {
    /// Accepted pairs, in decreasing segment demand.
    pub assigned: Vec<AssignedSegment>,
    /// Segments no unused vehicle could carry.
    pub unassigned: Vec<RouteSegment>,
}

/// Assigns each segment to at most one vehicle and each vehicle to at most
/// one segment.
///
/// # Examples
///
/// ```
/// use savings_routing::assignment::assign_vehicles;
/// use savings_routing::constructive::RouteSegment;
/// use savings_routing::models::Vehicle;
///
/// let fleet = vec![
///     Vehicle::new(1, "big", 100.0, "kg"),
///     Vehicle::new(2, "small", 20.0, "kg"),
/// ];
/// let segments = vec![RouteSegment::singleton(1, 15.0)];
/// let result = assign_vehicles(segments, &fleet);
/// // the small vehicle is enough
/// assert_eq!(result.assigned[0].vehicle, 1);
/// ```
pub fn assign_vehicles(mut segments: Vec<RouteSegment>, vehicles: &[Vehicle]) -> Assignment {
    segments.retain(|s| !s.is_empty());
    segments.sort_by(|a, b| b.demand().total_cmp(&a.demand()));

    let mut by_capacity: Vec<usize> = (0..vehicles.len()).collect();
    by_capacity.sort_by(|&a, &b| vehicles[a].capacity().total_cmp(&vehicles[b].capacity()));
    let mut used = vec![false; vehicles.len()];

    let mut result = Assignment::default();
    for segment in segments {
        let fit = by_capacity
            .iter()
            .copied()
            .find(|&v| !used[v] && vehicles[v].capacity() >= segment.demand());
        match fit {
            Some(v) => {
                used[v] = true;
                result.assigned.push(AssignedSegment {
                    segment,
                    vehicle: v,
                });
            }
            None => {
                warn!(
                    demand = segment.demand(),
                    stops = segment.len(),
                    "no unused vehicle fits segment, leaving its customers unassigned"
                );
                result.unassigned.push(segment);
            }
        }
    }

    let (kept, dropped) = truncate_to_fleet(result.assigned, vehicles.len());
    result.assigned = kept;
    result.unassigned.extend(dropped);

    debug!(
        assigned = result.assigned.len(),
        unassigned = result.unassigned.len(),
        "vehicle assignment done"
    );
    result
}

/// Keeps at most `fleet_size` pairs, preferring the largest demand.
fn truncate_to_fleet(
    mut assigned: Vec<AssignedSegment>,
    fleet_size: usize,
) -> (Vec<AssignedSegment>, Vec<RouteSegment>) {
    if assigned.len() <= fleet_size {
        return (assigned, Vec::new());
    }
    warn!(
        routes = assigned.len(),
        vehicles = fleet_size,
        "more routes than vehicles, dropping the smallest"
    );
    assigned.sort_by(|a, b| b.segment.demand().total_cmp(&a.segment.demand()));
    let dropped = assigned
        .split_off(fleet_size)
        .into_iter()
        .map(|a| a.segment)
        .collect();
    (assigned, dropped)
}
