//! Clarke-Wright route merging.
//!
//! # Algorithm
//!
//! The savings algorithm (Clarke & Wright, 1964) starts with each customer
//! on its own route (depot → customer → depot) and walks the savings list
//! once, in decreasing order. A saving `(i, j)` joins the segments holding
//! `i` and `j` when both customers sit at an end of their segment and the
//! combined demand fits the capacity ceiling. Interior customers are never
//! merge points, so every segment stays a simple path.
//!
//! Segments live in an arena indexed by slot; a per-customer slot table
//! plays the role of the union-find map. Absorbed slots are emptied. After
//! a merge the absorbed side's linking customer is dropped from the table,
//! so later savings naming it are skipped. Each live segment thus keeps
//! exactly one customer in the table.
//!
//! # Reference
//!
//! Clarke, G. & Wright, J.W. (1964). "Scheduling of Vehicles from a Central
//! Depot to a Number of Delivery Points", *Operations Research* 12(4), 568-581.

use tracing::{debug, trace};

use super::Saving;
use crate::distance::DistanceMatrix;
use crate::models::Customer;

/// A contiguous chain of customers destined to become one route.
///
/// Stops are matrix indices (depot = 0, so customer `k` of the slice the
/// matrix was built from is stop `k + 1`). `distance` covers the legs
/// between stops only, not the depot legs.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteSegment {
    stops: Vec<usize>,
    demand: f64,
    distance: f64,
}

impl RouteSegment {
    /// A segment holding a single stop.
    pub fn singleton(stop: usize, demand: f64) -> Self {
        Self {
            stops: vec![stop],
            demand,
            distance: 0.0,
        }
    }

    /// Stops in order.
    pub fn stops(&self) -> &[usize] {
        &self.stops
    }

    /// Total demand of all stops.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    /// Internal distance, excluding depot legs.
    pub fn distance(&self) -> f64 {
        self.distance
    }

    pub fn len(&self) -> usize {
        self.stops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stops.is_empty()
    }

    pub fn head(&self) -> Option<usize> {
        self.stops.first().copied()
    }

    pub fn tail(&self) -> Option<usize> {
        self.stops.last().copied()
    }

    /// Consumes the segment, returning its stops.
    pub fn into_stops(self) -> Vec<usize> {
        self.stops
    }

    /// Joins `other` onto this segment across a link of length `link`.
    ///
    /// `other` is reversed first when `reverse` is set, then placed in
    /// front of or behind this segment.
    fn absorb(&mut self, mut other: RouteSegment, reverse: bool, at_front: bool, link: f64) {
        if reverse {
            other.stops.reverse();
        }
        if at_front {
            other.stops.append(&mut self.stops);
            self.stops = other.stops;
        } else {
            self.stops.append(&mut other.stops);
        }
        self.demand += other.demand;
        self.distance += other.distance + link;
    }
}

/// Where the two customers of a saving sit in their segments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum JoinPattern {
    /// `i` is the tail of its segment, `j` the head of its own.
    TailHead,
    /// `j` is a tail, `i` a head.
    HeadTail,
    /// Both are heads.
    HeadHead,
    /// Both are tails.
    TailTail,
}

impl JoinPattern {
    /// Checks the four positional patterns in priority order.
    fn detect(seg_i: &RouteSegment, seg_j: &RouteSegment, i: usize, j: usize) -> Option<Self> {
        let i_head = seg_i.head() == Some(i);
        let i_tail = seg_i.tail() == Some(i);
        let j_head = seg_j.head() == Some(j);
        let j_tail = seg_j.tail() == Some(j);

        if i_tail && j_head {
            Some(Self::TailHead)
        } else if j_tail && i_head {
            Some(Self::HeadTail)
        } else if i_head && j_head {
            Some(Self::HeadHead)
        } else if i_tail && j_tail {
            Some(Self::TailTail)
        } else {
            None
        }
    }
}

/// Merges single-customer routes along the savings list.
///
/// `customers[k]` must correspond to matrix index `k + 1` of `distances`.
/// A merge happens only if the combined demand is at most `max_capacity`.
/// Every saving is visited exactly once. Returns the surviving segments in
/// arena slot order: slots start in `customers` order and a merged segment
/// keeps the slot of the side it was joined onto.
///
/// # Examples
///
/// ```
/// use savings_routing::constructive::{compute_savings, merge_routes};
/// use savings_routing::distance::{DistanceMatrix, DistanceMetric};
/// use savings_routing::models::{Coordinate, Customer};
///
/// let customers = vec![
///     Customer::new(1, "A", Coordinate::new(0.0, 1.0), 5.0),
///     Customer::new(2, "B", Coordinate::new(0.0, 2.0), 5.0),
///     Customer::new(3, "C", Coordinate::new(0.0, 3.0), 5.0),
/// ];
/// let dm = DistanceMatrix::from_locations(
///     Coordinate::new(0.0, 0.0),
///     &customers,
///     DistanceMetric::Haversine,
/// );
/// let segments = merge_routes(&compute_savings(&dm), &customers, &dm, 20.0);
/// assert_eq!(segments.len(), 1);
/// assert_eq!(segments[0].demand(), 15.0);
/// ```
pub fn merge_routes(
    savings: &[Saving],
    customers: &[Customer],
    distances: &DistanceMatrix,
    max_capacity: f64,
) -> Vec<RouteSegment> {
    let n = customers.len() + 1;

    // slot_of[stop] = arena slot of the segment holding that stop
    let mut slot_of: Vec<Option<usize>> = vec![None; n];
    let mut arena: Vec<Option<RouteSegment>> = Vec::with_capacity(customers.len());
    for (k, customer) in customers.iter().enumerate() {
        slot_of[k + 1] = Some(arena.len());
        arena.push(Some(RouteSegment::singleton(k + 1, customer.demand())));
    }

    let mut merges = 0usize;
    for saving in savings {
        let lookup = |stop: usize| slot_of.get(stop).copied().flatten();
        let (Some(si), Some(sj)) = (lookup(saving.i), lookup(saving.j)) else {
            continue;
        };
        if si == sj {
            continue;
        }
        let (Some(seg_i), Some(seg_j)) = (arena[si].as_ref(), arena[sj].as_ref()) else {
            continue;
        };

        let Some(pattern) = JoinPattern::detect(seg_i, seg_j, saving.i, saving.j) else {
            continue;
        };

        let combined = seg_i.demand() + seg_j.demand();
        if combined > max_capacity {
            trace!(i = saving.i, j = saving.j, combined, "merge rejected on capacity");
            continue;
        }

        // (surviving slot, absorbed slot, reverse absorbed, place in front)
        let (keep, gone, reverse, at_front) = match pattern {
            JoinPattern::TailHead => (si, sj, false, false),
            JoinPattern::HeadTail => (sj, si, false, false),
            JoinPattern::HeadHead => (si, sj, true, true),
            JoinPattern::TailTail => (si, sj, true, false),
        };
        let linked = if gone == si { saving.i } else { saving.j };

        let Some(absorbed) = arena[gone].take() else {
            continue;
        };
        for &stop in absorbed.stops() {
            slot_of[stop] = Some(keep);
        }
        slot_of[linked] = None;
        let link = distances.get(saving.i, saving.j);
        if let Some(survivor) = arena[keep].as_mut() {
            survivor.absorb(absorbed, reverse, at_front, link);
        }
        merges += 1;
        trace!(i = saving.i, j = saving.j, ?pattern, "merged segments");
    }

    let segments: Vec<RouteSegment> = arena.into_iter().flatten().collect();
    debug!(merges, segments = segments.len(), "finished savings merge");
    segments
}
