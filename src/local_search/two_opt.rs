//! Intra-route 2-opt improvement.
//!
//! # Algorithm
//!
//! The tour is `depot → r[0] → … → r[n-1] → depot`. A move `(i, j)` with
//! `j ≥ i + 2` reverses `r[i+1..=j]`, replacing edges `(r[i], r[i+1])` and
//! `(r[j], next(j))`:
//!
//! ```text
//! delta = d(r[i], r[j]) + d(r[i+1], next(j)) - d(r[i], r[i+1]) - d(r[j], next(j))
//! ```
//!
//! The first stop never moves, and the move `(0, n-1)` is skipped. Routes
//! with fewer than four stops therefore have no moves at all.
//!
//! Each sweep scans `(i, j)` pairs in order and applies the first move whose
//! gain exceeds the minimum improvement, then starts a new sweep. The
//! search stops after a sweep with no such move, after too many idle sweeps,
//! or after `n × sweeps_per_stop` sweeps in total.
//!
//! # Complexity
//!
//! O(n²) per sweep, at most O(n) × `sweeps_per_stop` sweeps.
//!
//! # Reference
//!
//! Croes, G.A. (1958). "A method for solving traveling salesman problems",
//! *Operations Research* 6(6), 791-812.

use tracing::debug;

use crate::distance::{DistanceMatrix, DistanceMetric};
use crate::models::{Coordinate, Customer};

/// Stopping rules for [`two_opt_improve`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TwoOptLimits {
    /// A move must shorten the route by more than this to be applied.
    pub min_improvement: f64,
    /// Stop after this many consecutive sweeps without a move.
    pub max_idle_sweeps: usize,
    /// Total sweep budget per stop in the route.
    pub sweeps_per_stop: usize,
}

impl Default for TwoOptLimits {
    fn default() -> Self {
        Self {
            min_improvement: 0.01,
            max_idle_sweeps: 100,
            sweeps_per_stop: 100,
        }
    }
}

/// Applies 2-opt improvement to a single route (given as matrix indices).
///
/// The route is assumed to start and end at `depot`, and `distances` to be
/// symmetric. Returns the improved sequence and its total distance.
///
/// # Examples
///
/// ```
/// use savings_routing::distance::DistanceMatrix;
/// use savings_routing::local_search::{two_opt_improve, TwoOptLimits};
///
/// // depot and four stops on a line at 0, 1, 2, 3, 4
/// let mut dm = DistanceMatrix::new(5);
/// for i in 0..5 {
///     for j in 0..5 {
///         dm.set(i, j, (i as f64 - j as f64).abs());
///     }
/// }
///
/// let (improved, dist) = two_opt_improve(&[1, 3, 2, 4], 0, &dm, &TwoOptLimits::default());
/// assert_eq!(improved, vec![1, 2, 3, 4]);
/// assert!((dist - 8.0).abs() < 1e-10);
/// ```
pub fn two_opt_improve(
    route: &[usize],
    depot: usize,
    distances: &DistanceMatrix,
    limits: &TwoOptLimits,
) -> (Vec<usize>, f64) {
    let mut current = route.to_vec();
    let n = current.len();
    if n < 4 {
        let dist = route_distance(&current, depot, distances);
        return (current, dist);
    }

    let max_sweeps = n.saturating_mul(limits.sweeps_per_stop);
    let mut sweeps = 0usize;
    let mut idle = 0usize;
    let mut moves = 0usize;
    let mut improved = true;

    while improved && idle < limits.max_idle_sweeps && sweeps < max_sweeps {
        sweeps += 1;
        improved = false;

        'sweep: for i in 0..n - 1 {
            for j in i + 2..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                let delta = two_opt_delta(&current, depot, distances, i, j);
                if delta < -limits.min_improvement {
                    current[i + 1..=j].reverse();
                    improved = true;
                    idle = 0;
                    moves += 1;
                    break 'sweep;
                }
            }
        }

        if !improved {
            idle += 1;
        }
    }

    let dist = route_distance(&current, depot, distances);
    if moves > 0 {
        debug!(stops = n, sweeps, moves, distance = dist, "2-opt finished");
    }
    (current, dist)
}

/// Reorders customer stops around a depot with 2-opt.
///
/// Convenience wrapper over [`two_opt_improve`] for callers holding
/// customers rather than matrix indices.
pub fn optimize_stops(
    stops: &[Customer],
    depot: Coordinate,
    metric: DistanceMetric,
    limits: &TwoOptLimits,
) -> Vec<Customer> {
    if stops.len() < 2 {
        return stops.to_vec();
    }
    let distances = DistanceMatrix::from_locations(depot, stops, metric);
    let order: Vec<usize> = (1..=stops.len()).collect();
    let (improved, _) = two_opt_improve(&order, DistanceMatrix::DEPOT, &distances, limits);
    improved.into_iter().map(|idx| stops[idx - 1].clone()).collect()
}

/// Computes the distance change from reversing `route[i+1..=j]`.
///
/// Before: ...-route[i] - route[i+1] - ... - route[j] - next_j-...
/// After:  ...-route[i] - route[j] - ... - route[i+1] - next_j-...
fn two_opt_delta(
    route: &[usize],
    depot: usize,
    distances: &DistanceMatrix,
    i: usize,
    j: usize,
) -> f64 {
    let next_j = route.get(j + 1).copied().unwrap_or(depot);

    let old_cost = distances.get(route[i], route[i + 1]) + distances.get(route[j], next_j);
    let new_cost = distances.get(route[i], route[j]) + distances.get(route[i + 1], next_j);

    new_cost - old_cost
}

/// Computes the total distance of a route: `depot → route[0] → ... → route[n-1] → depot`.
pub fn route_distance(route: &[usize], depot: usize, distances: &DistanceMatrix) -> f64 {
    let (Some(&first), Some(&last)) = (route.first(), route.last()) else {
        return 0.0;
    };
    let inner: f64 = route.windows(2).map(|w| distances.get(w[0], w[1])).sum();
    distances.get(depot, first) + inner + distances.get(last, depot)
}
