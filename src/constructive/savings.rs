//! Savings computation for the Clarke-Wright heuristic.
//!
//! ```text
//! s(i, j) = d(0, i) + d(0, j) - d(i, j)
//! ```
//!
//! # Complexity
//!
//! O(n²) pairs plus O(n² log n) for the sort. This dominates a solve and
//! bounds the heuristic to a few hundred customers per call.

use tracing::warn;

use crate::distance::DistanceMatrix;
use crate::models::{max_capacity, Customer, Vehicle};

/// A savings value for merging two customers' routes.
///
/// `i` and `j` are matrix indices (`i < j`, depot = 0).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Saving {
    pub i: usize,
    pub j: usize,
    pub value: f64,
}

/// Splits customers into those some vehicle can carry alone and those no
/// vehicle in the fleet can.
///
/// Input order is preserved in both halves.
pub fn split_serviceable(
    customers: &[Customer],
    vehicles: &[Vehicle],
) -> (Vec<Customer>, Vec<Customer>) {
    let ceiling = max_capacity(vehicles);
    let (serviceable, oversized): (Vec<Customer>, Vec<Customer>) =
        customers.iter().cloned().partition(|c| c.demand() <= ceiling);
    for c in &oversized {
        warn!(
            customer_id = c.id(),
            demand = c.demand(),
            max_capacity = ceiling,
            "customer demand exceeds every vehicle, leaving unassigned"
        );
    }
    (serviceable, oversized)
}

/// Computes all positive savings over the customers of `distances`, sorted
/// by decreasing value.
///
/// Pairs are generated in `(i, j)` lexicographic order and the sort is
/// stable, so equal savings keep that order. Pairs whose saving is zero,
/// negative or NaN (an invalid coordinate) are dropped.
///
/// # Examples
///
/// ```
/// use savings_routing::constructive::compute_savings;
/// use savings_routing::distance::DistanceMatrix;
///
/// // depot, a at 3, b at 4 on a line
/// let pos = [0.0f64, 3.0, 4.0];
/// let mut dm = DistanceMatrix::new(3);
/// for i in 0..3 {
///     for j in 0..3 {
///         dm.set(i, j, (pos[i] - pos[j]).abs());
///     }
/// }
/// let savings = compute_savings(&dm);
/// assert_eq!(savings.len(), 1);
/// assert_eq!(savings[0].value, 6.0);
/// ```
pub fn compute_savings(distances: &DistanceMatrix) -> Vec<Saving> {
    let n = distances.size();
    if n <= 2 {
        return Vec::new();
    }
    let depot = DistanceMatrix::DEPOT;
    let num_customers = n - 1;

    let mut savings = Vec::with_capacity(num_customers * (num_customers - 1) / 2);
    for i in 1..n {
        for j in (i + 1)..n {
            let s = distances.get(depot, i) + distances.get(depot, j) - distances.get(i, j);
            if s > 0.0 {
                savings.push(Saving { i, j, value: s });
            }
        }
    }

    savings.sort_by(|a, b| b.value.total_cmp(&a.value));
    savings
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::DistanceMetric;
    use crate::models::Coordinate;

    fn line_matrix() -> DistanceMatrix {
        // depot at 0, customers at 1, 2, 3 on a line
        let pos = [0.0f64, 1.0, 2.0, 3.0];
        let mut dm = DistanceMatrix::new(4);
        for i in 0..4 {
            for j in 0..4 {
                dm.set(i, j, (pos[i] - pos[j]).abs());
            }
        }
        dm
    }

    #[test]
    fn test_savings_formula_and_order() {
        let savings = compute_savings(&line_matrix());
        // s(1,2)=2, s(1,3)=2, s(2,3)=4
        assert_eq!(savings.len(), 3);
        assert_eq!((savings[0].i, savings[0].j), (2, 3));
        assert_eq!(savings[0].value, 4.0);
        // tie keeps generation order
        assert_eq!((savings[1].i, savings[1].j), (1, 2));
        assert_eq!((savings[2].i, savings[2].j), (1, 3));
    }

    #[test]
    fn test_non_positive_savings_dropped() {
        // customers on opposite sides of the depot save nothing
        let pos = [0.0f64, -1.0, 1.0];
        let mut dm = DistanceMatrix::new(3);
        for i in 0..3 {
            for j in 0..3 {
                dm.set(i, j, (pos[i] - pos[j]).abs());
            }
        }
        assert!(compute_savings(&dm).is_empty());
    }

    #[test]
    fn test_too_few_customers() {
        assert!(compute_savings(&DistanceMatrix::new(1)).is_empty());
        assert!(compute_savings(&DistanceMatrix::new(2)).is_empty());
    }

    #[test]
    fn test_invalid_coordinate_pairs_dropped() {
        let customers = vec![
            Customer::new(1, "ok", Coordinate::new(0.0, 1.0), 1.0),
            Customer::new(2, "bad", Coordinate::new(200.0, 1.0), 1.0),
            Customer::new(3, "ok", Coordinate::new(0.0, 2.0), 1.0),
        ];
        let dm = DistanceMatrix::from_locations(
            Coordinate::new(0.0, 0.0),
            &customers,
            DistanceMetric::Haversine,
        );
        let savings = compute_savings(&dm);
        assert_eq!(savings.len(), 1);
        assert_eq!((savings[0].i, savings[0].j), (1, 3));
    }

    #[test]
    fn test_split_serviceable() {
        let customers = vec![
            Customer::new(1, "a", Coordinate::new(0.0, 0.0), 10.0),
            Customer::new(2, "b", Coordinate::new(0.0, 0.0), 60.0),
            Customer::new(3, "c", Coordinate::new(0.0, 0.0), 50.0),
        ];
        let fleet = vec![
            Vehicle::new(1, "small", 20.0, "kg"),
            Vehicle::new(2, "big", 50.0, "kg"),
        ];
        let (ok, oversized) = split_serviceable(&customers, &fleet);
        assert_eq!(ok.iter().map(Customer::id).collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(oversized.iter().map(Customer::id).collect::<Vec<_>>(), vec![2]);
    }
}
