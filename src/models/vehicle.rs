//! Vehicle type with capacity.

use serde::{Deserialize, Serialize};

use super::clamp_quantity;

/// A vehicle that services at most one route per solve.
///
/// # Examples
///
/// ```
/// use savings_routing::models::Vehicle;
///
/// let v = Vehicle::new(0, "Box truck", 200.0, "kg");
/// assert_eq!(v.id(), 0);
/// assert_eq!(v.capacity(), 200.0);
/// assert_eq!(v.capacity_unit(), "kg");
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    id: usize,
    name: String,
    #[serde(deserialize_with = "super::deserialize_quantity")]
    capacity: f64,
    capacity_unit: String,
    notes: Option<String>,
}

impl Vehicle {
    /// Creates a vehicle with the given ID and capacity.
    ///
    /// Negative or non-finite capacity is clamped to zero; such a vehicle
    /// is left out of planning.
    pub fn new(
        id: usize,
        name: impl Into<String>,
        capacity: f64,
        capacity_unit: impl Into<String>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            capacity: clamp_quantity(capacity),
            capacity_unit: capacity_unit.into(),
            notes: None,
        }
    }

    /// Sets free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Vehicle ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Maximum load capacity.
    pub fn capacity(&self) -> f64 {
        self.capacity
    }

    /// Returns `true` if the vehicle can carry any load at all.
    pub fn is_usable(&self) -> bool {
        self.capacity > 0.0
    }

    /// Unit label for capacity, e.g. "kg" or "box". Reporting only.
    pub fn capacity_unit(&self) -> &str {
        &self.capacity_unit
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// Largest capacity across the fleet, or `0.0` for an empty fleet.
pub(crate) fn max_capacity(vehicles: &[Vehicle]) -> f64 {
    vehicles
        .iter()
        .map(Vehicle::capacity)
        .fold(0.0, f64::max)
}
