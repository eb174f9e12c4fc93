//! Customer and depot types.

use serde::{Deserialize, Serialize};

use super::{clamp_quantity, Coordinate};

/// The single depot every route starts and ends at.
///
/// # Examples
///
/// ```
/// use savings_routing::models::{Coordinate, Depot};
///
/// let depot = Depot::new("Main warehouse", Coordinate::new(-6.2, 106.8));
/// assert_eq!(depot.id(), Depot::DEFAULT_ID);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    id: usize,
    name: String,
    location: Coordinate,
    address: Option<String>,
    notes: Option<String>,
}

impl Depot {
    /// Identifier used for the singleton depot.
    pub const DEFAULT_ID: usize = 1;

    /// Creates a depot with the default id.
    pub fn new(name: impl Into<String>, location: Coordinate) -> Self {
        Self {
            id: Self::DEFAULT_ID,
            name: name.into(),
            location,
            address: None,
            notes: None,
        }
    }

    /// Sets the postal address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn location(&self) -> Coordinate {
        self.location
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}

/// A delivery point with a demand to be served by one vehicle.
///
/// Name, address and notes are carried through untouched for reporting.
///
/// # Examples
///
/// ```
/// use savings_routing::models::{Coordinate, Customer};
///
/// let c = Customer::new(7, "Toko Sinar", Coordinate::new(-6.21, 106.82), 12.5);
/// assert_eq!(c.id(), 7);
/// assert_eq!(c.demand(), 12.5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    id: usize,
    name: String,
    location: Coordinate,
    #[serde(deserialize_with = "super::deserialize_quantity")]
    demand: f64,
    address: Option<String>,
    notes: Option<String>,
}

impl Customer {
    /// Creates a new customer.
    ///
    /// Negative or non-finite demand is clamped to zero.
    pub fn new(id: usize, name: impl Into<String>, location: Coordinate, demand: f64) -> Self {
        Self {
            id,
            name: name.into(),
            location,
            demand: clamp_quantity(demand),
            address: None,
            notes: None,
        }
    }

    /// Sets the postal address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Sets free-form notes.
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    /// Customer ID.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Geographic location.
    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// Demand, in the same unit as vehicle capacity.
    pub fn demand(&self) -> f64 {
        self.demand
    }

    pub fn address(&self) -> Option<&str> {
        self.address.as_deref()
    }

    pub fn notes(&self) -> Option<&str> {
        self.notes.as_deref()
    }
}
