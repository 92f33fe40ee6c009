//! Student input records.

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A student to be assigned to a pick-up stop.
///
/// Students are read-only input; the optimizer never mutates them. A student
/// whose location is missing or invalid may still carry a free-text address
/// for the coordinate-enrichment collaborator.
///
/// # Examples
///
/// ```
/// use u_schoolbus::models::Student;
///
/// let s = Student::new(7, 37.5665, 126.9780);
/// assert_eq!(s.id, 7);
/// assert!(s.usable_location().is_some());
///
/// let missing = Student::without_location(8).with_address("12 Elm St");
/// assert!(missing.usable_location().is_none());
/// assert_eq!(missing.address.as_deref(), Some("12 Elm St"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    /// Stable student identifier.
    pub id: usize,
    /// Home coordinate, if known.
    #[serde(default)]
    pub location: Option<Coordinate>,
    /// Free-text home address, if known.
    #[serde(default)]
    pub address: Option<String>,
    /// Inactive students are ignored by the optimizer.
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

impl Student {
    /// Creates an active student at the given coordinate.
    pub fn new(id: usize, lat: f64, lng: f64) -> Self {
        Self::at(id, Coordinate::new(lat, lng))
    }

    /// Creates an active student at the given coordinate.
    pub fn at(id: usize, location: Coordinate) -> Self {
        Self {
            id,
            location: Some(location),
            address: None,
            active: true,
        }
    }

    /// Creates an active student with no known coordinate.
    pub fn without_location(id: usize) -> Self {
        Self {
            id,
            location: None,
            address: None,
            active: true,
        }
    }

    /// Sets the free-text address.
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    /// Marks the student inactive.
    pub fn inactive(mut self) -> Self {
        self.active = false;
        self
    }

    /// Returns the location if present and valid.
    pub fn usable_location(&self) -> Option<Coordinate> {
        self.location.filter(Coordinate::is_valid)
    }
}
