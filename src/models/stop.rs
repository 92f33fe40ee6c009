//! Placed stops and student assignments.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::Coordinate;

/// A student's assignment to a stop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentAssignment {
    /// Assigned student.
    pub student_id: usize,
    /// Stop the student walks to.
    pub stop_id: usize,
    /// Great-circle walk distance from home to stop.
    pub walk_distance_meters: f64,
}

/// A pick-up stop produced by stop placement.
///
/// Demand is the number of assigned students. Every assignment refers back
/// to this stop and names a distinct student; deserialization rejects input
/// that breaks either rule.
///
/// # Examples
///
/// ```
/// use u_schoolbus::models::{Coordinate, PlacedStop};
///
/// let mut stop = PlacedStop::new(1, Coordinate::new(37.5, 127.0));
/// stop.assign(10, 120.0);
/// stop.assign(11, 80.0);
/// assert_eq!(stop.demand(), 2);
/// assert_eq!(stop.student_ids(), vec![10, 11]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "PlacedStopRecord")]
pub struct PlacedStop {
    id: usize,
    location: Coordinate,
    assignments: Vec<StudentAssignment>,
}

/// Wire form of [`PlacedStop`], checked before use.
#[derive(Deserialize)]
struct PlacedStopRecord {
    id: usize,
    location: Coordinate,
    assignments: Vec<StudentAssignment>,
}

impl TryFrom<PlacedStopRecord> for PlacedStop {
    type Error = String;

    fn try_from(record: PlacedStopRecord) -> Result<Self, Self::Error> {
        let mut seen = HashSet::new();
        for a in &record.assignments {
            if a.stop_id != record.id {
                return Err(format!(
                    "stop {}: assignment of student {} names stop {}",
                    record.id, a.student_id, a.stop_id
                ));
            }
            if !seen.insert(a.student_id) {
                return Err(format!(
                    "stop {}: student {} assigned twice",
                    record.id, a.student_id
                ));
            }
        }
        Ok(Self {
            id: record.id,
            location: record.location,
            assignments: record.assignments,
        })
    }
}

impl PlacedStop {
    /// Creates a stop with no assigned students.
    pub fn new(id: usize, location: Coordinate) -> Self {
        Self {
            id,
            location,
            assignments: Vec::new(),
        }
    }

    /// Appends an assignment for `student_id`.
    pub fn assign(&mut self, student_id: usize, walk_distance_meters: f64) {
        self.assignments.push(StudentAssignment {
            student_id,
            stop_id: self.id,
            walk_distance_meters,
        });
    }

    /// Stop identifier.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Stop location.
    pub fn location(&self) -> Coordinate {
        self.location
    }

    /// Assignments in ascending walk-distance order.
    pub fn assignments(&self) -> &[StudentAssignment] {
        &self.assignments
    }

    /// Number of students served.
    pub fn demand(&self) -> i32 {
        i32::try_from(self.assignments.len()).unwrap_or(i32::MAX)
    }

    /// Ids of the assigned students.
    pub fn student_ids(&self) -> Vec<usize> {
        self.assignments.iter().map(|a| a.student_id).collect()
    }

    /// Longest walk among assigned students, or 0 for an empty stop.
    pub fn max_walk_meters(&self) -> f64 {
        self.assignments
            .iter()
            .map(|a| a.walk_distance_meters)
            .fold(0.0, f64::max)
    }
}

/// A stop reduced to what routing needs: where, and how many students.
///
/// # Examples
///
/// ```
/// use u_schoolbus::models::{Coordinate, PlacedStop, StopDemand};
///
/// let mut stop = PlacedStop::new(4, Coordinate::new(37.5, 127.0));
/// stop.assign(10, 0.0);
/// stop.assign(11, 35.0);
/// let demand = StopDemand::from(&stop);
/// assert_eq!(demand, StopDemand::new(4, Coordinate::new(37.5, 127.0), 2));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StopDemand {
    /// Stop identifier.
    pub stop_id: usize,
    /// Stop location.
    pub location: Coordinate,
    /// Students to pick up.
    pub demand: i32,
}

impl StopDemand {
    /// Creates a demand record.
    pub fn new(stop_id: usize, location: Coordinate, demand: i32) -> Self {
        Self {
            stop_id,
            location,
            demand,
        }
    }
}

impl From<&PlacedStop> for StopDemand {
    fn from(stop: &PlacedStop) -> Self {
        Self::new(stop.id(), stop.location(), stop.demand())
    }
}
