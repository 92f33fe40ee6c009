//! Geographic coordinate type.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

/// A WGS84 latitude/longitude pair in decimal degrees.
///
/// # Examples
///
/// ```
/// use u_schoolbus::models::Coordinate;
///
/// let school = Coordinate::new(37.5665, 126.9780);
/// assert!(school.is_valid());
/// assert!(!Coordinate::new(0.0, 0.0).is_valid());
/// assert!(!Coordinate::new(91.0, 10.0).is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    /// Latitude in degrees, positive north.
    pub lat: f64,
    /// Longitude in degrees, positive east.
    pub lng: f64,
}

impl Coordinate {
    /// Creates a coordinate. No validation is performed; see [`is_valid`](Self::is_valid).
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Returns `true` if this coordinate is usable for distance computation.
    ///
    /// Rejects non-finite values, values outside ±90° / ±180°, and the
    /// exact `(0, 0)` placeholder written by failed geocoding.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
            && !(self.lat == 0.0 && self.lng == 0.0)
    }

    /// Total lexicographic order by `(lat, lng)`.
    pub fn total_cmp(&self, other: &Coordinate) -> Ordering {
        self.lat
            .total_cmp(&other.lat)
            .then_with(|| self.lng.total_cmp(&other.lng))
    }

    /// Returns `true` if both components are bit-identical.
    pub fn same_point(&self, other: &Coordinate) -> bool {
        self.total_cmp(other) == Ordering::Equal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_coordinate() {
        assert!(Coordinate::new(37.5, 127.0).is_valid());
        assert!(Coordinate::new(-90.0, 180.0).is_valid());
        assert!(Coordinate::new(0.0, 12.0).is_valid());
    }

    #[test]
    fn test_invalid_coordinate() {
        assert!(!Coordinate::new(f64::NAN, 127.0).is_valid());
        assert!(!Coordinate::new(37.5, f64::INFINITY).is_valid());
        assert!(!Coordinate::new(90.1, 0.5).is_valid());
        assert!(!Coordinate::new(10.0, -180.5).is_valid());
        assert!(!Coordinate::new(0.0, 0.0).is_valid());
    }

    #[test]
    fn test_total_cmp_lexicographic() {
        let a = Coordinate::new(1.0, 5.0);
        let b = Coordinate::new(1.0, 6.0);
        let c = Coordinate::new(2.0, 0.0);
        assert_eq!(a.total_cmp(&b), Ordering::Less);
        assert_eq!(b.total_cmp(&c), Ordering::Less);
        assert_eq!(c.total_cmp(&a), Ordering::Greater);
        assert!(a.same_point(&Coordinate::new(1.0, 5.0)));
    }
}
