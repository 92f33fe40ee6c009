//! Great-circle distance and bearing on a spherical Earth.

use crate::models::Coordinate;

/// Mean Earth radius in meters.
pub const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// Meters spanned by one degree of latitude.
pub const METERS_PER_DEGREE_LAT: f64 = EARTH_RADIUS_METERS * std::f64::consts::PI / 180.0;

/// Haversine distance between two coordinates in meters.
///
/// # Examples
///
/// ```
/// use u_schoolbus::models::Coordinate;
/// use u_schoolbus::distance::haversine_meters;
///
/// let seoul = Coordinate::new(37.5665, 126.9780);
/// let busan = Coordinate::new(35.1796, 129.0756);
/// let d = haversine_meters(&seoul, &busan);
/// assert!((d - 325_000.0).abs() < 5_000.0);
/// ```
pub fn haversine_meters(from: &Coordinate, to: &Coordinate) -> f64 {
    let d_lat = (to.lat - from.lat).to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();

    let a = (d_lat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (d_lng / 2.0).sin().powi(2);
    // Rounding can push `a` just past 1 for antipodal points.
    let c = 2.0 * a.clamp(0.0, 1.0).sqrt().asin();

    EARTH_RADIUS_METERS * c
}

/// Initial bearing from `from` to `to` in degrees, normalized to `[0, 360)`.
///
/// 0° is north, 90° is east. Returns 0 for identical points.
pub fn initial_bearing(from: &Coordinate, to: &Coordinate) -> f64 {
    let lat1 = from.lat.to_radians();
    let lat2 = to.lat.to_radians();
    let d_lng = (to.lng - from.lng).to_radians();

    let y = d_lng.sin() * lat2.cos();
    let x = lat1.cos() * lat2.sin() - lat1.sin() * lat2.cos() * d_lng.cos();

    let bearing = y.atan2(x).to_degrees().rem_euclid(360.0);
    if bearing >= 360.0 {
        0.0
    } else {
        bearing
    }
}

/// Returns the coordinate `north_meters` north and `east_meters` east of `origin`.
///
/// Uses a local flat-earth approximation; accurate to well under a meter
/// for offsets of a few kilometers away from the poles.
pub fn offset_meters(origin: &Coordinate, north_meters: f64, east_meters: f64) -> Coordinate {
    let d_lat = north_meters / METERS_PER_DEGREE_LAT;
    let d_lng = east_meters / (METERS_PER_DEGREE_LAT * origin.lat.to_radians().cos());
    Coordinate::new(origin.lat + d_lat, origin.lng + d_lng)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_haversine_same_point() {
        let p = Coordinate::new(37.5, 127.0);
        assert!(haversine_meters(&p, &p).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_symmetric() {
        let a = Coordinate::new(37.50, 127.00);
        let b = Coordinate::new(37.51, 127.02);
        assert!((haversine_meters(&a, &b) - haversine_meters(&b, &a)).abs() < 1e-9);
    }

    #[test]
    fn test_haversine_one_degree_latitude() {
        let a = Coordinate::new(10.0, 20.0);
        let b = Coordinate::new(11.0, 20.0);
        assert!((haversine_meters(&a, &b) - METERS_PER_DEGREE_LAT).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_cardinal() {
        let origin = Coordinate::new(10.0, 20.0);
        let north = Coordinate::new(10.1, 20.0);
        let east = Coordinate::new(10.0, 20.1);
        let south = Coordinate::new(9.9, 20.0);
        let west = Coordinate::new(10.0, 19.9);
        assert!(initial_bearing(&origin, &north).abs() < 1e-6);
        assert!((initial_bearing(&origin, &east) - 90.0).abs() < 0.1);
        assert!((initial_bearing(&origin, &south) - 180.0).abs() < 1e-6);
        assert!((initial_bearing(&origin, &west) - 270.0).abs() < 0.1);
    }

    #[test]
    fn test_bearing_range() {
        let a = Coordinate::new(37.5, 127.0);
        let b = Coordinate::new(37.4, 126.9);
        let bearing = initial_bearing(&a, &b);
        assert!((0.0..360.0).contains(&bearing));
    }

    #[test]
    fn test_offset_round_trip_distance() {
        let origin = Coordinate::new(37.5, 127.0);
        let p = offset_meters(&origin, 300.0, 400.0);
        assert!((haversine_meters(&origin, &p) - 500.0).abs() < 0.5);
    }
}
