//! Dense distance matrix.

use crate::models::Coordinate;

use super::haversine_meters;

/// A dense n×n matrix of great-circle distances in meters, stored row-major.
///
/// Index 0 is conventionally the depot; nodes follow in the order given.
///
/// # Examples
///
/// ```
/// use u_schoolbus::models::Coordinate;
/// use u_schoolbus::distance::DistanceMatrix;
///
/// let points = vec![
///     Coordinate::new(37.50, 127.00),
///     Coordinate::new(37.51, 127.00),
///     Coordinate::new(37.52, 127.00),
/// ];
/// let dm = DistanceMatrix::from_coordinates(&points);
/// assert_eq!(dm.size(), 3);
/// assert!(dm.get(0, 2) > dm.get(0, 1));
/// ```
#[derive(Debug, Clone)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes a haversine distance matrix from coordinates.
    pub fn from_coordinates(points: &[Coordinate]) -> Self {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let d = haversine_meters(&points[i], &points[j]);
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns the nearest of `candidates` to `from`, lowest index on ties.
    ///
    /// Returns `None` if `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates.iter().copied().min_by(|&a, &b| {
            self.get(from, a)
                .total_cmp(&self.get(from, b))
                .then(a.cmp(&b))
        })
    }
}
