//! Candidate stop sites and their coverage.
//!
//! Every eligible student's home is a candidate site. Students sharing an
//! identical coordinate collapse into one site. Each site precomputes the
//! students within walking radius, ordered by `(distance, student order)`,
//! so a round only has to skip already-covered students.

use std::cmp::Ordering;

use crate::distance::{haversine_meters, METERS_PER_DEGREE_LAT};
use crate::models::Coordinate;

/// A student that passed eligibility checks. Indices into the eligible list
/// follow ascending student id.
#[derive(Debug, Clone)]
pub(crate) struct EligibleStudent {
    pub id: usize,
    pub location: Coordinate,
}

/// A candidate stop location.
#[derive(Debug, Clone)]
pub(crate) struct Site {
    pub location: Coordinate,
    /// Eligible students living exactly here.
    pub residents: Vec<usize>,
    /// Eligible students within the walking radius, nearest first.
    pub neighbors: Vec<(usize, f64)>,
}

/// Capped coverage of one site in the current round.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Score {
    pub site: usize,
    pub count: usize,
    pub total_walk: f64,
}

impl Score {
    /// Larger coverage wins, then shorter total walk (equal counts make this
    /// the average), then the lexicographically lower site.
    pub fn beats(&self, other: &Score) -> bool {
        match self.count.cmp(&other.count) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.total_walk.total_cmp(&other.total_walk) {
                Ordering::Less => true,
                Ordering::Greater => false,
                Ordering::Equal => self.site < other.site,
            },
        }
    }
}

/// Collapses students into sites ordered by `(lat, lng)` and computes each
/// site's neighbor list.
///
/// Returns the sites and, for every eligible student, the site it lives at.
pub(crate) fn build_sites(students: &[EligibleStudent], radius: f64) -> (Vec<Site>, Vec<usize>) {
    let mut order: Vec<usize> = (0..students.len()).collect();
    order.sort_by(|&a, &b| {
        students[a]
            .location
            .total_cmp(&students[b].location)
            .then(a.cmp(&b))
    });

    let mut sites: Vec<Site> = Vec::new();
    let mut site_of = vec![0; students.len()];
    for idx in order.iter().copied() {
        let location = students[idx].location;
        match sites.last_mut() {
            Some(site) if site.location.same_point(&location) => site.residents.push(idx),
            _ => sites.push(Site {
                location,
                residents: vec![idx],
                neighbors: Vec::new(),
            }),
        }
        site_of[idx] = sites.len() - 1;
    }

    // `order` is sorted by latitude first, so it doubles as a latitude index.
    // Great-circle distance is never shorter than the meridian distance,
    // which makes the latitude band an exact pre-filter.
    let band = radius / METERS_PER_DEGREE_LAT * (1.0 + 1e-9) + 1e-12;
    for site in sites.iter_mut() {
        let lo = site.location.lat - band;
        let hi = site.location.lat + band;
        let start = order.partition_point(|&i| students[i].location.lat < lo);

        let mut neighbors = Vec::new();
        for &idx in &order[start..] {
            let loc = students[idx].location;
            if loc.lat > hi {
                break;
            }
            let d = haversine_meters(&site.location, &loc);
            if d <= radius {
                neighbors.push((idx, d));
            }
        }
        neighbors.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));
        site.neighbors = neighbors;
    }

    (sites, site_of)
}

impl Site {
    /// Scores this site against the still-uncovered students.
    pub fn score(&self, site: usize, covered: &[bool], capacity: usize) -> Score {
        let mut count = 0;
        let mut total_walk = 0.0;
        for &(_, d) in self.uncovered_neighbors(covered).take(capacity) {
            count += 1;
            total_walk += d;
        }
        Score {
            site,
            count,
            total_walk,
        }
    }

    /// The students this site would serve, nearest first, capped.
    pub fn coverage(&self, covered: &[bool], capacity: usize) -> Vec<(usize, f64)> {
        self.uncovered_neighbors(covered)
            .take(capacity)
            .copied()
            .collect()
    }

    fn uncovered_neighbors<'a>(
        &'a self,
        covered: &'a [bool],
    ) -> impl Iterator<Item = &'a (usize, f64)> + 'a {
        self.neighbors.iter().filter(move |(idx, _)| !covered[*idx])
    }
}
