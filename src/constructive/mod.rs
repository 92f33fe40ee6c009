//! Constructive heuristics for building initial routes.
//!
//! - [`nearest_neighbor`] — Capacity-bounded greedy nearest-neighbor, O(n²)

mod nearest_neighbor;

pub use nearest_neighbor::{nearest_neighbor, Construction};
