//! Local search operators for shortening routes.
//!
//! Both operators reorder nodes within one route and never move a node to
//! another route, so route demand and capacity feasibility are preserved.
//! Each takes a pass budget so improvement always terminates.
//!
//! - [`two_opt_improve`] — Intra-route 2-opt segment reversal
//! - [`or_opt_improve`] — Intra-route segment relocation

mod or_opt;
mod two_opt;

pub use or_opt::{or_opt_improve, route_distance};
pub use two_opt::two_opt_improve;
