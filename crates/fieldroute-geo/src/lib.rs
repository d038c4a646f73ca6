//! Fieldroute Geo - Distances, route ordering, and route progress
//!
//! This crate holds the pure, synchronous route logic: Haversine distances,
//! the priority-first nearest-neighbor optimizer, and the per-session stop
//! completion tracker. Nothing here performs I/O or suspends.

pub mod distance;
pub mod models;
pub mod optimizer;
pub mod progress;
pub mod spatial;

pub use distance::{distance_meters, format_distance, EARTH_RADIUS_METERS};
pub use optimizer::{eligible_sites, optimize_route, total_route_distance};
pub use progress::RouteSession;
pub use spatial::route_bounds;
