//! Geometry models for fieldroute-geo.
//!
//! This module re-exports canonical types from `fieldroute-core` and provides
//! conversions to and from the `geo` crate.

use geo::Point;

// Re-export canonical types from fieldroute-core
pub use fieldroute_core::models::{
    Coordinate, Position, PriorityTier, RouteBounds, RouteProgress, RouteStop, Site, SiteId,
};

/// Convert a coordinate to a geo::Point (x = longitude, y = latitude)
pub fn to_geo_point(coordinate: Coordinate) -> Point {
    Point::new(coordinate.longitude, coordinate.latitude)
}

/// Convert a geo::Point back to a coordinate
pub fn from_geo_point(point: Point) -> Coordinate {
    Coordinate::new(point.y(), point.x())
}
