use serde::{Deserialize, Serialize};

use super::location::Coordinate;
use super::site::Site;

/// A site placed in an optimized visiting order
///
/// Produced fresh on every optimization run and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouteStop {
    pub site: Site,

    /// Leg length from the previous stop (or the start position for the first
    /// stop). `None` when this stop has no coordinate or no located point
    /// precedes it.
    pub distance_from_previous_meters: Option<f64>,

    pub sequence_index: usize,
}

impl RouteStop {
    pub fn coordinate(&self) -> Option<Coordinate> {
        self.site.coordinate
    }
}

/// Bounding box of the located stops in a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteBounds {
    pub south_west: Coordinate,
    pub north_east: Coordinate,
}

/// Completion summary of an active route
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RouteProgress {
    pub completed: usize,
    pub total: usize,

    /// Sum of the recorded legs leading to stops that are not yet completed
    pub remaining_distance_meters: f64,
}

impl RouteProgress {
    pub fn is_finished(&self) -> bool {
        self.completed == self.total
    }
}
