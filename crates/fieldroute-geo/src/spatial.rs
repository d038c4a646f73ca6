use geo::algorithm::bounding_rect::BoundingRect;
use geo::{MultiPoint, Point};

use crate::models::{from_geo_point, to_geo_point, RouteBounds, RouteStop};

/// Bounding box around every located stop, for fitting a map viewport.
/// Returns None when no stop has a coordinate.
pub fn route_bounds(stops: &[RouteStop]) -> Option<RouteBounds> {
    let points: Vec<Point> = stops.iter().filter_map(RouteStop::coordinate).map(to_geo_point).collect();

    let rect = MultiPoint::new(points).bounding_rect()?;

    Some(RouteBounds {
        south_west: from_geo_point(rect.min().into()),
        north_east: from_geo_point(rect.max().into()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Coordinate, Site};

    fn stop(site: Site, sequence_index: usize) -> RouteStop {
        RouteStop { site, distance_from_previous_meters: None, sequence_index }
    }

    #[test]
    fn test_bounds_cover_all_located_stops() {
        let stops = vec![
            stop(Site::new("a", "A").with_coordinate(44.90, -93.30), 0),
            stop(Site::new("b", "B"), 1),
            stop(Site::new("c", "C").with_coordinate(45.05, -93.10), 2),
            stop(Site::new("d", "D").with_coordinate(44.95, -93.40), 3),
        ];

        let bounds = route_bounds(&stops).unwrap();

        assert_eq!(bounds.south_west, Coordinate::new(44.90, -93.40));
        assert_eq!(bounds.north_east, Coordinate::new(45.05, -93.10));
    }

    #[test]
    fn test_single_stop_has_degenerate_bounds() {
        let stops = vec![stop(Site::new("a", "A").with_coordinate(44.9, -93.3), 0)];

        let bounds = route_bounds(&stops).unwrap();
        assert_eq!(bounds.south_west, bounds.north_east);
    }

    #[test]
    fn test_no_located_stops() {
        assert!(route_bounds(&[]).is_none());
        assert!(route_bounds(&[stop(Site::new("a", "A"), 0)]).is_none());
    }
}
