//! Integration tests for route optimization and progress tracking
//!
//! These tests drive the optimizer the way a crew's route screen does: build a
//! route from the current position, activate it, and mark stops off.

use fieldroute_core::models::{Coordinate, Position, PriorityTier, ServiceType, Site, SiteId};
use fieldroute_geo::{
    distance_meters, eligible_sites, format_distance, optimize_route, route_bounds,
    total_route_distance, RouteSession,
};
use proptest::prelude::*;

fn downtown_sites() -> Vec<Site> {
    vec![
        Site::new("hosp", "Hennepin Hospital")
            .with_priority(PriorityTier::High)
            .with_coordinate(44.9727, -93.2616),
        Site::new("lib", "Central Library").with_coordinate(44.9799, -93.2707),
        Site::new("mall", "Nicollet Mall Lot")
            .with_priority(PriorityTier::Low)
            .with_coordinate(44.9765, -93.2727),
        Site::new("fire", "Fire Station 1")
            .with_priority(PriorityTier::High)
            .with_coordinate(44.9856, -93.2558),
        Site::new("annex", "Annex (no geocode)").with_priority(PriorityTier::Normal),
        Site::new("school", "Elementary School")
            .with_coordinate(44.9702, -93.2801)
            .completed(true),
    ]
}

fn truck_position() -> Position {
    Position::new(Coordinate::new(44.9778, -93.2650), 8.0, 1_700_000_000_000)
}

#[test]
fn test_priority_tiers_and_chain() {
    let stops = optimize_route(Some(&truck_position()), &downtown_sites()).unwrap();
    let ids: Vec<&str> = stops.iter().map(|s| s.site.id.as_str()).collect();

    // Both high-priority sites first, completed school dropped, unlocated annex
    // last within the non-high tier
    assert_eq!(ids.len(), 5);
    assert!(ids[..2].contains(&"hosp") && ids[..2].contains(&"fire"));
    assert!(!ids.contains(&"school"));
    assert_eq!(ids[4], "annex");

    for (idx, stop) in stops.iter().enumerate() {
        assert_eq!(stop.sequence_index, idx);
    }
}

#[test]
fn test_route_session_walkthrough() {
    let position = truck_position();
    let stops = optimize_route(Some(&position), &downtown_sites()).unwrap();
    let total = total_route_distance(&stops, Some(position.coordinate));
    assert!(total > 0.0);
    assert!(format_distance(total).ends_with("km") || format_distance(total).ends_with('m'));

    let mut session = RouteSession::new();
    session.activate(stops.clone());

    let first = session.next_stop().unwrap().site.id.clone();
    assert_eq!(first, stops[0].site.id);

    session.toggle_complete(&first);
    assert_eq!(session.next_stop().unwrap().site.id, stops[1].site.id);
    assert_eq!(session.progress().completed, 1);

    // Re-optimizing replaces the route and drops the stale mark
    let reoptimized = optimize_route(Some(&position), &downtown_sites()).unwrap();
    session.activate(reoptimized);
    assert!(!session.is_marked(&first));
    assert_eq!(session.progress().completed, 0);

    let bounds = route_bounds(session.stops()).unwrap();
    assert!(bounds.south_west.latitude <= bounds.north_east.latitude);
}

#[test]
fn test_filter_then_optimize() {
    let sites = eligible_sites(&downtown_sites(), ServiceType::Shoveling, PriorityTier::Normal);
    let stops = optimize_route(Some(&truck_position()), &sites).unwrap();

    assert!(stops.iter().all(|s| s.site.priority != PriorityTier::Low));
    assert!(stops.iter().any(|s| s.site.id == SiteId::new("annex")));
}

#[test]
fn test_first_leg_measured_from_position() {
    let position = truck_position();
    let stops = optimize_route(Some(&position), &downtown_sites()).unwrap();
    let first = stops[0].site.coordinate.unwrap();

    assert_eq!(
        stops[0].distance_from_previous_meters,
        Some(distance_meters(position.coordinate, first))
    );
}

fn arbitrary_site() -> impl Strategy<Value = Site> {
    (
        "[a-z]{6}",
        prop_oneof![Just(PriorityTier::High), Just(PriorityTier::Normal), Just(PriorityTier::Low)],
        proptest::option::of((44.0f64..46.0, -94.0f64..-92.0)),
        any::<bool>(),
    )
        .prop_map(|(id, priority, coordinate, completed)| {
            let site = Site::new(id.clone(), id).with_priority(priority).completed(completed);
            match coordinate {
                Some((lat, lon)) => site.with_coordinate(lat, lon),
                None => site,
            }
        })
}

proptest! {
    #[test]
    fn prop_completed_sites_never_routed(sites in proptest::collection::vec(arbitrary_site(), 0..20)) {
        let stops = optimize_route(Some(&truck_position()), &sites).unwrap();

        prop_assert!(stops.iter().all(|s| !s.site.completed_today));
        prop_assert_eq!(stops.len(), sites.iter().filter(|s| !s.completed_today).count());
    }

    #[test]
    fn prop_high_priority_stops_come_first(sites in proptest::collection::vec(arbitrary_site(), 0..20)) {
        let stops = optimize_route(Some(&truck_position()), &sites).unwrap();

        let first_other = stops.iter().position(|s| s.site.priority != PriorityTier::High);
        if let Some(boundary) = first_other {
            prop_assert!(stops[boundary..].iter().all(|s| s.site.priority != PriorityTier::High));
        }
    }
}
