//! Priority-first nearest-neighbor route ordering.
//!
//! High-priority sites are visited before every other site. Within each tier
//! the next stop is the one closest to the last located stop (initially the
//! worker's position), and the distance chain carries across the tier boundary.
//! This is a greedy O(n²) approximation sized for tens of stops, not an exact
//! traveling-salesman solution.

use fieldroute_core::error::{FieldrouteError, Result};
use fieldroute_core::models::ServiceType;

use crate::distance::distance_meters;
use crate::models::{Coordinate, Position, PriorityTier, RouteStop, Site};

/// Order the incomplete sites into a visiting sequence starting at `position`.
///
/// Sites already completed today are left out. Sites without a coordinate are
/// placed last within their tier, in input order, and do not move the chain.
/// Distance ties go to the earlier site in `sites`.
pub fn optimize_route(position: Option<&Position>, sites: &[Site]) -> Result<Vec<RouteStop>> {
    let start = position.ok_or(FieldrouteError::NoPositionAvailable)?.coordinate;

    let (high_priority, others): (Vec<&Site>, Vec<&Site>) = sites
        .iter()
        .filter(|site| !site.completed_today)
        .partition(|site| site.priority == PriorityTier::High);

    tracing::debug!(
        high_priority = high_priority.len(),
        others = others.len(),
        skipped_completed = sites.len() - high_priority.len() - others.len(),
        "Optimizing route"
    );

    let mut current = start;
    let mut ordered = Vec::with_capacity(high_priority.len() + others.len());
    visit_nearest_first(high_priority, &mut current, &mut ordered);
    visit_nearest_first(others, &mut current, &mut ordered);

    let mut previous = Some(start);
    let stops = ordered
        .into_iter()
        .enumerate()
        .map(|(sequence_index, site)| {
            let distance_from_previous_meters = match (previous, site.coordinate) {
                (Some(from), Some(to)) => Some(distance_meters(from, to)),
                _ => None,
            };
            if site.coordinate.is_some() {
                previous = site.coordinate;
            }
            RouteStop { site: site.clone(), distance_from_previous_meters, sequence_index }
        })
        .collect();

    Ok(stops)
}

/// Greedily append `remaining` to `ordered`, always taking the located site
/// nearest to `current` and advancing `current` to it.
fn visit_nearest_first<'a>(
    mut remaining: Vec<&'a Site>,
    current: &mut Coordinate,
    ordered: &mut Vec<&'a Site>,
) {
    while !remaining.is_empty() {
        let mut nearest: Option<(usize, Coordinate, f64)> = None;

        for (idx, site) in remaining.iter().enumerate() {
            let Some(coordinate) = site.coordinate else {
                continue;
            };
            let distance = distance_meters(*current, coordinate);
            // Strict comparison keeps the earliest site on ties
            if nearest.map_or(true, |(_, _, best)| distance < best) {
                nearest = Some((idx, coordinate, distance));
            }
        }

        match nearest {
            Some((idx, coordinate, _)) => {
                ordered.push(remaining.remove(idx));
                *current = coordinate;
            }
            None => {
                // Only unlocated sites are left in this tier
                tracing::debug!(count = remaining.len(), "Appending sites without coordinates");
                ordered.append(&mut remaining);
            }
        }
    }
}

/// Total length of the route in meters, starting from `start`.
///
/// Unlocated stops contribute nothing and the chain resumes from the last
/// located point.
pub fn total_route_distance(stops: &[RouteStop], start: Option<Coordinate>) -> f64 {
    let mut previous = start;
    let mut total = 0.0;

    for coordinate in stops.iter().filter_map(RouteStop::coordinate) {
        if let Some(from) = previous {
            total += distance_meters(from, coordinate);
        }
        previous = Some(coordinate);
    }

    total
}

/// Sites that can receive `service` and are at least as urgent as `min_priority`
pub fn eligible_sites(sites: &[Site], service: ServiceType, min_priority: PriorityTier) -> Vec<Site> {
    sites
        .iter()
        .filter(|site| site.service_capability.supports(service))
        .filter(|site| site.priority.at_least(min_priority))
        .cloned()
        .collect()
}
