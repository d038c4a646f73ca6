//! Stop completion tracking for the active route.
//!
//! Completion marks here are local to the session and independent of the
//! backend's "completed today" flag. The route and its marks are only ever
//! replaced or cleared together.

use std::collections::HashSet;

use crate::models::{RouteProgress, RouteStop, SiteId};

/// The active optimized route and the stops marked done during this session
#[derive(Debug, Clone, Default)]
pub struct RouteSession {
    stops: Vec<RouteStop>,
    completed: HashSet<SiteId>,
}

impl RouteSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a freshly optimized route, discarding the previous
    /// route and every mark made against it
    pub fn activate(&mut self, stops: Vec<RouteStop>) {
        tracing::debug!(stops = stops.len(), "Activating route");
        self.stops = stops;
        self.completed.clear();
    }

    /// Clear the route and the completion marks
    pub fn reset(&mut self) {
        self.stops.clear();
        self.completed.clear();
    }

    pub fn is_active(&self) -> bool {
        !self.stops.is_empty()
    }

    pub fn stops(&self) -> &[RouteStop] {
        &self.stops
    }

    pub fn completed_ids(&self) -> &HashSet<SiteId> {
        &self.completed
    }

    /// Flip the local mark for `site_id`. Returns whether it is now marked.
    pub fn toggle_complete(&mut self, site_id: &SiteId) -> bool {
        if self.completed.remove(site_id) {
            false
        } else {
            self.completed.insert(site_id.clone());
            true
        }
    }

    pub fn is_marked(&self, site_id: &SiteId) -> bool {
        self.completed.contains(site_id)
    }

    /// Done either according to the backend or by a local mark
    pub fn is_effectively_completed(&self, stop: &RouteStop) -> bool {
        stop.site.completed_today || self.is_marked(&stop.site.id)
    }

    /// First stop in sequence that is not yet done
    pub fn next_stop(&self) -> Option<&RouteStop> {
        self.stops.iter().find(|stop| !self.is_effectively_completed(stop))
    }

    pub fn progress(&self) -> RouteProgress {
        let mut completed = 0;
        let mut remaining_distance_meters = 0.0;

        for stop in &self.stops {
            if self.is_effectively_completed(stop) {
                completed += 1;
            } else {
                remaining_distance_meters += stop.distance_from_previous_meters.unwrap_or(0.0);
            }
        }

        RouteProgress { completed, total: self.stops.len(), remaining_distance_meters }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Site;
    use proptest::prelude::*;

    fn route() -> Vec<RouteStop> {
        ["a", "b", "c"]
            .iter()
            .enumerate()
            .map(|(idx, id)| RouteStop {
                site: Site::new(*id, id.to_uppercase()),
                distance_from_previous_meters: Some(100.0 * (idx as f64 + 1.0)),
                sequence_index: idx,
            })
            .collect()
    }

    #[test]
    fn test_toggle_is_a_flip() {
        let mut session = RouteSession::new();
        session.activate(route());
        let id = SiteId::new("b");

        assert!(session.toggle_complete(&id));
        assert!(session.is_marked(&id));
        assert!(!session.toggle_complete(&id));
        assert!(!session.is_marked(&id));
    }

    #[test]
    fn test_activate_clears_previous_marks() {
        let mut session = RouteSession::new();
        session.activate(route());
        session.toggle_complete(&SiteId::new("a"));

        session.activate(route());

        assert!(session.completed_ids().is_empty());
        assert_eq!(session.stops().len(), 3);
    }

    #[test]
    fn test_reset_clears_route_and_marks() {
        let mut session = RouteSession::new();
        session.activate(route());
        session.toggle_complete(&SiteId::new("c"));

        session.reset();

        assert!(!session.is_active());
        assert!(session.completed_ids().is_empty());
        assert!(session.next_stop().is_none());
    }

    #[test]
    fn test_effective_completion_includes_backend_flag() {
        let mut stops = route();
        stops[0].site.completed_today = true;

        let mut session = RouteSession::new();
        session.activate(stops);

        assert!(session.is_effectively_completed(&session.stops()[0].clone()));
        assert_eq!(session.next_stop().map(|s| s.site.id.as_str()), Some("b"));

        session.toggle_complete(&SiteId::new("b"));
        assert_eq!(session.next_stop().map(|s| s.site.id.as_str()), Some("c"));
    }

    #[test]
    fn test_progress() {
        let mut session = RouteSession::new();
        session.activate(route());
        session.toggle_complete(&SiteId::new("a"));

        let progress = session.progress();

        assert_eq!(progress.completed, 1);
        assert_eq!(progress.total, 3);
        assert_eq!(progress.remaining_distance_meters, 500.0);
        assert!(!progress.is_finished());

        session.toggle_complete(&SiteId::new("b"));
        session.toggle_complete(&SiteId::new("c"));
        assert!(session.progress().is_finished());
    }

    proptest! {
        #[test]
        fn prop_double_toggle_restores_marks(
            marked in proptest::collection::hash_set("[a-e]", 0..5),
            target in "[a-e]",
        ) {
            let mut session = RouteSession::new();
            session.activate(route());
            for id in &marked {
                session.toggle_complete(&SiteId::new(id.clone()));
            }
            let before = session.completed_ids().clone();

            let id = SiteId::new(target);
            session.toggle_complete(&id);
            session.toggle_complete(&id);

            prop_assert_eq!(session.completed_ids(), &before);
        }
    }
}
