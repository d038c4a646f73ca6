//! Check-in state machine for one worker and crew category.
//!
//! Two states: not checked in, and checked in at a site since some instant.
//! Every transition is written to the key-value store before returning and
//! the state is reloaded from it on construction. Storage is best-effort: a
//! failed write is logged and the in-memory state stays authoritative; an
//! unreadable record loads as "not checked in".

use fieldroute_core::error::{FieldrouteError, Result};
use fieldroute_core::models::{
    ActiveVisit, CheckInPolicy, CheckInState, CompletedVisit, Position, ServiceType, SiteId,
    StoredCheckIn, WorkCategory,
};
use fieldroute_core::ports::{Clock, KeyValueStore};
use std::sync::Arc;

pub struct CheckInMachine {
    worker_id: String,
    category: WorkCategory,
    policy: CheckInPolicy,
    store: Arc<dyn KeyValueStore>,
    clock: Arc<dyn Clock>,
    state: CheckInState,
}

impl CheckInMachine {
    /// Restore the machine for `worker_id` and `category` from `store`
    pub fn load(
        worker_id: impl Into<String>,
        category: WorkCategory,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let worker_id = worker_id.into();
        let key = Self::storage_key(&worker_id, category);
        let state = restore(store.as_ref(), &key);

        if let CheckInState::CheckedIn(visit) = &state {
            tracing::info!(
                worker = %worker_id,
                category = %category,
                site = %visit.site_id,
                "Restored open check-in"
            );
        }

        Self { worker_id, category, policy: CheckInPolicy::default(), store, clock, state }
    }

    pub fn with_policy(mut self, policy: CheckInPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Key under which the state of this (worker, category) pair is stored
    pub fn storage_key(worker_id: &str, category: WorkCategory) -> String {
        format!("{}:check_in:{}", worker_id, category.slug())
    }

    pub fn worker_id(&self) -> &str {
        &self.worker_id
    }

    pub fn category(&self) -> WorkCategory {
        self.category
    }

    pub fn state(&self) -> &CheckInState {
        &self.state
    }

    pub fn is_checked_in(&self) -> bool {
        self.state.is_checked_in()
    }

    /// Open a visit at a site, stamped with the current time and, when
    /// given, the device position.
    ///
    /// While already checked in, `Reject` fails with `AlreadyCheckedIn` and
    /// changes nothing; `Replace` discards the open visit and returns it.
    pub fn check_in(
        &mut self,
        site_id: SiteId,
        site_name: impl Into<String>,
        service_type: ServiceType,
        position: Option<&Position>,
    ) -> Result<Option<ActiveVisit>> {
        let replaced = match (&self.state, self.policy) {
            (CheckInState::CheckedIn(open), CheckInPolicy::Reject) => {
                return Err(FieldrouteError::AlreadyCheckedIn {
                    site_id: open.site_id.to_string(),
                    site_name: open.site_name.clone(),
                });
            }
            (CheckInState::CheckedIn(open), CheckInPolicy::Replace) => {
                tracing::warn!(
                    worker = %self.worker_id,
                    category = %self.category,
                    site = %open.site_id,
                    checked_in_at = %open.checked_in_at,
                    elapsed = %self.format_elapsed(),
                    "Discarding open check-in replaced by a new one"
                );
                Some(open.clone())
            }
            (CheckInState::NotCheckedIn, _) => None,
        };

        let visit = ActiveVisit {
            site_id,
            site_name: site_name.into(),
            checked_in_at: self.clock.now(),
            service_type: Some(service_type),
            check_in_coordinate: position.map(|p| p.coordinate),
        };

        tracing::info!(
            worker = %self.worker_id,
            category = %self.category,
            site = %visit.site_id,
            "Checked in"
        );

        self.state = CheckInState::CheckedIn(visit);
        self.persist();
        Ok(replaced)
    }

    /// Close the open visit and reset to the default state. Always succeeds;
    /// returns the finished visit when one was open.
    pub fn check_out(&mut self, position: Option<&Position>) -> Option<CompletedVisit> {
        let previous = std::mem::take(&mut self.state);
        self.persist();

        let CheckInState::CheckedIn(visit) = previous else {
            tracing::debug!(worker = %self.worker_id, category = %self.category, "Check-out while idle");
            return None;
        };

        let checked_out_at = self.clock.now();
        let duration_ms = (checked_out_at - visit.checked_in_at).num_milliseconds().max(0) as u64;

        tracing::info!(
            worker = %self.worker_id,
            category = %self.category,
            site = %visit.site_id,
            duration = %format_elapsed_ms(duration_ms),
            "Checked out"
        );

        Some(CompletedVisit {
            site_id: visit.site_id,
            site_name: visit.site_name,
            service_type: visit.service_type,
            checked_in_at: visit.checked_in_at,
            checked_out_at,
            duration_ms,
            check_in_coordinate: visit.check_in_coordinate,
            check_out_coordinate: position.map(|p| p.coordinate),
        })
    }

    /// Milliseconds since check-in, or 0 when not checked in
    pub fn elapsed_millis(&self) -> u64 {
        match self.state.check_in_time() {
            Some(since) => (self.clock.now() - since).num_milliseconds().max(0) as u64,
            None => 0,
        }
    }

    /// Elapsed time as `H:MM:SS`
    pub fn format_elapsed(&self) -> String {
        format_elapsed_ms(self.elapsed_millis())
    }

    fn persist(&self) {
        let key = Self::storage_key(&self.worker_id, self.category);
        let written = serde_json::to_string(&StoredCheckIn::from(&self.state))
            .map_err(FieldrouteError::from)
            .and_then(|json| self.store.set(&key, &json));

        if let Err(err) = written {
            tracing::warn!(key = %key, error = %err, "Failed to persist check-in state");
        }
    }
}

fn restore(store: &dyn KeyValueStore, key: &str) -> CheckInState {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return CheckInState::default(),
        Err(err) => {
            tracing::warn!(key = %key, error = %err, "Failed to read check-in state, using defaults");
            return CheckInState::default();
        }
    };

    let parsed = serde_json::from_str::<StoredCheckIn>(&raw)
        .map_err(|e| e.to_string())
        .and_then(CheckInState::try_from);

    parsed.unwrap_or_else(|reason| {
        tracing::warn!(key = %key, reason = %reason, "Corrupt check-in state, using defaults");
        CheckInState::default()
    })
}

/// Render milliseconds as `H:MM:SS`. Hours are unbounded and unpadded.
pub fn format_elapsed_ms(millis: u64) -> String {
    let total_seconds = millis / 1000;
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;
    format!("{}:{:02}:{:02}", hours, minutes, seconds)
}

/// Both crew check-in machines for one worker. They share a store and a
/// clock but never read or write each other's state.
pub struct WorkerCheckIns {
    plow: CheckInMachine,
    shovel: CheckInMachine,
}

impl WorkerCheckIns {
    pub fn load(
        worker_id: &str,
        store: Arc<dyn KeyValueStore>,
        clock: Arc<dyn Clock>,
        policy: CheckInPolicy,
    ) -> Self {
        Self {
            plow: CheckInMachine::load(worker_id, WorkCategory::PlowCrew, store.clone(), clock.clone())
                .with_policy(policy),
            shovel: CheckInMachine::load(worker_id, WorkCategory::ShovelCrew, store, clock)
                .with_policy(policy),
        }
    }

    pub fn get(&self, category: WorkCategory) -> &CheckInMachine {
        match category {
            WorkCategory::PlowCrew => &self.plow,
            WorkCategory::ShovelCrew => &self.shovel,
        }
    }

    pub fn get_mut(&mut self, category: WorkCategory) -> &mut CheckInMachine {
        match category {
            WorkCategory::PlowCrew => &mut self.plow,
            WorkCategory::ShovelCrew => &mut self.shovel,
        }
    }
}
