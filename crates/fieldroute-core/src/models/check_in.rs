//! Check-in state for a worker and work category.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::location::Coordinate;
use super::site::{ServiceType, SiteId};

/// Crew a worker is clocked in under. Each category owns its own check-in state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkCategory {
    PlowCrew,
    ShovelCrew,
}

impl WorkCategory {
    pub const ALL: [WorkCategory; 2] = [WorkCategory::PlowCrew, WorkCategory::ShovelCrew];

    pub fn slug(&self) -> &'static str {
        match self {
            WorkCategory::PlowCrew => "plow",
            WorkCategory::ShovelCrew => "shovel",
        }
    }

    /// Service logged when the caller does not name one
    pub fn default_service(&self) -> ServiceType {
        match self {
            WorkCategory::PlowCrew => ServiceType::Plowing,
            WorkCategory::ShovelCrew => ServiceType::Shoveling,
        }
    }
}

impl fmt::Display for WorkCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// What to do when `check_in` is called while a visit is already open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum CheckInPolicy {
    /// Refuse the new check-in and keep the open visit
    #[default]
    Reject,
    /// Last check-in wins; the open visit is handed back to the caller
    Replace,
}

/// An open visit at a site
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActiveVisit {
    pub site_id: SiteId,
    pub site_name: String,
    pub checked_in_at: DateTime<Utc>,
    pub service_type: Option<ServiceType>,
    pub check_in_coordinate: Option<Coordinate>,
}

/// A finished visit, handed to the service-log submission flow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedVisit {
    pub site_id: SiteId,
    pub site_name: String,
    pub service_type: Option<ServiceType>,
    pub checked_in_at: DateTime<Utc>,
    pub checked_out_at: DateTime<Utc>,
    pub duration_ms: u64,
    pub check_in_coordinate: Option<Coordinate>,
    pub check_out_coordinate: Option<Coordinate>,
}

/// Check-in state of one (worker, category) pair
///
/// Being checked in carries the site, name, and timestamp together, so the
/// "checked in iff all fields present" rule holds by construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CheckInState {
    #[default]
    NotCheckedIn,
    CheckedIn(ActiveVisit),
}

impl CheckInState {
    pub fn is_checked_in(&self) -> bool {
        matches!(self, CheckInState::CheckedIn(_))
    }

    pub fn active(&self) -> Option<&ActiveVisit> {
        match self {
            CheckInState::CheckedIn(visit) => Some(visit),
            CheckInState::NotCheckedIn => None,
        }
    }

    pub fn site_id(&self) -> Option<&SiteId> {
        self.active().map(|v| &v.site_id)
    }

    pub fn site_name(&self) -> Option<&str> {
        self.active().map(|v| v.site_name.as_str())
    }

    pub fn check_in_time(&self) -> Option<DateTime<Utc>> {
        self.active().map(|v| v.checked_in_at)
    }

    pub fn service_type(&self) -> Option<ServiceType> {
        self.active().and_then(|v| v.service_type)
    }
}

/// Flat record written to the key-value store
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredCheckIn {
    pub is_checked_in: bool,
    pub site_id: Option<String>,
    pub site_name: Option<String>,
    /// RFC 3339 timestamp
    pub check_in_time: Option<String>,
    pub service_type: Option<ServiceType>,
    #[serde(default)]
    pub check_in_latitude: Option<f64>,
    #[serde(default)]
    pub check_in_longitude: Option<f64>,
}

impl From<&CheckInState> for StoredCheckIn {
    fn from(state: &CheckInState) -> Self {
        match state {
            CheckInState::NotCheckedIn => StoredCheckIn::default(),
            CheckInState::CheckedIn(visit) => StoredCheckIn {
                is_checked_in: true,
                site_id: Some(visit.site_id.0.clone()),
                site_name: Some(visit.site_name.clone()),
                check_in_time: Some(visit.checked_in_at.to_rfc3339()),
                service_type: visit.service_type,
                check_in_latitude: visit.check_in_coordinate.map(|c| c.latitude),
                check_in_longitude: visit.check_in_coordinate.map(|c| c.longitude),
            },
        }
    }
}

impl TryFrom<StoredCheckIn> for CheckInState {
    type Error = String;

    fn try_from(stored: StoredCheckIn) -> std::result::Result<Self, Self::Error> {
        match (stored.is_checked_in, stored.site_id, stored.site_name, stored.check_in_time) {
            (false, None, None, None) => Ok(CheckInState::NotCheckedIn),
            (true, Some(site_id), Some(site_name), Some(time)) => {
                let checked_in_at = DateTime::parse_from_rfc3339(&time)
                    .map_err(|e| format!("invalid check-in time '{}': {}", time, e))?
                    .with_timezone(&Utc);

                let check_in_coordinate = match (stored.check_in_latitude, stored.check_in_longitude)
                {
                    (Some(lat), Some(lon)) => Some(Coordinate::new(lat, lon)),
                    _ => None,
                };

                Ok(CheckInState::CheckedIn(ActiveVisit {
                    site_id: SiteId(site_id),
                    site_name,
                    checked_in_at,
                    service_type: stored.service_type,
                    check_in_coordinate,
                }))
            }
            (true, ..) => Err("checked in without site id, site name, and time".to_string()),
            (false, ..) => Err("not checked in but visit fields are present".to_string()),
        }
    }
}
