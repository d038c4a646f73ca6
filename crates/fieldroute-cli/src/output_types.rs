use chrono::{DateTime, Utc};
use fieldroute_core::models::{
    ActiveVisit, CompletedVisit, Coordinate, RouteBounds, RouteProgress, RouteStop, ServiceType,
};
use fieldroute_geo::format_distance;
use serde::Serialize;
use tabled::Tabled;

/// Output for optimize command
#[derive(Debug, Serialize)]
pub struct OptimizeOutput {
    pub start: Option<Coordinate>,
    pub skipped_completed: usize,
    pub stops: Vec<RouteStop>,
    pub progress: RouteProgress,
    pub total_distance_meters: f64,
    pub bounds: Option<RouteBounds>,
}

/// One row of the route table
#[derive(Debug, Serialize, Tabled)]
pub struct StopRow {
    #[tabled(rename = "#")]
    pub order: usize,
    #[tabled(rename = "Site")]
    pub name: String,
    #[tabled(rename = "Priority")]
    pub priority: String,
    #[tabled(rename = "Address")]
    pub address: String,
    #[tabled(rename = "Leg")]
    pub leg: String,
}

impl From<&RouteStop> for StopRow {
    fn from(stop: &RouteStop) -> Self {
        Self {
            order: stop.sequence_index + 1,
            name: stop.site.name.clone(),
            priority: format!("{:?}", stop.site.priority).to_lowercase(),
            address: stop.site.address.clone(),
            leg: match stop.distance_from_previous_meters {
                Some(meters) => format_distance(meters),
                None => "no location".to_string(),
            },
        }
    }
}

/// Output for check-in command
#[derive(Debug, Serialize)]
pub struct CheckInOutput {
    pub worker: String,
    pub crew: String,
    pub visit: ActiveVisit,
    pub replaced: Option<ActiveVisit>,
}

/// Output for check-out command
#[derive(Debug, Serialize)]
pub struct CheckOutOutput {
    pub worker: String,
    pub crew: String,
    pub visit: Option<CompletedVisit>,
}

/// Output for status command
#[derive(Debug, Serialize)]
pub struct StatusOutput {
    pub worker: String,
    pub crews: Vec<CrewStatus>,
}

#[derive(Debug, Serialize)]
pub struct CrewStatus {
    pub crew: String,
    pub checked_in: bool,
    pub site_id: Option<String>,
    pub site_name: Option<String>,
    pub service_type: Option<ServiceType>,
    pub checked_in_at: Option<DateTime<Utc>>,
    pub elapsed_ms: u64,
    pub elapsed: String,
}

/// One row of the config table
#[derive(Debug, Serialize, Tabled)]
pub struct ConfigRow {
    #[tabled(rename = "Key")]
    pub key: String,
    #[tabled(rename = "Value")]
    pub value: String,
    #[tabled(rename = "Source")]
    pub source: String,
}
