pub mod check_in;
pub mod location;
pub mod route;
pub mod site;

pub use check_in::{
    ActiveVisit, CheckInPolicy, CheckInState, CompletedVisit, StoredCheckIn, WorkCategory,
};
pub use location::{Coordinate, GeolocationOptions, Position};
pub use route::{RouteBounds, RouteProgress, RouteStop};
pub use site::{PriorityTier, ServiceCapability, ServiceType, Site, SiteId};
