use serde::{Deserialize, Serialize};
use std::fmt;

use super::location::Coordinate;

/// Opaque unique identifier of a serviced site
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SiteId(pub String);

impl SiteId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SiteId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Coarse urgency classification, the primary sort key before distance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PriorityTier {
    High,
    #[default]
    Normal,
    Low,
}

impl PriorityTier {
    /// Lower rank is more urgent
    pub fn rank(&self) -> u8 {
        match self {
            PriorityTier::High => 0,
            PriorityTier::Normal => 1,
            PriorityTier::Low => 2,
        }
    }

    /// Whether this tier is at least as urgent as `min`
    pub fn at_least(&self, min: PriorityTier) -> bool {
        self.rank() <= min.rank()
    }
}

/// Kind of work logged during a visit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ServiceType {
    Plowing,
    Shoveling,
    Salting,
}

/// Work a site has contracted for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ServiceCapability {
    Plow,
    Shovel,
    #[default]
    Both,
}

impl ServiceCapability {
    /// Salting is done by either crew, so every site accepts it
    pub fn supports(&self, service: ServiceType) -> bool {
        match service {
            ServiceType::Plowing => matches!(self, ServiceCapability::Plow | ServiceCapability::Both),
            ServiceType::Shoveling => {
                matches!(self, ServiceCapability::Shovel | ServiceCapability::Both)
            }
            ServiceType::Salting => true,
        }
    }
}

/// A site supplied by the account directory
///
/// `completed_today` is derived externally from today's service logs and
/// never computed here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Site {
    pub id: SiteId,
    pub name: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub priority: PriorityTier,
    #[serde(default)]
    pub service_capability: ServiceCapability,
    #[serde(default)]
    pub coordinate: Option<Coordinate>,
    #[serde(default)]
    pub completed_today: bool,
}

impl Site {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: SiteId::new(id),
            name: name.into(),
            address: String::new(),
            priority: PriorityTier::default(),
            service_capability: ServiceCapability::default(),
            coordinate: None,
            completed_today: false,
        }
    }

    pub fn with_priority(mut self, priority: PriorityTier) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_coordinate(mut self, latitude: f64, longitude: f64) -> Self {
        self.coordinate = Some(Coordinate::new(latitude, longitude));
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    pub fn with_capability(mut self, capability: ServiceCapability) -> Self {
        self.service_capability = capability;
        self
    }

    pub fn completed(mut self, completed_today: bool) -> Self {
        self.completed_today = completed_today;
        self
    }
}
