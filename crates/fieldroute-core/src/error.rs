//! Error types for Fieldroute

use thiserror::Error;

/// Failure reported by a location capability.
///
/// These are returned to the caller as values. The provider stays usable
/// after any of them; the next fetch or watch is independent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Location permission denied")]
    PermissionDenied,

    #[error("Location unavailable: {reason}")]
    Unavailable { reason: String },

    #[error("Location request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },
}

#[derive(Debug, Error)]
pub enum FieldrouteError {
    // Geolocation errors
    #[error(transparent)]
    Geolocation(#[from] GeolocationError),

    // Route errors
    #[error("No current position available. Fetch a location before optimizing the route")]
    NoPositionAvailable,

    // Check-in errors
    #[error("Already checked in at {site_name} ({site_id}). Check out first")]
    AlreadyCheckedIn { site_id: String, site_name: String },

    // Storage errors
    #[error("Storage error for key {key}: {reason}")]
    Storage { key: String, reason: String },

    // Configuration errors
    #[error("Invalid configuration value for {key}: {reason}")]
    ConfigInvalid { key: String, reason: String },

    // IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for FieldrouteError {
    fn from(err: serde_json::Error) -> Self {
        FieldrouteError::Serialization(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, FieldrouteError>;
