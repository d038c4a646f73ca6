//! Fieldroute Core - Domain models, ports, and configuration
//!
//! This crate contains the domain types and port definitions shared by the
//! route optimizer, the geolocation provider, and the check-in state machine.

pub mod config;
pub mod error;
pub mod models;
pub mod ports;

pub use error::{FieldrouteError, GeolocationError, Result};
