//! Fieldroute Tracking - Device position and site check-in state
//!
//! The geolocation provider wraps a `LocationSource` with one-shot and watch
//! modes. The check-in machine tracks the open visit for each worker and
//! crew category and persists it through a `KeyValueStore`.

pub mod check_in;
pub mod geolocation;

pub use check_in::{format_elapsed_ms, CheckInMachine, WorkerCheckIns};
pub use geolocation::GeolocationProvider;
