//! Port trait definitions
//!
//! These traits define the capabilities the core reaches through adapters:
//! the device location service, the local key-value store, and wall-clock time.

pub mod clock;
pub mod location;
pub mod storage;

pub use clock::{Clock, SystemClock};
pub use location::{LocationSource, PositionReceiver};
pub use storage::KeyValueStore;
