//! Fieldroute Store - Adapters for the core ports
//!
//! Provides key-value stores for persisted check-in state, a static location
//! source for operators and tests, and a manually driven clock.

pub mod clock;
pub mod file;
pub mod location;
pub mod memory;

pub use clock::ManualClock;
pub use file::FileKeyValueStore;
pub use location::StaticLocationSource;
pub use memory::MemoryKeyValueStore;
