use crate::error::Result;

/// Port for the local key-value store backing persisted state
///
/// Calls are synchronous from the caller's point of view. One writer per key
/// is assumed.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Durably write `value` under `key`
    fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Delete `key` if present
    fn remove(&self, key: &str) -> Result<()>;
}
