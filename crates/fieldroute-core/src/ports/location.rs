use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::GeolocationError;
use crate::models::{GeolocationOptions, Position};

/// Stream of fixes delivered by a location watch
///
/// Dropping the receiver releases the underlying subscription.
pub type PositionReceiver = mpsc::Receiver<std::result::Result<Position, GeolocationError>>;

/// Port for the platform location capability
#[async_trait]
pub trait LocationSource: Send + Sync {
    /// Resolve a single fix. Implementations may ignore `timeout_ms`; the
    /// provider enforces it.
    async fn current_position(
        &self,
        options: &GeolocationOptions,
    ) -> std::result::Result<Position, GeolocationError>;

    /// Start a continuous subscription
    fn watch(&self, options: &GeolocationOptions) -> PositionReceiver;
}
