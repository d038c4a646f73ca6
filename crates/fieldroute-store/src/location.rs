//! Location source that replays fixed fixes.
//!
//! Stands in for the device location service when the position is supplied
//! by an operator (CLI flags) or scripted by a test.

use async_trait::async_trait;
use fieldroute_core::error::GeolocationError;
use fieldroute_core::models::{GeolocationOptions, Position};
use fieldroute_core::ports::{LocationSource, PositionReceiver};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

const WATCH_BUFFER: usize = 16;

#[derive(Debug, Clone)]
pub struct StaticLocationSource {
    fix: std::result::Result<Position, GeolocationError>,
    delay: Option<Duration>,
    track: Vec<Position>,
    track_interval: Duration,
    close_after_track: bool,
    requests: Arc<AtomicUsize>,
}

impl StaticLocationSource {
    /// Always resolves to `position`
    pub fn fixed(position: Position) -> Self {
        Self::new(Ok(position))
    }

    /// Always fails with `error`
    pub fn failing(error: GeolocationError) -> Self {
        Self::new(Err(error))
    }

    fn new(fix: std::result::Result<Position, GeolocationError>) -> Self {
        Self {
            fix,
            delay: None,
            track: Vec::new(),
            track_interval: Duration::from_secs(1),
            close_after_track: false,
            requests: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Wait this long before answering a one-shot request
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Positions a watch emits after the initial fix, one per `interval`
    pub fn with_track(mut self, track: Vec<Position>, interval: Duration) -> Self {
        self.track = track;
        self.track_interval = interval;
        self
    }

    /// End the watch once the track is exhausted instead of holding it open
    pub fn close_after_track(mut self) -> Self {
        self.close_after_track = true;
        self
    }

    /// Number of one-shot requests served so far
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocationSource for StaticLocationSource {
    async fn current_position(
        &self,
        _options: &GeolocationOptions,
    ) -> std::result::Result<Position, GeolocationError> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        self.fix.clone()
    }

    fn watch(&self, _options: &GeolocationOptions) -> PositionReceiver {
        let (tx, rx) = mpsc::channel(WATCH_BUFFER);
        let first = self.fix.clone();
        let track = self.track.clone();
        let interval = self.track_interval;
        let close_after_track = self.close_after_track;

        tokio::spawn(async move {
            if tx.send(first).await.is_err() {
                return;
            }
            for position in track {
                tokio::time::sleep(interval).await;
                if tx.send(Ok(position)).await.is_err() {
                    return;
                }
            }
            if !close_after_track {
                // Hold the subscription until the consumer lets go
                tx.closed().await;
            }
        });

        rx
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fieldroute_core::models::Coordinate;

    fn fix(lat: f64) -> Position {
        Position::new(Coordinate::new(lat, -93.0), 5.0, 0)
    }

    #[tokio::test]
    async fn test_fixed_answers_and_counts() {
        let source = StaticLocationSource::fixed(fix(45.0));
        let options = GeolocationOptions::default();

        assert_eq!(source.current_position(&options).await.unwrap(), fix(45.0));
        assert_eq!(source.current_position(&options).await.unwrap(), fix(45.0));
        assert_eq!(source.request_count(), 2);
    }

    #[tokio::test]
    async fn test_failing() {
        let source = StaticLocationSource::failing(GeolocationError::PermissionDenied);
        let result = source.current_position(&GeolocationOptions::default()).await;
        assert_eq!(result, Err(GeolocationError::PermissionDenied));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_replays_track_then_closes() {
        let source = StaticLocationSource::fixed(fix(45.0))
            .with_track(vec![fix(45.1), fix(45.2)], Duration::from_secs(2))
            .close_after_track();

        let mut rx = source.watch(&GeolocationOptions::default());

        assert_eq!(rx.recv().await, Some(Ok(fix(45.0))));
        assert_eq!(rx.recv().await, Some(Ok(fix(45.1))));
        assert_eq!(rx.recv().await, Some(Ok(fix(45.2))));
        assert_eq!(rx.recv().await, None);
    }
}
