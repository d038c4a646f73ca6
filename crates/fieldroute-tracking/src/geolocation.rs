//! Device position provider.
//!
//! Wraps a [`LocationSource`] with a one-shot fetch and a continuous watch,
//! and keeps the last known fix, the last error, and the loading/watching
//! flags. The last known fix is overwritten by whichever successful read
//! lands last, from either mode.

use fieldroute_core::error::GeolocationError;
use fieldroute_core::models::{GeolocationOptions, Position};
use fieldroute_core::ports::{Clock, LocationSource};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

type GeoResult<T> = std::result::Result<T, GeolocationError>;

#[derive(Debug, Default)]
struct ProviderState {
    last_position: Option<Position>,
    last_error: Option<GeolocationError>,
    in_flight: usize,
    watching: bool,
    watch_generation: u64,
}

#[derive(Debug, Clone, Default)]
struct SharedState(Arc<Mutex<ProviderState>>);

impl SharedState {
    fn lock(&self) -> MutexGuard<'_, ProviderState> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, result: &GeoResult<Position>) {
        let mut state = self.lock();
        match result {
            Ok(position) => {
                state.last_position = Some(*position);
                state.last_error = None;
            }
            Err(err) => state.last_error = Some(err.clone()),
        }
    }
}

/// Marks a one-shot request in flight for as long as it lives. Dropping it,
/// on any exit path or when the request future itself is dropped, clears
/// the mark.
struct LoadingGuard {
    state: SharedState,
}

impl LoadingGuard {
    fn begin(state: &SharedState) -> Self {
        state.lock().in_flight += 1;
        Self { state: state.clone() }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        let mut state = self.state.lock();
        state.in_flight = state.in_flight.saturating_sub(1);
    }
}

pub struct GeolocationProvider {
    source: Arc<dyn LocationSource>,
    clock: Arc<dyn Clock>,
    options: GeolocationOptions,
    state: SharedState,
    watch_task: Option<JoinHandle<()>>,
}

impl GeolocationProvider {
    pub fn new(source: Arc<dyn LocationSource>, clock: Arc<dyn Clock>) -> Self {
        Self {
            source,
            clock,
            options: GeolocationOptions::default(),
            state: SharedState::default(),
            watch_task: None,
        }
    }

    /// Options used by `get_position` and `start_watching`
    pub fn with_options(mut self, options: GeolocationOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &GeolocationOptions {
        &self.options
    }

    /// Fetch one fix using the provider's options
    pub async fn get_position(&self) -> GeoResult<Position> {
        let options = self.options;
        self.get_position_with(&options).await
    }

    /// Fetch one fix with caller-supplied options.
    ///
    /// Returns the cached fix when `max_cache_age_ms` allows it. Otherwise
    /// queries the source, failing with `Timeout` once `timeout_ms` elapses.
    /// A failure leaves the last known position untouched.
    pub async fn get_position_with(&self, options: &GeolocationOptions) -> GeoResult<Position> {
        if options.max_cache_age_ms > 0 {
            if let Some(cached) = self.fresh_cached(options.max_cache_age_ms) {
                tracing::debug!(age_limit_ms = options.max_cache_age_ms, "Using cached position");
                return Ok(cached);
            }
        }

        let _loading = LoadingGuard::begin(&self.state);
        let timeout = Duration::from_millis(options.timeout_ms);

        let result = match tokio::time::timeout(timeout, self.source.current_position(options)).await
        {
            Ok(result) => result,
            Err(_) => Err(GeolocationError::Timeout { timeout_ms: options.timeout_ms }),
        };

        self.state.record(&result);
        match &result {
            Ok(position) => tracing::debug!(
                latitude = position.coordinate.latitude,
                longitude = position.coordinate.longitude,
                accuracy = position.accuracy_meters,
                "Position acquired"
            ),
            Err(err) => tracing::warn!(error = %err, "Location request failed"),
        }

        result
    }

    fn fresh_cached(&self, max_age_ms: u64) -> Option<Position> {
        let now = self.clock.now_epoch_ms();
        self.state.lock().last_position.filter(|position| position.age_ms(now) <= max_age_ms)
    }

    /// Subscribe to continuous updates, calling `on_position` with every fix.
    ///
    /// A no-op while a watch is already running. Must be called from within a
    /// tokio runtime. Watch errors are recorded as `last_error` and the
    /// subscription stays open.
    pub fn start_watching<F>(&mut self, mut on_position: F)
    where
        F: FnMut(Position) + Send + 'static,
    {
        if self.is_watching() {
            tracing::debug!("Location watch already running");
            return;
        }
        if let Some(finished) = self.watch_task.take() {
            finished.abort();
        }

        let mut updates = self.source.watch(&self.options);
        let state = self.state.clone();
        let generation = {
            let mut guard = state.lock();
            guard.watch_generation += 1;
            guard.watching = true;
            guard.watch_generation
        };

        self.watch_task = Some(tokio::spawn(async move {
            while let Some(update) = updates.recv().await {
                state.record(&update);
                match update {
                    Ok(position) => on_position(position),
                    Err(err) => tracing::warn!(error = %err, "Location watch reported an error"),
                }
            }

            {
                let mut guard = state.lock();
                if guard.watch_generation == generation {
                    guard.watching = false;
                }
            }
            tracing::debug!("Location watch closed by source");
        }));

        tracing::debug!("Started location watch");
    }

    /// Cancel the watch. Safe to call at any time, any number of times.
    pub fn stop_watching(&mut self) {
        if let Some(task) = self.watch_task.take() {
            task.abort();
            tracing::debug!("Stopped location watch");
        }
        self.state.lock().watching = false;
    }

    pub fn last_position(&self) -> Option<Position> {
        self.state.lock().last_position
    }

    pub fn last_error(&self) -> Option<GeolocationError> {
        self.state.lock().last_error.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.state.lock().in_flight > 0
    }

    pub fn is_watching(&self) -> bool {
        self.state.lock().watching
    }
}

impl Drop for GeolocationProvider {
    fn drop(&mut self) {
        if let Some(task) = self.watch_task.take() {
            task.abort();
        }
    }
}
