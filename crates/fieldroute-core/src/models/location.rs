//! Coordinates and device positions.

use serde::{Deserialize, Serialize};

/// WGS 84 latitude/longitude pair in decimal degrees
///
/// Latitude is expected in [-90, 90] and longitude in [-180, 180]. Values are
/// not validated here; callers validate upstream.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinate {
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    /// Whether both components lie inside their valid ranges
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }
}

/// A coordinate reported by a location capability
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub coordinate: Coordinate,

    /// Horizontal accuracy radius in meters
    pub accuracy_meters: f64,

    /// Capture time in milliseconds since the Unix epoch
    pub captured_at_epoch_ms: i64,
}

impl Position {
    pub fn new(coordinate: Coordinate, accuracy_meters: f64, captured_at_epoch_ms: i64) -> Self {
        Self { coordinate, accuracy_meters: accuracy_meters.max(0.0), captured_at_epoch_ms }
    }

    /// Age of this fix relative to `now_epoch_ms`, clamped at zero
    pub fn age_ms(&self, now_epoch_ms: i64) -> u64 {
        now_epoch_ms.saturating_sub(self.captured_at_epoch_ms).max(0) as u64
    }
}

/// Options applied to every location request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeolocationOptions {
    pub enable_high_accuracy: bool,
    pub timeout_ms: u64,

    /// A cached fix younger than this is reused instead of querying the device.
    /// Zero always queries.
    pub max_cache_age_ms: u64,
}

impl Default for GeolocationOptions {
    fn default() -> Self {
        Self { enable_high_accuracy: true, timeout_ms: 10_000, max_cache_age_ms: 0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_validity() {
        assert!(Coordinate::new(44.97, -93.26).is_valid());
        assert!(Coordinate::new(90.0, 180.0).is_valid());
        assert!(!Coordinate::new(91.0, 0.0).is_valid());
        assert!(!Coordinate::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn test_position_clamps_negative_accuracy() {
        let pos = Position::new(Coordinate::new(0.0, 0.0), -3.0, 0);
        assert_eq!(pos.accuracy_meters, 0.0);
    }

    #[test]
    fn test_position_age() {
        let pos = Position::new(Coordinate::new(0.0, 0.0), 5.0, 1_000);
        assert_eq!(pos.age_ms(4_500), 3_500);
        // Fixes stamped in the future count as fresh
        assert_eq!(pos.age_ms(500), 0);
    }
}
