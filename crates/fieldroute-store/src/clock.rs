use chrono::{DateTime, Duration, Utc};
use fieldroute_core::ports::Clock;
use std::sync::{Arc, Mutex};

/// Clock that only moves when told to, shared across clones
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self { now: Arc::new(Mutex::new(start)) }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap();
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_advance() {
        let start = Utc.with_ymd_and_hms(2026, 1, 12, 4, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let shared = clock.clone();

        clock.advance(Duration::seconds(90));

        assert_eq!(shared.now(), start + Duration::seconds(90));
        assert_eq!(shared.now_epoch_ms(), start.timestamp_millis() + 90_000);
    }
}
