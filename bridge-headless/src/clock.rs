//! Controllable clock for deterministic time-based tests.

use std::sync::Mutex;
use std::time::Duration;

use bridge_traits::time::Clock;
use chrono::{DateTime, TimeZone, Utc};

/// `Clock` whose current time only moves when told to.
#[derive(Debug)]
pub struct MockClock {
    now: Mutex<DateTime<Utc>>,
}

impl MockClock {
    /// Clock starting at an arbitrary fixed instant.
    pub fn new() -> Self {
        Self::starting_at(Utc.timestamp_opt(1_700_000_000, 0).single().unwrap_or_else(Utc::now))
    }

    pub fn starting_at(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Move the clock forward.
    pub fn advance(&self, step: Duration) {
        let mut now = self.now.lock().expect("clock poisoned");
        *now += chrono::Duration::from_std(step).unwrap_or_else(|_| chrono::Duration::zero());
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock poisoned")
    }
}
