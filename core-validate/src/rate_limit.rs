//! Sliding-window rate limiter for the add-song path.

use bridge_traits::Clock;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Default operation budget within one window.
pub const DEFAULT_MAX_OPERATIONS: usize = 10;

/// Default sliding window length.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(60);

/// Sliding-window counter bounding how fast local state can grow.
///
/// Records the timestamp of each permitted operation, evicts entries older
/// than the window, and permits a new operation only while fewer than the
/// budget remain. Rejected attempts are not recorded, so hammering a full
/// window does not push the recovery point further out.
pub struct RateLimiter {
    clock: Arc<dyn Clock>,
    max_operations: usize,
    window: Duration,
    operations: Mutex<VecDeque<i64>>,
}

impl RateLimiter {
    /// Creates a limiter with the default 10-per-60-seconds budget.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self::with_limits(clock, DEFAULT_MAX_OPERATIONS, DEFAULT_WINDOW)
    }

    /// Creates a limiter with an explicit budget and window.
    pub fn with_limits(clock: Arc<dyn Clock>, max_operations: usize, window: Duration) -> Self {
        Self {
            clock,
            max_operations,
            window,
            operations: Mutex::new(VecDeque::new()),
        }
    }

    /// Attempts to admit one operation.
    ///
    /// Returns true (and records the attempt) when under budget; returns
    /// false (recording nothing) when the window is full.
    pub fn can_perform_operation(&self) -> bool {
        let now = self.clock.unix_timestamp_millis();
        let window_ms = self.window.as_millis() as i64;

        let mut operations = self.operations.lock().expect("rate limiter lock poisoned");
        while let Some(&oldest) = operations.front() {
            if now - oldest >= window_ms {
                operations.pop_front();
            } else {
                break;
            }
        }

        if operations.len() >= self.max_operations {
            return false;
        }

        operations.push_back(now);
        true
    }

    /// Operations still admissible in the current window.
    pub fn remaining(&self) -> usize {
        let now = self.clock.unix_timestamp_millis();
        let window_ms = self.window.as_millis() as i64;

        let operations = self.operations.lock().expect("rate limiter lock poisoned");
        let live = operations
            .iter()
            .filter(|&&at| now - at < window_ms)
            .count();
        self.max_operations.saturating_sub(live)
    }
}

impl std::fmt::Debug for RateLimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiter")
            .field("max_operations", &self.max_operations)
            .field("window", &self.window)
            .field("remaining", &self.remaining())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_headless::MockClock;

    #[test]
    fn admits_exactly_the_budget_within_one_window() {
        let clock = Arc::new(MockClock::new());
        let limiter = RateLimiter::new(clock);

        for _ in 0..10 {
            assert!(limiter.can_perform_operation());
        }
        assert!(!limiter.can_perform_operation());
        assert_eq!(limiter.remaining(), 0);
    }

    #[test]
    fn window_slides_and_capacity_returns() {
        let clock = Arc::new(MockClock::new());
        let limiter = RateLimiter::new(Arc::clone(&clock) as Arc<dyn Clock>);

        for _ in 0..10 {
            assert!(limiter.can_perform_operation());
        }
        assert!(!limiter.can_perform_operation());

        clock.advance(Duration::from_secs(59));
        assert!(!limiter.can_perform_operation());

        clock.advance(Duration::from_secs(2));
        assert!(limiter.can_perform_operation());
    }

    #[test]
    fn rejected_attempts_do_not_extend_the_window() {
        let clock = Arc::new(MockClock::new());
        let limiter = RateLimiter::new(Arc::clone(&clock) as Arc<dyn Clock>);

        for _ in 0..10 {
            limiter.can_perform_operation();
        }
        // Hammer while full; none of these may count as operations.
        for _ in 0..100 {
            assert!(!limiter.can_perform_operation());
        }

        clock.advance(Duration::from_secs(61));
        assert_eq!(limiter.remaining(), 10);
    }

    #[test]
    fn staggered_operations_expire_individually() {
        let clock = Arc::new(MockClock::new());
        let limiter =
            RateLimiter::with_limits(Arc::clone(&clock) as Arc<dyn Clock>, 2, Duration::from_secs(60));

        assert!(limiter.can_perform_operation());
        clock.advance(Duration::from_secs(30));
        assert!(limiter.can_perform_operation());
        assert!(!limiter.can_perform_operation());

        // First admit expires; second is still live.
        clock.advance(Duration::from_secs(31));
        assert!(limiter.can_perform_operation());
        assert!(!limiter.can_perform_operation());
    }
}
