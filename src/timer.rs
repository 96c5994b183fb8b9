use core::time::Duration;
use std::time::Instant;

/// Monotonic time since boot. All UI timing is compared against this,
/// never against blocking delays.
pub trait Clock {
    fn now(&self) -> Duration;
}

pub struct MonotonicClock {
    boot: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            boot: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> Duration {
        self.boot.elapsed()
    }
}

/// A point in time after which something is due.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Deadline(Duration);

impl Deadline {
    pub fn after(now: Duration, wait: Duration) -> Self {
        Self(now + wait)
    }

    pub fn is_reached(&self, now: Duration) -> bool {
        now >= self.0
    }

    pub fn at(&self) -> Duration {
        self.0
    }
}

/// `now - since`, clamped at zero.
pub fn elapsed(now: Duration, since: Duration) -> Duration {
    now.saturating_sub(since)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deadline_is_reached_at_the_boundary() {
        let d = Deadline::after(Duration::from_millis(100), Duration::from_millis(50));
        assert!(!d.is_reached(Duration::from_millis(149)));
        assert!(d.is_reached(Duration::from_millis(150)));
    }

    #[test]
    fn elapsed_never_underflows() {
        assert_eq!(
            elapsed(Duration::from_millis(5), Duration::from_millis(10)),
            Duration::ZERO
        );
    }

    #[test]
    fn monotonic_clock_moves_forward() {
        let clock = MonotonicClock::new();
        let a = clock.now();
        let b = clock.now();
        assert!(b >= a);
    }
}
