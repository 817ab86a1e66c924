//! Delay timer clock.
use std::time::{Duration, Instant};

/// Wall clock pacing the delay timer.
///
/// The clock only remembers when the timer last counted down. It is
/// compared against a monotonic reading on every step, so the timer
/// runs at the same rate no matter how often the VM is stepped.
pub(crate) struct Clock {
    last_tick: Instant,
    interval: Duration,
}

impl Clock {
    /// Creates a clock with `origin` as the time of the last tick.
    pub(crate) fn new(interval: Duration, origin: Instant) -> Self {
        Self {
            last_tick: origin,
            interval,
        }
    }

    /// Checks whether a full interval has passed since the last tick.
    ///
    /// When it has, `now` is recorded as the new tick. Excess time is
    /// dropped rather than caught up on, so a VM that was paused for a
    /// long time resumes counting down at its usual rate.
    pub(crate) fn tick(&mut self, now: Instant) -> bool {
        // Readings from before the last tick count as no time elapsed.
        if now.saturating_duration_since(self.last_tick) >= self.interval {
            self.last_tick = now;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_clock_interval() {
        let origin = Instant::now();
        let mut clock = Clock::new(Duration::from_millis(16), origin);

        assert!(!clock.tick(origin));
        assert!(!clock.tick(origin + Duration::from_millis(15)));
        assert!(clock.tick(origin + Duration::from_millis(16)));

        // Interval restarts from the last tick.
        assert!(!clock.tick(origin + Duration::from_millis(31)));
        assert!(clock.tick(origin + Duration::from_millis(32)));
    }

    #[test]
    fn test_clock_drops_excess() {
        let origin = Instant::now();
        let mut clock = Clock::new(Duration::from_millis(16), origin);

        assert!(clock.tick(origin + Duration::from_secs(10)));
        assert!(!clock.tick(origin + Duration::from_secs(10) + Duration::from_millis(1)));
    }

    #[test]
    fn test_clock_reading_before_tick() {
        let origin = Instant::now() + Duration::from_secs(1);
        let mut clock = Clock::new(Duration::from_millis(16), origin);

        assert!(!clock.tick(origin - Duration::from_millis(500)));
    }
}
