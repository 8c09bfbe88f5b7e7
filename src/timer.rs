//! The periodic tick detectors driving the two clock domains.
use std::time::{Duration, Instant};

/// An edge-triggered "has at least one period elapsed" detector.
///
/// The chipset polls this once per external tick with the current time as an
/// explicit argument, so the core stays deterministic and testable without
/// real waits. A zero period means "run unthrottled", the timer then reports
/// ready on every poll.
///
/// Attention: multiple elapsed periods between polls collapse into a single
/// ready signal, the timer does not count how many periods went by. Work
/// driven by it is therefore capped at one batch per poll.
#[derive(Debug, Clone, Copy)]
pub struct Timer {
    /// the amount of time between two ready signals
    period: Duration,
    /// when the timer last reported ready
    last_fire: Instant,
}

impl Timer {
    /// Will create a new timer with the given period, anchored at `now`.
    pub fn new(period: Duration, now: Instant) -> Self {
        Self {
            period,
            last_fire: now,
        }
    }

    /// Will create a timer firing `per_second` times a second.
    ///
    /// A rate of `0` creates an unthrottled timer.
    pub fn from_rate(per_second: u32, now: Instant) -> Self {
        let period = if per_second == 0 {
            Duration::ZERO
        } else {
            Duration::from_millis((1000 / per_second) as u64)
        };
        Self::new(period, now)
    }

    /// Reports if at least one period elapsed since the last ready report,
    /// and only then advances the internal anchor to `now`.
    pub fn update(&mut self, now: Instant) -> bool {
        if self.period.is_zero() {
            self.last_fire = now;
            return true;
        }

        let ready = now.saturating_duration_since(self.last_fire) >= self.period;
        if ready {
            self.last_fire = now;
        }
        ready
    }

    /// The period between two ready signals.
    pub fn period(&self) -> Duration {
        self.period
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ready_after_period() {
        let base = Instant::now();
        let mut timer = Timer::new(Duration::from_millis(16), base);

        assert!(!timer.update(base));
        assert!(!timer.update(base + Duration::from_millis(15)));
        assert!(timer.update(base + Duration::from_millis(16)));
        // the anchor moved, so the next period starts at 16ms
        assert!(!timer.update(base + Duration::from_millis(31)));
        assert!(timer.update(base + Duration::from_millis(32)));
    }

    #[test]
    fn test_multiple_periods_collapse() {
        let base = Instant::now();
        let mut timer = Timer::new(Duration::from_millis(10), base);

        // five periods elapsed, but only a single ready signal comes out
        assert!(timer.update(base + Duration::from_millis(50)));
        assert!(!timer.update(base + Duration::from_millis(55)));
        assert!(timer.update(base + Duration::from_millis(60)));
    }

    #[test]
    fn test_unthrottled() {
        let base = Instant::now();
        let mut timer = Timer::from_rate(0, base);

        assert!(timer.update(base));
        assert!(timer.update(base));
        assert!(timer.update(base + Duration::from_millis(1)));
    }

    #[test]
    fn test_from_rate() {
        use crate::definitions::timer as defs;

        let base = Instant::now();
        let timer = Timer::from_rate(defs::HERTZ, base);
        assert_eq!(timer.period(), Duration::from_millis(defs::INTERVAL));
        assert_eq!(timer.period(), Duration::from_millis(16));

        let timer = Timer::from_rate(500, base);
        assert_eq!(timer.period(), Duration::from_millis(2));
    }
}
