use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Monotonic time source for state-delay deadlines.
///
/// Waits are never modeled as blocking sleeps; the sequencer stamps a
/// deadline and compares against `now_ns` on each host tick.
pub trait Clock: Clone + Send + Sync {
    /// Nanoseconds since an arbitrary, monotonically increasing origin.
    fn now_ns(&self) -> u64;

    fn elapsed(&self, since_ns: u64) -> Duration {
        Duration::from_nanos(self.now_ns().saturating_sub(since_ns))
    }
}

/// Wall-clock backed by `Instant`.
#[derive(Debug, Clone)]
pub struct MonotonicClock {
    start: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now_ns(&self) -> u64 {
        self.start.elapsed().as_nanos() as u64
    }
}

/// Hand-advanced clock for tests and dry runs. Clones share the same
/// underlying time, so a harness can keep one handle and advance the
/// copy held by a sequencer.
#[derive(Debug, Clone, Default)]
pub struct ManualClock {
    now_ns: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&self, by: Duration) {
        self.now_ns
            .fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    pub fn advance_secs(&self, seconds: f64) {
        self.advance(Duration::from_secs_f64(seconds));
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> u64 {
        self.now_ns.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_clock_clones_share_time() {
        let clock = ManualClock::new();
        let held = clock.clone();
        assert_eq!(held.now_ns(), 0);

        clock.advance(Duration::from_millis(250));
        assert_eq!(held.now_ns(), 250_000_000);
        assert_eq!(held.elapsed(0), Duration::from_millis(250));
    }

    #[test]
    fn monotonic_clock_does_not_go_backwards() {
        let clock = MonotonicClock::new();
        let a = clock.now_ns();
        let b = clock.now_ns();
        assert!(b >= a);
    }

    #[test]
    fn elapsed_saturates_on_future_timestamps() {
        let clock = ManualClock::new();
        assert_eq!(clock.elapsed(5_000), Duration::ZERO);
    }
}
