//! Platform abstraction traits for the snapdrag runtime.
//!
//! Hosts plug their display link and clock in here; the engine itself never
//! reads wall-clock time directly.

use web_time::Instant;

/// Asks the host to schedule a frame.
///
/// Called by the runtime when the first frame callback is queued after the
/// queue went idle.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Provides timing information for the runtime.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}

/// Monotonic clock backed by `web_time`, which is `std::time` on native
/// targets and `performance.now()` on wasm.
#[derive(Clone, Copy, Debug)]
pub struct MonotonicClock {
    origin: Instant,
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }

    /// Milliseconds since this clock was created, suitable for
    /// `PointerSample::uptime_millis`.
    pub fn uptime_millis(&self) -> i64 {
        self.elapsed_millis(self.origin) as i64
    }
}

impl Clock for MonotonicClock {
    type Instant = Instant;

    fn now(&self) -> Self::Instant {
        Instant::now()
    }

    fn elapsed_millis(&self, since: Self::Instant) -> u64 {
        Instant::now().saturating_duration_since(since).as_millis() as u64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monotonic_clock_never_goes_backwards() {
        let clock = MonotonicClock::new();
        let first = clock.uptime_millis();
        let second = clock.uptime_millis();
        assert!(second >= first);
        assert!(first >= 0);
    }
}
