//! Monotonic timestamp source used to stamp orders on arrival.

use std::time::Instant;

/// A monotonic nanosecond clock.
///
/// The matching core never reads the wall clock directly; every timestamp
/// flows through this trait so that tests and replay harnesses can supply a
/// deterministic source instead of [`SystemClock`].
pub trait Clock: Send + Sync {
    /// Returns a monotonically non-decreasing nanosecond timestamp.
    ///
    /// Implementations only need to guarantee monotonicity for calls made
    /// through a single instance; there is no cross-instance ordering
    /// requirement.
    fn now_ns(&self) -> i64;
}

/// Default [`Clock`] backed by [`std::time::Instant`].
///
/// `Instant` is immune to wall-clock adjustments (NTP step, leap seconds),
/// which is what makes arrival-time tie-breaking in the book reliable.
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Creates a new clock anchored to the current instant.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for SystemClock {
    fn now_ns(&self) -> i64 {
        self.origin.elapsed().as_nanos() as i64
    }
}

/// A clock that returns caller-assigned timestamps.
///
/// Useful for constructing scenarios where arrival order must be pinned
/// exactly (see the price-time priority test scenarios), without relying on
/// real elapsed time between two constructions. Exposed publicly, in the
/// same spirit as the teacher crate's injectable time source, rather than
/// hidden behind a test-only cfg.
pub struct ManualClock {
    ticks: std::sync::atomic::AtomicI64,
}

impl ManualClock {
    /// Creates a manual clock starting at `start`.
    pub fn new(start: i64) -> Self {
        Self {
            ticks: std::sync::atomic::AtomicI64::new(start),
        }
    }

    /// Advances the clock by `delta` nanoseconds and returns the new value.
    pub fn advance(&self, delta: i64) -> i64 {
        self.ticks
            .fetch_add(delta, std::sync::atomic::Ordering::SeqCst)
            + delta
    }
}

impl Clock for ManualClock {
    fn now_ns(&self) -> i64 {
        self.ticks.load(std::sync::atomic::Ordering::SeqCst)
    }
}
