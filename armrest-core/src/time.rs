//! Time sources for the sample loop
//!
//! Telemetry timestamps are milliseconds since the loop's clock started,
//! the same epoch as the firmware's tick counter. Provided sources:
//! - `StdClock` (std): monotonic, starts at 0 on creation
//! - `MockTimeSource`: advanced by hand, for tests and replay

use core::cell::Cell;

pub use crate::traits::TimeSource;

/// Timestamp in milliseconds since the clock started
pub type Timestamp = u64;

/// Monotonic clock backed by `std::time::Instant`
#[cfg(feature = "std")]
#[derive(Debug, Clone)]
pub struct StdClock {
    start: std::time::Instant,
}

#[cfg(feature = "std")]
impl StdClock {
    /// Start counting from now
    pub fn new() -> Self {
        Self { start: std::time::Instant::now() }
    }
}

#[cfg(feature = "std")]
impl Default for StdClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "std")]
impl TimeSource for StdClock {
    fn now(&self) -> Timestamp {
        self.start.elapsed().as_millis() as Timestamp
    }
}

/// Controllable time for tests
///
/// Interior mutability lets a test keep a shared reference while the loop
/// owns `&MockTimeSource` as its clock.
#[derive(Debug, Default)]
pub struct MockTimeSource {
    timestamp: Cell<Timestamp>,
}

impl MockTimeSource {
    /// Start at `timestamp`
    pub fn new(timestamp: Timestamp) -> Self {
        Self { timestamp: Cell::new(timestamp) }
    }

    /// Jump to an absolute time
    pub fn set(&self, timestamp: Timestamp) {
        self.timestamp.set(timestamp);
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.timestamp.set(self.timestamp.get() + ms);
    }
}

impl TimeSource for MockTimeSource {
    fn now(&self) -> Timestamp {
        self.timestamp.get()
    }
}

impl<T: TimeSource + ?Sized> TimeSource for &T {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_time_advances_through_shared_reference() {
        let time = MockTimeSource::new(1000);
        let clock = &time;
        assert_eq!(clock.now(), 1000);

        time.advance(500);
        assert_eq!(clock.now(), 1500);

        time.set(20);
        assert_eq!(clock.now(), 20);
    }

    #[cfg(feature = "std")]
    #[test]
    fn std_clock_starts_near_zero() {
        let clock = StdClock::new();
        assert!(clock.now() < 1000);
    }
}
