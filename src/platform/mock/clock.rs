//! Mock clock implementation for testing
//!
//! Simulated time with controllable advancement. Every `now_us()` call
//! advances time by a configurable tick, modeling the cost of one poll
//! iteration in a busy-wait loop; this is what makes the blocking timing
//! primitives terminate under test.

use core::cell::Cell;

use crate::platform::traits::ClockInterface;

/// Mock clock with controllable simulated time
///
/// Internally keeps an unwrapped `u64` timeline; [`ClockInterface::now_us`]
/// reports it modulo the configured wrap. Tests that exercise the rollover
/// guard shrink the wrap modulus instead of simulating hours of runtime.
#[derive(Debug)]
pub struct MockClock {
    raw_us: Cell<u64>,
    /// Largest reported value before wrapping to 0
    max_us: u32,
    /// Microseconds added per `now_us()` call (poll cost)
    tick_us: Cell<u32>,
}

impl MockClock {
    /// Create a mock clock with the full u32 range and a 1 µs poll tick
    pub fn new() -> Self {
        Self::with_max(u32::MAX)
    }

    /// Create a mock clock that wraps after `max_us`
    pub fn with_max(max_us: u32) -> Self {
        Self {
            raw_us: Cell::new(0),
            max_us,
            tick_us: Cell::new(1),
        }
    }

    /// Set the per-poll time cost (0 freezes time across `now_us` calls)
    pub fn set_tick_us(&self, tick_us: u32) {
        self.tick_us.set(tick_us);
    }

    /// Current unwrapped timeline value, without advancing time
    pub fn raw_us(&self) -> u64 {
        self.raw_us.get()
    }

    /// Jump the timeline to an absolute unwrapped value
    pub fn set_raw_us(&self, us: u64) {
        self.raw_us.set(us);
    }

    /// Advance the timeline by `us` microseconds
    pub fn advance(&self, us: u64) {
        self.raw_us.set(self.raw_us.get() + us);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}

impl ClockInterface for MockClock {
    fn now_us(&self) -> u32 {
        let raw = self.raw_us.get();
        self.raw_us.set(raw + u64::from(self.tick_us.get()));
        (raw % (u64::from(self.max_us) + 1)) as u32
    }

    fn max_us(&self) -> u32 {
        self.max_us
    }

    fn delay_us(&self, us: u32) {
        self.advance(u64::from(us));
    }
}
