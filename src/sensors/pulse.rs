//! Bounded busy-poll pulse timing
//!
//! The one timing primitive everything else is built on: poll a pin against
//! the monotonic clock until it reads a target level or a hard timeout
//! expires. Both reflectance acquisition and ultrasonic ranging go through
//! here, so the timeout bound on this loop is the single load-bearing safety
//! property of the whole crate — a disconnected sensor must never hang the
//! control loop.

use crate::calibration::RawTiming;
use crate::platform::{ClockInterface, GpioInterface};

/// Pulse timer over a shared clock
///
/// Deliberately blocking and interrupt-free: the required resolution is
/// single-digit microseconds, which rules out scheduling overhead.
pub struct PulseTimer<'c, C: ClockInterface> {
    clock: &'c C,
}

impl<'c, C: ClockInterface> PulseTimer<'c, C> {
    pub fn new(clock: &'c C) -> Self {
        Self { clock }
    }

    /// Elapsed µs since `start`, correct across one clock wrap
    fn elapsed_since(&self, start: u32) -> u32 {
        let now = self.clock.now_us();
        if now >= start {
            now - start
        } else {
            (self.clock.max_us() - start) + now + 1
        }
    }

    /// Time until the pin reads `level`, bounded by `timeout_us`
    ///
    /// Returns the elapsed time once the level is observed, or `timeout_us`
    /// itself when the budget expires. "Exactly at timeout" and "timed out"
    /// are deliberately the same value: both mean no transition was observed
    /// within budget.
    pub fn time_until<P: GpioInterface>(&self, pin: &P, level: bool, timeout_us: u32) -> RawTiming {
        let start = self.clock.now_us();
        loop {
            let elapsed = self.elapsed_since(start);
            if elapsed >= timeout_us {
                return timeout_us;
            }
            if pin.read() == level {
                return elapsed;
            }
        }
    }

    /// Width of the next pulse at `level` on the pin, bounded by `timeout_us`
    ///
    /// Waits (bounded) for the pin to reach `level`, then times how long it
    /// holds it. Returns 0 if the pulse never starts; a width that runs into
    /// the timeout is reported as `timeout_us`. Worst case this blocks for
    /// two timeout budgets (one waiting, one timing).
    pub fn measure_pulse<P: GpioInterface>(&self, pin: &P, level: bool, timeout_us: u32) -> u32 {
        let lead_in = self.time_until(pin, level, timeout_us);
        if lead_in >= timeout_us {
            return 0;
        }
        self.time_until(pin, !level, timeout_us)
    }
}
