//! Mock GPIO pin implementation for testing
//!
//! Pins are scripted against a shared [`MockClock`]: a reflectance pin can be
//! told how long it holds its charge after being released to float, and an
//! ultrasonic echo pin can be told to emit a pulse of a given width. The
//! script lives outside the pin so tests keep a handle to it after the pin
//! has been moved into a sensor.

use core::cell::Cell;

use crate::platform::error::{GpioError, PlatformError};
use crate::platform::mock::MockClock;
use crate::platform::traits::{GpioInterface, GpioMode};
use crate::platform::Result;

/// Scripted discharge behavior for a reflectance-style pin
///
/// `Never` is a distinct state from `Unscripted`: a pin that never
/// discharges keeps reading high after release (the acquisition-timeout
/// case), while an unscripted pin falls through to the static level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Discharge {
    /// No discharge behavior; the static level applies
    #[default]
    Unscripted,
    /// Reads high forever after release to float
    Never,
    /// Reads high for this many µs after release, then low
    After(u32),
}

/// Scripted input behavior shared between a test and its [`MockPin`]
///
/// Precedence when the pin is read in input mode: an armed pulse wins over a
/// discharge script, which wins over the static level.
#[derive(Debug, Default)]
pub struct PinScript {
    /// How the pin behaves after release to float
    pub discharge: Cell<Discharge>,
    /// One pulse per arming: (delay after first poll, width), both in µs.
    /// Re-arms automatically once the pulse has passed.
    pub pulse: Cell<Option<(u32, u32)>>,
    /// Static level reported when no other script applies
    pub level: Cell<bool>,
}

impl PinScript {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Mock GPIO pin scripted against simulated time
#[derive(Debug)]
pub struct MockPin<'c> {
    clock: &'c MockClock,
    script: &'c PinScript,
    mode: GpioMode,
    driven: bool,
    /// Unwrapped time the pin was last released to float
    released_at: Cell<u64>,
    /// Unwrapped time the pulse script was armed at (first input poll)
    pulse_base: Cell<Option<u64>>,
}

impl<'c> MockPin<'c> {
    /// Create a mock pin in output mode
    pub fn new_output(clock: &'c MockClock, script: &'c PinScript) -> Self {
        Self {
            clock,
            script,
            mode: GpioMode::OutputPushPull,
            driven: false,
            released_at: Cell::new(0),
            pulse_base: Cell::new(None),
        }
    }

    /// Create a mock pin in input mode
    pub fn new_input(clock: &'c MockClock, script: &'c PinScript) -> Self {
        Self {
            clock,
            script,
            mode: GpioMode::Input,
            driven: false,
            released_at: Cell::new(0),
            pulse_base: Cell::new(None),
        }
    }

    fn read_input(&self) -> bool {
        let now = self.clock.raw_us();

        if let Some((delay, width)) = self.script.pulse.get() {
            // Arm on the first poll after (re-)scheduling
            let base = match self.pulse_base.get() {
                Some(base) => base,
                None => {
                    self.pulse_base.set(Some(now));
                    now
                }
            };
            let rel = now.saturating_sub(base);
            let start = u64::from(delay);
            let end = start + u64::from(width);
            if rel < end {
                return rel >= start;
            }
            // Pulse consumed; re-arm for the next measurement
            self.pulse_base.set(None);
            return false;
        }

        match self.script.discharge.get() {
            Discharge::Never => return true,
            Discharge::After(discharge_us) => {
                let held = now.saturating_sub(self.released_at.get());
                return held < u64::from(discharge_us);
            }
            Discharge::Unscripted => {}
        }

        self.script.level.get()
    }
}

impl GpioInterface for MockPin<'_> {
    fn set_high(&mut self) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.driven = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        if !self.mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        self.driven = false;
        Ok(())
    }

    fn read(&self) -> bool {
        if self.mode.is_output() {
            self.driven
        } else {
            self.read_input()
        }
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        if self.mode.is_output() && !mode.is_output() {
            self.released_at.set(self.clock.raw_us());
        }
        self.mode = mode;
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        self.mode
    }
}
