//! Mock PWM implementation for testing

use crate::platform::error::{PlatformError, PwmError};
use crate::platform::traits::{PwmInterface, MAX_DUTY};
use crate::platform::Result;

/// Mock PWM channel
///
/// Tracks the last-applied duty and period for test verification.
#[derive(Debug, Default)]
pub struct MockPwm {
    duty: u16,
    period_ms: Option<u32>,
}

impl MockPwm {
    /// Create a new mock PWM channel with duty 0 and no period set
    pub fn new() -> Self {
        Self::default()
    }

    /// Last period applied via `set_period_ms`, if any
    pub fn period_ms(&self) -> Option<u32> {
        self.period_ms
    }
}

impl PwmInterface for MockPwm {
    fn set_duty(&mut self, duty: u16) -> Result<()> {
        if duty > MAX_DUTY {
            return Err(PlatformError::Pwm(PwmError::InvalidDutyCycle));
        }
        self.duty = duty;
        Ok(())
    }

    fn duty(&self) -> u16 {
        self.duty
    }

    fn set_period_ms(&mut self, period_ms: u32) -> Result<()> {
        if period_ms == 0 {
            return Err(PlatformError::Pwm(PwmError::InvalidPeriod));
        }
        self.period_ms = Some(period_ms);
        Ok(())
    }
}
