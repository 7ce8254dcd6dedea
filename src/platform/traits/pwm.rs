//! PWM interface trait
//!
//! This module defines the PWM output interface that platform implementations
//! must provide. Duty values use the 10-bit 0..=1023 scale of the motor
//! driver; 511 is the electrical neutral (stall) point, distinct from
//! output-disabled.

use crate::platform::Result;

/// Maximum PWM duty value (10-bit scale)
pub const MAX_DUTY: u16 = 1023;

/// PWM interface trait
///
/// Platform implementations must provide this interface for PWM output.
///
/// # Safety Invariants
///
/// - PWM channel must be initialized before use
/// - Only one owner per PWM channel instance
pub trait PwmInterface {
    /// Set PWM duty value on the 0..=1023 scale
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidDutyCycle)` if `duty`
    /// exceeds [`MAX_DUTY`].
    fn set_duty(&mut self, duty: u16) -> Result<()>;

    /// Get the last-applied duty value
    fn duty(&self) -> u16;

    /// Set PWM period in milliseconds
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Pwm(PwmError::InvalidPeriod)` if `period_ms`
    /// is zero.
    fn set_period_ms(&mut self, period_ms: u32) -> Result<()>;
}
