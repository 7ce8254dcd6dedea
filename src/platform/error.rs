//! Platform error types
//!
//! This module defines error types for platform operations.
//!
//! Sensor degradation (a reflectance timeout, a missing echo) is *not* an
//! error: those cases degrade to documented sentinel values and resolve on
//! the next cycle. Errors here signal misuse of the platform layer, such as
//! driving a pin that is configured as an input.

use core::fmt;

/// Result type for platform operations
pub type Result<T> = core::result::Result<T, PlatformError>;

/// Platform-level errors
///
/// All platform implementations map their HAL-specific errors to these variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PlatformError {
    /// GPIO operation failed
    Gpio(GpioError),
    /// PWM operation failed
    Pwm(PwmError),
    /// Persisted store operation failed
    Store(StoreError),
}

/// GPIO-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum GpioError {
    /// Invalid mode for operation (e.g. writing a pin configured as input)
    InvalidMode,
    /// Invalid pin number
    InvalidPin,
}

/// PWM-specific errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PwmError {
    /// Duty value outside the 0..=1023 range
    InvalidDutyCycle,
    /// Zero or otherwise unusable PWM period
    InvalidPeriod,
}

/// Persisted-store errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StoreError {
    /// Address out of bounds or not word-aligned
    InvalidAddress,
    /// Read operation failed
    ReadFailed,
}

impl fmt::Display for PlatformError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformError::Gpio(e) => write!(f, "GPIO error: {:?}", e),
            PlatformError::Pwm(e) => write!(f, "PWM error: {:?}", e),
            PlatformError::Store(e) => write!(f, "store error: {:?}", e),
        }
    }
}
