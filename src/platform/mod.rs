//! Platform abstraction layer
//!
//! This module provides hardware abstraction for the pins, PWM channels,
//! clock, persisted store and diagnostic console the robot core touches.
//! All platform-specific code lives behind these traits; the rest of the
//! crate is platform-agnostic and host-testable.

pub mod error;
pub mod traits;

// Mock implementations for host testing
#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types
pub use error::{PlatformError, Result};
pub use traits::{
    ClockInterface, ConsoleInterface, GpioInterface, GpioMode, PwmInterface, StoreInterface,
    MAX_DUTY,
};
