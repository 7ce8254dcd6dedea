//! Platform abstraction traits
//!
//! This module defines the traits that platform implementations must provide.

pub mod clock;
pub mod console;
pub mod gpio;
pub mod pwm;
pub mod store;

// Re-export trait interfaces
pub use clock::ClockInterface;
pub use console::ConsoleInterface;
pub use gpio::{GpioInterface, GpioMode};
pub use pwm::{PwmInterface, MAX_DUTY};
pub use store::StoreInterface;
