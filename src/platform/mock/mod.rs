//! Mock platform implementations for host testing
//!
//! Everything here runs on simulated time: a shared [`MockClock`] advances a
//! configurable amount per poll, and pins are scripted against it, which lets
//! the blocking acquisition primitives run to completion deterministically.

pub mod clock;
pub mod console;
pub mod pin;
pub mod pwm;
pub mod store;

pub use clock::MockClock;
pub use console::MockConsole;
pub use pin::{Discharge, MockPin, PinScript};
pub use pwm::MockPwm;
pub use store::MockStore;
