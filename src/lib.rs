#![cfg_attr(not(test), no_std)]

//! linetracer - Sensing and control core for a differential-drive
//! line-following robot
//!
//! This library turns raw timing-based measurements into driving decisions:
//! reflectance channels read through RC-discharge timing, ultrasonic ranging
//! via echo pulse width, differential speed mixing, and the reactive loop
//! that fuses them into per-wheel motor commands.
//!
//! Everything is platform-agnostic: pins, PWM channels, the microsecond
//! clock, the persisted calibration store and the diagnostic console are
//! injected via the traits in [`platform`], so the whole crate runs on the
//! host against the mock platform. Board crates supply the real
//! implementations.
//!
//! The system is deliberately single-threaded and blocking — the timing
//! resolution the sensors need (single-digit microseconds) rules out
//! scheduling overhead. Every blocking primitive carries a hard timeout;
//! a disconnected sensor degrades to a sentinel reading, never a hang.

// Platform abstraction layer: traits + mock implementations
pub mod platform;

// Named tunables for every numeric constant that drifted across hardware
// revisions
pub mod config;

// Per-channel calibration with the optional persisted record
pub mod calibration;

// Timing-based sensor acquisition (reflectance, ultrasonic)
pub mod sensors;

// Differential-drive speed mixing
pub mod drive;

// The reactive driving/telemetry loop and mode machinery
pub mod control;

pub use calibration::{CalibrationEntry, CalibrationSet, Channel, RawTiming};
pub use config::TracerConfig;
pub use control::{ControlLoop, Mode, ModeLatch};
pub use drive::{DriveControl, DriveMixer, Motor, MotorCommand, NEUTRAL_DUTY};
pub use sensors::{
    Distance, LinePosition, LineSensing, LineState, LineZone, PulseTimer, Ranging,
    ReflectanceArray, UltrasonicRanger,
};
