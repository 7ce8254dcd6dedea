//! Timing-based sensor acquisition
//!
//! Both sensor families measure time rather than voltage: reflectance
//! channels time an RC discharge, the ultrasonic ranger times an echo pulse.
//! [`PulseTimer`] is the shared bounded-poll primitive underneath both.

pub mod pulse;
pub mod reflectance;
pub mod ultrasonic;

pub use pulse::PulseTimer;
pub use reflectance::{LinePosition, LineSensing, LineState, LineZone, ReflectanceArray};
pub use ultrasonic::{Distance, Ranging, UltrasonicRanger};
