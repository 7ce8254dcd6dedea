//! Monotonic microsecond clock trait
//!
//! The acquisition primitives busy-poll against this clock; single-digit
//! microsecond resolution is required, which is why there is no interrupt or
//! scheduler involvement anywhere in the timing path.

/// Monotonic wrapped microsecond clock with busy-wait delay
///
/// The counter wraps at a fixed, platform-specific modulus. Callers that
/// compute elapsed times across a potential wrap must use wrap-aware
/// arithmetic (see [`crate::sensors::PulseTimer`]), and long sweeps must
/// avoid starting near the wrap boundary (see the rollover guard in
/// [`crate::sensors::ReflectanceArray::acquire`]).
///
/// Methods take `&self` so a single clock can be shared by every sensor in
/// a sweep; implementations read a free-running counter and need no
/// exclusive access.
pub trait ClockInterface {
    /// Current time in microseconds since platform initialization
    ///
    /// Wraps to 0 after [`max_us`](Self::max_us).
    fn now_us(&self) -> u32;

    /// Largest value [`now_us`](Self::now_us) reaches before wrapping to 0
    fn max_us(&self) -> u32 {
        u32::MAX
    }

    /// Busy-wait for at least `us` microseconds
    fn delay_us(&self, us: u32);
}
