//! Reflectance line sensing via RC-discharge timing
//!
//! Each channel is one IR emitter/receiver pair read through a single
//! digital pin: drive the pin high to charge the photo-sensing element, let
//! it settle, release it to float, then time how long it takes to read low
//! again. A dark line reflects less infrared, the element discharges more
//! slowly, and the timing comes out larger — so "line detected" means the
//! raw timing is *above* the channel's threshold.
//!
//! [`ReflectanceArray`] owns the three channels and snapshots them once per
//! acquisition sweep; every derived view (per-channel booleans, raw
//! intensities, the centroid position estimate, position zones) reads that
//! snapshot and stays stale until the next [`acquire`](ReflectanceArray::acquire).

use bitflags::bitflags;

use crate::calibration::{CalibrationSet, Channel, RawTiming};
use crate::config::ReflectanceConfig;
use crate::platform::{ClockInterface, GpioInterface, GpioMode, Result};
use crate::sensors::PulseTimer;

bitflags! {
    /// Which channels currently see the line
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct LineState: u8 {
        const LEFT = 1 << 0;
        const CENTER = 1 << 1;
        const RIGHT = 1 << 2;
    }
}

impl LineState {
    fn flag(channel: Channel) -> LineState {
        match channel {
            Channel::Left => LineState::LEFT,
            Channel::Center => LineState::CENTER,
            Channel::Right => LineState::RIGHT,
        }
    }
}

/// Continuous line position estimate
///
/// `At(p)` places the line on a 0..=2000 scale: 0 under the left sensor,
/// 1000 under the center, 2000 under the right. `AllOnLine` replaces the
/// original firmware's -1 sentinel for the case where every channel is
/// saturated and the centroid math discriminates nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LinePosition {
    /// All three sensors saturated together; no usable centroid
    AllOnLine,
    /// Weighted centroid in [0, 2000]
    At(u16),
}

/// Coarse position zone derived from the centroid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineZone {
    Left,
    CenterLeft,
    Center,
    CenterRight,
    Right,
}

/// Seam trait for line sensing, implemented by [`ReflectanceArray`]
///
/// The control loop steers against this interface so its decision logic can
/// be tested with scripted fakes instead of pin-level mocks.
pub trait LineSensing {
    /// Run one full acquisition sweep, refreshing every derived view
    fn acquire(&mut self) -> Result<[RawTiming; 3]>;

    /// Last-acquired raw timing for one channel (stale until next acquire)
    fn intensity(&self, channel: Channel) -> RawTiming;

    /// Per-channel detection flags from the last sweep
    fn line_state(&self) -> LineState;
}

/// One reflectance channel: a pin plus its last raw timing
struct ReflectanceSensor<P: GpioInterface> {
    pin: P,
    last_raw: RawTiming,
}

impl<P: GpioInterface> ReflectanceSensor<P> {
    fn new(pin: P) -> Self {
        Self { pin, last_raw: 0 }
    }

    /// Charge, settle, float, then time the discharge
    fn acquire<C: ClockInterface>(
        &mut self,
        clock: &C,
        config: &ReflectanceConfig,
    ) -> Result<RawTiming> {
        self.pin.set_mode(GpioMode::OutputPushPull)?;
        self.pin.set_high()?;
        clock.delay_us(config.settle_us);
        self.pin.set_mode(GpioMode::Input)?;

        let timer = PulseTimer::new(clock);
        let raw = timer.time_until(&self.pin, false, config.max_timer_us);
        self.last_raw = raw;
        Ok(raw)
    }
}

/// Three-channel reflectance array with calibration and position estimation
pub struct ReflectanceArray<'c, P: GpioInterface, C: ClockInterface> {
    sensors: [ReflectanceSensor<P>; 3],
    clock: &'c C,
    calibration: CalibrationSet,
    config: ReflectanceConfig,
    previous_position: LinePosition,
}

impl<'c, P: GpioInterface, C: ClockInterface> ReflectanceArray<'c, P, C> {
    /// Build the array from its three channel pins in Left, Center, Right order
    pub fn new(
        pins: [P; 3],
        clock: &'c C,
        calibration: CalibrationSet,
        config: ReflectanceConfig,
    ) -> Self {
        let [left, center, right] = pins;
        Self {
            sensors: [
                ReflectanceSensor::new(left),
                ReflectanceSensor::new(center),
                ReflectanceSensor::new(right),
            ],
            clock,
            calibration,
            config,
            previous_position: LinePosition::At(1000),
        }
    }

    /// Current calibration
    pub fn calibration(&self) -> &CalibrationSet {
        &self.calibration
    }

    /// Mutable calibration access (manual threshold overrides)
    pub fn calibration_mut(&mut self) -> &mut CalibrationSet {
        &mut self.calibration
    }

    /// `raw > threshold` for one channel
    pub fn is_line_detected(&self, channel: Channel) -> bool {
        self.sensors[channel.index()].last_raw > self.calibration.threshold(channel)
    }

    /// Wait out the clock if a sweep could straddle the wrap boundary
    ///
    /// A sweep that starts just before the counter wraps would compute a
    /// spuriously huge elapsed time, so if less than `wrap_guard_us` remains
    /// in this clock epoch, wait out exactly the remainder so the sweep
    /// starts in the next one. The guard margin must exceed the worst-case
    /// sweep time; `ReflectanceConfig`'s default does.
    fn guard_clock_rollover(&self) {
        let remaining = self.clock.max_us().wrapping_sub(self.clock.now_us());
        if remaining < self.config.wrap_guard_us {
            self.clock.delay_us(remaining + 1);
        }
    }

    fn compute_position(&self, raw: &[RawTiming; 3]) -> LinePosition {
        let total: u32 = raw.iter().sum();
        let min_total: u32 = self.config.min_timer_us.iter().sum();
        let max_total = 3 * self.config.max_timer_us;

        if total >= max_total {
            return LinePosition::AllOnLine;
        }
        if total <= min_total {
            // Brief full loss of line (including the exact-minimum boundary,
            // which would leave the centroid undefined): hold the previous
            // estimate instead of reporting a meaningless one
            return self.previous_position;
        }

        // Signed per-channel differences: a channel below its calibrated
        // minimum pulls the centroid toward its end before the final clamp
        let diff = |channel: Channel| -> i32 {
            raw[channel.index()] as i32 - self.config.min_timer_us[channel.index()] as i32
        };
        let weighted = 1000 * diff(Channel::Center) + 2000 * diff(Channel::Right);
        let position = weighted / (total - min_total) as i32;
        LinePosition::At(position.clamp(0, 2000) as u16)
    }
}

impl<P: GpioInterface, C: ClockInterface> LineSensing for ReflectanceArray<'_, P, C> {
    fn acquire(&mut self) -> Result<[RawTiming; 3]> {
        self.guard_clock_rollover();

        let mut raw = [0; 3];
        for channel in Channel::ALL {
            raw[channel.index()] =
                self.sensors[channel.index()].acquire(self.clock, &self.config)?;
        }

        self.previous_position = self.compute_position(&raw);
        Ok(raw)
    }

    fn intensity(&self, channel: Channel) -> RawTiming {
        self.sensors[channel.index()].last_raw
    }

    fn line_state(&self) -> LineState {
        let mut state = LineState::empty();
        for channel in Channel::ALL {
            if self.is_line_detected(channel) {
                state |= LineState::flag(channel);
            }
        }
        state
    }
}

impl<P: GpioInterface, C: ClockInterface> ReflectanceArray<'_, P, C> {
    /// Centroid position estimate from the last sweep
    pub fn line_position(&self) -> LinePosition {
        self.previous_position
    }

    /// Coarse zone classification of the last position estimate
    ///
    /// `None` while all sensors are saturated (`AllOnLine`): a zone is
    /// meaningless without a usable centroid.
    pub fn line_zone(&self) -> Option<LineZone> {
        let position = match self.previous_position {
            LinePosition::AllOnLine => return None,
            LinePosition::At(p) => i32::from(p),
        };
        let center = i32::from(self.config.line_center_value);
        let segment = i32::from(self.config.line_segment);

        Some(if position > center + 3 * segment {
            LineZone::Right
        } else if position >= center + segment {
            LineZone::CenterRight
        } else if position > center - segment {
            LineZone::Center
        } else if position > center - 3 * segment {
            LineZone::CenterLeft
        } else {
            LineZone::Left
        })
    }
}
