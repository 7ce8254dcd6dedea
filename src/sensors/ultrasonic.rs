//! Ultrasonic ranging via pulse-width timing
//!
//! Fire a short trigger pulse, then time how long the echo pin stays high;
//! the round trip costs 38 µs per centimeter on this board's clock. A
//! missing echo yields the `max_range_cm` sentinel (255), never 0, so "no
//! object in range" can never be confused with "object touching the sensor".

use crate::config::RangerConfig;
use crate::platform::{ClockInterface, GpioInterface, Result};
use crate::sensors::PulseTimer;

/// Distance in centimeters; `max_range_cm` doubles as the no-echo sentinel
pub type Distance = u8;

/// Seam trait for ranging, implemented by [`UltrasonicRanger`]
pub trait Ranging {
    /// Fire one measurement cycle
    fn measure(&mut self) -> Result<Distance>;
}

/// Trigger/echo ultrasonic ranger
pub struct UltrasonicRanger<'c, T, E, C>
where
    T: GpioInterface,
    E: GpioInterface,
    C: ClockInterface,
{
    trigger: T,
    echo: E,
    clock: &'c C,
    config: RangerConfig,
}

impl<'c, T, E, C> UltrasonicRanger<'c, T, E, C>
where
    T: GpioInterface,
    E: GpioInterface,
    C: ClockInterface,
{
    pub fn new(trigger: T, echo: E, clock: &'c C, config: RangerConfig) -> Self {
        Self {
            trigger,
            echo,
            clock,
            config,
        }
    }
}

impl<T, E, C> Ranging for UltrasonicRanger<'_, T, E, C>
where
    T: GpioInterface,
    E: GpioInterface,
    C: ClockInterface,
{
    fn measure(&mut self) -> Result<Distance> {
        self.trigger.set_low()?;
        self.clock.delay_us(self.config.trigger_settle_us);
        self.trigger.set_high()?;
        self.clock.delay_us(self.config.trigger_pulse_us);
        self.trigger.set_low()?;

        let timeout_us = u32::from(self.config.max_range_cm) * self.config.us_per_cm;
        let timer = PulseTimer::new(self.clock);
        let echo_us = timer.measure_pulse(&self.echo, true, timeout_us);

        if echo_us == 0 {
            return Ok(self.config.max_range_cm);
        }
        let cm = echo_us / self.config.us_per_cm;
        Ok(cm.min(u32::from(self.config.max_range_cm)) as Distance)
    }
}
