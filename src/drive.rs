//! Differential-drive speed mixing
//!
//! Converts signed per-wheel percentages into 10-bit PWM duties for two
//! mirrored motor channels and drives the shared motor-enable line. The
//! wiring is physically mirrored, so "forward" moves the left duty *down*
//! from the neutral midpoint and the right duty *up*:
//!
//! ```text
//! left_duty  = (100 - percent) * 1023 / 200
//! right_duty = (100 + percent) * 1023 / 200
//! ```
//!
//! Braking is a distinguished state, not speed 0: both duties go to the
//! electrical neutral (stall) value and the enable line is deasserted. Every
//! duty-producing operation asserts the enable line as a side effect;
//! `brake` is the only operation that deasserts it.

use crate::config::DriveConfig;
use crate::platform::{GpioInterface, PwmInterface, Result, MAX_DUTY};

/// PWM duty that commands zero net rotation with the driver enabled
pub const NEUTRAL_DUTY: u16 = 511;

/// Motor selector for single-wheel commands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Motor {
    Left,
    Right,
    Both,
}

/// Last-applied drive output
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotorCommand {
    pub left_duty: u16,
    pub right_duty: u16,
    pub enabled: bool,
}

impl MotorCommand {
    /// The terminal safe state: both channels at neutral, driver disabled
    pub const BRAKE: MotorCommand = MotorCommand {
        left_duty: NEUTRAL_DUTY,
        right_duty: NEUTRAL_DUTY,
        enabled: false,
    };
}

/// Seam trait for drive output, implemented by [`DriveMixer`]
pub trait DriveControl {
    /// Independent signed percentages for both wheels, clamped to [-100, 100]
    fn set_differential(&mut self, left_percent: i16, right_percent: i16) -> Result<()>;

    /// Same transform applied to the selected motor(s) only
    ///
    /// The unselected motor's duty is left untouched, which is what permits
    /// single-wheel pivot turns.
    fn set_unified(&mut self, motor: Motor, percent: i16) -> Result<()>;

    /// Brake: both duties to neutral, enable deasserted; idempotent
    fn brake(&mut self) -> Result<()>;
}

/// Differential drive mixer over two PWM channels and an enable pin
pub struct DriveMixer<L, R, E>
where
    L: PwmInterface,
    R: PwmInterface,
    E: GpioInterface,
{
    left: L,
    right: R,
    enable: E,
    config: DriveConfig,
    last: MotorCommand,
}

/// `(100 - percent) * 1023 / 200`, clamped to the duty range
fn left_duty_for(percent: i16) -> u16 {
    let p = i32::from(percent.clamp(-100, 100));
    (((100 - p) * i32::from(MAX_DUTY)) / 200).clamp(0, i32::from(MAX_DUTY)) as u16
}

/// `(100 + percent) * 1023 / 200`, clamped to the duty range
fn right_duty_for(percent: i16) -> u16 {
    let p = i32::from(percent.clamp(-100, 100));
    (((100 + p) * i32::from(MAX_DUTY)) / 200).clamp(0, i32::from(MAX_DUTY)) as u16
}

impl<L, R, E> DriveMixer<L, R, E>
where
    L: PwmInterface,
    R: PwmInterface,
    E: GpioInterface,
{
    /// Create a mixer in the braked state (no output until first command)
    pub fn new(left: L, right: R, enable: E, config: DriveConfig) -> Self {
        Self {
            left,
            right,
            enable,
            config,
            last: MotorCommand::BRAKE,
        }
    }

    /// Last-applied command; useful for an idempotent re-brake on shutdown
    pub fn last_command(&self) -> MotorCommand {
        self.last
    }

    fn apply(&mut self, left_duty: u16, right_duty: u16) -> Result<()> {
        self.left.set_duty(left_duty)?;
        self.right.set_duty(right_duty)?;
        self.left.set_period_ms(self.config.pwm_period_ms)?;
        self.right.set_period_ms(self.config.pwm_period_ms)?;
        self.enable.set_high()?;
        self.last = MotorCommand {
            left_duty,
            right_duty,
            enabled: true,
        };
        Ok(())
    }

    /// Drive straight forward at `speed` percent (0..=100)
    pub fn forward(&mut self, speed: i16) -> Result<()> {
        let s = speed.clamp(0, 100);
        self.set_differential(s, s)
    }

    /// Drive straight backward at `speed` percent (0..=100)
    pub fn reverse(&mut self, speed: i16) -> Result<()> {
        let s = speed.clamp(0, 100);
        self.set_differential(-s, -s)
    }

    /// Rotate in place counter-clockwise at `speed` percent (0..=100)
    pub fn spin_left(&mut self, speed: i16) -> Result<()> {
        let s = speed.clamp(0, 100);
        self.set_differential(-s, s)
    }

    /// Rotate in place clockwise at `speed` percent (0..=100)
    pub fn spin_right(&mut self, speed: i16) -> Result<()> {
        let s = speed.clamp(0, 100);
        self.set_differential(s, -s)
    }
}

impl<L, R, E> DriveControl for DriveMixer<L, R, E>
where
    L: PwmInterface,
    R: PwmInterface,
    E: GpioInterface,
{
    fn set_differential(&mut self, left_percent: i16, right_percent: i16) -> Result<()> {
        self.apply(left_duty_for(left_percent), right_duty_for(right_percent))
    }

    fn set_unified(&mut self, motor: Motor, percent: i16) -> Result<()> {
        let (left_duty, right_duty) = match motor {
            Motor::Left => (left_duty_for(percent), self.last.right_duty),
            Motor::Right => (self.last.left_duty, right_duty_for(percent)),
            Motor::Both => (left_duty_for(percent), right_duty_for(percent)),
        };
        self.apply(left_duty, right_duty)
    }

    fn brake(&mut self) -> Result<()> {
        self.left.set_duty(NEUTRAL_DUTY)?;
        self.right.set_duty(NEUTRAL_DUTY)?;
        self.enable.set_low()?;
        self.last = MotorCommand::BRAKE;
        Ok(())
    }
}
