//! Reactive driving/telemetry control loop
//!
//! One unbounded sequential loop, no scheduler: each cycle snapshots the
//! sensors, then either steers (Driving) or streams raw values (Telemetry).
//! Cycle time is dominated by the acquisition timeouts; there is no fixed
//! tick rate.
//!
//! Button edges arrive asynchronously from outside the core. They are
//! latched into a single-slot atomic mailbox ([`ModeLatch`]) and applied
//! only at the top of the next cycle, so a toggle can never preempt a
//! half-finished duty write.

use core::sync::atomic::{AtomicU8, Ordering};

use log::debug;

use crate::calibration::Channel;
use crate::config::ControlConfig;
use crate::drive::{DriveControl, Motor};
use crate::platform::{ConsoleInterface, Result};
use crate::sensors::{Distance, LineSensing, LineState, Ranging};

/// Operating mode, toggled by external button edges
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// Follow the line, braking for obstacles
    Driving,
    /// Skip steering; stream raw sensor values to the console
    Telemetry,
}

const LATCH_EMPTY: u8 = 0;
const LATCH_DRIVING: u8 = 1;
const LATCH_TELEMETRY: u8 = 2;

/// Single-slot mode mailbox between the button edge handler and the loop
///
/// Single writer (the edge handler), single reader (the loop). A second
/// request before the loop picks the first one up simply overwrites it —
/// only the latest edge matters.
#[derive(Debug)]
pub struct ModeLatch {
    pending: AtomicU8,
}

impl ModeLatch {
    pub const fn new() -> Self {
        Self {
            pending: AtomicU8::new(LATCH_EMPTY),
        }
    }

    /// Called from the button edge handler
    pub fn request(&self, mode: Mode) {
        let value = match mode {
            Mode::Driving => LATCH_DRIVING,
            Mode::Telemetry => LATCH_TELEMETRY,
        };
        self.pending.store(value, Ordering::Release);
    }

    /// Called once at the top of each cycle; consumes the pending request
    pub fn take(&self) -> Option<Mode> {
        match self.pending.swap(LATCH_EMPTY, Ordering::AcqRel) {
            LATCH_DRIVING => Some(Mode::Driving),
            LATCH_TELEMETRY => Some(Mode::Telemetry),
            _ => None,
        }
    }
}

impl Default for ModeLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// The per-cycle decision state machine
pub struct ControlLoop<'l, L, R, D, K>
where
    L: LineSensing,
    R: Ranging,
    D: DriveControl,
    K: ConsoleInterface,
{
    line: L,
    ranger: R,
    drive: D,
    console: K,
    latch: &'l ModeLatch,
    mode: Mode,
    config: ControlConfig,
}

impl<'l, L, R, D, K> ControlLoop<'l, L, R, D, K>
where
    L: LineSensing,
    R: Ranging,
    D: DriveControl,
    K: ConsoleInterface,
{
    pub fn new(
        line: L,
        ranger: R,
        drive: D,
        console: K,
        latch: &'l ModeLatch,
        initial_mode: Mode,
        config: ControlConfig,
    ) -> Self {
        Self {
            line,
            ranger,
            drive,
            console,
            latch,
            mode: initial_mode,
            config,
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Run one full cycle: apply a pending mode toggle, snapshot the
    /// sensors, then act on them
    pub fn step(&mut self) -> Result<()> {
        if let Some(mode) = self.latch.take() {
            if mode != self.mode {
                debug!("mode {:?} -> {:?}", self.mode, mode);
                self.mode = mode;
            }
        }

        self.line.acquire()?;
        let distance = self.ranger.measure()?;

        match self.mode {
            Mode::Driving => self.drive_cycle(distance),
            Mode::Telemetry => {
                self.emit_telemetry(distance);
                Ok(())
            }
        }
    }

    /// Run forever; use [`shutdown`](Self::shutdown) on the error path
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.step()?;
        }
    }

    /// Terminal safe state; call before process exit
    pub fn shutdown(&mut self) -> Result<()> {
        self.drive.brake()
    }

    /// Tear down into parts (sensor rigs, console) for inspection
    pub fn into_parts(self) -> (L, R, D, K) {
        (self.line, self.ranger, self.drive, self.console)
    }

    fn drive_cycle(&mut self, distance: Distance) -> Result<()> {
        // Hard safety gate: obstacle avoidance pre-empts all steering
        if distance < self.config.obstacle_threshold_cm {
            return self.drive.brake();
        }

        let cruise = self.config.cruise_percent;
        let state = self.line.line_state();

        // Priority ladder; first match wins. The two-sensor cases outrank
        // the single-sensor ones because a wide line lights adjacent
        // channels on its way out from under the center.
        if state.contains(LineState::CENTER | LineState::RIGHT) {
            // Sharp right while still advancing
            self.drive
                .set_differential(cruise, self.config.sharp_turn_percent)
        } else if state.contains(LineState::CENTER | LineState::LEFT) {
            // Sharp left while still advancing
            self.drive
                .set_differential(self.config.sharp_turn_percent, cruise)
        } else if state.contains(LineState::CENTER) {
            self.drive.set_differential(cruise, cruise)
        } else if state.contains(LineState::RIGHT) {
            // Pivot: left wheel only
            self.drive.set_unified(Motor::Left, cruise)?;
            self.drive.set_unified(Motor::Right, 0)
        } else if state.contains(LineState::LEFT) {
            // Pivot: right wheel only
            self.drive.set_unified(Motor::Right, cruise)?;
            self.drive.set_unified(Motor::Left, 0)
        } else {
            // Line lost: coast while searching, keep the prior duty
            Ok(())
        }
    }

    fn emit_telemetry(&mut self, distance: Distance) {
        let values = [
            self.line.intensity(Channel::Right) as i32,
            self.line.intensity(Channel::Center) as i32,
            self.line.intensity(Channel::Left) as i32,
            i32::from(distance),
        ];
        self.console.write_numbers(&values);
    }
}
