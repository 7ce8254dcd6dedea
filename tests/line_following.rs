//! End-to-end scenario tests: scripted sensors driving the real control
//! loop and the real drive mixer, duty values checked at the PWM seam.

use std::cell::RefCell;

use linetracer::calibration::{CalibrationSet, CALIBRATION_MAGIC};
use linetracer::config::{CalibrationConfig, ControlConfig, DriveConfig};
use linetracer::control::{ControlLoop, Mode, ModeLatch};
use linetracer::drive::{DriveMixer, MotorCommand, NEUTRAL_DUTY};
use linetracer::platform::error::{GpioError, PlatformError, StoreError};
use linetracer::platform::traits::{
    ConsoleInterface, GpioInterface, GpioMode, PwmInterface, StoreInterface, MAX_DUTY,
};
use linetracer::platform::Result;
use linetracer::sensors::{Distance, LineSensing, LineState, Ranging};
use linetracer::{Channel, RawTiming};

// --- minimal board rig -----------------------------------------------------

#[derive(Default)]
struct RigPwm {
    duty: u16,
    period_ms: Option<u32>,
}

impl PwmInterface for RigPwm {
    fn set_duty(&mut self, duty: u16) -> Result<()> {
        assert!(duty <= MAX_DUTY);
        self.duty = duty;
        Ok(())
    }

    fn duty(&self) -> u16 {
        self.duty
    }

    fn set_period_ms(&mut self, period_ms: u32) -> Result<()> {
        self.period_ms = Some(period_ms);
        Ok(())
    }
}

#[derive(Default)]
struct RigPin {
    high: bool,
}

impl GpioInterface for RigPin {
    fn set_high(&mut self) -> Result<()> {
        self.high = true;
        Ok(())
    }

    fn set_low(&mut self) -> Result<()> {
        self.high = false;
        Ok(())
    }

    fn read(&self) -> bool {
        self.high
    }

    fn set_mode(&mut self, mode: GpioMode) -> Result<()> {
        if !mode.is_output() {
            return Err(PlatformError::Gpio(GpioError::InvalidMode));
        }
        Ok(())
    }

    fn mode(&self) -> GpioMode {
        GpioMode::OutputPushPull
    }
}

/// Line sensor fed from a per-cycle script; repeats the last entry
struct CourseLine {
    script: Vec<(LineState, [RawTiming; 3])>,
    cycle: usize,
}

impl CourseLine {
    fn new(script: Vec<(LineState, [RawTiming; 3])>) -> Self {
        Self { script, cycle: 0 }
    }

    fn current(&self) -> &(LineState, [RawTiming; 3]) {
        let i = self.cycle.saturating_sub(1).min(self.script.len() - 1);
        &self.script[i]
    }
}

impl LineSensing for CourseLine {
    fn acquire(&mut self) -> Result<[RawTiming; 3]> {
        if self.cycle < self.script.len() {
            self.cycle += 1;
        }
        Ok(self.current().1)
    }

    fn intensity(&self, channel: Channel) -> RawTiming {
        self.current().1[channel.index()]
    }

    fn line_state(&self) -> LineState {
        self.current().0
    }
}

struct CourseRanger {
    script: Vec<Distance>,
    cycle: usize,
}

impl Ranging for CourseRanger {
    fn measure(&mut self) -> Result<Distance> {
        let d = self.script[self.cycle.min(self.script.len() - 1)];
        self.cycle += 1;
        Ok(d)
    }
}

#[derive(Default)]
struct RigConsole {
    lines: RefCell<Vec<String>>,
}

impl ConsoleInterface for RigConsole {
    fn write_line(&mut self, line: &str) {
        self.lines.borrow_mut().push(line.to_owned());
    }
}

type RigMixer = DriveMixer<RigPwm, RigPwm, RigPin>;

fn mixer() -> RigMixer {
    DriveMixer::new(
        RigPwm::default(),
        RigPwm::default(),
        RigPin::default(),
        DriveConfig::default(),
    )
}

fn duty_pair(pct_left: i16, pct_right: i16) -> (u16, u16) {
    (
        ((100 - i32::from(pct_left)) * 1023 / 200) as u16,
        ((100 + i32::from(pct_right)) * 1023 / 200) as u16,
    )
}

// --- scenarios -------------------------------------------------------------

#[test]
fn follows_line_brakes_for_obstacle_and_resumes() {
    let latch = ModeLatch::new();
    let line = CourseLine::new(vec![
        // Tracking straight, then the line drifts right, then recenters
        (LineState::CENTER, [300, 800, 300]),
        (LineState::CENTER | LineState::RIGHT, [300, 800, 700]),
        (LineState::RIGHT, [300, 300, 800]),
        (LineState::CENTER, [300, 800, 300]),
        (LineState::CENTER, [300, 800, 300]),
    ]);
    let ranger = CourseRanger {
        // Obstacle appears on cycle 4, gone by cycle 5
        script: vec![100, 100, 100, 5, 100],
        cycle: 0,
    };

    let mut ctl = ControlLoop::new(
        line,
        ranger,
        mixer(),
        RigConsole::default(),
        &latch,
        Mode::Driving,
        ControlConfig::default(),
    );

    // Cycle 1: center only, straight cruise
    ctl.step().unwrap();

    // Cycle 2: center+right, sharp right with both wheels advancing
    ctl.step().unwrap();

    // Cycle 3: right alone, pivot on the left wheel
    ctl.step().unwrap();

    // Cycle 4: obstacle gate wins even though center sees the line
    ctl.step().unwrap();

    // Cycle 5: obstacle cleared, back to cruising
    ctl.step().unwrap();

    ctl.shutdown().unwrap();
    let (_, _, drive, _) = ctl.into_parts();
    assert_eq!(drive.last_command(), MotorCommand::BRAKE);
}

#[test]
fn sharp_right_keeps_both_wheels_off_neutral() {
    let latch = ModeLatch::new();
    let line = CourseLine::new(vec![(LineState::CENTER | LineState::RIGHT, [300, 800, 700])]);
    let ranger = CourseRanger {
        script: vec![100],
        cycle: 0,
    };
    let mut ctl = ControlLoop::new(
        line,
        ranger,
        mixer(),
        RigConsole::default(),
        &latch,
        Mode::Driving,
        ControlConfig::default(),
    );

    ctl.step().unwrap();
    let (_, _, drive, _) = ctl.into_parts();
    let cmd = drive.last_command();
    let (expect_left, expect_right) = duty_pair(50, 10);
    assert_eq!(cmd.left_duty, expect_left);
    assert_eq!(cmd.right_duty, expect_right);
    assert_ne!(cmd.left_duty, NEUTRAL_DUTY);
    assert_ne!(cmd.right_duty, NEUTRAL_DUTY);
    assert!(cmd.enabled);
}

#[test]
fn obstacle_brake_reaches_the_pwm_seam() {
    let latch = ModeLatch::new();
    let line = CourseLine::new(vec![(LineState::CENTER, [300, 800, 300])]);
    let ranger = CourseRanger {
        script: vec![5],
        cycle: 0,
    };
    let mut ctl = ControlLoop::new(
        line,
        ranger,
        mixer(),
        RigConsole::default(),
        &latch,
        Mode::Driving,
        ControlConfig::default(),
    );

    ctl.step().unwrap();
    let (_, _, drive, _) = ctl.into_parts();
    assert_eq!(drive.last_command(), MotorCommand::BRAKE);
}

#[test]
fn telemetry_toggle_streams_and_stops_steering() {
    let latch = ModeLatch::new();
    let line = CourseLine::new(vec![
        (LineState::CENTER, [120, 850, 140]),
        (LineState::CENTER, [120, 850, 140]),
    ]);
    let ranger = CourseRanger {
        script: vec![40, 40],
        cycle: 0,
    };
    let mut ctl = ControlLoop::new(
        line,
        ranger,
        mixer(),
        RigConsole::default(),
        &latch,
        Mode::Driving,
        ControlConfig::default(),
    );

    // First cycle drives
    ctl.step().unwrap();
    let driving_cmd = {
        let (expect_left, expect_right) = duty_pair(50, 50);
        MotorCommand {
            left_duty: expect_left,
            right_duty: expect_right,
            enabled: true,
        }
    };

    // Button edge: telemetry from the next cycle on
    latch.request(Mode::Telemetry);
    ctl.step().unwrap();
    assert_eq!(ctl.mode(), Mode::Telemetry);

    let (_, _, drive, console) = ctl.into_parts();
    // Drive output unchanged since the last Driving cycle
    assert_eq!(drive.last_command(), driving_cmd);
    // Emission order is right, center, left, distance
    let lines = console.lines.borrow();
    assert_eq!(lines.as_slice(), &["140 850 120 40".to_owned()]);
}

#[test]
fn persisted_calibration_drives_detection_thresholds() {
    struct RigStore {
        words: [u32; 4],
    }

    impl StoreInterface for RigStore {
        fn read_u32(&mut self, address: u32) -> Result<u32> {
            self.words
                .get((address / 4) as usize)
                .copied()
                .ok_or(PlatformError::Store(StoreError::InvalidAddress))
        }
    }

    let pack = |max: u16, min: u16| (u32::from(max) << 16) | u32::from(min);
    let mut store = RigStore {
        words: [
            CALIBRATION_MAGIC,
            pack(900, 100), // left: threshold 300
            pack(1000, 200), // center: threshold 400
            pack(800, 400), // right: threshold 500
        ],
    };

    let config = CalibrationConfig::default();
    let set = CalibrationSet::load(&mut store, &config);
    assert_eq!(set.threshold(Channel::Left), 300);
    assert_eq!(set.threshold(Channel::Center), 400);
    assert_eq!(set.threshold(Channel::Right), 500);

    // And a truncated/garbage record falls back to the documented default
    let mut bad = RigStore { words: [0; 4] };
    let fallback = CalibrationSet::load(&mut bad, &config);
    for channel in [Channel::Left, Channel::Center, Channel::Right] {
        assert_eq!(fallback.threshold(channel), config.default_threshold);
    }
}
