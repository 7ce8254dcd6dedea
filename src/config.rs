//! Named tunables for the sensing/control core
//!
//! The hardware went through several firmware revisions whose constants
//! drifted (line threshold 500/580/700, ranging sentinel 0 vs 255). This
//! module normalizes all of them into one configurable implementation: each
//! struct's `Default` is the documented choice, and deployments override
//! fields instead of forking the code.

/// Reflectance acquisition tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflectanceConfig {
    /// Upper bound on one channel's discharge timing, µs. Hitting it means
    /// "at least this reflective/dark", not a precise measurement.
    pub max_timer_us: u32,
    /// Charge settle time before releasing the pin to float, µs
    pub settle_us: u32,
    /// Per-channel calibrated minimum timings (Left, Center, Right), µs
    pub min_timer_us: [u32; 3],
    /// Start-of-sweep rollover guard: if less than this remains before the
    /// clock wraps, wait out the remainder of the epoch first. Must exceed
    /// the worst-case sweep time of 3 × (settle + max_timer).
    pub wrap_guard_us: u32,
    /// Centroid value corresponding to the line under the center sensor
    pub line_center_value: u16,
    /// Width of one position zone around the center value
    pub line_segment: u16,
}

impl Default for ReflectanceConfig {
    fn default() -> Self {
        Self {
            max_timer_us: 1000,
            settle_us: 10,
            min_timer_us: [250, 250, 250],
            wrap_guard_us: 3100,
            line_center_value: 1000,
            line_segment: 150,
        }
    }
}

/// Calibration defaults and record location
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationConfig {
    /// Byte address of the persisted calibration record
    pub record_address: u32,
    /// Threshold used for every channel when no valid record is present
    pub default_threshold: u32,
    /// Default per-channel minimum timing, µs
    pub default_min: u32,
    /// Default per-channel maximum timing, µs
    pub default_max: u32,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            record_address: 0,
            default_threshold: 500,
            default_min: 250,
            default_max: 1000,
        }
    }
}

/// Ultrasonic ranging tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangerConfig {
    /// Maximum measurable distance, cm; doubles as the no-echo sentinel
    pub max_range_cm: u8,
    /// Round-trip speed-of-sound constant, µs per cm
    pub us_per_cm: u32,
    /// Low time before the trigger pulse, µs
    pub trigger_settle_us: u32,
    /// Trigger pulse width, µs
    pub trigger_pulse_us: u32,
}

impl Default for RangerConfig {
    fn default() -> Self {
        Self {
            max_range_cm: 255,
            us_per_cm: 38,
            trigger_settle_us: 2,
            trigger_pulse_us: 10,
        }
    }
}

/// Drive output tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriveConfig {
    /// PWM period applied alongside every duty update, ms
    pub pwm_period_ms: u32,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self { pwm_period_ms: 50 }
    }
}

/// Control-loop tunables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControlConfig {
    /// Distances below this brake unconditionally, cm
    pub obstacle_threshold_cm: u8,
    /// Forward speed while tracking the line, percent
    pub cruise_percent: i16,
    /// Slow-wheel speed during a sharp two-sensor correction, percent
    pub sharp_turn_percent: i16,
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            obstacle_threshold_cm: 15,
            cruise_percent: 50,
            sharp_turn_percent: 10,
        }
    }
}

/// Top-level configuration for the whole core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TracerConfig {
    pub reflectance: ReflectanceConfig,
    pub calibration: CalibrationConfig,
    pub ranger: RangerConfig,
    pub drive: DriveConfig,
    pub control: ControlConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_guard_exceeds_worst_case_sweep() {
        let cfg = ReflectanceConfig::default();
        let worst_case_sweep = 3 * (cfg.settle_us + cfg.max_timer_us);
        assert!(cfg.wrap_guard_us > worst_case_sweep);
    }

    #[test]
    fn test_ranging_timeout_is_bounded() {
        let cfg = RangerConfig::default();
        // 255 cm at 38 µs/cm stays far below the u32 clock range
        assert_eq!(cfg.max_range_cm as u32 * cfg.us_per_cm, 9690);
    }
}
