//! Reflectance calibration
//!
//! Per-channel {min, max, threshold} triples with two override paths on top
//! of the defaults: a factory record in the persisted store and a manual
//! threshold override for field tuning.
//!
//! # Record layout
//!
//! ```text
//! +0   u32  magic "rero" (big-endian ASCII, 0x7265_726F)
//! +4   u32  Left:   max in the upper 16 bits, min in the lower 16
//! +8   u32  Center: same packing
//! +12  u32  Right:  same packing
//! ```
//!
//! A record with the wrong magic (or an unreadable store) is rejected and
//! the defaults are kept; this is logged once at load, never per cycle.

use log::warn;

use crate::config::CalibrationConfig;
use crate::platform::StoreInterface;

/// Raw discharge timing in microseconds
///
/// Bounded above by the acquisition timeout; larger values mean a slower
/// discharge, i.e. less reflected infrared.
pub type RawTiming = u32;

/// Magic word identifying a valid calibration record ("rero", big-endian)
pub const CALIBRATION_MAGIC: u32 = u32::from_be_bytes(*b"rero");

/// One reflectance sensor position
///
/// The ordinal is the array index used everywhere a per-channel value is
/// stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Channel {
    Left = 0,
    Center = 1,
    Right = 2,
}

impl Channel {
    /// All channels in sweep order
    pub const ALL: [Channel; 3] = [Channel::Left, Channel::Center, Channel::Right];

    /// Stable array index for this channel
    pub fn index(self) -> usize {
        self as usize
    }
}

/// Calibration triple for one channel
///
/// Expected (not enforced) invariant: `min <= threshold <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CalibrationEntry {
    pub min: RawTiming,
    pub max: RawTiming,
    pub threshold: RawTiming,
}

impl CalibrationEntry {
    /// Build an entry from measured bounds, deriving the threshold
    ///
    /// The threshold is biased a quarter-range toward `min` (the bright,
    /// off-line side), so a channel trips earlier on its way onto the line
    /// than a plain midpoint would.
    pub fn from_bounds(min: RawTiming, max: RawTiming) -> Self {
        let mut entry = Self {
            min,
            max,
            threshold: 0,
        };
        entry.recompute_threshold();
        entry
    }

    /// Recompute `threshold = (max + min)/2 - (max - min)/4`
    ///
    /// Computed in i64 and clamped at zero so a malformed record with
    /// `min > max` cannot wrap.
    pub fn recompute_threshold(&mut self) {
        let min = i64::from(self.min);
        let max = i64::from(self.max);
        let threshold = (max + min) / 2 - (max - min) / 4;
        self.threshold = threshold.max(0) as RawTiming;
    }
}

/// Calibration for all three channels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalibrationSet {
    entries: [CalibrationEntry; 3],
}

impl CalibrationSet {
    /// Default calibration: documented constant threshold on every channel
    pub fn defaults(config: &CalibrationConfig) -> Self {
        let entry = CalibrationEntry {
            min: config.default_min,
            max: config.default_max,
            threshold: config.default_threshold,
        };
        Self {
            entries: [entry; 3],
        }
    }

    /// Load the persisted record, falling back to defaults if it is invalid
    pub fn load<S: StoreInterface>(store: &mut S, config: &CalibrationConfig) -> Self {
        match Self::from_store(store, config) {
            Some(set) => set,
            None => {
                warn!("calibration record invalid or unreadable, using defaults");
                Self::defaults(config)
            }
        }
    }

    /// Read and validate the persisted record
    ///
    /// Returns `None` when the magic does not match or any read fails.
    pub fn from_store<S: StoreInterface>(
        store: &mut S,
        config: &CalibrationConfig,
    ) -> Option<Self> {
        let base = config.record_address;
        let magic = store.read_u32(base).ok()?;
        if magic != CALIBRATION_MAGIC {
            return None;
        }

        let mut entries = [CalibrationEntry::from_bounds(0, 0); 3];
        for channel in Channel::ALL {
            let offset = 4 + 4 * channel.index() as u32;
            let packed = store.read_u32(base + offset).ok()?;
            let max = RawTiming::from((packed >> 16) as u16);
            let min = RawTiming::from(packed as u16);
            entries[channel.index()] = CalibrationEntry::from_bounds(min, max);
        }
        Some(Self { entries })
    }

    /// Calibration entry for one channel
    pub fn entry(&self, channel: Channel) -> &CalibrationEntry {
        &self.entries[channel.index()]
    }

    /// Detection threshold for one channel
    pub fn threshold(&self, channel: Channel) -> RawTiming {
        self.entries[channel.index()].threshold
    }

    /// Operator override of the thresholds only
    ///
    /// min/max stay untouched; this is the simple field-tuning path that
    /// does not require a factory calibration record.
    pub fn set_thresholds(&mut self, left: RawTiming, center: RawTiming, right: RawTiming) {
        self.entries[Channel::Left.index()].threshold = left;
        self.entries[Channel::Center.index()].threshold = center;
        self.entries[Channel::Right.index()].threshold = right;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::mock::MockStore;

    fn pack(max: u16, min: u16) -> u32 {
        (u32::from(max) << 16) | u32::from(min)
    }

    #[test]
    fn test_defaults_use_constant_threshold() {
        let config = CalibrationConfig::default();
        let set = CalibrationSet::defaults(&config);
        for channel in Channel::ALL {
            assert_eq!(set.threshold(channel), 500);
            assert_eq!(set.entry(channel).min, 250);
            assert_eq!(set.entry(channel).max, 1000);
        }
    }

    #[test]
    fn test_threshold_formula_biases_toward_min() {
        let entry = CalibrationEntry::from_bounds(200, 1000);
        // (1000+200)/2 - (1000-200)/4 = 600 - 200
        assert_eq!(entry.threshold, 400);
        assert!(entry.threshold < (entry.min + entry.max) / 2);
    }

    #[test]
    fn test_round_trip_from_store() {
        let config = CalibrationConfig::default();
        let mut store = MockStore::new();
        store.set_u32(0, CALIBRATION_MAGIC);
        store.set_u32(4, pack(900, 150));
        store.set_u32(8, pack(1000, 200));
        store.set_u32(12, pack(800, 100));

        let set = CalibrationSet::load(&mut store, &config);
        assert_eq!(set.entry(Channel::Left).min, 150);
        assert_eq!(set.entry(Channel::Left).max, 900);
        assert_eq!(set.entry(Channel::Center).min, 200);
        assert_eq!(set.entry(Channel::Center).max, 1000);
        assert_eq!(set.entry(Channel::Right).min, 100);
        assert_eq!(set.entry(Channel::Right).max, 800);

        for channel in Channel::ALL {
            let e = set.entry(channel);
            assert_eq!(e.threshold, (e.max + e.min) / 2 - (e.max - e.min) / 4);
        }
    }

    #[test]
    fn test_bad_magic_keeps_defaults() {
        let config = CalibrationConfig::default();
        let mut store = MockStore::new();
        store.set_u32(0, 0x6F72_6572); // "orer": right bytes, wrong order
        store.set_u32(4, pack(900, 150));

        let set = CalibrationSet::load(&mut store, &config);
        assert_eq!(set, CalibrationSet::defaults(&config));
    }

    #[test]
    fn test_unreadable_store_keeps_defaults() {
        let config = CalibrationConfig::default();
        let mut store = MockStore::new();
        store.set_u32(0, CALIBRATION_MAGIC);
        store.fail_all_reads();

        let set = CalibrationSet::load(&mut store, &config);
        assert_eq!(set, CalibrationSet::defaults(&config));
    }

    #[test]
    fn test_record_at_nonzero_address() {
        let config = CalibrationConfig {
            record_address: 16,
            ..CalibrationConfig::default()
        };
        let mut store = MockStore::new();
        store.set_u32(16, CALIBRATION_MAGIC);
        store.set_u32(20, pack(700, 100));
        store.set_u32(24, pack(700, 100));
        store.set_u32(28, pack(700, 100));

        let set = CalibrationSet::load(&mut store, &config);
        assert_eq!(set.entry(Channel::Center).max, 700);
    }

    #[test]
    fn test_manual_threshold_override_leaves_bounds() {
        let config = CalibrationConfig::default();
        let mut set = CalibrationSet::defaults(&config);
        set.set_thresholds(580, 600, 620);

        assert_eq!(set.threshold(Channel::Left), 580);
        assert_eq!(set.threshold(Channel::Center), 600);
        assert_eq!(set.threshold(Channel::Right), 620);
        for channel in Channel::ALL {
            assert_eq!(set.entry(channel).min, 250);
            assert_eq!(set.entry(channel).max, 1000);
        }
    }

    #[test]
    fn test_malformed_bounds_do_not_wrap() {
        // min > max violates the expected invariant; signed arithmetic keeps
        // the result finite instead of wrapping u32
        let entry = CalibrationEntry::from_bounds(1000, 0);
        assert_eq!(entry.threshold, 750);
    }
}
