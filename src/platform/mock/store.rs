//! Mock persisted store implementation for testing
//!
//! Word-granular in-memory store. Large enough for the calibration record
//! (one magic word plus three packed channel words) with room to spare.

use crate::platform::error::{PlatformError, StoreError};
use crate::platform::traits::StoreInterface;
use crate::platform::Result;

/// Number of 32-bit words in the mock store
const WORD_COUNT: usize = 16;

/// Mock persisted store
#[derive(Debug)]
pub struct MockStore {
    words: [u32; WORD_COUNT],
    fail_reads: bool,
}

impl MockStore {
    /// Create an empty (all-zero) mock store
    pub fn new() -> Self {
        Self {
            words: [0; WORD_COUNT],
            fail_reads: false,
        }
    }

    /// Write one word at a byte address (test setup)
    ///
    /// # Panics
    ///
    /// Panics on misaligned or out-of-range addresses; scripting the store
    /// wrong is a bug in the test, not a runtime condition.
    pub fn set_u32(&mut self, address: u32, value: u32) {
        assert_eq!(address % 4, 0, "store address must be word-aligned");
        self.words[(address / 4) as usize] = value;
    }

    /// Make every subsequent read fail (fault-path testing)
    pub fn fail_all_reads(&mut self) {
        self.fail_reads = true;
    }
}

impl Default for MockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StoreInterface for MockStore {
    fn read_u32(&mut self, address: u32) -> Result<u32> {
        if self.fail_reads {
            return Err(PlatformError::Store(StoreError::ReadFailed));
        }
        if address % 4 != 0 {
            return Err(PlatformError::Store(StoreError::InvalidAddress));
        }
        self.words
            .get((address / 4) as usize)
            .copied()
            .ok_or(PlatformError::Store(StoreError::InvalidAddress))
    }
}
