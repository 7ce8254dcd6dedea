//! Persisted store interface trait
//!
//! This module defines the byte-addressable read interface over the board's
//! persisted storage. The only consumer in this crate is the calibration
//! record loader, which reads a handful of u32 words at a fixed offset.

use crate::platform::Result;

/// Byte-addressable persisted store (read side)
///
/// # Safety Invariants
///
/// - Store must be initialized before use
/// - Only one owner per store instance
/// - `address` is a byte offset; implementations may require word alignment
pub trait StoreInterface {
    /// Read one 32-bit word at the given byte address
    ///
    /// # Errors
    ///
    /// Returns `PlatformError::Store(StoreError::InvalidAddress)` if the
    /// address is out of bounds or misaligned, and
    /// `PlatformError::Store(StoreError::ReadFailed)` if the underlying read
    /// fails.
    fn read_u32(&mut self, address: u32) -> Result<u32>;
}
