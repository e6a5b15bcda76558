//! Bounds-checked byte device.
//!
//! `MemDevice` simulates a physical memory device: a fixed-size byte buffer
//! supporting random access at byte granularity. Every access range is
//! validated against the device capacity before any byte is touched; a
//! rejected access has no side effects. The same type backs both the
//! translation-cache store and the simulated RAM.

use tracing::debug;

use crate::common::{MemError, MemResult};

/// A fixed-size, bounds-checked byte buffer simulating a memory device.
///
/// Allocated once at construction with a caller-supplied capacity and never
/// resized. All reads and writes must satisfy `addr + size <= capacity`.
#[derive(Debug, Clone)]
pub struct MemDevice {
    bytes: Vec<u8>,
}

impl MemDevice {
    /// Creates a zero-filled device of the given capacity in bytes.
    pub fn new(capacity: usize) -> Self {
        Self {
            bytes: vec![0; capacity],
        }
    }

    /// Device capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.bytes.len()
    }

    /// Validates that `[addr, addr + size)` lies within the device.
    fn check(&self, addr: usize, size: usize) -> MemResult<()> {
        let ok = addr
            .checked_add(size)
            .is_some_and(|end| end <= self.bytes.len());
        if ok {
            Ok(())
        } else {
            Err(MemError::OutOfRange {
                addr,
                size,
                capacity: self.bytes.len(),
            })
        }
    }

    /// Returns a view of `size` bytes starting at `addr`.
    ///
    /// Fails with [`MemError::OutOfRange`] if the range exceeds capacity;
    /// never reads out of bounds and never mutates.
    pub fn read(&self, addr: usize, size: usize) -> MemResult<&[u8]> {
        self.check(addr, size)?;
        Ok(&self.bytes[addr..addr + size])
    }

    /// Copies `buf.len()` bytes starting at `addr` into `buf`.
    pub fn read_into(&self, addr: usize, buf: &mut [u8]) -> MemResult<()> {
        let src = self.read(addr, buf.len())?;
        buf.copy_from_slice(src);
        Ok(())
    }

    /// Reads a single byte.
    pub fn read_u8(&self, addr: usize) -> MemResult<u8> {
        Ok(self.read(addr, 1)?[0])
    }

    /// Overwrites `data.len()` bytes starting at `addr`.
    ///
    /// Same bound check as [`read`](Self::read); byte-for-byte and
    /// idempotent. A rejected write leaves the device untouched.
    pub fn write(&mut self, addr: usize, data: &[u8]) -> MemResult<()> {
        self.check(addr, data.len())?;
        self.bytes[addr..addr + data.len()].copy_from_slice(data);
        Ok(())
    }

    /// Writes a single byte.
    pub fn write_u8(&mut self, addr: usize, value: u8) -> MemResult<()> {
        self.write(addr, &[value])
    }

    /// Returns the full device contents.
    ///
    /// Diagnostic accessor; also used by tests asserting that failed
    /// operations leave a device byte-for-byte unchanged.
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Logs the non-zero contents of the device at debug level, 16 bytes per
    /// row. Never mutates state.
    pub fn dump(&self) {
        for (row, chunk) in self.bytes.chunks(16).enumerate() {
            if chunk.iter().any(|&b| b != 0) {
                debug!(offset = row * 16, bytes = ?chunk, "device row");
            }
        }
    }
}
