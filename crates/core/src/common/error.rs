//! Error types for the memory-access path.
//!
//! One taxonomy covers the whole fast path. A cache miss is deliberately not
//! an error: it is a control-flow signal (`Option::None` from a lookup) that
//! the access facade consumes to trigger fault handling. Everything that can
//! actually fail an operation is a `MemError`.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type MemResult<T> = Result<T, MemError>;

/// Failures surfaced by the memory-access path.
///
/// All variants are returned to the immediate caller; nothing is retried
/// automatically beyond the single fault-handling retry baked into the
/// read/write operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MemError {
    /// A register index outside the process register file was supplied.
    #[error("register index {0} out of range")]
    InvalidRegister(usize),

    /// A device access fell outside the device capacity. Always a
    /// programming or configuration error; fatal for the operation.
    #[error("device access out of range: addr={addr} size={size} capacity={capacity}")]
    OutOfRange {
        /// Starting byte offset of the rejected access.
        addr: usize,
        /// Length in bytes of the rejected access.
        size: usize,
        /// Total capacity of the device.
        capacity: usize,
    },

    /// A region operation referenced a slot that is out of the region
    /// table's bounds, not live, or already freed.
    #[error("region {0} is out of bounds or not live")]
    InvalidRegion(usize),

    /// The selected cache set has no free slot and no matching entry.
    ///
    /// The cache is an optimization, not the source of truth: user-visible
    /// operations treat this as best-effort and never fail because of it.
    /// Only direct cache callers observe the variant.
    #[error("cache set full: no free slot and no matching entry")]
    CacheFull,

    /// The frame allocator is exhausted. Fatal for the triggering access;
    /// existing state is left intact.
    #[error("frame allocator exhausted")]
    AllocationFailed,

    /// A virtual address has no present page-table entry at transfer time.
    #[error("virtual address {0:#010x} is not mapped")]
    NotMapped(u32),

    /// A read still missed the cache after fault handling. Indicates an
    /// inconsistency between the page table and the allocator's guarantees.
    #[error("unreadable address {0:#010x}: miss persisted after fault handling")]
    Unreadable(u32),

    /// A write still missed the cache after fault handling.
    #[error("unwritable address {0:#010x}: miss persisted after fault handling")]
    Unwritable(u32),

    /// The global memory-path lock was poisoned by an earlier panic.
    #[error("memory path lock poisoned by an earlier panic")]
    Poisoned,
}
