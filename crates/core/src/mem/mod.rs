//! Memory primitives backing the TLB fast path.
//!
//! 1. **Device:** `MemDevice`, a fixed-size bounds-checked byte buffer. One
//!    instance backs the translation cache; another stands in for RAM.
//! 2. **Page Table:** Raw-bitfield PTEs and the per-process page table.
//! 3. **Backend:** The external collaborator contracts (frame allocator,
//!    region services, byte transfer) consumed by the fast path.

/// External collaborator contracts.
pub mod backend;

/// Bounds-checked byte device.
pub mod device;

/// Page-table entries and the per-process page table.
pub mod page_table;

pub use backend::{FrameHandle, MemoryBackend};
pub use device::MemDevice;
pub use page_table::{PageTable, Pte};
