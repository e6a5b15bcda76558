//! Software TLB fast path for a teaching OS simulator.
//!
//! This crate implements the memory-access fast path of the simulator:
//! 1. **Device:** A fixed-size, bounds-checked byte buffer standing in for a
//!    physical memory device (used both as the TLB cache store and as RAM).
//! 2. **Cache:** A set-associative translation cache mapping
//!    `(pid, virtual page) → physical frame`, stored as fixed-width binary
//!    records inside the device.
//! 3. **Fault path:** Soft misses repopulate the cache from the page table;
//!    hard misses allocate a frame, install the page-table entry, then
//!    populate the cache.
//! 4. **Facade:** The CPU-visible `alloc`/`free`/`read`/`write` operations,
//!    fully serialized behind one global lock.
//! 5. **Backend:** The external page-table/allocator/transfer contracts, plus
//!    a concrete simulated implementation for tests and the CLI.

/// Common types (addresses, errors).
pub mod common;
/// Simulator configuration (defaults, tunables).
pub mod config;
/// Memory primitives (byte device, page table, backend contracts).
pub mod mem;
/// Process context (registers, page table, region table).
pub mod process;
/// Simulated memory backend used by the CLI and integration tests.
pub mod sim;
/// Access statistics collection.
pub mod stats;
/// The TLB itself (cache engine, fault handler, access facade).
pub mod tlb;

/// Root configuration type; use `TlbConfig::default()` or deserialize from JSON.
pub use crate::config::TlbConfig;
/// Process context carrying pid, registers, page table, and region table.
pub use crate::process::Process;
/// CPU-facing facade over the cache, the fault handler, and the backend.
pub use crate::tlb::access::MemoryPath;
