//! Configuration for the TLB fast path.
//!
//! All cache geometry and memory sizing is fixed at configuration time; no
//! value here is runtime-tunable once a `MemoryPath` exists. Configuration is
//! supplied as JSON (every field optional, falling back to `defaults`) or via
//! `TlbConfig::default()`.

use serde::Deserialize;

use crate::tlb::cache::ENTRY_SIZE;

/// Default configuration constants for the fast path.
///
/// These values define the baseline geometry when not explicitly overridden
/// in a JSON configuration file.
mod defaults {
    /// Number of sets in the translation cache.
    ///
    /// Set selection is `vpn % NUM_SETS`; the process id is deliberately not
    /// part of the index, so processes whose pages alias compete for slots.
    pub const NUM_SETS: usize = 32;

    /// Number of entry slots per cache set.
    ///
    /// A set with every slot valid rejects new mappings; there is no
    /// eviction policy.
    pub const ENTRIES_PER_SET: usize = 4;

    /// Page size as a shift (256-byte pages).
    pub const PAGE_SHIFT: u32 = 8;

    /// Number of pages in a process's virtual address space.
    pub const VM_PAGES: usize = 4096;

    /// Number of physical frames backing the simulated RAM.
    pub const RAM_FRAMES: usize = 1024;

    /// Maximum number of entries in a process's region symbol table.
    pub const MAX_REGIONS: usize = 30;
}

/// Geometry and sizing for the translation cache and the simulated memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TlbConfig {
    /// Number of sets in the translation cache.
    pub num_sets: usize,
    /// Number of entry slots per set.
    pub entries_per_set: usize,
    /// Page size expressed as a shift (`page_size == 1 << page_shift`).
    pub page_shift: u32,
    /// Virtual address space size in pages (page-table length).
    pub vm_pages: usize,
    /// Physical frames available to the simulated RAM and frame allocator.
    pub ram_frames: usize,
    /// Region symbol-table capacity per process.
    pub max_regions: usize,
}

impl Default for TlbConfig {
    fn default() -> Self {
        Self {
            num_sets: defaults::NUM_SETS,
            entries_per_set: defaults::ENTRIES_PER_SET,
            page_shift: defaults::PAGE_SHIFT,
            vm_pages: defaults::VM_PAGES,
            ram_frames: defaults::RAM_FRAMES,
            max_regions: defaults::MAX_REGIONS,
        }
    }
}

impl TlbConfig {
    /// Page size in bytes.
    #[inline]
    pub fn page_size(&self) -> u32 {
        1 << self.page_shift
    }

    /// Capacity in bytes of the cache backing device implied by the
    /// configured geometry.
    pub fn device_capacity(&self) -> usize {
        self.num_sets * self.entries_per_set * ENTRY_SIZE
    }

    /// Capacity in bytes of the simulated RAM.
    pub fn ram_capacity(&self) -> usize {
        self.ram_frames << self.page_shift
    }
}
