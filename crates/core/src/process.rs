//! Process context.
//!
//! The fast path consumes process state but does not own it: it reads the
//! pid, registers, and page-table entries, and writes page-table entries and
//! region slots. Region liveness is an explicit `Option`, not a zero/zero
//! sentinel, so "never allocated" and "already freed" are unrepresentable as
//! valid regions.

use std::ops::RangeInclusive;

use crate::config::TlbConfig;
use crate::mem::PageTable;

/// Number of general-purpose registers in the simulated CPU.
pub const NUM_REGS: usize = 10;

/// A live virtual memory region: the half-open byte range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// First byte of the region.
    pub start: u32,
    /// One past the last byte of the region. Always greater than `start`.
    pub end: u32,
}

impl Region {
    /// The inclusive range of virtual page numbers the region spans: the
    /// page of `start` through the page containing `end - 1`. A degenerate
    /// span (`end <= start`) clamps to the page of `start` rather than
    /// underflowing.
    pub fn page_range(&self, page_shift: u32) -> RangeInclusive<u32> {
        let last = self.end.saturating_sub(1).max(self.start);
        (self.start >> page_shift)..=(last >> page_shift)
    }
}

/// Context for one simulated process.
#[derive(Debug, Clone)]
pub struct Process {
    /// Process identifier; part of every cache-entry key.
    pub pid: u32,
    /// General-purpose register file.
    pub regs: [u32; NUM_REGS],
    /// Page table covering the configured virtual address space.
    pub page_table: PageTable,
    regions: Vec<Option<Region>>,
    brk: u32,
}

impl Process {
    /// Creates a fresh process context sized from the configuration.
    pub fn new(pid: u32, config: &TlbConfig) -> Self {
        Self {
            pid,
            regs: [0; NUM_REGS],
            page_table: PageTable::new(config.vm_pages),
            regions: vec![None; config.max_regions],
            brk: 0,
        }
    }

    /// Region symbol-table capacity.
    pub fn max_regions(&self) -> usize {
        self.regions.len()
    }

    /// Returns the live region in `slot`, or `None` if the slot is out of
    /// bounds or not live.
    pub fn region(&self, slot: usize) -> Option<Region> {
        self.regions.get(slot).copied().flatten()
    }

    /// Installs a live region into `slot`. Returns false if the slot is out
    /// of bounds.
    pub fn set_region(&mut self, slot: usize, region: Region) -> bool {
        match self.regions.get_mut(slot) {
            Some(entry) => {
                *entry = Some(region);
                true
            }
            None => false,
        }
    }

    /// Removes and returns the live region in `slot`.
    pub fn take_region(&mut self, slot: usize) -> Option<Region> {
        self.regions.get_mut(slot).and_then(Option::take)
    }

    /// Current region placement pointer. Always page-aligned.
    pub fn brk(&self) -> u32 {
        self.brk
    }

    /// Advances the placement pointer past a newly reserved region.
    pub fn advance_brk(&mut self, bytes: u32) {
        self.brk += bytes;
    }
}
