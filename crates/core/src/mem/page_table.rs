//! Page-table entries and the per-process page table.
//!
//! A PTE is a raw 32-bit bitfield wrapped in a newtype with typed accessors:
//! a present bit in the top bit and the physical frame number in the low
//! bits. The page table is a flat vector indexed by virtual page number,
//! sized at process creation to cover the configured address space.

use crate::common::{MemError, MemResult};

/// Page-table entry present bit (bit 31).
const PTE_PRESENT_BIT: u32 = 1 << 31;

/// Mask extracting the physical frame number from a PTE (bits 0-20).
const PTE_FPN_MASK: u32 = 0x001F_FFFF;

/// A strongly-typed wrapper around a raw 32-bit page-table entry.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pte(u32);

impl Pte {
    /// Creates a present entry mapping to the given frame number.
    pub fn present(fpn: u32) -> Self {
        Self(PTE_PRESENT_BIT | (fpn & PTE_FPN_MASK))
    }

    /// Creates an absent (unmapped) entry.
    pub fn absent() -> Self {
        Self(0)
    }

    /// Returns the underlying raw 32-bit value.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Returns true if the present bit is set.
    pub fn is_present(&self) -> bool {
        self.0 & PTE_PRESENT_BIT != 0
    }

    /// Extracts the physical frame number.
    pub fn fpn(&self) -> u32 {
        self.0 & PTE_FPN_MASK
    }
}

/// Per-process page table: virtual page number to PTE.
#[derive(Debug, Clone)]
pub struct PageTable {
    entries: Vec<Pte>,
}

impl PageTable {
    /// Creates a table of `vm_pages` absent entries.
    pub fn new(vm_pages: usize) -> Self {
        Self {
            entries: vec![Pte::absent(); vm_pages],
        }
    }

    /// Number of pages the table covers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the table covers no pages.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the entry for a page, or `None` if the page number is outside
    /// the table.
    pub fn get(&self, page: u32) -> Option<Pte> {
        self.entries.get(page as usize).copied()
    }

    /// Replaces the entry for a page.
    ///
    /// Fails with [`MemError::OutOfRange`] if the page number is outside the
    /// table.
    pub fn set(&mut self, page: u32, pte: Pte) -> MemResult<()> {
        let capacity = self.entries.len();
        match self.entries.get_mut(page as usize) {
            Some(slot) => {
                *slot = pte;
                Ok(())
            }
            None => Err(MemError::OutOfRange {
                addr: page as usize,
                size: 1,
                capacity,
            }),
        }
    }
}
