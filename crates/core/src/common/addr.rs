//! Virtual address type.
//!
//! A strong type for virtual addresses prevents accidental mixing of raw
//! offsets, page numbers, and addresses. The simulated machine has a 32-bit
//! virtual address space; the page size is a configuration-time constant
//! supplied as a shift.

/// A virtual address in the simulated process address space.
///
/// Virtual addresses are produced by register-relative arithmetic in the CPU
/// operations and must be translated to a physical frame through the
/// translation cache (or the page table on a miss) before any data transfer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct VirtAddr(pub u32);

impl VirtAddr {
    /// Creates a new virtual address from a raw 32-bit value.
    #[inline(always)]
    pub fn new(addr: u32) -> Self {
        Self(addr)
    }

    /// Returns the raw 32-bit address value.
    #[inline(always)]
    pub fn val(&self) -> u32 {
        self.0
    }

    /// Extracts the virtual page number for a given page shift.
    #[inline(always)]
    pub fn page_number(&self, page_shift: u32) -> u32 {
        self.0 >> page_shift
    }

    /// Extracts the byte offset within the page for a given page shift.
    #[inline(always)]
    pub fn page_offset(&self, page_shift: u32) -> u32 {
        self.0 & ((1 << page_shift) - 1)
    }
}

impl std::fmt::Display for VirtAddr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#010x}", self.0)
    }
}
