//! Simulated memory backend.
//!
//! `SimBackend` implements the external collaborator contracts over a RAM
//! [`MemDevice`] and a LIFO free-frame list: region-granular virtual memory
//! reservation, frame allocation, and byte-level transfer through the page
//! table. It exists so the fast path is runnable end to end; the TLB core
//! itself only ever talks to the [`MemoryBackend`] trait.

use tracing::warn;

use crate::common::{MemError, MemResult, VirtAddr};
use crate::config::TlbConfig;
use crate::mem::backend::{FrameHandle, MemoryBackend};
use crate::mem::device::MemDevice;
use crate::mem::page_table::Pte;
use crate::process::{Process, Region};
use crate::tlb::cache::TranslationCache;

/// Concrete backend: simulated RAM plus a free-frame pool.
#[derive(Debug)]
pub struct SimBackend {
    ram: MemDevice,
    free_frames: Vec<u32>,
    page_shift: u32,
}

impl SimBackend {
    /// Builds RAM and the frame pool from the configuration.
    pub fn new(config: &TlbConfig) -> Self {
        Self {
            ram: MemDevice::new(config.ram_capacity()),
            // LIFO pool; low frame numbers are handed out first.
            free_frames: (0..config.ram_frames as u32).rev().collect(),
            page_shift: config.page_shift,
        }
    }

    /// Frames currently available for allocation.
    pub fn free_frame_count(&self) -> usize {
        self.free_frames.len()
    }

    /// The RAM device.
    pub fn ram(&self) -> &MemDevice {
        &self.ram
    }

    /// Translates a mapped virtual address to a RAM byte offset.
    fn translate(&self, proc: &Process, vaddr: VirtAddr) -> MemResult<usize> {
        let page = vaddr.page_number(self.page_shift);
        match proc.page_table.get(page) {
            Some(pte) if pte.is_present() => {
                let frame_base = (pte.fpn() as usize) << self.page_shift;
                Ok(frame_base + vaddr.page_offset(self.page_shift) as usize)
            }
            _ => Err(MemError::NotMapped(vaddr.val())),
        }
    }

    /// Resolves a live region and bounds-checks `offset` against it.
    fn region_addr(&self, proc: &Process, region: usize, offset: u32) -> MemResult<VirtAddr> {
        let span = proc
            .region(region)
            .ok_or(MemError::InvalidRegion(region))?;
        let addr = span.start.wrapping_add(offset);
        if addr < span.start || addr >= span.end {
            return Err(MemError::OutOfRange {
                addr: addr as usize,
                size: 1,
                capacity: span.end as usize,
            });
        }
        Ok(VirtAddr::new(addr))
    }
}

impl MemoryBackend for SimBackend {
    fn alloc_frames(&mut self, count: usize) -> MemResult<Vec<FrameHandle>> {
        if self.free_frames.len() < count {
            return Err(MemError::AllocationFailed);
        }
        let at = self.free_frames.len() - count;
        Ok(self
            .free_frames
            .split_off(at)
            .into_iter()
            .map(FrameHandle::new)
            .collect())
    }

    fn alloc_region(
        &mut self,
        proc: &mut Process,
        region: usize,
        size: u32,
        cache: &mut TranslationCache,
    ) -> MemResult<u32> {
        if region >= proc.max_regions() || proc.region(region).is_some() {
            return Err(MemError::InvalidRegion(region));
        }

        let page_size = 1u32 << self.page_shift;
        let pages = size.div_ceil(page_size).max(1);
        let start = proc.brk();
        let start_page = start >> self.page_shift;

        // Validate the whole request before mutating anything.
        if (start_page + pages) as usize > proc.page_table.len() {
            return Err(MemError::OutOfRange {
                addr: (start_page + pages) as usize,
                size: pages as usize,
                capacity: proc.page_table.len(),
            });
        }
        if self.free_frames.len() < pages as usize {
            return Err(MemError::AllocationFailed);
        }

        for i in 0..pages {
            let page = start_page + i;
            let mut frames = self.alloc_frames(1)?;
            let handle = frames.pop().ok_or(MemError::AllocationFailed)?;
            let pfn = handle.fpn();
            proc.page_table.set(page, Pte::present(pfn))?;
            // Mapping a page populates the cache as a side effect.
            if let Err(MemError::CacheFull) = cache.insert(proc.pid, page, pfn) {
                warn!(pid = proc.pid, page, pfn, "cache set full while mapping region");
            }
        }

        let end = start + pages * page_size;
        // Slot bounds were checked above.
        let _ = proc.set_region(region, Region { start, end });
        proc.advance_brk(pages * page_size);
        Ok(start)
    }

    fn free_region(&mut self, proc: &mut Process, region: usize) -> MemResult<()> {
        let span = proc
            .take_region(region)
            .ok_or(MemError::InvalidRegion(region))?;

        for page in span.page_range(self.page_shift) {
            if let Some(pte) = proc.page_table.get(page) {
                if pte.is_present() {
                    self.free_frames.push(pte.fpn());
                    proc.page_table.set(page, Pte::absent())?;
                }
            }
        }
        Ok(())
    }

    fn read_byte(&self, proc: &Process, _vma: usize, region: usize, offset: u32) -> MemResult<u8> {
        let vaddr = self.region_addr(proc, region, offset)?;
        let phys = self.translate(proc, vaddr)?;
        self.ram.read_u8(phys)
    }

    fn write_byte(
        &mut self,
        proc: &mut Process,
        _vma: usize,
        region: usize,
        offset: u32,
        value: u8,
    ) -> MemResult<()> {
        let vaddr = self.region_addr(proc, region, offset)?;
        let phys = self.translate(proc, vaddr)?;
        self.ram.write_u8(phys, value)
    }
}
