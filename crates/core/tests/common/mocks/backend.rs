//! Scriptable mock memory backend.
//!
//! Lets tests control frame numbering, exhaust the allocator, and inject
//! transfer failures, so facade and fault-handler behavior can be pinned
//! down without the simulated RAM in the loop.

use tlbsim_core::common::{MemError, MemResult};
use tlbsim_core::mem::backend::{FrameHandle, MemoryBackend};
use tlbsim_core::mem::page_table::Pte;
use tlbsim_core::process::{Process, Region};
use tlbsim_core::tlb::cache::TranslationCache;

pub struct MockBackend {
    /// Next frame number the allocator hands out.
    pub next_frame: u32,
    /// Frames remaining before the allocator reports exhaustion.
    pub frames_left: usize,
    /// Force every `write_byte` to fail.
    pub fail_writes: bool,
    /// Force every `read_byte` to fail.
    pub fail_reads: bool,
    /// Byte returned by successful reads.
    pub read_value: u8,
    /// Page shift used for region mapping.
    pub page_shift: u32,
    /// Record of successful writes as `(region, offset, value)`.
    pub writes: Vec<(usize, u32, u8)>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            next_frame: 0,
            frames_left: usize::MAX,
            fail_writes: false,
            fail_reads: false,
            read_value: 0xAB,
            page_shift: 8,
            writes: Vec::new(),
        }
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend for MockBackend {
    fn alloc_frames(&mut self, count: usize) -> MemResult<Vec<FrameHandle>> {
        if self.frames_left < count {
            return Err(MemError::AllocationFailed);
        }
        self.frames_left -= count;
        let mut frames = Vec::with_capacity(count);
        for _ in 0..count {
            frames.push(FrameHandle::new(self.next_frame));
            self.next_frame += 1;
        }
        Ok(frames)
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
        for i in 0..pages {
            let page = (start >> self.page_shift) + i;
            let pfn = self.alloc_frames(1)?[0].fpn();
            proc.page_table.set(page, Pte::present(pfn))?;
            let _ = cache.insert(proc.pid, page, pfn);
        }
        let end = start + pages * page_size;
        assert!(proc.set_region(region, Region { start, end }));
        proc.advance_brk(pages * page_size);
        Ok(start)
    }

    fn free_region(&mut self, proc: &mut Process, region: usize) -> MemResult<()> {
        let span = proc
            .take_region(region)
            .ok_or(MemError::InvalidRegion(region))?;
        for page in span.page_range(self.page_shift) {
            proc.page_table.set(page, Pte::absent())?;
        }
        Ok(())
    }

    fn read_byte(&self, _proc: &Process, _vma: usize, region: usize, offset: u32) -> MemResult<u8> {
        if self.fail_reads {
            return Err(MemError::OutOfRange {
                addr: offset as usize,
                size: 1,
                capacity: 0,
            });
        }
        let _ = region;
        Ok(self.read_value)
    }

    fn write_byte(
        &mut self,
        _proc: &mut Process,
        _vma: usize,
        region: usize,
        offset: u32,
        value: u8,
    ) -> MemResult<()> {
        if self.fail_writes {
            return Err(MemError::OutOfRange {
                addr: offset as usize,
                size: 1,
                capacity: 0,
            });
        }
        self.writes.push((region, offset, value));
        Ok(())
    }
}
