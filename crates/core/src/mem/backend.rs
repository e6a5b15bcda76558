//! External collaborator contracts consumed by the fast path.
//!
//! The TLB core does not implement region bookkeeping, frame allocation, or
//! byte-level transfer itself; it drives them through this trait. The crate
//! ships one concrete implementation ([`crate::sim::SimBackend`]) so the core
//! is runnable; tests substitute scriptable mocks at the same seam.

use crate::common::MemResult;
use crate::process::Process;
use crate::tlb::cache::TranslationCache;

/// Descriptor for a physical frame handed out by the allocator.
///
/// The descriptor is disposable: callers capture the frame number and drop
/// the handle; only the number persists in the page table and the cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameHandle {
    fpn: u32,
}

impl FrameHandle {
    /// Wraps a physical frame number.
    pub fn new(fpn: u32) -> Self {
        Self { fpn }
    }

    /// The physical frame number.
    pub fn fpn(&self) -> u32 {
        self.fpn
    }
}

/// Services the fast path consumes from the rest of the simulator.
pub trait MemoryBackend {
    /// Allocates `count` physical frames.
    ///
    /// Fails with [`crate::common::MemError::AllocationFailed`] when the
    /// frame pool cannot satisfy the request; on failure no frame is taken.
    fn alloc_frames(&mut self, count: usize) -> MemResult<Vec<FrameHandle>>;

    /// Reserves a virtual region of at least `size` bytes in slot `region`
    /// of the process's region table, maps frames for every page it spans,
    /// and populates `cache` for each mapped page.
    ///
    /// Returns the region's start virtual address.
    fn alloc_region(
        &mut self,
        proc: &mut Process,
        region: usize,
        size: u32,
        cache: &mut TranslationCache,
    ) -> MemResult<u32>;

    /// Releases a live region: unmaps its pages and returns their frames to
    /// the pool. Cache invalidation is the caller's job and must happen
    /// before this call.
    fn free_region(&mut self, proc: &mut Process, region: usize) -> MemResult<()>;

    /// Reads one byte at `offset` into the region held in slot `region`.
    ///
    /// `vma` selects the virtual memory area; the fast path always passes 0.
    fn read_byte(&self, proc: &Process, vma: usize, region: usize, offset: u32) -> MemResult<u8>;

    /// Writes one byte at `offset` into the region held in slot `region`.
    fn write_byte(
        &mut self,
        proc: &mut Process,
        vma: usize,
        region: usize,
        offset: u32,
        value: u8,
    ) -> MemResult<()>;
}
