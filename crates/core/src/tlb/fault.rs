//! Page-fault handling.
//!
//! A cache miss lands here. A **soft miss** means the page table already
//! holds a present mapping that simply is not cached; the handler re-inserts
//! it. A **hard miss** means the page was never mapped: the handler takes a
//! frame from the allocator, installs a present page-table entry, and then
//! populates the cache.
//!
//! Cache population is best effort throughout: a full set is logged and
//! swallowed, because losing a cache write must not fail the access that
//! triggered the fault. The subsequent retry in the facade surfaces any
//! remaining miss.

use tracing::{debug, warn};

use crate::common::{MemError, MemResult, VirtAddr};
use crate::mem::backend::MemoryBackend;
use crate::mem::page_table::Pte;
use crate::process::Process;
use crate::stats::TlbStats;
use crate::tlb::cache::TranslationCache;

/// Classification of a handled fault.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Mapping existed in the page table; only the cache was cold.
    Soft,
    /// Page was unmapped; a frame was allocated and a PTE installed.
    Hard,
}

/// Best-effort cache insert: a full set is not an error on the fault path.
fn insert_best_effort(
    cache: &mut TranslationCache,
    stats: &mut TlbStats,
    pid: u32,
    vpn: u32,
    pfn: u32,
) -> MemResult<()> {
    match cache.insert(pid, vpn, pfn) {
        Ok(()) => Ok(()),
        Err(MemError::CacheFull) => {
            stats.dropped_inserts += 1;
            warn!(pid, vpn, pfn, "cache set full, mapping not cached");
            Ok(())
        }
        Err(other) => Err(other),
    }
}

/// Handles a page fault for `vaddr` in `proc`.
///
/// On success the page table holds a present entry for the faulting page and
/// the cache has been (best-effort) populated with its frame number. A page
/// past the end of the table fails with [`MemError::OutOfRange`] before any
/// frame is taken; a hard miss that cannot get a frame fails with
/// [`MemError::AllocationFailed`]. Existing state is left intact on every
/// error path, including the frame pool.
pub fn handle_page_fault<B: MemoryBackend>(
    cache: &mut TranslationCache,
    backend: &mut B,
    proc: &mut Process,
    vaddr: VirtAddr,
    page_shift: u32,
    stats: &mut TlbStats,
) -> MemResult<FaultKind> {
    let page = vaddr.page_number(page_shift);

    match proc.page_table.get(page) {
        Some(pte) if pte.is_present() => {
            // Mapped but not cached: repopulate only.
            debug!(pid = proc.pid, page, pfn = pte.fpn(), "soft page fault");
            stats.soft_faults += 1;
            insert_best_effort(cache, stats, proc.pid, page, pte.fpn())?;
            return Ok(FaultKind::Soft);
        }
        _ => {}
    }

    // Reject unmappable pages before taking a frame, so a bad address can
    // never drain the pool.
    let capacity = proc.page_table.len();
    if page as usize >= capacity {
        return Err(MemError::OutOfRange {
            addr: page as usize,
            size: 1,
            capacity,
        });
    }

    let mut frames = backend.alloc_frames(1)?;
    let frame = frames.pop().ok_or(MemError::AllocationFailed)?;
    let pfn = frame.fpn();
    // Only the number outlives the descriptor.
    drop(frame);

    proc.page_table.set(page, Pte::present(pfn))?;
    debug!(pid = proc.pid, page, pfn, "hard page fault");
    stats.hard_faults += 1;
    insert_best_effort(cache, stats, proc.pid, page, pfn)?;
    Ok(FaultKind::Hard)
}
