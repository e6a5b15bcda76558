//! CPU-facing access facade.
//!
//! `MemoryPath` is the entry point the simulated CPUs call. It owns the
//! translation cache, the memory backend, and the access statistics behind a
//! single `Mutex`: the global lock of the design. Every public operation
//! acquires the lock for its full duration, so a read or write including its
//! fault-handling pass executes as one atomic critical section. Callers
//! block on the lock and then run to completion; nothing yields mid-way.
//!
//! Per access the state machine is: lookup → hit: transfer | miss: handle
//! fault → retry lookup once → hit: transfer | miss: fatal. There is never a
//! second retry.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, trace, warn};

use crate::common::{MemError, MemResult, VirtAddr};
use crate::config::TlbConfig;
use crate::mem::backend::MemoryBackend;
use crate::process::Process;
use crate::stats::TlbStats;
use crate::tlb::cache::TranslationCache;
use crate::tlb::fault::handle_page_fault;

/// Everything the global lock protects.
struct PathState<B> {
    cache: TranslationCache,
    backend: B,
    stats: TlbStats,
}

impl<B: MemoryBackend> PathState<B> {
    /// Resolves a frame number for `vaddr`, running the fault handler on a
    /// miss and retrying the lookup exactly once.
    ///
    /// `Ok(None)` means the retry still missed; the caller maps that to the
    /// operation-specific fatal error.
    fn frame_for(
        &mut self,
        proc: &mut Process,
        vaddr: VirtAddr,
        page_shift: u32,
    ) -> MemResult<Option<u32>> {
        let page = vaddr.page_number(page_shift);

        if let Some(pfn) = self.cache.lookup(proc.pid, page) {
            self.stats.hits += 1;
            return Ok(Some(pfn));
        }
        self.stats.misses += 1;

        let kind = handle_page_fault(
            &mut self.cache,
            &mut self.backend,
            proc,
            vaddr,
            page_shift,
            &mut self.stats,
        )?;
        debug!(pid = proc.pid, %vaddr, ?kind, "page fault handled");

        Ok(self.cache.lookup(proc.pid, page))
    }
}

impl<B> std::fmt::Debug for PathState<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PathState").finish_non_exhaustive()
    }
}

/// The CPU-visible memory operations, serialized by one global lock.
#[derive(Debug)]
pub struct MemoryPath<B> {
    state: Mutex<PathState<B>>,
    page_shift: u32,
}

impl<B: MemoryBackend> MemoryPath<B> {
    /// Builds the facade over a fresh cache and the given backend.
    pub fn new(config: &TlbConfig, backend: B) -> Self {
        Self {
            state: Mutex::new(PathState {
                cache: TranslationCache::from_config(config),
                backend,
                stats: TlbStats::default(),
            }),
            page_shift: config.page_shift,
        }
    }

    /// Acquires the global lock, mapping poisoning to an error instead of a
    /// panic.
    fn lock(&self) -> MemResult<MutexGuard<'_, PathState<B>>> {
        self.state.lock().map_err(|_| MemError::Poisoned)
    }

    /// Allocates a memory region for `proc` in region-table slot `region`.
    ///
    /// Region reservation and page mapping are delegated to the backend,
    /// which populates the cache for each page it maps; the facade adds no
    /// cache writes of its own. Returns the region's start virtual address.
    pub fn alloc(&self, proc: &mut Process, size: u32, region: usize) -> MemResult<u32> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let addr = state
            .backend
            .alloc_region(proc, region, size, &mut state.cache)?;
        state.stats.allocs += 1;
        debug!(pid = proc.pid, region, size, addr, "region allocated");
        state.cache.dump();
        Ok(addr)
    }

    /// Frees the region in slot `region`.
    ///
    /// Every cache entry for a page the region spans is invalidated before
    /// the backend releases the region, so a concurrent fault can never
    /// observe a stale mapping for freed memory. The ordering is load-bearing.
    pub fn free(&self, proc: &mut Process, region: usize) -> MemResult<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let span = proc
            .region(region)
            .ok_or(MemError::InvalidRegion(region))?;

        for page in span.page_range(self.page_shift) {
            if state.cache.invalidate(proc.pid, page) {
                state.stats.invalidations += 1;
            }
        }

        state.backend.free_region(proc, region)?;
        state.stats.frees += 1;
        debug!(pid = proc.pid, region, "region freed");
        Ok(())
    }

    /// Reads one byte of region `source` at `offset` into register
    /// `dest_reg`.
    ///
    /// The translated virtual address is `regs[dest_reg] + offset`. A miss
    /// runs the fault handler and retries once; a second miss fails with
    /// [`MemError::Unreadable`]. The byte is widened into the full register.
    pub fn read(
        &self,
        proc: &mut Process,
        source: usize,
        offset: u32,
        dest_reg: usize,
    ) -> MemResult<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let base = *proc
            .regs
            .get(dest_reg)
            .ok_or(MemError::InvalidRegister(dest_reg))?;
        let vaddr = VirtAddr::new(base.wrapping_add(offset));

        let Some(pfn) = state.frame_for(proc, vaddr, self.page_shift)? else {
            warn!(pid = proc.pid, %vaddr, "read miss persisted after fault handling");
            return Err(MemError::Unreadable(vaddr.val()));
        };
        trace!(pid = proc.pid, %vaddr, pfn, source, offset, "read hit");

        let byte = state.backend.read_byte(proc, 0, source, offset)?;
        proc.regs[dest_reg] = u32::from(byte);
        state.stats.reads += 1;
        Ok(())
    }

    /// Writes `data` through destination index `dest` at `offset`.
    ///
    /// `dest` names both the register supplying the base address
    /// (`regs[dest] + offset` is the translated virtual address) and the
    /// region receiving the byte. Miss handling mirrors
    /// [`read`](Self::read) with [`MemError::Unwritable`] as the fatal case.
    /// The cache entry for the page is refreshed only after the backend
    /// write succeeds; a failed write leaves the cache untouched.
    pub fn write(&self, proc: &mut Process, data: u8, dest: usize, offset: u32) -> MemResult<()> {
        let mut guard = self.lock()?;
        let state = &mut *guard;

        let base = *proc
            .regs
            .get(dest)
            .ok_or(MemError::InvalidRegister(dest))?;
        let vaddr = VirtAddr::new(base.wrapping_add(offset));
        let page = vaddr.page_number(self.page_shift);

        let Some(pfn) = state.frame_for(proc, vaddr, self.page_shift)? else {
            warn!(pid = proc.pid, %vaddr, "write miss persisted after fault handling");
            return Err(MemError::Unwritable(vaddr.val()));
        };
        trace!(pid = proc.pid, %vaddr, pfn, dest, offset, data, "write hit");

        state.backend.write_byte(proc, 0, dest, offset, data)?;

        // Refresh only after the transfer succeeded.
        match state.cache.insert(proc.pid, page, pfn) {
            Ok(()) => {}
            Err(MemError::CacheFull) => {
                state.stats.dropped_inserts += 1;
                warn!(pid = proc.pid, page, pfn, "cache set full on write refresh");
            }
            Err(other) => return Err(other),
        }
        state.stats.writes += 1;
        Ok(())
    }

    /// Invalidates every cache entry belonging to `proc`.
    ///
    /// Returns the number of entries cleared. Called at process teardown.
    pub fn flush_pid(&self, proc: &Process) -> MemResult<usize> {
        let mut guard = self.lock()?;
        let cleared = guard.cache.flush_pid(proc.pid);
        guard.stats.invalidations += cleared as u64;
        Ok(cleared)
    }

    /// Diagnostic cache lookup without fault handling or stats effects.
    pub fn probe(&self, pid: u32, vpn: u32) -> MemResult<Option<u32>> {
        Ok(self.lock()?.cache.lookup(pid, vpn))
    }

    /// Byte-for-byte snapshot of the cache backing device.
    pub fn cache_snapshot(&self) -> MemResult<Vec<u8>> {
        Ok(self.lock()?.cache.store().bytes().to_vec())
    }

    /// Copy of the access statistics.
    pub fn stats(&self) -> MemResult<TlbStats> {
        Ok(self.lock()?.stats)
    }
}
