//! Access statistics for the TLB fast path.
//!
//! Tracks cache behavior (hits, misses, dropped inserts, invalidations),
//! fault classification (soft vs. hard), and completed operations. Counters
//! live inside the facade's global lock, so updates need no atomics.

use std::fmt;

/// Counters for one `MemoryPath` instance.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TlbStats {
    /// Cache lookups that hit on the first try.
    pub hits: u64,
    /// Cache lookups that missed and entered fault handling.
    pub misses: u64,
    /// Faults where the page table already held a present mapping.
    pub soft_faults: u64,
    /// Faults that required frame allocation and PTE installation.
    pub hard_faults: u64,
    /// Cache inserts dropped because the target set was full.
    pub dropped_inserts: u64,
    /// Cache entries cleared by region frees and pid flushes.
    pub invalidations: u64,
    /// Completed read operations.
    pub reads: u64,
    /// Completed write operations.
    pub writes: u64,
    /// Completed region allocations.
    pub allocs: u64,
    /// Completed region frees.
    pub frees: u64,
}

impl TlbStats {
    /// Total first-try lookups.
    pub fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, or 0.0 with no accesses.
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

impl fmt::Display for TlbStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "tlb: {} accesses, {} hits, {} misses ({:.1}% hit rate)",
            self.accesses(),
            self.hits,
            self.misses,
            self.hit_rate() * 100.0
        )?;
        writeln!(
            f,
            "faults: {} soft, {} hard; {} inserts dropped, {} invalidations",
            self.soft_faults, self.hard_faults, self.dropped_inserts, self.invalidations
        )?;
        write!(
            f,
            "ops: {} reads, {} writes, {} allocs, {} frees",
            self.reads, self.writes, self.allocs, self.frees
        )
    }
}
