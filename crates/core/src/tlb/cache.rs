//! Set-associative translation cache.
//!
//! The cache maps `(pid, virtual page number)` to a physical frame number.
//! Entries live as fixed-width binary records inside a [`MemDevice`]: the
//! device is partitioned into sets, each set a contiguous run of
//! `entries_per_set` record slots. Set selection hashes only the page number
//! (`vpn % num_sets`), so distinct processes whose pages alias compete for
//! the same slots.
//!
//! There is no eviction policy. An insert either updates a matching entry in
//! place, takes the first invalid slot, or fails with
//! [`MemError::CacheFull`]; a full set rejects new mappings until something
//! invalidates an entry.

use tracing::trace;

use crate::common::{MemError, MemResult};
use crate::config::TlbConfig;
use crate::mem::MemDevice;

/// Size in bytes of one serialized cache record.
pub const ENTRY_SIZE: usize = 13;

/// Byte offset of the pid field within a record.
const PID_OFFSET: usize = 0;

/// Byte offset of the virtual page number field within a record.
const VPN_OFFSET: usize = 4;

/// Byte offset of the physical frame number field within a record.
const PFN_OFFSET: usize = 8;

/// Byte offset of the validity flag within a record.
const VALID_OFFSET: usize = 12;

/// Decodes a little-endian u32 at `at` inside a record.
fn decode_u32(raw: &[u8; ENTRY_SIZE], at: usize) -> u32 {
    let mut word = [0u8; 4];
    word.copy_from_slice(&raw[at..at + 4]);
    u32::from_le_bytes(word)
}

/// Encodes `value` little-endian at `at` inside a record.
fn encode_u32(raw: &mut [u8; ENTRY_SIZE], at: usize, value: u32) {
    raw[at..at + 4].copy_from_slice(&value.to_le_bytes());
}

/// One translation-cache entry in decoded form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheEntry {
    /// Owning process id.
    pub pid: u32,
    /// Virtual page number (tag).
    pub vpn: u32,
    /// Physical frame number (data).
    pub pfn: u32,
    /// Entry validity flag.
    pub valid: bool,
}

impl CacheEntry {
    /// Serializes the entry into its fixed-width record form.
    ///
    /// Field order and widths are stable: pid, vpn, pfn as little-endian
    /// u32, then a one-byte validity flag.
    pub fn encode(&self) -> [u8; ENTRY_SIZE] {
        let mut raw = [0u8; ENTRY_SIZE];
        encode_u32(&mut raw, PID_OFFSET, self.pid);
        encode_u32(&mut raw, VPN_OFFSET, self.vpn);
        encode_u32(&mut raw, PFN_OFFSET, self.pfn);
        raw[VALID_OFFSET] = u8::from(self.valid);
        raw
    }

    /// Deserializes an entry from its record form. Exact inverse of
    /// [`encode`](Self::encode).
    pub fn decode(raw: &[u8; ENTRY_SIZE]) -> Self {
        Self {
            pid: decode_u32(raw, PID_OFFSET),
            vpn: decode_u32(raw, VPN_OFFSET),
            pfn: decode_u32(raw, PFN_OFFSET),
            valid: raw[VALID_OFFSET] != 0,
        }
    }
}

/// Set-associative cache of `(pid, vpn) → pfn` mappings over a byte device.
///
/// The cache itself carries no lock; all entry points are serialized by the
/// facade's global lock.
#[derive(Debug, Clone)]
pub struct TranslationCache {
    store: MemDevice,
    num_sets: usize,
    entries_per_set: usize,
}

impl TranslationCache {
    /// Creates a cache with the given geometry over a fresh device.
    ///
    /// Geometry values are clamped to at least one set and one slot.
    pub fn new(num_sets: usize, entries_per_set: usize) -> Self {
        let num_sets = num_sets.max(1);
        let entries_per_set = entries_per_set.max(1);
        Self {
            store: MemDevice::new(num_sets * entries_per_set * ENTRY_SIZE),
            num_sets,
            entries_per_set,
        }
    }

    /// Creates a cache with the configured geometry.
    pub fn from_config(config: &TlbConfig) -> Self {
        Self::new(config.num_sets, config.entries_per_set)
    }

    /// Number of sets.
    pub fn num_sets(&self) -> usize {
        self.num_sets
    }

    /// Slots per set.
    pub fn entries_per_set(&self) -> usize {
        self.entries_per_set
    }

    /// The backing device.
    pub fn store(&self) -> &MemDevice {
        &self.store
    }

    /// Set index for a page number.
    fn set_index(&self, vpn: u32) -> usize {
        vpn as usize % self.num_sets
    }

    /// Byte address of a record slot.
    fn entry_addr(&self, set: usize, slot: usize) -> usize {
        (set * self.entries_per_set + slot) * ENTRY_SIZE
    }

    /// Loads the record in `slot` of `set`.
    fn load(&self, set: usize, slot: usize) -> MemResult<CacheEntry> {
        let mut raw = [0u8; ENTRY_SIZE];
        self.store.read_into(self.entry_addr(set, slot), &mut raw)?;
        Ok(CacheEntry::decode(&raw))
    }

    /// Stores a record into `slot` of `set`.
    fn save(&mut self, set: usize, slot: usize, entry: &CacheEntry) -> MemResult<()> {
        self.store.write(self.entry_addr(set, slot), &entry.encode())
    }

    /// Looks up the frame number cached for `(pid, vpn)`.
    ///
    /// Scans the selected set in slot order and returns the first valid
    /// match; `None` is a miss. Lookups never mutate the cache.
    pub fn lookup(&self, pid: u32, vpn: u32) -> Option<u32> {
        let set = self.set_index(vpn);
        for slot in 0..self.entries_per_set {
            let entry = self.load(set, slot).ok()?;
            if entry.valid && entry.pid == pid && entry.vpn == vpn {
                trace!(pid, vpn, pfn = entry.pfn, set, slot, "tlb hit");
                return Some(entry.pfn);
            }
        }
        trace!(pid, vpn, set, "tlb miss");
        None
    }

    /// Inserts or refreshes the mapping `(pid, vpn) → pfn`.
    ///
    /// A matching entry is updated in place and re-marked valid; this is the
    /// cache's only update semantics. Otherwise the first invalid slot in
    /// the set takes a new record. With no match and no free slot the insert
    /// fails with [`MemError::CacheFull`]; nothing is evicted.
    pub fn insert(&mut self, pid: u32, vpn: u32, pfn: u32) -> MemResult<()> {
        let set = self.set_index(vpn);
        let mut free_slot = None;

        for slot in 0..self.entries_per_set {
            let entry = self.load(set, slot)?;
            if entry.valid && entry.pid == pid && entry.vpn == vpn {
                let updated = CacheEntry { pfn, ..entry };
                self.save(set, slot, &updated)?;
                trace!(pid, vpn, pfn, set, slot, "tlb update");
                return Ok(());
            }
            if !entry.valid && free_slot.is_none() {
                free_slot = Some(slot);
            }
        }

        match free_slot {
            Some(slot) => {
                let entry = CacheEntry {
                    pid,
                    vpn,
                    pfn,
                    valid: true,
                };
                self.save(set, slot, &entry)?;
                trace!(pid, vpn, pfn, set, slot, "tlb fill");
                Ok(())
            }
            None => Err(MemError::CacheFull),
        }
    }

    /// Clears the validity flag of the entry for `(pid, vpn)`, if present.
    ///
    /// Returns true if an entry was invalidated. This is a real
    /// invalidation; the slot becomes reusable by the next insert.
    pub fn invalidate(&mut self, pid: u32, vpn: u32) -> bool {
        let set = self.set_index(vpn);
        for slot in 0..self.entries_per_set {
            let Ok(entry) = self.load(set, slot) else {
                return false;
            };
            if entry.valid && entry.pid == pid && entry.vpn == vpn {
                let cleared = CacheEntry {
                    valid: false,
                    ..entry
                };
                if self.save(set, slot, &cleared).is_ok() {
                    trace!(pid, vpn, set, slot, "tlb invalidate");
                    return true;
                }
                return false;
            }
        }
        false
    }

    /// Invalidates every entry belonging to `pid` across all sets.
    ///
    /// Returns the number of entries cleared. Used at process teardown.
    pub fn flush_pid(&mut self, pid: u32) -> usize {
        let mut cleared = 0;
        for set in 0..self.num_sets {
            for slot in 0..self.entries_per_set {
                let Ok(entry) = self.load(set, slot) else {
                    continue;
                };
                if entry.valid && entry.pid == pid {
                    let invalid = CacheEntry {
                        valid: false,
                        ..entry
                    };
                    if self.save(set, slot, &invalid).is_ok() {
                        cleared += 1;
                    }
                }
            }
        }
        trace!(pid, cleared, "tlb flush");
        cleared
    }

    /// Logs the non-zero portion of the backing device at debug level.
    pub fn dump(&self) {
        self.store.dump();
    }
}
