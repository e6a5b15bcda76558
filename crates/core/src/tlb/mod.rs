//! The TLB fast path.
//!
//! 1. **Cache:** Set-associative translation cache over a byte device.
//! 2. **Fault:** Page-fault handling populating the cache on a miss.
//! 3. **Access:** The CPU-facing facade serializing every operation behind
//!    one global lock.

/// CPU-facing access facade.
pub mod access;

/// Set-associative translation cache engine.
pub mod cache;

/// Page-fault handler.
pub mod fault;

pub use access::MemoryPath;
pub use cache::{CacheEntry, TranslationCache};
pub use fault::{FaultKind, handle_page_fault};
