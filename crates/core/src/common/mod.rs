//! Common types shared across the TLB fast path.
//!
//! This module provides the fundamental building blocks used by every other
//! component:
//! 1. **Address Types:** A strong type for virtual addresses and page-number
//!    extraction.
//! 2. **Error Handling:** The `MemError` taxonomy and the `MemResult` alias.

/// Virtual address type and page arithmetic.
pub mod addr;

/// Error types for the memory-access path.
pub mod error;

pub use addr::VirtAddr;
pub use error::{MemError, MemResult};
