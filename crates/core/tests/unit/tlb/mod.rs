//! Unit tests for the TLB fast path.
