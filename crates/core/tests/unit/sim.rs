//! Simulated backend unit tests.
//!
//! The facade tests exercise `SimBackend` end to end; these pin down the
//! transfer-path error cases in isolation.

use pretty_assertions::assert_eq;
use tlbsim_core::common::MemError;
use tlbsim_core::mem::backend::MemoryBackend;
use tlbsim_core::process::Region;
use tlbsim_core::sim::SimBackend;
use tlbsim_core::tlb::cache::TranslationCache;

use crate::common::{new_proc, small_config};

#[test]
fn transfer_outside_region_bounds_fails() {
    let config = small_config();
    let mut backend = SimBackend::new(&config);
    let mut cache = TranslationCache::from_config(&config);
    let mut proc = new_proc(1);

    backend
        .alloc_region(&mut proc, 0, 100, &mut cache)
        .unwrap();

    // 100 bytes round up to one 256-byte page.
    assert!(backend.read_byte(&proc, 0, 0, 255).is_ok());
    assert!(matches!(
        backend.read_byte(&proc, 0, 0, 256),
        Err(MemError::OutOfRange { .. })
    ));
}

#[test]
fn transfer_through_unmapped_page_fails() {
    let config = small_config();
    let backend = SimBackend::new(&config);
    let mut proc = new_proc(1);

    // A live region whose pages were never mapped.
    assert!(proc.set_region(0, Region { start: 0, end: 256 }));

    assert_eq!(
        backend.read_byte(&proc, 0, 0, 0),
        Err(MemError::NotMapped(0))
    );
}

#[test]
fn transfer_on_dead_region_fails() {
    let config = small_config();
    let mut backend = SimBackend::new(&config);
    let mut proc = new_proc(1);

    assert_eq!(
        backend.write_byte(&mut proc, 0, 3, 0, 1),
        Err(MemError::InvalidRegion(3))
    );
}

#[test]
fn free_returns_frames_to_the_pool() {
    let config = small_config();
    let mut backend = SimBackend::new(&config);
    let mut cache = TranslationCache::from_config(&config);
    let mut proc = new_proc(1);
    let total = backend.free_frame_count();

    backend
        .alloc_region(&mut proc, 0, 1024, &mut cache)
        .unwrap();
    assert_eq!(backend.free_frame_count(), total - 4);

    backend.free_region(&mut proc, 0).unwrap();
    assert_eq!(backend.free_frame_count(), total);
}
