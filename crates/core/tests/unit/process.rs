//! Process context unit tests.

use pretty_assertions::assert_eq;
use tlbsim_core::process::Region;

use crate::common::new_proc;

// ══════════════════════════════════════════════════════════
// 1. Region table
// ══════════════════════════════════════════════════════════

#[test]
fn fresh_process_has_no_live_regions() {
    let proc = new_proc(1);
    for slot in 0..proc.max_regions() {
        assert_eq!(proc.region(slot), None);
    }
}

#[test]
fn set_take_roundtrip() {
    let mut proc = new_proc(1);
    let region = Region {
        start: 0x100,
        end: 0x300,
    };

    assert!(proc.set_region(2, region));
    assert_eq!(proc.region(2), Some(region));
    assert_eq!(proc.take_region(2), Some(region));
    assert_eq!(proc.region(2), None);
}

#[test]
fn out_of_bounds_slot_is_rejected() {
    let mut proc = new_proc(1);
    let slot = proc.max_regions();
    assert!(!proc.set_region(slot, Region { start: 0, end: 1 }));
    assert_eq!(proc.region(slot), None);
    assert_eq!(proc.take_region(slot), None);
}

// ══════════════════════════════════════════════════════════
// 2. Page-range arithmetic
// ══════════════════════════════════════════════════════════

#[test]
fn page_range_is_inclusive_of_last_used_page() {
    // [0x100, 0x300) at 256-byte pages spans pages 1 and 2; the byte at
    // 0x300 belongs to the next region.
    let region = Region {
        start: 0x100,
        end: 0x300,
    };
    let pages: Vec<u32> = region.page_range(8).collect();
    assert_eq!(pages, vec![1, 2]);
}

#[test]
fn single_byte_region_spans_one_page() {
    let region = Region {
        start: 0x200,
        end: 0x201,
    };
    let pages: Vec<u32> = region.page_range(8).collect();
    assert_eq!(pages, vec![2]);
}

#[test]
fn page_aligned_end_does_not_bleed_into_next_page() {
    let region = Region {
        start: 0,
        end: 0x100,
    };
    let pages: Vec<u32> = region.page_range(8).collect();
    assert_eq!(pages, vec![0]);
}

#[test]
fn degenerate_region_clamps_to_its_start_page() {
    // end <= start violates the region invariant; the span must clamp to
    // the start page instead of underflowing.
    let empty = Region { start: 0, end: 0 };
    let pages: Vec<u32> = empty.page_range(8).collect();
    assert_eq!(pages, vec![0]);

    let inverted = Region {
        start: 0x300,
        end: 0x200,
    };
    let pages: Vec<u32> = inverted.page_range(8).collect();
    assert_eq!(pages, vec![3]);
}
