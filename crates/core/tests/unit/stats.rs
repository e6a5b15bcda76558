//! Statistics unit tests.

use pretty_assertions::assert_eq;
use tlbsim_core::stats::TlbStats;

#[test]
fn hit_rate_with_no_accesses_is_zero() {
    let stats = TlbStats::default();
    assert_eq!(stats.accesses(), 0);
    assert_eq!(stats.hit_rate(), 0.0);
}

#[test]
fn hit_rate_arithmetic() {
    let stats = TlbStats {
        hits: 3,
        misses: 1,
        ..TlbStats::default()
    };
    assert_eq!(stats.accesses(), 4);
    assert_eq!(stats.hit_rate(), 0.75);
}

#[test]
fn display_summarizes_all_sections() {
    let stats = TlbStats {
        hits: 9,
        misses: 1,
        soft_faults: 1,
        reads: 5,
        writes: 5,
        ..TlbStats::default()
    };
    let text = stats.to_string();
    assert!(text.contains("10 accesses"));
    assert!(text.contains("90.0% hit rate"));
    assert!(text.contains("1 soft"));
    assert!(text.contains("5 reads"));
}
