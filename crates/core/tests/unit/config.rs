//! Configuration unit tests.

use pretty_assertions::assert_eq;
use tlbsim_core::TlbConfig;
use tlbsim_core::tlb::cache::ENTRY_SIZE;

#[test]
fn defaults_are_consistent() {
    let config = TlbConfig::default();
    assert_eq!(config.page_size(), 256);
    assert_eq!(
        config.device_capacity(),
        config.num_sets * config.entries_per_set * ENTRY_SIZE
    );
    assert_eq!(config.ram_capacity(), config.ram_frames * 256);
}

#[test]
fn json_overrides_only_named_fields() {
    let config: TlbConfig =
        serde_json::from_str(r#"{ "num_sets": 8, "entries_per_set": 2 }"#).unwrap();
    let defaults = TlbConfig::default();

    assert_eq!(config.num_sets, 8);
    assert_eq!(config.entries_per_set, 2);
    assert_eq!(config.page_shift, defaults.page_shift);
    assert_eq!(config.ram_frames, defaults.ram_frames);
}

#[test]
fn unknown_fields_are_rejected() {
    let result = serde_json::from_str::<TlbConfig>(r#"{ "sets": 8 }"#);
    assert!(result.is_err());
}
