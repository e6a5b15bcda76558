//! Shared helpers for the fast-path tests.

pub mod mocks;

use tlbsim_core::sim::SimBackend;
use tlbsim_core::{MemoryPath, Process, TlbConfig};

/// Installs a test-friendly tracing subscriber; safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// A small geometry that makes aliasing and capacity effects easy to hit:
/// 4 sets of 2 slots, 256-byte pages.
pub fn small_config() -> TlbConfig {
    TlbConfig {
        num_sets: 4,
        entries_per_set: 2,
        page_shift: 8,
        vm_pages: 256,
        ram_frames: 64,
        max_regions: 8,
    }
}

/// Memory path over the simulated backend with the small geometry.
pub fn sim_path() -> MemoryPath<SimBackend> {
    init_tracing();
    let config = small_config();
    MemoryPath::new(&config, SimBackend::new(&config))
}

/// Fresh process context sized for the small geometry.
pub fn new_proc(pid: u32) -> Process {
    Process::new(pid, &small_config())
}
