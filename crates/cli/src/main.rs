//! TLB fast-path driver.
//!
//! This binary runs a synthetic multi-threaded workload against the memory
//! path and reports access statistics. Each worker thread models one
//! simulated processor executing instructions for its own process: it
//! allocates regions, hammers them with byte reads and writes, frees some
//! regions mid-run, and flushes its cache entries at teardown.

use std::process;
use std::sync::Arc;
use std::thread;

use clap::{Parser, Subcommand};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use tlbsim_core::sim::SimBackend;
use tlbsim_core::{MemoryPath, Process, TlbConfig};

#[derive(Parser, Debug)]
#[command(
    name = "tlbsim",
    version,
    about = "Software TLB fast-path simulator",
    long_about = "Runs a synthetic workload against the TLB cache engine and page-fault \
                  path, with every worker thread driving its own simulated process.\n\n\
                  Examples:\n  tlbsim run --procs 4 --ops 2000\n  tlbsim run --config geometry.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the synthetic workload.
    Run {
        /// Number of worker threads (one simulated process each).
        #[arg(long, default_value_t = 4)]
        procs: u32,

        /// Read/write operations per worker.
        #[arg(long, default_value_t = 1000)]
        ops: u32,

        /// Regions allocated per worker.
        #[arg(long, default_value_t = 3)]
        regions: usize,

        /// Bytes per region.
        #[arg(long, default_value_t = 1024)]
        region_size: u32,

        /// Workload seed.
        #[arg(long, default_value_t = 0x5eed)]
        seed: u64,

        /// JSON config file overriding the default cache geometry.
        #[arg(long)]
        config: Option<String>,
    },
}

/// Small xorshift generator; the workload needs variety, not quality.
struct XorShift(u64);

impl XorShift {
    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

fn load_config(path: Option<&str>) -> Result<TlbConfig, Box<dyn std::error::Error>> {
    match path {
        Some(p) => {
            let text = std::fs::read_to_string(p)?;
            Ok(serde_json::from_str(&text)?)
        }
        None => Ok(TlbConfig::default()),
    }
}

/// One worker: allocate, hammer, free half, tear down.
fn worker(
    path: &MemoryPath<SimBackend>,
    config: &TlbConfig,
    pid: u32,
    ops: u32,
    regions: usize,
    region_size: u32,
    seed: u64,
) -> Result<(), tlbsim_core::common::MemError> {
    let mut proc = Process::new(pid, config);
    let mut rng = XorShift((seed ^ (u64::from(pid) << 32)) | 1);

    let mut starts = Vec::with_capacity(regions);
    for slot in 0..regions {
        starts.push(path.alloc(&mut proc, region_size, slot)?);
    }

    for op in 0..ops {
        let slot = (rng.next() as usize) % regions;
        let offset = (rng.next() as u32) % region_size;
        // Base register for address translation points at the region.
        proc.regs[0] = starts[slot];

        if op % 2 == 0 {
            path.write(&mut proc, (rng.next() & 0xFF) as u8, 0, offset)?;
        } else {
            path.read(&mut proc, slot, offset, 0)?;
        }
    }

    // Free the lower half of the regions, exercising invalidation.
    for slot in 0..regions / 2 {
        path.free(&mut proc, slot)?;
    }

    let cleared = path.flush_pid(&proc)?;
    info!(pid, cleared, "worker done");
    Ok(())
}

fn run(
    procs: u32,
    ops: u32,
    regions: usize,
    region_size: u32,
    seed: u64,
    config_path: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config(config_path)?;
    let path = Arc::new(MemoryPath::new(&config, SimBackend::new(&config)));

    let mut handles = Vec::new();
    for pid in 1..=procs {
        let path = Arc::clone(&path);
        handles.push(thread::spawn(move || {
            worker(&path, &config, pid, ops, regions, region_size, seed)
        }));
    }

    for handle in handles {
        match handle.join() {
            Ok(result) => result?,
            Err(_) => return Err("worker thread panicked".into()),
        }
    }

    println!("{}", path.stats()?);
    Ok(())
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let Some(Commands::Run {
        procs,
        ops,
        regions,
        region_size,
        seed,
        config,
    }) = cli.command
    else {
        // No subcommand: run with defaults.
        if let Err(e) = run(4, 1000, 3, 1024, 0x5eed, None) {
            error!("{e}");
            process::exit(1);
        }
        return;
    };

    if let Err(e) = run(procs, ops, regions, region_size, seed, config.as_deref()) {
        error!("{e}");
        process::exit(1);
    }
}
