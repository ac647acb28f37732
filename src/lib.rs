//! Demand-paged virtual memory simulator.
//!
//! A [`Pager`] services faults raised by the simulated page table: it finds
//! a free frame or evicts one chosen by the configured [`Policy`], writes
//! dirty victims back to the [`Disk`], loads the faulting page and maps it.

pub mod config;
pub mod error;
pub mod frame_table;
pub mod pager;
pub mod policy;
pub mod programs;
pub mod stats;

use disk::Disk;
use log::{info, warn};
use page_table::{PageTable, VirtualMemory};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub use config::Config;
pub use error::Error;
pub use frame_table::FrameTable;
pub use pager::{Pager, PagerError};
pub use policy::{Policy, PolicyKind};
pub use programs::Program;
pub use stats::Stats;

pub const PAGE_SIZE: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Report {
    pub program: Program,
    /// Checksum returned by the workload.
    pub result: u64,
    pub stats: Stats,
}

pub fn run(config: &Config) -> Result<Report, Error> {
    simulate::<PAGE_SIZE>(config)
}

/// Runs `config.program` against a fresh page table and backing store with
/// pages of `SIZE` bytes. The backing store is removed afterwards.
pub fn simulate<const SIZE: usize>(config: &Config) -> Result<Report, Error> {
    config.validate()?;

    let disk = Disk::<SIZE>::create(&config.disk, config.pages).map_err(Error::CreateDisk)?;
    let mut table = match PageTable::<SIZE>::create(config.pages, config.frames) {
        Ok(table) => table,
        Err(e) => {
            if let Err(remove) = disk.remove() {
                warn!("couldn't remove virtual disk: {}", remove);
            }
            return Err(e.into());
        }
    };

    let seed = config.seed.unwrap_or_else(rand::random);
    info!(
        "{} pages, {} frames, policy {:?}, seed {}",
        config.pages, config.frames, config.policy, seed
    );
    let mut seeds = StdRng::seed_from_u64(seed);
    let policy_rng = StdRng::seed_from_u64(seeds.gen());
    let mut program_rng = StdRng::seed_from_u64(seeds.gen());

    let mut pager = Pager::new(&table, config.policy, policy_rng, disk);
    let result = {
        let mut vm = VirtualMemory::new(&mut table, &mut pager);
        config.program.run(&mut vm, &mut program_rng)
    };
    let stats = pager.stats();
    pager.into_disk().remove().map_err(Error::ReleaseDisk)?;

    let result = result?;
    info!("{} finished: {:?}", config.program.name(), stats);
    Ok(Report {
        program: config.program,
        result,
        stats,
    })
}
