use std::path::Path;

use clap::Parser;
use disk::Disk;
use page_table::{PageTable, VirtualMemory};
use rand::{rngs::StdRng, SeedableRng};
use serial_test::serial;
use virtmem::{config::DEFAULT_DISK_NAME, Config, Error, Pager, PolicyKind, Program};

const PAGE_SIZE: usize = 64;

const POLICIES: [PolicyKind; 3] = [
    PolicyKind::Random,
    PolicyKind::Clock,
    PolicyKind::TwoPassClock,
];
const PROGRAMS: [Program; 4] = [Program::Alpha, Program::Beta, Program::Gamma, Program::Delta];

fn default_disk_exists() -> bool {
    Path::new(&disk::make_name(DEFAULT_DISK_NAME)).exists()
}

fn pager(name: &str, pages: usize, frames: usize, kind: PolicyKind) -> (PageTable<PAGE_SIZE>, Pager<PAGE_SIZE>) {
    let disk = Disk::create(name, pages).unwrap();
    let table = PageTable::create(pages, frames).unwrap();
    let pager = Pager::new(&table, kind, StdRng::seed_from_u64(5), disk);
    (table, pager)
}

#[test]
fn third_page_evicts_once_frames_are_full() {
    for (i, kind) in POLICIES.into_iter().enumerate() {
        let (mut table, mut pager) = pager(&format!("scenario_a_{}", i), 4, 2, kind);
        {
            let mut vm = VirtualMemory::new(&mut table, &mut pager);
            for page in 0..3 {
                vm.read_u8(page * PAGE_SIZE + 1).unwrap();
            }
        }
        let stats = pager.stats();
        assert_eq!((stats.faults, stats.reads, stats.writes), (3, 3, 0));
        assert_eq!(pager.frames().occupied(), 2);
        assert!(pager.frames().mapping(2).is_some());
        pager.into_disk().remove().unwrap();
    }
}

#[test]
fn one_frame_thrashes_on_alternating_pages() {
    let n = 50;
    for (i, kind) in POLICIES.into_iter().enumerate() {
        let (mut table, mut pager) = pager(&format!("scenario_b_{}", i), 2, 1, kind);
        {
            let mut vm = VirtualMemory::new(&mut table, &mut pager);
            for access in 0..n {
                vm.write_u8((access % 2) * PAGE_SIZE, access as u8).unwrap();
            }
        }
        let stats = pager.stats();
        assert_eq!(stats.faults, n as u64);
        assert_eq!(stats.reads, n as u64);
        // every eviction after the first load pushes out a page just written
        assert_eq!(stats.writes, n as u64 - 1);
        pager.into_disk().remove().unwrap();
    }
}

#[test]
fn written_page_is_flushed_before_reuse() {
    for (i, kind) in POLICIES.into_iter().enumerate() {
        let (mut table, mut pager) = pager(&format!("scenario_c_{}", i), 3, 1, kind);
        {
            let mut vm = VirtualMemory::new(&mut table, &mut pager);
            vm.write_u8(PAGE_SIZE + 7, 42).unwrap();
            vm.read_u8(2 * PAGE_SIZE).unwrap();
        }
        assert_eq!(pager.stats().writes, 1);
        assert_eq!(pager.stats().reads, 2);

        let disk = pager.into_disk();
        let mut block = [0; PAGE_SIZE];
        disk.read_block(1, &mut block).unwrap();
        assert_eq!(block[7], 42);
        disk.remove().unwrap();
    }
}

#[test]
#[serial]
fn unknown_policy_stops_before_any_fault() {
    let parsed = Config::try_parse_from(["virtmem", "10", "3", "fifo", "alpha"]);
    assert!(parsed.is_err());
    assert!(!default_disk_exists());
}

#[test]
#[serial]
fn zero_frames_is_a_configuration_error() {
    let config = Config::new(10, 0, PolicyKind::Clock, Program::Alpha);
    assert!(matches!(
        virtmem::simulate::<PAGE_SIZE>(&config),
        Err(Error::Configuration(_))
    ));
    assert!(!default_disk_exists());
}

// Frames of 4 GiB: `u32::MAX` of them exceed what any allocator can reserve.
#[cfg(target_pointer_width = "64")]
#[test]
#[serial]
fn unallocatable_memory_is_reported_and_disk_removed() {
    let config = Config::new(1, u32::MAX as usize, PolicyKind::Random, Program::Alpha);
    assert!(matches!(
        virtmem::simulate::<{ 1 << 32 }>(&config),
        Err(Error::CreatePageTable(_))
    ));
    assert!(!default_disk_exists());
}

#[test]
#[serial]
fn every_program_runs_under_every_policy() {
    for policy in POLICIES {
        for program in PROGRAMS {
            let mut config = Config::new(16, 4, policy, program);
            config.seed = Some(11);
            let report = virtmem::simulate::<PAGE_SIZE>(&config).unwrap();
            let stats = report.stats;
            assert_eq!(report.program, program);
            assert!(stats.faults >= stats.reads);
            assert!(stats.reads >= stats.writes);
            assert!(stats.reads > 0);
            assert!(!default_disk_exists());
        }
    }
}

#[test]
#[serial]
fn enough_frames_means_one_read_per_page() {
    for policy in POLICIES {
        let config = Config::new(8, 8, policy, Program::Alpha);
        let stats = virtmem::simulate::<PAGE_SIZE>(&config).unwrap().stats;
        assert_eq!((stats.faults, stats.reads, stats.writes), (8, 8, 0));
    }
}

#[test]
#[serial]
fn seeded_runs_are_reproducible() {
    for policy in POLICIES {
        let mut config = Config::new(12, 3, policy, Program::Delta);
        config.seed = Some(2024);
        let first = virtmem::simulate::<PAGE_SIZE>(&config).unwrap();
        let second = virtmem::simulate::<PAGE_SIZE>(&config).unwrap();
        assert_eq!(first, second);
    }
}

#[test]
#[serial]
fn default_page_size_run() {
    let mut config = Config::new(6, 2, PolicyKind::TwoPassClock, Program::Alpha);
    config.seed = Some(1);
    let report = virtmem::run(&config).unwrap();
    assert_eq!(report.result, 10 * (6 * virtmem::PAGE_SIZE as u64 / 256) * (0..256u64).sum::<u64>());
    assert!(report.stats.writes > 0);
}
