//! Access patterns that drive the pager. None of them knows about frames;
//! faults happen underneath the [`VirtualMemory`] accessors.

use clap::ValueEnum;
use log::info;
use page_table::{FaultHandler, VirtualMemory};
use rand::{rngs::StdRng, Rng};

const SCAN_PASSES: usize = 10;
const FOCUS_WINDOW_PAGES: usize = 4;
const FOCUS_ROUNDS_PER_PAGE: usize = 8;
const FOCUS_ACCESSES_PER_ROUND: usize = 100;
const RANDOM_ACCESSES_PER_PAGE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Program {
    /// Sequential scan of the whole address space
    Alpha,
    /// In-place heap sort of random data
    Beta,
    /// Random accesses inside a small sliding window
    Gamma,
    /// Uniformly random accesses
    Delta,
}

impl Program {
    pub fn name(&self) -> &'static str {
        match self {
            Program::Alpha => "alpha",
            Program::Beta => "beta",
            Program::Gamma => "gamma",
            Program::Delta => "delta",
        }
    }

    /// Runs the workload to completion and returns its checksum.
    pub fn run<const PAGE_SIZE: usize, H: FaultHandler<PAGE_SIZE>>(
        self,
        vm: &mut VirtualMemory<'_, PAGE_SIZE, H>,
        rng: &mut StdRng,
    ) -> Result<u64, H::Error> {
        info!("running {} over {} bytes", self.name(), vm.len());
        match self {
            Program::Alpha => scan(vm),
            Program::Beta => sort(vm, rng),
            Program::Gamma => focus(vm, rng),
            Program::Delta => random(vm, rng),
        }
    }
}

fn scan<const PAGE_SIZE: usize, H: FaultHandler<PAGE_SIZE>>(
    vm: &mut VirtualMemory<'_, PAGE_SIZE, H>,
) -> Result<u64, H::Error> {
    let len = vm.len();
    for i in 0..len {
        vm.write_u8(i, i as u8)?;
    }
    let mut total = 0;
    for _ in 0..SCAN_PASSES {
        for i in 0..len {
            total += vm.read_u8(i)? as u64;
        }
    }
    Ok(total)
}

fn sort<const PAGE_SIZE: usize, H: FaultHandler<PAGE_SIZE>>(
    vm: &mut VirtualMemory<'_, PAGE_SIZE, H>,
    rng: &mut StdRng,
) -> Result<u64, H::Error> {
    let len = vm.len();
    let mut total = 0;
    for i in 0..len {
        let byte: u8 = rng.gen();
        total += byte as u64;
        vm.write_u8(i, byte)?;
    }

    for start in (0..len / 2).rev() {
        sift_down(vm, start, len)?;
    }
    for end in (1..len).rev() {
        swap(vm, 0, end)?;
        sift_down(vm, 0, end)?;
    }
    Ok(total)
}

fn swap<const PAGE_SIZE: usize, H: FaultHandler<PAGE_SIZE>>(
    vm: &mut VirtualMemory<'_, PAGE_SIZE, H>,
    a: usize,
    b: usize,
) -> Result<(), H::Error> {
    let x = vm.read_u8(a)?;
    let y = vm.read_u8(b)?;
    vm.write_u8(a, y)?;
    vm.write_u8(b, x)
}

/// Restores the max-heap property below `root` within `[0, end)`.
fn sift_down<const PAGE_SIZE: usize, H: FaultHandler<PAGE_SIZE>>(
    vm: &mut VirtualMemory<'_, PAGE_SIZE, H>,
    mut root: usize,
    end: usize,
) -> Result<(), H::Error> {
    loop {
        let mut child = 2 * root + 1;
        if child >= end {
            return Ok(());
        }
        if child + 1 < end && vm.read_u8(child + 1)? > vm.read_u8(child)? {
            child += 1;
        }
        if vm.read_u8(root)? >= vm.read_u8(child)? {
            return Ok(());
        }
        swap(vm, root, child)?;
        root = child;
    }
}

fn focus<const PAGE_SIZE: usize, H: FaultHandler<PAGE_SIZE>>(
    vm: &mut VirtualMemory<'_, PAGE_SIZE, H>,
    rng: &mut StdRng,
) -> Result<u64, H::Error> {
    let len = vm.len();
    let window = len.min(FOCUS_WINDOW_PAGES * PAGE_SIZE);
    let step = (PAGE_SIZE / 4).max(1);
    let rounds = FOCUS_ROUNDS_PER_PAGE * len / PAGE_SIZE;
    let mut total = 0;
    for round in 0..rounds {
        let start = (round * step) % (len - window + 1);
        for _ in 0..FOCUS_ACCESSES_PER_ROUND {
            let address = start + rng.gen_range(0..window);
            let byte = vm.read_u8(address)?;
            total += byte as u64;
            if rng.gen_bool(0.5) {
                vm.write_u8(address, byte.wrapping_add(1))?;
            }
        }
    }
    Ok(total)
}

fn random<const PAGE_SIZE: usize, H: FaultHandler<PAGE_SIZE>>(
    vm: &mut VirtualMemory<'_, PAGE_SIZE, H>,
    rng: &mut StdRng,
) -> Result<u64, H::Error> {
    let len = vm.len();
    let accesses = RANDOM_ACCESSES_PER_PAGE * len / PAGE_SIZE;
    let mut total = 0;
    for _ in 0..accesses {
        let address = rng.gen_range(0..len);
        if rng.gen_bool(0.5) {
            vm.write_u8(address, rng.gen())?;
        } else {
            total += vm.read_u8(address)? as u64;
        }
    }
    Ok(total)
}
