//! Software model of the MMU page table the pager runs against.
//!
//! Every virtual page has an entry holding its frame number and a
//! [`PageFlags`] set. [`VirtualMemory`] routes byte accesses through
//! [`PageTable::translate`] and calls back into a [`FaultHandler`]
//! whenever an access is not permitted by the current entry.

mod page_table_entry;
mod virtual_memory;

use log::trace;
use memory::{MemoryError, PhysicalMemory};
use thiserror::Error;

pub use page_table_entry::{PageFlags, PageTableEntry};
pub use virtual_memory::{FaultHandler, VirtualMemory};

#[derive(Debug, Error)]
pub enum PageTableError {
    #[error("page table must cover at least one page")]
    NoPages,
    #[error("couldn't allocate entries for {0} pages")]
    Allocation(usize),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("virtual address {address:#x} is outside the {len} byte address space")]
    OutOfRange { address: usize, len: usize },
    #[error("page {0} still faults after the handler ran")]
    Unresolved(usize),
    #[error(transparent)]
    Memory(#[from] MemoryError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Read,
    Write,
}

#[derive(Debug)]
pub struct PageTable<const PAGE_SIZE: usize> {
    entries: Vec<PageTableEntry>,
    physmem: PhysicalMemory<PAGE_SIZE>,
}

impl<const PAGE_SIZE: usize> PageTable<PAGE_SIZE> {
    pub fn create(pages: usize, frames: usize) -> Result<Self, PageTableError> {
        if pages == 0 {
            return Err(PageTableError::NoPages);
        }
        // The virtual address space must be addressable in bytes.
        pages
            .checked_mul(PAGE_SIZE)
            .ok_or(PageTableError::Allocation(pages))?;
        let mut entries = Vec::new();
        entries
            .try_reserve_exact(pages)
            .map_err(|_| PageTableError::Allocation(pages))?;
        entries.resize(pages, PageTableEntry::zero());
        let physmem = PhysicalMemory::new(frames)?;
        Ok(Self { entries, physmem })
    }

    pub fn page_count(&self) -> usize {
        self.entries.len()
    }

    pub fn frame_count(&self) -> usize {
        self.physmem.frames()
    }

    /// Size in bytes of the virtual address space.
    pub fn virtmem_len(&self) -> usize {
        self.entries.len() * PAGE_SIZE
    }

    pub fn get_entry(&self, page_number: usize) -> (usize, PageFlags) {
        let entry = &self.entries[page_number];
        (entry.get_frame_number() as usize, entry.flags())
    }

    pub fn set_entry(&mut self, page_number: usize, frame_number: usize, flags: PageFlags) {
        trace!(
            "page[{}] -> frame[{}] {:?}",
            page_number,
            frame_number,
            flags
        );
        let entry = &mut self.entries[page_number];
        entry.set_frame_number(frame_number as u32);
        entry.set_flags(flags);
    }

    pub fn flags(&self, page_number: usize) -> PageFlags {
        self.entries[page_number].flags()
    }

    /// Checks `access` against the entry for `page_number`.
    ///
    /// A permitted access marks the page REFERENCED (and DIRTY for writes)
    /// and yields its frame. `None` means the access faults.
    pub fn translate(&mut self, page_number: usize, access: Access) -> Option<usize> {
        let entry = &mut self.entries[page_number];
        let mut flags = entry.flags();
        if !flags.contains(PageFlags::PRESENT) {
            return None;
        }
        match access {
            Access::Read => flags.insert(PageFlags::REFERENCED),
            Access::Write if flags.contains(PageFlags::WRITABLE) => {
                flags.insert(PageFlags::REFERENCED | PageFlags::DIRTY)
            }
            Access::Write => return None,
        }
        entry.set_flags(flags);
        Some(entry.get_frame_number() as usize)
    }

    pub fn physmem(&self) -> &PhysicalMemory<PAGE_SIZE> {
        &self.physmem
    }

    pub fn physmem_mut(&mut self) -> &mut PhysicalMemory<PAGE_SIZE> {
        &mut self.physmem
    }
}
