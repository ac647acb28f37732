//! The page fault handler.


use disk::{Disk, DiskError};
use log::{debug, trace};
use page_table::{AccessError, FaultHandler, PageFlags, PageTable};
use rand::rngs::StdRng;
use thiserror::Error;

use crate::{
    frame_table::{FrameTable, FrameTableError},
    policy::{Policy, PolicyKind},
    stats::Stats,
};

#[derive(Debug, Error)]
pub enum PagerError {
    #[error("backing store: {0}")]
    Disk(#[from] DiskError),
    #[error("frame table invariant violated: {0}")]
    Invariant(#[from] FrameTableError),
    #[error(
        "page table has {table_pages} pages and {table_frames} frames, \
         pager was built for {pages} pages and {frames} frames"
    )]
    TableMismatch {
        pages: usize,
        frames: usize,
        table_pages: usize,
        table_frames: usize,
    },
    #[error(transparent)]
    Access(#[from] AccessError),
}

/// Owns everything the fault handler mutates: the frame table, the
/// replacement policy's scan state, the backing store and the counters.
#[derive(Debug)]
pub struct Pager<const PAGE_SIZE: usize> {
    frames: FrameTable,
    policy: Policy,
    disk: Disk<PAGE_SIZE>,
    stats: Stats,
}

impl<const PAGE_SIZE: usize> Pager<PAGE_SIZE> {
    /// Sizes the frame table and the policy to `table`. Faults from a table
    /// of any other shape are refused.
    pub fn new(
        table: &PageTable<PAGE_SIZE>,
        kind: PolicyKind,
        rng: StdRng,
        disk: Disk<PAGE_SIZE>,
    ) -> Self {
        let frame_count = table.frame_count();
        Self {
            frames: FrameTable::new(frame_count, table.page_count()),
            policy: Policy::new(kind, frame_count, rng),
            disk,
            stats: Stats::default(),
        }
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn frames(&self) -> &FrameTable {
        &self.frames
    }

    pub fn policy(&self) -> &Policy {
        &self.policy
    }

    pub fn into_disk(self) -> Disk<PAGE_SIZE> {
        self.disk
    }

    /// Frees a frame by evicting the policy's victim, writing it back first
    /// if it is dirty.
    fn evict(&mut self, table: &mut PageTable<PAGE_SIZE>) -> Result<usize, PagerError> {
        let victim = self.policy.select_victim(&self.frames, table)?;
        let (_, flags) = table.get_entry(victim.page);
        debug!(
            "evicting page[{}] from frame[{}] ({:?})",
            victim.page, victim.frame, flags
        );
        if flags.contains(PageFlags::DIRTY) {
            self.disk
                .write_block(victim.page, table.physmem().frame(victim.frame))?;
            self.stats.writes += 1;
        }
        table.set_entry(victim.page, 0, PageFlags::empty());
        self.frames.evict(victim.frame)?;
        Ok(victim.frame)
    }
}

impl<const PAGE_SIZE: usize> FaultHandler<PAGE_SIZE> for Pager<PAGE_SIZE> {
    type Error = PagerError;

    fn handle_fault(
        &mut self,
        table: &mut PageTable<PAGE_SIZE>,
        page: usize,
    ) -> Result<(), PagerError> {
        if table.page_count() != self.frames.page_count()
            || table.frame_count() != self.frames.frame_count()
        {
            return Err(PagerError::TableMismatch {
                pages: self.frames.page_count(),
                frames: self.frames.frame_count(),
                table_pages: table.page_count(),
                table_frames: table.frame_count(),
            });
        }
        self.stats.faults += 1;
        let (frame, flags) = table.get_entry(page);

        if flags.contains(PageFlags::PRESENT) {
            trace!("page[{}] resident in frame[{}], granting write", page, frame);
            table.set_entry(page, frame, flags | PageFlags::WRITABLE);
            return Ok(());
        }

        let frame = match self.frames.find_free_frame() {
            Some(frame) => frame,
            None => self.evict(table)?,
        };

        self.disk
            .read_block(page, table.physmem_mut().frame_mut(frame))?;
        self.stats.reads += 1;

        self.frames.install(frame, page)?;
        table.set_entry(page, frame, PageFlags::PRESENT | PageFlags::WRITABLE);
        debug!("loaded page[{}] into frame[{}]", page, frame);
        Ok(())
    }
}
