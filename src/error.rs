use disk::DiskError;
use page_table::PageTableError;
use thiserror::Error;

use crate::pager::PagerError;

/// Failures that stop a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    Configuration(String),

    #[error("couldn't create virtual disk: {0}")]
    CreateDisk(#[source] DiskError),

    #[error("couldn't create page table: {0}")]
    CreatePageTable(#[from] PageTableError),

    #[error("page fault handling failed: {0}")]
    Fault(#[from] PagerError),

    #[error("couldn't release virtual disk: {0}")]
    ReleaseDisk(#[source] DiskError),
}
