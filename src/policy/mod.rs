//! Victim selection for when every frame is occupied.
//!
//! The set of policies is closed: [`PolicyKind`] is the only place a policy
//! is named by string (on the command line), and [`Policy`] dispatches over
//! it with an exhaustive match.

mod clock;
mod random;
mod two_pass;


use clap::ValueEnum;
use page_table::{PageFlags, PageTable};
use rand::rngs::StdRng;

use crate::frame_table::{FrameTable, FrameTableError};

pub use clock::Clock;
pub use random::RandomPolicy;
pub use two_pass::TwoPassClock;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PolicyKind {
    /// Evict a uniformly random resident page
    #[value(name = "rand")]
    Random,
    /// Second-chance clock
    Clock,
    /// Two-pass clock that prefers clean pages to avoid writebacks
    #[value(name = "custom")]
    TwoPassClock,
}

/// Per-page status bits the clock policies read and clear.
pub trait PageStatus {
    fn flags(&self, page: usize) -> PageFlags;

    fn clear_referenced(&mut self, page: usize);

    fn is_referenced(&self, page: usize) -> bool {
        self.flags(page).contains(PageFlags::REFERENCED)
    }

    fn is_dirty(&self, page: usize) -> bool {
        self.flags(page).contains(PageFlags::DIRTY)
    }
}

impl<const PAGE_SIZE: usize> PageStatus for PageTable<PAGE_SIZE> {
    fn flags(&self, page: usize) -> PageFlags {
        PageTable::flags(self, page)
    }

    fn clear_referenced(&mut self, page: usize) {
        let (frame, flags) = self.get_entry(page);
        self.set_entry(page, frame, flags - PageFlags::REFERENCED);
    }
}

/// An occupied frame chosen for eviction, with the page it holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Victim {
    pub frame: usize,
    pub page: usize,
    /// Frames inspected to find it.
    pub probes: usize,
}

#[derive(Debug)]
pub enum Policy {
    Random(RandomPolicy),
    Clock(Clock),
    TwoPassClock(TwoPassClock),
}

impl Policy {
    pub fn new(kind: PolicyKind, frame_count: usize, rng: StdRng) -> Self {
        match kind {
            PolicyKind::Random => Policy::Random(RandomPolicy::new(rng)),
            PolicyKind::Clock => Policy::Clock(Clock::new(frame_count)),
            PolicyKind::TwoPassClock => Policy::TwoPassClock(TwoPassClock::new(frame_count)),
        }
    }

    pub fn kind(&self) -> PolicyKind {
        match self {
            Policy::Random(_) => PolicyKind::Random,
            Policy::Clock(_) => PolicyKind::Clock,
            Policy::TwoPassClock(_) => PolicyKind::TwoPassClock,
        }
    }

    /// Position of the clock hand, for the policies that keep one.
    pub fn hand(&self) -> Option<usize> {
        match self {
            Policy::Random(_) => None,
            Policy::Clock(clock) => Some(clock.hand()),
            Policy::TwoPassClock(clock) => Some(clock.hand()),
        }
    }

    pub fn select_victim<S: PageStatus>(
        &mut self,
        frames: &FrameTable,
        status: &mut S,
    ) -> Result<Victim, FrameTableError> {
        if frames.occupied() == 0 {
            return Err(FrameTableError::NothingToEvict);
        }
        match self {
            Policy::Random(policy) => Ok(policy.select_victim(frames)),
            Policy::Clock(clock) => clock.select_victim(frames, status),
            Policy::TwoPassClock(clock) => clock.select_victim(frames, status),
        }
    }
}
