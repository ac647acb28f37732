use log::{trace, warn};

use super::{PageStatus, Victim};
use crate::frame_table::{FrameTable, FrameTableError};

/// Clock variant that first looks for a page it can drop without a
/// writeback.
///
/// The first revolution accepts only pages that are neither referenced
/// nor dirty, clearing REFERENCED on the way. The second revolution accepts
/// any unreferenced page. After `2 * frame_count` probes the frame under
/// the hand is taken regardless.
#[derive(Debug, Clone)]
pub struct TwoPassClock {
    hand: usize,
    frame_count: usize,
}

enum Scan {
    Found(Victim),
    ExhaustedFallback(Victim),
}

impl TwoPassClock {
    pub fn new(frame_count: usize) -> Self {
        Self {
            hand: 0,
            frame_count,
        }
    }

    pub fn hand(&self) -> usize {
        self.hand
    }

    fn scan<S: PageStatus>(
        &mut self,
        frames: &FrameTable,
        status: &mut S,
    ) -> Result<Scan, FrameTableError> {
        for probe in 0..2 * self.frame_count {
            let clean_only = probe < self.frame_count;
            let frame = self.hand;
            let page = frames
                .occupant(frame)
                .ok_or(FrameTableError::FrameEmpty(frame))?;
            self.hand = (self.hand + 1) % self.frame_count;

            let referenced = status.is_referenced(page);
            if !referenced && !(clean_only && status.is_dirty(page)) {
                return Ok(Scan::Found(Victim {
                    frame,
                    page,
                    probes: probe + 1,
                }));
            }
            if referenced {
                status.clear_referenced(page);
            }
        }

        // Only reachable if REFERENCED gets set again while we sweep.
        let frame = self.hand;
        let page = frames
            .occupant(frame)
            .ok_or(FrameTableError::FrameEmpty(frame))?;
        status.clear_referenced(page);
        Ok(Scan::ExhaustedFallback(Victim {
            frame,
            page,
            probes: 2 * self.frame_count,
        }))
    }

    pub fn select_victim<S: PageStatus>(
        &mut self,
        frames: &FrameTable,
        status: &mut S,
    ) -> Result<Victim, FrameTableError> {
        match self.scan(frames, status)? {
            Scan::Found(victim) => {
                trace!(
                    "two-pass clock picked frame[{}] after {} probes",
                    victim.frame,
                    victim.probes
                );
                Ok(victim)
            }
            Scan::ExhaustedFallback(victim) => {
                warn!(
                    "two-pass clock found no unreferenced frame in {} probes, taking frame[{}]",
                    victim.probes, victim.frame
                );
                Ok(victim)
            }
        }
    }
}
