use log::trace;

use super::{PageStatus, Victim};
use crate::frame_table::{FrameTable, FrameTableError};

/// Second-chance clock.
#[derive(Debug, Clone)]
pub struct Clock {
    hand: usize,
    frame_count: usize,
}

impl Clock {
    pub fn new(frame_count: usize) -> Self {
        Self {
            hand: 0,
            frame_count,
        }
    }

    pub fn hand(&self) -> usize {
        self.hand
    }

    /// Referenced pages lose the bit and are skipped. Every bit cleared
    /// stays clear for the rest of the sweep, so this stops within one
    /// revolution plus one probe.
    pub fn select_victim<S: PageStatus>(
        &mut self,
        frames: &FrameTable,
        status: &mut S,
    ) -> Result<Victim, FrameTableError> {
        let mut probes = 0;
        loop {
            let frame = self.hand;
            let page = frames
                .occupant(frame)
                .ok_or(FrameTableError::FrameEmpty(frame))?;
            probes += 1;
            self.hand = (self.hand + 1) % self.frame_count;

            if status.is_referenced(page) {
                status.clear_referenced(page);
                continue;
            }
            trace!("clock picked frame[{}] after {} probes", frame, probes);
            return Ok(Victim {
                frame,
                page,
                probes,
            });
        }
    }
}
