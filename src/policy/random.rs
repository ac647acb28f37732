use log::trace;
use rand::{rngs::StdRng, Rng};

use super::Victim;
use crate::frame_table::FrameTable;

#[derive(Debug)]
pub struct RandomPolicy {
    rng: StdRng,
}

impl RandomPolicy {
    pub fn new(rng: StdRng) -> Self {
        Self { rng }
    }

    /// Samples frames until one is occupied. The caller guarantees at
    /// least one is.
    pub fn select_victim(&mut self, frames: &FrameTable) -> Victim {
        let mut probes = 0;
        loop {
            let frame = self.rng.gen_range(0..frames.frame_count());
            probes += 1;
            if let Some(page) = frames.occupant(frame) {
                trace!("random picked frame[{}] after {} probes", frame, probes);
                return Victim {
                    frame,
                    page,
                    probes,
                };
            }
        }
    }
}
