use bitflags::bitflags;

bitflags! {
    /// Status bits the simulated MMU keeps per virtual page.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PageFlags: u8 {
        const PRESENT = 1 << 0;
        const WRITABLE = 1 << 1;
        const REFERENCED = 1 << 2;
        const DIRTY = 1 << 3;
    }
}

/// Maps one virtual page to the frame in physical memory holding it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageTableEntry {
    /// | frame number: u32 | flags: u8 |
    pub(super) entry: [u8; 5],
}

impl PageTableEntry {
    pub(super) fn zero() -> Self {
        PageTableEntry { entry: [0; 5] }
    }

    pub fn get_frame_number(&self) -> u32 {
        u32::from_be_bytes([self.entry[0], self.entry[1], self.entry[2], self.entry[3]])
    }

    pub(super) fn set_frame_number(&mut self, frame_number: u32) {
        self.entry[0..4].copy_from_slice(&frame_number.to_be_bytes());
    }

    pub fn flags(&self) -> PageFlags {
        PageFlags::from_bits_truncate(self.entry[4])
    }

    pub(super) fn set_flags(&mut self, flags: PageFlags) {
        self.entry[4] = flags.bits();
    }
}
