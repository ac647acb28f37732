use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MemoryError {
    #[error("physical memory must hold at least one frame")]
    Empty,
    #[error("physical address {0:#x} is out of range")]
    OverCapacity(u64),
    #[error("couldn't allocate {frames} frames of {frame_size} bytes")]
    Allocation { frames: usize, frame_size: usize },
}

/// Simulated physical memory: `frames` slots of `FRAME_SIZE` bytes each.
#[derive(Debug, Clone)]
pub struct PhysicalMemory<const FRAME_SIZE: usize> {
    frames: usize,
    buffer: Vec<u8>,
}

impl<const FRAME_SIZE: usize> PhysicalMemory<FRAME_SIZE> {
    pub fn new(frames: usize) -> Result<Self, MemoryError> {
        if frames == 0 {
            return Err(MemoryError::Empty);
        }
        let allocation = MemoryError::Allocation {
            frames,
            frame_size: FRAME_SIZE,
        };
        let bytes = frames.checked_mul(FRAME_SIZE).ok_or(allocation.clone())?;
        let mut buffer = Vec::new();
        buffer.try_reserve_exact(bytes).map_err(|_| allocation)?;
        buffer.resize(bytes, 0);
        Ok(Self { frames, buffer })
    }

    pub fn frames(&self) -> usize {
        self.frames
    }

    pub fn capacity(&self) -> usize {
        self.buffer.len()
    }

    pub fn check_address(&self, address: u64) -> Result<(), MemoryError> {
        if address as usize >= self.buffer.len() {
            return Err(MemoryError::OverCapacity(address));
        }
        Ok(())
    }

    pub fn read_u8(&self, address: u64) -> Result<u8, MemoryError> {
        self.check_address(address)?;
        Ok(self.buffer[address as usize])
    }

    pub fn write_u8(&mut self, address: u64, byte: u8) -> Result<(), MemoryError> {
        self.check_address(address)?;
        self.buffer[address as usize] = byte;
        Ok(())
    }

    /// Panics if `frame_number` is not below `frames()`.
    pub fn frame(&self, frame_number: usize) -> &[u8] {
        &self.buffer[frame_number * FRAME_SIZE..(frame_number + 1) * FRAME_SIZE]
    }

    pub fn frame_mut(&mut self, frame_number: usize) -> &mut [u8] {
        &mut self.buffer[frame_number * FRAME_SIZE..(frame_number + 1) * FRAME_SIZE]
    }
}
