use std::fmt;

/// Counters maintained by the fault handler.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Stats {
    pub faults: u64,
    pub reads: u64,
    pub writes: u64,
}

impl fmt::Display for Stats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Page faults: {}", self.faults)?;
        writeln!(f, "Disk reads:  {}", self.reads)?;
        write!(f, "Disk writes: {}", self.writes)
    }
}
