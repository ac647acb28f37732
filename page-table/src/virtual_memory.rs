use log::trace;

use crate::{Access, AccessError, PageTable};

/// Upper bound on handler invocations for a single access. A handler that
/// installs a read-only mapping and then upgrades it needs two.
const MAX_FAULTS_PER_ACCESS: usize = 3;

/// Called whenever an access cannot proceed under the current mapping.
pub trait FaultHandler<const PAGE_SIZE: usize> {
    type Error: From<AccessError>;

    fn handle_fault(
        &mut self,
        table: &mut PageTable<PAGE_SIZE>,
        page_number: usize,
    ) -> Result<(), Self::Error>;
}

/// Byte-addressed view of the virtual address space.
pub struct VirtualMemory<'a, const PAGE_SIZE: usize, H> {
    table: &'a mut PageTable<PAGE_SIZE>,
    handler: &'a mut H,
}

impl<'a, const PAGE_SIZE: usize, H: FaultHandler<PAGE_SIZE>> VirtualMemory<'a, PAGE_SIZE, H> {
    pub fn new(table: &'a mut PageTable<PAGE_SIZE>, handler: &'a mut H) -> Self {
        Self { table, handler }
    }

    pub fn len(&self) -> usize {
        self.table.virtmem_len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn table(&self) -> &PageTable<PAGE_SIZE> {
        &*self.table
    }

    pub fn handler(&self) -> &H {
        &*self.handler
    }

    fn resolve(&mut self, address: usize, access: Access) -> Result<u64, H::Error> {
        if address >= self.len() {
            return Err(AccessError::OutOfRange {
                address,
                len: self.len(),
            }
            .into());
        }
        let page_number = address / PAGE_SIZE;
        for _ in 0..MAX_FAULTS_PER_ACCESS {
            if let Some(frame_number) = self.table.translate(page_number, access) {
                return Ok((frame_number * PAGE_SIZE + address % PAGE_SIZE) as u64);
            }
            trace!("{:?} fault on page[{}]", access, page_number);
            self.handler.handle_fault(self.table, page_number)?;
        }
        self.table
            .translate(page_number, access)
            .map(|frame_number| (frame_number * PAGE_SIZE + address % PAGE_SIZE) as u64)
            .ok_or_else(|| AccessError::Unresolved(page_number).into())
    }

    pub fn read_u8(&mut self, address: usize) -> Result<u8, H::Error> {
        let physical = self.resolve(address, Access::Read)?;
        let byte = self
            .table
            .physmem()
            .read_u8(physical)
            .map_err(AccessError::from)?;
        Ok(byte)
    }

    pub fn write_u8(&mut self, address: usize, byte: u8) -> Result<(), H::Error> {
        let physical = self.resolve(address, Access::Write)?;
        self.table
            .physmem_mut()
            .write_u8(physical, byte)
            .map_err(AccessError::from)?;
        Ok(())
    }
}
