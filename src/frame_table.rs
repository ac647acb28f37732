use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameTableError {
    #[error("frame {0} is already empty")]
    FrameEmpty(usize),
    #[error("frame {frame} is already occupied by page {page}")]
    FrameOccupied { frame: usize, page: usize },
    #[error("page {page} is already mapped to frame {frame}")]
    PageMapped { page: usize, frame: usize },
    #[error("no frame is occupied")]
    NothingToEvict,
}

/// Bidirectional occupancy map between physical frames and virtual pages.
///
/// `frames[f] == Some(p)` exactly when `pages[p] == Some(f)`.
#[derive(Debug, Clone)]
pub struct FrameTable {
    frames: Vec<Option<usize>>,
    pages: Vec<Option<usize>>,
    occupied: usize,
}

impl FrameTable {
    pub fn new(frame_count: usize, page_count: usize) -> Self {
        Self {
            frames: vec![None; frame_count],
            pages: vec![None; page_count],
            occupied: 0,
        }
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    pub fn occupied(&self) -> usize {
        self.occupied
    }

    /// Lowest numbered empty frame, if any.
    pub fn find_free_frame(&self) -> Option<usize> {
        self.frames.iter().position(Option::is_none)
    }

    pub fn occupant(&self, frame: usize) -> Option<usize> {
        self.frames[frame]
    }

    pub fn mapping(&self, page: usize) -> Option<usize> {
        self.pages[page]
    }

    /// Clears both directions for the page held in `frame` and returns it.
    pub fn evict(&mut self, frame: usize) -> Result<usize, FrameTableError> {
        let page = self.frames[frame]
            .take()
            .ok_or(FrameTableError::FrameEmpty(frame))?;
        self.pages[page] = None;
        self.occupied -= 1;
        Ok(page)
    }

    pub fn install(&mut self, frame: usize, page: usize) -> Result<(), FrameTableError> {
        if let Some(occupant) = self.frames[frame] {
            return Err(FrameTableError::FrameOccupied {
                frame,
                page: occupant,
            });
        }
        if let Some(mapped) = self.pages[page] {
            return Err(FrameTableError::PageMapped {
                page,
                frame: mapped,
            });
        }
        self.frames[frame] = Some(page);
        self.pages[page] = Some(frame);
        self.occupied += 1;
        Ok(())
    }

    /// Occupied `(frame, page)` pairs in ascending frame order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.frames
            .iter()
            .enumerate()
            .filter_map(|(frame, page)| page.map(|page| (frame, page)))
    }

    /// Walks both maps and reports whether they are exact inverses.
    pub fn is_consistent(&self) -> bool {
        let forward = self.iter().all(|(frame, page)| self.pages[page] == Some(frame));
        let backward = self
            .pages
            .iter()
            .enumerate()
            .filter_map(|(page, frame)| frame.map(|frame| (page, frame)))
            .all(|(page, frame)| self.frames.get(frame) == Some(&Some(page)));
        forward && backward && self.iter().count() == self.occupied
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_empty() {
        let table = FrameTable::new(3, 8);
        assert_eq!(table.find_free_frame(), Some(0));
        assert_eq!(table.occupied(), 0);
        assert!((0..3).all(|f| table.occupant(f).is_none()));
        assert!((0..8).all(|p| table.mapping(p).is_none()));
        assert!(table.is_consistent());
    }

    #[test]
    fn free_frame_scan_is_ascending() {
        let mut table = FrameTable::new(3, 8);
        table.install(0, 5).unwrap();
        assert_eq!(table.find_free_frame(), Some(1));
        table.install(2, 6).unwrap();
        assert_eq!(table.find_free_frame(), Some(1));
        table.install(1, 7).unwrap();
        assert_eq!(table.find_free_frame(), None);
        table.evict(2).unwrap();
        assert_eq!(table.find_free_frame(), Some(2));
    }

    #[test]
    fn install_and_evict_keep_both_directions() {
        let mut table = FrameTable::new(2, 4);
        table.install(1, 3).unwrap();
        assert_eq!(table.occupant(1), Some(3));
        assert_eq!(table.mapping(3), Some(1));
        assert!(table.is_consistent());

        assert_eq!(table.evict(1), Ok(3));
        assert_eq!(table.occupant(1), None);
        assert_eq!(table.mapping(3), None);
        assert_eq!(table.occupied(), 0);
        assert!(table.is_consistent());
    }

    #[test]
    fn evict_empty_frame_fails() {
        let mut table = FrameTable::new(2, 4);
        assert_eq!(table.evict(0), Err(FrameTableError::FrameEmpty(0)));
    }

    #[test]
    fn install_requires_both_sides_free() {
        let mut table = FrameTable::new(2, 4);
        table.install(0, 1).unwrap();
        assert_eq!(
            table.install(0, 2),
            Err(FrameTableError::FrameOccupied { frame: 0, page: 1 })
        );
        assert_eq!(
            table.install(1, 1),
            Err(FrameTableError::PageMapped { page: 1, frame: 0 })
        );
        assert_eq!(table.occupied(), 1);
        assert!(table.is_consistent());
    }

    #[test]
    fn iter_lists_occupied_frames() {
        let mut table = FrameTable::new(4, 8);
        table.install(3, 0).unwrap();
        table.install(1, 7).unwrap();
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![(1, 7), (3, 0)]);
    }
}
