use std::{
    fs::{remove_file, File},
    io::{self, Read, Seek, SeekFrom, Write},
    mem::size_of,
    sync::{Mutex, MutexGuard},
};

use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DiskError {
    #[error("buffer of {0} bytes does not match the block size")]
    IncorrectBlockSize(usize),
    #[error("block {0} is past the end of the disk")]
    OverCapacity(usize),
    #[error("disk image has block size {found}, expected {expected}")]
    HeaderMismatch { expected: usize, found: usize },
    #[error(transparent)]
    Io(#[from] io::Error),
}

const HEADER_SIZE: usize = size_of::<u32>() * 2;

/// Block device backed by a file. Block `n` holds the contents of virtual page `n`.
///
/// Each `Disk` owns its file handle. [`Disk::connect`] opens an independent
/// handle onto the same image.
#[derive(Debug)]
pub struct Disk<const BLOCKSIZE: usize> {
    file_name: String,
    blocks: usize,
    file: Mutex<File>,
}

pub fn make_name(name: &str) -> String {
    let name = name.replace("-", "_");
    let mut disk_name = String::from("DISK_IMAGE_");
    disk_name.push_str(&name);
    disk_name
}

fn write_header(file: &mut File, block_size: u32, blocks: u32) -> Result<(), io::Error> {
    file.seek(SeekFrom::Start(0))?;
    file.write_all(&block_size.to_be_bytes())?;
    file.write_all(&blocks.to_be_bytes())?;
    Ok(())
}

fn read_header(file: &mut File) -> Result<(u32, u32), io::Error> {
    let mut block_size = [0; size_of::<u32>()];
    let mut blocks = [0; size_of::<u32>()];
    file.seek(SeekFrom::Start(0))?;
    file.read_exact(&mut block_size)?;
    file.read_exact(&mut blocks)?;
    Ok((u32::from_be_bytes(block_size), u32::from_be_bytes(blocks)))
}

impl<const BLOCKSIZE: usize> Disk<BLOCKSIZE> {
    pub fn create(name: &str, blocks: usize) -> Result<Self, DiskError> {
        let mut file = File::options()
            .truncate(true)
            .write(true)
            .read(true)
            .create(true)
            .open(make_name(name))?;
        file.set_len((HEADER_SIZE + blocks * BLOCKSIZE) as u64)?;
        write_header(&mut file, BLOCKSIZE as u32, blocks as u32)?;
        debug!("Created disk {} with {} blocks", make_name(name), blocks);
        Ok(Self {
            file_name: String::from(name),
            blocks,
            file: Mutex::new(file),
        })
    }

    pub fn connect(name: &str) -> Result<Self, DiskError> {
        let mut file = File::options()
            .write(true)
            .read(true)
            .open(make_name(name))?;
        let (block_size, blocks) = read_header(&mut file)?;
        if block_size as usize != BLOCKSIZE {
            return Err(DiskError::HeaderMismatch {
                expected: BLOCKSIZE,
                found: block_size as usize,
            });
        }
        Ok(Self {
            file_name: String::from(name),
            blocks: blocks as usize,
            file: Mutex::new(file),
        })
    }

    pub fn blocks(&self) -> usize {
        self.blocks
    }

    pub fn name(&self) -> &str {
        &self.file_name
    }

    fn lock(&self) -> MutexGuard<'_, File> {
        // Poisoning leaves the file handle intact.
        self.file.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn seek_to(&self, file: &mut File, block_number: usize) -> Result<(), DiskError> {
        if block_number >= self.blocks {
            return Err(DiskError::OverCapacity(block_number));
        }
        file.seek(SeekFrom::Start(
            HEADER_SIZE as u64 + (block_number * BLOCKSIZE) as u64,
        ))?;
        Ok(())
    }

    pub fn read_block(&self, block_number: usize, buf: &mut [u8]) -> Result<(), DiskError> {
        if buf.len() != BLOCKSIZE {
            return Err(DiskError::IncorrectBlockSize(buf.len()));
        }
        let mut file = self.lock();
        debug!("Start reading block[{}]", block_number);
        self.seek_to(&mut file, block_number)?;
        file.read_exact(buf)?;
        debug!("Done reading block[{}]", block_number);
        Ok(())
    }

    pub fn write_block(&self, block_number: usize, block: &[u8]) -> Result<(), DiskError> {
        if block.len() != BLOCKSIZE {
            return Err(DiskError::IncorrectBlockSize(block.len()));
        }
        let mut file = self.lock();
        debug!("Start writing block[{}]", block_number);
        self.seek_to(&mut file, block_number)?;
        file.write_all(block)?;
        debug!("Done writing block[{}]", block_number);
        Ok(())
    }

    /// Closes the disk and deletes its image file. Handles obtained with
    /// [`Disk::connect`] must be dropped first.
    pub fn remove(self) -> Result<(), DiskError> {
        let name = make_name(&self.file_name);
        drop(self);
        remove_file(name)?;
        Ok(())
    }
}
