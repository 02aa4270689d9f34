//! Block Store
//!
//! Fixed-block random access over a backing disk. Every call goes straight
//! to the disk; nothing is cached. Durability is the caller's job: issue
//! [`BlockStore::sync`] after a logical unit of work.

use std::fs::File;
use std::io::{self, Cursor, Read, Seek, SeekFrom, Write};

use crate::error::{FsError, Result};

use super::layout::{BLOCK_SIZE, MAX_BLOCKS, MIN_DISK_SIZE};

/// A random-access byte region the block store can live on
pub trait Disk: Read + Write + Seek + Send {
    /// Current length of the region in bytes
    fn size(&self) -> io::Result<u64>;

    /// Grow or shrink the region; new bytes are zero
    fn set_size(&mut self, len: u64) -> io::Result<()>;

    /// Make every completed write durable
    fn sync(&mut self) -> io::Result<()>;
}

impl Disk for File {
    fn size(&self) -> io::Result<u64> {
        Ok(self.metadata()?.len())
    }

    fn set_size(&mut self, len: u64) -> io::Result<()> {
        self.set_len(len)
    }

    fn sync(&mut self) -> io::Result<()> {
        self.sync_all()
    }
}

/// In-memory disk, handy for tests and throwaway instances
#[derive(Debug, Default, Clone)]
pub struct MemDisk {
    cursor: Cursor<Vec<u8>>,
}

impl MemDisk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing image
    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        Self {
            cursor: Cursor::new(bytes),
        }
    }

    /// Raw image contents
    pub fn bytes(&self) -> &[u8] {
        self.cursor.get_ref()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.cursor.into_inner()
    }
}

impl Read for MemDisk {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl Write for MemDisk {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.cursor.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Seek for MemDisk {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        self.cursor.seek(pos)
    }
}

impl Disk for MemDisk {
    fn size(&self) -> io::Result<u64> {
        Ok(self.cursor.get_ref().len() as u64)
    }

    fn set_size(&mut self, len: u64) -> io::Result<()> {
        let len = usize::try_from(len)
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "disk size overflows usize"))?;
        self.cursor.get_mut().resize(len, 0);
        Ok(())
    }

    fn sync(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Whether [`BlockStore::attach`] found an existing image or made a new one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiskState {
    /// The disk was empty and has been sized and zeroed
    Fresh,
    /// The disk already held an image
    Existing,
}

/// Block-addressed view of a [`Disk`]
pub struct BlockStore {
    disk: Box<dyn Disk>,
    block_count: usize,
}

impl BlockStore {
    /// Attach to a disk, formatting it to `disk_size` bytes if it is empty
    ///
    /// A fresh disk must be at least `MIN_DISK_SIZE` bytes; an existing disk
    /// shorter than that cannot hold the block layout and is rejected.
    pub fn attach(mut disk: Box<dyn Disk>, disk_size: u64) -> Result<(Self, DiskState)> {
        let current = disk.size()?;

        let state = if current == 0 {
            if disk_size < MIN_DISK_SIZE {
                return Err(FsError::Config(format!(
                    "disk size {} is smaller than the {} bytes the layout needs",
                    disk_size, MIN_DISK_SIZE
                )));
            }
            disk.set_size(disk_size)?;
            DiskState::Fresh
        } else if current < MIN_DISK_SIZE {
            return Err(FsError::Config(format!(
                "existing disk image is {} bytes, expected at least {}",
                current, MIN_DISK_SIZE
            )));
        } else {
            DiskState::Existing
        };

        Ok((
            Self {
                disk,
                block_count: MAX_BLOCKS,
            },
            state,
        ))
    }

    /// Number of addressable blocks
    pub fn block_count(&self) -> usize {
        self.block_count
    }

    /// Read `count` whole blocks starting at `start`
    pub fn read_blocks(&mut self, start: usize, count: usize) -> Result<Vec<u8>> {
        self.check_range(start, count)?;

        let mut buf = vec![0u8; count * BLOCK_SIZE];
        self.disk.seek(SeekFrom::Start(Self::offset(start)))?;
        self.disk.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Write `data` starting at block `start`, zero-padding the last block
    pub fn write_blocks(&mut self, start: usize, data: &[u8]) -> Result<()> {
        let count = data.len().div_ceil(BLOCK_SIZE);
        self.check_range(start, count)?;

        let padding = count * BLOCK_SIZE - data.len();
        self.disk.seek(SeekFrom::Start(Self::offset(start)))?;
        self.disk.write_all(data)?;
        if padding > 0 {
            self.disk.write_all(&vec![0u8; padding])?;
        }
        self.disk.flush()?;
        Ok(())
    }

    /// Overwrite `count` blocks starting at `start` with zeros
    pub fn zero_blocks(&mut self, start: usize, count: usize) -> Result<()> {
        self.write_blocks(start, &vec![0u8; count * BLOCK_SIZE])
    }

    /// Flush the backing disk to durable storage
    pub fn sync(&mut self) -> Result<()> {
        self.disk.sync()?;
        Ok(())
    }

    fn offset(block: usize) -> u64 {
        (block * BLOCK_SIZE) as u64
    }

    fn check_range(&self, start: usize, count: usize) -> Result<()> {
        match start.checked_add(count) {
            Some(end) if end <= self.block_count => Ok(()),
            _ => Err(FsError::Io(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!(
                    "block range {}+{} outside disk of {} blocks",
                    start, count, self.block_count
                ),
            ))),
        }
    }
}
