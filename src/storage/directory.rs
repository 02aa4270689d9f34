//! Directory
//!
//! In-memory table of file entries and its block-0 codec.
//!
//! ## Record Format
//! ```text
//! ┌──────────────────────┬────────────┬──────────────────┐
//! │ Name (11, NUL pad)   │ Size (2)   │ First Block (2)  │
//! └──────────────────────┴────────────┴──────────────────┘
//! ```
//! Records are laid out back to back, one per slot, starting at offset 0 of
//! the metadata block. Size is an unsigned big-endian u16; first block is a
//! signed big-endian i16 where `-1` means no extent.

use std::io;
use std::ops::Range;

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{FsError, Result};

use super::layout::{blocks_needed, BLOCK_SIZE, MAX_FILES, MAX_NAME_LEN};

/// Width of the name field
pub const NAME_FIELD_SIZE: usize = MAX_NAME_LEN;

/// Width of one encoded record: name + size (2) + first block (2)
pub const RECORD_SIZE: usize = NAME_FIELD_SIZE + 2 + 2;

/// On-disk value of `first_block` when no blocks are allocated
pub const NO_BLOCK_SENTINEL: i16 = -1;

/// One directory slot's content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    /// Name bytes, non-empty, at most `MAX_NAME_LEN` long
    pub name: Vec<u8>,

    /// Current content length in bytes
    pub size: usize,

    /// First block of the extent, `None` while the file is empty
    pub first_block: Option<usize>,
}

impl FileEntry {
    /// A new, empty entry. Fails if the name is empty or too long.
    pub fn new(name: &[u8]) -> Result<Self> {
        validate_name(name)?;
        Ok(Self {
            name: name.to_vec(),
            size: 0,
            first_block: None,
        })
    }

    /// Blocks occupied by the content
    pub fn block_count(&self) -> usize {
        blocks_needed(self.size)
    }

    /// Block range of the extent, if the file holds data
    pub fn extent(&self) -> Option<Range<usize>> {
        match self.first_block {
            Some(first) if self.size > 0 => Some(first..first + self.block_count()),
            _ => None,
        }
    }

    /// Name for display and error messages
    pub fn display_name(&self) -> String {
        String::from_utf8_lossy(&self.name).into_owned()
    }
}

/// Check a name against the length limits
///
/// A name made only of padding bytes is rejected as empty: decoding would
/// read its slot back as free.
pub fn validate_name(name: &[u8]) -> Result<()> {
    if trim_padding(name).is_empty() {
        return Err(FsError::InvalidName("filename is empty"));
    }
    if name.len() > MAX_NAME_LEN {
        return Err(FsError::InvalidName("filename too long"));
    }
    Ok(())
}

/// Strip padding from both ends of a name field.
///
/// Anything at or below ASCII space counts as padding, so NUL fill and
/// trailing blanks disappear alike.
pub fn trim_padding(name: &[u8]) -> &[u8] {
    let start = name.iter().position(|&b| b > b' ').unwrap_or(name.len());
    let end = name.iter().rposition(|&b| b > b' ').map_or(start, |i| i + 1);
    &name[start..end]
}

/// Fixed-capacity table of file entries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directory {
    slots: Vec<Option<FileEntry>>,
}

impl Default for Directory {
    fn default() -> Self {
        Self::new()
    }
}

impl Directory {
    /// An empty directory with `MAX_FILES` slots
    pub fn new() -> Self {
        Self {
            slots: vec![None; MAX_FILES],
        }
    }

    // =========================================================================
    // Codec
    // =========================================================================

    /// Serialize every slot in order into one metadata block image
    ///
    /// Fails with `CorruptMetadata` if an entry's size or first block does
    /// not fit its on-disk field.
    pub fn encode(&self) -> Result<Bytes> {
        let mut buf = BytesMut::with_capacity(BLOCK_SIZE);

        for slot in &self.slots {
            let mut name_field = [0u8; NAME_FIELD_SIZE];
            match slot {
                Some(entry) => {
                    let len = entry.name.len().min(NAME_FIELD_SIZE);
                    name_field[..len].copy_from_slice(&entry.name[..len]);
                    let size = u16::try_from(entry.size)
                        .map_err(|_| FsError::CorruptMetadata(entry.display_name()))?;
                    let first_block = match entry.first_block {
                        Some(block) => i16::try_from(block)
                            .map_err(|_| FsError::CorruptMetadata(entry.display_name()))?,
                        None => NO_BLOCK_SENTINEL,
                    };
                    buf.put_slice(&name_field);
                    buf.put_u16(size);
                    buf.put_i16(first_block);
                }
                None => {
                    buf.put_slice(&name_field);
                    buf.put_u16(0);
                    buf.put_i16(NO_BLOCK_SENTINEL);
                }
            }
        }

        buf.resize(BLOCK_SIZE.max(buf.len()), 0);
        Ok(buf.freeze())
    }

    /// Rebuild a directory from a metadata block image
    ///
    /// A slot whose name is empty after trimming padding is free, whatever
    /// its size and block fields hold.
    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let needed = MAX_FILES * RECORD_SIZE;
        if bytes.len() < needed {
            return Err(FsError::Io(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                format!(
                    "metadata block holds {} bytes, directory needs {}",
                    bytes.len(),
                    needed
                ),
            )));
        }

        let mut buf = &bytes[..needed];
        let mut slots = Vec::with_capacity(MAX_FILES);

        for _ in 0..MAX_FILES {
            let name = trim_padding(&buf[..NAME_FIELD_SIZE]).to_vec();
            buf.advance(NAME_FIELD_SIZE);
            let size = buf.get_u16() as usize;
            let first_block = buf.get_i16();

            if name.is_empty() {
                slots.push(None);
                continue;
            }

            slots.push(Some(FileEntry {
                name,
                size,
                first_block: usize::try_from(first_block).ok(),
            }));
        }

        Ok(Self { slots })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    /// Slot holding a file with this name; names match after padding removal
    pub fn find_by_name(&self, name: &[u8]) -> Option<usize> {
        let wanted = trim_padding(name);
        self.slots.iter().position(|slot| {
            slot.as_ref()
                .is_some_and(|entry| trim_padding(&entry.name) == wanted)
        })
    }

    /// Lowest empty slot
    pub fn first_free_slot(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_none)
    }

    pub fn get(&self, slot: usize) -> Option<&FileEntry> {
        self.slots.get(slot).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, slot: usize) -> Option<&mut FileEntry> {
        self.slots.get_mut(slot).and_then(Option::as_mut)
    }

    /// Place an entry in a slot, returning what was there
    pub fn insert(&mut self, slot: usize, entry: FileEntry) -> Option<FileEntry> {
        self.slots.get_mut(slot).and_then(|s| s.replace(entry))
    }

    /// Clear a slot
    pub fn remove(&mut self, slot: usize) -> Option<FileEntry> {
        self.slots.get_mut(slot).and_then(Option::take)
    }

    /// Live entries with their slot index, in slot order
    pub fn entries(&self) -> impl Iterator<Item = (usize, &FileEntry)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(slot, entry)| entry.as_ref().map(|e| (slot, e)))
    }

    /// Names of live entries in slot order
    pub fn names(&self) -> Vec<Vec<u8>> {
        self.entries().map(|(_, e)| e.name.clone()).collect()
    }

    /// Total number of slots
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.entries().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
