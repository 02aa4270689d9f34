//! Block Allocator
//!
//! Occupancy is never stored; it is rebuilt from the directory each time a
//! placement decision is needed. Placement is first-fit, scanning upward
//! from the first data block with no wraparound.

use super::directory::Directory;
use super::layout::{FIRST_DATA_BLOCK, MAX_BLOCKS, METADATA_BLOCK};

/// Used/free map of every block on the disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlockBitmap {
    used: Vec<bool>,
}

impl BlockBitmap {
    /// A bitmap with only the metadata block marked used
    pub fn new(block_count: usize) -> Self {
        let mut used = vec![false; block_count];
        if let Some(meta) = used.get_mut(METADATA_BLOCK) {
            *meta = true;
        }
        Self { used }
    }

    /// Occupancy implied by `directory`, ignoring the entry in `excluding`
    ///
    /// Leaving out the slot being rewritten lets a file be resized or moved
    /// over its own old extent. Blocks past the end of the disk are ignored.
    pub fn used_blocks(directory: &Directory, excluding: Option<usize>) -> Self {
        let mut bitmap = Self::new(MAX_BLOCKS);

        for (slot, entry) in directory.entries() {
            if Some(slot) == excluding {
                continue;
            }
            if let Some(extent) = entry.extent() {
                for block in extent {
                    bitmap.mark_used(block);
                }
            }
        }

        bitmap
    }

    /// Mark one block used; out-of-range blocks are ignored
    pub fn mark_used(&mut self, block: usize) {
        if let Some(bit) = self.used.get_mut(block) {
            *bit = true;
        }
    }

    pub fn is_used(&self, block: usize) -> bool {
        self.used.get(block).copied().unwrap_or(true)
    }

    pub fn block_count(&self) -> usize {
        self.used.len()
    }

    /// Number of free blocks
    pub fn free_count(&self) -> usize {
        self.used.iter().filter(|used| !**used).count()
    }

    /// First block of the lowest run of `needed` free blocks
    ///
    /// Returns `None` when no run fits, and also for `needed == 0`: an
    /// empty file takes no placement at all.
    pub fn find_contiguous_free_run(&self, needed: usize) -> Option<usize> {
        if needed == 0 {
            return None;
        }

        let mut start = FIRST_DATA_BLOCK;
        'candidates: while start + needed <= self.used.len() {
            for offset in 0..needed {
                if self.used[start + offset] {
                    // Resume just past the obstruction
                    start += offset + 1;
                    continue 'candidates;
                }
            }
            return Some(start);
        }

        None
    }
}
