//! Disk geometry
//!
//! Fixed parameters of the simulated disk. Block 0 holds the directory;
//! blocks `1..MAX_BLOCKS` hold file data.

/// Size of one block in bytes
pub const BLOCK_SIZE: usize = 128;

/// Total number of blocks on the disk (metadata block included)
pub const MAX_BLOCKS: usize = 10;

/// Number of directory slots
pub const MAX_FILES: usize = 5;

/// Maximum file name length in bytes
pub const MAX_NAME_LEN: usize = 11;

/// Block reserved for the serialized directory
pub const METADATA_BLOCK: usize = 0;

/// First block that may hold file data
pub const FIRST_DATA_BLOCK: usize = METADATA_BLOCK + 1;

/// Largest file that fits in the data region (9 * 128 = 1152 bytes)
pub const MAX_FILE_SIZE: usize = (MAX_BLOCKS - FIRST_DATA_BLOCK) * BLOCK_SIZE;

/// Smallest disk image that can hold the whole geometry
pub const MIN_DISK_SIZE: u64 = (MAX_BLOCKS * BLOCK_SIZE) as u64;

/// Number of blocks needed to hold `size` bytes (ceil division)
pub fn blocks_needed(size: usize) -> usize {
    size.div_ceil(BLOCK_SIZE)
}
