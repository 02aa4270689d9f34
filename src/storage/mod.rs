//! Storage Module
//!
//! Block-level layout of the simulated disk.
//!
//! ## Responsibilities
//! - Fixed-size block I/O over a single backing disk
//! - Directory table and its metadata-block codec
//! - Contiguous first-fit block allocation
//!
//! ## Disk Layout
//! ```text
//! ┌──────────┬──────────┬──────────┬─────┬──────────┐
//! │ Block 0  │ Block 1  │ Block 2  │ ... │ Block 9  │
//! │ Directory│   Data   │   Data   │     │   Data   │
//! └──────────┴──────────┴──────────┴─────┴──────────┘
//!   128 bytes each; a file owns one contiguous run of data blocks
//! ```

pub mod layout;
mod block_store;
mod directory;
mod allocator;

pub use block_store::{BlockStore, Disk, DiskState, MemDisk};
pub use directory::{
    trim_padding, validate_name, Directory, FileEntry, NO_BLOCK_SENTINEL, RECORD_SIZE,
};
pub use allocator::BlockBitmap;
