//! Tests for BlockStore
//!
//! These tests verify:
//! - Formatting a fresh disk vs attaching to an existing one
//! - Block reads and writes with zero padding
//! - Range checks
//! - File-backed disks

use std::fs::OpenOptions;

use blockfs::storage::layout::{BLOCK_SIZE, MAX_BLOCKS, MIN_DISK_SIZE};
use blockfs::storage::{BlockStore, Disk, DiskState, MemDisk};
use blockfs::FsError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn fresh_store() -> BlockStore {
    let (store, state) = BlockStore::attach(Box::new(MemDisk::new()), MIN_DISK_SIZE).unwrap();
    assert_eq!(state, DiskState::Fresh);
    store
}

// =============================================================================
// Attach Tests
// =============================================================================

#[test]
fn test_attach_empty_disk_is_fresh() {
    let store = fresh_store();
    assert_eq!(store.block_count(), MAX_BLOCKS);
}

#[test]
fn test_attach_existing_disk() {
    let image = vec![0u8; MIN_DISK_SIZE as usize];
    let (_store, state) = BlockStore::attach(Box::new(MemDisk::from_bytes(image)), MIN_DISK_SIZE)
        .unwrap();
    assert_eq!(state, DiskState::Existing);
}

#[test]
fn test_attach_rejects_small_fresh_size() {
    let result = BlockStore::attach(Box::new(MemDisk::new()), MIN_DISK_SIZE - 1);
    assert!(matches!(result, Err(FsError::Config(_))));
}

#[test]
fn test_attach_rejects_truncated_image() {
    let image = vec![0u8; 100];
    let result = BlockStore::attach(Box::new(MemDisk::from_bytes(image)), MIN_DISK_SIZE);
    assert!(matches!(result, Err(FsError::Config(_))));
}

#[test]
fn test_attach_sizes_larger_disk() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("big.img");
    let file = OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(&path)
        .unwrap();

    let (_store, state) = BlockStore::attach(Box::new(file), 4096).unwrap();

    assert_eq!(state, DiskState::Fresh);
    assert_eq!(std::fs::metadata(&path).unwrap().len(), 4096);
}

// =============================================================================
// Read / Write Tests
// =============================================================================

#[test]
fn test_fresh_blocks_are_zero() {
    let mut store = fresh_store();
    let data = store.read_blocks(0, MAX_BLOCKS).unwrap();
    assert_eq!(data.len(), MAX_BLOCKS * BLOCK_SIZE);
    assert!(data.iter().all(|&b| b == 0));
}

#[test]
fn test_write_pads_last_block() {
    let mut store = fresh_store();

    // Dirty the block first so the padding is observable
    store.write_blocks(3, &[0xFF; BLOCK_SIZE]).unwrap();
    store.write_blocks(3, b"hello").unwrap();

    let block = store.read_blocks(3, 1).unwrap();
    assert_eq!(&block[..5], b"hello");
    assert!(block[5..].iter().all(|&b| b == 0));
}

#[test]
fn test_write_spanning_blocks() {
    let mut store = fresh_store();
    let data: Vec<u8> = (0..300u32).map(|i| (i % 251) as u8).collect();

    store.write_blocks(2, &data).unwrap();

    let read = store.read_blocks(2, 3).unwrap();
    assert_eq!(&read[..300], &data[..]);
    assert!(read[300..].iter().all(|&b| b == 0));

    // Neighbours untouched
    assert!(store.read_blocks(1, 1).unwrap().iter().all(|&b| b == 0));
    assert!(store.read_blocks(5, 1).unwrap().iter().all(|&b| b == 0));
}

#[test]
fn test_zero_blocks() {
    let mut store = fresh_store();
    store.write_blocks(1, &[0xAB; 2 * BLOCK_SIZE]).unwrap();

    store.zero_blocks(1, 2).unwrap();

    assert!(store.read_blocks(1, 2).unwrap().iter().all(|&b| b == 0));
}

#[test]
fn test_out_of_range_access_is_io_error() {
    let mut store = fresh_store();

    assert!(matches!(store.read_blocks(MAX_BLOCKS, 1), Err(FsError::Io(_))));
    assert!(matches!(store.read_blocks(8, 3), Err(FsError::Io(_))));
    assert!(matches!(
        store.write_blocks(9, &[1u8; BLOCK_SIZE + 1]),
        Err(FsError::Io(_))
    ));
}

#[test]
fn test_mem_disk_grows_with_zeroes() {
    let mut disk = MemDisk::new();
    disk.set_size(256).unwrap();
    assert_eq!(disk.size().unwrap(), 256);
    assert!(disk.bytes().iter().all(|&b| b == 0));
}

#[test]
fn test_file_disk_persists_blocks() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("disk.img");
    let open = || {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .unwrap()
    };

    {
        let (mut store, _) = BlockStore::attach(Box::new(open()), MIN_DISK_SIZE).unwrap();
        store.write_blocks(4, b"persisted").unwrap();
        store.sync().unwrap();
    }

    let (mut store, state) = BlockStore::attach(Box::new(open()), MIN_DISK_SIZE).unwrap();
    assert_eq!(state, DiskState::Existing);
    assert_eq!(&store.read_blocks(4, 1).unwrap()[..9], b"persisted");
}
