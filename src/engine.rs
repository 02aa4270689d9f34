//! Engine Module
//!
//! The storage engine that coordinates the block store, the directory and
//! the allocator.
//!
//! ## Responsibilities
//! - Format a fresh disk or load the directory from an existing one
//! - Create, write, read, delete and list files
//! - Keep the persisted directory and the data blocks consistent

use std::fs::OpenOptions;
use std::path::Path;

use parking_lot::Mutex;

use crate::config::Config;
use crate::error::{FsError, Result};
use crate::protocol::{Command, Response};
use crate::storage::layout::{blocks_needed, FIRST_DATA_BLOCK, MAX_BLOCKS, METADATA_BLOCK};
use crate::storage::{
    validate_name, BlockBitmap, BlockStore, Directory, Disk, DiskState, FileEntry,
};

/// Everything guarded by the engine lock
struct EngineState {
    store: BlockStore,
    directory: Directory,
}

impl EngineState {
    fn lookup(&self, name: &[u8]) -> Result<usize> {
        self.directory
            .find_by_name(name)
            .ok_or_else(|| FsError::NotFound(String::from_utf8_lossy(name).into_owned()))
    }

    /// Persist `next` to the metadata block, then make it the live directory
    ///
    /// The in-memory directory only changes once the block is synced, so a
    /// failed commit leaves memory matching the last persisted state.
    fn commit(&mut self, next: Directory) -> Result<()> {
        self.store.write_blocks(METADATA_BLOCK, &next.encode()?)?;
        self.store.sync()?;
        self.directory = next;
        Ok(())
    }
}

/// The main storage engine
///
/// ## Concurrency Model: one global lock
///
/// Every public operation runs its whole body under a single `Mutex`,
/// including the directory flush. Operations on different files are
/// serialized too: the metadata block is shared by all of them.
pub struct Engine {
    /// Engine configuration
    config: Config,

    /// Block store and directory
    state: Mutex<EngineState>,
}

impl Engine {
    /// Open or create an engine with the given config
    ///
    /// On startup:
    /// 1. Open/create the disk image
    /// 2. Size and zero it if it is empty, writing an empty directory
    /// 3. Otherwise decode the directory from block 0
    pub fn open(config: Config) -> Result<Self> {
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&config.disk_path)?;

        Self::with_disk(config, Box::new(file))
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified disk image
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().disk_path(path).build();
        Self::open(config)
    }

    /// Build an engine over any backing disk
    pub fn with_disk(config: Config, disk: Box<dyn Disk>) -> Result<Self> {
        let (mut store, disk_state) = BlockStore::attach(disk, config.disk_size)?;

        let directory = match disk_state {
            DiskState::Fresh => {
                let directory = Directory::new();
                store.write_blocks(METADATA_BLOCK, &directory.encode()?)?;
                store.sync()?;
                tracing::info!(
                    "Formatted new disk at {} ({} bytes)",
                    config.disk_path.display(),
                    config.disk_size
                );
                directory
            }
            DiskState::Existing => {
                let block = store.read_blocks(METADATA_BLOCK, 1)?;
                let directory = Directory::decode(&block)?;
                tracing::info!(
                    "Loaded disk at {} with {} file(s)",
                    config.disk_path.display(),
                    directory.len()
                );
                directory
            }
        };

        Ok(Self {
            config,
            state: Mutex::new(EngineState { store, directory }),
        })
    }

    /// Execute a command
    ///
    /// Routes commands to the matching operation and renders the success
    /// reply; failures are returned for the caller to render.
    pub fn execute(&self, command: Command) -> Result<Response> {
        match command {
            Command::Create { name } => {
                self.create(name.as_bytes())?;
                Ok(Response::success(format!("File '{}' created.", name)))
            }
            Command::Write { name, content } => {
                self.write(name.as_bytes(), content.as_bytes())?;
                Ok(Response::success(format!(
                    "wrote {} bytes to '{}'",
                    content.len(),
                    name
                )))
            }
            Command::Read { name } => {
                let data = self.read(name.as_bytes())?;
                Ok(Response::success(String::from_utf8_lossy(&data)))
            }
            Command::Delete { name } => {
                self.delete(name.as_bytes())?;
                Ok(Response::success(format!("File '{}' deleted.", name)))
            }
            Command::List => {
                let names: Vec<String> = self
                    .list()
                    .iter()
                    .map(|name| String::from_utf8_lossy(name).into_owned())
                    .collect();
                Ok(Response::success(names.join(" ")))
            }
            Command::Quit => Ok(Response::success("Disconnecting.")),
        }
    }

    /// Create an empty file
    ///
    /// Creating a name that already exists succeeds and changes nothing.
    pub fn create(&self, name: &[u8]) -> Result<()> {
        validate_name(name)?;

        let mut state = self.state.lock();

        if state.directory.find_by_name(name).is_some() {
            tracing::debug!("create {:?}: already exists", String::from_utf8_lossy(name));
            return Ok(());
        }

        let slot = state
            .directory
            .first_free_slot()
            .ok_or(FsError::DirectoryFull)?;

        let mut next = state.directory.clone();
        next.insert(slot, FileEntry::new(name)?);
        state.commit(next)?;

        tracing::debug!("create {:?} in slot {}", String::from_utf8_lossy(name), slot);
        Ok(())
    }

    /// Delete a file, zeroing its data blocks first
    pub fn delete(&self, name: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        let slot = state.lookup(name)?;

        // A corrupt extent may cover blocks owned by other files: leave it
        let extent = state.directory.get(slot).and_then(FileEntry::extent);
        match extent {
            Some(extent) if extent.start >= FIRST_DATA_BLOCK && extent.end <= MAX_BLOCKS => {
                state.store.zero_blocks(extent.start, extent.len())?;
            }
            Some(extent) => {
                tracing::warn!(
                    "delete {:?}: skipping scrub of invalid extent {:?}",
                    String::from_utf8_lossy(name),
                    extent
                );
            }
            None => {}
        }

        let mut next = state.directory.clone();
        next.remove(slot);
        state.commit(next)?;

        tracing::debug!("delete {:?} from slot {}", String::from_utf8_lossy(name), slot);
        Ok(())
    }

    /// Replace a file's contents
    ///
    /// The new extent may overlap the file's old one; it never overlaps
    /// another file. Empty contents release the extent entirely.
    pub fn write(&self, name: &[u8], contents: &[u8]) -> Result<()> {
        let mut state = self.state.lock();
        let slot = state.lookup(name)?;

        let needed = blocks_needed(contents.len());
        if needed > MAX_BLOCKS - FIRST_DATA_BLOCK {
            return Err(FsError::FileTooLarge);
        }

        let first_block = if needed == 0 {
            None
        } else {
            let used = BlockBitmap::used_blocks(&state.directory, Some(slot));
            let start = used
                .find_contiguous_free_run(needed)
                .ok_or(FsError::InsufficientSpace)?;
            state.store.write_blocks(start, contents)?;
            Some(start)
        };

        let mut next = state.directory.clone();
        if let Some(entry) = next.get_mut(slot) {
            entry.size = contents.len();
            entry.first_block = first_block;
        }
        state.commit(next)?;

        tracing::debug!(
            "write {:?}: {} bytes at block {:?}",
            String::from_utf8_lossy(name),
            contents.len(),
            first_block
        );
        Ok(())
    }

    /// Read a file's contents
    pub fn read(&self, name: &[u8]) -> Result<Vec<u8>> {
        let mut state = self.state.lock();
        let slot = state.lookup(name)?;

        let entry = match state.directory.get(slot) {
            Some(entry) => entry.clone(),
            None => return Err(FsError::NotFound(String::from_utf8_lossy(name).into_owned())),
        };

        if entry.size == 0 {
            return Ok(Vec::new());
        }

        let blocks = entry.block_count();
        let start = match entry.first_block {
            Some(first) if first >= FIRST_DATA_BLOCK && first + blocks <= MAX_BLOCKS => first,
            _ => {
                tracing::warn!(
                    "Entry {:?} claims {} bytes at block {:?}",
                    entry.display_name(),
                    entry.size,
                    entry.first_block
                );
                return Err(FsError::CorruptMetadata(entry.display_name()));
            }
        };

        let mut data = state.store.read_blocks(start, blocks)?;
        data.truncate(entry.size);
        Ok(data)
    }

    /// Names of all files, in directory slot order
    pub fn list(&self) -> Vec<Vec<u8>> {
        self.state.lock().directory.names()
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Snapshot of live entries with their slot index
    pub fn entries(&self) -> Vec<(usize, FileEntry)> {
        self.state
            .lock()
            .directory
            .entries()
            .map(|(slot, entry)| (slot, entry.clone()))
            .collect()
    }

    /// Entry for one file
    pub fn stat(&self, name: &[u8]) -> Result<FileEntry> {
        let state = self.state.lock();
        let slot = state.lookup(name)?;
        state
            .directory
            .get(slot)
            .cloned()
            .ok_or_else(|| FsError::NotFound(String::from_utf8_lossy(name).into_owned()))
    }

    /// Number of unallocated data blocks
    pub fn free_blocks(&self) -> usize {
        BlockBitmap::used_blocks(&self.state.lock().directory, None).free_count()
    }

    /// Number of files
    pub fn file_count(&self) -> usize {
        self.state.lock().directory.len()
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }
}
