//! Configuration for BlockFS
//!
//! Centralized configuration with sensible defaults. The disk geometry
//! (block size, block count, directory slots) is fixed in
//! [`crate::storage::layout`] and is not configurable here.

use std::path::PathBuf;

use crate::storage::layout::{BLOCK_SIZE, MAX_BLOCKS};

/// Main configuration for a BlockFS instance
#[derive(Debug, Clone)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Path of the disk image holding every block
    pub disk_path: PathBuf,

    /// Total size of the disk image in bytes, used when creating a fresh image.
    /// Must cover at least `MAX_BLOCKS * BLOCK_SIZE` bytes.
    pub disk_size: u64,

    // -------------------------------------------------------------------------
    // Network Configuration
    // -------------------------------------------------------------------------
    /// TCP listen address
    pub listen_addr: String,

    /// Max concurrent client connections
    pub max_connections: usize,

    /// Idle read timeout per connection (milliseconds, 0 = none)
    pub read_timeout_ms: u64,

    /// Connection write timeout (milliseconds, 0 = none)
    pub write_timeout_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            disk_path: PathBuf::from("./blockfs.img"),
            disk_size: (MAX_BLOCKS * BLOCK_SIZE) as u64,
            listen_addr: "127.0.0.1:12345".to_string(),
            max_connections: 64,
            read_timeout_ms: 300_000,
            write_timeout_ms: 5000,
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the disk image path
    pub fn disk_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.disk_path = path.into();
        self
    }

    /// Set the disk image size (in bytes)
    pub fn disk_size(mut self, size: u64) -> Self {
        self.config.disk_size = size;
        self
    }

    /// Set the TCP listen address
    pub fn listen_addr(mut self, addr: impl Into<String>) -> Self {
        self.config.listen_addr = addr.into();
        self
    }

    /// Set the maximum number of concurrent connections
    pub fn max_connections(mut self, count: usize) -> Self {
        self.config.max_connections = count;
        self
    }

    /// Set the read timeout (in milliseconds)
    pub fn read_timeout_ms(mut self, ms: u64) -> Self {
        self.config.read_timeout_ms = ms;
        self
    }

    /// Set the write timeout (in milliseconds)
    pub fn write_timeout_ms(mut self, ms: u64) -> Self {
        self.config.write_timeout_ms = ms;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
