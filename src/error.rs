//! Error types for BlockFS
//!
//! Provides a unified error type for all operations. The `Display` text of
//! each variant is what a client sees after `ERROR: ` on the wire.

use thiserror::Error;

/// Result type alias using FsError
pub type Result<T> = std::result::Result<T, FsError>;

/// Unified error type for BlockFS operations
#[derive(Debug, Error)]
pub enum FsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Naming / Lookup Errors
    // -------------------------------------------------------------------------
    /// Empty name, or longer than the name field allows
    #[error("{0}")]
    InvalidName(&'static str),

    #[error("file {0} does not exist")]
    NotFound(String),

    // -------------------------------------------------------------------------
    // Capacity Errors
    // -------------------------------------------------------------------------
    #[error("no free file entries")]
    DirectoryFull,

    #[error("file too large for filesystem")]
    FileTooLarge,

    #[error("not enough contiguous space")]
    InsufficientSpace,

    // -------------------------------------------------------------------------
    // Metadata Errors
    // -------------------------------------------------------------------------
    #[error("corrupted metadata for file {0}")]
    CorruptMetadata(String),

    // -------------------------------------------------------------------------
    // Protocol Errors
    // -------------------------------------------------------------------------
    #[error("{0}")]
    Protocol(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
