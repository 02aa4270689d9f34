//! # BlockFS
//!
//! A tiny block-structured file store living inside one disk image:
//! - Fixed directory of up to 5 named files
//! - Each file stored as one contiguous run of 128-byte blocks
//! - Directory persisted and synced to block 0 after every change
//! - One global lock shared by every client
//! - Line-based TCP client protocol
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      TCP Server                              │
//! │              (One thread per connection)                     │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//! ┌─────────────────────▼───────────────────────────────────────┐
//! │                        Engine                                │
//! │                  (Single global Mutex)                       │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┼────────────┐
//!          │            │            │
//!          ▼            ▼            ▼
//!   ┌───────────┐ ┌───────────┐ ┌───────────┐
//!   │ Directory │ │ Allocator │ │BlockStore │
//!   │ (block 0) │ │(first-fit)│ │ (disk img)│
//!   └───────────┘ └───────────┘ └───────────┘
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod storage;
pub mod network;
pub mod protocol;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{FsError, Result};
pub use config::Config;
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of BlockFS
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
