//! # CooperKV
//!
//! An embedded, single-process key-value storage engine with:
//! - Append-only data files of checksummed records
//! - In-memory index mapping keys to values or record locations
//! - Syscall or memory-mapped file access
//! - Single-writer/multi-reader concurrency model
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Engine                              │
//! │              (one RwLock over files + index)                │
//! └─────────────────────┬───────────────────────────────────────┘
//!                       │
//!          ┌────────────┴────────────┐
//!          │                         │
//!          ▼                         ▼
//!   ┌─────────────┐          ┌─────────────┐
//!   │    Index    │          │  DataFiles  │
//!   │  (HashMap)  │          │ active + N  │
//!   └─────────────┘          │  archived   │
//!                            └──────┬──────┘
//!                                   │
//!                                   ▼
//!                           ┌─────────────┐
//!                           │   Record    │
//!                           │   (codec)   │
//!                           └─────────────┘
//! ```
//!
//! ## Example
//!
//! ```no_run
//! use cooperkv::{Config, Engine};
//!
//! let config = Config::builder().dir_path("/tmp/cooperkv").build();
//! let engine = Engine::open(config)?;
//!
//! engine.set(b"hello", b"world")?;
//! assert_eq!(engine.get(b"hello")?, b"world".to_vec());
//!
//! engine.close()?;
//! # Ok::<(), cooperkv::CooperError>(())
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod config;

pub mod record;
pub mod storage;
pub mod index;
pub mod meta;
pub mod command;
pub mod engine;

// =============================================================================
// Public API Re-exports
// =============================================================================

pub use error::{CooperError, Result};
pub use config::{Config, FileRwMethod, IndexMode};
pub use engine::Engine;

// =============================================================================
// Version Info
// =============================================================================

/// Current version of CooperKV
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
