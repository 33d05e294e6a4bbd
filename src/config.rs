//! Configuration for CooperKV
//!
//! Centralized configuration with sensible defaults. A `Config` is fixed
//! for the lifetime of an engine.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{CooperError, Result};
use crate::record::HEADER_SIZE;

/// Main configuration for a CooperKV instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    // -------------------------------------------------------------------------
    // Storage Configuration
    // -------------------------------------------------------------------------
    /// Directory holding the data files and engine metadata
    ///   {dir_path}/
    ///     ├── 000000000.data
    ///     ├── 000000001.data
    ///     └── cooperkv.meta
    pub dir_path: PathBuf,

    /// Max size of a single data file (in bytes). The active file is
    /// rotated before a write that would grow it past this bound.
    pub block_size: u64,

    /// How data files are read and written
    pub rw_method: FileRwMethod,

    /// fsync / msync the active file after every write
    pub sync_on_write: bool,

    // -------------------------------------------------------------------------
    // Index Configuration
    // -------------------------------------------------------------------------
    /// Whether the index keeps values resident or only their locations
    pub idx_mode: IndexMode,

    // -------------------------------------------------------------------------
    // Limits
    // -------------------------------------------------------------------------
    /// Max key length (in bytes)
    pub max_key_size: u32,

    /// Max value length (in bytes)
    pub max_value_size: u32,
}

/// Data file access method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileRwMethod {
    /// Positional read/write system calls
    FileIo,

    /// Memory-mapped region, pre-sized to `block_size`
    MMap,
}

/// Index retention mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndexMode {
    /// Keys and values both live in memory; reads never touch disk
    KeyValueMemory,

    /// Only keys and record locations live in memory
    KeyOnlyMemory,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            dir_path: PathBuf::from("./cooperkv_data"),
            block_size: 16 * 1024 * 1024, // 16 MB
            rw_method: FileRwMethod::FileIo,
            sync_on_write: false,
            idx_mode: IndexMode::KeyOnlyMemory,
            max_key_size: 128,
            max_value_size: 1024 * 1024, // 1 MB
        }
    }
}

impl Config {
    /// Create a new config builder
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::default()
    }

    /// Check that the limits are usable together.
    ///
    /// A maximally sized record must fit in one block, otherwise rotation
    /// could not keep every record inside a single file.
    pub fn validate(&self) -> Result<()> {
        if self.block_size == 0 {
            return Err(CooperError::Config("block_size must be positive".to_string()));
        }
        if self.max_key_size == 0 {
            return Err(CooperError::Config("max_key_size must be positive".to_string()));
        }

        let largest_record =
            HEADER_SIZE as u64 + self.max_key_size as u64 + self.max_value_size as u64;
        if largest_record > self.block_size {
            return Err(CooperError::Config(format!(
                "block_size {} cannot hold a maximally sized record of {} bytes",
                self.block_size, largest_record
            )));
        }

        Ok(())
    }
}

/// Builder for Config
#[derive(Default)]
pub struct ConfigBuilder {
    config: Config,
}

impl ConfigBuilder {
    /// Set the data directory
    pub fn dir_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dir_path = path.into();
        self
    }

    /// Set the max size of one data file (in bytes)
    pub fn block_size(mut self, size: u64) -> Self {
        self.config.block_size = size;
        self
    }

    /// Set the data file access method
    pub fn rw_method(mut self, method: FileRwMethod) -> Self {
        self.config.rw_method = method;
        self
    }

    /// Sync the active file after every write
    pub fn sync_on_write(mut self, sync: bool) -> Self {
        self.config.sync_on_write = sync;
        self
    }

    /// Set the index retention mode
    pub fn idx_mode(mut self, mode: IndexMode) -> Self {
        self.config.idx_mode = mode;
        self
    }

    /// Set the max key length (in bytes)
    pub fn max_key_size(mut self, size: u32) -> Self {
        self.config.max_key_size = size;
        self
    }

    /// Set the max value length (in bytes)
    pub fn max_value_size(mut self, size: u32) -> Self {
        self.config.max_value_size = size;
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
