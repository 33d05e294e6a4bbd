//! Engine Module
//!
//! The core storage engine that coordinates data files and the index.
//!
//! ## Responsibilities
//! - Validate keys and values against the configured limits
//! - Append records to the active data file, rotating when it fills up
//! - Keep the index pointing at the latest record of every key
//! - Resolve index entries back to values on read

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::command::Command;
use crate::config::{Config, IndexMode};
use crate::error::{CooperError, Result};
use crate::index::{IndexEntry, Location, StrIndex};
use crate::meta::Meta;
use crate::record::{DataType, Mark, Record};
use crate::storage::{parse_file_id, DataFile};

/// The main storage engine
///
/// ## Concurrency Model: Single-Writer / Multiple-Reader (SWMR)
///
/// All mutable state (active file, archived files, index) sits behind one
/// RwLock, so the index and the file set are always seen together.
///
/// - **Writes** (set): exclusive lock from record build to index update
///   - At most ONE set in flight engine-wide
/// - **Reads** (get): shared lock from index lookup through file read
///   - Rotation cannot swap files between lookup and read
///   - Readers never block each other
pub struct Engine {
    /// Engine configuration, fixed for the engine's lifetime
    config: Config,

    /// Files and index, guarded together
    state: RwLock<EngineState>,
}

/// State guarded by the engine lock
struct EngineState {
    /// Current write target
    active: DataFile,

    /// Rotated-out files, read-only, keyed by file id
    archived: HashMap<u32, DataFile>,

    /// Index over string records
    str_index: StrIndex,

    /// Durable position of the active file
    meta: Meta,
}

impl Engine {
    /// Open an engine with the given config
    ///
    /// On startup:
    /// 1. Validate config
    /// 2. Create data directory if it doesn't exist
    /// 3. Pick the next free file id (existing files are left untouched)
    /// 4. Create the active data file
    ///
    /// Existing data files are not replayed into the index.
    pub fn open(config: Config) -> Result<Self> {
        // Step 1: Reject limits that could split a record across files
        config.validate()?;

        // Step 2: Create data directory
        fs::create_dir_all(&config.dir_path)?;

        if let Some(prev) = Meta::load(&config.dir_path)? {
            debug!(
                file_id = prev.active_file_id,
                write_off = prev.active_write_off,
                "found metadata from previous session"
            );
        }

        // Step 3: Next id = max existing + 1, or 0 for an empty directory
        let file_id = Self::next_file_id(&config.dir_path)?;

        // Step 4: Create the active file
        let active = DataFile::create(
            &config.dir_path,
            file_id,
            config.rw_method,
            config.block_size,
        )?;

        info!(
            dir = %config.dir_path.display(),
            active_file_id = file_id,
            rw_method = ?config.rw_method,
            idx_mode = ?config.idx_mode,
            "engine opened"
        );

        Ok(Self {
            state: RwLock::new(EngineState {
                active,
                archived: HashMap::new(),
                str_index: StrIndex::new(),
                meta: Meta {
                    active_file_id: file_id,
                    active_write_off: 0,
                },
            }),
            config,
        })
    }

    /// Open with a path (convenience method)
    ///
    /// Uses default config with the specified data directory
    pub fn open_path(path: &Path) -> Result<Self> {
        let config = Config::builder().dir_path(path).build();
        Self::open(config)
    }

    /// Execute a command
    ///
    /// Routes commands to appropriate handlers
    pub fn execute(&self, command: Command) -> Result<Option<Vec<u8>>> {
        match command {
            Command::Get { key } => self.get(&key).map(Some),
            Command::Set { key, value } => {
                self.set(&key, &value)?;
                Ok(None)
            }
            Command::Ping => Ok(Some(b"PONG".to_vec())),
        }
    }

    /// Set a key-value pair
    ///
    /// Steps:
    /// 1. Validate sizes
    /// 2. Acquire write lock
    /// 3. Append a String/SET record, rotating first if it would not fit
    /// 4. Point the index at the new record
    ///
    /// Any failure leaves the index untouched.
    pub fn set(&self, key: &[u8], value: &[u8]) -> Result<()> {
        self.check_key_value(key, value)?;

        let mut state = self.state.write();

        let record = Record::new(key, value, Mark::StrSet);
        state.store(&record, &self.config)?;

        let entry = match self.config.idx_mode {
            IndexMode::KeyValueMemory => IndexEntry::Value(record.value.clone()),
            IndexMode::KeyOnlyMemory => IndexEntry::Location(Location {
                file_id: state.active.id(),
                offset: state.active.offset() - record.size(),
                size: record.size(),
            }),
        };
        state.build_index(record, entry)
    }

    /// Get the value of a key
    ///
    /// Index lookup and file read both happen under the read lock.
    pub fn get(&self, key: &[u8]) -> Result<Vec<u8>> {
        if key.is_empty() {
            return Err(CooperError::EmptyKey);
        }

        let state = self.state.read();

        match state.str_index.get(key) {
            None => Err(CooperError::KeyNotFound),
            Some(IndexEntry::Value(value)) => Ok(value.clone()),
            Some(IndexEntry::Location(loc)) => {
                let record = state.data_file(loc.file_id)?.read(loc.offset)?;
                Ok(record.value)
            }
        }
    }

    /// Whether `key` currently has a value
    pub fn contains(&self, key: &[u8]) -> bool {
        self.state.read().str_index.contains(key)
    }

    /// Flush the active file to stable storage
    pub fn sync(&self) -> Result<()> {
        self.state.read().active.sync()
    }

    /// Close the engine gracefully
    ///
    /// Syncs the active file, records its position in the metadata file
    /// and releases every data file.
    pub fn close(self) -> Result<()> {
        let state = self.state.into_inner();

        state.active.sync()?;
        state.meta.store(&self.config.dir_path)?;

        for (_, file) in state.archived {
            file.close(false)?;
        }
        state.active.close(false)?;

        info!(
            active_file_id = state.meta.active_file_id,
            write_off = state.meta.active_write_off,
            "engine closed"
        );
        Ok(())
    }

    // =========================================================================
    // Accessors (for testing and debugging)
    // =========================================================================

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the data directory path
    pub fn dir_path(&self) -> &Path {
        &self.config.dir_path
    }

    /// Id of the current write target
    pub fn active_file_id(&self) -> u32 {
        self.state.read().active.id()
    }

    /// Active plus archived files
    pub fn file_count(&self) -> usize {
        self.state.read().archived.len() + 1
    }

    /// Number of live keys
    pub fn key_count(&self) -> usize {
        self.state.read().str_index.len()
    }

    /// Write offset of the active file as last recorded
    pub fn persisted_write_offset(&self) -> u64 {
        self.state.read().meta.active_write_off
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    fn check_key_value(&self, key: &[u8], value: &[u8]) -> Result<()> {
        if key.is_empty() {
            return Err(CooperError::EmptyKey);
        }
        if key.len() > self.config.max_key_size as usize {
            return Err(CooperError::KeyTooLarge {
                size: key.len(),
                max: self.config.max_key_size,
            });
        }
        if value.len() > self.config.max_value_size as usize {
            return Err(CooperError::ValueTooLarge {
                size: value.len(),
                max: self.config.max_value_size,
            });
        }
        Ok(())
    }

    /// One past the highest data file id in `dir`, 0 if there is none
    fn next_file_id(dir: &Path) -> Result<u32> {
        let mut max_id: Option<u32> = None;

        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            if let Some(id) = parse_file_id(&path) {
                max_id = Some(max_id.map_or(id, |m| m.max(id)));
            }
        }

        match max_id {
            None => Ok(0),
            Some(id) => id
                .checked_add(1)
                .ok_or_else(|| CooperError::Config("data file ids exhausted".to_string())),
        }
    }
}

impl EngineState {
    /// Append a record to the active file, rotating first if needed
    fn store(&mut self, record: &Record, config: &Config) -> Result<()> {
        if self.active.offset() + record.size() > config.block_size {
            self.rotate(config)?;
        }

        self.active.write(record)?;
        self.meta.active_write_off = self.active.offset();

        if config.sync_on_write {
            self.active.sync()?;
        }
        Ok(())
    }

    /// Archive the active file and start a new one with the next id
    fn rotate(&mut self, config: &Config) -> Result<()> {
        let old_id = self.active.id();
        let new_id = old_id
            .checked_add(1)
            .ok_or_else(|| CooperError::Config("data file ids exhausted".to_string()))?;

        // Both fallible steps run before the file set changes, so a failure
        // leaves the old file active and every index entry resolvable
        let next = DataFile::create(&config.dir_path, new_id, config.rw_method, config.block_size)?;
        self.active.archive()?;

        let old = std::mem::replace(&mut self.active, next);
        self.archived.insert(old_id, old);

        self.meta = Meta {
            active_file_id: new_id,
            active_write_off: 0,
        };

        debug!(archived_file_id = old_id, active_file_id = new_id, "rotated data file");
        Ok(())
    }

    /// Point the index at `record`
    fn build_index(&mut self, record: Record, entry: IndexEntry) -> Result<()> {
        match (record.data_type(), record.mark) {
            (DataType::String, Mark::StrSet) => {
                self.str_index.put(record.key, entry);
                Ok(())
            }
            (data_type, mark) => Err(CooperError::UnsupportedRecordType {
                data_type: data_type.code(),
                mark: mark.code(),
            }),
        }
    }

    /// Active or archived file with the given id
    fn data_file(&self, file_id: u32) -> Result<&DataFile> {
        if self.active.id() == file_id {
            return Ok(&self.active);
        }
        self.archived
            .get(&file_id)
            .ok_or(CooperError::MissingDataFile(file_id))
    }
}
