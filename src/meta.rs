//! Engine metadata
//!
//! Small bincode file recording where the active file's durable data ends.
//! Written on close; a startup replay would use it to know how far the
//! last active file is valid.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Persisted engine metadata
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    /// Id of the file that was active when the metadata was written
    pub active_file_id: u32,
    /// Write offset of that file
    pub active_write_off: u64,
}

impl Meta {
    pub const FILENAME: &'static str = "cooperkv.meta";

    /// Load metadata from `dir`, `None` if none was ever written
    pub fn load(dir: &Path) -> Result<Option<Self>> {
        let path = Self::path(dir);
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        Ok(Some(bincode::deserialize(&bytes)?))
    }

    /// Write metadata to `dir`, replacing any previous copy atomically
    pub fn store(&self, dir: &Path) -> Result<()> {
        let path = Self::path(dir);
        let tmp = path.with_extension("meta.tmp");
        fs::write(&tmp, bincode::serialize(self)?)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }

    fn path(dir: &Path) -> PathBuf {
        dir.join(Self::FILENAME)
    }
}
