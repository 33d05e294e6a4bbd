//! Data File
//!
//! A single append-only file of encoded records, accessed either through
//! positional syscalls or a memory-mapped region.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use memmap2::{Mmap, MmapMut};
use tracing::{debug, warn};

use crate::config::FileRwMethod;
use crate::error::{CooperError, Result};
use crate::record::{Record, RecordHeader, HEADER_SIZE};

use super::fio;

/// Extension of every data file
pub const DATA_FILE_SUFFIX: &str = "data";

/// One append log on disk
///
/// ## Lifecycle
/// `create` → active (writable) → `archive` → archived (read-only) → `close`
///
/// `archive` is a no-op on an archived file; `close` consumes the file,
/// so it can be closed only once.
pub struct DataFile {
    /// File id, embedded in the file name
    id: u32,
    /// Full path of the backing file
    path: PathBuf,
    /// Next write position; also the logical length of the file
    offset: u64,
    /// Backing handle
    io: FileIo,
}

enum FileIo {
    /// Positional read/write syscalls. `writable` is false once archived.
    Syscall { file: File, writable: bool },
    /// Writable mapping of the whole block
    MapWrite(MmapMut),
    /// Read-only mapping of an archived file
    MapRead(Mmap),
}

impl DataFile {
    /// Open or create data file `id` under `dir`
    ///
    /// For `MMap`, the file is resized to `block_size` bytes and mapped in
    /// full. For `FileIo`, the file grows as writes go past its end.
    pub fn create(dir: &Path, id: u32, method: FileRwMethod, block_size: u64) -> Result<Self> {
        let path = data_file_path(dir, id);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .truncate(false)
            .open(&path)?;

        let io = match method {
            FileRwMethod::FileIo => FileIo::Syscall {
                file,
                writable: true,
            },
            FileRwMethod::MMap => {
                file.set_len(block_size)?;
                // SAFETY: the file is owned by this DataFile and only the
                // engine's single writer mutates the mapping.
                let map = unsafe { MmapMut::map_mut(&file)? };
                FileIo::MapWrite(map)
            }
        };

        debug!(file_id = id, path = %path.display(), ?method, "created data file");

        Ok(Self {
            id,
            path,
            offset: 0,
            io,
        })
    }

    /// Append a record at the current write offset
    ///
    /// Nothing is flushed here; see [`DataFile::sync`].
    pub fn write(&mut self, record: &Record) -> Result<()> {
        if record.key.is_empty() {
            return Err(CooperError::EmptyRecord);
        }

        let buf = record.encode()?;
        let offset = self.offset;

        match &mut self.io {
            FileIo::Syscall {
                file,
                writable: true,
            } => fio::write_all_at(file, &buf, offset)?,
            FileIo::MapWrite(map) => {
                let limit = map.len() as u64;
                let end = offset + buf.len() as u64;
                if end > limit {
                    return Err(CooperError::OutOfRange {
                        offset,
                        len: buf.len() as u64,
                        limit,
                    });
                }
                map[offset as usize..end as usize].copy_from_slice(&buf);
            }
            FileIo::Syscall { writable: false, .. } | FileIo::MapRead(_) => {
                return Err(CooperError::ReadOnlyFile(self.id));
            }
        }

        self.offset += buf.len() as u64;
        Ok(())
    }

    /// Read the record starting at `offset`
    ///
    /// Reads the header, then key, value and extra in order, and verifies
    /// the value against the stored checksum.
    pub fn read(&self, offset: u64) -> Result<Record> {
        let header_buf = self.read_buf(offset, HEADER_SIZE as u64)?;
        let header = RecordHeader::decode(&header_buf)?;

        let mut cursor = offset + HEADER_SIZE as u64;
        let key = self.read_buf(cursor, header.key_size as u64)?;
        cursor += header.key_size as u64;
        let value = self.read_buf(cursor, header.value_size as u64)?;
        cursor += header.value_size as u64;
        let extra = self.read_buf(cursor, header.extra_size as u64)?;

        Record::from_parts(&header, key, value, extra).map_err(|e| {
            warn!(file_id = self.id, offset, error = %e, "corrupt record");
            e
        })
    }

    /// Flush written data to stable storage
    pub fn sync(&self) -> Result<()> {
        match &self.io {
            FileIo::Syscall { file, .. } => file.sync_all()?,
            FileIo::MapWrite(map) => map.flush()?,
            FileIo::MapRead(_) => {}
        }
        Ok(())
    }

    /// Demote this file to read-only after flushing it
    ///
    /// The read-only handle is opened before the writable one is released,
    /// so on error the file is left exactly as it was.
    pub fn archive(&mut self) -> Result<()> {
        if self.is_archived() {
            return Ok(());
        }
        self.sync()?;

        let file = File::open(&self.path)?;
        let io = match self.io {
            FileIo::MapWrite(_) => {
                // SAFETY: the mapping is read-only and the file is no longer
                // written once archived.
                FileIo::MapRead(unsafe { Mmap::map(&file)? })
            }
            _ => FileIo::Syscall {
                file,
                writable: false,
            },
        };
        self.io = io;

        debug!(file_id = self.id, offset = self.offset, "archived data file");
        Ok(())
    }

    /// Release the file, flushing first if `sync` is set
    pub fn close(self, sync: bool) -> Result<()> {
        if sync {
            self.sync()?;
        }
        debug!(file_id = self.id, "closed data file");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn id(&self) -> u32 {
        self.id
    }

    /// Current write offset (bytes written so far)
    pub fn offset(&self) -> u64 {
        self.offset
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_archived(&self) -> bool {
        !matches!(
            self.io,
            FileIo::Syscall { writable: true, .. } | FileIo::MapWrite(_)
        )
    }

    // =========================================================================
    // Private Helpers
    // =========================================================================

    /// Read `len` bytes at `offset`, never past the written region
    fn read_buf(&self, offset: u64, len: u64) -> Result<Vec<u8>> {
        let end = offset.checked_add(len).filter(|&end| end <= self.offset);
        let end = match end {
            Some(end) => end,
            None => {
                return Err(CooperError::OutOfRange {
                    offset,
                    len,
                    limit: self.offset,
                })
            }
        };

        if len == 0 {
            return Ok(Vec::new());
        }

        match &self.io {
            FileIo::Syscall { file, .. } => {
                let mut buf = vec![0u8; len as usize];
                fio::read_exact_at(file, &mut buf, offset)?;
                Ok(buf)
            }
            FileIo::MapWrite(map) => Ok(map[offset as usize..end as usize].to_vec()),
            FileIo::MapRead(map) => Ok(map[offset as usize..end as usize].to_vec()),
        }
    }
}

/// Path of data file `id` under `dir`
/// 7 → "{dir}/000000007.data"
pub fn data_file_path(dir: &Path, id: u32) -> PathBuf {
    dir.join(format!("{:09}.{}", id, DATA_FILE_SUFFIX))
}

/// Parse the file id from a data file name
/// "000000042.data" → Some(42)
pub fn parse_file_id(path: &Path) -> Option<u32> {
    if path.extension()?.to_str()? != DATA_FILE_SUFFIX {
        return None;
    }
    let stem = path.file_stem()?.to_str()?;
    if stem.len() != 9 || !stem.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    stem.parse().ok()
}
