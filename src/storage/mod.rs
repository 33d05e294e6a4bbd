//! Storage Module
//!
//! Append-only data files holding encoded records.
//!
//! ## Responsibilities
//! - Positional append of encoded records at the file's write offset
//! - Positional reads with checksum verification
//! - Syscall or memory-mapped access, fixed per file
//! - Active → archived (read-only) transition on rotation
//!
//! ## Directory Layout
//! ```text
//! {dir_path}/
//!   ├── 000000000.data   (archived, read-only)
//!   ├── 000000001.data   (archived, read-only)
//!   └── 000000002.data   (active, append target)
//! ```

mod data_file;
mod fio;

pub use data_file::{data_file_path, parse_file_id, DataFile, DATA_FILE_SUFFIX};
