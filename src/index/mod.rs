//! Index Module
//!
//! In-memory mapping from key to where its latest value lives.
//!
//! ## Responsibilities
//! - One entry per live key; a new write replaces the old entry
//! - O(1) amortized put/get, no key ordering
//! - Entry shape chosen by the configured retention mode
//!
//! ## Data Structure Choice
//! Using an unordered HashMap: point lookups only, no range scans.
//! Other data types would get their own `Index` instance with their own
//! entry type.

mod table;

pub use table::Index;

/// On-disk location of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Location {
    /// Data file holding the record
    pub file_id: u32,
    /// Byte offset of the record's header within that file
    pub offset: u64,
    /// Full encoded length of the record
    pub size: u64,
}

/// Index entry for a string key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexEntry {
    /// Value resident in memory (`IndexMode::KeyValueMemory`)
    Value(Vec<u8>),

    /// Only the record location is resident (`IndexMode::KeyOnlyMemory`)
    Location(Location),
}

/// Index over string records
pub type StrIndex = Index<IndexEntry>;
