//! Record Module
//!
//! Byte layout of one log record and conversion to and from it.
//!
//! ## Responsibilities
//! - Serialize a record as header + key + value + extra
//! - Parse the fixed-size header back into sizes, tags and checksum
//! - CRC32 (IEEE) over the value for corruption detection
//!
//! ## Record Format
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │ Header (20 bytes, big-endian)                                        │
//! │ ┌─────────┬───────────┬───────────┬──────────┬────────┬───────────┐  │
//! │ │KeySz (4)│ValueSz (4)│ExtraSz (4)│ Type (2) │Mark (2)│ CRC32 (4) │  │
//! │ └─────────┴───────────┴───────────┴──────────┴────────┴───────────┘  │
//! ├──────────────────────────────────────────────────────────────────────┤
//! │ Body                                                                 │
//! │ ┌──────────────┬──────────────────┬──────────────────┐               │
//! │ │ Key (KeySz)  │ Value (ValueSz)  │ Extra (ExtraSz)  │               │
//! │ └──────────────┴──────────────────┴──────────────────┘               │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The checksum covers the value bytes only. Changing that would break
//! compatibility with existing data files.

mod codec;
mod types;

pub use codec::{Record, RecordHeader};
pub use types::{DataType, Mark};

/// Header size: KeySz (4) + ValueSz (4) + ExtraSz (4) + Type (2) + Mark (2) + CRC (4)
pub const HEADER_SIZE: usize = 20;

/// Byte reserved as a separator inside extra payloads
pub const EXTRA_SEPARATOR: u8 = 0x00;
