//! Error types for CooperKV
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using CooperError
pub type Result<T> = std::result::Result<T, CooperError>;

/// Unified error type for CooperKV operations
#[derive(Debug, Error)]
pub enum CooperError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Key / Value Validation Errors
    // -------------------------------------------------------------------------
    #[error("the key is empty")]
    EmptyKey,

    #[error("key not found")]
    KeyNotFound,

    #[error("key exceeded the max length ({size} > {max})")]
    KeyTooLarge { size: usize, max: u32 },

    #[error("value exceeded the max length ({size} > {max})")]
    ValueTooLarge { size: usize, max: u32 },

    #[error("extra contains separator \\0")]
    ExtraContainsSeparator,

    // -------------------------------------------------------------------------
    // Data File Errors
    // -------------------------------------------------------------------------
    #[error("record or the key of record is empty")]
    EmptyRecord,

    #[error("invalid checksum: expected {expected:#010x}, got {actual:#010x}")]
    InvalidChecksum { expected: u32, actual: u32 },

    #[error("read of {len} bytes at offset {offset} is out of range (limit {limit})")]
    OutOfRange { offset: u64, len: u64, limit: u64 },

    #[error("unsupported record type: data type {data_type}, mark {mark}")]
    UnsupportedRecordType { data_type: u16, mark: u16 },

    #[error("data file {0} is archived and read-only")]
    ReadOnlyFile(u32),

    #[error("data file {0} is neither active nor archived")]
    MissingDataFile(u32),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Command Errors
    // -------------------------------------------------------------------------
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("the config file does not exist")]
    ConfigMissing,

    // -------------------------------------------------------------------------
    // Expiry Errors (no expiry is enforced yet)
    // -------------------------------------------------------------------------
    #[error("invalid ttl")]
    InvalidTtl,

    #[error("key is expired")]
    KeyExpired,
}

impl From<bincode::Error> for CooperError {
    fn from(err: bincode::Error) -> Self {
        CooperError::Serialization(err.to_string())
    }
}
