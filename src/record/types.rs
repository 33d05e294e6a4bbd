//! Record type tags
//!
//! Every record carries the data type it belongs to and the operation
//! (mark) that produced it. Only string sets are processed today; the
//! remaining data types are reserved codes.

use crate::error::{CooperError, Result};

/// Data type a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum DataType {
    String = 0,
    List = 1,
    Hash = 2,
    Set = 3,
    ZSet = 4,
}

impl DataType {
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl TryFrom<u16> for DataType {
    type Error = CooperError;

    fn try_from(code: u16) -> Result<Self> {
        match code {
            0 => Ok(DataType::String),
            1 => Ok(DataType::List),
            2 => Ok(DataType::Hash),
            3 => Ok(DataType::Set),
            4 => Ok(DataType::ZSet),
            _ => Err(CooperError::UnsupportedRecordType {
                data_type: code,
                mark: 0,
            }),
        }
    }
}

/// Operation that produced a record
///
/// Mark codes are scoped by data type: the same code means different
/// things for different types. New operations get new variants here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mark {
    /// String SET
    StrSet,
}

impl Mark {
    /// Data type this mark belongs to
    pub fn data_type(self) -> DataType {
        match self {
            Mark::StrSet => DataType::String,
        }
    }

    /// On-disk code, unique within `data_type()`
    pub fn code(self) -> u16 {
        match self {
            Mark::StrSet => 0,
        }
    }

    /// Resolve a raw (type, mark) pair read from disk
    pub fn from_codes(data_type: u16, mark: u16) -> Result<Self> {
        let ty = DataType::try_from(data_type)
            .map_err(|_| CooperError::UnsupportedRecordType { data_type, mark })?;
        match (ty, mark) {
            (DataType::String, 0) => Ok(Mark::StrSet),
            _ => Err(CooperError::UnsupportedRecordType { data_type, mark }),
        }
    }
}
