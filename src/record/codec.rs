//! Record encoding and decoding

use bytes::{Buf, BufMut, BytesMut};

use crate::error::{CooperError, Result};

use super::{DataType, Mark, EXTRA_SEPARATOR, HEADER_SIZE};

/// One logical write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
    /// Auxiliary payload for non-string types, never contains `0x00`
    pub extra: Vec<u8>,
    pub mark: Mark,
}

/// Decoded fixed-size header of a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordHeader {
    pub key_size: u32,
    pub value_size: u32,
    pub extra_size: u32,
    pub mark: Mark,
    pub crc: u32,
}

impl Record {
    /// Create a record with no extra payload
    pub fn new(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>, mark: Mark) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
            extra: Vec::new(),
            mark,
        }
    }

    /// Create a record carrying an extra payload
    ///
    /// Fails with `ExtraContainsSeparator` if `extra` holds the reserved
    /// separator byte.
    pub fn with_extra(
        key: impl Into<Vec<u8>>,
        value: impl Into<Vec<u8>>,
        extra: impl Into<Vec<u8>>,
        mark: Mark,
    ) -> Result<Self> {
        let extra = extra.into();
        if extra.contains(&EXTRA_SEPARATOR) {
            return Err(CooperError::ExtraContainsSeparator);
        }
        Ok(Self {
            key: key.into(),
            value: value.into(),
            extra,
            mark,
        })
    }

    pub fn data_type(&self) -> DataType {
        self.mark.data_type()
    }

    /// Encoded length: header + key + value + extra
    pub fn size(&self) -> u64 {
        (HEADER_SIZE + self.key.len() + self.value.len() + self.extra.len()) as u64
    }

    /// CRC32 (IEEE) of the value
    pub fn checksum(&self) -> u32 {
        crc32fast::hash(&self.value)
    }

    /// Serialize to the on-disk layout
    ///
    /// Size limits are the caller's concern; only lengths that cannot be
    /// represented in the header are rejected.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let key_size = field_len(&self.key, "key")?;
        let value_size = field_len(&self.value, "value")?;
        let extra_size = field_len(&self.extra, "extra")?;

        let mut buf = BytesMut::with_capacity(self.size() as usize);
        buf.put_u32(key_size);
        buf.put_u32(value_size);
        buf.put_u32(extra_size);
        buf.put_u16(self.data_type().code());
        buf.put_u16(self.mark.code());
        buf.put_u32(self.checksum());
        buf.put_slice(&self.key);
        buf.put_slice(&self.value);
        buf.put_slice(&self.extra);

        Ok(buf.to_vec())
    }

    /// Assemble a record from a decoded header and its body fields,
    /// verifying the value against the stored checksum.
    pub fn from_parts(
        header: &RecordHeader,
        key: Vec<u8>,
        value: Vec<u8>,
        extra: Vec<u8>,
    ) -> Result<Self> {
        let record = Self {
            key,
            value,
            extra,
            mark: header.mark,
        };
        record.verify(header)?;
        Ok(record)
    }

    /// Compare the value's checksum against the one stored in `header`
    pub fn verify(&self, header: &RecordHeader) -> Result<()> {
        let actual = self.checksum();
        if actual != header.crc {
            return Err(CooperError::InvalidChecksum {
                expected: header.crc,
                actual,
            });
        }
        Ok(())
    }
}

impl RecordHeader {
    /// Parse the fixed-size header. The body is not read here.
    pub fn decode(mut buf: &[u8]) -> Result<Self> {
        if buf.len() < HEADER_SIZE {
            return Err(CooperError::OutOfRange {
                offset: 0,
                len: HEADER_SIZE as u64,
                limit: buf.len() as u64,
            });
        }

        let key_size = buf.get_u32();
        let value_size = buf.get_u32();
        let extra_size = buf.get_u32();
        let data_type = buf.get_u16();
        let mark = buf.get_u16();
        let crc = buf.get_u32();

        Ok(Self {
            key_size,
            value_size,
            extra_size,
            mark: Mark::from_codes(data_type, mark)?,
            crc,
        })
    }

    pub fn data_type(&self) -> DataType {
        self.mark.data_type()
    }

    /// Length of the body following the header
    pub fn body_size(&self) -> u64 {
        self.key_size as u64 + self.value_size as u64 + self.extra_size as u64
    }

    /// Full encoded length of the record this header describes
    pub fn record_size(&self) -> u64 {
        HEADER_SIZE as u64 + self.body_size()
    }
}

fn field_len(field: &[u8], name: &str) -> Result<u32> {
    u32::try_from(field.len()).map_err(|_| {
        CooperError::Serialization(format!("{} length {} does not fit in u32", name, field.len()))
    })
}
