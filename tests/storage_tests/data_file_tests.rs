//! Tests for DataFile
//!
//! These tests verify:
//! - Create, write, read on both access methods
//! - Offset bookkeeping across appends
//! - Out-of-range reads fail instead of returning zeros
//! - Archive (read-only) and close transitions
//! - File naming helpers

use std::fs::{self, OpenOptions};
use std::io::{Seek, SeekFrom, Write};
use std::path::Path;

use cooperkv::config::FileRwMethod;
use cooperkv::record::{Mark, Record, HEADER_SIZE};
use cooperkv::storage::{data_file_path, parse_file_id, DataFile};
use cooperkv::CooperError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

const BLOCK_SIZE: u64 = 4096;

const METHODS: [FileRwMethod; 2] = [FileRwMethod::FileIo, FileRwMethod::MMap];

fn record(key: &str, value: &str) -> Record {
    Record::new(key.as_bytes().to_vec(), value.as_bytes().to_vec(), Mark::StrSet)
}

fn create(dir: &Path, id: u32, method: FileRwMethod) -> DataFile {
    DataFile::create(dir, id, method, BLOCK_SIZE).unwrap()
}

/// XOR one byte of the file in place, without truncating it
fn flip_byte(path: &Path, pos: u64, mask: u8) {
    let byte = fs::read(path).unwrap()[pos as usize];
    let mut file = OpenOptions::new().write(true).open(path).unwrap();
    file.seek(SeekFrom::Start(pos)).unwrap();
    file.write_all(&[byte ^ mask]).unwrap();
    file.sync_all().unwrap();
}

// =============================================================================
// Create Tests
// =============================================================================

#[test]
fn test_create_uses_padded_file_name() {
    let temp = TempDir::new().unwrap();
    let file = create(temp.path(), 7, FileRwMethod::FileIo);

    assert_eq!(file.id(), 7);
    assert_eq!(file.offset(), 0);
    assert_eq!(file.path(), temp.path().join("000000007.data"));
    assert!(file.path().exists());
    assert!(!file.is_archived());
}

#[test]
fn test_create_fileio_does_not_presize() {
    let temp = TempDir::new().unwrap();
    let file = create(temp.path(), 0, FileRwMethod::FileIo);

    assert_eq!(fs::metadata(file.path()).unwrap().len(), 0);
}

#[test]
fn test_create_mmap_presizes_to_block() {
    let temp = TempDir::new().unwrap();
    let file = create(temp.path(), 0, FileRwMethod::MMap);

    assert_eq!(fs::metadata(file.path()).unwrap().len(), BLOCK_SIZE);
}

#[test]
fn test_create_in_missing_directory_fails() {
    let temp = TempDir::new().unwrap();
    let missing = temp.path().join("does/not/exist");

    let result = DataFile::create(&missing, 0, FileRwMethod::FileIo, BLOCK_SIZE);
    assert!(matches!(result, Err(CooperError::Io(_))));
}

// =============================================================================
// Write / Read Tests
// =============================================================================

#[test]
fn test_write_then_read_both_methods() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 0, method);

        let r = record("hello", "world");
        file.write(&r).unwrap();

        assert_eq!(file.offset(), r.size());
        assert_eq!(file.read(0).unwrap(), r, "method {:?}", method);
    }
}

#[test]
fn test_offsets_advance_by_encoded_size() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 0, method);

        let records = [record("a", "1"), record("bb", "22"), record("ccc", "")];
        let mut starts = Vec::new();
        for r in &records {
            file.write(r).unwrap();
            starts.push(file.offset() - r.size());
        }

        assert_eq!(starts[0], 0);
        assert_eq!(starts[1], records[0].size());
        assert_eq!(starts[2], records[0].size() + records[1].size());

        for (r, start) in records.iter().zip(starts) {
            assert_eq!(&file.read(start).unwrap(), r);
        }
    }
}

#[test]
fn test_write_with_extra_reads_back_extra() {
    let temp = TempDir::new().unwrap();
    let mut file = create(temp.path(), 0, FileRwMethod::FileIo);

    let r = Record::with_extra(b"k".to_vec(), b"v".to_vec(), b"extra".to_vec(), Mark::StrSet)
        .unwrap();
    file.write(&r).unwrap();

    assert_eq!(file.read(0).unwrap().extra, b"extra".to_vec());
}

#[test]
fn test_write_empty_key_rejected() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 0, method);

        let result = file.write(&record("", "value"));
        assert!(matches!(result, Err(CooperError::EmptyRecord)));
        assert_eq!(file.offset(), 0);
    }
}

#[test]
fn test_fileio_bytes_land_on_disk() {
    let temp = TempDir::new().unwrap();
    let mut file = create(temp.path(), 0, FileRwMethod::FileIo);

    let r = record("key", "value");
    file.write(&r).unwrap();
    file.sync().unwrap();

    let on_disk = fs::read(file.path()).unwrap();
    assert_eq!(on_disk, r.encode().unwrap());
}

#[test]
fn test_mmap_write_past_region_fails() {
    let temp = TempDir::new().unwrap();
    let mut file = DataFile::create(temp.path(), 0, FileRwMethod::MMap, 64).unwrap();

    let big = "x".repeat(64);
    let result = file.write(&record("k", &big));

    assert!(matches!(result, Err(CooperError::OutOfRange { limit: 64, .. })));
    assert_eq!(file.offset(), 0);
}

// =============================================================================
// Out-of-Range Read Tests
// =============================================================================

#[test]
fn test_read_past_written_region_fails() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 0, method);
        file.write(&record("k", "v")).unwrap();

        let result = file.read(file.offset());
        assert!(
            matches!(result, Err(CooperError::OutOfRange { .. })),
            "method {:?}",
            method
        );
    }
}

#[test]
fn test_read_far_beyond_mapped_region_fails() {
    let temp = TempDir::new().unwrap();
    let file = create(temp.path(), 0, FileRwMethod::MMap);

    let result = file.read(BLOCK_SIZE * 10);
    assert!(matches!(result, Err(CooperError::OutOfRange { .. })));
}

#[test]
fn test_read_of_empty_file_fails() {
    let temp = TempDir::new().unwrap();
    let file = create(temp.path(), 0, FileRwMethod::FileIo);

    let result = file.read(0);
    assert!(matches!(
        result,
        Err(CooperError::OutOfRange { offset: 0, limit: 0, .. })
    ));
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_read_detects_corrupted_value_on_disk() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 0, method);
        file.write(&record("key", "precious")).unwrap();
        file.sync().unwrap();

        flip_byte(file.path(), (HEADER_SIZE + 3) as u64, 0x01);

        let result = file.read(0);
        assert!(
            matches!(result, Err(CooperError::InvalidChecksum { .. })),
            "{:?}",
            method
        );
    }
}

#[test]
fn test_archived_file_detects_corrupted_value() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 0, method);
        file.write(&record("key", "precious")).unwrap();
        file.archive().unwrap();

        flip_byte(file.path(), (HEADER_SIZE + 3) as u64, 0x80);

        let result = file.read(0);
        assert!(
            matches!(result, Err(CooperError::InvalidChecksum { .. })),
            "{:?}",
            method
        );
    }
}

// =============================================================================
// Lifecycle Tests
// =============================================================================

#[test]
fn test_archive_keeps_records_readable() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 3, method);
        let r = record("archived", "still here");
        file.write(&r).unwrap();

        file.archive().unwrap();

        assert!(file.is_archived());
        assert_eq!(file.id(), 3);
        assert_eq!(file.offset(), r.size());
        assert_eq!(file.read(0).unwrap(), r);
    }
}

#[test]
fn test_archived_file_rejects_writes() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 1, method);
        file.write(&record("a", "b")).unwrap();

        file.archive().unwrap();
        let result = file.write(&record("c", "d"));

        assert!(matches!(result, Err(CooperError::ReadOnlyFile(1))));
        assert_eq!(file.offset(), record("a", "b").size());
    }
}

#[test]
fn test_archive_twice_is_noop() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 2, method);
        let r = record("once", "twice");
        file.write(&r).unwrap();

        file.archive().unwrap();
        file.archive().unwrap();

        assert!(file.is_archived());
        assert_eq!(file.read(0).unwrap(), r);
    }
}

#[cfg(unix)]
#[test]
fn test_failed_archive_leaves_file_writable() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 0, method);
        let r = record("before", "archive");
        file.write(&r).unwrap();

        // Reopening read-only fails once the name is gone
        fs::remove_file(file.path()).unwrap();
        let result = file.archive();

        assert!(matches!(result, Err(CooperError::Io(_))), "{:?}", method);
        assert!(!file.is_archived());
        assert_eq!(file.read(0).unwrap(), r);
        file.write(&record("after", "failure")).unwrap();
        assert_eq!(file.offset(), r.size() + record("after", "failure").size());
    }
}

#[test]
fn test_close_with_sync() {
    for method in METHODS {
        let temp = TempDir::new().unwrap();
        let mut file = create(temp.path(), 0, method);
        let r = record("durable", "bytes");
        file.write(&r).unwrap();
        let path = file.path().to_path_buf();

        file.close(true).unwrap();

        let on_disk = fs::read(path).unwrap();
        assert_eq!(&on_disk[..r.size() as usize], r.encode().unwrap().as_slice());
    }
}

// =============================================================================
// Naming Helper Tests
// =============================================================================

#[test]
fn test_data_file_path_format() {
    let dir = Path::new("/data");
    assert_eq!(data_file_path(dir, 0), Path::new("/data/000000000.data"));
    assert_eq!(data_file_path(dir, 123456789), Path::new("/data/123456789.data"));
}

#[test]
fn test_parse_file_id() {
    assert_eq!(parse_file_id(Path::new("/d/000000042.data")), Some(42));
    assert_eq!(parse_file_id(Path::new("000000000.data")), Some(0));
    assert_eq!(parse_file_id(Path::new("/d/000000042.meta")), None);
    assert_eq!(parse_file_id(Path::new("/d/42.data")), None);
    assert_eq!(parse_file_id(Path::new("/d/00000abcd.data")), None);
    assert_eq!(parse_file_id(Path::new("/d/cooperkv.meta")), None);
}
