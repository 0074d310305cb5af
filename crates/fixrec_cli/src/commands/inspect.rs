//! Inspect command implementation.

use fixrec_core::{ring_schema, HeaderSchema};
use fixrec_storage::{FileBackend, StorageBackend};
use serde::Serialize;
use std::cmp::Ordering;
use std::path::Path;
use tracing::info;

/// How the file length compares with what the header accounts for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SizeStatus {
    /// File length matches header plus slots exactly.
    Consistent,
    /// Bytes past the last counted slot, e.g. an append interrupted
    /// before its header commit.
    Trailing,
    /// Counted slots extend past the end of the file.
    Truncated,
}

/// Header inspection result.
#[derive(Debug, Serialize)]
pub struct InspectResult {
    /// File path.
    pub path: String,
    /// Header layout the file was read with.
    pub layout: &'static str,
    /// Header size in bytes.
    pub header_size: usize,
    /// Record slot size in bytes.
    pub record_size: u16,
    /// Number of counted slots.
    pub record_count: u32,
    /// Slot of the oldest ring record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_index: Option<u64>,
    /// Slot of the newest ring record.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_index: Option<u64>,
    /// Length implied by the header.
    pub expected_size: u64,
    /// Actual file length.
    pub file_size: u64,
    /// Comparison of the two lengths.
    pub status: SizeStatus,
}

/// Runs the inspect command.
pub fn run(path: &Path, ring: bool, format: &str) -> Result<(), Box<dyn std::error::Error>> {
    info!("Inspecting {:?}", path);
    let result = inspect(path, ring)?;

    match format {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        _ => {
            print_text_output(&result);
        }
    }

    Ok(())
}

/// Reads the header of the store at `path` without needing its codec.
pub fn inspect(path: &Path, ring: bool) -> Result<InspectResult, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No store found at {:?}", path).into());
    }

    let schema = if ring { ring_schema() } else { HeaderSchema::base() };
    let backend = FileBackend::open_read_only(path)?;
    let file_size = backend.size()?;
    let header = schema.decode(&backend.read_at(0, schema.byte_size())?)?;

    let expected_size = schema.byte_size() as u64
        + u64::from(header.record_count) * u64::from(header.record_size);
    let status = match file_size.cmp(&expected_size) {
        Ordering::Equal => SizeStatus::Consistent,
        Ordering::Greater => SizeStatus::Trailing,
        Ordering::Less => SizeStatus::Truncated,
    };

    Ok(InspectResult {
        path: path.display().to_string(),
        layout: if ring { "ring" } else { "plain" },
        header_size: schema.byte_size(),
        record_size: header.record_size,
        record_count: header.record_count,
        first_index: ring.then(|| header.extension(0)),
        last_index: ring.then(|| header.extension(1)),
        expected_size,
        file_size,
        status,
    })
}

fn print_text_output(result: &InspectResult) {
    println!("fixrec Store Inspection");
    println!("=======================");
    println!();
    println!("Path:   {}", result.path);
    println!("Layout: {}", result.layout);
    println!();
    println!("Header:");
    println!("  Header size:  {} bytes", result.header_size);
    println!("  Record size:  {} bytes", result.record_size);
    println!("  Record count: {}", result.record_count);
    if let (Some(first), Some(last)) = (result.first_index, result.last_index) {
        println!("  First index:  {}", first);
        println!("  Last index:   {}", last);
    }
    println!();
    println!("File:");
    println!("  Expected size: {} bytes", result.expected_size);
    println!("  Actual size:   {} bytes", result.file_size);
    println!("  Status:        {:?}", result.status);
}

#[cfg(test)]
mod tests {
    use super::*;
    use fixrec_codec::RawCodec;
    use fixrec_core::{RecordStore, RingRecordStore};
    use tempfile::tempdir;

    #[test]
    fn inspect_plain_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("plain.dat");

        let mut store = RecordStore::new(RawCodec::new(3)).unwrap();
        store.open(&path).unwrap();
        store.append_record(&vec![1, 2, 3]).unwrap();
        store.append_record(&vec![4, 5, 6]).unwrap();
        store.close().unwrap();

        let result = inspect(&path, false).unwrap();
        assert_eq!(result.header_size, 6);
        assert_eq!(result.record_size, 3);
        assert_eq!(result.record_count, 2);
        assert_eq!(result.first_index, None);
        assert_eq!(result.expected_size, 12);
        assert_eq!(result.status, SizeStatus::Consistent);
    }

    #[test]
    fn inspect_ring_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ring.dat");

        let mut ring = RingRecordStore::new(RawCodec::new(1), 2).unwrap();
        ring.open(&path).unwrap();
        for b in 0..3u8 {
            ring.append_overwriting(&vec![b]).unwrap();
        }
        ring.close().unwrap();

        let result = inspect(&path, true).unwrap();
        assert_eq!(result.header_size, 14);
        assert_eq!(result.record_count, 2);
        assert_eq!(result.first_index, Some(1));
        assert_eq!(result.last_index, Some(0));
        assert_eq!(result.status, SizeStatus::Consistent);

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["status"], "consistent");
        assert_eq!(json["first_index"], 1);
    }

    #[test]
    fn trailing_and_truncated_are_reported() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("odd.dat");

        std::fs::write(&path, [0, 2, 0, 0, 0, 1, 9, 9, 7]).unwrap();
        assert_eq!(inspect(&path, false).unwrap().status, SizeStatus::Trailing);

        std::fs::write(&path, [0, 2, 0, 0, 0, 3, 9, 9]).unwrap();
        assert_eq!(inspect(&path, false).unwrap().status, SizeStatus::Truncated);
    }

    #[test]
    fn inspect_read_only_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sealed.dat");
        std::fs::write(&path, [0, 2, 0, 0, 0, 1, 7, 7]).unwrap();

        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_readonly(true);
        std::fs::set_permissions(&path, perms).unwrap();

        let result = inspect(&path, false).unwrap();
        assert_eq!(result.record_count, 1);
        assert_eq!(result.status, SizeStatus::Consistent);
        assert_eq!(std::fs::read(&path).unwrap(), [0, 2, 0, 0, 0, 1, 7, 7]);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempdir().unwrap();
        assert!(inspect(&dir.path().join("nope.dat"), false).is_err());
    }
}
