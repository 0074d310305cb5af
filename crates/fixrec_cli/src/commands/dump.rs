//! Dump command implementation.

use fixrec_codec::RawCodec;
use fixrec_core::{HeaderSchema, RecordStore, RingRecordStore, StoreConfig};
use fixrec_storage::{FileBackend, StorageBackend};
use std::path::Path;
use tracing::{debug, info};

/// One dumped record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry {
    /// Position in dump order.
    pub position: u32,
    /// Physical slot the record lives in.
    pub slot: u32,
    /// Raw slot bytes.
    pub bytes: Vec<u8>,
}

/// Options for the dump command.
#[derive(Debug, Clone, Copy, Default)]
pub struct DumpOptions {
    /// Walk the file as a ring, oldest record first.
    pub ring: bool,
    /// Ring capacity; defaults to the stored record count.
    pub capacity: Option<u32>,
    /// Stop after this many records.
    pub limit: Option<usize>,
}

/// Runs the dump command.
pub fn run(path: &Path, options: DumpOptions) -> Result<(), Box<dyn std::error::Error>> {
    info!("Dumping {:?}", path);
    let entries = dump(path, options)?;

    for entry in &entries {
        println!(
            "#{:<6} slot {:<6} {}",
            entry.position,
            entry.slot,
            hex(&entry.bytes)
        );
    }
    println!();
    println!("{} record(s)", entries.len());

    Ok(())
}

/// Reads the records of the store at `path` as raw bytes.
pub fn dump(path: &Path, options: DumpOptions) -> Result<Vec<DumpEntry>, Box<dyn std::error::Error>> {
    let header = peek_header(path)?;
    let codec = RawCodec::new(usize::from(header.record_size));
    let config = StoreConfig::new().create_if_missing(false);
    let limit = options.limit.unwrap_or(usize::MAX);

    if options.ring {
        let capacity = options.capacity.unwrap_or(header.record_count.max(1));
        debug!(capacity, "Opening as ring");

        let mut ring = RingRecordStore::with_config(codec, capacity, config)?;
        ring.open(path)?;

        let mut entries = Vec::new();
        let mut current = ring.first()?;
        while let Some(bytes) = current {
            if entries.len() >= limit {
                break;
            }
            let slot = ring.current_index().unwrap_or_default();
            entries.push(DumpEntry {
                position: u32::try_from(entries.len())?,
                slot,
                bytes,
            });
            current = ring.next()?;
        }
        ring.close()?;
        Ok(entries)
    } else {
        let mut store = RecordStore::with_config(codec, config)?;
        store.open(path)?;

        let entries = store
            .iter()?
            .take(limit)
            .zip(0u32..)
            .map(|(bytes, slot)| -> fixrec_core::CoreResult<DumpEntry> {
                Ok(DumpEntry {
                    position: slot,
                    slot,
                    bytes: bytes?,
                })
            })
            .collect::<fixrec_core::CoreResult<Vec<_>>>()?;
        store.close()?;
        Ok(entries)
    }
}

/// Reads the base header fields shared by every store layout.
fn peek_header(path: &Path) -> Result<fixrec_core::Header, Box<dyn std::error::Error>> {
    if !path.exists() {
        return Err(format!("No store found at {:?}", path).into());
    }
    let schema = HeaderSchema::base();
    let backend = FileBackend::open_read_only(path)?;
    let header = schema.decode(&backend.read_at(0, schema.byte_size())?)?;
    if header.record_size == 0 {
        return Err(format!("Store at {:?} has no record size set", path).into());
    }
    Ok(header)
}

fn hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}
