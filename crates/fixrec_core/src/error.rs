//! Error types for fixrec core.

use fixrec_storage::StorageError;
use thiserror::Error;

/// Result type for core operations.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in record store operations.
///
/// Every kind is surfaced to the caller as-is. The store never retries
/// and never repairs what it finds on disk.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Storage backend error other than a short transfer.
    #[error("storage error: {0}")]
    Storage(StorageError),

    /// Record codec error.
    #[error("codec error: {0}")]
    Codec(#[from] fixrec_codec::CodecError),

    /// The record size stored in the file differs from the codec's size.
    #[error("schema mismatch: file records are {stored} bytes, codec declares {expected}")]
    SchemaMismatch {
        /// Record size found in the file header.
        stored: u16,
        /// Record size declared by the codec.
        expected: u16,
    },

    /// Fewer bytes were available than a header or record read needs.
    #[error("short read at offset {offset}: wanted {wanted} bytes, {available} available")]
    ShortRead {
        /// Byte offset of the read.
        offset: u64,
        /// Bytes requested.
        wanted: usize,
        /// Bytes present from `offset` to the end of storage.
        available: u64,
    },

    /// The medium stored fewer bytes than a header or record write needs.
    #[error("short write at offset {offset}: tried {wanted} bytes, wrote {written}")]
    ShortWrite {
        /// Byte offset of the write.
        offset: u64,
        /// Bytes handed to the write.
        wanted: usize,
        /// Bytes actually stored.
        written: usize,
    },

    /// The store has not been opened, or has been closed.
    #[error("store is not open")]
    NotOpen,

    /// The store is already open.
    #[error("store is already open")]
    AlreadyOpen,

    /// The storage target does not exist and creation was disabled.
    #[error("store not found: {target}")]
    NotFound {
        /// Description of the missing target.
        target: String,
    },

    /// A slot number outside the currently valid slot set.
    #[error("record index {index} out of range (record count {count})")]
    IndexOutOfRange {
        /// The requested slot.
        index: u32,
        /// The number of valid slots.
        count: u32,
    },

    /// `next()` was called before `first()` established a cursor.
    #[error("cursor unset: call first() before next()")]
    CursorUnset,

    /// The codec's declared size cannot be stored in the header.
    #[error("invalid record size {size}: must be between 1 and 65535 bytes")]
    InvalidRecordSize {
        /// The declared size.
        size: usize,
    },

    /// A ring store was constructed with zero capacity.
    #[error("ring capacity must be at least 1")]
    InvalidCapacity,

    /// A ring file does not fit the capacity it was reopened with.
    #[error(
        "capacity mismatch: ring opened with capacity {capacity}, file holds {record_count} records (first {first_index}, last {last_index})"
    )]
    CapacityMismatch {
        /// Capacity supplied on open.
        capacity: u32,
        /// Record count stored in the header.
        record_count: u32,
        /// First index stored in the header.
        first_index: u32,
        /// Last index stored in the header.
        last_index: u32,
    },
}

impl From<StorageError> for CoreError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::ReadPastEnd { offset, len, size } => Self::ShortRead {
                offset,
                wanted: len,
                available: size.saturating_sub(offset),
            },
            StorageError::ShortWrite {
                offset,
                len,
                written,
            } => Self::ShortWrite {
                offset,
                wanted: len,
                written,
            },
            other => Self::Storage(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_past_end_becomes_short_read() {
        let err = CoreError::from(StorageError::ReadPastEnd {
            offset: 10,
            len: 8,
            size: 14,
        });
        assert!(matches!(
            err,
            CoreError::ShortRead {
                offset: 10,
                wanted: 8,
                available: 4
            }
        ));
    }

    #[test]
    fn short_write_is_preserved() {
        let err = CoreError::from(StorageError::ShortWrite {
            offset: 6,
            len: 4,
            written: 1,
        });
        assert!(matches!(
            err,
            CoreError::ShortWrite {
                offset: 6,
                wanted: 4,
                written: 1
            }
        ));
    }

    #[test]
    fn io_errors_stay_storage_errors() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = CoreError::from(StorageError::Io(io));
        assert!(matches!(err, CoreError::Storage(StorageError::Io(_))));
    }

    #[test]
    fn messages_name_the_sizes() {
        let err = CoreError::SchemaMismatch {
            stored: 40,
            expected: 48,
        };
        assert_eq!(
            err.to_string(),
            "schema mismatch: file records are 40 bytes, codec declares 48"
        );
    }
}
