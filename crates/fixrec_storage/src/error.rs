//! Error types for storage operations.

use std::io;
use thiserror::Error;

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, Error)]
pub enum StorageError {
    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Attempted to read beyond the end of storage.
    #[error("read beyond end of storage: offset {offset}, len {len}, size {size}")]
    ReadPastEnd {
        /// The requested read offset.
        offset: u64,
        /// The requested read length.
        len: usize,
        /// The current storage size.
        size: u64,
    },

    /// The medium accepted fewer bytes than were handed to it.
    #[error("short write at offset {offset}: tried {len} bytes, wrote {written}")]
    ShortWrite {
        /// The requested write offset.
        offset: u64,
        /// The number of bytes handed to the write.
        len: usize,
        /// The number of bytes actually stored.
        written: usize,
    },
}
