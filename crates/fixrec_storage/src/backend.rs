//! Storage backend trait definition.

use crate::error::StorageResult;

/// A low-level positioned storage backend.
///
/// Storage backends are **opaque byte stores**. They read and write byte
/// ranges at absolute offsets. The record layer owns all layout
/// interpretation - backends do not understand headers or slots.
///
/// # Invariants
///
/// - `read_at` returns exactly `len` bytes or fails
/// - `write_at` stores exactly `data.len()` bytes or fails
/// - Writing past the end extends the storage; any gap reads back as zeros
/// - `sync` ensures all written data is durable
/// - Backends must be `Send + Sync`
///
/// # Implementors
///
/// - [`super::InMemoryBackend`] - For testing
/// - [`super::FileBackend`] - For persistent storage
pub trait StorageBackend: Send + Sync {
    /// Reads `len` bytes starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The read would extend beyond the current size
    /// - An I/O error occurs
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>>;

    /// Writes `data` starting at `offset`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::ShortWrite`](crate::StorageError::ShortWrite)
    /// if the medium stored fewer bytes than requested, or an I/O error.
    fn write_at(&mut self, offset: u64, data: &[u8]) -> StorageResult<()>;

    /// Flushes all pending writes to the OS.
    ///
    /// # Errors
    ///
    /// Returns an error if the flush operation fails.
    fn flush(&mut self) -> StorageResult<()>;

    /// Returns the current size of the storage in bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the size cannot be determined.
    fn size(&self) -> StorageResult<u64>;

    /// Syncs all data and metadata to durable storage.
    ///
    /// This is a stronger guarantee than `flush` - it ensures that
    /// file metadata (size, timestamps) is also durable.
    ///
    /// # Errors
    ///
    /// Returns an error if the sync operation fails.
    fn sync(&mut self) -> StorageResult<()>;
}
