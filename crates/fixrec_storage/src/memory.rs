//! In-memory storage backend for testing.

use crate::backend::StorageBackend;
use crate::error::{StorageError, StorageResult};
use parking_lot::RwLock;
use std::sync::Arc;

/// An in-memory storage backend.
///
/// This backend stores all data in memory and is suitable for:
/// - Unit tests
/// - Integration tests
/// - Ephemeral stores that don't need persistence
///
/// Clones share the same bytes, so a handle kept by a test can observe
/// (and a [`MemoryTarget`](crate::MemoryTarget) can reopen) what a store
/// wrote after the store itself has been closed.
///
/// An optional size limit makes the backend behave like a full medium:
/// a write crossing the limit stores what fits and reports
/// [`StorageError::ShortWrite`].
///
/// # Example
///
/// ```rust
/// use fixrec_storage::{StorageBackend, InMemoryBackend};
///
/// let mut backend = InMemoryBackend::new();
/// backend.write_at(0, b"test data").unwrap();
/// assert_eq!(backend.size().unwrap(), 9);
/// ```
#[derive(Debug, Default, Clone)]
pub struct InMemoryBackend {
    data: Arc<RwLock<Vec<u8>>>,
    limit: Option<u64>,
}

impl InMemoryBackend {
    /// Creates a new empty in-memory backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new in-memory backend with pre-existing data.
    ///
    /// Useful for testing recovery and corruption scenarios.
    #[must_use]
    pub fn with_data(data: Vec<u8>) -> Self {
        Self {
            data: Arc::new(RwLock::new(data)),
            limit: None,
        }
    }

    /// Caps the total size of the backend at `limit` bytes.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns a copy of all data in the backend.
    #[must_use]
    pub fn data(&self) -> Vec<u8> {
        self.data.read().clone()
    }

    /// Truncates the backend to `len` bytes.
    ///
    /// Has no effect if the backend is already shorter.
    pub fn truncate(&self, len: usize) {
        self.data.write().truncate(len);
    }
}

impl StorageBackend for InMemoryBackend {
    fn read_at(&self, offset: u64, len: usize) -> StorageResult<Vec<u8>> {
        let data = self.data.read();
        let size = data.len() as u64;
        let offset_usize = offset as usize;
        let end = offset_usize.saturating_add(len);

        if offset > size || end > data.len() {
            return Err(StorageError::ReadPastEnd { offset, len, size });
        }

        Ok(data[offset_usize..end].to_vec())
    }

    fn write_at(&mut self, offset: u64, new_data: &[u8]) -> StorageResult<()> {
        if new_data.is_empty() {
            return Ok(());
        }

        let fits = match self.limit {
            Some(limit) => limit.saturating_sub(offset).min(new_data.len() as u64) as usize,
            None => new_data.len(),
        };

        let mut data = self.data.write();
        if fits > 0 {
            let start = offset as usize;
            let end = start + fits;
            if data.len() < end {
                data.resize(end, 0);
            }
            data[start..end].copy_from_slice(&new_data[..fits]);
        }

        if fits != new_data.len() {
            return Err(StorageError::ShortWrite {
                offset,
                len: new_data.len(),
                written: fits,
            });
        }

        Ok(())
    }

    fn flush(&mut self) -> StorageResult<()> {
        // In-memory backend has no pending writes
        Ok(())
    }

    fn size(&self) -> StorageResult<u64> {
        Ok(self.data.read().len() as u64)
    }

    fn sync(&mut self) -> StorageResult<()> {
        // In-memory backend has no metadata to sync
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_new_is_empty() {
        let backend = InMemoryBackend::new();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(backend.data().is_empty());
    }

    #[test]
    fn memory_write_at_extends() {
        let mut backend = InMemoryBackend::new();

        backend.write_at(0, b"hello").unwrap();
        backend.write_at(5, b" world").unwrap();

        assert_eq!(backend.size().unwrap(), 11);
        assert_eq!(backend.data(), b"hello world");
    }

    #[test]
    fn memory_write_at_overwrites() {
        let mut backend = InMemoryBackend::with_data(b"hello world".to_vec());
        backend.write_at(0, b"HELLO").unwrap();
        assert_eq!(backend.data(), b"HELLO world");
    }

    #[test]
    fn memory_write_past_end_zero_fills() {
        let mut backend = InMemoryBackend::new();
        backend.write_at(3, b"ab").unwrap();
        assert_eq!(backend.data(), b"\0\0\0ab");
    }

    #[test]
    fn memory_read_at_returns_correct_data() {
        let backend = InMemoryBackend::with_data(b"hello world".to_vec());

        let data = backend.read_at(0, 5).unwrap();
        assert_eq!(&data, b"hello");

        let data = backend.read_at(6, 5).unwrap();
        assert_eq!(&data, b"world");
    }

    #[test]
    fn memory_read_at_past_end_fails() {
        let backend = InMemoryBackend::with_data(b"hello".to_vec());

        let result = backend.read_at(10, 5);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_read_at_extending_past_end_fails() {
        let backend = InMemoryBackend::with_data(b"hello".to_vec());

        let result = backend.read_at(3, 10);
        assert!(matches!(result, Err(StorageError::ReadPastEnd { .. })));
    }

    #[test]
    fn memory_empty_read() {
        let backend = InMemoryBackend::with_data(b"hello".to_vec());
        let data = backend.read_at(2, 0).unwrap();
        assert!(data.is_empty());
    }

    #[test]
    fn memory_clones_share_data() {
        let mut backend = InMemoryBackend::new();
        let observer = backend.clone();

        backend.write_at(0, b"shared").unwrap();
        assert_eq!(observer.data(), b"shared");
    }

    #[test]
    fn memory_limit_reports_short_write() {
        let mut backend = InMemoryBackend::new().with_limit(8);
        backend.write_at(0, b"12345").unwrap();

        let result = backend.write_at(5, b"6789");
        assert!(matches!(
            result,
            Err(StorageError::ShortWrite {
                offset: 5,
                len: 4,
                written: 3
            })
        ));
        assert_eq!(backend.data(), b"12345678");
    }

    #[test]
    fn memory_limit_beyond_end_writes_nothing() {
        let mut backend = InMemoryBackend::new().with_limit(4);

        let result = backend.write_at(10, b"x");
        assert!(matches!(
            result,
            Err(StorageError::ShortWrite { written: 0, .. })
        ));
        assert_eq!(backend.size().unwrap(), 0);
    }

    #[test]
    fn memory_truncate() {
        let backend = InMemoryBackend::with_data(b"hello world".to_vec());
        backend.truncate(5);
        assert_eq!(backend.data(), b"hello");
    }

    #[test]
    fn memory_flush_and_sync_succeed() {
        let mut backend = InMemoryBackend::new();
        backend.write_at(0, b"data").unwrap();
        assert!(backend.flush().is_ok());
        assert!(backend.sync().is_ok());
    }
}
