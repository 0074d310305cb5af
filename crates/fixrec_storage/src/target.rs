//! Named places a backend can be opened from.

use crate::backend::StorageBackend;
use crate::error::StorageResult;
use crate::file::FileBackend;
use crate::memory::InMemoryBackend;
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

/// A storage location that may or may not exist yet.
///
/// Record stores ask a target whether it exists before opening it, so they
/// can tell a brand new store (write a fresh header) from an existing one
/// (load and validate the header).
pub trait StorageTarget {
    /// The backend produced by [`StorageTarget::open`].
    type Backend: StorageBackend + 'static;

    /// Returns true if the target already exists.
    ///
    /// # Errors
    ///
    /// Returns an error if existence cannot be determined.
    fn exists(&self) -> StorageResult<bool>;

    /// Opens the target for reading and writing, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns an error if the target cannot be opened or created.
    fn open(&self) -> StorageResult<Self::Backend>;

    /// Human-readable name of the target, used in log output.
    fn describe(&self) -> String;
}

impl StorageTarget for Path {
    type Backend = FileBackend;

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.try_exists()?)
    }

    fn open(&self) -> StorageResult<FileBackend> {
        FileBackend::open(self)
    }

    fn describe(&self) -> String {
        self.display().to_string()
    }
}

/// A file path whose missing parent directories are created on open.
#[derive(Debug, Clone, Copy)]
pub struct PathWithParents<'a> {
    path: &'a Path,
}

impl<'a> PathWithParents<'a> {
    /// Wraps `path`.
    #[must_use]
    pub const fn new(path: &'a Path) -> Self {
        Self { path }
    }
}

impl StorageTarget for PathWithParents<'_> {
    type Backend = FileBackend;

    fn exists(&self) -> StorageResult<bool> {
        StorageTarget::exists(self.path)
    }

    fn open(&self) -> StorageResult<FileBackend> {
        FileBackend::open_with_create_dirs(self.path)
    }

    fn describe(&self) -> String {
        StorageTarget::describe(self.path)
    }
}

/// An in-memory target that survives close and reopen.
///
/// The first `open` creates an [`InMemoryBackend`]; later opens hand back a
/// handle to the same bytes. Clones of a target share that state.
///
/// ```rust
/// use fixrec_storage::{MemoryTarget, StorageBackend, StorageTarget};
///
/// let target = MemoryTarget::new();
/// assert!(!target.exists().unwrap());
///
/// target.open().unwrap().write_at(0, b"kept").unwrap();
/// assert!(target.exists().unwrap());
/// assert_eq!(target.open().unwrap().read_at(0, 4).unwrap(), b"kept");
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemoryTarget {
    backend: Arc<Mutex<Option<InMemoryBackend>>>,
    limit: Option<u64>,
}

impl MemoryTarget {
    /// Creates a target that does not exist yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a target that already exists with the given backend.
    #[must_use]
    pub fn with_backend(backend: InMemoryBackend) -> Self {
        Self {
            backend: Arc::new(Mutex::new(Some(backend))),
            limit: None,
        }
    }

    /// Caps the size of the backend created on first open.
    #[must_use]
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns a handle to the backing bytes, if the target exists.
    #[must_use]
    pub fn backend(&self) -> Option<InMemoryBackend> {
        self.backend.lock().clone()
    }
}

impl StorageTarget for MemoryTarget {
    type Backend = InMemoryBackend;

    fn exists(&self) -> StorageResult<bool> {
        Ok(self.backend.lock().is_some())
    }

    fn open(&self) -> StorageResult<InMemoryBackend> {
        let mut slot = self.backend.lock();
        let backend = slot.get_or_insert_with(|| match self.limit {
            Some(limit) => InMemoryBackend::new().with_limit(limit),
            None => InMemoryBackend::new(),
        });
        Ok(backend.clone())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn path_with_parents_creates_directories() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("x").join("y").join("target.bin");
        let target = PathWithParents::new(&path);

        assert!(!target.exists().unwrap());
        let mut backend = target.open().unwrap();
        backend.write_at(0, b"ok").unwrap();

        assert!(target.exists().unwrap());
        assert_eq!(target.describe(), path.display().to_string());
        assert_eq!(std::fs::read(&path).unwrap(), b"ok");
    }

    #[test]
    fn path_target_exists_after_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("target.bin");

        assert!(!path.as_path().exists());
        assert!(!StorageTarget::exists(path.as_path()).unwrap());

        let backend = StorageTarget::open(path.as_path()).unwrap();
        assert_eq!(backend.size().unwrap(), 0);
        assert!(StorageTarget::exists(path.as_path()).unwrap());
    }

    #[test]
    fn memory_target_reopen_shares_bytes() {
        let target = MemoryTarget::new();
        assert!(!target.exists().unwrap());

        let mut first = target.open().unwrap();
        first.write_at(0, b"abc").unwrap();
        drop(first);

        let second = target.open().unwrap();
        assert_eq!(second.read_at(0, 3).unwrap(), b"abc");
    }

    #[test]
    fn memory_target_limit_applies_to_created_backend() {
        let target = MemoryTarget::new().with_limit(2);
        let mut backend = target.open().unwrap();
        assert!(backend.write_at(0, b"abc").is_err());
    }

    #[test]
    fn memory_target_with_backend_exists() {
        let target = MemoryTarget::with_backend(InMemoryBackend::with_data(vec![1, 2, 3]));
        assert!(target.exists().unwrap());
        assert_eq!(target.backend().unwrap().data(), vec![1, 2, 3]);
    }
}
