//! Linear fixed-width record store.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::header::{Header, HeaderSchema};
use fixrec_codec::RecordCodec;
use fixrec_storage::{PathWithParents, StorageBackend, StorageTarget};
use std::iter::FusedIterator;
use std::path::Path;
use tracing::{debug, trace, warn};

/// A file of same-size records addressed by slot number.
///
/// The file is a header followed by densely packed slots:
///
/// ```text
/// [header][slot 0][slot 1]...[slot record_count - 1]
/// ```
///
/// Slot `n` lives at `header_size + n * record_size`. The header is read
/// once on open and rewritten, in full, as the last step of every call that
/// changes it. Record slots are only written when their own content changes.
///
/// # Example
///
/// ```rust
/// use fixrec_codec::RawCodec;
/// use fixrec_core::RecordStore;
/// use fixrec_storage::MemoryTarget;
///
/// let mut store = RecordStore::new(RawCodec::new(4))?;
/// store.open_target(&MemoryTarget::new())?;
///
/// store.append_record(&vec![1, 2, 3, 4])?;
/// store.append_record(&vec![5, 6, 7, 8])?;
/// store.write_record(0, &vec![0, 0, 0, 0])?;
///
/// assert_eq!(store.record_count()?, 2);
/// assert_eq!(store.read_record(0)?, vec![0, 0, 0, 0]);
/// store.close()?;
/// # Ok::<(), fixrec_core::CoreError>(())
/// ```
pub struct RecordStore<C: RecordCodec> {
    codec: C,
    config: StoreConfig,
    schema: HeaderSchema,
    record_size: u16,
    backend: Option<Box<dyn StorageBackend>>,
    header: Option<Header>,
    name: String,
}

impl<C: RecordCodec> RecordStore<C> {
    /// Creates a closed store with the base header and default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRecordSize`] if the codec's size is 0 or
    /// does not fit in the header's 16-bit record size field.
    pub fn new(codec: C) -> CoreResult<Self> {
        Self::with_config(codec, StoreConfig::default())
    }

    /// Creates a closed store with the base header.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::new`].
    pub fn with_config(codec: C, config: StoreConfig) -> CoreResult<Self> {
        Self::with_schema(codec, config, HeaderSchema::base())
    }

    /// Creates a closed store whose header carries extra fields.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::new`].
    pub fn with_schema(codec: C, config: StoreConfig, schema: HeaderSchema) -> CoreResult<Self> {
        let size = codec.size();
        let record_size = u16::try_from(size)
            .ok()
            .filter(|&s| s > 0)
            .ok_or(CoreError::InvalidRecordSize { size })?;

        Ok(Self {
            codec,
            config,
            schema,
            record_size,
            backend: None,
            header: None,
            name: String::new(),
        })
    }

    /// Opens (or creates) a file store at `path`.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::open_target`].
    pub fn open(&mut self, path: &Path) -> CoreResult<()> {
        if self.config.create_dirs {
            self.open_target(&PathWithParents::new(path))
        } else {
            self.open_target::<Path>(path)
        }
    }

    /// Opens the store on `target`.
    ///
    /// If the target does not exist it is created, a zero-filled header
    /// region is written, and a fresh header (`record_size` set, everything
    /// else zero) is committed. If it exists, the header is read and its
    /// `record_size` checked against the codec.
    ///
    /// On failure the store stays closed and an existing target is left
    /// untouched.
    ///
    /// # Errors
    ///
    /// - [`CoreError::AlreadyOpen`] if the store is open
    /// - [`CoreError::NotFound`] if the target is missing and
    ///   `create_if_missing` is off
    /// - [`CoreError::ShortRead`] if an existing target is shorter than the header
    /// - [`CoreError::SchemaMismatch`] if the stored record size differs
    pub fn open_target<T: StorageTarget + ?Sized>(&mut self, target: &T) -> CoreResult<()> {
        if self.is_open() {
            return Err(CoreError::AlreadyOpen);
        }

        let name = target.describe();
        if target.exists()? {
            let backend = target.open()?;
            let header = self.load_header(&backend, &name)?;
            debug!(
                store = %name,
                record_size = header.record_size,
                record_count = header.record_count,
                "opened record store"
            );
            self.backend = Some(Box::new(backend));
            self.header = Some(header);
            self.name = name;
            return Ok(());
        }

        if !self.config.create_if_missing {
            return Err(CoreError::NotFound { target: name });
        }

        let mut backend = target.open()?;
        let blank = vec![0u8; self.schema.byte_size()];
        backend.write_at(0, &blank)?;

        self.header = Some(self.schema.decode(&blank)?);
        self.backend = Some(Box::new(backend));
        self.name = name;

        let record_size = self.record_size;
        if let Err(e) = self.commit_header(|_| {}) {
            self.backend = None;
            self.header = None;
            return Err(e);
        }

        debug!(
            store = %self.name,
            record_size,
            header_size = self.schema.byte_size(),
            "created record store"
        );
        Ok(())
    }

    fn load_header(&self, backend: &dyn StorageBackend, name: &str) -> CoreResult<Header> {
        let bytes = backend.read_at(0, self.schema.byte_size())?;
        let header = self.schema.decode(&bytes)?;

        if header.record_size != self.record_size {
            warn!(
                store = %name,
                stored = header.record_size,
                expected = self.record_size,
                "record size mismatch"
            );
            return Err(CoreError::SchemaMismatch {
                stored: header.record_size,
                expected: self.record_size,
            });
        }

        Ok(header)
    }

    /// Releases the storage handle. Does nothing if already closed.
    ///
    /// # Errors
    ///
    /// Returns an error if flushing the backend fails; the store is closed
    /// either way.
    pub fn close(&mut self) -> CoreResult<()> {
        self.header = None;
        if let Some(mut backend) = self.backend.take() {
            backend.flush()?;
            debug!(store = %self.name, "closed record store");
        }
        Ok(())
    }

    /// Returns true if the store is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.backend.is_some()
    }

    /// The record codec.
    #[must_use]
    pub fn codec(&self) -> &C {
        &self.codec
    }

    /// The header layout.
    #[must_use]
    pub fn schema(&self) -> &HeaderSchema {
        &self.schema
    }

    /// Byte size of one record slot.
    #[must_use]
    pub fn record_size(&self) -> u16 {
        self.record_size
    }

    /// Byte size of the header.
    #[must_use]
    pub fn header_size(&self) -> usize {
        self.schema.byte_size()
    }

    /// Byte offset of slot `n`.
    #[must_use]
    pub fn record_offset(&self, n: u32) -> u64 {
        self.schema.byte_size() as u64 + u64::from(n) * u64::from(self.record_size)
    }

    /// The in-memory header, which always matches the one on disk.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotOpen`] if the store is closed.
    pub fn header(&self) -> CoreResult<&Header> {
        self.header.as_ref().ok_or(CoreError::NotOpen)
    }

    /// Number of record slots in the store.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotOpen`] if the store is closed.
    pub fn record_count(&self) -> CoreResult<u32> {
        Ok(self.header()?.record_count)
    }

    /// Reads and decodes slot `n`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotOpen`] if the store is closed
    /// - [`CoreError::IndexOutOfRange`] if `n >= record_count`
    /// - [`CoreError::ShortRead`] if the slot runs past the end of storage
    pub fn read_record(&self, n: u32) -> CoreResult<C::Record> {
        let count = self.record_count()?;
        if n >= count {
            return Err(CoreError::IndexOutOfRange { index: n, count });
        }
        self.read_slot(n)
    }

    fn read_slot(&self, n: u32) -> CoreResult<C::Record> {
        let backend = self.backend.as_ref().ok_or(CoreError::NotOpen)?;
        let bytes = backend.read_at(self.record_offset(n), usize::from(self.record_size))?;
        Ok(self.codec.decode(&bytes)?)
    }

    /// Encodes `record` into slot `n`.
    ///
    /// `n` may equal `record_count`, which writes the slot just past the end
    /// without counting it; only [`append_record`](Self::append_record)
    /// updates `record_count`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotOpen`] if the store is closed
    /// - [`CoreError::IndexOutOfRange`] if `n > record_count`
    /// - [`CoreError::Codec`] if the value cannot be encoded
    /// - [`CoreError::ShortWrite`] if the medium took fewer bytes
    ///
    /// # Panics
    ///
    /// Panics if the codec returns a buffer whose length differs from its
    /// declared size.
    pub fn write_record(&mut self, n: u32, record: &C::Record) -> CoreResult<()> {
        let count = self.record_count()?;
        if n > count {
            return Err(CoreError::IndexOutOfRange { index: n, count });
        }
        self.write_slot(n, record)
    }

    fn write_slot(&mut self, n: u32, record: &C::Record) -> CoreResult<()> {
        if self.backend.is_none() {
            return Err(CoreError::NotOpen);
        }

        let bytes = self.codec.encode(record)?;
        assert_eq!(
            bytes.len(),
            usize::from(self.record_size),
            "codec produced {} bytes for a {}-byte record",
            bytes.len(),
            self.record_size
        );

        let offset = self.record_offset(n);
        let backend = self.backend.as_mut().ok_or(CoreError::NotOpen)?;
        backend.write_at(offset, &bytes)?;
        Ok(())
    }

    /// Writes `record` into slot `record_count`, then commits the header
    /// with the count incremented.
    ///
    /// Returns the slot written. A failure between the two steps leaves at
    /// worst an unreferenced slot past the committed count.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::write_record`]. Fails with
    /// [`CoreError::IndexOutOfRange`] once `u32::MAX` slots exist.
    pub fn append_record(&mut self, record: &C::Record) -> CoreResult<u32> {
        let slot = self.record_count()?;
        let next = slot
            .checked_add(1)
            .ok_or(CoreError::IndexOutOfRange {
                index: slot,
                count: slot,
            })?;

        self.write_slot(slot, record)?;
        self.commit_header(|h| h.record_count = next)?;

        trace!(store = %self.name, slot, "appended record");
        Ok(slot)
    }

    /// Applies `update` to the header and persists it.
    ///
    /// The update is made on a copy, and the copy replaces the in-memory
    /// header only after the full header write succeeds, so memory and disk
    /// never disagree past the end of a call. `record_size` is always reset
    /// to the codec's size; it cannot change for the life of a file.
    pub(crate) fn commit_header<F: FnOnce(&mut Header)>(&mut self, update: F) -> CoreResult<()> {
        let (Some(backend), Some(header)) = (self.backend.as_mut(), self.header.as_mut()) else {
            return Err(CoreError::NotOpen);
        };

        let mut next = header.clone();
        update(&mut next);
        next.record_size = self.record_size;
        backend.write_at(0, &self.schema.encode(&next))?;
        *header = next;

        if self.config.sync_on_commit {
            backend.sync()?;
        }
        Ok(())
    }

    /// Iterates over slots `0..record_count` in ascending order.
    ///
    /// The iterator is lazy and reads one slot per step; call `iter` again to
    /// restart.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotOpen`] if the store is closed.
    pub fn iter(&self) -> CoreResult<Records<'_, C>> {
        let end = self.record_count()?;
        Ok(Records {
            store: self,
            next: 0,
            end,
        })
    }
}

impl<C: RecordCodec> std::fmt::Debug for RecordStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordStore")
            .field("name", &self.name)
            .field("record_size", &self.record_size)
            .field("header", &self.header)
            .finish_non_exhaustive()
    }
}

/// Iterator over a [`RecordStore`]'s slots in physical order.
pub struct Records<'a, C: RecordCodec> {
    store: &'a RecordStore<C>,
    next: u32,
    end: u32,
}

impl<C: RecordCodec> Iterator for Records<'_, C> {
    type Item = CoreResult<C::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.end {
            return None;
        }
        let slot = self.next;
        self.next += 1;
        Some(self.store.read_slot(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = (self.end - self.next) as usize;
        (left, Some(left))
    }
}

impl<C: RecordCodec> ExactSizeIterator for Records<'_, C> {}

impl<C: RecordCodec> FusedIterator for Records<'_, C> {}
