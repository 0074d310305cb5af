//! Capacity-bounded ring of records.

use crate::config::StoreConfig;
use crate::error::{CoreError, CoreResult};
use crate::header::{FieldWidth, Header, HeaderSchema};
use crate::store::{RecordStore, Records};
use fixrec_codec::RecordCodec;
use fixrec_storage::StorageTarget;
use std::iter::FusedIterator;
use std::path::Path;
use tracing::{debug, trace, warn};

/// Header field holding the physical slot of the oldest record.
pub const FIRST_INDEX_FIELD: &str = "first_index";

/// Header field holding the physical slot of the newest record.
pub const LAST_INDEX_FIELD: &str = "last_index";

const FIRST: usize = 0;
const LAST: usize = 1;

/// Header layout of a ring file:
/// `[record_size:u16][record_count:u32][first_index:u32][last_index:u32]`.
#[must_use]
pub fn ring_schema() -> HeaderSchema {
    HeaderSchema::base()
        .with_field(FIRST_INDEX_FIELD, FieldWidth::U32)
        .with_field(LAST_INDEX_FIELD, FieldWidth::U32)
}

/// A record store holding at most `capacity` records, overwriting the
/// oldest once full.
///
/// While `record_count < capacity` the ring grows like a plain
/// [`RecordStore`]. Once it reaches `capacity` it stays full for good: each
/// append overwrites the slot at `first_index`, that slot becomes
/// `last_index`, and `first_index` moves one slot forward, wrapping at
/// `capacity`.
///
/// After wraparound, physical slot numbers no longer follow insertion order.
/// Walk the ring with [`first`](Self::first)/[`next`](Self::next) or
/// [`iter`](Self::iter), and use [`current_index`](Self::current_index) to
/// learn which slot an append landed in.
///
/// The capacity is not stored in the file; reopen with the same capacity.
///
/// # Example
///
/// ```rust
/// use fixrec_codec::RawCodec;
/// use fixrec_core::RingRecordStore;
/// use fixrec_storage::MemoryTarget;
///
/// let mut ring = RingRecordStore::new(RawCodec::new(1), 3)?;
/// ring.open_target(&MemoryTarget::new())?;
///
/// for id in 0..5u8 {
///     ring.append_overwriting(&vec![id])?;
/// }
///
/// let mut seen = Vec::new();
/// let mut rec = ring.first()?;
/// while let Some(bytes) = rec {
///     seen.push(bytes[0]);
///     rec = ring.next()?;
/// }
/// assert_eq!(seen, vec![2, 3, 4]);
/// assert_eq!(ring.first_index()?, 2);
/// # Ok::<(), fixrec_core::CoreError>(())
/// ```
pub struct RingRecordStore<C: RecordCodec> {
    store: RecordStore<C>,
    capacity: u32,
    cursor: Option<u32>,
}

impl<C: RecordCodec> RingRecordStore<C> {
    /// Creates a closed ring with default configuration.
    ///
    /// # Errors
    ///
    /// - [`CoreError::InvalidCapacity`] if `capacity` is 0
    /// - [`CoreError::InvalidRecordSize`] if the codec size is unusable
    pub fn new(codec: C, capacity: u32) -> CoreResult<Self> {
        Self::with_config(codec, capacity, StoreConfig::default())
    }

    /// Creates a closed ring.
    ///
    /// # Errors
    ///
    /// See [`RingRecordStore::new`].
    pub fn with_config(codec: C, capacity: u32, config: StoreConfig) -> CoreResult<Self> {
        if capacity == 0 {
            return Err(CoreError::InvalidCapacity);
        }
        Ok(Self {
            store: RecordStore::with_schema(codec, config, ring_schema())?,
            capacity,
            cursor: None,
        })
    }

    /// Opens (or creates) a ring file at `path`.
    ///
    /// # Errors
    ///
    /// See [`RingRecordStore::open_target`].
    pub fn open(&mut self, path: &Path) -> CoreResult<()> {
        self.store.open(path)?;
        self.check_capacity()
    }

    /// Opens the ring on `target`.
    ///
    /// # Errors
    ///
    /// Everything [`RecordStore::open_target`] reports, plus
    /// [`CoreError::CapacityMismatch`] if the stored ring does not fit
    /// this ring's capacity, including a wrapped ring reopened with a larger
    /// one. The ring is closed again in that case.
    pub fn open_target<T: StorageTarget + ?Sized>(&mut self, target: &T) -> CoreResult<()> {
        self.store.open_target(target)?;
        self.check_capacity()
    }

    fn check_capacity(&mut self) -> CoreResult<()> {
        self.cursor = None;
        let header = self.store.header()?;
        let count = header.record_count;
        let first = ring_index(header, FIRST);
        let last = ring_index(header, LAST);

        let in_slots =
            count == 0 || matches!((first, last), (Some(f), Some(l)) if f < count && l < count);
        // A ring that is still growing has never wrapped, so its oldest record
        // is in slot 0.
        let growing_from_zero = count == self.capacity || first == Some(0);
        let fits = count <= self.capacity && in_slots && growing_from_zero;
        if fits {
            debug!(
                capacity = self.capacity,
                record_count = count,
                "opened ring store"
            );
            return Ok(());
        }

        let err = CoreError::CapacityMismatch {
            capacity: self.capacity,
            record_count: count,
            first_index: first.unwrap_or(u32::MAX),
            last_index: last.unwrap_or(u32::MAX),
        };
        warn!(error = %err, "ring does not fit capacity");
        if let Err(close_err) = self.store.close() {
            warn!(error = %close_err, "close after capacity mismatch failed");
        }
        Err(err)
    }

    /// Releases the storage handle and forgets the cursor.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::close`].
    pub fn close(&mut self) -> CoreResult<()> {
        self.cursor = None;
        self.store.close()
    }

    /// Returns true if the ring is open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.store.is_open()
    }

    /// Read-only access to the underlying linear store.
    #[must_use]
    pub fn store(&self) -> &RecordStore<C> {
        &self.store
    }

    /// Maximum number of records kept.
    #[must_use]
    pub fn capacity(&self) -> u32 {
        self.capacity
    }

    /// Number of occupied slots; never exceeds the capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotOpen`] if the ring is closed.
    pub fn record_count(&self) -> CoreResult<u32> {
        self.store.record_count()
    }

    /// Returns true once the ring has reached capacity.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotOpen`] if the ring is closed.
    pub fn is_full(&self) -> CoreResult<bool> {
        Ok(self.record_count()? >= self.capacity)
    }

    /// Physical slot of the oldest record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotOpen`] if the ring is closed.
    pub fn first_index(&self) -> CoreResult<u32> {
        self.boundary(FIRST)
    }

    /// Physical slot of the newest record.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotOpen`] if the ring is closed.
    pub fn last_index(&self) -> CoreResult<u32> {
        self.boundary(LAST)
    }

    fn boundary(&self, field: usize) -> CoreResult<u32> {
        // Validated on open and only ever set from u32 values.
        Ok(ring_index(self.store.header()?, field).unwrap_or_default())
    }

    /// Physical slot last written by an append or visited by traversal.
    #[must_use]
    pub fn current_index(&self) -> Option<u32> {
        self.cursor
    }

    /// Appends `record`, evicting the oldest record if the ring is full.
    ///
    /// The record is written first and the header committed last. The
    /// cursor moves to the slot written, which is also returned. Once the
    /// ring has wrapped this need not be `record_count - 1`.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::write_record`].
    pub fn append_overwriting(&mut self, record: &C::Record) -> CoreResult<u32> {
        let header = self.store.header()?;
        let count = header.record_count;
        let first = ring_index(header, FIRST).unwrap_or_default();

        let (slot, next_first, next_count) = if count < self.capacity {
            (count, first, count + 1)
        } else {
            (first, (first + 1) % self.capacity, count)
        };

        self.store.write_record(slot, record)?;
        self.store.commit_header(|h| {
            h.record_count = next_count;
            h.set_extension(FIRST, u64::from(next_first));
            h.set_extension(LAST, u64::from(slot));
        })?;
        self.cursor = Some(slot);

        if next_count == count {
            trace!(slot, first_index = next_first, "overwrote oldest record");
        } else {
            trace!(slot, record_count = next_count, "appended record");
        }
        Ok(slot)
    }

    /// Moves the cursor to the oldest record and returns it.
    ///
    /// Returns `None` if the ring is empty.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotOpen`] if the ring is closed
    /// - Read errors from the underlying store
    pub fn first(&mut self) -> CoreResult<Option<C::Record>> {
        if self.record_count()? == 0 {
            self.cursor = None;
            return Ok(None);
        }
        let slot = self.first_index()?;
        self.cursor = Some(slot);
        self.store.read_record(slot).map(Some)
    }

    /// Advances the cursor one record toward the newest and returns it.
    ///
    /// Returns `None` once the cursor is on the newest record.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotOpen`] if the ring is closed
    /// - [`CoreError::CursorUnset`] if no `first()` or append has placed the
    ///   cursor since the ring was opened
    /// - Read errors from the underlying store
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> CoreResult<Option<C::Record>> {
        let last = self.last_index()?;
        let cursor = self.cursor.ok_or(CoreError::CursorUnset)?;
        if cursor == last {
            return Ok(None);
        }
        let slot = (cursor + 1) % self.capacity;
        self.cursor = Some(slot);
        self.store.read_record(slot).map(Some)
    }

    /// Reads the record in physical slot `slot`.
    ///
    /// # Errors
    ///
    /// See [`RecordStore::read_record`].
    pub fn read_record(&self, slot: u32) -> CoreResult<C::Record> {
        self.store.read_record(slot)
    }

    /// Iterates from the oldest record to the newest without touching the
    /// cursor.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotOpen`] if the ring is closed.
    pub fn iter(&self) -> CoreResult<RingIter<'_, C>> {
        Ok(RingIter {
            ring: self,
            slot: self.first_index()?,
            remaining: self.record_count()?,
        })
    }

    /// Iterates over occupied slots in physical order.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::NotOpen`] if the ring is closed.
    pub fn slots(&self) -> CoreResult<Records<'_, C>> {
        self.store.iter()
    }
}

impl<C: RecordCodec> std::fmt::Debug for RingRecordStore<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RingRecordStore")
            .field("store", &self.store)
            .field("capacity", &self.capacity)
            .field("cursor", &self.cursor)
            .finish()
    }
}

fn ring_index(header: &Header, field: usize) -> Option<u32> {
    u32::try_from(header.extension(field)).ok()
}

/// Iterator over a [`RingRecordStore`] in insertion order.
pub struct RingIter<'a, C: RecordCodec> {
    ring: &'a RingRecordStore<C>,
    slot: u32,
    remaining: u32,
}

impl<C: RecordCodec> Iterator for RingIter<'_, C> {
    type Item = CoreResult<C::Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.slot;
        self.slot = (slot + 1) % self.ring.capacity;
        self.remaining -= 1;
        Some(self.ring.read_record(slot))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.remaining as usize;
        (left, Some(left))
    }
}

impl<C: RecordCodec> ExactSizeIterator for RingIter<'_, C> {}

impl<C: RecordCodec> FusedIterator for RingIter<'_, C> {}
