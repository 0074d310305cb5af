//! # fixrec Core
//!
//! Fixed-width record files and capacity-bounded record rings.
//!
//! This crate provides:
//! - [`RecordStore`] - a file of same-size records addressed by slot number
//! - [`RingRecordStore`] - a store that keeps only the newest `capacity`
//!   records, overwriting the oldest, and walks them in insertion order
//! - [`HeaderSchema`] - the header layout, extensible with extra fields
//!
//! Records are encoded by a [`fixrec_codec::RecordCodec`] and stored on a
//! [`fixrec_storage::StorageBackend`]. A store is single-owner: it holds no
//! locks, and concurrent access from several handles must be prevented by
//! the caller.
//!
//! ## File Layout
//!
//! ```text
//! [record_size:u16][record_count:u32]                                  plain store
//! [record_size:u16][record_count:u32][first_index:u32][last_index:u32] ring store
//! [slot 0][slot 1]...
//! ```
//!
//! Integers are big-endian. Every mutation writes record bytes first and
//! commits the header last.

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod config;
mod error;
mod header;
mod ring;
mod store;

pub use config::StoreConfig;
pub use error::{CoreError, CoreResult};
pub use header::{FieldWidth, Header, HeaderField, HeaderSchema, BASE_HEADER_SIZE};
pub use ring::{ring_schema, RingIter, RingRecordStore, FIRST_INDEX_FIELD, LAST_INDEX_FIELD};
pub use store::{RecordStore, Records};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
