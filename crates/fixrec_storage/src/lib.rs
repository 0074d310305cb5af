//! # fixrec Storage
//!
//! Positioned byte storage for fixrec record files.
//!
//! Storage backends are **opaque byte stores** - they do not interpret
//! the data they store. The record layer decides what lives at each
//! offset; a backend only promises that a read or write either moves
//! exactly the requested number of bytes or fails.
//!
//! ## Design Principles
//!
//! - Backends are simple positioned byte stores (read at, write at, flush)
//! - No knowledge of headers, slots or codecs
//! - Must be `Send + Sync`
//! - Short transfers are reported, never silently accepted
//!
//! ## Available Backends
//!
//! - [`InMemoryBackend`] - For testing and ephemeral storage
//! - [`FileBackend`] - For persistent storage using OS file APIs
//!
//! Backends are usually obtained through a [`StorageTarget`], which adds the
//! "does it exist yet" question a record store needs before deciding whether
//! to create or load a header.
//!
//! ## Example
//!
//! ```rust
//! use fixrec_storage::{StorageBackend, InMemoryBackend};
//!
//! let mut backend = InMemoryBackend::new();
//! backend.write_at(0, b"hello world").unwrap();
//! let data = backend.read_at(6, 5).unwrap();
//! assert_eq!(&data, b"world");
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod backend;
mod error;
mod file;
mod memory;
mod target;

pub use backend::StorageBackend;
pub use error::{StorageError, StorageResult};
pub use file::FileBackend;
pub use memory::InMemoryBackend;
pub use target::{MemoryTarget, PathWithParents, StorageTarget};
