//! # fixrec Codec
//!
//! Fixed-size record encoding for fixrec stores.
//!
//! A record store never looks inside a record. It only needs a codec that
//! turns a typed value into exactly [`RecordCodec::size`] bytes and back.
//! This crate defines that contract and ships three codecs:
//!
//! - [`FixedCodec`] - hand-laid-out structs via [`FixedRecord`], built with
//!   [`FieldWriter`] and [`FieldReader`]
//! - [`CborCodec`] - any serde type, stored as length-prefixed CBOR padded
//!   to a fixed slot size
//! - [`RawCodec`] - opaque byte arrays of a declared size
//!
//! ## Field Encoding
//!
//! - Integers and floats are big-endian
//! - Text fields have a fixed byte width, are NUL-padded on write and
//!   trimmed of trailing NULs and whitespace on read
//! - There is no padding between fields
//!
//! ## Usage
//!
//! ```
//! use fixrec_codec::{FieldReader, FieldWriter, FixedCodec, FixedRecord, CodecResult, RecordCodec};
//!
//! #[derive(Debug, PartialEq)]
//! struct Sample {
//!     id: u16,
//!     name: String,
//! }
//!
//! impl FixedRecord for Sample {
//!     const SIZE: usize = 2 + 10;
//!
//!     fn write_fields(&self, w: &mut FieldWriter) -> CodecResult<()> {
//!         w.put_u16(self.id);
//!         w.put_str(&self.name, 10)
//!     }
//!
//!     fn read_fields(r: &mut FieldReader<'_>) -> CodecResult<Self> {
//!         Ok(Self { id: r.get_u16()?, name: r.get_str(10)? })
//!     }
//! }
//!
//! let codec = FixedCodec::<Sample>::new();
//! let sample = Sample { id: 7, name: "seven".into() };
//! let bytes = codec.encode(&sample).unwrap();
//! assert_eq!(bytes.len(), codec.size());
//! assert_eq!(codec.decode(&bytes).unwrap(), sample);
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

mod cbor;
mod error;
mod field;
mod fixed;
mod raw;

pub use cbor::CborCodec;
pub use error::{CodecError, CodecResult};
pub use field::{FieldReader, FieldWriter};
pub use fixed::{FixedCodec, FixedRecord};
pub use raw::RawCodec;

/// The fixed-size encode/decode contract a record store relies on.
///
/// # Contract
///
/// - `size()` never changes for the lifetime of the codec
/// - `encode` returns exactly `size()` bytes on success
/// - `decode` accepts exactly `size()` bytes
/// - Both are deterministic
pub trait RecordCodec {
    /// The typed record this codec produces and consumes.
    type Record;

    /// Returns the encoded size of every record, in bytes.
    fn size(&self) -> usize;

    /// Encodes a record into exactly `size()` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented in the fixed
    /// layout (for example a text field that is too long).
    fn encode(&self, record: &Self::Record) -> CodecResult<Vec<u8>>;

    /// Decodes a record from exactly `size()` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if `bytes` has the wrong length or does not hold a
    /// valid record.
    fn decode(&self, bytes: &[u8]) -> CodecResult<Self::Record>;
}

/// Checks that `bytes` is exactly `expected` long.
pub(crate) fn check_len(bytes: &[u8], expected: usize) -> CodecResult<()> {
    if bytes.len() == expected {
        Ok(())
    } else {
        Err(CodecError::LengthMismatch {
            expected,
            actual: bytes.len(),
        })
    }
}
