//! File header schema and encoding.
//!
//! Every store file starts with a header:
//!
//! ```text
//! [record_size: u16][record_count: u32][extension fields...]
//! ```
//!
//! All integers are big-endian with no padding between fields. Stores that
//! need more metadata than the two base fields describe it with a
//! [`HeaderSchema`] carrying named extension fields; the ring store adds
//! `first_index` and `last_index` this way.

use crate::error::CoreResult;
use fixrec_codec::{FieldReader, FieldWriter};

/// Size of the two base fields.
pub const BASE_HEADER_SIZE: usize = 2 + 4;

/// Width of a header extension field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldWidth {
    /// Unsigned 16-bit.
    U16,
    /// Unsigned 32-bit.
    U32,
    /// Unsigned 64-bit.
    U64,
}

impl FieldWidth {
    /// Encoded width in bytes.
    #[must_use]
    pub const fn bytes(self) -> usize {
        match self {
            Self::U16 => 2,
            Self::U32 => 4,
            Self::U64 => 8,
        }
    }
}

/// A named extension field appended after the base header fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeaderField {
    /// Field name, for diagnostics and lookup.
    pub name: &'static str,
    /// Encoded width.
    pub width: FieldWidth,
}

/// Describes the header layout: the base fields plus extension fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderSchema {
    extensions: Vec<HeaderField>,
}

impl HeaderSchema {
    /// The base schema: `record_size` and `record_count` only.
    #[must_use]
    pub fn base() -> Self {
        Self::default()
    }

    /// Appends an extension field.
    #[must_use]
    pub fn with_field(mut self, name: &'static str, width: FieldWidth) -> Self {
        self.extensions.push(HeaderField { name, width });
        self
    }

    /// The extension fields, in layout order.
    #[must_use]
    pub fn extensions(&self) -> &[HeaderField] {
        &self.extensions
    }

    /// Position of the extension field called `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.extensions.iter().position(|f| f.name == name)
    }

    /// Total encoded header size in bytes.
    #[must_use]
    pub fn byte_size(&self) -> usize {
        BASE_HEADER_SIZE
            + self
                .extensions
                .iter()
                .map(|f| f.width.bytes())
                .sum::<usize>()
    }

    /// The header a brand new file starts with: every field zero.
    #[must_use]
    pub fn zeroed(&self) -> Header {
        Header {
            record_size: 0,
            record_count: 0,
            extension: vec![0; self.extensions.len()],
        }
    }

    /// Encodes `header` into exactly [`byte_size`](Self::byte_size) bytes.
    ///
    /// Extension values wider than their field saturate at the field maximum.
    #[must_use]
    pub fn encode(&self, header: &Header) -> Vec<u8> {
        let mut w = FieldWriter::with_capacity(self.byte_size());
        w.put_u16(header.record_size);
        w.put_u32(header.record_count);
        for (field, &value) in self.extensions.iter().zip(&header.extension) {
            match field.width {
                FieldWidth::U16 => w.put_u16(u16::try_from(value).unwrap_or(u16::MAX)),
                FieldWidth::U32 => w.put_u32(u32::try_from(value).unwrap_or(u32::MAX)),
                FieldWidth::U64 => w.put_u64(value),
            }
        }
        w.into_bytes()
    }

    /// Decodes a header from exactly [`byte_size`](Self::byte_size) bytes.
    ///
    /// # Errors
    ///
    /// Returns a codec error if `bytes` is shorter than the schema.
    pub fn decode(&self, bytes: &[u8]) -> CoreResult<Header> {
        let mut r = FieldReader::new(bytes);
        let record_size = r.get_u16()?;
        let record_count = r.get_u32()?;
        let extension = self
            .extensions
            .iter()
            .map(|field| -> CoreResult<u64> {
                Ok(match field.width {
                    FieldWidth::U16 => u64::from(r.get_u16()?),
                    FieldWidth::U32 => u64::from(r.get_u32()?),
                    FieldWidth::U64 => r.get_u64()?,
                })
            })
            .collect::<CoreResult<Vec<_>>>()?;

        Ok(Header {
            record_size,
            record_count,
            extension,
        })
    }
}

/// In-memory copy of a store header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Byte size of one record slot.
    pub record_size: u16,
    /// Number of allocated record slots.
    pub record_count: u32,
    extension: Vec<u64>,
}

impl Header {
    /// Value of the extension field at `index`, or 0 if there is none.
    #[must_use]
    pub fn extension(&self, index: usize) -> u64 {
        self.extension.get(index).copied().unwrap_or(0)
    }

    /// Sets the extension field at `index`. Out-of-schema indices are ignored.
    pub fn set_extension(&mut self, index: usize, value: u64) {
        if let Some(slot) = self.extension.get_mut(index) {
            *slot = value;
        }
    }

    /// All extension values, in layout order.
    #[must_use]
    pub fn extensions(&self) -> &[u64] {
        &self.extension
    }
}
