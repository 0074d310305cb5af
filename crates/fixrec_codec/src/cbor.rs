//! Serde-backed codec storing CBOR in a fixed-size slot.

use crate::error::{CodecError, CodecResult};
use crate::field::{FieldReader, FieldWriter};
use crate::{check_len, RecordCodec};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;

/// Width of the payload length prefix.
const LEN_PREFIX: usize = 2;

/// A [`RecordCodec`] for any serde type.
///
/// Each slot is laid out as:
///
/// ```text
/// [len: u16][CBOR payload: len bytes][zero padding]
/// ```
///
/// The slot size is chosen by the caller and must be large enough for the
/// biggest value that will be stored; larger values fail to encode with
/// [`CodecError::PayloadTooLarge`].
pub struct CborCodec<T> {
    size: usize,
    _marker: PhantomData<fn() -> T>,
}

impl<T> CborCodec<T> {
    /// Creates a codec with `size`-byte slots.
    #[must_use]
    pub const fn new(size: usize) -> Self {
        Self {
            size,
            _marker: PhantomData,
        }
    }

    /// Largest CBOR payload a slot can hold.
    #[must_use]
    pub const fn max_payload(&self) -> usize {
        self.size.saturating_sub(LEN_PREFIX)
    }
}

impl<T> Clone for CborCodec<T> {
    fn clone(&self) -> Self {
        Self::new(self.size)
    }
}

impl<T> fmt::Debug for CborCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CborCodec")
            .field("size", &self.size)
            .field("record", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: Serialize + DeserializeOwned> RecordCodec for CborCodec<T> {
    type Record = T;

    fn size(&self) -> usize {
        self.size
    }

    fn encode(&self, record: &T) -> CodecResult<Vec<u8>> {
        let mut payload = Vec::new();
        ciborium::ser::into_writer(record, &mut payload)
            .map_err(|e| CodecError::encoding_failed(e.to_string()))?;

        if payload.len() > self.max_payload() {
            return Err(CodecError::PayloadTooLarge {
                len: payload.len(),
                max: self.max_payload(),
            });
        }

        let mut w = FieldWriter::with_capacity(self.size);
        w.put_u16(u16::try_from(payload.len()).map_err(|_| CodecError::PayloadTooLarge {
            len: payload.len(),
            max: usize::from(u16::MAX),
        })?);
        w.put_padded(&payload, self.max_payload())?;
        Ok(w.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<T> {
        check_len(bytes, self.size)?;
        let mut r = FieldReader::new(bytes);
        let len = usize::from(r.get_u16()?);
        if len > self.max_payload() {
            return Err(CodecError::decoding_failed(format!(
                "payload length {} exceeds slot capacity {}",
                len,
                self.max_payload()
            )));
        }
        let payload = r.get_bytes(len)?;
        ciborium::de::from_reader(payload).map_err(|e| CodecError::decoding_failed(e.to_string()))
    }
}
