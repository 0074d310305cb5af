//! Codec for hand-laid-out fixed records.

use crate::error::{CodecError, CodecResult};
use crate::field::{FieldReader, FieldWriter};
use crate::{check_len, RecordCodec};
use std::fmt;
use std::marker::PhantomData;

/// A record type with an explicit fixed-width field layout.
///
/// Nested groups are expressed by calling the nested type's
/// `write_fields`/`read_fields` from the outer implementation and adding its
/// `SIZE` to the outer one.
pub trait FixedRecord: Sized {
    /// Encoded size in bytes.
    const SIZE: usize;

    /// Writes every field, in layout order.
    ///
    /// # Errors
    ///
    /// Returns an error if a field value does not fit its width.
    fn write_fields(&self, w: &mut FieldWriter) -> CodecResult<()>;

    /// Reads every field, in layout order.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not hold a valid record.
    fn read_fields(r: &mut FieldReader<'_>) -> CodecResult<Self>;
}

/// A [`RecordCodec`] for any [`FixedRecord`].
pub struct FixedCodec<T> {
    _marker: PhantomData<fn() -> T>,
}

impl<T: FixedRecord> FixedCodec<T> {
    /// Creates the codec.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T: FixedRecord> Default for FixedCodec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for FixedCodec<T> {
    fn clone(&self) -> Self {
        Self {
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for FixedCodec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixedCodec")
            .field("record", &std::any::type_name::<T>())
            .finish()
    }
}

impl<T: FixedRecord> RecordCodec for FixedCodec<T> {
    type Record = T;

    fn size(&self) -> usize {
        T::SIZE
    }

    fn encode(&self, record: &T) -> CodecResult<Vec<u8>> {
        let mut w = FieldWriter::with_capacity(T::SIZE);
        record.write_fields(&mut w)?;
        if w.len() != T::SIZE {
            return Err(CodecError::encoding_failed(format!(
                "{} wrote {} bytes, layout declares {}",
                std::any::type_name::<T>(),
                w.len(),
                T::SIZE
            )));
        }
        Ok(w.into_bytes())
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<T> {
        check_len(bytes, T::SIZE)?;
        let mut r = FieldReader::new(bytes);
        let record = T::read_fields(&mut r)?;
        if r.remaining() != 0 {
            return Err(CodecError::decoding_failed(format!(
                "{} left {} bytes unread",
                std::any::type_name::<T>(),
                r.remaining()
            )));
        }
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Address {
        number: u32,
        street: String,
        state: String,
    }

    impl FixedRecord for Address {
        const SIZE: usize = 4 + 25 + 2;

        fn write_fields(&self, w: &mut FieldWriter) -> CodecResult<()> {
            w.put_u32(self.number);
            w.put_str(&self.street, 25)?;
            w.put_str(&self.state, 2)
        }

        fn read_fields(r: &mut FieldReader<'_>) -> CodecResult<Self> {
            Ok(Self {
                number: r.get_u32()?,
                street: r.get_str(25)?,
                state: r.get_str(2)?,
            })
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Person {
        id: u16,
        last_name: String,
        address: Address,
    }

    impl FixedRecord for Person {
        const SIZE: usize = 2 + 25 + Address::SIZE;

        fn write_fields(&self, w: &mut FieldWriter) -> CodecResult<()> {
            w.put_u16(self.id);
            w.put_str(&self.last_name, 25)?;
            self.address.write_fields(w)
        }

        fn read_fields(r: &mut FieldReader<'_>) -> CodecResult<Self> {
            Ok(Self {
                id: r.get_u16()?,
                last_name: r.get_str(25)?,
                address: Address::read_fields(r)?,
            })
        }
    }

    /// Declares more bytes than it writes.
    struct Liar;

    impl FixedRecord for Liar {
        const SIZE: usize = 8;

        fn write_fields(&self, w: &mut FieldWriter) -> CodecResult<()> {
            w.put_u32(1);
            Ok(())
        }

        fn read_fields(r: &mut FieldReader<'_>) -> CodecResult<Self> {
            r.get_u32()?;
            Ok(Self)
        }
    }

    fn person() -> Person {
        Person {
            id: 2,
            last_name: "Krueger".into(),
            address: Address {
                number: 666,
                street: "Elm St.".into(),
                state: "DC".into(),
            },
        }
    }

    #[test]
    fn nested_record_roundtrip() {
        let codec = FixedCodec::<Person>::new();
        assert_eq!(codec.size(), 58);

        let bytes = codec.encode(&person()).unwrap();
        assert_eq!(bytes.len(), 58);
        assert_eq!(codec.decode(&bytes).unwrap(), person());
    }

    #[test]
    fn field_overflow_is_an_encode_error() {
        let codec = FixedCodec::<Person>::new();
        let mut p = person();
        p.address.state = "DCX".into();
        assert!(matches!(
            codec.encode(&p),
            Err(CodecError::FieldTooLong { len: 3, width: 2 })
        ));
    }

    #[test]
    fn decode_rejects_wrong_length() {
        let codec = FixedCodec::<Person>::new();
        assert_eq!(
            codec.decode(&[0; 10]).unwrap_err(),
            CodecError::LengthMismatch {
                expected: 58,
                actual: 10
            }
        );
    }

    #[test]
    fn layout_mismatch_is_reported() {
        let codec = FixedCodec::<Liar>::new();
        assert!(matches!(
            codec.encode(&Liar),
            Err(CodecError::EncodingFailed { .. })
        ));
        assert!(matches!(
            codec.decode(&[0; 8]),
            Err(CodecError::DecodingFailed { .. })
        ));
    }
}
