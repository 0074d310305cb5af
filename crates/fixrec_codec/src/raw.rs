//! Opaque byte codec.

use crate::error::{CodecError, CodecResult};
use crate::{check_len, RecordCodec};

/// A [`RecordCodec`] whose records are the slot bytes themselves.
///
/// Useful for tools that need to walk a store without knowing its record
/// layout, and for tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawCodec {
    size: usize,
}

impl RawCodec {
    /// Creates a codec for `size`-byte records.
    #[must_use]
    pub const fn new(size: usize) -> Self {
        Self { size }
    }
}

impl RecordCodec for RawCodec {
    type Record = Vec<u8>;

    fn size(&self) -> usize {
        self.size
    }

    fn encode(&self, record: &Vec<u8>) -> CodecResult<Vec<u8>> {
        if record.len() != self.size {
            return Err(CodecError::LengthMismatch {
                expected: self.size,
                actual: record.len(),
            });
        }
        Ok(record.clone())
    }

    fn decode(&self, bytes: &[u8]) -> CodecResult<Vec<u8>> {
        check_len(bytes, self.size)?;
        Ok(bytes.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raw_passes_bytes_through() {
        let codec = RawCodec::new(3);
        assert_eq!(codec.encode(&vec![1, 2, 3]).unwrap(), vec![1, 2, 3]);
        assert_eq!(codec.decode(&[4, 5, 6]).unwrap(), vec![4, 5, 6]);
    }

    #[test]
    fn raw_rejects_wrong_length() {
        let codec = RawCodec::new(3);
        assert!(codec.encode(&vec![1]).is_err());
        assert!(codec.decode(&[1, 2, 3, 4]).is_err());
    }
}
