//! Fixed-width field writer and reader.

use crate::error::{CodecError, CodecResult};
use bytes::{Buf, BufMut, BytesMut};

/// Builds a record buffer one fixed-width field at a time.
///
/// Numbers are written big-endian. Text is written into a field of a
/// declared byte width and padded with NULs.
#[derive(Debug, Default)]
pub struct FieldWriter {
    buf: BytesMut,
}

impl FieldWriter {
    /// Creates a writer sized for a record of `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Writes a `u8`.
    pub fn put_u8(&mut self, v: u8) {
        self.buf.put_u8(v);
    }

    /// Writes a big-endian `u16`.
    pub fn put_u16(&mut self, v: u16) {
        self.buf.put_u16(v);
    }

    /// Writes a big-endian `u32`.
    pub fn put_u32(&mut self, v: u32) {
        self.buf.put_u32(v);
    }

    /// Writes a big-endian `u64`.
    pub fn put_u64(&mut self, v: u64) {
        self.buf.put_u64(v);
    }

    /// Writes a big-endian `i32`.
    pub fn put_i32(&mut self, v: i32) {
        self.buf.put_i32(v);
    }

    /// Writes a big-endian `i64`.
    pub fn put_i64(&mut self, v: i64) {
        self.buf.put_i64(v);
    }

    /// Writes a big-endian IEEE-754 `f64`.
    pub fn put_f64(&mut self, v: f64) {
        self.buf.put_f64(v);
    }

    /// Writes `n` zero bytes.
    pub fn put_zeros(&mut self, n: usize) {
        self.buf.put_bytes(0, n);
    }

    /// Writes `bytes` into a field of `width` bytes, zero-padding the rest.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldTooLong`] if `bytes` is wider than the field.
    pub fn put_padded(&mut self, bytes: &[u8], width: usize) -> CodecResult<()> {
        if bytes.len() > width {
            return Err(CodecError::FieldTooLong {
                len: bytes.len(),
                width,
            });
        }
        self.buf.put_slice(bytes);
        self.put_zeros(width - bytes.len());
        Ok(())
    }

    /// Writes UTF-8 text into a field of `width` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::FieldTooLong`] if the encoded text is wider
    /// than the field.
    pub fn put_str(&mut self, s: &str, width: usize) -> CodecResult<()> {
        self.put_padded(s.as_bytes(), width)
    }

    /// Consumes the writer, returning the bytes written.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}

/// Reads fixed-width fields from a record buffer.
///
/// Every getter checks the remaining length first, so a short buffer
/// surfaces as [`CodecError::UnexpectedEof`] instead of a panic.
#[derive(Debug)]
pub struct FieldReader<'a> {
    buf: &'a [u8],
}

impl<'a> FieldReader<'a> {
    /// Creates a reader over `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    /// Number of unread bytes.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.remaining()
    }

    fn need(&self, n: usize) -> CodecResult<()> {
        if self.buf.remaining() < n {
            Err(CodecError::UnexpectedEof)
        } else {
            Ok(())
        }
    }

    /// Reads a `u8`.
    pub fn get_u8(&mut self) -> CodecResult<u8> {
        self.need(1)?;
        Ok(self.buf.get_u8())
    }

    /// Reads a big-endian `u16`.
    pub fn get_u16(&mut self) -> CodecResult<u16> {
        self.need(2)?;
        Ok(self.buf.get_u16())
    }

    /// Reads a big-endian `u32`.
    pub fn get_u32(&mut self) -> CodecResult<u32> {
        self.need(4)?;
        Ok(self.buf.get_u32())
    }

    /// Reads a big-endian `u64`.
    pub fn get_u64(&mut self) -> CodecResult<u64> {
        self.need(8)?;
        Ok(self.buf.get_u64())
    }

    /// Reads a big-endian `i32`.
    pub fn get_i32(&mut self) -> CodecResult<i32> {
        self.need(4)?;
        Ok(self.buf.get_i32())
    }

    /// Reads a big-endian `i64`.
    pub fn get_i64(&mut self) -> CodecResult<i64> {
        self.need(8)?;
        Ok(self.buf.get_i64())
    }

    /// Reads a big-endian IEEE-754 `f64`.
    pub fn get_f64(&mut self) -> CodecResult<f64> {
        self.need(8)?;
        Ok(self.buf.get_f64())
    }

    /// Reads `n` raw bytes.
    pub fn get_bytes(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        self.need(n)?;
        let (head, tail) = self.buf.split_at(n);
        self.buf = tail;
        Ok(head)
    }

    /// Skips `n` bytes.
    pub fn skip(&mut self, n: usize) -> CodecResult<()> {
        self.need(n)?;
        self.buf.advance(n);
        Ok(())
    }

    /// Reads a text field of `width` bytes, trimming trailing NULs and
    /// whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::InvalidUtf8`] if the trimmed field is not UTF-8.
    pub fn get_str(&mut self, width: usize) -> CodecResult<String> {
        let raw = self.get_bytes(width)?;
        let text = std::str::from_utf8(raw).map_err(|_| CodecError::InvalidUtf8)?;
        Ok(text
            .trim_end_matches(|c: char| c == '\0' || c.is_whitespace())
            .to_string())
    }
}
