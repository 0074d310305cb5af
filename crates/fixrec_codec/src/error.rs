//! Error types for the codec crate.

use thiserror::Error;

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors that can occur during encoding or decoding.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Failed to encode a value.
    #[error("encoding failed: {message}")]
    EncodingFailed {
        /// Description of the encoding error.
        message: String,
    },

    /// Failed to decode bytes.
    #[error("decoding failed: {message}")]
    DecodingFailed {
        /// Description of the decoding error.
        message: String,
    },

    /// A text field does not fit its fixed width.
    #[error("field too long: {len} bytes into a {width}-byte field")]
    FieldTooLong {
        /// Encoded length of the value.
        len: usize,
        /// Width of the field.
        width: usize,
    },

    /// A serialized payload does not fit the record slot.
    #[error("payload too large: {len} bytes, slot holds at most {max}")]
    PayloadTooLarge {
        /// Encoded length of the payload.
        len: usize,
        /// Largest payload the slot can hold.
        max: usize,
    },

    /// Input to decode has the wrong length.
    #[error("length mismatch: expected {expected} bytes, got {actual}")]
    LengthMismatch {
        /// Declared record size.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// Invalid UTF-8 string.
    #[error("invalid UTF-8 string")]
    InvalidUtf8,

    /// Unexpected end of input.
    #[error("unexpected end of input")]
    UnexpectedEof,
}

impl CodecError {
    /// Create an encoding failed error.
    pub fn encoding_failed(message: impl Into<String>) -> Self {
        Self::EncodingFailed {
            message: message.into(),
        }
    }

    /// Create a decoding failed error.
    pub fn decoding_failed(message: impl Into<String>) -> Self {
        Self::DecodingFailed {
            message: message.into(),
        }
    }
}
