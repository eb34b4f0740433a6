//! Error types for numpress encoding and decoding.

/// Errors that can occur while encoding a sample sequence
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum EncodeError {
    /// The fixed point must be a finite, strictly positive number
    #[error("Invalid fixed point: {0} (must be finite and > 0)")]
    InvalidFixedPoint(f64),

    /// A value lies outside the codec's domain (negative, NaN or infinite)
    #[error("Value {value} at index {index} is outside the codec domain")]
    InvalidDomain {
        /// Position of the offending value in the input
        index: usize,
        /// The offending value
        value: f64,
    },

    /// A quantized value does not fit the integer width of the wire format
    #[error("Value {value} at index {index} overflows the encoded integer range")]
    Overflow {
        /// Position of the offending value in the input
        index: usize,
        /// The offending value
        value: f64,
    },
}

/// Errors that can occur while decoding an encoded byte buffer
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
pub enum DecodeError {
    /// The buffer ends before the fixed header does
    #[error("Truncated header: expected at least {expected} bytes, got {actual}")]
    TruncatedHeader {
        /// Minimum number of bytes required
        expected: usize,
        /// Number of bytes supplied
        actual: usize,
    },

    /// The nibble stream or value body is malformed
    #[error("Corrupt stream at byte {offset}: {reason}")]
    CorruptStream {
        /// Byte offset at which the corruption was detected
        offset: usize,
        /// Short description of the inconsistency
        reason: &'static str,
    },

    /// The stored fixed point cannot be divided out
    #[error("Invalid fixed point in header: {0}")]
    InvalidFixedPoint(f64),
}

impl DecodeError {
    pub(crate) fn corrupt(offset: usize, reason: &'static str) -> Self {
        Self::CorruptStream { offset, reason }
    }
}
