//! Protocol error types.

use thiserror::Error;

/// Errors that can occur when building or checking XCore frames.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    /// Frame is too short to be valid.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Frame starts with an unexpected marker byte.
    #[error("unexpected marker: expected 0x{expected:02X}, got 0x{actual:02X}")]
    BadMarker {
        /// Marker required for this frame direction.
        expected: u8,
        /// Marker found in the frame.
        actual: u8,
    },

    /// Length field disagrees with the number of bytes in the frame.
    #[error("length field {declared} does not match frame of {actual} bytes")]
    BadLength {
        /// Value of the length field.
        declared: u8,
        /// Total frame length.
        actual: usize,
    },

    /// Checksum byte does not match the computed sum.
    #[error("checksum mismatch: computed 0x{expected:02X}, frame carries 0x{actual:02X}")]
    ChecksumMismatch {
        /// Checksum computed over the frame.
        expected: u8,
        /// Checksum byte carried by the frame.
        actual: u8,
    },

    /// Terminator bytes are missing or wrong.
    #[error("bad terminator: {0:02X?}")]
    BadTerminator([u8; 2]),

    /// Answer payload's leading length byte does not match its data.
    #[error("payload declares {declared} bytes but carries {actual}")]
    PayloadLengthMismatch {
        /// Length byte at the start of the payload.
        declared: usize,
        /// Number of data bytes following it.
        actual: usize,
    },

    /// Payload is too large to be framed.
    #[error("payload too long: maximum {max} bytes, got {actual}")]
    PayloadTooLong {
        /// Maximum allowed payload length.
        max: usize,
        /// Actual payload length.
        actual: usize,
    },

    /// Payload blob is empty (missing its length byte).
    #[error("empty payload")]
    EmptyPayload,
}

/// Result type alias for protocol operations.
pub type ProtocolResult<T> = Result<T, ProtocolError>;
