//! Outgoing frame construction and host-side helpers.
//!
//! ```text
//! +--------+-------+------------------+----------+------+------+
//! | marker | M + 1 | payload[0..M]    | checksum | 0xEB | 0xAA |
//! +--------+-------+------------------+----------+------+------+
//! ```
//!
//! The checksum covers marker, length and payload. The length field counts
//! the payload plus the checksum byte.

use bytes::BufMut;

use crate::checksum::checksum;
use crate::constants::*;
use crate::error::{ProtocolError, ProtocolResult};
use crate::responses::AnswerPayload;

/// Direction marker stamped on a built frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    /// Device → host answer (`0x55`).
    Answer,
    /// Host → device command (`0xAA`).
    Command,
}

impl FrameKind {
    /// Marker byte for this direction.
    pub const fn marker(self) -> u8 {
        match self {
            FrameKind::Answer => ANSWER_MARKER,
            FrameKind::Command => COMMAND_MARKER,
        }
    }
}

/// Largest payload whose `M + 1` length still fits the length byte.
pub const MAX_PAYLOAD_LEN: usize = u8::MAX as usize - 1;

/// Serialize a payload into a terminated frame of `M + 5` bytes.
pub fn build_frame(payload: AnswerPayload, kind: FrameKind) -> ProtocolResult<Vec<u8>> {
    let len = payload.declared_len()?;
    if len > MAX_PAYLOAD_LEN {
        return Err(ProtocolError::PayloadTooLong {
            max: MAX_PAYLOAD_LEN,
            actual: len,
        });
    }

    let mut buf = Vec::with_capacity(len + ANSWER_OVERHEAD);
    buf.put_u8(kind.marker());
    buf.put_u8(len as u8 + 1);
    buf.put_slice(payload.data());
    let sum = checksum(&buf, len);
    buf.put_u8(sum);
    buf.put_slice(&TERMINATOR);
    Ok(buf)
}

/// Build a request frame as a host would send it: `AA N class index args.. checksum`.
pub fn encode_command(class: u8, index: u8, args: &[u8]) -> ProtocolResult<Vec<u8>> {
    let body_len = 2 + args.len();
    let max = READ_BUFFER_CAPACITY - HEADER_LEN - 1;
    if body_len > max {
        return Err(ProtocolError::PayloadTooLong {
            max,
            actual: body_len,
        });
    }

    let mut buf = Vec::with_capacity(HEADER_LEN + body_len + 1);
    buf.put_u8(COMMAND_MARKER);
    buf.put_u8(body_len as u8);
    buf.put_u8(class);
    buf.put_u8(index);
    buf.put_slice(args);
    let sum = checksum(&buf, body_len);
    buf.put_u8(sum);
    Ok(buf)
}

/// Check an answer frame and return its payload bytes.
pub fn decode_answer(frame: &[u8]) -> ProtocolResult<&[u8]> {
    if frame.len() < ANSWER_OVERHEAD {
        return Err(ProtocolError::FrameTooShort {
            expected: ANSWER_OVERHEAD,
            actual: frame.len(),
        });
    }
    if frame[0] != ANSWER_MARKER {
        return Err(ProtocolError::BadMarker {
            expected: ANSWER_MARKER,
            actual: frame[0],
        });
    }

    let declared = frame[1];
    let payload_len = (declared as usize).checked_sub(1).ok_or(ProtocolError::BadLength {
        declared,
        actual: frame.len(),
    })?;
    if frame.len() != payload_len + ANSWER_OVERHEAD {
        return Err(ProtocolError::BadLength {
            declared,
            actual: frame.len(),
        });
    }

    let expected = checksum(frame, payload_len);
    let actual = frame[HEADER_LEN + payload_len];
    if expected != actual {
        return Err(ProtocolError::ChecksumMismatch { expected, actual });
    }

    let tail = [frame[frame.len() - 2], frame[frame.len() - 1]];
    if tail != TERMINATOR {
        return Err(ProtocolError::BadTerminator(tail));
    }

    Ok(&frame[HEADER_LEN..HEADER_LEN + payload_len])
}
