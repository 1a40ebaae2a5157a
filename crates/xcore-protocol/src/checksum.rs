//! 8-bit wraparound checksum shared by both frame directions.

use crate::constants::HEADER_LEN;

/// Compute the frame checksum.
///
/// Sums, modulo 256, every byte from the marker through the end of the
/// declared body: indices `0..=declared_body_len + 1`. Bytes past that span
/// (the checksum itself, terminators, a following frame) never contribute.
/// A slice shorter than the span is summed as far as it goes.
pub fn checksum(bytes: &[u8], declared_body_len: usize) -> u8 {
    let span = (HEADER_LEN + declared_body_len).min(bytes.len());
    bytes[..span].iter().fold(0u8, |acc, &b| acc.wrapping_add(b))
}
