//! Hex view of frames for diagnostic logs.

use std::fmt::Write;

/// Format `bytes` as rows of `columns` hex pairs, each prefixed with its offset.
///
/// ```text
/// 0000 : aa 03 00 00
/// 0004 : 00 ad
/// ```
pub fn hex_dump(bytes: &[u8], columns: usize) -> String {
    let columns = columns.max(1);
    let mut out = String::with_capacity(bytes.len() * 3 + 8 * (bytes.len() / columns + 1));
    for (row, chunk) in bytes.chunks(columns).enumerate() {
        if row > 0 {
            out.push('\n');
        }
        let _ = write!(out, "{:04X} :", row * columns);
        for b in chunk {
            let _ = write!(out, " {:02x}", b);
        }
    }
    if bytes.is_empty() {
        out.push_str("0000 :");
    }
    out
}
