//! Incoming frame reassembly and validation.
//!
//! Command frames arrive as:
//!
//! ```text
//! +------+---+------------------------------+----------+
//! | 0xAA | N | body[0..N] (class, index, ..) | checksum |
//! +------+---+------------------------------+----------+
//! ```
//!
//! [`FrameReader`] assembles them in two phases: first the 2-byte header,
//! then exactly `N + 1` more bytes. Bytes that do not start with the command
//! marker are dropped as soon as they are read. Anything past the current frame stays in
//! the channel for the next read, so back-to-back frames never share the
//! buffer.

use std::io::{self, Read};

use crate::checksum::checksum;
use crate::constants::*;
use crate::error::{ProtocolError, ProtocolResult};

/// Fixed-capacity buffer holding the frame being assembled.
#[derive(Debug, Clone)]
pub struct ReadBuffer {
    buf: [u8; READ_BUFFER_CAPACITY],
    len: usize,
}

impl Default for ReadBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl ReadBuffer {
    /// Create an empty buffer.
    pub const fn new() -> Self {
        ReadBuffer {
            buf: [0; READ_BUFFER_CAPACITY],
            len: 0,
        }
    }

    /// Number of bytes accumulated.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether nothing has been accumulated.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Accumulated bytes.
    pub fn as_slice(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Drop everything accumulated.
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Read at most `want` bytes from `src`, appending them.
    fn fill_from<R: Read + ?Sized>(&mut self, src: &mut R, want: usize) -> io::Result<usize> {
        let end = (self.len + want).min(READ_BUFFER_CAPACITY);
        let n = src.read(&mut self.buf[self.len..end])?;
        self.len += n;
        Ok(n)
    }
}

/// Which phase of a frame the reader is in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderState {
    /// Collecting the marker and length bytes.
    Idle,
    /// Header accepted; waiting for body and checksum bytes.
    AwaitingBody {
        /// Bytes still missing.
        remaining: usize,
    },
}

/// Result of one read step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadProgress<T> {
    /// No frame completed; partial state (if any) is kept.
    Pending,
    /// Bytes without a leading command marker were dropped.
    Discarded {
        /// Number of bytes dropped.
        bytes: usize,
    },
    /// Declared length does not fit the buffer; the header was dropped.
    Overflow {
        /// Length byte of the dropped header.
        declared: u8,
    },
    /// A frame completed and was handed to the callback.
    Frame(T),
}

/// Two-phase incremental frame assembler.
#[derive(Debug, Clone, Default)]
pub struct FrameReader {
    buffer: ReadBuffer,
    remaining: usize,
}

impl FrameReader {
    /// Create an idle reader with an empty buffer.
    pub const fn new() -> Self {
        FrameReader {
            buffer: ReadBuffer::new(),
            remaining: 0,
        }
    }

    /// Current phase.
    pub fn state(&self) -> ReaderState {
        if self.buffer.len() >= HEADER_LEN {
            ReaderState::AwaitingBody {
                remaining: self.remaining,
            }
        } else {
            ReaderState::Idle
        }
    }

    /// Bytes accumulated for the frame in progress.
    pub fn buffered(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Return to idle, dropping any partial frame.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.remaining = 0;
    }

    /// Perform one read from `src` and advance the state machine.
    ///
    /// When the read completes a frame, `on_frame` sees the full frame
    /// (header through checksum) and the reader is reset afterwards, whatever
    /// the callback decided. Read errors leave the partial frame untouched.
    pub fn read_step<R, F, T>(&mut self, src: &mut R, on_frame: F) -> io::Result<ReadProgress<T>>
    where
        R: Read + ?Sized,
        F: FnOnce(&[u8]) -> T,
    {
        match self.state() {
            ReaderState::Idle => self.read_header(src),
            ReaderState::AwaitingBody { remaining } => {
                let n = self.buffer.fill_from(src, remaining)?;
                self.remaining -= n;
                if self.remaining > 0 {
                    log::trace!("partial body: {} byte(s) still missing", self.remaining);
                    return Ok(ReadProgress::Pending);
                }
                let result = on_frame(self.buffer.as_slice());
                self.reset();
                Ok(ReadProgress::Frame(result))
            }
        }
    }

    fn read_header<R, T>(&mut self, src: &mut R) -> io::Result<ReadProgress<T>>
    where
        R: Read + ?Sized,
    {
        self.buffer.fill_from(src, HEADER_LEN - self.buffer.len())?;
        let header = self.buffer.as_slice();
        match header.first() {
            None => return Ok(ReadProgress::Pending),
            Some(&marker) if marker != COMMAND_MARKER => {
                let bytes = header.len();
                log::trace!("dropping {:02X?} without command marker", header);
                self.reset();
                return Ok(ReadProgress::Discarded { bytes });
            }
            Some(_) if header.len() < HEADER_LEN => return Ok(ReadProgress::Pending),
            Some(_) => {}
        }

        let declared = header[1];
        let total = HEADER_LEN + declared as usize + 1;
        if total > READ_BUFFER_CAPACITY {
            log::debug!(
                "frame of {} bytes exceeds {} byte buffer, dropping header",
                total,
                READ_BUFFER_CAPACITY
            );
            self.reset();
            return Ok(ReadProgress::Overflow { declared });
        }

        self.remaining = declared as usize + 1;
        Ok(ReadProgress::Pending)
    }
}

/// Check a complete command frame and return its body.
///
/// The checksum byte must equal the sum of marker, length and body. Nothing
/// after the checksum is looked at.
pub fn validate_frame(frame: &[u8]) -> ProtocolResult<&[u8]> {
    if frame.len() < HEADER_LEN + 1 {
        return Err(ProtocolError::FrameTooShort {
            expected: HEADER_LEN + 1,
            actual: frame.len(),
        });
    }
    if frame[0] != COMMAND_MARKER {
        return Err(ProtocolError::BadMarker {
            expected: COMMAND_MARKER,
            actual: frame[0],
        });
    }

    let declared = frame[1];
    let body_len = declared as usize;
    if frame.len() < HEADER_LEN + body_len + 1 {
        return Err(ProtocolError::BadLength {
            declared,
            actual: frame.len(),
        });
    }

    let expected = checksum(frame, body_len);
    let actual = frame[HEADER_LEN + body_len];
    if expected != actual {
        return Err(ProtocolError::ChecksumMismatch { expected, actual });
    }
    Ok(&frame[HEADER_LEN..HEADER_LEN + body_len])
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Feed `chunks` one read at a time, collecting completed frames.
    fn feed(reader: &mut FrameReader, chunks: &[&[u8]]) -> Vec<Vec<u8>> {
        let mut frames = Vec::new();
        for chunk in chunks {
            let mut src: &[u8] = chunk;
            while !src.is_empty() {
                if let ReadProgress::Frame(f) = reader.read_step(&mut src, |f| f.to_vec()).unwrap() {
                    frames.push(f);
                }
            }
        }
        frames
    }

    const GET_SN: [u8; 6] = [0xAA, 0x03, 0x00, 0x00, 0x00, 0xAD];

    #[test]
    fn test_whole_frame() {
        let mut reader = FrameReader::new();
        let frames = feed(&mut reader, &[&GET_SN]);
        assert_eq!(frames, vec![GET_SN.to_vec()]);
        assert_eq!(reader.state(), ReaderState::Idle);
        assert!(reader.buffered().is_empty());
    }

    #[test]
    fn test_header_split() {
        let mut reader = FrameReader::new();
        let mut src: &[u8] = &GET_SN[..1];
        let progress = reader.read_step(&mut src, |_| ()).unwrap();
        assert_eq!(progress, ReadProgress::Pending);
        assert_eq!(reader.state(), ReaderState::Idle);
        assert_eq!(reader.buffered(), &[0xAA]);

        let frames = feed(&mut reader, &[&GET_SN[1..]]);
        assert_eq!(frames, vec![GET_SN.to_vec()]);
    }

    #[test]
    fn test_body_split_keeps_state() {
        let mut reader = FrameReader::new();
        feed(&mut reader, &[&GET_SN[..3]]);
        assert_eq!(reader.state(), ReaderState::AwaitingBody { remaining: 3 });
        feed(&mut reader, &[&GET_SN[3..4]]);
        assert_eq!(reader.state(), ReaderState::AwaitingBody { remaining: 2 });
        let frames = feed(&mut reader, &[&GET_SN[4..]]);
        assert_eq!(frames.len(), 1);
    }

    #[test]
    fn test_back_to_back_frames() {
        let mut reader = FrameReader::new();
        let mut stream = GET_SN.to_vec();
        stream.extend_from_slice(&GET_SN);
        let frames = feed(&mut reader, &[&stream]);
        assert_eq!(frames.len(), 2);
    }

    #[test]
    fn test_reads_only_what_frame_needs() {
        let mut reader = FrameReader::new();
        let mut stream = GET_SN.to_vec();
        stream.extend_from_slice(&[0xAA, 0x03]);
        let mut src: &[u8] = &stream;

        assert_eq!(reader.read_step(&mut src, |_| ()).unwrap(), ReadProgress::Pending);
        assert_eq!(reader.read_step(&mut src, |_| ()).unwrap(), ReadProgress::Frame(()));
        assert_eq!(src, &[0xAA, 0x03]);
    }

    #[test]
    fn test_discards_non_marker_bytes() {
        let mut reader = FrameReader::new();
        let mut src: &[u8] = &[0x12, 0x34];
        assert_eq!(
            reader.read_step(&mut src, |_| ()).unwrap(),
            ReadProgress::Discarded { bytes: 2 }
        );
        assert!(reader.buffered().is_empty());
    }

    #[test]
    fn test_lone_stray_byte_is_dropped_at_once() {
        let mut reader = FrameReader::new();
        let mut src: &[u8] = &[0x7F];
        assert_eq!(
            reader.read_step(&mut src, |_| ()).unwrap(),
            ReadProgress::Discarded { bytes: 1 }
        );
        assert!(reader.buffered().is_empty());
        assert_eq!(reader.state(), ReaderState::Idle);
    }

    #[test]
    fn test_stray_byte_does_not_eat_next_frame() {
        let mut reader = FrameReader::new();
        let frames = feed(&mut reader, &[&[0x7F], &GET_SN]);
        assert_eq!(frames, vec![GET_SN.to_vec()]);
    }

    #[test]
    fn test_trailing_terminator_is_dropped_as_a_pair() {
        let mut reader = FrameReader::new();
        let mut stream = GET_SN.to_vec();
        stream.extend_from_slice(&[0xEB, 0xAA]);
        stream.extend_from_slice(&GET_SN);
        let frames = feed(&mut reader, &[&stream]);
        assert_eq!(frames, vec![GET_SN.to_vec(), GET_SN.to_vec()]);
    }

    #[test]
    fn test_overflow_resets() {
        let mut reader = FrameReader::new();
        let mut src: &[u8] = &[0xAA, 0xFE, 0x00];
        assert_eq!(
            reader.read_step(&mut src, |_| ()).unwrap(),
            ReadProgress::Overflow { declared: 0xFE }
        );
        assert_eq!(reader.state(), ReaderState::Idle);
        assert!(reader.buffered().is_empty());
    }

    #[test]
    fn test_largest_frame_fits() {
        let mut reader = FrameReader::new();
        let mut src: &[u8] = &[0xAA, 0xFD];
        assert_eq!(reader.read_step(&mut src, |_| ()).unwrap(), ReadProgress::Pending);
        assert_eq!(reader.state(), ReaderState::AwaitingBody { remaining: 0xFE });
    }

    #[test]
    fn test_read_error_keeps_partial_frame() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::Other, "line noise"))
            }
        }

        let mut reader = FrameReader::new();
        feed(&mut reader, &[&GET_SN[..4]]);
        assert!(reader.read_step(&mut Failing, |_| ()).is_err());
        assert_eq!(reader.buffered(), &GET_SN[..4]);
    }

    #[test]
    fn test_validate_frame() {
        assert_eq!(validate_frame(&GET_SN), Ok(&GET_SN[2..5]));

        let mut bad = GET_SN;
        bad[5] = 0xAE;
        assert_eq!(
            validate_frame(&bad),
            Err(ProtocolError::ChecksumMismatch { expected: 0xAD, actual: 0xAE })
        );
    }

    #[test]
    fn test_validate_ignores_terminator() {
        let mut frame = GET_SN.to_vec();
        frame.extend_from_slice(&[0x00, 0x11]);
        assert!(validate_frame(&frame).is_ok());
    }

    #[test]
    fn test_validate_short_frames() {
        assert!(matches!(
            validate_frame(&[0xAA, 0x03]),
            Err(ProtocolError::FrameTooShort { .. })
        ));
        assert!(matches!(
            validate_frame(&[0xAA, 0x03, 0x00, 0x00]),
            Err(ProtocolError::BadLength { .. })
        ));
    }
}
