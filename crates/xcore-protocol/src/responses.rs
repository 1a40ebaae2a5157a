//! Canned answers sent back for recognized commands.

use crate::error::{ProtocolError, ProtocolResult};

/// Static answer blob: `[len, command echo.., data..]`.
///
/// The first byte is the number of bytes that follow it. Answers never depend
/// on the request arguments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnswerPayload(&'static [u8]);

impl AnswerPayload {
    /// Serial number "3010001 00".
    pub const GET_SN: AnswerPayload = AnswerPayload(&[
        0x0C, 0x00, 0x00, 0x33, 0x30, 0x31, 0x30, 0x30, 0x30, 0x31, 0x30, 0x30, 0x00,
    ]);

    /// Part number "3XCORE_LA", zero padded.
    pub const GET_PN: AnswerPayload = AnswerPayload(&[
        0x17, 0x00, 0x01, 0x33, 0x58, 0x43, 0x4F, 0x52, 0x45, 0x5F, 0x4C, 0x41, 0x00, 0x00, 0x00,
        0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00,
    ]);

    /// Matrix width 640 (u16 little-endian).
    pub const GET_MATRIX_WIDTH: AnswerPayload = AnswerPayload(&[0x04, 0x00, 0x02, 0x80, 0x02]);

    /// Matrix height 512 (u16 little-endian).
    pub const GET_MATRIX_HEIGHT: AnswerPayload = AnswerPayload(&[0x04, 0x00, 0x03, 0x00, 0x02]);

    /// Zoom factor 1.
    pub const GET_ZOOM: AnswerPayload = AnswerPayload(&[0x03, 0x00, 0x2A, 0x01]);

    /// Palette index 0.
    pub const GET_PALETTE: AnswerPayload = AnswerPayload(&[0x03, 0x00, 0x2D, 0x00]);

    /// Wrap a raw blob. The blob is checked when it is framed.
    pub const fn from_static(bytes: &'static [u8]) -> Self {
        AnswerPayload(bytes)
    }

    /// The full blob including the leading length byte.
    pub fn as_bytes(&self) -> &'static [u8] {
        self.0
    }

    /// Bytes following the length byte.
    pub fn data(&self) -> &'static [u8] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// Length declared by the leading byte, checked against the data.
    pub fn declared_len(&self) -> ProtocolResult<usize> {
        let declared = *self.0.first().ok_or(ProtocolError::EmptyPayload)? as usize;
        let actual = self.data().len();
        if declared != actual {
            return Err(ProtocolError::PayloadLengthMismatch { declared, actual });
        }
        Ok(declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandKind;

    #[test]
    fn test_all_payloads_consistent() {
        for cmd in CommandKind::ALL {
            let payload = cmd.answer();
            let len = payload.declared_len().expect("payload length should match");
            assert_eq!(len, payload.data().len());
        }
    }

    #[test]
    fn test_payloads_echo_command() {
        for cmd in CommandKind::ALL {
            let (class, index) = cmd.code();
            assert_eq!(&cmd.answer().data()[..2], &[class, index], "{cmd}");
        }
    }

    #[test]
    fn test_part_number_text() {
        let data = AnswerPayload::GET_PN.data();
        assert_eq!(&data[2..11], b"3XCORE_LA");
        assert!(data[11..].iter().all(|&b| b == 0));
    }

    #[test]
    fn test_declared_len_mismatch() {
        let payload = AnswerPayload::from_static(&[0x05, 0x00, 0x00]);
        assert_eq!(
            payload.declared_len(),
            Err(ProtocolError::PayloadLengthMismatch { declared: 5, actual: 2 })
        );
        assert_eq!(
            AnswerPayload::from_static(&[]).declared_len(),
            Err(ProtocolError::EmptyPayload)
        );
    }
}
