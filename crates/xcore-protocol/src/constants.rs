//! Protocol constants
//!
//! Marker, terminator and command code values used on the XCore serial link.

// ============================================================================
// Framing
// ============================================================================

/// Marker byte that opens every command frame (host → device).
pub const COMMAND_MARKER: u8 = 0xAA;
/// Marker byte that opens every answer frame (device → host).
pub const ANSWER_MARKER: u8 = 0x55;
/// Two-byte suffix appended to every outgoing frame.
pub const TERMINATOR: [u8; 2] = [0xEB, 0xAA];

/// Marker plus length byte.
pub const HEADER_LEN: usize = 2;
/// Capacity of the incoming frame buffer.
pub const READ_BUFFER_CAPACITY: usize = 256;
/// Bytes an outgoing frame adds around its payload: marker, length, checksum and terminator.
pub const ANSWER_OVERHEAD: usize = 5;

// ============================================================================
// Command Codes (class, index)
// ============================================================================

/// Command class for device information queries.
pub const CLASS_DEVICE: u8 = 0x00;

/// Get the serial number.
pub const CMD_GET_SN: u8 = 0x00;
/// Get the part number.
pub const CMD_GET_PN: u8 = 0x01;
/// Get the sensor matrix width.
pub const CMD_GET_MATRIX_WIDTH: u8 = 0x02;
/// Get the sensor matrix height.
pub const CMD_GET_MATRIX_HEIGHT: u8 = 0x03;
/// Get the digital zoom factor.
pub const CMD_GET_ZOOM: u8 = 0x2A;
/// Get the active color palette.
pub const CMD_GET_PALETTE: u8 = 0x2D;
