//! Commands understood by the responder and their dispatch table.

use std::fmt;

use crate::constants::*;
use crate::responses::AnswerPayload;

/// Byte pattern identifying one command: `[len, class, index, 0]`.
///
/// The leading byte is the declared body length a matching frame must carry;
/// the rest is compared verbatim against the frame body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandPattern(&'static [u8]);

impl CommandPattern {
    /// Wrap a static pattern blob.
    pub const fn new(bytes: &'static [u8]) -> Self {
        CommandPattern(bytes)
    }

    /// Declared body length of a matching frame.
    pub fn body_len(&self) -> usize {
        self.0.first().copied().unwrap_or(0) as usize
    }

    /// Body bytes a matching frame must carry.
    pub fn body(&self) -> &'static [u8] {
        self.0.get(1..).unwrap_or(&[])
    }

    /// Whether a frame body matches this pattern exactly.
    pub fn matches(&self, body: &[u8]) -> bool {
        body.len() == self.body_len() && body == self.body()
    }
}

/// Commands the stub answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// Serial number query.
    GetSn,
    /// Part number query.
    GetPn,
    /// Sensor matrix width query.
    GetMatrixWidth,
    /// Sensor matrix height query.
    GetMatrixHeight,
    /// Digital zoom query.
    GetZoom,
    /// Color palette query.
    GetPalette,
}

impl CommandKind {
    /// Every command in registration order. Dispatch scans this front to back.
    pub const ALL: [CommandKind; 6] = [
        CommandKind::GetSn,
        CommandKind::GetPn,
        CommandKind::GetMatrixWidth,
        CommandKind::GetMatrixHeight,
        CommandKind::GetZoom,
        CommandKind::GetPalette,
    ];

    /// Command code as `(class, index)`.
    pub const fn code(self) -> (u8, u8) {
        match self {
            CommandKind::GetSn => (CLASS_DEVICE, CMD_GET_SN),
            CommandKind::GetPn => (CLASS_DEVICE, CMD_GET_PN),
            CommandKind::GetMatrixWidth => (CLASS_DEVICE, CMD_GET_MATRIX_WIDTH),
            CommandKind::GetMatrixHeight => (CLASS_DEVICE, CMD_GET_MATRIX_HEIGHT),
            CommandKind::GetZoom => (CLASS_DEVICE, CMD_GET_ZOOM),
            CommandKind::GetPalette => (CLASS_DEVICE, CMD_GET_PALETTE),
        }
    }

    /// Pattern a request frame must match to select this command.
    pub const fn pattern(self) -> CommandPattern {
        match self {
            CommandKind::GetSn => CommandPattern::new(&[3, CLASS_DEVICE, CMD_GET_SN, 0]),
            CommandKind::GetPn => CommandPattern::new(&[3, CLASS_DEVICE, CMD_GET_PN, 0]),
            CommandKind::GetMatrixWidth => {
                CommandPattern::new(&[3, CLASS_DEVICE, CMD_GET_MATRIX_WIDTH, 0])
            }
            CommandKind::GetMatrixHeight => {
                CommandPattern::new(&[3, CLASS_DEVICE, CMD_GET_MATRIX_HEIGHT, 0])
            }
            CommandKind::GetZoom => CommandPattern::new(&[3, CLASS_DEVICE, CMD_GET_ZOOM, 0]),
            CommandKind::GetPalette => CommandPattern::new(&[3, CLASS_DEVICE, CMD_GET_PALETTE, 0]),
        }
    }

    /// Canned answer for this command.
    pub const fn answer(self) -> AnswerPayload {
        match self {
            CommandKind::GetSn => AnswerPayload::GET_SN,
            CommandKind::GetPn => AnswerPayload::GET_PN,
            CommandKind::GetMatrixWidth => AnswerPayload::GET_MATRIX_WIDTH,
            CommandKind::GetMatrixHeight => AnswerPayload::GET_MATRIX_HEIGHT,
            CommandKind::GetZoom => AnswerPayload::GET_ZOOM,
            CommandKind::GetPalette => AnswerPayload::GET_PALETTE,
        }
    }

    /// Human-readable command name.
    pub const fn name(self) -> &'static str {
        match self {
            CommandKind::GetSn => "GetSN",
            CommandKind::GetPn => "GetPN",
            CommandKind::GetMatrixWidth => "GetMatrixWidth",
            CommandKind::GetMatrixHeight => "GetMatrixHeight",
            CommandKind::GetZoom => "GetZoom",
            CommandKind::GetPalette => "GetPalette",
        }
    }
}

impl fmt::Display for CommandKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Exact-match lookup from a frame body to a command.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher {
    table: &'static [CommandKind],
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

impl Dispatcher {
    /// Dispatcher over the full command table.
    pub const fn new() -> Self {
        Dispatcher {
            table: &CommandKind::ALL,
        }
    }

    /// Dispatcher over a custom, fixed table. Scan order is slice order.
    pub const fn with_table(table: &'static [CommandKind]) -> Self {
        Dispatcher { table }
    }

    /// Find the first command whose pattern matches `body`.
    pub fn lookup(&self, body: &[u8]) -> Option<CommandKind> {
        self.table
            .iter()
            .copied()
            .find(|cmd| cmd.pattern().matches(body))
    }

    /// Commands in scan order.
    pub fn commands(&self) -> &'static [CommandKind] {
        self.table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookup_every_command() {
        let dispatcher = Dispatcher::new();
        for cmd in CommandKind::ALL {
            let (class, index) = cmd.code();
            assert_eq!(dispatcher.lookup(&[class, index, 0]), Some(cmd));
        }
    }

    #[test]
    fn test_pattern_layout() {
        let pattern = CommandKind::GetZoom.pattern();
        assert_eq!(pattern.body_len(), 3);
        assert_eq!(pattern.body(), &[0x00, 0x2A, 0x00]);
    }

    #[test]
    fn test_lookup_rejects_single_byte_difference() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.lookup(&[0x00, 0xFF, 0x00]), None);
        assert_eq!(dispatcher.lookup(&[0x01, 0x00, 0x00]), None);
        assert_eq!(dispatcher.lookup(&[0x00, 0x00, 0x01]), None);
    }

    #[test]
    fn test_lookup_requires_exact_length() {
        let dispatcher = Dispatcher::new();
        assert_eq!(dispatcher.lookup(&[0x00, 0x00]), None);
        assert_eq!(dispatcher.lookup(&[0x00, 0x00, 0x00, 0x00]), None);
        assert_eq!(dispatcher.lookup(&[]), None);
    }

    #[test]
    fn test_first_match_wins() {
        static TABLE: [CommandKind; 2] = [CommandKind::GetPn, CommandKind::GetPn];
        let dispatcher = Dispatcher::with_table(&TABLE);
        assert_eq!(dispatcher.lookup(&[0x00, 0x01, 0x00]), Some(CommandKind::GetPn));
        assert_eq!(dispatcher.lookup(&[0x00, 0x00, 0x00]), None);
    }

    #[test]
    fn test_codes_are_unique() {
        for (i, a) in CommandKind::ALL.iter().enumerate() {
            for b in &CommandKind::ALL[i + 1..] {
                assert_ne!(a.code(), b.code(), "{a} and {b} share a code");
            }
        }
    }
}
