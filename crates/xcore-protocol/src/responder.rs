//! Responder engine: read, validate, dispatch and answer over one channel.
//!
//! A [`Responder`] owns the frame buffer for exactly one channel. Each call to
//! [`Responder::service`] handles a single readiness notification: one channel
//! read and at most one parse, validate, dispatch and reply cycle. Nothing is
//! ever sent back for a frame that fails validation or matches no command.

use std::fmt;
use std::io::{self, Read, Write};

use crate::commands::{CommandKind, Dispatcher};
use crate::dump::hex_dump;
use crate::error::ProtocolError;
use crate::frame::{validate_frame, FrameReader, ReadProgress};
use crate::packet::{build_frame, FrameKind};

/// Duplex byte channel the responder talks over.
///
/// A read returning `Ok(0)` means "nothing available right now"; the end of
/// the stream is signalled separately with [`ChannelEvent::HangUp`].
pub trait Channel: Read + Write {}

impl<T: Read + Write + ?Sized> Channel for T {}

/// Readiness notification delivered to the responder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelEvent {
    /// Bytes are waiting to be read.
    DataAvailable,
    /// Priority data is waiting; handled like ordinary data.
    Urgent,
    /// The peer went away.
    HangUp,
}

/// What happened to a frame (or to bytes that never became one).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Bytes that could not start a frame were dropped.
    Discarded {
        /// Number of bytes dropped.
        bytes: usize,
    },
    /// Declared length did not fit the read buffer.
    Overflow {
        /// Offending length byte.
        declared: u8,
    },
    /// Checksum byte did not match.
    ChecksumMismatch {
        /// Checksum computed over the frame.
        expected: u8,
        /// Checksum byte the frame carried.
        actual: u8,
    },
    /// Valid frame whose body matched no command.
    Unrecognized {
        /// `(class, index)` when the body was long enough to carry one.
        code: Option<(u8, u8)>,
    },
    /// A command was recognized and its answer handed to the channel.
    Answered {
        /// Command that fired.
        command: CommandKind,
        /// Whether the reply was written and flushed without error.
        replied: bool,
    },
}

impl fmt::Display for FrameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FrameOutcome::Discarded { bytes } => write!(f, "discarded {} byte(s) without marker", bytes),
            FrameOutcome::Overflow { declared } => {
                write!(f, "declared length {} overflows read buffer", declared)
            }
            FrameOutcome::ChecksumMismatch { expected, actual } => write!(
                f,
                "checksum mismatch (computed 0x{:02X}, got 0x{:02X})",
                expected, actual
            ),
            FrameOutcome::Unrecognized { code: Some((class, index)) } => {
                write!(f, "unrecognized command {:02X}:{:02X}", class, index)
            }
            FrameOutcome::Unrecognized { code: None } => write!(f, "unrecognized command (short body)"),
            FrameOutcome::Answered { command, replied: true } => write!(f, "answered {}", command),
            FrameOutcome::Answered { command, replied: false } => {
                write!(f, "answer to {} failed to send", command)
            }
        }
    }
}

/// Receives every [`FrameOutcome`] the responder produces.
pub trait FrameObserver {
    /// Called once per outcome, after any reply has been written.
    fn observe(&mut self, outcome: &FrameOutcome);
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl FrameObserver for NoopObserver {
    fn observe(&mut self, _outcome: &FrameOutcome) {}
}

impl FrameObserver for Vec<FrameOutcome> {
    fn observe(&mut self, outcome: &FrameOutcome) {
        self.push(outcome.clone());
    }
}

/// Result of servicing one notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Nothing finished yet.
    Pending,
    /// A parse attempt finished.
    Frame(FrameOutcome),
    /// The channel read failed; the partial frame is kept.
    ReadFailed(io::ErrorKind),
    /// Hang-up received; the responder is now detached.
    HungUp,
    /// The responder was already detached and ignored the notification.
    Detached,
}

/// Per-channel protocol engine.
#[derive(Debug)]
pub struct Responder<O = NoopObserver> {
    reader: FrameReader,
    dispatcher: Dispatcher,
    observer: O,
    attached: bool,
}

impl Default for Responder<NoopObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder<NoopObserver> {
    /// Create a responder over the full command table.
    pub fn new() -> Self {
        Self::with_observer(NoopObserver)
    }
}

impl<O: FrameObserver> Responder<O> {
    /// Create a responder reporting outcomes to `observer`.
    pub fn with_observer(observer: O) -> Self {
        Responder {
            reader: FrameReader::new(),
            dispatcher: Dispatcher::new(),
            observer,
            attached: true,
        }
    }

    /// Replace the command table.
    pub fn with_dispatcher(mut self, dispatcher: Dispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Frame reader state, for inspection.
    pub fn reader(&self) -> &FrameReader {
        &self.reader
    }

    /// The observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// The observer, mutably.
    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    /// Whether the channel is still registered for reads.
    pub fn is_attached(&self) -> bool {
        self.attached
    }

    /// Handle one readiness notification on `channel`.
    pub fn service<C: Channel + ?Sized>(&mut self, channel: &mut C, event: ChannelEvent) -> Step {
        if !self.attached {
            return Step::Detached;
        }

        match event {
            ChannelEvent::HangUp => {
                log::info!("channel hung up, no further reads");
                self.attached = false;
                self.reader.reset();
                Step::HungUp
            }
            ChannelEvent::DataAvailable | ChannelEvent::Urgent => self.read_cycle(channel),
        }
    }

    fn read_cycle<C: Channel + ?Sized>(&mut self, channel: &mut C) -> Step {
        let dispatcher = self.dispatcher;
        let progress = match self.reader.read_step(channel, |frame| classify(dispatcher, frame)) {
            Ok(progress) => progress,
            Err(e) if matches!(e.kind(), io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted) => {
                return Step::Pending;
            }
            Err(e) => {
                log::warn!("channel read failed: {}", e);
                return Step::ReadFailed(e.kind());
            }
        };

        let outcome = match progress {
            ReadProgress::Pending => return Step::Pending,
            ReadProgress::Discarded { bytes } => FrameOutcome::Discarded { bytes },
            ReadProgress::Overflow { declared } => FrameOutcome::Overflow { declared },
            ReadProgress::Frame(Ok(command)) => FrameOutcome::Answered {
                command,
                replied: answer(command, channel),
            },
            ReadProgress::Frame(Err(outcome)) => outcome,
        };

        match &outcome {
            FrameOutcome::Answered { .. } => {}
            FrameOutcome::Discarded { .. } => log::trace!("{}", outcome),
            _ => log::debug!("{}", outcome),
        }
        self.observer.observe(&outcome);
        Step::Frame(outcome)
    }
}

/// Validate a complete frame and pick the command it selects.
fn classify(dispatcher: Dispatcher, frame: &[u8]) -> Result<CommandKind, FrameOutcome> {
    let body = match validate_frame(frame) {
        Ok(body) => body,
        Err(ProtocolError::ChecksumMismatch { expected, actual }) => {
            return Err(FrameOutcome::ChecksumMismatch { expected, actual });
        }
        Err(err) => {
            debug_assert!(false, "reader handed over a malformed frame: {}", err);
            log::error!("dropping malformed frame: {}", err);
            return Err(FrameOutcome::Discarded { bytes: frame.len() });
        }
    };

    match dispatcher.lookup(body) {
        Some(command) => {
            log::debug!("received {}:\n{}", command, hex_dump(frame, frame.len()));
            Ok(command)
        }
        None => Err(FrameOutcome::Unrecognized {
            code: match body {
                [class, index, ..] => Some((*class, *index)),
                _ => None,
            },
        }),
    }
}

/// Write the canned answer for `command`. Failures are logged, never retried.
fn answer<C: Channel + ?Sized>(command: CommandKind, channel: &mut C) -> bool {
    let reply = match build_frame(command.answer(), FrameKind::Answer) {
        Ok(reply) => reply,
        Err(e) => {
            log::error!("cannot build answer for {}: {}", command, e);
            return false;
        }
    };

    if let Err(e) = channel.write_all(&reply).and_then(|()| channel.flush()) {
        log::warn!("failed to send answer for {}: {}", command, e);
        return false;
    }
    log::debug!("sent answer:\n{}", hex_dump(&reply, reply.len()));
    true
}
