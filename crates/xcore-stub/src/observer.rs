//! Outcome logging and counters.

use metrics::{counter, describe_counter, Unit};
use xcore_protocol::{FrameObserver, FrameOutcome};

/// Frames answered with a canned reply.
pub const FRAMES_ANSWERED: &str = "xcore.frames.answered";
/// Answers that failed to reach the channel.
pub const FRAMES_REPLY_FAILED: &str = "xcore.frames.reply_failed";
/// Frames dropped for a bad checksum.
pub const FRAMES_CHECKSUM_MISMATCH: &str = "xcore.frames.checksum_mismatch";
/// Valid frames that matched no command.
pub const FRAMES_UNRECOGNIZED: &str = "xcore.frames.unrecognized";
/// Headers whose declared length overflowed the read buffer.
pub const FRAMES_OVERFLOW: &str = "xcore.frames.overflow";
/// Bytes dropped because they did not start a frame.
pub const BYTES_DISCARDED: &str = "xcore.bytes.discarded";

/// Register metric descriptions with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(FRAMES_ANSWERED, Unit::Count, "Frames answered with a canned reply");
    describe_counter!(FRAMES_REPLY_FAILED, Unit::Count, "Answers that failed to send");
    describe_counter!(FRAMES_CHECKSUM_MISMATCH, Unit::Count, "Frames dropped for a bad checksum");
    describe_counter!(FRAMES_UNRECOGNIZED, Unit::Count, "Valid frames matching no command");
    describe_counter!(FRAMES_OVERFLOW, Unit::Count, "Headers overflowing the read buffer");
    describe_counter!(BYTES_DISCARDED, Unit::Bytes, "Bytes dropped before a frame marker");
}

/// Running totals, kept alongside the exported counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameStats {
    pub answered: u64,
    pub reply_failed: u64,
    pub checksum_mismatch: u64,
    pub unrecognized: u64,
    pub overflow: u64,
    pub bytes_discarded: u64,
}

/// Observer that logs each outcome and bumps the matching counter.
#[derive(Debug, Default)]
pub struct MetricsObserver {
    stats: FrameStats,
}

impl MetricsObserver {
    /// Create an observer with zeroed totals.
    pub fn new() -> Self {
        Self::default()
    }

    /// Totals so far.
    pub fn stats(&self) -> FrameStats {
        self.stats
    }
}

impl FrameObserver for MetricsObserver {
    fn observe(&mut self, outcome: &FrameOutcome) {
        match outcome {
            FrameOutcome::Answered { command, replied: true } => {
                tracing::info!(%command, "answered");
                self.stats.answered += 1;
                counter!(FRAMES_ANSWERED, "command" => command.name()).increment(1);
            }
            FrameOutcome::Answered { command, replied: false } => {
                self.stats.reply_failed += 1;
                counter!(FRAMES_REPLY_FAILED, "command" => command.name()).increment(1);
            }
            FrameOutcome::ChecksumMismatch { expected, actual } => {
                tracing::debug!(expected, actual, "checksum mismatch, frame dropped");
                self.stats.checksum_mismatch += 1;
                counter!(FRAMES_CHECKSUM_MISMATCH).increment(1);
            }
            FrameOutcome::Unrecognized { code } => {
                tracing::debug!(?code, "no command matched, frame dropped");
                self.stats.unrecognized += 1;
                counter!(FRAMES_UNRECOGNIZED).increment(1);
            }
            FrameOutcome::Overflow { declared } => {
                tracing::debug!(declared, "declared length overflows buffer");
                self.stats.overflow += 1;
                counter!(FRAMES_OVERFLOW).increment(1);
            }
            FrameOutcome::Discarded { bytes } => {
                self.stats.bytes_discarded += *bytes as u64;
                counter!(BYTES_DISCARDED).increment(*bytes as u64);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use xcore_protocol::CommandKind;

    #[test]
    fn test_counts_each_outcome() {
        let mut observer = MetricsObserver::new();
        observer.observe(&FrameOutcome::Answered { command: CommandKind::GetSn, replied: true });
        observer.observe(&FrameOutcome::Answered { command: CommandKind::GetSn, replied: false });
        observer.observe(&FrameOutcome::ChecksumMismatch { expected: 1, actual: 2 });
        observer.observe(&FrameOutcome::Unrecognized { code: None });
        observer.observe(&FrameOutcome::Overflow { declared: 0xFF });
        observer.observe(&FrameOutcome::Discarded { bytes: 2 });
        observer.observe(&FrameOutcome::Discarded { bytes: 2 });

        assert_eq!(
            observer.stats(),
            FrameStats {
                answered: 1,
                reply_failed: 1,
                checksum_mismatch: 1,
                unrecognized: 1,
                overflow: 1,
                bytes_discarded: 4,
            }
        );
    }
}
