//! Readiness loop feeding the serial stream into a responder.
//!
//! Runs on a single task: each read from the port is staged into a
//! [`PortChannel`], then the responder is notified once per read step until
//! the staged bytes are used up. Replies are written and flushed as soon as a
//! step produces them, so frames are answered strictly in arrival order.
//!
//! The responder only ever writes into the staging channel, so outcomes are
//! reported here, once the reply has actually gone out on the port.

use std::io;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use xcore_protocol::{
    ChannelEvent, FrameObserver, FrameOutcome, Responder, Step, READ_BUFFER_CAPACITY,
};

use crate::channel::PortChannel;
use crate::error::StubResult;

/// Pause after a failed read before trying again.
const READ_RETRY_DELAY: Duration = Duration::from_millis(100);

/// Why the driver stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverExit {
    /// The port reported end of stream; the responder is detached.
    HungUp,
}

/// Errors that mean the other end is gone rather than a transient fault.
fn is_hang_up(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::BrokenPipe
            | io::ErrorKind::ConnectionReset
            | io::ErrorKind::ConnectionAborted
            | io::ErrorKind::NotConnected
            | io::ErrorKind::UnexpectedEof
    )
}

/// Serve `stream` until it hangs up, reporting every outcome to `observer`.
pub async fn run<S, O>(stream: &mut S, responder: &mut Responder, observer: &mut O) -> DriverExit
where
    S: AsyncRead + AsyncWrite + Unpin,
    O: FrameObserver,
{
    let mut chunk = [0u8; READ_BUFFER_CAPACITY];
    let mut channel = PortChannel::new();

    loop {
        match stream.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                tracing::trace!(bytes = %hex::encode(&chunk[..n]), "rx");
                channel.stage(&chunk[..n]);
            }
            Err(e) if is_hang_up(&e) => break,
            Err(e) => {
                tracing::warn!(error = %e, "serial read failed");
                tokio::time::sleep(READ_RETRY_DELAY).await;
                continue;
            }
        }

        while channel.has_pending() {
            let step = responder.service(&mut channel, ChannelEvent::DataAvailable);
            let reply = channel.take_outgoing();
            let Step::Frame(mut outcome) = step else {
                continue;
            };
            if let (FrameOutcome::Answered { replied, .. }, Some(reply)) = (&mut outcome, reply) {
                if let Err(e) = send(stream, &reply).await {
                    tracing::warn!(error = %e, "serial write failed");
                    *replied = false;
                }
            }
            observer.observe(&outcome);
        }
    }

    responder.service(&mut channel, ChannelEvent::HangUp);
    tracing::info!("serial port hung up");
    DriverExit::HungUp
}

async fn send<S: AsyncWrite + Unpin>(stream: &mut S, data: &[u8]) -> StubResult<()> {
    tracing::trace!(bytes = %hex::encode(data), "tx");
    stream.write_all(data).await?;
    stream.flush().await?;
    Ok(())
}
