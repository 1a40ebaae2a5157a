//! Buffered channel between the async serial stream and the responder.
//!
//! The driver stages whatever the port delivered into a [`PortChannel`]; the
//! responder then reads from it in frame-sized steps and writes its replies
//! into the outgoing side, which the driver flushes to the port.

use std::io::{self, Read, Write};

use bytes::{Buf, Bytes, BytesMut};
use xcore_protocol::READ_BUFFER_CAPACITY;

/// In-memory duplex channel staging bytes in both directions.
#[derive(Debug, Default)]
pub struct PortChannel {
    incoming: BytesMut,
    outgoing: BytesMut,
}

impl PortChannel {
    /// Create an empty channel.
    pub fn new() -> Self {
        PortChannel {
            incoming: BytesMut::with_capacity(READ_BUFFER_CAPACITY),
            outgoing: BytesMut::with_capacity(READ_BUFFER_CAPACITY),
        }
    }

    /// Queue bytes read from the port.
    pub fn stage(&mut self, data: &[u8]) {
        self.incoming.extend_from_slice(data);
    }

    /// Whether staged input is waiting to be read.
    pub fn has_pending(&self) -> bool {
        !self.incoming.is_empty()
    }

    /// Number of staged input bytes.
    pub fn pending_len(&self) -> usize {
        self.incoming.len()
    }

    /// Take everything the responder wrote since the last call.
    pub fn take_outgoing(&mut self) -> Option<Bytes> {
        if self.outgoing.is_empty() {
            None
        } else {
            Some(self.outgoing.split().freeze())
        }
    }
}

impl Read for PortChannel {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = buf.len().min(self.incoming.len());
        buf[..n].copy_from_slice(&self.incoming[..n]);
        self.incoming.advance(n);
        Ok(n)
    }
}

impl Write for PortChannel {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.outgoing.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_in_requested_sizes() {
        let mut chan = PortChannel::new();
        chan.stage(&[1, 2, 3, 4, 5]);

        let mut buf = [0u8; 2];
        assert_eq!(chan.read(&mut buf).unwrap(), 2);
        assert_eq!(buf, [1, 2]);
        assert_eq!(chan.pending_len(), 3);

        let mut big = [0u8; 8];
        assert_eq!(chan.read(&mut big).unwrap(), 3);
        assert!(!chan.has_pending());
        assert_eq!(chan.read(&mut big).unwrap(), 0);
    }

    #[test]
    fn test_take_outgoing() {
        let mut chan = PortChannel::new();
        assert!(chan.take_outgoing().is_none());

        chan.write_all(&[0x55, 0x01]).unwrap();
        chan.write_all(&[0x02]).unwrap();
        assert_eq!(chan.take_outgoing().unwrap().as_ref(), &[0x55, 0x01, 0x02]);
        assert!(chan.take_outgoing().is_none());
    }
}
