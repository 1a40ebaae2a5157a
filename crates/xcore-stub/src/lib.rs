//! Serial front end for the XCore responder.
//!
//! The binary opens one serial device, configures the line once, and feeds
//! everything it reads into an [`xcore_protocol::Responder`]. Replies staged
//! by the responder are written back and flushed before the next read.

pub mod channel;
pub mod cli;
pub mod driver;
pub mod error;
pub mod observer;
pub mod serial;

pub use channel::PortChannel;
pub use cli::Cli;
pub use driver::{run, DriverExit};
pub use error::{StubError, StubResult};
pub use observer::{describe_metrics, FrameStats, MetricsObserver};
pub use serial::{open_port, SerialConfig};
