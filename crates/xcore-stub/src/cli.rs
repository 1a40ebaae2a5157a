//! Command line.

use clap::Parser;

/// Answer XCore control commands on a serial device with canned replies.
#[derive(Debug, Clone, Parser)]
#[command(name = "xcore-stub", version, about)]
pub struct Cli {
    /// Serial device to listen on, e.g. /dev/ttyUSB0.
    pub device: String,
}
