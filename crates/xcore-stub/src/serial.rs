//! Serial line configuration.
//!
//! The device side of the XCore link runs raw 8N1 at 115200 baud with RTS/CTS
//! flow control. The line is configured once when the port opens and never
//! touched again.

use std::time::Duration;

use tokio_serial::{DataBits, FlowControl, Parity, SerialPortBuilderExt, SerialStream, StopBits};

use crate::error::{StubError, StubResult};

/// Serial port configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerialConfig {
    /// Line speed.
    pub baud_rate: u32,
    /// Data bits per character.
    pub data_bits: DataBits,
    /// Parity checking.
    pub parity: Parity,
    /// Stop bits per character.
    pub stop_bits: StopBits,
    /// Flow control.
    pub flow_control: FlowControl,
    /// Inter-byte read timing.
    pub read_timeout: Duration,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            baud_rate: 115_200,
            data_bits: DataBits::Eight,
            parity: Parity::None,
            stop_bits: StopBits::One,
            flow_control: FlowControl::Hardware,
            read_timeout: Duration::from_millis(100),
        }
    }
}

/// Open and configure `path`. Must run inside a tokio runtime.
pub fn open_port(path: &str, config: &SerialConfig) -> StubResult<SerialStream> {
    tokio_serial::new(path, config.baud_rate)
        .data_bits(config.data_bits)
        .parity(config.parity)
        .stop_bits(config.stop_bits)
        .flow_control(config.flow_control)
        .timeout(config.read_timeout)
        .open_native_async()
        .map_err(|source| StubError::Open {
            path: path.to_string(),
            source,
        })
}
