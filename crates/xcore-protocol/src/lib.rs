//! XCore Serial Control Protocol
//!
//! This crate implements the responder side of the XCore device-control serial
//! protocol: it reassembles command frames from an arbitrarily fragmented byte
//! stream, validates their checksum, dispatches recognized commands and answers
//! them with canned payloads. It backs a conformance-test stub, so answers never
//! reflect live device state.
//!
//! # Protocol Overview
//!
//! Frames travel in both directions with an 8-bit wraparound checksum:
//!
//! - **Commands** (host → device): `0xAA | N | class | index | args.. | checksum`
//! - **Answers** (device → host): `0x55 | M+1 | payload(M) | checksum | 0xEB | 0xAA`
//!
//! The checksum covers the marker, the length byte and the declared body. The
//! two-byte terminator on answers is never checked on input.
//!
//! # Example
//!
//! ```rust,ignore
//! use xcore_protocol::{encode_command, ChannelEvent, Responder, Step};
//!
//! let mut responder = Responder::new();
//! // `port` is any `std::io::Read + std::io::Write` channel
//! match responder.service(&mut port, ChannelEvent::DataAvailable) {
//!     Step::Frame(outcome) => println!("{outcome}"),
//!     _ => {}
//! }
//! ```

mod checksum;
mod commands;
mod constants;
mod dump;
mod error;
mod frame;
mod packet;
mod responder;
mod responses;

pub use checksum::*;
pub use commands::*;
pub use constants::*;
pub use dump::*;
pub use error::*;
pub use frame::*;
pub use packet::*;
pub use responder::*;
pub use responses::*;
