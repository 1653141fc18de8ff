//! # hotline-relay
//!
//! The Socket Relay: owns, per caller, the single outbound WebSocket
//! connection to the game server and the protocol used to talk to it.
//!
//! - [`GameConnector`] is the seam the turn processor depends on; the
//!   production implementation is [`WsConnector`].
//! - [`RelayHandle`] is the cloneable sender half of a relay worker task.
//!   The worker owns the socket; the handle only enqueues messages, so
//!   callers never block on socket I/O beyond channel backpressure.
//! - Connection loss is observable through [`RelayHandle::is_open`]: the
//!   worker exits when the socket dies, which closes the channel.

#![deny(unsafe_code)]

pub mod connector;
pub mod error;
pub mod handle;

pub use connector::{GameConnector, WsConnector};
pub use error::RelayError;
pub use handle::RelayHandle;
