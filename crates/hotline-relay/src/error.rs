//! Relay error types.
//!
//! Every variant is recoverable at the turn level: the turn processor logs
//! the failure, drops the message, and still answers the caller. A failed
//! relay never crashes the process.

use thiserror::Error;

/// Errors surfaced by the relay to the turn processor.
#[derive(Debug, Error)]
pub enum RelayError {
    /// The connection attempt to the game server failed.
    #[error("failed to connect to game server: {context}")]
    ConnectFailed {
        /// What went wrong.
        context: String,
    },

    /// The connection attempt did not complete within the configured bound.
    #[error("timed out connecting to game server after {timeout_ms}ms")]
    ConnectTimeout {
        /// The configured timeout.
        timeout_ms: u64,
    },

    /// Send on a handle whose worker has exited (connection lost or
    /// explicitly closed).
    #[error("relay connection is closed")]
    Closed,
}
