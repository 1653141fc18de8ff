//! Connection establishment to the game server.

use std::time::Duration;

use async_trait::async_trait;
use hotline_core::CallerId;
use tokio::sync::mpsc;
use tokio_tungstenite::connect_async;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::error::RelayError;
use crate::handle::{OUTBOUND_BUFFER, RelayHandle, relay_worker};

/// Opens relay connections. The turn processor depends on this trait so
/// tests can substitute a fake that records traffic instead of dialing a
/// real game server.
#[async_trait]
pub trait GameConnector: Send + Sync {
    /// Open a new connection for the caller and return its handle.
    ///
    /// Resolves only once the connection is established (or the attempt
    /// fails); callers may treat a returned handle as live.
    async fn connect(&self, caller: &CallerId) -> Result<RelayHandle, RelayError>;
}

/// Production connector: one WebSocket per caller, identity embedded in the
/// connection target (`{base_url}/ws/{caller_id}`).
#[derive(Clone, Debug)]
pub struct WsConnector {
    base_url: String,
    connect_timeout: Duration,
}

impl WsConnector {
    /// Build a connector for the given game-server base URL
    /// (e.g. `ws://localhost:8081`).
    pub fn new(base_url: impl Into<String>, connect_timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            base_url,
            connect_timeout,
        }
    }

    /// The connection target for a caller.
    fn url_for(&self, caller: &CallerId) -> String {
        format!("{}/ws/{}", self.base_url, caller.as_str())
    }
}

#[async_trait]
impl GameConnector for WsConnector {
    async fn connect(&self, caller: &CallerId) -> Result<RelayHandle, RelayError> {
        let url = self.url_for(caller);
        debug!(caller = %caller, url = %url, "connecting to game server");

        let timeout_ms = u64::try_from(self.connect_timeout.as_millis()).unwrap_or(u64::MAX);
        let (ws, _response) = tokio::time::timeout(self.connect_timeout, connect_async(&url))
            .await
            .map_err(|_| RelayError::ConnectTimeout { timeout_ms })?
            .map_err(|e| RelayError::ConnectFailed {
                context: e.to_string(),
            })?;

        let (tx, rx) = mpsc::channel(OUTBOUND_BUFFER);
        let cancel = CancellationToken::new();
        let _worker = tokio::spawn(relay_worker(ws, rx, cancel.clone(), caller.clone()));

        info!(caller = %caller, "game server connection established");
        Ok(RelayHandle::from_parts(tx, cancel))
    }
}
