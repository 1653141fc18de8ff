//! Relay handle and the worker loop that owns the socket.

use futures::{SinkExt, StreamExt};
use hotline_core::{CallerId, Direction, GameCode, GameMessage};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::error::RelayError;

pub(crate) type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Outbound message buffer per connection. A caller produces at most one
/// message per telephony turn, so this never fills in practice.
pub(crate) const OUTBOUND_BUFFER: usize = 32;

/// Handle to a live relay worker.
///
/// Cloneable; all clones feed the same worker task. The handle stays valid
/// only while the underlying connection is open — once the worker exits
/// (connection lost or [`close`](Self::close) called), [`is_open`]
/// (Self::is_open) turns false and sends fail with [`RelayError::Closed`].
#[derive(Clone, Debug)]
pub struct RelayHandle {
    tx: mpsc::Sender<GameMessage>,
    cancel: CancellationToken,
}

impl RelayHandle {
    /// Assemble a handle from its channel and cancellation parts.
    ///
    /// Used by [`WsConnector`](crate::connector::WsConnector) after spawning
    /// the worker, and by test fakes that capture the receiver end.
    pub fn from_parts(tx: mpsc::Sender<GameMessage>, cancel: CancellationToken) -> Self {
        Self { tx, cancel }
    }

    /// Whether the worker loop (and therefore the connection) is still
    /// alive.
    pub fn is_open(&self) -> bool {
        !self.tx.is_closed()
    }

    /// Enqueue a message for transmission.
    pub async fn send(&self, message: GameMessage) -> Result<(), RelayError> {
        self.tx.send(message).await.map_err(|_| RelayError::Closed)
    }

    /// Transmit a `game:join` for the caller.
    pub async fn send_join(&self, caller: &CallerId, code: &GameCode) -> Result<(), RelayError> {
        self.send(GameMessage::join(caller, code)).await
    }

    /// Transmit a `game:move` for the caller.
    pub async fn send_move(
        &self,
        caller: &CallerId,
        code: &GameCode,
        direction: Direction,
    ) -> Result<(), RelayError> {
        self.send(GameMessage::game_move(caller, code, direction))
            .await
    }

    /// Close the connection. The worker sends a Close frame and exits;
    /// the owning Session must clear its stored handle afterward.
    pub fn close(&self) {
        self.cancel.cancel();
    }
}

/// Relay worker loop.
///
/// Owns the WebSocket stream. Serializes and sends messages arriving on the
/// channel; reads inbound frames (the game server's events are unused here,
/// but reading keeps ping/pong serviced and detects Close); exits on
/// cancellation, connection loss, or when every handle clone is dropped.
pub(crate) async fn relay_worker(
    ws: WsStream,
    mut rx: mpsc::Receiver<GameMessage>,
    cancel: CancellationToken,
    caller: CallerId,
) {
    let (mut ws_tx, mut ws_rx) = ws.split();

    loop {
        tokio::select! {
            outbound = rx.recv() => {
                let Some(message) = outbound else {
                    debug!(caller = %caller, "all relay handles dropped, closing connection");
                    let _ = ws_tx.send(Message::Close(None)).await;
                    break;
                };
                let text = match serde_json::to_string(&message) {
                    Ok(t) => t,
                    Err(e) => {
                        warn!(caller = %caller, error = %e, "failed to serialize game message");
                        continue;
                    }
                };
                if let Err(e) = ws_tx.send(Message::Text(text.into())).await {
                    warn!(caller = %caller, error = %e, "game server connection lost while sending");
                    break;
                }
            }
            inbound = ws_rx.next() => {
                match inbound {
                    Some(Ok(Message::Close(_))) | None => {
                        debug!(caller = %caller, "game server closed the connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        debug!(caller = %caller, error = %e, "game server connection error");
                        break;
                    }
                }
            }
            () = cancel.cancelled() => {
                debug!(caller = %caller, "relay close requested");
                let _ = ws_tx.send(Message::Close(None)).await;
                break;
            }
        }
    }
    // Dropping `rx` here closes the channel, flipping `is_open()` on every
    // outstanding handle clone.
}
