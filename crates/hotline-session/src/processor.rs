//! The call-session state machine.

use std::sync::Arc;

use hotline_core::metrics::{
    RELAY_CONNECTS_TOTAL, RELAY_ERRORS_TOTAL, SESSIONS_REMOVED_TOTAL, TURNS_TOTAL,
};
use hotline_core::{CANCEL_MARKER, CallerId, Directive, Direction, GameCode, Prompt, Turn};
use hotline_relay::{GameConnector, RelayError, RelayHandle};
use metrics::counter;
use tracing::{info, warn};

use crate::registry::{Session, SessionRegistry};

/// Turns inbound caller turns into response directives, mutating the
/// session registry and driving the relay along the way.
///
/// The telephony provider serializes callbacks per caller, so turns for one
/// identity never race each other; turns for distinct callers run
/// concurrently and only meet at the registry.
pub struct TurnProcessor {
    registry: Arc<SessionRegistry>,
    connector: Arc<dyn GameConnector>,
}

impl TurnProcessor {
    /// Wire a processor to its registry and connector.
    pub fn new(registry: Arc<SessionRegistry>, connector: Arc<dyn GameConnector>) -> Self {
        Self {
            registry,
            connector,
        }
    }

    /// The registry this processor operates on.
    pub fn registry(&self) -> &Arc<SessionRegistry> {
        &self.registry
    }

    /// Process one turn.
    ///
    /// Always produces a directive: relay failures are logged and counted
    /// but never keep the caller from getting a spoken response.
    pub async fn process(&self, turn: Turn) -> Directive {
        counter!(TURNS_TOTAL).increment(1);
        let caller = turn.caller;

        // Cancellation wins over every other interpretation of the keypress.
        if turn
            .keypress
            .as_deref()
            .is_some_and(|keys| keys.contains(CANCEL_MARKER))
        {
            return self.cancel(&caller);
        }

        let Some(keys) = turn.keypress else {
            return self.open_call(&caller).await;
        };

        match self.registry.get(&caller) {
            Some(session) => {
                self.registry.touch(&caller);
                self.in_session(&caller, &session, &keys).await
            }
            None => self.join_game(&caller, keys).await,
        }
    }

    /// No keypress: either a brand-new call or a redial with a live session.
    async fn open_call(&self, caller: &CallerId) -> Directive {
        let Some(session) = self.registry.get(caller) else {
            return Directive::gather(Prompt::GetReady).first_turn();
        };

        self.registry.touch(caller);
        info!(caller = %caller, code = %session.game_code, "caller returned to a live session");

        // Re-announce the caller to the game unless the previous call's
        // connection is still open.
        let still_open = session.relay.as_ref().is_some_and(RelayHandle::is_open);
        if !still_open {
            match self.ensure_connected(caller).await {
                Ok(handle) => {
                    if let Err(e) = handle.send_join(caller, &session.game_code).await {
                        self.relay_failed(caller, "rejoin", &e);
                    }
                }
                Err(e) => self.relay_failed(caller, "rejoin", &e),
            }
        }
        Directive::gather(Prompt::WelcomeBack).first_turn()
    }

    /// Keypress with no session: the whole string becomes the game code.
    async fn join_game(&self, caller: &CallerId, keys: String) -> Directive {
        let code = GameCode::new(keys);
        self.registry
            .insert(caller.clone(), Session::new(code.clone()));
        info!(caller = %caller, code = %code, "session created");

        match self.ensure_connected(caller).await {
            Ok(handle) => {
                if let Err(e) = handle.send_join(caller, &code).await {
                    self.relay_failed(caller, "join", &e);
                }
            }
            Err(e) => self.relay_failed(caller, "join", &e),
        }
        Directive::gather(Prompt::CodeSet(code)).first_turn()
    }

    /// Keypress with a session: a move, or something that isn't one.
    async fn in_session(&self, caller: &CallerId, session: &Session, keys: &str) -> Directive {
        let mut chars = keys.chars();
        let (Some(key), None) = (chars.next(), chars.next()) else {
            return Directive::gather(Prompt::InvalidInput);
        };

        let Some(direction) = Direction::from_key(key) else {
            info!(caller = %caller, key = %key, "unmapped key, ending call");
            return Directive::hangup(Prompt::InvalidMove);
        };

        match self.ensure_connected(caller).await {
            Ok(handle) => {
                if let Err(e) = handle
                    .send_move(caller, &session.game_code, direction)
                    .await
                {
                    self.relay_failed(caller, "move", &e);
                }
            }
            Err(e) => self.relay_failed(caller, "move", &e),
        }
        Directive::gather(Prompt::Moving(direction))
    }

    /// Tear down the caller's session, if any. Valid in every state.
    fn cancel(&self, caller: &CallerId) -> Directive {
        if let Some(session) = self.registry.remove(caller) {
            if let Some(relay) = session.relay {
                relay.close();
            }
            counter!(SESSIONS_REMOVED_TOTAL).increment(1);
            info!(caller = %caller, "session removed at caller request");
        }
        Directive::hangup(Prompt::SessionRemoved)
    }

    /// Return an open relay handle for the caller, dialing a new connection
    /// only when the stored one is absent or dead.
    ///
    /// The registry snapshot is dropped before awaiting the connector, and
    /// installation re-checks under the entry lock, so a turn that lost a
    /// (cross-call) race still ends up using the single surviving handle.
    async fn ensure_connected(&self, caller: &CallerId) -> Result<RelayHandle, RelayError> {
        if let Some(session) = self.registry.get(caller) {
            if let Some(handle) = session.relay {
                if handle.is_open() {
                    return Ok(handle);
                }
            }
        }

        let fresh = self.connector.connect(caller).await?;
        counter!(RELAY_CONNECTS_TOTAL).increment(1);
        // `None` means the session was cancelled while dialing.
        self.registry
            .install_relay(caller, fresh)
            .ok_or(RelayError::Closed)
    }

    fn relay_failed(&self, caller: &CallerId, action: &str, error: &RelayError) {
        counter!(RELAY_ERRORS_TOTAL).increment(1);
        warn!(caller = %caller, action, error = %error, "relay delivery failed");
    }
}
