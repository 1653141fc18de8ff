//! Process-wide caller→session registry.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use hotline_core::metrics::SESSIONS_ACTIVE;
use hotline_core::{CallerId, GameCode};
use hotline_relay::RelayHandle;
use metrics::gauge;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Everything the service remembers about one caller.
///
/// Sessions are created when a caller submits a game code and persist across
/// calls until the caller cancels (or the idle reaper evicts them). The
/// relay handle is optional: a session whose connection dropped keeps its
/// game code and reconnects lazily on the next move.
#[derive(Clone, Debug)]
pub struct Session {
    /// The game the caller joined.
    pub game_code: GameCode,
    /// Live connection to the game server, if one is currently open.
    pub relay: Option<RelayHandle>,
    /// When the session was created.
    pub created_at: Instant,
    /// Last turn observed for this caller. Drives idle eviction.
    pub last_seen: Instant,
}

impl Session {
    /// A fresh session for a just-submitted game code, not yet connected.
    pub fn new(game_code: GameCode) -> Self {
        let now = Instant::now();
        Self {
            game_code,
            relay: None,
            created_at: now,
            last_seen: now,
        }
    }
}

/// Concurrent caller→[`Session`] map.
///
/// Lookups return cloned snapshots so no map guard is ever held across an
/// await point; mutation goes through short, synchronous entry accesses.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    sessions: DashMap<CallerId, Session>,
}

impl SessionRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the caller's session, if any.
    pub fn get(&self, caller: &CallerId) -> Option<Session> {
        self.sessions.get(caller).map(|entry| entry.clone())
    }

    /// Whether the caller currently has a session.
    pub fn contains(&self, caller: &CallerId) -> bool {
        self.sessions.contains_key(caller)
    }

    /// Number of live sessions.
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Store a session for the caller, replacing any previous one.
    pub fn insert(&self, caller: CallerId, session: Session) {
        let _prev = self.sessions.insert(caller, session);
        gauge!(SESSIONS_ACTIVE).set(self.len() as f64);
    }

    /// Remove and return the caller's session. The caller owns closing the
    /// relay handle, if any.
    pub fn remove(&self, caller: &CallerId) -> Option<Session> {
        let removed = self.sessions.remove(caller).map(|(_, session)| session);
        if removed.is_some() {
            gauge!(SESSIONS_ACTIVE).set(self.len() as f64);
        }
        removed
    }

    /// Record activity for the caller, refreshing the idle clock.
    pub fn touch(&self, caller: &CallerId) {
        if let Some(mut entry) = self.sessions.get_mut(caller) {
            entry.last_seen = Instant::now();
        }
    }

    /// Install a freshly connected relay handle, unless a concurrent turn
    /// already installed an open one. Returns whichever handle ends up
    /// stored; the loser of the race is closed. Returns `None` (and closes
    /// `fresh`) when the session vanished while the connection was opening.
    pub fn install_relay(&self, caller: &CallerId, fresh: RelayHandle) -> Option<RelayHandle> {
        let Some(mut entry) = self.sessions.get_mut(caller) else {
            fresh.close();
            return None;
        };
        match &entry.relay {
            Some(existing) if existing.is_open() => {
                let existing = existing.clone();
                drop(entry);
                fresh.close();
                Some(existing)
            }
            _ => {
                entry.relay = Some(fresh.clone());
                Some(fresh)
            }
        }
    }

    /// Spawn a background sweep that evicts sessions idle for longer than
    /// `max_idle`, closing their relay handles. Returns a token that stops
    /// the sweep when cancelled.
    pub fn start_reaper(self: &Arc<Self>, max_idle: Duration, interval: Duration) -> CancellationToken {
        let shutdown = CancellationToken::new();
        let token = shutdown.clone();
        let registry = Arc::clone(self);

        let _task = tokio::spawn(async move {
            let mut tick = tokio::time::interval(interval);
            tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    _ = tick.tick() => {}
                    () = shutdown.cancelled() => {
                        info!("session reaper shutting down");
                        return;
                    }
                }

                let now = Instant::now();
                let stale: Vec<CallerId> = registry
                    .sessions
                    .iter()
                    .filter(|entry| now.duration_since(entry.last_seen) > max_idle)
                    .map(|entry| entry.key().clone())
                    .collect();

                for caller in &stale {
                    if let Some((_, session)) = registry.sessions.remove(caller) {
                        if let Some(relay) = session.relay {
                            relay.close();
                        }
                        debug!(caller = %caller, "evicted idle session");
                    }
                }
                if !stale.is_empty() {
                    gauge!(SESSIONS_ACTIVE).set(registry.len() as f64);
                }
            }
        });

        info!(max_idle = ?max_idle, interval = ?interval, "session reaper started");
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn caller(number: &str) -> CallerId {
        CallerId::from_number(number)
    }

    fn open_handle() -> (RelayHandle, mpsc::Receiver<hotline_core::GameMessage>) {
        let (tx, rx) = mpsc::channel(8);
        (RelayHandle::from_parts(tx, CancellationToken::new()), rx)
    }

    fn closed_handle() -> RelayHandle {
        let (tx, rx) = mpsc::channel(8);
        drop(rx);
        RelayHandle::from_parts(tx, CancellationToken::new())
    }

    #[test]
    fn insert_get_remove_round_trip() {
        let registry = SessionRegistry::new();
        let id = caller("+1555");
        assert!(registry.get(&id).is_none());

        registry.insert(id.clone(), Session::new(GameCode::new("1234")));
        assert!(registry.contains(&id));
        assert_eq!(registry.get(&id).unwrap().game_code.as_str(), "1234");

        let removed = registry.remove(&id).unwrap();
        assert_eq!(removed.game_code.as_str(), "1234");
        assert!(registry.is_empty());
    }

    #[test]
    fn remove_unknown_caller_is_none() {
        let registry = SessionRegistry::new();
        assert!(registry.remove(&caller("+1555")).is_none());
    }

    #[test]
    fn touch_refreshes_last_seen() {
        let registry = SessionRegistry::new();
        let id = caller("+1555");
        let mut session = Session::new(GameCode::new("1"));
        session.last_seen = Instant::now() - Duration::from_secs(600);
        registry.insert(id.clone(), session);

        registry.touch(&id);
        let refreshed = registry.get(&id).unwrap();
        assert!(refreshed.last_seen.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn install_relay_keeps_an_existing_open_handle() {
        let registry = SessionRegistry::new();
        let id = caller("+1555");
        let (existing, _rx_existing) = open_handle();
        let mut session = Session::new(GameCode::new("1"));
        session.relay = Some(existing);
        registry.insert(id.clone(), session);

        let (tx, rx) = mpsc::channel(8);
        let fresh_cancel = CancellationToken::new();
        let fresh = RelayHandle::from_parts(tx, fresh_cancel.clone());
        drop(rx);

        let installed = registry.install_relay(&id, fresh).unwrap();
        // The open incumbent wins; the fresh handle is closed.
        assert!(installed.is_open());
        assert!(fresh_cancel.is_cancelled());
    }

    #[tokio::test]
    async fn install_relay_replaces_a_dead_handle() {
        let registry = SessionRegistry::new();
        let id = caller("+1555");
        let mut session = Session::new(GameCode::new("1"));
        session.relay = Some(closed_handle());
        registry.insert(id.clone(), session);

        let (fresh, _rx) = open_handle();
        let installed = registry.install_relay(&id, fresh).unwrap();
        assert!(installed.is_open());
        assert!(registry.get(&id).unwrap().relay.unwrap().is_open());
    }

    #[tokio::test]
    async fn install_relay_on_vanished_session_closes_the_handle() {
        let registry = SessionRegistry::new();
        let (tx, _rx) = mpsc::channel(8);
        let cancel = CancellationToken::new();
        let fresh = RelayHandle::from_parts(tx, cancel.clone());

        assert!(registry.install_relay(&caller("+1555"), fresh).is_none());
        assert!(cancel.is_cancelled());
    }

    #[tokio::test]
    async fn reaper_evicts_idle_sessions_and_closes_handles() {
        let registry = Arc::new(SessionRegistry::new());
        let id = caller("+1555");
        let (tx, _rx) = mpsc::channel(8);
        let relay_cancel = CancellationToken::new();
        let mut session = Session::new(GameCode::new("1234"));
        session.relay = Some(RelayHandle::from_parts(tx, relay_cancel.clone()));
        registry.insert(id.clone(), session);

        let reaper = registry.start_reaper(Duration::from_millis(50), Duration::from_millis(20));

        let deadline = Instant::now() + Duration::from_secs(5);
        while registry.contains(&id) {
            assert!(Instant::now() < deadline, "session was never evicted");
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        assert!(relay_cancel.is_cancelled());
        reaper.cancel();
    }

    #[tokio::test]
    async fn reaper_leaves_active_sessions_alone() {
        let registry = Arc::new(SessionRegistry::new());
        let id = caller("+1555");
        registry.insert(id.clone(), Session::new(GameCode::new("1234")));

        let reaper = registry.start_reaper(Duration::from_secs(600), Duration::from_millis(20));
        tokio::time::sleep(Duration::from_millis(100)).await;

        assert!(registry.contains(&id));
        reaper.cancel();
    }
}
