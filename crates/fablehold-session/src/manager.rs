//! The session manager: tracks every open connection by player.
//!
//! `SessionManager` is not thread-safe by itself. It is owned by the
//! simulation actor (inside a [`BroadcastBus`](crate::BroadcastBus)) and
//! only ever touched from that task.

use std::collections::HashMap;
use std::time::Instant;

use fablehold_protocol::PlayerId;

use crate::{Session, SessionConfig, SessionError, SessionSender, SessionState};

/// Registry of sessions keyed by player id.
pub struct SessionManager {
    sessions: HashMap<PlayerId, Session>,
    config: SessionConfig,
}

impl SessionManager {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            sessions: HashMap::new(),
            config,
        }
    }

    /// Registers a session for a newly joined player.
    ///
    /// Never prunes on its own: the caller decides what happens to the
    /// players behind dead sessions, so prune before creating when
    /// [`is_full`](Self::is_full).
    ///
    /// # Errors
    /// - [`SessionError::AlreadyConnected`] if the player has an open session
    /// - [`SessionError::Full`] if `max_sessions` sessions are tracked
    pub fn create(
        &mut self,
        player_id: PlayerId,
        sender: SessionSender,
    ) -> Result<&Session, SessionError> {
        if self.sessions.get(&player_id).is_some_and(Session::is_open) {
            return Err(SessionError::AlreadyConnected(player_id));
        }
        // A stale closed record for this id makes room for the new one.
        self.sessions.remove(&player_id);
        if self.is_full() {
            return Err(SessionError::Full {
                max: self.config.max_sessions,
            });
        }

        tracing::info!(%player_id, "session created");
        Ok(self.sessions.entry(player_id).or_insert(Session {
            player_id,
            state: SessionState::Open,
            sender,
            opened_at: Instant::now(),
        }))
    }

    /// Removes a session and returns it.
    ///
    /// # Errors
    /// Returns [`SessionError::NotFound`] if no session exists.
    pub fn remove(&mut self, player_id: PlayerId) -> Result<Session, SessionError> {
        let session = self
            .sessions
            .remove(&player_id)
            .ok_or(SessionError::NotFound(player_id))?;
        tracing::info!(%player_id, "session removed");
        Ok(session)
    }

    /// Drops every session that is closed or whose writer has gone away.
    ///
    /// Returns the ids that were removed.
    pub fn prune_closed(&mut self) -> Vec<PlayerId> {
        let mut pruned = Vec::new();
        self.sessions.retain(|id, session| {
            if session.is_open() {
                true
            } else {
                pruned.push(*id);
                false
            }
        });
        if !pruned.is_empty() {
            tracing::debug!(count = pruned.len(), "pruned closed sessions");
        }
        pruned
    }

    pub fn get(&self, player_id: &PlayerId) -> Option<&Session> {
        self.sessions.get(player_id)
    }

    pub(crate) fn get_mut(&mut self, player_id: &PlayerId) -> Option<&mut Session> {
        self.sessions.get_mut(player_id)
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Session> {
        self.sessions.values_mut()
    }

    /// Iterates over the sessions that can still receive frames.
    pub fn open_sessions(&self) -> impl Iterator<Item = &Session> {
        self.sessions.values().filter(|s| s.is_open())
    }

    /// Number of tracked sessions (open or not yet pruned).
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Returns `true` once `max_sessions` sessions are tracked, counting
    /// dead ones that have not been pruned yet.
    pub fn is_full(&self) -> bool {
        self.sessions.len() >= self.config.max_sessions
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    fn sender() -> (SessionSender, mpsc::UnboundedReceiver<crate::Frame>) {
        mpsc::unbounded_channel()
    }

    fn manager() -> SessionManager {
        SessionManager::new(SessionConfig::default())
    }

    // =====================================================================
    // create()
    // =====================================================================

    #[test]
    fn test_create_new_player_is_open() {
        let mut mgr = manager();
        let (tx, _rx) = sender();

        let session = mgr.create(pid(1), tx).expect("should succeed");

        assert_eq!(session.player_id, pid(1));
        assert_eq!(session.state, SessionState::Open);
        assert!(session.is_open());
    }

    #[test]
    fn test_create_duplicate_open_player_fails() {
        let mut mgr = manager();
        let (tx1, _rx1) = sender();
        let (tx2, _rx2) = sender();
        mgr.create(pid(1), tx1).unwrap();

        let result = mgr.create(pid(1), tx2);

        assert!(matches!(result, Err(SessionError::AlreadyConnected(p)) if p == pid(1)));
    }

    #[test]
    fn test_create_replaces_closed_session() {
        let mut mgr = manager();
        let (tx1, rx1) = sender();
        let (tx2, _rx2) = sender();
        mgr.create(pid(1), tx1).unwrap();
        drop(rx1);

        mgr.create(pid(1), tx2).expect("closed session should be replaced");
        assert_eq!(mgr.len(), 1);
        assert!(mgr.get(&pid(1)).unwrap().is_open());
    }

    #[test]
    fn test_create_beyond_limit_fails() {
        let mut mgr = SessionManager::new(SessionConfig { max_sessions: 2 });
        let (tx, _rx) = sender();
        mgr.create(pid(1), tx.clone()).unwrap();
        mgr.create(pid(2), tx.clone()).unwrap();

        let result = mgr.create(pid(3), tx);

        assert!(matches!(result, Err(SessionError::Full { max: 2 })));
    }

    #[test]
    fn test_create_at_limit_leaves_dead_sessions_to_caller() {
        let mut mgr = SessionManager::new(SessionConfig { max_sessions: 1 });
        let (dead_tx, dead_rx) = sender();
        mgr.create(pid(1), dead_tx).unwrap();
        drop(dead_rx);
        let (tx, _rx) = sender();

        assert!(mgr.is_full());
        assert!(matches!(mgr.create(pid(2), tx.clone()), Err(SessionError::Full { max: 1 })));
        assert!(mgr.get(&pid(1)).is_some(), "dead session is still tracked");

        assert_eq!(mgr.prune_closed(), vec![pid(1)]);
        mgr.create(pid(2), tx).expect("pruning should make room");
        assert!(!mgr.is_empty());
    }

    // =====================================================================
    // remove() / prune_closed()
    // =====================================================================

    #[test]
    fn test_remove_returns_session() {
        let mut mgr = manager();
        let (tx, _rx) = sender();
        mgr.create(pid(1), tx).unwrap();

        let session = mgr.remove(pid(1)).unwrap();

        assert_eq!(session.player_id, pid(1));
        assert!(mgr.is_empty());
        assert!(matches!(mgr.remove(pid(1)), Err(SessionError::NotFound(_))));
    }

    #[test]
    fn test_prune_removes_closed_and_dropped_writers() {
        let mut mgr = manager();
        let (tx1, _rx1) = sender();
        let (tx2, rx2) = sender();
        let (tx3, _rx3) = sender();
        mgr.create(pid(1), tx1).unwrap();
        mgr.create(pid(2), tx2).unwrap();
        mgr.create(pid(3), tx3).unwrap();
        mgr.get_mut(&pid(1)).unwrap().state = SessionState::Closed;
        drop(rx2);

        let mut pruned = mgr.prune_closed();
        pruned.sort();

        assert_eq!(pruned, vec![pid(1), pid(2)]);
        assert_eq!(mgr.len(), 1);
        assert_eq!(mgr.open_sessions().count(), 1);
    }

    #[test]
    fn test_open_sessions_skips_closed() {
        let mut mgr = manager();
        let (tx, _rx) = sender();
        mgr.create(pid(1), tx.clone()).unwrap();
        mgr.create(pid(2), tx).unwrap();
        mgr.get_mut(&pid(2)).unwrap().state = SessionState::Closed;

        let open: Vec<_> = mgr.open_sessions().map(|s| s.player_id).collect();
        assert_eq!(open, vec![pid(1)]);
        assert_eq!(mgr.len(), 2);
    }
}
