//! Session types: the records kept for each open connection.

use std::sync::Arc;
use std::time::Instant;

use fablehold_protocol::PlayerId;
use tokio::sync::mpsc;

/// One encoded outbound frame.
///
/// A broadcast encodes its message once and every recipient gets a clone
/// of the same `Arc`.
pub type Frame = Arc<str>;

/// The sending half of a session's outbound queue.
///
/// Unbounded so that delivering to a slow client never stalls the
/// simulation. The connection's writer task owns the receiving half.
pub type SessionSender = mpsc::UnboundedSender<Frame>;

// ---------------------------------------------------------------------------
// SessionConfig
// ---------------------------------------------------------------------------

/// Configuration for the session table.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Maximum number of sessions tracked at once. Connections beyond
    /// this are refused.
    ///
    /// Default: 256.
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { max_sessions: 256 }
    }
}

// ---------------------------------------------------------------------------
// SessionState
// ---------------------------------------------------------------------------

/// Lifecycle of a session.
///
/// ```text
///   Open ──(writer gone / player left)──→ Closed ──(prune)──→ removed
/// ```
///
/// A closed session receives nothing. It lingers only until the next
/// [`SessionManager::prune_closed`](crate::SessionManager::prune_closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Open,
    Closed,
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// A single player's connection record.
#[derive(Debug, Clone)]
pub struct Session {
    /// Which player this session belongs to.
    pub player_id: PlayerId,

    /// Current lifecycle state.
    pub state: SessionState,

    /// Where outbound frames for this player go.
    pub sender: SessionSender,

    /// When the session was created.
    pub opened_at: Instant,
}

impl Session {
    /// Returns `true` if frames can still be delivered to this session.
    pub fn is_open(&self) -> bool {
        self.state == SessionState::Open && !self.sender.is_closed()
    }

    /// Queues a frame. Returns `false` (and marks the session closed) if
    /// the writer side has gone away.
    pub(crate) fn push(&mut self, frame: &Frame) -> bool {
        if self.state == SessionState::Closed {
            return false;
        }
        if self.sender.send(Arc::clone(frame)).is_err() {
            self.state = SessionState::Closed;
            tracing::debug!(player_id = %self.player_id, "session writer gone, closing");
            return false;
        }
        true
    }
}
