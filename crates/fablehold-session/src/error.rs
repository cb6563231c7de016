//! Error types for the session layer.

use fablehold_protocol::{PlayerId, ProtocolError};

/// Errors that can occur during session management and delivery.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session exists for the given player.
    #[error("session not found for player {0}")]
    NotFound(PlayerId),

    /// The player already has an open session.
    #[error("player {0} already has an active session")]
    AlreadyConnected(PlayerId),

    /// The session table is at `max_sessions`.
    #[error("session limit reached ({max})")]
    Full { max: usize },

    /// An outbound message could not be encoded.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
}
