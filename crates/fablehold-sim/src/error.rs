//! Error types for the simulation layer.

use fablehold_session::SessionError;

/// Errors returned by [`SimHandle`](crate::SimHandle) calls.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The actor has stopped or its command channel is closed.
    #[error("simulation is unavailable")]
    Unavailable,

    /// The session table refused the connection.
    #[error(transparent)]
    Session(#[from] SessionError),
}
