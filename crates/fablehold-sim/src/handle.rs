//! The public handle to a running simulation.

use fablehold_protocol::PlayerId;
use fablehold_session::SessionSender;
use fablehold_world::ClientMessage;
use tokio::sync::{mpsc, oneshot};

use crate::SimError;
use crate::actor::SimCommand;

/// A diagnostic snapshot of the simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SimInfo {
    pub players: usize,
    pub monsters: usize,
    pub items: usize,
    /// Open sessions on the broadcast bus.
    pub sessions: usize,
    /// AI passes run since start.
    pub ai_ticks: u64,
}

/// Handle to the simulation actor.
///
/// Cheap to clone: it wraps an `mpsc::Sender`. Every connection handler
/// holds one.
#[derive(Clone)]
pub struct SimHandle {
    sender: mpsc::Sender<SimCommand>,
}

impl SimHandle {
    pub(crate) fn new(sender: mpsc::Sender<SimCommand>) -> Self {
        Self { sender }
    }

    /// Creates a player whose frames go to `sender`.
    ///
    /// The new player's `init` is already queued on `sender` when this
    /// returns.
    pub async fn connect(&self, sender: SessionSender) -> Result<PlayerId, SimError> {
        let (reply, rx) = oneshot::channel();
        self.command(SimCommand::Connect { sender, reply }).await?;
        rx.await.map_err(|_| SimError::Unavailable)?
    }

    /// Removes a player and tells everyone else.
    pub async fn disconnect(&self, player_id: PlayerId) -> Result<(), SimError> {
        let (reply, rx) = oneshot::channel();
        self.command(SimCommand::Disconnect { player_id, reply }).await?;
        rx.await.map_err(|_| SimError::Unavailable)
    }

    /// Forwards one client intent (fire-and-forget).
    pub async fn send(&self, player_id: PlayerId, msg: ClientMessage) -> Result<(), SimError> {
        self.command(SimCommand::Client { player_id, msg }).await
    }

    pub async fn info(&self) -> Result<SimInfo, SimError> {
        let (reply, rx) = oneshot::channel();
        self.command(SimCommand::Info { reply }).await?;
        rx.await.map_err(|_| SimError::Unavailable)
    }

    /// Stops the actor. Later calls on any handle fail with
    /// [`SimError::Unavailable`].
    pub async fn shutdown(&self) -> Result<(), SimError> {
        self.command(SimCommand::Shutdown).await
    }

    async fn command(&self, cmd: SimCommand) -> Result<(), SimError> {
        self.sender.send(cmd).await.map_err(|_| SimError::Unavailable)
    }
}
