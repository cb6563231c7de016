//! Per-connection handler.
//!
//! Each accepted connection runs in its own task:
//!   1. Register a player with the simulation; its `init` is queued first.
//!   2. Spawn a writer task that drains the player's outbox to the socket.
//!   3. Read frames, decode them into `ClientMessage`s and forward them.
//!
//! Malformed frames are dropped and the connection stays open.

use std::sync::Arc;

use fablehold_protocol::{Codec, JsonCodec, PlayerId};
use fablehold_session::Frame;
use fablehold_sim::SimHandle;
use fablehold_transport::{Connection, WebSocketConnection};
use fablehold_world::ClientMessage;
use tokio::sync::mpsc;

use crate::FableholdError;

/// Removes the player from the simulation when the handler exits, even on
/// an early return or a panic. `Drop` is synchronous, so the disconnect
/// runs on a spawned task.
struct PlayerGuard {
    player_id: PlayerId,
    sim: SimHandle,
}

impl Drop for PlayerGuard {
    fn drop(&mut self) {
        let player_id = self.player_id;
        let sim = self.sim.clone();
        tokio::spawn(async move {
            if let Err(e) = sim.disconnect(player_id).await {
                tracing::debug!(%player_id, error = %e, "disconnect not delivered");
            }
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    sim: SimHandle,
) -> Result<(), FableholdError> {
    let conn = Arc::new(conn);
    let conn_id = conn.id();

    let (outbox, frames) = mpsc::unbounded_channel();
    let player_id = sim.connect(outbox).await?;
    let _guard = PlayerGuard {
        player_id,
        sim: sim.clone(),
    };
    tracing::info!(%conn_id, %player_id, "player connected");

    tokio::spawn(write_frames(Arc::clone(&conn), frames, player_id));

    let codec = JsonCodec;
    loop {
        let data = match conn.recv().await {
            Ok(Some(data)) => data,
            Ok(None) => {
                tracing::info!(%player_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "recv error");
                break;
            }
        };

        let msg: ClientMessage = match codec.decode(&data) {
            Ok(msg) => msg,
            Err(e) => {
                tracing::debug!(%player_id, error = %e, "dropping malformed frame");
                continue;
            }
        };

        sim.send(player_id, msg).await?;
    }

    Ok(())
}

/// Drains one player's outbox to its socket.
///
/// Ends when the simulation drops the session (the channel closes) or a
/// send fails. After a failed send the remaining frames are discarded.
async fn write_frames(
    conn: Arc<WebSocketConnection>,
    mut frames: mpsc::UnboundedReceiver<Frame>,
    player_id: PlayerId,
) {
    while let Some(frame) = frames.recv().await {
        if let Err(e) = conn.send(&frame).await {
            tracing::debug!(%player_id, error = %e, "send failed, writer stopping");
            break;
        }
    }
    let _ = conn.close().await;
}
