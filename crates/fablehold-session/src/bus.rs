//! The broadcast bus: encodes server events once and routes them to
//! sessions.

use fablehold_protocol::{Codec, PlayerId, Recipient};
use serde::Serialize;

use crate::{Frame, Session, SessionConfig, SessionError, SessionManager, SessionSender};

/// Owns the session table and delivers outbound messages.
///
/// Within one call, messages are queued in the order given, so each
/// recipient observes them in that order. Delivery to a session whose
/// writer has gone away fails silently and closes that session.
pub struct BroadcastBus<C: Codec> {
    sessions: SessionManager,
    codec: C,
}

impl<C: Codec> BroadcastBus<C> {
    pub fn new(codec: C, config: SessionConfig) -> Self {
        Self {
            sessions: SessionManager::new(config),
            codec,
        }
    }

    /// Registers the outbound channel of a joining player.
    pub fn attach(
        &mut self,
        player_id: PlayerId,
        sender: SessionSender,
    ) -> Result<(), SessionError> {
        self.sessions.create(player_id, sender).map(|_| ())
    }

    /// Unregisters a player. Nothing is delivered to it afterwards.
    pub fn detach(&mut self, player_id: PlayerId) -> Result<Session, SessionError> {
        self.sessions.remove(player_id)
    }

    /// Sends one message to one player.
    ///
    /// Returns `Ok(false)` if the player has no open session.
    pub fn send_to<M: Serialize>(
        &mut self,
        player_id: PlayerId,
        msg: &M,
    ) -> Result<bool, SessionError> {
        let Some(session) = self.sessions.get_mut(&player_id) else {
            return Ok(false);
        };
        let frame: Frame = self.codec.encode(msg)?.into();
        Ok(session.push(&frame))
    }

    /// Sends one message to every open session except `exclude`.
    ///
    /// The message is encoded once. Returns how many sessions accepted
    /// the frame.
    pub fn broadcast<M: Serialize>(
        &mut self,
        msg: &M,
        exclude: Option<PlayerId>,
    ) -> Result<usize, SessionError> {
        let frame: Frame = self.codec.encode(msg)?.into();
        Ok(self.fan_out(&frame, |id| Some(id) != exclude))
    }

    /// Routes one message according to `recipient`.
    pub fn deliver<M: Serialize>(
        &mut self,
        recipient: Recipient,
        msg: &M,
    ) -> Result<usize, SessionError> {
        match recipient {
            Recipient::Player(id) => self.send_to(id, msg).map(usize::from),
            Recipient::All => self.broadcast(msg, None),
            Recipient::AllExcept(id) => self.broadcast(msg, Some(id)),
        }
    }

    /// Delivers a batch of routed messages in order.
    ///
    /// A message that fails to encode is logged and skipped; the rest of
    /// the batch still goes out.
    pub fn dispatch<M, I>(&mut self, messages: I) -> usize
    where
        M: Serialize,
        I: IntoIterator<Item = (Recipient, M)>,
    {
        let mut delivered = 0;
        for (recipient, msg) in messages {
            match self.deliver(recipient, &msg) {
                Ok(n) => delivered += n,
                Err(e) => tracing::error!(?recipient, error = %e, "failed to deliver message"),
            }
        }
        delivered
    }

    /// Drops closed sessions. See [`SessionManager::prune_closed`].
    pub fn prune(&mut self) -> Vec<PlayerId> {
        self.sessions.prune_closed()
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    fn fan_out(&mut self, frame: &Frame, mut include: impl FnMut(PlayerId) -> bool) -> usize {
        self.sessions
            .iter_mut()
            .filter(|s| include(s.player_id))
            .map(|s| s.push(frame))
            .filter(|accepted| *accepted)
            .count()
    }
}
