//! The simulation actor: a single Tokio task that owns the world.

use std::panic::{self, AssertUnwindSafe};

use fablehold_protocol::{JsonCodec, PlayerId};
use fablehold_session::{BroadcastBus, SessionError, SessionSender};
use fablehold_tick::TickScheduler;
use fablehold_world::{ClientMessage, Outbound, World};
use tokio::sync::{mpsc, oneshot};
use tokio::time::Instant;

use crate::{SimConfig, SimError, SimHandle, SimInfo};

/// Commands accepted by the actor.
///
/// Variants carrying a `oneshot::Sender` are requests; the handle waits
/// for the reply.
pub(crate) enum SimCommand {
    /// Create a player and register its outbound channel.
    Connect {
        sender: SessionSender,
        reply: oneshot::Sender<Result<PlayerId, SimError>>,
    },

    /// Remove a player.
    Disconnect {
        player_id: PlayerId,
        reply: oneshot::Sender<()>,
    },

    /// A decoded client intent.
    Client {
        player_id: PlayerId,
        msg: ClientMessage,
    },

    Info { reply: oneshot::Sender<SimInfo> },

    Shutdown,
}

struct SimActor {
    world: World,
    bus: BroadcastBus<JsonCodec>,
    receiver: mpsc::Receiver<SimCommand>,
    ai: TickScheduler,
    monster_spawn: TickScheduler,
    item_spawn: TickScheduler,
    /// Origin of the millisecond clock handed to the AI.
    clock: Instant,
}

impl SimActor {
    async fn run(mut self) {
        tracing::info!(
            ai_ms = self.world.config.ai_tick.as_millis() as u64,
            max_monsters = self.world.config.max_monsters,
            max_items = self.world.config.max_items,
            "simulation started"
        );

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    if !self.handle_command(cmd) {
                        break;
                    }
                }
                _ = self.ai.wait_for_tick() => {
                    let now = self.now_ms();
                    let out = self.world.run_ai(now);
                    self.bus.dispatch(out);
                    self.ai.record_tick_end();
                }
                _ = self.monster_spawn.wait_for_tick() => {
                    let out = self.world.spawn_monster();
                    self.bus.dispatch(out);
                    self.prune_sessions();
                    self.monster_spawn.record_tick_end();
                }
                _ = self.item_spawn.wait_for_tick() => {
                    let out = self.world.spawn_herb();
                    self.bus.dispatch(out);
                    self.item_spawn.record_tick_end();
                }
            }
        }

        tracing::info!(ai_ticks = self.ai.tick_count(), "simulation stopped");
    }

    /// Returns `false` when the actor should stop.
    fn handle_command(&mut self, cmd: SimCommand) -> bool {
        match cmd {
            SimCommand::Connect { sender, reply } => {
                let result = self.connect(sender);
                let _ = reply.send(result);
            }
            SimCommand::Disconnect { player_id, reply } => {
                self.disconnect(player_id);
                let _ = reply.send(());
            }
            SimCommand::Client { player_id, msg } => self.client(player_id, msg),
            SimCommand::Info { reply } => {
                let _ = reply.send(self.info());
            }
            SimCommand::Shutdown => {
                tracing::info!("simulation shutting down");
                return false;
            }
        }
        true
    }

    fn connect(&mut self, sender: SessionSender) -> Result<PlayerId, SimError> {
        // Dead sessions must leave the world too, not just the table.
        if self.bus.sessions().is_full() {
            self.prune_sessions();
        }
        let (player_id, out) = self.world.join();
        if let Err(e) = self.bus.attach(player_id, sender) {
            tracing::warn!(%player_id, error = %e, "session refused");
            self.world.leave(player_id);
            return Err(e.into());
        }
        self.bus.dispatch(out);
        Ok(player_id)
    }

    fn disconnect(&mut self, player_id: PlayerId) {
        match self.bus.detach(player_id) {
            Ok(_) | Err(SessionError::NotFound(_)) => {}
            Err(e) => tracing::warn!(%player_id, error = %e, "detach failed"),
        }
        let out = self.world.leave(player_id);
        self.bus.dispatch(out);
    }

    /// Applies one client intent. A panic inside the rules is logged and
    /// the message dropped; the actor keeps running.
    fn client(&mut self, player_id: PlayerId, msg: ClientMessage) {
        let world = &mut self.world;
        match panic::catch_unwind(AssertUnwindSafe(|| world.handle(player_id, msg))) {
            Ok(out) => self.publish(out),
            Err(_) => tracing::error!(%player_id, "message handler panicked, message dropped"),
        }
    }

    fn publish(&mut self, out: Outbound) {
        if !out.is_empty() {
            self.bus.dispatch(out);
        }
    }

    /// Removes players whose writer went away without a disconnect.
    fn prune_sessions(&mut self) {
        for player_id in self.bus.prune() {
            tracing::debug!(%player_id, "pruning closed session");
            let out = self.world.leave(player_id);
            self.bus.dispatch(out);
        }
    }

    fn info(&self) -> SimInfo {
        let stats = self.world.stats();
        SimInfo {
            players: stats.players,
            monsters: stats.monsters,
            items: stats.items,
            sessions: self.bus.sessions().len(),
            ai_ticks: self.ai.tick_count(),
        }
    }

    fn now_ms(&self) -> u64 {
        self.clock.elapsed().as_millis() as u64
    }
}

/// Spawns the simulation actor and returns a handle to it.
///
/// The command channel holds `config.command_buffer` entries; senders
/// wait when it is full.
pub fn spawn_simulation(config: SimConfig) -> SimHandle {
    let (tx, rx) = mpsc::channel(config.command_buffer.max(1));

    let world = match config.seed {
        Some(seed) => World::seeded(config.world, seed),
        None => World::new(config.world),
    };

    let actor = SimActor {
        world,
        bus: BroadcastBus::new(JsonCodec, config.session),
        receiver: rx,
        ai: TickScheduler::new(config.ai_tick),
        monster_spawn: TickScheduler::new(config.monster_spawn),
        item_spawn: TickScheduler::new(config.item_spawn),
        clock: Instant::now(),
    };

    tokio::spawn(actor.run());

    SimHandle::new(tx)
}
