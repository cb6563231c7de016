//! Simulation configuration.

use fablehold_session::SessionConfig;
use fablehold_tick::TickConfig;
use fablehold_world::WorldConfig;

/// Everything needed to start a simulation actor.
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// Game constants.
    pub world: WorldConfig,

    /// Fixed RNG seed. `None` seeds from the OS.
    pub seed: Option<u64>,

    /// Capacity of the actor's command channel. Senders wait when it is
    /// full.
    pub command_buffer: usize,

    /// Session table settings.
    pub session: SessionConfig,

    /// Schedule of the monster AI pass.
    pub ai_tick: TickConfig,

    /// Schedule of the monster spawner.
    pub monster_spawn: TickConfig,

    /// Schedule of the herb spawner.
    pub item_spawn: TickConfig,
}

impl SimConfig {
    /// Builds a config whose tick schedules follow the periods in `world`.
    pub fn from_world(world: WorldConfig) -> Self {
        Self {
            ai_tick: TickConfig::every(world.ai_tick).labeled("ai"),
            monster_spawn: TickConfig::every(world.monster_spawn_interval)
                .labeled("monster-spawn"),
            item_spawn: TickConfig::every(world.item_spawn_interval)
                .labeled("item-spawn"),
            world,
            seed: None,
            command_buffer: 64,
            session: SessionConfig::default(),
        }
    }

    /// Same config with a fixed seed.
    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

impl Default for SimConfig {
    fn default() -> Self {
        Self::from_world(WorldConfig::default())
    }
}
