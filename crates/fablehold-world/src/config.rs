//! World configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::Position;

/// Every tunable constant of the simulation.
///
/// Distances are in world units, the world is a square of side
/// `world_size` with the origin in a corner. Durations use serde's
/// `{"secs", "nanos"}` form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorldConfig {
    /// Side length of the square world.
    pub world_size: f64,

    /// Period of the monster AI pass.
    pub ai_tick: Duration,

    /// Period of the monster spawner.
    pub monster_spawn_interval: Duration,

    /// Period of the herb spawner.
    pub item_spawn_interval: Duration,

    /// The monster spawner does nothing while this many monsters live.
    pub max_monsters: usize,

    /// The herb spawner does nothing while this many items lie around.
    /// Loot drops ignore the cap.
    pub max_items: usize,

    /// How close a player must be to hit a monster.
    pub melee_range: f64,

    /// How close a player must be to pick an item up.
    pub collect_range: f64,

    /// Radius in which an idle monster acquires a target.
    pub aggro_radius: f64,

    /// A monster drops its target beyond this distance.
    pub leash_radius: f64,

    /// A monster attacks instead of moving within this distance.
    pub monster_attack_range: f64,

    /// Minimum time between two attacks of the same monster.
    pub monster_attack_cooldown: Duration,

    /// Probability that a killed monster drops loot.
    pub loot_drop_chance: f64,

    /// Side length of one exploration tile.
    pub tile_size: f64,

    /// Maximum number of inventory entries.
    pub inventory_capacity: usize,

    /// Where new players appear and dead players respawn.
    pub spawn_point: Position,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            world_size: 3000.0,
            ai_tick: Duration::from_millis(50),
            monster_spawn_interval: Duration::from_millis(3000),
            item_spawn_interval: Duration::from_millis(5000),
            max_monsters: 50,
            max_items: 30,
            melee_range: 100.0,
            collect_range: 50.0,
            aggro_radius: 300.0,
            leash_radius: 400.0,
            monster_attack_range: 30.0,
            monster_attack_cooldown: Duration::from_millis(1000),
            loot_drop_chance: 0.3,
            tile_size: 100.0,
            inventory_capacity: 20,
            spawn_point: Position::new(500.0, 500.0),
        }
    }
}

impl WorldConfig {
    /// Number of exploration tiles along one side of the world.
    pub fn tiles_per_side(&self) -> i32 {
        (self.world_size / self.tile_size).ceil().max(1.0) as i32
    }

    /// Total number of exploration tiles.
    pub fn total_tiles(&self) -> u64 {
        let side = u64::from(self.tiles_per_side().unsigned_abs());
        side * side
    }

    /// Clamps probabilities and ranges into usable values.
    pub(crate) fn validated(mut self) -> Self {
        self.loot_drop_chance = self.loot_drop_chance.clamp(0.0, 1.0);
        if !(self.world_size > 0.0) {
            tracing::warn!(world_size = self.world_size, "invalid world size, using default");
            self.world_size = Self::default().world_size;
        }
        if !(self.tile_size > 0.0) {
            self.tile_size = Self::default().tile_size;
        }
        self
    }
}
