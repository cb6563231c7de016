//! The `World` value: everything the simulation mutates.

use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::WorldConfig;
use crate::registry::Registry;
use crate::templates::Catalog;

/// Registry, static data, configuration and the random source.
///
/// There is no global state: whoever owns a `World` owns the whole
/// simulation. The server keeps it inside a single actor task; tests
/// build one per case with a fixed seed.
#[derive(Debug)]
pub struct World {
    pub config: WorldConfig,
    pub catalog: Catalog,
    pub registry: Registry,
    pub(crate) rng: StdRng,
}

/// Entity counts, for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WorldStats {
    pub players: usize,
    pub monsters: usize,
    pub items: usize,
}

impl World {
    /// A world whose randomness is seeded from the OS.
    pub fn new(config: WorldConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// A world with reproducible randomness.
    pub fn seeded(config: WorldConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    fn with_rng(config: WorldConfig, rng: StdRng) -> Self {
        Self {
            config: config.validated(),
            catalog: Catalog::standard(),
            registry: Registry::new(),
            rng,
        }
    }

    pub fn stats(&self) -> WorldStats {
        WorldStats {
            players: self.registry.player_count(),
            monsters: self.registry.monster_count(),
            items: self.registry.item_count(),
        }
    }
}
