//! The simulation actor for Fablehold.
//!
//! One Tokio task owns the [`World`](fablehold_world::World) and the
//! broadcast bus. Everything that touches world state goes through it:
//! client intents, joins and leaves arrive as commands on a bounded
//! channel, and the AI pass and both spawners fire from tick schedulers
//! inside the same `select!` loop. Each event runs to completion before
//! the next one starts, so world state needs no locks.
//!
//! # Key types
//!
//! - [`spawn_simulation`]: starts the actor
//! - [`SimHandle`]: cheap-to-clone handle for sending commands
//! - [`SimConfig`]: world settings, seed and tick schedules
//! - [`SimInfo`]: diagnostic snapshot

mod actor;
mod config;
mod error;
mod handle;

pub use actor::spawn_simulation;
pub use config::SimConfig;
pub use error::SimError;
pub use handle::{SimHandle, SimInfo};
