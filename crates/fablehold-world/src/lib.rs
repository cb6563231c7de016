//! Authoritative world state and game rules for Fablehold.
//!
//! Everything here is synchronous and free of I/O. Each operation takes
//! `&mut World`, validates its preconditions, mutates the registry and
//! returns the messages to send as an [`Outbound`] list of
//! `(Recipient, ServerMessage)` pairs. A failed precondition is a no-op
//! that returns an empty list.
//!
//! ```
//! use fablehold_world::{ClientMessage, World, WorldConfig};
//!
//! let mut world = World::seeded(WorldConfig::default(), 7);
//! let (id, _init) = world.join();
//! let out = world.handle(id, ClientMessage::Move { x: 5000.0, y: 10.0 });
//! assert_eq!(out.len(), 1); // playerMove for everyone else
//! assert_eq!(world.registry.player(id).unwrap().position.x, 3000.0);
//! ```

mod ai;
mod combat;
mod config;
mod dispatch;
mod entity;
mod inventory;
mod messages;
mod quest;
mod registry;
mod spawner;
mod templates;
mod world;

pub use combat::{apply_level_ups, exp_to_next_level};
pub use config::WorldConfig;
pub use entity::{
    ActiveQuest, EquipSlot, InventoryItem, Item, ItemClass, ItemKind, Monster, Player, PlayerPublic,
    Position, Tile,
};
pub use messages::{
    ClientMessage, CombatStats, MonsterPosition, Outbound, PlayerPatch, ServerMessage,
};
pub use registry::Registry;
pub use templates::{
    Catalog, MonsterKind, MonsterStats, Objective, QuestTemplate, Reward, ShopItem, StatBonus,
};
pub use world::{World, WorldStats};
