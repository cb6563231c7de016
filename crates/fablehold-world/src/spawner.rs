//! Populating the world with monsters and items.

use fablehold_protocol::Recipient;
use rand::Rng;

use crate::entity::{Item, ItemKind, Monster, Position};
use crate::messages::{Outbound, ServerMessage};
use crate::templates::MonsterKind;
use crate::world::World;

impl World {
    /// Spawns one monster of a random kind at a random position.
    ///
    /// Does nothing once `max_monsters` are alive.
    pub fn spawn_monster(&mut self) -> Outbound {
        if self.registry.monster_count() >= self.config.max_monsters {
            return Vec::new();
        }
        let kind = MonsterKind::ALL[self.rng.random_range(0..MonsterKind::ALL.len())];
        let position = self.random_position();
        self.insert_monster(kind, position)
    }

    /// Places a monster of `kind` at `position`, ignoring the cap.
    pub fn insert_monster(&mut self, kind: MonsterKind, position: Position) -> Outbound {
        let id = self.registry.next_monster_id();
        let monster = Monster::new(id, kind, position);
        tracing::trace!(monster_id = %id, ?kind, "monster spawned");
        self.registry.insert_monster(monster.clone());
        vec![(Recipient::All, ServerMessage::MonsterSpawned { monster })]
    }

    /// Spawns one herb at a random position.
    ///
    /// Does nothing once `max_items` items lie around.
    pub fn spawn_herb(&mut self) -> Outbound {
        if self.registry.item_count() >= self.config.max_items {
            return Vec::new();
        }
        let position = self.random_position();
        self.insert_item(ItemKind::Herb, position)
    }

    /// Drops loot where a monster died. Not subject to the item cap.
    pub(crate) fn drop_loot(&mut self, position: Position) -> Outbound {
        self.insert_item(ItemKind::Loot, position)
    }

    /// Places an item of `kind` at `position`, ignoring the cap.
    pub fn insert_item(&mut self, kind: ItemKind, position: Position) -> Outbound {
        let id = self.registry.next_item_id();
        let item = Item {
            id,
            kind,
            position,
            collected: false,
        };
        tracing::trace!(item_id = %id, ?kind, "item spawned");
        self.registry.insert_item(item.clone());
        vec![(Recipient::All, ServerMessage::ItemSpawned { item })]
    }

    fn random_position(&mut self) -> Position {
        let size = self.config.world_size;
        let x = self.rng.random_range(0.0..size);
        let y = self.rng.random_range(0.0..size);
        Position::new(x, y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;

    fn world(config: WorldConfig) -> World {
        World::seeded(config, 11)
    }

    #[test]
    fn test_spawn_monster_inside_world() {
        let mut w = world(WorldConfig::default());
        for _ in 0..20 {
            let out = w.spawn_monster();
            assert_eq!(out.len(), 1);
            assert!(matches!(out[0], (Recipient::All, ServerMessage::MonsterSpawned { .. })));
        }
        for m in w.registry.monsters() {
            assert!((0.0..3000.0).contains(&m.position.x));
            assert!((0.0..3000.0).contains(&m.position.y));
            assert_eq!(m.hp, m.max_hp);
        }
    }

    #[test]
    fn test_spawn_monster_respects_cap() {
        let mut w = world(WorldConfig {
            max_monsters: 2,
            ..Default::default()
        });
        w.spawn_monster();
        w.spawn_monster();

        assert!(w.spawn_monster().is_empty());
        assert_eq!(w.registry.monster_count(), 2);
    }

    #[test]
    fn test_spawn_herb_respects_cap() {
        let mut w = world(WorldConfig {
            max_items: 1,
            ..Default::default()
        });
        assert_eq!(w.spawn_herb().len(), 1);
        assert!(w.spawn_herb().is_empty());
        assert_eq!(w.registry.items().next().map(|i| i.kind), Some(ItemKind::Herb));
    }

    #[test]
    fn test_loot_ignores_item_cap() {
        let mut w = world(WorldConfig {
            max_items: 1,
            ..Default::default()
        });
        w.spawn_herb();
        let out = w.drop_loot(Position::new(10.0, 10.0));

        assert_eq!(out.len(), 1);
        assert_eq!(w.registry.item_count(), 2);
    }

    #[test]
    fn test_spawn_kinds_cover_table() {
        let mut w = world(WorldConfig {
            max_monsters: 200,
            ..Default::default()
        });
        for _ in 0..200 {
            w.spawn_monster();
        }
        for kind in MonsterKind::ALL {
            assert!(w.registry.monsters().any(|m| m.kind == kind), "{kind:?} never spawned");
        }
    }
}
