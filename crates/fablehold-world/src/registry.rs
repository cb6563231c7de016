//! Id allocation and storage for every live entity.
//!
//! The registry holds no game rules. It is owned by a [`World`](crate::World),
//! which is owned by exactly one task, so nothing here locks.

use std::collections::HashMap;

use fablehold_protocol::{ItemId, MonsterId, PlayerId};

use crate::entity::{Item, Monster, Player};

#[derive(Debug, Default)]
pub struct Registry {
    players: HashMap<PlayerId, Player>,
    monsters: HashMap<MonsterId, Monster>,
    items: HashMap<ItemId, Item>,
    last_player_id: u64,
    last_monster_id: u64,
    last_item_id: u64,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    // -- id allocation ------------------------------------------------------

    /// Allocates the next player id. Ids start at 1 and are never reused.
    pub fn next_player_id(&mut self) -> PlayerId {
        self.last_player_id += 1;
        PlayerId(self.last_player_id)
    }

    pub fn next_monster_id(&mut self) -> MonsterId {
        self.last_monster_id += 1;
        MonsterId(self.last_monster_id)
    }

    pub fn next_item_id(&mut self) -> ItemId {
        self.last_item_id += 1;
        ItemId(self.last_item_id)
    }

    // -- players ------------------------------------------------------------

    pub fn insert_player(&mut self, player: Player) {
        self.players.insert(player.id, player);
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.get(&id)
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.get_mut(&id)
    }

    pub fn remove_player(&mut self, id: PlayerId) -> Option<Player> {
        self.players.remove(&id)
    }

    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.values()
    }

    /// Players in ascending id order.
    pub fn players_sorted(&self) -> Vec<&Player> {
        let mut players: Vec<_> = self.players.values().collect();
        players.sort_by_key(|p| p.id);
        players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    // -- monsters -----------------------------------------------------------

    pub fn insert_monster(&mut self, monster: Monster) {
        self.monsters.insert(monster.id, monster);
    }

    pub fn monster(&self, id: MonsterId) -> Option<&Monster> {
        self.monsters.get(&id)
    }

    pub fn monster_mut(&mut self, id: MonsterId) -> Option<&mut Monster> {
        self.monsters.get_mut(&id)
    }

    pub fn remove_monster(&mut self, id: MonsterId) -> Option<Monster> {
        self.monsters.remove(&id)
    }

    pub fn monsters(&self) -> impl Iterator<Item = &Monster> {
        self.monsters.values()
    }

    /// Live monster ids in ascending order.
    pub fn monster_ids(&self) -> Vec<MonsterId> {
        let mut ids: Vec<_> = self.monsters.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub fn monster_count(&self) -> usize {
        self.monsters.len()
    }

    // -- items --------------------------------------------------------------

    pub fn insert_item(&mut self, item: Item) {
        self.items.insert(item.id, item);
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(&id)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(&id)
    }

    pub fn remove_item(&mut self, id: ItemId) -> Option<Item> {
        self.items.remove(&id)
    }

    pub fn items(&self) -> impl Iterator<Item = &Item> {
        self.items.values()
    }

    pub fn item_count(&self) -> usize {
        self.items.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ItemKind, Position};
    use crate::templates::MonsterKind;

    #[test]
    fn test_ids_are_monotonic_per_kind() {
        let mut reg = Registry::new();
        assert_eq!(reg.next_player_id(), PlayerId(1));
        assert_eq!(reg.next_player_id(), PlayerId(2));
        assert_eq!(reg.next_monster_id(), MonsterId(1));
        assert_eq!(reg.next_item_id(), ItemId(1));
    }

    #[test]
    fn test_ids_are_not_reused_after_removal() {
        let mut reg = Registry::new();
        let id = reg.next_monster_id();
        reg.insert_monster(Monster::new(id, MonsterKind::Slime, Position::default()));
        reg.remove_monster(id);
        assert_eq!(reg.next_monster_id(), MonsterId(2));
    }

    #[test]
    fn test_insert_lookup_remove_player() {
        let mut reg = Registry::new();
        let id = reg.next_player_id();
        reg.insert_player(Player::new(id, "Player1".into(), Position::default()));

        assert_eq!(reg.player(id).map(|p| p.name.as_str()), Some("Player1"));
        assert_eq!(reg.player_count(), 1);
        assert!(reg.remove_player(id).is_some());
        assert!(reg.player(id).is_none());
        assert!(reg.remove_player(id).is_none());
    }

    #[test]
    fn test_monster_ids_sorted() {
        let mut reg = Registry::new();
        for _ in 0..5 {
            let id = reg.next_monster_id();
            reg.insert_monster(Monster::new(id, MonsterKind::Orc, Position::default()));
        }
        reg.remove_monster(MonsterId(3));
        let expected = vec![MonsterId(1), MonsterId(2), MonsterId(4), MonsterId(5)];
        assert_eq!(reg.monster_ids(), expected);
    }

    #[test]
    fn test_items() {
        let mut reg = Registry::new();
        let id = reg.next_item_id();
        reg.insert_item(Item {
            id,
            kind: ItemKind::Herb,
            position: Position::default(),
            collected: false,
        });
        reg.item_mut(id).unwrap().collected = true;
        assert!(reg.item(id).unwrap().collected);
        assert_eq!(reg.item_count(), 1);
        assert_eq!(reg.items().count(), 1);
    }
}
