//! Player attacks, pickups and level progression.

use fablehold_protocol::{ItemId, MonsterId, PlayerId, Recipient};
use rand::Rng;

use crate::entity::{InventoryItem, ItemKind, Player};
use crate::messages::{Outbound, PlayerPatch, ServerMessage};
use crate::quest::advance_quests;
use crate::templates::Objective;
use crate::world::World;

/// Experience needed to leave `level`.
pub fn exp_to_next_level(level: u32) -> u64 {
    u64::from(level) * 100
}

/// Applies every level-up the player's experience pays for.
///
/// Each level costs `level * 100` exp and grants +20 max hp, +10 max
/// mana and +5 damage; hp and mana are refilled. Returns the number of
/// levels gained.
pub fn apply_level_ups(player: &mut Player) -> u32 {
    let mut gained = 0;
    loop {
        let required = exp_to_next_level(player.level);
        if player.exp < required {
            break;
        }
        player.exp -= required;
        player.level += 1;
        player.max_hp += 20;
        player.hp = player.max_hp;
        player.max_mana += 10;
        player.mana = player.max_mana;
        player.damage += 5;
        gained += 1;
    }
    if gained > 0 {
        tracing::info!(player_id = %player.id, level = player.level, "level up");
    }
    gained
}

impl World {
    /// A player hits a monster.
    ///
    /// No-op unless both exist and they are within melee range. The
    /// killing blow removes the monster, so a second attack on the same
    /// id finds nothing and the reward is paid exactly once.
    pub fn resolve_attack(&mut self, player_id: PlayerId, monster_id: MonsterId) -> Outbound {
        let Some(attacker) = self.registry.player(player_id) else {
            return Vec::new();
        };
        let (damage, from) = (attacker.damage, attacker.position);

        let Some(monster) = self.registry.monster_mut(monster_id) else {
            tracing::debug!(%player_id, %monster_id, "attack on missing monster ignored");
            return Vec::new();
        };
        if from.distance(&monster.position) > self.config.melee_range {
            tracing::debug!(%player_id, %monster_id, "attack out of range ignored");
            return Vec::new();
        }

        monster.hp -= damage;
        let mut out = vec![(
            Recipient::All,
            ServerMessage::MonsterDamage {
                monster_id,
                damage,
                hp: monster.hp.max(0),
            },
        )];
        if monster.hp > 0 {
            return out;
        }

        let Some(dead) = self.registry.remove_monster(monster_id) else {
            return out;
        };
        tracing::debug!(%player_id, %monster_id, kind = ?dead.kind, "monster killed");

        if self.rng.random_bool(self.config.loot_drop_chance) {
            out.extend(self.drop_loot(dead.position));
        }

        let Some(player) = self.registry.player_mut(player_id) else {
            return out;
        };
        player.exp += dead.exp;
        player.gold += dead.gold;
        *player.kills.entry(dead.kind).or_insert(0) += 1;
        advance_quests(player, Objective::Kill(dead.kind));
        if apply_level_ups(player) > 0 {
            let level = player.level;
            out.push((
                Recipient::Player(player_id),
                ServerMessage::LevelUp { level },
            ));
        }
        let player = PlayerPatch::after_kill(player);

        out.push((Recipient::All, ServerMessage::MonsterDied { monster_id }));
        out.push((
            Recipient::Player(player_id),
            ServerMessage::UpdatePlayer { player },
        ));
        out
    }

    /// A player picks an item up.
    ///
    /// No-op if the item is gone or already collected, out of range, or
    /// a herb that would not fit in a full inventory.
    pub fn resolve_collect(&mut self, player_id: PlayerId, item_id: ItemId) -> Outbound {
        let Some(player) = self.registry.player(player_id) else {
            return Vec::new();
        };
        let Some(item) = self.registry.item(item_id) else {
            tracing::debug!(%player_id, %item_id, "collect of missing item ignored");
            return Vec::new();
        };
        if item.collected || player.position.distance(&item.position) > self.config.collect_range {
            return Vec::new();
        }
        if item.kind == ItemKind::Herb && player.inventory.len() >= self.config.inventory_capacity {
            tracing::debug!(%player_id, %item_id, "inventory full, herb left on the ground");
            return Vec::new();
        }

        let Some(mut item) = self.registry.remove_item(item_id) else {
            return Vec::new();
        };
        item.collected = true;
        let loot_gold = match item.kind {
            ItemKind::Loot => self.rng.random_range(10..30),
            ItemKind::Herb => 0,
        };

        let Some(player) = self.registry.player_mut(player_id) else {
            return Vec::new();
        };
        match item.kind {
            ItemKind::Herb => {
                player.inventory.push(InventoryItem::herb());
                advance_quests(player, Objective::Collect(ItemKind::Herb));
            }
            ItemKind::Loot => player.gold += loot_gold,
        }

        vec![
            (Recipient::All, ServerMessage::ItemCollected { item_id }),
            (
                Recipient::Player(player_id),
                ServerMessage::UpdatePlayer {
                    player: PlayerPatch::after_collect(player),
                },
            ),
        ]
    }
}
