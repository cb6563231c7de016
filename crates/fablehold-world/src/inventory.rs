//! Shop purchases, equipment and potions.

use fablehold_protocol::{PlayerId, Recipient};

use crate::entity::{InventoryItem, Player};
use crate::messages::{CombatStats, Outbound, ServerMessage};
use crate::world::World;

impl World {
    /// Buys shop item `item_id`.
    ///
    /// No-op for an unknown item, too little gold or a full inventory.
    pub fn buy_item(&mut self, player_id: PlayerId, item_id: u32) -> Outbound {
        let Some(offer) = self.catalog.shop.get(&item_id) else {
            return Vec::new();
        };
        let Some(player) = self.registry.player_mut(player_id) else {
            return Vec::new();
        };
        if player.gold < offer.price || player.inventory.len() >= self.config.inventory_capacity {
            tracing::debug!(%player_id, item_id, gold = player.gold, "purchase refused");
            return Vec::new();
        }

        player.gold -= offer.price;
        player.inventory.push(InventoryItem::from(offer));
        vec![(
            Recipient::Player(player_id),
            ServerMessage::ItemBought {
                item: offer.clone(),
                gold: player.gold,
                inventory: player.inventory.clone(),
            },
        )]
    }

    /// Moves inventory entry `index` into its equipment slot.
    ///
    /// An item already in that slot goes back to the inventory and its
    /// bonuses are removed first. No-op for a bad index or an item that
    /// has no slot.
    pub fn equip_item(&mut self, player_id: PlayerId, index: usize) -> Outbound {
        let Some(player) = self.registry.player_mut(player_id) else {
            return Vec::new();
        };
        let Some(slot) = player
            .inventory
            .get(index)
            .and_then(|i| i.class.slot())
        else {
            tracing::debug!(%player_id, index, "nothing equippable at index");
            return Vec::new();
        };

        let item = player.inventory.remove(index);
        if let Some(previous) = player.equipment.remove(&slot) {
            apply_bonus(player, &previous, false);
            player.inventory.push(previous);
        }
        apply_bonus(player, &item, true);
        player.equipment.insert(slot, item);

        vec![(
            Recipient::Player(player_id),
            ServerMessage::ItemEquipped {
                equipment: player.equipment.clone(),
                inventory: player.inventory.clone(),
                stats: CombatStats {
                    damage: player.damage,
                    defense: player.defense,
                    speed: player.speed,
                },
            },
        )]
    }

    /// Drinks the first potion in the inventory.
    ///
    /// Healing and mana are clamped to the maximums. No-op without a
    /// potion.
    pub fn use_potion(&mut self, player_id: PlayerId) -> Outbound {
        let Some(player) = self.registry.player_mut(player_id) else {
            return Vec::new();
        };
        let Some(index) = player
            .inventory
            .iter()
            .position(|i| i.class.is_potion())
        else {
            return Vec::new();
        };

        let potion = player.inventory.remove(index);
        if let Some(healing) = potion.bonus.healing {
            player.hp = (player.hp + healing).min(player.max_hp);
        }
        if let Some(mana) = potion.bonus.mana {
            player.mana = (player.mana + mana).min(player.max_mana);
        }

        vec![(
            Recipient::Player(player_id),
            ServerMessage::PotionUsed {
                hp: player.hp,
                mana: player.mana,
                inventory: player.inventory.clone(),
            },
        )]
    }
}

/// Adds (`equip == true`) or removes an item's combat bonuses.
fn apply_bonus(player: &mut Player, item: &InventoryItem, equip: bool) {
    let sign = if equip { 1 } else { -1 };
    if let Some(damage) = item.bonus.damage {
        player.damage += sign * damage;
    }
    if let Some(defense) = item.bonus.defense {
        player.defense += sign * defense;
    }
    if let Some(speed) = item.bonus.speed.filter(|s| *s > 0.0) {
        if equip {
            player.speed *= speed;
        } else {
            player.speed /= speed;
        }
    }
}
