//! Players, monsters and ground items.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use fablehold_protocol::{ItemId, MonsterId, PlayerId};
use serde::{Deserialize, Serialize};

use crate::templates::{MonsterKind, QuestTemplate, ShopItem, StatBonus};

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A point in the world. Serialized flat into its owner as `x` / `y`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Moves `step` units toward `target`. Never overshoots.
    pub fn step_toward(&self, target: &Position, step: f64) -> Position {
        let dist = self.distance(target);
        if dist <= step || dist == 0.0 {
            return *target;
        }
        let angle = (target.y - self.y).atan2(target.x - self.x);
        Position::new(self.x + angle.cos() * step, self.y + angle.sin() * step)
    }

    /// Clamps both coordinates into `[0, size]`.
    pub fn clamped(&self, size: f64) -> Position {
        Position::new(self.x.clamp(0.0, size), self.y.clamp(0.0, size))
    }
}

/// Coordinates of one exploration tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(pub i32, pub i32);

// ---------------------------------------------------------------------------
// Inventory
// ---------------------------------------------------------------------------

/// What an inventory entry (or shop offer) is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemClass {
    Herb,
    Weapon,
    Armor,
    Boots,
    Potion,
    #[serde(rename = "mana_potion")]
    ManaPotion,
}

impl ItemClass {
    /// The equipment slot this class goes into, if any.
    pub fn slot(self) -> Option<EquipSlot> {
        match self {
            Self::Weapon => Some(EquipSlot::Weapon),
            Self::Armor => Some(EquipSlot::Armor),
            Self::Boots => Some(EquipSlot::Boots),
            Self::Herb | Self::Potion | Self::ManaPotion => None,
        }
    }

    pub fn is_potion(self) -> bool {
        matches!(self, Self::Potion | Self::ManaPotion)
    }
}

/// Equipment slots. At most one item per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EquipSlot {
    Weapon,
    Armor,
    Boots,
}

/// One entry in a player's inventory or equipment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Shop id of the item, absent for gathered herbs.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u32>,
    pub name: String,
    #[serde(rename = "type")]
    pub class: ItemClass,
    #[serde(flatten)]
    pub bonus: StatBonus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<u64>,
}

impl InventoryItem {
    pub fn herb() -> Self {
        Self {
            id: None,
            name: "Herb".to_string(),
            class: ItemClass::Herb,
            bonus: StatBonus::default(),
            price: None,
        }
    }
}

impl From<&ShopItem> for InventoryItem {
    fn from(item: &ShopItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.name.clone(),
            class: item.class,
            bonus: item.bonus.clone(),
            price: Some(item.price),
        }
    }
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

/// A quest a player has accepted, with its progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActiveQuest {
    #[serde(flatten)]
    pub quest: QuestTemplate,
    pub progress: u32,
}

impl ActiveQuest {
    pub fn new(quest: QuestTemplate) -> Self {
        Self { quest, progress: 0 }
    }

    pub fn is_done(&self) -> bool {
        self.progress >= self.quest.count
    }

    /// Raises progress to `value`, clamped to the required count. Never
    /// lowers it. Returns `true` if progress changed.
    pub fn raise_to(&mut self, value: u32) -> bool {
        let next = value.min(self.quest.count);
        if next > self.progress {
            self.progress = next;
            true
        } else {
            false
        }
    }
}

// ---------------------------------------------------------------------------
// Player
// ---------------------------------------------------------------------------

/// A connected player. Created on connect, destroyed on disconnect.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    #[serde(flatten)]
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub mana: i32,
    pub max_mana: i32,
    pub level: u32,
    pub exp: u64,
    pub gold: u64,
    pub damage: i32,
    pub defense: i32,
    pub speed: f64,
    pub inventory: Vec<InventoryItem>,
    pub equipment: BTreeMap<EquipSlot, InventoryItem>,
    /// Ids of completed quests.
    #[serde(rename = "quests")]
    pub completed_quests: BTreeSet<u32>,
    pub active_quests: Vec<ActiveQuest>,
    #[serde(skip)]
    pub explored: HashSet<Tile>,
    pub kills: BTreeMap<MonsterKind, u32>,
}

impl Player {
    /// A fresh level 1 player standing at `position`.
    pub fn new(id: PlayerId, name: String, position: Position) -> Self {
        Self {
            id,
            name,
            position,
            hp: 100,
            max_hp: 100,
            mana: 50,
            max_mana: 50,
            level: 1,
            exp: 0,
            gold: 100,
            damage: 10,
            defense: 0,
            speed: 2.0,
            inventory: Vec::new(),
            equipment: BTreeMap::new(),
            completed_quests: BTreeSet::new(),
            active_quests: Vec::new(),
            explored: HashSet::new(),
            kills: BTreeMap::new(),
        }
    }

    pub fn public(&self) -> PlayerPublic {
        PlayerPublic {
            id: self.id,
            name: self.name.clone(),
            position: self.position,
            level: self.level,
            hp: self.hp,
            max_hp: self.max_hp,
        }
    }

    pub fn has_active_quest(&self, quest_id: u32) -> bool {
        self.active_quests.iter().any(|q| q.quest.id == quest_id)
    }
}

/// The part of a player other players get to see.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPublic {
    pub id: PlayerId,
    pub name: String,
    #[serde(flatten)]
    pub position: Position,
    pub level: u32,
    pub hp: i32,
    pub max_hp: i32,
}

// ---------------------------------------------------------------------------
// Monster
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Monster {
    pub id: MonsterId,
    #[serde(rename = "type")]
    pub kind: MonsterKind,
    pub name: String,
    #[serde(flatten)]
    pub position: Position,
    pub hp: i32,
    pub max_hp: i32,
    pub damage: i32,
    pub exp: u64,
    pub gold: u64,
    pub speed: f64,
    /// Looked up again on every AI pass; may point at a player who left.
    pub target_player_id: Option<PlayerId>,
    /// Simulation clock (ms) of the last attack.
    pub last_attack: Option<u64>,
}

impl Monster {
    pub fn new(id: MonsterId, kind: MonsterKind, position: Position) -> Self {
        let stats = kind.stats();
        Self {
            id,
            kind,
            name: stats.name.to_string(),
            position,
            hp: stats.hp,
            max_hp: stats.hp,
            damage: stats.damage,
            exp: stats.exp,
            gold: stats.gold,
            speed: stats.speed,
            target_player_id: None,
            last_attack: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Ground items
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ItemKind {
    Herb,
    Loot,
}

/// An item lying in the world.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    #[serde(rename = "type")]
    pub kind: ItemKind,
    #[serde(flatten)]
    pub position: Position,
    pub collected: bool,
}
