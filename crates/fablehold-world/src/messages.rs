//! Wire messages exchanged with clients.
//!
//! Every frame is a JSON object with a `type` discriminator and
//! camelCase field names.

use std::collections::{BTreeMap, BTreeSet};

use fablehold_protocol::{ItemId, MonsterId, PlayerId, Recipient};
use serde::{Deserialize, Serialize};

use crate::entity::{ActiveQuest, EquipSlot, InventoryItem, Item, Monster, Player, PlayerPublic};
use crate::templates::{QuestTemplate, Reward, ShopItem};

/// Messages produced by a world operation, in delivery order.
pub type Outbound = Vec<(Recipient, ServerMessage)>;

// ---------------------------------------------------------------------------
// Client → Server
// ---------------------------------------------------------------------------

/// Intents a client can send.
///
/// An unknown `type` or a missing field fails to decode, and the frame is
/// dropped before it reaches the world.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ClientMessage {
    Move { x: f64, y: f64 },
    Attack { monster_id: MonsterId },
    CollectItem { item_id: ItemId },
    AcceptQuest { quest_id: u32 },
    CompleteQuest { quest_id: u32 },
    BuyItem { item_id: u32 },
    EquipItem { index: usize },
    UsePotion,
}

// ---------------------------------------------------------------------------
// Server → Client
// ---------------------------------------------------------------------------

/// Events the server sends.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ServerMessage {
    /// Full snapshot for a newly connected client.
    Init {
        player_id: PlayerId,
        player: Box<Player>,
        players: Vec<PlayerPublic>,
        monsters: Vec<Monster>,
        items: Vec<Item>,
        quests: BTreeMap<u32, QuestTemplate>,
        shop_items: BTreeMap<u32, ShopItem>,
    },
    PlayerJoined {
        player: PlayerPublic,
    },
    PlayerLeft {
        id: PlayerId,
    },
    PlayerMove {
        id: PlayerId,
        x: f64,
        y: f64,
    },
    /// `hp` is never negative.
    MonsterDamage {
        monster_id: MonsterId,
        damage: i32,
        hp: i32,
    },
    MonsterDied {
        monster_id: MonsterId,
    },
    /// A monster hit a player.
    Damage {
        target_id: PlayerId,
        damage: i32,
        hp: i32,
    },
    ItemCollected {
        item_id: ItemId,
    },
    UpdatePlayer {
        player: PlayerPatch,
    },
    LevelUp {
        level: u32,
    },
    QuestAccepted {
        quest: ActiveQuest,
    },
    QuestCompleted {
        reward: Reward,
        player: PlayerPatch,
    },
    ItemBought {
        item: ShopItem,
        gold: u64,
        inventory: Vec<InventoryItem>,
    },
    ItemEquipped {
        equipment: BTreeMap<EquipSlot, InventoryItem>,
        inventory: Vec<InventoryItem>,
        stats: CombatStats,
    },
    PotionUsed {
        hp: i32,
        mana: i32,
        inventory: Vec<InventoryItem>,
    },
    MonsterSpawned {
        monster: Monster,
    },
    ItemSpawned {
        item: Item,
    },
    /// Positions of every monster that moved during one AI pass.
    MonstersMoved {
        monsters: Vec<MonsterPosition>,
    },
}

impl ServerMessage {
    /// The `type` tag this message carries on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Init { .. } => "init",
            Self::PlayerJoined { .. } => "playerJoined",
            Self::PlayerLeft { .. } => "playerLeft",
            Self::PlayerMove { .. } => "playerMove",
            Self::MonsterDamage { .. } => "monsterDamage",
            Self::MonsterDied { .. } => "monsterDied",
            Self::Damage { .. } => "damage",
            Self::ItemCollected { .. } => "itemCollected",
            Self::UpdatePlayer { .. } => "updatePlayer",
            Self::LevelUp { .. } => "levelUp",
            Self::QuestAccepted { .. } => "questAccepted",
            Self::QuestCompleted { .. } => "questCompleted",
            Self::ItemBought { .. } => "itemBought",
            Self::ItemEquipped { .. } => "itemEquipped",
            Self::PotionUsed { .. } => "potionUsed",
            Self::MonsterSpawned { .. } => "monsterSpawned",
            Self::ItemSpawned { .. } => "itemSpawned",
            Self::MonstersMoved { .. } => "monstersMoved",
        }
    }
}

/// A subset of player fields. Only the fields that are set go on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gold: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_hp: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inventory: Option<Vec<InventoryItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quests: Option<BTreeSet<u32>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active_quests: Option<Vec<ActiveQuest>>,
}

impl PlayerPatch {
    /// Progression fields sent after a kill.
    pub fn after_kill(player: &Player) -> Self {
        Self {
            exp: Some(player.exp),
            gold: Some(player.gold),
            level: Some(player.level),
            hp: Some(player.hp),
            max_hp: Some(player.max_hp),
            active_quests: Some(player.active_quests.clone()),
            ..Default::default()
        }
    }

    /// Inventory fields sent after a pickup.
    pub fn after_collect(player: &Player) -> Self {
        Self {
            gold: Some(player.gold),
            inventory: Some(player.inventory.clone()),
            active_quests: Some(player.active_quests.clone()),
            ..Default::default()
        }
    }

    /// Quest fields sent after turning a quest in.
    pub fn after_quest(player: &Player) -> Self {
        Self {
            exp: Some(player.exp),
            gold: Some(player.gold),
            level: Some(player.level),
            hp: Some(player.hp),
            max_hp: Some(player.max_hp),
            quests: Some(player.completed_quests.clone()),
            active_quests: Some(player.active_quests.clone()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CombatStats {
    pub damage: i32,
    pub defense: i32,
    pub speed: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MonsterPosition {
    pub id: MonsterId,
    pub x: f64,
    pub y: f64,
}
