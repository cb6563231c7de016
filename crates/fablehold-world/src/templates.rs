//! Static game data: monster stats, quests and the shop.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::entity::{ItemClass, ItemKind};

// ---------------------------------------------------------------------------
// Monsters
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum MonsterKind {
    Slime,
    Wolf,
    Goblin,
    Orc,
}

/// Base stats shared by every monster of one kind.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonsterStats {
    pub name: &'static str,
    pub hp: i32,
    pub damage: i32,
    pub exp: u64,
    pub gold: u64,
    pub speed: f64,
}

impl MonsterKind {
    pub const ALL: [MonsterKind; 4] = [Self::Slime, Self::Wolf, Self::Goblin, Self::Orc];

    pub fn stats(self) -> MonsterStats {
        match self {
            Self::Slime => MonsterStats {
                name: "Slime",
                hp: 50,
                damage: 5,
                exp: 20,
                gold: 10,
                speed: 0.5,
            },
            Self::Wolf => MonsterStats {
                name: "Wolf",
                hp: 100,
                damage: 15,
                exp: 50,
                gold: 25,
                speed: 1.2,
            },
            Self::Goblin => MonsterStats {
                name: "Goblin",
                hp: 80,
                damage: 12,
                exp: 40,
                gold: 20,
                speed: 1.0,
            },
            Self::Orc => MonsterStats {
                name: "Orc",
                hp: 150,
                damage: 25,
                exp: 100,
                gold: 50,
                speed: 0.8,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// Quests
// ---------------------------------------------------------------------------

/// What a quest asks for. Serialized flat as `type` + `target`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "target", rename_all = "camelCase")]
pub enum Objective {
    /// Kill monsters of one kind.
    Kill(MonsterKind),
    /// Pick up items of one kind.
    Collect(ItemKind),
    /// Reveal a percentage of the map's tiles.
    Explore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    pub gold: u64,
    pub exp: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestTemplate {
    pub id: u32,
    pub name: String,
    pub desc: String,
    #[serde(flatten)]
    pub objective: Objective,
    /// Required count; a percentage for explore quests.
    pub count: u32,
    pub reward: Reward,
}

// ---------------------------------------------------------------------------
// Shop
// ---------------------------------------------------------------------------

/// Stat changes an item carries. Absent fields are omitted on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatBonus {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub damage: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub defense: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub magic: Option<i32>,
    /// Multiplier applied to the wearer's speed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub healing: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mana: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShopItem {
    pub id: u32,
    pub name: String,
    #[serde(rename = "type")]
    pub class: ItemClass,
    #[serde(flatten)]
    pub bonus: StatBonus,
    pub price: u64,
}

// ---------------------------------------------------------------------------
// Catalog
// ---------------------------------------------------------------------------

/// The static templates the world hands out. Keyed by id so they
/// serialize as `{"1": {...}, ...}`.
#[derive(Debug, Clone)]
pub struct Catalog {
    pub quests: BTreeMap<u32, QuestTemplate>,
    pub shop: BTreeMap<u32, ShopItem>,
}

impl Catalog {
    pub fn standard() -> Self {
        let quests = [
            quest(
                1,
                "First Hunt",
                "Slay 5 slimes",
                Objective::Kill(MonsterKind::Slime),
                5,
                100,
                50,
            ),
            quest(
                2,
                "Herb Gathering",
                "Gather 10 herbs",
                Objective::Collect(ItemKind::Herb),
                10,
                150,
                75,
            ),
            quest(
                3,
                "Forest Warden",
                "Slay 3 wolves",
                Objective::Kill(MonsterKind::Wolf),
                3,
                200,
                100,
            ),
            quest(
                4,
                "Explorer",
                "Reveal 80% of the map",
                Objective::Explore,
                80,
                300,
                150,
            ),
        ];
        let shop = [
            shop_item(
                1,
                "Iron Sword",
                ItemClass::Weapon,
                150,
                StatBonus {
                    damage: Some(15),
                    ..Default::default()
                },
            ),
            shop_item(
                2,
                "Steel Armor",
                ItemClass::Armor,
                200,
                StatBonus {
                    defense: Some(10),
                    ..Default::default()
                },
            ),
            shop_item(
                3,
                "Health Potion",
                ItemClass::Potion,
                30,
                StatBonus {
                    healing: Some(50),
                    ..Default::default()
                },
            ),
            shop_item(
                4,
                "Mana Potion",
                ItemClass::ManaPotion,
                25,
                StatBonus {
                    mana: Some(30),
                    ..Default::default()
                },
            ),
            shop_item(
                5,
                "Magic Staff",
                ItemClass::Weapon,
                300,
                StatBonus {
                    damage: Some(20),
                    magic: Some(10),
                    ..Default::default()
                },
            ),
            shop_item(
                6,
                "Leather Boots",
                ItemClass::Boots,
                100,
                StatBonus {
                    speed: Some(1.2),
                    ..Default::default()
                },
            ),
        ];

        Self {
            quests: quests.into_iter().map(|q| (q.id, q)).collect(),
            shop: shop.into_iter().map(|s| (s.id, s)).collect(),
        }
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::standard()
    }
}

fn quest(
    id: u32,
    name: &str,
    desc: &str,
    objective: Objective,
    count: u32,
    gold: u64,
    exp: u64,
) -> QuestTemplate {
    QuestTemplate {
        id,
        name: name.to_string(),
        desc: desc.to_string(),
        objective,
        count,
        reward: Reward { gold, exp },
    }
}

fn shop_item(id: u32, name: &str, class: ItemClass, price: u64, bonus: StatBonus) -> ShopItem {
    ShopItem {
        id,
        name: name.to_string(),
        class,
        bonus,
        price,
    }
}
