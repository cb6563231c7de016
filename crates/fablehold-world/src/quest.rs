//! Quest acceptance, progress and completion.

use fablehold_protocol::{PlayerId, Recipient};

use crate::combat::apply_level_ups;
use crate::config::WorldConfig;
use crate::entity::{ActiveQuest, Player};
use crate::messages::{Outbound, PlayerPatch, ServerMessage};
use crate::templates::Objective;
use crate::world::World;

impl World {
    /// Starts quest `quest_id` for a player.
    ///
    /// No-op if the quest is unknown or already active. A completed quest
    /// may be taken again.
    pub fn accept_quest(&mut self, player_id: PlayerId, quest_id: u32) -> Outbound {
        let Some(template) = self.catalog.quests.get(&quest_id) else {
            tracing::debug!(%player_id, quest_id, "accept of unknown quest ignored");
            return Vec::new();
        };
        let Some(player) = self.registry.player_mut(player_id) else {
            return Vec::new();
        };
        if player.has_active_quest(quest_id) {
            tracing::debug!(%player_id, quest_id, "quest already active");
            return Vec::new();
        }

        player.active_quests.push(ActiveQuest::new(template.clone()));
        refresh_exploration(player, &self.config);
        let Some(quest) = player.active_quests.last().cloned() else {
            return Vec::new();
        };

        tracing::debug!(%player_id, quest_id, "quest accepted");
        vec![(
            Recipient::Player(player_id),
            ServerMessage::QuestAccepted { quest },
        )]
    }

    /// Turns in a finished quest and pays its reward.
    ///
    /// No-op unless the quest is active and its progress has reached the
    /// required count. Level-ups earned from the reward are applied.
    pub fn complete_quest(&mut self, player_id: PlayerId, quest_id: u32) -> Outbound {
        let Some(player) = self.registry.player_mut(player_id) else {
            return Vec::new();
        };
        let Some(index) = player
            .active_quests
            .iter()
            .position(|q| q.quest.id == quest_id)
        else {
            return Vec::new();
        };
        if !player.active_quests[index].is_done() {
            tracing::debug!(%player_id, quest_id, "quest turned in before it was done");
            return Vec::new();
        }

        let finished = player.active_quests.remove(index);
        let reward = finished.quest.reward;
        player.gold += reward.gold;
        player.exp += reward.exp;
        player.completed_quests.insert(quest_id);
        let levels = apply_level_ups(player);

        tracing::info!(%player_id, quest_id, "quest completed");
        let mut out = vec![(
            Recipient::Player(player_id),
            ServerMessage::QuestCompleted {
                reward,
                player: PlayerPatch::after_quest(player),
            },
        )];
        if levels > 0 {
            let level = player.level;
            out.push((
                Recipient::Player(player_id),
                ServerMessage::LevelUp { level },
            ));
        }
        out
    }
}

/// Advances every active quest whose objective matches by one.
///
/// Returns `true` if any progress changed.
pub(crate) fn advance_quests(player: &mut Player, objective: Objective) -> bool {
    let mut changed = false;
    for quest in player
        .active_quests
        .iter_mut()
        .filter(|q| q.quest.objective == objective)
    {
        let next = quest.progress.saturating_add(1);
        changed |= quest.raise_to(next);
    }
    changed
}

/// Floored percentage of the world's tiles the player has visited.
pub(crate) fn exploration_percent(player: &Player, config: &WorldConfig) -> u32 {
    let total = config.total_tiles();
    let explored = player.explored.len() as u64;
    ((explored * 100) / total).min(100) as u32
}

/// Brings explore quests up to date with the explored tile set.
pub(crate) fn refresh_exploration(player: &mut Player, config: &WorldConfig) -> bool {
    let percent = exploration_percent(player, config);
    let mut changed = false;
    for quest in player
        .active_quests
        .iter_mut()
        .filter(|q| q.quest.objective == Objective::Explore)
    {
        changed |= quest.raise_to(percent);
    }
    changed
}
