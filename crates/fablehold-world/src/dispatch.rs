//! Joining, leaving, and routing client intents to the rules.

use fablehold_protocol::{PlayerId, Recipient};
use rand::Rng;

use crate::entity::{Player, Position, Tile};
use crate::messages::{ClientMessage, Outbound, ServerMessage};
use crate::quest::refresh_exploration;
use crate::world::World;

impl World {
    /// Adds a new player at the spawn point.
    ///
    /// Returns the new id along with an `init` snapshot for the newcomer
    /// and a `playerJoined` notice for everyone else.
    pub fn join(&mut self) -> (PlayerId, Outbound) {
        let id = self.registry.next_player_id();
        let name = format!("Player{}", self.rng.random_range(0..1000));
        let mut player = Player::new(id, name, self.config.spawn_point);
        player.explored.insert(self.tile_of(&player.position));
        let public = player.public();
        self.registry.insert_player(player.clone());

        tracing::info!(player_id = %id, name = %public.name, "player joined");

        let init = ServerMessage::Init {
            player_id: id,
            player: Box::new(player),
            players: self
                .registry
                .players_sorted()
                .into_iter()
                .map(Player::public)
                .collect(),
            monsters: self.registry.monsters().cloned().collect(),
            items: self.registry.items().cloned().collect(),
            quests: self.catalog.quests.clone(),
            shop_items: self.catalog.shop.clone(),
        };
        let out = vec![
            (Recipient::Player(id), init),
            (Recipient::AllExcept(id), ServerMessage::PlayerJoined { player: public }),
        ];
        (id, out)
    }

    /// Removes a player. Unknown ids produce nothing.
    pub fn leave(&mut self, player_id: PlayerId) -> Outbound {
        if self.registry.remove_player(player_id).is_none() {
            return Vec::new();
        }
        tracing::info!(%player_id, "player left");
        vec![(Recipient::All, ServerMessage::PlayerLeft { id: player_id })]
    }

    /// Applies one client intent on behalf of `player_id`.
    pub fn handle(&mut self, player_id: PlayerId, msg: ClientMessage) -> Outbound {
        if self.registry.player(player_id).is_none() {
            tracing::debug!(%player_id, "message from unknown player ignored");
            return Vec::new();
        }
        match msg {
            ClientMessage::Move { x, y } => self.move_player(player_id, x, y),
            ClientMessage::Attack { monster_id } => self.resolve_attack(player_id, monster_id),
            ClientMessage::CollectItem { item_id } => self.resolve_collect(player_id, item_id),
            ClientMessage::AcceptQuest { quest_id } => self.accept_quest(player_id, quest_id),
            ClientMessage::CompleteQuest { quest_id } => self.complete_quest(player_id, quest_id),
            ClientMessage::BuyItem { item_id } => self.buy_item(player_id, item_id),
            ClientMessage::EquipItem { index } => self.equip_item(player_id, index),
            ClientMessage::UsePotion => self.use_potion(player_id),
        }
    }

    /// Moves a player, clamped into the world, and marks the tile explored.
    pub fn move_player(&mut self, player_id: PlayerId, x: f64, y: f64) -> Outbound {
        if !x.is_finite() || !y.is_finite() {
            return Vec::new();
        }
        let position = Position::new(x, y).clamped(self.config.world_size);
        let tile = self.tile_of(&position);

        let Some(player) = self.registry.player_mut(player_id) else {
            return Vec::new();
        };
        player.position = position;
        if player.explored.insert(tile) {
            refresh_exploration(player, &self.config);
        }

        vec![(
            Recipient::AllExcept(player_id),
            ServerMessage::PlayerMove {
                id: player_id,
                x: position.x,
                y: position.y,
            },
        )]
    }

    /// The exploration tile containing `position`. The far edge belongs
    /// to the last tile.
    fn tile_of(&self, position: &Position) -> Tile {
        let last = self.config.tiles_per_side() - 1;
        let index = |v: f64| ((v / self.config.tile_size).floor() as i32).clamp(0, last);
        Tile(index(position.x), index(position.y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::templates::MonsterKind;

    fn world() -> World {
        World::seeded(WorldConfig::default(), 21)
    }

    // =====================================================================
    // join() / leave()
    // =====================================================================

    #[test]
    fn test_join_sends_init_then_announces() {
        let mut w = world();
        w.insert_monster(MonsterKind::Slime, Position::new(1.0, 1.0));
        let (first, _) = w.join();

        let (second, out) = w.join();

        assert_eq!(second.0, first.0 + 1);
        assert_eq!(out.len(), 2);
        match &out[0] {
            (
                Recipient::Player(to),
                ServerMessage::Init {
                    player_id,
                    players,
                    monsters,
                    quests,
                    shop_items,
                    ..
                },
            ) => {
                assert_eq!(*to, second);
                assert_eq!(*player_id, second);
                assert_eq!(players.len(), 2);
                assert_eq!(monsters.len(), 1);
                assert_eq!(quests.len(), 4);
                assert_eq!(shop_items.len(), 6);
            }
            other => panic!("expected init, got {other:?}"),
        }
        assert!(matches!(
            &out[1],
            (Recipient::AllExcept(id), ServerMessage::PlayerJoined { player })
                if *id == second && player.id == second
        ));
    }

    #[test]
    fn test_join_defaults() {
        let mut w = world();
        let (id, _) = w.join();
        let p = w.registry.player(id).unwrap();
        assert_eq!(p.position, Position::new(500.0, 500.0));
        assert!(p.name.starts_with("Player"));
        assert_eq!(p.explored.len(), 1);
    }

    #[test]
    fn test_leave_announces_once() {
        let mut w = world();
        let (id, _) = w.join();

        let out = w.leave(id);
        assert!(matches!(
            &out[..],
            [(Recipient::All, ServerMessage::PlayerLeft { id: left })] if *left == id
        ));
        assert!(w.leave(id).is_empty());
        assert!(w.registry.player(id).is_none());
    }

    // =====================================================================
    // move
    // =====================================================================

    #[test]
    fn test_move_clamps_to_world() {
        let mut w = world();
        let (id, _) = w.join();

        let out = w.move_player(id, 5000.0, -20.0);

        let position = w.registry.player(id).unwrap().position;
        assert_eq!(position, Position::new(3000.0, 0.0));
        assert!(matches!(
            &out[..],
            [(Recipient::AllExcept(from), ServerMessage::PlayerMove { x, y, .. })]
                if *from == id && *x == 3000.0 && *y == 0.0
        ));
    }

    #[test]
    fn test_move_records_tiles_once() {
        let mut w = world();
        let (id, _) = w.join();

        w.move_player(id, 150.0, 150.0);
        w.move_player(id, 199.0, 101.0);
        w.move_player(id, 3000.0, 3000.0);

        let explored = &w.registry.player(id).unwrap().explored;
        // spawn tile, (1,1) and the clamped corner (29,29)
        assert_eq!(explored.len(), 3);
        assert!(explored.contains(&Tile(1, 1)));
        assert!(explored.contains(&Tile(29, 29)));
    }

    #[test]
    fn test_move_advances_explore_quest() {
        let mut w = World::seeded(
            WorldConfig {
                world_size: 500.0,
                ..Default::default()
            },
            2,
        );
        let (id, _) = w.join();
        w.handle(id, ClientMessage::AcceptQuest { quest_id: 4 });

        for x in 0..5 {
            for y in 0..5 {
                let (x, y) = (f64::from(x) * 100.0 + 50.0, f64::from(y) * 100.0 + 50.0);
                w.handle(id, ClientMessage::Move { x, y });
            }
        }

        // 25 of 25 tiles, capped at the quest's 80%.
        let player = w.registry.player(id).unwrap();
        assert_eq!(player.active_quests[0].progress, 80);
    }

    // =====================================================================
    // routing
    // =====================================================================

    #[test]
    fn test_unknown_player_is_ignored() {
        let mut w = world();
        assert!(w.handle(PlayerId(77), ClientMessage::UsePotion).is_empty());
    }

    #[test]
    fn test_each_intent_reaches_its_rule() {
        let mut w = world();
        let (id, _) = w.join();

        let first_kind = |out: Outbound| out[0].1.kind();

        let accepted = w.handle(id, ClientMessage::AcceptQuest { quest_id: 1 });
        assert_eq!(first_kind(accepted), "questAccepted");
        let bought = w.handle(id, ClientMessage::BuyItem { item_id: 3 });
        assert_eq!(first_kind(bought), "itemBought");
        assert_eq!(first_kind(w.handle(id, ClientMessage::UsePotion)), "potionUsed");

        let turned_in = w.handle(id, ClientMessage::CompleteQuest { quest_id: 1 });
        assert!(turned_in.is_empty());
        assert!(w.handle(id, ClientMessage::EquipItem { index: 0 }).is_empty());
    }
}
