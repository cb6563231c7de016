//! The monster AI pass.

use fablehold_protocol::{MonsterId, PlayerId, Recipient};

use crate::entity::Position;
use crate::messages::{MonsterPosition, Outbound, ServerMessage};
use crate::world::World;

impl World {
    /// Runs one AI pass over every live monster, in ascending id order.
    ///
    /// `now_ms` is the simulation clock used for attack cooldowns. The
    /// pass emits one `damage` message per attack, then a single
    /// `monstersMoved` batch if anything moved.
    pub fn run_ai(&mut self, now_ms: u64) -> Outbound {
        let mut out = Vec::new();
        let mut moved = Vec::new();

        for id in self.registry.monster_ids() {
            self.think(id, now_ms, &mut out, &mut moved);
        }

        if !moved.is_empty() {
            let monsters = moved;
            out.push((Recipient::All, ServerMessage::MonstersMoved { monsters }));
        }
        out
    }

    fn think(
        &mut self,
        id: MonsterId,
        now_ms: u64,
        out: &mut Outbound,
        moved: &mut Vec<MonsterPosition>,
    ) {
        let Some(monster) = self.registry.monster(id) else {
            return;
        };
        let position = monster.position;

        // Weak reference: drop targets that have left.
        let mut target = monster
            .target_player_id
            .filter(|t| self.registry.player(*t).is_some());
        if target.is_none() {
            target = self.nearest_player(&position, self.config.aggro_radius);
        }

        let Some(target_id) = target else {
            self.set_target(id, None);
            return;
        };
        let Some(target) = self.registry.player(target_id) else {
            self.set_target(id, None);
            return;
        };
        let target_pos = target.position;

        let dist = position.distance(&target_pos);
        if dist > self.config.leash_radius {
            self.set_target(id, None);
        } else if dist > self.config.monster_attack_range {
            let Some(monster) = self.registry.monster_mut(id) else {
                return;
            };
            monster.target_player_id = Some(target_id);
            monster.position = monster.position.step_toward(&target_pos, monster.speed);
            moved.push(MonsterPosition {
                id,
                x: monster.position.x,
                y: monster.position.y,
            });
        } else {
            self.set_target(id, Some(target_id));
            self.attack(id, target_id, now_ms, out);
        }
    }

    fn attack(&mut self, id: MonsterId, target_id: PlayerId, now_ms: u64, out: &mut Outbound) {
        let cooldown = self.config.monster_attack_cooldown.as_millis() as u64;
        let respawn = self.config.spawn_point;

        let Some(monster) = self.registry.monster_mut(id) else {
            return;
        };
        let ready = monster
            .last_attack
            .is_none_or(|last| now_ms.saturating_sub(last) >= cooldown);
        if !ready {
            return;
        }
        monster.last_attack = Some(now_ms);
        let raw = monster.damage;

        let Some(player) = self.registry.player_mut(target_id) else {
            return;
        };
        let damage = (raw - player.defense).max(1);
        player.hp -= damage;
        let died = player.hp <= 0;
        if died {
            player.hp = player.max_hp;
            player.position = respawn;
            tracing::debug!(player_id = %target_id, monster_id = %id, "player died and respawned");
        }
        let hp = player.hp;

        if died {
            self.set_target(id, None);
        }
        out.push((
            Recipient::All,
            ServerMessage::Damage {
                target_id,
                damage,
                hp,
            },
        ));
    }

    /// Closest player within `radius`; ties go to the lowest id.
    fn nearest_player(&self, from: &Position, radius: f64) -> Option<PlayerId> {
        self.registry
            .players()
            .map(|p| (from.distance(&p.position), p.id))
            .filter(|(dist, _)| *dist <= radius)
            .min_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)))
            .map(|(_, id)| id)
    }

    fn set_target(&mut self, id: MonsterId, target: Option<PlayerId>) {
        if let Some(monster) = self.registry.monster_mut(id) {
            monster.target_player_id = target;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WorldConfig;
    use crate::entity::{Monster, Player};
    use crate::templates::MonsterKind;

    fn world() -> World {
        World::seeded(WorldConfig::default(), 9)
    }

    fn add_player(world: &mut World, at: Position) -> PlayerId {
        let id = world.registry.next_player_id();
        world.registry.insert_player(Player::new(id, format!("Player{}", id.0), at));
        id
    }

    fn add_monster(world: &mut World, kind: MonsterKind, at: Position) -> MonsterId {
        let id = world.registry.next_monster_id();
        world.registry.insert_monster(Monster::new(id, kind, at));
        id
    }

    fn target_of(world: &World, id: MonsterId) -> Option<PlayerId> {
        world.registry.monster(id).unwrap().target_player_id
    }

    // =====================================================================
    // Targeting
    // =====================================================================

    #[test]
    fn test_targets_nearest_player_in_aggro() {
        let mut w = world();
        let m = add_monster(&mut w, MonsterKind::Slime, Position::new(0.0, 0.0));
        let _far = add_player(&mut w, Position::new(310.0, 0.0));
        let _mid = add_player(&mut w, Position::new(250.0, 0.0));
        let near = add_player(&mut w, Position::new(50.0, 0.0));

        w.run_ai(0);

        assert_eq!(target_of(&w, m), Some(near));
    }

    #[test]
    fn test_target_tie_goes_to_lowest_id() {
        let mut w = world();
        let m = add_monster(&mut w, MonsterKind::Slime, Position::new(0.0, 0.0));
        let first = add_player(&mut w, Position::new(100.0, 0.0));
        let _second = add_player(&mut w, Position::new(0.0, 100.0));

        w.run_ai(0);

        assert_eq!(target_of(&w, m), Some(first));
    }

    #[test]
    fn test_player_outside_aggro_is_ignored() {
        let mut w = world();
        let m = add_monster(&mut w, MonsterKind::Slime, Position::new(0.0, 0.0));
        add_player(&mut w, Position::new(300.5, 0.0));

        let out = w.run_ai(0);

        assert_eq!(target_of(&w, m), None);
        assert!(out.is_empty());
    }

    #[test]
    fn test_target_beyond_leash_is_dropped() {
        let mut w = world();
        let m = add_monster(&mut w, MonsterKind::Slime, Position::new(0.0, 0.0));
        let p = add_player(&mut w, Position::new(200.0, 0.0));
        w.run_ai(0);
        assert_eq!(target_of(&w, m), Some(p));

        w.registry.player_mut(p).unwrap().position = Position::new(900.0, 0.0);
        w.run_ai(50);

        assert_eq!(target_of(&w, m), None);
    }

    #[test]
    fn test_departed_target_is_cleared() {
        let mut w = world();
        let m = add_monster(&mut w, MonsterKind::Slime, Position::new(0.0, 0.0));
        let p = add_player(&mut w, Position::new(200.0, 0.0));
        w.run_ai(0);
        w.registry.remove_player(p);

        let out = w.run_ai(50);

        assert_eq!(target_of(&w, m), None);
        assert!(out.is_empty());
    }

    // =====================================================================
    // Movement
    // =====================================================================

    #[test]
    fn test_moves_toward_target_by_speed() {
        let mut w = world();
        let m = add_monster(&mut w, MonsterKind::Goblin, Position::new(0.0, 0.0));
        add_player(&mut w, Position::new(200.0, 0.0));

        let out = w.run_ai(0);

        let pos = w.registry.monster(m).unwrap().position;
        assert!((pos.x - 1.0).abs() < 1e-9);
        assert_eq!(pos.y, 0.0);
        assert!(matches!(
            &out[..],
            [(Recipient::All, ServerMessage::MonstersMoved { monsters })]
                if monsters.len() == 1 && monsters[0].id == m
        ));
    }

    // =====================================================================
    // Attacks
    // =====================================================================

    #[test]
    fn test_attack_in_range_respects_cooldown() {
        let mut w = world();
        add_monster(&mut w, MonsterKind::Wolf, Position::new(0.0, 0.0));
        let p = add_player(&mut w, Position::new(20.0, 0.0));

        let first = w.run_ai(5_000);
        let during_cooldown = w.run_ai(5_500);
        let after_cooldown = w.run_ai(6_000);

        assert!(matches!(
            &first[..],
            [(Recipient::All, ServerMessage::Damage { target_id, damage: 15, hp: 85 })]
                if *target_id == p
        ));
        assert!(during_cooldown.is_empty());
        assert!(matches!(&after_cooldown[..], [(_, ServerMessage::Damage { hp: 70, .. })]));
    }

    #[test]
    fn test_defense_mitigates_with_floor_of_one() {
        let mut w = world();
        add_monster(&mut w, MonsterKind::Slime, Position::new(0.0, 0.0));
        let p = add_player(&mut w, Position::new(10.0, 0.0));
        w.registry.player_mut(p).unwrap().defense = 10;

        let out = w.run_ai(0);

        assert!(matches!(&out[..], [(_, ServerMessage::Damage { damage: 1, hp: 99, .. })]));
    }

    #[test]
    fn test_lethal_hit_respawns_player_and_clears_target() {
        let mut w = world();
        let m = add_monster(&mut w, MonsterKind::Orc, Position::new(0.0, 0.0));
        let p = add_player(&mut w, Position::new(10.0, 0.0));
        w.registry.player_mut(p).unwrap().hp = 20;

        let out = w.run_ai(0);

        let player = w.registry.player(p).unwrap();
        assert_eq!(player.hp, player.max_hp);
        assert_eq!(player.position, Position::new(500.0, 500.0));
        assert_eq!(target_of(&w, m), None);
        assert!(matches!(&out[..], [(_, ServerMessage::Damage { damage: 25, hp: 100, .. })]));
    }

    #[test]
    fn test_no_players_no_output() {
        let mut w = world();
        add_monster(&mut w, MonsterKind::Slime, Position::new(0.0, 0.0));
        assert!(w.run_ai(0).is_empty());
    }
}
