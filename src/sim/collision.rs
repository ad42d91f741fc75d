//! Hit testing and damage application
//!
//! Circle-circle overlap is the whole physics model. Damage always floors
//! at [`consts::MIN_DAMAGE`] so stacked defense can never zero out a hit.

use glam::Vec2;

use super::entities::{EntityKind, EntityStore, Side};
use super::events::{DamageSource, GameEvent};
use crate::consts;
use crate::tuning::CombatTuning;

/// Optional elemental-affinity collaborator. When absent every multiplier
/// is 1.0 (the built-in fallback).
pub trait AffinityTable {
    /// Multiplier applied to raw damage against a target of `kind`
    fn multiplier(&self, attacker: Side, kind: EntityKind) -> f32;
}

/// Hits/kills landed by the player side in one resolution pass, consumed by
/// the rage gauge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HitSummary {
    pub hits: u32,
    pub kills: u32,
}

#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// Projectile damage: `max(1, round(raw * elemental - defense * 0.3))`
#[inline]
pub fn shot_damage(raw: f32, elemental: f32, defense: f32) -> f32 {
    (raw * elemental - defense * consts::SHOT_DEFENSE_FACTOR)
        .round()
        .max(consts::MIN_DAMAGE)
}

/// Contact damage against the player: `max(1, round(attack - defense * 0.5))`
#[inline]
pub fn contact_damage(attack: f32, defense: f32) -> f32 {
    (attack - defense * consts::CONTACT_DEFENSE_FACTOR)
        .round()
        .max(consts::MIN_DAMAGE)
}

fn killer_for(side: Side) -> DamageSource {
    match side {
        Side::Player => DamageSource::PlayerShot,
        Side::Ally => DamageSource::AllyShot,
        Side::Enemy => DamageSource::EnemyShot,
    }
}

/// Resolve every projectile against the opposing side.
///
/// Player/ally projectiles test against live enemies and the boss; enemy
/// projectiles test only against the player and are always consumed on hit.
/// A projectile never hits the same target twice within one pass. Enemies
/// whose hp reaches 0 enter their departure window and an `EnemyDied` event
/// fires with the killing side.
pub fn resolve_hits(
    store: &mut EntityStore,
    affinity: Option<&dyn AffinityTable>,
    combat: &CombatTuning,
    events: &mut Vec<GameEvent>,
) -> HitSummary {
    let mut summary = HitSummary::default();
    let mut consumed = vec![false; store.projectiles.len()];

    for (pi, proj) in store.projectiles.iter_mut().enumerate() {
        match proj.side {
            Side::Player | Side::Ally => {
                // Wave enemies first, then the boss
                for enemy in store.enemies.iter_mut() {
                    if consumed[pi] {
                        break;
                    }
                    if !enemy.is_live() || proj.hit_ids.contains(&enemy.id) {
                        continue;
                    }
                    if !circles_overlap(proj.pos, proj.radius, enemy.pos, enemy.radius) {
                        continue;
                    }
                    let elemental = affinity
                        .map(|t| t.multiplier(proj.side, enemy.kind))
                        .unwrap_or(1.0);
                    let damage = shot_damage(proj.damage, elemental, enemy.defense);
                    enemy.hp = (enemy.hp - damage).max(0.0);
                    proj.hit_ids.push(enemy.id);
                    summary.hits += 1;

                    if enemy.hp <= 0.0 {
                        summary.kills += 1;
                        enemy.begin_purify(combat.purify_duration);
                        events.push(GameEvent::EnemyDied {
                            id: enemy.id,
                            kind: enemy.kind,
                            pos: enemy.pos,
                            killer: killer_for(proj.side),
                        });
                    }

                    if proj.pierce > 0 {
                        proj.pierce -= 1;
                    } else {
                        consumed[pi] = true;
                    }
                }

                if let Some(boss) = store.boss.as_mut() {
                    if !consumed[pi]
                        && !proj.hit_ids.contains(&boss.id)
                        && circles_overlap(proj.pos, proj.radius, boss.pos, boss.radius)
                    {
                        let elemental = affinity
                            .map(|t| t.multiplier(proj.side, EntityKind::Boss))
                            .unwrap_or(1.0);
                        let damage = shot_damage(proj.damage, elemental, boss.defense);
                        boss.hp = (boss.hp - damage).max(0.0);
                        proj.hit_ids.push(boss.id);
                        summary.hits += 1;

                        if proj.pierce > 0 {
                            proj.pierce -= 1;
                        } else {
                            consumed[pi] = true;
                        }
                    }
                }
            }
            Side::Enemy => {
                let player = &mut store.player;
                if circles_overlap(proj.pos, proj.radius, player.pos, player.radius) {
                    let damage = shot_damage(proj.damage, 1.0, player.defense);
                    player.apply_damage(damage);
                    events.push(GameEvent::PlayerDamaged {
                        amount: damage,
                        source: DamageSource::EnemyShot,
                        hp_left: player.hp,
                    });
                    // Enemy shots never pierce
                    consumed[pi] = true;
                }
            }
        }
    }

    let mut idx = 0;
    store.projectiles.retain(|_| {
        let keep = !consumed[idx];
        idx += 1;
        keep
    });

    summary
}

/// Contact damage from enemies and the boss against the player, gated by
/// per-attacker cooldowns
pub fn resolve_contact(
    store: &mut EntityStore,
    combat: &CombatTuning,
    dt: f32,
    events: &mut Vec<GameEvent>,
) {
    let player_pos = store.player.pos;
    let player_radius = store.player.radius;
    let player_defense = store.player.defense;

    let mut incoming: Vec<(f32, DamageSource)> = Vec::new();

    for enemy in store.enemies.iter_mut() {
        enemy.contact_cooldown = (enemy.contact_cooldown - dt).max(0.0);
        if !enemy.is_live() || enemy.contact_cooldown > 0.0 {
            continue;
        }
        if circles_overlap(enemy.pos, enemy.radius, player_pos, player_radius) {
            incoming.push((
                contact_damage(enemy.attack, player_defense),
                DamageSource::EnemyContact,
            ));
            enemy.contact_cooldown = combat.contact_cooldown;
        }
    }

    if let Some(boss) = store.boss.as_mut() {
        boss.contact_cooldown = (boss.contact_cooldown - dt).max(0.0);
        if boss.contact_cooldown <= 0.0
            && circles_overlap(boss.pos, boss.radius, player_pos, player_radius)
        {
            incoming.push((
                contact_damage(boss.attack * boss.attack_mult, player_defense),
                DamageSource::BossContact,
            ));
            boss.contact_cooldown = combat.contact_cooldown;
        }
    }

    for (damage, source) in incoming {
        store.player.apply_damage(damage);
        events.push(GameEvent::PlayerDamaged {
            amount: damage,
            source,
            hp_left: store.player.hp,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterSnapshot;
    use crate::sim::entities::{Enemy, EnemyBehavior, Projectile, PurifyState};
    use crate::tuning::Tuning;

    fn store() -> EntityStore {
        EntityStore::new(&RosterSnapshot::default(), &Tuning::default().player)
    }

    fn spawn_enemy(store: &mut EntityStore, pos: Vec2, hp: f32, defense: f32) -> u32 {
        let id = store.next_entity_id();
        store.enemies.push(Enemy {
            id,
            pos,
            hp,
            max_hp: hp,
            attack: 20.0,
            defense,
            radius: 16.0,
            speed: 60.0,
            kind: EntityKind::Normal,
            behavior: EnemyBehavior::Chaser,
            purify: PurifyState::Corrupted,
            contact_cooldown: 0.0,
            fire_cooldown: 0.0,
        });
        id
    }

    fn shot(store: &mut EntityStore, pos: Vec2, damage: f32, side: Side, pierce: u32) -> u32 {
        let id = store.next_entity_id();
        store.projectiles.push(Projectile {
            id,
            pos,
            vel: Vec2::ZERO,
            damage,
            side,
            radius: 10.0,
            pierce,
            homing: None,
            hit_ids: Vec::new(),
        });
        id
    }

    #[test]
    fn test_shot_damage_formula() {
        // 30 * 1.0 - 10 * 0.3 = 27
        assert_eq!(shot_damage(30.0, 1.0, 10.0), 27.0);
        // Heavy defense still floors at 1
        assert_eq!(shot_damage(2.0, 1.0, 100.0), 1.0);
    }

    #[test]
    fn test_contact_damage_scenario() {
        // attack 20 vs defense 7 -> round(20 - 3.5) = 17
        let mut store = store();
        let player_pos = store.player.pos;
        spawn_enemy(&mut store, player_pos, 50.0, 0.0);
        let mut events = Vec::new();
        resolve_contact(&mut store, &Tuning::default().combat, 1.0 / 60.0, &mut events);
        assert_eq!(store.player.hp, 250.0 - 17.0);
        assert!(matches!(
            events[0],
            GameEvent::PlayerDamaged { amount, .. } if amount == 17.0
        ));
    }

    #[test]
    fn test_contact_cooldown_gates_repeat_hits() {
        let mut store = store();
        let player_pos = store.player.pos;
        spawn_enemy(&mut store, player_pos, 50.0, 0.0);
        let combat = Tuning::default().combat;
        let mut events = Vec::new();
        resolve_contact(&mut store, &combat, 1.0 / 60.0, &mut events);
        resolve_contact(&mut store, &combat, 1.0 / 60.0, &mut events);
        assert_eq!(events.len(), 1);
        assert_eq!(store.player.hp, 233.0);
    }

    #[test]
    fn test_kill_emits_death_and_purifies() {
        let mut store = store();
        let enemy_id = spawn_enemy(&mut store, Vec2::new(50.0, 0.0), 10.0, 0.0);
        shot(&mut store, Vec2::new(50.0, 0.0), 30.0, Side::Player, 0);

        let mut events = Vec::new();
        let summary = resolve_hits(&mut store, None, &Tuning::default().combat, &mut events);
        assert_eq!(summary, HitSummary { hits: 1, kills: 1 });
        assert!(matches!(
            store.enemies[0].purify,
            PurifyState::Purifying { .. }
        ));
        assert!(matches!(
            events[0],
            GameEvent::EnemyDied { id, killer: DamageSource::PlayerShot, .. } if id == enemy_id
        ));
        // Pierce 0 shot is consumed
        assert!(store.projectiles.is_empty());
    }

    #[test]
    fn test_pierce_survives_first_hit() {
        let mut store = store();
        spawn_enemy(&mut store, Vec2::new(50.0, 0.0), 500.0, 0.0);
        shot(&mut store, Vec2::new(50.0, 0.0), 5.0, Side::Player, 2);

        let mut events = Vec::new();
        resolve_hits(&mut store, None, &Tuning::default().combat, &mut events);
        assert_eq!(store.projectiles.len(), 1);
        assert_eq!(store.projectiles[0].pierce, 1);
    }

    #[test]
    fn test_no_double_hit_in_one_pass() {
        let mut store = store();
        spawn_enemy(&mut store, Vec2::new(50.0, 0.0), 500.0, 0.0);
        shot(&mut store, Vec2::new(50.0, 0.0), 10.0, Side::Player, 5);

        let combat = Tuning::default().combat;
        let mut events = Vec::new();
        let first = resolve_hits(&mut store, None, &combat, &mut events);
        assert_eq!(first.hits, 1);
        // Same geometry again: the hit list blocks a second application
        let second = resolve_hits(&mut store, None, &combat, &mut events);
        assert_eq!(second.hits, 0);
    }

    #[test]
    fn test_enemy_shot_hits_player_and_is_consumed() {
        let mut store = store();
        let player_pos = store.player.pos;
        shot(&mut store, player_pos, 12.0, Side::Enemy, 3);

        let mut events = Vec::new();
        resolve_hits(&mut store, None, &Tuning::default().combat, &mut events);
        assert!(store.player.hp < store.player.max_hp);
        // Consumed despite nonzero pierce
        assert!(store.projectiles.is_empty());
    }

    #[test]
    fn test_affinity_multiplier_applies() {
        struct DoubleVsNormal;
        impl AffinityTable for DoubleVsNormal {
            fn multiplier(&self, _attacker: Side, kind: EntityKind) -> f32 {
                if kind == EntityKind::Normal { 2.0 } else { 1.0 }
            }
        }

        let mut store = store();
        spawn_enemy(&mut store, Vec2::new(50.0, 0.0), 500.0, 0.0);
        shot(&mut store, Vec2::new(50.0, 0.0), 10.0, Side::Player, 0);

        let mut events = Vec::new();
        resolve_hits(
            &mut store,
            Some(&DoubleVsNormal),
            &Tuning::default().combat,
            &mut events,
        );
        assert_eq!(store.enemies[0].hp, 500.0 - 20.0);
    }
}
