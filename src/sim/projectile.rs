//! Projectile motion: integration, homing steering, and culling
//!
//! Homing rotates the velocity toward the target by a fixed angular
//! fraction per frame instead of snapping, preserving speed. A stale
//! target disables homing for the projectile's remaining lifetime; it
//! never re-targets.

use glam::Vec2;

use super::entities::{EnemyBehavior, EntityStore, Projectile, Side};
use crate::{consts, normalize_angle, rotate_vec};

/// Skirmishers open fire inside this range
const SKIRMISH_FIRE_RANGE: f32 = 520.0;
const SKIRMISH_FIRE_INTERVAL: f32 = 2.2;
const SKIRMISH_SHOT_SPEED: f32 = 300.0;
const SKIRMISH_SHOT_RADIUS: f32 = 8.0;

/// Fan spread between multi-shot projectiles (radians)
const MULTI_SHOT_SPREAD: f32 = 0.16;

/// Rotate `vel` toward `target_dir` by `factor` of the remaining angle,
/// preserving magnitude
pub fn steer_toward(vel: Vec2, target_dir: Vec2, factor: f32) -> Vec2 {
    let speed = vel.length();
    if speed < consts::ARRIVE_EPSILON || target_dir.length_squared() < consts::ARRIVE_EPSILON {
        return vel;
    }
    let current = vel.y.atan2(vel.x);
    let desired = target_dir.y.atan2(target_dir.x);
    let delta = normalize_angle(desired - current);
    rotate_vec(vel, delta * factor.clamp(0.0, 1.0))
}

/// Advance every projectile one frame: homing steer, then integrate
pub fn integrate(store: &mut EntityStore, homing_factor: f32, dt: f32) {
    for proj in store.projectiles.iter_mut() {
        if let Some(handle) = proj.homing {
            let target = store
                .enemies
                .iter()
                .find(|e| e.id == handle.0 && e.is_live());
            match target {
                Some(enemy) => {
                    let to_target = enemy.pos - proj.pos;
                    if to_target.length_squared() > consts::ARRIVE_EPSILON {
                        proj.vel = steer_toward(proj.vel, to_target, homing_factor);
                    }
                }
                // Target gone: fall back to straight flight, permanently
                None => proj.homing = None,
            }
        }
        proj.pos += proj.vel * dt;
    }
}

/// Remove projectiles far outside the camera viewport.
///
/// The margin is generous relative to the lethal play area so off-screen
/// hits (e.g. against an approaching boss) remain possible.
pub fn cull_out_of_bounds(store: &mut EntityStore, camera: Vec2) {
    let half_w = consts::VIEW_HALF_W + consts::CULL_MARGIN;
    let half_h = consts::VIEW_HALF_H + consts::CULL_MARGIN;
    store.projectiles.retain(|p| {
        let d = p.pos - camera;
        d.x.abs() <= half_w && d.y.abs() <= half_h
    });
}

/// Spawn the player's shot fan. Damage is locked in at fire time, so a
/// rage buff ending mid-flight does not weaken projectiles already loosed.
pub fn fire_player_shots(store: &mut EntityStore, damage_multiplier: f32) {
    let player = &store.player;
    let count = player.shot.count.max(1);
    let damage = player.attack * damage_multiplier;
    let speed = player.shot.speed;
    let radius = player.shot.radius;
    let pierce = player.shot.pierce;
    let origin = player.pos;
    let homing = player.shot.homing;

    let target = if homing {
        store.nearest_live_enemy(origin)
    } else {
        None
    };

    // Fan centered on the advance axis
    let half = (count - 1) as f32 / 2.0;
    for i in 0..count {
        let angle = (i as f32 - half) * MULTI_SHOT_SPREAD;
        let vel = rotate_vec(Vec2::new(0.0, speed), angle);
        let id = store.next_entity_id();
        store.projectiles.push(Projectile {
            id,
            pos: origin,
            vel,
            damage,
            side: Side::Player,
            radius,
            pierce,
            homing: target,
            hit_ids: Vec::new(),
        });
    }
}

/// Allies fire single aimed shots at the nearest live enemy on their own
/// cooldowns
pub fn fire_ally_shots(store: &mut EntityStore, damage_multiplier: f32, dt: f32) {
    let mut to_spawn: Vec<(Vec2, Vec2, f32)> = Vec::new();

    for ally in store.allies.iter_mut() {
        ally.fire_cooldown = (ally.fire_cooldown - dt).max(0.0);
        if ally.fire_cooldown > 0.0 {
            continue;
        }
        let target = store
            .enemies
            .iter()
            .filter(|e| e.is_live())
            .min_by(|a, b| {
                let da = a.pos.distance_squared(ally.pos);
                let db = b.pos.distance_squared(ally.pos);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            });
        if let Some(enemy) = target {
            let dir = (enemy.pos - ally.pos).normalize_or_zero();
            if dir != Vec2::ZERO {
                to_spawn.push((ally.pos, dir * SKIRMISH_SHOT_SPEED * 1.4, ally.attack));
                ally.fire_cooldown = ally.fire_interval;
            }
        }
    }

    for (pos, vel, attack) in to_spawn {
        let id = store.next_entity_id();
        store.projectiles.push(Projectile {
            id,
            pos,
            vel,
            damage: attack * damage_multiplier,
            side: Side::Ally,
            radius: 8.0,
            pierce: 0,
            homing: None,
            hit_ids: Vec::new(),
        });
    }
}

/// Skirmisher enemies fire straight shots at the player
pub fn fire_enemy_shots(store: &mut EntityStore, dt: f32) {
    let player_pos = store.player.pos;
    let mut to_spawn: Vec<(Vec2, Vec2, f32)> = Vec::new();

    for enemy in store.enemies.iter_mut() {
        if !enemy.is_live() || enemy.behavior != EnemyBehavior::Skirmisher {
            continue;
        }
        enemy.fire_cooldown = (enemy.fire_cooldown - dt).max(0.0);
        if enemy.fire_cooldown > 0.0 {
            continue;
        }
        let to_player = player_pos - enemy.pos;
        if to_player.length() > SKIRMISH_FIRE_RANGE {
            continue;
        }
        let dir = to_player.normalize_or_zero();
        if dir != Vec2::ZERO {
            to_spawn.push((enemy.pos, dir * SKIRMISH_SHOT_SPEED, enemy.attack));
            enemy.fire_cooldown = SKIRMISH_FIRE_INTERVAL;
        }
    }

    for (pos, vel, attack) in to_spawn {
        let id = store.next_entity_id();
        store.projectiles.push(Projectile {
            id,
            pos,
            vel,
            damage: attack,
            side: Side::Enemy,
            radius: SKIRMISH_SHOT_RADIUS,
            pierce: 0,
            homing: None,
            hit_ids: Vec::new(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterSnapshot;
    use crate::sim::entities::{Enemy, EnemyRef, EntityKind, PurifyState};
    use crate::tuning::Tuning;

    fn store() -> EntityStore {
        EntityStore::new(&RosterSnapshot::default(), &Tuning::default().player)
    }

    fn push_enemy(store: &mut EntityStore, pos: Vec2) -> u32 {
        let id = store.next_entity_id();
        store.enemies.push(Enemy {
            id,
            pos,
            hp: 100.0,
            max_hp: 100.0,
            attack: 10.0,
            defense: 0.0,
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

    fn push_homing_shot(store: &mut EntityStore, pos: Vec2, vel: Vec2, target: u32) {
        let id = store.next_entity_id();
        store.projectiles.push(Projectile {
            id,
            pos,
            vel,
            damage: 10.0,
            side: Side::Player,
            radius: 8.0,
            pierce: 0,
            homing: Some(EnemyRef(target)),
            hit_ids: Vec::new(),
        });
    }

    #[test]
    fn test_steer_preserves_speed() {
        let vel = Vec2::new(0.0, 300.0);
        let steered = steer_toward(vel, Vec2::new(1.0, 0.0), 0.2);
        assert!((steered.length() - 300.0).abs() < 0.01);
        // Moved toward the target direction
        assert!(steered.x > 0.0);
    }

    #[test]
    fn test_homing_convergence_bound() {
        // Fired straight at a stationary target at distance d: the frame
        // count to arrival is bounded by flight time plus steering slack
        // proportional to 1/k.
        let k: f32 = 0.18;
        let d = 400.0;
        let dt = 1.0 / 60.0;
        let speed = 520.0;

        let mut store = store();
        let target = push_enemy(&mut store, Vec2::new(0.0, d));
        push_homing_shot(&mut store, Vec2::ZERO, Vec2::new(0.0, speed), target);

        let flight_frames = (d / (speed * dt)).ceil() as usize;
        let bound = flight_frames + (1.0 / k).ceil() as usize;
        let mut arrived = false;
        for _ in 0..bound {
            integrate(&mut store, k, dt);
            let proj = &store.projectiles[0];
            if proj.pos.distance(store.enemies[0].pos) <= proj.radius + store.enemies[0].radius {
                arrived = true;
                break;
            }
        }
        assert!(arrived, "homing projectile failed to converge within bound");
    }

    #[test]
    fn test_homing_curves_toward_offset_target() {
        let mut store = store();
        let target = push_enemy(&mut store, Vec2::new(200.0, 200.0));
        push_homing_shot(&mut store, Vec2::ZERO, Vec2::new(0.0, 300.0), target);

        for _ in 0..30 {
            integrate(&mut store, 0.2, 1.0 / 60.0);
        }
        // Velocity has rotated toward the target's quadrant
        assert!(store.projectiles[0].vel.x > 0.0);
    }

    #[test]
    fn test_stale_target_disables_homing_permanently() {
        let mut store = store();
        let target = push_enemy(&mut store, Vec2::new(0.0, 200.0));
        push_homing_shot(&mut store, Vec2::ZERO, Vec2::new(0.0, 300.0), target);

        store.enemies[0].begin_purify(0.5);
        integrate(&mut store, 0.2, 1.0 / 60.0);
        assert_eq!(store.projectiles[0].homing, None);

        // A new live enemy appears; the projectile must not re-target
        push_enemy(&mut store, Vec2::new(300.0, 0.0));
        integrate(&mut store, 0.2, 1.0 / 60.0);
        assert_eq!(store.projectiles[0].homing, None);
    }

    #[test]
    fn test_cull_uses_generous_margin() {
        let mut store = store();
        let inside_margin = Vec2::new(0.0, consts::VIEW_HALF_H + consts::CULL_MARGIN - 10.0);
        let outside = Vec2::new(0.0, consts::VIEW_HALF_H + consts::CULL_MARGIN + 50.0);
        push_homing_shot(&mut store, inside_margin, Vec2::ZERO, 999);
        push_homing_shot(&mut store, outside, Vec2::ZERO, 999);

        cull_out_of_bounds(&mut store, Vec2::ZERO);
        assert_eq!(store.projectiles.len(), 1);
        assert_eq!(store.projectiles[0].pos, inside_margin);
    }

    #[test]
    fn test_player_fan_count_and_damage() {
        let mut store = store();
        store.player.shot.count = 3;
        fire_player_shots(&mut store, 2.0);
        assert_eq!(store.projectiles.len(), 3);
        for proj in &store.projectiles {
            assert_eq!(proj.damage, store.player.attack * 2.0);
            assert_eq!(proj.side, Side::Player);
        }
        // The fan spreads laterally around the advance axis
        assert!(store.projectiles.iter().any(|p| p.vel.x < 0.0));
        assert!(store.projectiles.iter().any(|p| p.vel.x > 0.0));
    }

    #[test]
    fn test_skirmisher_fires_inside_range_only() {
        let mut store = store();
        let id = push_enemy(&mut store, Vec2::new(0.0, SKIRMISH_FIRE_RANGE + 200.0));
        store.enemies[0].behavior = EnemyBehavior::Skirmisher;

        fire_enemy_shots(&mut store, 1.0 / 60.0);
        assert!(store.projectiles.is_empty());

        store.enemies[0].pos = Vec2::new(0.0, 200.0);
        fire_enemy_shots(&mut store, 1.0 / 60.0);
        assert_eq!(store.projectiles.len(), 1);
        assert_eq!(store.projectiles[0].side, Side::Enemy);
        let _ = id;
    }
}
