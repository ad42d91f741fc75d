//! Per-frame driver
//!
//! One `tick` advances the whole encounter with a fixed step order:
//! movement -> pincer advance -> encounter evaluation -> collision and
//! projectiles -> spawn -> rage -> derived queries (camera, victory/defeat).
//! Later steps read but never re-mutate what earlier steps finalized.

use glam::Vec2;

use super::collision::{self, HitSummary};
use super::entities::{EnemyBehavior, PickupKind};
use super::events::{GameEvent, SessionOutcome};
use super::projectile;
use super::rage::ChargeResult;
use super::spawn::{self, WaveQuery};
use super::state::SessionContext;
use crate::consts;

/// Skirmishers try to hold this band around the player
const SKIRMISH_HOLD_FAR: f32 = 420.0;
const SKIRMISH_HOLD_NEAR: f32 = 260.0;

/// Host input for a single frame, already normalized upstream
#[derive(Debug, Clone, Default)]
pub struct FrameInput {
    /// Normalized 2-D movement direction
    pub move_dir: Vec2,
    /// Primary fire readiness flag
    pub fire: bool,
}

/// Advance the session by one frame. `dt` is clamped to
/// [`consts::MAX_FRAME_DT`] before use.
pub fn tick(ctx: &mut SessionContext, input: &FrameInput, dt: f32) {
    if ctx.paused || ctx.outcome.is_some() {
        return;
    }
    let dt = dt.min(consts::MAX_FRAME_DT).max(0.0);
    if dt == 0.0 {
        return;
    }
    ctx.elapsed += dt;

    // 1. Movement: player input + auto-advance, enemy seek, allies,
    //    pickups, boss lateral tracking
    movement(ctx, input, dt);

    // 2. Pincer advance
    ctx.fog.advance(dt);
    ctx.fog
        .apply_to_player(&mut ctx.store.player, dt, &mut ctx.events);
    ctx.boss_boundary
        .advance(ctx.fog.position, ctx.tuning.encounter.min_gap, dt);

    // 3. Phase machine
    ctx.encounter.evaluate(
        &mut ctx.store,
        &mut ctx.fog,
        &mut ctx.boss_boundary,
        &ctx.tuning.encounter,
        &ctx.tuning.combat,
        ctx.elapsed,
        dt,
        &mut ctx.events,
    );

    // 4. Combat, suppressed entirely while a blocking phase holds the field
    let mut summary = HitSummary::default();
    if !ctx.encounter.is_blocking() {
        run_attacks(ctx, input, dt);
        projectile::integrate(&mut ctx.store, ctx.tuning.projectile.homing_factor, dt);
        projectile::cull_out_of_bounds(&mut ctx.store, ctx.camera);
        summary = collision::resolve_hits(
            &mut ctx.store,
            ctx.affinity.as_deref(),
            &ctx.tuning.combat,
            &mut ctx.events,
        );
        collision::resolve_contact(&mut ctx.store, &ctx.tuning.combat, dt, &mut ctx.events);
    }

    // 5. Spawn evaluation, only in open-field phases
    if !ctx.encounter.is_blocking() && !ctx.encounter.is_in_boss_phase() {
        run_spawner(ctx, dt);
    }

    // 6. Rage
    if summary.hits > 0 || summary.kills > 0 {
        let charge = summary.hits as f32 * ctx.tuning.rage.charge_per_hit
            + summary.kills as f32 * ctx.tuning.rage.charge_per_kill;
        if ctx.rage.add(charge) == ChargeResult::Ready && ctx.rage.trigger() {
            ctx.events.push(GameEvent::RageTriggered {
                trigger_count: ctx.rage.trigger_count(),
            });
        }
    }
    if ctx.rage.update(dt) {
        ctx.events.push(GameEvent::RageEnded);
    }

    // Score and combo bookkeeping
    if summary.kills > 0 {
        ctx.kills += summary.kills;
        ctx.combo += summary.kills;
        ctx.combo_timer = ctx.tuning.combat.combo_window;
        let combo_bonus = ctx.combo.min(20) as u64;
        ctx.score += summary.kills as u64 * (10 + combo_bonus);
    } else if ctx.combo > 0 {
        ctx.combo_timer = (ctx.combo_timer - dt).max(0.0);
        if ctx.combo_timer == 0.0 {
            ctx.combo = 0;
        }
    }

    // Departure windows
    for enemy in ctx.store.enemies.iter_mut() {
        enemy.update_purify(dt);
    }
    ctx.store.sweep_purified();

    // 7. Derived queries last
    ctx.camera = ctx.derive_camera_target();
    if ctx.store.player.is_down() {
        ctx.outcome = Some(SessionOutcome::Defeat);
        log::info!("session ended: defeat");
        ctx.events.push(GameEvent::SessionEnded {
            outcome: SessionOutcome::Defeat,
        });
    } else if ctx.encounter.outcome().is_some() {
        ctx.outcome = Some(SessionOutcome::Victory);
        log::info!("session ended: victory");
        ctx.events.push(GameEvent::SessionEnded {
            outcome: SessionOutcome::Victory,
        });
    }

    ctx.store.normalize_order();
}

fn movement(ctx: &mut SessionContext, input: &FrameInput, dt: f32) {
    let open_field = !ctx.encounter.is_blocking() && !ctx.encounter.is_in_boss_phase();

    // Player
    let player = &mut ctx.store.player;
    player.move_input = input.move_dir.clamp_length_max(1.0);
    player.pos += player.move_input * player.speed * dt;
    if open_field {
        player.pos.y += ctx.tuning.player.auto_advance * dt;
    }
    let half_w = ctx.tuning.player.corridor_half_width;
    player.pos.x = player.pos.x.clamp(-half_w, half_w);
    let player_pos = player.pos;

    // Enemies seek per archetype
    for enemy in ctx.store.enemies.iter_mut() {
        if !enemy.is_live() {
            continue;
        }
        let to_player = player_pos - enemy.pos;
        let dist = to_player.length();
        if dist < consts::ARRIVE_EPSILON {
            continue;
        }
        let dir = to_player / dist;
        match enemy.behavior {
            EnemyBehavior::Chaser | EnemyBehavior::Brute => {
                enemy.pos += dir * enemy.speed * dt;
            }
            EnemyBehavior::Skirmisher => {
                if dist > SKIRMISH_HOLD_FAR {
                    enemy.pos += dir * enemy.speed * dt;
                } else if dist < SKIRMISH_HOLD_NEAR {
                    enemy.pos -= dir * enemy.speed * dt;
                }
            }
        }
    }

    // Allies trail behind the player in alternating slots
    for (i, ally) in ctx.store.allies.iter_mut().enumerate() {
        let side = if i % 2 == 0 { -1.0 } else { 1.0 };
        let rank = (i / 2) as f32 + 1.0;
        let target = player_pos + Vec2::new(side * 70.0 * rank, -60.0 * rank);
        ally.pos.x = crate::ease_exp(ally.pos.x, target.x, 6.0, dt);
        ally.pos.y = crate::ease_exp(ally.pos.y, target.y, 6.0, dt);
    }

    // Pickups drift toward the player inside the magnet radius
    let magnet = ctx.tuning.player.pickup_magnet_radius;
    for pickup in ctx.store.pickups.iter_mut() {
        let to_player = player_pos - pickup.pos;
        let dist = to_player.length();
        if dist < magnet && dist > consts::ARRIVE_EPSILON {
            pickup.vel += (to_player / dist) * 600.0 * dt;
        }
        pickup.vel *= 0.92;
        pickup.pos += pickup.vel * dt;
    }

    // Collection
    let collect_radius = ctx.tuning.player.pickup_collect_radius;
    let mut collected: Vec<PickupKind> = Vec::new();
    ctx.store.pickups.retain(|pickup| {
        if pickup.pos.distance(player_pos) <= collect_radius {
            collected.push(pickup.kind);
            false
        } else {
            true
        }
    });
    for kind in collected {
        apply_pickup(ctx, kind);
        ctx.events.push(GameEvent::PickupCollected { kind });
    }

    // Boss lateral tracking eases toward the player's lateral coordinate
    let stage = ctx.tuning.stage(ctx.stage_index);
    ctx.boss_boundary
        .track_lateral(player_pos.x, stage.boss_lateral_smoothing, dt);
}

fn apply_pickup(ctx: &mut SessionContext, kind: PickupKind) {
    let combat = &ctx.tuning.combat;
    let player = &mut ctx.store.player;
    match kind {
        PickupKind::Heal => player.heal(player.max_hp * combat.heal_fraction),
        PickupKind::AttackUp => player.attack += combat.attack_up,
        PickupKind::SpeedUp => player.speed += combat.speed_up,
        PickupKind::MultiShot => {
            player.shot.count = (player.shot.count + 1).min(combat.max_shot_count);
        }
    }
}

fn run_attacks(ctx: &mut SessionContext, input: &FrameInput, dt: f32) {
    let multiplier = ctx.rage.damage_multiplier();

    let player = &mut ctx.store.player;
    player.attack_cooldown = (player.attack_cooldown - dt).max(0.0);
    if input.fire && player.attack_cooldown == 0.0 {
        player.attack_cooldown = ctx.tuning.player.attack_cooldown;
        projectile::fire_player_shots(&mut ctx.store, multiplier);
    }

    projectile::fire_ally_shots(&mut ctx.store, multiplier, dt);
    projectile::fire_enemy_shots(&mut ctx.store, dt);
}

fn run_spawner(ctx: &mut SessionContext, dt: f32) {
    ctx.spawn_timer -= dt;
    if ctx.spawn_timer > 0.0 {
        return;
    }
    ctx.spawn_timer += ctx.tuning.spawn.interval;

    let query = WaveQuery {
        elapsed: ctx.elapsed,
        wave_index: ctx.wave_index,
        live_enemies: ctx.store.live_enemy_count(),
    };
    let plan = match &ctx.director {
        Some(director) => director.plan_wave(&query),
        None => spawn::builtin_plan(&ctx.tuning.spawn, &query),
    };
    let boss_position = ctx
        .boss_boundary
        .running
        .then_some(ctx.boss_boundary.position);
    spawn::spawn_wave(
        &mut ctx.store,
        &plan,
        ctx.wave_index,
        &ctx.tuning.spawn,
        &ctx.tuning.player,
        boss_position,
        &mut ctx.rng,
    );
    ctx.wave_index += 1;
}
