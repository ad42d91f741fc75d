//! Wave composition and spawning
//!
//! The director is a pure function of (elapsed time, wave index, live enemy
//! count) so an external difficulty service can be mounted in place of the
//! built-in fallback without touching any other component. Placement
//! randomness happens outside the plan, through the session RNG.

use glam::Vec2;
use rand::Rng;

use super::entities::{Enemy, EnemyBehavior, EntityKind, EntityStore, PurifyState};
use crate::tuning::{PlayerTuning, SpawnTuning};

/// Enemy archetypes unlocked by wave tiers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Archetype {
    Grunt,
    Runner,
    Lobber,
    Bulwark,
    /// Elite-tier unit reserved for every Nth wave
    Marauder,
}

/// Inputs the director is allowed to see
#[derive(Debug, Clone, Copy)]
pub struct WaveQuery {
    pub elapsed: f32,
    pub wave_index: u32,
    pub live_enemies: usize,
}

/// What to spawn this wave
#[derive(Debug, Clone)]
pub struct WavePlan {
    pub count: u32,
    pub pool: Vec<Archetype>,
    /// One slot is reserved for an elite unit
    pub elite_slot: bool,
}

/// Optional external difficulty collaborator; the built-in fallback is used
/// when none is mounted
pub trait DifficultyDirector {
    fn plan_wave(&self, query: &WaveQuery) -> WavePlan;
}

/// Archetype pool available at a wave index
fn pool_for_wave(wave: u32) -> Vec<Archetype> {
    let mut pool = vec![Archetype::Grunt];
    if wave >= 3 {
        pool.push(Archetype::Runner);
    }
    if wave >= 6 {
        pool.push(Archetype::Lobber);
    }
    if wave >= 10 {
        pool.push(Archetype::Bulwark);
    }
    pool
}

/// Built-in wave plan: `count(wave) = min(cap, base + round(wave * growth))`,
/// clamped by the live-enemy headroom
pub fn builtin_plan(tuning: &SpawnTuning, query: &WaveQuery) -> WavePlan {
    let raw = tuning.base_count + (query.wave_index as f32 * tuning.growth).round() as u32;
    let capped = raw.min(tuning.cap);
    let headroom = tuning.max_live.saturating_sub(query.live_enemies) as u32;
    WavePlan {
        count: capped.min(headroom),
        pool: pool_for_wave(query.wave_index),
        elite_slot: query.wave_index > 0
            && tuning.elite_every > 0
            && query.wave_index % tuning.elite_every == 0,
    }
}

/// Trait wrapper around [`builtin_plan`], for hosts that want to hold the
/// fallback behind the same interface as an external director
pub struct BuiltinDirector {
    pub tuning: SpawnTuning,
}

impl DifficultyDirector for BuiltinDirector {
    fn plan_wave(&self, query: &WaveQuery) -> WavePlan {
        builtin_plan(&self.tuning, query)
    }
}

fn stats_for(arch: Archetype, wave: u32, tuning: &SpawnTuning) -> (f32, f32, f32, f32, f32) {
    // (hp, attack, defense, radius, speed) before wave scaling
    let base = match arch {
        Archetype::Grunt => (24.0, 14.0, 2.0, 16.0, 85.0),
        Archetype::Runner => (16.0, 10.0, 0.0, 14.0, 150.0),
        Archetype::Lobber => (20.0, 12.0, 1.0, 15.0, 70.0),
        Archetype::Bulwark => (60.0, 22.0, 8.0, 24.0, 55.0),
        Archetype::Marauder => (140.0, 30.0, 10.0, 30.0, 75.0),
    };
    let hp_scale = 1.0 + wave as f32 * tuning.hp_growth;
    let attack_scale = 1.0 + wave as f32 * tuning.attack_growth;
    (
        (base.0 * hp_scale).round(),
        (base.1 * attack_scale).round(),
        base.2,
        base.3,
        base.4,
    )
}

fn behavior_for(arch: Archetype) -> EnemyBehavior {
    match arch {
        Archetype::Grunt | Archetype::Runner => EnemyBehavior::Chaser,
        Archetype::Lobber => EnemyBehavior::Skirmisher,
        Archetype::Bulwark | Archetype::Marauder => EnemyBehavior::Brute,
    }
}

/// Materialize a wave plan into live enemies ahead of the player.
///
/// Enemies land in a band ahead of the player, spread across the corridor
/// and clamped behind the boss boundary when one is closing.
pub fn spawn_wave(
    store: &mut EntityStore,
    plan: &WavePlan,
    wave_index: u32,
    spawn_tuning: &SpawnTuning,
    player_tuning: &PlayerTuning,
    boss_position: Option<f32>,
    rng: &mut impl Rng,
) -> u32 {
    if plan.count == 0 || plan.pool.is_empty() {
        return 0;
    }

    let player_y = store.player.pos.y;
    let half_w = player_tuning.corridor_half_width;
    let mut spawned = 0;

    for slot in 0..plan.count {
        let arch = if plan.elite_slot && slot == 0 {
            Archetype::Marauder
        } else {
            plan.pool[rng.random_range(0..plan.pool.len())]
        };

        let mut y = player_y + rng.random_range(400.0..900.0);
        if let Some(boss_y) = boss_position {
            // Never seed enemies past the closing boss
            y = y.min(boss_y - 120.0);
        }
        let x = rng.random_range(-half_w..half_w);

        let (hp, attack, defense, radius, speed) = stats_for(arch, wave_index, spawn_tuning);
        let id = store.next_entity_id();
        store.enemies.push(Enemy {
            id,
            pos: Vec2::new(x, y),
            hp,
            max_hp: hp,
            attack,
            defense,
            radius,
            speed,
            kind: if arch == Archetype::Marauder {
                EntityKind::Elite
            } else {
                EntityKind::Normal
            },
            behavior: behavior_for(arch),
            purify: PurifyState::Corrupted,
            contact_cooldown: 0.0,
            fire_cooldown: 0.0,
        });
        spawned += 1;
    }

    log::debug!(
        "wave {}: spawned {} enemies (elite slot: {})",
        wave_index,
        spawned,
        plan.elite_slot
    );
    spawned
}
