//! Entity types and the authoritative store
//!
//! `EntityStore` is the single owner of every live entity list. Other
//! components receive `&` views or narrow `&mut` capabilities per frame and
//! never retain references across frames; the one cross-frame reference in
//! the whole simulation is the id-based [`EnemyRef`] homing handle, which is
//! weak by construction (ids are never reused, so a stale handle simply
//! stops resolving).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::roster::{PlayerStats, RosterSnapshot};
use crate::tuning::PlayerTuning;

/// Broad entity classification used by spawn tiers and reward rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntityKind {
    Normal,
    Elite,
    Boss,
}

/// Death/despawn lifecycle of an enemy.
///
/// Live enemies are `Corrupted`. A killed or cleared enemy holds a short
/// `Purifying` departure window (the renderer plays the effect), then is
/// `Purified` and removed at the end of the frame. Purifying enemies no
/// longer collide, attack, or count as live.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum PurifyState {
    Corrupted,
    Purifying { remaining: f32 },
    Purified,
}

/// Movement archetype chosen at spawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyBehavior {
    /// Runs straight at the player
    Chaser,
    /// Keeps distance and fires
    Skirmisher,
    /// Slow, heavy contact damage
    Brute,
}

/// Which side owns a projectile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Player,
    Ally,
    Enemy,
}

/// Weak handle to an enemy by id.
///
/// Ids are allocated monotonically and never reused, so resolution failing
/// is the checked staleness condition - a dangling handle can never point
/// at a different enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyRef(pub u32);

/// Player projectile parameters, mutated by upgrade pickups
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShotParams {
    pub speed: f32,
    pub radius: f32,
    pub pierce: u32,
    pub homing: bool,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    /// Normalized input direction sampled this frame
    pub move_input: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub attack: f32,
    pub defense: f32,
    pub speed: f32,
    pub radius: f32,
    /// Seconds until the next shot
    pub attack_cooldown: f32,
    pub shot: ShotParams,
}

impl Player {
    pub fn from_roster(stats: &PlayerStats, tuning: &PlayerTuning) -> Self {
        Self {
            pos: Vec2::ZERO,
            move_input: Vec2::ZERO,
            hp: stats.max_hp,
            max_hp: stats.max_hp,
            attack: stats.attack,
            defense: stats.defense,
            speed: tuning.move_speed * stats.speed,
            radius: tuning.radius,
            attack_cooldown: 0.0,
            shot: ShotParams {
                speed: tuning.shot_speed,
                radius: tuning.shot_radius,
                pierce: tuning.shot_pierce,
                homing: tuning.shot_homing,
                count: tuning.shot_count,
            },
        }
    }

    /// Apply damage, flooring hp at 0. Returns the amount actually applied.
    pub fn apply_damage(&mut self, amount: f32) -> f32 {
        let applied = amount.min(self.hp);
        self.hp = (self.hp - amount).max(0.0);
        applied
    }

    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }

    pub fn is_down(&self) -> bool {
        self.hp <= 0.0
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: u32,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub attack: f32,
    pub defense: f32,
    pub radius: f32,
    pub speed: f32,
    pub kind: EntityKind,
    pub behavior: EnemyBehavior,
    pub purify: PurifyState,
    /// Seconds until this enemy may deal contact damage again
    pub contact_cooldown: f32,
    /// Seconds until a Skirmisher fires again
    pub fire_cooldown: f32,
}

impl Enemy {
    /// Alive and participating in combat
    pub fn is_live(&self) -> bool {
        matches!(self.purify, PurifyState::Corrupted)
    }

    /// Start the departure window; no-op if already departing
    pub fn begin_purify(&mut self, duration: f32) {
        if self.is_live() {
            self.purify = PurifyState::Purifying { remaining: duration };
        }
    }

    /// Advance the departure window
    pub fn update_purify(&mut self, dt: f32) {
        if let PurifyState::Purifying { remaining } = &mut self.purify {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.purify = PurifyState::Purified;
            }
        }
    }
}

/// A summoned companion; fires alongside the player, never collides
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ally {
    pub id: u32,
    pub pos: Vec2,
    pub attack: f32,
    pub fire_interval: f32,
    pub fire_cooldown: f32,
}

/// The arena boss, created exactly once when the pincer closes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Boss {
    pub id: u32,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub attack: f32,
    pub defense: f32,
    pub radius: f32,
    pub speed: f32,
    /// Rescaled on tier transitions
    pub speed_mult: f32,
    pub attack_mult: f32,
    pub contact_cooldown: f32,
}

impl Boss {
    pub fn hp_ratio(&self) -> f32 {
        if self.max_hp <= 0.0 {
            0.0
        } else {
            (self.hp / self.max_hp).clamp(0.0, 1.0)
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub damage: f32,
    pub side: Side,
    pub radius: f32,
    /// Remaining additional hits before destruction
    pub pierce: u32,
    /// Weak homing target; `None` means straight flight. Once cleared
    /// (stale target) it is never re-acquired.
    pub homing: Option<EnemyRef>,
    /// Targets already hit, so one resolution pass never hits twice
    pub hit_ids: Vec<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PickupKind {
    Heal,
    AttackUp,
    SpeedUp,
    MultiShot,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pickup {
    pub id: u32,
    pub pos: Vec2,
    pub vel: Vec2,
    pub kind: PickupKind,
}

/// Authoritative owner of all entity lists
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityStore {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub allies: Vec<Ally>,
    pub boss: Option<Boss>,
    pub projectiles: Vec<Projectile>,
    pub pickups: Vec<Pickup>,
    next_id: u32,
}

impl EntityStore {
    pub fn new(roster: &RosterSnapshot, tuning: &PlayerTuning) -> Self {
        let mut store = Self {
            player: Player::from_roster(&roster.player, tuning),
            enemies: Vec::new(),
            allies: Vec::new(),
            boss: None,
            projectiles: Vec::new(),
            pickups: Vec::new(),
            next_id: 1,
        };
        for summon in &roster.summoned {
            let id = store.next_entity_id();
            store.allies.push(Ally {
                id,
                pos: store.player.pos,
                attack: summon.attack,
                fire_interval: summon.fire_interval.max(0.1),
                fire_cooldown: 0.0,
            });
        }
        store
    }

    /// Allocate a new entity id (monotonic, never reused)
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Resolve a weak enemy handle; `None` when the target is gone or departing
    pub fn enemy(&self, handle: EnemyRef) -> Option<&Enemy> {
        self.enemies
            .iter()
            .find(|e| e.id == handle.0 && e.is_live())
    }

    pub fn enemy_mut(&mut self, handle: EnemyRef) -> Option<&mut Enemy> {
        self.enemies
            .iter_mut()
            .find(|e| e.id == handle.0 && e.is_live())
    }

    /// Nearest live enemy to `from`, for homing acquisition
    pub fn nearest_live_enemy(&self, from: Vec2) -> Option<EnemyRef> {
        self.enemies
            .iter()
            .filter(|e| e.is_live())
            .min_by(|a, b| {
                let da = a.pos.distance_squared(from);
                let db = b.pos.distance_squared(from);
                da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
            })
            .map(|e| EnemyRef(e.id))
    }

    pub fn live_enemy_count(&self) -> usize {
        self.enemies.iter().filter(|e| e.is_live()).count()
    }

    /// Drop entities that finished their departure window
    pub fn sweep_purified(&mut self) {
        self.enemies
            .retain(|e| !matches!(e.purify, PurifyState::Purified));
    }

    /// Ensure deterministic iteration order
    pub fn normalize_order(&mut self) {
        self.enemies.sort_by_key(|e| e.id);
        self.projectiles.sort_by_key(|p| p.id);
        self.pickups.sort_by_key(|p| p.id);
    }
}
