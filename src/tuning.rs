//! Data-driven game balance
//!
//! Every balance number the simulation consumes lives here so hosts can
//! deserialize overrides from JSON without touching simulation code. The
//! `Default` impls are the reference values the tests pin down.

use serde::{Deserialize, Serialize};

/// Player movement, attack, and pickup handling
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    /// Forward speed along the travel axis in open-field phases (units/s)
    pub auto_advance: f32,
    /// Input-driven movement speed multiplier base (units/s)
    pub move_speed: f32,
    /// Lateral corridor half-width the player is clamped to
    pub corridor_half_width: f32,
    /// Seconds between player shots
    pub attack_cooldown: f32,
    /// Player hit radius
    pub radius: f32,
    pub shot_speed: f32,
    pub shot_radius: f32,
    pub shot_pierce: u32,
    pub shot_homing: bool,
    pub shot_count: u32,
    /// Pickups drift toward the player inside this radius
    pub pickup_magnet_radius: f32,
    /// Pickups are collected inside this radius
    pub pickup_collect_radius: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            auto_advance: 140.0,
            move_speed: 220.0,
            corridor_half_width: 300.0,
            attack_cooldown: 0.35,
            radius: 26.0,
            shot_speed: 520.0,
            shot_radius: 10.0,
            shot_pierce: 1,
            shot_homing: false,
            shot_count: 1,
            pickup_magnet_radius: 140.0,
            pickup_collect_radius: 36.0,
        }
    }
}

/// Shared combat pacing knobs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CombatTuning {
    /// Seconds between contact-damage applications from one enemy
    pub contact_cooldown: f32,
    /// Departure window a dead/cleared enemy stays visible for
    pub purify_duration: f32,
    /// Kill streak window for the combo multiplier
    pub combo_window: f32,
    /// Heal pickup restores this fraction of max hp
    pub heal_fraction: f32,
    /// AttackUp pickup grants this much flat attack
    pub attack_up: f32,
    /// SpeedUp pickup grants this much flat move speed
    pub speed_up: f32,
    /// MultiShot pickups stop stacking at this shot count
    pub max_shot_count: u32,
}

impl Default for CombatTuning {
    fn default() -> Self {
        Self {
            contact_cooldown: 0.8,
            purify_duration: 0.45,
            combo_window: 3.0,
            heal_fraction: 0.3,
            attack_up: 4.0,
            speed_up: 20.0,
            max_shot_count: 5,
        }
    }
}

/// Wave scaling consumed by the built-in difficulty director
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    /// `count(wave) = min(cap, base + round(wave * growth))`
    pub base_count: u32,
    pub growth: f32,
    pub cap: u32,
    /// Seconds between spawn-director queries
    pub interval: f32,
    /// Every Nth wave reserves one elite slot
    pub elite_every: u32,
    /// Spawning pauses once this many enemies are live
    pub max_live: usize,
    /// Per-wave fractional growth of enemy hp / attack
    pub hp_growth: f32,
    pub attack_growth: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            base_count: 4,
            growth: 0.75,
            cap: 24,
            interval: 3.0,
            elite_every: 5,
            max_live: 60,
            hp_growth: 0.06,
            attack_growth: 0.04,
        }
    }
}

/// Rage gauge pacing
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RageTuning {
    /// Gauge gained per point of `add()` input
    pub gain_rate: f32,
    /// Seconds the buff stays active per trigger
    pub duration: f32,
    /// Damage multiplier while active
    pub multiplier: f32,
    /// Gauge charge per projectile hit landed
    pub charge_per_hit: f32,
    /// Gauge charge per kill
    pub charge_per_kill: f32,
}

impl Default for RageTuning {
    fn default() -> Self {
        Self {
            gain_rate: 1.0,
            duration: 8.0,
            multiplier: 2.0,
            charge_per_hit: 1.2,
            charge_per_kill: 4.0,
        }
    }
}

/// Trailing hazard boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FogTuning {
    /// Fog leading edge starts this far behind the player
    pub start_distance: f32,
    /// Speed at t=0 (units/s)
    pub base_speed: f32,
    /// Speed gained per elapsed millisecond
    pub accel_per_ms: f32,
    /// Warning zone extends this far ahead of the leading edge
    pub warning_width: f32,
    /// Damage zone extends this far ahead of the leading edge
    pub damage_width: f32,
    /// Seconds between damage ticks while inside the damage zone
    pub damage_interval: f32,
    pub damage_per_tick: f32,
    /// Forward acceleration per unit of overlap depth
    pub push_strength: f32,
}

impl Default for FogTuning {
    fn default() -> Self {
        Self {
            start_distance: 900.0,
            base_speed: 120.0,
            accel_per_ms: 0.002,
            warning_width: 160.0,
            damage_width: 40.0,
            damage_interval: 0.5,
            damage_per_tick: 8.0,
            push_strength: 6.0,
        }
    }
}

/// Leading hostile boundary (the approaching boss)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BossBoundaryTuning {
    /// Boss starts this far ahead of the player
    pub start_distance: f32,
    /// Advance speed toward the player at t=0 (units/s)
    pub base_speed: f32,
    /// Applied to the boss's effective speed after the stage timer lapses
    pub urgency_multiplier: f32,
    /// The urgency multiplier never drops below this
    pub urgency_floor: f32,
}

impl Default for BossBoundaryTuning {
    fn default() -> Self {
        Self {
            start_distance: 2400.0,
            base_speed: 80.0,
            urgency_multiplier: 1.8,
            urgency_floor: 1.2,
        }
    }
}

/// Per-stage smoothing constants for the boss boundary.
///
/// Lateral tracking and advance acceleration are tuned independently per
/// stage; the values are data, not derived from each other.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTuning {
    /// Exponential rate (per second) the boss's lateral coordinate eases
    /// toward the player's
    pub boss_lateral_smoothing: f32,
    /// Boss boundary speed gained per elapsed millisecond
    pub boss_advance_accel: f32,
}

impl Default for StageTuning {
    fn default() -> Self {
        Self {
            boss_lateral_smoothing: 3.0,
            boss_advance_accel: 0.001,
        }
    }
}

/// One boss-fight tier, entered when the boss's hp ratio falls to `hp_ratio`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossTier {
    pub hp_ratio: f32,
    pub speed_mult: f32,
    pub attack_mult: f32,
}

/// One named awakening beat, fired once when the awakening clock passes `at`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwakeningBeat {
    pub name: String,
    pub at: f32,
}

/// Boss entity stats and the scripted-encounter schedule
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterTuning {
    /// Approaching -> Warning when boss axial distance drops to this
    pub warning_width: f32,
    /// Warning -> Meeting thresholds
    pub meet_radial: f32,
    pub meet_axial: f32,
    /// Boss boundary never closes past fog + this gap (outside Meeting)
    pub min_gap: f32,
    /// Phase dwell times (seconds)
    pub meeting_dwell: f32,
    pub forming_dwell: f32,
    pub victory_duration: f32,
    /// Hard session limit: the boss fight auto-clears past this
    pub time_limit: f32,
    /// Boss entity stats
    pub boss_max_hp: f32,
    pub boss_attack: f32,
    pub boss_defense: f32,
    pub boss_radius: f32,
    pub boss_speed: f32,
    /// Awakening sequence; the phase ends once the clock passes `duration`
    pub awakening: Vec<AwakeningBeat>,
    pub awakening_duration: f32,
    /// Descending hp-ratio tiers; index 0 is the opening tier
    pub tiers: Vec<BossTier>,
    /// One-time combat-mode handoff request at this hp ratio, if set
    pub mode_change_ratio: Option<f32>,
}

impl Default for EncounterTuning {
    fn default() -> Self {
        Self {
            warning_width: 150.0,
            meet_radial: 120.0,
            meet_axial: 60.0,
            min_gap: 200.0,
            meeting_dwell: 1.2,
            forming_dwell: 2.0,
            victory_duration: 2.5,
            time_limit: 300.0,
            boss_max_hp: 2400.0,
            boss_attack: 32.0,
            boss_defense: 10.0,
            boss_radius: 64.0,
            boss_speed: 90.0,
            awakening: vec![
                AwakeningBeat { name: "camera_focus".into(), at: 0.0 },
                AwakeningBeat { name: "roar_shake".into(), at: 0.8 },
                AwakeningBeat { name: "health_bar_reveal".into(), at: 1.6 },
            ],
            awakening_duration: 2.4,
            tiers: vec![
                BossTier { hp_ratio: 1.0, speed_mult: 1.0, attack_mult: 1.0 },
                BossTier { hp_ratio: 0.66, speed_mult: 1.15, attack_mult: 1.2 },
                BossTier { hp_ratio: 0.33, speed_mult: 1.3, attack_mult: 1.45 },
            ],
            mode_change_ratio: Some(0.2),
        }
    }
}

/// Homing projectile steering factor (fraction of the remaining angle
/// closed per frame)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProjectileTuning {
    pub homing_factor: f32,
}

impl Default for ProjectileTuning {
    fn default() -> Self {
        Self { homing_factor: 0.18 }
    }
}

/// Root balance table
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub player: PlayerTuning,
    pub combat: CombatTuning,
    pub spawn: SpawnTuning,
    pub rage: RageTuning,
    pub fog: FogTuning,
    pub boss: BossBoundaryTuning,
    pub encounter: EncounterTuning,
    pub projectile: ProjectileTuning,
    /// Per-stage overrides, indexed by stage; missing stages use the default
    pub stages: Vec<StageTuning>,
}

impl Tuning {
    /// Load overrides from JSON; absent fields keep their defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Smoothing constants for a stage, falling back to the defaults
    pub fn stage(&self, stage_index: u32) -> StageTuning {
        self.stages
            .get(stage_index as usize)
            .cloned()
            .unwrap_or_default()
    }
}
