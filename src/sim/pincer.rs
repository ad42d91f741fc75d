//! The closing pincer: a trailing fog hazard and a leading boss boundary
//!
//! Both boundaries are 1-D positions on the travel axis, advancing every
//! frame while the encounter is in an active phase. The fog only ever moves
//! forward; the boss only ever closes, clamped so it never crosses
//! `fog + min_gap` until the Meeting phase ends the chase.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::Player;
use super::events::{DamageSource, GameEvent};
use crate::ease_exp;
use crate::tuning::{BossBoundaryTuning, FogTuning};

/// Player standing relative to the fog's leading edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FogZone {
    Clear,
    Warning,
    Damage,
}

/// Trailing hazard boundary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FogBoundary {
    /// Leading edge on the travel axis; monotonically non-decreasing while
    /// running
    pub position: f32,
    base_speed: f32,
    accel_per_ms: f32,
    elapsed_ms: f32,
    pub warning_width: f32,
    pub damage_width: f32,
    damage_interval: f32,
    damage_per_tick: f32,
    push_strength: f32,
    damage_accumulator: f32,
    pub running: bool,
    pub paused: bool,
}

impl FogBoundary {
    pub fn new(player_axial: f32, tuning: &FogTuning) -> Self {
        Self {
            position: player_axial - tuning.start_distance,
            base_speed: tuning.base_speed,
            accel_per_ms: tuning.accel_per_ms,
            elapsed_ms: 0.0,
            warning_width: tuning.warning_width,
            damage_width: tuning.damage_width,
            damage_interval: tuning.damage_interval,
            damage_per_tick: tuning.damage_per_tick,
            push_strength: tuning.push_strength,
            damage_accumulator: 0.0,
            running: false,
            paused: false,
        }
    }

    /// Construct directly from raw motion parameters (tests, external tools)
    pub fn with_motion(position: f32, base_speed: f32, accel_per_ms: f32) -> Self {
        Self {
            position,
            base_speed,
            accel_per_ms,
            ..Self::new(position, &FogTuning::default())
        }
    }

    /// `speed(t) = base_speed + elapsed_ms * accel`, floored at 0 so the
    /// position stays monotonic
    pub fn speed(&self) -> f32 {
        (self.base_speed + self.elapsed_ms * self.accel_per_ms).max(0.0)
    }

    pub fn advance(&mut self, dt: f32) {
        if !self.running || self.paused {
            return;
        }
        self.elapsed_ms += dt * 1000.0;
        self.position += self.speed() * dt;
    }

    pub fn zone(&self, axial: f32) -> FogZone {
        if axial < self.position + self.damage_width {
            FogZone::Damage
        } else if axial < self.position + self.warning_width {
            FogZone::Warning
        } else {
            FogZone::Clear
        }
    }

    /// Push a lagging player forward and tick damage on the sub-interval.
    ///
    /// The push force is proportional to how deep the player sits inside
    /// the warning zone; damage accrues only inside the damage zone and is
    /// applied in fixed ticks, never per-frame.
    pub fn apply_to_player(&mut self, player: &mut Player, dt: f32, events: &mut Vec<GameEvent>) {
        if !self.running || self.paused {
            return;
        }
        // Assess the zone where the player lagged this frame, then push;
        // otherwise a strong push could cancel the tick it just earned
        let zone = self.zone(player.pos.y);
        let depth = (self.position + self.warning_width) - player.pos.y;
        if depth > 0.0 {
            player.pos.y += depth * self.push_strength * dt;
        }

        if zone == FogZone::Damage {
            self.damage_accumulator += dt;
            while self.damage_accumulator >= self.damage_interval {
                self.damage_accumulator -= self.damage_interval;
                player.apply_damage(self.damage_per_tick);
                events.push(GameEvent::FogDamageTick {
                    amount: self.damage_per_tick,
                });
                events.push(GameEvent::PlayerDamaged {
                    amount: self.damage_per_tick,
                    source: DamageSource::Fog,
                    hp_left: player.hp,
                });
            }
        } else {
            self.damage_accumulator = 0.0;
        }
    }
}

/// Leading hostile boundary: the boss closing on the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossBoundary {
    /// Travel-axis position, decreasing toward the player
    pub position: f32,
    /// Lateral coordinate, eased toward the player's
    pub lateral: f32,
    base_speed: f32,
    accel_per_ms: f32,
    elapsed_ms: f32,
    /// Post-timer urgency multiplier; 1.0 until armed
    urgency: f32,
    pub running: bool,
    pub paused: bool,
}

impl BossBoundary {
    pub fn new(player_axial: f32, tuning: &BossBoundaryTuning, accel_per_ms: f32) -> Self {
        Self {
            position: player_axial + tuning.start_distance,
            lateral: 0.0,
            base_speed: tuning.base_speed,
            accel_per_ms,
            elapsed_ms: 0.0,
            urgency: 1.0,
            running: false,
            paused: false,
        }
    }

    pub fn effective_speed(&self) -> f32 {
        (self.base_speed + self.elapsed_ms * self.accel_per_ms).max(0.0) * self.urgency
    }

    /// Arm the post-timer acceleration for the rest of the encounter
    /// (floor-clamped; never slows the boss down)
    pub fn arm_urgency(&mut self, multiplier: f32, floor: f32) {
        self.urgency = multiplier.max(floor).max(self.urgency);
        log::info!("boss boundary urgency armed (x{:.2})", self.urgency);
    }

    pub fn urgency(&self) -> f32 {
        self.urgency
    }

    /// Close toward the player, never crossing `fog + min_gap`
    pub fn advance(&mut self, fog_position: f32, min_gap: f32, dt: f32) {
        if !self.running || self.paused {
            return;
        }
        self.elapsed_ms += dt * 1000.0;
        self.position -= self.effective_speed() * dt;
        self.position = self.position.max(fog_position + min_gap);
        debug_assert!(self.position >= fog_position + min_gap);
    }

    /// Ease the lateral coordinate toward the player's at `rate` per second
    pub fn track_lateral(&mut self, player_lateral: f32, rate: f32, dt: f32) {
        if !self.running || self.paused {
            return;
        }
        self.lateral = ease_exp(self.lateral, player_lateral, rate, dt);
    }

    pub fn axial_distance(&self, player_axial: f32) -> f32 {
        self.position - player_axial
    }

    pub fn point(&self) -> Vec2 {
        Vec2::new(self.lateral, self.position)
    }
}
