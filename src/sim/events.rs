//! Events emitted during a simulation frame.
//!
//! The rendering/audio/reward collaborators drain these once per frame;
//! nothing in the core reacts to its own events.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::encounter::PhaseKind;
use super::entities::{EntityKind, PickupKind};

/// Where damage came from, carried on death/damage events for reward rolls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DamageSource {
    PlayerShot,
    AllyShot,
    EnemyShot,
    EnemyContact,
    BossContact,
    Fog,
}

/// How the session ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Victory,
    Defeat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum GameEvent {
    /// Encounter phase advanced; `anchor` carries the meeting point when one exists
    PhaseChanged {
        from: PhaseKind,
        to: PhaseKind,
        anchor: Option<Vec2>,
    },
    /// An enemy died to damage (reward collaborators roll drops off this)
    EnemyDied {
        id: u32,
        kind: EntityKind,
        pos: Vec2,
        killer: DamageSource,
    },
    /// An enemy was cleared by the Meeting transition (departure effect, no rewards)
    EnemyDeparted { id: u32, pos: Vec2 },
    PlayerDamaged {
        amount: f32,
        source: DamageSource,
        hp_left: f32,
    },
    RageTriggered { trigger_count: u32 },
    RageEnded,
    /// One named awakening beat fired (camera focus, roar, health-bar reveal, ...)
    AwakeningTrigger { name: String },
    BossTierChanged { tier: usize, hp_ratio: f32 },
    /// One-time handoff request to a different combat sub-mode
    ModeChangeRequested { hp_ratio: f32 },
    BossDefeated { pos: Vec2 },
    PickupCollected { kind: PickupKind },
    FogDamageTick { amount: f32 },
    SessionEnded { outcome: SessionOutcome },
}
