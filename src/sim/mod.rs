//! Deterministic encounter simulation
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Clamped delta-time, countdown timers instead of blocking waits
//! - Seeded RNG only
//! - Stable iteration order (by entity id)
//! - No rendering or platform dependencies

pub mod collision;
pub mod encounter;
pub mod entities;
pub mod events;
pub mod pincer;
pub mod projectile;
pub mod rage;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{AffinityTable, HitSummary, contact_damage, resolve_contact, resolve_hits, shot_damage};
pub use encounter::{ArenaSession, ArenaState, Encounter, EncounterPhase, Outcome, PhaseKind};
pub use entities::{
    Ally, Boss, Enemy, EnemyBehavior, EnemyRef, EntityKind, EntityStore, Pickup, PickupKind,
    Player, Projectile, PurifyState, Side,
};
pub use events::{DamageSource, GameEvent, SessionOutcome};
pub use pincer::{BossBoundary, FogBoundary, FogZone};
pub use rage::{ChargeResult, RageGauge};
pub use spawn::{Archetype, BuiltinDirector, DifficultyDirector, WavePlan, WaveQuery};
pub use state::{RenderSnapshot, SessionContext};
pub use tick::{FrameInput, tick};
