//! Session state and the render-facing snapshot
//!
//! `SessionContext` is constructed once per encounter and passed by
//! reference to every component; no component reads ambient global state.
//! It owns the entity store, both pincer boundaries, the rage gauge, the
//! encounter machine, the session RNG, and the per-frame event buffer.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::AffinityTable;
use super::encounter::{Encounter, EncounterPhase, PhaseKind};
use super::entities::{EntityKind, EntityStore, Pickup, PickupKind, PurifyState, Side};
use super::events::{GameEvent, SessionOutcome};
use super::pincer::{BossBoundary, FogBoundary, FogZone};
use super::rage::RageGauge;
use super::spawn::DifficultyDirector;
use crate::roster::RosterSnapshot;
use crate::tuning::Tuning;

/// Everything one combat encounter owns
pub struct SessionContext {
    pub tuning: Tuning,
    pub stage_index: u32,
    pub seed: u64,
    pub rng: Pcg32,
    pub store: EntityStore,
    pub fog: FogBoundary,
    pub boss_boundary: BossBoundary,
    pub rage: RageGauge,
    pub encounter: Encounter,
    /// Total session clock (seconds), advanced by `tick`
    pub elapsed: f32,
    pub wave_index: u32,
    pub spawn_timer: f32,
    pub score: u64,
    pub kills: u32,
    pub combo: u32,
    pub combo_timer: f32,
    /// Camera focus, recomputed as the last step of every frame
    pub camera: Vec2,
    pub outcome: Option<SessionOutcome>,
    /// Host pause; mirrored onto every time-driven component
    pub paused: bool,
    pub events: Vec<GameEvent>,
    /// External difficulty collaborator; built-in fallback when `None`
    pub director: Option<Box<dyn DifficultyDirector>>,
    /// External elemental-affinity collaborator; multiplier 1.0 when `None`
    pub affinity: Option<Box<dyn AffinityTable>>,
}

impl SessionContext {
    pub fn new(seed: u64, stage_index: u32, tuning: Tuning, roster: &RosterSnapshot) -> Self {
        let store = EntityStore::new(roster, &tuning.player);
        let player_axial = store.player.pos.y;
        let stage = tuning.stage(stage_index);
        let fog = FogBoundary::new(player_axial, &tuning.fog);
        let boss_boundary =
            BossBoundary::new(player_axial, &tuning.boss, stage.boss_advance_accel);
        let rage = RageGauge::new(roster.rage_trigger_cap(), &tuning.rage);
        let spawn_timer = tuning.spawn.interval;

        log::info!(
            "session start: seed {seed}, stage {stage_index}, rage cap {}",
            rage.max_triggers()
        );

        Self {
            tuning,
            stage_index,
            seed,
            rng: Pcg32::seed_from_u64(seed),
            store,
            fog,
            boss_boundary,
            rage,
            encounter: Encounter::new(),
            elapsed: 0.0,
            wave_index: 0,
            spawn_timer,
            score: 0,
            kills: 0,
            combo: 0,
            combo_timer: 0.0,
            camera: Vec2::ZERO,
            outcome: None,
            paused: false,
            events: Vec::new(),
            director: None,
            affinity: None,
        }
    }

    /// Mount an external difficulty director in place of the built-in
    pub fn set_director(&mut self, director: Box<dyn DifficultyDirector>) {
        self.director = Some(director);
    }

    /// Mount an elemental-affinity table
    pub fn set_affinity(&mut self, affinity: Box<dyn AffinityTable>) {
        self.affinity = Some(affinity);
    }

    /// External start signal: arms the pincer (Dormant -> Approaching)
    pub fn start_encounter(&mut self) -> bool {
        self.encounter
            .start(&mut self.fog, &mut self.boss_boundary, &mut self.events)
    }

    /// Stage time-limit signal: the boss closes with urgency from here on
    pub fn arm_time_limit(&mut self) {
        self.boss_boundary.arm_urgency(
            self.tuning.boss.urgency_multiplier,
            self.tuning.boss.urgency_floor,
        );
    }

    /// Host pause/resume. Mirrored onto every time-driven component so
    /// resuming never fast-forwards state; stops the encounter itself
    /// froze (Meeting) are unaffected.
    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
        self.fog.paused = paused;
        self.boss_boundary.paused = paused;
        self.rage.paused = paused;
    }

    /// Reward-collaborator entry point: drop a pickup into the world
    pub fn spawn_pickup(&mut self, kind: PickupKind, pos: Vec2) {
        let id = self.store.next_entity_id();
        self.store.pickups.push(Pickup {
            id,
            pos,
            vel: Vec2::ZERO,
            kind,
        });
    }

    /// Hand the frame's events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Queries consumed by the frame driver and collaborators ---

    pub fn is_blocking(&self) -> bool {
        self.encounter.is_blocking()
    }

    pub fn is_in_boss_phase(&self) -> bool {
        self.encounter.is_in_boss_phase()
    }

    pub fn encounter_phase(&self) -> PhaseKind {
        self.encounter.kind()
    }

    pub fn arena_form_progress(&self) -> f32 {
        self.encounter.arena_form_progress(&self.tuning.encounter)
    }

    /// Camera focus: the meeting anchor once the pincer closes, the boss
    /// during the fight, the player otherwise
    pub fn derive_camera_target(&self) -> Vec2 {
        match self.encounter.phase() {
            EncounterPhase::Meeting { meeting_point, .. } => *meeting_point,
            EncounterPhase::ArenaForming { anchor, .. } => *anchor,
            EncounterPhase::BossFight { .. } => self
                .store
                .boss
                .as_ref()
                .map(|b| (b.pos + self.store.player.pos) * 0.5)
                .unwrap_or(self.store.player.pos),
            _ => self.store.player.pos,
        }
    }

    /// Read-only view of the frame for the rendering collaborator
    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot {
            elapsed: self.elapsed,
            phase: self.encounter_phase(),
            arena_form_progress: self.arena_form_progress(),
            camera: self.camera,
            score: self.score,
            kills: self.kills,
            combo: self.combo,
            player: PlayerView {
                pos: self.store.player.pos,
                hp: self.store.player.hp,
                max_hp: self.store.player.max_hp,
            },
            enemies: self
                .store
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    pos: e.pos,
                    hp: e.hp,
                    max_hp: e.max_hp,
                    kind: e.kind,
                    departing: matches!(e.purify, PurifyState::Purifying { .. }),
                })
                .collect(),
            boss: self.store.boss.as_ref().map(|b| BossView {
                pos: b.pos,
                hp: b.hp,
                max_hp: b.max_hp,
                tier: self
                    .encounter
                    .arena_session()
                    .map(|s| s.tier())
                    .unwrap_or(0),
            }),
            projectiles: self
                .store
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    pos: p.pos,
                    radius: p.radius,
                    side: p.side,
                })
                .collect(),
            pickups: self
                .store
                .pickups
                .iter()
                .map(|p| PickupView {
                    pos: p.pos,
                    kind: p.kind,
                })
                .collect(),
            fog_position: self.fog.position,
            fog_zone: self.fog.zone(self.store.player.pos.y),
            boss_boundary: self.boss_boundary.point(),
            rage_gauge: self.rage.gauge(),
            rage_active: self.rage.is_active(),
            outcome: self.outcome,
        }
    }
}

/// Per-frame read-only snapshot for rendering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderSnapshot {
    pub elapsed: f32,
    pub phase: PhaseKind,
    pub arena_form_progress: f32,
    pub camera: Vec2,
    pub score: u64,
    pub kills: u32,
    pub combo: u32,
    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub boss: Option<BossView>,
    pub projectiles: Vec<ProjectileView>,
    pub pickups: Vec<PickupView>,
    pub fog_position: f32,
    pub fog_zone: FogZone,
    pub boss_boundary: Vec2,
    pub rage_gauge: f32,
    pub rage_active: bool,
    pub outcome: Option<SessionOutcome>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnemyView {
    pub id: u32,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub kind: EntityKind,
    pub departing: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BossView {
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub tier: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub radius: f32,
    pub side: Side,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PickupView {
    pub pos: Vec2,
    pub kind: PickupKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> SessionContext {
        SessionContext::new(42, 0, Tuning::default(), &RosterSnapshot::default())
    }

    #[test]
    fn test_boundaries_positioned_around_player() {
        let ctx = session();
        let tuning = Tuning::default();
        assert_eq!(ctx.fog.position, -tuning.fog.start_distance);
        assert_eq!(ctx.boss_boundary.position, tuning.boss.start_distance);
    }

    #[test]
    fn test_start_encounter_idempotent() {
        let mut ctx = session();
        assert!(ctx.start_encounter());
        assert!(!ctx.start_encounter());
        assert_eq!(ctx.encounter_phase(), PhaseKind::Approaching);
    }

    #[test]
    fn test_set_paused_mirrors_components() {
        let mut ctx = session();
        ctx.set_paused(true);
        assert!(ctx.fog.paused && ctx.boss_boundary.paused && ctx.rage.paused);
        ctx.set_paused(false);
        assert!(!ctx.fog.paused && !ctx.boss_boundary.paused && !ctx.rage.paused);
    }

    #[test]
    fn test_spawn_pickup_lands_in_store() {
        let mut ctx = session();
        ctx.spawn_pickup(PickupKind::Heal, Vec2::new(10.0, 20.0));
        assert_eq!(ctx.store.pickups.len(), 1);
        assert_eq!(ctx.store.pickups[0].kind, PickupKind::Heal);
    }

    #[test]
    fn test_drain_events_empties_buffer() {
        let mut ctx = session();
        ctx.start_encounter();
        assert!(!ctx.events.is_empty());
        let drained = ctx.drain_events();
        assert!(!drained.is_empty());
        assert!(ctx.events.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut ctx = session();
        ctx.start_encounter();
        ctx.camera = ctx.derive_camera_target();
        let snapshot = ctx.snapshot();
        let json = serde_json::to_string(&snapshot).unwrap();
        assert!(json.contains("Approaching"));
    }

    #[test]
    fn test_rage_cap_resolved_from_roster() {
        let roster = RosterSnapshot {
            ally_rarities: vec![crate::roster::Rarity::Legendary],
            ..Default::default()
        };
        let ctx = SessionContext::new(1, 0, Tuning::default(), &roster);
        assert_eq!(ctx.rage.max_triggers(), 3);
    }
}
