//! Encounter phase machine and the nested arena session
//!
//! One hierarchical enum owns the whole phase picture: the nested
//! [`ArenaSession`] only exists inside the variants where it is legal, so
//! illegal phase combinations are unrepresentable. Progression is strictly
//! forward; there are no backward edges to mis-take.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::entities::{Boss, EntityStore};
use super::events::GameEvent;
use super::pincer::{BossBoundary, FogBoundary};
use crate::tuning::{CombatTuning, EncounterTuning};

/// Discriminant-only view of the encounter phase, ordered by progression
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PhaseKind {
    Dormant,
    Approaching,
    Warning,
    Meeting,
    ArenaForming,
    BossFight,
    Complete,
}

/// How the boss fight ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    BossDefeated,
    /// Hard session time-limit lapsed; the encounter auto-clears
    TimeLimitClear,
}

/// Nested boss-fight states
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ArenaState {
    Dormant,
    Awakening { elapsed: f32 },
    Active,
    Victory { remaining: f32 },
    Complete,
}

/// The scripted boss fight itself, driven every frame while the parent is
/// in `BossFight`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArenaSession {
    state: ArenaState,
    tier: usize,
    /// One flag per awakening beat; each fires at most once
    fired: Vec<bool>,
    mode_change_fired: bool,
}

impl ArenaSession {
    fn new(tuning: &EncounterTuning) -> Self {
        Self {
            state: ArenaState::Dormant,
            tier: 0,
            fired: vec![false; tuning.awakening.len()],
            mode_change_fired: false,
        }
    }

    pub fn state(&self) -> &ArenaState {
        &self.state
    }

    pub fn tier(&self) -> usize {
        self.tier
    }

    /// Advance one frame. Returns `true` once the session reaches `Complete`.
    fn update(
        &mut self,
        store: &mut EntityStore,
        tuning: &EncounterTuning,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        match &mut self.state {
            ArenaState::Dormant => {
                log::info!("arena session awakening");
                self.state = ArenaState::Awakening { elapsed: 0.0 };
                false
            }
            ArenaState::Awakening { elapsed } => {
                *elapsed += dt;
                let clock = *elapsed;
                for (i, beat) in tuning.awakening.iter().enumerate() {
                    if !self.fired[i] && clock >= beat.at {
                        self.fired[i] = true;
                        events.push(GameEvent::AwakeningTrigger {
                            name: beat.name.clone(),
                        });
                    }
                }
                if clock >= tuning.awakening_duration {
                    log::info!("arena session active");
                    self.state = ArenaState::Active;
                }
                false
            }
            ArenaState::Active => {
                let Some(boss) = store.boss.as_mut() else {
                    // Boss entity missing is a construction bug, not a
                    // runtime case; treat as an immediate completion.
                    debug_assert!(false, "arena active without a boss entity");
                    self.state = ArenaState::Complete;
                    return true;
                };

                // Close on the player, stopping short of full overlap so
                // contact damage stays cooldown-paced rather than constant
                let to_player = store.player.pos - boss.pos;
                let stop_range = (boss.radius + store.player.radius) * 0.6;
                if to_player.length() > stop_range {
                    let dir = to_player.normalize_or_zero();
                    boss.pos += dir * boss.speed * boss.speed_mult * dt;
                }

                // Tier transitions by descending hp ratio
                let ratio = boss.hp_ratio();
                let mut target_tier = self.tier;
                for (i, tier) in tuning.tiers.iter().enumerate() {
                    if ratio <= tier.hp_ratio {
                        target_tier = i;
                    }
                }
                if target_tier != self.tier {
                    self.tier = target_tier;
                    let tier = &tuning.tiers[target_tier];
                    boss.speed_mult = tier.speed_mult;
                    boss.attack_mult = tier.attack_mult;
                    log::info!("boss tier {} (hp {:.0}%)", target_tier, ratio * 100.0);
                    events.push(GameEvent::BossTierChanged {
                        tier: target_tier,
                        hp_ratio: ratio,
                    });
                }

                // One-time combat-mode handoff request
                if let Some(threshold) = tuning.mode_change_ratio {
                    if !self.mode_change_fired && ratio <= threshold {
                        self.mode_change_fired = true;
                        events.push(GameEvent::ModeChangeRequested { hp_ratio: ratio });
                    }
                }

                if boss.hp <= 0.0 {
                    events.push(GameEvent::BossDefeated { pos: boss.pos });
                    log::info!("boss defeated");
                    self.state = ArenaState::Victory {
                        remaining: tuning.victory_duration,
                    };
                }
                false
            }
            ArenaState::Victory { remaining } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    self.state = ArenaState::Complete;
                }
                matches!(self.state, ArenaState::Complete)
            }
            ArenaState::Complete => true,
        }
    }
}

/// Top-level encounter phase with nested payloads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EncounterPhase {
    Dormant,
    Approaching,
    Warning,
    Meeting {
        dwell_remaining: f32,
        meeting_point: Vec2,
    },
    ArenaForming {
        remaining: f32,
        anchor: Vec2,
        session: ArenaSession,
    },
    BossFight {
        session: ArenaSession,
    },
    Complete {
        outcome: Outcome,
    },
}

impl EncounterPhase {
    fn kind(&self) -> PhaseKind {
        match self {
            EncounterPhase::Dormant => PhaseKind::Dormant,
            EncounterPhase::Approaching => PhaseKind::Approaching,
            EncounterPhase::Warning => PhaseKind::Warning,
            EncounterPhase::Meeting { .. } => PhaseKind::Meeting,
            EncounterPhase::ArenaForming { .. } => PhaseKind::ArenaForming,
            EncounterPhase::BossFight { .. } => PhaseKind::BossFight,
            EncounterPhase::Complete { .. } => PhaseKind::Complete,
        }
    }
}

/// The encounter machine: owns pincer activity and, once triggered, the
/// nested arena session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Encounter {
    phase: EncounterPhase,
}

impl Default for Encounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Encounter {
    pub fn new() -> Self {
        Self {
            phase: EncounterPhase::Dormant,
        }
    }

    pub fn kind(&self) -> PhaseKind {
        self.phase.kind()
    }

    pub fn phase(&self) -> &EncounterPhase {
        &self.phase
    }

    /// Open-field spawning and combat are suppressed entirely
    pub fn is_blocking(&self) -> bool {
        matches!(self.kind(), PhaseKind::Meeting | PhaseKind::ArenaForming)
    }

    pub fn is_in_boss_phase(&self) -> bool {
        matches!(self.kind(), PhaseKind::BossFight | PhaseKind::Complete)
    }

    /// Arena formation interpolation for the rendering collaborator
    pub fn arena_form_progress(&self, tuning: &EncounterTuning) -> f32 {
        match &self.phase {
            EncounterPhase::ArenaForming { remaining, .. } => {
                if tuning.forming_dwell <= 0.0 {
                    1.0
                } else {
                    (1.0 - remaining / tuning.forming_dwell).clamp(0.0, 1.0)
                }
            }
            EncounterPhase::BossFight { .. } | EncounterPhase::Complete { .. } => 1.0,
            _ => 0.0,
        }
    }

    pub fn arena_session(&self) -> Option<&ArenaSession> {
        match &self.phase {
            EncounterPhase::ArenaForming { session, .. }
            | EncounterPhase::BossFight { session } => Some(session),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match &self.phase {
            EncounterPhase::Complete { outcome } => Some(*outcome),
            _ => None,
        }
    }

    /// External start signal. No-op unless Dormant.
    pub fn start(
        &mut self,
        fog: &mut FogBoundary,
        boundary: &mut BossBoundary,
        events: &mut Vec<GameEvent>,
    ) -> bool {
        if !matches!(self.phase, EncounterPhase::Dormant) {
            return false;
        }
        fog.running = true;
        boundary.running = true;
        self.transition(EncounterPhase::Approaching, None, events);
        true
    }

    fn transition(
        &mut self,
        next: EncounterPhase,
        anchor: Option<Vec2>,
        events: &mut Vec<GameEvent>,
    ) {
        let from = self.kind();
        let to = next.kind();
        // Forward edges only; the enum has no legal back-transition
        debug_assert!(to > from, "illegal transition {from:?} -> {to:?}");
        self.phase = next;
        log::info!("encounter {from:?} -> {to:?}");
        events.push(GameEvent::PhaseChanged { from, to, anchor });
    }

    /// Evaluate transition conditions and drive the nested session.
    ///
    /// Called once per frame after the boundaries advanced; `session_elapsed`
    /// is the total session clock used by the auto-clear safeguard.
    #[allow(clippy::too_many_arguments)]
    pub fn evaluate(
        &mut self,
        store: &mut EntityStore,
        fog: &mut FogBoundary,
        boundary: &mut BossBoundary,
        encounter: &EncounterTuning,
        combat: &CombatTuning,
        session_elapsed: f32,
        dt: f32,
        events: &mut Vec<GameEvent>,
    ) {
        match &mut self.phase {
            EncounterPhase::Dormant | EncounterPhase::Complete { .. } => {}

            EncounterPhase::Approaching => {
                let axial = boundary.axial_distance(store.player.pos.y);
                if axial <= encounter.warning_width {
                    self.transition(EncounterPhase::Warning, None, events);
                }
            }

            EncounterPhase::Warning => {
                let player = store.player.pos;
                let boss_point = boundary.point();
                let radial = player.distance(boss_point);
                let axial = boundary.axial_distance(player.y);
                let gap = boundary.position - fog.position;

                if radial < encounter.meet_radial
                    || axial < encounter.meet_axial
                    || gap <= encounter.min_gap
                {
                    // The pincer has closed: clear the open-field working
                    // set atomically and freeze both boundaries.
                    for enemy in store.enemies.iter_mut() {
                        if enemy.is_live() {
                            events.push(GameEvent::EnemyDeparted {
                                id: enemy.id,
                                pos: enemy.pos,
                            });
                            enemy.begin_purify(combat.purify_duration);
                        }
                    }
                    store.projectiles.clear();
                    // The chase is over for good; host pause/resume stays
                    // independent of this stop
                    fog.running = false;
                    boundary.running = false;

                    let meeting_point = (player + boss_point) * 0.5;
                    self.transition(
                        EncounterPhase::Meeting {
                            dwell_remaining: encounter.meeting_dwell,
                            meeting_point,
                        },
                        Some(meeting_point),
                        events,
                    );
                }
            }

            EncounterPhase::Meeting {
                dwell_remaining,
                meeting_point,
            } => {
                *dwell_remaining -= dt;
                if *dwell_remaining <= 0.0 {
                    let anchor = *meeting_point;
                    let opening = encounter.tiers.first();
                    let id = store.next_entity_id();
                    store.boss = Some(Boss {
                        id,
                        pos: anchor,
                        hp: encounter.boss_max_hp,
                        max_hp: encounter.boss_max_hp,
                        attack: encounter.boss_attack,
                        defense: encounter.boss_defense,
                        radius: encounter.boss_radius,
                        speed: encounter.boss_speed,
                        speed_mult: opening.map(|t| t.speed_mult).unwrap_or(1.0),
                        attack_mult: opening.map(|t| t.attack_mult).unwrap_or(1.0),
                        contact_cooldown: 0.0,
                    });
                    self.transition(
                        EncounterPhase::ArenaForming {
                            remaining: encounter.forming_dwell,
                            anchor,
                            session: ArenaSession::new(encounter),
                        },
                        Some(anchor),
                        events,
                    );
                }
            }

            EncounterPhase::ArenaForming { remaining, .. } => {
                *remaining -= dt;
                if *remaining <= 0.0 {
                    // Move the session payload forward without cloning
                    let prev = std::mem::replace(&mut self.phase, EncounterPhase::Dormant);
                    let EncounterPhase::ArenaForming { anchor, session, .. } = prev else {
                        unreachable!()
                    };
                    self.phase = EncounterPhase::BossFight { session };
                    log::info!("encounter ArenaForming -> BossFight");
                    events.push(GameEvent::PhaseChanged {
                        from: PhaseKind::ArenaForming,
                        to: PhaseKind::BossFight,
                        anchor: Some(anchor),
                    });
                }
            }

            EncounterPhase::BossFight { session } => {
                let finished = session.update(store, encounter, dt, events);
                if finished {
                    self.transition(
                        EncounterPhase::Complete {
                            outcome: Outcome::BossDefeated,
                        },
                        None,
                        events,
                    );
                } else if session_elapsed > encounter.time_limit {
                    log::info!("session time limit lapsed, auto-clearing boss fight");
                    self.transition(
                        EncounterPhase::Complete {
                            outcome: Outcome::TimeLimitClear,
                        },
                        None,
                        events,
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::RosterSnapshot;
    use crate::sim::entities::{Enemy, EnemyBehavior, EntityKind, PurifyState};
    use crate::tuning::Tuning;

    struct Rig {
        store: EntityStore,
        fog: FogBoundary,
        boundary: BossBoundary,
        encounter: Encounter,
        tuning: Tuning,
        events: Vec<GameEvent>,
    }

    impl Rig {
        fn new() -> Self {
            let tuning = Tuning::default();
            let store = EntityStore::new(&RosterSnapshot::default(), &tuning.player);
            let fog = FogBoundary::new(store.player.pos.y, &tuning.fog);
            let boundary = BossBoundary::new(
                store.player.pos.y,
                &tuning.boss,
                tuning.stage(0).boss_advance_accel,
            );
            Self {
                store,
                fog,
                boundary,
                encounter: Encounter::new(),
                tuning,
                events: Vec::new(),
            }
        }

        fn started() -> Self {
            let mut rig = Self::new();
            assert!(rig.encounter.start(&mut rig.fog, &mut rig.boundary, &mut rig.events));
            rig
        }

        fn evaluate(&mut self, elapsed: f32, dt: f32) {
            self.encounter.evaluate(
                &mut self.store,
                &mut self.fog,
                &mut self.boundary,
                &self.tuning.encounter,
                &self.tuning.combat,
                elapsed,
                dt,
                &mut self.events,
            );
        }

        /// Force the boundary next to the player and walk to BossFight
        fn walk_to_boss_fight(&mut self) {
            self.boundary.position = self.store.player.pos.y + 40.0;
            self.evaluate(10.0, 1.0 / 60.0); // -> Warning
            self.evaluate(10.0, 1.0 / 60.0); // -> Meeting
            assert_eq!(self.encounter.kind(), PhaseKind::Meeting);
            self.evaluate(12.0, self.tuning.encounter.meeting_dwell + 0.1); // -> ArenaForming
            assert_eq!(self.encounter.kind(), PhaseKind::ArenaForming);
            self.evaluate(14.0, self.tuning.encounter.forming_dwell + 0.1); // -> BossFight
            assert_eq!(self.encounter.kind(), PhaseKind::BossFight);
        }

        fn push_enemy(&mut self) -> u32 {
            let id = self.store.next_entity_id();
            self.store.enemies.push(Enemy {
                id,
                pos: self.store.player.pos + glam::Vec2::new(60.0, 200.0),
                hp: 50.0,
                max_hp: 50.0,
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
    }

    #[test]
    fn test_start_only_from_dormant() {
        let mut rig = Rig::new();
        assert!(rig.encounter.start(&mut rig.fog, &mut rig.boundary, &mut rig.events));
        assert_eq!(rig.encounter.kind(), PhaseKind::Approaching);
        assert!(rig.fog.running && rig.boundary.running);
        // Second signal is a no-op
        assert!(!rig.encounter.start(&mut rig.fog, &mut rig.boundary, &mut rig.events));
    }

    #[test]
    fn test_scenario_warning_at_axial_40() {
        // Boss at axial distance 40, warning width 150, phase Approaching:
        // the next evaluation must yield Warning
        let mut rig = Rig::started();
        rig.boundary.position = rig.store.player.pos.y + 40.0;
        rig.evaluate(5.0, 1.0 / 60.0);
        assert_eq!(rig.encounter.kind(), PhaseKind::Warning);
    }

    #[test]
    fn test_no_warning_outside_width() {
        let mut rig = Rig::started();
        rig.boundary.position = rig.store.player.pos.y + 151.0;
        rig.evaluate(5.0, 1.0 / 60.0);
        assert_eq!(rig.encounter.kind(), PhaseKind::Approaching);
    }

    #[test]
    fn test_meeting_via_gap_condition() {
        let mut rig = Rig::started();
        // Inside warning range but not meeting range
        rig.boundary.position = rig.store.player.pos.y + 100.0;
        rig.evaluate(5.0, 1.0 / 60.0);
        assert_eq!(rig.encounter.kind(), PhaseKind::Warning);

        // Fog has crushed the gap to the minimum
        rig.fog.position = rig.boundary.position - rig.tuning.encounter.min_gap;
        rig.evaluate(5.0, 1.0 / 60.0);
        assert_eq!(rig.encounter.kind(), PhaseKind::Meeting);
    }

    #[test]
    fn test_meeting_clears_open_field_atomically() {
        let mut rig = Rig::started();
        let enemy_id = rig.push_enemy();
        rig.store.projectiles.push(crate::sim::entities::Projectile {
            id: 999,
            pos: glam::Vec2::ZERO,
            vel: glam::Vec2::ZERO,
            damage: 1.0,
            side: crate::sim::entities::Side::Player,
            radius: 8.0,
            pierce: 0,
            homing: None,
            hit_ids: Vec::new(),
        });

        rig.boundary.position = rig.store.player.pos.y + 40.0;
        rig.evaluate(5.0, 1.0 / 60.0); // Warning
        rig.evaluate(5.0, 1.0 / 60.0); // Meeting

        assert_eq!(rig.encounter.kind(), PhaseKind::Meeting);
        assert!(rig.store.projectiles.is_empty());
        assert!(matches!(
            rig.store.enemies[0].purify,
            PurifyState::Purifying { .. }
        ));
        assert!(!rig.fog.running);
        assert!(!rig.boundary.running);
        assert!(rig.events.iter().any(
            |e| matches!(e, GameEvent::EnemyDeparted { id, .. } if *id == enemy_id)
        ));
        // Meeting anchor is the player/boss midpoint
        let anchor = rig.events.iter().find_map(|e| match e {
            GameEvent::PhaseChanged { to: PhaseKind::Meeting, anchor, .. } => *anchor,
            _ => None,
        });
        let expected = (rig.store.player.pos + rig.boundary.point()) * 0.5;
        assert_eq!(anchor, Some(expected));
    }

    #[test]
    fn test_boss_spawns_at_meeting_point() {
        let mut rig = Rig::started();
        rig.walk_to_boss_fight();
        let boss = rig.store.boss.as_ref().expect("boss must exist");
        assert_eq!(boss.hp, rig.tuning.encounter.boss_max_hp);
        // Anchored at the recorded meeting point
        let anchor = rig.events.iter().find_map(|e| match e {
            GameEvent::PhaseChanged { to: PhaseKind::ArenaForming, anchor, .. } => *anchor,
            _ => None,
        });
        assert_eq!(anchor, Some(boss.pos));
    }

    #[test]
    fn test_blocking_phases() {
        let mut rig = Rig::started();
        assert!(!rig.encounter.is_blocking());
        rig.boundary.position = rig.store.player.pos.y + 40.0;
        rig.evaluate(5.0, 1.0 / 60.0);
        rig.evaluate(5.0, 1.0 / 60.0);
        assert!(rig.encounter.is_blocking()); // Meeting
        rig.evaluate(6.0, rig.tuning.encounter.meeting_dwell + 0.1);
        assert!(rig.encounter.is_blocking()); // ArenaForming
        rig.evaluate(7.0, rig.tuning.encounter.forming_dwell + 0.1);
        assert!(!rig.encounter.is_blocking()); // BossFight
        assert!(rig.encounter.is_in_boss_phase());
    }

    #[test]
    fn test_arena_form_progress_interpolates() {
        let mut rig = Rig::started();
        assert_eq!(rig.encounter.arena_form_progress(&rig.tuning.encounter), 0.0);

        rig.boundary.position = rig.store.player.pos.y + 40.0;
        rig.evaluate(5.0, 1.0 / 60.0);
        rig.evaluate(5.0, 1.0 / 60.0);
        rig.evaluate(6.0, rig.tuning.encounter.meeting_dwell + 0.1);
        assert_eq!(rig.encounter.kind(), PhaseKind::ArenaForming);

        // Halfway through formation
        rig.evaluate(6.5, rig.tuning.encounter.forming_dwell * 0.5);
        let progress = rig.encounter.arena_form_progress(&rig.tuning.encounter);
        assert!(progress > 0.4 && progress < 0.6, "progress {progress}");

        rig.evaluate(7.0, rig.tuning.encounter.forming_dwell);
        assert_eq!(rig.encounter.arena_form_progress(&rig.tuning.encounter), 1.0);
    }

    #[test]
    fn test_awakening_beats_fire_once_in_order() {
        let mut rig = Rig::started();
        rig.walk_to_boss_fight();

        let mut names = Vec::new();
        for _ in 0..((rig.tuning.encounter.awakening_duration / 0.1).ceil() as usize + 2) {
            rig.evaluate(20.0, 0.1);
            for e in rig.events.drain(..) {
                if let GameEvent::AwakeningTrigger { name } = e {
                    names.push(name);
                }
            }
        }
        assert_eq!(names, vec!["camera_focus", "roar_shake", "health_bar_reveal"]);
        assert!(matches!(
            rig.encounter.arena_session().unwrap().state(),
            ArenaState::Active
        ));
    }

    #[test]
    fn test_tier_transitions_and_mode_change() {
        let mut rig = Rig::started();
        rig.walk_to_boss_fight();
        // Skip awakening
        rig.evaluate(20.0, 1.0 / 60.0);
        rig.evaluate(20.0, rig.tuning.encounter.awakening_duration + 0.1);
        assert!(matches!(
            rig.encounter.arena_session().unwrap().state(),
            ArenaState::Active
        ));

        // Drop below tier 1 threshold
        let max_hp = rig.tuning.encounter.boss_max_hp;
        rig.store.boss.as_mut().unwrap().hp = max_hp * 0.5;
        rig.evaluate(21.0, 1.0 / 60.0);
        assert_eq!(rig.encounter.arena_session().unwrap().tier(), 1);
        assert!(rig.events.iter().any(
            |e| matches!(e, GameEvent::BossTierChanged { tier: 1, .. })
        ));
        rig.events.clear();

        // Below the mode-change ratio: tier 2 plus a single handoff request
        rig.store.boss.as_mut().unwrap().hp = max_hp * 0.1;
        rig.evaluate(22.0, 1.0 / 60.0);
        rig.evaluate(22.1, 1.0 / 60.0);
        assert_eq!(rig.encounter.arena_session().unwrap().tier(), 2);
        let requests = rig
            .events
            .iter()
            .filter(|e| matches!(e, GameEvent::ModeChangeRequested { .. }))
            .count();
        assert_eq!(requests, 1);
    }

    #[test]
    fn test_victory_plays_out_then_completes() {
        let mut rig = Rig::started();
        rig.walk_to_boss_fight();
        rig.evaluate(20.0, 1.0 / 60.0);
        rig.evaluate(20.0, rig.tuning.encounter.awakening_duration + 0.1);

        rig.store.boss.as_mut().unwrap().hp = 0.0;
        rig.evaluate(21.0, 1.0 / 60.0);
        assert!(matches!(
            rig.encounter.arena_session().unwrap().state(),
            ArenaState::Victory { .. }
        ));
        assert!(rig.events.iter().any(|e| matches!(e, GameEvent::BossDefeated { .. })));

        rig.evaluate(22.0, rig.tuning.encounter.victory_duration + 0.1);
        rig.evaluate(22.1, 1.0 / 60.0);
        assert_eq!(rig.encounter.kind(), PhaseKind::Complete);
        assert_eq!(rig.encounter.outcome(), Some(Outcome::BossDefeated));
    }

    #[test]
    fn test_time_limit_auto_clear() {
        let mut rig = Rig::started();
        rig.walk_to_boss_fight();
        let over = rig.tuning.encounter.time_limit + 1.0;
        rig.evaluate(over, 1.0 / 60.0);
        assert_eq!(rig.encounter.kind(), PhaseKind::Complete);
        assert_eq!(rig.encounter.outcome(), Some(Outcome::TimeLimitClear));
    }

    #[test]
    fn test_no_backward_transitions() {
        let mut rig = Rig::started();
        rig.walk_to_boss_fight();

        // Re-create Approaching-style geometry: boss far away again
        rig.boundary.position = rig.store.player.pos.y + 5000.0;
        let before = rig.encounter.kind();
        for _ in 0..10 {
            rig.evaluate(20.0, 1.0 / 60.0);
            assert!(rig.encounter.kind() >= before);
        }
        assert_ne!(rig.encounter.kind(), PhaseKind::Approaching);
    }

    #[test]
    fn test_phase_kind_ordering_matches_progression() {
        assert!(PhaseKind::Dormant < PhaseKind::Approaching);
        assert!(PhaseKind::Approaching < PhaseKind::Warning);
        assert!(PhaseKind::Warning < PhaseKind::Meeting);
        assert!(PhaseKind::Meeting < PhaseKind::ArenaForming);
        assert!(PhaseKind::ArenaForming < PhaseKind::BossFight);
        assert!(PhaseKind::BossFight < PhaseKind::Complete);
    }
}
