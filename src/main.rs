//! Fogline headless demo driver
//!
//! Runs a scripted session with a fixed-step accumulator loop and logs
//! phase transitions and the final outcome. Useful for balance passes and
//! smoke-testing the core without a renderer.

use glam::Vec2;

use fogline::consts::{MAX_SUBSTEPS, SIM_DT};
use fogline::roster::{Rarity, RosterSnapshot, SummonedAlly};
use fogline::sim::{FrameInput, GameEvent, SessionContext, tick};
use fogline::tuning::Tuning;

/// Wall-clock cap on the demo session (seconds of simulated time)
const DEMO_LIMIT: f32 = 400.0;
/// The pincer arms after this much open-field combat
const ENCOUNTER_START: f32 = 25.0;
/// The stage timer lapses here, arming boss urgency
const STAGE_TIMER: f32 = 60.0;

fn main() {
    env_logger::init();

    let seed = std::env::args()
        .nth(1)
        .and_then(|arg| arg.parse().ok())
        .unwrap_or(0xF06);
    log::info!("fogline demo starting (seed {seed})");

    let roster = RosterSnapshot {
        ally_rarities: vec![Rarity::Epic, Rarity::Rare],
        summoned: vec![SummonedAlly {
            attack: 14.0,
            fire_interval: 0.8,
        }],
        player_level: 40,
        ..Default::default()
    };
    let mut ctx = SessionContext::new(seed, 0, Tuning::default(), &roster);

    let mut started = false;
    let mut urgency_armed = false;
    let mut accumulator = 0.0_f32;
    // The demo host delivers uneven frame times; the core clamps per tick
    let frame_dt = 1.0 / 72.0;

    while ctx.outcome.is_none() && ctx.elapsed < DEMO_LIMIT {
        accumulator += frame_dt;
        let mut substeps = 0;
        while accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            let input = scripted_input(&ctx);
            tick(&mut ctx, &input, SIM_DT);
            accumulator -= SIM_DT;
            substeps += 1;
        }

        if !started && ctx.elapsed >= ENCOUNTER_START {
            started = ctx.start_encounter();
        }
        if !urgency_armed && ctx.elapsed >= STAGE_TIMER {
            ctx.arm_time_limit();
            urgency_armed = true;
        }

        for event in ctx.drain_events() {
            match event {
                GameEvent::PhaseChanged { from, to, .. } => {
                    println!("[{:7.2}s] phase {from:?} -> {to:?}", ctx.elapsed);
                }
                GameEvent::RageTriggered { trigger_count } => {
                    println!("[{:7.2}s] rage trigger #{trigger_count}", ctx.elapsed);
                }
                GameEvent::AwakeningTrigger { name } => {
                    println!("[{:7.2}s] awakening: {name}", ctx.elapsed);
                }
                GameEvent::BossTierChanged { tier, hp_ratio } => {
                    println!(
                        "[{:7.2}s] boss tier {tier} at {:.0}% hp",
                        ctx.elapsed,
                        hp_ratio * 100.0
                    );
                }
                GameEvent::SessionEnded { outcome } => {
                    println!("[{:7.2}s] session ended: {outcome:?}", ctx.elapsed);
                }
                _ => {}
            }
        }
    }

    let snapshot = ctx.snapshot();
    println!(
        "done: outcome {:?}, score {}, kills {}, wave {}, hp {:.0}/{:.0}",
        snapshot.outcome, snapshot.score, snapshot.kills, ctx.wave_index, snapshot.player.hp,
        snapshot.player.max_hp
    );
}

/// Minimal pilot: strafe gently toward the corridor center and hold fire
fn scripted_input(ctx: &SessionContext) -> FrameInput {
    let drift = -ctx.store.player.pos.x * 0.01;
    FrameInput {
        move_dir: Vec2::new(drift.clamp(-1.0, 1.0), 0.0),
        fire: true,
    }
}
