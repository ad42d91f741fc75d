//! Session-limited rage gauge
//!
//! Charges on hits and kills, unlocks a time-boxed damage multiplier a
//! capped number of times per session. The cap comes from the best
//! equipped-ally rarity, resolved once at session start.

use serde::{Deserialize, Serialize};

use crate::consts;
use crate::tuning::RageTuning;

/// Result of feeding charge into the gauge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeResult {
    /// Gauge cannot charge: buff active or triggers exhausted
    Blocked,
    /// Charge accepted, gauge below full
    Charging,
    /// Gauge reached full and a trigger is available
    Ready,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RageGauge {
    gauge: f32,
    active: bool,
    remaining: f32,
    trigger_count: u32,
    max_triggers: u32,
    gain_rate: f32,
    duration: f32,
    multiplier: f32,
    /// Halts `update` so a menu pause never drains the buff
    pub paused: bool,
}

impl RageGauge {
    pub fn new(max_triggers: u32, tuning: &RageTuning) -> Self {
        Self {
            gauge: 0.0,
            active: false,
            remaining: 0.0,
            trigger_count: 0,
            max_triggers,
            gain_rate: tuning.gain_rate,
            duration: tuning.duration,
            multiplier: tuning.multiplier,
            paused: false,
        }
    }

    pub fn gauge(&self) -> f32 {
        self.gauge
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn trigger_count(&self) -> u32 {
        self.trigger_count
    }

    pub fn max_triggers(&self) -> u32 {
        self.max_triggers
    }

    fn exhausted(&self) -> bool {
        self.trigger_count >= self.max_triggers
    }

    /// Full gauge with a trigger still available
    pub fn is_ready(&self) -> bool {
        !self.active && !self.exhausted() && self.gauge >= consts::GAUGE_MAX
    }

    /// Feed charge into the gauge. No-op while the buff is active or the
    /// session's triggers are exhausted.
    pub fn add(&mut self, amount: f32) -> ChargeResult {
        if self.active || self.exhausted() {
            return ChargeResult::Blocked;
        }
        self.gauge = (self.gauge + amount * self.gain_rate).clamp(0.0, consts::GAUGE_MAX);
        if self.gauge >= consts::GAUGE_MAX {
            ChargeResult::Ready
        } else {
            ChargeResult::Charging
        }
    }

    /// Consume the full gauge and start the buff. Fails (returning `false`)
    /// unless the gauge is ready.
    pub fn trigger(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.gauge = 0.0;
        self.active = true;
        self.remaining = self.duration;
        self.trigger_count += 1;
        debug_assert!(self.trigger_count <= self.max_triggers);
        log::info!(
            "rage triggered ({}/{})",
            self.trigger_count,
            self.max_triggers
        );
        true
    }

    /// Count down the active buff. Returns `true` exactly once, on the
    /// frame the buff expires.
    pub fn update(&mut self, dt: f32) -> bool {
        if !self.active || self.paused {
            return false;
        }
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.active = false;
            self.remaining = 0.0;
            return true;
        }
        false
    }

    /// Boosted multiplier while active, 1.0 otherwise
    pub fn damage_multiplier(&self) -> f32 {
        if self.active { self.multiplier } else { 1.0 }
    }
}
