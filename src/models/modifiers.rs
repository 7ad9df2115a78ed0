//! Gameplay modifiers.
//!
//! A flat, read-only configuration bag. Components consult it by name
//! wherever a rule branches; it carries no behavior of its own.

use serde::{Deserialize, Serialize};

/// Drain rate used when `hp_drain_override` is set.
pub const OVERRIDE_DRAIN_RATE: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub easy: bool,
    pub no_fail: bool,
    pub half_time: bool,
    pub hard_rock: bool,
    pub sudden_death: bool,
    /// Any tier below Perfect restarts the run; a miss fails it.
    pub perfect: bool,
    pub double_time: bool,
    pub auto_play: bool,
    pub random: bool,
    pub mirror: bool,
    pub song_speed: f64,
    pub hp_drain_override: bool,
}

impl Default for Modifiers {
    fn default() -> Self {
        Self {
            easy: false,
            no_fail: false,
            half_time: false,
            hard_rock: false,
            sudden_death: false,
            perfect: false,
            double_time: false,
            auto_play: false,
            random: false,
            mirror: false,
            song_speed: 1.0,
            hp_drain_override: false,
        }
    }
}

impl Modifiers {
    /// Audio playback rate implied by the speed modifiers.
    pub fn playback_rate(&self) -> f64 {
        if self.double_time {
            1.5
        } else if self.half_time {
            0.75
        } else {
            self.song_speed.clamp(0.5, 2.0)
        }
    }

    /// Drain rate fed into the passive drain formula.
    pub fn effective_drain_rate(&self, chart_drain_rate: f64) -> f64 {
        if self.hp_drain_override {
            OVERRIDE_DRAIN_RATE
        } else {
            chart_drain_rate
        }
    }

    pub fn miss_health_scale(&self) -> f64 {
        let mut scale = 1.0;
        if self.easy {
            scale *= 0.5;
        }
        if self.hard_rock {
            scale *= 1.5;
        }
        scale
    }

    pub fn hit_health_scale(&self) -> f64 {
        let mut scale = 1.0;
        if self.easy {
            scale *= 1.2;
        }
        if self.hard_rock {
            scale *= 0.6;
        }
        scale
    }

    pub fn fails_on_miss(&self) -> bool {
        self.sudden_death || self.perfect
    }

    pub fn fails_on_empty_health(&self) -> bool {
        !self.no_fail
    }
}
