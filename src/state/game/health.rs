//! Health rules: passive drain and per-judgement deltas.

use super::GameEngine;
use crate::models::engine::{MAX_HEALTH, MISS_HEALTH_PENALTY};
use crate::models::modifiers::Modifiers;
use crate::models::stats::Judgement;

/// Health lost per second of chart time.
pub fn drain_per_second(drain_rate: f64) -> f64 {
    0.5 + drain_rate / 10.0
}

/// Signed health change for a miss.
pub fn miss_health_delta(drain_rate: f64, modifiers: &Modifiers) -> f64 {
    -(MISS_HEALTH_PENALTY + drain_rate) * modifiers.miss_health_scale()
}

/// Health gained for a non-miss judgement.
pub fn hit_health_delta(judgement: Judgement, drain_rate: f64, modifiers: &Modifiers) -> f64 {
    judgement.base_health_gain() * (1.0 - drain_rate / 15.0) * modifiers.hit_health_scale()
}

impl GameEngine {
    /// Drains health for the part of `from..to` inside the chart's active span.
    pub(crate) fn drain_health(&mut self, from_ms: f64, to_ms: f64) {
        let start = self.chart.first_note_time();
        let end = self.song_end_time();
        if end <= start {
            return;
        }

        let elapsed_ms = to_ms.clamp(start, end) - from_ms.clamp(start, end);
        if elapsed_ms <= 0.0 {
            return;
        }

        let loss = drain_per_second(self.passive_drain_rate) * elapsed_ms / 1000.0;
        self.change_health(-loss);
        if self.health <= 0.0 && self.modifiers.fails_on_empty_health() {
            self.fail("health drained");
        }
    }

    pub(crate) fn change_health(&mut self, delta: f64) {
        self.health = (self.health + delta).clamp(0.0, MAX_HEALTH);
    }
}
