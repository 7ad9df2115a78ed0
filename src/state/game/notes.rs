//! Note resolution: judgement bookkeeping, auto-play and the miss sweep.

use super::health::{hit_health_delta, miss_health_delta};
use super::{GameEngine, NoteState, Popup};
use crate::models::engine::AUTO_PLAY_EPSILON_MS;
use crate::models::stats::Judgement;

impl GameEngine {
    /// Resolves note `index` with `judgement` at clock time `time_ms`.
    pub(crate) fn apply_judgement(&mut self, index: usize, judgement: Judgement, time_ms: f64) {
        if self.note_states[index].is_resolved() {
            return;
        }

        self.note_states[index] = if judgement.is_miss() {
            NoteState::Missed
        } else {
            NoteState::Hit(judgement)
        };
        self.processed += 1;
        self.hit_stats.record(judgement);
        self.last_judgement = Some(judgement);

        let column = self.chart.notes()[index].column;
        self.popups.push(Popup {
            judgement,
            column,
            time_ms,
        });

        if judgement.is_miss() {
            self.combo = 0;
            self.change_health(miss_health_delta(self.chart.drain_rate, &self.modifiers));
            if self.modifiers.fails_on_miss() {
                self.fail("miss");
            } else if self.health <= 0.0 && self.modifiers.fails_on_empty_health() {
                self.fail("health depleted");
            }
        } else {
            self.combo += 1;
            self.max_combo = self.max_combo.max(self.combo);
            self.score += u64::from(judgement.weight()) * u64::from(self.combo);
            self.change_health(hit_health_delta(judgement, self.chart.drain_rate, &self.modifiers));
            if self.modifiers.perfect && judgement < Judgement::Perfect {
                self.restart_requested = true;
            }
        }

        self.advance_head();
    }

    fn advance_head(&mut self) {
        while self.head_index < self.note_states.len() && self.note_states[self.head_index].is_resolved() {
            self.head_index += 1;
        }
    }

    /// Hits every pending note within the auto-play epsilon of `now_ms`.
    pub(crate) fn auto_play(&mut self, now_ms: f64) {
        for i in self.head_index..self.note_states.len() {
            let note = &self.chart.notes()[i];
            if note.time - now_ms >= AUTO_PLAY_EPSILON_MS {
                break;
            }
            if self.note_states[i] == NoteState::Pending {
                self.apply_judgement(i, Judgement::Marvelous, now_ms);
            }
        }
    }

    /// Marks every pending note past its miss deadline as missed.
    pub(crate) fn sweep_misses(&mut self, now_ms: f64) {
        for i in self.head_index..self.note_states.len() {
            if self.halted() {
                break;
            }
            let time = self.chart.notes()[i].time;
            if !self.hit_window.is_missed(time, now_ms) {
                break;
            }
            if self.note_states[i] == NoteState::Pending {
                log::debug!("ENGINE: Miss on column {} ({:.0}ms)", self.chart.notes()[i].column, time);
                self.apply_judgement(i, Judgement::Miss, now_ms);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::{Chart, Note};
    use crate::models::modifiers::Modifiers;
    use crate::state::game::Phase;
    use crate::state::game::tests::chart;
    use crate::state::traits::{Transition, Update};
    use std::sync::Arc;

    fn stream(count: usize) -> Vec<Note> {
        (0..count).map(|i| Note::tap(1000.0 + 250.0 * i as f64, i % 4)).collect()
    }

    #[test]
    fn combo_resets_only_on_miss() {
        let mut engine = GameEngine::new(chart(4, stream(4)), Modifiers::default());
        engine.update(-2000.0);
        engine.press(0, 1000.0);
        engine.press(1, 1390.0);
        assert_eq!(engine.combo(), 2);
        assert_eq!(engine.hit_stats().bad, 1);

        engine.update(1700.0);
        assert_eq!(engine.combo(), 0);
        assert_eq!(engine.max_combo(), 2);

        engine.press(3, 1750.0);
        assert_eq!(engine.combo(), 1);
        assert_eq!(engine.max_combo(), 2);
    }

    #[test]
    fn misses_sweep_in_chart_order() {
        let mut engine = GameEngine::new(chart(4, stream(8)), Modifiers::default());
        engine.update(2000.0);
        // Everything up to 1750 is past its deadline.
        assert_eq!(engine.hit_stats().miss, 4);
        assert_eq!(engine.processed_count(), 4);
        assert_eq!(engine.note_states()[4], NoteState::Pending);
        assert_eq!(engine.popups().len(), 4);
    }

    #[test]
    fn health_depletion_fails_without_no_fail() {
        let notes = (0..6).map(|i| Note::tap(1000.0 + i as f64, i % 4)).collect();
        let mut engine = GameEngine::new(chart(4, notes), Modifiers::default());
        assert_eq!(engine.update(1200.0), Transition::Failed);
        assert_eq!(engine.phase(), Phase::Failed);
        assert_eq!(engine.health(), 0.0);
        assert_eq!(engine.processed_count(), 5);
    }

    #[test]
    fn perfect_mod_fails_on_miss_even_with_no_fail() {
        let mods = Modifiers {
            perfect: true,
            no_fail: true,
            ..Default::default()
        };
        let mut engine = GameEngine::new(chart(4, stream(2)), mods);
        assert_eq!(engine.update(1200.0), Transition::Failed);
    }

    #[test]
    fn score_multiplies_by_combo() {
        let mut engine = GameEngine::new(chart(4, stream(3)), Modifiers::default());
        engine.update(-2000.0);
        engine.press(0, 1000.0);
        engine.press(1, 1250.0);
        engine.press(2, 1500.0);
        assert_eq!(engine.score(), 320 * (1 + 2 + 3));
    }

    fn hp8(notes: Vec<Note>) -> Arc<Chart> {
        Arc::new(Chart::new(4, notes).unwrap().with_difficulty(8.0, 5.0))
    }

    #[test]
    fn drain_override_keeps_chart_rate_for_misses() {
        let mods = Modifiers {
            hp_drain_override: true,
            ..Default::default()
        };
        let mut engine = GameEngine::new(hp8(vec![Note::tap(1000.0, 0)]), mods);
        engine.update(1151.0);
        assert_eq!(engine.note_states()[0], NoteState::Missed);
        assert_eq!(engine.health(), 100.0 - (15.0 + 8.0));
    }

    #[test]
    fn drain_override_sets_passive_drain() {
        let mods = Modifiers {
            hp_drain_override: true,
            ..Default::default()
        };
        let notes = vec![Note::tap(1000.0, 0), Note::tap(11_000.0, 1)];
        let mut engine = GameEngine::new(hp8(notes), mods);
        engine.update(1000.0);
        engine.press(0, 1000.0);
        engine.update(6000.0);
        // Five seconds at the overridden rate of 5.
        assert!((engine.health() - 95.0).abs() < 1e-9);
    }
}
