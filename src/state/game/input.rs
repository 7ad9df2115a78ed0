//! Input handling for GameEngine - queue_press, queue_release, press

use super::{GameEngine, NoteState, Phase, QueuedInput};
use crate::models::stats::Judgement;

/// Result of resolving one press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    Judged(Judgement),
    /// Matched no note; empty presses carry no penalty.
    Ignored,
}

impl GameEngine {
    /// Queues a press on a logical column, stamped with clock time.
    ///
    /// Queued inputs are applied at the next `update`, before the miss sweep.
    pub fn queue_press(&mut self, column: usize, time_ms: f64) {
        self.queue(column, time_ms, true);
    }

    pub fn queue_release(&mut self, column: usize, time_ms: f64) {
        self.queue(column, time_ms, false);
    }

    fn queue(&mut self, column: usize, time_ms: f64, pressed: bool) {
        if column >= self.held.len() {
            return;
        }
        // Releases always go through so held lanes never stick.
        if !pressed {
            self.held[column] = false;
        }
        if !matches!(self.phase, Phase::Introducing | Phase::Playing) {
            return;
        }
        // Auto-play owns every note.
        if pressed && self.modifiers.auto_play {
            return;
        }
        if pressed {
            self.held[column] = true;
        }
        self.pending_inputs.push(QueuedInput {
            column,
            time_ms,
            pressed,
        });
    }

    pub(crate) fn apply_queued_inputs(&mut self, now_ms: f64) {
        let mut inputs = std::mem::take(&mut self.pending_inputs);
        inputs.sort_by(|a, b| a.time_ms.total_cmp(&b.time_ms));

        for input in inputs {
            if self.halted() {
                break;
            }
            // Inputs from the future wait for their frame.
            if input.time_ms > now_ms {
                self.pending_inputs.push(input);
                continue;
            }
            if input.pressed {
                self.press(input.column, input.time_ms);
            }
        }
    }

    /// Resolves a press against the earliest matching note in the column.
    pub fn press(&mut self, column: usize, time_ms: f64) -> InputOutcome {
        if self.phase != Phase::Playing || self.modifiers.auto_play {
            return InputOutcome::Ignored;
        }

        let search_limit = time_ms + self.hit_window.search_ms;
        let mut found = None;
        for (i, note) in self.chart.notes().iter().enumerate().skip(self.head_index) {
            if note.time >= search_limit {
                break;
            }
            if note.column == column
                && self.note_states[i] == NoteState::Pending
                && self.hit_window.accepts(note.time, time_ms)
            {
                found = Some(i);
                break;
            }
        }

        let Some(index) = found else {
            return InputOutcome::Ignored;
        };

        let diff = time_ms - self.chart.notes()[index].time;
        let judgement = self.hit_window.judge(diff);
        log::debug!("ENGINE: {:?} on column {} ({:+.1}ms)", judgement, column, diff);
        self.apply_judgement(index, judgement, time_ms);
        InputOutcome::Judged(judgement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::engine::Note;
    use crate::models::modifiers::Modifiers;
    use crate::state::game::tests::chart;
    use crate::state::traits::{Transition, Update};

    fn playing(notes: Vec<Note>, mods: Modifiers) -> GameEngine {
        let mut engine = GameEngine::new(chart(4, notes), mods);
        engine.update(-2000.0);
        assert_eq!(engine.phase(), Phase::Playing);
        engine
    }

    #[test]
    fn tiers_follow_offset() {
        let notes = (0..5).map(|i| Note::tap(1000.0 * (i + 1) as f64, 0)).collect();
        let mut engine = playing(notes, Modifiers::default());
        assert_eq!(engine.press(0, 1000.0), InputOutcome::Judged(Judgement::Marvelous));
        assert_eq!(engine.press(0, 1970.0), InputOutcome::Judged(Judgement::Perfect));
        assert_eq!(engine.press(0, 3060.0), InputOutcome::Judged(Judgement::Great));
        assert_eq!(engine.press(0, 3900.0), InputOutcome::Judged(Judgement::Good));
        assert_eq!(engine.press(0, 5140.0), InputOutcome::Judged(Judgement::Bad));
        assert_eq!(engine.combo(), 5);
        assert_eq!(engine.score(), 320 + 300 * 2 + 200 * 3 + 100 * 4 + 50 * 5);
    }

    #[test]
    fn empty_press_is_ignored_without_penalty() {
        let mut engine = playing(vec![Note::tap(1000.0, 0)], Modifiers::default());
        assert_eq!(engine.press(1, 1000.0), InputOutcome::Ignored);
        assert_eq!(engine.press(0, 700.0), InputOutcome::Ignored);
        assert_eq!(engine.combo(), 0);
        assert_eq!(engine.health(), 100.0);
        assert_eq!(engine.processed_count(), 0);
    }

    #[test]
    fn earliest_note_in_column_wins() {
        let notes = vec![Note::tap(1000.0, 0), Note::tap(1100.0, 0)];
        let mut engine = playing(notes, Modifiers::default());
        assert_eq!(engine.press(0, 1090.0), InputOutcome::Judged(Judgement::Good));
        assert_eq!(engine.note_states()[0], NoteState::Hit(Judgement::Good));
        assert_eq!(engine.note_states()[1], NoteState::Pending);
        assert_eq!(engine.press(0, 1100.0), InputOutcome::Judged(Judgement::Marvelous));
    }

    #[test]
    fn each_note_resolves_once() {
        let mut engine = playing(vec![Note::tap(1000.0, 0)], Modifiers::default());
        assert!(matches!(engine.press(0, 1000.0), InputOutcome::Judged(_)));
        assert_eq!(engine.press(0, 1001.0), InputOutcome::Ignored);
        assert_eq!(engine.processed_count(), 1);
    }

    #[test]
    fn sudden_death_fails_on_first_miss() {
        let mods = Modifiers {
            sudden_death: true,
            ..Default::default()
        };
        let notes = vec![Note::tap(1000.0, 0), Note::tap(1000.0, 1)];
        let mut engine = playing(notes, mods);
        assert_eq!(engine.update(1200.0), Transition::Failed);
        assert_eq!(engine.phase(), Phase::Failed);
        assert_eq!(engine.processed_count(), 1);
        assert_eq!(engine.press(1, 1200.0), InputOutcome::Ignored);
    }

    #[test]
    fn perfect_mod_restarts_below_perfect() {
        let mods = Modifiers {
            perfect: true,
            ..Default::default()
        };
        let notes = vec![Note::tap(1000.0, 0), Note::tap(2000.0, 0)];
        let mut engine = playing(notes, mods);
        engine.queue_press(0, 1030.0);
        assert_eq!(engine.update(1030.0), Transition::None);
        engine.queue_press(0, 2060.0);
        assert_eq!(engine.update(2060.0), Transition::Restart);
    }

    #[test]
    fn queued_inputs_apply_before_sweep() {
        let mut engine = playing(vec![Note::tap(1000.0, 0)], Modifiers::default());
        engine.queue_press(0, 1100.0);
        engine.update(1300.0);
        assert_eq!(engine.note_states()[0], NoteState::Hit(Judgement::Good));
    }

    #[test]
    fn player_presses_do_nothing_under_auto_play() {
        let mods = Modifiers {
            auto_play: true,
            ..Default::default()
        };
        let mut engine = playing(vec![Note::tap(1000.0, 0)], mods);
        assert_eq!(engine.press(0, 900.0), InputOutcome::Ignored);
        engine.queue_press(0, 900.0);
        assert!(!engine.held_columns()[0]);
        engine.update(900.0);
        assert_eq!(engine.note_states()[0], NoteState::Pending);

        engine.update(1000.0);
        assert_eq!(engine.note_states()[0], NoteState::Hit(Judgement::Marvelous));
        assert_eq!(engine.accuracy(), 100.0);
    }

    #[test]
    fn release_clears_held_even_when_paused() {
        let mut engine = playing(vec![Note::tap(1000.0, 0)], Modifiers::default());
        engine.queue_press(3, 10.0);
        assert!(engine.held_columns()[3]);
        engine.pause(15.0);
        engine.queue_release(3, 20.0);
        assert!(!engine.held_columns()[3]);
    }
}
