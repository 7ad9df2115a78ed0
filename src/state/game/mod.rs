//! Judgement engine.
//!
//! The `GameEngine` owns the run state of one play session:
//! - Note resolution (hits, misses, auto-play)
//! - Score, combo and health
//! - Phase transitions (intro, pause, fail, finish)
//!
//! It never reads a clock itself. Every frame the session latches the audio
//! clock once and hands that time to `update`; inputs carry their own clock
//! timestamps.

mod health;
mod input;
mod notes;
mod popups;
mod snapshot;

pub use health::{drain_per_second, hit_health_delta, miss_health_delta};
pub use input::InputOutcome;
pub use popups::{Popup, PopupQueue};

use crate::models::engine::{
    Chart, FINISH_GRACE_MS, HitWindow, LEAD_IN_MS, MAX_HEALTH, START_OFFSET_SECONDS,
    SKIP_MIN_FIRST_NOTE_MS, SKIP_PRE_ROLL_MS,
};
use crate::models::modifiers::Modifiers;
use crate::models::stats::{HitStats, Judgement};
use crate::state::result::ScoreSummary;
use crate::state::traits::{Transition, Update};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Introducing,
    Playing,
    Paused,
    Failed,
    Finished,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::Failed | Phase::Finished)
    }
}

/// Resolution state of one note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteState {
    Pending,
    Hit(Judgement),
    Missed,
}

impl NoteState {
    pub fn is_resolved(self) -> bool {
        self != NoteState::Pending
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct QueuedInput {
    pub column: usize,
    pub time_ms: f64,
    pub pressed: bool,
}

pub struct GameEngine {
    chart: Arc<Chart>,
    modifiers: Modifiers,
    hit_window: HitWindow,
    /// Passive drain rate, after the override modifier. Judgement deltas
    /// always use the chart's own rate.
    passive_drain_rate: f64,

    note_states: Vec<NoteState>,
    /// Index of the first unresolved note.
    head_index: usize,
    processed: usize,

    score: u64,
    combo: u32,
    max_combo: u32,
    health: f64,
    hit_stats: HitStats,
    last_judgement: Option<Judgement>,

    /// Held logical columns.
    held: Vec<bool>,
    pending_inputs: Vec<QueuedInput>,

    phase: Phase,
    /// Phase restored by `resume`.
    resume_phase: Phase,
    /// Clock time of the last processed frame.
    now: f64,
    restart_requested: bool,

    popups: PopupQueue,
}

impl GameEngine {
    pub fn new(chart: Arc<Chart>, modifiers: Modifiers) -> Self {
        let lanes = chart.lane_count();
        let notes = chart.notes().len();
        let passive_drain_rate = modifiers.effective_drain_rate(chart.drain_rate);

        Self {
            chart,
            modifiers,
            hit_window: HitWindow::new(),
            passive_drain_rate,
            note_states: vec![NoteState::Pending; notes],
            head_index: 0,
            processed: 0,
            score: 0,
            combo: 0,
            max_combo: 0,
            health: MAX_HEALTH,
            hit_stats: HitStats::new(),
            last_judgement: None,
            held: vec![false; lanes],
            pending_inputs: Vec::new(),
            phase: Phase::Introducing,
            resume_phase: Phase::Introducing,
            now: START_OFFSET_SECONDS * 1000.0,
            restart_requested: false,
            popups: PopupQueue::new(),
        }
    }

    pub fn chart(&self) -> &Chart {
        &self.chart
    }

    pub fn modifiers(&self) -> &Modifiers {
        &self.modifiers
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn now(&self) -> f64 {
        self.now
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn max_combo(&self) -> u32 {
        self.max_combo
    }

    pub fn health(&self) -> f64 {
        self.health
    }

    pub fn hit_stats(&self) -> &HitStats {
        &self.hit_stats
    }

    pub fn processed_count(&self) -> usize {
        self.processed
    }

    pub fn accuracy(&self) -> f64 {
        self.hit_stats.calculate_accuracy()
    }

    pub fn note_states(&self) -> &[NoteState] {
        &self.note_states
    }

    pub fn held_columns(&self) -> &[bool] {
        &self.held
    }

    pub fn popups(&self) -> &PopupQueue {
        &self.popups
    }

    /// Borrows what the renderer needs; only the popup list is writable.
    pub fn split_for_render(&mut self) -> (&Chart, &[NoteState], &[bool], &mut PopupQueue) {
        (&self.chart, &self.note_states, &self.held, &mut self.popups)
    }

    /// Effective end of the chart: the latest release time.
    pub fn song_end_time(&self) -> f64 {
        self.chart.end_time()
    }

    /// Skip is offered only during a long intro.
    pub fn can_skip(&self) -> bool {
        self.phase == Phase::Introducing && self.chart.first_note_time() > SKIP_MIN_FIRST_NOTE_MS
    }

    /// Clock position (seconds) a skip jumps to.
    pub fn skip_target_seconds(&self) -> f64 {
        (self.chart.first_note_time() - SKIP_PRE_ROLL_MS) / 1000.0
    }

    pub fn progress(&self) -> f64 {
        let end = self.song_end_time();
        if end <= 0.0 {
            return 1.0;
        }
        (self.now / end).clamp(0.0, 1.0)
    }

    /// Freezes the run at clock time `now_ms`. Inputs that arrived before
    /// the pause are judged first. Returns false if there was nothing to pause.
    pub fn pause(&mut self, now_ms: f64) -> bool {
        if !matches!(self.phase, Phase::Introducing | Phase::Playing) {
            return false;
        }
        if self.phase == Phase::Playing {
            self.apply_queued_inputs(now_ms);
            if self.halted() {
                return false;
            }
        }
        self.resume_phase = self.phase;
        self.phase = Phase::Paused;
        self.pending_inputs.clear();
        log::info!("ENGINE: Paused at {:.0}ms", now_ms);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != Phase::Paused {
            return false;
        }
        self.phase = self.resume_phase;
        log::info!("ENGINE: Resumed at {:.0}ms", self.now);
        true
    }

    /// Summary of a run that reached the end of the chart.
    pub fn summary(&self) -> ScoreSummary {
        ScoreSummary {
            score: self.score,
            max_combo: self.max_combo,
            accuracy: self.accuracy(),
            hit_counts: self.hit_stats.clone(),
            completed: self.phase == Phase::Finished,
        }
    }

    fn fail(&mut self, reason: &str) {
        self.phase = Phase::Failed;
        self.pending_inputs.clear();
        log::info!("ENGINE: Failed at {:.0}ms ({})", self.now, reason);
    }

    /// Whether the frame should stop processing.
    fn halted(&self) -> bool {
        self.phase.is_terminal() || self.restart_requested
    }
}

impl Update for GameEngine {
    /// One frame: drain, queued inputs, auto-play, miss sweep, finish check.
    fn update(&mut self, now_ms: f64) -> Transition {
        match self.phase {
            Phase::Paused | Phase::Failed | Phase::Finished => return Transition::None,
            Phase::Introducing => {
                if now_ms < self.chart.first_note_time() - LEAD_IN_MS {
                    self.now = now_ms;
                    self.pending_inputs.clear();
                    return Transition::None;
                }
                self.phase = Phase::Playing;
                log::info!("ENGINE: Playing at {:.0}ms", now_ms);
            }
            Phase::Playing => {}
        }

        let previous = self.now;
        self.now = now_ms;

        self.drain_health(previous, now_ms);
        if !self.halted() {
            self.apply_queued_inputs(now_ms);
        }
        if !self.halted() && self.modifiers.auto_play {
            self.auto_play(now_ms);
        }
        if !self.halted() {
            self.sweep_misses(now_ms);
        }

        if self.restart_requested {
            self.restart_requested = false;
            log::info!("ENGINE: Restart requested at {:.0}ms", now_ms);
            return Transition::Restart;
        }
        if self.phase == Phase::Failed {
            return Transition::Failed;
        }

        if now_ms > self.song_end_time() + FINISH_GRACE_MS {
            self.phase = Phase::Finished;
            log::info!(
                "ENGINE: Finished at {:.0}ms, score {}, accuracy {:.2}%",
                now_ms,
                self.score,
                self.accuracy()
            );
            return Transition::Finished;
        }

        Transition::None
    }
}
