//! Read-only HUD snapshots.
//!
//! Snapshots are immutable captures of run state published once per frame.
//! Hosts display them; nothing flows back into the engine through them.

use crate::models::stats::{HitStats, Judgement};
use crate::state::game::Phase;

#[derive(Clone, Debug, PartialEq)]
pub struct GameplaySnapshot {
    /// Clock time the frame was computed at, in milliseconds.
    pub audio_time: f64,
    pub phase: Phase,
    pub score: u64,
    pub combo: u32,
    pub max_combo: u32,
    pub accuracy: f64,
    pub health: f64,
    pub hit_stats: HitStats,
    /// Notes resolved so far.
    pub processed: usize,
    pub total_notes: usize,
    pub last_judgement: Option<Judgement>,
    /// `now / song duration`, clamped to 0..=1.
    pub progress: f64,
    pub can_skip: bool,
    /// Hold-to-restart progress, 0..=1.
    pub restart_progress: f32,
    /// Held state per logical column.
    pub held_columns: Vec<bool>,
}

impl GameplaySnapshot {
    pub fn remaining_notes(&self) -> usize {
        self.total_notes.saturating_sub(self.processed)
    }
}
