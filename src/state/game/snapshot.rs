use super::GameEngine;
use crate::shared::snapshot::GameplaySnapshot;
use crate::state::traits::Snapshot;

impl Snapshot for GameEngine {
    type Output = GameplaySnapshot;

    fn create_snapshot(&self) -> GameplaySnapshot {
        GameplaySnapshot {
            audio_time: self.now,
            phase: self.phase,
            score: self.score,
            combo: self.combo,
            max_combo: self.max_combo,
            accuracy: self.accuracy(),
            health: self.health,
            hit_stats: self.hit_stats.clone(),
            processed: self.processed,
            total_notes: self.chart.notes().len(),
            last_judgement: self.last_judgement,
            progress: self.progress(),
            can_skip: self.can_skip(),
            restart_progress: 0.0,
            held_columns: self.held.clone(),
        }
    }
}
