//! Final score summary handed to the host.

use crate::models::stats::HitStats;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScoreSummary {
    pub score: u64,
    pub max_combo: u32,
    pub accuracy: f64,
    pub hit_counts: HitStats,
    /// True when the run ended by reaching the end of the chart.
    pub completed: bool,
}

impl ScoreSummary {
    /// Summary for an aborted run: counts are kept, everything else is zero.
    pub fn aborted(hit_counts: HitStats) -> Self {
        Self {
            score: 0,
            max_combo: 0,
            accuracy: 0.0,
            hit_counts,
            completed: false,
        }
    }
}
