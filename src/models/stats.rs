//! Hit statistics and judgement types.
//!
//! This module defines the judgement ladder used for scoring,
//! including accuracy calculation and hit statistics tracking.

use serde::{Deserialize, Serialize};

/// RGBA colors for each judgement type.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JudgementColors {
    pub marvelous: [f32; 4],
    pub perfect: [f32; 4],
    pub great: [f32; 4],
    pub good: [f32; 4],
    pub bad: [f32; 4],
    pub miss: [f32; 4],
}

impl JudgementColors {
    /// Creates default judgement colors.
    pub fn new() -> Self {
        Self {
            marvelous: [1.0, 1.0, 1.0, 1.0],   // White
            perfect: [0.98, 0.75, 0.14, 1.0],  // Amber
            great: [0.29, 0.87, 0.5, 1.0],     // Green
            good: [0.38, 0.65, 0.98, 1.0],     // Blue
            bad: [0.66, 0.33, 0.97, 1.0],      // Purple
            miss: [0.94, 0.27, 0.27, 1.0],     // Red
        }
    }

    pub fn get(&self, judgement: Judgement) -> [f32; 4] {
        match judgement {
            Judgement::Marvelous => self.marvelous,
            Judgement::Perfect => self.perfect,
            Judgement::Great => self.great,
            Judgement::Good => self.good,
            Judgement::Bad => self.bad,
            Judgement::Miss => self.miss,
        }
    }

    pub fn set(&mut self, judgement: Judgement, color: [f32; 4]) {
        match judgement {
            Judgement::Marvelous => self.marvelous = color,
            Judgement::Perfect => self.perfect = color,
            Judgement::Great => self.great = color,
            Judgement::Good => self.good = color,
            Judgement::Bad => self.bad = color,
            Judgement::Miss => self.miss = color,
        }
    }
}

impl Default for JudgementColors {
    fn default() -> Self {
        Self::new()
    }
}

/// Hit judgement types from best to worst.
///
/// Ordering follows severity: `Marvelous > Perfect > ... > Miss`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Judgement {
    /// Tightest timing tier.
    Marvelous,
    /// Excellent timing.
    Perfect,
    /// Good timing.
    Great,
    /// Acceptable timing.
    Good,
    /// Poor timing.
    Bad,
    /// Missed note.
    Miss,
}

impl Judgement {
    /// All judgements, best first.
    pub const ALL: [Judgement; 6] = [
        Judgement::Marvelous,
        Judgement::Perfect,
        Judgement::Great,
        Judgement::Good,
        Judgement::Bad,
        Judgement::Miss,
    ];

    /// Maximum weight a single note can award.
    pub const MAX_WEIGHT: u32 = 320;

    /// Score weight of this judgement.
    pub fn weight(self) -> u32 {
        match self {
            Judgement::Marvelous => 320,
            Judgement::Perfect => 300,
            Judgement::Great => 200,
            Judgement::Good => 100,
            Judgement::Bad => 50,
            Judgement::Miss => 0,
        }
    }

    /// Health gained before drain-rate and modifier scaling.
    pub fn base_health_gain(self) -> f64 {
        match self {
            Judgement::Marvelous => 5.0,
            Judgement::Perfect => 4.0,
            Judgement::Great => 2.0,
            Judgement::Good | Judgement::Bad => 1.0,
            Judgement::Miss => 0.0,
        }
    }

    fn rank(self) -> u8 {
        match self {
            Judgement::Marvelous => 5,
            Judgement::Perfect => 4,
            Judgement::Great => 3,
            Judgement::Good => 2,
            Judgement::Bad => 1,
            Judgement::Miss => 0,
        }
    }

    pub fn is_miss(self) -> bool {
        self == Judgement::Miss
    }

    /// Upper-case label used by text popups.
    pub fn label(self) -> &'static str {
        match self {
            Judgement::Marvelous => "MARVELOUS",
            Judgement::Perfect => "PERFECT",
            Judgement::Great => "GREAT",
            Judgement::Good => "GOOD",
            Judgement::Bad => "BAD",
            Judgement::Miss => "MISS",
        }
    }
}

impl PartialOrd for Judgement {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Judgement {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Accumulated hit statistics for a play session.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitStats {
    pub marvelous: u32,
    pub perfect: u32,
    pub great: u32,
    pub good: u32,
    pub bad: u32,
    pub miss: u32,
}

impl HitStats {
    /// Creates empty hit statistics.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, judgement: Judgement) {
        match judgement {
            Judgement::Marvelous => self.marvelous += 1,
            Judgement::Perfect => self.perfect += 1,
            Judgement::Great => self.great += 1,
            Judgement::Good => self.good += 1,
            Judgement::Bad => self.bad += 1,
            Judgement::Miss => self.miss += 1,
        }
    }

    pub fn count(&self, judgement: Judgement) -> u32 {
        match judgement {
            Judgement::Marvelous => self.marvelous,
            Judgement::Perfect => self.perfect,
            Judgement::Great => self.great,
            Judgement::Good => self.good,
            Judgement::Bad => self.bad,
            Judgement::Miss => self.miss,
        }
    }

    /// Number of resolved notes (hits and misses).
    pub fn total(&self) -> u32 {
        Judgement::ALL.iter().map(|&j| self.count(j)).sum()
    }

    /// Calculates accuracy percentage (0-100).
    ///
    /// Accuracy is the sum of judgement weights over the maximum weight
    /// (`320` per resolved note). With nothing resolved yet it reads 100.
    pub fn calculate_accuracy(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            return 100.0;
        }

        let earned: u64 = Judgement::ALL
            .iter()
            .map(|&j| u64::from(self.count(j)) * u64::from(j.weight()))
            .sum();

        (earned as f64 / (f64::from(total) * f64::from(Judgement::MAX_WEIGHT))) * 100.0
    }

    /// Counts keyed by judgement, best first.
    pub fn as_pairs(&self) -> [(Judgement, u32); 6] {
        Judgement::ALL.map(|j| (j, self.count(j)))
    }
}
