//! Hit window timing thresholds.
//!
//! Windows are fixed and do not scale with the chart's overall difficulty.

use crate::models::stats::Judgement;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HitWindow {
    pub marvelous_ms: f64,
    pub perfect_ms: f64,
    pub great_ms: f64,
    pub good_ms: f64,
    /// Presses further than this from a note never match it.
    pub search_ms: f64,
    /// A note unresolved this long after its time becomes a miss.
    pub miss_ms: f64,
}

impl HitWindow {
    pub fn new() -> Self {
        Self {
            marvelous_ms: 20.0,
            perfect_ms: 45.0,
            great_ms: 80.0,
            good_ms: 120.0,
            search_ms: 200.0,
            miss_ms: 150.0,
        }
    }

    /// Whether a press at `input_ms` may resolve a note scheduled at `note_ms`.
    ///
    /// A note whose miss deadline has been reached can no longer be hit; the
    /// miss sweep owns it from then on.
    pub fn accepts(&self, note_ms: f64, input_ms: f64) -> bool {
        (note_ms - input_ms).abs() < self.search_ms && input_ms < note_ms + self.miss_ms
    }

    /// Whether a note is past its miss deadline at `now_ms`.
    pub fn is_missed(&self, note_ms: f64, now_ms: f64) -> bool {
        note_ms + self.miss_ms < now_ms
    }

    /// Classifies a matched press by its absolute offset.
    pub fn judge(&self, timing_diff_ms: f64) -> Judgement {
        let abs_diff = timing_diff_ms.abs();

        if abs_diff < self.marvelous_ms {
            Judgement::Marvelous
        } else if abs_diff < self.perfect_ms {
            Judgement::Perfect
        } else if abs_diff < self.great_ms {
            Judgement::Great
        } else if abs_diff < self.good_ms {
            Judgement::Good
        } else {
            Judgement::Bad
        }
    }
}

impl Default for HitWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_use_strict_thresholds() {
        let w = HitWindow::new();
        assert_eq!(w.judge(0.0), Judgement::Marvelous);
        assert_eq!(w.judge(-19.9), Judgement::Marvelous);
        assert_eq!(w.judge(20.0), Judgement::Perfect);
        assert_eq!(w.judge(44.0), Judgement::Perfect);
        assert_eq!(w.judge(-45.0), Judgement::Great);
        assert_eq!(w.judge(80.0), Judgement::Good);
        assert_eq!(w.judge(119.0), Judgement::Good);
        assert_eq!(w.judge(120.0), Judgement::Bad);
        assert_eq!(w.judge(-199.0), Judgement::Bad);
    }

    #[test]
    fn early_presses_reach_further_than_late_ones() {
        let w = HitWindow::new();
        assert!(w.accepts(1000.0, 810.0));
        assert!(!w.accepts(1000.0, 800.0));
        assert!(w.accepts(1000.0, 1140.0));
        assert!(!w.accepts(1000.0, 1150.0));
    }

    #[test]
    fn miss_deadline_is_exclusive() {
        let w = HitWindow::new();
        assert!(!w.is_missed(1000.0, 1150.0));
        assert!(w.is_missed(1000.0, 1150.5));
    }
}
