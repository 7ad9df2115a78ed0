//! Traits for state management.

/// Outcome of a frame update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// Stay in the current phase.
    None,
    /// The run failed this frame.
    Failed,
    /// The chart ended this frame.
    Finished,
    /// The run asked to be restarted from the top.
    Restart,
}

/// Trait for creating read-only snapshots.
pub trait Snapshot {
    /// The snapshot type produced.
    type Output;

    fn create_snapshot(&self) -> Self::Output;
}

/// Trait for per-frame updates driven by the audio clock.
pub trait Update {
    /// Advances the state to `now_ms` of clock time.
    fn update(&mut self, now_ms: f64) -> Transition;
}
