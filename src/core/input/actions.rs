//! Canonical gameplay actions shared between input layers.

/// Action delivered to a session, from keys, touch or a host thread.
///
/// Lane indices are visual: the session maps them to logical columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameAction {
    Hit { lane: usize },
    Release { lane: usize },
    TogglePause,
    SkipIntro,
    Restart,
    Quit,
}
