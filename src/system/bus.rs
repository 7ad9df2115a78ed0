//! Shared channel infrastructure between the host and a session.
//!
//! The `SystemBus` connects host threads (window, input, HUD) to the session
//! running on the logic side, using lock-free channels.

use crate::core::input::actions::GameAction;
use crate::shared::snapshot::GameplaySnapshot;
use crate::state::result::ScoreSummary;
use crossbeam_channel::{Receiver, Sender, bounded, unbounded};

/// Aggregates the cross-thread communication channels.
///
/// - Host → Session: gameplay actions, stamped with clock time when drained
/// - Session → Host: HUD snapshots, one per frame
/// - Session → Host: the final score summary
#[derive(Clone)]
pub struct SystemBus {
    pub action_tx: Sender<GameAction>,
    pub action_rx: Receiver<GameAction>,

    /// Session → Render: gameplay snapshots.
    pub render_tx: Sender<GameplaySnapshot>,
    pub render_rx: Receiver<GameplaySnapshot>,

    pub summary_tx: Sender<ScoreSummary>,
    pub summary_rx: Receiver<ScoreSummary>,
}

impl SystemBus {
    pub fn new() -> Self {
        let (action_tx, action_rx) = unbounded();

        // Bounded render channel: max 2 frames queued to limit latency
        let (render_tx, render_rx) = bounded(2);

        let (summary_tx, summary_rx) = unbounded();

        Self {
            action_tx,
            action_rx,
            render_tx,
            render_rx,
            summary_tx,
            summary_rx,
        }
    }
}

impl Default for SystemBus {
    fn default() -> Self {
        Self::new()
    }
}
