//! Transient judgement popups.
//!
//! The engine pushes, the renderer prunes. Ages are measured on the audio
//! clock so popups freeze with the game while paused.

use crate::models::engine::{MAX_POPUPS, POPUP_LIFETIME_MS};
use crate::models::stats::Judgement;
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Popup {
    pub judgement: Judgement,
    /// Logical column of the judged note.
    pub column: usize,
    /// Clock time the popup appeared.
    pub time_ms: f64,
}

impl Popup {
    pub fn age(&self, now_ms: f64) -> f64 {
        (now_ms - self.time_ms).max(0.0)
    }

    /// 1 when fresh, 0 when expired.
    pub fn alpha(&self, now_ms: f64) -> f32 {
        (1.0 - self.age(now_ms) / POPUP_LIFETIME_MS).clamp(0.0, 1.0) as f32
    }

    pub fn is_expired(&self, now_ms: f64) -> bool {
        self.age(now_ms) >= POPUP_LIFETIME_MS
    }
}

#[derive(Debug, Clone, Default)]
pub struct PopupQueue {
    popups: VecDeque<Popup>,
}

impl PopupQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a popup, evicting the oldest beyond the cap.
    pub fn push(&mut self, popup: Popup) {
        self.popups.push_back(popup);
        while self.popups.len() > MAX_POPUPS {
            self.popups.pop_front();
        }
    }

    pub fn prune(&mut self, now_ms: f64) {
        self.popups.retain(|p| !p.is_expired(now_ms));
    }

    pub fn iter(&self) -> impl Iterator<Item = &Popup> {
        self.popups.iter()
    }

    pub fn len(&self) -> usize {
        self.popups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.popups.is_empty()
    }

    pub fn clear(&mut self) {
        self.popups.clear();
    }
}
