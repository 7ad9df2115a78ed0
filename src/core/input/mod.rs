//! Key, touch and hold-to-restart handling for a running session.

pub mod actions;
pub mod bindings;

use self::actions::GameAction;
use self::bindings::KeyBindings;
use crate::models::engine::RESTART_HOLD_MS;
use crate::models::settings::SettingsState;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use winit::keyboard::KeyCode;

/// Visual lane under a touch at horizontal fraction `x` of the surface.
pub fn touch_lane(x: f64, lane_count: usize) -> Option<usize> {
    if !(0.0..1.0).contains(&x) || lane_count == 0 {
        return None;
    }
    Some(((x * lane_count as f64).floor() as usize).min(lane_count - 1))
}

/// Wall-clock timer for the restart key.
#[derive(Debug, Clone, Default)]
pub struct RestartHold {
    started: Option<Instant>,
}

impl RestartHold {
    pub fn press(&mut self, now: Instant) {
        if self.started.is_none() {
            self.started = Some(now);
        }
    }

    pub fn release(&mut self) {
        self.started = None;
    }

    pub fn is_holding(&self) -> bool {
        self.started.is_some()
    }

    /// 0 when idle, 1 once the hold has lasted long enough.
    pub fn progress(&self, now: Instant) -> f32 {
        let Some(started) = self.started else {
            return 0.0;
        };
        let held = now.saturating_duration_since(started);
        (held.as_secs_f32() / Duration::from_millis(RESTART_HOLD_MS).as_secs_f32()).min(1.0)
    }

    pub fn is_complete(&self, now: Instant) -> bool {
        self.started
            .is_some_and(|s| now.saturating_duration_since(s) >= Duration::from_millis(RESTART_HOLD_MS))
    }
}

pub struct InputManager {
    bindings: KeyBindings,
    lane_count: usize,
    touch_enabled: bool,
    /// Keys currently down, used to drop OS key repeats.
    down: HashSet<KeyCode>,
    restart_hold: RestartHold,
}

impl InputManager {
    pub fn new(settings: &SettingsState, lane_count: usize) -> Self {
        Self {
            bindings: KeyBindings::from_settings(&settings.keybinds, lane_count),
            lane_count,
            touch_enabled: settings.touch_enabled,
            down: HashSet::new(),
            restart_hold: RestartHold::default(),
        }
    }

    pub fn bindings(&self) -> &KeyBindings {
        &self.bindings
    }

    /// Resolves a key press. The skip key only means skip while one is offered.
    pub fn key_down(&mut self, key: KeyCode, skip_offered: bool, now: Instant) -> Option<GameAction> {
        if !self.down.insert(key) {
            return None;
        }

        if skip_offered && self.bindings.skip == Some(key) {
            return Some(GameAction::SkipIntro);
        }
        if self.bindings.pause == Some(key) {
            return Some(GameAction::TogglePause);
        }
        if self.bindings.restart == Some(key) {
            self.restart_hold.press(now);
            return None;
        }
        self.bindings.lane_of(key).map(|lane| GameAction::Hit { lane })
    }

    pub fn key_up(&mut self, key: KeyCode) -> Option<GameAction> {
        self.down.remove(&key);
        if self.bindings.restart == Some(key) {
            self.restart_hold.release();
            return None;
        }
        self.bindings.lane_of(key).map(|lane| GameAction::Release { lane })
    }

    /// Lane press for a touch, if touch input is enabled.
    pub fn touch(&self, x: f64) -> Option<GameAction> {
        if !self.touch_enabled {
            return None;
        }
        touch_lane(x, self.lane_count).map(|lane| GameAction::Hit { lane })
    }

    pub fn restart_hold(&self) -> &RestartHold {
        &self.restart_hold
    }

    /// Returns true once when a full hold completes, then resets the hold.
    pub fn poll_restart(&mut self, now: Instant) -> bool {
        if self.restart_hold.is_complete(now) {
            self.restart_hold.release();
            return true;
        }
        false
    }

    /// Forgets held keys, e.g. after a restart.
    pub fn reset(&mut self) {
        self.down.clear();
        self.restart_hold.release();
    }
}
