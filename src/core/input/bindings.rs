use crate::models::settings::Keybinds;
use winit::keyboard::KeyCode;

/// Physical keys resolved for one key count.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyBindings {
    lanes: Vec<KeyCode>,
    pub pause: Option<KeyCode>,
    pub restart: Option<KeyCode>,
    pub skip: Option<KeyCode>,
}

impl KeyBindings {
    /// Resolves the configured names. Unknown names are skipped with a warning;
    /// a layout with no usable key falls back to the built-in one.
    pub fn from_settings(keybinds: &Keybinds, lane_count: usize) -> Self {
        let mut lanes = keybinds
            .lanes(lane_count)
            .map(parse_all)
            .unwrap_or_default();

        if lanes.len() != lane_count {
            if !lanes.is_empty() {
                log::warn!(
                    "LANES: {}K binding has {} usable keys, using defaults",
                    lane_count,
                    lanes.len()
                );
            }
            lanes = Keybinds::default()
                .lanes(lane_count)
                .map(parse_all)
                .unwrap_or_default();
        }

        Self {
            lanes,
            pause: parse_named(&keybinds.pause),
            restart: parse_named(&keybinds.restart),
            skip: parse_named(&keybinds.skip),
        }
    }

    /// Visual lane bound to `key`.
    pub fn lane_of(&self, key: KeyCode) -> Option<usize> {
        self.lanes.iter().position(|&k| k == key)
    }

    pub fn lane_keys(&self) -> &[KeyCode] {
        &self.lanes
    }
}

fn parse_all(names: &[String]) -> Vec<KeyCode> {
    names.iter().filter_map(|name| parse_named(name)).collect()
}

fn parse_named(name: &str) -> Option<KeyCode> {
    let code = parse_keycode(name);
    if code.is_none() {
        log::warn!("LANES: Unknown key name '{}' in bindings", name);
    }
    code
}

/// Maps a winit `KeyCode` name (`"KeyD"`, `"Space"`, `"Semicolon"`) to the code.
pub fn parse_keycode(s: &str) -> Option<KeyCode> {
    match s {
        "KeyA" => Some(KeyCode::KeyA), "KeyB" => Some(KeyCode::KeyB), "KeyC" => Some(KeyCode::KeyC),
        "KeyD" => Some(KeyCode::KeyD), "KeyE" => Some(KeyCode::KeyE), "KeyF" => Some(KeyCode::KeyF),
        "KeyG" => Some(KeyCode::KeyG), "KeyH" => Some(KeyCode::KeyH), "KeyI" => Some(KeyCode::KeyI),
        "KeyJ" => Some(KeyCode::KeyJ), "KeyK" => Some(KeyCode::KeyK), "KeyL" => Some(KeyCode::KeyL),
        "KeyM" => Some(KeyCode::KeyM), "KeyN" => Some(KeyCode::KeyN), "KeyO" => Some(KeyCode::KeyO),
        "KeyP" => Some(KeyCode::KeyP), "KeyQ" => Some(KeyCode::KeyQ), "KeyR" => Some(KeyCode::KeyR),
        "KeyS" => Some(KeyCode::KeyS), "KeyT" => Some(KeyCode::KeyT), "KeyU" => Some(KeyCode::KeyU),
        "KeyV" => Some(KeyCode::KeyV), "KeyW" => Some(KeyCode::KeyW), "KeyX" => Some(KeyCode::KeyX),
        "KeyY" => Some(KeyCode::KeyY), "KeyZ" => Some(KeyCode::KeyZ),
        "Digit0" => Some(KeyCode::Digit0), "Digit1" => Some(KeyCode::Digit1), "Digit2" => Some(KeyCode::Digit2),
        "Digit3" => Some(KeyCode::Digit3), "Digit4" => Some(KeyCode::Digit4), "Digit5" => Some(KeyCode::Digit5),
        "Digit6" => Some(KeyCode::Digit6), "Digit7" => Some(KeyCode::Digit7), "Digit8" => Some(KeyCode::Digit8),
        "Digit9" => Some(KeyCode::Digit9),
        "Space" => Some(KeyCode::Space), "Enter" => Some(KeyCode::Enter), "Escape" => Some(KeyCode::Escape),
        "Backspace" => Some(KeyCode::Backspace), "Tab" => Some(KeyCode::Tab),
        "ShiftLeft" => Some(KeyCode::ShiftLeft), "ShiftRight" => Some(KeyCode::ShiftRight),
        "ControlLeft" => Some(KeyCode::ControlLeft), "ControlRight" => Some(KeyCode::ControlRight),
        "AltLeft" => Some(KeyCode::AltLeft), "AltRight" => Some(KeyCode::AltRight),
        "Semicolon" => Some(KeyCode::Semicolon), "Quote" => Some(KeyCode::Quote),
        "Comma" => Some(KeyCode::Comma), "Period" => Some(KeyCode::Period), "Slash" => Some(KeyCode::Slash),
        "Backslash" => Some(KeyCode::Backslash), "BracketLeft" => Some(KeyCode::BracketLeft), "BracketRight" => Some(KeyCode::BracketRight),
        "Minus" => Some(KeyCode::Minus), "Equal" => Some(KeyCode::Equal), "Backquote" => Some(KeyCode::Backquote),
        "ArrowUp" => Some(KeyCode::ArrowUp), "ArrowDown" => Some(KeyCode::ArrowDown),
        "ArrowLeft" => Some(KeyCode::ArrowLeft), "ArrowRight" => Some(KeyCode::ArrowRight),
        "F1" => Some(KeyCode::F1), "F2" => Some(KeyCode::F2), "F3" => Some(KeyCode::F3), "F4" => Some(KeyCode::F4),
        "F5" => Some(KeyCode::F5), "F6" => Some(KeyCode::F6), "F7" => Some(KeyCode::F7), "F8" => Some(KeyCode::F8),
        _ => None,
    }
}
