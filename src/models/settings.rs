//! Persistent player settings.
//!
//! Stored as TOML. Missing fields fall back to their defaults and a file that
//! cannot be read or parsed yields `SettingsState::default()`.

use crate::error::GameError;
use crate::models::modifiers::Modifiers;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// Shape used to draw notes when no skin image is bound.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NoteShape {
    #[default]
    Circle,
    Bar,
    Arrow,
    Diamond,
    DiamondSoft,
    Line,
}

/// Text style for judgement popups.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JudgementSet {
    #[default]
    Default,
    Flat,
    Neon,
}

/// User color overrides layered on top of the active skin preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkinOverrides {
    /// Global lane palette as `#rrggbb` strings.
    pub mania_colors: Option<Vec<String>>,
    /// Palettes keyed by `"<n>K"`.
    pub per_key_colors: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Keybinds {
    /// Lane keys keyed by `"<n>K"`.
    pub mania: HashMap<String, Vec<String>>,
    pub pause: String,
    pub restart: String,
    pub skip: String,
}

impl Keybinds {
    /// Lane key names for a key count, if configured.
    pub fn lanes(&self, lane_count: usize) -> Option<&[String]> {
        self.mania
            .get(&format!("{}K", lane_count))
            .map(|keys| keys.as_slice())
    }
}

impl Default for Keybinds {
    fn default() -> Self {
        let layouts: [&[&str]; 10] = [
            &["Space"],
            &["KeyF", "KeyJ"],
            &["KeyF", "Space", "KeyJ"],
            &["KeyD", "KeyF", "KeyJ", "KeyK"],
            &["KeyD", "KeyF", "Space", "KeyJ", "KeyK"],
            &["KeyS", "KeyD", "KeyF", "KeyJ", "KeyK", "KeyL"],
            &["KeyS", "KeyD", "KeyF", "Space", "KeyJ", "KeyK", "KeyL"],
            &["KeyA", "KeyS", "KeyD", "KeyF", "KeyJ", "KeyK", "KeyL", "Semicolon"],
            &["KeyA", "KeyS", "KeyD", "KeyF", "Space", "KeyJ", "KeyK", "KeyL", "Semicolon"],
            &["KeyA", "KeyS", "KeyD", "KeyF", "KeyV", "KeyN", "KeyJ", "KeyK", "KeyL", "Semicolon"],
        ];

        let mania = layouts
            .iter()
            .enumerate()
            .map(|(i, keys)| {
                (
                    format!("{}K", i + 1),
                    keys.iter().map(|k| k.to_string()).collect(),
                )
            })
            .collect();

        Self {
            mania,
            pause: "Escape".to_string(),
            restart: "Backquote".to_string(),
            skip: "Space".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsState {
    pub scroll_speed: f64,
    pub use_beatmap_scroll_speed: bool,
    pub lane_width: f32,
    /// 0 keeps the background as is, 1 hides it.
    pub background_dim: f32,
    pub active_skin: String,
    pub note_style: NoteShape,
    pub judgement_set: JudgementSet,
    pub skin_overrides: SkinOverrides,
    pub volume: f32,
    pub touch_enabled: bool,
    pub modifiers: Modifiers,
    pub keybinds: Keybinds,
}

impl Default for SettingsState {
    fn default() -> Self {
        Self {
            scroll_speed: 22.0,
            use_beatmap_scroll_speed: false,
            lane_width: 70.0,
            background_dim: 0.5,
            active_skin: "classic".to_string(),
            note_style: NoteShape::Circle,
            judgement_set: JudgementSet::Default,
            skin_overrides: SkinOverrides::default(),
            volume: 0.5,
            touch_enabled: true,
            modifiers: Modifiers::default(),
            keybinds: Keybinds::default(),
        }
    }
}

impl SettingsState {
    /// Loads settings, falling back to defaults on any failure.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    log::info!("SETTINGS: Loaded {:?}", path);
                    settings
                }
                Err(e) => {
                    log::warn!("SETTINGS: Failed to parse {:?}: {}, using defaults", path, e);
                    Self::default()
                }
            },
            Err(e) => {
                log::warn!("SETTINGS: Failed to read {:?}: {}, using defaults", path, e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), GameError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| GameError::Io(format!("Failed to serialize settings: {}", e)))?;
        fs::write(path, content)?;
        log::info!("SETTINGS: Saved {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_one_to_ten_keys() {
        let binds = Keybinds::default();
        for lanes in 1..=10 {
            assert_eq!(binds.lanes(lanes).map(|k| k.len()), Some(lanes));
        }
        assert_eq!(binds.lanes(4).unwrap()[0], "KeyD");
        assert_eq!(binds.lanes(7).unwrap()[3], "Space");
        assert!(binds.lanes(11).is_none());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let settings: SettingsState = toml::from_str(
            r#"
            scroll_speed = 30.0
            note_style = "diamond-soft"

            [modifiers]
            mirror = true

            [keybinds.mania]
            4K = ["KeyZ", "KeyX", "Period", "Slash"]
            "#,
        )
        .unwrap();

        assert_eq!(settings.scroll_speed, 30.0);
        assert_eq!(settings.note_style, NoteShape::DiamondSoft);
        assert!(settings.modifiers.mirror);
        assert_eq!(settings.lane_width, 70.0);
        assert_eq!(settings.keybinds.pause, "Escape");
        assert_eq!(settings.keybinds.lanes(4).unwrap()[0], "KeyZ");
    }

    #[test]
    fn save_then_load_preserves_settings() {
        let path = std::env::temp_dir().join(format!("rvsrg-settings-{}.toml", std::process::id()));
        let mut settings = SettingsState::default();
        settings.background_dim = 0.8;
        settings.judgement_set = JudgementSet::Neon;
        settings.save(&path).unwrap();

        let loaded = SettingsState::load(&path);
        let _ = fs::remove_file(&path);
        assert_eq!(loaded, settings);
    }

    #[test]
    fn unreadable_file_falls_back_to_defaults() {
        let loaded = SettingsState::load(Path::new("/definitely/not/here.toml"));
        assert_eq!(loaded, SettingsState::default());
    }
}
