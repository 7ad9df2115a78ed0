//! Skin presets and palette resolution.
//!
//! A skin is either one of the built-in presets (shape-drawn notes, a lane
//! palette and judgement colors) or a custom bundle of osu!mania images
//! layered on top of the preset colors.

pub mod bundle;
pub mod ini;

pub use bundle::{SkinBundle, SkinImage, image_key};
pub use ini::ManiaIni;

use crate::models::settings::{JudgementSet, NoteShape, SettingsState};
use crate::models::stats::{Judgement, JudgementColors};

/// RGBA color type
pub type Color = [f32; 4];

/// Prefix of `active_skin` values naming a custom bundle.
pub const CUSTOM_SKIN_PREFIX: &str = "custom_";

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SkinPreset {
    pub id: &'static str,
    pub name: &'static str,
    pub shape: NoteShape,
    pub mania_colors: [&'static str; 7],
    /// Marvelous to Miss.
    pub judgement_colors: [&'static str; 6],
}

const CLASSIC_JUDGEMENTS: [&str; 6] = ["#ffffff", "#fbbf24", "#4ade80", "#60a5fa", "#a855f7", "#ef4444"];

pub const SKIN_PRESETS: [SkinPreset; 5] = [
    SkinPreset {
        id: "classic",
        name: "Classic Circles",
        shape: NoteShape::Circle,
        mania_colors: ["#60a5fa", "#ffffff", "#60a5fa", "#f472b6", "#60a5fa", "#ffffff", "#60a5fa"],
        judgement_colors: CLASSIC_JUDGEMENTS,
    },
    SkinPreset {
        id: "bars",
        name: "Classic Bars",
        shape: NoteShape::Bar,
        mania_colors: ["#ffffff", "#60a5fa", "#ffffff", "#f472b6", "#ffffff", "#60a5fa", "#ffffff"],
        judgement_colors: CLASSIC_JUDGEMENTS,
    },
    SkinPreset {
        id: "diamond",
        name: "Neon Diamonds",
        shape: NoteShape::Diamond,
        mania_colors: ["#00ffff", "#ff00ff", "#00ffff", "#ff00ff", "#00ffff", "#ff00ff", "#00ffff"],
        judgement_colors: ["#ffffff", "#00ffff", "#00ff00", "#ffff00", "#ff00ff", "#ff0000"],
    },
    SkinPreset {
        id: "diamond-soft",
        name: "Soft Diamonds",
        shape: NoteShape::DiamondSoft,
        mania_colors: ["#f9a8d4", "#818cf8", "#f9a8d4", "#818cf8", "#f9a8d4", "#818cf8", "#f9a8d4"],
        judgement_colors: ["#fff", "#fcd34d", "#86efac", "#93c5fd", "#c4b5fd", "#fca5a5"],
    },
    SkinPreset {
        id: "arrows",
        name: "Arrows",
        shape: NoteShape::Arrow,
        mania_colors: ["#ef4444", "#3b82f6", "#22c55e", "#eab308", "#ef4444", "#3b82f6", "#22c55e"],
        judgement_colors: CLASSIC_JUDGEMENTS,
    },
];

/// Finds a preset by id, falling back to `classic`.
pub fn find_preset(id: &str) -> &'static SkinPreset {
    SKIN_PRESETS
        .iter()
        .find(|p| p.id == id)
        .unwrap_or(&SKIN_PRESETS[0])
}

/// Selects a preset the way the settings screen does: the preset's note
/// shape becomes the active note style.
pub fn apply_preset(settings: &mut SettingsState, id: &str) {
    let preset = find_preset(id);
    settings.active_skin = preset.id.to_string();
    settings.note_style = preset.shape;
}

/// Name of the custom bundle selected by `active_skin`, if any.
pub fn custom_skin_name(active_skin: &str) -> Option<&str> {
    active_skin.strip_prefix(CUSTOM_SKIN_PREFIX)
}

/// Parses `#rgb` or `#rrggbb` into an opaque color.
pub fn parse_hex_color(hex: &str) -> Option<Color> {
    let digits = hex.trim().strip_prefix('#')?;
    let channel = |s: &str| u8::from_str_radix(s, 16).ok().map(|v| v as f32 / 255.0);

    match digits.len() {
        3 => {
            let mut out = [1.0; 4];
            for (i, c) in digits.char_indices() {
                let pair = format!("{c}{c}");
                out[i] = channel(&pair)?;
            }
            Some(out)
        }
        6 => Some([
            channel(digits.get(0..2)?)?,
            channel(digits.get(2..4)?)?,
            channel(digits.get(4..6)?)?,
            1.0,
        ]),
        _ => None,
    }
}

fn parse_palette(colors: &[String]) -> Vec<Color> {
    colors
        .iter()
        .filter_map(|c| {
            let parsed = parse_hex_color(c);
            if parsed.is_none() {
                log::warn!("SKIN: Ignoring invalid color '{}'", c);
            }
            parsed
        })
        .collect()
}

/// How a note head is drawn.
#[derive(Debug, Clone, PartialEq)]
pub enum NoteDrawStrategy {
    /// A bundle image, drawn lane-wide with its own aspect ratio.
    Image { key: &'static str, height: f32 },
    Shape(NoteShape),
}

/// Everything the renderer needs to color and shape a session.
#[derive(Debug, Clone)]
pub struct ResolvedSkin {
    pub note_shape: NoteShape,
    pub palette: Vec<Color>,
    pub judgement_colors: JudgementColors,
    pub judgement_set: JudgementSet,
    pub bundle: Option<SkinBundle>,
}

impl ResolvedSkin {
    /// Palette priority: per-key-count override, global override, preset.
    pub fn resolve(settings: &SettingsState, lane_count: usize, bundle: Option<SkinBundle>) -> Self {
        let preset = find_preset(&settings.active_skin);
        let overrides = &settings.skin_overrides;

        let mut palette = overrides
            .per_key_colors
            .get(&format!("{}K", lane_count))
            .or(overrides.mania_colors.as_ref())
            .map(|c| parse_palette(c))
            .unwrap_or_default();
        if palette.is_empty() {
            palette = preset.mania_colors.iter().filter_map(|c| parse_hex_color(c)).collect();
        }

        let mut judgement_colors = JudgementColors::new();
        for (j, hex) in Judgement::ALL.iter().zip(preset.judgement_colors.iter()) {
            if let Some(color) = parse_hex_color(hex) {
                judgement_colors.set(*j, color);
            }
        }

        Self {
            note_shape: settings.note_style,
            palette,
            judgement_colors,
            judgement_set: settings.judgement_set,
            bundle,
        }
    }

    /// Color of a logical column.
    pub fn lane_color(&self, logical_column: usize) -> Color {
        if self.palette.is_empty() {
            return [1.0; 4];
        }
        self.palette[logical_column % self.palette.len()]
    }

    pub fn has_bundle(&self) -> bool {
        self.bundle.is_some()
    }

    /// Skin hit line in 480-high coordinates, when a bundle is bound.
    pub fn hit_position(&self) -> Option<f32> {
        self.bundle.as_ref().map(|b| b.ini.hit_position)
    }

    /// Note head strategy for a visual lane. Bundles without a note image
    /// fall back to the configured shape.
    pub fn note_strategy(&self, visual_lane: usize, lane_count: usize, lane_width: f32) -> NoteDrawStrategy {
        if let Some(bundle) = &self.bundle {
            let key = note_image_key(visual_lane, lane_count);
            if let Some(img) = bundle.image(key) {
                return NoteDrawStrategy::Image {
                    key,
                    height: img.height_for_width(lane_width),
                };
            }
        }
        NoteDrawStrategy::Shape(self.note_shape)
    }

    /// Receptor image for a visual lane, pressed variant first when held.
    pub fn receptor_image(&self, visual_lane: usize, lane_count: usize, pressed: bool) -> Option<(&'static str, &SkinImage)> {
        let bundle = self.bundle.as_ref()?;
        let (up, down) = receptor_image_keys(visual_lane, lane_count);
        if pressed {
            if let Some(img) = bundle.image(down) {
                return Some((down, img));
            }
        }
        bundle.image(up).map(|img| (up, img))
    }

    pub fn judgement_image(&self, judgement: Judgement) -> Option<(&'static str, &SkinImage)> {
        let key = judgement_image_key(judgement);
        self.bundle.as_ref()?.image(key).map(|img| (key, img))
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum LaneKind {
    Odd,
    Even,
    Centre,
}

fn lane_kind(visual_lane: usize, lane_count: usize) -> LaneKind {
    if lane_count % 2 == 1 && visual_lane == lane_count / 2 {
        LaneKind::Centre
    } else if visual_lane % 2 == 1 {
        LaneKind::Even
    } else {
        LaneKind::Odd
    }
}

pub fn note_image_key(visual_lane: usize, lane_count: usize) -> &'static str {
    match lane_kind(visual_lane, lane_count) {
        LaneKind::Centre => "mania-notes",
        LaneKind::Even => "mania-note2",
        LaneKind::Odd => "mania-note1",
    }
}

pub fn receptor_image_keys(visual_lane: usize, lane_count: usize) -> (&'static str, &'static str) {
    match lane_kind(visual_lane, lane_count) {
        LaneKind::Centre => ("mania-keys", "mania-keysd"),
        LaneKind::Even => ("mania-key2", "mania-key2d"),
        LaneKind::Odd => ("mania-key1", "mania-key1d"),
    }
}

pub fn judgement_image_key(judgement: Judgement) -> &'static str {
    match judgement {
        Judgement::Marvelous => "mania-hit300g",
        Judgement::Perfect => "mania-hit300",
        Judgement::Great => "mania-hit200",
        Judgement::Good => "mania-hit100",
        Judgement::Bad => "mania-hit50",
        Judgement::Miss => "mania-miss",
    }
}
